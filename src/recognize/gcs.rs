//! The growing context-sensitive recognizer: a generalized CYK that
//! additionally verifies left/right context via the "fits" DP subroutine,
//! over rules decomposed into `(π, A, γ, σ)` with `α = πAσ`, `β = πγσ`.

use bit_matrix::BitMatrix;

use crate::grammar::Grammar;
use crate::symbol::{Symbol, SymbolString};

/// A single production decomposed into its context and its growing center.
///
/// `prefix` (π) and `suffix` (σ) are copied unchanged from LHS to RHS; only
/// the single nonterminal `center` (A) is replaced, by `gamma` (γ). Computed
/// once at construction, not per match.
#[derive(Clone, Debug)]
pub struct DecomposedRule {
    prefix: SymbolString,
    center: u32,
    gamma: SymbolString,
    suffix: SymbolString,
}

/// A growing context-sensitive grammar, pre-decomposed and ready to match.
#[derive(Clone, Debug)]
pub struct GcsGrammar {
    start: u32,
    num_nonterminals: u32,
    rules: Vec<DecomposedRule>,
}

/// Splits a rule `lhs → rhs` into `(π, A, γ, σ)`, or returns `None` if the
/// rule does not decompose into a single-nonterminal center — meaning the
/// grammar as a whole is not growing context-sensitive.
///
/// The rule rooted at the start symbol is exempt from the growth
/// requirement `|γ| > |A|` (so that `S → ε` can express ε ∈ L(G)), but it
/// must still decompose to a single nonterminal center like every other
/// rule, since the context-matching DP below needs a well-defined center
/// regardless of which symbol it is.
fn decompose(lhs: &[Symbol], rhs: &[Symbol], start: u32) -> Option<DecomposedRule> {
    let max_affix = lhs.len().min(rhs.len());

    let mut prefix_len = 0;
    while prefix_len < max_affix && lhs[prefix_len] == rhs[prefix_len] {
        prefix_len += 1;
    }

    let mut suffix_len = 0;
    while suffix_len < max_affix
        && lhs[lhs.len() - 1 - suffix_len] == rhs[rhs.len() - 1 - suffix_len]
    {
        suffix_len += 1;
    }

    if prefix_len + suffix_len >= lhs.len() {
        return None;
    }

    let center = &lhs[prefix_len..lhs.len() - suffix_len];
    if center.len() != 1 {
        return None;
    }
    let center_id = center[0].nonterminal_id()?;

    let gamma = rhs[prefix_len..rhs.len() - suffix_len].to_vec();
    if center_id != start && gamma.len() <= center.len() {
        return None;
    }

    Some(DecomposedRule {
        prefix: lhs[..prefix_len].to_vec(),
        center: center_id,
        gamma,
        suffix: lhs[lhs.len() - suffix_len..].to_vec(),
    })
}

/// Attempts to decompose every rule of `grammar`; returns `None` as soon as
/// one rule fails to decompose, meaning the grammar falls through to the
/// recursive regime instead.
pub fn try_build(grammar: &Grammar) -> Option<GcsGrammar> {
    let start = grammar.start().nonterminal_id()?;
    let mut rules = Vec::with_capacity(grammar.rules().len());
    for rule in grammar.rules() {
        rules.push(decompose(rule.lhs(), rule.rhs(), start)?);
    }
    Some(GcsGrammar {
        start,
        num_nonterminals: grammar.num_nonterminal_slots(),
        rules,
    })
}

/// The "fits" subroutine: does the symbol string `v` derive exactly the
/// `len` characters of `x` starting at `start`, given the DP table filled in
/// so far?
///
/// `f[r][c]` means `v[..r]` derives the `c` characters of `x` beginning at
/// `start` (`c` ranging over `0..=len`, with `f[0][0]` the empty-derives-empty
/// base case).
fn fits(
    v: &[Symbol],
    start: usize,
    len: usize,
    chars: &[char],
    table: &BitMatrix,
    span: &impl Fn(usize, usize) -> usize,
) -> bool {
    let m = v.len();
    if m == 0 {
        return len == 0;
    }

    let mut f = vec![vec![false; len + 1]; m + 1];
    f[0][0] = true;

    for r in 1..=m {
        for c in 1..=len {
            match v[r - 1] {
                Symbol::Terminal(needed) => {
                    if f[r - 1][c - 1] && chars[start + c - 1] == needed {
                        f[r][c] = true;
                    }
                }
                Symbol::Nonterminal(id) => {
                    for consumed_before in 0..c {
                        if !f[r - 1][consumed_before] {
                            continue;
                        }
                        let i = start + consumed_before;
                        let j = start + c - 1;
                        if table[(span(i, j), id as usize)] {
                            f[r][c] = true;
                            break;
                        }
                    }
                }
            }
        }
    }

    f[m][len]
}

/// Direct character comparison used only at the single-character base case
/// (ℓ = 1), where context spans have not been entered into the DP table yet.
/// A context containing a nonterminal can never match here (`x` holds only
/// terminal characters); such rules only ever fire once induction begins.
fn context_matches_literally(context: &[Symbol], start: usize, target: &[char]) -> bool {
    if start + context.len() > target.len() {
        return false;
    }
    context
        .iter()
        .zip(&target[start..start + context.len()])
        .all(|(sym, &c)| matches!(sym, Symbol::Terminal(needed) if *needed == c))
}

fn prefix_matches_literally(prefix: &[Symbol], i: usize, chars: &[char]) -> bool {
    if prefix.is_empty() {
        return true;
    }
    i >= prefix.len() && context_matches_literally(prefix, i - prefix.len(), chars)
}

fn suffix_matches_literally(suffix: &[Symbol], i: usize, chars: &[char]) -> bool {
    if suffix.is_empty() {
        return true;
    }
    context_matches_literally(suffix, i + 1, chars)
}

fn prefix_fits(
    prefix: &[Symbol],
    i: usize,
    chars: &[char],
    table: &BitMatrix,
    span: &impl Fn(usize, usize) -> usize,
) -> bool {
    if prefix.is_empty() {
        return true;
    }
    if i < prefix.len() {
        return false;
    }
    (0..=(i - prefix.len())).any(|k| fits(prefix, k, i - k, chars, table, span))
}

fn suffix_fits(
    suffix: &[Symbol],
    j: usize,
    len: usize,
    chars: &[char],
    table: &BitMatrix,
    span: &impl Fn(usize, usize) -> usize,
) -> bool {
    if suffix.is_empty() {
        return true;
    }
    let start = j + 1;
    if start + suffix.len() > len {
        return false;
    }
    (start + suffix.len() - 1..len).any(|k| fits(suffix, start, k + 1 - start, chars, table, span))
}

/// True if `x` is in the language of `gcs`.
pub fn is_match(gcs: &GcsGrammar, x: &str) -> bool {
    let chars: Vec<char> = x.chars().collect();
    let len = chars.len();

    if len == 0 {
        return gcs
            .rules
            .iter()
            .any(|r| r.center == gcs.start && r.prefix.is_empty() && r.suffix.is_empty() && r.gamma.is_empty());
    }

    let num_nonterminals = gcs.num_nonterminals as usize;
    let span = |i: usize, j: usize| i * len + j;
    let mut table = BitMatrix::new(len * len, num_nonterminals);

    for i in 0..len {
        for rule in &gcs.rules {
            if rule.gamma.len() != 1 {
                continue;
            }
            let Symbol::Terminal(b) = rule.gamma[0] else {
                continue;
            };
            if b != chars[i] {
                continue;
            }
            if prefix_matches_literally(&rule.prefix, i, &chars)
                && suffix_matches_literally(&rule.suffix, i, &chars)
            {
                table.set(span(i, i), rule.center as usize, true);
            }
        }
    }

    for width in 2..=len {
        for i in 0..=(len - width) {
            let j = i + width - 1;
            for rule in &gcs.rules {
                if !prefix_fits(&rule.prefix, i, &chars, &table, &span) {
                    continue;
                }
                if !suffix_fits(&rule.suffix, j, len, &chars, &table, &span) {
                    continue;
                }
                if fits(&rule.gamma, i, width, &chars, &table, &span) {
                    table.set(span(i, j), rule.center as usize, true);
                }
            }
        }
    }

    table[(span(0, len - 1), gcs.start as usize)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;

    fn nt(id: u32) -> Symbol {
        Symbol::Nonterminal(id)
    }
    fn t(c: char) -> Symbol {
        Symbol::Terminal(c)
    }

    #[test]
    fn plain_context_free_rules_decompose_with_empty_context() {
        let s = nt(0);
        let grammar = Grammar::builder([s], ['a'], s)
            .rule(vec![s])
            .rhs(vec![t('a'), s, t('a')])
            .rhs(vec![t('a')])
            .build()
            .unwrap();
        let gcs = try_build(&grammar).expect("every rule should decompose");
        assert!(is_match(&gcs, "a"));
        assert!(is_match(&gcs, "aaa"));
        assert!(!is_match(&gcs, "aa"));
    }

    #[test]
    fn non_growing_non_start_rule_is_rejected() {
        // A -> a is a non-start rule whose RHS is no longer than its LHS
        // (1 -> 1), so it fails the growth requirement even though it is a
        // well-formed context-free-looking rule.
        let s = nt(0);
        let a = nt(1);
        let grammar = Grammar::builder([s, a], ['a'], s)
            .rule(vec![s])
            .rhs(vec![a])
            .rule(vec![a])
            .rhs(vec![t('a')])
            .build()
            .unwrap();
        assert!(try_build(&grammar).is_none());
    }

    #[test]
    fn g5_scenario_is_recognized() {
        // S -> aABb | aa, A -> aABb | aa, B -> bABc | bb, aAB -> aBBB, bAB -> bBBB
        let s = nt(0);
        let a = nt(1);
        let b = nt(2);
        let grammar = Grammar::builder([s, a, b], ['a', 'b', 'c'], s)
            .rule(vec![s])
            .rhs(vec![t('a'), a, b, t('b')])
            .rhs(vec![t('a'), t('a')])
            .rule(vec![a])
            .rhs(vec![t('a'), a, b, t('b')])
            .rhs(vec![t('a'), t('a')])
            .rule(vec![b])
            .rhs(vec![t('b'), a, b, t('c')])
            .rhs(vec![t('b'), t('b')])
            .rule(vec![t('a'), a, b])
            .rhs(vec![t('a'), b, b, b])
            .rule(vec![t('b'), a, b])
            .rhs(vec![t('b'), b, b, b])
            .build()
            .unwrap();
        let gcs = try_build(&grammar).expect("the G5 grammar is growing context-sensitive");
        assert!(is_match(&gcs, "aa"));
        assert!(is_match(&gcs, "aaabbb"));
        assert!(!is_match(&gcs, "ccccaaaaabbbbbb"));
    }
}
