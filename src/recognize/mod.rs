//! Dispatch over the three recognition regimes: each [`Grammar`] is
//! classified exactly once, at construction time, into context-free,
//! growing context-sensitive, or general recursive — then every `is_match`
//! call runs the regime-specific algorithm with no further classification
//! work and no logging on the hot path.

pub mod cyk;
pub mod gcs;
pub mod recursive;

use crate::cnf::{self, CnfGrammar};
use crate::grammar::Grammar;
use crate::symbol::Symbol;

use gcs::GcsGrammar;
use recursive::{RecursionBudget, RecursiveGrammar};

/// The result of a match attempt.
///
/// Only the recursive regime can return [`Indeterminate`](Self::Indeterminate) —
/// the context-free and growing context-sensitive regimes always settle the
/// question outright.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The string is in the language.
    Match,
    /// The string is not in the language.
    NoMatch,
    /// The recursive search exhausted its [`RecursionBudget`] before
    /// settling the question.
    Indeterminate,
}

impl MatchOutcome {
    /// Collapses [`Indeterminate`](Self::Indeterminate) to `false`, for
    /// callers that only want a yes/no answer.
    pub fn as_bool(self) -> bool {
        matches!(self, MatchOutcome::Match)
    }
}

/// A grammar classified into one of the three recognition regimes and built
/// into the representation that regime's algorithm operates on.
#[derive(Clone, Debug)]
pub enum Recognizer {
    /// Plain CYK over a Chomsky Normal Form grammar.
    ContextFree(CnfGrammar),
    /// Generalized CYK with context verification.
    GrowingContextSensitive(GcsGrammar),
    /// Memoized reverse-derivation search, budget-bounded.
    Recursive(RecursiveGrammar),
}

impl Recognizer {
    /// Classifies `grammar` and builds the matching recognizer, using the
    /// default [`RecursionBudget`] if the grammar falls through to the
    /// recursive regime.
    pub fn build(grammar: Grammar) -> Self {
        Self::build_with_budget(grammar, RecursionBudget::default())
    }

    /// Like [`build`](Self::build), with an explicit recursion budget for
    /// the fallback regime.
    pub fn build_with_budget(grammar: Grammar, budget: RecursionBudget) -> Self {
        if is_context_free(&grammar) {
            log::debug!("classified grammar as context-free");
            return Recognizer::ContextFree(cnf::to_cnf(&grammar));
        }

        if let Some(decomposed) = gcs::try_build(&grammar) {
            log::debug!("classified grammar as growing context-sensitive");
            return Recognizer::GrowingContextSensitive(decomposed);
        }

        log::debug!("classified grammar as general recursive");
        Recognizer::Recursive(RecursiveGrammar::new(&grammar, budget))
    }

    /// True if `x` is in the language, collapsing an indeterminate result
    /// from the recursive regime to `false`. See [`try_match`](Self::try_match)
    /// to distinguish "no" from "ran out of budget".
    pub fn is_match(&self, x: &str) -> bool {
        self.try_match(x).as_bool()
    }

    /// Matches `x` against the recognizer, reporting
    /// [`MatchOutcome::Indeterminate`] rather than guessing when the
    /// recursive regime's budget is exhausted.
    pub fn try_match(&self, x: &str) -> MatchOutcome {
        match self {
            Recognizer::ContextFree(grammar) => {
                if cyk::is_match(grammar, x) {
                    MatchOutcome::Match
                } else {
                    MatchOutcome::NoMatch
                }
            }
            Recognizer::GrowingContextSensitive(grammar) => {
                if gcs::is_match(grammar, x) {
                    MatchOutcome::Match
                } else {
                    MatchOutcome::NoMatch
                }
            }
            Recognizer::Recursive(grammar) => grammar.try_match(x),
        }
    }
}

/// A grammar is context-free iff every rule's LHS is a single nonterminal.
fn is_context_free(grammar: &Grammar) -> bool {
    grammar
        .rules()
        .iter()
        .all(|rule| matches!(rule.lhs(), [sym] if matches!(sym, Symbol::Nonterminal(_))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Symbol;

    fn nt(id: u32) -> Symbol {
        Symbol::Nonterminal(id)
    }
    fn t(c: char) -> Symbol {
        Symbol::Terminal(c)
    }

    #[test]
    fn classifies_context_free_grammar_as_such() {
        let s = nt(0);
        let grammar = Grammar::builder([s], ['a'], s)
            .rule(vec![s])
            .rhs(vec![t('a'), s])
            .rhs(Vec::<Symbol>::new())
            .build()
            .unwrap();
        let recognizer = Recognizer::build(grammar);
        assert!(matches!(recognizer, Recognizer::ContextFree(_)));
        assert!(recognizer.is_match("aaa"));
        assert!(!recognizer.is_match("aab"));
    }

    #[test]
    fn classifies_growing_context_sensitive_grammar_as_such() {
        // S -> aABb | aa, A -> aABb | aa, B -> bABc | bb, aAB -> aBBB, bAB -> bBBB
        // (G5). The two context-sensitive rules give it multi-symbol LHSes,
        // so it fails the context-free check and falls to the GCS regime.
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
        let recognizer = Recognizer::build(grammar);
        assert!(matches!(recognizer, Recognizer::GrowingContextSensitive(_)));
        assert!(recognizer.is_match("aa"));
        assert!(!recognizer.is_match("ccccaaaaabbbbbb"));
    }

    #[test]
    fn classifies_unrestricted_grammar_as_recursive() {
        // S -> aS | Sb | A, aAb -> b : neither context-free nor growing.
        let s = nt(0);
        let a = nt(1);
        let grammar = Grammar::builder([s, a], ['a', 'b'], s)
            .rule(vec![s])
            .rhs(vec![t('a'), s])
            .rhs(vec![s, t('b')])
            .rhs(vec![a])
            .rule(vec![t('a'), a, t('b')])
            .rhs(vec![t('b')])
            .build()
            .unwrap();
        let recognizer = Recognizer::build(grammar);
        assert!(matches!(recognizer, Recognizer::Recursive(_)));
        assert_eq!(recognizer.try_match("b"), MatchOutcome::Match);
    }
}
