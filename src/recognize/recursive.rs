//! The general recursive recognizer: memoized reverse-derivation search for
//! rewriting systems that are neither context-free nor growing
//! context-sensitive. Soundness is unconditional; completeness is bounded by
//! [`RecursionBudget`].

use std::collections::HashMap;

use crate::grammar::Grammar;
use crate::recognize::MatchOutcome;
use crate::symbol::{Symbol, SymbolString};

/// Bounds the reverse-derivation search so it terminates on grammars with no
/// useful structure to exploit. Counts distinct symbol strings visited, not
/// recursion depth, since the search is a memoized graph walk rather than a
/// simple recursive descent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecursionBudget(
    /// Maximum number of distinct symbol strings the search may visit.
    pub usize,
);

impl Default for RecursionBudget {
    fn default() -> Self {
        RecursionBudget(100_000)
    }
}

/// A grammar prepared for reverse-derivation search: every rule indexed by
/// its RHS, so matching proceeds by rewriting `x` back towards `S` one
/// production at a time.
#[derive(Clone, Debug)]
pub struct RecursiveGrammar {
    start: SymbolString,
    reverse_rules: HashMap<SymbolString, Vec<SymbolString>>,
    budget: RecursionBudget,
}

impl RecursiveGrammar {
    /// Builds the reverse-rule index from every production of `grammar`.
    ///
    /// Keeps every LHS that produces a given RHS, since dropping
    /// alternatives on collision can make a derivable string look
    /// unreachable.
    pub fn new(grammar: &Grammar, budget: RecursionBudget) -> Self {
        let mut reverse_rules: HashMap<SymbolString, Vec<SymbolString>> = HashMap::new();
        for rule in grammar.rules() {
            reverse_rules
                .entry(rule.rhs().to_vec())
                .or_default()
                .push(rule.lhs().to_vec());
        }
        RecursiveGrammar {
            start: vec![grammar.start()],
            reverse_rules,
            budget,
        }
    }

    /// Attempts to rewrite `x` back to the start symbol, memoizing every
    /// symbol string visited. Returns [`MatchOutcome::Indeterminate`] once
    /// the budget is exhausted before a definite answer is reached.
    pub fn try_match(&self, x: &str) -> MatchOutcome {
        let target: SymbolString = x.chars().map(Symbol::Terminal).collect();
        let mut cache: HashMap<SymbolString, bool> = HashMap::new();
        cache.insert(self.start.clone(), true);
        let mut remaining_budget = self.budget.0;
        match self.search(&target, &mut cache, &mut remaining_budget) {
            Some(true) => MatchOutcome::Match,
            Some(false) => MatchOutcome::NoMatch,
            None => MatchOutcome::Indeterminate,
        }
    }

    /// `None` means the budget ran out before `y` could be settled either
    /// way.
    fn search(
        &self,
        y: &SymbolString,
        cache: &mut HashMap<SymbolString, bool>,
        budget: &mut usize,
    ) -> Option<bool> {
        if let Some(&known) = cache.get(y) {
            return Some(known);
        }
        if *budget == 0 {
            return None;
        }
        *budget -= 1;
        // Tentatively false, so a cycle through `y` does not recurse forever.
        cache.insert(y.clone(), false);

        for end in 1..=y.len() {
            for start in 0..end {
                let Some(replacements) = self.reverse_rules.get(&y[start..end]) else {
                    continue;
                };
                for replacement in replacements {
                    let mut neighbor =
                        Vec::with_capacity(start + replacement.len() + (y.len() - end));
                    neighbor.extend_from_slice(&y[..start]);
                    neighbor.extend_from_slice(replacement);
                    neighbor.extend_from_slice(&y[end..]);

                    match self.search(&neighbor, cache, budget) {
                        Some(true) => {
                            cache.insert(y.clone(), true);
                            return Some(true);
                        }
                        Some(false) => {}
                        None => return None,
                    }
                }
            }
        }

        Some(false)
    }
}
