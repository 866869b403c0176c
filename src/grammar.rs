//! Definition of a grammar G = (N, Σ, S, P) and the builder used to
//! construct one.

use std::collections::BTreeSet;

use crate::error::Error;
use crate::symbol::{Symbol, SymbolSource, SymbolString};

/// A single production rule α → β.
///
/// For context-free grammars `lhs` always has length 1 and holds a single
/// nonterminal; growing context-sensitive and general rewriting rules may
/// have an arbitrary nonempty symbol string on the left.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    lhs: SymbolString,
    rhs: SymbolString,
}

impl Rule {
    /// The rule's left-hand side.
    pub fn lhs(&self) -> &[Symbol] {
        &self.lhs
    }

    /// The rule's right-hand side.
    pub fn rhs(&self) -> &[Symbol] {
        &self.rhs
    }
}

/// A grammar G = (N, Σ, S, P), immutable once built.
#[derive(Clone, Debug)]
pub struct Grammar {
    nonterminals: BTreeSet<u32>,
    terminals: BTreeSet<char>,
    start: Symbol,
    rules: Vec<Rule>,
}

impl Grammar {
    /// Starts building a grammar with the given nonterminal set, terminal
    /// set, and start symbol.
    pub fn builder<Ns, Ts>(nonterminals: Ns, terminals: Ts, start: Symbol) -> GrammarBuilder
    where
        Ns: IntoIterator<Item = Symbol>,
        Ts: IntoIterator<Item = char>,
    {
        GrammarBuilder::new(nonterminals, terminals, start)
    }

    /// The grammar's start symbol S.
    pub fn start(&self) -> Symbol {
        self.start
    }

    /// The grammar's production rules P.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The grammar's nonterminal set N.
    pub fn nonterminals(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.nonterminals.iter().map(|&id| Symbol::Nonterminal(id))
    }

    /// The grammar's terminal set Σ.
    pub fn terminals(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.terminals.iter().map(|&c| Symbol::Terminal(c))
    }

    /// True if `sym` is a member of N.
    pub fn has_nonterminal(&self, sym: Symbol) -> bool {
        match sym {
            Symbol::Nonterminal(id) => self.nonterminals.contains(&id),
            Symbol::Terminal(_) => false,
        }
    }

    /// True if `sym` is a member of Σ.
    pub fn has_terminal(&self, sym: Symbol) -> bool {
        match sym {
            Symbol::Terminal(c) => self.terminals.contains(&c),
            Symbol::Nonterminal(_) => false,
        }
    }

    /// True if `sym` is a member of N ∪ Σ.
    pub fn has_symbol(&self, sym: Symbol) -> bool {
        self.has_nonterminal(sym) || self.has_terminal(sym)
    }

    /// A symbol source seeded past every nonterminal id already in use, fit
    /// for allocating fresh nonterminals during the CNF pipeline.
    pub(crate) fn symbol_source(&self) -> SymbolSource {
        SymbolSource::starting_at(self.num_nonterminal_slots())
    }

    /// One past the highest nonterminal id in use, i.e. the width a DP table
    /// indexed by nonterminal id needs.
    pub(crate) fn num_nonterminal_slots(&self) -> u32 {
        self.nonterminals.iter().next_back().map_or(0, |&id| id + 1)
    }
}

/// Builder for [`Grammar`], following the fluent `rule(lhs).rhs(a).rhs(b)`
/// style used throughout this crate's rule-construction code.
pub struct GrammarBuilder {
    nonterminals: BTreeSet<u32>,
    terminals: BTreeSet<char>,
    start: Symbol,
    rules: Vec<Rule>,
    lhs: Option<SymbolString>,
}

impl GrammarBuilder {
    fn new<Ns, Ts>(nonterminals: Ns, terminals: Ts, start: Symbol) -> Self
    where
        Ns: IntoIterator<Item = Symbol>,
        Ts: IntoIterator<Item = char>,
    {
        GrammarBuilder {
            nonterminals: nonterminals
                .into_iter()
                .filter_map(Symbol::nonterminal_id)
                .collect(),
            terminals: terminals
                .into_iter()
                .filter_map(|sym| match sym {
                    Symbol::Terminal(c) => Some(c),
                    Symbol::Nonterminal(_) => None,
                })
                .collect(),
            start,
            rules: vec![],
            lhs: None,
        }
    }

    /// Starts building a new rule with the given left-hand side. Each
    /// following call to [`rhs`](Self::rhs) adds one alternative for this
    /// LHS, until the next call to `rule`.
    pub fn rule<S>(mut self, lhs: S) -> Self
    where
        S: Into<SymbolString>,
    {
        self.lhs = Some(lhs.into());
        self
    }

    /// Adds a rule alternative α → β for the LHS set by the last call to
    /// [`rule`](Self::rule).
    pub fn rhs<S>(mut self, rhs: S) -> Self
    where
        S: Into<SymbolString>,
    {
        let lhs = self.lhs.clone().expect("rhs() called before rule()");
        self.rules.push(Rule {
            lhs,
            rhs: rhs.into(),
        });
        self
    }

    /// Validates and builds the grammar.
    ///
    /// Fails with [`Error::EmptyLhs`] if any rule has an empty left-hand
    /// side, or [`Error::MalformedGrammar`] if any rule references a symbol
    /// outside N ∪ Σ.
    pub fn build(self) -> Result<Grammar, Error> {
        let grammar = Grammar {
            nonterminals: self.nonterminals,
            terminals: self.terminals,
            start: self.start,
            rules: self.rules,
        };

        for rule in &grammar.rules {
            if rule.lhs.is_empty() {
                return Err(Error::EmptyLhs);
            }
            for &sym in rule.lhs.iter().chain(rule.rhs.iter()) {
                if !grammar.has_symbol(sym) {
                    return Err(Error::MalformedGrammar { symbol: sym });
                }
            }
        }

        log::debug!(
            "built grammar: {} nonterminals, {} terminals, {} rules",
            grammar.nonterminals.len(),
            grammar.terminals.len(),
            grammar.rules.len(),
        );

        Ok(grammar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(id: u32) -> Symbol {
        Symbol::Nonterminal(id)
    }

    #[test]
    fn builds_a_well_formed_grammar() {
        let s = sym(0);
        let a = sym(1);
        let grammar = Grammar::builder([s, a], ['a', 'b'], s)
            .rule(vec![s])
            .rhs(vec![Symbol::Terminal('a'), a, Symbol::Terminal('b')])
            .rule(vec![a])
            .rhs(vec![Symbol::Terminal('a'), a, Symbol::Terminal('b')])
            .rhs(vec![Symbol::Terminal('a'), Symbol::Terminal('b')])
            .build()
            .unwrap();

        assert_eq!(grammar.rules().len(), 3);
        assert_eq!(grammar.start(), s);
    }

    #[test]
    fn rejects_symbol_outside_alphabets() {
        let s = sym(0);
        let stray = sym(99);
        let err = Grammar::builder([s], ['a'], s)
            .rule(vec![s])
            .rhs(vec![stray])
            .build()
            .unwrap_err();
        assert_eq!(err, Error::MalformedGrammar { symbol: stray });
    }

    #[test]
    fn rejects_empty_lhs() {
        let s = sym(0);
        let err = Grammar::builder([s], ['a'], s)
            .rule(Vec::<Symbol>::new())
            .rhs(vec![Symbol::Terminal('a')])
            .build()
            .unwrap_err();
        assert_eq!(err, Error::EmptyLhs);
    }
}
