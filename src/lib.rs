//! Recognizes membership in the language of a grammar drawn from the
//! Chomsky hierarchy, by classifying the grammar once at construction time
//! and dispatching to the matching recognition regime — plain CYK for
//! context-free grammars, a generalized CYK for growing context-sensitive
//! grammars, and a budget-bounded reverse-derivation search for everything
//! else.

#![deny(
    missing_docs,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications
)]
#![cfg_attr(test, deny(warnings))]

mod cnf;
mod error;
mod grammar;
mod recognize;
mod symbol;

pub use error::Error;
pub use grammar::{Grammar, GrammarBuilder, Rule};
pub use recognize::recursive::RecursionBudget;
pub use recognize::{MatchOutcome, Recognizer};
pub use symbol::{Symbol, SymbolSource, SymbolString};
