//! Construction-time error kinds.
//!
//! The recognizers never fail once built: a grammar that is well-formed but
//! pathological simply falls through to the recursive regime. Only grammar
//! *construction* can fail, and only for the two reasons below.

use crate::symbol::Symbol;

/// Errors reported by [`crate::Grammar::builder`] construction.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// A rule referenced a symbol that is a member of neither N nor Σ.
    #[error("rule references symbol {symbol} which is in neither N nor Σ")]
    MalformedGrammar {
        /// The offending symbol.
        symbol: Symbol,
    },
    /// A rule was added with an empty left-hand side.
    #[error("rule has an empty left-hand side")]
    EmptyLhs,
}
