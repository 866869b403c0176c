//! The context-free recognizer: plain CYK over a [`CnfGrammar`], filling a
//! span × nonterminal DP table bottom-up.

use bit_matrix::BitMatrix;

use crate::cnf::CnfGrammar;

/// True if `x` is in the language of `cnf`.
///
/// The DP table is a [`BitMatrix`] with one row per span `(i, j)` (flattened
/// `i * len + j`, the same flattening the growing context-sensitive
/// recognizer uses) and one column per nonterminal id.
pub fn is_match(cnf: &CnfGrammar, x: &str) -> bool {
    let chars: Vec<char> = x.chars().collect();
    let len = chars.len();

    if len == 0 {
        return cnf.nulling_start();
    }

    let num_nonterminals = cnf.num_nonterminals() as usize;
    let span = |i: usize, j: usize| i * len + j;
    let mut table = BitMatrix::new(len * len, num_nonterminals);

    for i in 0..len {
        for &(a, c) in cnf.terminal_rules() {
            if c == chars[i] {
                table.set(span(i, i), a as usize, true);
            }
        }
    }

    for width in 2..=len {
        for i in 0..=(len - width) {
            let j = i + width - 1;
            for k in i..j {
                for &(a, b, c) in cnf.binary_rules() {
                    if table[(span(i, k), b as usize)] && table[(span(k + 1, j), c as usize)] {
                        table.set(span(i, j), a as usize, true);
                    }
                }
            }
        }
    }

    table[(span(0, len - 1), cnf.start() as usize)]
}
