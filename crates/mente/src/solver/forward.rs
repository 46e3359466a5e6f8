//! Forward chaining for ground Horn knowledge bases

use crate::logic::{Clause, HornKB, Term};
use indexmap::IndexSet;
use tracing::trace;

/// Remove the complement of `literal` from `clause`
pub fn unit_resolution(clause: &Clause, literal: &Term) -> Clause {
    clause.without(&literal.negated())
}

/// Whether `query` follows from a ground knowledge base.
///
/// Starts from the facts and fires a clause once every body member has
/// been derived. Variables are compared as plain symbols.
pub fn forward_chaining_solve(kb: &HornKB, query: &Term) -> bool {
    let query = query.positive();
    let mut remaining: Vec<usize> = kb.iter().map(|clause| clause.body().len()).collect();
    let mut inferred: IndexSet<Term> = IndexSet::new();
    let mut agenda: Vec<Term> = kb
        .iter()
        .filter(|clause| clause.is_fact())
        .map(|clause| clause.head().clone())
        .collect();

    while let Some(known) = agenda.pop() {
        if known == query {
            return true;
        }
        if !inferred.insert(known.clone()) {
            continue;
        }
        trace!(fact = %known, "derived");

        let premise = known.negated();
        for (index, clause) in kb.iter().enumerate() {
            if remaining[index] > 0 && clause.body().contains(&premise) {
                remaining[index] -= 1;
                if remaining[index] == 0 {
                    agenda.push(clause.head().clone());
                }
            }
        }
    }
    false
}
