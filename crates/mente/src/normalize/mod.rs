//! Conversion from arbitrary formulas to clause form
//!
//! The passes run in a fixed order:
//!
//! 1. implication elimination
//! 2. negation normal form
//! 3. standardizing quantified variables apart
//! 4. Skolemization (drops every quantifier)
//! 5. free clause flattening
//! 6. distribution to CNF, one statement at a time
//! 7. clause extraction
//!
//! Fresh variable and Skolem names come from a [`NormalizeContext`], so
//! every conversion starts its counters from zero.

pub mod cnf;
pub mod implications;
pub mod nnf;
pub mod skolem;
pub mod standardize;


pub use cnf::{clausify, distribute, is_cnf, simplify, simplify_members};
pub use implications::eliminate_implications;
pub use nnf::{canonicalize, is_nnf};
pub use skolem::skolemize;
pub use standardize::standardize_apart;

use crate::error::FormationError;
use crate::logic::{HornKB, Term, Var, KB};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Fresh-name state for one conversion
#[derive(Debug, Clone, Default)]
pub struct NormalizeContext {
    rename_counter: usize,
    skolem_counter: usize,
    reserved: HashSet<String>,
}

impl NormalizeContext {
    pub fn new() -> Self {
        NormalizeContext::default()
    }

    /// A context that never hands out a variable name used in `term`
    pub fn for_term(term: &Term) -> Self {
        let mut reserved = HashSet::new();
        collect_var_names(term, &mut reserved);
        NormalizeContext {
            reserved,
            ..NormalizeContext::default()
        }
    }

    pub fn fresh_var(&mut self) -> Var {
        loop {
            let name = format!("x{}", self.rename_counter);
            self.rename_counter += 1;
            if !self.reserved.contains(&name) {
                return Var::new(name);
            }
        }
    }

    /// A fresh Skolem function of `enclosing`, or a Skolem constant
    pub fn skolem_term(&mut self, enclosing: Option<&Var>) -> Term {
        let name = format!("skolem_{}", self.skolem_counter);
        self.skolem_counter += 1;
        match enclosing {
            Some(var) => Term::function(name, Term::Var(var.clone())),
            None => Term::literal(name),
        }
    }

    /// Run every pass over `term`, returning the resulting clauses
    pub fn propositionalize(&mut self, term: &Term) -> Result<KB, FormationError> {
        let eliminated = eliminate_implications(term);
        debug!(formula = %eliminated, "implications eliminated");

        let nnf = canonicalize(&eliminated);
        debug!(formula = %nnf, "negation normal form");

        let standardized = standardize_apart(&nnf, self);
        debug!(formula = %standardized, renamed = self.rename_counter, "variables standardized apart");

        let skolemized = skolemize(&standardized, self);
        debug!(formula = %skolemized, skolems = self.skolem_counter, "skolemized");

        // Each top-level statement is distributed and clausified on its own
        let members = simplify_members(&skolemized)?;
        if members.is_empty() {
            debug!("empty formula, no clauses");
            return Ok(KB::new());
        }

        let mut kb = KB::new();
        for matrix in &members {
            let cnf = distribute(matrix);
            trace!(formula = %cnf, "conjunctive normal form");
            for clause in clausify(&cnf)? {
                kb.insert(clause);
            }
        }
        debug!(clauses = kb.len(), kb = %kb, "clausified");
        Ok(kb)
    }
}

fn collect_var_names(term: &Term, names: &mut HashSet<String>) {
    match term {
        Term::Var(v) => {
            names.insert(v.name().to_string());
        }
        Term::Quantifier(q) => {
            names.insert(q.var().name().to_string());
            collect_var_names(q.predicate(), names);
        }
        _ => {
            for child in term.children() {
                collect_var_names(child, names);
            }
        }
    }
}

/// Convert a formula to clause form with a fresh context
pub fn propositionalize(term: &Term) -> Result<KB, FormationError> {
    NormalizeContext::for_term(term).propositionalize(term)
}

/// Convert a formula and check that every clause is Horn
pub fn to_horn_kb(term: &Term) -> Result<HornKB, FormationError> {
    HornKB::try_from(propositionalize(term)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{Clause, Connective};

    fn rel(name: &str, args: Vec<Term>) -> Term {
        Term::relation(name, args).unwrap()
    }

    #[test]
    fn test_implication_to_horn() {
        // ∀X (man(X) ⇒ mortal(X))
        let rule = Term::forall(
            Term::var("X"),
            Term::implies(rel("man", vec![Term::var("X")]), rel("mortal", vec![Term::var("X")])),
        )
        .unwrap();
        let kb = to_horn_kb(&Term::free_clause(vec![rule])).unwrap();
        assert_eq!(kb.len(), 1);
        let clause = kb.get(0).unwrap();
        assert_eq!(clause.head().to_string(), "mortal(X)");
        assert_eq!(clause.body()[0].to_string(), "¬man(X)");
    }

    #[test]
    fn test_biconditional_yields_two_clauses() {
        let t = Term::iff(Term::literal("a"), Term::literal("b"));
        let kb = propositionalize(&t).unwrap();
        let expected: KB = [
            Clause::new([Term::literal("a").negated(), Term::literal("b")]).unwrap(),
            Clause::new([Term::literal("b").negated(), Term::literal("a")]).unwrap(),
        ]
        .into_iter()
        .collect();
        assert_eq!(kb, expected);
    }

    #[test]
    fn test_counters_reset_per_call() {
        let t = Term::exists(Term::var("X"), rel("p", vec![Term::var("X")])).unwrap();
        let first = propositionalize(&t).unwrap();
        let second = propositionalize(&t).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_string(), "((p(skolem_0)))");
    }

    #[test]
    fn test_fresh_names_avoid_input_names() {
        let t = rel("p", vec![Term::var("x0")]);
        let mut ctx = NormalizeContext::for_term(&t);
        assert_eq!(ctx.fresh_var().name(), "x1");
    }

    #[test]
    fn test_non_horn_rejected() {
        let t = Term::or(Term::literal("p"), Term::literal("q"));
        assert!(matches!(
            to_horn_kb(&t),
            Err(FormationError::NotHorn { positives: 2, .. })
        ));
    }

    #[test]
    fn test_pipeline_output_is_cnf() {
        // ¬(a ∧ (b ⇒ c)) ∨ (d ⇔ e)
        let t = Term::operator(
            Connective::Or,
            Term::and(Term::literal("a"), Term::implies(Term::literal("b"), Term::literal("c")))
                .negated(),
            Term::iff(Term::literal("d"), Term::literal("e")),
        );
        let kb = propositionalize(&t).unwrap();
        assert!(!kb.is_empty());
        assert!(kb.iter().all(|clause| clause.terms().all(Term::is_atomic)));
    }
}
