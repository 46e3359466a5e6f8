//! Property-based tests for unification using proptest.

use super::{mgu, unify};
use crate::logic::{Substitution, Term};
use proptest::prelude::*;

/// Term description, built into a `Term` after generation
#[derive(Debug, Clone)]
enum TermDesc {
    Var(u8),                  // Variable index 0-3
    NegVar(u8),               // Negated occurrence of a variable 0-3
    Const(u8),                // Constant index 0-3
    Func(u8, Box<TermDesc>),  // Unary function index 0-1
    Rel(u8, Vec<TermDesc>),   // Relation index 0-1, with 1-2 args
}

fn arb_term_desc(max_depth: u32) -> BoxedStrategy<TermDesc> {
    if max_depth == 0 {
        prop_oneof![
            (0..4u8).prop_map(TermDesc::Var),
            (0..4u8).prop_map(TermDesc::NegVar),
            (0..4u8).prop_map(TermDesc::Const),
        ]
        .boxed()
    } else {
        prop_oneof![
            3 => (0..4u8).prop_map(TermDesc::Var),
            1 => (0..4u8).prop_map(TermDesc::NegVar),
            3 => (0..4u8).prop_map(TermDesc::Const),
            2 => (0..2u8, arb_term_desc(max_depth - 1))
                .prop_map(|(f, arg)| TermDesc::Func(f, Box::new(arg))),
            2 => (0..2u8, proptest::collection::vec(arb_term_desc(max_depth - 1), 1..=2))
                .prop_map(|(r, args)| TermDesc::Rel(r, args)),
        ]
        .boxed()
    }
}

fn build_term(desc: &TermDesc) -> Term {
    match desc {
        TermDesc::Var(i) => Term::var(format!("X{}", i)),
        TermDesc::NegVar(i) => Term::var(format!("X{}", i)).negated(),
        TermDesc::Const(i) => Term::literal(format!("c{}", i)),
        TermDesc::Func(f, arg) => Term::function(format!("f{}", f), build_term(arg)),
        TermDesc::Rel(r, args) => {
            Term::relation(format!("r{}", r), args.iter().map(build_term).collect())
                .expect("generated relations have arguments")
        }
    }
}

fn arb_term(max_depth: u32) -> impl Strategy<Value = Term> {
    arb_term_desc(max_depth).prop_map(|desc| build_term(&desc))
}

// =========================================================================
// Unification properties
// =========================================================================

proptest! {
    /// Soundness: if unify(s, t) = σ, then sσ = tσ
    #[test]
    fn unification_soundness(t1 in arb_term(3), t2 in arb_term(3)) {
        if let Some(sigma) = mgu(&t1, &t2) {
            prop_assert_eq!(sigma.apply(&t1), sigma.apply(&t2), "unifier must make terms equal");
        }
    }

    /// Applying a unifier also agrees on every negation flag
    #[test]
    fn unification_preserves_polarity(t1 in arb_term(3), t2 in arb_term(3)) {
        if let Some(sigma) = mgu(&t1, &t2) {
            prop_assert_eq!(sigma.apply(&t1).to_string(), sigma.apply(&t2).to_string());
        }
    }

    /// Symmetry: unify(s, t) succeeds iff unify(t, s) succeeds
    #[test]
    fn unification_symmetry(t1 in arb_term(3), t2 in arb_term(3)) {
        prop_assert_eq!(mgu(&t1, &t2).is_some(), mgu(&t2, &t1).is_some());
    }

    /// Reflexivity: every term unifies with itself without new bindings
    #[test]
    fn unification_reflexive(t in arb_term(3)) {
        let sigma = mgu(&t, &t);
        prop_assert_eq!(sigma, Some(Substitution::new()));
    }

    /// Occurs check: X never unifies with a compound term containing X
    #[test]
    fn occurs_check_rejects(f in 0..2u8, t in arb_term(2)) {
        let x = Term::var("X0");
        let wrapped = Term::function(format!("f{}", f), Term::relation("r0", vec![x.clone(), t]).unwrap());
        prop_assert!(mgu(&x, &wrapped).is_none());
    }

    /// A failed branch stays failed
    #[test]
    fn failure_propagates(t1 in arb_term(2), t2 in arb_term(2)) {
        prop_assert!(unify(&t1, &t2, None).is_none());
    }

    /// Double negation is the identity and rendering tracks the flag
    #[test]
    fn double_negation(t in arb_term(3)) {
        prop_assert_eq!(t.negated().negated(), t.clone());
        let t = t.positive();
        prop_assert!(t.negated().to_string().starts_with('¬'));
        prop_assert!(!t.to_string().starts_with('¬'));
    }

    /// Applying a unifier binds every variable it mentions consistently
    #[test]
    fn unifier_bindings_are_idempotent(t1 in arb_term(3), t2 in arb_term(3)) {
        if let Some(sigma) = mgu(&t1, &t2) {
            let once = sigma.apply(&t1);
            prop_assert_eq!(sigma.apply(&once), once.clone());
            for (var, _) in sigma.iter() {
                prop_assert!(!once.contains_var(var), "bound variable {} survived", var);
            }
        }
    }
}
