//! Most general unifier computation

use crate::logic::{Substitution, Term, Var};

/// Unify two terms under an existing substitution.
///
/// `None` in means a branch that already failed and is passed straight
/// through; `None` out means the terms do not unify. Literal-level terms
/// only unify with matching names and matching negation flags.
pub fn unify(x: &Term, y: &Term, subst: Option<Substitution>) -> Option<Substitution> {
    let subst = subst?;
    match (x, y) {
        (Term::Var(v), _) => unify_var(v, y, subst),
        (_, Term::Var(v)) => unify_var(v, x, subst),
        (Term::Literal(_), Term::Literal(_)) => (x == y).then_some(subst),
        (Term::Relation(a), Term::Relation(b)) => {
            if a.name() != b.name() || x.is_negated() != y.is_negated() {
                return None;
            }
            unify_seq(a.args(), b.args(), Some(subst))
        }
        (Term::Function(a), Term::Function(b)) => {
            if a.name() != b.name() || x.is_negated() != y.is_negated() {
                return None;
            }
            unify(a.arg(), b.arg(), Some(subst))
        }
        _ => None,
    }
}

/// A most general unifier of two terms, starting from no bindings
pub fn mgu(x: &Term, y: &Term) -> Option<Substitution> {
    unify(x, y, Some(Substitution::new()))
}

/// Unify two sequences element by element; lengths must agree
pub fn unify_seq(xs: &[Term], ys: &[Term], subst: Option<Substitution>) -> Option<Substitution> {
    if xs.len() != ys.len() {
        return None;
    }
    xs.iter()
        .zip(ys)
        .try_fold(subst?, |subst, (x, y)| unify(x, y, Some(subst)))
}

/// The term an occurrence of `var` stands for under a binding to `bound`
fn occurrence(var: &Var, bound: &Term) -> Term {
    if var.is_negated() {
        bound.negated()
    } else {
        bound.clone()
    }
}

fn unify_var(var: &Var, x: &Term, subst: Substitution) -> Option<Substitution> {
    if let Some(bound) = subst.get(var).cloned() {
        let bound = occurrence(var, &bound);
        return unify(&bound, x, Some(subst));
    }
    if let Term::Var(other) = x {
        if other == var {
            // X against ¬X
            return (other.is_negated() == var.is_negated()).then_some(subst);
        }
        if let Some(bound) = subst.get(other).cloned() {
            let bound = occurrence(other, &bound);
            return unify(&Term::Var(var.clone()), &bound, Some(subst));
        }
    }
    if occurs_check(var, x, &subst) {
        return None;
    }
    // A negated occurrence binds to the negation, so applying the
    // substitution gives back `x` at this occurrence.
    let binding = occurrence(var, x);
    Some(subst.bind(var.clone(), binding))
}

/// Whether `var` occurs in `term`, following bindings in `subst`
pub fn occurs_check(var: &Var, term: &Term, subst: &Substitution) -> bool {
    match term {
        Term::Var(v) if v == var => true,
        Term::Var(v) => subst
            .get(v)
            .map_or(false, |bound| occurs_check(var, bound, subst)),
        _ => term
            .children()
            .into_iter()
            .any(|child| occurs_check(var, child, subst)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(name: &str, args: Vec<Term>) -> Term {
        Term::relation(name, args).unwrap()
    }

    #[test]
    fn test_unify_variables() {
        let result = mgu(&Term::var("X"), &Term::var("Y")).unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_unify_constant_variable() {
        let a = Term::literal("a");
        let result = mgu(&Term::var("X"), &a).unwrap();
        assert_eq!(result.get(&Var::new("X")), Some(&a));
    }

    #[test]
    fn test_unify_relations() {
        let t1 = rel("knows", vec![Term::literal("john"), Term::var("X")]);
        let t2 = rel("knows", vec![Term::var("Y"), Term::literal("jane")]);
        let s = mgu(&t1, &t2).unwrap();
        assert_eq!(s.apply(&t1), s.apply(&t2));
        assert_eq!(s.apply(&t1).to_string(), "knows(john, jane)");
    }

    #[test]
    fn test_name_and_arity_clash() {
        let x = Term::var("X");
        assert!(mgu(&rel("p", vec![x.clone()]), &rel("q", vec![x.clone()])).is_none());
        assert!(mgu(&rel("p", vec![x.clone()]), &rel("p", vec![x.clone(), x.clone()])).is_none());
        assert!(mgu(&Term::function("f", x.clone()), &Term::function("g", x)).is_none());
        assert!(mgu(&Term::literal("a"), &Term::literal("b")).is_none());
    }

    #[test]
    fn test_polarity_must_match() {
        let p = rel("p", vec![Term::literal("a")]);
        assert!(mgu(&p, &p.negated()).is_none());
        assert!(mgu(&Term::literal("a"), &Term::literal("a").negated()).is_none());
    }

    #[test]
    fn test_negated_variable_binds_negation() {
        let a = Term::literal("a");
        let neg_x = Term::var("X").negated();
        let s = mgu(&neg_x, &a).unwrap();
        assert_eq!(s.get(&Var::new("X")), Some(&a.negated()));
        assert_eq!(s.apply(&neg_x), s.apply(&a));

        let s = mgu(&a, &neg_x).unwrap();
        assert_eq!(s.apply(&neg_x), a);
    }

    #[test]
    fn test_bound_negated_variable_keeps_polarity() {
        // r(X, ¬X) against r(a, a)
        let x = Term::var("X");
        let t1 = rel("r", vec![x.clone(), x.negated()]);
        let t2 = rel("r", vec![Term::literal("a"), Term::literal("a")]);
        assert!(mgu(&t1, &t2).is_none());

        let t3 = rel("r", vec![Term::literal("a"), Term::literal("a").negated()]);
        let s = mgu(&t1, &t3).unwrap();
        assert_eq!(s.apply(&t1), t3);
    }

    #[test]
    fn test_variable_against_own_negation() {
        let x = Term::var("X");
        assert!(mgu(&x, &x.negated()).is_none());
        assert_eq!(mgu(&x.negated(), &x.negated()), Some(Substitution::new()));
    }

    #[test]
    fn test_occurs_check() {
        let x = Term::var("X");
        let fx = Term::function("f", x.clone());
        assert!(mgu(&x, &fx).is_none());
    }

    #[test]
    fn test_occurs_check_through_bindings() {
        // X = Y first, then Y = f(X) must fail
        let t1 = rel("p", vec![Term::var("X"), Term::var("Y")]);
        let t2 = rel("p", vec![Term::var("Y"), Term::function("f", Term::var("X"))]);
        assert!(mgu(&t1, &t2).is_none());
    }

    #[test]
    fn test_bound_variable_chases_binding() {
        let s = Substitution::new().bind(Var::new("X"), Term::literal("a"));
        assert!(unify(&Term::var("X"), &Term::literal("b"), Some(s.clone())).is_none());
        let s = unify(&Term::var("X"), &Term::var("Y"), Some(s)).unwrap();
        assert_eq!(s.apply(&Term::var("Y")), Term::literal("a"));
    }

    #[test]
    fn test_failed_branch_propagates() {
        assert!(unify(&Term::var("X"), &Term::var("X"), None).is_none());
    }

    #[test]
    fn test_sequences() {
        let xs = vec![Term::var("X"), Term::literal("b")];
        let ys = vec![Term::literal("a"), Term::var("Y")];
        let s = unify_seq(&xs, &ys, Some(Substitution::new())).unwrap();
        assert_eq!(s.apply_all(&xs), s.apply_all(&ys));
        assert!(unify_seq(&xs, &ys[..1], Some(Substitution::new())).is_none());
    }
}
