//! Implication and biconditional elimination

use crate::logic::{Connective, Term};

/// Rewrite `A ⇒ B` to `¬A ∨ B` and `A ⇔ B` to `(¬A ∨ B) ∧ (¬B ∨ A)`.
///
/// The negation flag of a rewritten connective moves to its replacement.
pub fn eliminate_implications(term: &Term) -> Term {
    match term {
        Term::Operator(op) => {
            let left = eliminate_implications(op.left());
            let right = eliminate_implications(op.right());
            let negate = op.is_negated();
            match op.connective() {
                Connective::Implies => Term::operator_with(Connective::Or, left.negated(), right, negate),
                Connective::Iff => {
                    let forward = Term::or(left.negated(), right.clone());
                    let backward = Term::or(right.negated(), left);
                    Term::operator_with(Connective::And, forward, backward, negate)
                }
                connective => Term::operator_with(connective, left, right, negate),
            }
        }
        Term::Quantifier(_) | Term::FreeClause(_) => term.map_children(eliminate_implications),
        _ => term.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implication() {
        let t = Term::implies(Term::literal("a"), Term::literal("b"));
        assert_eq!(eliminate_implications(&t).to_string(), "(¬a ∨ b)");
    }

    #[test]
    fn test_biconditional() {
        let t = Term::iff(Term::literal("a"), Term::literal("b"));
        assert_eq!(
            eliminate_implications(&t).to_string(),
            "((¬a ∨ b) ∧ (¬b ∨ a))"
        );
    }

    #[test]
    fn test_negated_implication_keeps_flag() {
        let t = Term::implies(Term::literal("a"), Term::literal("b")).negated();
        assert_eq!(eliminate_implications(&t).to_string(), "¬(¬a ∨ b)");
    }

    #[test]
    fn test_nested_under_quantifier() {
        let p = Term::relation("p", vec![Term::var("X")]).unwrap();
        let q = Term::relation("q", vec![Term::var("X")]).unwrap();
        let t = Term::forall(Term::var("X"), Term::implies(p, q)).unwrap();
        assert_eq!(eliminate_implications(&t).to_string(), "(∀ X (¬p(X) ∨ q(X)))");
    }
}
