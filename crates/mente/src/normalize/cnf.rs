//! Flattening, distribution to CNF, and clause extraction

use super::nnf::canonicalize;
use crate::error::FormationError;
use crate::logic::{Clause, Connective, Term, KB};

/// Collapse free clauses into plain formula trees.
///
/// A single-member clause becomes its member; several members become a
/// right-nested conjunction. An empty top-level clause means there is
/// nothing to state and yields `None`.
pub fn simplify(term: &Term) -> Result<Option<Term>, FormationError> {
    match term {
        Term::FreeClause(clause) if clause.is_empty() => Ok(None),
        _ => collapse(term).map(Some),
    }
}

/// Like [`simplify`], but a top-level free clause is split into its
/// collapsed members instead of being folded into one conjunction.
pub fn simplify_members(term: &Term) -> Result<Vec<Term>, FormationError> {
    match term {
        Term::FreeClause(clause) if !clause.is_negated() => clause.terms().iter().map(collapse).collect(),
        _ => Ok(vec![collapse(term)?]),
    }
}

fn collapse(term: &Term) -> Result<Term, FormationError> {
    match term {
        Term::FreeClause(clause) => {
            let mut members = clause
                .terms()
                .iter()
                .rev()
                .map(collapse)
                .collect::<Result<Vec<_>, _>>()?
                .into_iter();
            let last = members.next().ok_or(FormationError::EmptyFreeClause)?;
            let folded = members.fold(last, |acc, member| Term::and(member, acc));
            if clause.is_negated() {
                Ok(canonicalize(&folded.negated()))
            } else {
                Ok(folded)
            }
        }
        Term::Operator(_) | Term::Quantifier(_) => term.try_map_children(collapse),
        _ => Ok(term.clone()),
    }
}

/// Distribute disjunction over conjunction until no `∨` has a `∧` below it.
///
/// Input must be quantifier-free and in negation normal form. The result
/// is a right-nested conjunction of the distributed conjuncts, left to
/// right.
pub fn distribute(term: &Term) -> Term {
    let mut parts = conjuncts(term).into_iter().rev().map(|part| match part {
        Term::Operator(op) if op.connective() == Connective::Or => {
            distribute_or(distribute(op.left()), distribute(op.right()))
        }
        Term::FreeClause(_) => part.map_children(distribute),
        _ => part.clone(),
    });
    match parts.next() {
        Some(last) => parts.fold(last, |acc, part| Term::and(part, acc)),
        None => term.clone(),
    }
}

fn is_conjunction(term: &Term) -> bool {
    matches!(term, Term::Operator(op) if op.connective() == Connective::And && !op.is_negated())
}

/// Operands of a conjunction tree in left-to-right order
fn conjuncts(term: &Term) -> Vec<&Term> {
    let mut stack = vec![term];
    let mut parts = Vec::new();
    while let Some(term) = stack.pop() {
        match term {
            Term::Operator(op) if is_conjunction(term) => {
                stack.push(op.right());
                stack.push(op.left());
            }
            _ => parts.push(term),
        }
    }
    parts
}

/// `left ∨ right` for operands already in CNF
fn distribute_or(left: Term, right: Term) -> Term {
    match (left, right) {
        (Term::Operator(op), right) if op.connective() == Connective::And => {
            // (A ∧ B) ∨ C = (A ∨ C) ∧ (B ∨ C)
            let (a, b) = op.into_operands();
            Term::and(distribute_or(a, right.clone()), distribute_or(b, right))
        }
        (left, Term::Operator(op)) if op.connective() == Connective::And => {
            // A ∨ (B ∧ C) = (A ∨ B) ∧ (A ∨ C)
            let (b, c) = op.into_operands();
            Term::and(distribute_or(left.clone(), b), distribute_or(left, c))
        }
        (left, right) => Term::or(left, right),
    }
}

/// Whether `term` is a conjunction of disjunctions of literal-level terms
pub fn is_cnf(term: &Term) -> bool {
    fn is_disjunction(term: &Term) -> bool {
        match term {
            Term::Operator(op) if op.connective() == Connective::Or => {
                is_disjunction(op.left()) && is_disjunction(op.right())
            }
            t => t.is_atomic(),
        }
    }
    conjuncts(term).into_iter().all(is_disjunction)
}

/// Gather a CNF tree into a knowledge base of clauses, left to right
pub fn clausify(term: &Term) -> Result<KB, FormationError> {
    let mut kb = KB::new();
    let mut stack = vec![term];
    while let Some(term) = stack.pop() {
        match term {
            Term::Operator(op) if op.connective() == Connective::And => {
                stack.push(op.right());
                stack.push(op.left());
            }
            Term::FreeClause(clause) => stack.extend(clause.terms().iter().rev()),
            _ => {
                kb.insert(disjunction(term)?);
            }
        }
    }
    Ok(kb)
}

fn disjunction(term: &Term) -> Result<Clause, FormationError> {
    match term {
        Term::Operator(op) if op.connective() == Connective::Or => {
            let clause = disjunction(op.left())?.union(&disjunction(op.right())?);
            Ok(clause.with_negation(op.is_negated()))
        }
        t if t.is_atomic() => Clause::unit(t.clone()),
        t => Err(FormationError::NotCnf(t.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(name: &str) -> Term {
        Term::literal(name)
    }

    #[test]
    fn test_simplify_free_clause() {
        let t = Term::free_clause(vec![lit("a"), Term::free_clause(vec![lit("b")]), lit("c")]);
        assert_eq!(simplify(&t).unwrap().unwrap().to_string(), "(a ∧ (b ∧ c))");
        assert_eq!(simplify(&Term::free_clause(vec![])).unwrap(), None);

        let nested = Term::and(lit("a"), Term::free_clause(vec![]));
        assert_eq!(simplify(&nested), Err(FormationError::EmptyFreeClause));
    }

    #[test]
    fn test_distribute_left() {
        let t = Term::or(Term::and(lit("a"), lit("b")), lit("c"));
        let cnf = distribute(&t);
        assert_eq!(cnf.to_string(), "((a ∨ c) ∧ (b ∨ c))");
        assert!(is_cnf(&cnf));
    }

    #[test]
    fn test_distribute_both_sides() {
        let t = Term::or(Term::and(lit("a"), lit("b")), Term::and(lit("c"), lit("d")));
        let cnf = distribute(&t);
        assert!(is_cnf(&cnf));
        assert_eq!(clausify(&cnf).unwrap().len(), 4);
    }

    #[test]
    fn test_distribute_nested() {
        let t = Term::or(lit("a"), Term::or(lit("b"), Term::and(lit("c"), lit("d"))));
        let cnf = distribute(&t);
        assert_eq!(cnf.to_string(), "((a ∨ (b ∨ c)) ∧ (a ∨ (b ∨ d)))");
    }

    #[test]
    fn test_clausify() {
        let t = Term::and(Term::or(lit("p"), lit("q").negated()), lit("r"));
        let kb = clausify(&t).unwrap();
        assert_eq!(kb.to_string(), "((p ∨ ¬q) ∧ (r))");
    }

    #[test]
    fn test_simplify_members_keeps_statements_apart() {
        let t = Term::free_clause(vec![lit("a"), Term::free_clause(vec![lit("b"), lit("c")])]);
        let members = simplify_members(&t).unwrap();
        assert_eq!(members, vec![lit("a"), Term::and(lit("b"), lit("c"))]);
        assert!(simplify_members(&Term::free_clause(vec![])).unwrap().is_empty());
    }

    #[test]
    fn test_long_conjunctions() {
        let t = (0..5_000)
            .map(|i| lit(&format!("p{}", i)))
            .rev()
            .reduce(|acc, l| Term::and(l, acc))
            .unwrap();
        let cnf = distribute(&t);
        assert!(is_cnf(&cnf));
        let kb = clausify(&cnf).unwrap();
        assert_eq!(kb.len(), 5_000);
        assert_eq!(kb.iter().next(), Some(&Clause::unit(lit("p0")).unwrap()));
    }

    #[test]
    fn test_clausify_rejects_non_cnf() {
        let t = Term::or(lit("p"), Term::and(lit("q"), lit("r")));
        assert!(matches!(clausify(&t), Err(FormationError::NotCnf(_))));
    }
}
