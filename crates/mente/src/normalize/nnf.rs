//! Negation normal form
//!
//! Pushes negation flags down to literal-level leaves with De Morgan's
//! laws and quantifier duality.

use super::implications::eliminate_implications;
use crate::logic::{Connective, QuantifierKind, Term, Var};

/// Convert a formula to negation normal form.
///
/// Implications met on the way are eliminated first. Argument lists of
/// relations and functions are left alone: negation only applies at the
/// formula level.
pub fn canonicalize(term: &Term) -> Term {
    // Stack-based so that deep formulas cannot overflow the call stack
    enum WorkItem {
        Process(Term),
        CombineOperator(Connective),
        CombineQuantified(QuantifierKind, Var),
        CombineFreeClause(usize),
    }

    let mut stack: Vec<WorkItem> = vec![WorkItem::Process(term.clone())];
    let mut results: Vec<Term> = Vec::new();

    while let Some(item) = stack.pop() {
        match item {
            WorkItem::Process(term) => match term {
                Term::Operator(ref op) => match op.connective() {
                    Connective::Implies | Connective::Iff => {
                        stack.push(WorkItem::Process(eliminate_implications(&term)));
                    }
                    connective => {
                        let negate = op.is_negated();
                        let connective = match (connective, negate) {
                            (Connective::And, true) => Connective::Or,
                            (Connective::Or, true) => Connective::And,
                            (c, _) => c,
                        };
                        let (left, right) = if negate {
                            (op.left().negated(), op.right().negated())
                        } else {
                            (op.left().clone(), op.right().clone())
                        };
                        stack.push(WorkItem::CombineOperator(connective));
                        stack.push(WorkItem::Process(right));
                        stack.push(WorkItem::Process(left));
                    }
                },

                Term::Quantifier(ref q) => {
                    if q.is_negated() {
                        // ¬∃x.P = ∀x.¬P and ¬∀x.P = ∃x.¬P
                        stack.push(WorkItem::CombineQuantified(q.kind().dual(), q.var().clone()));
                        stack.push(WorkItem::Process(q.predicate().negated()));
                    } else {
                        stack.push(WorkItem::CombineQuantified(q.kind(), q.var().clone()));
                        stack.push(WorkItem::Process(q.predicate().clone()));
                    }
                }

                Term::FreeClause(ref clause) if clause.is_empty() => results.push(term.clone()),

                Term::FreeClause(ref clause) => {
                    if clause.is_negated() {
                        // A free clause is a conjunction: its negation is the
                        // disjunction of the negated statements.
                        let mut negated = clause.terms().iter().rev().map(Term::negated);
                        let last = negated.next().unwrap_or_else(|| Term::free_clause(vec![]));
                        let disjunction = negated.fold(last, |acc, t| Term::or(t, acc));
                        stack.push(WorkItem::CombineFreeClause(1));
                        stack.push(WorkItem::Process(disjunction));
                    } else {
                        stack.push(WorkItem::CombineFreeClause(clause.terms().len()));
                        for t in clause.terms().iter().rev() {
                            stack.push(WorkItem::Process(t.clone()));
                        }
                    }
                }

                leaf => results.push(leaf),
            },

            WorkItem::CombineOperator(connective) => {
                let right = pop(&mut results);
                let left = pop(&mut results);
                results.push(Term::operator(connective, left, right));
            }

            WorkItem::CombineQuantified(kind, var) => {
                let predicate = pop(&mut results);
                results.push(Term::quantified(kind, var, predicate, false));
            }

            WorkItem::CombineFreeClause(n) => {
                let terms = results.split_off(results.len() - n);
                results.push(Term::free_clause(terms));
            }
        }
    }

    pop(&mut results)
}

fn pop(results: &mut Vec<Term>) -> Term {
    results.pop().expect("every combine step follows its operands")
}

/// Whether negation appears only on literal-level leaves
pub fn is_nnf(term: &Term) -> bool {
    match term {
        Term::Operator(op) => {
            !op.is_negated()
                && matches!(op.connective(), Connective::And | Connective::Or)
                && is_nnf(op.left())
                && is_nnf(op.right())
        }
        Term::Quantifier(q) => !q.is_negated() && is_nnf(q.predicate()),
        Term::FreeClause(c) => !c.is_negated() && c.terms().iter().all(is_nnf),
        _ => true,
    }
}
