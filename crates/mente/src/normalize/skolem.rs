//! Skolemization and removal of universal quantifiers

use super::nnf::canonicalize;
use super::NormalizeContext;
use crate::logic::{QuantifierKind, Term, Var};

/// Eliminate every quantifier from a formula in negation normal form.
///
/// `∃x.P` becomes `P` with `x` replaced by a fresh Skolem term over the
/// variable of the nearest enclosing `∀`, or by a Skolem constant when
/// there is none. `∀x.P` becomes `P`, leaving `x` implicitly universal.
pub fn skolemize(term: &Term, ctx: &mut NormalizeContext) -> Term {
    skolemize_under(term, None, ctx)
}

fn skolemize_under(term: &Term, enclosing: Option<&Var>, ctx: &mut NormalizeContext) -> Term {
    match term {
        Term::Quantifier(q) if q.is_negated() => {
            skolemize_under(&canonicalize(term), enclosing, ctx)
        }
        Term::Quantifier(q) => match q.kind() {
            QuantifierKind::Exists => {
                let skolem = ctx.skolem_term(enclosing);
                let predicate = q.predicate().substitute_free(q.var(), &skolem);
                skolemize_under(&predicate, enclosing, ctx)
            }
            QuantifierKind::ForAll => skolemize_under(q.predicate(), Some(q.var()), ctx),
        },
        Term::Operator(_) | Term::FreeClause(_) => {
            term.map_children(|child| skolemize_under(child, enclosing, ctx))
        }
        _ => term.clone(),
    }
}
