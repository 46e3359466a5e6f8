//! Standardizing quantified variables apart

use super::NormalizeContext;
use crate::logic::{Term, Var};
use indexmap::IndexSet;

/// Give quantifiers that reuse a name on both sides of a connective
/// fresh names, independently on each side. A quantifier that rebinds a
/// name already bound by an enclosing quantifier is renamed as well.
///
/// Members of a free clause are treated as one conjunction chain: a
/// member's binders are renamed when an earlier member already binds
/// the same name.
pub fn standardize_apart(term: &Term, ctx: &mut NormalizeContext) -> Term {
    standardize_under(term, &mut Vec::new(), ctx)
}

fn standardize_under(term: &Term, scope: &mut Vec<Var>, ctx: &mut NormalizeContext) -> Term {
    match term {
        Term::Operator(op) => {
            let mut left = op.left().clone();
            let mut right = op.right().clone();
            let shared = shared_binders(&left.bound_variables(), &right.bound_variables());
            for var in &shared {
                left = left.rename_bound(var, &ctx.fresh_var());
                right = right.rename_bound(var, &ctx.fresh_var());
            }
            let left = standardize_under(&left, scope, ctx);
            let right = standardize_under(&right, scope, ctx);
            Term::operator_with(op.connective(), left, right, op.is_negated())
        }

        Term::FreeClause(clause) => {
            let mut seen: IndexSet<Var> = IndexSet::new();
            let mut terms = Vec::with_capacity(clause.terms().len());
            for member in clause.terms() {
                let mut member = member.clone();
                let bound = member.bound_variables();
                for var in shared_binders(&bound, &seen) {
                    member = member.rename_bound(&var, &ctx.fresh_var());
                }
                seen.extend(member.bound_variables());
                terms.push(standardize_under(&member, scope, ctx));
            }
            Term::free_clause_with(terms, clause.is_negated())
        }

        Term::Quantifier(q) if scope.contains(q.var()) => {
            let renamed = term.rename_bound(q.var(), &ctx.fresh_var());
            standardize_under(&renamed, scope, ctx)
        }

        Term::Quantifier(q) => {
            scope.push(q.var().clone());
            let out = term.map_children(|child| standardize_under(child, scope, ctx));
            scope.pop();
            out
        }

        _ => term.clone(),
    }
}

fn shared_binders(left: &IndexSet<Var>, right: &IndexSet<Var>) -> Vec<Var> {
    left.iter().filter(|var| right.contains(*var)).cloned().collect()
}
