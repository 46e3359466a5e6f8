//! Term model
//!
//! Terms and formulas, clauses, knowledge bases and substitutions.

pub mod clause;
pub mod substitution;
pub mod term;

pub use clause::{Clause, HornClause, HornKB, KB};
pub use substitution::Substitution;
pub use term::{
    Connective, FreeClause, Function, FunctionInstance, Literal, Operator, Quantifier,
    QuantifierKind, Relation, RelationInstance, Term, Var,
};
