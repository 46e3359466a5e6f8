//! Mente: clause normalization and backward-chaining proof search
//!
//! This library turns first-order formulas into conjunctive normal form,
//! restricts the result to Horn clauses, and proves queries against them
//! by SLD resolution with an occurs-checked unifier.

pub mod config;
pub mod error;
pub mod json;
pub mod logic;
pub mod normalize;
pub mod parser;
pub mod predicate;
pub mod solver;
pub mod unification;

// Re-export commonly used types from logic
pub use logic::{
    Clause, Connective, FreeClause, Function, HornClause, HornKB, Quantifier, QuantifierKind,
    Relation, Substitution, Term, Var, KB,
};

pub use config::{CyclePolicy, SolverConfig};
pub use error::{ConfigError, FormationError, ParseError, SolveError};
pub use normalize::{propositionalize, to_horn_kb, NormalizeContext};
pub use parser::{parse_program, parse_program_file, parse_query, Program};
pub use predicate::Predicate;
pub use solver::{forward_chaining_solve, solve, unit_resolution, Answer, CancelToken, Solver};
pub use unification::{mgu, occurs_check, unify};
