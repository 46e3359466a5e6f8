//! Error types for term formation, search and parsing

use std::time::Duration;
use thiserror::Error;

/// Fatal errors raised while building or transforming terms.
///
/// These abort the enclosing `propositionalize` or `solve` call and are
/// never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormationError {
    #[error("wrong number of arguments for `{name}`: expected {expected}, got {got}")]
    Arity {
        name: String,
        expected: String,
        got: usize,
    },

    #[error("quantifier binder must be a variable, got `{0}`")]
    BinderNotVariable(String),

    #[error("quantifier variable `{var}` does not occur free in `{predicate}`")]
    UnboundQuantifier { var: String, predicate: String },

    #[error("not a Horn clause (expected exactly one positive literal, found {positives}): {clause}")]
    NotHorn { clause: String, positives: usize },

    #[error("empty free clause nested inside a formula")]
    EmptyFreeClause,

    #[error("formula is not in conjunctive normal form: {0}")]
    NotCnf(String),

    #[error("cycle detected while proving goals: {}", path.join(" -> "))]
    Cycle { path: Vec<String> },
}

/// Errors raised while searching for a proof.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error(transparent)]
    Formation(#[from] FormationError),

    #[error("proof depth limit of {0} exceeded")]
    DepthLimit(usize),

    #[error("resolution step limit of {0} exceeded")]
    StepLimit(usize),

    #[error("search timed out after {0:?}")]
    Timeout(Duration),

    #[error("search cancelled")]
    Cancelled,
}

/// Errors raised by the program parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("cannot read {path}: {message}")]
    Io { path: String, message: String },

    #[error(transparent)]
    Formation(#[from] FormationError),
}

/// Errors raised while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}
