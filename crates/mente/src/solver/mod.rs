//! Backward-chaining proof search over Horn knowledge bases
//!
//! The solver performs SLD resolution: the selected goal is unified with
//! the head of a renamed clause and replaced by that clause's body.
//! Search is depth-first and yields answers lazily.

mod forward;
mod search;

pub use forward::{forward_chaining_solve, unit_resolution};
pub use search::Solutions;

use crate::config::SolverConfig;
use crate::error::SolveError;
use crate::logic::{HornKB, Substitution, Term};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Shared flag that stops a running search at its next step
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// One proof of a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    /// The query with the answer substitution applied
    pub term: Term,
    /// Bindings of the query's own variables
    pub bindings: Substitution,
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bindings.is_empty() {
            write!(f, "{}", self.term)
        } else {
            write!(f, "{} {}", self.term, self.bindings)
        }
    }
}

pub struct Solver<'kb> {
    kb: &'kb HornKB,
    config: SolverConfig,
    cancel: CancelToken,
}

impl<'kb> Solver<'kb> {
    pub fn new(kb: &'kb HornKB) -> Self {
        Solver::with_config(kb, SolverConfig::default())
    }

    pub fn with_config(kb: &'kb HornKB, config: SolverConfig) -> Self {
        Solver {
            kb,
            config,
            cancel: CancelToken::new(),
        }
    }

    /// Use an externally owned cancellation flag
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Raw answer substitutions, including bindings of renamed clause variables
    pub fn solutions(&self, query: &Term) -> Solutions<'kb> {
        debug!(query = %query, clauses = self.kb.len(), "backward chaining");
        Solutions::new(self.kb, query, self.config.clone(), self.cancel.clone())
    }

    /// Answers restricted to the query's variables, in search order
    pub fn answers(&self, query: &Term) -> impl Iterator<Item = Result<Answer, SolveError>> + 'kb {
        let query = query.clone();
        let vars = query.variables();
        self.solutions(&query).map(move |result| {
            result.map(|subst| Answer {
                term: subst.apply(&query),
                bindings: subst.restrict(&vars),
            })
        })
    }

    /// The first proof of `query`, if any
    pub fn solve(&self, query: &Term) -> Result<Option<Term>, SolveError> {
        match self.answers(query).next() {
            Some(answer) => Ok(Some(answer?.term)),
            None => Ok(None),
        }
    }

    /// Collect up to `limit` answers (all of them when `None`)
    pub fn prove_all(&self, query: &Term, limit: Option<usize>) -> Result<Vec<Answer>, SolveError> {
        let answers = self.answers(query);
        match limit {
            Some(n) => answers.take(n).collect(),
            None => answers.collect(),
        }
    }
}

/// Prove `query` from `kb` with the default configuration.
///
/// Returns the query instantiated by the first answer substitution, or
/// `None` when the search space is exhausted without a proof.
pub fn solve(kb: &HornKB, query: &Term) -> Result<Option<Term>, SolveError> {
    Solver::new(kb).solve(query)
}
