//! A formula together with its clause form

use crate::error::FormationError;
use crate::logic::{FreeClause, HornKB, Term, KB};
use crate::normalize::NormalizeContext;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
enum Components {
    Formula(Term),
    Clauses(KB),
}

/// Either a formula still to be normalized, or the knowledge base it
/// normalized to
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    components: Components,
}

impl Predicate {
    pub fn new(components: FreeClause) -> Self {
        Predicate {
            components: Components::Formula(Term::FreeClause(components)),
        }
    }

    /// Wrap any formula
    pub fn from_term(term: Term) -> Self {
        Predicate {
            components: Components::Formula(term),
        }
    }

    /// Run the normalization pipeline once with fresh counters.
    ///
    /// A predicate that already holds clauses is returned unchanged.
    pub fn propositionalize(&self) -> Result<Predicate, FormationError> {
        match &self.components {
            Components::Formula(term) => {
                let kb = NormalizeContext::for_term(term).propositionalize(term)?;
                Ok(Predicate {
                    components: Components::Clauses(kb),
                })
            }
            Components::Clauses(_) => Ok(self.clone()),
        }
    }

    pub fn formula(&self) -> Option<&Term> {
        match &self.components {
            Components::Formula(term) => Some(term),
            Components::Clauses(_) => None,
        }
    }

    pub fn kb(&self) -> Option<&KB> {
        match &self.components {
            Components::Clauses(kb) => Some(kb),
            Components::Formula(_) => None,
        }
    }

    /// The Horn knowledge base, normalizing first if needed
    pub fn horn_kb(&self) -> Result<HornKB, FormationError> {
        match &self.components {
            Components::Clauses(kb) => HornKB::try_from(kb.clone()),
            Components::Formula(_) => self.propositionalize()?.horn_kb(),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.components {
            Components::Formula(term) => write!(f, "{}", term),
            Components::Clauses(kb) => write!(f, "{}", kb),
        }
    }
}
