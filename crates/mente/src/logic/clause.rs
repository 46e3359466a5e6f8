//! Clauses, knowledge bases and their Horn restrictions

use super::term::Term;
use crate::error::FormationError;
use indexmap::IndexSet;
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A disjunction of literal-level terms.
///
/// Membership is a set; iteration follows insertion order so that rule
/// bodies keep the order they were written in.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Clause {
    terms: IndexSet<Term>,
    negate: bool,
}

impl Clause {
    pub fn new<I: IntoIterator<Item = Term>>(terms: I) -> Result<Self, FormationError> {
        let mut clause = Clause::default();
        for term in terms {
            clause.push(term)?;
        }
        Ok(clause)
    }

    pub fn unit(term: Term) -> Result<Self, FormationError> {
        Clause::new([term])
    }

    fn push(&mut self, term: Term) -> Result<(), FormationError> {
        if !term.is_atomic() {
            return Err(FormationError::NotCnf(term.to_string()));
        }
        self.terms.insert(term);
        Ok(())
    }

    pub(crate) fn with_negation(mut self, negate: bool) -> Self {
        self.negate = negate;
        self
    }

    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.terms.iter()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn is_negated(&self) -> bool {
        self.negate
    }

    pub fn negated(&self) -> Clause {
        Clause {
            terms: self.terms.clone(),
            negate: !self.negate,
        }
    }

    /// Whether `item` occurs in any member
    pub fn contains(&self, item: &Term) -> bool {
        self.terms.iter().any(|term| term.contains(item))
    }

    /// The clause without `item` as a member
    pub fn without(&self, item: &Term) -> Clause {
        let mut terms = self.terms.clone();
        terms.shift_remove(item);
        Clause {
            terms,
            negate: self.negate,
        }
    }

    /// Members of both clauses, `self` first
    pub fn union(&self, other: &Clause) -> Clause {
        let mut terms = self.terms.clone();
        terms.extend(other.terms.iter().cloned());
        Clause {
            terms,
            negate: self.negate,
        }
    }

    /// Number of members with a clear negation flag
    pub fn positives(&self) -> usize {
        self.terms.iter().filter(|term| !term.is_negated()).count()
    }
}

impl PartialEq for Clause {
    fn eq(&self, other: &Self) -> bool {
        self.negate == other.negate && self.terms == other.terms
    }
}

impl Eq for Clause {}

impl Hash for Clause {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Order-independent: members combine commutatively.
        let mut acc: u64 = 0;
        for term in &self.terms {
            let mut hasher = DefaultHasher::new();
            term.hash(&mut hasher);
            acc = acc.wrapping_add(hasher.finish());
        }
        acc.hash(state);
        self.terms.len().hash(state);
        self.negate.hash(state);
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negate {
            write!(f, "¬")?;
        }
        write!(f, "(")?;
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " ∨ ")?;
            }
            write!(f, "{}", term)?;
        }
        write!(f, ")")
    }
}

/// A conjunction of clauses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KB {
    clauses: IndexSet<Clause>,
}

impl KB {
    pub fn new() -> Self {
        KB::default()
    }

    /// Add a clause; returns false if it was already present
    pub fn insert(&mut self, clause: Clause) -> bool {
        self.clauses.insert(clause)
    }

    pub fn remove(&mut self, clause: &Clause) -> bool {
        self.clauses.shift_remove(clause)
    }

    pub fn contains(&self, clause: &Clause) -> bool {
        self.clauses.contains(clause)
    }

    /// All clauses of both knowledge bases, `self` first
    pub fn union(mut self, other: KB) -> KB {
        self.clauses.extend(other.clauses);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl FromIterator<Clause> for KB {
    fn from_iter<I: IntoIterator<Item = Clause>>(iter: I) -> Self {
        KB {
            clauses: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for KB {
    type Item = Clause;
    type IntoIter = indexmap::set::IntoIter<Clause>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.into_iter()
    }
}

impl fmt::Display for KB {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, " ∧ ")?;
            }
            write!(f, "{}", clause)?;
        }
        write!(f, ")")
    }
}

/// A clause with exactly one positive member, the head.
///
/// Equality and hashing go through the underlying clause, so the order
/// of the body does not matter.
#[derive(Debug, Clone, Serialize)]
pub struct HornClause {
    clause: Clause,
    head: Term,
    body: Vec<Term>,
}

impl HornClause {
    /// A body-less clause
    pub fn fact(head: Term) -> Result<Self, FormationError> {
        HornClause::try_from(Clause::unit(head)?)
    }

    /// `head :- body`, with body members given positively
    pub fn rule(head: Term, body: Vec<Term>) -> Result<Self, FormationError> {
        let members = std::iter::once(head).chain(body.iter().map(|goal| goal.positive().negated()));
        HornClause::try_from(Clause::new(members)?)
    }

    pub fn head(&self) -> &Term {
        &self.head
    }

    /// Body members as stored in the clause (negated)
    pub fn body(&self) -> &[Term] {
        &self.body
    }

    pub fn clause(&self) -> &Clause {
        &self.clause
    }

    pub fn is_fact(&self) -> bool {
        self.body.is_empty()
    }
}

impl PartialEq for HornClause {
    fn eq(&self, other: &Self) -> bool {
        self.clause == other.clause
    }
}

impl Eq for HornClause {}

impl Hash for HornClause {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.clause.hash(state);
    }
}

impl TryFrom<Clause> for HornClause {
    type Error = FormationError;

    fn try_from(clause: Clause) -> Result<Self, Self::Error> {
        let positives = clause.positives();
        if positives != 1 {
            return Err(FormationError::NotHorn {
                clause: clause.to_string(),
                positives,
            });
        }
        let mut head = None;
        let mut body = Vec::new();
        for term in clause.terms() {
            if term.is_negated() {
                body.push(term.clone());
            } else {
                head = Some(term.clone());
            }
        }
        let head = head.ok_or_else(|| FormationError::NotHorn {
            clause: clause.to_string(),
            positives,
        })?;
        Ok(HornClause { clause, head, body })
    }
}

impl From<HornClause> for Clause {
    fn from(horn: HornClause) -> Self {
        horn.clause
    }
}

impl fmt::Display for HornClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.clause)
    }
}

/// A knowledge base restricted to Horn clauses, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HornKB {
    clauses: IndexSet<HornClause>,
}

impl HornKB {
    pub fn new() -> Self {
        HornKB::default()
    }

    /// Validate and add a clause
    pub fn insert(&mut self, clause: Clause) -> Result<bool, FormationError> {
        let horn = HornClause::try_from(clause)?;
        Ok(self.clauses.insert(horn))
    }

    pub fn insert_horn(&mut self, clause: HornClause) -> bool {
        self.clauses.insert(clause)
    }

    pub fn contains(&self, clause: &HornClause) -> bool {
        self.clauses.contains(clause)
    }

    pub fn get(&self, index: usize) -> Option<&HornClause> {
        self.clauses.get_index(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HornClause> {
        self.clauses.iter()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn to_kb(&self) -> KB {
        self.clauses.iter().map(|horn| horn.clause.clone()).collect()
    }
}

impl TryFrom<KB> for HornKB {
    type Error = FormationError;

    fn try_from(kb: KB) -> Result<Self, Self::Error> {
        let mut horn = HornKB::new();
        for clause in kb {
            horn.insert(clause)?;
        }
        Ok(horn)
    }
}

impl FromIterator<HornClause> for HornKB {
    fn from_iter<I: IntoIterator<Item = HornClause>>(iter: I) -> Self {
        HornKB {
            clauses: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for HornKB {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_kb())
    }
}
