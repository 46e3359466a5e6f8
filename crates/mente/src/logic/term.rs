//! Terms and formulas
//!
//! A single closed tree type covers both first-order terms (variables,
//! constants, function applications) and the formulas built over them
//! (relations, connectives, quantifiers). Every node carries its own
//! negation flag; negating a node never touches its children.

use crate::error::FormationError;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Not;

/// An atomic propositional name, also used for constants in argument position
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Literal {
    name: String,
    negate: bool,
}

/// A logical variable.
///
/// Identity is the name alone: the flag records the polarity of one
/// occurrence, not a different variable.
#[derive(Debug, Clone, Serialize)]
pub struct Var {
    name: String,
    negate: bool,
}

/// A relation applied to one or more arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RelationInstance {
    name: String,
    args: Vec<Term>,
    negate: bool,
}

/// A unary function application
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FunctionInstance {
    name: String,
    arg: Box<Term>,
    negate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantifierKind {
    Exists,
    ForAll,
}

impl QuantifierKind {
    pub fn dual(self) -> Self {
        match self {
            QuantifierKind::Exists => QuantifierKind::ForAll,
            QuantifierKind::ForAll => QuantifierKind::Exists,
        }
    }

    fn glyph(self) -> &'static str {
        match self {
            QuantifierKind::Exists => "∃",
            QuantifierKind::ForAll => "∀",
        }
    }
}

/// A quantified formula whose binder occurs free in its predicate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Quantifier {
    kind: QuantifierKind,
    var: Var,
    predicate: Box<Term>,
    negate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connective {
    And,
    Or,
    Implies,
    Iff,
}

impl Connective {
    fn glyph(self) -> &'static str {
        match self {
            Connective::And => "∧",
            Connective::Or => "∨",
            Connective::Implies => "⇒",
            Connective::Iff => "⇔",
        }
    }
}

/// A binary connective
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Operator {
    connective: Connective,
    left: Box<Term>,
    right: Box<Term>,
    negate: bool,
}

/// An ordered conjunction of independently stated formulas
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FreeClause {
    terms: Vec<Term>,
    negate: bool,
}

/// A term or formula
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Term {
    Literal(Literal),
    Var(Var),
    Relation(RelationInstance),
    Function(FunctionInstance),
    Quantifier(Quantifier),
    Operator(Operator),
    FreeClause(FreeClause),
}

/// A relation symbol with a fixed arity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relation {
    pub name: String,
    pub arity: usize,
}

impl Relation {
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Relation {
            name: name.into(),
            arity,
        }
    }

    /// Apply the relation, checking the argument count.
    ///
    /// A zero-arity relation instantiates to the `Literal` of its name.
    pub fn instance(&self, args: Vec<Term>) -> Result<Term, FormationError> {
        if args.len() != self.arity {
            return Err(FormationError::Arity {
                name: self.name.clone(),
                expected: self.arity.to_string(),
                got: args.len(),
            });
        }
        if args.is_empty() {
            return Ok(Term::literal(self.name.clone()));
        }
        Term::relation(self.name.clone(), args)
    }
}

/// A unary function symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Function {
    pub name: String,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        Function { name: name.into() }
    }

    pub fn apply(&self, mut args: Vec<Term>) -> Result<Term, FormationError> {
        if args.len() != 1 {
            return Err(FormationError::Arity {
                name: self.name.clone(),
                expected: "1".to_string(),
                got: args.len(),
            });
        }
        Ok(Term::function(self.name.clone(), args.remove(0)))
    }
}

impl Literal {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Var {
    pub fn new(name: impl Into<String>) -> Self {
        Var {
            name: name.into(),
            negate: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_negated(&self) -> bool {
        self.negate
    }
}

impl PartialEq for Var {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Var {}

impl Hash for Var {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl RelationInstance {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[Term] {
        &self.args
    }
}

impl FunctionInstance {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arg(&self) -> &Term {
        &self.arg
    }
}

impl Quantifier {
    pub fn kind(&self) -> QuantifierKind {
        self.kind
    }

    pub fn var(&self) -> &Var {
        &self.var
    }

    pub fn predicate(&self) -> &Term {
        &self.predicate
    }

    pub fn is_negated(&self) -> bool {
        self.negate
    }
}

impl Operator {
    pub fn connective(&self) -> Connective {
        self.connective
    }

    pub fn left(&self) -> &Term {
        &self.left
    }

    pub fn right(&self) -> &Term {
        &self.right
    }

    pub fn is_negated(&self) -> bool {
        self.negate
    }

    pub fn into_operands(self) -> (Term, Term) {
        (*self.left, *self.right)
    }
}

impl FreeClause {
    pub fn new(terms: Vec<Term>) -> Self {
        FreeClause {
            terms,
            negate: false,
        }
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn is_negated(&self) -> bool {
        self.negate
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl Term {
    pub fn literal(name: impl Into<String>) -> Term {
        Term::Literal(Literal {
            name: name.into(),
            negate: false,
        })
    }

    pub fn var(name: impl Into<String>) -> Term {
        Term::Var(Var::new(name))
    }

    /// A relation instance; a zero-argument relation is a `Literal` instead
    pub fn relation(name: impl Into<String>, args: Vec<Term>) -> Result<Term, FormationError> {
        let name = name.into();
        if args.is_empty() {
            return Err(FormationError::Arity {
                name,
                expected: "at least 1".to_string(),
                got: 0,
            });
        }
        Ok(Term::Relation(RelationInstance {
            name,
            args,
            negate: false,
        }))
    }

    pub fn function(name: impl Into<String>, arg: Term) -> Term {
        Term::Function(FunctionInstance {
            name: name.into(),
            arg: Box::new(arg),
            negate: false,
        })
    }

    pub fn exists(var: Term, predicate: Term) -> Result<Term, FormationError> {
        Term::quantifier(QuantifierKind::Exists, var, predicate)
    }

    pub fn forall(var: Term, predicate: Term) -> Result<Term, FormationError> {
        Term::quantifier(QuantifierKind::ForAll, var, predicate)
    }

    pub fn quantifier(
        kind: QuantifierKind,
        var: Term,
        predicate: Term,
    ) -> Result<Term, FormationError> {
        let var = match var {
            Term::Var(v) => Var::new(v.name),
            other => return Err(FormationError::BinderNotVariable(other.to_string())),
        };
        if !predicate.occurs_free(&var) {
            return Err(FormationError::UnboundQuantifier {
                var: var.name,
                predicate: predicate.to_string(),
            });
        }
        Ok(Term::quantified(kind, var, predicate, false))
    }

    /// Rebuild a quantifier whose binder is known to occur free in `predicate`
    pub(crate) fn quantified(kind: QuantifierKind, var: Var, predicate: Term, negate: bool) -> Term {
        Term::Quantifier(Quantifier {
            kind,
            var,
            predicate: Box::new(predicate),
            negate,
        })
    }

    pub fn operator(connective: Connective, left: Term, right: Term) -> Term {
        Term::operator_with(connective, left, right, false)
    }

    pub(crate) fn operator_with(connective: Connective, left: Term, right: Term, negate: bool) -> Term {
        Term::Operator(Operator {
            connective,
            left: Box::new(left),
            right: Box::new(right),
            negate,
        })
    }

    pub fn and(left: Term, right: Term) -> Term {
        Term::operator(Connective::And, left, right)
    }

    pub fn or(left: Term, right: Term) -> Term {
        Term::operator(Connective::Or, left, right)
    }

    pub fn implies(left: Term, right: Term) -> Term {
        Term::operator(Connective::Implies, left, right)
    }

    pub fn iff(left: Term, right: Term) -> Term {
        Term::operator(Connective::Iff, left, right)
    }

    pub fn free_clause(terms: Vec<Term>) -> Term {
        Term::FreeClause(FreeClause::new(terms))
    }

    pub(crate) fn free_clause_with(terms: Vec<Term>, negate: bool) -> Term {
        Term::FreeClause(FreeClause { terms, negate })
    }

    pub(crate) fn relation_unchecked(name: String, args: Vec<Term>, negate: bool) -> Term {
        Term::Relation(RelationInstance { name, args, negate })
    }

    pub fn is_negated(&self) -> bool {
        match self {
            Term::Literal(l) => l.negate,
            Term::Var(v) => v.negate,
            Term::Relation(r) => r.negate,
            Term::Function(f) => f.negate,
            Term::Quantifier(q) => q.negate,
            Term::Operator(o) => o.negate,
            Term::FreeClause(c) => c.negate,
        }
    }

    /// The same node with the given negation flag
    pub fn with_negation(mut self, negate: bool) -> Term {
        match &mut self {
            Term::Literal(l) => l.negate = negate,
            Term::Var(v) => v.negate = negate,
            Term::Relation(r) => r.negate = negate,
            Term::Function(f) => f.negate = negate,
            Term::Quantifier(q) => q.negate = negate,
            Term::Operator(o) => o.negate = negate,
            Term::FreeClause(c) => c.negate = negate,
        }
        self
    }

    /// Logical negation: same children, flipped flag
    pub fn negated(&self) -> Term {
        let negate = !self.is_negated();
        self.clone().with_negation(negate)
    }

    pub fn positive(&self) -> Term {
        self.clone().with_negation(false)
    }

    /// Literal-level terms: the leaves a clause is built from
    pub fn is_atomic(&self) -> bool {
        matches!(
            self,
            Term::Literal(_) | Term::Var(_) | Term::Relation(_) | Term::Function(_)
        )
    }

    /// Symbol name of an atomic term
    pub fn name(&self) -> Option<&str> {
        match self {
            Term::Literal(l) => Some(&l.name),
            Term::Var(v) => Some(&v.name),
            Term::Relation(r) => Some(&r.name),
            Term::Function(f) => Some(&f.name),
            _ => None,
        }
    }

    pub fn as_var(&self) -> Option<&Var> {
        match self {
            Term::Var(v) => Some(v),
            _ => None,
        }
    }

    /// Immediate children: operands, arguments, or a quantifier's predicate
    pub fn children(&self) -> Vec<&Term> {
        match self {
            Term::Literal(_) | Term::Var(_) => vec![],
            Term::Relation(r) => r.args.iter().collect(),
            Term::Function(f) => vec![&f.arg],
            Term::Quantifier(q) => vec![&q.predicate],
            Term::Operator(o) => vec![&o.left, &o.right],
            Term::FreeClause(c) => c.terms.iter().collect(),
        }
    }

    /// `item in self`: equal to `self` or contained in one of its children
    pub fn contains(&self, item: &Term) -> bool {
        self == item || self.children().into_iter().any(|child| child.contains(item))
    }

    pub fn contains_var(&self, var: &Var) -> bool {
        match self {
            Term::Var(v) => v == var,
            _ => self.children().into_iter().any(|child| child.contains_var(var)),
        }
    }

    /// Whether `var` has an occurrence not captured by a binder inside `self`
    pub fn occurs_free(&self, var: &Var) -> bool {
        match self {
            Term::Var(v) => v == var,
            Term::Quantifier(q) if &q.var == var => false,
            _ => self.children().into_iter().any(|child| child.occurs_free(var)),
        }
    }

    /// Free variables in order of first occurrence
    pub fn variables(&self) -> IndexSet<Var> {
        let mut vars = IndexSet::new();
        self.collect_free_variables(&mut Vec::new(), &mut vars);
        vars
    }

    fn collect_free_variables<'a>(&'a self, bound: &mut Vec<&'a Var>, vars: &mut IndexSet<Var>) {
        match self {
            Term::Var(v) => {
                if !bound.contains(&v) {
                    vars.insert(Var::new(v.name.clone()));
                }
            }
            Term::Quantifier(q) => {
                bound.push(&q.var);
                q.predicate.collect_free_variables(bound, vars);
                bound.pop();
            }
            _ => {
                for child in self.children() {
                    child.collect_free_variables(bound, vars);
                }
            }
        }
    }

    /// Variables introduced by quantifiers anywhere inside `self`
    pub fn bound_variables(&self) -> IndexSet<Var> {
        let mut vars = IndexSet::new();
        self.collect_bound_variables(&mut vars);
        vars
    }

    fn collect_bound_variables(&self, vars: &mut IndexSet<Var>) {
        if let Term::Quantifier(q) = self {
            vars.insert(q.var.clone());
        }
        for child in self.children() {
            child.collect_bound_variables(vars);
        }
    }

    pub fn is_ground(&self) -> bool {
        match self {
            Term::Var(_) => false,
            _ => self.children().into_iter().all(|child| child.is_ground()),
        }
    }

    /// Replace the free occurrences of `var` with `replacement`.
    ///
    /// A negated occurrence receives the negation of the replacement.
    pub fn substitute_free(&self, var: &Var, replacement: &Term) -> Term {
        if !self.contains_var(var) {
            return self.clone();
        }
        match self {
            Term::Var(v) if v == var => {
                if v.negate {
                    replacement.negated()
                } else {
                    replacement.clone()
                }
            }
            Term::Literal(_) | Term::Var(_) => self.clone(),
            Term::Quantifier(q) if &q.var == var => self.clone(),
            _ => self.map_children(|child| child.substitute_free(var, replacement)),
        }
    }

    /// Rebuild this node with each child transformed; the binder and flag are kept
    pub fn map_children<F: FnMut(&Term) -> Term>(&self, mut f: F) -> Term {
        match self {
            Term::Literal(_) | Term::Var(_) => self.clone(),
            Term::Relation(r) => Term::Relation(RelationInstance {
                name: r.name.clone(),
                args: r.args.iter().map(&mut f).collect(),
                negate: r.negate,
            }),
            Term::Function(func) => Term::Function(FunctionInstance {
                name: func.name.clone(),
                arg: Box::new(f(&func.arg)),
                negate: func.negate,
            }),
            Term::Quantifier(q) => Term::Quantifier(Quantifier {
                kind: q.kind,
                var: q.var.clone(),
                predicate: Box::new(f(&q.predicate)),
                negate: q.negate,
            }),
            Term::Operator(o) => Term::Operator(Operator {
                connective: o.connective,
                left: Box::new(f(&o.left)),
                right: Box::new(f(&o.right)),
                negate: o.negate,
            }),
            Term::FreeClause(c) => Term::FreeClause(FreeClause {
                terms: c.terms.iter().map(&mut f).collect(),
                negate: c.negate,
            }),
        }
    }

    /// Fallible variant of [`Term::map_children`]
    pub fn try_map_children<E, F>(&self, mut f: F) -> Result<Term, E>
    where
        F: FnMut(&Term) -> Result<Term, E>,
    {
        Ok(match self {
            Term::Literal(_) | Term::Var(_) => self.clone(),
            Term::Relation(r) => Term::Relation(RelationInstance {
                name: r.name.clone(),
                args: r.args.iter().map(&mut f).collect::<Result<_, _>>()?,
                negate: r.negate,
            }),
            Term::Function(func) => Term::Function(FunctionInstance {
                name: func.name.clone(),
                arg: Box::new(f(&func.arg)?),
                negate: func.negate,
            }),
            Term::Quantifier(q) => Term::Quantifier(Quantifier {
                kind: q.kind,
                var: q.var.clone(),
                predicate: Box::new(f(&q.predicate)?),
                negate: q.negate,
            }),
            Term::Operator(o) => Term::Operator(Operator {
                connective: o.connective,
                left: Box::new(f(&o.left)?),
                right: Box::new(f(&o.right)?),
                negate: o.negate,
            }),
            Term::FreeClause(c) => Term::FreeClause(FreeClause {
                terms: c.terms.iter().map(&mut f).collect::<Result<_, _>>()?,
                negate: c.negate,
            }),
        })
    }

    /// Rename the binder `var` and the occurrences it captures, leaving
    /// free occurrences of the same name untouched
    pub fn rename_bound(&self, var: &Var, fresh: &Var) -> Term {
        match self {
            Term::Quantifier(q) if &q.var == var => {
                let replacement = Term::Var(fresh.clone());
                let predicate = q.predicate.substitute_free(var, &replacement);
                Term::quantified(q.kind, fresh.clone(), predicate.rename_bound(var, fresh), q.negate)
            }
            Term::Literal(_) | Term::Var(_) => self.clone(),
            _ => self.map_children(|child| child.rename_bound(var, fresh)),
        }
    }
}

impl Not for Term {
    type Output = Term;

    fn not(self) -> Term {
        let negate = !self.is_negated();
        self.with_negation(negate)
    }
}

impl Not for &Term {
    type Output = Term;

    fn not(self) -> Term {
        self.negated()
    }
}

impl From<Var> for Term {
    fn from(var: Var) -> Self {
        Term::Var(var)
    }
}

fn neg(f: &mut fmt::Formatter<'_>, negate: bool) -> fmt::Result {
    if negate {
        write!(f, "¬")?;
    }
    Ok(())
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        neg(f, self.negate)?;
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Literal(l) => {
                neg(f, l.negate)?;
                write!(f, "{}", l.name)
            }
            Term::Var(v) => write!(f, "{}", v),
            Term::Relation(r) => {
                neg(f, r.negate)?;
                write!(f, "{}(", r.name)?;
                for (i, arg) in r.args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Term::Function(func) => {
                neg(f, func.negate)?;
                write!(f, "{}({})", func.name, func.arg)
            }
            Term::Quantifier(q) => {
                write!(f, "(")?;
                neg(f, q.negate)?;
                write!(f, "{} {} {})", q.kind.glyph(), q.var.name, q.predicate)
            }
            Term::Operator(o) => {
                neg(f, o.negate)?;
                write!(f, "({} {} {})", o.left, o.connective.glyph(), o.right)
            }
            Term::FreeClause(c) => {
                neg(f, c.negate)?;
                write!(f, "[")?;
                for (i, term) in c.terms.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", term)?;
                }
                write!(f, "]")
            }
        }
    }
}
