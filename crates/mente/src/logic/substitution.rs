//! Variable substitutions

use super::term::{Term, Var};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// A mapping from variables to terms.
///
/// Bindings may refer to other bound variables; [`Substitution::apply`]
/// follows such chains until no bound variable remains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Substitution {
    map: IndexMap<Var, Term>,
}

impl Substitution {
    pub fn new() -> Self {
        Substitution::default()
    }

    /// This substitution extended with `var -> term`
    pub fn bind(mut self, var: Var, term: Term) -> Self {
        self.insert(var, term);
        self
    }

    pub fn insert(&mut self, var: Var, term: Term) {
        // Polarity belongs to occurrences, not to the binding.
        self.map.insert(Var::new(var.name()), term);
    }

    pub fn get(&self, var: &Var) -> Option<&Term> {
        self.map.get(var)
    }

    pub fn contains(&self, var: &Var) -> bool {
        self.map.contains_key(var)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Var, &Term)> {
        self.map.iter()
    }

    /// Apply the substitution to a term, resolving binding chains
    pub fn apply(&self, term: &Term) -> Term {
        match term {
            Term::Var(v) => match self.map.get(v) {
                Some(bound) => {
                    let resolved = self.apply(bound);
                    if v.is_negated() {
                        resolved.negated()
                    } else {
                        resolved
                    }
                }
                None => term.clone(),
            },
            Term::Literal(_) => term.clone(),
            _ if self.is_empty() => term.clone(),
            _ => term.map_children(|child| self.apply(child)),
        }
    }

    pub fn apply_all(&self, terms: &[Term]) -> Vec<Term> {
        terms.iter().map(|term| self.apply(term)).collect()
    }

    /// Fully resolved bindings for the given variables only
    pub fn restrict<'a, I>(&self, vars: I) -> Substitution
    where
        I: IntoIterator<Item = &'a Var>,
    {
        let mut result = Substitution::new();
        for var in vars {
            if self.contains(var) {
                result.insert(var.clone(), self.apply(&Term::Var(Var::new(var.name()))));
            }
        }
        result
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (var, term)) in self.map.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} ↦ {}", var, term)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_substitution() {
        let subst = Substitution::new().bind(Var::new("X"), Term::literal("a"));
        assert_eq!(subst.apply(&Term::var("X")), Term::literal("a"));
        assert_eq!(subst.apply(&Term::var("Y")), Term::var("Y"));
    }

    #[test]
    fn test_chains_are_resolved() {
        let subst = Substitution::new()
            .bind(Var::new("X"), Term::var("Y"))
            .bind(Var::new("Y"), Term::function("f", Term::literal("a")));
        let p = Term::relation("p", vec![Term::var("X")]).unwrap();
        assert_eq!(subst.apply(&p).to_string(), "p(f(a))");
        assert_eq!(subst.restrict([&Var::new("X")]).to_string(), "{X ↦ f(a)}");
    }

    #[test]
    fn test_negated_occurrence() {
        let subst = Substitution::new().bind(Var::new("X"), Term::literal("a"));
        assert_eq!(subst.apply(&Term::var("X").negated()), Term::literal("a").negated());
    }
}
