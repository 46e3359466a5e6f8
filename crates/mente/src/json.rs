//! JSON serialization types for knowledge bases and answers

use crate::error::FormationError;
use crate::logic::{Clause, Connective, HornKB, QuantifierKind, Term, KB};
use crate::solver::Answer;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

fn is_false(value: &bool) -> bool {
    !*value
}

/// JSON representation of a term or formula
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TermJson {
    Literal {
        name: String,
        #[serde(default, skip_serializing_if = "is_false")]
        negated: bool,
    },
    Var {
        name: String,
        #[serde(default, skip_serializing_if = "is_false")]
        negated: bool,
    },
    Relation {
        name: String,
        args: Vec<TermJson>,
        #[serde(default, skip_serializing_if = "is_false")]
        negated: bool,
    },
    Function {
        name: String,
        arg: Box<TermJson>,
        #[serde(default, skip_serializing_if = "is_false")]
        negated: bool,
    },
    Quantifier {
        kind: QuantifierKind,
        var: String,
        predicate: Box<TermJson>,
        #[serde(default, skip_serializing_if = "is_false")]
        negated: bool,
    },
    Operator {
        connective: Connective,
        left: Box<TermJson>,
        right: Box<TermJson>,
        #[serde(default, skip_serializing_if = "is_false")]
        negated: bool,
    },
    FreeClause {
        terms: Vec<TermJson>,
        #[serde(default, skip_serializing_if = "is_false")]
        negated: bool,
    },
}

impl TermJson {
    pub fn from_term(term: &Term) -> Self {
        let negated = term.is_negated();
        match term {
            Term::Literal(l) => TermJson::Literal {
                name: l.name().to_string(),
                negated,
            },
            Term::Var(v) => TermJson::Var {
                name: v.name().to_string(),
                negated,
            },
            Term::Relation(r) => TermJson::Relation {
                name: r.name().to_string(),
                args: r.args().iter().map(TermJson::from_term).collect(),
                negated,
            },
            Term::Function(f) => TermJson::Function {
                name: f.name().to_string(),
                arg: Box::new(TermJson::from_term(f.arg())),
                negated,
            },
            Term::Quantifier(q) => TermJson::Quantifier {
                kind: q.kind(),
                var: q.var().name().to_string(),
                predicate: Box::new(TermJson::from_term(q.predicate())),
                negated,
            },
            Term::Operator(o) => TermJson::Operator {
                connective: o.connective(),
                left: Box::new(TermJson::from_term(o.left())),
                right: Box::new(TermJson::from_term(o.right())),
                negated,
            },
            Term::FreeClause(c) => TermJson::FreeClause {
                terms: c.terms().iter().map(TermJson::from_term).collect(),
                negated,
            },
        }
    }

    /// Rebuild the term, re-checking arities and binders
    pub fn to_term(&self) -> Result<Term, FormationError> {
        let term = match self {
            TermJson::Literal { name, negated } => Term::literal(name).with_negation(*negated),
            TermJson::Var { name, negated } => Term::var(name).with_negation(*negated),
            TermJson::Relation { name, args, negated } => {
                let args = args.iter().map(TermJson::to_term).collect::<Result<_, _>>()?;
                Term::relation(name, args)?.with_negation(*negated)
            }
            TermJson::Function { name, arg, negated } => {
                Term::function(name, arg.to_term()?).with_negation(*negated)
            }
            TermJson::Quantifier {
                kind,
                var,
                predicate,
                negated,
            } => Term::quantifier(*kind, Term::var(var), predicate.to_term()?)?.with_negation(*negated),
            TermJson::Operator {
                connective,
                left,
                right,
                negated,
            } => Term::operator_with(*connective, left.to_term()?, right.to_term()?, *negated),
            TermJson::FreeClause { terms, negated } => {
                let terms = terms.iter().map(TermJson::to_term).collect::<Result<_, _>>()?;
                Term::free_clause_with(terms, *negated)
            }
        };
        Ok(term)
    }
}

/// JSON representation of a clause
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClauseJson {
    pub literals: Vec<TermJson>,
    /// Rendered form, e.g. `(¬q ∨ p)`
    pub text: String,
}

impl ClauseJson {
    pub fn from_clause(clause: &Clause) -> Self {
        ClauseJson {
            literals: clause.terms().map(TermJson::from_term).collect(),
            text: clause.to_string(),
        }
    }
}

/// JSON representation of a knowledge base
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KbJson {
    pub clauses: Vec<ClauseJson>,
}

impl From<&KB> for KbJson {
    fn from(kb: &KB) -> Self {
        KbJson {
            clauses: kb.iter().map(ClauseJson::from_clause).collect(),
        }
    }
}

impl From<&HornKB> for KbJson {
    fn from(kb: &HornKB) -> Self {
        KbJson {
            clauses: kb.iter().map(|horn| ClauseJson::from_clause(horn.clause())).collect(),
        }
    }
}

/// JSON representation of one answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerJson {
    pub term: TermJson,
    pub text: String,
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub bindings: IndexMap<String, TermJson>,
}

impl From<&Answer> for AnswerJson {
    fn from(answer: &Answer) -> Self {
        AnswerJson {
            term: TermJson::from_term(&answer.term),
            text: answer.term.to_string(),
            bindings: answer
                .bindings
                .iter()
                .map(|(var, term)| (var.name().to_string(), TermJson::from_term(term)))
                .collect(),
        }
    }
}

/// JSON representation of a query result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResultJson {
    pub query: String,
    pub provable: bool,
    pub answers: Vec<AnswerJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kb: Option<KbJson>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{Substitution, Var};

    #[test]
    fn test_term_json_shape() {
        let term = Term::relation("p", vec![Term::var("X"), Term::literal("a").negated()]).unwrap();
        let value = serde_json::to_value(TermJson::from_term(&term)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "type": "Relation",
                "name": "p",
                "args": [
                    { "type": "Var", "name": "X" },
                    { "type": "Literal", "name": "a", "negated": true }
                ]
            })
        );
    }

    #[test]
    fn test_formula_survives_json() {
        let formula = Term::forall(
            Term::var("X"),
            Term::implies(
                Term::relation("man", vec![Term::var("X")]).unwrap(),
                Term::relation("mortal", vec![Term::var("X")]).unwrap(),
            ),
        )
        .unwrap()
        .negated();
        let text = serde_json::to_string(&TermJson::from_term(&formula)).unwrap();
        let parsed: TermJson = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.to_term().unwrap(), formula);
    }

    #[test]
    fn test_invalid_quantifier_rejected() {
        let json = TermJson::Quantifier {
            kind: QuantifierKind::Exists,
            var: "X".into(),
            predicate: Box::new(TermJson::Literal {
                name: "p".into(),
                negated: false,
            }),
            negated: false,
        };
        assert!(matches!(json.to_term(), Err(FormationError::UnboundQuantifier { .. })));
    }

    #[test]
    fn test_answer_json() {
        let answer = Answer {
            term: Term::relation("p", vec![Term::literal("a")]).unwrap(),
            bindings: Substitution::new().bind(Var::new("X"), Term::literal("a")),
        };
        let json = AnswerJson::from(&answer);
        assert_eq!(json.text, "p(a)");
        assert_eq!(json.bindings.len(), 1);
        assert_eq!(
            json.bindings.get("X"),
            Some(&TermJson::Literal {
                name: "a".into(),
                negated: false
            })
        );
    }
}
