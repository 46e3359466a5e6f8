//! Depth-first SLD resolution over an explicit choice-point stack

use super::CancelToken;
use crate::config::{CyclePolicy, SolverConfig};
use crate::error::{FormationError, SolveError};
use crate::logic::{HornClause, HornKB, Substitution, Term, Var};
use crate::unification::unify;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Instant;
use tracing::{debug, trace};

/// Goals already being proved on the current branch, innermost first
struct Ancestors {
    goal: Term,
    depth: usize,
    parent: Option<Rc<Ancestors>>,
}

/// A goal waiting to be selected, with the branch that introduced it
struct Goal {
    term: Term,
    ancestors: Option<Rc<Ancestors>>,
}

/// Remaining conjunction of goals, shared between choice points
struct Conjunction {
    goal: Goal,
    rest: Option<Rc<Conjunction>>,
}

struct ChoicePoint {
    goals: Rc<Conjunction>,
    subst: Substitution,
    next_clause: usize,
}

/// Lazy sequence of answer substitutions for one query.
///
/// Clauses are tried in knowledge base order and body goals left to right.
/// The stream ends after the first error.
pub struct Solutions<'kb> {
    kb: &'kb HornKB,
    config: SolverConfig,
    cancel: CancelToken,
    started: Instant,
    stack: Vec<ChoicePoint>,
    pending: Option<(Rc<Conjunction>, Substitution)>,
    steps: usize,
    renamings: usize,
    done: bool,
}

impl<'kb> Solutions<'kb> {
    pub(super) fn new(kb: &'kb HornKB, query: &Term, config: SolverConfig, cancel: CancelToken) -> Self {
        let goals = Rc::new(Conjunction {
            goal: Goal {
                term: query.clone(),
                ancestors: None,
            },
            rest: None,
        });
        Solutions {
            kb,
            config,
            cancel,
            started: Instant::now(),
            stack: Vec::new(),
            pending: Some((goals, Substitution::new())),
            steps: 0,
            renamings: 0,
            done: false,
        }
    }

    /// Head unification attempts made so far
    pub fn steps(&self) -> usize {
        self.steps
    }

    fn check_limits(&self) -> Result<(), SolveError> {
        if self.cancel.is_cancelled() {
            return Err(SolveError::Cancelled);
        }
        if let Some(timeout) = self.config.timeout() {
            if self.started.elapsed() > timeout {
                return Err(SolveError::Timeout(timeout));
            }
        }
        Ok(())
    }

    fn search(&mut self) -> Result<Option<Substitution>, SolveError> {
        loop {
            self.check_limits()?;

            // A freshly reduced conjunction opens a new choice point
            if let Some((goals, subst)) = self.pending.take() {
                if let Some(point) = self.open(goals, subst)? {
                    self.stack.push(point);
                }
                continue;
            }

            let mut point = match self.stack.pop() {
                Some(point) => point,
                None => return Ok(None),
            };
            let Some((body, subst)) = self.resolve_next(&mut point)? else {
                continue;
            };

            let goals = point.goals.clone();
            self.stack.push(point);

            let parent = goals.goal.ancestors.clone();
            let depth = parent.as_ref().map_or(1, |a| a.depth + 1);
            let path = Rc::new(Ancestors {
                goal: goals.goal.term.clone(),
                depth,
                parent,
            });
            let rest = body.into_iter().rev().fold(goals.rest.clone(), |rest, term| {
                Some(Rc::new(Conjunction {
                    goal: Goal {
                        term,
                        ancestors: Some(path.clone()),
                    },
                    rest,
                }))
            });

            match rest {
                Some(next) => self.pending = Some((next, subst)),
                None => {
                    debug!(steps = self.steps, "solution found");
                    return Ok(Some(subst));
                }
            }
        }
    }

    /// Check the selected goal against its branch before searching it
    fn open(&self, goals: Rc<Conjunction>, subst: Substitution) -> Result<Option<ChoicePoint>, SolveError> {
        let goal = &goals.goal;
        let current = subst.apply(&goal.term);

        if let Some(ancestors) = &goal.ancestors {
            if let Some(limit) = self.config.max_depth {
                if ancestors.depth >= limit {
                    return Err(SolveError::DepthLimit(limit));
                }
            }
            if let Some(path) = find_cycle(ancestors, &current, &subst) {
                match self.config.cycle_policy {
                    CyclePolicy::Error => return Err(FormationError::Cycle { path }.into()),
                    CyclePolicy::Prune => {
                        trace!(goal = %current, "pruned repeated goal");
                        return Ok(None);
                    }
                }
            }
        }

        Ok(Some(ChoicePoint {
            goals,
            subst,
            next_clause: 0,
        }))
    }

    /// Resolve the selected goal against the next matching clause
    fn resolve_next(&mut self, point: &mut ChoicePoint) -> Result<Option<(Vec<Term>, Substitution)>, SolveError> {
        let kb = self.kb;
        let goal = point.subst.apply(&point.goals.goal.term);
        while let Some(clause) = kb.get(point.next_clause) {
            point.next_clause += 1;
            if !may_match(clause.head(), &goal) {
                continue;
            }

            self.steps += 1;
            if let Some(limit) = self.config.max_steps {
                if self.steps > limit {
                    return Err(SolveError::StepLimit(limit));
                }
            }

            let (head, body) = self.rename(clause);
            if let Some(subst) = unify(&head, &goal, Some(point.subst.clone())) {
                trace!(goal = %goal, clause = %clause, "resolved");
                return Ok(Some((body, subst)));
            }
        }
        Ok(None)
    }

    /// Fresh copy of a clause: every variable `X` becomes `X_n`
    fn rename(&mut self, clause: &HornClause) -> (Term, Vec<Term>) {
        let mut vars = clause.head().variables();
        for member in clause.body() {
            vars.extend(member.variables());
        }
        let body = clause.body().iter().map(Term::positive);
        if vars.is_empty() {
            return (clause.head().clone(), body.collect());
        }

        let suffix = self.renamings;
        self.renamings += 1;
        let fresh: HashMap<Var, Term> = vars
            .into_iter()
            .map(|var| {
                let name = format!("{}_{}", var.name(), suffix);
                (var, Term::var(name))
            })
            .collect();
        let head = rename_vars(clause.head(), &fresh);
        let body = body.map(|goal| rename_vars(&goal, &fresh)).collect();
        (head, body)
    }
}

impl Iterator for Solutions<'_> {
    type Item = Result<Substitution, SolveError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.search() {
            Ok(Some(subst)) => Some(Ok(subst)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Simultaneous variable renaming; negated occurrences stay negated
fn rename_vars(term: &Term, fresh: &HashMap<Var, Term>) -> Term {
    match term {
        Term::Var(v) => match fresh.get(v) {
            Some(renamed) => renamed.clone().with_negation(v.is_negated()),
            None => term.clone(),
        },
        _ => term.map_children(|child| rename_vars(child, fresh)),
    }
}

/// Cheap pre-filter on symbol, polarity and arity
fn may_match(head: &Term, goal: &Term) -> bool {
    if matches!(head, Term::Var(_)) || matches!(goal, Term::Var(_)) {
        return true;
    }
    if head.is_negated() != goal.is_negated() || head.name() != goal.name() {
        return false;
    }
    match (head, goal) {
        (Term::Relation(a), Term::Relation(b)) => a.args().len() == b.args().len(),
        (Term::Literal(_), Term::Literal(_)) | (Term::Function(_), Term::Function(_)) => true,
        _ => false,
    }
}

/// The goal path from the first repetition of `goal` down to `goal` itself
fn find_cycle(ancestors: &Rc<Ancestors>, goal: &Term, subst: &Substitution) -> Option<Vec<String>> {
    let mut path = vec![goal.to_string()];
    let mut node = Some(ancestors);
    while let Some(ancestor) = node {
        let term = subst.apply(&ancestor.goal);
        path.push(term.to_string());
        if &term == goal {
            path.reverse();
            return Some(path);
        }
        node = ancestor.parent.as_ref();
    }
    None
}
