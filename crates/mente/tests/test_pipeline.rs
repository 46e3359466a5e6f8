//! Normalization pipeline tests on hand-built formulas

use mente::normalize::{canonicalize, eliminate_implications, is_cnf, is_nnf};
use mente::{propositionalize, to_horn_kb, FreeClause, Predicate, Solver, Term};

fn rel(name: &str, args: Vec<Term>) -> Term {
    Term::relation(name, args).unwrap()
}

#[test]
fn test_program_predicate_to_text() {
    let program = mente::parse_program("mortal(X) :- man(X). man(socrates).").unwrap();
    let normalized = program.into_predicate().propositionalize().unwrap();
    assert_eq!(
        normalized.to_string(),
        "((¬man(X) ∨ mortal(X)) ∧ (man(socrates)))"
    );
}

#[test]
fn test_existential_in_rule_head_becomes_skolem_function() {
    // ∀X (person(X) ⇒ ∃Y mother(Y, X)), person(ann)
    let x = || Term::var("X");
    let has_mother = Term::forall(
        x(),
        Term::implies(
            rel("person", vec![x()]),
            Term::exists(Term::var("Y"), rel("mother", vec![Term::var("Y"), x()])).unwrap(),
        ),
    )
    .unwrap();
    let predicate =
        Predicate::new(FreeClause::new(vec![has_mother, rel("person", vec![Term::literal("ann")])]));
    let kb = predicate.horn_kb().unwrap();
    assert_eq!(kb.len(), 2);

    let goal = rel("mother", vec![Term::var("M"), Term::literal("ann")]);
    let answer = Solver::new(&kb).solve(&goal).unwrap().unwrap();
    assert_eq!(answer.to_string(), "mother(skolem_0(ann), ann)");
}

#[test]
fn test_shadowed_binder_stays_distinct() {
    // ∀X (p(X) ⇒ ∀X q(X)), p(a)
    let x = || Term::var("X");
    let inner = Term::forall(x(), rel("q", vec![x()])).unwrap();
    let rule = Term::forall(x(), Term::implies(rel("p", vec![x()]), inner)).unwrap();
    let predicate = Predicate::new(FreeClause::new(vec![rule, rel("p", vec![Term::literal("a")])]));

    let normalized = predicate.propositionalize().unwrap();
    assert_eq!(normalized.to_string(), "((¬p(X) ∨ q(x0)) ∧ (p(a)))");

    let kb = predicate.horn_kb().unwrap();
    let goal = rel("q", vec![Term::literal("b")]);
    assert_eq!(Solver::new(&kb).solve(&goal).unwrap(), Some(goal));
}

#[test]
fn test_large_program_normalizes() {
    let source: String = (0..10_000).map(|i| format!("f(c{}).\n", i)).collect();
    let program = mente::parse_program(&source).unwrap();
    assert_eq!(program.len(), 10_000);

    let kb = program.into_predicate().horn_kb().unwrap();
    assert_eq!(kb.len(), 10_000);
    let goal = rel("f", vec![Term::literal("c9999")]);
    assert_eq!(Solver::new(&kb).solve(&goal).unwrap(), Some(goal));
}

#[test]
fn test_normal_forms_along_the_way() {
    // ¬((a ⇒ b) ∧ ∃X p(X))
    let t = Term::and(
        Term::implies(Term::literal("a"), Term::literal("b")),
        Term::exists(Term::var("X"), rel("p", vec![Term::var("X")])).unwrap(),
    )
    .negated();

    let eliminated = eliminate_implications(&t);
    assert!(!is_nnf(&eliminated));
    let nnf = canonicalize(&eliminated);
    assert!(is_nnf(&nnf));
    assert_eq!(nnf.to_string(), "((a ∧ ¬b) ∨ (∀ X ¬p(X)))");

    let kb = propositionalize(&t).unwrap();
    assert_eq!(kb.to_string(), "((a ∨ ¬p(X)) ∧ (¬b ∨ ¬p(X)))");
}

#[test]
fn test_cnf_check() {
    let cnf = Term::and(Term::or(Term::literal("a"), Term::literal("b")), Term::literal("c"));
    assert!(is_cnf(&cnf));
    assert!(!is_cnf(&Term::or(cnf.clone(), Term::literal("d"))));
}

#[test]
fn test_non_horn_program_is_rejected() {
    let t = Term::or(Term::literal("p"), Term::literal("q"));
    assert!(to_horn_kb(&t).is_err());
}

#[test]
fn test_missing_file() {
    let err = mente::parse_program_file("/nonexistent/program.pl").unwrap_err();
    assert!(matches!(err, mente::ParseError::Io { .. }));
}
