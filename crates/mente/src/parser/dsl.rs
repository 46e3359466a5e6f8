//! Parser for the Prolog-like program syntax
//!
//! ```text
//! % facts and rules end with a period
//! parent(tom, bob).
//! ancestor(X, Y) :- parent(X, Y).
//! ancestor(X, Y) :- parent(X, Z), ancestor(Z, Y).
//! /* lists */
//! members([a, b, c]).
//! ```
//!
//! Uppercase (or `_`) identifiers are variables, other identifiers are
//! constants, and `name(args)` is a relation instance. Every statement is
//! universally closed over its variables.

use crate::error::ParseError;
use crate::logic::{FreeClause, QuantifierKind, Term};
use crate::predicate::Predicate;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while},
    character::complete::{char, multispace1, satisfy},
    combinator::{cut, eof, map, opt, recognize, value},
    error::{context, VerboseError, VerboseErrorKind},
    multi::{many0, separated_list0, separated_list1},
    sequence::{pair, preceded, terminated, tuple},
    Finish, IResult,
};

type Res<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

/// Relation name used for bracketed lists
const LIST: &str = "list";

/// Parsed statements in source order
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    statements: Vec<Term>,
}

impl Program {
    /// Closed formulas, one per fact or rule
    pub fn statements(&self) -> &[Term] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// The conjunction of all statements, ready for normalization
    pub fn into_predicate(self) -> Predicate {
        Predicate::new(FreeClause::new(self.statements))
    }
}

/// Parse a whole program
pub fn parse_program(input: &str) -> Result<Program, ParseError> {
    let parsed = terminated(many0(statement), preceded(ws, context("end of input", eof)))(input).finish();
    match parsed {
        Ok((_, statements)) => Ok(Program { statements }),
        Err(e) => Err(syntax_error(input, e)),
    }
}

/// Parse a single goal; variables are left free and a trailing `.` is optional
pub fn parse_query(input: &str) -> Result<Term, ParseError> {
    let parsed = tuple((
        preceded(ws, context("query", alt((variable, compound)))),
        opt(preceded(ws, char('.'))),
        preceded(ws, context("end of query", eof)),
    ))(input)
    .finish();
    match parsed {
        Ok((_, (goal, _, _))) => Ok(goal),
        Err(e) => Err(syntax_error(input, e)),
    }
}

/// Whitespace, `%` line comments and `/* */` block comments
fn ws(input: &str) -> Res<'_, ()> {
    value(
        (),
        many0(alt((
            value((), multispace1),
            value((), tuple((tag("/*"), take_until("*/"), tag("*/")))),
            value((), pair(char('%'), take_while(|c: char| c != '\n'))),
        ))),
    )(input)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn variable(input: &str) -> Res<'_, Term> {
    map(
        recognize(pair(
            satisfy(|c| c.is_uppercase() || c == '_'),
            take_while(is_ident_char),
        )),
        Term::var,
    )(input)
}

fn name(input: &str) -> Res<'_, &str> {
    recognize(pair(
        satisfy(|c| c.is_lowercase() || c.is_ascii_digit()),
        take_while(is_ident_char),
    ))(input)
}

/// `name` or `name(arg, ...)`
fn compound(input: &str) -> Res<'_, Term> {
    let (input, name) = name(input)?;
    let (input, args) = opt(preceded(
        char('('),
        cut(terminated(
            separated_list1(preceded(ws, char(',')), context("argument", argument)),
            preceded(ws, context("`)`", char(')'))),
        )),
    ))(input)?;
    let term = match args {
        Some(args) => Term::relation_unchecked(name.to_string(), args, false),
        None => Term::literal(name),
    };
    Ok((input, term))
}

/// `[a, b]` is `list(a, b)`; `[]` is the constant `list`
fn list(input: &str) -> Res<'_, Term> {
    let (input, _) = char('[')(input)?;
    let (input, items) = cut(terminated(
        separated_list0(preceded(ws, char(',')), argument),
        preceded(ws, context("`]`", char(']'))),
    ))(input)?;
    let term = if items.is_empty() {
        Term::literal(LIST)
    } else {
        Term::relation_unchecked(LIST.to_string(), items, false)
    };
    Ok((input, term))
}

fn argument(input: &str) -> Res<'_, Term> {
    preceded(ws, alt((list, variable, compound)))(input)
}

fn goal(input: &str) -> Res<'_, Term> {
    preceded(ws, context("goal", compound))(input)
}

/// `head.` or `head :- goal, ... .`
fn statement(input: &str) -> Res<'_, Term> {
    let (input, head) = preceded(ws, compound)(input)?;
    let (input, body) = opt(preceded(
        preceded(ws, tag(":-")),
        cut(separated_list1(preceded(ws, char(',')), goal)),
    ))(input)?;
    let (input, _) = cut(preceded(ws, context("`.`", char('.'))))(input)?;

    let formula = match body.and_then(conjunction) {
        Some(body) => Term::implies(body, head),
        None => head,
    };
    Ok((input, universal_closure(formula)))
}

/// Right-nested conjunction, leftmost goal outermost
fn conjunction(goals: Vec<Term>) -> Option<Term> {
    goals.into_iter().rev().reduce(|rest, goal| Term::and(goal, rest))
}

/// Bind every free variable, the first one outermost
fn universal_closure(formula: Term) -> Term {
    let vars = formula.variables();
    vars.into_iter()
        .rev()
        .fold(formula, |body, var| Term::quantified(QuantifierKind::ForAll, var, body, false))
}

fn syntax_error(source: &str, err: VerboseError<&str>) -> ParseError {
    let (at, kind) = match err.errors.first() {
        Some((at, kind)) => (*at, Some(kind)),
        None => ("", None),
    };
    let context = err.errors.iter().find_map(|(_, kind)| match kind {
        VerboseErrorKind::Context(ctx) => Some(*ctx),
        _ => None,
    });
    let expected = match (kind, context) {
        (Some(VerboseErrorKind::Char(c)), _) => format!("`{}`", c),
        (_, Some(ctx)) => ctx.to_string(),
        _ => "a statement".to_string(),
    };
    let found = match at.chars().next() {
        Some(c) => format!("`{}`", c),
        None => "end of input".to_string(),
    };

    let offset = source.len() - at.len();
    let consumed = &source[..offset];
    let line = consumed.matches('\n').count() + 1;
    let column = consumed.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;

    ParseError::Syntax {
        line,
        column,
        message: format!("expected {}, found {}", expected, found),
    }
}
