//! Program parser for facts, rules and queries

pub mod dsl;

pub use dsl::{parse_program, parse_query, Program};

use crate::error::ParseError;
use std::path::Path;

/// Read and parse a program file
pub fn parse_program_file(path: impl AsRef<Path>) -> Result<Program, ParseError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ParseError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_program(&content)
}
