//! Extraction of measurement figures from textual query output.
//!
//! PostgreSQL reports the runtime of `explain analyze` as the last line of the
//! plan, `Execution Time: 0.512 ms` (or `Total runtime: 0.512 ms` before 9.4).
//! The position of the figure is tied to that format, so everything that
//! depends on it lives here.

use super::Row;
use std::num::ParseFloatError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Query returned no rows")]
    EmptyResult,
    #[error("Query returned NULL or no column where a value was expected")]
    MissingValue,
    #[error("No numeric token found in `{0}`")]
    MissingToken(String),
    #[error("Token `{token}` is not a number")]
    InvalidNumber {
        token: String,
        #[source]
        source: ParseFloatError,
    },
}

/// Timing in milliseconds from the output of `explain analyze`: the second to
/// last whitespace separated token of the final row.
pub fn plan_timing(rows: &[Row]) -> Result<f64, ParseError> {
    let line = first_column(rows.last())?;
    let token = line
        .split_whitespace()
        .rev()
        .nth(1)
        .ok_or_else(|| ParseError::MissingToken(line.to_owned()))?;

    parse_number(token)
}

/// Single numeric value from the first column of the first row
pub fn scalar(rows: &[Row]) -> Result<f64, ParseError> {
    parse_number(first_column(rows.first())?.trim())
}

fn first_column(row: Option<&Row>) -> Result<&str, ParseError> {
    row.ok_or(ParseError::EmptyResult)?
        .first()
        .and_then(Option::as_deref)
        .ok_or(ParseError::MissingValue)
}

fn parse_number(token: &str) -> Result<f64, ParseError> {
    token.parse().map_err(|source| ParseError::InvalidNumber {
        token: token.to_owned(),
        source,
    })
}
