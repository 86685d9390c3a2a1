pub mod postgres;
pub mod util;

#[cfg(test)]
pub mod mock;

use std::error::Error;
use thiserror::Error;

/// A single result row with every column rendered as text, `None` for SQL NULL
pub type Row = Vec<Option<String>>;

#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Invalid connection string")]
    InvalidDsn(#[source] ::postgres::Error),
    #[error("Failed to connect to the database")]
    Postgres(#[source] ::postgres::Error),
}

#[derive(Error, Debug)]
#[error("Database rejected statement `{statement}`")]
pub struct QueryError {
    pub statement: String,
    #[source]
    pub source: Box<dyn Error + Send + Sync>,
}

impl QueryError {
    pub fn new(statement: &str, source: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self {
            statement: statement.trim().to_owned(),
            source: source.into(),
        }
    }
}

/// A live database handle in autocommit mode.
///
/// Every statement takes effect as soon as it returns, there is no implicit
/// transaction around it. Results come back as text, which is what the
/// measurement extraction in `util` works on.
pub trait Connection {
    /// run one or more statements, discarding any rows they produce
    fn execute(&mut self, statements: &str) -> Result<(), QueryError>;

    /// run a single query and collect its rows
    fn query(&mut self, query: &str) -> Result<Vec<Row>, QueryError>;
}
