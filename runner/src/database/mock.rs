//! In-memory stand-in for a database used by the runner and benchmark tests

use super::{Connection, QueryError, Row};

type Responder = Box<dyn FnMut(&str) -> Result<Vec<Row>, QueryError>>;

/// Records every statement it receives and answers queries through a closure
pub struct ScriptedConnection {
    pub statements: Vec<String>,
    responder: Responder,
}

impl ScriptedConnection {
    pub fn new(responder: impl FnMut(&str) -> Result<Vec<Row>, QueryError> + 'static) -> Self {
        Self {
            statements: Vec::new(),
            responder: Box::new(responder),
        }
    }

    /// answers `explain analyze` with a plan reporting `millis` and any other
    /// query with a single `pages` value
    pub fn postgres_like(millis: f64, pages: u32) -> Self {
        Self::new(move |query| {
            if query.starts_with("explain analyze") {
                Ok(plan(millis))
            } else if query.contains("pg_class") {
                Ok(vec![vec![Some(pages.to_string())]])
            } else {
                Ok(Vec::new())
            }
        })
    }

    /// position of the first statement starting with `prefix`
    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.statements
            .iter()
            .position(|statement| statement.starts_with(prefix))
    }
}

impl Connection for ScriptedConnection {
    fn execute(&mut self, statements: &str) -> Result<(), QueryError> {
        self.statements.push(statements.to_owned());
        (self.responder)(statements).map(|_| ())
    }

    fn query(&mut self, query: &str) -> Result<Vec<Row>, QueryError> {
        self.statements.push(query.to_owned());
        (self.responder)(query)
    }
}

/// plan text as returned by `explain analyze`
pub fn plan(millis: f64) -> Vec<Row> {
    [
        String::from("Aggregate  (cost=22.50..22.51 rows=1 width=32) (actual time=0.4..0.4 rows=1 loops=1)"),
        String::from("Planning Time: 0.035 ms"),
        format!("Execution Time: {millis} ms"),
    ]
    .into_iter()
    .map(|line| vec![Some(line)])
    .collect()
}
