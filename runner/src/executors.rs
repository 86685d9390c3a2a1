pub mod local;


use crate::{
    benchmarks::Benchmarks,
    config::RunConfiguration,
    database::{util::ParseError, Connection, ConnectionError, QueryError},
};
use std::{fmt, io, io::Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("Connection failed")]
    Connection(#[from] ConnectionError),
    #[error("Query failed")]
    Query(#[from] QueryError),
    #[error("Failed to extract a measurement")]
    Parse(#[from] ParseError),
    #[error("Failed to write results")]
    Output(#[from] io::Error),
}

/// Best value of one test case for one parameter combination
#[derive(Clone, Debug, PartialEq)]
pub struct ResultRecord {
    pub benchmark: Benchmarks,
    pub case: &'static str,
    pub samples: u32,
    pub size: u32,
    pub value: f64,
}

impl fmt::Display for ResultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.benchmark, self.case, self.samples, self.size, self.value
        )
    }
}

/// Reduce repeated measurements to the reported one. Lower is better, the
/// minimum is the closest to steady state.
pub fn best_value(results: &[f64]) -> f64 {
    results.iter().copied().fold(f64::INFINITY, f64::min)
}

pub trait Executor: Sized {
    fn load(config: RunConfiguration) -> Result<Self, ExecutorError>;

    /// run every combination, writing each record to `output` as soon as it
    /// is known
    fn execute(
        &mut self,
        connection: &mut dyn Connection,
        output: &mut dyn Write,
    ) -> Result<Vec<ResultRecord>, ExecutorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_value_is_the_minimum() {
        assert_eq!(best_value(&[3.5, 1.25, 2.0]), 1.25);
        assert_eq!(best_value(&[7.0]), 7.0);
    }

    #[test]
    fn record_line_layout() {
        let timing = ResultRecord {
            benchmark: Benchmarks::SumSequence,
            case: "mpz",
            samples: 1000,
            size: 30,
            value: 0.512,
        };
        let pages = ResultRecord {
            benchmark: Benchmarks::TableSize,
            case: "numeric",
            samples: 100,
            size: 5,
            value: 1.0,
        };

        assert_eq!(timing.to_string(), "SumSequence mpz 1000 30 0.512");
        assert_eq!(pages.to_string(), "TableSize numeric 100 5 1");
    }
}
