//! Time spent by `sum()` over values read back from a table.

use super::{materialize, Representation, TestCase, TestCaseMap};
use crate::database::util::plan_timing;

pub const TITLE: &str = "Time spent for sum() on a table";
pub const XLABEL: &str = "Numbers size (in decimal digits)";
pub const YLABEL: &str = "Time (in millis)";

const TABLE: &str = "test_sum";

pub fn registry() -> TestCaseMap {
    Representation::ALL
        .into_iter()
        .map(|representation| {
            let case = TestCase::new(|connection, _| {
                let plan = connection.query(&format!("explain analyze select sum(n) from {TABLE}"))?;

                Ok(plan_timing(&plan)?)
            })
            .with_setup(move |connection, parameters| {
                materialize(connection, TABLE, representation, parameters)
            });

            (representation.name(), case)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{benchmarks::Parameters, database::mock::ScriptedConnection};

    #[test]
    fn setup_fills_the_table_and_measure_only_reads_it() {
        let mut connection = ScriptedConnection::postgres_like(0.75, 0);
        let registry = registry();
        let parameters = Parameters {
            samples: 10,
            size: 3,
        };

        registry["mpz"].setup(&mut connection, parameters).unwrap();
        let setup_statements = connection.statements.len();
        let elapsed = registry["mpz"].measure(&mut connection, parameters).unwrap();

        assert_eq!(elapsed, 0.75);
        assert_eq!(connection.position("drop table if exists test_sum"), Some(0));
        assert_eq!(
            connection.statements[setup_statements..].to_vec(),
            vec!["explain analyze select sum(n) from test_sum"]
        );
    }
}
