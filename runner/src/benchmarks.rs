mod sum_sequence;
mod sum_table;
mod table_size;

use crate::{database::Connection, executors::ExecutorError};
use clap::ValueEnum;
use std::{collections::BTreeMap, fmt};

/// Parameters of a single measurement: `samples` numbers of `size` decimal digits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Parameters {
    pub samples: u32,
    pub size: u32,
}

pub type Setup = Box<dyn Fn(&mut dyn Connection, Parameters) -> Result<(), ExecutorError>>;
pub type Measure = Box<dyn Fn(&mut dyn Connection, Parameters) -> Result<f64, ExecutorError>>;

/// A named unit of work: an optional one-off setup and a repeatable measurement
pub struct TestCase {
    setup: Option<Setup>,
    measure: Measure,
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("setup", &self.setup.is_some())
            .finish_non_exhaustive()
    }
}

impl TestCase {
    pub fn new(
        measure: impl Fn(&mut dyn Connection, Parameters) -> Result<f64, ExecutorError> + 'static,
    ) -> Self {
        Self {
            setup: None,
            measure: Box::new(measure),
        }
    }

    pub fn with_setup(
        mut self,
        setup: impl Fn(&mut dyn Connection, Parameters) -> Result<(), ExecutorError> + 'static,
    ) -> Self {
        self.setup = Some(Box::new(setup));
        self
    }

    pub fn has_setup(&self) -> bool {
        self.setup.is_some()
    }

    pub fn setup(
        &self,
        connection: &mut dyn Connection,
        parameters: Parameters,
    ) -> Result<(), ExecutorError> {
        match &self.setup {
            Some(setup) => setup(connection, parameters),
            None => Ok(()),
        }
    }

    pub fn measure(
        &self,
        connection: &mut dyn Connection,
        parameters: Parameters,
    ) -> Result<f64, ExecutorError> {
        (self.measure)(connection, parameters)
    }
}

/// map of test case name -> test case, iterated in name order
pub type TestCaseMap = BTreeMap<&'static str, TestCase>;

/// The numeric representations every benchmark compares
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Representation {
    Mpz,
    Numeric,
}

impl Representation {
    pub const ALL: [Representation; 2] = [Representation::Mpz, Representation::Numeric];

    /// test case name, which doubles as the SQL column type
    pub fn name(self) -> &'static str {
        match self {
            Self::Mpz => "mpz",
            Self::Numeric => "numeric",
        }
    }

    /// set returning expression producing `samples` values of `size` digits
    pub fn dataset(self, parameters: Parameters) -> String {
        let Parameters { samples, size } = parameters;

        match self {
            Self::Mpz => format!("mpz_test_dataset({samples}, {size})"),
            Self::Numeric => {
                format!("numeric_test_dataset({samples}, repeat('8', {size})::numeric)")
            }
        }
    }
}

/// (Re)create `table` holding the dataset of `representation` and refresh its
/// statistics. Any table left over under the same name is dropped first.
fn materialize(
    connection: &mut dyn Connection,
    table: &str,
    representation: Representation,
    parameters: Parameters,
) -> Result<(), ExecutorError> {
    connection.execute(&format!("drop table if exists {table}"))?;
    connection.execute(&format!(
        "create table {table} (n {})",
        representation.name()
    ))?;
    connection.execute(&format!(
        "insert into {table} select * from {}",
        representation.dataset(parameters)
    ))?;
    // vacuum refuses to run inside a multi statement batch
    connection.execute(&format!("vacuum analyze {table}"))?;

    Ok(())
}

/// All benchmark classes selectable from the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Benchmarks {
    #[value(name = "SumSequence")]
    SumSequence,
    #[value(name = "SumTable")]
    SumTable,
    #[value(name = "TableSize")]
    TableSize,
}

impl Benchmarks {
    pub fn name(self) -> &'static str {
        match self {
            Self::SumSequence => "SumSequence",
            Self::SumTable => "SumTable",
            Self::TableSize => "TableSize",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::SumSequence => sum_sequence::TITLE,
            Self::SumTable => sum_table::TITLE,
            Self::TableSize => table_size::TITLE,
        }
    }

    pub fn xlabel(self) -> &'static str {
        match self {
            Self::SumSequence => sum_sequence::XLABEL,
            Self::SumTable => sum_table::XLABEL,
            Self::TableSize => table_size::XLABEL,
        }
    }

    pub fn ylabel(self) -> &'static str {
        match self {
            Self::SumSequence => sum_sequence::YLABEL,
            Self::SumTable => sum_table::YLABEL,
            Self::TableSize => table_size::YLABEL,
        }
    }

    /// build the test cases of this benchmark
    pub fn registry(self) -> TestCaseMap {
        match self {
            Self::SumSequence => sum_sequence::registry(),
            Self::SumTable => sum_table::registry(),
            Self::TableSize => table_size::registry(),
        }
    }
}

impl fmt::Display for Benchmarks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::mock::ScriptedConnection;
    use itertools::Itertools;

    const PARAMETERS: Parameters = Parameters {
        samples: 100,
        size: 5,
    };

    #[test]
    fn every_benchmark_compares_mpz_and_numeric() {
        for benchmark in Benchmarks::value_variants() {
            assert_eq!(
                benchmark.registry().keys().copied().collect_vec(),
                vec!["mpz", "numeric"],
                "{benchmark}"
            );
        }
    }

    #[test]
    fn only_sum_table_has_a_separate_setup() {
        let with_setup = |benchmark: Benchmarks| {
            benchmark
                .registry()
                .values()
                .all(TestCase::has_setup)
        };

        assert!(!with_setup(Benchmarks::SumSequence));
        assert!(with_setup(Benchmarks::SumTable));
        assert!(!with_setup(Benchmarks::TableSize));
    }

    #[test]
    fn names_parse_back() {
        for benchmark in Benchmarks::value_variants() {
            assert_eq!(
                Benchmarks::from_str(benchmark.name(), false).unwrap(),
                *benchmark
            );
            assert_eq!(benchmark.to_string(), benchmark.name());
        }
        assert!(Benchmarks::from_str("Benchmark", false).is_err());
    }

    #[test]
    fn datasets_use_the_test_functions() {
        assert_eq!(
            Representation::Mpz.dataset(PARAMETERS),
            "mpz_test_dataset(100, 5)"
        );
        assert_eq!(
            Representation::Numeric.dataset(PARAMETERS),
            "numeric_test_dataset(100, repeat('8', 5)::numeric)"
        );
    }

    #[test]
    fn materialize_drops_before_creating() {
        let mut connection = ScriptedConnection::postgres_like(1.0, 1);

        materialize(&mut connection, "test_x", Representation::Mpz, PARAMETERS).unwrap();

        assert_eq!(
            connection.statements,
            vec![
                "drop table if exists test_x",
                "create table test_x (n mpz)",
                "insert into test_x select * from mpz_test_dataset(100, 5)",
                "vacuum analyze test_x",
            ]
        );
    }
}
