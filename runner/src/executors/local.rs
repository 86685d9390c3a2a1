use super::{best_value, Executor, ExecutorError, ResultRecord};
use crate::{
    benchmarks::{Parameters, TestCaseMap},
    config::RunConfiguration,
    database::Connection,
};
use itertools::iproduct;
use std::io::Write;
use tracing::{debug, info, instrument};

/// Executor running every measurement one after the other on a single connection
#[derive(Debug)]
pub struct LocalExecutor {
    config: RunConfiguration,
    cases: TestCaseMap,
}

impl LocalExecutor {
    /// create an executor over an explicit set of test cases
    pub fn new(config: RunConfiguration, cases: TestCaseMap) -> Self {
        Self { config, cases }
    }
}

impl Executor for LocalExecutor {
    fn load(config: RunConfiguration) -> Result<Self, ExecutorError> {
        let cases = config.benchmark.registry();

        Ok(Self::new(config, cases))
    }

    #[instrument(skip_all, fields(benchmark = %self.config.benchmark), level = "info")]
    fn execute(
        &mut self,
        connection: &mut dyn Connection,
        output: &mut dyn Write,
    ) -> Result<Vec<ResultRecord>, ExecutorError> {
        let repeats = self.config.repeats;
        let total = self.config.nsamples.len() * self.config.sizes.len() * self.cases.len();
        let mut records = Vec::with_capacity(total);

        debug!(
            cases = ?self.cases.keys().collect::<Vec<_>>(),
            total,
            "Starting benchmark"
        );

        for (samples, size) in iproduct!(
            self.config.nsamples.iter().copied(),
            self.config.sizes.iter().copied()
        ) {
            let parameters = Parameters { samples, size };

            for (&name, case) in self.cases.iter() {
                if case.has_setup() {
                    info!("setup {name}: n={samples} s={size}");
                    case.setup(connection, parameters)?;
                }

                let mut results = Vec::with_capacity(repeats as usize);

                for run in 1..=repeats {
                    info!("test {name} (n={samples} s={size}) run {run} of {repeats}");

                    let result = case.measure(connection, parameters)?;
                    info!("result: {result}");
                    results.push(result);
                }

                let record = ResultRecord {
                    benchmark: self.config.benchmark,
                    case: name,
                    samples,
                    size,
                    value: best_value(&results),
                };

                // long runs should show results as they come in
                writeln!(output, "{record}")?;
                output.flush()?;

                records.push(record);
            }
        }

        info!("Done with processing");

        Ok(records)
    }
}
