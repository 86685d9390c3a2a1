mod benchmarks;
mod config;
mod database;
mod executors;

use benchmarks::Benchmarks;
use clap::{CommandFactory, Parser, ValueEnum};
use config::{Cli, RunConfiguration};
use database::postgres::PostgresConnection;
use executors::{local::LocalExecutor, Executor, ExecutorError, ResultRecord};
use itertools::Itertools;
use std::{
    error::Error,
    io::{self, IsTerminal},
    iter,
    process::ExitCode,
};
use tracing::{error, info};
use tracing::Subscriber;
use tracing_subscriber::{fmt::MakeWriter, EnvFilter};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // logger lives for the duration of the run only
    let subscriber = log_subscriber(io::stderr, io::stderr().is_terminal());

    tracing::subscriber::with_default(subscriber, || run(cli))
}

/// timestamped log lines to `writer`, colored only when `ansi` is set
fn log_subscriber<W>(writer: W, ansi: bool) -> impl Subscriber + Send + Sync
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish()
}

fn run(cli: Cli) -> ExitCode {
    if cli.list {
        list_benchmarks();

        return ExitCode::SUCCESS;
    }

    // usage problems are reported before any connection is attempted
    let config = match RunConfiguration::from_cli(&cli) {
        Ok(config) => config,
        Err(error) => Cli::command().error(error.kind(), error).exit(),
    };

    match execute(config) {
        Ok(records) => {
            info!(records = records.len(), "Benchmark finished");

            ExitCode::SUCCESS
        }
        Err(error) => {
            error!("{}", error_chain(&error));

            ExitCode::FAILURE
        }
    }
}

fn execute(config: RunConfiguration) -> Result<Vec<ResultRecord>, ExecutorError> {
    let mut connection = PostgresConnection::load(&config.dsn)?;
    let mut executor = LocalExecutor::load(config)?;

    executor.execute(&mut connection, &mut io::stdout().lock())
}

fn list_benchmarks() {
    for benchmark in Benchmarks::value_variants() {
        println!(
            "{}: {} (x: {}, y: {})",
            benchmark,
            benchmark.title(),
            benchmark.xlabel(),
            benchmark.ylabel()
        );
    }
}

/// render an error followed by all of its sources
fn error_chain(error: &dyn Error) -> String {
    iter::successors(Some(error), |&error| error.source())
        .map(ToString::to_string)
        .join(": ")
}
