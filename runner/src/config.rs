use crate::benchmarks::Benchmarks;
use clap::{error::ErrorKind, Parser};
use serde::Deserialize;
use std::{fs::File, io, path::PathBuf};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_REPEATS: u32 = 3;

#[derive(Error, Debug)]
pub enum ConfigErrors {
    #[error("please specify one benchmark")]
    MissingBenchmark,
    #[error("please specify -n and -s at least once")]
    MissingParameters,
    #[error("size must be at least 1 digit")]
    InvalidSize,
    #[error("repeats must be at least 1")]
    InvalidRepeats,
    #[error("failed to read config file")]
    ConfigFile(#[from] io::Error),
    #[error("failed to parse config file: {0}")]
    InvalidConfigFile(#[from] serde_yaml::Error),
}

impl ConfigErrors {
    /// closest clap error kind, used to report the error as a usage error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingBenchmark | Self::MissingParameters => ErrorKind::MissingRequiredArgument,
            Self::InvalidSize | Self::InvalidRepeats => ErrorKind::ValueValidation,
            Self::ConfigFile(_) => ErrorKind::Io,
            Self::InvalidConfigFile(_) => ErrorKind::InvalidValue,
        }
    }
}

/// Compare mpz and numeric data types in PostgreSQL
#[derive(Parser, Debug)]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Benchmark to run
    #[arg(value_enum, required_unless_present = "list")]
    pub benchmark: Option<Benchmarks>,

    /// Number of numbers to sum (non-negative). Specify once or more
    #[arg(short = 'n', long = "nsamples", value_name = "N")]
    pub nsamples: Vec<u32>,

    /// Size of numbers to sum, in decimal digits (at least 1). Specify once or more
    #[arg(short = 's', long = "size", value_name = "S", value_parser = clap::value_parser!(u32).range(1..))]
    pub sizes: Vec<u32>,

    /// Test repetitions, the best value is kept [default: 3]
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub repeats: Option<u32>,

    /// Database to connect to, e.g. "host=localhost dbname=bench"
    #[arg(long)]
    pub dsn: Option<String>,

    /// YAML file providing defaults for nsamples, size, repeats and dsn
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// List the available benchmarks and exit
    #[arg(long)]
    pub list: bool,
}

/// Optional defaults read from a YAML file, the command line wins
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub nsamples: Vec<u32>,
    #[serde(default, alias = "sizes")]
    pub size: Vec<u32>,
    pub repeats: Option<u32>,
    pub dsn: Option<String>,
}

impl FileConfig {
    pub fn load(path: &PathBuf) -> Result<Self, ConfigErrors> {
        debug!(path = ?path, "Loading config file");

        Ok(serde_yaml::from_reader(File::open(path)?)?)
    }
}

/// Everything a run needs, fixed before any connection is attempted
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfiguration {
    pub benchmark: Benchmarks,
    pub nsamples: Vec<u32>,
    pub sizes: Vec<u32>,
    pub repeats: u32,
    pub dsn: String,
}

impl RunConfiguration {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigErrors> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        Self::merge(cli, file)
    }

    /// layer the command line over `file`, then validate the result
    pub fn merge(cli: &Cli, file: FileConfig) -> Result<Self, ConfigErrors> {
        let benchmark = cli.benchmark.ok_or(ConfigErrors::MissingBenchmark)?;
        let pick = |cli: &[u32], file: Vec<u32>| {
            if cli.is_empty() {
                file
            } else {
                cli.to_vec()
            }
        };

        let nsamples = pick(&cli.nsamples, file.nsamples);
        let sizes = pick(&cli.sizes, file.size);

        if nsamples.is_empty() || sizes.is_empty() {
            return Err(ConfigErrors::MissingParameters);
        }
        if sizes.contains(&0) {
            return Err(ConfigErrors::InvalidSize);
        }

        let repeats = cli.repeats.or(file.repeats).unwrap_or(DEFAULT_REPEATS);
        if repeats == 0 {
            return Err(ConfigErrors::InvalidRepeats);
        }

        Ok(Self {
            benchmark,
            nsamples,
            sizes,
            repeats,
            dsn: cli.dsn.clone().or(file.dsn).unwrap_or_default(),
        })
    }
}
