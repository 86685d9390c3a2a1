//! Size on disk of a table holding the dataset. Creating the table is part of
//! the measurement, there is no separate setup.

use super::{materialize, Representation, TestCase, TestCaseMap};
use crate::database::util::scalar;

pub const TITLE: &str = "Size of a table on disk";
pub const XLABEL: &str = "Numbers size (in decimal digits)";
pub const YLABEL: &str = "Size (in pages)";

const TABLE: &str = "test_size";

pub fn registry() -> TestCaseMap {
    Representation::ALL
        .into_iter()
        .map(|representation| {
            let case = TestCase::new(move |connection, parameters| {
                materialize(connection, TABLE, representation, parameters)?;

                let pages = connection.query(&format!(
                    "select relpages from pg_class where relname = '{TABLE}'"
                ))?;

                Ok(scalar(&pages)?)
            });

            (representation.name(), case)
        })
        .collect()
}
