//! Time spent by `sum()` over values generated on the fly by a set returning
//! function, nothing is stored in a table.

use super::{Representation, TestCase, TestCaseMap};
use crate::database::util::plan_timing;

pub const TITLE: &str = "Time spent for sum() on a SRF";
pub const XLABEL: &str = "Numbers size (in decimal digits)";
pub const YLABEL: &str = "Time (in millis)";

pub fn registry() -> TestCaseMap {
    Representation::ALL
        .into_iter()
        .map(|representation| {
            let case = TestCase::new(move |connection, parameters| {
                let plan = connection.query(&format!(
                    "explain analyze select sum(x) from {} as x",
                    representation.dataset(parameters)
                ))?;

                Ok(plan_timing(&plan)?)
            });

            (representation.name(), case)
        })
        .collect()
}
