/*!
 * Driver Module
 * Configuration and the nine-case test matrix behind `sched_test`
 */

pub mod config;
pub mod matrix;

pub use config::DriverConfig;
pub use matrix::{CaseTiming, Driver, MatrixSummary, TestCase, TEST_MATRIX};
