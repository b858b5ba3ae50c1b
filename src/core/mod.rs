/*!
 * Core Module
 * Shared error types and constants
 */

pub mod errors;
pub mod limits;

pub use errors::{check_ret, SchedError, SchedResult};
