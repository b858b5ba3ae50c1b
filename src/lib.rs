/*!
 * Scheduler Probe Library
 * Launches busy-looping thread pools under explicit Linux scheduling
 * policies and priorities, pinned to one core, and reports what happened
 */

pub mod core;
pub mod driver;
pub mod monitoring;
pub mod pool;
pub mod scheduler;

// Re-exports
pub use crate::core::{SchedError, SchedResult};
pub use monitoring::init_tracing;
pub use pool::{run, RunReport, SchedConfig, WorkerPool};
pub use scheduler::{PriorityScheme, SchedPolicy, SchedSnapshot};
