/*!
 * Scheduler Module
 *
 * Thin, typed layer over the host scheduler:
 * - Policy/scheme enums mapped to native constants at the call site
 * - Priority derivation for workers and the launching thread
 * - Scheduling snapshots of the calling thread
 * - Single-core affinity pinning
 */

pub mod affinity;
pub mod info;
pub mod params;
pub mod priority;
pub mod types;

pub use affinity::{first_allowed_cpu, pin_to_single_cpu};
pub use info::{rr_interval, SchedSnapshot};
pub use params::{current_params, current_thread_id, set_current_params, ThreadParams};
pub use priority::{launcher_priority, priority_plan, worker_priority};
pub use types::{PriorityRange, PriorityScheme, SchedPolicy};
