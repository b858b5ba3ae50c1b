/*!
 * Worker Pool
 *
 * Launches busy-looping native threads with explicit scheduling attributes
 * and joins them in identity order.
 */

pub mod attr;
pub mod console;
pub mod launcher;
pub mod thread;
pub mod worker;

pub use attr::{AttrState, Configured, ExplicitSched, Initialized, ThreadAttr};
pub use console::{CapturedOutput, Console};
pub use launcher::{
    fatal, run, RunReport, SchedConfig, WorkerOutcome, WorkerPool, WorkerPoolBuilder,
};
pub use thread::NativeThread;
pub use worker::{dummy_work, exit_code, WorkerDescriptor, WorkerExit, WorkerState};
