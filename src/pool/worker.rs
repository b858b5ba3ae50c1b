/*!
 * Worker Units
 * Descriptors and the busy-looping worker body
 */

use super::console::Console;
use super::thread::NativeThread;
use crate::core::errors::SchedResult;
use crate::scheduler::SchedSnapshot;
use serde::Serialize;
use std::hint::black_box;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::trace;

/// Per-run state shared with every worker
pub struct RunContext {
    pub console: Console,
    pub work_iterations: u64,
}

/// What a worker hands back through join
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerExit {
    pub result: i32,
    pub elapsed: Duration,
}

/// Worker lifecycle as observed by the launcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerState {
    /// Descriptor allocated, thread not yet created
    Pending,
    /// Thread created and not yet joined
    Created,
    Joined,
}

/// One worker of a run, owned by the launcher until joined
pub struct WorkerDescriptor {
    pub id: usize,
    pub name: String,
    pub priority: Option<i32>,
    pub state: WorkerState,
    pub result: i32,
    pub elapsed: Option<Duration>,
    pub(crate) handle: Option<NativeThread<SchedResult<WorkerExit>>>,
}

impl WorkerDescriptor {
    #[must_use]
    pub fn new(id: usize) -> Self {
        Self {
            id,
            name: format!("Thread {}", id),
            priority: None,
            state: WorkerState::Pending,
            result: 0,
            elapsed: None,
            handle: None,
        }
    }

    /// Native handle of the created thread
    #[must_use]
    pub fn thread_id(&self) -> Option<u64> {
        self.handle.as_ref().map(NativeThread::id)
    }

    /// `id=[<i>] name=[<name>] `
    #[must_use]
    pub fn tag(&self) -> String {
        worker_tag(self.id, &self.name)
    }
}

fn worker_tag(id: usize, name: &str) -> String {
    format!("id=[{}] name=[{}] ", id, name)
}

/// Result code a worker reports: the negated identity
#[inline]
#[must_use]
pub fn exit_code(id: usize) -> i32 {
    -(i32::try_from(id).unwrap_or(i32::MAX))
}

/// Non-yielding CPU burn
///
/// Never sleeps, blocks or yields; `black_box` keeps the loop alive.
#[inline(never)]
pub fn dummy_work(iterations: u64) -> u64 {
    let mut i = 0u64;
    while i < iterations {
        i = black_box(i) + 1;
    }
    i
}

/// Body of every worker thread
pub fn worker_main(ctx: Arc<RunContext>, id: usize, name: String) -> SchedResult<WorkerExit> {
    let begin = Instant::now();
    let tag = worker_tag(id, &name);

    let snapshot = SchedSnapshot::current()?;
    ctx.console.line(format!("->Work Thread: {}{}", tag, snapshot));

    trace!(worker = id, "computing");
    black_box(dummy_work(ctx.work_iterations));

    let elapsed = begin.elapsed();
    ctx.console.line(format!(
        "<-End  Thread: {}Elapsed=[{:.6} s]",
        tag,
        elapsed.as_secs_f64()
    ));

    Ok(WorkerExit {
        result: exit_code(id),
        elapsed,
    })
}
