/*!
 * Worker Pool Launcher
 *
 * Runs one pool of busy-looping workers under a given policy and priority
 * scheme, pinned to a single core:
 * 1. Allocate descriptors and the shared console
 * 2. Pin to one CPU and report the launcher's scheduling state
 * 3. Compose the thread attribute (init, explicit sched, policy)
 * 4. Raise the launcher above its workers (real-time policies only)
 * 5. Per worker: attach the derived priority and create the thread
 * 6. Join in identity order and report result codes
 */

use super::attr::ThreadAttr;
use super::console::Console;
use super::worker::{worker_main, RunContext, WorkerDescriptor, WorkerState};
use crate::core::errors::{SchedError, SchedResult};
use crate::core::limits::{DEFAULT_WORKER_COUNT, DUMMY_WORK_ITERATIONS};
use crate::scheduler::{
    launcher_priority, pin_to_single_cpu, set_current_params, worker_priority, PriorityRange,
    PriorityScheme, SchedPolicy, SchedSnapshot,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, info_span};

/// Immutable input of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SchedConfig {
    pub policy: SchedPolicy,
    pub scheme: PriorityScheme,
    pub worker_count: usize,
}

impl Default for SchedConfig {
    fn default() -> Self {
        Self {
            policy: SchedPolicy::FairShare,
            scheme: PriorityScheme::Parallel,
            worker_count: DEFAULT_WORKER_COUNT,
        }
    }
}

/// Final state of one joined worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerOutcome {
    pub id: usize,
    pub name: String,
    pub priority: i32,
    pub result: i32,
    pub elapsed_ns: u128,
}

/// Everything a completed run observed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub config: SchedConfig,
    pub cpu: usize,
    pub launcher_priority: i32,
    pub workers: Vec<WorkerOutcome>,
}

/// Builder for [`WorkerPool`]
pub struct WorkerPoolBuilder {
    config: SchedConfig,
    console: Option<Console>,
    work_iterations: u64,
}

impl WorkerPoolBuilder {
    pub fn new() -> Self {
        Self {
            config: SchedConfig::default(),
            console: None,
            work_iterations: DUMMY_WORK_ITERATIONS,
        }
    }

    pub fn with_policy(mut self, policy: SchedPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    pub fn with_scheme(mut self, scheme: PriorityScheme) -> Self {
        self.config.scheme = scheme;
        self
    }

    pub fn with_workers(mut self, worker_count: usize) -> Self {
        self.config.worker_count = worker_count;
        self
    }

    pub fn with_config(mut self, config: SchedConfig) -> Self {
        self.config = config;
        self
    }

    /// Route status lines somewhere other than stdout
    pub fn with_console(mut self, console: Console) -> Self {
        self.console = Some(console);
        self
    }

    /// Shorten the busy loop; test suites only
    #[doc(hidden)]
    pub fn with_work_iterations(mut self, iterations: u64) -> Self {
        self.work_iterations = iterations;
        self
    }

    pub fn build(self) -> WorkerPool {
        WorkerPool {
            config: self.config,
            console: self.console.unwrap_or_else(Console::stdout),
            work_iterations: self.work_iterations,
        }
    }
}

impl Default for WorkerPoolBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A single run's worker pool
///
/// Consumed by [`WorkerPool::launch`]; descriptors, console and thread
/// attribute all live exactly as long as that call.
pub struct WorkerPool {
    config: SchedConfig,
    console: Console,
    work_iterations: u64,
}

impl WorkerPool {
    pub fn builder() -> WorkerPoolBuilder {
        WorkerPoolBuilder::new()
    }

    #[must_use]
    pub fn config(&self) -> SchedConfig {
        self.config
    }

    /// Create, run and join the whole pool
    ///
    /// Returns once every worker is joined. The first failing OS call aborts
    /// the run; workers already created are detached.
    pub fn launch(self) -> SchedResult<RunReport> {
        let config = self.config;
        let SchedConfig {
            policy,
            scheme,
            worker_count,
        } = config;

        let span = info_span!("pool_run", policy = %policy, scheme = %scheme, workers = worker_count);
        let _enter = span.enter();

        let mut workers: Vec<WorkerDescriptor> =
            (0..worker_count).map(WorkerDescriptor::new).collect();
        let ctx = Arc::new(RunContext {
            console: self.console,
            work_iterations: self.work_iterations,
        });

        let cpu = pin_to_single_cpu()?;
        ctx.console.line(format!("Main Thread: {}", SchedSnapshot::current()?));

        let mut attr = ThreadAttr::new()?.explicit_sched()?.with_policy(policy)?;
        let range = PriorityRange::for_policy(policy)?;

        let boosted = launcher_priority(policy, range.min, worker_count);
        set_current_params(policy, boosted)?;
        ctx.console.line(format!("Main Thread: {}", SchedSnapshot::current()?));

        for worker in workers.iter_mut() {
            let priority = worker_priority(policy, scheme, range.min, worker_count, worker.id);
            attr.set_priority(priority)?;

            let worker_ctx = Arc::clone(&ctx);
            let (id, name) = (worker.id, worker.name.clone());
            let handle = attr.spawn(move || worker_main(worker_ctx, id, name))?;

            worker.priority = Some(priority);
            worker.handle = Some(handle);
            worker.state = WorkerState::Created;
            debug!(worker = id, priority, "worker created");
        }

        ctx.console.line(format!(
            "Main Thread: Finished Launching All Worker Threads. Policy=[{}] Method=[{}]",
            policy, scheme
        ));

        for worker in workers.iter_mut() {
            if let Some(handle) = worker.handle.take() {
                let exit = handle.join()??;
                worker.result = exit.result;
                worker.elapsed = Some(exit.elapsed);
                worker.state = WorkerState::Joined;
            }
        }

        for worker in &workers {
            ctx.console.line(format!(
                "Main Thread joined with: Work Thread id=[{}] Retval=[{}]",
                worker.id, worker.result
            ));
        }

        attr.destroy()?;
        info!(cpu, launcher_priority = boosted, "all workers joined");

        Ok(RunReport {
            config,
            cpu,
            launcher_priority: boosted,
            workers: workers
                .into_iter()
                .map(|w| WorkerOutcome {
                    id: w.id,
                    priority: w.priority.unwrap_or(range.min),
                    result: w.result,
                    elapsed_ns: w.elapsed.map_or(0, |d| d.as_nanos()),
                    name: w.name,
                })
                .collect(),
        })
    }
}

/// Run one pool on stdout; any failure terminates the process
///
/// Prints `* syscall error * <op> ret=[<n>] [<text>]` before exiting.
pub fn run(policy: SchedPolicy, scheme: PriorityScheme, worker_count: usize) {
    let outcome = WorkerPool::builder()
        .with_policy(policy)
        .with_scheme(scheme)
        .with_workers(worker_count)
        .build()
        .launch();

    if let Err(err) = outcome {
        fatal(&err);
    }
}

/// Report a scheduling failure and exit with `EXIT_FAILURE`
pub fn fatal(err: &SchedError) -> ! {
    error!(operation = err.operation(), errno = %err.errno(), "scheduling syscall failed");
    println!("{}", err.diagnostic_line());
    std::process::exit(1)
}
