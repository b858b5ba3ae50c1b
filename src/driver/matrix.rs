/*!
 * Test Matrix
 *
 * Nine sub tests mixing policies and priority schemes, each timed around
 * one pool run, followed by a summary.
 */

use super::config::DriverConfig;
use crate::core::limits::{SEPARATOR_LINE, TEST_CASE_COUNT};
use crate::pool::{Console, SchedConfig};
use crate::scheduler::{PriorityScheme, SchedPolicy};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::info;

/// One policy/scheme combination of the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TestCase {
    pub number: usize,
    pub policy: SchedPolicy,
    pub scheme: PriorityScheme,
}

/// The fixed run order
///
/// CFS only runs PARALLEL since it has a single priority level.
pub const TEST_MATRIX: [TestCase; TEST_CASE_COUNT] = [
    TestCase { number: 1, policy: SchedPolicy::FairShare, scheme: PriorityScheme::Parallel },
    TestCase { number: 2, policy: SchedPolicy::Fifo, scheme: PriorityScheme::Parallel },
    TestCase { number: 3, policy: SchedPolicy::Fifo, scheme: PriorityScheme::Ascending },
    TestCase { number: 4, policy: SchedPolicy::Fifo, scheme: PriorityScheme::Descending },
    TestCase { number: 5, policy: SchedPolicy::Fifo, scheme: PriorityScheme::Odds },
    TestCase { number: 6, policy: SchedPolicy::RoundRobin, scheme: PriorityScheme::Parallel },
    TestCase { number: 7, policy: SchedPolicy::RoundRobin, scheme: PriorityScheme::Ascending },
    TestCase { number: 8, policy: SchedPolicy::RoundRobin, scheme: PriorityScheme::Descending },
    TestCase { number: 9, policy: SchedPolicy::RoundRobin, scheme: PriorityScheme::Odds },
];

/// Wall time of one sub test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CaseTiming {
    #[serde(flatten)]
    pub case: TestCase,
    pub worker_count: usize,
    pub elapsed_ns: u128,
}

/// Timings of a full matrix run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixSummary {
    pub worker_count: usize,
    pub total_ns: u128,
    pub cases: Vec<CaseTiming>,
}

const BANNER: &[&str] = &[
    "Linux Kernel Posix Threads Real Time Scheduling Test Program",
    "Main program started. Make sure to run with root privileges in order to be able to use RT capabilities",
    "Usage: sched_test <num_threads> (default=8 if omitted)",
    "",
    "This program will test 3 scheduling policies within Linux system: CFS, FIFO and RR",
    "CFS  - Completely Fair Scheduling (default): shares cpu power among all threads according to niceness",
    "FIFO - First In First Out (RT): Priority is enforced and cpu is shared by order",
    "RR   - Round Robin (RT): Priority is enforced and cpu is shared by time slices",
    "",
    "It is expected that:",
    "- CFS  has only one priority level and it will share the CPU time among all threads which will run in parallel",
    "- FIFO has multiple prio levels. High prio will preempt and run first. Same prios will execute in the order they started",
    "- RR   has multiple prio levels. High prio will preempt and run first. Same prios will share time slices (100ms by default)",
    "",
    "The program will launch a thread pool of <n> threads at the same time, with a dummy work to be done (never sleeping, yielding or blocking)",
    "CPU affinity will be set to use only one core in order to pipeline the scheduler. You can use htop to check cpu usage",
    "Threads will contain a thread id from 0 to n-1",
    "A total of 9 sub tests will be launched by mixing scheduling policies and priority schemes",
    "Observe that 4 priority schemes are used:",
    "- PARALLEL   where all prios are the lowest possible and equal. (CFS is only applicable to this prio scheme)",
    "- ASCENDING  where decreasing prios are assigned to thread id in ascending  order and theoretically low  thread id should run first",
    "- DESCENDING where decreasing prios are assigned to thread id in descending order and theoretically high thread id should run first",
    "- ODDS       where two prios are used. The higher prio is assigned to odd thread ids and lower prio to even thread ids",
    "",
    "The catch is:",
    "- PARALLEL CFS  will run in parallel since all have same priority and cpu is shared among them (proportionally to niceness).",
    "- PARALLEL RR   will run in parallel since all have same priority and cpu is shared among them (each 100ms a thread runs).",
    "- PARALLEL FIFO cannot be parallel as it runs one at a time since all have same prio and first in is processed until finished, then yielding to the other fellow threads",
    "- ASCENDING/DESCENDING will behave the same for FIFO and RR since with both policies higher priority preempts lower priority",
    "- ODDS will prioritize the odd thread ids in both FIFO and RR, however in FIFO the odds will run one at a time and with RR odds will share cpu",
    "- CFS: has 1 prio level(0). The TimeSlice is related to the 'niceness' defined in the scheme",
    "- FIFO has 99 prio levels.  The TimeSlice is undefined since not applicable (first in first out)",
    "- RR   has 99 prio levels.  The TimeSlice is default 100ms and defined at system level on /proc/sys/kernel/sched_rr_timeslice_ms",
    "- Statistically CFS has an overall better performance than both RT policies (FIFO and RR). RT determinism comes with a small extra cost.",
];

const CLOSING: &[&str] = &[
    "Statistically CFS (Sub test #1) has an overall better performance than both RT policies (FIFO and RR).",
    "RT determinism comes with a small extra cost as it does not optimize scheduling fairness according to load.",
];

#[inline]
fn secs(elapsed: Duration) -> String {
    format!("{:.6}", elapsed.as_secs_f64())
}

/// Sequencer for the nine sub tests
pub struct Driver {
    config: DriverConfig,
    console: Console,
}

impl Driver {
    pub fn new(config: DriverConfig, console: Console) -> Self {
        Self { config, console }
    }

    pub fn print_banner(&self) {
        self.console.line(SEPARATOR_LINE);
        for line in BANNER {
            self.console.line(line);
        }
        self.console.line(SEPARATOR_LINE);
    }

    /// Run every case through `runner`, timing each call
    ///
    /// `runner` performs one pool run; it is expected to terminate the
    /// process itself on failure.
    pub fn run_with<F>(&self, mut runner: F) -> MatrixSummary
    where
        F: FnMut(SchedConfig),
    {
        let worker_count = self.config.worker_count;
        let begin = Instant::now();

        let cases = TEST_MATRIX
            .iter()
            .map(|&case| {
                self.console.line(format!("Launching sub test #{}", case.number));
                let started = Instant::now();
                runner(SchedConfig {
                    policy: case.policy,
                    scheme: case.scheme,
                    worker_count,
                });
                let elapsed = started.elapsed();
                self.console.line(format!(
                    "Finished sub test #{} [{} s]",
                    case.number,
                    secs(elapsed)
                ));
                self.console.line(SEPARATOR_LINE);
                info!(case = case.number, policy = %case.policy, scheme = %case.scheme, elapsed_ms = elapsed.as_millis() as u64, "sub test finished");

                CaseTiming {
                    case,
                    worker_count,
                    elapsed_ns: elapsed.as_nanos(),
                }
            })
            .collect();

        MatrixSummary {
            worker_count,
            total_ns: begin.elapsed().as_nanos(),
            cases,
        }
    }

    pub fn print_summary(&self, summary: &MatrixSummary) {
        let total = Duration::from_nanos(summary.total_ns as u64);
        self.console.line(format!(
            "Main program finished with [{}] seconds elapsed",
            secs(total)
        ));
        self.console.line("");
        self.console.line("Sub tests summary:");
        for timing in &summary.cases {
            self.console.line(format!(
                "Sub test #{} [{} s] seconds elapsed",
                timing.case.number,
                secs(Duration::from_nanos(timing.elapsed_ns as u64))
            ));
        }
        self.console.line("");
        for line in CLOSING {
            self.console.line(line);
        }
        self.console.line(SEPARATOR_LINE);

        if self.config.summary_json {
            match serde_json::to_string_pretty(summary) {
                Ok(json) => self.console.line(json),
                Err(e) => tracing::warn!(error = %e, "failed to serialize summary"),
            }
        }
    }
}
