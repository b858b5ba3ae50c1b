/*!
 * Worker Pool Launcher Tests
 * Full runs with a shortened busy loop and captured console output
 */

use nix::errno::Errno;
use pretty_assertions::assert_eq;
use sched_probe::pool::{CapturedOutput, Console, RunReport, WorkerPool};
use sched_probe::scheduler::{PriorityRange, PriorityScheme, SchedPolicy};
use sched_probe::SchedResult;
use serial_test::serial;

const SHORT_WORK: u64 = 50_000;

fn launch(policy: SchedPolicy, scheme: PriorityScheme, workers: usize) -> (SchedResult<RunReport>, CapturedOutput) {
    let (console, captured) = Console::capture();
    let report = WorkerPool::builder()
        .with_policy(policy)
        .with_scheme(scheme)
        .with_workers(workers)
        .with_console(console)
        .with_work_iterations(SHORT_WORK)
        .build()
        .launch();
    (report, captured)
}

fn count_prefix(lines: &[String], prefix: &str) -> usize {
    lines.iter().filter(|l| l.starts_with(prefix)).count()
}

/// Real-time runs need CAP_SYS_NICE; skip quietly without it
fn realtime_allowed(result: &SchedResult<RunReport>) -> bool {
    !matches!(result, Err(e) if e.errno() == Errno::EPERM)
}

#[test]
#[serial]
fn test_fair_share_run_emits_every_line() {
    let workers = 4;
    let (report, captured) = launch(SchedPolicy::FairShare, PriorityScheme::Parallel, workers);
    let report = report.unwrap();
    let lines = captured.lines();

    assert_eq!(count_prefix(&lines, "Main Thread: Thread Handle=["), 2);
    assert_eq!(count_prefix(&lines, "->Work Thread: "), workers);
    assert_eq!(count_prefix(&lines, "<-End  Thread: "), workers);
    assert_eq!(count_prefix(&lines, "Main Thread joined with: "), workers);
    assert_eq!(
        count_prefix(
            &lines,
            "Main Thread: Finished Launching All Worker Threads. Policy=[CFS] Method=[PARALLEL]"
        ),
        1
    );
    assert_eq!(lines.len(), 3 * workers + 3);

    for id in 0..workers {
        let start = format!("->Work Thread: id=[{}] name=[Thread {}] ", id, id);
        let end = format!("<-End  Thread: id=[{}] name=[Thread {}] Elapsed=[", id, id);
        assert_eq!(count_prefix(&lines, &start), 1);
        assert_eq!(count_prefix(&lines, &end), 1);
    }

    assert_eq!(report.workers.len(), workers);
}

#[test]
#[serial]
fn test_joined_lines_in_identity_order_with_negated_results() {
    let workers = 5;
    let (report, captured) = launch(SchedPolicy::FairShare, PriorityScheme::Descending, workers);
    let report = report.unwrap();

    let joined: Vec<String> = captured
        .lines()
        .into_iter()
        .filter(|l| l.starts_with("Main Thread joined with: "))
        .collect();
    let expected: Vec<String> = (0..workers)
        .map(|i| format!("Main Thread joined with: Work Thread id=[{}] Retval=[{}]", i, -(i as i32)))
        .collect();
    assert_eq!(joined, expected);

    let results: Vec<i32> = report.workers.iter().map(|w| w.result).collect();
    assert_eq!(results, vec![0, -1, -2, -3, -4]);
    let ids: Vec<usize> = report.workers.iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
}

#[test]
#[serial]
fn test_fair_share_scheme_is_noop() {
    let min = PriorityRange::for_policy(SchedPolicy::FairShare).unwrap().min;
    for scheme in PriorityScheme::ALL {
        let (report, captured) = launch(SchedPolicy::FairShare, scheme, 3);
        let report = report.unwrap();
        assert!(report.workers.iter().all(|w| w.priority == min));
        assert_eq!(report.launcher_priority, min);

        let set_prio = format!("Policy=[CFS] MinPrio=[{}] MaxPrio=[{}]", min, min);
        let starts: Vec<String> = captured
            .lines()
            .into_iter()
            .filter(|l| l.starts_with("->Work Thread: "))
            .collect();
        assert!(starts.iter().all(|l| l.contains(&set_prio)));
    }
}

#[test]
#[serial]
fn test_lines_never_interleave() {
    let (report, captured) = launch(SchedPolicy::FairShare, PriorityScheme::Parallel, 8);
    report.unwrap();

    for line in captured.lines() {
        let known = line.starts_with("Main Thread: ")
            || line.starts_with("Main Thread joined with: ")
            || line.starts_with("->Work Thread: ")
            || line.starts_with("<-End  Thread: ");
        assert!(known, "unexpected line: {}", line);
        if line.starts_with("->Work Thread: ") {
            assert!(line.ends_with("] "), "truncated start line: {}", line);
        }
        if line.starts_with("<-End  Thread: ") {
            assert!(line.ends_with(" s]"), "truncated end line: {}", line);
        }
    }
}

#[test]
#[serial]
fn test_empty_pool_completes() {
    let (report, captured) = launch(SchedPolicy::FairShare, PriorityScheme::Parallel, 0);
    let report = report.unwrap();
    assert!(report.workers.is_empty());
    assert_eq!(captured.lines().len(), 3);
}

#[test]
#[serial]
fn test_oversized_realtime_pool_fails() {
    let (report, captured) = launch(SchedPolicy::Fifo, PriorityScheme::Descending, 200);
    let err = report.unwrap_err();
    assert_eq!(err.operation(), "pthread_setschedparam");
    assert_eq!(err.errno(), Errno::EINVAL);
    assert!(err
        .diagnostic_line()
        .starts_with("* syscall error * pthread_setschedparam ret=[22]"));

    // Only the pre-adjustment snapshot made it out
    assert_eq!(captured.lines().len(), 1);
}

#[test]
#[serial]
fn test_fifo_ascending_priorities() {
    let (result, _) = launch(SchedPolicy::Fifo, PriorityScheme::Ascending, 4);
    if !realtime_allowed(&result) {
        return;
    }
    let report = result.unwrap();
    let min = PriorityRange::for_policy(SchedPolicy::Fifo).unwrap().min;
    let priorities: Vec<i32> = report.workers.iter().map(|w| w.priority).collect();
    assert_eq!(priorities, vec![min + 3, min + 2, min + 1, min]);
    assert_eq!(report.launcher_priority, min + 4);
}

#[test]
#[serial]
fn test_rr_odds_workers_observe_their_priority() {
    let (result, captured) = launch(SchedPolicy::RoundRobin, PriorityScheme::Odds, 4);
    if !realtime_allowed(&result) {
        return;
    }
    let report = result.unwrap();
    let min = PriorityRange::for_policy(SchedPolicy::RoundRobin).unwrap().min;
    let priorities: Vec<i32> = report.workers.iter().map(|w| w.priority).collect();
    assert_eq!(priorities, vec![min, min + 1, min, min + 1]);

    let lines = captured.lines();
    for worker in &report.workers {
        let prefix = format!("->Work Thread: id=[{}] ", worker.id);
        let line = lines.iter().find(|l| l.starts_with(&prefix)).unwrap();
        assert!(line.contains("Policy=[RR]"));
        assert!(line.contains(&format!("SetPrio=[{}]", worker.priority)));
    }
}
