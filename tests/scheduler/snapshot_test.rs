/*!
 * Scheduling Snapshot Tests
 * Live queries against the host scheduler
 */

use sched_probe::scheduler::{current_params, rr_interval, SchedPolicy, SchedSnapshot};

#[test]
fn test_snapshot_matches_thread_params() {
    let params = current_params().unwrap();
    let snap = SchedSnapshot::current().unwrap();
    assert_eq!(snap.policy, params.policy);
    assert_eq!(snap.priority, params.priority);
}

#[test]
fn test_default_thread_is_fair_share() {
    let snap = std::thread::spawn(|| SchedSnapshot::current().unwrap())
        .join()
        .unwrap();
    if snap.known_policy() == Some(SchedPolicy::FairShare) {
        assert_eq!((snap.min_priority, snap.max_priority, snap.priority), (0, 0, 0));
        assert!(snap.to_string().contains("Policy=[CFS] MinPrio=[0] MaxPrio=[0]"));
    }
}

#[test]
fn test_timeslice_reported_under_fair_share() {
    let interval = rr_interval().unwrap();
    let snap = SchedSnapshot::current().unwrap();
    assert_eq!(snap.timeslice_ms, interval.as_millis() as u64);
    assert!(snap.to_string().contains(&format!("TmSlice=[{} ms]", snap.timeslice_ms)));
}

#[test]
fn test_snapshot_rendering_fields_in_order() {
    let rendered = SchedSnapshot::current().unwrap().to_string();
    let fields = ["Thread Handle=[", "Policy=[", "MinPrio=[", "MaxPrio=[", "TmSlice=[", "SetPrio=["];
    let mut last = 0;
    for field in fields {
        let pos = rendered.find(field).unwrap();
        assert!(pos >= last);
        last = pos;
    }
    assert!(rendered.ends_with("] "));
}
