/*!
 * Priority Derivation Tests
 * Range and ordering properties of every scheme
 */

use proptest::prelude::*;
use sched_probe::scheduler::{
    launcher_priority, priority_plan, worker_priority, PriorityRange, PriorityScheme, SchedPolicy,
};

const RT_RANGE: PriorityRange = PriorityRange { min: 1, max: 99 };

fn any_scheme() -> impl Strategy<Value = PriorityScheme> {
    prop::sample::select(PriorityScheme::ALL.to_vec())
}

fn realtime_policy() -> impl Strategy<Value = SchedPolicy> {
    prop::sample::select(vec![SchedPolicy::Fifo, SchedPolicy::RoundRobin])
}

proptest! {
    #[test]
    fn prop_fitting_pools_stay_in_range(
        policy in realtime_policy(),
        scheme in any_scheme(),
        workers in 1usize..=99,
    ) {
        for p in priority_plan(policy, scheme, RT_RANGE.min, workers) {
            prop_assert!(RT_RANGE.contains(p));
        }
    }

    #[test]
    fn prop_launcher_outranks_workers(
        policy in realtime_policy(),
        scheme in any_scheme(),
        workers in 1usize..=98,
    ) {
        let launcher = launcher_priority(policy, RT_RANGE.min, workers);
        prop_assert!(RT_RANGE.contains(launcher));
        for p in priority_plan(policy, scheme, RT_RANGE.min, workers) {
            prop_assert!(p < launcher);
        }
    }

    #[test]
    fn prop_fair_share_flat(scheme in any_scheme(), workers in 0usize..64) {
        let plan = priority_plan(SchedPolicy::FairShare, scheme, 0, workers);
        prop_assert_eq!(plan.len(), workers);
        prop_assert!(plan.iter().all(|&p| p == 0));
    }

    #[test]
    fn prop_ascending_strictly_decreasing(policy in realtime_policy(), workers in 2usize..=99) {
        let plan = priority_plan(policy, PriorityScheme::Ascending, RT_RANGE.min, workers);
        prop_assert!(plan.windows(2).all(|w| w[0] == w[1] + 1));
        prop_assert_eq!(plan[workers - 1], RT_RANGE.min);
    }

    #[test]
    fn prop_descending_strictly_increasing(policy in realtime_policy(), workers in 2usize..=99) {
        let plan = priority_plan(policy, PriorityScheme::Descending, RT_RANGE.min, workers);
        prop_assert!(plan.windows(2).all(|w| w[1] == w[0] + 1));
        prop_assert_eq!(plan[0], RT_RANGE.min);
    }

    #[test]
    fn prop_odds_two_levels(policy in realtime_policy(), workers in 2usize..=99, index in 0usize..99) {
        prop_assume!(index < workers);
        let p = worker_priority(policy, PriorityScheme::Odds, RT_RANGE.min, workers, index);
        let expected = if index % 2 == 1 { RT_RANGE.min + 1 } else { RT_RANGE.min };
        prop_assert_eq!(p, expected);
    }
}

#[test]
fn test_oversized_pool_exceeds_range() {
    let plan = priority_plan(SchedPolicy::Fifo, PriorityScheme::Ascending, RT_RANGE.min, 200);
    assert!(plan.iter().any(|&p| !RT_RANGE.contains(p)));
}
