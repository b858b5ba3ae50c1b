/*!
 * Priority Derivation
 * Per-worker and launcher priorities from policy, scheme and pool size
 */

use super::types::{PriorityScheme, SchedPolicy};

#[inline]
fn as_level(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Priority for worker `index` in a pool of `worker_count`
///
/// Fair-share has a single level, so the scheme only matters for real-time
/// policies. Values outside the policy's range are not clamped; the OS
/// rejects them at attribute or creation time.
#[must_use]
pub fn worker_priority(
    policy: SchedPolicy,
    scheme: PriorityScheme,
    min_priority: i32,
    worker_count: usize,
    index: usize,
) -> i32 {
    if !policy.is_realtime() {
        return min_priority;
    }

    let offset = match scheme {
        PriorityScheme::Parallel => 0,
        PriorityScheme::Ascending => as_level(worker_count.saturating_sub(1).saturating_sub(index)),
        PriorityScheme::Descending => as_level(index),
        PriorityScheme::Odds => as_level(index % 2),
    };
    min_priority.saturating_add(offset)
}

/// Priority the launching thread takes before creating workers
///
/// Real-time launchers sit above every worker so that freshly created
/// workers cannot preempt it before the pool is complete.
#[must_use]
pub fn launcher_priority(policy: SchedPolicy, min_priority: i32, worker_count: usize) -> i32 {
    if policy.is_realtime() {
        min_priority.saturating_add(as_level(worker_count))
    } else {
        min_priority
    }
}

/// Priorities for the whole pool in identity order
#[must_use]
pub fn priority_plan(
    policy: SchedPolicy,
    scheme: PriorityScheme,
    min_priority: i32,
    worker_count: usize,
) -> Vec<i32> {
    (0..worker_count)
        .map(|i| worker_priority(policy, scheme, min_priority, worker_count, i))
        .collect()
}
