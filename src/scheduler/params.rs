/*!
 * Thread Scheduling Parameters
 * Read and change the calling thread's policy and priority
 */

use super::types::SchedPolicy;
use crate::core::errors::{check_ret, SchedResult};
use nix::libc;
use std::mem;
use tracing::debug;

/// Raw policy and priority of a thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadParams {
    /// Native policy value; may be one this crate does not model (e.g. `SCHED_BATCH`)
    pub policy: libc::c_int,
    pub priority: i32,
}

impl ThreadParams {
    #[must_use]
    pub const fn policy(&self) -> Option<SchedPolicy> {
        SchedPolicy::from_native(self.policy)
    }
}

/// Opaque identifier of the calling thread
#[inline]
#[must_use]
pub fn current_thread_id() -> u64 {
    // SAFETY: pthread_self never fails
    unsafe { libc::pthread_self() as u64 }
}

/// Policy and priority of the calling thread
pub fn current_params() -> SchedResult<ThreadParams> {
    let mut policy: libc::c_int = 0;
    // SAFETY: zeroed sched_param is a valid out-parameter
    let mut param: libc::sched_param = unsafe { mem::zeroed() };
    let ret = unsafe { libc::pthread_getschedparam(libc::pthread_self(), &mut policy, &mut param) };
    check_ret("pthread_getschedparam", ret)?;
    Ok(ThreadParams {
        policy,
        priority: param.sched_priority,
    })
}

/// Move the calling thread to `policy` at `priority`
pub fn set_current_params(policy: SchedPolicy, priority: i32) -> SchedResult<()> {
    // SAFETY: zeroed sched_param is valid; only the priority field is used
    let mut param: libc::sched_param = unsafe { mem::zeroed() };
    param.sched_priority = priority;
    let ret = unsafe { libc::pthread_setschedparam(libc::pthread_self(), policy.native(), &param) };
    check_ret("pthread_setschedparam", ret)?;
    debug!(policy = %policy, priority, "calling thread rescheduled");
    Ok(())
}
