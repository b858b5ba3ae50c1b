/*!
 * Scheduling Info Reporter
 * Snapshot of the calling thread's scheduling state
 */

use super::params::{current_params, current_thread_id};
use super::types::{PriorityRange, SchedPolicy};
use crate::core::errors::{SchedError, SchedResult};
use nix::libc;
use serde::Serialize;
use std::fmt;
use std::mem;
use std::time::Duration;

/// Scheduling state of one thread at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SchedSnapshot {
    pub thread_id: u64,
    /// Native policy value as reported by the OS
    pub policy: libc::c_int,
    pub min_priority: i32,
    pub max_priority: i32,
    /// Process-level round-robin slice; reported under every policy
    pub timeslice_ms: u64,
    pub priority: i32,
}

impl SchedSnapshot {
    /// Capture the calling thread's state
    ///
    /// Fails as a whole; no partial snapshot is returned.
    pub fn current() -> SchedResult<Self> {
        let thread_id = current_thread_id();
        let params = current_params()?;
        let range = PriorityRange::for_native(params.policy)?;
        let timeslice = rr_interval()?;

        Ok(Self {
            thread_id,
            policy: params.policy,
            min_priority: range.min,
            max_priority: range.max,
            timeslice_ms: timeslice.as_millis() as u64,
            priority: params.priority,
        })
    }

    #[must_use]
    pub const fn known_policy(&self) -> Option<SchedPolicy> {
        SchedPolicy::from_native(self.policy)
    }

    #[must_use]
    pub fn policy_name(&self) -> String {
        match self.known_policy() {
            Some(policy) => policy.name().to_string(),
            None => format!("UNKNOWN({})", self.policy),
        }
    }
}

impl fmt::Display for SchedSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Thread Handle=[{}] Policy=[{}] MinPrio=[{}] MaxPrio=[{}] TmSlice=[{} ms] SetPrio=[{}] ",
            self.thread_id,
            self.policy_name(),
            self.min_priority,
            self.max_priority,
            self.timeslice_ms,
            self.priority
        )
    }
}

/// Round-robin interval of the calling process
pub fn rr_interval() -> SchedResult<Duration> {
    // SAFETY: zeroed timespec is a valid out-parameter
    let mut ts: libc::timespec = unsafe { mem::zeroed() };
    let ret = unsafe { libc::sched_rr_get_interval(0, &mut ts) };
    if ret != 0 {
        return Err(SchedError::last("sched_rr_get_interval"));
    }
    Ok(Duration::new(ts.tv_sec as u64, ts.tv_nsec as u32))
}
