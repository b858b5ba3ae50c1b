/*!
 * Scheduler Types
 * Policies, priority schemes and priority ranges
 */

use crate::core::errors::{SchedError, SchedResult};
use nix::libc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Native thread scheduling policy
///
/// Mapped to the OS constant only at the syscall boundary via [`SchedPolicy::native`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedPolicy {
    /// Completely fair time sharing (`SCHED_OTHER`)
    FairShare,
    /// Real-time first-in first-out (`SCHED_FIFO`)
    Fifo,
    /// Real-time round-robin with a fixed time slice (`SCHED_RR`)
    RoundRobin,
}

impl SchedPolicy {
    pub const ALL: [SchedPolicy; 3] = [Self::FairShare, Self::Fifo, Self::RoundRobin];

    #[inline]
    #[must_use]
    pub const fn native(self) -> libc::c_int {
        match self {
            Self::FairShare => libc::SCHED_OTHER,
            Self::Fifo => libc::SCHED_FIFO,
            Self::RoundRobin => libc::SCHED_RR,
        }
    }

    #[must_use]
    pub const fn from_native(policy: libc::c_int) -> Option<Self> {
        match policy {
            libc::SCHED_OTHER => Some(Self::FairShare),
            libc::SCHED_FIFO => Some(Self::Fifo),
            libc::SCHED_RR => Some(Self::RoundRobin),
            _ => None,
        }
    }

    /// Console label (`CFS`, `FIFO`, `RR`)
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FairShare => "CFS",
            Self::Fifo => "FIFO",
            Self::RoundRobin => "RR",
        }
    }

    /// FIFO and RR are preemptive by priority; CFS has a single level
    #[inline(always)]
    #[must_use]
    pub const fn is_realtime(self) -> bool {
        !matches!(self, Self::FairShare)
    }
}

impl fmt::Display for SchedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rule that turns a worker identity into a priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityScheme {
    /// Every worker at the lowest priority
    Parallel,
    /// Worker 0 highest, priority falls as identity grows
    Ascending,
    /// Worker 0 lowest, priority rises as identity grows
    Descending,
    /// Odd identities one level above even ones
    Odds,
}

impl PriorityScheme {
    pub const ALL: [PriorityScheme; 4] = [
        Self::Parallel,
        Self::Ascending,
        Self::Descending,
        Self::Odds,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Parallel => "PARALLEL",
            Self::Ascending => "ASCENDING",
            Self::Descending => "DESCENDING",
            Self::Odds => "ODDS",
        }
    }
}

impl fmt::Display for PriorityScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inclusive priority bounds for a policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityRange {
    pub min: i32,
    pub max: i32,
}

impl PriorityRange {
    /// Query the OS bounds for `policy`
    pub fn for_policy(policy: SchedPolicy) -> SchedResult<Self> {
        Self::for_native(policy.native())
    }

    /// Query the OS bounds for a raw policy value
    pub fn for_native(policy: libc::c_int) -> SchedResult<Self> {
        // SAFETY: plain queries without pointers
        let min = unsafe { libc::sched_get_priority_min(policy) };
        if min == -1 {
            return Err(SchedError::last("sched_get_priority_min"));
        }
        let max = unsafe { libc::sched_get_priority_max(policy) };
        if max == -1 {
            return Err(SchedError::last("sched_get_priority_max"));
        }
        Ok(Self { min, max })
    }

    #[inline]
    #[must_use]
    pub const fn contains(&self, priority: i32) -> bool {
        priority >= self.min && priority <= self.max
    }

    /// Number of distinct levels
    #[inline]
    #[must_use]
    pub const fn levels(&self) -> usize {
        (self.max - self.min + 1) as usize
    }
}
