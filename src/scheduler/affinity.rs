/*!
 * CPU Affinity
 * Narrow execution to a single core so the scheduler's ordering is visible
 */

use crate::core::errors::{SchedError, SchedResult};
use log::{debug, info};
use nix::errno::Errno;
use nix::sched::{sched_getaffinity, sched_setaffinity, CpuSet};
use nix::unistd::Pid;

/// Lowest CPU in the calling thread's allowed set
pub fn first_allowed_cpu() -> SchedResult<usize> {
    let allowed = sched_getaffinity(Pid::from_raw(0))
        .map_err(|e| SchedError::syscall("sched_getaffinity", e))?;

    (0..CpuSet::count())
        .find(|&cpu| allowed.is_set(cpu).unwrap_or(false))
        .ok_or(SchedError::syscall("sched_getaffinity", Errno::EINVAL))
}

/// Restrict the calling thread to one core and return its index
///
/// Threads created afterwards inherit the mask. The previous mask is not
/// restored.
pub fn pin_to_single_cpu() -> SchedResult<usize> {
    let cpu = first_allowed_cpu()?;

    let mut set = CpuSet::new();
    set.set(cpu)
        .map_err(|e| SchedError::syscall("sched_setaffinity", e))?;
    sched_setaffinity(Pid::from_raw(0), &set)
        .map_err(|e| SchedError::syscall("sched_setaffinity", e))?;

    debug!("Affinity mask narrowed to CPU {}", cpu);
    info!("Execution pinned to a single core (CPU {})", cpu);
    Ok(cpu)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_allowed_cpu_is_in_mask() {
        let cpu = first_allowed_cpu().unwrap();
        let allowed = sched_getaffinity(Pid::from_raw(0)).unwrap();
        assert!(allowed.is_set(cpu).unwrap());
    }

    #[test]
    fn test_pin_on_fresh_thread() {
        // Run on a scratch thread so the test harness keeps its own mask
        let (cpu, mask) = std::thread::spawn(|| {
            let cpu = pin_to_single_cpu().unwrap();
            (cpu, sched_getaffinity(Pid::from_raw(0)).unwrap())
        })
        .join()
        .unwrap();

        let pinned: Vec<usize> = (0..CpuSet::count())
            .filter(|&c| mask.is_set(c).unwrap_or(false))
            .collect();
        assert_eq!(pinned, vec![cpu]);
    }
}
