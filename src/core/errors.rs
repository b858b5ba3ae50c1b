/*!
 * Error Types
 * Scheduling syscall failures with thiserror and miette support
 */

use miette::Diagnostic;
use nix::errno::Errno;
use thiserror::Error;

/// Scheduling operation result
///
/// # Must Use
/// Every scheduling call can fail and the failure is fatal for the run
pub type SchedResult<T> = Result<T, SchedError>;

/// Failure of a scheduling-related OS call
///
/// Covers attribute lifecycle, affinity, policy/priority queries and
/// mutations, thread creation and join. There is no other error kind.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Diagnostic)]
pub enum SchedError {
    #[error("{operation} failed: {errno}")]
    #[diagnostic(
        code(sched::syscall_failed),
        help("Real-time policies need root or CAP_SYS_NICE, and priorities must fit the policy's range.")
    )]
    Syscall {
        operation: &'static str,
        errno: Errno,
    },
}

impl SchedError {
    #[inline]
    #[must_use]
    pub const fn syscall(operation: &'static str, errno: Errno) -> Self {
        Self::Syscall { operation, errno }
    }

    /// Build from the current thread's `errno`
    #[must_use]
    pub fn last(operation: &'static str) -> Self {
        Self::syscall(operation, Errno::last())
    }

    /// Name of the failing OS call
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Syscall { operation, .. } => operation,
        }
    }

    #[must_use]
    pub const fn errno(&self) -> Errno {
        match self {
            Self::Syscall { errno, .. } => *errno,
        }
    }

    /// Single console line describing the failure
    ///
    /// Format: `* syscall error * <op> ret=[<n>] [<description>]`
    #[must_use]
    pub fn diagnostic_line(&self) -> String {
        let errno = self.errno();
        format!(
            "* syscall error * {} ret=[{}] [{}]",
            self.operation(),
            errno as i32,
            errno.desc()
        )
    }
}

/// Map a pthread-style return code (0 or an error number) to a result
#[inline]
pub fn check_ret(operation: &'static str, ret: i32) -> SchedResult<()> {
    if ret == 0 {
        Ok(())
    } else {
        Err(SchedError::syscall(operation, Errno::from_raw(ret)))
    }
}
