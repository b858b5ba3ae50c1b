/*!
 * Native Threads
 * Join handle for threads created through `pthread_create`
 */

use crate::core::errors::{check_ret, SchedResult};
use nix::libc;
use std::ffi::c_void;
use std::marker::PhantomData;
use std::panic;
use std::ptr;
use tracing::warn;

/// Handle to a native thread producing a `T`
///
/// Joining hands back the value the thread returned. A handle dropped
/// without joining detaches the thread.
pub struct NativeThread<T> {
    handle: libc::pthread_t,
    joined: bool,
    _result: PhantomData<fn() -> T>,
}

impl<T> NativeThread<T> {
    pub(crate) fn from_raw(handle: libc::pthread_t) -> Self {
        Self {
            handle,
            joined: false,
            _result: PhantomData,
        }
    }

    /// Native handle value, as printed in scheduling snapshots
    #[inline]
    #[must_use]
    pub fn id(&self) -> u64 {
        self.handle as u64
    }

    /// `pthread_join`, then reclaim the thread's result
    ///
    /// A panic inside the thread is resumed on the joining thread.
    pub fn join(mut self) -> SchedResult<T> {
        let mut ret: *mut c_void = ptr::null_mut();
        check_ret("pthread_join", unsafe { libc::pthread_join(self.handle, &mut ret) })?;
        self.joined = true;

        // SAFETY: the trampoline returns a Box<thread::Result<T>> for this T
        let outcome = unsafe { Box::from_raw(ret.cast::<std::thread::Result<T>>()) };
        match *outcome {
            Ok(value) => Ok(value),
            Err(payload) => panic::resume_unwind(payload),
        }
    }
}

impl<T> Drop for NativeThread<T> {
    fn drop(&mut self) {
        if self.joined {
            return;
        }
        let ret = unsafe { libc::pthread_detach(self.handle) };
        if ret != 0 {
            warn!(thread = self.handle as u64, ret, "pthread_detach failed");
        }
    }
}
