/*!
 * Thread Attributes
 *
 * Type-state wrapper over `pthread_attr_t`. Composition order is enforced
 * by the type system:
 * 1. `ThreadAttr::new()`                -> `ThreadAttr<Initialized>`
 * 2. `.explicit_sched()`                -> `ThreadAttr<ExplicitSched>`
 * 3. `.with_policy(policy)`             -> `ThreadAttr<Configured>`
 * 4. `.set_priority(p)` then `.spawn()` -- repeated per worker
 *
 * Only a `Configured` attribute can create threads.
 */

use super::thread::NativeThread;
use crate::core::errors::{check_ret, SchedResult};
use crate::scheduler::SchedPolicy;
use nix::libc;
use std::ffi::c_void;
use std::marker::PhantomData;
use std::mem::{self, ManuallyDrop};
use std::panic::{self, AssertUnwindSafe};
use std::ptr;
use tracing::warn;

/// Marker trait for attribute construction states
pub trait AttrState {
    fn state_name() -> &'static str;
}

/// Default-initialized
pub struct Initialized;
/// Scheduling parameters are taken from the attribute, not inherited
pub struct ExplicitSched;
/// Policy set; ready to receive priorities and create threads
pub struct Configured;

impl AttrState for Initialized {
    fn state_name() -> &'static str {
        "initialized"
    }
}

impl AttrState for ExplicitSched {
    fn state_name() -> &'static str {
        "explicit_sched"
    }
}

impl AttrState for Configured {
    fn state_name() -> &'static str {
        "configured"
    }
}

/// Owned `pthread_attr_t`, destroyed on drop or via [`ThreadAttr::destroy`]
pub struct ThreadAttr<S: AttrState> {
    // Boxed so the initialized object never moves
    raw: Box<libc::pthread_attr_t>,
    policy: Option<SchedPolicy>,
    priority: Option<i32>,
    destroyed: bool,
    _state: PhantomData<S>,
}

impl ThreadAttr<Initialized> {
    /// `pthread_attr_init`
    pub fn new() -> SchedResult<Self> {
        // SAFETY: pthread_attr_init fully initializes the zeroed storage
        let mut raw: Box<libc::pthread_attr_t> = Box::new(unsafe { mem::zeroed() });
        check_ret("pthread_attr_init", unsafe { libc::pthread_attr_init(&mut *raw) })?;
        Ok(Self {
            raw,
            policy: None,
            priority: None,
            destroyed: false,
            _state: PhantomData,
        })
    }

    /// `pthread_attr_setinheritsched(PTHREAD_EXPLICIT_SCHED)`
    ///
    /// Without this the policy and priority below are ignored at creation.
    pub fn explicit_sched(mut self) -> SchedResult<ThreadAttr<ExplicitSched>> {
        let ret = unsafe {
            libc::pthread_attr_setinheritsched(&mut *self.raw, libc::PTHREAD_EXPLICIT_SCHED)
        };
        check_ret("pthread_attr_setinheritsched", ret)?;
        Ok(self.transition())
    }
}

impl ThreadAttr<ExplicitSched> {
    /// `pthread_attr_setschedpolicy`
    pub fn with_policy(mut self, policy: SchedPolicy) -> SchedResult<ThreadAttr<Configured>> {
        let ret = unsafe { libc::pthread_attr_setschedpolicy(&mut *self.raw, policy.native()) };
        check_ret("pthread_attr_setschedpolicy", ret)?;
        self.policy = Some(policy);
        Ok(self.transition())
    }
}

impl ThreadAttr<Configured> {
    /// `pthread_attr_setschedparam`; overwrites the previous priority
    pub fn set_priority(&mut self, priority: i32) -> SchedResult<()> {
        // SAFETY: zeroed sched_param is valid; only the priority field is used
        let mut param: libc::sched_param = unsafe { mem::zeroed() };
        param.sched_priority = priority;
        let ret = unsafe { libc::pthread_attr_setschedparam(&mut *self.raw, &param) };
        check_ret("pthread_attr_setschedparam", ret)?;
        self.priority = Some(priority);
        Ok(())
    }

    #[must_use]
    pub fn policy(&self) -> Option<SchedPolicy> {
        self.policy
    }

    #[must_use]
    pub fn priority(&self) -> Option<i32> {
        self.priority
    }

    /// `pthread_create` with the attribute's current contents
    ///
    /// The OS copies the attribute at the call, so later `set_priority`
    /// calls do not affect threads already created.
    pub fn spawn<F, T>(&self, f: F) -> SchedResult<NativeThread<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let payload = Box::into_raw(Box::new(f)).cast::<c_void>();
        let mut handle: libc::pthread_t = 0;

        let ret = unsafe {
            libc::pthread_create(&mut handle, &*self.raw, trampoline::<F, T>, payload)
        };
        if let Err(e) = check_ret("pthread_create", ret) {
            // SAFETY: the thread was not created, so the payload is still ours
            drop(unsafe { Box::from_raw(payload.cast::<F>()) });
            return Err(e);
        }

        Ok(NativeThread::from_raw(handle))
    }
}

impl<S: AttrState> ThreadAttr<S> {
    fn transition<N: AttrState>(self) -> ThreadAttr<N> {
        let this = ManuallyDrop::new(self);
        // SAFETY: `this` is never dropped, so the box is moved out exactly once
        let raw = unsafe { ptr::read(&this.raw) };
        ThreadAttr {
            raw,
            policy: this.policy,
            priority: this.priority,
            destroyed: false,
            _state: PhantomData,
        }
    }

    #[must_use]
    pub fn state_name(&self) -> &'static str {
        S::state_name()
    }

    /// `pthread_attr_destroy`, reporting failure
    pub fn destroy(mut self) -> SchedResult<()> {
        self.destroyed = true;
        check_ret("pthread_attr_destroy", unsafe {
            libc::pthread_attr_destroy(&mut *self.raw)
        })
    }
}

impl<S: AttrState> Drop for ThreadAttr<S> {
    fn drop(&mut self) {
        if self.destroyed {
            return;
        }
        let ret = unsafe { libc::pthread_attr_destroy(&mut *self.raw) };
        if ret != 0 {
            warn!(state = S::state_name(), ret, "pthread_attr_destroy failed on drop");
        }
    }
}

/// Entry point handed to `pthread_create`
///
/// Owns the boxed closure and returns a boxed `thread::Result<T>` that
/// [`NativeThread::join`] reclaims. Panics are caught so they never unwind
/// across the C boundary.
extern "C" fn trampoline<F, T>(payload: *mut c_void) -> *mut c_void
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    // SAFETY: payload came from Box::into_raw in spawn and is consumed once
    let f = unsafe { Box::from_raw(payload.cast::<F>()) };
    let outcome: std::thread::Result<T> = panic::catch_unwind(AssertUnwindSafe(move || f()));
    Box::into_raw(Box::new(outcome)).cast::<c_void>()
}
