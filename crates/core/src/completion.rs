//! Single-use completion trampolines for asynchronous SDK calls
//!
//! Every asynchronous call registers its completion closure under a fresh
//! [`RequestId`] and passes only that id as `callback_data`. When the
//! library invokes the trampoline, the id is looked up in the registries of
//! the cores currently active on this thread and removed; the closure is
//! moved out and called once. A second invocation with the same id finds
//! nothing and is logged and ignored, so nothing is released twice.
//!
//! A core is "active" while it issues a call or drains callbacks, which are
//! the only times the library invokes trampolines.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::{c_char, c_void};
use std::fmt;
use std::marker::PhantomData;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};

use dgs_sdk as sdk;

use crate::error::{check, Error, Result};
use crate::ffi;
use crate::model::{ImageHandle, Lobby, Model, OAuth2Token, User};

/// Completion closure for an operation producing `T`
type Completion<T> = Box<dyn FnOnce(Result<T>)>;

/// Ids are unique per process so registries of different cores never clash
static NEXT_REQUEST_ID: AtomicUsize = AtomicUsize::new(1);

thread_local! {
    static ACTIVE: RefCell<Vec<*const PendingCompletions>> = const { RefCell::new(Vec::new()) };
}

/// Identifies one in-flight asynchronous call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(usize);

impl RequestId {
    fn next() -> Self {
        Self(NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Encode as the opaque `callback_data` pointer
    pub(crate) fn as_callback_data(self) -> *mut c_void {
        self.0 as *mut c_void
    }

    pub(crate) fn from_callback_data(data: *mut c_void) -> Self {
        Self(data as usize)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Pending {
    operation: &'static str,
    completion: Box<dyn Any>,
}

/// Registry of completions that have been issued but not yet fired
#[derive(Default)]
pub(crate) struct PendingCompletions {
    slots: RefCell<HashMap<RequestId, Pending>>,
}

impl PendingCompletions {
    /// Register a completion. It stays owned here until it fires or is cancelled.
    pub fn register<T: 'static>(
        &self,
        operation: &'static str,
        completion: impl FnOnce(Result<T>) + 'static,
    ) -> RequestId {
        let id = RequestId::next();
        let completion: Completion<T> = Box::new(completion);
        self.slots.borrow_mut().insert(
            id,
            Pending {
                operation,
                completion: Box::new(completion),
            },
        );
        tracing::trace!("Registered completion {} for {}", id, operation);
        id
    }

    /// Drop a completion whose native call was never made
    pub fn cancel(&self, id: RequestId) -> bool {
        self.slots.borrow_mut().remove(&id).is_some()
    }

    fn take(&self, id: RequestId) -> Option<Pending> {
        self.slots.borrow_mut().remove(&id)
    }

    fn contains(&self, id: RequestId) -> bool {
        self.slots.borrow().contains_key(&id)
    }

    /// Number of completions still waiting
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    /// Drop every waiting completion without calling it, returning how many there were
    pub fn clear(&self) -> usize {
        let drained: Vec<_> = self.slots.borrow_mut().drain().collect();
        for (id, pending) in &drained {
            tracing::debug!("Dropping completion {} for {} that never fired", id, pending.operation);
        }
        drained.len()
    }

    /// Register `completion`, then perform `call` with its `callback_data`
    /// while this registry is active. If `call` fails the completion is
    /// dropped and the error returned instead.
    pub fn issue<T: 'static>(
        &self,
        operation: &'static str,
        completion: impl FnOnce(Result<T>) + 'static,
        call: impl FnOnce(*mut c_void) -> Result<()>,
    ) -> Result<()> {
        let id = self.register(operation, completion);
        let _scope = ActiveScope::enter(self);
        if let Err(e) = call(id.as_callback_data()) {
            self.cancel(id);
            return Err(e);
        }
        Ok(())
    }
}

/// Marks a registry as active on this thread until dropped
pub(crate) struct ActiveScope<'a> {
    _pending: PhantomData<&'a PendingCompletions>,
}

impl<'a> ActiveScope<'a> {
    pub fn enter(pending: &'a PendingCompletions) -> Self {
        ACTIVE.with(|stack| stack.borrow_mut().push(pending as *const _));
        Self {
            _pending: PhantomData,
        }
    }
}

impl Drop for ActiveScope<'_> {
    fn drop(&mut self) {
        ACTIVE.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Remove the completion for `id` from whichever active registry holds it
fn take_active(id: RequestId) -> Option<Pending> {
    let stack: Vec<*const PendingCompletions> = ACTIVE.with(|stack| stack.borrow().clone());
    stack.iter().rev().find_map(|&registry| {
        // SAFETY: a registry is only on the stack while its ActiveScope
        // borrow is alive
        let registry = unsafe { &*registry };
        if registry.contains(id) {
            registry.take(id)
        } else {
            None
        }
    })
}

/// Route a fired trampoline to its completion
fn deliver<T: 'static>(callback_data: *mut c_void, outcome: impl FnOnce() -> Result<T>) {
    let id = RequestId::from_callback_data(callback_data);
    let Some(pending) = take_active(id) else {
        tracing::warn!("Completion {} fired but is not pending, ignoring", id);
        return;
    };

    let operation = pending.operation;
    let completion = match pending.completion.downcast::<Completion<T>>() {
        Ok(completion) => completion,
        Err(_) => {
            tracing::error!("Completion {} for {} has the wrong payload type", id, operation);
            return;
        }
    };

    tracing::trace!("Firing completion {} for {}", id, operation);
    let result = outcome();
    if catch_unwind(AssertUnwindSafe(move || completion(result))).is_err() {
        tracing::error!("Completion for {} panicked", operation);
    }
}

/// Copy a record argument, failing if the library passed null on success
unsafe fn copy_record<M: Model>(ptr: *const M::Raw, what: &'static str) -> Result<M> {
    M::copy_from_ptr(ptr).ok_or(Error::NullPointer(what))
}

// === Trampolines, one per callback signature ===

pub(crate) unsafe extern "C" fn on_result(callback_data: *mut c_void, result: sdk::EDiscordResult) {
    deliver::<()>(callback_data, || check(result));
}

pub(crate) unsafe extern "C" fn on_user(
    callback_data: *mut c_void,
    result: sdk::EDiscordResult,
    user: *mut sdk::DiscordUser,
) {
    deliver::<User>(callback_data, || {
        check(result)?;
        copy_record(user, "user")
    });
}

pub(crate) unsafe extern "C" fn on_lobby(
    callback_data: *mut c_void,
    result: sdk::EDiscordResult,
    lobby: *mut sdk::DiscordLobby,
) {
    deliver::<Lobby>(callback_data, || {
        check(result)?;
        copy_record(lobby, "lobby")
    });
}

pub(crate) unsafe extern "C" fn on_oauth2_token(
    callback_data: *mut c_void,
    result: sdk::EDiscordResult,
    token: *mut sdk::DiscordOAuth2Token,
) {
    deliver::<OAuth2Token>(callback_data, || {
        check(result)?;
        copy_record(token, "oauth2 token")
    });
}

pub(crate) unsafe extern "C" fn on_ticket(
    callback_data: *mut c_void,
    result: sdk::EDiscordResult,
    data: *const c_char,
) {
    deliver::<String>(callback_data, || {
        check(result)?;
        Ok(ffi::string_from_ptr(data))
    });
}

pub(crate) unsafe extern "C" fn on_image_handle(
    callback_data: *mut c_void,
    result: sdk::EDiscordResult,
    handle: sdk::DiscordImageHandle,
) {
    deliver::<ImageHandle>(callback_data, || {
        check(result)?;
        Ok(ImageHandle::from_raw(handle))
    });
}

pub(crate) unsafe extern "C" fn on_data(
    callback_data: *mut c_void,
    result: sdk::EDiscordResult,
    data: *mut u8,
    data_length: u32,
) {
    deliver::<Vec<u8>>(callback_data, || {
        check(result)?;
        Ok(ffi::bytes_from_ptr(data, data_length))
    });
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::error::SdkError;

    #[test]
    fn test_fires_once() {
        let pending = PendingCompletions::default();
        let calls = Rc::new(Cell::new(0));

        let counter = calls.clone();
        let id = pending.register::<()>("test", move |result| {
            assert!(result.is_ok());
            counter.set(counter.get() + 1);
        });
        assert_eq!(pending.len(), 1);

        {
            let _scope = ActiveScope::enter(&pending);
            unsafe {
                on_result(id.as_callback_data(), sdk::DiscordResult_Ok);
                on_result(id.as_callback_data(), sdk::DiscordResult_Ok);
            }
        }

        assert_eq!(calls.get(), 1);
        assert_eq!(pending.len(), 0);
    }

    #[test]
    fn test_ignored_outside_scope() {
        let pending = PendingCompletions::default();
        let fired = Rc::new(Cell::new(false));

        let flag = fired.clone();
        let id = pending.register::<()>("test", move |_| flag.set(true));
        unsafe { on_result(id.as_callback_data(), sdk::DiscordResult_Ok) };

        assert!(!fired.get());
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn test_error_status_reaches_completion() {
        let pending = PendingCompletions::default();
        let seen = Rc::new(Cell::new(None));

        let slot = seen.clone();
        let id = pending.register::<User>("get_user", move |result| {
            slot.set(result.err().and_then(|e| e.sdk_error()));
        });
        {
            let _scope = ActiveScope::enter(&pending);
            unsafe {
                on_user(
                    id.as_callback_data(),
                    sdk::DiscordResult_NotFound,
                    std::ptr::null_mut(),
                )
            };
        }
        assert_eq!(seen.get(), Some(SdkError::NotFound));
    }

    #[test]
    fn test_payload_is_copied() {
        let pending = PendingCompletions::default();
        let seen = Rc::new(Cell::new(0));

        let slot = seen.clone();
        let id = pending.register::<Lobby>("create_lobby", move |result| {
            slot.set(result.unwrap().id());
        });

        let mut raw = sdk::DiscordLobby::default();
        raw.id = 55;
        {
            let _scope = ActiveScope::enter(&pending);
            unsafe { on_lobby(id.as_callback_data(), sdk::DiscordResult_Ok, &mut raw) };
        }
        assert_eq!(seen.get(), 55);
    }

    #[test]
    fn test_issue_cancels_on_failed_call() {
        let pending = PendingCompletions::default();
        let result = pending.issue::<()>("test", |_| panic!("must not fire"), |_| {
            Err(Error::MissingEntry("test"))
        });
        assert!(matches!(result, Err(Error::MissingEntry("test"))));
        assert_eq!(pending.len(), 0);
    }

    #[test]
    fn test_clear_drops_without_calling() {
        let pending = PendingCompletions::default();
        pending.register::<()>("a", |_| panic!("must not fire"));
        pending.register::<()>("b", |_| panic!("must not fire"));
        assert_eq!(pending.clear(), 2);
        assert_eq!(pending.len(), 0);
    }

    #[test]
    fn test_request_ids_are_unique() {
        let pending = PendingCompletions::default();
        let a = pending.register::<()>("a", |_| {});
        let b = pending.register::<()>("b", |_| {});
        assert_ne!(a, b);
        assert!(!a.as_callback_data().is_null());
    }
}
