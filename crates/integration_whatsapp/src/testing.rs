//! In-process engine double for tests
//!
//! [`TrackingEngine`] allocates its responses with `CString::into_raw` and
//! keeps a ledger of live pointers. Releasing a pointer it did not hand out,
//! or releasing one twice, panics, so double frees and foreign frees surface
//! as test failures instead of heap corruption.

#![allow(unsafe_code, clippy::expect_used, clippy::panic)]

use std::collections::HashSet;
use std::ffi::{CStr, CString, c_char};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::engine::EngineAbi;

/// Arguments of one recorded engine call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCall {
    /// Connection URI as received
    pub db_uri: String,
    /// Account phone as received
    pub account: String,
    /// Payload as received (empty for "no command")
    pub payload: String,
}

type Responder = Box<dyn Fn(&EngineCall) -> Option<Vec<u8>> + Send + Sync>;

/// Engine double that records calls and audits buffer releases
pub struct TrackingEngine {
    responder: Responder,
    calls: Mutex<Vec<EngineCall>>,
    live: Mutex<HashSet<usize>>,
    allocations: AtomicUsize,
    releases: AtomicUsize,
}

impl TrackingEngine {
    /// Engine that computes its response from the call
    ///
    /// Returning `None` simulates a null pointer.
    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&EngineCall) -> Option<Vec<u8>> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
            live: Mutex::new(HashSet::new()),
            allocations: AtomicUsize::new(0),
            releases: AtomicUsize::new(0),
        }
    }

    /// Engine that always answers with `response`
    pub fn responding(response: impl Into<String>) -> Self {
        let response = response.into();
        Self::with_responder(move |_| Some(response.clone().into_bytes()))
    }

    /// Engine that always answers with raw bytes (need not be UTF-8)
    pub fn responding_bytes(response: Vec<u8>) -> Self {
        Self::with_responder(move |_| Some(response.clone()))
    }

    /// Engine that always returns null
    pub fn returning_null() -> Self {
        Self::with_responder(|_| None)
    }

    /// Calls received so far
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().clone()
    }

    /// Number of non-null responses handed out
    pub fn allocation_count(&self) -> usize {
        self.allocations.load(Ordering::SeqCst)
    }

    /// Number of responses released
    pub fn release_count(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    /// Responses handed out but not yet released
    pub fn outstanding(&self) -> usize {
        self.live.lock().len()
    }
}

// SAFETY: `run` returns null or a fresh `CString::into_raw` pointer that
// stays live in the ledger until `release` reclaims it, and `release`
// refuses anything not in the ledger.
unsafe impl EngineAbi for TrackingEngine {
    fn run(&self, db_uri: &CStr, account: &CStr, payload: &CStr) -> *mut c_char {
        let call = EngineCall {
            db_uri: db_uri.to_string_lossy().into_owned(),
            account: account.to_string_lossy().into_owned(),
            payload: payload.to_string_lossy().into_owned(),
        };
        let response = (self.responder)(&call);
        self.calls.lock().push(call);

        let Some(bytes) = response else {
            return std::ptr::null_mut();
        };

        let ptr = CString::new(bytes)
            .expect("test response must not contain NUL bytes")
            .into_raw();
        self.live.lock().insert(ptr as usize);
        self.allocations.fetch_add(1, Ordering::SeqCst);
        ptr
    }

    unsafe fn release(&self, ptr: *mut c_char) {
        assert!(!ptr.is_null(), "release called with a null pointer");
        let was_live = self.live.lock().remove(&(ptr as usize));
        assert!(
            was_live,
            "double free or foreign pointer released: {ptr:p}"
        );
        // SAFETY: the ledger proves `ptr` came from `CString::into_raw` in
        // `run` and has not been reclaimed yet.
        drop(unsafe { CString::from_raw(ptr) });
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

impl fmt::Debug for TrackingEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackingEngine")
            .field("calls", &self.calls.lock().len())
            .field("allocations", &self.allocation_count())
            .field("releases", &self.release_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cstr(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    #[test]
    fn records_call_arguments() {
        let engine = TrackingEngine::responding("{}");
        let ptr = engine.run(&cstr("file:x.db"), &cstr("4912345678"), &cstr("{}"));
        unsafe { engine.release(ptr) };

        assert_eq!(
            engine.calls(),
            vec![EngineCall {
                db_uri: "file:x.db".to_string(),
                account: "4912345678".to_string(),
                payload: "{}".to_string(),
            }]
        );
    }

    #[test]
    fn null_response_allocates_nothing() {
        let engine = TrackingEngine::returning_null();
        let ptr = engine.run(&cstr(""), &cstr(""), &cstr(""));
        assert!(ptr.is_null());
        assert_eq!(engine.allocation_count(), 0);
    }

    #[test]
    #[should_panic(expected = "double free")]
    fn double_release_panics() {
        let engine = TrackingEngine::responding("{}");
        let ptr = engine.run(&cstr(""), &cstr(""), &cstr(""));
        unsafe {
            engine.release(ptr);
            engine.release(ptr);
        }
    }

    #[test]
    #[should_panic(expected = "foreign pointer")]
    fn foreign_release_panics() {
        let engine = TrackingEngine::responding("{}");
        let foreign = CString::new("not from engine").unwrap().into_raw();
        unsafe { engine.release(foreign) };
    }
}
