//! Engine ABI seam and the scoped response buffer
//!
//! [`EngineAbi`] is the only place raw engine pointers appear. Everything
//! above it works with [`EngineBuffer`], which releases its pointer exactly
//! once on drop.

#![allow(unsafe_code)]

use std::ffi::{CStr, c_char};
use std::fmt;
use std::ptr::NonNull;

/// The two entry points exported by a bridge engine
///
/// Implementations must be callable from any thread; the gateway does not
/// serialize calls.
///
/// # Safety
///
/// [`EngineBuffer`] reads and releases whatever [`EngineAbi::run`] returns,
/// so implementors guarantee that `run` returns either null or a pointer to
/// a live, NUL-terminated buffer that stays valid until it is passed to
/// [`EngineAbi::release`] on the same engine, which must accept it exactly
/// once.
///
/// A safe implementation is rejected:
///
/// ```compile_fail,E0200
/// use std::ffi::{CStr, c_char};
///
/// use integration_whatsapp::EngineAbi;
///
/// struct Dangling;
///
/// impl EngineAbi for Dangling {
///     fn run(&self, _: &CStr, _: &CStr, _: &CStr) -> *mut c_char {
///         0x10 as *mut c_char
///     }
///
///     unsafe fn release(&self, _: *mut c_char) {}
/// }
/// ```
pub unsafe trait EngineAbi: Send + Sync {
    /// Run one request and return the engine-allocated, NUL-terminated
    /// response, or null when the engine produced nothing
    fn run(&self, db_uri: &CStr, account: &CStr, payload: &CStr) -> *mut c_char;

    /// Hand a response buffer back to the engine
    ///
    /// # Safety
    ///
    /// `ptr` must be non-null, must have been returned by [`EngineAbi::run`]
    /// on this same engine, and must not have been released before. It must
    /// not be dereferenced afterwards.
    unsafe fn release(&self, ptr: *mut c_char);
}

/// Owned engine response
///
/// Holds a non-null pointer returned by [`EngineAbi::run`]. The buffer is
/// neither `Clone` nor `Copy`, and `Drop` releases it, so every acquired
/// pointer is released once and only once.
pub struct EngineBuffer<'e, E: EngineAbi + ?Sized> {
    engine: &'e E,
    ptr: NonNull<c_char>,
}

impl<'e, E: EngineAbi + ?Sized> EngineBuffer<'e, E> {
    /// Call the engine and take ownership of its response
    ///
    /// Returns `None` when the engine returned null; there is nothing to
    /// release in that case.
    pub fn invoke(engine: &'e E, db_uri: &CStr, account: &CStr, payload: &CStr) -> Option<Self> {
        let ptr = engine.run(db_uri, account, payload);
        // SAFETY: `ptr` was just returned by `run` on `engine`, which the
        // `EngineAbi` contract makes null or a live buffer, and it has not
        // been handed to anyone else.
        unsafe { Self::acquire(engine, ptr) }
    }

    /// Wrap a pointer returned by `engine.run`
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a live response from `engine.run` that nothing
    /// else will release.
    unsafe fn acquire(engine: &'e E, ptr: *mut c_char) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self { engine, ptr })
    }

    /// Response contents without the trailing NUL
    pub fn bytes(&self) -> &[u8] {
        // SAFETY: the pointer is non-null, and the `EngineAbi` contract
        // makes it NUL-terminated and valid until `self` releases it.
        unsafe { CStr::from_ptr(self.ptr.as_ptr()) }.to_bytes()
    }
}

impl<E: EngineAbi + ?Sized> Drop for EngineBuffer<'_, E> {
    fn drop(&mut self) {
        // SAFETY: the pointer came from `run` on this engine, and `Drop`
        // runs at most once for a value that cannot be cloned.
        unsafe { self.engine.release(self.ptr.as_ptr()) }
    }
}

impl<E: EngineAbi + ?Sized> fmt::Debug for EngineBuffer<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineBuffer")
            .field("ptr", &self.ptr)
            .field("len", &self.bytes().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TrackingEngine;

    fn cstr(s: &str) -> std::ffi::CString {
        std::ffi::CString::new(s).unwrap()
    }

    #[test]
    fn null_response_yields_no_buffer() {
        let engine = TrackingEngine::returning_null();
        let buffer = EngineBuffer::invoke(&engine, &cstr("db"), &cstr("1"), &cstr(""));
        assert!(buffer.is_none());
        assert_eq!(engine.release_count(), 0);
        assert_eq!(engine.outstanding(), 0);
    }

    #[test]
    fn buffer_exposes_contents_without_nul() {
        let engine = TrackingEngine::responding(r#"{"status":"ok"}"#);
        let buffer = EngineBuffer::invoke(&engine, &cstr("db"), &cstr("1"), &cstr("")).unwrap();
        assert_eq!(buffer.bytes(), br#"{"status":"ok"}"#);
        assert_eq!(engine.outstanding(), 1);
    }

    #[test]
    fn drop_releases_once() {
        let engine = TrackingEngine::responding("x");
        {
            let _buffer =
                EngineBuffer::invoke(&engine, &cstr("db"), &cstr("1"), &cstr("")).unwrap();
            assert_eq!(engine.release_count(), 0);
        }
        assert_eq!(engine.release_count(), 1);
        assert_eq!(engine.outstanding(), 0);
    }

    #[test]
    fn each_buffer_is_released_independently() {
        let engine = TrackingEngine::responding("x");
        let first = EngineBuffer::invoke(&engine, &cstr("db"), &cstr("1"), &cstr("")).unwrap();
        let second = EngineBuffer::invoke(&engine, &cstr("db"), &cstr("1"), &cstr("")).unwrap();
        assert_eq!(engine.outstanding(), 2);
        drop(first);
        assert_eq!(engine.outstanding(), 1);
        drop(second);
        assert_eq!(engine.outstanding(), 0);
        assert_eq!(engine.release_count(), 2);
    }

    #[test]
    fn buffer_is_released_during_unwind() {
        let engine = TrackingEngine::responding("x");
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _buffer =
                EngineBuffer::invoke(&engine, &cstr("db"), &cstr("1"), &cstr("")).unwrap();
            panic!("decoder blew up");
        }));
        assert!(outcome.is_err());
        assert_eq!(engine.release_count(), 1);
        assert_eq!(engine.outstanding(), 0);
    }

    #[test]
    fn debug_shows_length() {
        let engine = TrackingEngine::responding("abc");
        let buffer = EngineBuffer::invoke(&engine, &cstr("db"), &cstr("1"), &cstr("")).unwrap();
        assert!(format!("{buffer:?}").contains("len: 3"));
    }
}
