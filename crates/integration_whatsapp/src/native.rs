//! Engine loaded from a shared library at runtime

#![allow(unsafe_code)]

use std::ffi::{CStr, c_char};
use std::fmt;
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};
use tracing::{debug, info};

use crate::engine::EngineAbi;
use crate::error::GatewayError;

type RunFn = unsafe extern "C" fn(*const c_char, *const c_char, *const c_char) -> *mut c_char;
type FreeFn = unsafe extern "C" fn(*mut c_char);

/// Names of the exported engine functions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSymbols {
    /// Run entry point
    pub run: String,
    /// Free entry point
    pub free: String,
}

impl EngineSymbols {
    /// Default run symbol
    pub const DEFAULT_RUN: &'static str = "WaRun";
    /// Default free symbol
    pub const DEFAULT_FREE: &'static str = "WaFree";
}

impl Default for EngineSymbols {
    fn default() -> Self {
        Self {
            run: Self::DEFAULT_RUN.to_string(),
            free: Self::DEFAULT_FREE.to_string(),
        }
    }
}

/// Bridge engine backed by a dynamically loaded library
///
/// The library stays loaded for as long as the engine exists, which keeps
/// the resolved function pointers valid.
pub struct NativeEngine {
    run: RunFn,
    free: FreeFn,
    path: PathBuf,
    _library: Library,
}

impl NativeEngine {
    /// Load an engine exporting `WaRun` / `WaFree`
    ///
    /// # Safety
    ///
    /// Same contract as [`NativeEngine::load_with_symbols`].
    pub unsafe fn load(path: impl AsRef<Path>) -> Result<Self, GatewayError> {
        // SAFETY: forwarded to the caller.
        unsafe { Self::load_with_symbols(path, &EngineSymbols::default()) }
    }

    /// Load an engine with custom symbol names
    ///
    /// # Safety
    ///
    /// Loading runs the library's initialisers. `path` must point at a
    /// trusted engine build whose `symbols` have the C signatures
    /// `char *run(const char *, const char *, const char *)` and
    /// `void free(char *)`, where `run` returns null or a NUL-terminated
    /// buffer that `free` releases.
    pub unsafe fn load_with_symbols(
        path: impl AsRef<Path>,
        symbols: &EngineSymbols,
    ) -> Result<Self, GatewayError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GatewayError::library(format!(
                "shared library not found: {}",
                path.display()
            )));
        }

        // SAFETY: the caller vouches for the library's initialisers.
        let library = unsafe { Library::new(path) }.map_err(|e| {
            GatewayError::library(format!("failed to load {}: {e}", path.display()))
        })?;

        // SAFETY: the caller vouches for the exported signatures.
        let run = unsafe { resolve::<RunFn>(&library, &symbols.run) }?;
        // SAFETY: as above.
        let free = unsafe { resolve::<FreeFn>(&library, &symbols.free) }?;

        info!(
            path = %path.display(),
            run = %symbols.run,
            free = %symbols.free,
            "Bridge engine loaded"
        );

        Ok(Self {
            run,
            free,
            path: path.to_path_buf(),
            _library: library,
        })
    }

    /// Path the library was loaded from
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Look up `name` and copy the function pointer out of the symbol
///
/// # Safety
///
/// `T` must be the exact function pointer type of the exported symbol, and
/// the returned value must not outlive `library`.
unsafe fn resolve<T: Copy>(library: &Library, name: &str) -> Result<T, GatewayError> {
    // SAFETY: forwarded to the caller.
    let symbol: Symbol<'_, T> = unsafe { library.get(name.as_bytes()) }
        .map_err(|e| GatewayError::library(format!("missing symbol {name}: {e}")))?;
    debug!(symbol = name, "Resolved engine symbol");
    Ok(*symbol)
}

// SAFETY: the contract of `load_with_symbols` makes `run` return null or a
// NUL-terminated buffer that the engine's own `free` releases, and the
// library stays loaded for as long as `self` exists.
unsafe impl EngineAbi for NativeEngine {
    fn run(&self, db_uri: &CStr, account: &CStr, payload: &CStr) -> *mut c_char {
        // SAFETY: `run` was resolved from a library that `self` keeps loaded,
        // and every argument is a NUL-terminated string that outlives the call.
        unsafe { (self.run)(db_uri.as_ptr(), account.as_ptr(), payload.as_ptr()) }
    }

    unsafe fn release(&self, ptr: *mut c_char) {
        // SAFETY: the caller guarantees `ptr` came from `run` and is released
        // only once; `free` is the engine's matching deallocator.
        unsafe { (self.free)(ptr) }
    }
}

impl fmt::Debug for NativeEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeEngine")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_symbols_match_engine_exports() {
        let symbols = EngineSymbols::default();
        assert_eq!(symbols.run, "WaRun");
        assert_eq!(symbols.free, "WaFree");
    }

    #[test]
    fn missing_library_is_reported() {
        let err = unsafe { NativeEngine::load("/nonexistent/path/libwa.so") }.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Library error: shared library not found: /nonexistent/path/libwa.so"
        );
    }

    #[test]
    fn non_library_file_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("libwa.so");
        std::fs::write(&path, b"definitely not an ELF file").unwrap();

        let err = unsafe { NativeEngine::load(&path) }.unwrap_err();
        assert!(matches!(err, GatewayError::Library(ref m) if m.starts_with("failed to load")));
    }
}
