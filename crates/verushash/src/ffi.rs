//! C ABI of the native VerusHash engine.
//!
//! The engine is reached through a [`Backend`] function table rather than
//! direct symbol calls, so the adapter can be driven by the linked
//! `libverushash` (feature `native`) or by any other library exposing the
//! same ABI.

use std::ffi::c_void;
use std::fmt;

/// Hash entry point: `(engine, input, input_len, output)`.
///
/// `output` must point to at least 32 writable bytes.
pub type HashFn = unsafe extern "C" fn(*mut c_void, *const u8, usize, *mut u8);

/// Function table for one native engine implementation.
#[derive(Clone, Copy)]
pub struct Backend {
    pub name: &'static str,
    /// Allocate a new engine. Returns null on allocation failure.
    pub new_engine: unsafe extern "C" fn() -> *mut c_void,
    /// Free an engine returned by `new_engine`. Must be called exactly once.
    pub delete_engine: unsafe extern "C" fn(*mut c_void),
    pub initialized_get: unsafe extern "C" fn(*const c_void) -> bool,
    pub initialized_set: unsafe extern "C" fn(*mut c_void, bool),
    /// Build the key tables the v2 family depends on.
    pub initialize: unsafe extern "C" fn(*mut c_void),
    pub hash_v1: HashFn,
    pub hash_v2: HashFn,
    pub hash_v2b: HashFn,
    pub hash_v2b1: HashFn,
    /// Hashes the full buffer; the length is only used to delimit it.
    pub hash_v2b2: HashFn,
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend").field("name", &self.name).finish()
    }
}

#[cfg(feature = "native")]
mod native {
    use std::ffi::c_void;

    #[allow(dead_code)]
    extern "C" {
        pub fn verushash_new() -> *mut c_void;
        pub fn verushash_delete(engine: *mut c_void);
        pub fn verushash_initialized_get(engine: *const c_void) -> bool;
        pub fn verushash_initialized_set(engine: *mut c_void, value: bool);
        pub fn verushash_initialize(engine: *mut c_void);
        pub fn verushash_v1(engine: *mut c_void, input: *const u8, len: usize, output: *mut u8);
        pub fn verushash_v2(engine: *mut c_void, input: *const u8, len: usize, output: *mut u8);
        pub fn verushash_v2b(engine: *mut c_void, input: *const u8, len: usize, output: *mut u8);
        pub fn verushash_v2b1(engine: *mut c_void, input: *const u8, len: usize, output: *mut u8);
        pub fn verushash_v2b2(engine: *mut c_void, input: *const u8, len: usize, output: *mut u8);
    }

    pub static NATIVE: super::Backend = super::Backend {
        name: "libverushash",
        new_engine: verushash_new,
        delete_engine: verushash_delete,
        initialized_get: verushash_initialized_get,
        initialized_set: verushash_initialized_set,
        initialize: verushash_initialize,
        hash_v1: verushash_v1,
        hash_v2: verushash_v2,
        hash_v2b: verushash_v2b,
        hash_v2b1: verushash_v2b1,
        hash_v2b2: verushash_v2b2,
    };
}

#[cfg(feature = "native")]
impl Backend {
    /// The statically linked `libverushash` engine.
    pub fn native() -> &'static Backend {
        &native::NATIVE
    }
}
