//! In-process engine exposing the libverushash C ABI, for tests.
//!
//! Digests are keyed BLAKE2b, not VerusHash: they are deterministic, differ
//! per variant, and for table-dependent variants differ depending on whether
//! `initialize` ran. Engine lifetimes are tracked so tests can assert that
//! the adapter deletes each engine once and never touches it afterwards.

use crate::ffi::Backend;
use std::cell::{Cell, RefCell};
use std::ffi::c_void;
use std::ptr;
use std::sync::Mutex;

static LIVE: Mutex<Vec<usize>> = Mutex::new(Vec::new());

thread_local! {
    static DELETED: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
    static MISUSE: Cell<usize> = const { Cell::new(0) };
}

struct MockEngine {
    initialized: bool,
    tables: Option<[u8; 32]>,
}

/// Engines deleted on the current thread, in order.
pub fn deleted() -> Vec<usize> {
    DELETED.with(|d| d.borrow().clone())
}

/// Calls made on the current thread against an engine that was not live.
pub fn misuse_count() -> usize {
    MISUSE.with(|m| m.get())
}

fn live(engine: *const c_void) -> bool {
    let live = LIVE.lock().unwrap_or_else(|e| e.into_inner());
    let ok = live.contains(&(engine as usize));
    if !ok {
        MISUSE.with(|m| m.set(m.get() + 1));
    }
    ok
}

unsafe extern "C" fn mock_new() -> *mut c_void {
    let engine = Box::into_raw(Box::new(MockEngine {
        initialized: false,
        tables: None,
    }))
    .cast::<c_void>();
    LIVE.lock()
        .unwrap_or_else(|e| e.into_inner())
        .push(engine as usize);
    engine
}

unsafe extern "C" fn mock_new_fails() -> *mut c_void {
    ptr::null_mut()
}

unsafe extern "C" fn mock_delete(engine: *mut c_void) {
    let mut live = LIVE.lock().unwrap_or_else(|e| e.into_inner());
    match live.iter().position(|&p| p == engine as usize) {
        Some(pos) => {
            live.swap_remove(pos);
            drop(live);
            drop(Box::from_raw(engine.cast::<MockEngine>()));
            DELETED.with(|d| d.borrow_mut().push(engine as usize));
        }
        None => MISUSE.with(|m| m.set(m.get() + 1)),
    }
}

unsafe extern "C" fn mock_initialized_get(engine: *const c_void) -> bool {
    live(engine) && (*engine.cast::<MockEngine>()).initialized
}

unsafe extern "C" fn mock_initialized_set(engine: *mut c_void, value: bool) {
    if live(engine) {
        (*engine.cast::<MockEngine>()).initialized = value;
    }
}

unsafe extern "C" fn mock_initialize(engine: *mut c_void) {
    if live(engine) {
        let engine = &mut *engine.cast::<MockEngine>();
        let seed = blake2b_simd::Params::new()
            .hash_length(32)
            .hash(b"verushash key tables");
        let mut tables = [0u8; 32];
        tables.copy_from_slice(seed.as_bytes());
        engine.tables = Some(tables);
        engine.initialized = true;
    }
}

unsafe fn digest(
    engine: *mut c_void,
    tag: &[u8],
    keyed: bool,
    input: *const u8,
    len: usize,
    output: *mut u8,
) {
    if !live(engine) {
        return;
    }
    let engine = &*engine.cast::<MockEngine>();
    let input = std::slice::from_raw_parts(input, len);

    let mut params = blake2b_simd::Params::new();
    params.hash_length(32).personal(tag);
    if keyed {
        if let Some(tables) = &engine.tables {
            params.key(tables);
        }
    }
    let hash = params.hash(input);
    ptr::copy_nonoverlapping(hash.as_bytes().as_ptr(), output, 32);
}

unsafe extern "C" fn mock_v1(engine: *mut c_void, input: *const u8, len: usize, output: *mut u8) {
    digest(engine, b"verushash-v1", false, input, len, output)
}

unsafe extern "C" fn mock_v2(engine: *mut c_void, input: *const u8, len: usize, output: *mut u8) {
    digest(engine, b"verushash-v2", true, input, len, output)
}

unsafe extern "C" fn mock_v2b(engine: *mut c_void, input: *const u8, len: usize, output: *mut u8) {
    digest(engine, b"verushash-v2b", true, input, len, output)
}

unsafe extern "C" fn mock_v2b1(engine: *mut c_void, input: *const u8, len: usize, output: *mut u8) {
    digest(engine, b"verushash-v2b1", true, input, len, output)
}

unsafe extern "C" fn mock_v2b2(engine: *mut c_void, input: *const u8, len: usize, output: *mut u8) {
    digest(engine, b"verushash-v2b2", true, input, len, output)
}

const TABLE: Backend = Backend {
    name: "mock",
    new_engine: mock_new,
    delete_engine: mock_delete,
    initialized_get: mock_initialized_get,
    initialized_set: mock_initialized_set,
    initialize: mock_initialize,
    hash_v1: mock_v1,
    hash_v2: mock_v2,
    hash_v2b: mock_v2b,
    hash_v2b1: mock_v2b1,
    hash_v2b2: mock_v2b2,
};

pub static MOCK: Backend = TABLE;

/// Same as [`MOCK`] but the constructor always reports allocation failure.
pub static FAILING: Backend = Backend {
    name: "mock-oom",
    new_engine: mock_new_fails,
    ..TABLE
};
