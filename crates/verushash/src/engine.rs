//! Owned handle to one native VerusHash engine.
//!
//! The handle is move-only: it cannot be cloned, `destroy` consumes it, and
//! dropping it without `destroy` releases the engine as well. The native
//! engine is therefore deleted exactly once and never used afterwards.
//!
//! The engine is not reentrant. A handle may move between threads but cannot
//! be shared; hashing takes `&mut self`. Use one handle per hashing thread or
//! wrap a shared handle in a mutex.

use crate::error::{Error, Result};
use crate::ffi::{Backend, HashFn};
use crate::memory::NativeBuffer;
use crate::pin::PinnedInput;
use crate::variant::{Variant, DIGEST_LEN};
use std::ffi::c_void;
use std::fmt;
use std::ptr::NonNull;

/// A 32-byte VerusHash digest.
pub type Digest = [u8; DIGEST_LEN];

pub struct VerusHash {
    raw: NonNull<c_void>,
    backend: &'static Backend,
    alive: bool,
}

// Safety: the engine has no thread affinity; exclusive access is enforced
// by `&mut self` on every mutating call and the type is deliberately !Sync.
unsafe impl Send for VerusHash {}

impl VerusHash {
    /// Create an engine backed by the linked `libverushash`.
    #[cfg(feature = "native")]
    pub fn new() -> Result<Self> {
        Self::with_backend(Backend::native())
    }

    /// Create an engine backed by the linked `libverushash` and build its key tables.
    #[cfg(feature = "native")]
    pub fn new_initialized() -> Result<Self> {
        Self::with_backend_initialized(Backend::native())
    }

    /// Create an engine through `backend`'s constructor.
    pub fn with_backend(backend: &'static Backend) -> Result<Self> {
        let raw = unsafe { (backend.new_engine)() };
        let raw = NonNull::new(raw).ok_or_else(|| {
            log::error!("{} engine allocation failed", backend.name);
            Error::EngineAllocation
        })?;
        log::trace!("created {} engine at {:p}", backend.name, raw);
        Ok(Self {
            raw,
            backend,
            alive: true,
        })
    }

    pub fn with_backend_initialized(backend: &'static Backend) -> Result<Self> {
        let mut engine = Self::with_backend(backend)?;
        engine.initialize();
        Ok(engine)
    }

    pub fn backend(&self) -> &'static Backend {
        self.backend
    }

    /// The engine's `initialized` flag, read from the native side.
    pub fn is_initialized(&self) -> bool {
        unsafe { (self.backend.initialized_get)(self.raw()) }
    }

    /// Overwrite the native `initialized` flag. This does not build or
    /// discard the key tables; only [`initialize`](Self::initialize) does.
    pub fn set_initialized(&mut self, value: bool) {
        unsafe { (self.backend.initialized_set)(self.raw(), value) }
    }

    /// Build the key tables used by every variant except [`Variant::V1`].
    ///
    /// Ordering is not enforced here: hashing a table variant on an engine
    /// that was never initialised yields whatever the native side produces.
    pub fn initialize(&mut self) {
        log::trace!("initializing {} engine at {:p}", self.backend.name, self.raw);
        unsafe { (self.backend.initialize)(self.raw()) }
    }

    /// Hash all of `input`.
    pub fn hash(&mut self, variant: Variant, input: &[u8]) -> Digest {
        let mut out = [0u8; DIGEST_LEN];
        unsafe { self.hash_raw(variant, PinnedInput::new(input), out.as_mut_ptr()) };
        out
    }

    /// Hash the first `len` bytes of `input`.
    ///
    /// For [`Variant::V2b2`], which has no length parameter, the prefix is
    /// passed as the whole buffer.
    pub fn hash_prefix(&mut self, variant: Variant, input: &[u8], len: usize) -> Result<Digest> {
        let input = PinnedInput::prefix(input, len)?;
        let mut out = [0u8; DIGEST_LEN];
        unsafe { self.hash_raw(variant, input, out.as_mut_ptr()) };
        Ok(out)
    }

    /// Hash into caller-owned native memory. Only the first
    /// [`DIGEST_LEN`] bytes of `output` are written.
    pub fn hash_into(
        &mut self,
        variant: Variant,
        input: &[u8],
        len: Option<usize>,
        output: &mut NativeBuffer,
    ) -> Result<()> {
        if output.len() < variant.digest_len() {
            return Err(Error::OutputTooSmall {
                variant: variant.name(),
                required: variant.digest_len(),
                available: output.len(),
            });
        }
        let input = match len {
            Some(len) => PinnedInput::prefix(input, len)?,
            None => PinnedInput::new(input),
        };
        unsafe { self.hash_raw(variant, input, output.as_mut_ptr()) };
        Ok(())
    }

    /// Run one native hash call writing to an arbitrary address.
    ///
    /// # Safety
    ///
    /// `output` must be valid for [`DIGEST_LEN`] writes and must not alias
    /// the input. It stays owned by the caller.
    pub unsafe fn hash_raw(&mut self, variant: Variant, input: PinnedInput<'_>, output: *mut u8) {
        let engine = self.raw();
        if variant.needs_tables() && log::log_enabled!(log::Level::Warn) && !self.is_initialized() {
            log::warn!("{} requested on an engine that reports uninitialized", variant);
        }
        log::debug!("{} over {} bytes", variant, input.len());
        let entry = entry_point(self.backend, variant);
        entry(engine, input.as_ptr(), input.len(), output);
    }

    /// Delete the native engine. Equivalent to dropping the handle.
    pub fn destroy(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        log::trace!("deleting {} engine at {:p}", self.backend.name, self.raw);
        unsafe { (self.backend.delete_engine)(self.raw.as_ptr()) };
    }

    fn raw(&self) -> *mut c_void {
        debug_assert!(self.alive, "engine used after release");
        self.raw.as_ptr()
    }
}

fn entry_point(backend: &Backend, variant: Variant) -> HashFn {
    match variant {
        Variant::V1 => backend.hash_v1,
        Variant::V2 => backend.hash_v2,
        Variant::V2b => backend.hash_v2b,
        Variant::V2b1 => backend.hash_v2b1,
        Variant::V2b2 => backend.hash_v2b2,
    }
}

impl Drop for VerusHash {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for VerusHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerusHash")
            .field("backend", &self.backend.name)
            .field("raw", &self.raw)
            .field("alive", &self.alive)
            .finish()
    }
}
