//! Transfer buffers: native-owned byte ranges handed back to managed code.
//!
//! A transfer buffer is a C-allocated `{size, data}` record plus the payload
//! it points to. It lives for exactly one marshalling step: `cdata` produces
//! it, `to_managed_bytes` copies the payload out and frees both allocations.

use crate::memory;
use std::mem::{self, ManuallyDrop};
use std::ptr::{self, NonNull};
use std::slice;

/// Fixed layout of a native transfer record.
#[repr(C)]
#[derive(Debug)]
pub struct TransferDescriptor {
    pub size: usize,
    pub data: *mut u8,
}

/// One C allocation, freed when dropped unless released.
struct NativeAlloc(NonNull<u8>);

impl NativeAlloc {
    fn new(size: usize) -> Option<Self> {
        memory::allocate(size).ok().map(Self)
    }

    fn as_ptr(&self) -> *mut u8 {
        self.0.as_ptr()
    }

    fn release(self) -> *mut u8 {
        ManuallyDrop::new(self).0.as_ptr()
    }
}

impl Drop for NativeAlloc {
    fn drop(&mut self) {
        unsafe { memory::free(self.0.as_ptr()) };
    }
}

/// Copy `size` bytes at `src` into a freshly allocated transfer buffer.
///
/// Returns null if either allocation fails; nothing is leaked in that case.
///
/// # Safety
///
/// `src` must be valid for `size` reads.
pub unsafe fn cdata(src: *const u8, size: usize) -> *mut TransferDescriptor {
    let Some(record) = NativeAlloc::new(mem::size_of::<TransferDescriptor>()) else {
        return ptr::null_mut();
    };
    let Some(payload) = NativeAlloc::new(size) else {
        return ptr::null_mut();
    };
    if size > 0 {
        ptr::copy_nonoverlapping(src, payload.as_ptr(), size);
    }

    let record = record.release().cast::<TransferDescriptor>();
    record.write(TransferDescriptor {
        size,
        data: payload.release(),
    });
    record
}

/// Take a transfer buffer back into managed ownership.
///
/// Copies the payload, then frees the payload and the record. A null record
/// yields `None` without freeing anything; a record with a null payload
/// yields `None` after freeing the record alone.
///
/// # Safety
///
/// `desc` must be null or a record produced by [`cdata`] (or a native
/// equivalent using the C allocator) that has not been consumed yet.
pub unsafe fn to_managed_bytes(desc: *mut TransferDescriptor) -> Option<Vec<u8>> {
    let record = NonNull::new(desc.cast::<u8>()).map(NativeAlloc)?;
    let TransferDescriptor { size, data } = desc.read();
    let payload = NonNull::new(data).map(NativeAlloc)?;

    let bytes = slice::from_raw_parts(payload.as_ptr(), size).to_vec();
    drop(payload);
    drop(record);
    Some(bytes)
}
