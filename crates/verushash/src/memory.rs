//! Raw native memory primitives and an owning buffer over them.
//!
//! Every allocation made here comes from the C allocator so it can be handed
//! to, or received from, the native engine. `allocate` must be paired with
//! exactly one `free`; [`NativeBuffer`] does that pairing on drop.

use crate::error::{Error, Result};
use crate::marshal;
use std::ptr::{self, NonNull};
use std::{fmt, mem, slice};

#[cfg(test)]
thread_local! {
    /// Addresses passed to `free` on this thread, in call order.
    pub(crate) static FREED: std::cell::RefCell<Vec<usize>> = const { std::cell::RefCell::new(Vec::new()) };
}

/// Allocate `size` bytes of uninitialised native memory.
///
/// A zero-byte request still returns a unique, freeable address.
pub fn allocate(size: usize) -> Result<NonNull<u8>> {
    let ptr = unsafe { libc::malloc(size.max(1)) }.cast::<u8>();
    NonNull::new(ptr).ok_or_else(|| {
        log::error!("native allocation of {} bytes failed", size);
        Error::Allocation { size }
    })
}

/// Release memory obtained from [`allocate`].
///
/// # Safety
///
/// `ptr` must come from [`allocate`] (or the C allocator) and must not have
/// been freed already. Freeing twice is undefined behaviour.
pub unsafe fn free(ptr: *mut u8) {
    #[cfg(test)]
    FREED.with(|f| f.borrow_mut().push(ptr as usize));
    libc::free(ptr.cast());
}

/// Move exactly `length` bytes of `bytes` to `dst`.
///
/// Panics if `length` exceeds `bytes.len()`.
///
/// # Safety
///
/// `dst` must be valid for `length` writes. Destination capacity is not checked.
pub unsafe fn copy_in(dst: *mut u8, bytes: &[u8], length: usize) {
    let src = &bytes[..length];
    ptr::copy(src.as_ptr(), dst, length);
}

/// Copy `size` bytes at `src` into managed memory.
///
/// The bytes travel through a native transfer buffer which is freed before
/// returning. `None` if that buffer could not be allocated.
///
/// # Safety
///
/// `src` must be valid for `size` reads.
pub unsafe fn read_bytes(src: *const u8, size: usize) -> Option<Vec<u8>> {
    marshal::to_managed_bytes(marshal::cdata(src, size))
}

/// Zero-initialised native allocation freed on drop.
///
/// This is the caller-side output address for the hash entry points: the
/// engine writes into it, the owner reads it back and releases it.
pub struct NativeBuffer {
    ptr: NonNull<u8>,
    len: usize,
}

// Safety: the buffer exclusively owns its allocation.
unsafe impl Send for NativeBuffer {}

impl NativeBuffer {
    pub fn allocate(len: usize) -> Result<Self> {
        let ptr = unsafe { libc::calloc(len.max(1), 1) }.cast::<u8>();
        match NonNull::new(ptr) {
            Some(ptr) => Ok(Self { ptr, len }),
            None => {
                log::error!("native allocation of {} bytes failed", len);
                Err(Error::Allocation { size: len })
            }
        }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let mut buf = Self::allocate(bytes.len())?;
        buf.write(bytes)?;
        Ok(buf)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    pub fn as_slice(&self) -> &[u8] {
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Overwrite the start of the buffer with `bytes`.
    pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > self.len {
            return Err(Error::InputLength {
                requested: bytes.len(),
                available: self.len,
            });
        }
        unsafe { copy_in(self.ptr.as_ptr(), bytes, bytes.len()) };
        Ok(())
    }

    /// Copy the buffer contents back into managed memory.
    pub fn read(&self) -> Option<Vec<u8>> {
        unsafe { read_bytes(self.ptr.as_ptr(), self.len) }
    }

    /// Give up ownership. The caller must eventually pass the pointer to
    /// [`free`] or back to [`NativeBuffer::from_raw`].
    pub fn into_raw(self) -> (*mut u8, usize) {
        let raw = (self.ptr.as_ptr(), self.len);
        mem::forget(self);
        raw
    }

    /// Take ownership of a C-allocated region of `len` initialised bytes.
    ///
    /// # Safety
    ///
    /// `ptr` must come from the C allocator, hold `len` initialised bytes
    /// and not be owned by anything else.
    pub unsafe fn from_raw(ptr: *mut u8, len: usize) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self { ptr, len })
    }
}

impl Drop for NativeBuffer {
    fn drop(&mut self) {
        unsafe { free(self.ptr.as_ptr()) };
    }
}

impl fmt::Debug for NativeBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeBuffer")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_in_then_read_back() {
        let data = b"verus coin header bytes";
        let ptr = allocate(data.len()).unwrap();
        unsafe {
            copy_in(ptr.as_ptr(), data, data.len());
            assert_eq!(read_bytes(ptr.as_ptr(), data.len()).unwrap(), data.to_vec());
            free(ptr.as_ptr());
        }
    }

    #[test]
    fn test_copy_in_prefix_only() {
        let ptr = allocate(8).unwrap();
        unsafe {
            ptr::write_bytes(ptr.as_ptr(), 0xEE, 8);
            copy_in(ptr.as_ptr(), b"abcdefgh", 3);
            let back = read_bytes(ptr.as_ptr(), 8).unwrap();
            assert_eq!(&back[..3], b"abc");
            assert!(back[3..].iter().all(|&b| b == 0xEE));
            free(ptr.as_ptr());
        }
    }

    #[test]
    #[should_panic]
    fn test_copy_in_rejects_overlong_length() {
        let ptr = allocate(16).unwrap();
        unsafe { copy_in(ptr.as_ptr(), b"abc", 4) };
    }

    #[test]
    fn test_zero_sized_allocation() {
        let ptr = allocate(0).unwrap();
        unsafe {
            assert_eq!(read_bytes(ptr.as_ptr(), 0).unwrap(), Vec::<u8>::new());
            free(ptr.as_ptr());
        }
    }

    #[test]
    fn test_native_buffer_starts_zeroed() {
        let buf = NativeBuffer::allocate(32).unwrap();
        assert_eq!(buf.len(), 32);
        assert!(buf.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_native_buffer_write_and_read() {
        let mut buf = NativeBuffer::allocate(6).unwrap();
        buf.write(b"abc").unwrap();
        assert_eq!(buf.read().unwrap(), b"abc\0\0\0".to_vec());

        let err = buf.write(b"too long").unwrap_err();
        assert_eq!(err, Error::InputLength { requested: 8, available: 6 });
    }

    #[test]
    fn test_native_buffer_freed_once_on_drop() {
        let buf = NativeBuffer::from_slice(b"xyz").unwrap();
        let addr = buf.as_ptr() as usize;
        FREED.with(|f| f.borrow_mut().clear());
        drop(buf);
        let freed = FREED.with(|f| f.borrow().clone());
        assert_eq!(freed, vec![addr]);
    }

    #[test]
    fn test_native_buffer_raw_round_trip() {
        let buf = NativeBuffer::from_slice(b"handoff").unwrap();
        let (ptr, len) = buf.into_raw();
        let buf = unsafe { NativeBuffer::from_raw(ptr, len) }.unwrap();
        assert_eq!(buf.as_slice(), b"handoff");
        assert!(unsafe { NativeBuffer::from_raw(ptr::null_mut(), 4) }.is_none());
    }
}
