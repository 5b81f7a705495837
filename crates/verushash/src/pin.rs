//! Input buffers borrowed across a native call.

use crate::error::{Error, Result};
use std::marker::PhantomData;

/// A read-only input region handed to the native engine.
///
/// Holds the raw pointer and length passed over the boundary together with
/// the borrow of the source slice, so the bytes cannot be moved, mutated or
/// dropped while a call that received the pointer is running.
#[derive(Debug, Clone, Copy)]
pub struct PinnedInput<'a> {
    ptr: *const u8,
    len: usize,
    _borrow: PhantomData<&'a [u8]>,
}

impl<'a> PinnedInput<'a> {
    /// Pin the whole of `input`.
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            ptr: input.as_ptr(),
            len: input.len(),
            _borrow: PhantomData,
        }
    }

    /// Pin the first `len` bytes of `input`.
    pub fn prefix(input: &'a [u8], len: usize) -> Result<Self> {
        if len > input.len() {
            return Err(Error::InputLength {
                requested: len,
                available: input.len(),
            });
        }
        Ok(Self::new(&input[..len]))
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.ptr
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
