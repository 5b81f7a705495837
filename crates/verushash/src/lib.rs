//! Safe Rust adapter over the native VerusHash engine.
//!
//! The hash algorithms live in the natively compiled `libverushash`; this
//! crate owns the boundary: engine lifetime ([`VerusHash`]), borrowed input
//! buffers ([`PinnedInput`]), caller-owned output memory ([`NativeBuffer`])
//! and the transfer buffers that carry bytes back from native memory
//! ([`marshal`]).
//!
//! ```ignore
//! use verushash::{Variant, VerusHash};
//!
//! let mut engine = VerusHash::new_initialized()?;
//! let digest = engine.hash(Variant::V2b2, header_bytes);
//! engine.destroy();
//! ```

pub mod activation;
pub mod engine;
pub mod error;
pub mod ffi;
pub mod marshal;
pub mod memory;
pub mod pin;
pub mod variant;

#[cfg(test)]
mod mock;

pub use activation::ActivationHeights;
pub use engine::{Digest, VerusHash};
pub use error::{Error, Result};
pub use ffi::Backend;
pub use memory::NativeBuffer;
pub use pin::PinnedInput;
pub use variant::{Variant, DIGEST_LEN};
