//! Adapter error types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("native allocation of {size} bytes failed")]
    Allocation { size: usize },

    #[error("native engine constructor returned null")]
    EngineAllocation,

    #[error("input length {requested} exceeds buffer of {available} bytes")]
    InputLength { requested: usize, available: usize },

    #[error("output buffer holds {available} bytes, {variant} writes {required}")]
    OutputTooSmall {
        variant: &'static str,
        required: usize,
        available: usize,
    },

    #[error("unknown hash variant: {0}")]
    UnknownVariant(String),

    #[error("invalid solution version {0} (expected 1..8)")]
    InvalidSolutionVersion(u32),
}

pub type Result<T> = std::result::Result<T, Error>;
