//! VerusHash algorithm versions exposed by the native engine.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Width of every VerusHash digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// One VerusHash entry point. All variants share the engine handle and
/// write a [`DIGEST_LEN`]-byte digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// VerusHash 1.0 (Haraka-based, no key tables).
    V1,
    /// VerusHash 2.0.
    V2,
    /// VerusHash 2.0b.
    V2b,
    /// VerusHash 2.1.
    V2b1,
    /// VerusHash 2.2. Always hashes the whole input buffer.
    V2b2,
}

impl Variant {
    pub const ALL: [Variant; 5] = [
        Variant::V1,
        Variant::V2,
        Variant::V2b,
        Variant::V2b1,
        Variant::V2b2,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Variant::V1 => "v1",
            Variant::V2 => "v2",
            Variant::V2b => "v2b",
            Variant::V2b1 => "v2b1",
            Variant::V2b2 => "v2b2",
        }
    }

    pub fn digest_len(self) -> usize {
        DIGEST_LEN
    }

    /// Whether the entry point accepts an explicit input length. V2b2 does not.
    pub fn takes_length(self) -> bool {
        !matches!(self, Variant::V2b2)
    }

    /// Whether the variant reads the key tables built by `initialize`.
    pub fn needs_tables(self) -> bool {
        !matches!(self, Variant::V1)
    }

    /// Hash variant used for blocks carrying the given solution version.
    ///
    /// Version 0 predates VerusHash 2; versions 1 and 2 use 2.0b,
    /// version 3 switched to 2.1 and version 4 onward use 2.2.
    pub fn for_solution_version(version: u32) -> Variant {
        match version {
            0 => Variant::V1,
            1 | 2 => Variant::V2b,
            3 => Variant::V2b1,
            _ => Variant::V2b2,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Variant::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownVariant(s.to_string()))
    }
}
