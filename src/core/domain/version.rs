//! Version selector for reads.

use crate::core::constants::LATEST_VERSION;

/// Which version of a key to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    /// The value in the current blob.
    Latest,
    /// A specific per-key version number.
    Number(u32),
}

impl Version {
    /// Interpret a raw selector where `-1` means latest.
    ///
    /// Any other value that is not a positive `u32` maps to `Number(0)`,
    /// which is never assigned and therefore reads as not found.
    pub fn from_raw(raw: i64) -> Self {
        if raw == LATEST_VERSION {
            return Self::Latest;
        }
        Self::Number(u32::try_from(raw).unwrap_or(0))
    }
}

impl From<Option<u32>> for Version {
    fn from(version: Option<u32>) -> Self {
        version.map_or(Self::Latest, Self::Number)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Number(n) => write!(f, "v{}", n),
        }
    }
}
