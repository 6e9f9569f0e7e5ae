//! Compiler version numbers as they appear in pragmas and catalogs

use std::fmt;
use std::str::FromStr;

/// A `major.minor[.patch]` compiler version.
///
/// The patch component is optional because `0.x` pragmas may be written with two
/// components (`pragma solidity ^0.4;`). Ordering is lexicographic on
/// `(major, minor, patch)` with a missing patch ordering before any present one,
/// so `0.8 < 0.8.0 < 0.8.1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: Option<u64>,
}

impl SemanticVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch: Some(patch),
        }
    }

    pub const fn major_minor(major: u64, minor: u64) -> Self {
        Self {
            major,
            minor,
            patch: None,
        }
    }

    /// Whether `other` lives on the same `major.minor` line
    pub fn same_minor_line(&self, other: &SemanticVersion) -> bool {
        self.major == other.major && self.minor == other.minor
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{}", self.major, self.minor, patch),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid version: {0:?}")]
pub struct InvalidVersion(pub String);

impl FromStr for SemanticVersion {
    type Err = InvalidVersion;

    /// Parses `M.N` or `M.N.P`. A leading `v` is accepted since release tags use it.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidVersion(s.to_string());
        let trimmed = s.trim();
        let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);

        let parts: Vec<&str> = trimmed.split('.').collect();
        let number = |part: &str| -> Result<u64, InvalidVersion> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse().map_err(|_| invalid())
        };

        match parts.as_slice() {
            [major, minor] => Ok(Self::major_minor(number(major)?, number(minor)?)),
            [major, minor, patch] => Ok(Self::new(
                number(major)?,
                number(minor)?,
                number(patch)?,
            )),
            _ => Err(invalid()),
        }
    }
}

/// Converts to a `semver::Version`, padding a missing patch with zero.
impl From<SemanticVersion> for semver::Version {
    fn from(v: SemanticVersion) -> Self {
        semver::Version::new(v.major, v.minor, v.patch.unwrap_or(0))
    }
}

impl From<&semver::Version> for SemanticVersion {
    fn from(v: &semver::Version) -> Self {
        Self::new(v.major, v.minor, v.patch)
    }
}
