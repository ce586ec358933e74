//! Dotted version strings used as metadata schema versions.
//!
//! Segments are unsigned integers; a shorter version is padded with zeros
//! before comparison, so `1.0` and `1.0.0` are the same version. Segments
//! that are not plain digits are rejected rather than coerced.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("version string is empty")]
    Empty,
    #[error("invalid segment '{segment}' in version '{version}'")]
    InvalidSegment { version: String, segment: String },
}

/// A parsed dotted version. Keeps the original spelling for display.
#[derive(Debug, Clone)]
pub struct Version {
    segments: Vec<u64>,
    raw: String,
}

impl Version {
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(VersionError::Empty);
        }

        let segments = trimmed
            .split('.')
            .map(|segment| {
                if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(VersionError::InvalidSegment {
                        version: trimmed.to_string(),
                        segment: segment.to_string(),
                    });
                }
                segment
                    .parse::<u64>()
                    .map_err(|_| VersionError::InvalidSegment {
                        version: trimmed.to_string(),
                        segment: segment.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            segments,
            raw: trimmed.to_string(),
        })
    }

    /// Build a version from literal segments, e.g. `Version::from_segments(&[1, 2, 0])`.
    pub fn from_segments(segments: &[u64]) -> Self {
        let raw = segments
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(".");
        Self {
            segments: segments.to_vec(),
            raw,
        }
    }

    /// `0.0.0`, the version of a record that never went through a migration.
    pub fn initial() -> Self {
        Self::from_segments(&[0, 0, 0])
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Segments with trailing zeros removed; equal versions share this form.
    fn significant(&self) -> &[u64] {
        let len = self
            .segments
            .iter()
            .rposition(|segment| *segment != 0)
            .map_or(0, |idx| idx + 1);
        &self.segments[..len]
    }
}

/// Three-way comparison over zero-padded segments.
pub fn compare(a: &Version, b: &Version) -> Ordering {
    let width = a.segments.len().max(b.segments.len());
    for idx in 0..width {
        let left = a.segments.get(idx).copied().unwrap_or(0);
        let right = b.segments.get(idx).copied().unwrap_or(0);
        match left.cmp(&right) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// String form of [`compare`]; fails if either side is not a dotted version.
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering, VersionError> {
    Ok(compare(&Version::parse(a)?, &Version::parse(b)?))
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self, other)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
