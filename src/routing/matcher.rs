//! Segment-aligned path prefix matching.
//!
//! # Responsibilities
//! - Parse and normalize configured path prefixes
//! - Split request paths into segments
//! - Decide prefix containment and overlap on segment boundaries
//!
//! # Design Decisions
//! - Matching is case-sensitive
//! - Empty segments are ignored (`/a//b/` == `/a/b`)
//! - `/api/v1/userswrongly` never matches `/api/v1/users`

use std::fmt;

/// Iterate over the non-empty segments of a request path.
pub fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// Why a prefix was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixError {
    Empty,
    MissingLeadingSlash,
    ContainsQueryOrFragment,
}

impl fmt::Display for PrefixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefixError::Empty => write!(f, "prefix is empty"),
            PrefixError::MissingLeadingSlash => write!(f, "prefix must start with '/'"),
            PrefixError::ContainsQueryOrFragment => {
                write!(f, "prefix must not contain '?' or '#'")
            }
        }
    }
}

/// A validated path prefix, stored as its segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefix {
    raw: String,
    segments: Vec<String>,
}

impl PathPrefix {
    pub fn parse(raw: &str) -> Result<Self, PrefixError> {
        if raw.is_empty() {
            return Err(PrefixError::Empty);
        }
        if !raw.starts_with('/') {
            return Err(PrefixError::MissingLeadingSlash);
        }
        if raw.contains(['?', '#']) {
            return Err(PrefixError::ContainsQueryOrFragment);
        }

        Ok(Self {
            raw: raw.to_string(),
            segments: path_segments(raw).map(str::to_string).collect(),
        })
    }

    /// The prefix as it was configured.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns true if `path` starts with this prefix on a segment boundary.
    pub fn matches(&self, path: &str) -> bool {
        let mut candidate = path_segments(path);
        self.segments
            .iter()
            .all(|expected| candidate.next() == Some(expected.as_str()))
    }

    /// Returns true if the prefixes are equal or one contains the other.
    pub fn overlaps(&self, other: &PathPrefix) -> bool {
        self.segments
            .iter()
            .zip(other.segments.iter())
            .all(|(a, b)| a == b)
    }
}

impl fmt::Display for PathPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
