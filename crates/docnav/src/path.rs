//! URL-like path normalization and segment-wise prefix matching.
//!
//! All matching in the engine goes through [`CanonicalPath`], so `/en/` never
//! matches `/en-us/guide/` the way a substring test would.
//!
//! # Canonical Form
//!
//! - Repeated separators and `.` segments are collapsed
//! - Query strings and fragments are dropped
//! - A `.md` or `.html` extension on the last segment is stripped
//! - A trailing `index` (or `README`) segment is removed and the path
//!   becomes a directory path
//!
//! Display form is `/`, `/guide/` (directory) or `/guide/intro` (page).

use std::fmt;

use crate::ResolveError;

/// Page extensions stripped from the last segment.
const PAGE_EXTENSIONS: &[&str] = &[".md", ".html"];

/// A normalized, site-relative path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CanonicalPath {
    segments: Vec<String>,
    is_dir: bool,
}

/// Remainder of a path after stripping a prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelativePath {
    segments: Vec<String>,
    is_dir: bool,
}

/// Normalize a path into its canonical form.
#[must_use]
pub fn normalize(path: &str) -> CanonicalPath {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];

    let mut is_dir =
        path.is_empty() || matches!(path.rsplit('/').next(), Some("" | "." | ".."));
    let mut segments: Vec<String> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            // `..` above the root stays at the root.
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment.to_owned()),
        }
    }

    if !is_dir && let Some(last) = segments.pop() {
        let stem = strip_page_extension(&last);
        if is_index_segment(stem) {
            is_dir = true;
        } else {
            segments.push(stem.to_owned());
        }
    }

    if segments.is_empty() {
        is_dir = true;
    }

    CanonicalPath { segments, is_dir }
}

/// Check whether `path` lies under `prefix`, comparing whole segments.
#[must_use]
pub fn matches_prefix(path: &str, prefix: &str) -> bool {
    normalize(path).starts_with(&normalize(prefix))
}

/// Strip `prefix` from `path`.
///
/// # Errors
///
/// Returns [`ResolveError::NotUnderPrefix`] if `path` does not match `prefix`.
pub fn strip_prefix(path: &str, prefix: &str) -> Result<RelativePath, ResolveError> {
    normalize(path).strip_prefix(&normalize(prefix))
}

/// Strip a known page extension from a file name.
pub(crate) fn strip_page_extension(name: &str) -> &str {
    PAGE_EXTENSIONS
        .iter()
        .find_map(|ext| name.strip_suffix(ext))
        .filter(|stem| !stem.is_empty())
        .unwrap_or(name)
}

/// Check whether an extension-less segment names a directory index.
pub(crate) fn is_index_segment(stem: &str) -> bool {
    stem == "index" || stem.eq_ignore_ascii_case("readme")
}

/// Select the keys whose prefix is the longest match for `target`.
///
/// Returns every candidate tied at the maximum segment depth, in input
/// order. More than one entry means the configuration is ambiguous.
pub(crate) fn longest_prefix_matches<'a, V>(
    candidates: impl IntoIterator<Item = (&'a str, V)>,
    target: &CanonicalPath,
) -> Vec<(&'a str, V)> {
    let mut best_depth = None;
    let mut best = Vec::new();

    for (key, value) in candidates {
        let prefix = normalize(key);
        if !target.starts_with(&prefix) {
            continue;
        }
        let depth = prefix.depth();
        match best_depth {
            Some(d) if d > depth => {}
            Some(d) if d == depth => best.push((key, value)),
            _ => {
                best_depth = Some(depth);
                best.clear();
                best.push((key, value));
            }
        }
    }

    best
}

impl CanonicalPath {
    /// The site root, `/`.
    #[must_use]
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
            is_dir: true,
        }
    }

    /// Path segments, without separators.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// True if the path denotes a directory.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// True for `/`.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// True if both paths name the same location, ignoring the directory flag.
    #[must_use]
    pub fn same_location(&self, other: &Self) -> bool {
        self.segments == other.segments
    }

    /// Segment-wise prefix test.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Directory containing this path (the path itself for directories).
    #[must_use]
    pub fn directory(&self) -> Self {
        if self.is_dir {
            return self.clone();
        }
        let mut segments = self.segments.clone();
        segments.pop();
        Self {
            segments,
            is_dir: true,
        }
    }

    /// Strip a prefix, keeping the remaining segments.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotUnderPrefix`] if `prefix` does not match.
    pub fn strip_prefix(&self, prefix: &Self) -> Result<RelativePath, ResolveError> {
        if !self.starts_with(prefix) {
            return Err(ResolveError::NotUnderPrefix {
                path: self.to_string(),
                prefix: prefix.to_string(),
            });
        }
        Ok(RelativePath {
            segments: self.segments[prefix.depth()..].to_vec(),
            is_dir: self.is_dir,
        })
    }

    /// Append a relative path to this path.
    #[must_use]
    pub fn join(&self, relative: &RelativePath) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(relative.segments.iter().cloned());
        let is_dir = if relative.segments.is_empty() {
            self.is_dir || relative.is_dir
        } else {
            relative.is_dir
        };
        Self {
            is_dir: is_dir || segments.is_empty(),
            segments,
        }
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("/")?;
        f.write_str(&self.segments.join("/"))?;
        if self.is_dir && !self.segments.is_empty() {
            f.write_str("/")?;
        }
        Ok(())
    }
}

impl RelativePath {
    /// Remaining segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// True if nothing remains after the prefix.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))?;
        if self.is_dir && !self.segments.is_empty() {
            f.write_str("/")?;
        }
        Ok(())
    }
}
