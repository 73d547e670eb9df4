//! Resolution error type.

/// Error returned when navigation or sidebar resolution fails.
///
/// Every variant is a pure-function failure: nothing is mutated before the
/// failure point, so there is no partial state for callers to unwind.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// A path does not lie under the prefix it was expected to match.
    #[error("Path {path} is not under prefix {prefix}")]
    NotUnderPrefix {
        /// Canonical form of the path.
        path: String,
        /// Canonical form of the prefix.
        prefix: String,
    },
    /// Two configured locale prefixes are equally long and both match.
    #[error("Locale prefixes {first:?} and {second:?} both match {path}")]
    AmbiguousLocale {
        /// Requested path.
        path: String,
        /// First matching locale key.
        first: String,
        /// Second matching locale key.
        second: String,
    },
    /// The content tree has no directory for the locale prefix.
    #[error("Content tree has no subtree for locale prefix {prefix:?}")]
    LocaleSubtreeMissing {
        /// Locale prefix that could not be found.
        prefix: String,
    },
    /// A per-prefix sidebar mapping has no entry matching the path.
    #[error("No sidebar configured for path {path}")]
    NoSidebarForPath {
        /// Requested path.
        path: String,
    },
    /// Navigation groups are nested deeper than allowed.
    #[error("Navigation group {text:?} is nested {depth} levels deep (maximum is 2)")]
    NavTooDeep {
        /// Text of the offending group.
        text: String,
        /// Nesting level of the offending group.
        depth: usize,
    },
}

impl ResolveError {
    /// Whether the failure is an expected condition rather than a config defect.
    ///
    /// Recoverable errors should be rendered as "no sidebar" by callers.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NoSidebarForPath { .. } | Self::LocaleSubtreeMissing { .. }
        )
    }
}
