//! Locale resolution.
//!
//! Picks the active locale for a request path by longest configured prefix,
//! so `/en-us/guide/` resolves to `/en-us/` even when `/en/` is configured.

use std::borrow::Cow;

use crate::ResolveError;
use crate::config::{LocaleConfig, SiteConfig};
use crate::path::{self, CanonicalPath};

/// Prefix of the implicit default locale.
pub const DEFAULT_LOCALE_PREFIX: &str = "";

/// The locale selected for a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocaleMatch<'a> {
    /// Configured prefix key, or [`DEFAULT_LOCALE_PREFIX`].
    pub prefix: &'a str,
    /// Locale configuration (synthesized for the default locale).
    pub config: Cow<'a, LocaleConfig>,
}

impl LocaleMatch<'_> {
    /// Canonical form of the prefix.
    #[must_use]
    pub fn canonical_prefix(&self) -> CanonicalPath {
        path::normalize(self.prefix)
    }

    /// True for the implicit default locale.
    #[must_use]
    pub fn is_default(&self) -> bool {
        matches!(self.config, Cow::Owned(_))
    }
}

/// Resolve the active locale for `path`.
///
/// Selects the longest configured prefix matching `path`. When nothing
/// matches (including an empty locale map), returns the default locale
/// built from the site title and description.
///
/// # Errors
///
/// Returns [`ResolveError::AmbiguousLocale`] if two configured keys share
/// the longest matching canonical prefix (e.g. `/en` and `/en/`).
pub fn resolve_locale<'a>(
    config: &'a SiteConfig,
    path: &str,
) -> Result<LocaleMatch<'a>, ResolveError> {
    let target = path::normalize(path);
    let matches = path::longest_prefix_matches(
        config.locales.iter().map(|(k, v)| (k.as_str(), v)),
        &target,
    );

    match matches.as_slice() {
        [] => Ok(LocaleMatch {
            prefix: DEFAULT_LOCALE_PREFIX,
            config: Cow::Owned(default_locale(config)),
        }),
        [(prefix, locale)] => Ok(LocaleMatch {
            prefix: *prefix,
            config: Cow::Borrowed(*locale),
        }),
        [(first, _), (second, _), ..] => Err(ResolveError::AmbiguousLocale {
            path: target.to_string(),
            first: (*first).to_owned(),
            second: (*second).to_owned(),
        }),
    }
}

/// Default locale synthesized from the site-level title and description.
fn default_locale(config: &SiteConfig) -> LocaleConfig {
    LocaleConfig {
        title: Some(config.title.clone()),
        description: Some(config.description.clone()),
        ..Default::default()
    }
}
