//! Resolution facade.
//!
//! [`resolve`] combines locale, navigation and sidebar resolution into one
//! render-ready [`ResolutionResult`]. It is pure: identical inputs always
//! produce structurally equal results, so callers may snapshot or cache them.

use serde::Serialize;

use crate::ResolveError;
use crate::config::{ScopedTheme, SiteConfig};
use crate::content::{self, ContentNode};
use crate::locale::{self, LocaleMatch};
use crate::nav::{self, ResolvedNavEntry};
use crate::path::{self, CanonicalPath};
use crate::sidebar::{self, ResolvedSidebarEntry, SelectedSidebar};

/// Navigation, sidebar and locale for one page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResult {
    /// Navigation bar entries.
    pub nav: Vec<ResolvedNavEntry>,
    /// Sidebar entries (empty when the page has no sidebar).
    pub sidebar: Vec<ResolvedSidebarEntry>,
    /// Locale the page belongs to.
    pub active_locale: ActiveLocale,
    /// Links to the same page in every configured locale.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locale_links: Vec<ResolvedNavEntry>,
    /// Previous and next documents in sidebar order.
    pub page_links: PageLinks,
}

/// Resolved locale details.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActiveLocale {
    /// Locale prefix key (empty for the default locale).
    pub prefix: String,
    /// Locale title, falling back to the site title.
    pub title: String,
    /// Locale description, falling back to the site description.
    pub description: String,
    /// Language tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

/// Adjacent documents in sidebar order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    /// Previous document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLink>,
    /// Next document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,
}

/// Link to a document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageLink {
    /// Display text.
    pub text: String,
    /// Link target.
    pub link: String,
}

/// Resolve navigation and sidebar for `current_path`.
///
/// `current_path` may include the site `base`; it is stripped first.
/// Recoverable sidebar failures (no mapping for the path, no content for
/// the locale) produce an empty sidebar.
///
/// # Errors
///
/// Returns [`ResolveError::AmbiguousLocale`] or [`ResolveError::NavTooDeep`]
/// for configuration defects.
pub fn resolve(
    config: &SiteConfig,
    tree: &ContentNode,
    current_path: &str,
) -> Result<ResolutionResult, ResolveError> {
    let request = site_relative(&config.base, current_path);
    let request_path = request.to_string();

    let locale = locale::resolve_locale(config, &request_path)?;
    let theme = locale.config.scope(&config.theme_config);

    let nav = nav::resolve_nav_in_locale(theme.nav, &request_path, locale.prefix)?;
    let sidebar = page_sidebar(config, tree, &locale, &theme, &request_path)?;
    let page_links = page_links(&sidebar, &request);
    let locale_links = locale_links(config, &locale, &request)?;

    tracing::trace!(
        path = %request,
        locale = locale.prefix,
        nav = nav.len(),
        sidebar = sidebar.len(),
        "Resolved page navigation"
    );

    Ok(ResolutionResult {
        nav,
        sidebar,
        active_locale: active_locale(config, &locale),
        locale_links,
        page_links,
    })
}

/// Strip the site base from a request path when it lies under it.
fn site_relative(base: &str, current_path: &str) -> CanonicalPath {
    let request = path::normalize(current_path);
    match request.strip_prefix(&path::normalize(base)) {
        Ok(relative) => CanonicalPath::root().join(&relative),
        Err(_) => request,
    }
}

fn page_sidebar(
    config: &SiteConfig,
    tree: &ContentNode,
    locale: &LocaleMatch<'_>,
    theme: &ScopedTheme<'_>,
    request_path: &str,
) -> Result<Vec<ResolvedSidebarEntry>, ResolveError> {
    let resolved = match sidebar::select(theme.sidebar, request_path) {
        Ok(SelectedSidebar::Explicit(items)) => Ok(sidebar::convert_explicit(items)),
        Ok(SelectedSidebar::Auto) => content::subtree(tree, locale.prefix).and_then(|subtree| {
            let excluded = nested_locale_roots(config, locale);
            sidebar::resolve_auto(subtree, request_path, theme.sidebar_depth, &excluded)
        }),
        Err(e) => Err(e),
    };

    match resolved {
        Err(e) if e.is_recoverable() => {
            tracing::debug!(path = request_path, error = %e, "Rendering without sidebar");
            Ok(Vec::new())
        }
        other => other,
    }
}

/// Roots of locales nested under the active one.
fn nested_locale_roots(config: &SiteConfig, locale: &LocaleMatch<'_>) -> Vec<CanonicalPath> {
    let active = locale.canonical_prefix();
    config
        .locales
        .keys()
        .map(|key| path::normalize(key))
        .filter(|prefix| prefix.depth() > active.depth() && prefix.starts_with(&active))
        .collect()
}

fn active_locale(config: &SiteConfig, locale: &LocaleMatch<'_>) -> ActiveLocale {
    ActiveLocale {
        prefix: locale.prefix.to_owned(),
        title: locale
            .config
            .title
            .clone()
            .unwrap_or_else(|| config.title.clone()),
        description: locale
            .config
            .description
            .clone()
            .unwrap_or_else(|| config.description.clone()),
        lang: locale.config.lang.clone(),
    }
}

/// The current page rebased onto every configured locale.
fn locale_links(
    config: &SiteConfig,
    locale: &LocaleMatch<'_>,
    request: &CanonicalPath,
) -> Result<Vec<ResolvedNavEntry>, ResolveError> {
    if config.locales.is_empty() {
        return Ok(Vec::new());
    }
    let relative = request.strip_prefix(&locale.canonical_prefix())?;

    Ok(config
        .locales
        .iter()
        .map(|(prefix, target)| {
            let text = target
                .label
                .as_deref()
                .or(target.lang.as_deref())
                .unwrap_or(prefix);
            ResolvedNavEntry {
                text: text.to_owned(),
                link: Some(path::normalize(prefix).join(&relative).to_string()),
                active: prefix == locale.prefix,
                children: Vec::new(),
            }
        })
        .collect())
}

/// Previous and next documents around the current page.
fn page_links(sidebar: &[ResolvedSidebarEntry], request: &CanonicalPath) -> PageLinks {
    fn collect<'a>(entries: &'a [ResolvedSidebarEntry], out: &mut Vec<(&'a str, &'a str)>) {
        for entry in entries {
            if let Some(link) = entry.link.as_deref()
                && !link.contains('#')
                && !nav::is_external(link)
            {
                out.push((entry.text.as_str(), link));
            }
            collect(&entry.children, out);
        }
    }

    let mut documents = Vec::new();
    collect(sidebar, &mut documents);

    let Some(index) = documents
        .iter()
        .position(|(_, link)| path::normalize(link).same_location(request))
    else {
        return PageLinks::default();
    };

    let link_at = |i: usize| {
        documents.get(i).map(|&(text, link)| PageLink {
            text: text.to_owned(),
            link: link.to_owned(),
        })
    };

    PageLinks {
        prev: index.checked_sub(1).and_then(link_at),
        next: link_at(index + 1),
    }
}
