//! Navigation bar resolution.
//!
//! Resolves configured [`NavItem`]s against the request path: links are
//! marked active by segment-wise prefix match, and groups are active when
//! any descendant link is.
//!
//! Root links (`/`, or the locale root when resolving through a locale) are
//! active only on an exact match, otherwise "Home" would be highlighted on
//! every page. External links are never active.

use serde::Serialize;

use crate::ResolveError;
use crate::config::NavItem;
use crate::path::{self, CanonicalPath};

/// Maximum group nesting level.
pub const MAX_NAV_DEPTH: usize = 2;

/// Navigation entry ready for rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedNavEntry {
    /// Display text.
    pub text: String,
    /// Link target. Absent for groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Whether the entry matches the current page.
    pub active: bool,
    /// Child entries (empty for links).
    pub children: Vec<ResolvedNavEntry>,
}

/// Resolve navigation items for `current_path`.
///
/// # Errors
///
/// Returns [`ResolveError::NavTooDeep`] if groups nest more than
/// [`MAX_NAV_DEPTH`] levels.
pub fn resolve_nav(
    items: &[NavItem],
    current_path: &str,
) -> Result<Vec<ResolvedNavEntry>, ResolveError> {
    resolve_nav_in_locale(items, current_path, "")
}

/// Resolve navigation items, treating `locale_prefix` as a root link.
///
/// # Errors
///
/// Returns [`ResolveError::NavTooDeep`] if groups nest more than
/// [`MAX_NAV_DEPTH`] levels.
pub fn resolve_nav_in_locale(
    items: &[NavItem],
    current_path: &str,
    locale_prefix: &str,
) -> Result<Vec<ResolvedNavEntry>, ResolveError> {
    let activation = Activation {
        current: path::normalize(current_path),
        locale_root: path::normalize(locale_prefix),
    };
    resolve_items(items, &activation, 0)
}

/// Validate group nesting without resolving activation.
///
/// # Errors
///
/// Returns [`ResolveError::NavTooDeep`] for the first group nested too deep.
pub fn check_depth(items: &[NavItem]) -> Result<(), ResolveError> {
    fn walk(items: &[NavItem], level: usize) -> Result<(), ResolveError> {
        for item in items {
            if let NavItem::Group { text, items } = item {
                let level = group_level(text, level)?;
                walk(items, level)?;
            }
        }
        Ok(())
    }

    walk(items, 0)
}

/// True for hrefs with a URL scheme or protocol-relative hrefs.
#[must_use]
pub fn is_external(href: &str) -> bool {
    if href.starts_with("//") {
        return true;
    }
    href.split_once(':').is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

struct Activation {
    current: CanonicalPath,
    locale_root: CanonicalPath,
}

impl Activation {
    fn is_active(&self, href: &str) -> bool {
        if is_external(href) {
            return false;
        }
        let target = path::normalize(href);
        if target.is_root() || target.same_location(&self.locale_root) {
            self.current.same_location(&target)
        } else {
            self.current.starts_with(&target)
        }
    }
}

fn group_level(text: &str, parent_level: usize) -> Result<usize, ResolveError> {
    let level = parent_level + 1;
    if level > MAX_NAV_DEPTH {
        return Err(ResolveError::NavTooDeep {
            text: text.to_owned(),
            depth: level,
        });
    }
    Ok(level)
}

fn resolve_items(
    items: &[NavItem],
    activation: &Activation,
    level: usize,
) -> Result<Vec<ResolvedNavEntry>, ResolveError> {
    items
        .iter()
        .map(|item| match item {
            NavItem::Link { text, href } => Ok(ResolvedNavEntry {
                text: text.clone(),
                link: Some(href.clone()),
                active: activation.is_active(href),
                children: Vec::new(),
            }),
            NavItem::Group { text, items } => {
                let level = group_level(text, level)?;
                let children = resolve_items(items, activation, level)?;
                Ok(ResolvedNavEntry {
                    text: text.clone(),
                    link: None,
                    active: children.iter().any(|child| child.active),
                    children,
                })
            }
        })
        .collect()
}
