//! Sidebar resolution.
//!
//! Turns a [`SidebarSpec`] into a concrete sidebar tree for one page.
//!
//! # Resolution Policy
//!
//! The first matching rule wins:
//! 1. An explicit tree is returned verbatim. The content tree is never read.
//! 2. A per-prefix mapping selects the entry with the longest prefix match
//!    for the current path and recurses into it.
//! 3. `auto` lists the documents in the current page's directory. Each entry
//!    is labeled with the document title, and its children are the
//!    document's headings down to the configured depth.
//!
//! # Heading Nesting
//!
//! Level 1 is the entry label, level 2 the first nesting tier. With depth
//! `d`, headings up to level `d + 1` are kept and deeper ones are dropped
//! along with everything under them.

use serde::Serialize;

use crate::ResolveError;
use crate::config::{SidebarItem, SidebarSpec};
use crate::content::{self, ContentNode, Heading};
use crate::path::{self, CanonicalPath};

/// Deepest heading level documents can carry.
const MAX_HEADING_LEVEL: u8 = 6;

/// Sidebar entry ready for rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedSidebarEntry {
    /// Display text.
    pub text: String,
    /// Link target. Absent for explicit group headers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Nested entries.
    pub children: Vec<ResolvedSidebarEntry>,
}

/// Concrete sidebar kind selected for a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectedSidebar<'a> {
    /// Literal tree from configuration.
    Explicit(&'a [SidebarItem]),
    /// Infer from content.
    Auto,
}

/// Resolve the sidebar for `current_path`.
///
/// `content` is the locale-scoped content subtree; it is only read in
/// `auto` mode.
///
/// # Errors
///
/// Returns [`ResolveError::NoSidebarForPath`] if a per-prefix mapping has no
/// entry for the path, and [`ResolveError::NotUnderPrefix`] if `auto` mode
/// is asked for a path outside `content`.
pub fn resolve_sidebar(
    spec: &SidebarSpec,
    content: &ContentNode,
    current_path: &str,
    depth: u8,
) -> Result<Vec<ResolvedSidebarEntry>, ResolveError> {
    match select(spec, current_path)? {
        SelectedSidebar::Explicit(items) => Ok(convert_explicit(items)),
        SelectedSidebar::Auto => resolve_auto(content, current_path, depth, &[]),
    }
}

/// Follow per-prefix mappings until a concrete sidebar kind is reached.
///
/// # Errors
///
/// Returns [`ResolveError::NoSidebarForPath`] if no mapping prefix matches.
pub fn select<'a>(
    spec: &'a SidebarSpec,
    current_path: &str,
) -> Result<SelectedSidebar<'a>, ResolveError> {
    let target = path::normalize(current_path);
    let mut spec = spec;
    loop {
        match spec {
            SidebarSpec::Explicit(items) => return Ok(SelectedSidebar::Explicit(items)),
            SidebarSpec::Auto => return Ok(SelectedSidebar::Auto),
            SidebarSpec::ByPrefix(map) => {
                let matches = path::longest_prefix_matches(
                    map.iter().map(|(k, v)| (k.as_str(), v)),
                    &target,
                );
                if let [(first, _), (second, _), ..] = matches.as_slice() {
                    tracing::warn!(
                        path = %target,
                        first = *first,
                        second = *second,
                        "Equivalent sidebar prefixes, using the first"
                    );
                }
                let Some(&(_, next)) = matches.first() else {
                    return Err(ResolveError::NoSidebarForPath {
                        path: target.to_string(),
                    });
                };
                spec = next;
            }
        }
    }
}

/// Convert a literal sidebar tree.
#[must_use]
pub fn convert_explicit(items: &[SidebarItem]) -> Vec<ResolvedSidebarEntry> {
    items
        .iter()
        .map(|item| ResolvedSidebarEntry {
            text: item.text.clone(),
            link: item.link.clone(),
            children: convert_explicit(&item.children),
        })
        .collect()
}

/// Build an `auto` sidebar from the documents next to `current_path`.
///
/// Directories whose canonical path is in `excluded` are skipped; the
/// facade uses this to keep other locales' roots out of a shallower
/// locale's sidebar.
///
/// # Errors
///
/// Returns [`ResolveError::NotUnderPrefix`] if `current_path` lies outside
/// `content`.
pub fn resolve_auto(
    content: &ContentNode,
    current_path: &str,
    depth: u8,
    excluded: &[CanonicalPath],
) -> Result<Vec<ResolvedSidebarEntry>, ResolveError> {
    let target = path::normalize(current_path);
    let Some(dir) = current_directory(content, &target)? else {
        tracing::debug!(path = %target, "No content directory for path, sidebar is empty");
        return Ok(Vec::new());
    };

    let entries = content::list_directory(dir)
        .into_iter()
        .filter(|node| {
            !(node.is_dir() && excluded.iter().any(|ex| ex.same_location(&node.link())))
        })
        .filter_map(|node| document_entry(node, depth))
        .collect();

    Ok(entries)
}

/// Locate the directory whose documents are siblings of `target`.
fn current_directory<'a>(
    content: &'a ContentNode,
    target: &CanonicalPath,
) -> Result<Option<&'a ContentNode>, ResolveError> {
    let relative = target.strip_prefix(&content.link())?;
    let segments = relative.segments();

    if target.is_dir() {
        return Ok(content::find_directory(content, segments));
    }

    let Some((last, parent_segments)) = segments.split_last() else {
        return Ok(content::find_directory(content, segments));
    };
    let parent = content::find_directory(content, parent_segments);
    let names_document = parent.is_some_and(|dir| {
        dir.children
            .iter()
            .any(|child| !child.is_dir() && child.stem() == last)
    });
    if names_document {
        return Ok(parent);
    }

    // `/guide` may name the `guide/` directory rather than a page.
    Ok(content::find_directory(content, segments).or(parent))
}

/// Sidebar entry for one sibling node, or `None` if it has no document.
fn document_entry(node: &ContentNode, depth: u8) -> Option<ResolvedSidebarEntry> {
    let document = if node.is_dir() {
        content::index_document(node)?
    } else {
        node
    };
    let link = node.link();

    let children = if depth == 0 {
        Vec::new()
    } else {
        let max_level = depth.saturating_add(1).min(MAX_HEADING_LEVEL);
        heading_tree(&content::extract_headings(document, max_level), &link)
    };

    Some(ResolvedSidebarEntry {
        text: content::document_title(node).to_owned(),
        link: Some(link.to_string()),
        children,
    })
}

/// Nest headings by level under the closest shallower predecessor.
fn heading_tree(headings: &[&Heading], link: &CanonicalPath) -> Vec<ResolvedSidebarEntry> {
    let mut roots = Vec::new();
    let mut open: Vec<(u8, ResolvedSidebarEntry)> = Vec::new();

    for heading in headings.iter().filter(|h| h.level >= 2) {
        close_until(&mut open, &mut roots, heading.level);
        open.push((
            heading.level,
            ResolvedSidebarEntry {
                text: heading.text.clone(),
                link: Some(format!("{link}#{}", heading.anchor)),
                children: Vec::new(),
            },
        ));
    }
    close_until(&mut open, &mut roots, 0);

    roots
}

/// Pop open entries at `level` or deeper into their parents.
fn close_until(
    open: &mut Vec<(u8, ResolvedSidebarEntry)>,
    roots: &mut Vec<ResolvedSidebarEntry>,
    level: u8,
) {
    while open.last().is_some_and(|(open_level, _)| *open_level >= level) {
        let Some((_, entry)) = open.pop() else {
            break;
        };
        match open.last_mut() {
            Some((_, parent)) => parent.children.push(entry),
            None => roots.push(entry),
        }
    }
}
