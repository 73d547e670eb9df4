//! Content tree snapshot and walker.
//!
//! A [`ContentNode`] tree is a materialized snapshot of the documentation
//! source directory, produced upstream by a content watcher. The walker
//! functions here only read it: they never touch the filesystem.
//!
//! # Path Convention
//!
//! `ContentNode::path` is relative to the content root with `/` separators:
//! - `""` - the content root directory
//! - `"en"` - a locale directory
//! - `"en/guide/intro.md"` - a document
//!
//! A node's name is its last path segment.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::ResolveError;
use crate::path::{self, CanonicalPath};

/// Kind of content node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Document file.
    File,
    /// Directory.
    Directory,
}

/// Document heading extracted upstream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text.
    pub text: String,
    /// Anchor ID.
    pub anchor: String,
}

impl Heading {
    /// Create a heading.
    pub fn new(level: u8, text: impl Into<String>, anchor: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            anchor: anchor.into(),
        }
    }
}

/// File or directory in the content tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentNode {
    /// Path relative to the content root.
    pub path: String,
    /// File or directory.
    pub kind: NodeKind,
    /// Child nodes (directories only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ContentNode>,
    /// Headings in document order (files only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headings: Vec<Heading>,
    /// Explicit ordering hint from document metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_hint: Option<i64>,
}

impl ContentNode {
    /// Create a document node.
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: NodeKind::File,
            children: Vec::new(),
            headings: Vec::new(),
            order_hint: None,
        }
    }

    /// Create a directory node.
    pub fn directory(path: impl Into<String>, children: Vec<ContentNode>) -> Self {
        Self {
            path: path.into(),
            kind: NodeKind::Directory,
            children,
            headings: Vec::new(),
            order_hint: None,
        }
    }

    /// Attach headings.
    #[must_use]
    pub fn with_headings(mut self, headings: Vec<Heading>) -> Self {
        self.headings = headings;
        self
    }

    /// Attach an ordering hint.
    #[must_use]
    pub fn with_order_hint(mut self, hint: i64) -> Self {
        self.order_hint = Some(hint);
        self
    }

    /// Last path segment (empty for the content root).
    #[must_use]
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// File name without page extension.
    #[must_use]
    pub fn stem(&self) -> &str {
        path::strip_page_extension(self.name())
    }

    /// True for directories.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// True for index documents (`index.md`, `README.md`).
    #[must_use]
    pub fn is_index(&self) -> bool {
        !self.is_dir() && path::is_index_segment(self.stem())
    }

    /// Canonical site path this node is served at.
    #[must_use]
    pub fn link(&self) -> CanonicalPath {
        if self.is_dir() {
            path::normalize(&format!("{}/", self.path))
        } else {
            path::normalize(&self.path)
        }
    }

    /// Text of the first level-1 heading.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.headings
            .iter()
            .find(|h| h.level == 1)
            .map(|h| h.text.as_str())
    }
}

/// Scope the content tree to a locale.
///
/// The default locale (`""` or `/`) is the root itself.
///
/// # Errors
///
/// Returns [`ResolveError::LocaleSubtreeMissing`] if no directory exists at
/// the locale prefix.
pub fn subtree<'a>(
    root: &'a ContentNode,
    locale_prefix: &str,
) -> Result<&'a ContentNode, ResolveError> {
    let prefix = path::normalize(locale_prefix);
    find_directory(root, prefix.segments()).ok_or_else(|| ResolveError::LocaleSubtreeMissing {
        prefix: locale_prefix.to_owned(),
    })
}

/// List a directory's children in display order.
///
/// Children are sorted by `order_hint` ascending (nodes without a hint
/// last), then by name. Files list as empty.
#[must_use]
pub fn list_directory(node: &ContentNode) -> Vec<&ContentNode> {
    let mut children: Vec<&ContentNode> = node.children.iter().collect();
    children.sort_by(|a, b| compare_nodes(a, b));
    children
}

/// Headings with `level <= max_level` in document order, without the title.
///
/// The title is the first level-1 heading; it labels the document itself.
#[must_use]
pub fn extract_headings(node: &ContentNode, max_level: u8) -> Vec<&Heading> {
    let mut title_seen = false;
    let mut headings = Vec::new();
    for heading in &node.headings {
        if heading.level == 1 && !title_seen {
            title_seen = true;
            continue;
        }
        if heading.level <= max_level {
            headings.push(heading);
        }
    }
    headings
}

/// Walk directory children by name, one segment at a time.
#[must_use]
pub fn find_directory<'a>(node: &'a ContentNode, segments: &[String]) -> Option<&'a ContentNode> {
    let mut current = node;
    if !current.is_dir() {
        return None;
    }
    for segment in segments {
        current = current
            .children
            .iter()
            .find(|child| child.is_dir() && child.name() == segment)?;
    }
    Some(current)
}

/// The index document of a directory, if any.
#[must_use]
pub fn index_document(dir: &ContentNode) -> Option<&ContentNode> {
    dir.children.iter().find(|child| child.is_index())
}

/// Display title of a document or directory.
///
/// Documents use their level-1 heading, falling back to the file stem.
/// Directories use their index document's title, falling back to the
/// directory name.
#[must_use]
pub fn document_title(node: &ContentNode) -> &str {
    if node.is_dir() {
        index_document(node)
            .and_then(ContentNode::title)
            .unwrap_or_else(|| node.name())
    } else {
        node.title().unwrap_or_else(|| node.stem())
    }
}

fn compare_nodes(a: &ContentNode, b: &ContentNode) -> Ordering {
    let by_hint = match (a.order_hint, b.order_hint) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_hint.then_with(|| a.name().cmp(b.name()))
}
