//! Shared resolver handle with swappable content snapshots.
//!
//! # Thread Safety
//!
//! [`Resolver`] is designed for concurrent access without external locking:
//! - `resolve()` clones the current `Arc<ContentNode>` under a read lock and
//!   resolves without holding it
//! - `replace()` swaps in a new snapshot under a write lock; in-flight
//!   resolutions keep the snapshot they started with
//! - The [`SiteConfig`] is immutable and shared by `Arc`

use std::sync::{Arc, PoisonError, RwLock};

use crate::ResolveError;
use crate::config::SiteConfig;
use crate::content::ContentNode;
use crate::resolve::{ResolutionResult, resolve};

/// Holder for the current content tree snapshot.
pub struct ContentStore {
    current: RwLock<Arc<ContentNode>>,
}

impl ContentStore {
    /// Create a store holding `tree`.
    #[must_use]
    pub fn new(tree: ContentNode) -> Self {
        Self {
            current: RwLock::new(Arc::new(tree)),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<ContentNode> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Atomically replace the snapshot, returning the previous one.
    pub fn replace(&self, tree: ContentNode) -> Arc<ContentNode> {
        let next = Arc::new(tree);
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, next)
    }
}

/// Site configuration plus live content snapshot.
pub struct Resolver {
    config: Arc<SiteConfig>,
    content: ContentStore,
}

impl Resolver {
    /// Create a resolver over a validated configuration and initial tree.
    #[must_use]
    pub fn new(config: Arc<SiteConfig>, tree: ContentNode) -> Self {
        Self {
            config,
            content: ContentStore::new(tree),
        }
    }

    /// Site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Content snapshot store.
    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.content
    }

    /// Install a rebuilt content tree.
    pub fn replace_content(&self, tree: ContentNode) {
        let previous = self.content.replace(tree);
        tracing::debug!(
            readers = Arc::strong_count(&previous) - 1,
            "Content snapshot replaced"
        );
    }

    /// Resolve a page against the current snapshot.
    ///
    /// # Errors
    ///
    /// See [`resolve`].
    pub fn resolve(&self, current_path: &str) -> Result<ResolutionResult, ResolveError> {
        let tree = self.content.snapshot();
        resolve(&self.config, &tree, current_path)
    }
}
