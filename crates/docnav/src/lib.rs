//! Navigation and sidebar resolution for multi-locale documentation sites.
//!
//! This crate provides:
//! - [`resolve`]: Locale, navigation bar and sidebar for one page
//! - [`Resolver`]: Shared handle over a swappable content snapshot
//! - Path normalization and segment-wise prefix matching
//!
//! # Quick Start
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use docnav::{ContentNode, Heading, NavItem, SidebarSpec, SiteConfig, ThemeConfig};
//!
//! let config = SiteConfig {
//!     theme_config: ThemeConfig {
//!         nav: vec![NavItem::link("Guide", "/guide/")],
//!         sidebar: SidebarSpec::Auto,
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//! let tree = ContentNode::directory(
//!     "",
//!     vec![ContentNode::directory(
//!         "guide",
//!         vec![
//!             ContentNode::file("guide/index.md")
//!                 .with_headings(vec![Heading::new(1, "Guide", "guide")]),
//!             ContentNode::file("guide/intro.md")
//!                 .with_headings(vec![Heading::new(1, "Intro", "intro")]),
//!         ],
//!     )],
//! );
//!
//! let result = docnav::resolve(&config, &tree, "/guide/intro")?;
//! assert!(result.nav[0].active);
//! assert_eq!(result.sidebar[1].text, "Intro");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod content;
mod error;
pub mod locale;
pub mod nav;
pub mod path;
mod resolve;
pub mod sidebar;
mod store;

pub use config::{
    LocaleConfig, NavItem, ScopedTheme, SidebarItem, SidebarSpec, SiteConfig, ThemeConfig,
};
pub use content::{ContentNode, Heading, NodeKind};
pub use error::ResolveError;
pub use locale::{LocaleMatch, resolve_locale};
pub use nav::{ResolvedNavEntry, resolve_nav};
pub use path::{CanonicalPath, RelativePath, normalize};
pub use resolve::{ActiveLocale, PageLink, PageLinks, ResolutionResult, resolve};
pub use sidebar::{ResolvedSidebarEntry, resolve_sidebar};
pub use store::{ContentStore, Resolver};
