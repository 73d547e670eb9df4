//! Site configuration model.
//!
//! These types describe what the external config loader hands to the engine.
//! They are plain immutable values: the engine never mutates a [`SiteConfig`],
//! and every resolution call borrows it.
//!
//! [`NavItem`] and [`SidebarSpec`] are closed sum types, so every resolver
//! matches them exhaustively.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Default number of heading levels extracted for auto sidebars.
pub const DEFAULT_SIDEBAR_DEPTH: u8 = 1;

/// Root site configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Path prefix the site is served under. Starts and ends with `/`.
    pub base: String,
    /// Site title, used for the default locale.
    pub title: String,
    /// Site description, used for the default locale.
    pub description: String,
    /// Locale configurations keyed by path prefix (e.g. `/en/`).
    ///
    /// Empty means a single implicit default locale.
    pub locales: BTreeMap<String, LocaleConfig>,
    /// Theme configuration shared by all locales unless overridden.
    #[serde(alias = "themeConfig")]
    pub theme_config: ThemeConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base: "/".to_owned(),
            title: String::new(),
            description: String::new(),
            locales: BTreeMap::new(),
            theme_config: ThemeConfig::default(),
        }
    }
}

/// Per-locale configuration.
///
/// Every field is optional; unset fields fall back to the site-level value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Locale title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Locale description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Language tag (e.g. `en-US`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Label shown in the locale switcher.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Navigation override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nav: Option<Vec<NavItem>>,
    /// Sidebar override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar: Option<SidebarSpec>,
    /// Sidebar depth override.
    #[serde(alias = "sidebarDepth", skip_serializing_if = "Option::is_none")]
    pub sidebar_depth: Option<u8>,
}

/// Theme configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Top navigation items.
    pub nav: Vec<NavItem>,
    /// Sidebar specification.
    pub sidebar: SidebarSpec,
    /// Heading levels extracted below each document title in auto mode.
    #[serde(alias = "sidebarDepth")]
    pub sidebar_depth: u8,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            nav: Vec::new(),
            sidebar: SidebarSpec::default(),
            sidebar_depth: DEFAULT_SIDEBAR_DEPTH,
        }
    }
}

/// Theme configuration as seen from one locale.
///
/// Borrows from the site [`ThemeConfig`] and the [`LocaleConfig`], so scoping
/// never clones navigation or sidebar trees.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScopedTheme<'a> {
    /// Navigation items in effect.
    pub nav: &'a [NavItem],
    /// Sidebar specification in effect.
    pub sidebar: &'a SidebarSpec,
    /// Sidebar depth in effect.
    pub sidebar_depth: u8,
}

impl LocaleConfig {
    /// Overlay this locale's overrides on the site theme.
    #[must_use]
    pub fn scope<'a>(&'a self, theme: &'a ThemeConfig) -> ScopedTheme<'a> {
        ScopedTheme {
            nav: self.nav.as_deref().unwrap_or(&theme.nav),
            sidebar: self.sidebar.as_ref().unwrap_or(&theme.sidebar),
            sidebar_depth: self.sidebar_depth.unwrap_or(theme.sidebar_depth),
        }
    }
}

/// Navigation bar item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NavItem {
    /// Link to a page or external URL.
    Link {
        /// Display text.
        text: String,
        /// Link target.
        #[serde(alias = "link")]
        href: String,
    },
    /// Dropdown group of items.
    Group {
        /// Display text.
        text: String,
        /// Child items.
        items: Vec<NavItem>,
    },
}

impl NavItem {
    /// Create a link item.
    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self::Link {
            text: text.into(),
            href: href.into(),
        }
    }

    /// Create a group item.
    pub fn group(text: impl Into<String>, items: Vec<NavItem>) -> Self {
        Self::Group {
            text: text.into(),
            items,
        }
    }

    /// Display text.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Link { text, .. } | Self::Group { text, .. } => text,
        }
    }
}

/// Sidebar specification.
///
/// In configuration files this is either the string `"auto"`, an array of
/// [`SidebarItem`]s, or a table from path prefix to nested specification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SidebarSpecRepr", into = "SidebarSpecRepr")]
pub enum SidebarSpec {
    /// Infer the sidebar from the content tree and document headings.
    Auto,
    /// Literal sidebar tree.
    Explicit(Vec<SidebarItem>),
    /// Per-section overrides keyed by path prefix.
    ByPrefix(BTreeMap<String, SidebarSpec>),
}

impl Default for SidebarSpec {
    fn default() -> Self {
        Self::Explicit(Vec::new())
    }
}

/// Literal sidebar tree node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarItem {
    /// Display text.
    pub text: String,
    /// Link target. Absent for plain group headers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Nested items.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SidebarItem>,
}

impl SidebarItem {
    /// Create a linked leaf item.
    pub fn new(text: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: Some(link.into()),
            children: Vec::new(),
        }
    }

    /// Create an unlinked group header.
    pub fn group(text: impl Into<String>, children: Vec<SidebarItem>) -> Self {
        Self {
            text: text.into(),
            link: None,
            children,
        }
    }
}

/// Wire representation of [`SidebarSpec`].
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SidebarSpecRepr {
    Mode(String),
    Explicit(Vec<SidebarItem>),
    ByPrefix(BTreeMap<String, SidebarSpec>),
}

const AUTO_MODE: &str = "auto";

impl TryFrom<SidebarSpecRepr> for SidebarSpec {
    type Error = String;

    fn try_from(repr: SidebarSpecRepr) -> Result<Self, Self::Error> {
        match repr {
            SidebarSpecRepr::Mode(mode) if mode == AUTO_MODE => Ok(Self::Auto),
            SidebarSpecRepr::Mode(mode) => Err(format!(
                "unknown sidebar mode {mode:?}, expected {AUTO_MODE:?}"
            )),
            SidebarSpecRepr::Explicit(items) => Ok(Self::Explicit(items)),
            SidebarSpecRepr::ByPrefix(map) => Ok(Self::ByPrefix(map)),
        }
    }
}

impl From<SidebarSpec> for SidebarSpecRepr {
    fn from(spec: SidebarSpec) -> Self {
        match spec {
            SidebarSpec::Auto => Self::Mode(AUTO_MODE.to_owned()),
            SidebarSpec::Explicit(items) => Self::Explicit(items),
            SidebarSpec::ByPrefix(map) => Self::ByPrefix(map),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_theme_depth_is_one() {
        assert_eq!(ThemeConfig::default().sidebar_depth, 1);
        assert_eq!(SiteConfig::default().base, "/");
    }

    #[test]
    fn test_sidebar_spec_auto_from_json() {
        let spec: SidebarSpec = serde_json::from_str(r#""auto""#).unwrap();

        assert_eq!(spec, SidebarSpec::Auto);
    }

    #[test]
    fn test_sidebar_spec_unknown_mode_rejected() {
        let result: Result<SidebarSpec, _> = serde_json::from_str(r#""manual""#);

        let err = result.unwrap_err().to_string();
        assert!(err.contains("manual"), "unexpected error: {err}");
    }

    #[test]
    fn test_sidebar_spec_by_prefix_from_json() {
        let json = r#"{
            "/guide/": "auto",
            "/api/": [{"text": "Reference", "link": "/api/ref"}]
        }"#;

        let spec: SidebarSpec = serde_json::from_str(json).unwrap();

        let mut expected = BTreeMap::new();
        expected.insert("/guide/".to_owned(), SidebarSpec::Auto);
        expected.insert(
            "/api/".to_owned(),
            SidebarSpec::Explicit(vec![SidebarItem::new("Reference", "/api/ref")]),
        );
        assert_eq!(spec, SidebarSpec::ByPrefix(expected));
    }

    #[test]
    fn test_sidebar_spec_serializes_auto_as_string() {
        let json = serde_json::to_value(SidebarSpec::Auto).unwrap();

        assert_eq!(json, serde_json::json!("auto"));
    }

    #[test]
    fn test_nav_item_untagged_variants() {
        let json = r#"[
            {"text": "Home", "href": "/"},
            {"text": "More", "items": [{"text": "API", "href": "/api/"}]}
        ]"#;

        let items: Vec<NavItem> = serde_json::from_str(json).unwrap();

        assert_eq!(
            items,
            vec![
                NavItem::link("Home", "/"),
                NavItem::group("More", vec![NavItem::link("API", "/api/")]),
            ]
        );
    }

    #[test]
    fn test_nav_link_accepts_link_key() {
        let json = r#"[
            {"text": "Languages", "items": [{"text": "English", "link": "/language/english"}]},
            {"text": "GitHub", "link": "https://github.com/example"}
        ]"#;

        let items: Vec<NavItem> = serde_json::from_str(json).unwrap();

        assert_eq!(
            items,
            vec![
                NavItem::group("Languages", vec![NavItem::link("English", "/language/english")]),
                NavItem::link("GitHub", "https://github.com/example"),
            ]
        );
    }

    #[test]
    fn test_locale_sidebar_depth_camel_case_alias() {
        let locale: LocaleConfig = serde_json::from_str(r#"{"sidebarDepth": 0}"#).unwrap();

        assert_eq!(locale.sidebar_depth, Some(0));
        assert_eq!(locale.scope(&ThemeConfig::default()).sidebar_depth, 0);
    }

    #[test]
    fn test_scope_uses_locale_overrides() {
        let theme = ThemeConfig {
            nav: vec![NavItem::link("Home", "/")],
            sidebar: SidebarSpec::Auto,
            sidebar_depth: 2,
        };
        let locale = LocaleConfig {
            nav: Some(vec![NavItem::link("Accueil", "/fr/")]),
            sidebar_depth: Some(3),
            ..Default::default()
        };

        let scoped = locale.scope(&theme);

        assert_eq!(scoped.nav, [NavItem::link("Accueil", "/fr/")]);
        assert_eq!(scoped.sidebar, &SidebarSpec::Auto);
        assert_eq!(scoped.sidebar_depth, 3);
    }

    #[test]
    fn test_scope_falls_back_to_site_theme() {
        let theme = ThemeConfig {
            nav: vec![NavItem::link("Home", "/")],
            ..Default::default()
        };
        let locale = LocaleConfig::default();

        let scoped = locale.scope(&theme);

        assert_eq!(scoped.nav, theme.nav.as_slice());
        assert_eq!(scoped.sidebar_depth, 1);
    }
}
