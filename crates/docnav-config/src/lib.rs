//! Configuration loading for docnav.
//!
//! Parses `docnav.toml` into a [`SiteConfig`] and validates the structural
//! rules the resolver relies on, so configuration defects surface at load
//! time instead of on the first request.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `base`
//! - `title`
//! - `description`
//! - `locales.<prefix>.title`
//! - `locales.<prefix>.description`

mod expand;

use std::path::{Path, PathBuf};

use docnav::{NavItem, ResolveError, SidebarSpec, SiteConfig, ThemeConfig};

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "docnav.toml";

/// Largest accepted `sidebar_depth`.
const MAX_SIDEBAR_DEPTH: u8 = 5;

/// Loaded site configuration.
#[derive(Debug, Default)]
pub struct Config {
    /// Validated site configuration.
    pub site: SiteConfig,
    /// Path to the config file (set after loading from disk).
    pub config_path: Option<PathBuf>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`locales./en/.title`").
        field: String,
        /// Error message (e.g., "${`SITE_TITLE`} not set").
        message: String,
    },
    /// Locale or navigation structure the resolver would reject.
    #[error("Configuration error: {0}")]
    Resolve(#[from] ResolveError),
}

impl Config {
    /// Load configuration.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `docnav.toml` in the current directory and
    /// its parents, falling back to defaults when none is found.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, or if reading,
    /// parsing, expansion or validation fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }

        let discovered = std::env::current_dir()
            .ok()
            .and_then(|cwd| discover_config(&cwd));
        match discovered {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No {CONFIG_FILENAME} found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse, expand and validate configuration text.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, expansion or validation fails.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let mut config = Self {
            site: toml::from_str(text)?,
            config_path: None,
        };
        config.expand_env_vars()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.config_path = Some(path.to_path_buf());

        tracing::info!(
            path = %path.display(),
            locales = config.site.locales.len(),
            "Loaded configuration"
        );

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically by [`Config::load`] and [`Config::from_toml_str`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` for malformed values and
    /// `ConfigError::Resolve` for ambiguous locales or over-nested navigation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_base()?;
        self.validate_locales()?;
        validate_theme(&self.site.theme_config, "theme_config")?;

        for (prefix, locale) in &self.site.locales {
            if let Some(nav) = &locale.nav {
                validate_nav(nav)?;
            }
            if let Some(sidebar) = &locale.sidebar {
                validate_sidebar(sidebar, &format!("locales.{prefix}.sidebar"))?;
            }
            if let Some(depth) = locale.sidebar_depth {
                validate_sidebar_depth(depth, &format!("locales.{prefix}.sidebar_depth"))?;
            }
        }

        Ok(())
    }

    fn validate_base(&self) -> Result<(), ConfigError> {
        let base = &self.site.base;
        if base.is_empty() {
            return Err(ConfigError::Validation("base cannot be empty".to_owned()));
        }
        if !base.starts_with('/') || !base.ends_with('/') {
            return Err(ConfigError::Validation(format!(
                "base must start and end with '/', got {base:?}"
            )));
        }
        Ok(())
    }

    /// Locale keys must be rooted and must not overlap.
    fn validate_locales(&self) -> Result<(), ConfigError> {
        for key in self.site.locales.keys() {
            if !key.is_empty() && !key.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "locale prefix {key:?} must start with '/'"
                )));
            }
        }

        let prefixes: Vec<_> = self
            .site
            .locales
            .keys()
            .map(|key| (key.as_str(), docnav::normalize(key)))
            .collect();

        for (i, (first, first_path)) in prefixes.iter().enumerate() {
            for (second, second_path) in &prefixes[i + 1..] {
                if first_path.same_location(second_path) {
                    return Err(ResolveError::AmbiguousLocale {
                        path: first_path.to_string(),
                        first: (*first).to_owned(),
                        second: (*second).to_owned(),
                    }
                    .into());
                }
                let nested = (!first_path.is_root() && second_path.starts_with(first_path))
                    || (!second_path.is_root() && first_path.starts_with(second_path));
                if nested {
                    return Err(ConfigError::Validation(format!(
                        "locale prefixes {first:?} and {second:?} overlap"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        expand::expand_field(&mut self.site.base, "base")?;
        expand::expand_field(&mut self.site.title, "title")?;
        expand::expand_field(&mut self.site.description, "description")?;

        for (prefix, locale) in &mut self.site.locales {
            expand::expand_optional(&mut locale.title, &format!("locales.{prefix}.title"))?;
            expand::expand_optional(
                &mut locale.description,
                &format!("locales.{prefix}.description"),
            )?;
        }

        Ok(())
    }
}

/// Search for the config file in `start` and its parents.
fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

fn validate_theme(theme: &ThemeConfig, field: &str) -> Result<(), ConfigError> {
    validate_nav(&theme.nav)?;
    validate_sidebar(&theme.sidebar, &format!("{field}.sidebar"))?;
    validate_sidebar_depth(theme.sidebar_depth, &format!("{field}.sidebar_depth"))
}

fn validate_nav(nav: &[NavItem]) -> Result<(), ConfigError> {
    docnav::nav::check_depth(nav)?;
    Ok(())
}

fn validate_sidebar_depth(depth: u8, field: &str) -> Result<(), ConfigError> {
    if depth > MAX_SIDEBAR_DEPTH {
        return Err(ConfigError::Validation(format!(
            "{field} cannot exceed {MAX_SIDEBAR_DEPTH}, got {depth}"
        )));
    }
    Ok(())
}

/// Per-prefix sidebar keys are site paths, must be rooted and must not
/// share a canonical prefix.
fn validate_sidebar(spec: &SidebarSpec, field: &str) -> Result<(), ConfigError> {
    let SidebarSpec::ByPrefix(mapping) = spec else {
        return Ok(());
    };

    let mut seen: Vec<(&str, docnav::CanonicalPath)> = Vec::with_capacity(mapping.len());
    for (prefix, nested) in mapping {
        if !prefix.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "{field} prefix {prefix:?} must start with '/'"
            )));
        }
        let canonical = docnav::normalize(prefix);
        if let Some((other, _)) = seen.iter().find(|(_, p)| p.same_location(&canonical)) {
            return Err(ConfigError::Validation(format!(
                "{field} prefixes {other:?} and {prefix:?} both name {canonical}"
            )));
        }
        seen.push((prefix, canonical));
        validate_sidebar(nested, &format!("{field}.{prefix}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use docnav::{ContentNode, Heading, LocaleConfig, SidebarItem};
    use pretty_assertions::assert_eq;

    const MULTILINGUAL: &str = r#"
base = "/docs/"
title = "Handbook"
description = "Team handbook"

[locales."/"]
lang = "en-US"
label = "English"

[locales."/zh/"]
lang = "zh-CN"
title = "手册"
nav = [{ text = "指南", href = "/zh/guide/" }]

[theme_config]
sidebar_depth = 2
nav = [
    { text = "Home", href = "/" },
    { text = "More", items = [{ text = "Blog", href = "https://blog.example.com" }] },
]

[theme_config.sidebar]
"/guide/" = "auto"
"/api/" = [
    { text = "Client", children = [{ text = "Connect", link = "/api/connect" }] },
]
"#;

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(text: &str, expected_substrings: &[&str]) {
        let err = Config::from_toml_str(text).unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();

        assert_eq!(config.site, SiteConfig::default());
        assert_eq!(config.site.base, "/");
        assert_eq!(config.site.theme_config.sidebar_depth, 1);
    }

    #[test]
    fn test_parse_multilingual_config() {
        let config = Config::from_toml_str(MULTILINGUAL).unwrap();
        let site = &config.site;

        assert_eq!(site.base, "/docs/");
        assert_eq!(site.title, "Handbook");
        assert_eq!(
            site.locales.keys().map(String::as_str).collect::<Vec<_>>(),
            ["/", "/zh/"]
        );
        assert_eq!(
            site.locales["/zh/"].nav,
            Some(vec![NavItem::link("指南", "/zh/guide/")])
        );
        assert_eq!(
            site.theme_config.nav[1],
            NavItem::group("More", vec![NavItem::link("Blog", "https://blog.example.com")])
        );

        let SidebarSpec::ByPrefix(mapping) = &site.theme_config.sidebar else {
            panic!("expected per-prefix sidebar, got {:?}", site.theme_config.sidebar);
        };
        assert_eq!(mapping["/guide/"], SidebarSpec::Auto);
        assert_eq!(
            mapping["/api/"],
            SidebarSpec::Explicit(vec![SidebarItem::group(
                "Client",
                vec![SidebarItem::new("Connect", "/api/connect")]
            )])
        );
    }

    #[test]
    fn test_camel_case_theme_aliases() {
        let config = Config::from_toml_str(
            r#"
[themeConfig]
sidebar = "auto"
sidebarDepth = 3
"#,
        )
        .unwrap();

        assert_eq!(config.site.theme_config.sidebar, SidebarSpec::Auto);
        assert_eq!(config.site.theme_config.sidebar_depth, 3);
    }

    #[test]
    fn test_unknown_sidebar_mode_rejected() {
        let err = Config::from_toml_str(
            r#"
[theme_config]
sidebar = "manual"
"#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn test_validate_base_shape() {
        assert_validation_error(r#"base = """#, &["base cannot be empty"]);
        assert_validation_error(r#"base = "docs/""#, &["base", "'/'"]);
        assert_validation_error(r#"base = "/docs""#, &["base", "'/'"]);
    }

    #[test]
    fn test_validate_sidebar_depth_limit() {
        assert_validation_error(
            "[theme_config]\nsidebar_depth = 6\n",
            &["theme_config.sidebar_depth", "5"],
        );
        assert_validation_error(
            "[locales.\"/en/\"]\nsidebar_depth = 9\n",
            &["locales./en/.sidebar_depth"],
        );
    }

    #[test]
    fn test_validate_locale_prefix_must_be_rooted() {
        assert_validation_error("[locales.en]\nlang = \"en\"\n", &["\"en\"", "'/'"]);
    }

    #[test]
    fn test_equivalent_locale_prefixes_are_ambiguous() {
        let err = Config::from_toml_str(
            r#"
[locales."/en"]
lang = "en"

[locales."/en/"]
lang = "en"
"#,
        )
        .unwrap_err();

        assert!(
            matches!(
                err,
                ConfigError::Resolve(ResolveError::AmbiguousLocale { .. })
            ),
            "got {err:?}"
        );
    }

    #[test]
    fn test_nested_locale_prefixes_rejected() {
        assert_validation_error(
            r#"
[locales."/en/"]
lang = "en"

[locales."/en/us/"]
lang = "en-US"
"#,
            &["overlap", "/en/", "/en/us/"],
        );
    }

    #[test]
    fn test_root_locale_may_contain_others() {
        let config = Config::from_toml_str(
            r#"
[locales."/"]
lang = "en"

[locales."/fr/"]
lang = "fr"
"#,
        )
        .unwrap();

        assert_eq!(config.site.locales.len(), 2);
    }

    #[test]
    fn test_nav_too_deep_rejected_at_load() {
        let mut config = Config::default();
        config.site.locales.insert(
            "/de/".to_owned(),
            LocaleConfig {
                nav: Some(vec![NavItem::group(
                    "A",
                    vec![NavItem::group(
                        "B",
                        vec![NavItem::group("C", vec![NavItem::link("D", "/d/")])],
                    )],
                )]),
                ..Default::default()
            },
        );

        let err = config.validate().unwrap_err();

        assert!(
            matches!(
                err,
                ConfigError::Resolve(ResolveError::NavTooDeep { depth: 3, .. })
            ),
            "got {err:?}"
        );
    }

    #[test]
    fn test_sidebar_prefix_must_be_rooted() {
        assert_validation_error(
            r#"
[theme_config.sidebar]
"guide/" = "auto"
"#,
            &["theme_config.sidebar", "guide/"],
        );
    }

    #[test]
    fn test_equivalent_sidebar_prefixes_rejected() {
        assert_validation_error(
            r#"
[theme_config.sidebar]
"/guide" = [{ text = "A", link = "/guide/a" }]
"/guide/" = [{ text = "B", link = "/guide/b" }]
"#,
            &["theme_config.sidebar", "\"/guide\"", "\"/guide/\""],
        );
    }

    #[test]
    fn test_equivalent_nested_sidebar_prefixes_rejected() {
        assert_validation_error(
            r#"
[locales."/en/".sidebar."/en/guide/"]
"/en/guide/api" = "auto"
"/en/guide/api/" = "auto"
"#,
            &["locales./en/.sidebar./en/guide/", "/en/guide/api"],
        );
    }

    #[test]
    fn test_load_vuepress_style_config() {
        let config = Config::from_toml_str(
            r#"
base = "/"
title = "JAVA教程"
description = "架构师教程"

[themeConfig]
sidebar = "auto"
sidebarDepth = 2
nav = [
    { text = "Languages", items = [{ text = "中文", link = "/language/chinese" }, { text = "English", link = "/language/english" }] },
    { text = "github主页", link = "https://github.com/guochangFree" },
]
"#,
        )
        .unwrap();
        let theme = &config.site.theme_config;

        assert_eq!(config.site.title, "JAVA教程");
        assert_eq!(theme.sidebar, SidebarSpec::Auto);
        assert_eq!(theme.sidebar_depth, 2);
        assert_eq!(
            theme.nav,
            vec![
                NavItem::group(
                    "Languages",
                    vec![
                        NavItem::link("中文", "/language/chinese"),
                        NavItem::link("English", "/language/english"),
                    ]
                ),
                NavItem::link("github主页", "https://github.com/guochangFree"),
            ]
        );

        let tree = ContentNode::directory(
            "",
            vec![ContentNode::directory(
                "language",
                vec![ContentNode::file("language/chinese.md")],
            )],
        );
        let result = docnav::resolve(&config.site, &tree, "/language/chinese").unwrap();
        assert!(result.nav[0].active);
        assert!(!result.nav[1].active);
    }

    #[test]
    fn test_locale_sidebar_depth_alias_overrides_site() {
        let config = Config::from_toml_str(
            r#"
[themeConfig]
sidebar = "auto"
sidebarDepth = 2

[locales."/en/"]
sidebarDepth = 0
"#,
        )
        .unwrap();
        assert_eq!(config.site.locales["/en/"].sidebar_depth, Some(0));

        let tree = ContentNode::directory(
            "",
            vec![ContentNode::directory(
                "en",
                vec![ContentNode::file("en/a.md").with_headings(vec![
                    Heading::new(1, "A", "a"),
                    Heading::new(2, "Usage", "usage"),
                ])],
            )],
        );
        let result = docnav::resolve(&config.site, &tree, "/en/a").unwrap();

        assert_eq!(result.sidebar.len(), 1);
        assert!(result.sidebar[0].children.is_empty());
    }

    #[test]
    fn test_expand_env_vars_in_locales() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("DOCNAV_TEST_FR_TITLE", "Manuel");
            std::env::remove_var("DOCNAV_TEST_BASE_UNSET");
        }

        let config = Config::from_toml_str(
            r#"
base = "${DOCNAV_TEST_BASE_UNSET:-/handbook/}"

[locales."/fr/"]
title = "${DOCNAV_TEST_FR_TITLE}"
"#,
        )
        .unwrap();

        assert_eq!(config.site.base, "/handbook/");
        assert_eq!(config.site.locales["/fr/"].title.as_deref(), Some("Manuel"));
        unsafe {
            std::env::remove_var("DOCNAV_TEST_FR_TITLE");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("DOCNAV_TEST_TITLE_MISSING");
        }

        let err = Config::from_toml_str(r#"title = "${DOCNAV_TEST_TITLE_MISSING}""#).unwrap_err();

        assert!(
            matches!(&err, ConfigError::EnvVar { field, .. } if field == "title"),
            "got {err:?}"
        );
    }

    #[test]
    fn test_load_explicit_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILENAME);
        fs::write(&path, MULTILINGUAL).unwrap();

        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.config_path, Some(path));
        assert_eq!(config.site.title, "Handbook");
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing.toml");

        let err = Config::load(Some(&path)).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }

    #[test]
    fn test_load_invalid_file_reports_validation() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "base = \"docs\"\n").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)), "got {err:?}");
    }

    #[test]
    fn test_discover_config_in_parent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join("site/docs/guide");
        fs::create_dir_all(&nested).unwrap();
        let expected = temp_dir.path().join("site").join(CONFIG_FILENAME);
        fs::write(&expected, "").unwrap();

        assert_eq!(discover_config(&nested), Some(expected));
    }

    #[test]
    fn test_discover_config_prefers_nearest() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join("site/docs");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp_dir.path().join("site").join(CONFIG_FILENAME), "").unwrap();
        fs::write(nested.join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(discover_config(&nested), Some(nested.join(CONFIG_FILENAME)));
    }
}
