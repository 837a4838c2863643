//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! serialized to a TOML table and the user's file is deep-merged on top of
//! them, so a config file only needs the keys it wants to change.
//!
//! ## Config File Location
//!
//! ```text
//! content/
//! ├── config.toml      # Site constants, sitemap tuning, routes, redirects
//! └── content.toml     # Posts and tools (see `registry`)
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! [site]
//! name = "MindCheck"
//! origin = "https://mindcheck.example"
//! home_title = "MindCheck: Free, Private Mental Health Screening Tools"
//! default_description = "..."
//! default_keywords = ["mental health", "screening"]
//! default_image = "https://mindcheck.example/og-image.png"
//! locale = "en_US"
//!
//! [organization]
//! logo = "https://mindcheck.example/logo.png"
//! description = "..."
//! same_as = []
//!
//! [sitemap]
//! blog_prefix = "/blog"
//! blog_priority = 0.6
//! blog_change_frequency = "monthly"
//!
//! [[routes]]
//! path = "/"
//! change_frequency = "weekly"
//! priority = 1.0
//!
//! [[redirects]]
//! source = "/phq9"
//! destination = "/phq-9-depression-test"
//! permanent = true
//! ```
//!
//! Tables merge key by key. Arrays (`routes`, `redirects`, keyword lists)
//! replace the stock value wholesale. Unknown keys are rejected to catch typos
//! early.

use crate::generate::artifact_name;
use crate::redirects::RedirectEntry;
use crate::types::{ChangeFrequency, RouteDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site-wide constants and metadata fallbacks.
    pub site: SiteInfo,
    /// Publisher facts for the Organization document.
    pub organization: OrganizationConfig,
    /// Blog entry tuning for the sitemap.
    pub sitemap: SitemapConfig,
    /// Static pages, in sitemap order.
    pub routes: Vec<RouteDescriptor>,
    /// Redirect rules, first match wins.
    pub redirects: Vec<RedirectEntry>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteInfo::default(),
            organization: OrganizationConfig::default(),
            sitemap: SitemapConfig::default(),
            routes: default_routes(),
            redirects: default_redirects(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.name.trim().is_empty() {
            return Err(ConfigError::Validation("site.name must not be empty".into()));
        }
        validate_origin(&self.site.origin)?;
        if !self.sitemap.blog_prefix.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "sitemap.blog_prefix must start with '/': {}",
                self.sitemap.blog_prefix
            )));
        }
        if !(0.0..=1.0).contains(&self.sitemap.blog_priority) {
            return Err(ConfigError::Validation(
                "sitemap.blog_priority must be between 0.0 and 1.0".into(),
            ));
        }

        let mut seen = HashSet::new();
        let mut artifacts = HashMap::new();
        for route in &self.routes {
            if !route.path.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "route path must start with '/': {}",
                    route.path
                )));
            }
            if !(0.0..=1.0).contains(&route.priority) {
                return Err(ConfigError::Validation(format!(
                    "route {} priority must be between 0.0 and 1.0, got {}",
                    route.path, route.priority
                )));
            }
            if !seen.insert(route.path.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "route declared twice: {}",
                    route.path
                )));
            }
            if let Some(other) = artifacts.insert(artifact_name(&route.path), route.path.as_str())
            {
                return Err(ConfigError::Validation(format!(
                    "routes {} and {} write the same page artifact",
                    other, route.path
                )));
            }
        }
        Ok(())
    }

    /// Site origin without a trailing slash.
    pub fn origin(&self) -> &str {
        self.site.origin.trim_end_matches('/')
    }
}

fn validate_origin(origin: &str) -> Result<(), ConfigError> {
    let rest = origin
        .strip_prefix("https://")
        .or_else(|| origin.strip_prefix("http://"))
        .ok_or_else(|| {
            ConfigError::Validation(format!(
                "site.origin must start with http:// or https://: {origin}"
            ))
        })?;
    let host = rest.trim_end_matches('/');
    if host.is_empty() || host.contains('/') {
        return Err(ConfigError::Validation(format!(
            "site.origin must be a bare scheme and host: {origin}"
        )));
    }
    Ok(())
}

/// Site-wide constants and the fallbacks used by the metadata synthesizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    /// Used in the `"<title> | <name>"` template and as `og:site_name`.
    pub name: String,
    /// Scheme and host every canonical URL is built from.
    pub origin: String,
    /// Standalone title for the root page. Never templated.
    pub home_title: String,
    pub default_description: String,
    pub default_keywords: Vec<String>,
    /// Social preview image, also the Article image fallback.
    pub default_image: String,
    pub locale: String,
    /// Twitter `@handle` for `twitter:site`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_handle: Option<String>,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "MindCheck".to_string(),
            origin: "https://mindcheck.example".to_string(),
            home_title: "MindCheck: Free, Private Mental Health Screening Tools".to_string(),
            default_description: "Free, anonymous self-assessment tools for depression and \
                anxiety, with plain-language articles on what the results mean."
                .to_string(),
            default_keywords: vec![
                "mental health".to_string(),
                "depression test".to_string(),
                "anxiety test".to_string(),
                "PHQ-9".to_string(),
                "GAD-7".to_string(),
                "self-assessment".to_string(),
            ],
            default_image: "https://mindcheck.example/og-image.png".to_string(),
            locale: "en_US".to_string(),
            twitter_handle: None,
        }
    }
}

/// Publisher facts for the Organization document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrganizationConfig {
    pub logo: String,
    pub description: String,
    /// Profile URLs for `sameAs`.
    pub same_as: Vec<String>,
}

impl Default for OrganizationConfig {
    fn default() -> Self {
        Self {
            logo: "https://mindcheck.example/logo.png".to_string(),
            description: "Independent publisher of free mental health screening tools."
                .to_string(),
            same_as: Vec::new(),
        }
    }
}

/// Sitemap tuning for blog entries. Static routes carry their own values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SitemapConfig {
    /// Path prefix for post URLs (`<prefix>/<slug>`).
    pub blog_prefix: String,
    pub blog_priority: f32,
    pub blog_change_frequency: ChangeFrequency,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            blog_prefix: "/blog".to_string(),
            blog_priority: 0.6,
            blog_change_frequency: ChangeFrequency::Monthly,
        }
    }
}

fn route(
    path: &str,
    change_frequency: ChangeFrequency,
    priority: f32,
    title: Option<&str>,
) -> RouteDescriptor {
    RouteDescriptor {
        path: path.to_string(),
        change_frequency,
        priority,
        title: title.map(str::to_string),
        description: None,
    }
}

fn default_routes() -> Vec<RouteDescriptor> {
    vec![
        route("/", ChangeFrequency::Weekly, 1.0, None),
        route(
            "/phq-9-depression-test",
            ChangeFrequency::Monthly,
            0.9,
            Some("PHQ-9 Depression Test"),
        ),
        route(
            "/gad-7-anxiety-test",
            ChangeFrequency::Monthly,
            0.9,
            Some("GAD-7 Anxiety Test"),
        ),
        route("/blog", ChangeFrequency::Weekly, 0.8, Some("Blog")),
        route("/about", ChangeFrequency::Yearly, 0.5, Some("About")),
        route("/privacy", ChangeFrequency::Yearly, 0.3, Some("Privacy Policy")),
    ]
}

fn default_redirects() -> Vec<RedirectEntry> {
    vec![
        RedirectEntry::exact("/phq9", "/phq-9-depression-test", true),
        RedirectEntry::exact("/gad7", "/gad-7-anxiety-test", true),
    ]
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults do not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `config.toml`.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    if overlay.is_none() {
        tracing::debug!(root = %root.display(), "no config.toml, using stock defaults");
    }
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# MindCheck SEO Configuration
# ===========================
# All settings are optional. Values shown below are the defaults.
# Tables merge key by key; arrays ([[routes]], [[redirects]], keyword
# lists) replace the defaults entirely when present.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site constants
# ---------------------------------------------------------------------------
[site]
# Appended to page titles: "<title> | <name>".
name = "MindCheck"

# Scheme and host for every canonical URL. No path, trailing slash optional.
origin = "https://mindcheck.example"

# The home page uses this title as-is, without the "| <name>" suffix.
home_title = "MindCheck: Free, Private Mental Health Screening Tools"

# Fallbacks for pages that do not set their own.
default_description = "Free, anonymous self-assessment tools for depression and anxiety, with plain-language articles on what the results mean."
default_keywords = ["mental health", "depression test", "anxiety test", "PHQ-9", "GAD-7", "self-assessment"]
default_image = "https://mindcheck.example/og-image.png"

locale = "en_US"
# twitter_handle = "@mindcheck"

# ---------------------------------------------------------------------------
# Publisher (Organization structured data)
# ---------------------------------------------------------------------------
[organization]
logo = "https://mindcheck.example/logo.png"
description = "Independent publisher of free mental health screening tools."
same_as = []

# ---------------------------------------------------------------------------
# Sitemap tuning for blog posts
# ---------------------------------------------------------------------------
[sitemap]
blog_prefix = "/blog"
blog_priority = 0.6
# always | hourly | daily | weekly | monthly | yearly | never
blog_change_frequency = "monthly"

# ---------------------------------------------------------------------------
# Static routes, emitted in this order ahead of blog posts
# ---------------------------------------------------------------------------
[[routes]]
path = "/"
change_frequency = "weekly"
priority = 1.0

[[routes]]
path = "/phq-9-depression-test"
change_frequency = "monthly"
priority = 0.9
title = "PHQ-9 Depression Test"

[[routes]]
path = "/gad-7-anxiety-test"
change_frequency = "monthly"
priority = 0.9
title = "GAD-7 Anxiety Test"

[[routes]]
path = "/blog"
change_frequency = "weekly"
priority = 0.8
title = "Blog"

[[routes]]
path = "/about"
change_frequency = "yearly"
priority = 0.5
title = "About"

[[routes]]
path = "/privacy"
change_frequency = "yearly"
priority = 0.3
title = "Privacy Policy"

# ---------------------------------------------------------------------------
# Redirects, first match wins
# ---------------------------------------------------------------------------
# Exact rules use `source`; regex rules use `pattern` and may reference
# capture groups in the destination ("$1").
[[redirects]]
source = "/phq9"
destination = "/phq-9-depression-test"
permanent = true

[[redirects]]
source = "/gad7"
destination = "/gad-7-anxiety-test"
permanent = true
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        SiteConfig::default().validate().unwrap();
    }

    #[test]
    fn default_routes_start_at_root() {
        let config = SiteConfig::default();
        assert_eq!(config.routes[0].path, "/");
        assert_eq!(config.routes[0].priority, 1.0);
    }

    #[test]
    fn origin_strips_trailing_slash() {
        let mut config = SiteConfig::default();
        config.site.origin = "https://example.org/".to_string();
        assert_eq!(config.origin(), "https://example.org");
    }

    #[test]
    fn stock_config_toml_matches_defaults() {
        let parsed: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(parsed.site.name, defaults.site.name);
        assert_eq!(parsed.site.origin, defaults.site.origin);
        assert_eq!(parsed.site.default_keywords, defaults.site.default_keywords);
        assert_eq!(parsed.routes, defaults.routes);
        assert_eq!(parsed.redirects, defaults.redirects);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[site]
name = "Calm Corner"
"#;
        let overlay: toml::Value = toml::from_str(toml).unwrap();
        let config = resolve_config(stock_defaults_value().unwrap(), Some(overlay)).unwrap();
        assert_eq!(config.site.name, "Calm Corner");
        // Sibling keys keep their defaults
        assert_eq!(config.site.origin, "https://mindcheck.example");
        assert_eq!(config.routes.len(), 6);
    }

    #[test]
    fn routes_replace_defaults_wholesale() {
        let toml = r#"
[[routes]]
path = "/"
change_frequency = "daily"
priority = 1.0
"#;
        let overlay: toml::Value = toml::from_str(toml).unwrap();
        let config = resolve_config(stock_defaults_value().unwrap(), Some(overlay)).unwrap();
        assert_eq!(config.routes.len(), 1);
        assert_eq!(config.routes[0].change_frequency, ChangeFrequency::Daily);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let toml = r#"
[site]
nmae = "typo"
"#;
        let overlay: toml::Value = toml::from_str(toml).unwrap();
        let result = resolve_config(stock_defaults_value().unwrap(), Some(overlay));
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn priority_out_of_range_is_rejected() {
        let mut config = SiteConfig::default();
        config.routes[1].priority = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn blog_priority_out_of_range_is_rejected() {
        let mut config = SiteConfig::default();
        config.sitemap.blog_priority = -0.1;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn relative_route_is_rejected() {
        let mut config = SiteConfig::default();
        config.routes[1].path = "about".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn duplicate_route_is_rejected() {
        let mut config = SiteConfig::default();
        config.routes[2].path = config.routes[1].path.clone();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("declared twice"));
    }

    #[test]
    fn routes_sharing_a_page_artifact_are_rejected() {
        let mut config = SiteConfig::default();
        config.routes[4].path = "/index".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("/ and /index"));

        let mut config = SiteConfig::default();
        config.routes[4].path = "/blog/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn origin_must_have_scheme() {
        let mut config = SiteConfig::default();
        config.site.origin = "mindcheck.example".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn origin_must_not_have_path() {
        let mut config = SiteConfig::default();
        config.site.origin = "https://mindcheck.example/site".to_string();
        assert!(config.validate().is_err());
        config.site.origin = "https://mindcheck.example/".to_string();
        assert!(config.validate().is_ok());
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.name, "MindCheck");
        assert_eq!(config.redirects.len(), 2);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[site]
origin = "https://calm.example"

[sitemap]
blog_priority = 0.5
"#,
        )
        .unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.origin, "https://calm.example");
        assert_eq!(config.sitemap.blog_priority, 0.5);
        assert_eq!(config.sitemap.blog_prefix, "/blog");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"priority = 0.9"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"priority = 0.4"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("priority").unwrap().as_float(), Some(0.4));
    }

    #[test]
    fn merge_toml_nested_tables() {
        let base: toml::Value = toml::from_str(
            r#"
[site]
name = "A"
locale = "en_US"
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[site]
name = "B"
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let site = merged.get("site").unwrap();
        assert_eq!(site.get("name").unwrap().as_str(), Some("B"));
        assert_eq!(site.get("locale").unwrap().as_str(), Some("en_US"));
    }

    #[test]
    fn merge_toml_array_replaces() {
        let base: toml::Value = toml::from_str(r#"keywords = ["a", "b"]"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"keywords = ["c"]"#).unwrap();
        let merged = merge_toml(base, overlay);
        let arr = merged.get("keywords").unwrap().as_array().unwrap();
        assert_eq!(arr.len(), 1);
        assert_eq!(arr[0].as_str(), Some("c"));
    }
}
