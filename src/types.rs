//! Shared content types.
//!
//! These are the records every derivation reads from: blog posts, tool
//! descriptors, and the static route table. They deserialize straight from
//! `content.toml` / `config.toml`, so field names match the TOML keys.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Publication state of a blog post.
///
/// Drafts stay in the registry (they still show up in listings and feed the
/// category facet) but never get a canonical link or a sitemap entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Draft,
    Published,
}

/// A blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentRecord {
    /// URL slug; the canonical path is `/blog/<slug>`.
    pub slug: String,
    pub title: String,
    /// Short summary shown in listings, also used as the meta description.
    pub excerpt: String,
    pub category: String,
    /// Publication date.
    pub date: NaiveDate,
    /// Last edit. Falls back to `date` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<NaiveDate>,
    #[serde(default)]
    pub status: Status,
    /// Route of a related tool page, e.g. `/phq-9-depression-test`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_path: Option<String>,
    /// Precomputed display string ("5 min read").
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub read_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ContentRecord {
    pub fn is_published(&self) -> bool {
        self.status == Status::Published
    }

    pub fn modified(&self) -> NaiveDate {
        self.date_modified.unwrap_or(self.date)
    }
}

/// One question/answer pair shown on a tool page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

/// A screening tool page (PHQ-9, GAD-7, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolRecord {
    pub slug: String,
    pub name: String,
    pub description: String,
    /// Route the tool is served at.
    pub path: String,
    pub date_published: NaiveDate,
    pub date_modified: NaiveDate,
    /// Display order is schema order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub faq: Vec<FaqEntry>,
}

/// Crawl hint from the sitemaps.org protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}

impl std::fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A static page declared in `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteDescriptor {
    pub path: String,
    pub change_frequency: ChangeFrequency,
    /// 0.0 to 1.0, checked by `SiteConfig::validate`.
    pub priority: f32,
    /// Page title before templating. Routes without one use the home title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
