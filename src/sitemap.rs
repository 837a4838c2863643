//! Sitemap and robots.txt generation.
//!
//! ## Entry order
//!
//! ```text
//! 1. configured routes    (declaration order, their own priority/changefreq)
//! 2. published posts      (registry order, blog priority/changefreq)
//! ```
//!
//! Entries are never re-sorted. Draft posts contribute nothing. Every URL comes
//! from [`canonical_url`], the same function the metadata synthesizer uses, so
//! a page's `<loc>` and its canonical link are identical.
//!
//! ## lastmod
//!
//! Static routes use the build timestamp (RFC 3339, UTC). Posts use their
//! modified date, falling back to the publication date.

use crate::config::SiteConfig;
use crate::meta::canonical_url;
use crate::registry::{ContentRegistry, blog_path, post_path};
use crate::types::ChangeFrequency;
use chrono::{DateTime, SecondsFormat, Utc};
use maud::{PreEscaped, html};
use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SitemapError {
    #[error("Sitemap lists draft post {slug} at {url}")]
    DraftEntry { slug: String, url: String },
    #[error("Sitemap has {found} entries, expected {expected}")]
    CountMismatch { expected: usize, found: usize },
    #[error("Sitemap lists {0} more than once")]
    DuplicateUrl(String),
}

/// One `<url>` in `sitemap.xml`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapEntry {
    pub url: String,
    /// ISO-8601.
    pub last_modified: String,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

/// Build the ordered sitemap for the site.
pub fn build_sitemap(
    config: &SiteConfig,
    registry: &ContentRegistry,
    generated_at: DateTime<Utc>,
) -> Vec<SitemapEntry> {
    let origin = config.origin();
    let build_time = generated_at.to_rfc3339_opts(SecondsFormat::Secs, true);

    let static_entries = config.routes.iter().map(|route| SitemapEntry {
        url: canonical_url(origin, &route.path),
        last_modified: build_time.clone(),
        change_frequency: route.change_frequency,
        priority: route.priority,
    });

    let blog = &config.sitemap;
    let post_entries = registry.published().filter_map(|post| {
        post_path(&blog.blog_prefix, post).map(|path| SitemapEntry {
            url: canonical_url(origin, &path),
            last_modified: post.modified().to_string(),
            change_frequency: blog.blog_change_frequency,
            priority: blog.blog_priority,
        })
    });

    let entries: Vec<SitemapEntry> = static_entries.chain(post_entries).collect();
    tracing::debug!(
        routes = config.routes.len(),
        posts = entries.len() - config.routes.len(),
        "sitemap built"
    );
    entries
}

/// Check a built sitemap against the registry.
///
/// Fails on duplicate URLs, on any URL belonging to a draft post, and when the
/// entry count is not `routes + published posts`.
pub fn verify_sitemap(
    entries: &[SitemapEntry],
    config: &SiteConfig,
    registry: &ContentRegistry,
) -> Result<(), SitemapError> {
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.url.as_str()) {
            return Err(SitemapError::DuplicateUrl(entry.url.clone()));
        }
    }

    for draft in registry.posts().iter().filter(|p| !p.is_published()) {
        let url = canonical_url(
            config.origin(),
            &blog_path(&config.sitemap.blog_prefix, &draft.slug),
        );
        if seen.contains(url.as_str()) {
            return Err(SitemapError::DraftEntry {
                slug: draft.slug.clone(),
                url,
            });
        }
    }

    let expected = config.routes.len() + registry.published_count();
    if entries.len() != expected {
        return Err(SitemapError::CountMismatch {
            expected,
            found: entries.len(),
        });
    }
    Ok(())
}

/// Serialize entries as a sitemaps.org `urlset`.
pub fn render_sitemap_xml(entries: &[SitemapEntry]) -> String {
    let markup = html! {
        (PreEscaped(r#"<?xml version="1.0" encoding="UTF-8"?>"#))
        "\n"
        urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9" {
            @for entry in entries {
                "\n  "
                url {
                    loc { (entry.url) }
                    lastmod { (entry.last_modified) }
                    changefreq { (entry.change_frequency.as_str()) }
                    priority { (format_priority(entry.priority)) }
                }
            }
            "\n"
        }
        "\n"
    };
    markup.into_string()
}

/// Shortest decimal that round-trips the `f32`, keeping one fractional
/// digit for whole numbers (`1.0`, not `1`).
pub fn format_priority(priority: f32) -> String {
    if priority.fract() == 0.0 {
        format!("{:.1}", priority)
    } else {
        format!("{}", priority)
    }
}

/// Allow-all robots.txt pointing crawlers at the sitemap.
pub fn robots_txt(config: &SiteConfig) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}\n",
        canonical_url(config.origin(), "/sitemap.xml")
    )
}
