//! # MindCheck SEO
//!
//! Discoverability layer for a mental-health screening site: page metadata,
//! schema.org structured data, the sitemap, redirects, and listing filters,
//! all derived from two TOML files.
//!
//! # Architecture: Load, Derive, Emit
//!
//! ```text
//! 1. Load     content/config.toml + content.toml  →  SiteConfig, ContentRegistry
//! 2. Derive   pure functions over the loaded data →  metadata, JSON-LD, sitemap
//! 3. Emit     generate()                          →  dist/ artifacts
//! ```
//!
//! Loading is the only step that can fail on bad input. Derivations are pure
//! functions over immutable data, so unit tests exercise them without touching
//! the filesystem.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading, stock defaults, merging, and validation |
//! | [`types`] | Shared records: posts, tools, routes, change frequencies |
//! | [`registry`] | The post/tool registry, slug checks, category set |
//! | [`meta`] | Metadata synthesis: titles, descriptions, canonical URLs, OG/Twitter, robots |
//! | [`jsonld`] | schema.org documents: Organization, WebApplication, FAQPage, Article, BreadcrumbList |
//! | [`sitemap`] | Sitemap entries, verification, XML, robots.txt |
//! | [`redirects`] | Ordered exact/pattern redirect table |
//! | [`filter`] | Search + category filtering for listings |
//! | [`head`] | `<head>` fragment rendering with Maud |
//! | [`generate`] | Writes every artifact to the output directory |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Canonical URL Builder
//!
//! [`meta::canonical_url`] is the single place an absolute URL is made. The
//! sitemap, the metadata documents, and every JSON-LD `url` go through it, so
//! a page's `<loc>`, its canonical link, and its structured data can never
//! disagree.
//!
//! ## Drafts Are Listed, Never Linked
//!
//! Draft posts stay in the registry. They feed the category facet and appear
//! in listing data, but they get no canonical path, no metadata, no JSON-LD,
//! and no sitemap entry. [`sitemap::verify_sitemap`] enforces this before any
//! artifact is written.

pub mod config;
pub mod filter;
pub mod generate;
pub mod head;
pub mod jsonld;
pub mod meta;
pub mod output;
pub mod redirects;
pub mod registry;
pub mod sitemap;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
