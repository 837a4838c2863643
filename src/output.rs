//! CLI output formatting for every subcommand.
//!
//! Output leads with what a thing *is* (title, path, category) and puts
//! secondary detail on indented context lines, so `check` reads as a content
//! inventory.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Routes
//! 001 / (weekly, 1.0)
//! 002 /phq-9-depression-test (monthly, 0.9)
//!     Tool: PHQ-9 Depression Test (1 FAQ)
//!
//! Posts
//! 001 Understanding the PHQ-9 [Depression]
//!     /blog/understanding-phq-9
//! 002 Coping with Panic Attacks [Anxiety] (draft)
//!
//! Redirects
//! 001 /phq9 → /phq-9-depression-test (308)
//!
//! Sitemap OK: 8 entries (6 routes, 2 posts)
//! ```
//!
//! ## Generate
//!
//! ```text
//! / → pages/index
//! /gad-7-anxiety-test → pages/gad-7-anxiety-test (tool)
//! /blog/understanding-phq-9 → pages/blog/understanding-phq-9
//!
//! Generated 8 pages, 8 sitemap entries, 2 redirects (1 draft skipped)
//!     Categories: Depression, Anxiety, Wellbeing
//!     Output: dist
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure.

use crate::config::SiteConfig;
use crate::filter::CategoryFilter;
use crate::generate::{GenerateReport, PageArtifact, PageKind};
use crate::redirects::{Redirect, RedirectTable};
use crate::registry::{ContentRegistry, post_path};
use crate::sitemap::{SitemapEntry, format_priority};
use crate::types::ContentRecord;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{} {}", n, one)
    } else {
        format!("{} {}", n, many)
    }
}

/// Post header: index, title, category, and a draft marker.
///
/// ```text
/// 001 Understanding the PHQ-9 [Depression]
/// 002 Coping with Panic Attacks [Anxiety] (draft)
/// ```
fn post_line(index: usize, record: &ContentRecord) -> String {
    let draft = if record.is_published() { "" } else { " (draft)" };
    format!(
        "{} {} [{}]{}",
        format_index(index),
        record.title,
        record.category,
        draft
    )
}

// ============================================================================
// check
// ============================================================================

/// Inventory of routes, posts, and redirects, followed by the sitemap verdict.
pub fn format_check_output(
    config: &SiteConfig,
    registry: &ContentRegistry,
    entries: &[SitemapEntry],
    redirects: &RedirectTable,
) -> Vec<String> {
    let mut lines = vec!["Routes".to_string()];
    for (i, route) in config.routes.iter().enumerate() {
        lines.push(format!(
            "{} {} ({}, {})",
            format_index(i + 1),
            route.path,
            route.change_frequency,
            format_priority(route.priority)
        ));
        if let Some(tool) = registry.find_tool_by_path(&route.path) {
            lines.push(format!(
                "    Tool: {} ({})",
                tool.name,
                plural(tool.faq.len(), "FAQ", "FAQs")
            ));
        }
    }

    if !registry.posts().is_empty() {
        lines.push(String::new());
        lines.push("Posts".to_string());
        for (i, record) in registry.posts().iter().enumerate() {
            lines.push(post_line(i + 1, record));
            if let Some(path) = post_path(&config.sitemap.blog_prefix, record) {
                lines.push(format!("    {}", path));
            }
        }
    }

    let unrouted: Vec<_> = registry
        .tools()
        .iter()
        .filter(|t| !config.routes.iter().any(|r| r.path == t.path))
        .collect();
    if !unrouted.is_empty() {
        lines.push(String::new());
        lines.push("Tools without a route".to_string());
        for tool in unrouted {
            lines.push(format!("    {} \u{2192} {}", tool.name, tool.path));
        }
    }

    if !redirects.is_empty() {
        lines.push(String::new());
        lines.push("Redirects".to_string());
        for (i, rule) in redirects.rules().iter().enumerate() {
            lines.push(format!(
                "{} {} \u{2192} {} ({})",
                format_index(i + 1),
                rule.source.as_str(),
                rule.destination,
                rule.status_code()
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Sitemap OK: {} ({}, {})",
        plural(entries.len(), "entry", "entries"),
        plural(config.routes.len(), "route", "routes"),
        plural(registry.published_count(), "post", "posts")
    ));
    lines
}

pub fn print_check_output(
    config: &SiteConfig,
    registry: &ContentRegistry,
    entries: &[SitemapEntry],
    redirects: &RedirectTable,
) {
    for line in format_check_output(config, registry, entries, redirects) {
        println!("{}", line);
    }
}

// ============================================================================
// generate
// ============================================================================

pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .pages
        .iter()
        .map(|page| {
            let marker = if page.kind == PageKind::Tool { " (tool)" } else { "" };
            format!("{} \u{2192} {}{}", page.path, page.artifact, marker)
        })
        .collect();

    lines.push(String::new());
    let mut summary = format!(
        "Generated {}, {}, {}",
        plural(report.pages.len(), "page", "pages"),
        plural(report.sitemap_entries, "sitemap entry", "sitemap entries"),
        plural(report.redirects, "redirect", "redirects")
    );
    if report.drafts_skipped > 0 {
        summary.push_str(&format!(
            " ({} skipped)",
            plural(report.drafts_skipped, "draft", "drafts")
        ));
    }
    lines.push(summary);
    if !report.categories.is_empty() {
        lines.push(format!("    Categories: {}", report.categories.join(", ")));
    }
    lines.push(format!("    Output: {}", report.output_dir.display()));
    lines
}

pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// search
// ============================================================================

/// Matching posts with excerpts, or an empty-state line.
pub fn format_search_output(
    results: &[&ContentRecord],
    term: &str,
    category: &CategoryFilter,
) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, record) in results.iter().enumerate() {
        lines.push(post_line(i + 1, record));
        if !record.excerpt.is_empty() {
            lines.push(format!("    {}", truncate_desc(&record.excerpt, 72)));
        }
    }

    let scope = match category {
        CategoryFilter::All => String::new(),
        CategoryFilter::Only(c) => format!(" in {}", c),
    };
    if results.is_empty() {
        if term.is_empty() {
            lines.push(format!("No posts{}", scope));
        } else {
            lines.push(format!("No posts match {:?}{}", term, scope));
        }
    } else {
        lines.push(String::new());
        lines.push(format!("{}{}", plural(results.len(), "post", "posts"), scope));
    }
    lines
}

pub fn print_search_output(results: &[&ContentRecord], term: &str, category: &CategoryFilter) {
    for line in format_search_output(results, term, category) {
        println!("{}", line);
    }
}

// ============================================================================
// resolve
// ============================================================================

pub fn format_resolve_output(path: &str, redirect: Option<&Redirect>) -> Vec<String> {
    match redirect {
        Some(r) => vec![format!(
            "{} \u{2192} {} ({} {})",
            path,
            r.destination,
            r.status_code(),
            if r.permanent { "permanent" } else { "temporary" }
        )],
        None => vec![format!("{}: no redirect", path)],
    }
}

pub fn print_resolve_output(path: &str, redirect: Option<&Redirect>) {
    for line in format_resolve_output(path, redirect) {
        println!("{}", line);
    }
}

// ============================================================================
// meta
// ============================================================================

/// Pretty JSON of a page's metadata and structured data.
pub fn format_meta_output(page: &PageArtifact) -> Result<Vec<String>, serde_json::Error> {
    let json = serde_json::to_string_pretty(page)?;
    Ok(json.lines().map(str::to_string).collect())
}

pub fn print_meta_output(page: &PageArtifact) -> Result<(), serde_json::Error> {
    for line in format_meta_output(page)? {
        println!("{}", line);
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
