//! The content registry: every blog post and tool descriptor the site knows.
//!
//! The registry is built once (usually from `content/content.toml`) and then
//! passed by reference to the metadata synthesizer, the structured-data
//! generators, the sitemap builder, and the content filter. Nothing mutates it
//! after construction.
//!
//! ## `content.toml`
//!
//! ```toml
//! [[posts]]
//! slug = "understanding-phq-9"
//! title = "Understanding the PHQ-9"
//! excerpt = "What the nine questions measure and how scores are read."
//! category = "Depression"
//! date = "2024-03-01"
//! status = "published"
//! related_path = "/phq-9-depression-test"
//! read_time = "6 min read"
//!
//! [[tools]]
//! slug = "phq-9"
//! name = "PHQ-9 Depression Test"
//! description = "Nine-question depression screening."
//! path = "/phq-9-depression-test"
//! date_published = "2024-01-15"
//! date_modified = "2024-06-01"
//!
//! [[tools.faq]]
//! question = "Is this a diagnosis?"
//! answer = "No. It is a screening tool."
//! ```
//!
//! ## Validation
//!
//! - Slugs are non-empty, lowercase kebab-case (`[a-z0-9-]`), and unique
//!   across posts *and* tools.
//! - `related_path` and tool `path` values are absolute paths.
//! - Dates are parsed on load; a malformed date is a TOML error.

use crate::types::{ContentRecord, ToolRecord};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Duplicate slug: {0}")]
    DuplicateSlug(String),
    #[error("Empty slug on record titled {0:?}")]
    EmptySlug(String),
    #[error("Slug must be lowercase kebab-case (a-z, 0-9, '-'): {0:?}")]
    InvalidSlug(String),
    #[error("Path on {slug} must start with '/': {path}")]
    InvalidPath { slug: String, path: String },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ContentFile {
    posts: Vec<ContentRecord>,
    tools: Vec<ToolRecord>,
}

/// Read-only collection of posts and tools, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ContentRegistry {
    posts: Vec<ContentRecord>,
    tools: Vec<ToolRecord>,
}

impl ContentRegistry {
    /// Build a registry, rejecting duplicate or empty slugs and relative paths.
    pub fn new(posts: Vec<ContentRecord>, tools: Vec<ToolRecord>) -> Result<Self, RegistryError> {
        let mut slugs = HashSet::new();

        for post in &posts {
            check_slug(&post.slug, &post.title, &mut slugs)?;
            if let Some(path) = &post.related_path {
                check_path(&post.slug, path)?;
            }
        }
        for tool in &tools {
            check_slug(&tool.slug, &tool.name, &mut slugs)?;
            check_path(&tool.slug, &tool.path)?;
        }

        let registry = Self { posts, tools };
        for post in &registry.posts {
            let Some(path) = &post.related_path else {
                continue;
            };
            if registry.find_tool_by_path(path).is_none() {
                tracing::warn!(
                    slug = %post.slug,
                    related_path = %path,
                    "related_path names no known tool"
                );
            }
        }
        tracing::debug!(
            posts = registry.posts.len(),
            tools = registry.tools.len(),
            "content registry built"
        );
        Ok(registry)
    }

    /// Load `content.toml` from a content directory.
    ///
    /// A missing file yields an empty registry.
    pub fn load(root: &Path) -> Result<Self, RegistryError> {
        let path = root.join("content.toml");
        if !path.exists() {
            tracing::debug!(root = %root.display(), "no content.toml, registry is empty");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        let file: ContentFile = toml::from_str(&content)?;
        Self::new(file.posts, file.tools)
    }

    /// All posts, drafts included, in declaration order.
    pub fn posts(&self) -> &[ContentRecord] {
        &self.posts
    }

    pub fn tools(&self) -> &[ToolRecord] {
        &self.tools
    }

    /// Published posts in declaration order.
    pub fn published(&self) -> impl Iterator<Item = &ContentRecord> {
        self.posts.iter().filter(|p| p.is_published())
    }

    pub fn published_count(&self) -> usize {
        self.published().count()
    }

    /// Posts newest first. Posts sharing a date keep declaration order.
    pub fn posts_by_date(&self) -> Vec<&ContentRecord> {
        let mut posts: Vec<&ContentRecord> = self.posts.iter().collect();
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        posts
    }

    pub fn find_post(&self, slug: &str) -> Option<&ContentRecord> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    pub fn find_tool_by_path(&self, path: &str) -> Option<&ToolRecord> {
        self.tools.iter().find(|t| t.path == path)
    }

    /// Distinct categories across all posts, drafts included, in order of
    /// first appearance.
    pub fn categories(&self) -> CategorySet {
        self.posts.iter().map(|p| p.category.as_str()).collect()
    }
}

fn check_slug<'a>(
    slug: &'a str,
    label: &str,
    seen: &mut HashSet<&'a str>,
) -> Result<(), RegistryError> {
    if slug.trim().is_empty() {
        return Err(RegistryError::EmptySlug(label.to_string()));
    }
    if !is_kebab_slug(slug) {
        return Err(RegistryError::InvalidSlug(slug.to_string()));
    }
    if !seen.insert(slug) {
        return Err(RegistryError::DuplicateSlug(slug.to_string()));
    }
    Ok(())
}

/// Slugs become URL segments and file names, so only `[a-z0-9-]` is allowed,
/// with no leading, trailing, or doubled hyphen.
fn is_kebab_slug(slug: &str) -> bool {
    !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn check_path(slug: &str, path: &str) -> Result<(), RegistryError> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(RegistryError::InvalidPath {
            slug: slug.to_string(),
            path: path.to_string(),
        })
    }
}

/// Canonical path of a post under `blog_prefix`, or `None` for drafts.
///
/// Drafts are listed but never linked, so they have no canonical path.
pub fn post_path(blog_prefix: &str, record: &ContentRecord) -> Option<String> {
    record
        .is_published()
        .then(|| blog_path(blog_prefix, &record.slug))
}

/// `<prefix>/<slug>`, regardless of status.
pub fn blog_path(blog_prefix: &str, slug: &str) -> String {
    format!("{}/{}", blog_prefix.trim_end_matches('/'), slug)
}

/// Insertion-ordered set of category names.
///
/// The filter UI lists categories in the order they first appear, so a plain
/// hash set won't do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl CategorySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a category. Returns `false` if it was already present.
    pub fn insert(&mut self, category: &str) -> bool {
        if self.seen.contains(category) {
            return false;
        }
        self.seen.insert(category.to_string());
        self.items.push(category.to_string());
        true
    }

    pub fn contains(&self, category: &str) -> bool {
        self.seen.contains(category)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }
}

impl<'a> FromIterator<&'a str> for CategorySet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = CategorySet::new();
        for category in iter {
            set.insert(category);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::types::Status;
    use tempfile::TempDir;

    #[test]
    fn duplicate_post_slug_is_rejected() {
        let posts = vec![
            post("a", "First", "Depression", Status::Published),
            post("a", "Second", "Anxiety", Status::Draft),
        ];
        let result = ContentRegistry::new(posts, vec![]);
        assert!(matches!(result, Err(RegistryError::DuplicateSlug(s)) if s == "a"));
    }

    #[test]
    fn slug_shared_by_post_and_tool_is_rejected() {
        let posts = vec![post("phq-9", "PHQ-9 explained", "Depression", Status::Published)];
        let tools = vec![tool("phq-9", "/phq-9-depression-test")];
        let result = ContentRegistry::new(posts, tools);
        assert!(matches!(result, Err(RegistryError::DuplicateSlug(_))));
    }

    #[test]
    fn empty_slug_is_rejected() {
        let posts = vec![post("  ", "Blank", "Depression", Status::Published)];
        assert!(matches!(
            ContentRegistry::new(posts, vec![]),
            Err(RegistryError::EmptySlug(_))
        ));
    }

    #[test]
    fn path_traversal_slug_is_rejected() {
        let posts = vec![post("../../../pwned", "Escape", "Depression", Status::Published)];
        assert!(matches!(
            ContentRegistry::new(posts, vec![]),
            Err(RegistryError::InvalidSlug(s)) if s == "../../../pwned"
        ));
    }

    #[test]
    fn non_kebab_slugs_are_rejected() {
        for slug in ["Upper", "has space", "a/b", "-lead", "trail-", "dou--ble", "caf\u{e9}"] {
            let posts = vec![post(slug, "Bad", "Depression", Status::Published)];
            assert!(
                matches!(
                    ContentRegistry::new(posts, vec![]),
                    Err(RegistryError::InvalidSlug(_))
                ),
                "slug {slug:?} accepted"
            );
        }
    }

    #[test]
    fn tool_slug_is_checked_too() {
        let tools = vec![tool("../gad-7", "/gad-7-anxiety-test")];
        assert!(matches!(
            ContentRegistry::new(vec![], tools),
            Err(RegistryError::InvalidSlug(_))
        ));
    }

    #[test]
    fn kebab_slugs_are_accepted() {
        for slug in ["a", "phq-9", "understanding-phq-9", "2024-recap"] {
            assert!(is_kebab_slug(slug), "slug {slug:?} rejected");
        }
    }

    #[test]
    fn relative_related_path_is_rejected() {
        let mut p = post("a", "A", "Depression", Status::Published);
        p.related_path = Some("phq-9-depression-test".to_string());
        assert!(matches!(
            ContentRegistry::new(vec![p], vec![]),
            Err(RegistryError::InvalidPath { .. })
        ));
    }

    #[test]
    fn relative_tool_path_is_rejected() {
        let tools = vec![tool("gad-7", "gad-7-anxiety-test")];
        assert!(matches!(
            ContentRegistry::new(vec![], tools),
            Err(RegistryError::InvalidPath { .. })
        ));
    }

    #[test]
    fn slugs_are_unique_in_sample() {
        let registry = sample_registry();
        let mut seen = HashSet::new();
        for slug in registry
            .posts()
            .iter()
            .map(|p| p.slug.as_str())
            .chain(registry.tools().iter().map(|t| t.slug.as_str()))
        {
            assert!(seen.insert(slug), "slug {slug} repeated");
        }
    }

    #[test]
    fn published_skips_drafts() {
        let registry = scenario_registry();
        let slugs: Vec<&str> = registry.published().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a"]);
        assert_eq!(registry.published_count(), 1);
    }

    #[test]
    fn categories_include_drafts_in_first_seen_order() {
        let registry = sample_registry();
        let set = registry.categories();
        let categories: Vec<&str> = set.iter().collect();
        assert_eq!(categories, vec!["Depression", "Anxiety", "Wellbeing"]);
    }

    #[test]
    fn posts_by_date_newest_first() {
        let registry = sample_registry();
        let dates: Vec<_> = registry.posts_by_date().iter().map(|p| p.date).collect();
        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted);
    }

    #[test]
    fn post_path_only_for_published() {
        let published = post("a", "A", "X", Status::Published);
        let draft = post("b", "B", "X", Status::Draft);
        assert_eq!(post_path("/blog", &published).as_deref(), Some("/blog/a"));
        assert_eq!(post_path("/blog/", &published).as_deref(), Some("/blog/a"));
        assert_eq!(post_path("/blog", &draft), None);
    }

    #[test]
    fn find_helpers() {
        let registry = sample_registry();
        assert!(registry.find_post("understanding-phq-9").is_some());
        assert!(registry.find_post("missing").is_none());
        assert_eq!(
            registry
                .find_tool_by_path("/gad-7-anxiety-test")
                .map(|t| t.slug.as_str()),
            Some("gad-7")
        );
    }

    // =========================================================================
    // CategorySet
    // =========================================================================

    #[test]
    fn category_set_rejects_duplicates() {
        let mut set = CategorySet::new();
        assert!(set.insert("Anxiety"));
        assert!(set.insert("Depression"));
        assert!(!set.insert("Anxiety"));
        assert_eq!(set.len(), 2);
        assert_eq!(set.as_slice(), &["Anxiety".to_string(), "Depression".to_string()]);
    }

    #[test]
    fn category_set_is_case_sensitive() {
        let set: CategorySet = ["Anxiety", "anxiety"].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains("anxiety"));
        assert!(!set.contains("ANXIETY"));
    }

    #[test]
    fn empty_registry_has_no_categories() {
        assert!(ContentRegistry::default().categories().is_empty());
    }

    // =========================================================================
    // load()
    // =========================================================================

    #[test]
    fn load_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let registry = ContentRegistry::load(tmp.path()).unwrap();
        assert!(registry.posts().is_empty());
        assert!(registry.tools().is_empty());
    }

    #[test]
    fn load_reads_fixtures() {
        let tmp = setup_fixtures();
        let registry = ContentRegistry::load(tmp.path()).unwrap();
        assert_eq!(registry.tools().len(), 2);
        let phq = find_post(&registry, "understanding-phq-9");
        assert_eq!(phq.category, "Depression");
        let gad = registry.find_tool_by_path("/gad-7-anxiety-test").unwrap();
        assert!(!gad.faq.is_empty());
    }

    #[test]
    fn load_rejects_duplicate_slugs() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("content.toml"),
            r#"
[[posts]]
slug = "same"
title = "One"
excerpt = ""
category = "A"
date = "2024-01-01"

[[posts]]
slug = "same"
title = "Two"
excerpt = ""
category = "B"
date = "2024-01-02"
"#,
        )
        .unwrap();
        assert!(matches!(
            ContentRegistry::load(tmp.path()),
            Err(RegistryError::DuplicateSlug(_))
        ));
    }

    #[test]
    fn load_rejects_malformed_date() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("content.toml"),
            r#"
[[posts]]
slug = "a"
title = "A"
excerpt = ""
category = "A"
date = "2024-13-45"
"#,
        )
        .unwrap();
        assert!(matches!(
            ContentRegistry::load(tmp.path()),
            Err(RegistryError::Toml(_))
        ));
    }
}
