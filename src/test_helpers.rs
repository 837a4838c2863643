//! Shared test utilities.
//!
//! Provides canned configs and registries, record builders, and lookup
//! helpers that panic with a useful message on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let config = sample_config();
//! let registry = sample_registry();
//! let post = find_post(&registry, "understanding-phq-9");
//! assert_eq!(post.category, "Depression");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::config::SiteConfig;
use crate::registry::ContentRegistry;
use crate::types::{ContentRecord, FaqEntry, Status, ToolRecord};
use chrono::NaiveDate;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    for entry in std::fs::read_dir(&fixtures).unwrap() {
        let entry = entry.unwrap();
        std::fs::copy(entry.path(), tmp.path().join(entry.file_name())).unwrap();
    }
    tmp
}

// =========================================================================
// Builders
// =========================================================================

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or_else(|e| panic!("bad date {s:?}: {e}"))
}

pub fn sample_config() -> SiteConfig {
    SiteConfig::default()
}

/// A post dated 2024-01-01 with an excerpt derived from its title.
pub fn post(slug: &str, title: &str, category: &str, status: Status) -> ContentRecord {
    ContentRecord {
        slug: slug.to_string(),
        title: title.to_string(),
        excerpt: format!("About {}.", title.to_lowercase()),
        category: category.to_string(),
        date: date("2024-01-01"),
        date_modified: None,
        status,
        related_path: None,
        read_time: "5 min read".to_string(),
        image: None,
    }
}

pub fn tool(slug: &str, path: &str) -> ToolRecord {
    ToolRecord {
        slug: slug.to_string(),
        name: slug.to_uppercase(),
        description: format!("{slug} screening questionnaire."),
        path: path.to_string(),
        date_published: date("2024-01-15"),
        date_modified: date("2024-06-01"),
        faq: Vec::new(),
    }
}

fn dated(
    mut record: ContentRecord,
    excerpt: &str,
    published: &str,
    modified: Option<&str>,
) -> ContentRecord {
    record.excerpt = excerpt.to_string();
    record.date = date(published);
    record.date_modified = modified.map(date);
    record
}

// =========================================================================
// Canned registries
// =========================================================================

/// Two posts: `a` (published, Depression) and `b` (draft, Anxiety).
pub fn scenario_registry() -> ContentRegistry {
    let posts = vec![
        post("a", "Understanding PHQ-9", "Depression", Status::Published),
        post("b", "Coping with Anxiety", "Anxiety", Status::Draft),
    ];
    ContentRegistry::new(posts, Vec::new()).unwrap()
}

/// Five posts across three categories (one draft) and both screening tools.
pub fn sample_registry() -> ContentRegistry {
    let mut phq_post = dated(
        post(
            "understanding-phq-9",
            "Understanding the PHQ-9",
            "Depression",
            Status::Published,
        ),
        "What the nine questions measure and how scores are read.",
        "2024-03-01",
        Some("2024-04-10"),
    );
    phq_post.related_path = Some("/phq-9-depression-test".to_string());

    let mut gad_post = dated(
        post(
            "reading-your-gad-7-score",
            "Reading Your GAD-7 Score",
            "Anxiety",
            Status::Published,
        ),
        "How the GAD-7 measures anxiety symptoms over two weeks.",
        "2024-03-15",
        None,
    );
    gad_post.related_path = Some("/gad-7-anxiety-test".to_string());

    let posts = vec![
        phq_post,
        gad_post,
        dated(
            post(
                "coping-with-panic",
                "Coping with Panic Attacks",
                "Anxiety",
                Status::Draft,
            ),
            "Short-term steps for sudden anxiety spikes.",
            "2024-04-20",
            None,
        ),
        dated(
            post(
                "grounding-techniques",
                "Five Grounding Techniques",
                "Wellbeing",
                Status::Published,
            ),
            "Simple exercises for moments of stress.",
            "2024-02-10",
            None,
        ),
        dated(
            post("sleep-and-mood", "Sleep and Mood", "Wellbeing", Status::Published),
            "How rest affects depression and anxiety symptoms.",
            "2024-01-20",
            Some("2024-02-01"),
        ),
    ];

    let mut phq = tool("phq-9", "/phq-9-depression-test");
    phq.name = "PHQ-9 Depression Test".to_string();
    phq.description = "Nine-question depression screening.".to_string();

    let mut gad = tool("gad-7", "/gad-7-anxiety-test");
    gad.name = "GAD-7 Anxiety Test".to_string();
    gad.description = "Seven-question anxiety screening.".to_string();
    gad.date_published = date("2024-02-01");
    gad.faq = vec![
        FaqEntry {
            question: "Is this a diagnosis?".to_string(),
            answer: "No. It is a screening tool.".to_string(),
        },
        FaqEntry {
            question: "How long does it take?".to_string(),
            answer: "About two minutes.".to_string(),
        },
    ];

    ContentRegistry::new(posts, vec![phq, gad]).unwrap()
}

// =========================================================================
// Lookups (panic with a clear message on miss)
// =========================================================================

/// Find a post by slug. Panics if not found.
pub fn find_post<'a>(registry: &'a ContentRegistry, slug: &str) -> &'a ContentRecord {
    registry.find_post(slug).unwrap_or_else(|| {
        let slugs: Vec<&str> = registry.posts().iter().map(|p| p.slug.as_str()).collect();
        panic!("post '{slug}' not found. Available: {slugs:?}")
    })
}
