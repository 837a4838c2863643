//! Artifact generation.
//!
//! Takes the site config and content registry and writes everything the page
//! layer and the web server consume at deploy time.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── sitemap.xml
//! ├── robots.txt
//! ├── redirects.json              # ordered rules with HTTP status
//! ├── content-index.json          # listing data: posts (drafts flagged) + categories
//! └── pages/
//!     ├── index.json              # {path, metadata, structuredData}
//!     ├── index.head.html         # rendered <head> fragment
//!     ├── phq-9-depression-test.json
//!     ├── phq-9-depression-test.head.html
//!     └── blog/
//!         ├── understanding-phq-9.json
//!         └── understanding-phq-9.head.html
//! ```
//!
//! Every configured route and every published post gets a page artifact.
//! The sitemap is verified against the registry before anything is written.

use crate::config::SiteConfig;
use crate::head::render_head;
use crate::jsonld::{self, ArticleInfo, StructuredData, ToolInfo};
use crate::meta::{self, Intent, MetaError, MetadataDocument, PageIntent, canonical_url};
use crate::redirects::{RedirectSource, RedirectTable};
use crate::registry::{ContentRegistry, post_path};
use crate::sitemap::{self, SitemapError};
use crate::types::{ContentRecord, RouteDescriptor, Status};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Metadata error: {0}")]
    Meta(#[from] MetaError),
    #[error("Sitemap error: {0}")]
    Sitemap(#[from] SitemapError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Route,
    Tool,
    Post,
}

/// Metadata and structured data for one page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageArtifact {
    /// Site path, e.g. `/blog/understanding-phq-9`.
    pub path: String,
    /// Artifact stem under `pages/`, e.g. `blog/understanding-phq-9`.
    #[serde(skip)]
    pub name: String,
    #[serde(skip)]
    pub kind: PageKind,
    pub metadata: MetadataDocument,
    pub structured_data: Vec<StructuredData>,
}

/// Summary of a generation run.
#[derive(Debug)]
pub struct GenerateReport {
    pub output_dir: PathBuf,
    pub pages: Vec<GeneratedPage>,
    pub sitemap_entries: usize,
    pub redirects: usize,
    pub drafts_skipped: usize,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPage {
    pub path: String,
    pub kind: PageKind,
    /// Relative to the output directory, without extension.
    pub artifact: String,
}

/// Artifact stem for a site path: `/` is `index`, otherwise the path without
/// its leading and trailing slashes.
pub fn artifact_name(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "index".to_string()
    } else {
        trimmed.to_string()
    }
}

fn blog_label(config: &SiteConfig) -> String {
    config
        .routes
        .iter()
        .find(|r| r.path == config.sitemap.blog_prefix)
        .and_then(|r| r.title.clone())
        .unwrap_or_else(|| "Blog".to_string())
}

fn home_crumb(config: &SiteConfig) -> (String, String) {
    ("Home".to_string(), canonical_url(config.origin(), "/"))
}

fn route_artifact(
    config: &SiteConfig,
    registry: &ContentRegistry,
    route: &RouteDescriptor,
) -> Result<PageArtifact, GenerateError> {
    let origin = config.origin();
    let mut structured_data = vec![StructuredData::Organization(jsonld::organization_doc(config))];
    let mut crumbs = vec![home_crumb(config)];

    let (metadata, kind, label) = match registry.find_tool_by_path(&route.path) {
        Some(tool) => {
            // Route copy wins over the tool record where both exist.
            let mut intent = PageIntent::from_route(route);
            intent.title.get_or_insert_with(|| tool.name.clone());
            intent
                .description
                .get_or_insert_with(|| tool.description.clone());
            let metadata = meta::synthesize(config, Intent::Page(&intent))?;

            let info = ToolInfo::from_record(config, tool);
            structured_data.push(StructuredData::WebApplication(jsonld::tool_doc(
                config, &info,
            )));
            if !tool.faq.is_empty() {
                structured_data.push(StructuredData::Faq(jsonld::faq_doc(&tool.faq)));
            }
            let label = intent.title.unwrap_or_else(|| tool.name.clone());
            (metadata, PageKind::Tool, label)
        }
        None => {
            let intent = PageIntent::from_route(route);
            let metadata = meta::synthesize(config, Intent::Page(&intent))?;
            let label = route.title.clone().unwrap_or_else(|| route.path.clone());
            (metadata, PageKind::Route, label)
        }
    };

    if artifact_name(&route.path) != "index" {
        crumbs.push((label, canonical_url(origin, &route.path)));
    }
    structured_data.push(StructuredData::Breadcrumb(jsonld::breadcrumb_doc(&crumbs)));

    Ok(PageArtifact {
        path: route.path.clone(),
        name: artifact_name(&route.path),
        kind,
        metadata,
        structured_data,
    })
}

fn post_artifact(
    config: &SiteConfig,
    record: &ContentRecord,
) -> Result<PageArtifact, GenerateError> {
    let path = post_path(&config.sitemap.blog_prefix, record)
        .ok_or_else(|| MetaError::Draft(record.slug.clone()))?;
    let metadata = meta::synthesize(config, Intent::Post(record))?;
    let origin = config.origin();

    let mut structured_data = vec![StructuredData::Organization(jsonld::organization_doc(config))];
    if let Some(info) = ArticleInfo::from_record(config, record) {
        structured_data.push(StructuredData::Article(jsonld::article_doc(config, &info)));
    }
    let crumbs = vec![
        home_crumb(config),
        (
            blog_label(config),
            canonical_url(origin, &config.sitemap.blog_prefix),
        ),
        (record.title.clone(), canonical_url(origin, &path)),
    ];
    structured_data.push(StructuredData::Breadcrumb(jsonld::breadcrumb_doc(&crumbs)));

    Ok(PageArtifact {
        name: artifact_name(&path),
        path,
        kind: PageKind::Post,
        metadata,
        structured_data,
    })
}

/// Page artifacts for every route (declaration order) and every published
/// post (registry order).
pub fn page_artifacts(
    config: &SiteConfig,
    registry: &ContentRegistry,
) -> Result<Vec<PageArtifact>, GenerateError> {
    let mut pages = Vec::with_capacity(config.routes.len() + registry.posts().len());
    for route in &config.routes {
        pages.push(route_artifact(config, registry, route)?);
    }
    for record in registry.published() {
        pages.push(post_artifact(config, record)?);
    }
    Ok(pages)
}

/// Look up the page artifact for a site path.
///
/// A trailing slash is ignored. Returns `Ok(None)` when the path is neither a
/// route nor a published post.
pub fn page_for_path(
    config: &SiteConfig,
    registry: &ContentRegistry,
    path: &str,
) -> Result<Option<PageArtifact>, GenerateError> {
    let wanted = path.trim_end_matches('/');
    if let Some(route) = config
        .routes
        .iter()
        .find(|r| r.path.trim_end_matches('/') == wanted)
    {
        return route_artifact(config, registry, route).map(Some);
    }
    let post = registry.published().find(|record| {
        post_path(&config.sitemap.blog_prefix, record)
            .is_some_and(|p| p.trim_end_matches('/') == wanted)
    });
    post.map(|record| post_artifact(config, record)).transpose()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IndexEntry<'a> {
    slug: &'a str,
    title: &'a str,
    excerpt: &'a str,
    category: &'a str,
    date: NaiveDate,
    status: Status,
    read_time: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    related_path: Option<&'a str>,
    /// Absent for drafts, which are listed but not linked.
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

#[derive(Serialize)]
struct ContentIndex<'a> {
    categories: Vec<String>,
    posts: Vec<IndexEntry<'a>>,
}

fn content_index<'a>(config: &SiteConfig, registry: &'a ContentRegistry) -> ContentIndex<'a> {
    ContentIndex {
        categories: registry.categories().as_slice().to_vec(),
        posts: registry
            .posts_by_date()
            .into_iter()
            .map(|p| IndexEntry {
                slug: &p.slug,
                title: &p.title,
                excerpt: &p.excerpt,
                category: &p.category,
                date: p.date,
                status: p.status,
                read_time: &p.read_time,
                related_path: p.related_path.as_deref(),
                url: post_path(&config.sitemap.blog_prefix, p)
                    .map(|path| canonical_url(config.origin(), &path)),
            })
            .collect(),
    }
}

#[derive(Serialize)]
struct RedirectRecord<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pattern: Option<&'a str>,
    destination: &'a str,
    permanent: bool,
    status: u16,
}

fn redirect_records(table: &RedirectTable) -> Vec<RedirectRecord<'_>> {
    table
        .rules()
        .iter()
        .map(|rule| {
            let (source, pattern) = match &rule.source {
                RedirectSource::Exact(path) => (Some(path.as_str()), None),
                RedirectSource::Pattern(_) => (None, Some(rule.source.as_str())),
            };
            RedirectRecord {
                source,
                pattern,
                destination: &rule.destination,
                permanent: rule.permanent,
                status: rule.status_code(),
            }
        })
        .collect()
}

fn write_file(path: &Path, contents: &str) -> Result<(), GenerateError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    tracing::info!(path = %path.display(), "wrote artifact");
    Ok(())
}

/// Write all artifacts into `output_dir`.
pub fn generate(
    config: &SiteConfig,
    registry: &ContentRegistry,
    redirects: &RedirectTable,
    output_dir: &Path,
    generated_at: DateTime<Utc>,
) -> Result<GenerateReport, GenerateError> {
    let entries = sitemap::build_sitemap(config, registry, generated_at);
    sitemap::verify_sitemap(&entries, config, registry)?;
    let pages = page_artifacts(config, registry)?;

    fs::create_dir_all(output_dir)?;
    write_file(
        &output_dir.join("sitemap.xml"),
        &sitemap::render_sitemap_xml(&entries),
    )?;
    write_file(&output_dir.join("robots.txt"), &sitemap::robots_txt(config))?;
    write_file(
        &output_dir.join("redirects.json"),
        &serde_json::to_string_pretty(&redirect_records(redirects))?,
    )?;
    write_file(
        &output_dir.join("content-index.json"),
        &serde_json::to_string_pretty(&content_index(config, registry))?,
    )?;

    let pages_dir = output_dir.join("pages");
    let mut generated = Vec::with_capacity(pages.len());
    for page in &pages {
        let json = serde_json::to_string_pretty(page)?;
        write_file(&pages_dir.join(format!("{}.json", page.name)), &json)?;
        let head = render_head(&page.metadata, &page.structured_data)?;
        write_file(
            &pages_dir.join(format!("{}.head.html", page.name)),
            &head.into_string(),
        )?;
        generated.push(GeneratedPage {
            path: page.path.clone(),
            kind: page.kind,
            artifact: format!("pages/{}", page.name),
        });
    }

    Ok(GenerateReport {
        output_dir: output_dir.to_path_buf(),
        pages: generated,
        sitemap_entries: entries.len(),
        redirects: redirects.len(),
        drafts_skipped: registry.posts().len() - registry.published_count(),
        categories: registry.categories().iter().map(str::to_string).collect(),
    })
}
