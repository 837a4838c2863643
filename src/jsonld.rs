//! schema.org structured data (JSON-LD).
//!
//! Each generator is a pure function returning a typed document that
//! serializes to the JSON search engines expect. Field names follow
//! schema.org casing via serde renames.
//!
//! | Generator | `@type` | Inputs |
//! |-----------|---------|--------|
//! | [`organization_doc`] | `Organization` | site constants |
//! | [`tool_doc`] | `WebApplication` | [`ToolInfo`] |
//! | [`faq_doc`] | `FAQPage` | ordered question/answer pairs |
//! | [`article_doc`] | `Article` | [`ArticleInfo`] |
//! | [`breadcrumb_doc`] | `BreadcrumbList` | ordered `(name, url)` pairs |
//!
//! Dates are passed through as strings. Callers supply ISO-8601 values; the
//! `from_record` builders format registry dates, which were already parsed
//! and checked when the registry was loaded.

use crate::config::SiteConfig;
use crate::meta::canonical_url;
use crate::registry::post_path;
use crate::types::{ContentRecord, FaqEntry, ToolRecord};
use serde::Serialize;

const CONTEXT: &str = "https://schema.org";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationDoc {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub url: String,
    pub logo: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub same_as: Vec<String>,
}

/// Publisher reference nested inside other documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganizationRef {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<ImageObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageObject {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub url: String,
}

pub fn organization_doc(config: &SiteConfig) -> OrganizationDoc {
    OrganizationDoc {
        context: CONTEXT,
        kind: "Organization",
        name: config.site.name.clone(),
        url: canonical_url(config.origin(), "/"),
        logo: config.organization.logo.clone(),
        description: config.organization.description.clone(),
        same_as: config.organization.same_as.clone(),
    }
}

fn publisher(config: &SiteConfig) -> OrganizationRef {
    OrganizationRef {
        kind: "Organization",
        name: config.site.name.clone(),
        url: canonical_url(config.origin(), "/"),
        logo: Some(ImageObject {
            kind: "ImageObject",
            url: config.organization.logo.clone(),
        }),
    }
}

// ============================================================================
// WebApplication
// ============================================================================

/// Inputs for a tool's `WebApplication` document.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub url: String,
    /// ISO-8601.
    pub date_published: String,
    /// ISO-8601.
    pub date_modified: String,
}

impl ToolInfo {
    pub fn from_record(config: &SiteConfig, tool: &ToolRecord) -> Self {
        Self {
            name: tool.name.clone(),
            description: tool.description.clone(),
            url: canonical_url(config.origin(), &tool.path),
            date_published: tool.date_published.to_string(),
            date_modified: tool.date_modified.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebApplicationDoc {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub description: String,
    pub url: String,
    pub application_category: &'static str,
    pub operating_system: &'static str,
    pub offers: Offer,
    pub date_published: String,
    pub date_modified: String,
    pub publisher: OrganizationRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub price: &'static str,
    pub price_currency: &'static str,
}

pub fn tool_doc(config: &SiteConfig, info: &ToolInfo) -> WebApplicationDoc {
    WebApplicationDoc {
        context: CONTEXT,
        kind: "WebApplication",
        name: info.name.clone(),
        description: info.description.clone(),
        url: info.url.clone(),
        application_category: "HealthApplication",
        operating_system: "Any",
        offers: Offer {
            kind: "Offer",
            price: "0",
            price_currency: "USD",
        },
        date_published: info.date_published.clone(),
        date_modified: info.date_modified.clone(),
        publisher: publisher(config),
    }
}

// ============================================================================
// FAQPage
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqDoc {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub main_entity: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub accepted_answer: Answer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub text: String,
}

/// Questions appear in the order given, which is the order shown on the page.
pub fn faq_doc(entries: &[FaqEntry]) -> FaqDoc {
    FaqDoc {
        context: CONTEXT,
        kind: "FAQPage",
        main_entity: entries
            .iter()
            .map(|entry| Question {
                kind: "Question",
                name: entry.question.clone(),
                accepted_answer: Answer {
                    kind: "Answer",
                    text: entry.answer.clone(),
                },
            })
            .collect(),
    }
}

// ============================================================================
// Article
// ============================================================================

/// Inputs for an `Article` document.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleInfo {
    pub title: String,
    pub description: String,
    pub url: String,
    /// ISO-8601.
    pub date_published: String,
    /// ISO-8601.
    pub date_modified: String,
    /// Replaced by `site.default_image` when absent.
    pub image: Option<String>,
}

impl ArticleInfo {
    /// `None` for drafts, which have no URL to describe.
    pub fn from_record(config: &SiteConfig, record: &ContentRecord) -> Option<Self> {
        let path = post_path(&config.sitemap.blog_prefix, record)?;
        Some(Self {
            title: record.title.clone(),
            description: record.excerpt.clone(),
            url: canonical_url(config.origin(), &path),
            date_published: record.date.to_string(),
            date_modified: record.modified().to_string(),
            image: record.image.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDoc {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub headline: String,
    pub description: String,
    pub url: String,
    pub image: String,
    pub date_published: String,
    pub date_modified: String,
    pub author: OrganizationRef,
    pub publisher: OrganizationRef,
    pub main_entity_of_page: WebPageRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebPageRef {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    #[serde(rename = "@id")]
    pub id: String,
}

pub fn article_doc(config: &SiteConfig, info: &ArticleInfo) -> ArticleDoc {
    let image = info
        .image
        .as_deref()
        .filter(|img| !img.trim().is_empty())
        .unwrap_or(&config.site.default_image)
        .to_string();
    let org = publisher(config);
    ArticleDoc {
        context: CONTEXT,
        kind: "Article",
        headline: info.title.clone(),
        description: info.description.clone(),
        url: info.url.clone(),
        image,
        date_published: info.date_published.clone(),
        date_modified: info.date_modified.clone(),
        author: OrganizationRef {
            logo: None,
            ..org.clone()
        },
        publisher: org,
        main_entity_of_page: WebPageRef {
            kind: "WebPage",
            id: info.url.clone(),
        },
    }
}

// ============================================================================
// BreadcrumbList
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbDoc {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub item_list_element: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    /// 1-based.
    pub position: usize,
    pub name: String,
    pub item: String,
}

pub fn breadcrumb_doc<N, U>(crumbs: &[(N, U)]) -> BreadcrumbDoc
where
    N: AsRef<str>,
    U: AsRef<str>,
{
    BreadcrumbDoc {
        context: CONTEXT,
        kind: "BreadcrumbList",
        item_list_element: crumbs
            .iter()
            .enumerate()
            .map(|(idx, (name, url))| ListItem {
                kind: "ListItem",
                position: idx + 1,
                name: name.as_ref().to_string(),
                item: url.as_ref().to_string(),
            })
            .collect(),
    }
}

/// Any generated document, for callers that collect several per page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StructuredData {
    Organization(OrganizationDoc),
    WebApplication(WebApplicationDoc),
    Faq(FaqDoc),
    Article(ArticleDoc),
    Breadcrumb(BreadcrumbDoc),
}

impl StructuredData {
    pub fn type_name(&self) -> &'static str {
        match self {
            StructuredData::Organization(doc) => doc.kind,
            StructuredData::WebApplication(doc) => doc.kind,
            StructuredData::Faq(doc) => doc.kind,
            StructuredData::Article(doc) => doc.kind,
            StructuredData::Breadcrumb(doc) => doc.kind,
        }
    }
}
