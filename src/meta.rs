//! Page metadata synthesis.
//!
//! [`synthesize`] turns a page intent into a complete [`MetadataDocument`]:
//! title, description, keywords, canonical URL, Open Graph and Twitter card
//! fields, and crawler directives. Every field is filled, either from the
//! intent or from the site defaults in [`SiteInfo`](crate::config::SiteInfo).
//!
//! ## Titles
//!
//! Page titles are wrapped as `"<title> | <site name>"`. The root page is the
//! exception: it uses `site.home_title` standalone (or its own override,
//! also standalone). Pages that set no title fall back to the home title.
//!
//! ## Canonical URLs
//!
//! [`canonical_url`] is the only place an absolute URL is built. The sitemap
//! uses it too, so a page's canonical link and its sitemap `<loc>` are always
//! the same string.

use crate::config::SiteConfig;
use crate::registry::post_path;
use crate::types::{ContentRecord, RouteDescriptor, ToolRecord};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum MetaError {
    #[error("Draft post {0} has no canonical link")]
    Draft(String),
    #[error("Not a site path: {0:?}")]
    InvalidPath(String),
}

/// Everything a page's `<head>` needs, fully resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDocument {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub canonical: String,
    pub open_graph: OpenGraph,
    pub twitter: TwitterCard,
    pub robots: Robots,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    pub url: String,
    pub site_name: String,
    pub locale: String,
    #[serde(rename = "type")]
    pub kind: OgType,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OgType {
    Website,
    Article,
}

impl OgType {
    pub fn as_str(self) -> &'static str {
        match self {
            OgType::Website => "website",
            OgType::Article => "article",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwitterCard {
    pub card: &'static str,
    pub title: String,
    pub description: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Robots {
    pub index: bool,
    pub follow: bool,
    pub google_bot: GoogleBot,
}

/// Extended hints for Google's crawler. `-1` means no limit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleBot {
    pub index: bool,
    pub follow: bool,
    pub max_snippet: i32,
    pub max_image_preview: &'static str,
    pub max_video_preview: i32,
}

impl Robots {
    pub fn permissive() -> Self {
        Self::with_index(true)
    }

    fn with_index(index: bool) -> Self {
        Self {
            index,
            follow: true,
            google_bot: GoogleBot {
                index,
                follow: true,
                max_snippet: -1,
                max_image_preview: "large",
                max_video_preview: -1,
            },
        }
    }

    /// Value for `<meta name="robots">`.
    pub fn directive(&self) -> String {
        format!(
            "{}, {}",
            if self.index { "index" } else { "noindex" },
            if self.follow { "follow" } else { "nofollow" },
        )
    }

    /// Value for `<meta name="googlebot">`.
    pub fn googlebot_directive(&self) -> String {
        let bot = &self.google_bot;
        format!(
            "{}, {}, max-video-preview:{}, max-image-preview:{}, max-snippet:{}",
            if bot.index { "index" } else { "noindex" },
            if bot.follow { "follow" } else { "nofollow" },
            bot.max_video_preview,
            bot.max_image_preview,
            bot.max_snippet,
        )
    }
}

/// A page described by its path plus optional overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageIntent {
    pub path: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub image: Option<String>,
    /// Explicit opt-out of indexing. Nothing sets this implicitly.
    pub noindex: bool,
}

impl PageIntent {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = Some(keywords);
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn noindex(mut self) -> Self {
        self.noindex = true;
        self
    }

    pub fn from_route(route: &RouteDescriptor) -> Self {
        Self {
            path: route.path.clone(),
            title: route.title.clone(),
            description: route.description.clone(),
            ..Self::default()
        }
    }
}

/// What a page is about.
#[derive(Debug, Clone, Copy)]
pub enum Intent<'a> {
    Page(&'a PageIntent),
    Post(&'a ContentRecord),
    Tool(&'a ToolRecord),
}

/// Join the site origin and a path with exactly one slash between them.
///
/// `""` and `"/"` both map to `<origin>/`.
pub fn canonical_url(origin: &str, path: &str) -> String {
    format!(
        "{}/{}",
        origin.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn is_root(path: &str) -> bool {
    path.trim_matches('/').is_empty()
}

fn check_path(path: &str) -> Result<(), MetaError> {
    if path.contains("://") || path.chars().any(char::is_whitespace) {
        return Err(MetaError::InvalidPath(path.to_string()));
    }
    Ok(())
}

/// Apply the title template.
pub fn page_title(config: &SiteConfig, path: &str, title: Option<&str>) -> String {
    if is_root(path) {
        // The root page never gets the "| <site name>" suffix.
        return title.unwrap_or(&config.site.home_title).to_string();
    }
    match title {
        Some(title) => format!("{title} | {}", config.site.name),
        None => config.site.home_title.clone(),
    }
}

/// Resolved fields before the document is assembled.
struct Resolved<'a> {
    path: String,
    title: Option<&'a str>,
    description: Option<&'a str>,
    keywords: Option<&'a [String]>,
    image: Option<&'a str>,
    noindex: bool,
    kind: OgType,
    published_time: Option<String>,
    modified_time: Option<String>,
}

/// Build the metadata document for a page.
pub fn synthesize(config: &SiteConfig, intent: Intent<'_>) -> Result<MetadataDocument, MetaError> {
    let resolved = match intent {
        Intent::Page(page) => Resolved {
            path: page.path.clone(),
            title: page.title.as_deref(),
            description: page.description.as_deref(),
            keywords: page.keywords.as_deref(),
            image: page.image.as_deref(),
            noindex: page.noindex,
            kind: OgType::Website,
            published_time: None,
            modified_time: None,
        },
        Intent::Post(record) => {
            let path = post_path(&config.sitemap.blog_prefix, record)
                .ok_or_else(|| MetaError::Draft(record.slug.clone()))?;
            Resolved {
                path,
                title: Some(record.title.as_str()),
                description: Some(record.excerpt.as_str()),
                keywords: None,
                image: record.image.as_deref(),
                noindex: false,
                kind: OgType::Article,
                published_time: Some(record.date.to_string()),
                modified_time: Some(record.modified().to_string()),
            }
        }
        Intent::Tool(tool) => Resolved {
            path: tool.path.clone(),
            title: Some(tool.name.as_str()),
            description: Some(tool.description.as_str()),
            keywords: None,
            image: None,
            noindex: false,
            kind: OgType::Website,
            published_time: None,
            modified_time: None,
        },
    };
    check_path(&resolved.path)?;

    let site = &config.site;
    let title = page_title(config, &resolved.path, resolved.title);
    let description = resolved
        .description
        .filter(|d| !d.trim().is_empty())
        .unwrap_or(&site.default_description)
        .to_string();
    let keywords = resolved
        .keywords
        .map(<[String]>::to_vec)
        .unwrap_or_else(|| site.default_keywords.clone());
    let image = resolved.image.unwrap_or(&site.default_image).to_string();
    let canonical = canonical_url(config.origin(), &resolved.path);

    tracing::debug!(path = %resolved.path, %canonical, "synthesized metadata");

    Ok(MetadataDocument {
        open_graph: OpenGraph {
            title: title.clone(),
            description: description.clone(),
            url: canonical.clone(),
            site_name: site.name.clone(),
            locale: site.locale.clone(),
            kind: resolved.kind,
            image: image.clone(),
            published_time: resolved.published_time,
            modified_time: resolved.modified_time,
        },
        twitter: TwitterCard {
            card: "summary_large_image",
            title: title.clone(),
            description: description.clone(),
            image,
            site: site.twitter_handle.clone(),
        },
        robots: Robots::with_index(!resolved.noindex),
        title,
        description,
        keywords,
        canonical,
    })
}
