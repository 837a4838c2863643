//! `<head>` fragment rendering.
//!
//! Serializes a [`MetadataDocument`] and its structured data into the tags the
//! page layer drops into `<head>`. Uses [maud](https://maud.lambda.xyz/), so
//! every attribute value is escaped. JSON-LD goes into
//! `<script type="application/ld+json">` blocks, which maud does not escape,
//! so `</` is rewritten to `<\/` to keep a stray `</script>` in content from
//! closing the tag.

use crate::jsonld::StructuredData;
use crate::meta::MetadataDocument;
use maud::{Markup, PreEscaped, html};

/// JSON for embedding inside a `<script>` element.
fn script_json(doc: &StructuredData) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(doc)?.replace("</", "<\\/"))
}

/// Render meta tags, canonical link, and JSON-LD scripts for one page.
pub fn render_head(
    doc: &MetadataDocument,
    structured_data: &[StructuredData],
) -> Result<Markup, serde_json::Error> {
    let scripts = structured_data
        .iter()
        .map(script_json)
        .collect::<Result<Vec<_>, _>>()?;
    let og = &doc.open_graph;
    let twitter = &doc.twitter;

    Ok(html! {
        title { (doc.title) }
        meta name="description" content=(doc.description);
        @if !doc.keywords.is_empty() {
            meta name="keywords" content=(doc.keywords.join(", "));
        }
        link rel="canonical" href=(doc.canonical);
        meta name="robots" content=(doc.robots.directive());
        meta name="googlebot" content=(doc.robots.googlebot_directive());

        meta property="og:title" content=(og.title);
        meta property="og:description" content=(og.description);
        meta property="og:url" content=(og.url);
        meta property="og:site_name" content=(og.site_name);
        meta property="og:locale" content=(og.locale);
        meta property="og:type" content=(og.kind.as_str());
        meta property="og:image" content=(og.image);
        @if let Some(published) = &og.published_time {
            meta property="article:published_time" content=(published);
        }
        @if let Some(modified) = &og.modified_time {
            meta property="article:modified_time" content=(modified);
        }

        meta name="twitter:card" content=(twitter.card);
        meta name="twitter:title" content=(twitter.title);
        meta name="twitter:description" content=(twitter.description);
        meta name="twitter:image" content=(twitter.image);
        @if let Some(site) = &twitter.site {
            meta name="twitter:site" content=(site);
        }

        @for json in &scripts {
            script type="application/ld+json" { (PreEscaped(json)) }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonld::{self, ArticleInfo};
    use crate::meta::{Intent, PageIntent, synthesize};
    use crate::test_helpers::*;

    #[test]
    fn renders_core_tags() {
        let config = sample_config();
        let intent = PageIntent::new("/about").with_title("About");
        let doc = synthesize(&config, Intent::Page(&intent)).unwrap();
        let html = render_head(&doc, &[]).unwrap().into_string();

        assert!(html.contains("<title>About | MindCheck</title>"));
        assert!(html.contains(r#"<link rel="canonical" href="https://mindcheck.example/about">"#));
        assert!(html.contains(r#"<meta name="robots" content="index, follow">"#));
        assert!(html.contains(r#"property="og:type" content="website""#));
        assert!(html.contains(r#"name="twitter:card" content="summary_large_image""#));
        assert!(!html.contains("application/ld+json"));
    }

    #[test]
    fn article_tags_for_posts() {
        let config = sample_config();
        let registry = scenario_registry();
        let post = find_post(&registry, "a");
        let doc = synthesize(&config, Intent::Post(post)).unwrap();
        let info = ArticleInfo::from_record(&config, post).unwrap();
        let data = vec![StructuredData::Article(jsonld::article_doc(&config, &info))];
        let html = render_head(&doc, &data).unwrap().into_string();

        assert!(html.contains(r#"property="article:published_time" content="2024-01-01""#));
        assert!(html.contains(r#"<script type="application/ld+json">{"@context":"https://schema.org","@type":"Article""#));
    }

    #[test]
    fn escapes_attribute_values() {
        let config = sample_config();
        let intent = PageIntent::new("/about").with_description(r#"Say "hi" & <wave>"#);
        let doc = synthesize(&config, Intent::Page(&intent)).unwrap();
        let html = render_head(&doc, &[]).unwrap().into_string();
        assert!(html.contains("Say &quot;hi&quot; &amp; &lt;wave&gt;"));
    }

    #[test]
    fn script_close_tag_is_neutralized() {
        let faq = jsonld::faq_doc(&[crate::types::FaqEntry {
            question: "</script><script>alert(1)</script>".to_string(),
            answer: "no".to_string(),
        }]);
        let config = sample_config();
        let doc = synthesize(&config, Intent::Page(&PageIntent::new("/"))).unwrap();
        let html = render_head(&doc, &[StructuredData::Faq(faq)])
            .unwrap()
            .into_string();
        assert!(!html.contains("</script><script>"));
        assert!(html.contains(r"<\/script>"));
    }

    #[test]
    fn noindex_page_renders_noindex() {
        let config = sample_config();
        let intent = PageIntent::new("/thank-you").noindex();
        let doc = synthesize(&config, Intent::Page(&intent)).unwrap();
        let html = render_head(&doc, &[]).unwrap().into_string();
        assert!(html.contains(r#"<meta name="robots" content="noindex, follow">"#));
    }
}
