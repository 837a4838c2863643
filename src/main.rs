use chrono::Utc;
use clap::{Parser, Subcommand};
use mindcheck_seo::config::SiteConfig;
use mindcheck_seo::filter::{CategoryFilter, filter_content};
use mindcheck_seo::redirects::RedirectTable;
use mindcheck_seo::registry::ContentRegistry;
use mindcheck_seo::{config, generate, output, sitemap};
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mindcheck-seo")]
#[command(about = "Metadata, structured data, sitemap and redirects for MindCheck")]
#[command(long_about = "\
Metadata, structured data, sitemap and redirects for MindCheck

Everything is derived from two files in the content directory:

  content/
  ├── config.toml      # Site constants, sitemap tuning, [[routes]], [[redirects]]
  └── content.toml     # [[posts]] and [[tools]] (with [[tools.faq]])

Draft posts are listed but never linked: they get no canonical URL, no
structured data and no sitemap entry.

Set RUST_LOG=debug for diagnostics on stderr.

Run 'mindcheck-seo gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate config and content, and verify the sitemap
    Check,
    /// Write sitemap, robots.txt, redirects, content index and page metadata
    Generate,
    /// Print sitemap.xml to stdout
    Sitemap,
    /// Show where a path redirects to
    Resolve {
        /// Request path, e.g. /phq9
        path: String,
    },
    /// Filter posts by search term and category
    Search {
        /// Exact category name ("all" for every category)
        #[arg(long)]
        category: Option<String>,
        /// Case-insensitive match against title and excerpt
        #[arg(default_value = "")]
        term: String,
    },
    /// Print metadata and JSON-LD for a route or blog post
    Meta {
        /// Site path, e.g. / or /blog/understanding-phq-9
        path: String,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Config, content and redirect table from the content directory.
fn load(source: &Path) -> Result<(SiteConfig, ContentRegistry, RedirectTable), Box<dyn Error>> {
    let site_config = config::load_config(source)?;
    let registry = ContentRegistry::load(source)?;
    let redirects = RedirectTable::from_config(&site_config.redirects)?;
    Ok((site_config, registry, redirects))
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Check => {
            let (site_config, registry, redirects) = load(&cli.source)?;
            let entries = sitemap::build_sitemap(&site_config, &registry, Utc::now());
            sitemap::verify_sitemap(&entries, &site_config, &registry)?;
            output::print_check_output(&site_config, &registry, &entries, &redirects);
        }
        Command::Generate => {
            let (site_config, registry, redirects) = load(&cli.source)?;
            let report = generate::generate(
                &site_config,
                &registry,
                &redirects,
                &cli.output,
                Utc::now(),
            )?;
            output::print_generate_output(&report);
        }
        Command::Sitemap => {
            let (site_config, registry, _) = load(&cli.source)?;
            let entries = sitemap::build_sitemap(&site_config, &registry, Utc::now());
            sitemap::verify_sitemap(&entries, &site_config, &registry)?;
            print!("{}", sitemap::render_sitemap_xml(&entries));
        }
        Command::Resolve { path } => {
            let (_, _, redirects) = load(&cli.source)?;
            let redirect = redirects.resolve(&path);
            output::print_resolve_output(&path, redirect.as_ref());
        }
        Command::Search { category, term } => {
            let (_, registry, _) = load(&cli.source)?;
            let filter = CategoryFilter::from_param(category.as_deref());
            let results = filter_content(registry.posts(), &term, &filter);
            output::print_search_output(&results, &term, &filter);
        }
        Command::Meta { path } => {
            let (site_config, registry, _) = load(&cli.source)?;
            match generate::page_for_path(&site_config, &registry, &path)? {
                Some(page) => output::print_meta_output(&page)?,
                None => return Err(format!("no published page at {path}").into()),
            }
        }
        Command::GenConfig => print!("{}", config::stock_config_toml()),
    }
    Ok(())
}
