//! Catalog commands: search, show, open, repo
//!
//! Each command builds a fresh catalog from the configured document source
//! (cached for the configured TTL) and works on that snapshot.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use nipdex_core::catalog::{
    CachedSource, Catalog, CatalogStore, DocumentCache, FileSource, GithubContentsSource, Query,
    SettingsManager, UrlTarget, REPOSITORY_URL, SITE_URL,
};

use crate::render;

/// Where to read the NIPs index from
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Force refresh of the NIPs index (bypass cache)
    #[clap(long)]
    pub refresh: bool,

    /// Read the index from a local README.md instead of GitHub
    #[clap(long, conflicts_with = "refresh")]
    pub file: Option<PathBuf>,
}

/// Fetch the index and build a catalog.
///
/// A failed fetch is reported on stderr and yields an empty catalog, so
/// commands show "no results" rather than failing.
async fn load_catalog(settings: &SettingsManager, source: &SourceArgs) -> Result<Arc<Catalog>> {
    let store = CatalogStore::new();

    let report = match &source.file {
        Some(path) => store.rebuild(&FileSource::new(path)).await,
        None => {
            let cache = DocumentCache::new(
                SettingsManager::cache_dir()?,
                settings.settings().cache_ttl(),
            );
            let remote = CachedSource::new(
                GithubContentsSource::new(&settings.settings().document_url),
                cache,
            )
            .force_refresh(source.refresh);
            store.rebuild(&remote).await
        }
    };

    if let Some(error) = &report.error {
        eprintln!("Warning: could not load the NIPs index: {error}");
    }

    Ok(store.snapshot().await)
}

pub async fn execute_search(
    settings: &SettingsManager,
    query: &str,
    json_output: bool,
    source: &SourceArgs,
) -> Result<()> {
    let catalog = load_catalog(settings, source).await?;
    let query = Query::parse(query);
    let results = catalog.filter(&query);

    if json_output {
        let json_results: Vec<serde_json::Value> =
            results.iter().map(|entry| render::entry_json(entry)).collect();
        println!("{}", serde_json::to_string_pretty(&json_results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No NIPs found matching '{}'.", query.text());
        return Ok(());
    }

    println!(
        "Found {} NIP(s) (index built {}):\n",
        results.len(),
        catalog.built_at().format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("{}", render::entries_table(&results));

    Ok(())
}

pub async fn execute_show(
    settings: &SettingsManager,
    id: &str,
    json_output: bool,
    source: &SourceArgs,
) -> Result<()> {
    let catalog = load_catalog(settings, source).await?;
    let entry = catalog
        .get(id)
        .with_context(|| format!("NIP-{id} not found in catalog"))?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&render::entry_json(entry))?);
        return Ok(());
    }

    println!();
    println!("NIP-{}: {}", entry.identifier(), entry.title().plain_text());
    println!("File:   {}", entry.source_file());

    if !entry.kinds().is_empty() {
        println!("Kinds:  {}", render::format_kinds(entry.kinds()));
    }
    if !entry.tags().is_empty() {
        println!("Tags:   {}", render::format_tags(entry.tags()));
    }

    println!();
    println!("GitHub: {}", entry.repository_url());
    println!("Site:   {}", entry.site_url());

    Ok(())
}

pub async fn execute_open(
    settings: &SettingsManager,
    id: &str,
    target: Option<UrlTarget>,
    print_only: bool,
    source: &SourceArgs,
) -> Result<()> {
    let catalog = load_catalog(settings, source).await?;
    let entry = catalog
        .get(id)
        .with_context(|| format!("NIP-{id} not found in catalog"))?;

    let target = target.or(settings.url_target()).unwrap_or_default();
    let url = entry.url_for(target);
    tracing::debug!("Opening NIP-{} via {}", entry.identifier(), target);

    open_url(&url, print_only)
}

/// Open the home page of the NIPs repository or of the NIPs site
pub fn execute_repo(target: UrlTarget, print_only: bool) -> Result<()> {
    let url = match target {
        UrlTarget::Github => REPOSITORY_URL.to_string(),
        UrlTarget::Site => format!("{SITE_URL}/"),
    };
    open_url(&url, print_only)
}

fn open_url(url: &str, print_only: bool) -> Result<()> {
    if print_only {
        println!("{url}");
        return Ok(());
    }

    open::that(url).with_context(|| format!("Failed to open {url} in a browser"))?;
    println!("Opened {url}");
    Ok(())
}
