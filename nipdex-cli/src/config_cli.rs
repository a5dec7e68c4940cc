//! Settings and cache commands

use anyhow::Result;
use clap::Subcommand;

use nipdex_core::catalog::{DocumentCache, SettingsManager, UrlTarget};

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the current settings
    Show,

    /// Set which URL `open` uses by default (github or site)
    SetTarget {
        /// github: the markdown file on GitHub; site: the rendered page
        target: UrlTarget,
    },

    /// Forget the default URL target
    ClearTarget,

    /// Print the settings file location
    Path,
}

#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Remove cached copies of the NIPs index
    Clear,
}

impl ConfigCommand {
    pub fn execute(self, mut settings: SettingsManager) -> Result<()> {
        match self {
            ConfigCommand::Show => {
                let current = settings.settings();
                println!("Settings file: {}", settings.path().display());
                println!("Document URL:  {}", current.document_url);
                println!("Cache TTL:     {}s", current.cache_ttl_secs);
                match current.url_target {
                    Some(target) => println!("URL target:    {target}"),
                    None => println!("URL target:    (not set, defaults to github)"),
                }
            }
            ConfigCommand::SetTarget { target } => {
                settings.set_url_target(Some(target));
                settings.save()?;
                println!("Default URL target set to '{target}'");
            }
            ConfigCommand::ClearTarget => {
                settings.set_url_target(None);
                settings.save()?;
                println!("Default URL target cleared");
            }
            ConfigCommand::Path => {
                println!("{}", settings.path().display());
            }
        }

        Ok(())
    }
}

impl CacheCommand {
    pub fn execute(self, settings: &SettingsManager) -> Result<()> {
        match self {
            CacheCommand::Clear => {
                let cache = DocumentCache::new(
                    SettingsManager::cache_dir()?,
                    settings.settings().cache_ttl(),
                );
                let removed = cache.clear()?;
                println!("Removed {removed} cached document(s) from {}", cache.dir().display());
            }
        }

        Ok(())
    }
}
