use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono::Local;
use clap::Parser;

use crate::listing::{self, DEFAULT_REGION, JsonListing};
use crate::settings::SettingsStore;

#[derive(Parser, Debug)]
pub struct ListCommand {
    /// Saved bucket listing (a ListObjects response or an array of objects)
    #[arg(short, long)]
    pub listing: PathBuf,

    /// Only show keys containing this text (case-insensitive)
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Only consider keys starting with this prefix
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Region used to build public URLs
    #[arg(short, long, default_value = DEFAULT_REGION)]
    pub region: String,
}

impl ListCommand {
    pub fn run(self) -> Result<()> {
        let settings = SettingsStore::new()?.load();
        if !settings.is_configured() {
            bail!("Bucket settings are not configured. Run `vidbrowser settings set` first.");
        }

        let lister = JsonListing::new(&self.listing);
        let masters = listing::list_masters(
            &lister,
            &settings,
            self.prefix.as_deref(),
            &self.search,
            &self.region,
        );

        if masters.is_empty() {
            println!("No master manifests found in '{}'", settings.bucket);
            return Ok(());
        }

        println!("Master manifests in '{}':", settings.bucket);
        for object in &masters {
            let modified = object
                .entry
                .last_modified
                .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "N/A".to_string());
            let size = object
                .entry
                .size
                .map(|s| s.to_string())
                .unwrap_or_else(|| "?".to_string());

            println!("  - {} ({})", object.title(), object.key());
            println!("      {} bytes, modified {}", size, modified);
            println!("      {}", object.url);
        }
        Ok(())
    }
}
