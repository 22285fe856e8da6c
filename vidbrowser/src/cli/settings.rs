use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::settings::{BucketSettings, SettingsStore};

#[derive(Parser, Debug, Default)]
pub struct SettingsCommand {
    #[command(subcommand)]
    pub action: Option<SettingsAction>,
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Print the stored settings with the secret masked
    Show,
    /// Validate and store new settings, replacing the old ones
    Set {
        #[arg(long)]
        bucket: String,
        #[arg(long)]
        access_key_id: String,
        #[arg(long)]
        secret_access_key: String,
    },
}

impl SettingsCommand {
    pub fn run(self) -> Result<()> {
        let store = SettingsStore::new()?;

        match self.action.unwrap_or(SettingsAction::Show) {
            SettingsAction::Show => {
                let settings = store.load();
                println!("Settings file: {}", store.path().display());
                if !settings.is_configured() {
                    println!("Not configured. Run `vidbrowser settings set` first.");
                    return Ok(());
                }
                println!("  Bucket:            {}", settings.bucket);
                println!("  Access Key ID:     {}", settings.access_key_id);
                println!("  Secret Access Key: {}", settings.masked_secret());
            }
            SettingsAction::Set {
                bucket,
                access_key_id,
                secret_access_key,
            } => {
                let settings = BucketSettings::new(
                    bucket.trim(),
                    access_key_id.trim(),
                    secret_access_key.trim(),
                );
                settings.validate()?;
                store
                    .save(&settings)
                    .with_context(|| format!("Failed to save {}", store.path().display()))?;
                println!("Settings saved to {}", store.path().display());
            }
        }

        Ok(())
    }
}
