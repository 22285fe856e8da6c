use anyhow::Result;
use clap::{Parser, Subcommand};

mod list;
mod probe;
mod settings;

pub use list::ListCommand;
pub use probe::ProbeCommand;
pub use settings::SettingsCommand;

#[derive(Parser, Debug)]
#[command(name = "vidbrowser")]
#[command(about = "Browse HLS masters in a bucket and probe their streams")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show or change the stored bucket settings (default: show)
    Settings(SettingsCommand),
    /// List master manifests from a saved bucket listing
    List(ListCommand),
    /// Play a stream headlessly and report its metadata and bandwidth
    Probe(ProbeCommand),
}

impl Args {
    pub async fn run(self) -> Result<()> {
        let command = self
            .command
            .unwrap_or(Command::Settings(SettingsCommand::default()));

        match command {
            Command::Settings(cmd) => cmd.run(),
            Command::List(cmd) => cmd.run(),
            Command::Probe(cmd) => cmd.run().await,
        }
    }
}
