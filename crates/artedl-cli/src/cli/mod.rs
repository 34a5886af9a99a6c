//! CLI for artedl.

use anyhow::Result;
use artedl_core::config::{self, ArtedlConfig, RunConfig};
use artedl_core::manifest::SelectionPolicy;
use artedl_core::{pipeline, ArtedlError};
use clap::{CommandFactory, Parser};
use std::path::PathBuf;

/// Download the video behind a media-portal page.
#[derive(Debug, Parser)]
#[command(name = "artedl")]
#[command(about = "artedl: fetch the preferred video variant of a portal page", long_about = None)]
pub struct Cli {
    /// Portal page URL of the video.
    #[arg(short = 'u', long)]
    pub url: Option<String>,

    /// Output directory (default: `destination` from config.toml, else /tmp).
    #[arg(short = 'd', long, value_name = "DIR")]
    pub destination: Option<PathBuf>,

    /// Print the intermediate URLs and the output path.
    #[arg(long)]
    pub debug: bool,

    /// Read settings from this file instead of ~/.config/artedl/config.toml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

pub fn run_from_args() -> Result<()> {
    Cli::parse().run()
}

impl Cli {
    pub fn run(self) -> Result<()> {
        self.require_url()?;
        let cfg = match &self.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        let run = self.run_config(&cfg)?;
        let policy = SelectionPolicy::from_config(&cfg.selection);
        let report = pipeline::run(&run, &policy)?;
        tracing::info!(
            "saved {} bytes from {} to {}",
            report.bytes,
            report.variant_url,
            report.path.display()
        );
        Ok(())
    }

    /// Fails with a config error and usage on stderr when the URL is missing.
    /// Runs before config.toml is read.
    fn require_url(&self) -> Result<(), ArtedlError> {
        self.run_config(&ArtedlConfig::default()).map(|_| ())
    }

    /// Builds the run inputs; prints usage to stderr when the URL is missing.
    fn run_config(&self, cfg: &ArtedlConfig) -> Result<RunConfig, ArtedlError> {
        RunConfig::new(self.url.clone(), self.destination.clone(), self.debug, cfg).map_err(|e| {
            eprintln!("You must give an url\n{}", Cli::command().render_usage());
            e
        })
    }
}

/// Exit status for a failed run: the error kind's code, or 1 for anything else.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<ArtedlError>()
        .map(ArtedlError::exit_code)
        .unwrap_or(1)
}
