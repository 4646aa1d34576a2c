//! CLI for the talkgen site generator.

mod build;

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use talkgen_core::config;

/// Generate talk slideshows and a landing page from presentation sources.
#[derive(Debug, Parser)]
#[command(name = "talkgen")]
#[command(about = "talkgen: batch talk slideshow and landing page generator", long_about = None)]
pub struct Cli {
    /// Directory containing one subdirectory per talk.
    pub talks_dir: PathBuf,

    /// Output directory for the generated site.
    pub output_dir: PathBuf,

    /// Rebuild every talk even if its slideshow already exists.
    #[arg(long)]
    pub force: bool,
}

pub async fn run_from_args() -> Result<()> {
    let cli = Cli::parse();

    if !cli.talks_dir.exists() {
        bail!("talks directory does not exist: {}", cli.talks_dir.display());
    }

    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);

    build::run_build(&cli, &cfg).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_dirs() {
        let cli = Cli::try_parse_from(["talkgen", "talks", "public"]).unwrap();
        assert_eq!(cli.talks_dir, PathBuf::from("talks"));
        assert_eq!(cli.output_dir, PathBuf::from("public"));
        assert!(!cli.force);
    }

    #[test]
    fn parses_force_flag() {
        let cli = Cli::try_parse_from(["talkgen", "talks", "public", "--force"]).unwrap();
        assert!(cli.force);
    }

    #[test]
    fn rejects_missing_output_dir_arg() {
        assert!(Cli::try_parse_from(["talkgen", "talks"]).is_err());
    }
}
