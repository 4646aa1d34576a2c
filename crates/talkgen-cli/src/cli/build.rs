//! Top-level build: run the batch, then the landing page and summary.

use anyhow::Result;
use std::sync::Arc;
use talkgen_core::config::TalkgenConfig;
use talkgen_core::convert::CommandRenderer;
use talkgen_core::{landing, report, scheduler};

use super::Cli;

pub async fn run_build(cli: &Cli, cfg: &TalkgenConfig) -> Result<()> {
    let renderer = Arc::new(CommandRenderer::new(cfg.converter_command.clone()));

    let mut batch = scheduler::run_batch(
        &cli.talks_dir,
        &cli.output_dir,
        renderer,
        cli.force,
        cfg.workers,
    )
    .await?;

    // Only render when there is something to list; a missing template is
    // recorded like any other error and the page is left unwritten.
    if batch.has_listable() {
        let listable = batch.listable();
        match landing::render_landing(&listable, &cfg.template_dir, &cli.output_dir) {
            Ok(()) => {
                if let Err(e) = landing::copy_assets(&cfg.template_dir, &cli.output_dir) {
                    batch.errors.push(format!("assets: {e:#}"));
                }
            }
            Err(e) => batch.errors.push(format!("landing page: {e:#}")),
        }
    }

    report::print_summary(&batch);

    // Per-talk errors never fail the run as a whole.
    Ok(())
}
