//! Single-talk lifecycle: load metadata, check completion, convert, publish.

use std::path::Path;

use crate::convert::{count_slide_images, SlideRenderer};
use crate::metadata::{self, TalkMeta};

/// Descriptor file expected in every talk directory.
pub const METADATA_FILE: &str = "metadata.yml";

/// Viewer page the conversion tool writes; doubles as the completion marker.
pub const INDEX_FILE: &str = "index.html";

/// A talk ready to list: descriptor plus its directory-derived handle and the
/// number of rendered slide images.
#[derive(Debug, Clone, PartialEq)]
pub struct TalkRecord {
    pub handle: String,
    pub meta: TalkMeta,
    pub slide_count: usize,
}

/// Result of processing one talk directory.
#[derive(Debug)]
pub enum TalkOutcome {
    /// Freshly converted this run.
    Processed(TalkRecord),
    /// Output already present; metadata still loaded so the talk stays listable.
    Skipped(TalkRecord),
    /// This talk failed; siblings are unaffected.
    Failed(String),
}

/// A talk is complete iff its output directory exists and contains the viewer page.
pub fn is_talk_built(talk_output_dir: &Path) -> bool {
    talk_output_dir.is_dir() && talk_output_dir.join(INDEX_FILE).exists()
}

/// Bring one talk from source to published state.
///
/// Only this talk's own files are touched; the outcome is handed back to the
/// scheduler, which owns all shared accounting.
pub async fn process_talk(
    talk_dir: &Path,
    output_root: &Path,
    renderer: &dyn SlideRenderer,
    force: bool,
) -> TalkOutcome {
    let handle = match talk_dir.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.to_string(),
        None => {
            return TalkOutcome::Failed(format!(
                "invalid talk directory name: {}",
                talk_dir.display()
            ))
        }
    };

    let metadata_file = talk_dir.join(METADATA_FILE);
    let meta = match metadata::load_talk_meta(&metadata_file) {
        Ok(meta) => meta,
        Err(e) => return TalkOutcome::Failed(format!("{}: {}", metadata_file.display(), e)),
    };

    let talk_output_dir = output_root.join(&handle);
    if !force && is_talk_built(&talk_output_dir) {
        tracing::debug!(handle = %handle, "already built, skipping");
        let slide_count = count_slide_images(&talk_output_dir);
        return TalkOutcome::Skipped(TalkRecord {
            handle,
            meta,
            slide_count,
        });
    }

    let pdf_file = talk_dir.join(&meta.pdf);
    if !pdf_file.exists() {
        return TalkOutcome::Failed(format!(
            "{}: source file not found: {}",
            handle,
            pdf_file.display()
        ));
    }

    if let Err(e) = std::fs::create_dir_all(&talk_output_dir) {
        return TalkOutcome::Failed(format!("{}: create output dir: {}", handle, e));
    }

    tracing::info!(handle = %handle, "rendering slideshow");
    let slide_count = match renderer
        .render(&pdf_file, &talk_output_dir, &meta.title, force)
        .await
    {
        Ok(n) => n,
        Err(e) => return TalkOutcome::Failed(format!("{}: {}", handle, e)),
    };

    // Serve the source file next to the slideshow.
    if let Err(e) = tokio::fs::copy(&pdf_file, talk_output_dir.join(&meta.pdf)).await {
        return TalkOutcome::Failed(format!("{}: copy {}: {}", handle, meta.pdf, e));
    }

    TalkOutcome::Processed(TalkRecord {
        handle,
        meta,
        slide_count,
    })
}
