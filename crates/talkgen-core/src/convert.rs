//! External slideshow conversion behind a capability trait.
//!
//! The conversion tool is opaque: given a presentation file it writes a
//! viewer page (`index.html`) and one `slide-NN.png` per page into the
//! destination directory. Implementations report the rendered slide count so
//! downstream code never has to re-derive the tool's naming convention.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;
use tokio::process::Command;

/// Why a conversion did not produce a slideshow.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The conversion command could not be started at all.
    #[error("launch {command}: {source}")]
    Launch {
        command: String,
        source: std::io::Error,
    },
    /// The command ran and exited non-zero; `diagnostics` holds its output.
    #[error("converter failed: {diagnostics}")]
    Failed { diagnostics: String },
}

/// Renders one presentation into a slideshow directory.
#[async_trait]
pub trait SlideRenderer: Send + Sync {
    /// Render `source` into `dest_dir`, returning the number of slide images
    /// produced. `force` asks the tool to regenerate existing output.
    async fn render(
        &self,
        source: &Path,
        dest_dir: &Path,
        title: &str,
        force: bool,
    ) -> Result<usize, RenderError>;
}

/// Invokes the configured external conversion command:
/// `<command> -p <pdf> -o <dir> -t <title> [-f]`.
pub struct CommandRenderer {
    command: String,
}

impl CommandRenderer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl SlideRenderer for CommandRenderer {
    async fn render(
        &self,
        source: &Path,
        dest_dir: &Path,
        title: &str,
        force: bool,
    ) -> Result<usize, RenderError> {
        let mut cmd = Command::new(&self.command);
        cmd.arg("-p")
            .arg(source)
            .arg("-o")
            .arg(dest_dir)
            .arg("-t")
            .arg(title);
        if force {
            cmd.arg("-f");
        }

        let output = cmd.output().await.map_err(|e| RenderError::Launch {
            command: self.command.clone(),
            source: e,
        })?;

        if !output.status.success() {
            let mut diagnostics = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if diagnostics.is_empty() {
                diagnostics = String::from_utf8_lossy(&output.stdout).trim().to_string();
            }
            return Err(RenderError::Failed { diagnostics });
        }

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            tracing::debug!("converter: {line}");
        }

        Ok(count_slide_images(dest_dir))
    }
}

/// Counts the `slide-*.png` files the conversion tool left in `dir`.
/// Also used to recover the count for talks skipped on a later run.
/// Returns 0 if the directory cannot be read.
pub fn count_slide_images(dir: &Path) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.starts_with("slide-") && name.ends_with(".png")
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn counts_only_slide_images() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("slide-01.png"), b"").unwrap();
        fs::write(dir.path().join("slide-02.png"), b"").unwrap();
        fs::write(dir.path().join("index.html"), b"").unwrap();
        fs::write(dir.path().join("deck.pdf"), b"").unwrap();
        assert_eq!(count_slide_images(dir.path()), 2);
    }

    #[test]
    fn count_of_missing_dir_is_zero() {
        assert_eq!(count_slide_images(Path::new("/nonexistent/talk")), 0);
    }

    #[tokio::test]
    async fn launch_failure_for_missing_command() {
        let renderer = CommandRenderer::new("/nonexistent/path/to/converter");
        let dir = tempfile::tempdir().unwrap();
        let result = renderer
            .render(Path::new("talk.pdf"), dir.path(), "Title", false)
            .await;
        assert!(matches!(result, Err(RenderError::Launch { .. })));
    }

    #[cfg(unix)]
    fn fake_converter_script(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let script = dir.join("convert.sh");
        fs::write(&script, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_run_reports_slide_count() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();
        // parse -o like the real tool, then drop a viewer page and two slides
        let script = fake_converter_script(
            dir.path(),
            r#"while getopts p:o:t:f opt; do [ "$opt" = o ] && dest="$OPTARG"; done
touch "$dest/index.html" "$dest/slide-01.png" "$dest/slide-02.png""#,
        );
        let renderer = CommandRenderer::new(script.to_string_lossy().to_string());
        let count = renderer
            .render(Path::new("talk.pdf"), &out, "Title", false)
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_carries_diagnostics() {
        let dir = tempfile::tempdir().unwrap();
        let script = fake_converter_script(dir.path(), "echo 'bad pdf' >&2\nexit 3");
        let renderer = CommandRenderer::new(script.to_string_lossy().to_string());
        let result = renderer
            .render(Path::new("talk.pdf"), dir.path(), "Title", false)
            .await;
        match result {
            Err(RenderError::Failed { diagnostics }) => assert!(diagnostics.contains("bad pdf")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }
}
