use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Global configuration loaded from `~/.config/talkgen/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TalkgenConfig {
    /// Number of talks converted concurrently.
    pub workers: usize,
    /// External conversion command invoked once per talk.
    pub converter_command: String,
    /// Directory holding the landing page template and static assets.
    pub template_dir: PathBuf,
}

impl Default for TalkgenConfig {
    fn default() -> Self {
        Self {
            workers: 8,
            converter_command: "./script.sh".to_string(),
            template_dir: PathBuf::from("templates"),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("talkgen")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<TalkgenConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = TalkgenConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: TalkgenConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = TalkgenConfig::default();
        assert_eq!(cfg.workers, 8);
        assert_eq!(cfg.converter_command, "./script.sh");
        assert_eq!(cfg.template_dir, PathBuf::from("templates"));
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = TalkgenConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: TalkgenConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.workers, cfg.workers);
        assert_eq!(parsed.converter_command, cfg.converter_command);
        assert_eq!(parsed.template_dir, cfg.template_dir);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            workers = 2
            converter_command = "/usr/local/bin/mkslides"
            template_dir = "/srv/talks/templates"
        "#;
        let cfg: TalkgenConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.workers, 2);
        assert_eq!(cfg.converter_command, "/usr/local/bin/mkslides");
        assert_eq!(cfg.template_dir, PathBuf::from("/srv/talks/templates"));
    }
}
