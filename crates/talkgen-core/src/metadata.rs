//! Talk descriptor loading and validation.
//!
//! Every talk directory carries a `metadata.yml` with a top-level `talk`
//! section. Loading fails closed: any malformed descriptor is reported as a
//! typed error and the talk is excluded from the batch.

use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Required fields of the `talk` section, in reporting order.
const REQUIRED_FIELDS: [&str; 5] = ["title", "pdf", "description", "highlight", "date"];

/// Parsed `metadata.yml` for one talk.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TalkMeta {
    pub title: String,
    /// Presentation file, relative to the talk directory.
    pub pdf: String,
    /// Markdown shown under the talk on the landing page.
    pub description: String,
    /// 1-based slide index used as the landing page thumbnail.
    pub highlight: u32,
    pub date: NaiveDate,
    /// Optional recording URL.
    #[serde(default)]
    pub video: Option<String>,
}

/// Why a descriptor could not be loaded.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("missing `talk` section")]
    MissingSection,
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid metadata: {0}")]
    Parse(String),
    #[error("read descriptor: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse the descriptor at `path`. Field presence is checked before
/// deserialization so the first missing field is named explicitly.
pub fn load_talk_meta(path: &Path) -> Result<TalkMeta, MetadataError> {
    let text = std::fs::read_to_string(path)?;
    let doc: serde_yaml::Value =
        serde_yaml::from_str(&text).map_err(|e| MetadataError::Parse(e.to_string()))?;

    let talk = doc.get("talk").ok_or(MetadataError::MissingSection)?;
    if !talk.is_mapping() {
        return Err(MetadataError::MissingSection);
    }
    for field in REQUIRED_FIELDS {
        if talk.get(field).is_none() {
            return Err(MetadataError::MissingField(field));
        }
    }

    serde_yaml::from_value(talk.clone()).map_err(|e| MetadataError::Parse(e.to_string()))
}
