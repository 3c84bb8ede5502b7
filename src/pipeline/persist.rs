//! JSON persistence of fitted encoders
//!
//! Only the encoder's own state is written: target columns, missing-column
//! policy and learned frequency tables, wrapped with a little metadata.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::encoder::FrequencyEncoder;

/// Metadata about the fit run that produced an artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Timestamp of the save (RFC 3339)
    pub created_at: String,
    /// trafreq version that wrote the file
    pub trafreq_version: String,
    /// Dataset the encoder was fit on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
}

/// Encoder plus metadata, as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderArtifact {
    pub metadata: ArtifactMetadata,
    pub encoder: FrequencyEncoder,
}

impl EncoderArtifact {
    pub fn new(encoder: FrequencyEncoder, source_file: Option<&str>) -> Self {
        Self {
            metadata: ArtifactMetadata {
                created_at: Utc::now().to_rfc3339(),
                trafreq_version: env!("CARGO_PKG_VERSION").to_string(),
                source_file: source_file.map(|s| s.to_string()),
            },
            encoder,
        }
    }
}

/// Write an encoder to a pretty-printed JSON file
pub fn save_encoder(
    encoder: &FrequencyEncoder,
    output_path: &Path,
    source_file: Option<&str>,
) -> Result<()> {
    let artifact = EncoderArtifact::new(encoder.clone(), source_file);

    let json = serde_json::to_string_pretty(&artifact)
        .context("Failed to serialize frequency encoder to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write encoder to {}", output_path.display()))?;

    Ok(())
}

/// Read an encoder artifact, metadata included
pub fn load_artifact(path: &Path) -> Result<EncoderArtifact> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read encoder file: {}", path.display()))?;

    serde_json::from_str(&json)
        .with_context(|| format!("Invalid encoder file: {}", path.display()))
}

/// Read the encoder out of an artifact file
pub fn load_encoder(path: &Path) -> Result<FrequencyEncoder> {
    Ok(load_artifact(path)?.encoder)
}
