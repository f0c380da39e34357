use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::audio_models::{CaptureSessionDiagnostics, SampleFormat};

/// Result returned when a capture session is stopped and its file finalized.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingResult {
    pub file_path: PathBuf,
    pub duration_secs: f64,
    /// Payload bytes in the `data` chunk.
    pub data_bytes: u64,
    /// SHA-256 hex digest of the finished file.
    pub checksum: String,
    pub diagnostics: CaptureSessionDiagnostics,
    pub metadata: RecordingMetadata,
}

/// Metadata describing a finished recording.
///
/// Serializable for the JSON sidecar written next to the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    pub id: String,
    pub created_at: String,
    pub file_path: String,
    pub duration_secs: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub sample_format: SampleFormat,
    pub data_bytes: u64,
    pub dropped_blocks: u64,
    pub dropped_bytes: u64,
    pub checksum: String,
}

impl RecordingMetadata {
    pub fn new(
        file_path: &str,
        sample_rate: u32,
        channels: u16,
        sample_format: SampleFormat,
        data_bytes: u64,
        diagnostics: &CaptureSessionDiagnostics,
        checksum: &str,
    ) -> Self {
        let byte_rate = sample_rate as u64 * channels as u64 * sample_format.bytes_per_sample() as u64;
        let duration_secs = if byte_rate == 0 {
            0.0
        } else {
            data_bytes as f64 / byte_rate as f64
        };

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            file_path: file_path.to_string(),
            duration_secs,
            sample_rate,
            channels,
            sample_format,
            data_bytes,
            dropped_blocks: diagnostics.dropped_blocks,
            dropped_bytes: diagnostics.dropped_bytes,
            checksum: checksum.to_string(),
        }
    }
}
