use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::audio_models::SampleFormat;

/// Highest sample rate accepted by the recorder and the WAV reader.
pub const MAX_SAMPLE_RATE: u32 = 192_000;

/// Highest channel count accepted by the recorder and the WAV reader.
pub const MAX_CHANNELS: u16 = 16;

/// Configuration for a capture session.
///
/// Describes the format negotiated with the audio source and how much
/// buffering sits between the realtime callback and the file writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfiguration {
    /// Negotiated sample rate in Hz (default: 48000).
    pub sample_rate: u32,

    /// Interleaved channel count (default: 1).
    pub channels: u16,

    /// Sample encoding delivered by the source (default: 16-bit PCM).
    pub sample_format: SampleFormat,

    /// Frames the consumer thread reads per block, normally one callback
    /// period (default: 480, 10 ms at 48 kHz).
    pub frames_per_block: u32,

    /// Ring buffer latency budget in milliseconds (default: 40).
    pub buffer_latency_ms: u32,

    /// Stop accepting audio once this many payload bytes are written.
    pub max_data_bytes: Option<u64>,

    /// Write a `.metadata.json` sidecar next to the recording on stop.
    pub write_metadata: bool,

    /// Human-readable label, used by presets.
    pub description: String,
}

impl CaptureConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate == 0 || self.sample_rate > MAX_SAMPLE_RATE {
            return Err(format!("unsupported sample rate: {}", self.sample_rate));
        }
        if self.channels == 0 || self.channels > MAX_CHANNELS {
            return Err(format!("unsupported channel count: {}", self.channels));
        }
        if self.frames_per_block == 0 {
            return Err("frames per block must be positive".into());
        }
        if self.buffer_latency_ms == 0 {
            return Err("buffer latency must be positive".into());
        }
        if self.max_data_bytes == Some(0) {
            return Err("data limit must be positive".into());
        }
        Ok(())
    }

    /// Bytes in one interleaved frame (the WAV block align).
    pub fn bytes_per_frame(&self) -> usize {
        self.channels as usize * self.sample_format.bytes_per_sample() as usize
    }

    /// Bytes the consumer thread reads per iteration.
    pub fn block_bytes(&self) -> usize {
        self.frames_per_block as usize * self.bytes_per_frame()
    }

    /// Ring buffer capacity: the latency budget, but never less than two
    /// blocks so one block can be in flight while the next arrives.
    pub fn ring_capacity_bytes(&self) -> usize {
        let latency_frames =
            (self.sample_rate as u64 * self.buffer_latency_ms as u64).div_ceil(1000) as usize;
        let frames = latency_frames.max(2 * self.frames_per_block as usize);
        frames * self.bytes_per_frame()
    }

    /// Built-in recording presets.
    pub fn presets() -> Vec<Self> {
        vec![
            Self::preset(48_000, 1, "standard recording, 48 kHz mono"),
            Self::preset(16_000, 1, "voice communication, 16 kHz mono"),
            Self::preset(16_000, 1, "voice recognition, 16 kHz mono"),
            Self::preset(44_100, 2, "camcorder, 44.1 kHz stereo"),
            Self::preset(48_000, 2, "unprocessed, 48 kHz stereo"),
            Self::preset(44_100, 2, "music, 44.1 kHz stereo"),
        ]
    }

    /// Load presets from a `{"configs": [...]}` JSON file.
    ///
    /// Falls back to [`CaptureConfiguration::presets`] if the file is missing,
    /// unparsable, or contains an invalid entry.
    pub fn load_presets(path: &Path) -> Vec<Self> {
        match read_presets(path) {
            Ok(configs) => {
                log::info!("Loaded {} recorder presets from {}", configs.len(), path.display());
                configs
            }
            Err(e) => {
                log::warn!("Using built-in presets, {}: {}", path.display(), e);
                Self::presets()
            }
        }
    }

    fn preset(sample_rate: u32, channels: u16, description: &str) -> Self {
        Self {
            sample_rate,
            channels,
            description: description.to_string(),
            ..Default::default()
        }
    }
}

impl Default for CaptureConfiguration {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            channels: 1,
            sample_format: SampleFormat::PcmI16,
            frames_per_block: 480,
            buffer_latency_ms: 40,
            max_data_bytes: None,
            write_metadata: false,
            description: String::new(),
        }
    }
}

#[derive(Deserialize)]
struct PresetFile {
    configs: Vec<CaptureConfiguration>,
}

fn read_presets(path: &Path) -> Result<Vec<CaptureConfiguration>, String> {
    let json = fs::read_to_string(path).map_err(|e| format!("failed to read presets: {}", e))?;
    let file: PresetFile =
        serde_json::from_str(&json).map_err(|e| format!("failed to parse presets: {}", e))?;
    for config in &file.configs {
        config.validate()?;
    }
    Ok(file.configs)
}
