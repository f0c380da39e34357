//! WAV file format utilities.
//!
//! Encodes and decodes the canonical 44-byte RIFF WAV header and checks the
//! fields a reader must trust before streaming any payload.

use crate::models::audio_models::{SampleFormat, FORMAT_CODE_PCM};
use crate::models::config::{MAX_CHANNELS, MAX_SAMPLE_RATE};
use crate::models::error::CaptureError;

/// Size of the standard WAV RIFF header in bytes.
pub const WAV_HEADER_SIZE: usize = 44;

/// Size of the canonical PCM `fmt ` chunk body.
pub const FMT_CHUNK_SIZE: u32 = 16;

/// Envelope bytes counted by the RIFF size field besides the payload:
/// `"WAVE"` + `fmt ` chunk header and body + `data` chunk header.
pub const RIFF_OVERHEAD: u32 = 36;

/// Largest payload whose RIFF size still fits in 32 bits.
pub const MAX_DATA_SIZE: u32 = u32::MAX - RIFF_OVERHEAD;

pub const RIFF_TAG: [u8; 4] = *b"RIFF";
pub const WAVE_TAG: [u8; 4] = *b"WAVE";
pub const FMT_TAG: [u8; 4] = *b"fmt ";
pub const DATA_TAG: [u8; 4] = *b"data";

const SUPPORTED_BIT_DEPTHS: [u16; 4] = [8, 16, 24, 32];

/// In-memory WAV header.
///
/// Layout produced by [`WavHeader::to_bytes`]:
/// ```text
/// [0-3]    "RIFF"
/// [4-7]    36 + data_size
/// [8-11]   "WAVE"
/// [12-15]  "fmt "
/// [16-19]  16 (PCM format chunk size)
/// [20-21]  format code (1 = PCM, 3 = IEEE float)
/// [22-23]  channels
/// [24-27]  sample_rate
/// [28-31]  byte_rate = sample_rate * block_align
/// [32-33]  block_align = channels * bits_per_sample / 8
/// [34-35]  bits_per_sample
/// [36-39]  "data"
/// [40-43]  data_size
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub format_code: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_size: u32,
}

impl WavHeader {
    /// Header for an empty recording in the given format.
    ///
    /// Derived sizes saturate for out-of-range input; [`WavHeader::validate`]
    /// rejects such headers.
    pub fn new(sample_rate: u32, channels: u16, sample_format: SampleFormat) -> Self {
        let block_align = channels.saturating_mul(sample_format.bytes_per_sample());
        Self {
            format_code: sample_format.format_code(),
            channels,
            sample_rate,
            byte_rate: sample_rate.saturating_mul(block_align as u32),
            block_align,
            bits_per_sample: sample_format.bits_per_sample(),
            data_size: 0,
        }
    }

    pub fn with_data_size(self, data_size: u32) -> Self {
        Self { data_size, ..self }
    }

    /// Value of the RIFF size field at offset 4.
    pub fn riff_size(&self) -> u32 {
        RIFF_OVERHEAD.saturating_add(self.data_size)
    }

    pub fn bytes_per_sample(&self) -> u16 {
        self.bits_per_sample / 8
    }

    /// Playback length of the payload.
    pub fn duration_secs(&self) -> f64 {
        if self.byte_rate == 0 {
            return 0.0;
        }
        self.data_size as f64 / self.byte_rate as f64
    }

    pub fn to_bytes(&self) -> [u8; WAV_HEADER_SIZE] {
        let mut header = [0u8; WAV_HEADER_SIZE];

        // RIFF chunk descriptor
        header[0..4].copy_from_slice(&RIFF_TAG);
        header[4..8].copy_from_slice(&self.riff_size().to_le_bytes());
        header[8..12].copy_from_slice(&WAVE_TAG);

        // fmt sub-chunk
        header[12..16].copy_from_slice(&FMT_TAG);
        header[16..20].copy_from_slice(&FMT_CHUNK_SIZE.to_le_bytes());
        header[20..36].copy_from_slice(&self.fmt_body());

        // data sub-chunk
        header[36..40].copy_from_slice(&DATA_TAG);
        header[40..44].copy_from_slice(&self.data_size.to_le_bytes());

        header
    }

    /// Parse a header in the canonical 44-byte layout.
    ///
    /// Files with extension or vendor chunks need
    /// [`crate::storage::wav_reader::WavFileReader`], which scans chunks.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CaptureError> {
        if bytes.len() < WAV_HEADER_SIZE {
            return Err(CaptureError::InvalidFormat(format!(
                "header too short: {} bytes",
                bytes.len()
            )));
        }
        if bytes[0..4] != RIFF_TAG || bytes[8..12] != WAVE_TAG {
            return Err(CaptureError::InvalidFormat("missing RIFF/WAVE magic".into()));
        }
        if bytes[12..16] != FMT_TAG || read_u32(bytes, 16) != FMT_CHUNK_SIZE {
            return Err(CaptureError::InvalidFormat("not a canonical fmt chunk".into()));
        }
        if bytes[36..40] != DATA_TAG {
            return Err(CaptureError::InvalidFormat("data chunk does not follow fmt chunk".into()));
        }

        let mut header = Self::parse_fmt_body(&bytes[20..36]);
        header.data_size = read_u32(bytes, 40);
        Ok(header)
    }

    /// Decode the 16 fixed bytes of a `fmt ` chunk body.
    pub(crate) fn parse_fmt_body(body: &[u8]) -> Self {
        Self {
            format_code: read_u16(body, 0),
            channels: read_u16(body, 2),
            sample_rate: read_u32(body, 4),
            byte_rate: read_u32(body, 8),
            block_align: read_u16(body, 12),
            bits_per_sample: read_u16(body, 14),
            data_size: 0,
        }
    }

    fn fmt_body(&self) -> [u8; FMT_CHUNK_SIZE as usize] {
        let mut body = [0u8; FMT_CHUNK_SIZE as usize];
        body[0..2].copy_from_slice(&self.format_code.to_le_bytes());
        body[2..4].copy_from_slice(&self.channels.to_le_bytes());
        body[4..8].copy_from_slice(&self.sample_rate.to_le_bytes());
        body[8..12].copy_from_slice(&self.byte_rate.to_le_bytes());
        body[12..14].copy_from_slice(&self.block_align.to_le_bytes());
        body[14..16].copy_from_slice(&self.bits_per_sample.to_le_bytes());
        body
    }

    /// Check the fields a reader relies on before trusting the payload.
    pub fn validate(&self) -> Result<(), CaptureError> {
        if self.format_code != FORMAT_CODE_PCM {
            return Err(CaptureError::InvalidFormat(format!(
                "unsupported format code: {}",
                self.format_code
            )));
        }
        if self.channels == 0 || self.channels > MAX_CHANNELS {
            return Err(CaptureError::InvalidFormat(format!(
                "unsupported channel count: {}",
                self.channels
            )));
        }
        if self.sample_rate == 0 || self.sample_rate > MAX_SAMPLE_RATE {
            return Err(CaptureError::InvalidFormat(format!(
                "unsupported sample rate: {}",
                self.sample_rate
            )));
        }
        if !SUPPORTED_BIT_DEPTHS.contains(&self.bits_per_sample) {
            return Err(CaptureError::InvalidFormat(format!(
                "unsupported bit depth: {}",
                self.bits_per_sample
            )));
        }
        if self.data_size == 0 {
            return Err(CaptureError::InvalidFormat("empty data chunk".into()));
        }
        Ok(())
    }
}

pub(crate) fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

pub(crate) fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
