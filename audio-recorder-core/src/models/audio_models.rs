use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// WAV format code for integer PCM.
pub const FORMAT_CODE_PCM: u16 = 1;

/// WAV format code for IEEE float samples.
pub const FORMAT_CODE_IEEE_FLOAT: u16 = 3;

/// Sample encoding negotiated with the audio source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleFormat {
    PcmI16,
    PcmI24Packed,
    PcmI32,
    PcmFloat,
}

impl SampleFormat {
    pub fn bytes_per_sample(self) -> u16 {
        match self {
            Self::PcmI16 => 2,
            Self::PcmI24Packed => 3,
            Self::PcmI32 | Self::PcmFloat => 4,
        }
    }

    pub fn bits_per_sample(self) -> u16 {
        self.bytes_per_sample() * 8
    }

    /// Format code written at offset 20 of the WAV header.
    pub fn format_code(self) -> u16 {
        match self {
            Self::PcmFloat => FORMAT_CODE_IEEE_FLOAT,
            _ => FORMAT_CODE_PCM,
        }
    }

    /// Integer PCM format for a bit depth read back from a file.
    ///
    /// 8-bit files have no capture-side equivalent and map to `None`.
    pub fn from_bits_per_sample(bits: u16) -> Option<Self> {
        match bits {
            16 => Some(Self::PcmI16),
            24 => Some(Self::PcmI24Packed),
            32 => Some(Self::PcmI32),
            _ => None,
        }
    }
}

/// Snapshot of a capture session's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSessionDiagnostics {
    /// Number of blocks delivered by the realtime source.
    pub producer_calls: u64,
    /// Bytes accepted into the ring buffer.
    pub bytes_received: u64,
    /// Blocks rejected because the ring buffer was full.
    pub dropped_blocks: u64,
    pub dropped_bytes: u64,
    pub consumer_reads: u64,
    /// Payload bytes appended to the file.
    pub bytes_written: u64,
}

/// Lock-free counters shared between the producer handle, the consumer
/// thread and the session.
#[derive(Debug, Default)]
pub(crate) struct CaptureCounters {
    producer_calls: AtomicU64,
    bytes_received: AtomicU64,
    dropped_blocks: AtomicU64,
    dropped_bytes: AtomicU64,
    consumer_reads: AtomicU64,
    bytes_written: AtomicU64,
}

impl CaptureCounters {
    pub(crate) fn record_received(&self, len: usize) {
        self.producer_calls.fetch_add(1, Ordering::Relaxed);
        self.bytes_received.fetch_add(len as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_drop(&self, len: usize) {
        self.producer_calls.fetch_add(1, Ordering::Relaxed);
        self.dropped_blocks.fetch_add(1, Ordering::Relaxed);
        self.dropped_bytes.fetch_add(len as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_read(&self) {
        self.consumer_reads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_written(&self, len: usize) {
        self.bytes_written.fetch_add(len as u64, Ordering::Relaxed);
    }

    pub(crate) fn reset(&self) {
        for counter in [
            &self.producer_calls,
            &self.bytes_received,
            &self.dropped_blocks,
            &self.dropped_bytes,
            &self.consumer_reads,
            &self.bytes_written,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    pub(crate) fn snapshot(&self) -> CaptureSessionDiagnostics {
        CaptureSessionDiagnostics {
            producer_calls: self.producer_calls.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            dropped_blocks: self.dropped_blocks.load(Ordering::Relaxed),
            dropped_bytes: self.dropped_bytes.load(Ordering::Relaxed),
            consumer_reads: self.consumer_reads.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_format_sizes() {
        assert_eq!(SampleFormat::PcmI16.bytes_per_sample(), 2);
        assert_eq!(SampleFormat::PcmI24Packed.bits_per_sample(), 24);
        assert_eq!(SampleFormat::PcmI32.bytes_per_sample(), 4);
        assert_eq!(SampleFormat::PcmFloat.bits_per_sample(), 32);
    }

    #[test]
    fn float_uses_ieee_format_code() {
        assert_eq!(SampleFormat::PcmI16.format_code(), FORMAT_CODE_PCM);
        assert_eq!(SampleFormat::PcmFloat.format_code(), FORMAT_CODE_IEEE_FLOAT);
    }

    #[test]
    fn bit_depth_lookup() {
        assert_eq!(SampleFormat::from_bits_per_sample(24), Some(SampleFormat::PcmI24Packed));
        assert_eq!(SampleFormat::from_bits_per_sample(8), None);
    }

    #[test]
    fn counters_snapshot_and_reset() {
        let counters = CaptureCounters::default();
        counters.record_received(960);
        counters.record_drop(480);
        counters.record_read();
        counters.record_written(960);

        let snap = counters.snapshot();
        assert_eq!(snap.producer_calls, 2);
        assert_eq!(snap.bytes_received, 960);
        assert_eq!(snap.dropped_blocks, 1);
        assert_eq!(snap.dropped_bytes, 480);
        assert_eq!(snap.consumer_reads, 1);
        assert_eq!(snap.bytes_written, 960);

        counters.reset();
        assert_eq!(counters.snapshot(), CaptureSessionDiagnostics::default());
    }
}
