//! # audio-recorder-core
//!
//! Realtime audio capture to WAV files.
//!
//! A platform audio callback pushes interleaved frames into a lock-protected
//! ring buffer without ever blocking; a dedicated writer thread drains the
//! buffer and streams it into a RIFF/WAVE file whose header is finalized when
//! recording stops. Platform backends implement the `CaptureProvider` trait
//! and plug into `CaptureSession`, or host the callback themselves and feed a
//! `FrameProducer`.
//!
//! ## Architecture
//!
//! ```text
//! audio-recorder-core (this crate)
//! ├── traits/       ← CaptureProvider, CaptureDelegate
//! ├── models/       ← CaptureError, CaptureState, CaptureConfiguration, SampleFormat, etc.
//! ├── processing/   ← RingBuffer, WAV header encoding
//! ├── session/      ← CaptureSession (writer thread), FrameProducer (realtime side)
//! └── storage/      ← WavFileWriter, WavFileReader, metadata, checksum
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::audio_models::{CaptureSessionDiagnostics, SampleFormat};
pub use models::config::CaptureConfiguration;
pub use models::error::CaptureError;
pub use models::recording_result::{RecordingMetadata, RecordingResult};
pub use models::state::CaptureState;
pub use processing::ring_buffer::RingBuffer;
pub use processing::wav_format::WavHeader;
pub use session::capture::CaptureSession;
pub use session::producer::FrameProducer;
pub use storage::wav_reader::{ReaderState, WavFileReader};
pub use storage::wav_writer::WavFileWriter;
pub use traits::capture_delegate::CaptureDelegate;
pub use traits::capture_provider::{CaptureProvider, FrameCallback};
