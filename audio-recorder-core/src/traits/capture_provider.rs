use std::sync::Arc;

use crate::models::error::CaptureError;

/// Callback invoked by a realtime source for every delivered block of raw,
/// interleaved frames.
///
/// Returns `false` once the session no longer wants data; the source may
/// then stop its stream. Must be called from one thread at a time and must
/// return quickly.
pub type FrameCallback = Arc<dyn Fn(&[u8]) -> bool + Send + Sync + 'static>;

/// Interface for platform-specific realtime audio sources.
///
/// The session starts the provider after its file and consumer thread are
/// ready, and stops it before draining the buffer.
pub trait CaptureProvider: Send {
    /// Start delivering frames via `callback`.
    ///
    /// The callback usually fires on a dedicated audio thread, so keep it
    /// free of allocation and blocking.
    fn start(&mut self, callback: FrameCallback) -> Result<(), CaptureError>;

    /// Stop delivering frames. After this returns the callback is no longer
    /// invoked.
    fn stop(&mut self) -> Result<(), CaptureError>;

    /// Name of the source, for logs.
    fn name(&self) -> &str;
}
