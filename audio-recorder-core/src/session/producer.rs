use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::models::audio_models::CaptureCounters;
use crate::processing::ring_buffer::RingBuffer;
use crate::traits::capture_provider::FrameCallback;

/// Realtime-side handle to a capture session.
///
/// Cheap to clone; hand one to whatever hosts the audio callback. `push`
/// never blocks, never allocates and never touches the file.
#[derive(Debug, Clone)]
pub struct FrameProducer {
    buffer: Arc<RingBuffer>,
    accepting: Arc<AtomicBool>,
    counters: Arc<CaptureCounters>,
}

impl FrameProducer {
    pub(crate) fn new(buffer: Arc<RingBuffer>, accepting: Arc<AtomicBool>, counters: Arc<CaptureCounters>) -> Self {
        Self {
            buffer,
            accepting,
            counters,
        }
    }

    /// Queue one block of interleaved frames for the writer thread.
    ///
    /// A block that does not fit in the ring buffer is dropped whole and
    /// counted. Returns `false` once the session is no longer recording (or
    /// has stopped accepting audio), telling the source it may stop.
    ///
    /// A push racing with `stop` is either written before the writer thread
    /// drains the buffer or refused uncounted, never accepted and then lost.
    pub fn push(&self, frames: &[u8]) -> bool {
        if !self.accepting.load(Ordering::Acquire) {
            return false;
        }
        if self.buffer.write(frames) {
            self.counters.record_received(frames.len());
        } else if self.buffer.is_shutdown() {
            return false;
        } else {
            self.counters.record_drop(frames.len());
        }
        true
    }

    /// Whether the session currently wants data.
    pub fn is_accepting(&self) -> bool {
        self.accepting.load(Ordering::Acquire)
    }

    /// Wrap this handle in the callback shape expected by
    /// [`crate::traits::capture_provider::CaptureProvider::start`].
    pub fn into_callback(self) -> FrameCallback {
        Arc::new(move |frames: &[u8]| self.push(frames))
    }
}
