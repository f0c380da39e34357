use crate::models::error::CaptureError;
use crate::models::recording_result::RecordingResult;
use crate::models::state::CaptureState;

/// Event delegate for capture session notifications.
///
/// State changes and results are reported from the thread calling into the
/// session. Errors can also arrive from the consumer thread, the moment a
/// write to the file fails. Implementations must not block.
pub trait CaptureDelegate: Send + Sync {
    /// Called when the session state changes.
    fn on_state_changed(&self, state: CaptureState);

    /// Called when an error ends the recording early.
    fn on_error(&self, error: &CaptureError);

    /// Called when capture stops and the file is finalized.
    fn on_capture_finished(&self, result: &RecordingResult);
}
