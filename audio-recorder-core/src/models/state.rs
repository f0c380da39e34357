/// Capture session state machine.
///
/// State transitions:
/// ```text
/// idle → initialized → recording → idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Initialized,
    Recording,
}

impl CaptureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self, Self::Initialized)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording)
    }
}
