use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crate::models::audio_models::{CaptureCounters, CaptureSessionDiagnostics, SampleFormat};
use crate::models::config::CaptureConfiguration;
use crate::models::error::CaptureError;
use crate::models::recording_result::{RecordingMetadata, RecordingResult};
use crate::models::state::CaptureState;
use crate::processing::ring_buffer::RingBuffer;
use crate::processing::wav_format::MAX_DATA_SIZE;
use crate::session::producer::FrameProducer;
use crate::storage::checksum::sha256_file;
use crate::storage::metadata::write_metadata;
use crate::storage::wav_writer::WavFileWriter;
use crate::traits::capture_delegate::CaptureDelegate;
use crate::traits::capture_provider::CaptureProvider;

/// Consecutive short reads after which the writer thread considers the ring
/// buffer drained.
const DRAIN_SHORT_READS: u32 = 2;

/// Records one realtime audio stream to a WAV file.
///
/// Owns the ring buffer and, while recording, a writer thread that drains it
/// into a [`WavFileWriter`]:
/// ```text
/// [realtime callback] → FrameProducer::push → [RingBuffer] → writer thread → [WavFileWriter]
/// ```
/// The writer is moved into the thread for the duration of a recording and
/// handed back on join, so the file needs no lock of its own.
pub struct CaptureSession {
    config: Option<CaptureConfiguration>,
    state: CaptureState,
    delegate: Option<Arc<dyn CaptureDelegate>>,
    provider: Option<Box<dyn CaptureProvider>>,

    // Shared with producers and the writer thread
    buffer: Arc<RingBuffer>,
    accepting: Arc<AtomicBool>,
    counters: Arc<CaptureCounters>,

    writer_handle: Option<thread::JoinHandle<WriterOutcome>>,
    file_path: Option<PathBuf>,
}

/// What the writer thread hands back when it exits.
struct WriterOutcome {
    writer: WavFileWriter,
    error: Option<CaptureError>,
}

struct WriterLoop {
    buffer: Arc<RingBuffer>,
    accepting: Arc<AtomicBool>,
    counters: Arc<CaptureCounters>,
    delegate: Option<Arc<dyn CaptureDelegate>>,
    writer: WavFileWriter,
    block_bytes: usize,
    data_limit: u64,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self {
            config: None,
            state: CaptureState::Idle,
            delegate: None,
            provider: None,
            buffer: Arc::new(RingBuffer::new(0)), // sized on initialize
            accepting: Arc::new(AtomicBool::new(false)),
            counters: Arc::new(CaptureCounters::default()),
            writer_handle: None,
            file_path: None,
        }
    }

    /// Create a session and initialize it with `config`.
    pub fn with_config(config: CaptureConfiguration) -> Result<Self, CaptureError> {
        let mut session = Self::new();
        session.initialize(config)?;
        Ok(session)
    }

    /// Attach the realtime source started and stopped with each recording.
    pub fn with_provider(mut self, provider: Box<dyn CaptureProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn set_provider(&mut self, provider: Box<dyn CaptureProvider>) -> Result<(), CaptureError> {
        if self.state.is_recording() {
            return Err(CaptureError::InvalidState("cannot replace the provider while recording".into()));
        }
        self.provider = Some(provider);
        Ok(())
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn CaptureDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn config(&self) -> Option<&CaptureConfiguration> {
        self.config.as_ref()
    }

    pub fn diagnostics(&self) -> CaptureSessionDiagnostics {
        self.counters.snapshot()
    }

    /// Handle for the realtime callback. Stays valid across recordings.
    pub fn producer(&self) -> FrameProducer {
        FrameProducer::new(
            Arc::clone(&self.buffer),
            Arc::clone(&self.accepting),
            Arc::clone(&self.counters),
        )
    }

    /// Apply configuration and size the ring buffer. Transitions: idle → initialized.
    pub fn initialize(&mut self, config: CaptureConfiguration) -> Result<(), CaptureError> {
        if self.state.is_recording() {
            return Err(CaptureError::InvalidState("cannot reconfigure while recording".into()));
        }
        config.validate().map_err(CaptureError::ConfigurationFailed)?;

        let capacity = config.ring_capacity_bytes();
        if capacity == self.buffer.capacity() {
            self.buffer.reset();
        } else {
            self.buffer.resize(capacity);
        }
        log::info!(
            "Capture session initialized: {} Hz, {} channels, {:?}, {} byte ring buffer",
            config.sample_rate,
            config.channels,
            config.sample_format,
            capacity
        );

        self.config = Some(config);
        self.set_state(CaptureState::Initialized);
        Ok(())
    }

    /// Re-initialize with a newly negotiated format, keeping the other
    /// configuration fields, then start recording to `path`.
    pub fn start_with_format(
        &mut self,
        path: &Path,
        sample_rate: u32,
        channels: u16,
        sample_format: SampleFormat,
    ) -> Result<(), CaptureError> {
        if self.state.is_recording() {
            return Err(CaptureError::InvalidState("already recording".into()));
        }
        let config = CaptureConfiguration {
            sample_rate,
            channels,
            sample_format,
            ..self.config.clone().unwrap_or_default()
        };
        self.initialize(config)?;
        self.start(path)
    }

    /// Open `path`, launch the writer thread and the provider.
    /// Transitions: initialized → recording.
    ///
    /// On failure everything started so far is torn down again and the state
    /// is left unchanged.
    pub fn start(&mut self, path: &Path) -> Result<(), CaptureError> {
        if self.state.is_recording() {
            return Err(CaptureError::InvalidState("already recording".into()));
        }
        let config = self
            .config
            .clone()
            .ok_or_else(|| CaptureError::ConfigurationFailed("not initialized".into()))?;

        let mut writer = WavFileWriter::new();
        writer.open(path, config.sample_rate, config.channels, config.sample_format)?;

        self.buffer.reset();
        self.counters.reset();
        self.accepting.store(true, Ordering::Release);

        let writer_loop = WriterLoop {
            buffer: Arc::clone(&self.buffer),
            accepting: Arc::clone(&self.accepting),
            counters: Arc::clone(&self.counters),
            delegate: self.delegate.clone(),
            writer,
            block_bytes: config.block_bytes(),
            data_limit: frame_aligned_limit(&config),
        };

        // The writer inside `writer_loop` finalizes itself on drop if the spawn fails.
        let handle = match thread::Builder::new()
            .name("wav-writer".into())
            .spawn(move || writer_loop.run())
        {
            Ok(handle) => handle,
            Err(e) => {
                self.accepting.store(false, Ordering::Release);
                return Err(CaptureError::Unknown(format!("failed to spawn writer thread: {}", e)));
            }
        };

        let callback = self.producer().into_callback();
        let provider_started = match self.provider.as_mut() {
            Some(provider) => {
                log::info!("Starting provider {}", provider.name());
                provider.start(callback)
            }
            None => Ok(()),
        };
        if let Err(e) = provider_started {
            log::error!("Failed to start provider: {}", e);
            if let Err(close_err) = self.finish_writer(handle) {
                log::error!("Failed to finalize {}: {}", path.display(), close_err);
            }
            return Err(e);
        }

        self.writer_handle = Some(handle);
        self.file_path = Some(path.to_path_buf());
        log::info!("Recording to {}", path.display());
        self.set_state(CaptureState::Recording);
        Ok(())
    }

    /// Stop recording, drain the buffer, finalize the file and return the
    /// result. Transitions: recording → idle.
    ///
    /// If the writer thread failed, the file is still finalized with the bytes
    /// written before the failure and that error is returned.
    pub fn stop(&mut self) -> Result<RecordingResult, CaptureError> {
        if !self.state.is_recording() {
            return Err(CaptureError::InvalidState("not recording".into()));
        }

        self.accepting.store(false, Ordering::Release);
        if let Some(provider) = self.provider.as_mut() {
            if let Err(e) = provider.stop() {
                log::warn!("Provider {} failed to stop cleanly: {}", provider.name(), e);
            }
        }

        let finished = match self.writer_handle.take() {
            Some(handle) => self.finish_writer(handle),
            None => Err(CaptureError::Unknown("writer thread not running".into())),
        };
        let file_path = self.file_path.take();
        self.set_state(CaptureState::Idle);

        let data_bytes = finished?;
        let file_path = file_path.ok_or_else(|| CaptureError::Unknown("recording path missing".into()))?;
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| CaptureError::ConfigurationFailed("not initialized".into()))?;

        let diagnostics = self.counters.snapshot();
        if diagnostics.dropped_blocks > 0 {
            log::warn!(
                "Dropped {} blocks ({} bytes) because the ring buffer was full",
                diagnostics.dropped_blocks,
                diagnostics.dropped_bytes
            );
        }

        let checksum = sha256_file(&file_path)?;
        let metadata = RecordingMetadata::new(
            &file_path.to_string_lossy(),
            config.sample_rate,
            config.channels,
            config.sample_format,
            data_bytes,
            &diagnostics,
            &checksum,
        );
        if config.write_metadata {
            write_metadata(&metadata, &file_path)?;
        }

        let result = RecordingResult {
            file_path,
            duration_secs: metadata.duration_secs,
            data_bytes,
            checksum,
            diagnostics,
            metadata,
        };
        log::info!(
            "Recording finished: {} ({} bytes, {:.2}s)",
            result.file_path.display(),
            result.data_bytes,
            result.duration_secs
        );

        if let Some(ref delegate) = self.delegate {
            delegate.on_capture_finished(&result);
        }
        Ok(result)
    }

    // --- Internal helpers ---

    fn set_state(&mut self, new_state: CaptureState) {
        self.state = new_state;
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(new_state);
        }
    }

    /// Signal shutdown, wait for the writer thread to drain the buffer, then
    /// finalize the file. Returns the payload size.
    fn finish_writer(&self, handle: thread::JoinHandle<WriterOutcome>) -> Result<u64, CaptureError> {
        self.accepting.store(false, Ordering::Release);
        self.buffer.notify_shutdown();

        let WriterOutcome { mut writer, error } = handle
            .join()
            .map_err(|_| CaptureError::Unknown("writer thread panicked".into()))?;

        let closed = writer.close();
        if let Some(e) = error {
            return Err(e);
        }
        closed?;
        Ok(writer.data_size() as u64)
    }
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        if self.state.is_recording() {
            if let Err(e) = self.stop() {
                log::error!("Failed to stop capture session on drop: {}", e);
            }
        }
    }
}

impl WriterLoop {
    /// Blocking-read fixed blocks and append them until the buffer has been
    /// drained after shutdown, the data limit is hit, or a write fails.
    fn run(mut self) -> WriterOutcome {
        let mut block = vec![0u8; self.block_bytes];
        let mut short_reads = 0;
        let mut error = None;

        loop {
            let read = self.buffer.read(&mut block);
            self.counters.record_read();

            if read > 0 {
                let allowance = self.data_limit.saturating_sub(self.writer.data_size() as u64);
                let len = read.min(allowance as usize);

                if let Err(e) = self.writer.append(&block[..len]) {
                    log::error!("Failed to write audio data: {}", e);
                    self.accepting.store(false, Ordering::Release);
                    if let Some(ref delegate) = self.delegate {
                        delegate.on_error(&e);
                    }
                    error = Some(e);
                    break;
                }
                self.counters.record_written(len);

                if self.writer.data_size() as u64 >= self.data_limit {
                    log::warn!("Data limit of {} bytes reached, no longer accepting audio", self.data_limit);
                    self.accepting.store(false, Ordering::Release);
                    break;
                }
            }

            if read < block.len() {
                short_reads += 1;
                if short_reads >= DRAIN_SHORT_READS {
                    break;
                }
            } else {
                short_reads = 0;
            }
        }

        log::debug!("Writer thread exiting after {} payload bytes", self.writer.data_size());
        WriterOutcome {
            writer: self.writer,
            error,
        }
    }
}

/// Largest payload the writer thread may append: the configured limit capped
/// by the RIFF size field, rounded down to whole frames.
fn frame_aligned_limit(config: &CaptureConfiguration) -> u64 {
    let limit = config
        .max_data_bytes
        .unwrap_or(u64::MAX)
        .min(MAX_DATA_SIZE as u64);
    let frame = config.bytes_per_frame().max(1) as u64;
    limit - limit % frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::fs;

    use crate::storage::wav_reader::WavFileReader;

    fn temp_file_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("audio_recorder_test_{}_{}", uuid::Uuid::new_v4(), name))
    }

    fn mono_16k() -> CaptureConfiguration {
        CaptureConfiguration {
            sample_rate: 16000,
            channels: 1,
            frames_per_block: 160,
            ..Default::default()
        }
    }

    #[derive(Default)]
    struct RecordingDelegate {
        states: Mutex<Vec<CaptureState>>,
        errors: Mutex<Vec<CaptureError>>,
        finished: Mutex<Vec<RecordingResult>>,
    }

    impl CaptureDelegate for RecordingDelegate {
        fn on_state_changed(&self, state: CaptureState) {
            self.states.lock().push(state);
        }

        fn on_error(&self, error: &CaptureError) {
            self.errors.lock().push(error.clone());
        }

        fn on_capture_finished(&self, result: &RecordingResult) {
            self.finished.lock().push(result.clone());
        }
    }

    struct FailingProvider;

    impl CaptureProvider for FailingProvider {
        fn start(&mut self, _callback: crate::traits::capture_provider::FrameCallback) -> Result<(), CaptureError> {
            Err(CaptureError::Unknown("device busy".into()))
        }

        fn stop(&mut self) -> Result<(), CaptureError> {
            Ok(())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn lifecycle_states() {
        let delegate = Arc::new(RecordingDelegate::default());
        let mut session = CaptureSession::new();
        session.set_delegate(delegate.clone());
        assert!(session.state().is_idle());

        session.initialize(mono_16k()).unwrap();
        assert!(session.state().is_initialized());

        let path = temp_file_path("lifecycle.wav");
        session.start(&path).unwrap();
        assert!(session.state().is_recording());

        session.stop().unwrap();
        assert!(session.state().is_idle());

        assert_eq!(
            *delegate.states.lock(),
            vec![CaptureState::Initialized, CaptureState::Recording, CaptureState::Idle]
        );
        assert_eq!(delegate.finished.lock().len(), 1);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn start_requires_configuration() {
        let mut session = CaptureSession::new();
        let err = session.start(&temp_file_path("unconfigured.wav")).unwrap_err();
        assert!(matches!(err, CaptureError::ConfigurationFailed(_)));
    }

    #[test]
    fn start_rejected_while_recording() {
        let mut session = CaptureSession::with_config(mono_16k()).unwrap();
        let path = temp_file_path("double_start.wav");
        session.start(&path).unwrap();

        let err = session.start(&temp_file_path("second.wav")).unwrap_err();
        assert!(matches!(err, CaptureError::InvalidState(_)));
        assert!(matches!(
            session.initialize(mono_16k()).unwrap_err(),
            CaptureError::InvalidState(_)
        ));

        session.stop().unwrap();
        fs::remove_file(&path).ok();
    }

    #[test]
    fn stop_rejected_when_not_recording() {
        let mut session = CaptureSession::with_config(mono_16k()).unwrap();
        assert!(matches!(session.stop().unwrap_err(), CaptureError::InvalidState(_)));
        assert!(session.state().is_initialized());
    }

    #[test]
    fn invalid_configuration_rejected() {
        let err = CaptureSession::with_config(CaptureConfiguration {
            channels: 0,
            ..Default::default()
        })
        .err()
        .unwrap();
        assert!(matches!(err, CaptureError::ConfigurationFailed(_)));
    }

    #[test]
    fn initialize_sizes_ring_buffer() {
        let config = mono_16k();
        let session = CaptureSession::with_config(config.clone()).unwrap();
        assert_eq!(session.buffer.capacity(), config.ring_capacity_bytes());
    }

    #[test]
    fn records_pushed_frames_in_order() {
        let mut session = CaptureSession::with_config(mono_16k()).unwrap();
        let producer = session.producer();
        let buffer = Arc::clone(&session.buffer);
        let path = temp_file_path("ordered.wav");
        session.start(&path).unwrap();

        let mut expected = Vec::new();
        for i in 0..50u32 {
            let block: Vec<u8> = (0..320u32).map(|j| ((i * 7 + j) % 256) as u8).collect();
            while buffer.available_to_write() < block.len() {
                thread::yield_now();
            }
            assert!(producer.push(&block));
            expected.extend_from_slice(&block);
        }
        // Partial tail, smaller than one block
        assert!(producer.push(&[0xAB; 100]));
        expected.extend_from_slice(&[0xAB; 100]);

        let result = session.stop().unwrap();
        assert_eq!(result.data_bytes, expected.len() as u64);
        assert_eq!(result.diagnostics.dropped_blocks, 0);
        assert_eq!(result.diagnostics.bytes_written, expected.len() as u64);
        assert!(!producer.push(&[0; 2]));

        let file = fs::read(&path).unwrap();
        assert_eq!(&file[44..], expected.as_slice());

        fs::remove_file(&path).ok();
    }

    #[test]
    fn overflow_is_counted_not_fatal() {
        let config = mono_16k();
        let mut session = CaptureSession::with_config(config.clone()).unwrap();
        let producer = session.producer();
        let path = temp_file_path("overflow.wav");
        session.start(&path).unwrap();

        // Larger than the whole ring buffer: always rejected.
        let oversized = vec![0u8; config.ring_capacity_bytes() + 2];
        assert!(producer.push(&oversized));
        assert!(producer.push(&[1; 4]));

        let result = session.stop().unwrap();
        assert_eq!(result.diagnostics.dropped_blocks, 1);
        assert_eq!(result.diagnostics.dropped_bytes, oversized.len() as u64);
        assert_eq!(result.data_bytes, 4);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn data_limit_stops_accepting() {
        let config = CaptureConfiguration {
            max_data_bytes: Some(500),
            ..mono_16k()
        };
        let mut session = CaptureSession::with_config(config).unwrap();
        let producer = session.producer();
        let path = temp_file_path("limit.wav");
        session.start(&path).unwrap();

        assert!(producer.push(&[5; 320]));
        assert!(producer.push(&[6; 320]));
        // The writer thread stops accepting once it has written 500 bytes.
        while producer.is_accepting() {
            thread::yield_now();
        }
        assert!(!producer.push(&[7; 320]));

        let result = session.stop().unwrap();
        assert_eq!(result.data_bytes, 500);

        let reader = WavFileReader::open(&path).unwrap();
        assert_eq!(reader.header().data_size, 500);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn unaligned_data_limit_rounds_down_to_whole_frames() {
        let config = CaptureConfiguration {
            channels: 2,
            max_data_bytes: Some(1001),
            ..mono_16k()
        };
        let mut session = CaptureSession::with_config(config).unwrap();
        let producer = session.producer();
        let path = temp_file_path("unaligned_limit.wav");
        session.start(&path).unwrap();

        assert!(producer.push(&[1; 640]));
        assert!(producer.push(&[2; 640]));
        while producer.is_accepting() {
            thread::yield_now();
        }

        let result = session.stop().unwrap();
        assert_eq!(result.data_bytes, 1000);

        let reader = WavFileReader::open(&path).unwrap();
        let header = reader.header();
        assert_eq!(header.data_size % header.block_align as u32, 0);
        assert_eq!(header.riff_size(), 36 + 1000);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn default_limit_is_frame_aligned() {
        for (channels, sample_format) in [
            (1, SampleFormat::PcmI16),
            (2, SampleFormat::PcmI16),
            (3, SampleFormat::PcmI24Packed),
            (16, SampleFormat::PcmI32),
        ] {
            let config = CaptureConfiguration {
                channels,
                sample_format,
                ..Default::default()
            };
            let limit = frame_aligned_limit(&config);
            assert_eq!(limit % config.bytes_per_frame() as u64, 0);
            assert!(limit <= MAX_DATA_SIZE as u64);
            assert!(limit > MAX_DATA_SIZE as u64 - config.bytes_per_frame() as u64);
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn write_failure_is_reported_and_stops_recording() {
        let delegate = Arc::new(RecordingDelegate::default());
        let mut session = CaptureSession::with_config(mono_16k()).unwrap();
        session.set_delegate(delegate.clone());
        let producer = session.producer();

        // Writes to /dev/full fail with ENOSPC once the writer's buffer flushes.
        session.start(Path::new("/dev/full")).unwrap();

        let mut pushes = 0;
        while producer.push(&[9; 320]) {
            pushes += 1;
            assert!(pushes < 100_000, "writer thread never failed");
            thread::sleep(std::time::Duration::from_millis(1));
        }
        assert!(!producer.is_accepting());

        let err = session.stop().unwrap_err();
        assert!(matches!(err, CaptureError::StorageError(_)), "{:?}", err);
        assert!(session.state().is_idle());

        let errors = delegate.errors.lock();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0], err);
        assert!(delegate.finished.lock().is_empty());
        assert_eq!(*delegate.states.lock().last().unwrap(), CaptureState::Idle);
    }

    #[test]
    fn provider_failure_unwinds_start() {
        let mut session = CaptureSession::with_config(mono_16k())
            .unwrap()
            .with_provider(Box::new(FailingProvider));
        let path = temp_file_path("provider_fail.wav");

        let err = session.start(&path).unwrap_err();
        assert_eq!(err, CaptureError::Unknown("device busy".into()));
        assert!(session.state().is_initialized());
        assert!(!session.producer().is_accepting());

        // The file was opened and finalized with an empty payload.
        let file = fs::read(&path).unwrap();
        assert_eq!(file.len(), 44);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn start_with_format_reconfigures() {
        let mut session = CaptureSession::with_config(CaptureConfiguration {
            frames_per_block: 240,
            ..Default::default()
        })
        .unwrap();
        let path = temp_file_path("negotiated.wav");

        session.start_with_format(&path, 44100, 2, SampleFormat::PcmI24Packed).unwrap();
        let config = session.config().unwrap();
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.channels, 2);
        assert_eq!(config.frames_per_block, 240);

        session.producer().push(&[0u8; 6 * 240]);
        session.stop().unwrap();

        let reader = WavFileReader::open(&path).unwrap();
        assert_eq!(reader.format_info(), "44100Hz, 2 channels, 24 bits, PCM");

        fs::remove_file(&path).ok();
    }

    #[test]
    fn writes_metadata_sidecar() {
        let config = CaptureConfiguration {
            write_metadata: true,
            buffer_latency_ms: 1000,
            ..mono_16k()
        };
        let mut session = CaptureSession::with_config(config).unwrap();
        let path = temp_file_path("sidecar.wav");
        session.start(&path).unwrap();
        session.producer().push(&[1; 32000]);
        let result = session.stop().unwrap();

        let metadata = crate::storage::metadata::read_metadata(&path).unwrap();
        assert_eq!(metadata, result.metadata);
        assert_eq!(metadata.data_bytes, 32000);
        assert_eq!(metadata.checksum, sha256_file(&path).unwrap());

        fs::remove_file(&path).ok();
        fs::remove_file(crate::storage::metadata::metadata_path(&path)).ok();
    }

    #[test]
    fn session_is_reusable() {
        let mut session = CaptureSession::with_config(mono_16k()).unwrap();
        let producer = session.producer();

        let first = temp_file_path("take1.wav");
        session.start(&first).unwrap();
        producer.push(&[1; 64]);
        assert_eq!(session.stop().unwrap().data_bytes, 64);

        let second = temp_file_path("take2.wav");
        session.start(&second).unwrap();
        producer.push(&[2; 32]);
        let result = session.stop().unwrap();
        assert_eq!(result.data_bytes, 32);
        assert_eq!(result.diagnostics.producer_calls, 1);

        fs::remove_file(&first).ok();
        fs::remove_file(&second).ok();
    }

    #[test]
    fn drop_finalizes_recording() {
        let path = temp_file_path("dropped_session.wav");
        {
            let mut session = CaptureSession::with_config(mono_16k()).unwrap();
            session.start(&path).unwrap();
            session.producer().push(&[3; 640]);
        }

        let reader = WavFileReader::open(&path).unwrap();
        assert_eq!(reader.header().data_size, 640);

        fs::remove_file(&path).ok();
    }
}
