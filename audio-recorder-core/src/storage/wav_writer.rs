use std::fs::{self, File};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::models::audio_models::SampleFormat;
use crate::models::config::{MAX_CHANNELS, MAX_SAMPLE_RATE};
use crate::models::error::CaptureError;
use crate::processing::wav_format::{WavHeader, MAX_DATA_SIZE};

/// Streaming WAV file writer.
///
/// Writes a provisional header on [`WavFileWriter::open`], appends raw PCM
/// while counting payload bytes, and rewrites the header with the final
/// sizes on [`WavFileWriter::close`].
///
/// ## File Format
///
/// ```text
/// [44-byte WAV header]
/// [raw interleaved PCM data...]
/// ```
///
/// The payload counter only advances after a successful write, so a file
/// closed after an I/O error still describes exactly the bytes that made it
/// to disk.
#[derive(Debug, Default)]
pub struct WavFileWriter {
    file_path: Option<PathBuf>,
    file: Option<BufWriter<File>>,
    header: Option<WavHeader>,
    data_size: u32,
}

impl WavFileWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or truncate) `path` and write the initial 44-byte header.
    ///
    /// A writer that is still open is finalized first.
    pub fn open(
        &mut self,
        path: &Path,
        sample_rate: u32,
        channels: u16,
        sample_format: SampleFormat,
    ) -> Result<(), CaptureError> {
        if self.is_open() {
            self.close()?;
        }

        if sample_rate == 0 || sample_rate > MAX_SAMPLE_RATE {
            return Err(CaptureError::ConfigurationFailed(format!(
                "unsupported sample rate: {}",
                sample_rate
            )));
        }
        if channels == 0 || channels > MAX_CHANNELS {
            return Err(CaptureError::ConfigurationFailed(format!(
                "unsupported channel count: {}",
                channels
            )));
        }

        // Ensure output directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| CaptureError::StorageError(format!("failed to create directory: {}", e)))?;
        }

        let file = File::create(path)
            .map_err(|e| CaptureError::StorageError(format!("failed to create file: {}", e)))?;
        let mut file = BufWriter::new(file);

        let header = WavHeader::new(sample_rate, channels, sample_format);
        file.write_all(&header.to_bytes())
            .map_err(|e| CaptureError::StorageError(format!("failed to write header: {}", e)))?;

        log::info!(
            "Opened WAV file {} ({} Hz, {} channels, {} bits)",
            path.display(),
            sample_rate,
            channels,
            header.bits_per_sample
        );

        self.file_path = Some(path.to_path_buf());
        self.file = Some(file);
        self.header = Some(header);
        self.data_size = 0;
        Ok(())
    }

    /// Append raw PCM bytes at the current position.
    pub fn append(&mut self, data: &[u8]) -> Result<(), CaptureError> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| CaptureError::InvalidState("file is not open for writing".into()))?;
        if data.is_empty() {
            return Ok(());
        }

        let new_size = u32::try_from(data.len())
            .ok()
            .and_then(|len| self.data_size.checked_add(len))
            .filter(|&size| size <= MAX_DATA_SIZE)
            .ok_or_else(|| {
                CaptureError::StorageError(format!(
                    "payload would exceed the WAV size limit of {} bytes",
                    MAX_DATA_SIZE
                ))
            })?;

        file.write_all(data)
            .map_err(|e| CaptureError::StorageError(format!("write failed: {}", e)))?;
        self.data_size = new_size;
        Ok(())
    }

    /// Finalize the file: rewrite the header with the final sizes, flush, and
    /// release the handle.
    ///
    /// No-op if the writer was never opened or is already closed. The handle
    /// is released even when finalizing fails.
    pub fn close(&mut self) -> Result<(), CaptureError> {
        let Some(mut file) = self.file.take() else {
            return Ok(());
        };
        let header = match self.header {
            Some(header) => header.with_data_size(self.data_size),
            None => return Ok(()),
        };
        self.header = Some(header);

        if header.block_align != 0 && self.data_size % header.block_align as u32 != 0 {
            log::warn!(
                "Payload of {} bytes is not a whole number of {}-byte frames",
                self.data_size,
                header.block_align
            );
        }

        finalize(&mut file, &header)?;

        if let Some(path) = &self.file_path {
            log::info!("Closed WAV file {} ({} payload bytes)", path.display(), self.data_size);
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Payload bytes appended so far (excluding the header).
    pub fn data_size(&self) -> u32 {
        self.data_size
    }

    /// Header as it was (or will be) written on close.
    pub fn header(&self) -> Option<WavHeader> {
        self.header.map(|h| h.with_data_size(self.data_size))
    }

    /// Path of the current or last opened file.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }
}

impl Drop for WavFileWriter {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::error!("Failed to finalize WAV file on drop: {}", e);
        }
    }
}

fn finalize(file: &mut BufWriter<File>, header: &WavHeader) -> Result<(), CaptureError> {
    // Seeking flushes the buffered payload first.
    file.seek(SeekFrom::Start(0))
        .map_err(|e| CaptureError::StorageError(format!("failed to seek to header: {}", e)))?;
    file.write_all(&header.to_bytes())
        .map_err(|e| CaptureError::StorageError(format!("failed to rewrite header: {}", e)))?;
    file.flush()
        .map_err(|e| CaptureError::StorageError(format!("failed to flush file: {}", e)))?;
    Ok(())
}
