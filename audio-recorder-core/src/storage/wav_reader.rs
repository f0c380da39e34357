use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::models::audio_models::SampleFormat;
use crate::models::error::CaptureError;
use crate::processing::wav_format::{
    read_u32, WavHeader, DATA_TAG, FMT_CHUNK_SIZE, FMT_TAG, RIFF_TAG, WAVE_TAG,
};

/// Lifecycle of a [`WavFileReader`].
///
/// Envelope parsing and chunk scanning both happen inside
/// [`WavFileReader::open`], so a reader is only ever observed as `Ready` or
/// `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    Closed,
    Ready,
}

/// Chunked WAV file reader.
///
/// Walks the RIFF chunk list instead of assuming the canonical 44-byte
/// layout, so files carrying `LIST`, `fact` or vendor chunks, or an
/// extended `fmt ` chunk, are accepted. Payload is handed out in fixed-size,
/// silence-padded blocks.
#[derive(Debug)]
pub struct WavFileReader {
    file_path: PathBuf,
    file: Option<BufReader<File>>,
    header: WavHeader,
    data_offset: u64,
    remaining: u32,
    state: ReaderState,
}

impl WavFileReader {
    /// Open `path`, validate its envelope and locate the `fmt ` and `data`
    /// chunks. The file position is left at the start of the payload.
    pub fn open(path: &Path) -> Result<Self, CaptureError> {
        let file = File::open(path)
            .map_err(|e| CaptureError::StorageError(format!("failed to open {}: {}", path.display(), e)))?;
        let mut file = BufReader::new(file);

        read_envelope(&mut file)?;
        let (header, data_offset) = scan_chunks(&mut file)?;
        header.validate()?;

        log::info!("Opened WAV file {}: {}", path.display(), format_info(&header));

        Ok(Self {
            file_path: path.to_path_buf(),
            file: Some(file),
            header,
            data_offset,
            remaining: header.data_size,
            state: ReaderState::Ready,
        })
    }

    /// Copy the next payload bytes into `buffer`.
    ///
    /// Always fills the whole buffer: once fewer payload bytes remain than
    /// requested, the tail is zero-filled and `buffer.len()` is still
    /// returned. Returns 0 only after the payload has been fully consumed.
    pub fn read_audio_data(&mut self, buffer: &mut [u8]) -> Result<usize, CaptureError> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| CaptureError::InvalidState("reader is closed".into()))?;
        if buffer.is_empty() || self.remaining == 0 {
            return Ok(0);
        }

        let wanted = buffer.len().min(self.remaining as usize);
        let read = read_up_to(file, &mut buffer[..wanted])
            .map_err(|e| CaptureError::StorageError(format!("failed to read audio data: {}", e)))?;

        if read < wanted {
            log::warn!(
                "{} ends {} bytes before its declared data size",
                self.file_path.display(),
                self.remaining as usize - read
            );
            self.remaining = 0;
        } else {
            self.remaining -= read as u32;
        }

        buffer[read..].fill(0);
        Ok(buffer.len())
    }

    /// Release the file handle. Safe to call in any state, any number of times.
    pub fn close(&mut self) {
        if self.file.take().is_some() {
            log::debug!("Closed WAV file {}", self.file_path.display());
        }
        self.state = ReaderState::Closed;
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    pub fn header(&self) -> &WavHeader {
        &self.header
    }

    /// Byte offset of the first payload byte.
    pub fn data_offset(&self) -> u64 {
        self.data_offset
    }

    /// Payload bytes not yet returned by [`WavFileReader::read_audio_data`].
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Capture-side sample format matching the file's bit depth.
    pub fn sample_format(&self) -> Option<SampleFormat> {
        SampleFormat::from_bits_per_sample(self.header.bits_per_sample)
    }

    /// Short description, e.g. `48000Hz, 1 channels, 16 bits, PCM`.
    pub fn format_info(&self) -> String {
        format_info(&self.header)
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

fn format_info(header: &WavHeader) -> String {
    format!(
        "{}Hz, {} channels, {} bits, PCM",
        header.sample_rate, header.channels, header.bits_per_sample
    )
}

fn read_envelope<R: Read>(reader: &mut R) -> Result<(), CaptureError> {
    let mut envelope = [0u8; 12];
    reader
        .read_exact(&mut envelope)
        .map_err(|e| structural_or_io(e, "file too short for a RIFF header"))?;

    if envelope[0..4] != RIFF_TAG {
        return Err(CaptureError::InvalidFormat("missing RIFF magic".into()));
    }
    if envelope[8..12] != WAVE_TAG {
        return Err(CaptureError::InvalidFormat("missing WAVE magic".into()));
    }
    Ok(())
}

/// Walk chunks until `data` is found. Returns the header (format fields plus
/// data size) and the payload offset; the reader is left at the payload.
fn scan_chunks<R: Read + Seek>(reader: &mut R) -> Result<(WavHeader, u64), CaptureError> {
    let mut format: Option<WavHeader> = None;

    loop {
        let mut chunk_header = [0u8; 8];
        reader
            .read_exact(&mut chunk_header)
            .map_err(|e| structural_or_io(e, "data chunk not found"))?;
        let tag = [chunk_header[0], chunk_header[1], chunk_header[2], chunk_header[3]];
        let size = read_u32(&chunk_header, 4);

        match tag {
            FMT_TAG => {
                if size < FMT_CHUNK_SIZE {
                    return Err(CaptureError::InvalidFormat(format!("fmt chunk too small: {} bytes", size)));
                }
                let mut body = [0u8; FMT_CHUNK_SIZE as usize];
                reader
                    .read_exact(&mut body)
                    .map_err(|e| structural_or_io(e, "truncated fmt chunk"))?;
                format = Some(WavHeader::parse_fmt_body(&body));

                // Extension bytes (cbSize, WAVE_FORMAT_EXTENSIBLE fields).
                skip_chunk(reader, size - FMT_CHUNK_SIZE, size)?;
            }
            DATA_TAG => {
                let header = format
                    .ok_or_else(|| CaptureError::InvalidFormat("data chunk precedes fmt chunk".into()))?;
                let offset = reader
                    .stream_position()
                    .map_err(|e| CaptureError::StorageError(format!("failed to locate data chunk: {}", e)))?;
                log::debug!("Found data chunk: {} bytes at offset {}", size, offset);
                return Ok((header.with_data_size(size), offset));
            }
            _ => {
                log::debug!("Skipping {} chunk of {} bytes", String::from_utf8_lossy(&tag), size);
                skip_chunk(reader, size, size)?;
            }
        }
    }
}

/// Skip `len` bytes, plus the pad byte that follows every odd-sized chunk.
fn skip_chunk<S: Seek>(reader: &mut S, len: u32, chunk_size: u32) -> Result<(), CaptureError> {
    let pad = (chunk_size % 2) as i64;
    reader
        .seek(SeekFrom::Current(len as i64 + pad))
        .map_err(|e| CaptureError::StorageError(format!("failed to skip chunk: {}", e)))?;
    Ok(())
}

fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn structural_or_io(err: io::Error, context: &str) -> CaptureError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        CaptureError::InvalidFormat(context.to_string())
    } else {
        CaptureError::StorageError(format!("{}: {}", context, err))
    }
}
