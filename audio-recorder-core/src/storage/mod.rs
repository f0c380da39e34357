pub mod checksum;
pub mod metadata;
pub mod wav_reader;
pub mod wav_writer;
