use std::io;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unable to read input: {source}")]
    UnreadableInput { source: io::Error },
    #[error("Container header is truncated")]
    MalformedHeader { source: io::Error },
    #[error("Magic mismatch: expected \"FUFS\", got {magic:02x?}")]
    BadMagic { magic: [u8; 4] },
    #[error("File table is truncated: expected {declared} entries, only {read} present")]
    TruncatedTable { declared: u32, read: u32 },
    #[error("Entry {index} is truncated: expected {expected} bytes, only {available} present")]
    TruncatedPayload {
        index: u32,
        expected: usize,
        available: usize,
    },
    #[error("Entry {index} declares offset {declared}, but its payload starts at {actual}")]
    OffsetMismatch { index: u32, declared: u32, actual: u64 },
    #[error("Entry {index}: unable to decompress layer {layer}: {source}")]
    Decompression {
        index: u32,
        layer: u8,
        source: io::Error,
    },
    #[error("Unable to write {name}: {source}")]
    Output { name: String, source: io::Error },
}

impl Error {
    /// Map a read error, treating an early end of stream as `eof`
    pub(crate) fn from_read(err: io::Error, eof: impl FnOnce(io::Error) -> Error) -> Error {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            eof(err)
        } else {
            Error::UnreadableInput { source: err }
        }
    }
}
