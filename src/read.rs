use crate::errors::{Error, Result};
use repr::container::{Header, TableEntry};
use slog::{Drain, Logger};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Declared sizes and counts are untrusted, so buffers grow as data actually arrives past this
const MAX_PREALLOC: usize = 1 << 20;

/// A FUFS container whose header and file table have been read.
///
/// Payloads are read sequentially from the underlying stream, which is never rewound.
#[derive(Debug)]
pub struct Container<R> {
    reader: R,
    header: Header,
    entries: Vec<TableEntry>,
    position: u64,
    logger: Logger,
}

/// One entry's raw bytes, exactly as stored in the container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub index: u32,
    pub entry: TableEntry,
    /// Where the payload actually started in the stream
    pub position: u64,
    pub data: Vec<u8>,
}

pub(crate) fn default_logger() -> Logger {
    slog::Logger::root(slog_stdlog::StdLog.fuse(), slog::o!())
}

impl Container<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(p: P) -> Result<Self> {
        Self::open_with_logger(p, default_logger())
    }

    pub fn open_with_logger<P: AsRef<Path>>(p: P, logger: Logger) -> Result<Self> {
        Self::_open_with_logger(p.as_ref(), logger)
    }

    fn _open_with_logger(path: &Path, logger: Logger) -> Result<Self> {
        let path_str = path.display().to_string();
        let logger = logger.new(slog::o!("file" => path_str));
        let file = File::open(path).map_err(|source| Error::UnreadableInput { source })?;
        Self::with_logger(BufReader::new(file), logger)
    }
}

impl<R: Read> Container<R> {
    pub fn new(reader: R) -> Result<Self> {
        Self::with_logger(reader, default_logger())
    }

    pub fn with_logger(mut reader: R, logger: Logger) -> Result<Self> {
        let header = Header::read(&mut reader)
            .map_err(|e| Error::from_read(e, |source| Error::MalformedHeader { source }))?;
        log_header(&logger, &header);

        let declared = header.entry_count;
        let mut entries =
            Vec::with_capacity((declared as usize).min(MAX_PREALLOC / TableEntry::SIZE));
        for index in 0..declared {
            let entry = TableEntry::read(&mut reader).map_err(|e| {
                Error::from_read(e, |_| Error::TruncatedTable {
                    declared,
                    read: index,
                })
            })?;
            slog::trace!(logger, "Read table entry";
                "index" => index,
                "offset" => entry.offset,
                "reserved" => entry.reserved,
                "size" => entry.size
            );
            entries.push(entry);
        }

        Ok(Self {
            reader,
            position: header.payloads_start(),
            header,
            entries,
            logger,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Read every payload, in file table order.
    ///
    /// The iterator ends after the first error, since the stream can no longer be trusted to be
    /// positioned at the next payload.
    pub fn payloads(&mut self) -> Payloads<'_, R> {
        Payloads {
            container: self,
            next: 0,
            failed: false,
        }
    }

    fn read_payload(&mut self, index: u32, entry: TableEntry) -> Result<Payload> {
        let expected = entry.size as usize;
        let mut data = Vec::with_capacity(expected.min(MAX_PREALLOC));
        let available = (&mut self.reader)
            .take(u64::from(entry.size))
            .read_to_end(&mut data)
            .map_err(|source| Error::UnreadableInput { source })?;
        if available < expected {
            return Err(Error::TruncatedPayload {
                index,
                expected,
                available,
            });
        }

        let position = self.position;
        self.position += u64::from(entry.size);
        Ok(Payload {
            index,
            entry,
            position,
            data,
        })
    }
}

pub struct Payloads<'a, R> {
    container: &'a mut Container<R>,
    next: usize,
    failed: bool,
}

impl<R: Read> Iterator for Payloads<'_, R> {
    type Item = Result<Payload>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let entry = *self.container.entries.get(self.next)?;
        let index = self.next as u32;
        self.next += 1;

        let result = self.container.read_payload(index, entry);
        self.failed = result.is_err();
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.failed {
            0
        } else {
            self.container.entries.len() - self.next
        };
        (0, Some(remaining))
    }
}

fn log_header(logger: &Logger, header: &Header) {
    slog::debug!(logger, "Read header";
        "magic" => ?header.magic,
        "reserved" => header.reserved,
        "entry_count" => header.entry_count
    )
}
