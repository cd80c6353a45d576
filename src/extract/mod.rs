//! Turning a container into one artifact per file table entry.
//!
//! Every entry is read, decoded (see [`decode`](decode/fn.decode.html)), classified, and written
//! to a [`Sink`](sink/trait.Sink.html) as `{index}.{extension}`.

pub mod decode;
pub mod sink;

use crate::compression::Zlib;
use crate::config::{Config, ErrorPolicy, Validation};
use crate::errors::{Error, Result};
use crate::read::{default_logger, Container, Payload};
use crate::signature::Kind;
use decode::Decoded;
use repr::container::Header;
use sink::{DirSink, Sink};
use slog::Logger;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub struct Extractor {
    config: Config,
    logger: Logger,
}

/// An entry which was written to the sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub index: u32,
    pub kind: Kind,
    /// Length of the decoded bytes
    pub len: usize,
    /// The number of zlib layers removed
    pub layers: u8,
}

impl Artifact {
    pub fn name(&self) -> String {
        artifact_name(self.index, self.kind)
    }
}

/// An entry which was left out under [`ErrorPolicy::Skip`](../config/enum.ErrorPolicy.html)
#[derive(Debug)]
pub struct Skipped {
    pub index: u32,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct Report {
    /// Written artifacts, in entry order
    pub artifacts: Vec<Artifact>,
    pub skipped: Vec<Skipped>,
}

pub fn artifact_name(index: u32, kind: Kind) -> String {
    format!("{}.{}", index, kind.extension())
}

impl Extractor {
    pub fn new(config: Config) -> Self {
        Self::with_logger(config, default_logger())
    }

    pub fn with_logger(config: Config, logger: Logger) -> Self {
        Self { config, logger }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Extract the container at `input` into `output_dir`, creating the directory if needed
    pub fn extract_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output_dir: Q,
    ) -> Result<Report> {
        self._extract_file(input.as_ref(), output_dir.as_ref())
    }

    fn _extract_file(&self, input: &Path, output_dir: &Path) -> Result<Report> {
        let container = Container::open_with_logger(input, self.logger.clone())?;
        let mut sink = DirSink::create(output_dir).map_err(|source| Error::Output {
            name: output_dir.display().to_string(),
            source,
        })?;
        self.run(container, &mut sink)
    }

    /// Extract a container read from `reader`
    pub fn extract<R: Read, S: Sink + ?Sized>(&self, reader: R, sink: &mut S) -> Result<Report> {
        let container = Container::with_logger(reader, self.logger.clone())?;
        self.run(container, sink)
    }

    fn run<R: Read, S: Sink + ?Sized>(
        &self,
        mut container: Container<R>,
        sink: &mut S,
    ) -> Result<Report> {
        let logger = container.logger().clone();
        self.check_header(container.header(), &logger)?;

        let mut emitter = Emitter {
            sink,
            policy: self.config.error_policy(),
            report: Report::default(),
            logger: logger.clone(),
        };

        let threads = self.config.threads();
        if threads > 1 {
            #[cfg(feature = "parallel")]
            self.run_parallel(&mut container, &mut emitter, threads)?;
            #[cfg(not(feature = "parallel"))]
            self.run_sequential(&mut container, &mut emitter)?;
        } else {
            self.run_sequential(&mut container, &mut emitter)?;
        }

        let report = emitter.report;
        slog::info!(logger, "Extraction finished";
            "entries" => container.entries().len(),
            "written" => report.artifacts.len(),
            "skipped" => report.skipped.len()
        );
        Ok(report)
    }

    fn run_sequential<R: Read, S: Sink + ?Sized>(
        &self,
        container: &mut Container<R>,
        emitter: &mut Emitter<'_, S>,
    ) -> Result<()> {
        let logger = container.logger().clone();
        let mut zlib = Zlib::new();
        for payload in container.payloads() {
            let payload = payload?;
            self.check_offset(&payload, &logger)?;
            let decoded = decode::decode(&mut zlib, payload.index, payload.data);
            emitter.emit(payload.index, decoded)?;
        }
        Ok(())
    }

    /// Reads stay sequential on this thread, decoding is spread over `threads` workers.
    ///
    /// Artifacts are emitted in exactly the same order as `run_sequential` would, including when
    /// the stream fails part way: everything before the failing entry is emitted first.
    #[cfg(feature = "parallel")]
    fn run_parallel<R: Read, S: Sink + ?Sized>(
        &self,
        container: &mut Container<R>,
        emitter: &mut Emitter<'_, S>,
        threads: usize,
    ) -> Result<()> {
        use crate::decode_threads::{InOrder, ParallelDecoder};

        let logger = container.logger().clone();
        slog::debug!(logger, "Decoding in parallel"; "threads" => threads);
        let decoder = ParallelDecoder::new(threads, &logger);
        let mut in_order = InOrder::new();
        let mut submitted = 0;
        let mut stream_error = None;

        for payload in container.payloads() {
            let payload = match payload.and_then(|p| self.check_offset(&p, &logger).map(|()| p)) {
                Ok(payload) => payload,
                Err(e) => {
                    stream_error = Some(e);
                    break;
                }
            };
            decoder.submit(payload.index, payload.data);
            submitted += 1;

            while let Some(response) = decoder.try_recv() {
                in_order.push(response);
            }
            while let Some((index, decoded)) = in_order.pop() {
                emitter.emit(index, decoded)?;
            }
        }

        while in_order.next_index() < submitted {
            in_order.push(decoder.recv());
            while let Some((index, decoded)) = in_order.pop() {
                emitter.emit(index, decoded)?;
            }
        }

        match stream_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn check_header(&self, header: &Header, logger: &Logger) -> Result<()> {
        if header.has_magic() {
            return Ok(());
        }
        match self.config.validation() {
            Validation::Strict => Err(Error::BadMagic {
                magic: header.magic,
            }),
            Validation::Lenient => {
                slog::warn!(logger, "Unexpected container magic, continuing anyway"; "magic" => ?header.magic);
                Ok(())
            }
        }
    }

    fn check_offset(&self, payload: &Payload, logger: &Logger) -> Result<()> {
        if u64::from(payload.entry.offset) == payload.position {
            return Ok(());
        }
        match self.config.validation() {
            Validation::Strict => Err(Error::OffsetMismatch {
                index: payload.index,
                declared: payload.entry.offset,
                actual: payload.position,
            }),
            Validation::Lenient => {
                slog::debug!(logger, "Declared offset does not match payload position";
                    "entry" => payload.index,
                    "declared" => payload.entry.offset,
                    "actual" => payload.position
                );
                Ok(())
            }
        }
    }
}

struct Emitter<'a, S: ?Sized> {
    sink: &'a mut S,
    policy: ErrorPolicy,
    report: Report,
    logger: Logger,
}

impl<S: Sink + ?Sized> Emitter<'_, S> {
    /// Write a decoded entry, or deal with its failure according to the policy
    fn emit(&mut self, index: u32, decoded: Result<Decoded>) -> Result<()> {
        let logger = self.logger.new(slog::o!("entry" => index));
        let decoded = match decoded {
            Ok(decoded) => decoded,
            Err(error) => match self.policy {
                ErrorPolicy::Abort => return Err(error),
                ErrorPolicy::Skip => {
                    slog::warn!(logger, "Skipping entry"; "error" => %error);
                    self.report.skipped.push(Skipped { index, error });
                    return Ok(());
                }
            },
        };

        let artifact = Artifact {
            index,
            kind: decoded.kind,
            len: decoded.data.len(),
            layers: decoded.layers,
        };
        let name = artifact.name();
        match decoded.prologue {
            Some(prologue) => slog::debug!(logger, "Writing artifact";
                "name" => &name,
                "len" => artifact.len,
                "layers" => artifact.layers,
                "expanded_size_hint" => prologue.expanded_size,
                "compressed_size_hint" => prologue.compressed_size
            ),
            None => slog::debug!(logger, "Writing artifact";
                "name" => &name,
                "len" => artifact.len,
                "layers" => artifact.layers
            ),
        }

        self.sink
            .write_artifact(&name, &decoded.data)
            .map_err(|source| Error::Output { name, source })?;
        self.report.artifacts.push(artifact);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::sink::MemorySink;
    use repr::container::TableEntry;
    use slog::KV;
    use std::fmt;
    use std::sync::{Arc, Mutex};

    fn logger() -> Logger {
        Logger::root(slog::Discard, slog::o!())
    }

    fn container(payloads: &[&[u8]]) -> Vec<u8> {
        let header = Header {
            magic: repr::container::MAGIC,
            reserved: 0,
            entry_count: payloads.len() as u32,
        };
        let mut data = Vec::new();
        header.write(&mut data).unwrap();
        let mut offset = header.payloads_start() as u32;
        for (i, payload) in payloads.iter().enumerate() {
            TableEntry {
                offset,
                reserved: i as u32,
                size: payload.len() as u32,
            }
            .write(&mut data)
            .unwrap();
            offset += payload.len() as u32;
        }
        for payload in payloads {
            data.extend_from_slice(payload);
        }
        data
    }

    #[test]
    fn names() {
        assert_eq!(artifact_name(0, Kind::Png), "0.png");
        assert_eq!(artifact_name(12, Kind::Unknown), "12.unknown");
    }

    #[test]
    fn extract_in_memory() {
        let data = container(&[b"\x89PNG\r\n\x1a\n", b"", b"LANGxx"]);
        let mut sink = MemorySink::new();
        let report = Extractor::with_logger(Config::new(), logger())
            .extract(&data[..], &mut sink)
            .unwrap();

        assert_eq!(sink.names(), ["0.png", "1.unknown", "2.lang"]);
        assert_eq!(sink.get("1.unknown"), Some(&b""[..]));
        let lens: Vec<usize> = report.artifacts.iter().map(|a| a.len).collect();
        assert_eq!(lens, [8, 0, 6]);
        assert!(report.skipped.is_empty());
    }

    /// Records each message with the `entry` value of the logger it was sent through
    #[derive(Clone, Default)]
    struct EntryCapture(Arc<Mutex<Vec<(String, Option<String>)>>>);

    struct EntryValue(Option<String>);

    impl slog::Serializer for EntryValue {
        fn emit_arguments(&mut self, key: slog::Key, val: &fmt::Arguments) -> slog::Result {
            if key == "entry" {
                self.0 = Some(val.to_string());
            }
            Ok(())
        }
    }

    impl slog::Drain for EntryCapture {
        type Ok = ();
        type Err = slog::Never;

        fn log(
            &self,
            record: &slog::Record,
            values: &slog::OwnedKVList,
        ) -> std::result::Result<(), slog::Never> {
            let mut entry = EntryValue(None);
            values.serialize(record, &mut entry).unwrap();
            self.0
                .lock()
                .unwrap()
                .push((record.msg().to_string(), entry.0));
            Ok(())
        }
    }

    #[test]
    fn entry_loggers_carry_the_index() {
        let data = container(&[b"PSND", b"PLZP\0\0\0\0\0\0\0\0\x78\x9c\xff\xff\xff", b"PFNT"]);
        let capture = EntryCapture::default();
        let mut config = Config::new();
        config.set_error_policy(ErrorPolicy::Skip);
        let extractor =
            Extractor::with_logger(config, Logger::root(capture.clone(), slog::o!()));
        let mut sink = MemorySink::new();
        let report = extractor.extract(&data[..], &mut sink).unwrap();
        assert_eq!(sink.names(), ["0.psnd", "2.pfnt"]);
        assert_eq!(report.skipped.len(), 1);

        let records = capture.0.lock().unwrap();
        assert!(records.contains(&("Skipping entry".to_owned(), Some("1".to_owned()))));
        for (msg, entry) in records.iter() {
            if msg == "Writing artifact" {
                assert!(
                    matches!(entry.as_deref(), Some("0") | Some("2")),
                    "{:?}",
                    entry
                );
            }
        }
    }

    #[test]
    fn strict_rejects_offsets() {
        let mut data = container(&[b"PSND", b"PFNT"]);
        // Second entry's offset
        data[12 + 12..12 + 16].copy_from_slice(&0u32.to_le_bytes());

        let mut config = Config::new();
        config.set_validation(Validation::Strict);
        let mut sink = MemorySink::new();
        let err = Extractor::with_logger(config, logger())
            .extract(&data[..], &mut sink)
            .unwrap_err();
        assert!(
            matches!(
                err,
                Error::OffsetMismatch {
                    index: 1,
                    declared: 0,
                    actual: 40
                }
            ),
            "{:?}",
            err
        );
        assert_eq!(sink.names(), ["0.psnd"]);

        let mut sink = MemorySink::new();
        Extractor::with_logger(Config::new(), logger())
            .extract(&data[..], &mut sink)
            .unwrap();
        assert_eq!(sink.names(), ["0.psnd", "1.pfnt"]);
    }
}
