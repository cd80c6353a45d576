//! Extraction of assets from FUFS containers.
//!
//! A container is read front to back exactly once: header, file table, then each payload in table
//! order. Payloads may be zlib compressed, bare or behind a PLZP prologue (sometimes twice over),
//! and are written out as `{index}.{extension}`, with the extension guessed from the decoded
//! bytes.
//!
//! ```no_run
//! let report = fufs::extract_to("assets.vfs", "out")?;
//! println!("extracted {} files", report.artifacts.len());
//! # Ok::<(), fufs::Error>(())
//! ```

pub mod compression;
pub mod config;
#[cfg(feature = "parallel")]
mod decode_threads;
pub mod errors;
pub mod extract;
pub mod read;
pub mod signature;
#[cfg(feature = "parallel")]
mod thread;

use std::path::Path;

pub use config::{Config, ErrorPolicy, Validation};
pub use errors::{Error, Result};
pub use extract::sink::{DirSink, MemorySink, Sink};
pub use extract::{Artifact, Extractor, Report, Skipped};
pub use read::Container;
pub use signature::Kind;

/// Extract every entry of the container at `input` into `output_dir`, stopping at the first error
pub fn extract_to<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output_dir: Q) -> Result<Report> {
    Extractor::new(Config::default()).extract_file(input, output_dir)
}
