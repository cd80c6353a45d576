//! Stream decompression for payload contents.
//!
//! Payloads are only ever compressed as zlib streams (deflate with a zlib header and adler32
//! trailer), either bare or behind a [PLZP prologue](../../repr/wrapper/index.html).

use std::io;

pub mod zlib;

pub use repr::{has_zlib_header, ZLIB_HEADERS};
pub use zlib::Zlib;

/// Inflate a complete zlib stream with a fresh decompressor
pub fn inflate(src: &[u8]) -> io::Result<Vec<u8>> {
    Zlib::new().decompress(src)
}
