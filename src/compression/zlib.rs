use flate2::{FlushDecompress, Status};
use std::io;

/// Output grows by this much whenever the decompressor fills the buffer
const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug)]
pub struct Zlib {
    decompressor: flate2::Decompress,
}

impl Default for Zlib {
    fn default() -> Self {
        Self {
            decompressor: flate2::Decompress::new(true),
        }
    }
}

impl Zlib {
    pub fn new() -> Self {
        Self::default()
    }

    fn decompressor(&mut self) -> &mut flate2::Decompress {
        let decompressor = &mut self.decompressor;
        decompressor.reset(true);
        decompressor
    }

    /// Inflate a complete zlib stream
    ///
    /// Fails with `InvalidData` if the stream is corrupt, and with `UnexpectedEof` if `src` ends
    /// before the end of the stream. Trailing bytes after the end of the stream are ignored.
    pub fn decompress(&mut self, src: &[u8]) -> io::Result<Vec<u8>> {
        let decompressor = self.decompressor();
        let mut dst = Vec::with_capacity(src.len().saturating_mul(2).clamp(64, CHUNK_SIZE));
        loop {
            if dst.len() == dst.capacity() {
                dst.reserve(CHUNK_SIZE);
            }

            let in_offset = min_mem(decompressor.total_in(), src.len());
            let input = &src[in_offset..];
            let (before_in, before_out) = (decompressor.total_in(), decompressor.total_out());

            let status = decompressor
                .decompress_vec(input, &mut dst, FlushDecompress::None)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            match status {
                Status::StreamEnd => break,
                Status::Ok | Status::BufError => {
                    let stalled = decompressor.total_in() == before_in
                        && decompressor.total_out() == before_out;
                    // There was room for output, so no progress means the input ran out
                    if stalled {
                        return Err(io::Error::new(
                            io::ErrorKind::UnexpectedEof,
                            "zlib stream ended before its end marker",
                        ));
                    }
                }
            }
        }
        Ok(dst)
    }
}

fn min_mem(file_size: u64, mem_size: usize) -> usize {
    if file_size < mem_size as u64 {
        file_size as usize
    } else {
        mem_size
    }
}
