//! A FUFS container consists of three parts, packed together with no padding:
//!
//! * [Header](container/struct.Header.html)
//! * [File Table](container/struct.TableEntry.html), `entry_count` records
//! * Payloads, concatenated in file table order
//!
//! Any payload may additionally be wrapped in a [PLZP prologue](wrapper/index.html)
//! followed by a zlib stream.
//!
//! All integers are little endian.

pub mod container;
pub mod wrapper;

/// The two zlib stream headers (CMF, FLG) produced by the packing tool: default and best
/// compression, both with a 32KiB window
pub const ZLIB_HEADERS: [[u8; 2]; 2] = [[0x78, 0x9C], [0x78, 0xDA]];

/// Return true if `data` begins with one of the [`ZLIB_HEADERS`](constant.ZLIB_HEADERS.html)
pub fn has_zlib_header(data: &[u8]) -> bool {
    ZLIB_HEADERS.iter().any(|header| data.starts_with(header))
}

#[test]
fn zlib_header_tests() {
    assert!(has_zlib_header(&[0x78, 0x9C, 0x01]));
    assert!(has_zlib_header(&[0x78, 0xDA]));
    assert!(!has_zlib_header(&[0x78, 0x01]));
    assert!(!has_zlib_header(&[0x78]));
    assert!(!has_zlib_header(&[]));
}
