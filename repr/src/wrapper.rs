//! The PLZP wrapper: a 12 byte prologue placed in front of a zlib stream.
//!
//! ```text
//! [0..4)   "PLZP"
//! [4..8)   expanded size (u32)
//! [8..12)  compressed size (u32)
//! [12..)   zlib stream
//! ```
//!
//! Neither size is reliable enough to be enforced; the zlib stream itself is the source of truth.

use byteorder::{ByteOrder, LittleEndian};

/// The tag which marks a wrapped payload
pub const TAG: [u8; 4] = *b"PLZP";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Prologue {
    pub expanded_size: u32,
    pub compressed_size: u32,
}

impl Prologue {
    /// Size of the prologue, including the tag
    pub const SIZE: usize = 12;

    /// Return true if `data` carries the wrapper tag, regardless of its length
    pub fn is_tagged(data: &[u8]) -> bool {
        data.starts_with(&TAG)
    }

    /// Parse the prologue at the start of `data`.
    ///
    /// Returns `None` if `data` is not tagged, or is too short to hold a full prologue
    pub fn parse(data: &[u8]) -> Option<Self> {
        if !Self::is_tagged(data) || data.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            expanded_size: LittleEndian::read_u32(&data[4..8]),
            compressed_size: LittleEndian::read_u32(&data[8..12]),
        })
    }

    /// Encode a prologue, tag included
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0; Self::SIZE];
        bytes[..4].copy_from_slice(&TAG);
        LittleEndian::write_u32(&mut bytes[4..8], self.expanded_size);
        LittleEndian::write_u32(&mut bytes[8..12], self.compressed_size);
        bytes
    }
}
