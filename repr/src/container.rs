use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io;

/// The magic tag which marks a FUFS container
pub const MAGIC: [u8; 4] = *b"FUFS";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Header {
    /// Expected to match [`MAGIC`](constant.MAGIC.html). Readers are not required to check it
    pub magic: [u8; 4],
    /// Unknown purpose, never interpreted
    pub reserved: u32,
    /// The number of records in the file table which follows the header
    pub entry_count: u32,
}

impl Header {
    /// Size of the header on disk
    pub const SIZE: usize = 12;

    pub fn read<R: io::Read>(mut reader: R) -> io::Result<Self> {
        let mut magic = [0; 4];
        reader.read_exact(&mut magic)?;
        let reserved = reader.read_u32::<LittleEndian>()?;
        let entry_count = reader.read_u32::<LittleEndian>()?;
        Ok(Self {
            magic,
            reserved,
            entry_count,
        })
    }

    pub fn write<W: io::Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(&self.magic)?;
        writer.write_u32::<LittleEndian>(self.reserved)?;
        writer.write_u32::<LittleEndian>(self.entry_count)
    }

    pub fn has_magic(&self) -> bool {
        self.magic == MAGIC
    }

    /// The offset of the first payload, directly after the file table
    pub fn payloads_start(&self) -> u64 {
        Self::SIZE as u64 + u64::from(self.entry_count) * TableEntry::SIZE as u64
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TableEntry {
    /// Absolute offset of the payload in the container.
    ///
    /// Payloads are stored back to back in table order, so this is redundant with the sum of the
    /// preceding sizes
    pub offset: u32,
    /// Unknown purpose. Close to 0 for the first entry and close to `u32::MAX` for the last
    pub reserved: u32,
    /// The size in bytes (on disk) of the payload
    pub size: u32,
}

impl TableEntry {
    /// Size of a file table record on disk
    pub const SIZE: usize = 12;

    pub fn read<R: io::Read>(mut reader: R) -> io::Result<Self> {
        let offset = reader.read_u32::<LittleEndian>()?;
        let reserved = reader.read_u32::<LittleEndian>()?;
        let size = reader.read_u32::<LittleEndian>()?;
        Ok(Self {
            offset,
            reserved,
            size,
        })
    }

    pub fn write<W: io::Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(self.offset)?;
        writer.write_u32::<LittleEndian>(self.reserved)?;
        writer.write_u32::<LittleEndian>(self.size)
    }
}
