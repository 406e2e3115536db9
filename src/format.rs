//! On-disk layout of an ipsearch database
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ Header (16 bytes)                           │
//! │   first_start_ip_offset  u32                │
//! │   reserved               u32                │
//! │   prefix_start_offset    u32                │
//! │   prefix_end_offset      u32                │
//! ├─────────────────────────────────────────────┤
//! │ Location records ("|"-delimited text)       │
//! ├─────────────────────────────────────────────┤
//! │ Range index (12 bytes per entry)            │
//! │   start_ip u32 | end_ip u32 |               │
//! │   record_offset u24 | record_length u8      │
//! ├─────────────────────────────────────────────┤
//! │ Prefix table (9 bytes per record)           │
//! │   prefix u8 | start_index u32 | end_index u32│
//! └─────────────────────────────────────────────┘
//! ```
//!
//! All multi-byte fields are little-endian. Section order is only a
//! convention; the header offsets are authoritative.
//!
//! The structs below are `#[repr(C)]` views with alignment 1, so they can
//! be read straight out of a memory map at any offset.

use crate::endian::decode24;
use zerocopy::byteorder::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// Size of the file header in bytes
pub const HEADER_SIZE: usize = 16;

/// Size of one prefix table record in bytes
pub const PREFIX_RECORD_SIZE: usize = 9;

/// Size of one range index entry in bytes
pub const INDEX_ENTRY_SIZE: usize = 12;

/// Byte offset of `end_ip` within a range index entry
pub const END_IP_FIELD_OFFSET: usize = 4;

/// Field separator inside a location record
pub const RECORD_DELIMITER: u8 = b'|';

/// Minimum number of fields in a location record (field 0 is reserved)
pub const MIN_RECORD_FIELDS: usize = 6;

/// File header
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct Header {
    /// Offset of range index entry 0
    pub first_start_ip_offset: U32,

    /// Unused in this format variant
    pub reserved: U32,

    /// Offset of the first prefix record
    pub prefix_start_offset: U32,

    /// Offset of the last prefix record (inclusive)
    pub prefix_end_offset: U32,
}

impl Header {
    /// Read the header from the start of `buffer`
    ///
    /// Returns `None` if the buffer is shorter than [`HEADER_SIZE`].
    pub fn read(buffer: &[u8]) -> Option<Self> {
        Self::read_from_prefix(buffer).ok().map(|(header, _)| header)
    }

    /// Offset of range index entry 0
    #[inline]
    pub fn first_start_ip_offset(&self) -> u32 {
        self.first_start_ip_offset.get()
    }

    /// Offset of the first prefix record
    #[inline]
    pub fn prefix_start_offset(&self) -> u32 {
        self.prefix_start_offset.get()
    }

    /// Offset of the last prefix record
    #[inline]
    pub fn prefix_end_offset(&self) -> u32 {
        self.prefix_end_offset.get()
    }
}

/// One record of the prefix table
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct PrefixRecord {
    /// First octet of the addresses in this group
    pub prefix: u8,

    /// Index of the group's first range entry
    pub start_index: U32,

    /// Index of the group's last range entry (inclusive)
    pub end_index: U32,
}

/// Raw range index entry as stored on disk
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct RawIndexEntry {
    /// First address of the range
    pub start_ip: U32,

    /// Last address of the range (inclusive)
    pub end_ip: U32,

    /// Little-endian 24-bit offset of the location record
    pub record_offset: [u8; 3],

    /// Length of the location record in bytes
    pub record_length: u8,
}

impl RawIndexEntry {
    /// Decode into native integers
    pub fn decode(&self) -> IndexEntry {
        let [b0, b1, b2] = self.record_offset;
        IndexEntry {
            start_ip: self.start_ip.get(),
            end_ip: self.end_ip.get(),
            record_offset: decode24(b0, b1, b2),
            record_length: self.record_length,
        }
    }
}

/// Decoded range index entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    /// First address of the range
    pub start_ip: u32,
    /// Last address of the range (inclusive)
    pub end_ip: u32,
    /// Offset of the location record in the buffer
    pub record_offset: u32,
    /// Length of the location record in bytes
    pub record_length: u8,
}

impl IndexEntry {
    /// Whether `ip` lies within `[start_ip, end_ip]`
    #[inline]
    pub fn contains(&self, ip: u32) -> bool {
        self.start_ip <= ip && ip <= self.end_ip
    }

    /// Byte range of the location record
    #[inline]
    pub fn record_range(&self) -> std::ops::Range<usize> {
        let start = self.record_offset as usize;
        start..start + self.record_length as usize
    }
}
