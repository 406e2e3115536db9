//! Little-endian integer decoding for the database format
//!
//! Every multi-byte field in the file is stored least significant byte
//! first. The decoders here assemble values from raw bytes and are
//! independent of the host's byte order, so the same database reads
//! identically on x86, ARM and big-endian targets.
//!
//! ```rust
//! use ipsearch::endian::{decode24, decode32, read_u32_le};
//!
//! assert_eq!(decode32(0x78, 0x56, 0x34, 0x12), 0x12345678);
//! assert_eq!(decode24(0x56, 0x34, 0x12), 0x123456);
//!
//! let buffer = [0xEF, 0xBE, 0xAD, 0xDE];
//! assert_eq!(read_u32_le(&buffer, 0), Some(0xDEADBEEF));
//! assert_eq!(read_u32_le(&buffer, 1), None);
//! ```

/// Assemble a u32 from four bytes, `b0` least significant
#[inline(always)]
pub const fn decode32(b0: u8, b1: u8, b2: u8, b3: u8) -> u32 {
    (b0 as u32) | ((b1 as u32) << 8) | ((b2 as u32) << 16) | ((b3 as u32) << 24)
}

/// Assemble a u32 from three bytes, `b0` least significant, top byte zero
#[inline(always)]
pub const fn decode24(b0: u8, b1: u8, b2: u8) -> u32 {
    (b0 as u32) | ((b1 as u32) << 8) | ((b2 as u32) << 16)
}

/// Read a little-endian u32 at `offset`
///
/// Returns `None` if `offset + 4` exceeds the buffer.
#[inline]
pub fn read_u32_le(buffer: &[u8], offset: usize) -> Option<u32> {
    let end = offset.checked_add(4)?;
    match buffer.get(offset..end)? {
        [b0, b1, b2, b3] => Some(decode32(*b0, *b1, *b2, *b3)),
        _ => None,
    }
}

/// Read a little-endian 24-bit value at `offset`
///
/// Returns `None` if `offset + 3` exceeds the buffer.
#[inline]
pub fn read_u24_le(buffer: &[u8], offset: usize) -> Option<u32> {
    let end = offset.checked_add(3)?;
    match buffer.get(offset..end)? {
        [b0, b1, b2] => Some(decode24(*b0, *b1, *b2)),
        _ => None,
    }
}
