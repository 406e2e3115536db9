//! Dotted-quad IPv4 parsing
//!
//! Addresses map to integers in standard network order: the leftmost
//! octet occupies the high-order byte, so `"1.2.3.4"` is `0x01020304`.

use crate::error::QueryError;
use std::net::Ipv4Addr;

/// Parse a dotted-quad string into its numeric value
///
/// Exactly four `.`-separated decimal components in `0..=255` are
/// required. Anything else is [`QueryError::InvalidAddress`]; malformed
/// components are never silently read as zero.
///
/// ```rust
/// use ipsearch::address::parse_ipv4;
///
/// assert_eq!(parse_ipv4("1.2.3.4").unwrap(), 0x01020304);
/// assert!(parse_ipv4("1.2.3").is_err());
/// assert!(parse_ipv4("1.2.3.256").is_err());
/// ```
pub fn parse_ipv4(input: &str) -> Result<u32, QueryError> {
    let invalid = || QueryError::InvalidAddress(input.to_string());

    let mut octets = [0u8; 4];
    let mut parts = input.split('.');
    for octet in octets.iter_mut() {
        let part = parts.next().ok_or_else(invalid)?;
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        *octet = part.parse::<u8>().map_err(|_| invalid())?;
    }
    if parts.next().is_some() {
        return Err(invalid());
    }

    Ok(u32::from_be_bytes(octets))
}

/// Numeric value of a typed address
#[inline]
pub fn ipv4_to_u32(addr: Ipv4Addr) -> u32 {
    u32::from(addr)
}

/// First (most significant) octet of an address
#[inline]
pub fn prefix_of(ip: u32) -> u8 {
    (ip >> 24) as u8
}
