//! ipsearch - Fast IPv4 Geolocation Lookups
//!
//! ipsearch resolves IPv4 addresses to country, province, city, area and
//! ISP records from a single prefix-indexed range database. The file is
//! memory-mapped (or read into memory) once and then queried concurrently
//! from any number of threads without locks.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ipsearch::Database;
//!
//! let db = Database::open("ipdata.dat")?;
//!
//! if let Some(loc) = db.lookup("1.0.1.10")? {
//!     println!("{} / {} / {} ({})", loc.country, loc.province, loc.city, loc.isp);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │  Database File                       │
//! ├──────────────────────────────────────┤
//! │  1. Header (16 bytes)                │
//! │  2. Location records ("a|b|c|...")   │
//! │  3. Range index (12-byte entries)    │
//! │  4. Prefix table (9-byte records)    │
//! └──────────────────────────────────────┘
//!          ↓ mmap() + scan prefix table
//! ┌──────────────────────────────────────┐
//! │  [Option<PrefixRange>; 256]          │
//! │  first octet → entry index run       │
//! └──────────────────────────────────────┘
//!          ↓ lower-bound search on end_ip
//! ┌──────────────────────────────────────┐
//! │  containment check → Location        │
//! └──────────────────────────────────────┘
//! ```
//!
//! Every lookup is O(log n) in the size of one prefix group and touches
//! only the bytes it needs.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Dotted-quad parsing
pub mod address;
/// Database loading and queries
pub mod database;
pub mod endian;
/// Error types
pub mod error;
pub mod file_reader;
pub mod format;
pub mod index;
/// Location record decoding
pub mod location;
pub mod prefix;
pub mod validation;

#[cfg(test)]
mod test_fixture;

pub use crate::database::{Database, DatabaseInfo, DatabaseOpener, DatabaseOptions, LoadMode};
pub use crate::error::{LoadError, QueryError};
pub use crate::location::Location;
pub use crate::validation::{validate, ValidationReport};

/// Library version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
