//! Error types for loading and querying ipsearch databases
//!
//! Load-time errors are fatal: a [`Database`](crate::Database) is either
//! fully constructed or not constructed at all. Query-time errors are
//! per-lookup and recoverable.
use std::fmt;
use std::io;

/// Result type alias for database construction
pub type Result<T> = std::result::Result<T, LoadError>;

/// Errors that prevent a database from being constructed
#[derive(Debug)]
pub enum LoadError {
    /// Failed to open, read, map or decompress the database file
    Io(io::Error),

    /// Buffer is too small to hold the 16-byte header
    TruncatedHeader {
        /// Actual buffer size in bytes
        size: usize,
    },

    /// Header offsets do not describe a well-formed prefix region
    MalformedIndex(String),

    /// Prefix region extends past the end of the buffer
    TruncatedIndex {
        /// Exclusive end offset of the prefix region
        end: u64,
        /// Actual buffer size in bytes
        size: usize,
    },

    /// Database was opened with validation enabled and failed it
    Validation(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "I/O error: {}", e),
            LoadError::TruncatedHeader { size } => write!(
                f,
                "Truncated header: {} bytes (need at least {})",
                size,
                crate::format::HEADER_SIZE
            ),
            LoadError::MalformedIndex(msg) => write!(f, "Malformed prefix index: {}", msg),
            LoadError::TruncatedIndex { end, size } => write!(
                f,
                "Truncated prefix index: region ends at {} but buffer is {} bytes",
                end, size
            ),
            LoadError::Validation(msg) => write!(f, "Validation failed: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::Io(err)
    }
}

/// Errors returned by a single lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Input is not a dotted-quad IPv4 address
    InvalidAddress(String),

    /// No range entry covers the address
    NotFound,

    /// Index entry or location record points outside the buffer or is malformed
    CorruptRecord(String),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::InvalidAddress(input) => write!(f, "Invalid IPv4 address: {:?}", input),
            QueryError::NotFound => write!(f, "No IP data found"),
            QueryError::CorruptRecord(msg) => write!(f, "Corrupt record: {}", msg),
        }
    }
}

impl std::error::Error for QueryError {}
