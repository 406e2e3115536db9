//! Database loading and the query engine
//!
//! A [`Database`] owns its buffer (memory-mapped or in memory) and the
//! 256-slot prefix table built from it. Construction either succeeds with
//! a fully built value or fails; there is no partially loaded state.
//! After that nothing is mutated, so a `Database` can be shared across
//! threads (e.g. in an `Arc`) and queried without locks.
//!
//! A lookup runs in four steps:
//!
//! ```text
//! "10.0.0.5" ─parse─▶ 0x0A000005
//!            ─prefix table[10]─▶ entries [start, end]
//!            ─lower-bound search on end_ip─▶ candidate entry
//!            ─containment check─▶ record bytes ─split '|'─▶ Location
//! ```

use crate::address::{ipv4_to_u32, parse_ipv4, prefix_of};
use crate::error::{LoadError, QueryError};
use crate::file_reader;
use crate::format::{Header, IndexEntry};
use crate::index::RangeIndex;
use crate::location::Location;
use crate::prefix::PrefixTable;
use crate::validation;
use memmap2::Mmap;
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Storage for database data - either owned or memory-mapped
enum DatabaseStorage {
    Owned(Vec<u8>),
    Mmap(Mmap),
}

impl DatabaseStorage {
    fn as_slice(&self) -> &[u8] {
        match self {
            DatabaseStorage::Owned(v) => v.as_slice(),
            DatabaseStorage::Mmap(m) => &m[..],
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            DatabaseStorage::Owned(_) => "memory",
            DatabaseStorage::Mmap(_) => "mmap",
        }
    }
}

/// How the database file is brought into memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Map the file read-only (default)
    #[default]
    Mmap,
    /// Read the whole file into an owned buffer
    InMemory,
}

/// Options for opening a database
#[derive(Debug, Clone, Default)]
pub struct DatabaseOptions {
    /// Path to the database file
    pub path: PathBuf,

    /// Storage strategy. Gzip-compressed files always load in memory.
    pub load_mode: LoadMode,

    /// Run the full structural validator and refuse the file on any error
    pub validate: bool,
}

/// Builder for opening databases with custom configuration
///
/// Created via [`Database::from`].
///
/// ```no_run
/// use ipsearch::Database;
///
/// // Defaults: memory-mapped, no up-front validation
/// let db = Database::from("ipdata.dat").open()?;
///
/// // Untrusted file: read it into memory and check every entry first
/// let db = Database::from("download.dat")
///     .in_memory()
///     .validate()
///     .open()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseOpener {
    options: DatabaseOptions,
}

impl DatabaseOpener {
    fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            options: DatabaseOptions {
                path: path.into(),
                ..Default::default()
            },
        }
    }

    /// Read the file into an owned buffer instead of mapping it
    pub fn in_memory(mut self) -> Self {
        self.options.load_mode = LoadMode::InMemory;
        self
    }

    /// Memory-map the file (the default)
    pub fn mmap(mut self) -> Self {
        self.options.load_mode = LoadMode::Mmap;
        self
    }

    /// Validate every prefix group, entry and record before returning
    pub fn validate(mut self) -> Self {
        self.options.validate = true;
        self
    }

    /// Open the database with the configured options
    pub fn open(self) -> Result<Database, LoadError> {
        Database::open_with_options(self.options)
    }
}

/// Summary of a loaded database
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseInfo {
    /// Buffer size in bytes
    pub size: usize,
    /// `"mmap"` or `"memory"`
    pub storage: &'static str,
    /// Offset of range index entry 0
    pub first_start_ip_offset: u32,
    /// Offset of the first prefix record
    pub prefix_start_offset: u32,
    /// Offset of the last prefix record
    pub prefix_end_offset: u32,
    /// Records in the prefix region
    pub prefix_records: u32,
    /// Distinct first octets with data
    pub populated_prefixes: usize,
    /// Range index entries referenced by the prefix table
    pub entry_count: u64,
    /// First octets that appeared in more than one prefix record
    pub duplicate_prefixes: Vec<u8>,
}

/// IPv4 geolocation database
///
/// ```no_run
/// use ipsearch::{Database, QueryError};
///
/// let db = Database::open("ipdata.dat")?;
///
/// match db.query("1.0.1.10") {
///     Ok(loc) => println!("{} {} {}", loc.country, loc.city, loc.isp),
///     Err(QueryError::NotFound) => println!("no data"),
///     Err(e) => eprintln!("lookup failed: {}", e),
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Database {
    data: DatabaseStorage,
    header: Header,
    prefixes: PrefixTable,
}

impl Database {
    /// Open a database file using memory mapping
    ///
    /// Files ending in `.gz` are decompressed into memory instead.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        Self::from(path.as_ref()).open()
    }

    /// Start configuring how a database file is opened
    #[allow(clippy::should_implement_trait)]
    pub fn from(path: impl Into<PathBuf>) -> DatabaseOpener {
        DatabaseOpener::new(path)
    }

    /// Create a database from raw bytes
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, LoadError> {
        Self::from_storage(DatabaseStorage::Owned(data))
    }

    fn open_with_options(options: DatabaseOptions) -> Result<Self, LoadError> {
        let path = &options.path;
        let storage = if file_reader::is_gzip(path) || options.load_mode == LoadMode::InMemory {
            DatabaseStorage::Owned(file_reader::read_all(path)?)
        } else {
            let file = File::open(path)?;
            // SAFETY: the map is read-only and never outlives `Database`.
            // Truncating the file underneath a live map is outside what we
            // can defend against, as with any mmap-based reader.
            let mmap = unsafe { Mmap::map(&file)? };
            DatabaseStorage::Mmap(mmap)
        };

        let db = Self::from_storage(storage)?;
        debug!(path = %path.display(), "opened database");

        if options.validate {
            let report = validation::validate(&db);
            if !report.is_valid() {
                return Err(LoadError::Validation(format!(
                    "{} error(s), first: {}",
                    report.errors.len() + report.suppressed_errors,
                    report.errors.first().map(String::as_str).unwrap_or("unknown")
                )));
            }
        }

        Ok(db)
    }

    fn from_storage(storage: DatabaseStorage) -> Result<Self, LoadError> {
        let data = storage.as_slice();
        let header = Header::read(data).ok_or(LoadError::TruncatedHeader { size: data.len() })?;
        let prefixes = PrefixTable::parse(data, &header)?;

        debug!(
            size = data.len(),
            storage = storage.kind(),
            prefix_records = prefixes.record_count(),
            populated = prefixes.populated(),
            "loaded prefix table"
        );

        Ok(Self {
            data: storage,
            header,
            prefixes,
        })
    }

    /// Look up a dotted-quad address
    ///
    /// Returns [`QueryError::InvalidAddress`] for malformed input,
    /// [`QueryError::NotFound`] when no range covers the address and
    /// [`QueryError::CorruptRecord`] when the database points outside
    /// itself or holds a malformed record.
    pub fn query(&self, ip: &str) -> Result<Location, QueryError> {
        let target = parse_ipv4(ip)?;
        let result = self.resolve(target);
        trace!(ip, found = result.is_ok(), "query");
        result
    }

    /// Look up an address, mapping [`QueryError::NotFound`] to `Ok(None)`
    pub fn lookup(&self, ip: &str) -> Result<Option<Location>, QueryError> {
        match self.query(ip) {
            Ok(location) => Ok(Some(location)),
            Err(QueryError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Look up a typed address
    pub fn lookup_ip(&self, addr: Ipv4Addr) -> Result<Location, QueryError> {
        self.resolve(ipv4_to_u32(addr))
    }

    /// Look up many addresses in parallel
    ///
    /// Results are returned in input order.
    pub fn query_batch<S>(&self, ips: &[S]) -> Vec<Result<Location, QueryError>>
    where
        S: AsRef<str> + Sync,
    {
        ips.par_iter().map(|ip| self.query(ip.as_ref())).collect()
    }

    fn resolve(&self, target: u32) -> Result<Location, QueryError> {
        let range = self
            .prefixes
            .get(prefix_of(target))
            .ok_or(QueryError::NotFound)?;

        let index = self.range_index();
        let candidate = index.search(range.start_index, range.end_index, target)?;
        let entry = index.entry(candidate)?;
        if !entry.contains(target) {
            return Err(QueryError::NotFound);
        }

        Location::parse(self.record_bytes(&entry)?)
    }

    /// Raw bytes of the location record an entry points at
    pub fn record_bytes(&self, entry: &IndexEntry) -> Result<&[u8], QueryError> {
        self.as_bytes().get(entry.record_range()).ok_or_else(|| {
            QueryError::CorruptRecord(format!(
                "location record at {}+{} is outside the {}-byte buffer",
                entry.record_offset,
                entry.record_length,
                self.size()
            ))
        })
    }

    /// View over the range index
    pub fn range_index(&self) -> RangeIndex<'_> {
        RangeIndex::new(self.as_bytes(), self.header.first_start_ip_offset())
    }

    /// Parsed file header
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// First-octet prefix table
    pub fn prefixes(&self) -> &PrefixTable {
        &self.prefixes
    }

    /// The whole database buffer
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_slice()
    }

    /// Buffer size in bytes
    pub fn size(&self) -> usize {
        self.as_bytes().len()
    }

    /// Whether the buffer is a memory map
    pub fn is_mmap(&self) -> bool {
        matches!(self.data, DatabaseStorage::Mmap(_))
    }

    /// Summary of layout and contents
    pub fn info(&self) -> DatabaseInfo {
        let entry_count = self
            .prefixes
            .iter()
            .map(|(_, range)| range.end_index as u64 + 1)
            .max()
            .unwrap_or(0);

        DatabaseInfo {
            size: self.size(),
            storage: self.data.kind(),
            first_start_ip_offset: self.header.first_start_ip_offset(),
            prefix_start_offset: self.header.prefix_start_offset(),
            prefix_end_offset: self.header.prefix_end_offset(),
            prefix_records: self.prefixes.record_count(),
            populated_prefixes: self.prefixes.populated(),
            entry_count,
            duplicate_prefixes: self.prefixes.duplicates().to_vec(),
        }
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("size", &self.size())
            .field("storage", &self.data.kind())
            .field("header", &self.header)
            .field("populated_prefixes", &self.prefixes.populated())
            .finish()
    }
}
