//! File input with transparent gzip decompression
//!
//! Two kinds of input pass through here: database files that are
//! distributed compressed (`ipdata.dat.gz`) and address lists fed to batch
//! lookups. Both are detected as gzip by a case-insensitive `.gz`
//! extension.
//!
//! ```rust,no_run
//! use ipsearch::file_reader;
//! use std::io::BufRead;
//!
//! // One address per line, "-" for stdin
//! for line in file_reader::open_lines("addresses.txt.gz")?.lines() {
//!     println!("{}", line?);
//! }
//!
//! // Whole database image, decompressed if needed
//! let bytes = file_reader::read_all("ipdata.dat.gz")?;
//! # Ok::<(), std::io::Error>(())
//! ```

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, stdin, BufRead, BufReader, Read};
use std::path::Path;

/// Buffer size for line-oriented input
const BUFFER_SIZE: usize = 128 * 1024;

/// Whether `path` names a gzip file
pub fn is_gzip<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
}

/// Open a line-oriented input
///
/// The path `-` reads from stdin. `.gz` files are decompressed on the fly.
pub fn open_lines<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn BufRead + Send>> {
    let path = path.as_ref();

    if path.to_str() == Some("-") {
        return Ok(Box::new(BufReader::with_capacity(BUFFER_SIZE, stdin())));
    }

    let file = File::open(path)?;
    if is_gzip(path) {
        Ok(Box::new(BufReader::with_capacity(
            BUFFER_SIZE,
            GzDecoder::new(file),
        )))
    } else {
        Ok(Box::new(BufReader::with_capacity(BUFFER_SIZE, file)))
    }
}

/// Read a whole file into memory, decompressing `.gz` files
pub fn read_all<P: AsRef<Path>>(path: P) -> io::Result<Vec<u8>> {
    let path = path.as_ref();
    if !is_gzip(path) {
        return std::fs::read(path);
    }

    let mut bytes = Vec::new();
    GzDecoder::new(File::open(path)?).read_to_end(&mut bytes)?;
    Ok(bytes)
}
