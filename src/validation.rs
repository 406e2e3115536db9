//! Structural validation for untrusted database files
//!
//! Loading only checks what lookups need up front: the header and the
//! prefix region. Everything else is decoded lazily and bounds-checked per
//! query. This module walks the whole file instead, so a database can be
//! vetted once before it is deployed:
//!
//! - every prefix group's entry indices lie inside the buffer
//! - `start_ip <= end_ip` for every entry
//! - entries within a group are ascending and non-overlapping
//! - each entry's start address begins with its group's octet
//! - every location record is in bounds, UTF-8 and has at least 6 fields
//!
//! ```rust,no_run
//! use ipsearch::{validation, Database};
//!
//! let db = Database::open("ipdata.dat")?;
//! let report = validation::validate(&db);
//!
//! if report.is_valid() {
//!     println!("✓ {} entries checked", report.stats.entries_checked);
//! } else {
//!     for error in &report.errors {
//!         println!("  - {}", error);
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::address::prefix_of;
use crate::database::Database;
use crate::location::Location;
use serde::Serialize;
use std::net::Ipv4Addr;

/// Errors beyond this many are counted but not recorded
const MAX_REPORTED_ERRORS: usize = 100;

/// Validation report with detailed findings
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    /// Problems that make lookups return wrong answers or fail
    pub errors: Vec<String>,
    /// Suspicious but non-fatal findings
    pub warnings: Vec<String>,
    /// Errors found after the report filled up
    pub suppressed_errors: usize,
    /// What was checked
    pub stats: ValidationStats,
}

/// Counters gathered during validation
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationStats {
    /// Buffer size in bytes
    pub file_size: usize,
    /// Records in the prefix region
    pub prefix_records: u32,
    /// Distinct first octets with data
    pub populated_prefixes: usize,
    /// Range index entries decoded
    pub entries_checked: u64,
    /// Location records decoded successfully
    pub records_checked: u64,
}

impl ValidationReport {
    /// No errors were found
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.suppressed_errors == 0
    }

    fn error(&mut self, msg: String) {
        if self.errors.len() < MAX_REPORTED_ERRORS {
            self.errors.push(msg);
        } else {
            self.suppressed_errors += 1;
        }
    }
}

/// Check every prefix group, entry and location record of a database
pub fn validate(db: &Database) -> ValidationReport {
    let prefixes = db.prefixes();
    let index = db.range_index();
    let capacity = index.capacity() as u64;

    let mut report = ValidationReport {
        stats: ValidationStats {
            file_size: db.size(),
            prefix_records: prefixes.record_count(),
            populated_prefixes: prefixes.populated(),
            ..Default::default()
        },
        ..Default::default()
    };

    let first_offset = db.header().first_start_ip_offset();
    if first_offset as usize > db.size() {
        report.error(format!(
            "range index offset {} is past the end of the {}-byte buffer",
            first_offset,
            db.size()
        ));
    }

    for &octet in prefixes.duplicates() {
        report.warnings.push(format!(
            "prefix {} appears in more than one record; the last one is used",
            octet
        ));
    }

    for (octet, range) in prefixes.iter() {
        if range.start_index > range.end_index {
            report.error(format!(
                "prefix {}: start index {} is after end index {}",
                octet, range.start_index, range.end_index
            ));
            continue;
        }
        if range.end_index as u64 >= capacity {
            report.error(format!(
                "prefix {}: end index {} exceeds the {} entries in the buffer",
                octet, range.end_index, capacity
            ));
            continue;
        }

        let mut previous_end: Option<u32> = None;
        for i in range.start_index..=range.end_index {
            let entry = match index.entry(i) {
                Ok(entry) => entry,
                Err(e) => {
                    report.error(format!("prefix {}: entry {}: {}", octet, i, e));
                    continue;
                }
            };
            report.stats.entries_checked += 1;

            let (start, end) = (Ipv4Addr::from(entry.start_ip), Ipv4Addr::from(entry.end_ip));
            if entry.start_ip > entry.end_ip {
                report.error(format!(
                    "entry {}: start {} is after end {}",
                    i, start, end
                ));
            }
            if prefix_of(entry.start_ip) != octet {
                report.warnings.push(format!(
                    "entry {}: start {} is filed under prefix {}",
                    i, start, octet
                ));
            }
            if let Some(prev) = previous_end {
                if entry.start_ip <= prev {
                    report.error(format!(
                        "entry {}: range {}-{} overlaps or precedes the previous entry ending at {}",
                        i,
                        start,
                        end,
                        Ipv4Addr::from(prev)
                    ));
                }
            }
            previous_end = Some(entry.end_ip);

            match db.record_bytes(&entry).and_then(Location::parse) {
                Ok(_) => report.stats.records_checked += 1,
                Err(e) => report.error(format!("entry {}: {}", i, e)),
            }
        }
    }

    report
}
