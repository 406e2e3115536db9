//! Location records
//!
//! A record is a `|`-delimited UTF-8 string with at least six fields.
//! Field 0 is reserved by the format; fields 1 through 5 carry country,
//! province, city, area and ISP. Trailing extra fields are ignored.

use crate::error::QueryError;
use crate::format::{MIN_RECORD_FIELDS, RECORD_DELIMITER};
use memchr::memchr_iter;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic and ISP data for one IP range
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Country name
    pub country: String,
    /// Province or state
    pub province: String,
    /// City
    pub city: String,
    /// District or area
    pub area: String,
    /// Internet service provider
    pub isp: String,
}

impl Location {
    /// Decode a raw record
    ///
    /// Fails with [`QueryError::CorruptRecord`] if the bytes are not UTF-8
    /// or hold fewer than six fields.
    pub fn parse(record: &[u8]) -> Result<Self, QueryError> {
        let text = std::str::from_utf8(record).map_err(|e| {
            QueryError::CorruptRecord(format!("location record is not UTF-8: {}", e))
        })?;

        let mut fields: [&str; MIN_RECORD_FIELDS] = [""; MIN_RECORD_FIELDS];
        let mut count = 0;
        let mut start = 0;
        for end in memchr_iter(RECORD_DELIMITER, record).chain(std::iter::once(record.len())) {
            if count == MIN_RECORD_FIELDS {
                break;
            }
            // Delimiter is ASCII, so these are char boundaries
            fields[count] = &text[start..end];
            count += 1;
            start = end + 1;
        }

        if count < MIN_RECORD_FIELDS {
            return Err(QueryError::CorruptRecord(format!(
                "location record has {} fields, need at least {}",
                count, MIN_RECORD_FIELDS
            )));
        }

        Ok(Location {
            country: fields[1].to_string(),
            province: fields[2].to_string(),
            city: fields[3].to_string(),
            area: fields[4].to_string(),
            isp: fields[5].to_string(),
        })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}",
            self.country, self.province, self.city, self.area, self.isp
        )
    }
}
