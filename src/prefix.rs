//! First-octet prefix table
//!
//! The coarse level of the index. Each of the 256 possible first octets
//! maps to the inclusive run of range index entries whose start address
//! begins with that octet, which narrows every lookup to one group before
//! the binary search runs.

use crate::error::LoadError;
use crate::format::{Header, PrefixRecord, PREFIX_RECORD_SIZE};
use tracing::warn;
use zerocopy::FromBytes;

/// Inclusive run of range index entries for one first octet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixRange {
    /// Index of the first entry in the group
    pub start_index: u32,
    /// Index of the last entry in the group (inclusive)
    pub end_index: u32,
}

/// Prefix table keyed by first octet
#[derive(Debug, Clone)]
pub struct PrefixTable {
    slots: [Option<PrefixRange>; 256],
    record_count: u32,
    duplicates: Vec<u8>,
}

impl PrefixTable {
    /// Scan the prefix region described by `header`
    ///
    /// Fails with [`LoadError::MalformedIndex`] if the region bounds are
    /// inverted or not a whole number of records, and with
    /// [`LoadError::TruncatedIndex`] if the region runs past the buffer.
    /// When the same octet appears more than once, the last record wins.
    pub fn parse(buffer: &[u8], header: &Header) -> Result<Self, LoadError> {
        let start = header.prefix_start_offset();
        let end = header.prefix_end_offset();

        if end < start {
            return Err(LoadError::MalformedIndex(format!(
                "prefix end offset {} precedes start offset {}",
                end, start
            )));
        }
        let span = end - start;
        if span as usize % PREFIX_RECORD_SIZE != 0 {
            return Err(LoadError::MalformedIndex(format!(
                "prefix region span {} is not a multiple of {}",
                span, PREFIX_RECORD_SIZE
            )));
        }
        let record_count = span / PREFIX_RECORD_SIZE as u32 + 1;

        // Region is [start, end + 9); computed in u64 so it cannot wrap.
        let region_end = end as u64 + PREFIX_RECORD_SIZE as u64;
        if region_end > buffer.len() as u64 {
            return Err(LoadError::TruncatedIndex {
                end: region_end,
                size: buffer.len(),
            });
        }
        let region = &buffer[start as usize..region_end as usize];

        let mut table = PrefixTable {
            slots: [None; 256],
            record_count,
            duplicates: Vec::new(),
        };

        for chunk in region.chunks_exact(PREFIX_RECORD_SIZE) {
            let (record, _) = PrefixRecord::read_from_prefix(chunk).map_err(|_| {
                LoadError::MalformedIndex("short prefix record".to_string())
            })?;
            table.insert(
                record.prefix,
                PrefixRange {
                    start_index: record.start_index.get(),
                    end_index: record.end_index.get(),
                },
            );
        }

        Ok(table)
    }

    fn insert(&mut self, prefix: u8, range: PrefixRange) {
        let slot = &mut self.slots[prefix as usize];
        if let Some(previous) = slot.replace(range) {
            warn!(
                prefix,
                previous_start = previous.start_index,
                previous_end = previous.end_index,
                start = range.start_index,
                end = range.end_index,
                "duplicate prefix record, keeping the later one"
            );
            if !self.duplicates.contains(&prefix) {
                self.duplicates.push(prefix);
            }
        }
    }

    /// Entry range for a first octet, if the database covers it
    #[inline]
    pub fn get(&self, prefix: u8) -> Option<PrefixRange> {
        self.slots[prefix as usize]
    }

    /// Number of records scanned from the prefix region
    pub fn record_count(&self) -> u32 {
        self.record_count
    }

    /// Number of octets with an entry
    pub fn populated(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Octets that appeared in more than one record
    pub fn duplicates(&self) -> &[u8] {
        &self.duplicates
    }

    /// Iterate populated `(octet, range)` pairs in octet order
    pub fn iter(&self) -> impl Iterator<Item = (u8, PrefixRange)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(octet, slot)| slot.map(|range| (octet as u8, range)))
    }
}
