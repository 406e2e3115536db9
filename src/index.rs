//! Range index view and lower-bound search
//!
//! Entries are decoded on read straight from the database buffer; nothing
//! is materialized at load time. Within one prefix group the entries are
//! trusted to be sorted and non-overlapping, which is what makes the
//! search below correct.

use crate::endian::read_u32_le;
use crate::error::QueryError;
use crate::format::{IndexEntry, RawIndexEntry, END_IP_FIELD_OFFSET, INDEX_ENTRY_SIZE};
use zerocopy::FromBytes;

/// Borrowed view over the range index
#[derive(Debug, Clone, Copy)]
pub struct RangeIndex<'a> {
    data: &'a [u8],
    first_offset: u32,
}

impl<'a> RangeIndex<'a> {
    /// Create a view whose entry 0 starts at `first_offset`
    pub fn new(data: &'a [u8], first_offset: u32) -> Self {
        Self { data, first_offset }
    }

    /// Byte offset of entry `index`, or `None` on overflow
    #[inline]
    fn entry_offset(&self, index: u32) -> Option<usize> {
        (index as usize)
            .checked_mul(INDEX_ENTRY_SIZE)?
            .checked_add(self.first_offset as usize)
    }

    /// Number of whole entries between entry 0 and the end of the buffer
    pub fn capacity(&self) -> usize {
        self.data
            .len()
            .saturating_sub(self.first_offset as usize)
            / INDEX_ENTRY_SIZE
    }

    /// Read only the `end_ip` field of entry `index`
    #[inline]
    pub fn end_ip(&self, index: u32) -> Result<u32, QueryError> {
        self.entry_offset(index)
            .and_then(|offset| offset.checked_add(END_IP_FIELD_OFFSET))
            .and_then(|offset| read_u32_le(self.data, offset))
            .ok_or_else(|| out_of_bounds(index))
    }

    /// Decode the full entry at `index`
    pub fn entry(&self, index: u32) -> Result<IndexEntry, QueryError> {
        let offset = self.entry_offset(index).ok_or_else(|| out_of_bounds(index))?;
        let bytes = self.data.get(offset..).ok_or_else(|| out_of_bounds(index))?;
        let (raw, _) =
            RawIndexEntry::read_from_prefix(bytes).map_err(|_| out_of_bounds(index))?;
        Ok(raw.decode())
    }

    /// Find the leftmost entry in `[low, high]` whose `end_ip >= target`
    ///
    /// When `low == high` the single candidate is returned without being
    /// read. If no probe satisfies the condition the initial `low` is
    /// returned; callers must still check containment on the result.
    pub fn search(&self, mut low: u32, mut high: u32, target: u32) -> Result<u32, QueryError> {
        if low == high {
            return Ok(low);
        }

        let mut found = low;
        while low <= high {
            let mid = low + (high - low) / 2;
            if self.end_ip(mid)? >= target {
                found = mid;
                // Cannot go lower than entry 0
                if mid == 0 {
                    break;
                }
                high = mid - 1;
            } else {
                match mid.checked_add(1) {
                    Some(next) => low = next,
                    None => break,
                }
            }
        }
        Ok(found)
    }
}

fn out_of_bounds(index: u32) -> QueryError {
    QueryError::CorruptRecord(format!("range index entry {} is outside the buffer", index))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Lay out entries back to back starting at offset 4
    fn build(ranges: &[(u32, u32)]) -> Vec<u8> {
        let mut data = vec![0xAA; 4];
        for &(start, end) in ranges {
            data.extend_from_slice(&start.to_le_bytes());
            data.extend_from_slice(&end.to_le_bytes());
            data.extend_from_slice(&[0, 0, 0, 0]);
        }
        data
    }

    #[test]
    fn test_entry_decode() {
        let data = build(&[(1, 5), (6, 9)]);
        let index = RangeIndex::new(&data, 4);

        assert_eq!(index.capacity(), 2);
        let entry = index.entry(1).unwrap();
        assert_eq!((entry.start_ip, entry.end_ip), (6, 9));
        assert_eq!(index.end_ip(0).unwrap(), 5);
    }

    #[test]
    fn test_entry_out_of_bounds() {
        let data = build(&[(1, 5)]);
        let index = RangeIndex::new(&data, 4);

        assert!(matches!(index.entry(1), Err(QueryError::CorruptRecord(_))));
        assert!(matches!(index.end_ip(1), Err(QueryError::CorruptRecord(_))));
        assert!(matches!(
            index.entry(u32::MAX),
            Err(QueryError::CorruptRecord(_))
        ));
    }

    #[test]
    fn test_search_finds_containing_entry() {
        let ranges = [(0, 9), (10, 19), (20, 29), (30, 39), (40, 49)];
        let data = build(&ranges);
        let index = RangeIndex::new(&data, 4);

        for (i, &(start, end)) in ranges.iter().enumerate() {
            for target in [start, (start + end) / 2, end] {
                assert_eq!(index.search(0, 4, target).unwrap(), i as u32);
            }
        }
    }

    #[test]
    fn test_search_gap_returns_non_containing() {
        let data = build(&[(0, 9), (20, 29)]);
        let index = RangeIndex::new(&data, 4);

        let found = index.search(0, 1, 15).unwrap();
        assert_eq!(found, 1);
        assert!(!index.entry(found).unwrap().contains(15));
    }

    #[test]
    fn test_search_past_last_returns_initial_low() {
        let data = build(&[(0, 9), (10, 19), (20, 29)]);
        let index = RangeIndex::new(&data, 4);

        assert_eq!(index.search(1, 2, 100).unwrap(), 1);
    }

    #[test]
    fn test_search_underflow_guard() {
        let data = build(&[(5, 9), (10, 19)]);
        let index = RangeIndex::new(&data, 4);

        // Target below everything walks left to entry 0 and stops there
        assert_eq!(index.search(0, 1, 0).unwrap(), 0);
    }

    #[test]
    fn test_search_single_candidate_skips_read() {
        // Entry 7 does not exist, but low == high never reads it
        let data = build(&[(0, 9)]);
        let index = RangeIndex::new(&data, 4);

        assert_eq!(index.search(7, 7, 3).unwrap(), 7);
    }

    #[test]
    fn test_search_corrupt_bounds() {
        let data = build(&[(0, 9)]);
        let index = RangeIndex::new(&data, 4);

        assert!(matches!(
            index.search(0, 50, 5),
            Err(QueryError::CorruptRecord(_))
        ));
    }
}
