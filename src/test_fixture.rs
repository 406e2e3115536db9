//! Synthetic database images for unit tests

use crate::address::{parse_ipv4, prefix_of};
use crate::format::{Header, PrefixRecord, HEADER_SIZE, INDEX_ENTRY_SIZE, PREFIX_RECORD_SIZE};
use zerocopy::byteorder::little_endian::U32;
use zerocopy::IntoBytes;

/// Lays out header, records, range index and prefix table in that order
#[derive(Default)]
pub(crate) struct FixtureBuilder {
    ranges: Vec<(u32, u32, Vec<u8>)>,
    extra_prefixes: Vec<(u8, u32, u32)>,
}

impl FixtureBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn range(mut self, start: &str, end: &str, record: &str) -> Self {
        self.ranges.push((
            parse_ipv4(start).unwrap(),
            parse_ipv4(end).unwrap(),
            record.as_bytes().to_vec(),
        ));
        self
    }

    /// Append a raw prefix record after the generated ones
    pub(crate) fn prefix_record(mut self, prefix: u8, start_index: u32, end_index: u32) -> Self {
        self.extra_prefixes.push((prefix, start_index, end_index));
        self
    }

    pub(crate) fn build(mut self) -> Vec<u8> {
        self.ranges.sort_by_key(|(start, _, _)| *start);

        let mut data = vec![0u8; HEADER_SIZE];

        let mut record_offsets = Vec::with_capacity(self.ranges.len());
        for (_, _, record) in &self.ranges {
            record_offsets.push(data.len() as u32);
            data.extend_from_slice(record);
        }

        let first_start_ip_offset = data.len() as u32;
        for ((start, end, record), offset) in self.ranges.iter().zip(&record_offsets) {
            data.extend_from_slice(&start.to_le_bytes());
            data.extend_from_slice(&end.to_le_bytes());
            data.extend_from_slice(&offset.to_le_bytes()[..3]);
            data.push(record.len() as u8);
        }

        let mut prefixes: Vec<(u8, u32, u32)> = Vec::new();
        for (i, (start, _, _)) in self.ranges.iter().enumerate() {
            let octet = prefix_of(*start);
            match prefixes.last_mut() {
                Some(last) if last.0 == octet => last.2 = i as u32,
                _ => prefixes.push((octet, i as u32, i as u32)),
            }
        }
        prefixes.extend(self.extra_prefixes);

        let prefix_start_offset = data.len() as u32;
        for (prefix, start_index, end_index) in &prefixes {
            let record = PrefixRecord {
                prefix: *prefix,
                start_index: U32::new(*start_index),
                end_index: U32::new(*end_index),
            };
            data.extend_from_slice(record.as_bytes());
        }
        let prefix_end_offset =
            prefix_start_offset + (prefixes.len().saturating_sub(1) * PREFIX_RECORD_SIZE) as u32;

        let header = Header {
            first_start_ip_offset: U32::new(first_start_ip_offset),
            reserved: U32::new(0),
            prefix_start_offset: U32::new(prefix_start_offset),
            prefix_end_offset: U32::new(prefix_end_offset),
        };
        data[..HEADER_SIZE].copy_from_slice(header.as_bytes());

        debug_assert_eq!(
            prefix_start_offset as usize - first_start_ip_offset as usize,
            self.ranges.len() * INDEX_ENTRY_SIZE
        );
        data
    }
}

/// Small database used across unit tests
pub(crate) fn sample() -> Vec<u8> {
    FixtureBuilder::new()
        .range("1.0.0.0", "1.0.0.255", "0|Australia|Queensland|Brisbane||APNIC")
        .range("1.0.1.0", "1.0.3.255", "0|China|Fujian|Fuzhou||Telecom")
        .range("1.0.8.0", "1.0.15.255", "0|China|Guangdong|Guangzhou||Telecom")
        .range("10.0.0.0", "10.0.0.255", "0|China|Beijing|Haidian|Area51|ISP-X")
        .range("223.255.255.0", "223.255.255.255", "0|Australia|Victoria|Melbourne||Telstra")
        .build()
}
