//! Shared database image builder for integration tests
#![allow(dead_code)]

use std::net::Ipv4Addr;

fn ip(s: &str) -> u32 {
    u32::from(s.parse::<Ipv4Addr>().unwrap())
}

/// Builds a database image: header, records, range index, prefix table
#[derive(Default, Clone)]
pub struct DbBuilder {
    ranges: Vec<(u32, u32, String)>,
}

impl DbBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn range(mut self, start: &str, end: &str, record: &str) -> Self {
        self.ranges.push((ip(start), ip(end), record.to_string()));
        self
    }

    pub fn range_u32(mut self, start: u32, end: u32, record: &str) -> Self {
        self.ranges.push((start, end, record.to_string()));
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        self.ranges.sort_by_key(|r| r.0);

        let mut data = vec![0u8; 16];
        let mut offsets = Vec::new();
        for (_, _, record) in &self.ranges {
            offsets.push(data.len() as u32);
            data.extend_from_slice(record.as_bytes());
        }

        let first_start_ip_offset = data.len() as u32;
        for ((start, end, record), offset) in self.ranges.iter().zip(&offsets) {
            data.extend_from_slice(&start.to_le_bytes());
            data.extend_from_slice(&end.to_le_bytes());
            data.extend_from_slice(&offset.to_le_bytes()[..3]);
            data.push(record.len() as u8);
        }

        let mut groups: Vec<(u8, u32, u32)> = Vec::new();
        for (i, (start, _, _)) in self.ranges.iter().enumerate() {
            let octet = (start >> 24) as u8;
            match groups.last_mut() {
                Some(g) if g.0 == octet => g.2 = i as u32,
                _ => groups.push((octet, i as u32, i as u32)),
            }
        }

        let prefix_start_offset = data.len() as u32;
        for (octet, lo, hi) in &groups {
            data.push(*octet);
            data.extend_from_slice(&lo.to_le_bytes());
            data.extend_from_slice(&hi.to_le_bytes());
        }
        let prefix_end_offset = prefix_start_offset + (groups.len() as u32 - 1) * 9;

        data[0..4].copy_from_slice(&first_start_ip_offset.to_le_bytes());
        data[8..12].copy_from_slice(&prefix_start_offset.to_le_bytes());
        data[12..16].copy_from_slice(&prefix_end_offset.to_le_bytes());
        data
    }
}

/// The minimal database: one group, one range
pub fn minimal() -> Vec<u8> {
    DbBuilder::new()
        .range("10.0.0.0", "10.0.0.255", "0|China|Beijing|Haidian|Area51|ISP-X")
        .build()
}

/// A handful of groups with gaps between ranges
pub fn world() -> Vec<u8> {
    DbBuilder::new()
        .range("1.0.0.0", "1.0.0.255", "0|Australia|Queensland|Brisbane||APNIC")
        .range("1.0.1.0", "1.0.3.255", "0|China|Fujian|Fuzhou||Telecom")
        .range("1.0.8.0", "1.0.15.255", "0|China|Guangdong|Guangzhou||Telecom")
        .range("8.8.8.0", "8.8.8.255", "0|United States|California|Mountain View||Google")
        .range("10.0.0.0", "10.0.0.255", "0|China|Beijing|Haidian|Area51|ISP-X")
        .range("10.0.1.0", "10.0.1.255", "0|China|Beijing|Chaoyang||Unicom")
        .range("114.114.114.0", "114.114.114.255", "0|China|Jiangsu|Nanjing||114DNS")
        .range("223.255.255.0", "223.255.255.255", "0|Australia|Victoria|Melbourne||Telstra")
        .build()
}
