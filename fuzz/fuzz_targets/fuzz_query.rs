#![no_main]
use libfuzzer_sys::fuzz_target;
use std::net::Ipv4Addr;
use std::sync::OnceLock;

/// Two groups, three ranges
fn image() -> Vec<u8> {
    let ranges: [(u32, u32, &str); 3] = [
        (0x0100_0000, 0x0100_00FF, "0|Australia|Queensland|Brisbane||APNIC"),
        (0x0100_0100, 0x0100_03FF, "0|China|Fujian|Fuzhou||Telecom"),
        (0x0A00_0000, 0x0A00_00FF, "0|China|Beijing|Haidian|Area51|ISP-X"),
    ];

    let mut data = vec![0u8; 16];
    let mut offsets = Vec::new();
    for (_, _, record) in &ranges {
        offsets.push(data.len() as u32);
        data.extend_from_slice(record.as_bytes());
    }
    let first = data.len() as u32;
    for ((start, end, record), offset) in ranges.iter().zip(&offsets) {
        data.extend_from_slice(&start.to_le_bytes());
        data.extend_from_slice(&end.to_le_bytes());
        data.extend_from_slice(&offset.to_le_bytes()[..3]);
        data.push(record.len() as u8);
    }
    let prefix_start = data.len() as u32;
    for (octet, lo, hi) in [(1u8, 0u32, 1u32), (10, 2, 2)] {
        data.push(octet);
        data.extend_from_slice(&lo.to_le_bytes());
        data.extend_from_slice(&hi.to_le_bytes());
    }
    data[0..4].copy_from_slice(&first.to_le_bytes());
    data[8..12].copy_from_slice(&prefix_start.to_le_bytes());
    data[12..16].copy_from_slice(&(prefix_start + 9).to_le_bytes());
    data
}

static DB: OnceLock<ipsearch::Database> = OnceLock::new();

fuzz_target!(|data: &[u8]| {
    let db = DB.get_or_init(|| ipsearch::Database::from_bytes(image()).unwrap());

    if let Ok(s) = std::str::from_utf8(data) {
        // Signs, whitespace, long octets, trailing dots
        let result = db.query(s);

        // Anything std accepts must resolve the same way
        if let Ok(ip) = s.parse::<Ipv4Addr>() {
            assert_eq!(result, db.lookup_ip(ip));
        }
    }
});
