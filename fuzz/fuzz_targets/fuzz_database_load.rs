#![no_main]
use libfuzzer_sys::fuzz_target;

const PROBES: [&str; 4] = ["0.0.0.0", "1.0.1.10", "10.0.0.1", "255.255.255.255"];

fuzz_target!(|data: &[u8]| {
    // Garbage must be rejected or answered with an error, never panic
    if let Ok(db) = ipsearch::Database::from_bytes(data.to_vec()) {
        for ip in PROBES {
            let _ = db.query(ip);
        }
        let _ = ipsearch::validate(&db);
    }
});
