use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ipsearch::Database;
use std::hint::black_box;
use std::net::Ipv4Addr;

/// Build an image with `per_octet` /24-sized ranges under every first octet
fn generate_database(per_octet: u32) -> Vec<u8> {
    let records = [
        "0|China|Beijing|Haidian||Unicom",
        "0|China|Fujian|Fuzhou||Telecom",
        "0|Australia|Victoria|Melbourne||Telstra",
        "0|United States|California|Mountain View||Google",
    ];

    let mut data = vec![0u8; 16];
    let mut record_offsets = Vec::new();
    for record in &records {
        record_offsets.push(data.len() as u32);
        data.extend_from_slice(record.as_bytes());
    }

    let first_start_ip_offset = data.len() as u32;
    let mut groups = Vec::new();
    let mut index = 0u32;
    for octet in 0..=255u32 {
        let group_start = index;
        for i in 0..per_octet {
            // Every other /24 is a gap
            let start = (octet << 24) | ((i * 2) << 8);
            let end = start | 0xFF;
            let which = (i as usize) % records.len();
            data.extend_from_slice(&start.to_le_bytes());
            data.extend_from_slice(&end.to_le_bytes());
            data.extend_from_slice(&record_offsets[which].to_le_bytes()[..3]);
            data.push(records[which].len() as u8);
            index += 1;
        }
        groups.push((octet as u8, group_start, index - 1));
    }

    let prefix_start_offset = data.len() as u32;
    for (octet, lo, hi) in &groups {
        data.push(*octet);
        data.extend_from_slice(&lo.to_le_bytes());
        data.extend_from_slice(&hi.to_le_bytes());
    }
    let prefix_end_offset = data.len() as u32 - 9;

    data[0..4].copy_from_slice(&first_start_ip_offset.to_le_bytes());
    data[8..12].copy_from_slice(&prefix_start_offset.to_le_bytes());
    data[12..16].copy_from_slice(&prefix_end_offset.to_le_bytes());
    data
}

/// Deterministic spread of addresses, roughly half of them in gaps
fn generate_queries(count: u32) -> Vec<String> {
    (0..count)
        .map(|i| Ipv4Addr::from(i.wrapping_mul(2_654_435_761)).to_string())
        .collect()
}

fn bench_load(c: &mut Criterion) {
    let data = generate_database(1000);

    let mut group = c.benchmark_group("load");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("from_bytes", |b| {
        b.iter(|| black_box(Database::from_bytes(data.clone()).unwrap()));
    });
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let queries = generate_queries(1000);

    let mut group = c.benchmark_group("query");
    group.throughput(Throughput::Elements(queries.len() as u64));

    for per_octet in [10u32, 1000, 10000] {
        let db = Database::from_bytes(generate_database(per_octet)).unwrap();
        group.bench_with_input(BenchmarkId::new("string", per_octet), &queries, |b, qs| {
            b.iter(|| {
                for q in qs {
                    let _ = black_box(db.query(q));
                }
            });
        });
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let db = Database::from_bytes(generate_database(1000)).unwrap();

    let mut group = c.benchmark_group("batch_vs_single");
    for count in [100u32, 10_000] {
        let queries = generate_queries(count);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("single", count), &queries, |b, qs| {
            b.iter(|| {
                for q in qs {
                    let _ = black_box(db.query(q));
                }
            });
        });
        group.bench_with_input(BenchmarkId::new("batch", count), &queries, |b, qs| {
            b.iter(|| black_box(db.query_batch(&qs[..])));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_load, bench_query, bench_batch);
criterion_main!(benches);
