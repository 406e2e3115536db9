use anyhow::{Context, Result};
use ipsearch::file_reader;
use ipsearch::QueryError;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use crate::cli_utils::{
    format_number, format_qps, format_text, open_database, parse_threads, LookupRecord,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Csv,
    Text,
}

impl OutputFormat {
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "text" => Ok(Self::Text),
            _ => anyhow::bail!("Invalid format '{}', expected: json, csv, or text", s),
        }
    }
}

#[derive(Default)]
struct BatchStats {
    lines_read: usize,
    found: usize,
    not_found: usize,
    invalid: usize,
    corrupt: usize,
}

pub fn cmd_batch(
    database: PathBuf,
    in_memory: bool,
    inputs: Vec<PathBuf>,
    format: String,
    threads: Option<String>,
    show_stats: bool,
) -> Result<()> {
    let output_format = OutputFormat::from_str(&format)?;
    let num_threads = parse_threads(threads.as_deref())?;
    let db = open_database(&database, in_memory)?;

    let mut stats = BatchStats::default();
    let mut ips = Vec::new();
    for input in &inputs {
        let reader = file_reader::open_lines(input)
            .with_context(|| format!("Failed to open input: {}", input.display()))?;
        for line in reader.lines() {
            let line =
                line.with_context(|| format!("Failed to read input: {}", input.display()))?;
            stats.lines_read += 1;
            let ip = line.trim();
            // Skip blank lines and comments
            if ip.is_empty() || ip.starts_with('#') {
                continue;
            }
            ips.push(ip.to_string());
        }
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .context("Failed to start worker threads")?;

    let start = Instant::now();
    let results = pool.install(|| db.query_batch(&ips[..]));
    let elapsed = start.elapsed();

    for result in &results {
        match result {
            Ok(_) => stats.found += 1,
            Err(QueryError::NotFound) => stats.not_found += 1,
            Err(QueryError::InvalidAddress(_)) => stats.invalid += 1,
            Err(QueryError::CorruptRecord(_)) => stats.corrupt += 1,
        }
    }

    let stdout = io::stdout();
    let mut writer = io::BufWriter::new(stdout.lock());
    match output_format {
        OutputFormat::Json => {
            for (ip, result) in ips.iter().zip(&results) {
                serde_json::to_writer(&mut writer, &LookupRecord::new(ip, result))?;
                writeln!(writer)?;
            }
        }
        OutputFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(&mut writer);
            csv_writer.write_record(["ip", "country", "province", "city", "area", "isp", "error"])?;
            for (ip, result) in ips.iter().zip(&results) {
                match result {
                    Ok(loc) => csv_writer.write_record([
                        ip.as_str(),
                        loc.country.as_str(),
                        loc.province.as_str(),
                        loc.city.as_str(),
                        loc.area.as_str(),
                        loc.isp.as_str(),
                        "",
                    ])?,
                    Err(QueryError::NotFound) => {
                        csv_writer.write_record([ip.as_str(), "", "", "", "", "", ""])?
                    }
                    Err(e) => {
                        let error = e.to_string();
                        csv_writer.write_record([ip.as_str(), "", "", "", "", "", error.as_str()])?
                    }
                }
            }
            csv_writer.flush()?;
        }
        OutputFormat::Text => {
            for (ip, result) in ips.iter().zip(&results) {
                writeln!(writer, "{}", format_text(ip, result))?;
            }
        }
    }
    writer.flush()?;

    if show_stats {
        let secs = elapsed.as_secs_f64();
        let qps = if secs > 0.0 {
            results.len() as f64 / secs
        } else {
            0.0
        };
        eprintln!("[INFO] Lines read:   {}", format_number(stats.lines_read));
        eprintln!("[INFO] Lookups:      {}", format_number(results.len()));
        eprintln!("[INFO] Found:        {}", format_number(stats.found));
        eprintln!("[INFO] Not found:    {}", format_number(stats.not_found));
        eprintln!("[INFO] Invalid:      {}", format_number(stats.invalid));
        if stats.corrupt > 0 {
            eprintln!("[INFO] Corrupt:      {}", format_number(stats.corrupt));
        }
        eprintln!(
            "[INFO] Threads:      {} ({:.2?}, {} queries/s)",
            num_threads,
            elapsed,
            format_qps(qps)
        );
    }

    Ok(())
}
