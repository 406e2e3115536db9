use anyhow::{Context, Result};
use ipsearch::{Database, Location, QueryError};
use serde::Serialize;
use std::path::Path;

/// Open a database for a subcommand, honoring `--in-memory`
pub fn open_database(path: &Path, in_memory: bool) -> Result<Database> {
    let opener = Database::from(path);
    let opener = if in_memory { opener.in_memory() } else { opener };
    opener
        .open()
        .with_context(|| format!("Failed to load database: {}", path.display()))
}

/// One lookup as emitted in JSON and CSV output
#[derive(Debug, Serialize)]
pub struct LookupRecord<'a> {
    pub ip: &'a str,
    pub found: bool,
    #[serde(flatten)]
    pub location: Option<&'a Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> LookupRecord<'a> {
    pub fn new(ip: &'a str, result: &'a Result<Location, QueryError>) -> Self {
        match result {
            Ok(location) => Self {
                ip,
                found: true,
                location: Some(location),
                error: None,
            },
            Err(QueryError::NotFound) => Self {
                ip,
                found: false,
                location: None,
                error: None,
            },
            Err(e) => Self {
                ip,
                found: false,
                location: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Tab-separated human-readable line for one lookup
pub fn format_text(ip: &str, result: &Result<Location, QueryError>) -> String {
    match result {
        Ok(location) => format!("{}\t{}", ip, location),
        Err(QueryError::NotFound) => format!("{}\tnot found", ip),
        Err(e) => format!("{}\terror: {}", ip, e),
    }
}

/// Resolve a `--threads` argument
pub fn parse_threads(threads: Option<&str>) -> Result<usize> {
    match threads {
        None | Some("auto") | Some("0") => Ok(std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)),
        Some(s) => s.parse::<usize>().with_context(|| {
            format!("Invalid thread count '{}', expected a number or 'auto'", s)
        }),
    }
}

pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

pub fn format_bytes(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

pub fn format_qps(qps: f64) -> String {
    if qps >= 1_000_000.0 {
        format!("{:.2}M", qps / 1_000_000.0)
    } else if qps >= 1_000.0 {
        format!("{:.2}K", qps / 1_000.0)
    } else {
        format!("{:.2}", qps)
    }
}
