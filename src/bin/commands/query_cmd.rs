use anyhow::Result;
use std::path::PathBuf;

use crate::cli_utils::{format_text, open_database, LookupRecord};

pub fn cmd_query(
    database: PathBuf,
    in_memory: bool,
    ips: Vec<String>,
    json_output: bool,
    quiet: bool,
) -> Result<()> {
    let db = open_database(&database, in_memory)?;

    let results: Vec<_> = ips.iter().map(|ip| db.query(ip.trim())).collect();
    let all_found = results.iter().all(|r| r.is_ok());

    if quiet {
        // Quiet mode: no output, just exit code
        std::process::exit(if all_found { 0 } else { 1 });
    }

    if json_output {
        // Always an array, even for a single address
        let records: Vec<LookupRecord> = ips
            .iter()
            .zip(&results)
            .map(|(ip, result)| LookupRecord::new(ip.trim(), result))
            .collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for (ip, result) in ips.iter().zip(&results) {
            println!("{}", format_text(ip.trim(), result));
        }
    }

    std::process::exit(if all_found { 0 } else { 1 });
}
