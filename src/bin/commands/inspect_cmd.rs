use anyhow::Result;
use serde_json::json;
use std::path::PathBuf;

use crate::cli_utils::{format_bytes, format_number, open_database};

pub fn cmd_inspect(database: PathBuf, in_memory: bool, json_output: bool) -> Result<()> {
    let db = open_database(&database, in_memory)?;
    let info = db.info();

    if json_output {
        let output = json!({
            "file": database.display().to_string(),
            "info": info,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Database: {}", database.display());
    println!("Size:     {} ({})", format_bytes(info.size), info.storage);
    println!();
    println!("Layout:");
    println!("  Range index offset:  {}", info.first_start_ip_offset);
    println!(
        "  Prefix table:        {}..={}",
        info.prefix_start_offset, info.prefix_end_offset
    );
    println!();
    println!("Contents:");
    println!("  Prefix records:      {}", info.prefix_records);
    println!("  Populated octets:    {} / 256", info.populated_prefixes);
    println!(
        "  Range entries:       {}",
        format_number(info.entry_count as usize)
    );
    if !info.duplicate_prefixes.is_empty() {
        println!(
            "  Duplicate prefixes:  {:?} (last record wins)",
            info.duplicate_prefixes
        );
    }

    Ok(())
}
