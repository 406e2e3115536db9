use anyhow::Result;
use ipsearch::validation::validate;
use serde_json::json;
use std::path::PathBuf;
use std::time::Instant;

use crate::cli_utils::{format_bytes, format_number, open_database};

pub fn cmd_validate(database: PathBuf, in_memory: bool, json_output: bool) -> Result<()> {
    let db = open_database(&database, in_memory)?;

    let start = Instant::now();
    let report = validate(&db);
    let duration = start.elapsed();

    if json_output {
        let output = json!({
            "database": database.display().to_string(),
            "is_valid": report.is_valid(),
            "duration_ms": duration.as_millis(),
            "report": report,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Validating: {}", database.display());
        println!();
        println!("Statistics:");
        println!("  File size:         {}", format_bytes(report.stats.file_size));
        println!("  Prefix records:    {}", report.stats.prefix_records);
        println!("  Populated octets:  {}", report.stats.populated_prefixes);
        println!(
            "  Entries checked:   {}",
            format_number(report.stats.entries_checked as usize)
        );
        println!(
            "  Records checked:   {}",
            format_number(report.stats.records_checked as usize)
        );
        println!("  Duration:          {:.2?}", duration);

        if !report.warnings.is_empty() {
            println!();
            println!("Warnings ({}):", report.warnings.len());
            for warning in &report.warnings {
                println!("  ⚠ {}", warning);
            }
        }

        println!();
        if report.is_valid() {
            println!("✓ Database is valid");
        } else {
            println!(
                "✗ Database has {} error(s):",
                report.errors.len() + report.suppressed_errors
            );
            for error in &report.errors {
                println!("  - {}", error);
            }
            if report.suppressed_errors > 0 {
                println!("  ... and {} more", report.suppressed_errors);
            }
        }
    }

    if !report.is_valid() {
        std::process::exit(1);
    }
    Ok(())
}
