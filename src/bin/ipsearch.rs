mod cli_utils;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::{cmd_batch, cmd_inspect, cmd_query, cmd_validate};

#[derive(Parser)]
#[command(name = "ipsearch")]
#[command(
    about = "IPv4 geolocation lookups against a prefix-indexed range database",
    long_about = "ipsearch - Fast IPv4 geolocation lookups\n\n\
    Resolves IPv4 addresses to country, province, city, area and ISP using a\n\
    prefix-indexed range database. Files are memory-mapped by default;\n\
    .gz databases are decompressed into memory.\n\n\
    Examples:\n\
      ipsearch query ipdata.dat 1.0.1.10\n\
      ipsearch batch ipdata.dat addresses.txt --format csv -j 8\n\
      ipsearch inspect ipdata.dat --json\n\
      ipsearch validate ipdata.dat"
)]
#[command(version)]
struct Cli {
    /// Read the database into memory instead of memory-mapping it
    #[arg(long, global = true)]
    in_memory: bool,

    /// Log loader and query details to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up one or more IPv4 addresses
    Query {
        /// Path to the database file
        #[arg(value_name = "DATABASE")]
        database: PathBuf,

        /// Dotted-quad addresses to look up
        #[arg(value_name = "IP", required = true)]
        ips: Vec<String>,

        /// Output results as JSON
        #[arg(short, long)]
        json: bool,

        /// Quiet mode - no output, only exit code (0 = all found, 1 = otherwise)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Look up addresses read from files or stdin, one per line
    Batch {
        /// Path to the database file
        #[arg(value_name = "DATABASE")]
        database: PathBuf,

        /// Address lists (one per line, .gz supported), or "-" for stdin
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// Output format: json (default, NDJSON), csv, or text
        #[arg(long, default_value = "json")]
        format: String,

        /// Number of worker threads (default: all cores, "auto" or "0" for all cores)
        #[arg(short = 'j', long)]
        threads: Option<String>,

        /// Show lookup statistics on stderr
        #[arg(short, long)]
        stats: bool,
    },

    /// Inspect database layout
    Inspect {
        /// Path to the database file
        #[arg(value_name = "DATABASE")]
        database: PathBuf,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Validate every entry and record of a database file
    Validate {
        /// Path to the database file
        #[arg(value_name = "DATABASE")]
        database: PathBuf,

        /// Output results as JSON
        #[arg(short, long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "ipsearch=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Query {
            database,
            ips,
            json,
            quiet,
        } => cmd_query(database, cli.in_memory, ips, json, quiet),
        Commands::Batch {
            database,
            inputs,
            format,
            threads,
            stats,
        } => cmd_batch(database, cli.in_memory, inputs, format, threads, stats),
        Commands::Inspect { database, json } => cmd_inspect(database, cli.in_memory, json),
        Commands::Validate { database, json } => cmd_validate(database, cli.in_memory, json),
    }
}
