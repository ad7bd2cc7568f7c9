use crate::catalog::{Building, Usage};
use clap::{Parser, ValueEnum};

/// Rank university rooms by how long they stay free, starting now.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Building area to search; repeat for several
    #[arg(short = 'b', long = "building", value_enum, required = true)]
    pub buildings: Vec<Building>,

    /// Room usage type to search; repeat for several
    #[arg(short = 'u', long = "usage", value_enum, required = true)]
    pub usages: Vec<Usage>,

    /// Number of concurrent room lookups (defaults to the configured value, 4)
    #[arg(short = 't', long, value_parser = clap::value_parser!(u16).range(1..))]
    pub threads: Option<u16>,

    /// Free-text room search; `*` and `%` act as wildcards
    #[arg(short = 's', long, default_value = "")]
    pub search: String,

    /// Disable coloured output
    #[arg(long)]
    pub no_color: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = TracingFormat::Pretty)]
    pub tracing: TracingFormat,
}

/// Log output formats
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TracingFormat {
    /// Human-readable output
    Pretty,
    /// Structured JSON output
    Json,
}
