//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;

/// Generate a chip-identification and performance report from SPI NOR
/// flash benchmark samples.
#[derive(Parser)]
#[command(name = "picobench")]
#[command(author, version, about = "SPI NOR flash benchmark report engine", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the raw benchmark results log (RESULTS.CSV-shaped)
    #[arg(short, long)]
    pub results: PathBuf,

    /// Path to the vendor datasheet catalogue (datasheet.csv-shaped)
    #[arg(short, long)]
    pub catalogue: PathBuf,

    /// Path to write the generated report.csv (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Observed JEDEC id of the device under test, e.g. "BF2641"
    #[arg(long)]
    pub jedec: Option<String>,

    /// Observed SPI clock in MHz (0 or omitted means unknown, disabling
    /// read-timing matching)
    #[arg(long, default_value_t = 0.0)]
    pub sck_mhz: f64,

    /// Observed device capacity in bytes (0 or omitted means unknown,
    /// disabling WHOLE-size classification)
    #[arg(long, default_value_t = 0)]
    pub capacity_bytes: u64,
}
