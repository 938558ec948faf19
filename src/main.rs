//! picobench - chip-identification and performance report engine
//!
//! Reads a raw SPI NOR flash benchmark results log and a vendor datasheet
//! catalogue, and writes a pivoted performance/identification report.

mod cli;

use clap::Parser;
use cli::Cli;
use picobench_core::{generate_report, DeviceContext};
use picobench_core::catalogue::normalise_jedec;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Cursor, Write};
use std::path::Path;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.verbose {
        0 => {}
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let results = open_reader(&cli.results);
    let catalogue = open_reader(&cli.catalogue);

    let context = DeviceContext {
        jedec_norm_observed: cli.jedec.as_deref().and_then(normalise_jedec),
        sck_mhz: cli.sck_mhz,
        capacity_bytes: cli.capacity_bytes,
    };

    match &cli.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            generate_report(results, catalogue, &context, &mut writer)?;
            writer.flush()?;
            log::info!("report written to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            generate_report(results, catalogue, &context, &mut stdout)?;
        }
    }

    Ok(())
}

/// Open `path` for buffered reading. A missing/unreadable file is not
/// fatal (§7 input-absent): it degrades to an empty reader, which the
/// engine handles the same way as a present-but-empty stream, so a report
/// is still produced.
fn open_reader(path: &Path) -> Box<dyn BufRead> {
    match File::open(path) {
        Ok(file) => Box::new(BufReader::new(file)),
        Err(e) => {
            log::warn!("could not open {}: {e}, treating as empty", path.display());
            Box::new(Cursor::new(Vec::new()))
        }
    }
}
