//! Report writer (§4.G): the pivoted CSV with fixed row titles and a
//! trailing conclusion block.

use std::collections::HashMap;
use std::io::{self, Write};

use crate::aggregate::Aggregates;
use crate::matcher::MatchCell;
use crate::model::{DeviceContext, Operation, SizeGroup};
use crate::scorer::FinalGuess;

/// Identity fields resolved from the catalogue row matching the observed
/// JEDEC (if any); `None` fields render as `NA`.
#[derive(Debug, Clone, Default)]
pub struct Identity {
    /// Chip model from the matched catalogue row.
    pub chip_model: Option<String>,
    /// Chip family from the matched catalogue row.
    pub chip_family: Option<String>,
    /// Company/manufacturer from the matched catalogue row.
    pub company: Option<String>,
    /// Capacity in megabits from the matched catalogue row.
    pub capacity_mbit: Option<u64>,
}

/// Every (operation, size group) [`MatchCell`] produced by the datasheet
/// matcher (§4.D).
#[derive(Debug, Clone, Default)]
pub struct MatchTable {
    cells: HashMap<(Operation, SizeGroup), MatchCell>,
}

impl MatchTable {
    /// Record the match result for one (operation, size group) cell.
    pub fn insert(&mut self, op: Operation, group: SizeGroup, cell: MatchCell) {
        self.cells.insert((op, group), cell);
    }

    /// The match result for one (operation, size group) cell, or the
    /// all-absent default if none was recorded.
    pub fn get(&self, op: Operation, group: SizeGroup) -> MatchCell {
        self.cells.get(&(op, group)).cloned().unwrap_or_default()
    }
}

/// Per-operation candidate-list intersections from §4.E.
#[derive(Debug, Clone, Default)]
pub struct Conclusions {
    /// Surviving JEDEC ids for the read operation.
    pub read: Vec<String>,
    /// Surviving JEDEC ids for the program/write operation.
    pub write: Vec<String>,
    /// Surviving JEDEC ids for the erase operation.
    pub erase: Vec<String>,
}

fn fmt_num3(v: Option<f64>) -> String {
    match v {
        Some(x) => format!("{x:.3}"),
        None => "NA".to_string(),
    }
}

fn fmt_stddev(v: Option<f64>) -> String {
    match v {
        None => "NA".to_string(),
        Some(x) => {
            let magnitude = x.abs();
            if magnitude > 0.0 && magnitude < 1e-3 {
                format!("{x:.6}")
            } else {
                format!("{x:.3}")
            }
        }
    }
}

fn fmt_int(v: Option<u64>) -> String {
    match v {
        Some(x) => x.to_string(),
        None => "NA".to_string(),
    }
}

fn fmt_count(n: usize) -> String {
    n.to_string()
}

fn fmt_sck(sck_mhz: f64) -> String {
    if sck_mhz > 0.0 {
        format!("{sck_mhz:.2}")
    } else {
        "NA".to_string()
    }
}

fn fmt_capacity_bytes(capacity_bytes: u64) -> String {
    if capacity_bytes > 0 {
        capacity_bytes.to_string()
    } else {
        "NA".to_string()
    }
}

fn fmt_jedec(jedec: Option<&str>) -> String {
    jedec.map(str::to_string).unwrap_or_else(|| "NA".to_string())
}

fn fmt_text(v: Option<&str>) -> String {
    v.map(str::to_string).unwrap_or_else(|| "NA".to_string())
}

fn fmt_list(v: &[String]) -> String {
    if v.is_empty() {
        "NA".to_string()
    } else {
        v.join("/")
    }
}

fn row(writer: &mut impl Write, title: &str, read: &str, write: &str, erase: &str) -> io::Result<()> {
    writeln!(writer, "{title},{read},{write},{erase}")
}

/// Write the complete report to `writer`.
///
/// `context` supplies the device-observed fields (`detected_jedec`,
/// `spi_sck_MHz`, `capacity_bytes`); `identity` supplies the
/// catalogue-derived fields (`chip_model`, `chip_family`, `company`,
/// `capacity_mbit`) for the row matching the observed JEDEC, if any.
pub fn write_report(
    writer: &mut impl Write,
    context: &DeviceContext,
    identity: &Identity,
    aggregates: &Aggregates,
    matches: &MatchTable,
    conclusions: &Conclusions,
    final_guess: &FinalGuess,
) -> io::Result<()> {
    writeln!(
        writer,
        "title,{},{},{}",
        Operation::Read.column(),
        Operation::Program.column(),
        Operation::Erase.column()
    )?;

    let detected_jedec = fmt_jedec(context.jedec_norm_observed.as_deref());
    row(writer, "detected_jedec", &detected_jedec, &detected_jedec, &detected_jedec)?;
    let chip_model = fmt_text(identity.chip_model.as_deref());
    row(writer, "chip_model", &chip_model, &chip_model, &chip_model)?;
    let chip_family = fmt_text(identity.chip_family.as_deref());
    row(writer, "chip_family", &chip_family, &chip_family, &chip_family)?;
    let company = fmt_text(identity.company.as_deref());
    row(writer, "company", &company, &company, &company)?;
    let capacity_mbit = fmt_int(identity.capacity_mbit);
    row(writer, "capacity_mbit", &capacity_mbit, &capacity_mbit, &capacity_mbit)?;
    let capacity_bytes = fmt_capacity_bytes(context.capacity_bytes);
    row(writer, "capacity_bytes", &capacity_bytes, &capacity_bytes, &capacity_bytes)?;

    let sck = fmt_sck(context.sck_mhz);
    row(writer, "spi_sck_MHz", &sck, &sck, &sck)?;
    row(writer, "units_summary", "ms", "ms", "ms")?;

    for group in SizeGroup::ALL {
        let read_stats = aggregates.elapsed_ms(Operation::Read, group);
        let write_stats = aggregates.elapsed_ms(Operation::Program, group);
        let erase_stats = aggregates.elapsed_ms(Operation::Erase, group);
        let label = group.label();

        row(
            writer,
            &format!("n_{label}"),
            &fmt_count(read_stats.n),
            &fmt_count(write_stats.n),
            &fmt_count(erase_stats.n),
        )?;
        row(
            writer,
            &format!("avg_{label}_ms"),
            &fmt_num3(read_stats.mean),
            &fmt_num3(write_stats.mean),
            &fmt_num3(erase_stats.mean),
        )?;
        row(
            writer,
            &format!("p25_{label}_ms"),
            &fmt_num3(read_stats.p25),
            &fmt_num3(write_stats.p25),
            &fmt_num3(erase_stats.p25),
        )?;
        row(
            writer,
            &format!("p50_{label}_ms"),
            &fmt_num3(read_stats.p50),
            &fmt_num3(write_stats.p50),
            &fmt_num3(erase_stats.p50),
        )?;
        row(
            writer,
            &format!("p75_{label}_ms"),
            &fmt_num3(read_stats.p75),
            &fmt_num3(write_stats.p75),
            &fmt_num3(erase_stats.p75),
        )?;
        row(
            writer,
            &format!("min_{label}_ms"),
            &fmt_num3(read_stats.min),
            &fmt_num3(write_stats.min),
            &fmt_num3(erase_stats.min),
        )?;
        row(
            writer,
            &format!("max_{label}_ms"),
            &fmt_num3(read_stats.max),
            &fmt_num3(write_stats.max),
            &fmt_num3(erase_stats.max),
        )?;
        row(
            writer,
            &format!("stddev_{label}_ms"),
            &fmt_stddev(read_stats.stddev),
            &fmt_stddev(write_stats.stddev),
            &fmt_stddev(erase_stats.stddev),
        )?;
    }

    for group in SizeGroup::ALL {
        let label = group.label();
        row(
            writer,
            &format!("db_mean_{label}"),
            &fmt_num3(matches.get(Operation::Read, group).value),
            &fmt_num3(matches.get(Operation::Program, group).value),
            &fmt_num3(matches.get(Operation::Erase, group).value),
        )?;
    }

    for group in SizeGroup::ALL {
        let label = group.label();
        row(
            writer,
            &format!("possible_chips_{label}"),
            &fmt_list(&matches.get(Operation::Read, group).candidates),
            &fmt_list(&matches.get(Operation::Program, group).candidates),
            &fmt_list(&matches.get(Operation::Erase, group).candidates),
        )?;
    }

    row(
        writer,
        "conclusion_possible_chips",
        &fmt_list(&conclusions.read),
        &fmt_list(&conclusions.write),
        &fmt_list(&conclusions.erase),
    )?;

    row(
        writer,
        "notes",
        "read MB/s is latency-derived, not per-sample averaged",
        "program pages assume a 256B page size",
        "db_mean uses typ_4k/32k/64k_ms; 1B/256B/WHOLE have no datasheet reference",
    )?;

    writeln!(writer)?;
    writeln!(
        writer,
        "final_guess_jedec,final_guess_model,final_guess_company,final_score"
    )?;
    writeln!(
        writer,
        "{},{},{},{}",
        final_guess.jedec,
        final_guess.model,
        final_guess.company,
        fmt_num3(final_guess.score)
    )?;

    Ok(())
}
