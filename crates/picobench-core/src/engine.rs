//! The engine entry point: `generate_report` wires the catalogue loader,
//! sample aggregator, datasheet matcher, candidate intersector, final
//! scorer, and report writer into one single-pass invocation (§5).

use std::io::{BufRead, Write};

use crate::aggregate::aggregate;
use crate::catalogue::load as load_catalogue;
use crate::error::Result;
use crate::intersect::intersect;
use crate::matcher::{match_cell, MatchCell};
use crate::model::{DeviceContext, Operation, SizeGroup};
use crate::report::{write_report, Conclusions, Identity, MatchTable};
use crate::scorer::{final_guess, find_jedec_match};

/// Generate the full report for one benchmark run.
///
/// `results` and `catalogue` are read exactly once, in source order;
/// `output` receives the report in the fixed order of §4.G. The only
/// failure mode that propagates is the output stream rejecting a write
/// (`EngineError::Output`); every other malformed or absent input
/// degrades to `NA`/`undecided` cells rather than an error.
pub fn generate_report(
    results: impl BufRead,
    catalogue: impl BufRead,
    context: &DeviceContext,
    output: &mut impl Write,
) -> Result<()> {
    let catalogue = load_catalogue(catalogue);
    let aggregates = aggregate(results, context.capacity_bytes);

    let mut matches = MatchTable::default();
    for op in [Operation::Read, Operation::Program, Operation::Erase] {
        for group in SizeGroup::ALL {
            matches.insert(op, group, match_cell(&catalogue, &aggregates, context, op, group));
        }
    }

    let conclusions = Conclusions {
        read: intersect(&cells_for(&matches, Operation::Read)),
        write: intersect(&cells_for(&matches, Operation::Program)),
        erase: intersect(&cells_for(&matches, Operation::Erase)),
    };

    let identity = context
        .jedec_norm_observed
        .as_deref()
        .and_then(|observed| find_jedec_match(&catalogue, observed))
        .map(|row| Identity {
            chip_model: row.chip_model.clone(),
            chip_family: row.family.clone(),
            company: row.company.clone(),
            capacity_mbit: row.capacity_mbit,
        })
        .unwrap_or_default();

    let guess = final_guess(&catalogue, &aggregates, context);

    log::info!(
        "final guess: jedec={} model={} company={} score={:?}",
        guess.jedec,
        guess.model,
        guess.company,
        guess.score
    );

    write_report(output, context, &identity, &aggregates, &matches, &conclusions, &guess)
        .map_err(Into::into)
}

fn cells_for(matches: &MatchTable, op: Operation) -> [MatchCell; 6] {
    let mut out: [MatchCell; 6] = Default::default();
    for (i, group) in SizeGroup::ALL.iter().enumerate() {
        out[i] = matches.get(op, *group);
    }
    out
}
