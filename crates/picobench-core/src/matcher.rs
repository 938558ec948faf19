//! Datasheet matcher (§4.D): for each (operation, size group) bucket, find
//! the catalogue row whose prediction is closest to the observed mean, and
//! enumerate every row whose prediction ties with the winner.

use crate::aggregate::Aggregates;
use crate::catalogue::Catalogue;
use crate::model::{DeviceContext, Operation, SizeGroup};
use crate::predict::predict;
use crate::stats::almost_equal;

/// The result of matching one (operation, size group) cell against the
/// catalogue.
#[derive(Debug, Clone, Default)]
pub struct MatchCell {
    /// The winning catalogue row's prediction, i.e. `db_mean_<group>` for
    /// this operation. `None` when the bucket is empty or no catalogue row
    /// has an eligible prediction.
    pub value: Option<f64>,
    /// JEDEC ids of every catalogue row whose prediction ties the winner
    /// under [`almost_equal`], excluding JEDEC-less rows. Empty when
    /// `value` is `None`.
    pub candidates: Vec<String>,
}

/// The observed mean used to compare against a catalogue prediction: the
/// bucket's per-sample MB/s mean for read, elapsed-ms mean for
/// program/erase. `None` when the bucket has no samples. Shared with
/// [`crate::scorer`].
pub(crate) fn observed_mean(aggregates: &Aggregates, op: Operation, group: SizeGroup) -> Option<f64> {
    match op {
        Operation::Read => {
            let bucket = aggregates.read(group);
            if bucket.mbps.n == 0 {
                None
            } else {
                bucket.mbps.mean
            }
        }
        Operation::Program => {
            let s = aggregates.program(group);
            if s.n == 0 {
                None
            } else {
                s.mean
            }
        }
        Operation::Erase => {
            let s = aggregates.erase(group);
            if s.n == 0 {
                None
            } else {
                s.mean
            }
        }
    }
}

/// Match one (operation, size group) cell. Returns an empty [`MatchCell`]
/// if the bucket has no samples.
pub fn match_cell(
    catalogue: &Catalogue,
    aggregates: &Aggregates,
    context: &DeviceContext,
    op: Operation,
    group: SizeGroup,
) -> MatchCell {
    let Some(mean) = observed_mean(aggregates, op, group) else {
        return MatchCell::default();
    };

    let mut best: Option<(usize, f64)> = None;
    for (idx, row) in catalogue.rows().iter().enumerate() {
        let Some(predicted) = predict(op, group, row, context) else {
            continue;
        };
        let diff = (predicted - mean).abs();
        match best {
            Some((_, best_diff)) if diff >= best_diff => {}
            _ => best = Some((idx, predicted)),
        }
    }

    let Some((_, winning_value)) = best else {
        return MatchCell::default();
    };

    let mut candidates = Vec::new();
    for row in catalogue.rows() {
        let Some(jedec) = &row.jedec_norm else {
            continue;
        };
        let Some(predicted) = predict(op, group, row, context) else {
            continue;
        };
        if almost_equal(predicted, winning_value) {
            candidates.push(jedec.clone());
        }
    }

    MatchCell {
        value: Some(winning_value),
        candidates,
    }
}
