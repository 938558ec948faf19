//! Final scorer (§4.F): score every catalogue row against every observed
//! bucket, apply the JEDEC-match bias, and pick the best-defended guess.

use crate::aggregate::Aggregates;
use crate::catalogue::{Catalogue, CatalogueRow};
use crate::matcher::observed_mean;
use crate::model::{DeviceContext, Operation, SizeGroup};
use crate::predict::predict;

/// Per-bucket error contributions are capped so a single wildly-off cell
/// can't dominate the sum.
const ERROR_CAP: f64 = 3.0;
/// Multiplier applied to a row's score when its JEDEC matches the
/// observed device JEDEC.
const JEDEC_MATCH_BIAS: f64 = 0.25;

/// The engine's final, defended chip identification.
#[derive(Debug, Clone)]
pub struct FinalGuess {
    /// JEDEC id, or the literal `"undecided"` when none could be
    /// determined.
    pub jedec: String,
    /// Chip model, or `"undecided"`/`"NA"` (see module docs).
    pub model: String,
    /// Manufacturer/company, or `"undecided"`/`"NA"`.
    pub company: String,
    /// Goodness-of-fit score; lower is better. `None` renders as `NA`.
    pub score: Option<f64>,
}

/// Sum of capped normalised errors between `row`'s predictions and every
/// observed bucket with `n > 0`. Returns `None` if no bucket contributed
/// (the row is ineligible).
fn score_row(row: &CatalogueRow, aggregates: &Aggregates, context: &DeviceContext) -> Option<f64> {
    let mut total = 0.0;
    let mut contributed = false;
    for op in [Operation::Read, Operation::Program, Operation::Erase] {
        for group in SizeGroup::ALL {
            let Some(mean) = observed_mean(aggregates, op, group) else {
                continue;
            };
            let Some(prediction) = predict(op, group, row, context) else {
                continue;
            };
            let relative_error = ((mean - prediction) / prediction).abs();
            total += relative_error.min(ERROR_CAP);
            contributed = true;
        }
    }
    contributed.then_some(total)
}

fn apply_bias(row: &CatalogueRow, raw_score: f64, context: &DeviceContext) -> f64 {
    match (&context.jedec_norm_observed, &row.jedec_norm) {
        (Some(observed), Some(row_jedec)) if observed == row_jedec => raw_score * JEDEC_MATCH_BIAS,
        _ => raw_score,
    }
}

/// Find the catalogue row whose JEDEC matches `observed`, if any. Shared
/// with [`crate::engine`] for the report's identity rows.
pub(crate) fn find_jedec_match<'a>(catalogue: &'a Catalogue, observed: &str) -> Option<&'a CatalogueRow> {
    catalogue
        .rows()
        .iter()
        .find(|row| row.jedec_norm.as_deref() == Some(observed))
}

fn guess_from_row(row: &CatalogueRow, score: Option<f64>) -> FinalGuess {
    FinalGuess {
        jedec: row.jedec_norm.clone().unwrap_or_else(|| "NA".to_string()),
        model: row.chip_model.clone().unwrap_or_else(|| "NA".to_string()),
        company: row.company.clone().unwrap_or_else(|| "NA".to_string()),
        score,
    }
}

fn undecided() -> FinalGuess {
    FinalGuess {
        jedec: "undecided".to_string(),
        model: "undecided".to_string(),
        company: "undecided".to_string(),
        score: None,
    }
}

/// Pick the best-defended chip guess per §4.F, including its special
/// cases for missing samples and/or an unscoreable catalogue.
pub fn final_guess(
    catalogue: &Catalogue,
    aggregates: &Aggregates,
    context: &DeviceContext,
) -> FinalGuess {
    let mut best: Option<(usize, f64)> = None;
    for (idx, row) in catalogue.rows().iter().enumerate() {
        let Some(raw_score) = score_row(row, aggregates, context) else {
            continue;
        };
        let biased = apply_bias(row, raw_score, context);
        match best {
            Some((_, best_score)) if biased >= best_score => {}
            _ => best = Some((idx, biased)),
        }
    }

    if let Some((idx, score)) = best {
        return guess_from_row(&catalogue.rows()[idx], Some(score));
    }

    // No catalogue row was scoreable: fall back on the observed JEDEC.
    let jedec_match = context
        .jedec_norm_observed
        .as_deref()
        .and_then(|observed| find_jedec_match(catalogue, observed));

    if !aggregates.any_samples() {
        if let Some(row) = jedec_match {
            return guess_from_row(row, Some(0.0));
        }
        if let Some(observed) = &context.jedec_norm_observed {
            return FinalGuess {
                jedec: observed.clone(),
                model: "undecided".to_string(),
                company: "undecided".to_string(),
                score: None,
            };
        }
        return undecided();
    }

    if let Some(row) = jedec_match {
        return guess_from_row(row, None);
    }

    undecided()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::catalogue::load;
    use std::io::Cursor;

    fn ctx(jedec: Option<&str>, sck_mhz: f64, capacity_bytes: u64) -> DeviceContext {
        DeviceContext {
            jedec_norm_observed: jedec.map(str::to_string),
            sck_mhz,
            capacity_bytes,
        }
    }

    #[test]
    fn scenario_1_bias_keeps_score_under_3() {
        let cat = load(Cursor::new(
            "CHIP_MODEL,JEDEC,50MHZ_READ_SPEED\nX,BF2641,5.0\n",
        ));
        let agg = aggregate(
            Cursor::new(
                "BF2641,read,4096,0x0,800,0\nBF2641,read,4096,0x0,820,0\nBF2641,read,4096,0x0,810,0\n",
            ),
            2_097_152,
        );
        let context = ctx(Some("BF2641"), 10.0, 2_097_152);
        let guess = final_guess(&cat, &agg, &context);
        assert_eq!(guess.jedec, "BF2641");
        assert_eq!(guess.model, "X");
        let score = guess.score.unwrap();
        assert!(score >= 0.0 && score < 3.0);
    }

    #[test]
    fn scenario_5_no_samples_known_jedec() {
        let cat = load(Cursor::new(
            "CHIP_MODEL,COMPANY,JEDEC\nMX25L,Macronix,C21F17\n",
        ));
        let agg = aggregate(Cursor::new(""), 0);
        let context = ctx(Some("C21F17"), 0.0, 0);
        let guess = final_guess(&cat, &agg, &context);
        assert_eq!(guess.jedec, "C21F17");
        assert_eq!(guess.model, "MX25L");
        assert_eq!(guess.company, "Macronix");
        assert_eq!(guess.score, Some(0.0));
    }

    #[test]
    fn empty_everything_is_fully_undecided() {
        let cat = load(Cursor::new(""));
        let agg = aggregate(Cursor::new(""), 0);
        let context = ctx(None, 0.0, 0);
        let guess = final_guess(&cat, &agg, &context);
        assert_eq!(guess.jedec, "undecided");
        assert_eq!(guess.model, "undecided");
        assert_eq!(guess.company, "undecided");
        assert_eq!(guess.score, None);
    }

    #[test]
    fn no_catalogue_match_for_known_jedec_and_no_samples() {
        let cat = load(Cursor::new("CHIP_MODEL,JEDEC\nX,AAAAAA\n"));
        let agg = aggregate(Cursor::new(""), 0);
        let context = ctx(Some("BBBBBB"), 0.0, 0);
        let guess = final_guess(&cat, &agg, &context);
        assert_eq!(guess.jedec, "BBBBBB");
        assert_eq!(guess.model, "undecided");
        assert_eq!(guess.company, "undecided");
        assert_eq!(guess.score, None);
    }

    #[test]
    fn samples_present_but_unscoreable_falls_back_to_jedec_match() {
        // Catalogue row has no datasheet fields at all, so it can never
        // score, but it does carry the observed JEDEC.
        let cat = load(Cursor::new("CHIP_MODEL,COMPANY,JEDEC\nX,ACME,AAAAAA\n"));
        let agg = aggregate(Cursor::new("X,read,4096,0x0,800,0\n"), 0);
        let context = ctx(Some("AAAAAA"), 0.0, 0);
        let guess = final_guess(&cat, &agg, &context);
        assert_eq!(guess.jedec, "AAAAAA");
        assert_eq!(guess.model, "X");
        assert_eq!(guess.score, None);
    }
}
