//! Catalogue-row prediction formulas (§4.D), shared between the datasheet
//! matcher and the final scorer so the two never drift apart.

use crate::catalogue::CatalogueRow;
use crate::model::{DeviceContext, Operation, SizeGroup};

/// Fixed page-program granularity in bytes (§3 glossary: "Page").
pub const PAGE_BYTES: u64 = 256;

/// Predict a catalogue row's timing/throughput for one (operation, size
/// group) cell, given the device context's SCK and capacity. Returns
/// `None` when the row lacks the datasheet field the prediction needs, or
/// when the context disables the prediction (e.g. `sck_mhz == 0`, or
/// `WHOLE` with an unknown capacity).
pub fn predict(op: Operation, group: SizeGroup, row: &CatalogueRow, context: &DeviceContext) -> Option<f64> {
    match op {
        Operation::Read => predict_read(row, context),
        Operation::Program => predict_program(row, group, context.capacity_bytes),
        Operation::Erase => predict_erase(row, group),
    }
}

/// Read prediction: `row.read50_mbps * (sck_mhz / 50)`. Requires read
/// matching to be enabled (`sck_mhz > 0`) and `read50_mbps` present.
pub fn predict_read(row: &CatalogueRow, context: &DeviceContext) -> Option<f64> {
    if !context.read_matching_enabled() {
        return None;
    }
    row.read50_mbps.map(|r| r * (context.sck_mhz / 50.0))
}

/// Program prediction: `typ_page_ms * ceil(bytes / 256)`. For
/// [`SizeGroup::Whole`], `bytes` is the device capacity; absent/zero
/// capacity disables the prediction.
pub fn predict_program(row: &CatalogueRow, group: SizeGroup, capacity_bytes: u64) -> Option<f64> {
    let bytes = match group {
        SizeGroup::Whole => {
            if capacity_bytes == 0 {
                return None;
            }
            capacity_bytes
        }
        _ => group.fixed_bytes()?,
    };
    let pages = bytes.div_ceil(PAGE_BYTES) as f64;
    row.typ_page_ms.map(|ms| ms * pages)
}

/// Erase prediction: the datasheet reference for the group's erase size.
/// Only [`SizeGroup::K4`], [`SizeGroup::K32`], and [`SizeGroup::K64`] have
/// a reference; other groups always return `None`.
pub fn predict_erase(row: &CatalogueRow, group: SizeGroup) -> Option<f64> {
    match group {
        SizeGroup::K4 => row.typ_4k_ms,
        SizeGroup::K32 => row.typ_32k_ms,
        SizeGroup::K64 => row.typ_64k_ms,
        SizeGroup::B1 | SizeGroup::B256 | SizeGroup::Whole => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(read50: Option<f64>, p4: Option<f64>, p32: Option<f64>, p64: Option<f64>, page: Option<f64>) -> CatalogueRow {
        CatalogueRow {
            read50_mbps: read50,
            typ_4k_ms: p4,
            typ_32k_ms: p32,
            typ_64k_ms: p64,
            typ_page_ms: page,
            ..Default::default()
        }
    }

    fn context(sck_mhz: f64) -> DeviceContext {
        DeviceContext {
            sck_mhz,
            ..Default::default()
        }
    }

    #[test]
    fn read_scales_by_sck_over_50() {
        let r = row(Some(5.0), None, None, None, None);
        assert_eq!(predict_read(&r, &context(10.0)), Some(1.0));
        assert_eq!(predict_read(&r, &context(0.0)), None);
    }

    #[test]
    fn program_pages_rounds_up() {
        let r = row(None, None, None, None, Some(0.7));
        // 4096 / 256 = 16 exactly
        assert_eq!(predict_program(&r, SizeGroup::K4, 0), Some(11.2));
    }

    #[test]
    fn program_whole_needs_capacity() {
        let r = row(None, None, None, None, Some(0.7));
        assert_eq!(predict_program(&r, SizeGroup::Whole, 0), None);
        assert!(predict_program(&r, SizeGroup::Whole, 1_048_576).is_some());
    }

    #[test]
    fn erase_picks_reference_by_group() {
        let r = row(None, Some(45.0), Some(240.0), Some(400.0), None);
        assert_eq!(predict_erase(&r, SizeGroup::K4), Some(45.0));
        assert_eq!(predict_erase(&r, SizeGroup::K32), Some(240.0));
        assert_eq!(predict_erase(&r, SizeGroup::K64), Some(400.0));
        assert_eq!(predict_erase(&r, SizeGroup::B1), None);
        assert_eq!(predict_erase(&r, SizeGroup::Whole), None);
    }
}
