//! Datasheet catalogue loader (§4.B): header-driven column mapping over a
//! comma-or-tab-separated table, with JEDEC normalisation.

use std::io::BufRead;

/// One row of the datasheet catalogue.
#[derive(Debug, Clone, Default)]
pub struct CatalogueRow {
    /// Six-hex-digit normalised JEDEC id, or `None` if the row is
    /// JEDEC-less (missing, malformed, or wrong length).
    pub jedec_norm: Option<String>,
    /// Chip model name.
    pub chip_model: Option<String>,
    /// Manufacturer/company name.
    pub company: Option<String>,
    /// Chip family name.
    pub family: Option<String>,
    /// Capacity in megabits.
    pub capacity_mbit: Option<u64>,
    /// Typical 4 KiB erase time, milliseconds.
    pub typ_4k_ms: Option<f64>,
    /// Typical 32 KiB erase time, milliseconds.
    pub typ_32k_ms: Option<f64>,
    /// Typical 64 KiB erase time, milliseconds.
    pub typ_64k_ms: Option<f64>,
    /// Typical page-program time, milliseconds.
    pub typ_page_ms: Option<f64>,
    /// Datasheet read throughput at 50 MHz SCK, MB/s.
    pub read50_mbps: Option<f64>,
}

impl CatalogueRow {
    /// Capacity in bytes, derived from `capacity_mbit` per §4.B:
    /// `round(capacity_mbit / 8 * 1024 * 1024)`.
    pub fn capacity_bytes(&self) -> Option<u64> {
        self.capacity_mbit
            .map(|mbit| ((mbit as f64 / 8.0) * 1024.0 * 1024.0).round() as u64)
    }
}

/// The in-memory catalogue table. Row order is the catalogue's source
/// order and is load-bearing for tie-breaking (§4.D, §4.F, §9): this is a
/// `Vec`, never a hash-iteration collection.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    rows: Vec<CatalogueRow>,
}

impl Catalogue {
    /// Rows in source order.
    pub fn rows(&self) -> &[CatalogueRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Normalise a raw JEDEC token to six uppercase hex digits.
///
/// Strips a leading `0x`/`0X`, drops any non-hex characters, and returns
/// `None` unless exactly six hex digits remain.
pub fn normalise_jedec(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let raw = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    let hex: String = raw
        .chars()
        .filter(|c| c.is_ascii_hexdigit())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if hex.len() == 6 {
        Some(hex)
    } else {
        None
    }
}

/// Split a catalogue line on comma if one appears before the first tab,
/// otherwise on tab.
fn split_fields(line: &str) -> Vec<&str> {
    let comma_pos = line.find(',');
    let tab_pos = line.find('\t');
    let sep = match (comma_pos, tab_pos) {
        (Some(c), Some(t)) if c < t => ',',
        (Some(_), None) => ',',
        (None, Some(_)) => '\t',
        (Some(_), Some(_)) => '\t',
        (None, None) => ',',
    };
    line.split(sep).map(str::trim).collect()
}

/// Case-insensitive substring match against an upper-cased header token.
fn header_matches(token_upper: &str, needle: &str) -> bool {
    token_upper.contains(needle)
}

/// Resolved column -> field index mapping, built once from the header.
#[derive(Debug, Default)]
struct ColumnMap {
    model: Option<usize>,
    company: Option<usize>,
    family: Option<usize>,
    capacity_mbit: Option<usize>,
    jedec: Option<usize>,
    typ_page_ms: Option<usize>,
    typ_4k_ms: Option<usize>,
    typ_32k_ms: Option<usize>,
    typ_64k_ms: Option<usize>,
    read50_mbps: Option<usize>,
}

impl ColumnMap {
    fn from_header(fields: &[&str]) -> Self {
        let mut map = ColumnMap::default();
        for (idx, field) in fields.iter().enumerate() {
            let upper = field.to_ascii_uppercase();
            if header_matches(&upper, "CHIP_MODEL") {
                map.model.get_or_insert(idx);
            }
            if header_matches(&upper, "COMPANY") {
                map.company.get_or_insert(idx);
            }
            if header_matches(&upper, "CHIP_FAMILY") {
                map.family.get_or_insert(idx);
            }
            if header_matches(&upper, "CAPACITY") && header_matches(&upper, "MBIT") {
                map.capacity_mbit.get_or_insert(idx);
            }
            if header_matches(&upper, "JEDEC") {
                map.jedec.get_or_insert(idx);
            }
            if header_matches(&upper, "TYP_PAGE_PROGRAM") {
                map.typ_page_ms.get_or_insert(idx);
            }
            if header_matches(&upper, "TYP_4KB") {
                map.typ_4k_ms.get_or_insert(idx);
            }
            if header_matches(&upper, "TYP_32KB") {
                map.typ_32k_ms.get_or_insert(idx);
            }
            if header_matches(&upper, "TYP_64KB") {
                map.typ_64k_ms.get_or_insert(idx);
            }
            if header_matches(&upper, "50MHZ_READ_SPEED")
                || header_matches(&upper, "50MHZ_READ")
                || header_matches(&upper, "READ50")
            {
                map.read50_mbps.get_or_insert(idx);
            }
        }
        map
    }

    fn get<'a>(&self, fields: &[&'a str], idx: Option<usize>) -> Option<&'a str> {
        idx.and_then(|i| fields.get(i).copied())
            .filter(|s| !s.is_empty())
    }
}

/// Parse a datasheet numeric cell, rejecting non-finite values. `f64`'s
/// `FromStr` accepts `"nan"`/`"inf"`/`"-inf"`; a malformed cell spelling one
/// of those must still leave the field absent (§4.B).
fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse the catalogue from `reader`. An unreadable or header-less
/// catalogue yields an empty table rather than an error (§4.B is never
/// fatal).
pub fn load<R: BufRead>(reader: R) -> Catalogue {
    let mut lines = reader.lines().map_while(std::result::Result::ok);

    let header_line = loop {
        match lines.next() {
            Some(line) if !line.trim().is_empty() => break line,
            Some(_) => continue,
            None => {
                log::warn!("catalogue stream had no header; treating as empty");
                return Catalogue::default();
            }
        }
    };
    let header_fields = split_fields(&header_line);
    let map = ColumnMap::from_header(&header_fields);

    let mut rows = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_fields(&line);
        if fields.len() < 2 {
            continue;
        }
        let row = CatalogueRow {
            jedec_norm: map.get(&fields, map.jedec).and_then(normalise_jedec),
            chip_model: map.get(&fields, map.model).map(str::to_string),
            company: map.get(&fields, map.company).map(str::to_string),
            family: map.get(&fields, map.family).map(str::to_string),
            capacity_mbit: map.get(&fields, map.capacity_mbit).and_then(|s| s.parse().ok()),
            typ_4k_ms: map.get(&fields, map.typ_4k_ms).and_then(parse_finite),
            typ_32k_ms: map.get(&fields, map.typ_32k_ms).and_then(parse_finite),
            typ_64k_ms: map.get(&fields, map.typ_64k_ms).and_then(parse_finite),
            typ_page_ms: map.get(&fields, map.typ_page_ms).and_then(parse_finite),
            read50_mbps: map.get(&fields, map.read50_mbps).and_then(parse_finite),
        };
        rows.push(row);
    }

    log::debug!("loaded {} catalogue rows", rows.len());
    Catalogue { rows }
}
