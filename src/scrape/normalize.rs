use crate::error::{AppError, Result};
use crate::scrape::entities::decode_html_entities;
use crate::types::{RawRow, ShipRecord};

/// Substring (lower-case) the upstream uses for a "yes" in the pilot/tug columns.
const YES_TOKEN: &str = "evet";

/// Which record field a column feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    SchedulingLabel,
    ShipName,
    Length,
    ShipType,
    Pilot,
    Tug,
    AuxField2,
    AuxField1,
}

/// Column index → field, in the upstream table's order. Column 0 (row number)
/// is unused. Columns 7 and 8 land in `sp2` then `sp1`; the dashboard reads them
/// under those names, so the inversion stays.
pub const LAYOUT: [(usize, Field); 8] = [
    (1, Field::SchedulingLabel),
    (2, Field::ShipName),
    (3, Field::Length),
    (4, Field::ShipType),
    (5, Field::Pilot),
    (6, Field::Tug),
    (7, Field::AuxField2),
    (8, Field::AuxField1),
];

/// Normalize every scraped row; the first short row fails the whole set.
pub fn normalize_rows(rows: &[RawRow]) -> Result<Vec<ShipRecord>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    rows.iter().map(normalize).collect()
}

/// Map one raw row onto a `ShipRecord` following `LAYOUT`.
pub fn normalize(row: &RawRow) -> Result<ShipRecord> {
    let mut record = ShipRecord::default();

    for &(index, field) in &LAYOUT {
        let cell = row.get(index).ok_or(AppError::MissingCell {
            index,
            len: row.len(),
        })?;
        match field {
            Field::SchedulingLabel => record.scheduling_label = decode_html_entities(cell),
            Field::ShipName => record.ship_name = cell.clone(),
            Field::Length => record.length = parse_length(cell),
            Field::ShipType => record.ship_type = cell.clone(),
            Field::Pilot => record.has_pilot = is_yes(cell),
            Field::Tug => record.has_tug = is_yes(cell),
            Field::AuxField2 => record.aux_field2 = cell.clone(),
            Field::AuxField1 => record.aux_field1 = cell.clone(),
        }
    }

    Ok(record)
}

fn is_yes(cell: &str) -> bool {
    cell.to_lowercase().contains(YES_TOKEN)
}

/// Parse a comma-decimal length ("183,5"). Only the first comma is treated
/// as the separator. Reads the longest numeric prefix, so "183,5 m" → 183.5;
/// no prefix → NaN.
pub fn parse_length(text: &str) -> f64 {
    let dotted = text.replacen(',', ".", 1);
    let s = dotted.trim_start();
    let bytes = s.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return f64::NAN;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().unwrap_or(f64::NAN)
}
