//! CSV import/export for item manifests and arrangements.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use thiserror::Error;

use crate::config::CsvDefaults;
use crate::item::Item;

/// A single malformed row. Import keeps going past a bad row rather than
/// aborting the whole file; callers decide whether any errors are fatal.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ImportError {
    #[error("row {row}: missing required column {column}")]
    MissingColumn { row: usize, column: String },

    #[error("row {row}: invalid value for {column}: {value:?}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("malformed CSV: {0}")]
    Malformed(String),
}

fn field<'a>(record: &'a csv::StringRecord, headers: &csv::StringRecord, name: &str) -> Option<&'a str> {
    let idx = headers.iter().position(|h| h == name)?;
    record.get(idx).filter(|v| !v.is_empty())
}

fn parse_required_u32(
    record: &csv::StringRecord,
    headers: &csv::StringRecord,
    row: usize,
    column: &str,
    errors: &mut Vec<ImportError>,
) -> Option<u32> {
    match field(record, headers, column) {
        Some(v) => v.parse::<u32>().ok().or_else(|| {
            errors.push(ImportError::InvalidValue {
                row,
                column: column.to_string(),
                value: v.to_string(),
            });
            None
        }),
        None => {
            errors.push(ImportError::MissingColumn {
                row,
                column: column.to_string(),
            });
            None
        }
    }
}

fn parse_optional_f64(record: &csv::StringRecord, headers: &csv::StringRecord, column: &str, default: f64) -> f64 {
    field(record, headers, column)
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(default)
}

fn parse_optional_u8(record: &csv::StringRecord, headers: &csv::StringRecord, column: &str, default: u8) -> u8 {
    field(record, headers, column)
        .and_then(|v| v.parse::<u8>().ok())
        .unwrap_or(default)
}

fn parse_optional_u32(record: &csv::StringRecord, headers: &csv::StringRecord, column: &str, default: u32) -> u32 {
    field(record, headers, column)
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(default)
}

fn parse_optional_string(record: &csv::StringRecord, headers: &csv::StringRecord, column: &str, default: &str) -> String {
    field(record, headers, column)
        .map(|v| v.to_string())
        .unwrap_or_else(|| default.to_string())
}

/// Accepts ISO-8601 (`2030-01-05` or full RFC3339) or the literal `"none"`.
fn parse_expiry(
    record: &csv::StringRecord,
    headers: &csv::StringRecord,
    row: usize,
    errors: &mut Vec<ImportError>,
) -> Option<Option<DateTime<Utc>>> {
    match field(record, headers, "Expiry Date") {
        None => Some(None),
        Some(v) if v.eq_ignore_ascii_case("none") => Some(None),
        Some(v) => {
            if let Ok(dt) = DateTime::parse_from_rfc3339(v) {
                return Some(Some(dt.with_timezone(&Utc)));
            }
            if let Ok(date) = NaiveDate::parse_from_str(v, "%Y-%m-%d") {
                let ndt = date.and_hms_opt(0, 0, 0).expect("midnight is always valid");
                return Some(Some(Utc.from_utc_datetime(&ndt)));
            }
            errors.push(ImportError::InvalidValue {
                row,
                column: "Expiry Date".to_string(),
                value: v.to_string(),
            });
            None
        }
    }
}

/// Parses an item manifest CSV using the spec's default column defaults
/// (spec §6). See [`import_items_with_defaults`] to override them via
/// [`CsvDefaults`].
pub fn import_items(data: &str) -> (Vec<Item>, Vec<ImportError>) {
    import_items_with_defaults(data, &CsvDefaults::default())
}

/// Parses an item manifest CSV. Header row required; rows are
/// 1-indexed after it (header itself is row 0). A malformed row is skipped
/// and reported, not fatal to the rest of the file. Missing optional columns
/// fall back to `defaults`.
pub fn import_items_with_defaults(data: &str, defaults: &CsvDefaults) -> (Vec<Item>, Vec<ImportError>) {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(data.as_bytes());
    let headers = match reader.headers() {
        Ok(h) => h.clone(),
        Err(e) => return (Vec::new(), vec![ImportError::Malformed(e.to_string())]),
    };

    let mut items = Vec::new();
    let mut errors = Vec::new();

    for (i, record) in reader.records().enumerate() {
        let row = i + 1;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                errors.push(ImportError::Malformed(format!("row {row}: {e}")));
                continue;
            }
        };

        let item_id = field(&record, &headers, "Item ID");
        let name = field(&record, &headers, "Name");
        let w = parse_required_u32(&record, &headers, row, "Width", &mut errors);
        let d = parse_required_u32(&record, &headers, row, "Depth", &mut errors);
        let h = parse_required_u32(&record, &headers, row, "Height", &mut errors);

        let item_id = match item_id {
            Some(v) => v.to_string(),
            None => {
                errors.push(ImportError::MissingColumn {
                    row,
                    column: "Item ID".to_string(),
                });
                continue;
            }
        };
        let name = match name {
            Some(v) => v.to_string(),
            None => {
                errors.push(ImportError::MissingColumn {
                    row,
                    column: "Name".to_string(),
                });
                continue;
            }
        };
        let (Some(w), Some(d), Some(h)) = (w, d, h) else {
            continue;
        };

        let Some(expiry_date) = parse_expiry(&record, &headers, row, &mut errors) else {
            continue;
        };

        let mass = parse_optional_f64(&record, &headers, "Mass", defaults.mass);
        let priority = parse_optional_u8(&record, &headers, "Priority", defaults.priority);
        let usage_limit = parse_optional_u32(&record, &headers, "Usage Limit", defaults.usage_limit);
        let preferred_zone =
            parse_optional_string(&record, &headers, "Preferred Zone", &defaults.preferred_zone);

        items.push(Item::new(
            item_id,
            name,
            w,
            d,
            h,
            mass,
            priority,
            expiry_date,
            usage_limit,
            preferred_zone,
        ));
    }

    (items, errors)
}

/// Writes one row per currently stored item. Unplaced, waste, and
/// disposed items have no position and are omitted.
pub fn export_arrangement(items: &[Item]) -> Result<String, csv::Error> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record([
        "Item ID",
        "Container ID",
        "Start W",
        "Start D",
        "Start H",
        "End W",
        "End D",
        "End H",
    ])?;

    for item in items.iter().filter(|i| i.is_stored()) {
        let container_id = item.container_id.as_deref().unwrap_or("");
        let pos = item.position.expect("stored item always has a position (I4)");
        writer.write_record([
            item.item_id.as_str(),
            container_id,
            &pos.ws.to_string(),
            &pos.ds.to_string(),
            &pos.hs.to_string(),
            &pos.we.to_string(),
            &pos.de.to_string(),
            &pos.he.to_string(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes).expect("csv writer only emits valid utf-8 from utf-8 fields"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imports_a_well_formed_row_with_defaults_applied() {
        let csv = "Item ID,Name,Width,Depth,Height\nX,Widget,10,10,10\n";
        let (items, errors) = import_items(csv);
        assert!(errors.is_empty());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].mass, 0.0);
        assert_eq!(items[0].priority, 50);
        assert_eq!(items[0].usage_limit, 1);
        assert_eq!(items[0].preferred_zone, "General");
        assert!(items[0].expiry_date.is_none());
    }

    #[test]
    fn missing_required_column_is_reported_and_row_skipped() {
        let csv = "Item ID,Name,Width,Depth,Height\nX,Widget,10,10,\n";
        let (items, errors) = import_items(csv);
        assert!(items.is_empty());
        assert_eq!(
            errors,
            vec![ImportError::MissingColumn {
                row: 1,
                column: "Height".to_string(),
            }]
        );
    }

    #[test]
    fn custom_defaults_override_the_spec_table() {
        let csv = "Item ID,Name,Width,Depth,Height\nX,Widget,10,10,10\n";
        let defaults = CsvDefaults {
            mass: 2.5,
            priority: 70,
            usage_limit: 3,
            preferred_zone: "Airlock".to_string(),
        };
        let (items, errors) = import_items_with_defaults(csv, &defaults);
        assert!(errors.is_empty());
        assert_eq!(items[0].mass, 2.5);
        assert_eq!(items[0].priority, 70);
        assert_eq!(items[0].usage_limit, 3);
        assert_eq!(items[0].preferred_zone, "Airlock");
    }

    #[test]
    fn literal_none_expiry_is_treated_as_no_expiry() {
        let csv = "Item ID,Name,Width,Depth,Height,Expiry Date\nX,Widget,10,10,10,none\n";
        let (items, errors) = import_items(csv);
        assert!(errors.is_empty());
        assert!(items[0].expiry_date.is_none());
    }

    #[test]
    fn export_emits_one_row_per_stored_item() {
        use crate::geometry::Position;

        let mut item = Item::new("X", "Widget", 10, 10, 10, 1.0, 50, None, 1, "General");
        item.mark_stored("C1", Position::from_anchor(0, 0, 0, 10, 10, 10));
        let unplaced = Item::new("Y", "Gadget", 5, 5, 5, 1.0, 50, None, 1, "General");

        let csv = export_arrangement(&[item, unplaced]).unwrap();
        assert_eq!(
            csv,
            "Item ID,Container ID,Start W,Start D,Start H,End W,End D,End H\nX,C1,0,0,0,10,10,10\n"
        );
    }
}
