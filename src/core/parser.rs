//! Tolerant upload parsing.
//!
//! Turns an uploaded byte buffer - either a spreadsheet workbook or plain
//! delimited text - into [`ProductRow`]s. The import policy is best effort:
//! uploads are user-provided, imperfect data, so malformed scalar cells
//! default to zero and structurally short rows are skipped, never erroring.
//! Only an unreadable container (a corrupt workbook) fails the whole parse.
//!
//! Both encodings funnel through the same fixed 15-column mapping, so a CSV
//! export and the original workbook of the same data derive identically.

use crate::errors::{Error, Result};
use calamine::{Data, Reader};
use std::io::Cursor;
use tracing::warn;

/// Number of cells a row must have to be considered at all.
pub const COLUMNS: usize = 15;

/// Length of the reporting window in days.
pub const DAYS: usize = 3;

/// A single raw cell as extracted from either input encoding.
///
/// Workbook cells arrive typed (string or numeric); delimited-text cells are
/// always text. The lenient parsers below accept both uniformly.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// A textual cell
    Text(String),
    /// A native numeric cell (workbook input only)
    Number(f64),
    /// A missing or unreadable cell
    Empty,
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
                Self::Text(s.clone())
            }
            Data::Int(i) => Self::Number(*i as f64),
            Data::Float(f) => Self::Number(*f),
            Data::DateTime(dt) => Self::Number(dt.as_f64()),
            Data::Bool(b) => Self::Text(b.to_string()),
            Data::Error(_) | Data::Empty => Self::Empty,
        }
    }
}

impl From<&str> for Cell {
    fn from(field: &str) -> Self {
        Self::Text(field.to_string())
    }
}

/// One parsed input row: identity plus the six quantity/price series the
/// derivation consumes. Produced only when id and name survive trimming.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    /// Product identifier (column 0, trimmed, non-empty)
    pub id: String,
    /// Display name (column 1, trimmed, non-empty)
    pub name: String,
    /// Inventory on hand before day 1 (column 2)
    pub opening_inventory: i64,
    /// Units procured per day
    pub procurement_qty: [i64; DAYS],
    /// Procurement unit price per day
    pub procurement_price: [f64; DAYS],
    /// Units sold per day
    pub sales_qty: [i64; DAYS],
    /// Sales unit price per day
    pub sales_price: [f64; DAYS],
}

/// Parses an integer cell, defaulting to 0 on any failure.
///
/// Total function: non-numeric text, empty cells, and non-finite numbers all
/// yield 0. Fractional values truncate toward zero.
#[must_use]
pub fn parse_int_lenient(cell: &Cell) -> i64 {
    match cell {
        Cell::Number(f) if f.is_finite() => f.trunc() as i64,
        Cell::Text(s) => {
            let trimmed = s.trim();
            trimmed.parse::<i64>().unwrap_or_else(|_| {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map_or(0, |f| f.trunc() as i64)
            })
        }
        _ => 0,
    }
}

/// Parses a price cell, defaulting to 0.0 on any failure.
///
/// Total function: native numbers pass through; text is stripped of currency
/// symbols, commas, and whitespace before float parsing.
#[must_use]
pub fn parse_price_lenient(cell: &Cell) -> f64 {
    match cell {
        Cell::Number(f) if f.is_finite() => *f,
        Cell::Text(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, '$' | '€' | '£' | '¥' | ',') && !c.is_whitespace())
                .collect();
            cleaned
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .unwrap_or(0.0)
        }
        _ => 0.0,
    }
}

fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Text(s) => s.trim().to_string(),
        Cell::Number(f) => {
            // Workbook ids often arrive as numeric cells; render 101.0 as "101"
            if f.fract() == 0.0 && f.is_finite() {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Cell::Empty => String::new(),
    }
}

/// Assembles one [`ProductRow`] from a raw cell row, or rejects it.
///
/// Rows shorter than [`COLUMNS`] and rows whose id or name is empty after
/// trimming return `None`; bad numeric cells never cause rejection.
#[must_use]
pub fn parse_row(cells: &[Cell]) -> Option<ProductRow> {
    if cells.len() < COLUMNS {
        return None;
    }

    let id = cell_text(&cells[0]);
    let name = cell_text(&cells[1]);
    if id.is_empty() || name.is_empty() {
        return None;
    }

    let mut procurement_qty = [0_i64; DAYS];
    let mut procurement_price = [0.0_f64; DAYS];
    let mut sales_qty = [0_i64; DAYS];
    let mut sales_price = [0.0_f64; DAYS];
    for day in 0..DAYS {
        procurement_qty[day] = parse_int_lenient(&cells[3 + day * 2]);
        procurement_price[day] = parse_price_lenient(&cells[4 + day * 2]);
        sales_qty[day] = parse_int_lenient(&cells[9 + day * 2]);
        sales_price[day] = parse_price_lenient(&cells[10 + day * 2]);
    }

    Some(ProductRow {
        id,
        name,
        opening_inventory: parse_int_lenient(&cells[2]),
        procurement_qty,
        procurement_price,
        sales_qty,
        sales_price,
    })
}

/// Recognized upload container categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    /// Spreadsheet workbook (`.xlsx`, legacy `.xls`, `.ods`)
    Workbook,
    /// Plain delimited text (`.csv`, `.txt`)
    Delimited,
}

impl UploadFormat {
    /// Picks the decoder from the uploaded file name and/or content type.
    /// Defaults to workbook, which is what the dashboard's file picker sends.
    #[must_use]
    pub fn detect(file_name: Option<&str>, content_type: Option<&str>) -> Self {
        let name = file_name.unwrap_or_default().to_ascii_lowercase();
        if name.ends_with(".csv") || name.ends_with(".txt") {
            return Self::Delimited;
        }
        if name.ends_with(".xlsx") || name.ends_with(".xls") || name.ends_with(".ods") {
            return Self::Workbook;
        }
        match content_type {
            Some(ct) if ct.starts_with("text/csv") || ct.starts_with("text/plain") => {
                Self::Delimited
            }
            _ => Self::Workbook,
        }
    }
}

/// Parses an uploaded buffer into product rows using the given decoder.
///
/// # Errors
/// Returns [`Error::UnreadableUpload`] only when the container itself cannot
/// be opened; data-level problems are absorbed row by row.
pub fn parse_upload(format: UploadFormat, bytes: &[u8]) -> Result<Vec<ProductRow>> {
    match format {
        UploadFormat::Delimited => Ok(parse_delimited(bytes)),
        UploadFormat::Workbook => parse_workbook(bytes),
    }
}

/// Parses comma-delimited text. The first line is a header and is skipped.
///
/// Delimited input has no container structure to corrupt, so this never
/// fails: unreadable records are skipped like any other bad row.
#[must_use]
pub fn parse_delimited(bytes: &[u8]) -> Vec<ProductRow> {
    let text = String::from_utf8_lossy(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        match record {
            Ok(record) => {
                let cells: Vec<Cell> = record.iter().map(Cell::from).collect();
                if let Some(row) = parse_row(&cells) {
                    rows.push(row);
                }
            }
            Err(e) => {
                warn!(error = %e, "skipping unreadable delimited record");
            }
        }
    }
    rows
}

/// Parses the first sheet of a spreadsheet workbook. The first row is a
/// header and is skipped.
///
/// # Errors
/// Returns [`Error::UnreadableUpload`] if the buffer is not a workbook or
/// contains no sheets.
pub fn parse_workbook(bytes: &[u8]) -> Result<Vec<ProductRow>> {
    let mut workbook =
        calamine::open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| {
            Error::UnreadableUpload {
                message: format!("not a readable workbook: {e}"),
            }
        })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::UnreadableUpload {
            message: "workbook has no sheets".to_string(),
        })?
        .map_err(|e| Error::UnreadableUpload {
            message: format!("failed to read first sheet: {e}"),
        })?;

    let mut rows = Vec::new();
    for (index, row) in range.rows().enumerate() {
        if index == 0 {
            continue;
        }
        let cells: Vec<Cell> = row.iter().map(Cell::from).collect();
        if let Some(row) = parse_row(&cells) {
            rows.push(row);
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn full_row(id: &str, name: &str) -> Vec<Cell> {
        let mut cells = vec![text(id), text(name), text("100")];
        // (qty, price) x 3 procurement, then x 3 sales
        for _ in 0..6 {
            cells.push(text("1"));
            cells.push(text("2.0"));
        }
        cells
    }

    #[test]
    fn test_parse_price_strips_currency_and_commas() {
        assert_eq!(parse_price_lenient(&text("$1,234.50")), 1234.5);
        assert_eq!(parse_price_lenient(&text("  € 99,5 ")), 99.5);
        assert_eq!(parse_price_lenient(&text("7.25")), 7.25);
    }

    #[test]
    fn test_parse_price_failures_default_to_zero() {
        assert_eq!(parse_price_lenient(&text("abc")), 0.0);
        assert_eq!(parse_price_lenient(&text("")), 0.0);
        assert_eq!(parse_price_lenient(&Cell::Empty), 0.0);
        assert_eq!(parse_price_lenient(&Cell::Number(f64::NAN)), 0.0);
    }

    #[test]
    fn test_parse_price_native_number_passes_through() {
        assert_eq!(parse_price_lenient(&Cell::Number(12.75)), 12.75);
    }

    #[test]
    fn test_parse_int_failures_default_to_zero() {
        assert_eq!(parse_int_lenient(&text("")), 0);
        assert_eq!(parse_int_lenient(&text("abc")), 0);
        assert_eq!(parse_int_lenient(&Cell::Empty), 0);
    }

    #[test]
    fn test_parse_int_accepts_integers_and_truncates_floats() {
        assert_eq!(parse_int_lenient(&text("42")), 42);
        assert_eq!(parse_int_lenient(&text("-7")), -7);
        assert_eq!(parse_int_lenient(&text("3.9")), 3);
        assert_eq!(parse_int_lenient(&Cell::Number(5.7)), 5);
    }

    #[test]
    fn test_short_row_is_skipped_without_error() {
        let cells = vec![text("P1"), text("Widget"), text("10")];
        assert!(parse_row(&cells).is_none());

        let mut fourteen = full_row("P1", "Widget");
        fourteen.truncate(14);
        assert!(parse_row(&fourteen).is_none());
    }

    #[test]
    fn test_row_missing_id_or_name_is_skipped() {
        let mut no_id = full_row("  ", "Widget");
        assert!(parse_row(&no_id).is_none());
        no_id[0] = text("P1");
        no_id[1] = text("");
        assert!(parse_row(&no_id).is_none());
    }

    #[test]
    fn test_row_with_bad_numeric_cells_still_parses() {
        let mut cells = full_row("P1", "Widget");
        cells[2] = text("not-a-number");
        cells[4] = text("abc");
        let row = parse_row(&cells).unwrap();
        assert_eq!(row.opening_inventory, 0);
        assert_eq!(row.procurement_price[0], 0.0);
        assert_eq!(row.procurement_qty[0], 1);
    }

    #[test]
    fn test_column_mapping() {
        let cells: Vec<Cell> = [
            "P9", "Thing", "100", // id, name, opening
            "10", "2.50", "0", "0.0", "5", "2.40", // procurement pairs
            "20", "4.99", "5", "4.99", "0", "0.0", // sales pairs
        ]
        .iter()
        .map(|s| text(s))
        .collect();

        let row = parse_row(&cells).unwrap();
        assert_eq!(row.opening_inventory, 100);
        assert_eq!(row.procurement_qty, [10, 0, 5]);
        assert_eq!(row.procurement_price, [2.5, 0.0, 2.4]);
        assert_eq!(row.sales_qty, [20, 5, 0]);
        assert_eq!(row.sales_price, [4.99, 4.99, 0.0]);
    }

    #[test]
    fn test_numeric_workbook_id_renders_without_decimal_point() {
        let mut cells = full_row("x", "Widget");
        cells[0] = Cell::Number(101.0);
        let row = parse_row(&cells).unwrap();
        assert_eq!(row.id, "101");
    }

    #[test]
    fn test_parse_delimited_skips_header_and_bad_rows() {
        let csv_data = "\
id,name,opening,p1q,p1p,p2q,p2p,p3q,p3p,s1q,s1p,s2q,s2p,s3q,s3p
P001,Widget,100,10,2.50,0,0,5,2.40,20,4.99,5,4.99,0,0
short,row
,NoId,100,1,1,1,1,1,1,1,1,1,1,1,1
P002,Gadget,50,5,\"$1,234.50\",0,0,0,0,2,10,1,10,0,0
";
        let rows = parse_delimited(csv_data.as_bytes());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "P001");
        assert_eq!(rows[0].procurement_qty, [10, 0, 5]);
        assert_eq!(rows[1].id, "P002");
        assert_eq!(rows[1].procurement_price[0], 1234.5);
    }

    #[test]
    fn test_parse_workbook_rejects_garbage_container() {
        let result = parse_workbook(b"definitely not a workbook");
        assert!(matches!(
            result.unwrap_err(),
            Error::UnreadableUpload { message: _ }
        ));
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(
            UploadFormat::detect(Some("data.csv"), None),
            UploadFormat::Delimited
        );
        assert_eq!(
            UploadFormat::detect(Some("Data.XLSX"), Some("application/octet-stream")),
            UploadFormat::Workbook
        );
        assert_eq!(
            UploadFormat::detect(None, Some("text/csv")),
            UploadFormat::Delimited
        );
        assert_eq!(UploadFormat::detect(None, None), UploadFormat::Workbook);
    }
}
