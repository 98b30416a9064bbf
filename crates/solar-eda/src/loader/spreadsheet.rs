//! Worksheet reader for xlsx/xlsm/xlsb/xls/ods uploads.

use std::io::Cursor;

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use polars::prelude::*;
use tracing::debug;

use crate::error::{EdaError, Result};

static EMPTY_CELL: Data = Data::Empty;

/// Read one worksheet into a frame. The first row is the header.
///
/// A column becomes Float64 when every non-empty cell is numeric (booleans
/// count as 1/0); otherwise it is kept as text. Error cells are missing.
pub(crate) fn read_sheet(bytes: &[u8], sheet: Option<&str>) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

    let range = match sheet {
        Some(name) => {
            if !workbook.sheet_names().iter().any(|n| n == name) {
                return Err(EdaError::SheetNotFound(name.to_string()));
            }
            workbook.worksheet_range(name)?
        }
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| EdaError::EmptyDataset("workbook has no sheets".to_string()))??,
    };

    range_to_frame(&range)
}

fn range_to_frame(range: &Range<Data>) -> Result<DataFrame> {
    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| EdaError::EmptyDataset("sheet has no header row".to_string()))?;
    let body: Vec<&[Data]> = rows.collect();
    debug!("Sheet has {} columns and {} data rows", header.len(), body.len());

    let mut columns = Vec::with_capacity(header.len());
    for (idx, head) in header.iter().enumerate() {
        let name = cell_text(head).unwrap_or_else(|| format!("column_{idx}"));
        let cells = body.iter().map(|row| row.get(idx).unwrap_or(&EMPTY_CELL));

        let all_numeric = cells
            .clone()
            .all(|cell| cell_is_blank(cell) || cell_number(cell).is_some());

        let series = if all_numeric {
            let values: Float64Chunked = cells.map(cell_number).collect();
            values.with_name(name.into()).into_series()
        } else {
            let values: StringChunked = cells.map(cell_text).collect();
            values.with_name(name.into()).into_series()
        };
        columns.push(series.into_column());
    }

    Ok(DataFrame::new(columns)?)
}

fn cell_is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty | Data::Error(_) => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn cell_text(cell: &Data) -> Option<String> {
    if cell_is_blank(cell) {
        return None;
    }
    match cell {
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string()),
        Data::String(s) => Some(s.trim().to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(rows: Vec<Vec<Data>>) -> Range<Data> {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in rows.into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                range.set_value((r as u32, c as u32), cell);
            }
        }
        range
    }

    #[test]
    fn test_numeric_and_text_columns() {
        let sheet = range(vec![
            vec![Data::String("GHI".into()), Data::String("Comments".into())],
            vec![Data::Float(1.5), Data::Empty],
            vec![Data::Int(-2), Data::String("dusty".into())],
        ]);
        let df = range_to_frame(&sheet).unwrap();

        assert_eq!(df.shape(), (2, 2));
        assert_eq!(df.column("GHI").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("Comments").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("Comments").unwrap().null_count(), 1);
    }

    #[test]
    fn test_mixed_column_kept_as_text() {
        let sheet = range(vec![
            vec![Data::String("WS".into())],
            vec![Data::Float(1.0)],
            vec![Data::String("calm".into())],
        ]);
        let df = range_to_frame(&sheet).unwrap();
        assert_eq!(df.column("WS").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_blank_header_gets_placeholder() {
        let sheet = range(vec![
            vec![Data::Empty, Data::String("ghi".into())],
            vec![Data::Float(1.0), Data::Float(2.0)],
        ]);
        let df = range_to_frame(&sheet).unwrap();
        assert!(df.column("column_0").is_ok());
    }

    #[test]
    fn test_not_a_workbook() {
        assert!(read_sheet(b"GHI,DNI\n1,2\n", None).is_err());
    }
}
