//! FILENAME: core/ingest/src/csv_reader.rs
//! Loads the measurement CSV into a Frame.
//!
//! Header names are standardized (trimmed, lowercased, spaces to
//! underscores) so downstream code can rely on `reach_imp` etc. The
//! `month` column is parsed into calendar months; a cell that fails to
//! parse becomes Empty rather than aborting the load, matching how the
//! rest of the pipeline treats missing data.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use table::{Frame, Month, Value};

use crate::error::IngestError;

/// Column whose cells are parsed as calendar months.
const MONTH_COLUMN: &str = "month";

/// Loads a CSV file with a header row.
pub fn load_table(path: impl AsRef<Path>) -> Result<Frame, IngestError> {
    let file = File::open(path)?;
    read_table(BufReader::new(file))
}

/// Reads a CSV stream with a header row into a Frame.
pub fn read_table<R: Read>(reader: R) -> Result<Frame, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        // accept rows with varying field counts; short rows pad Empty
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();

    let mut frame = Frame::new(headers.clone())?;
    for record in csv_reader.records() {
        let record = record?;
        let row: Vec<Value> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| parse_cell(name, record.get(i).unwrap_or("")))
            .collect();
        frame.push_row(row)?;
    }
    Ok(frame)
}

/// Standardizes a raw header name.
fn normalize_header(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

fn parse_cell(column: &str, raw: &str) -> Value {
    let raw = raw.trim();
    if raw.is_empty() {
        return Value::Empty;
    }
    if column == MONTH_COLUMN {
        return match Month::parse(raw) {
            Some(month) => Value::Month(month),
            None => Value::Empty,
        };
    }
    match raw.parse::<f64>() {
        Ok(number) => Value::Number(number),
        Err(_) => Value::text(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Month,Daypart,Demographic,Characteristic,Reach Imp,GRP Imp
Mar 2025,Total Day,Persons 18+,$25K+,400,1200
Mar 2025,Total Day,Persons 18+,$50K+,250,750
not-a-month,Prime,Persons 18+,$25K+,10,30
Mar 2025,Prime,Persons 18+,$25K+,,30
";

    #[test]
    fn test_headers_are_standardized() {
        let frame = read_table(SAMPLE.as_bytes()).unwrap();
        assert_eq!(
            frame.columns(),
            &[
                "month",
                "daypart",
                "demographic",
                "characteristic",
                "reach_imp",
                "grp_imp"
            ]
        );
    }

    #[test]
    fn test_cells_are_typed() {
        let frame = read_table(SAMPLE.as_bytes()).unwrap();
        let month = frame.column_index("month").unwrap();
        let reach = frame.column_index("reach_imp").unwrap();
        let characteristic = frame.column_index("characteristic").unwrap();

        assert_eq!(
            frame.value(0, month),
            &Value::Month(Month::parse("2025-03").unwrap())
        );
        assert_eq!(frame.value(0, reach), &Value::Number(400.0));
        assert_eq!(frame.value(0, characteristic), &Value::text("$25K+"));
    }

    #[test]
    fn test_unparseable_month_coerces_to_empty() {
        let frame = read_table(SAMPLE.as_bytes()).unwrap();
        let month = frame.column_index("month").unwrap();
        assert_eq!(frame.value(2, month), &Value::Empty);
    }

    #[test]
    fn test_blank_cell_is_empty() {
        let frame = read_table(SAMPLE.as_bytes()).unwrap();
        let reach = frame.column_index("reach_imp").unwrap();
        assert_eq!(frame.value(3, reach), &Value::Empty);
    }

    #[test]
    fn test_short_record_pads_empty() {
        let csv = "month,daypart,reach_imp\nMar 2025,Prime\n";
        let frame = read_table(csv.as_bytes()).unwrap();
        let reach = frame.column_index("reach_imp").unwrap();
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.value(0, reach), &Value::Empty);
    }
}
