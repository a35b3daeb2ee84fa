use std::io::Read;
use std::path::Path;

use super::record::{FeatureRecord, FeatureValue};

#[derive(Debug)]
pub enum RecordImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for RecordImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordImportError::Io(err) => write!(f, "failed to read record export: {}", err),
            RecordImportError::Csv(err) => write!(f, "invalid record CSV data: {}", err),
        }
    }
}

impl std::error::Error for RecordImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecordImportError::Io(err) => Some(err),
            RecordImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for RecordImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RecordImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub fn records_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<FeatureRecord>, RecordImportError> {
    let file = std::fs::File::open(path)?;
    records_from_csv(file)
}

/// Read one feature record per CSV row, keyed by the header row.
///
/// Blank and `N/A` cells are left out of the record so the encoder applies
/// the field default.
pub fn records_from_csv<R: Read>(reader: R) -> Result<Vec<FeatureRecord>, RecordImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut records = Vec::new();

    for row in csv_reader.records() {
        let row = row?;
        let record = headers
            .iter()
            .zip(row.iter())
            .filter_map(|(column, cell)| cell_value(cell).map(|value| (column, value)))
            .collect::<FeatureRecord>();
        records.push(record);
    }

    tracing::debug!(rows = records.len(), "imported feature records from CSV");
    Ok(records)
}

fn cell_value(cell: &str) -> Option<FeatureValue> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("n/a") {
        return None;
    }
    match cell.parse::<f64>() {
        Ok(number) if number.is_finite() => Some(FeatureValue::Number(number)),
        _ => Some(FeatureValue::Text(cell.to_string())),
    }
}
