use std::fmt;
use std::io::{self, Read};

use serde::Deserialize;
use tracing::warn;

use crate::domain::{Amount, Ledger};

/// Result of an import operation
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub errors: Vec<ImportRowError>,
}

/// A row that was skipped during import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRowError {
    pub line: usize,
    pub field: Option<String>,
    pub error: String,
}

impl fmt::Display for ImportRowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "line {}: {}: {}", self.line, field, self.error),
            None => write!(f, "line {}: {}", self.line, self.error),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    amount: String,
    description: String,
}

/// Appends CSV rows (`amount`, `description` columns) to a ledger.
pub struct Importer<'a> {
    ledger: &'a mut Ledger,
}

impl<'a> Importer<'a> {
    pub fn new(ledger: &'a mut Ledger) -> Self {
        Self { ledger }
    }

    /// Import every readable row. Rows that fail to parse are recorded in
    /// the result and skipped; the rest are still imported.
    ///
    /// A failure to read from `reader` itself is returned as an error. Rows
    /// added before it stay in the ledger, so callers should discard it.
    pub fn import_csv<R: Read>(&mut self, reader: R) -> io::Result<ImportResult> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(reader);
        let mut result = ImportResult::default();

        let headers = match csv_reader.headers() {
            Ok(headers) => headers.clone(),
            Err(e) if e.is_io_error() => return Err(into_io_error(e)),
            Err(e) => {
                result.errors.push(row_error(1, None, format!("CSV header error: {}", e)));
                return Ok(result);
            }
        };

        for (line_num, record) in csv_reader.records().enumerate() {
            let line = line_num + 2; // +2 for header and 0-indexing

            let record = match record {
                Ok(r) => r,
                Err(e) if e.is_io_error() => return Err(into_io_error(e)),
                Err(e) => {
                    result.errors.push(row_error(line, None, format!("CSV parse error: {}", e)));
                    continue;
                }
            };

            let row: CsvRow = match record.deserialize(Some(&headers)) {
                Ok(row) => row,
                Err(e) => {
                    result.errors.push(row_error(line, None, format!("Invalid row: {}", e)));
                    continue;
                }
            };

            let amount = match row.amount.parse::<Amount>() {
                Ok(a) => a,
                Err(e) => {
                    result.errors.push(row_error(line, Some("amount"), e.to_string()));
                    continue;
                }
            };

            match self.ledger.add(amount, row.description) {
                Ok(_) => result.imported += 1,
                Err(e) => result.errors.push(row_error(line, Some("amount"), e.to_string())),
            }
        }

        Ok(result)
    }
}

fn into_io_error(err: csv::Error) -> io::Error {
    match err.into_kind() {
        csv::ErrorKind::Io(err) => err,
        kind => io::Error::other(format!("{kind:?}")),
    }
}

fn row_error(line: usize, field: Option<&str>, error: String) -> ImportRowError {
    let error = ImportRowError {
        line,
        field: field.map(str::to_string),
        error,
    };
    warn!("skipping CSV {}", error);
    error
}
