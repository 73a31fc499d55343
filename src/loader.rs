use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::{DashboardError, DashboardResult};
use crate::models::{Column, SleepRecord, Value};

pub fn load_csv(path: &Path) -> DashboardResult<Vec<SleepRecord>> {
    let file = std::fs::File::open(path)?;
    let records = read_records(file)?;
    tracing::debug!(path = %path.display(), rows = records.len(), "loaded records");
    Ok(records)
}

pub fn read_records<R: Read>(source: R) -> DashboardResult<Vec<SleepRecord>> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(source);
    let headers = reader.headers()?.clone();
    check_headers(&headers)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        records.push(parse_row(&row, &headers)?);
    }

    Ok(records)
}

fn check_headers(headers: &StringRecord) -> DashboardResult<()> {
    for column in Column::ALL {
        if !headers.iter().any(|h| h == column.name()) {
            return Err(DashboardError::MissingColumn {
                column: column.name().to_string(),
            });
        }
    }
    Ok(())
}

fn parse_row(row: &StringRecord, headers: &StringRecord) -> DashboardResult<SleepRecord> {
    let line = row.position().map(|p| p.line()).unwrap_or_default();
    let record: SleepRecord = row.deserialize(Some(headers)).map_err(|err| {
        let field = match err.kind() {
            csv::ErrorKind::Deserialize { err, .. } => err.field(),
            _ => None,
        };
        match field.and_then(|i| headers.get(i as usize)) {
            Some(column) => DashboardError::CellTypeMismatch {
                column: column.to_string(),
                row: line,
                value: field
                    .and_then(|i| row.get(i as usize))
                    .unwrap_or_default()
                    .to_string(),
            },
            None => DashboardError::Csv(err),
        }
    })?;

    // NaN and inf parse as f64 but would poison every mean they touch
    for column in Column::ALL.into_iter().filter(|c| c.is_numeric()) {
        if let Value::Number(n) = record.value(column) {
            if !n.is_finite() {
                let raw = headers
                    .iter()
                    .position(|h| h == column.name())
                    .and_then(|i| row.get(i))
                    .unwrap_or_default();
                return Err(DashboardError::CellTypeMismatch {
                    column: column.name().to_string(),
                    row: line,
                    value: raw.to_string(),
                });
            }
        }
    }

    Ok(record)
}
