use crate::config::ColumnNames;
use crate::data::observation::{Observation, PriceSeries, SeriesError};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate};
use csv::{ReaderBuilder, StringRecord};
use std::path::Path;

//parses a calendar date in one of the accepted layouts
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive())
}

fn column_index(headers: &StringRecord, label: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == label)
}

fn required_column(headers: &StringRecord, label: &str) -> Result<usize> {
    column_index(headers, label).ok_or_else(|| {
        SeriesError::MissingColumn {
            column: label.to_string(),
        }
        .into()
    })
}

fn parse_optional(record: &StringRecord, index: Option<usize>, line: usize) -> Result<Option<f64>> {
    let Some(index) = index else {
        return Ok(None);
    };

    match record.get(index).map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<f64>()
            .map(Some)
            .context(format!("Failed to parse number '{}' at line {}", raw, line)),
    }
}

//loads a price series from a csv file with the given header labels
//rows are kept in file order, the series constructor rejects unordered dates
pub fn load_csv<P: AsRef<Path>>(path: P, columns: &ColumnNames) -> Result<PriceSeries> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .context(format!("Failed to open CSV file: {:?}", path))?;

    let headers = reader.headers()?.clone();
    let date_idx = required_column(&headers, &columns.date)?;
    let close_idx = required_column(&headers, &columns.close)?;
    let high_idx = column_index(&headers, &columns.high);
    let low_idx = column_index(&headers, &columns.low);
    let pct_idx = column_index(&headers, &columns.pct_change);

    let mut observations = Vec::new();

    for (index, result) in reader.records().enumerate() {
        let line = index + 2;
        let record = result.context(format!("Failed to parse CSV record at line {}", line))?;

        let raw_date = record.get(date_idx).unwrap_or_default();
        let date = parse_date(raw_date).with_context(|| {
            format!("Failed to parse date '{}' at line {}", raw_date, line)
        })?;

        let close = parse_optional(&record, Some(close_idx), line)?
            .with_context(|| format!("Missing close price at line {}", line))?;

        observations.push(Observation {
            date,
            close,
            high: parse_optional(&record, high_idx, line)?,
            low: parse_optional(&record, low_idx, line)?,
            pct_change: parse_optional(&record, pct_idx, line)?,
        });
    }

    log::info!(
        "Loaded {} observations from {:?}",
        observations.len(),
        path
    );

    Ok(PriceSeries::new(observations)?)
}
