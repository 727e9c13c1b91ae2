// crates/courseqa-core/src/loader.rs

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::types::{Severity, Status};

pub const REQUIRED_COLUMNS: [&str; 11] = [
    "issue_id",
    "course_name",
    "unit",
    "item_id",
    "item_type",
    "status",
    "severity",
    "reporter",
    "assignee",
    "created_at",
    "updated_at",
];

pub const OPTIONAL_TEXT_COLUMNS: [&str; 3] = ["notes", "browser", "environment"];

/// Parses an uploaded issue table (delimited text with a header row) into a
/// normalized DataFrame: header names trimmed and lower-cased, timestamps as
/// UTC-microsecond datetimes, status/severity canonicalized to their fixed
/// value sets. Absent optional columns stay absent; they are never
/// back-filled for uploads. No partial frame is ever returned.
pub fn load_issues(contents: &[u8]) -> Result<DataFrame> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(contents);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|name| name.trim().to_lowercase())
        .collect();
    let index: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.as_str(), idx))
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !index.contains_key(**name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::Schema(missing));
    }

    let mut required: HashMap<&str, Vec<String>> = REQUIRED_COLUMNS[..9]
        .iter()
        .map(|name| (*name, Vec::new()))
        .collect();
    let mut created_at: Vec<i64> = Vec::new();
    let mut updated_at: Vec<i64> = Vec::new();
    let mut sla_days: Option<Vec<i64>> = index.get("sla_days").map(|_| Vec::new());
    let mut optional_text: Vec<(&str, Vec<String>)> = OPTIONAL_TEXT_COLUMNS
        .iter()
        .filter(|name| index.contains_key(**name))
        .map(|name| (*name, Vec::new()))
        .collect();

    for record in reader.records() {
        let record = record?;

        for name in &REQUIRED_COLUMNS[..9] {
            let raw = field(&record, &index, name);
            let value = match *name {
                "status" => Status::try_from(raw)
                    .map_err(|_| PipelineError::parse("status", raw))?
                    .as_str()
                    .to_string(),
                "severity" => Severity::try_from(raw)
                    .map_err(|_| PipelineError::parse("severity", raw))?
                    .as_str()
                    .to_string(),
                _ => raw.to_string(),
            };
            required
                .get_mut(name)
                .expect("required column buffer missing")
                .push(value);
        }

        created_at.push(parse_timestamp(
            "created_at",
            field(&record, &index, "created_at"),
        )?);
        updated_at.push(parse_timestamp(
            "updated_at",
            field(&record, &index, "updated_at"),
        )?);

        if let Some(values) = sla_days.as_mut() {
            let raw = field(&record, &index, "sla_days");
            let parsed = raw
                .parse::<i64>()
                .map_err(|_| PipelineError::parse("sla_days", raw))?;
            values.push(parsed);
        }

        for (name, values) in optional_text.iter_mut() {
            values.push(field(&record, &index, name).to_string());
        }
    }

    let mut columns: Vec<Column> = Vec::new();
    for name in &REQUIRED_COLUMNS[..9] {
        let values = required.remove(name).expect("required column buffer missing");
        columns.push(Series::new((*name).into(), values).into());
    }
    columns.push(timestamp_series("created_at", created_at)?.into());
    columns.push(timestamp_series("updated_at", updated_at)?.into());
    if let Some(values) = sla_days {
        columns.push(Series::new("sla_days".into(), values).into());
    }
    for (name, values) in optional_text {
        columns.push(Series::new(name.into(), values).into());
    }

    let df = DataFrame::new(columns)?;
    debug!(rows = df.height(), "loaded issue table");
    Ok(df)
}

fn field<'a>(record: &'a csv::StringRecord, index: &HashMap<&str, usize>, column: &str) -> &'a str {
    index
        .get(column)
        .and_then(|idx| record.get(*idx))
        .unwrap_or("")
        .trim()
}

fn timestamp_series(name: &str, micros: Vec<i64>) -> Result<Series> {
    let series = Series::new(name.into(), micros)
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?;
    Ok(series)
}

/// Accepts the common spellings of an ISO-like timestamp; date-only values
/// are taken at midnight.
fn parse_timestamp(column: &str, value: &str) -> Result<i64> {
    static FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
    ];

    let trimmed = value.trim();
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt.and_utc().timestamp_micros());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_micros());
    }
    Err(PipelineError::parse(column, trimmed))
}
