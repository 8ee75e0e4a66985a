//! Data Processor Module
//! Normalizes the raw table: parses timestamps and derives the registration date.

use super::{COL_EDUCATION, COL_GENDER, COL_INSTITUTION, COL_REGISTRATION_DATE, COL_TIMESTAMP};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta};
use log::warn;
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Date-time layouts tried in order; slash dates are read month first.
const DATETIME_FORMATS: [&str; 7] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Handles data cleaning and transformation operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Return a copy of `df` with `Timestamp` parsed and `Tanggal Pendaftaran` derived.
    ///
    /// Unparseable timestamps become null for that row only. The categorical
    /// filter/aggregation columns are cast to strings.
    pub fn normalize(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let mut out = df.clone();

        let raw = df.column(COL_TIMESTAMP)?.cast(&DataType::String)?;
        let raw = raw.str()?;

        let mut coerced = 0usize;
        let parsed: Vec<Option<NaiveDateTime>> = raw
            .into_iter()
            .map(|value| {
                let value = value?;
                let dt = Self::parse_timestamp(value);
                if dt.is_none() {
                    coerced += 1;
                }
                dt
            })
            .collect();

        if coerced > 0 {
            warn!(
                "{} of {} timestamps could not be parsed and were set to missing",
                coerced,
                parsed.len()
            );
        }

        let millis: Vec<Option<i64>> = parsed
            .iter()
            .map(|dt| dt.map(|dt| dt.and_utc().timestamp_millis()))
            .collect();
        let days: Vec<Option<i32>> = parsed
            .iter()
            .map(|dt| dt.map(|dt| Self::date_to_days(dt.date())))
            .collect();

        let timestamp = Column::new(COL_TIMESTAMP.into(), millis)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
        let date = Column::new(COL_REGISTRATION_DATE.into(), days).cast(&DataType::Date)?;
        out.with_column(timestamp)?;
        out.with_column(date)?;

        for name in [COL_EDUCATION, COL_GENDER, COL_INSTITUTION] {
            let column = out.column(name)?.cast(&DataType::String)?;
            out.with_column(column)?;
        }

        Ok(out)
    }

    /// Parse one raw timestamp. Returns `None` for anything unrecognized.
    pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_local());
        }

        DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .or_else(|| {
                DATE_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
    }

    /// Days since 1970-01-01, the physical value of a Polars `Date`.
    pub fn date_to_days(date: NaiveDate) -> i32 {
        date.signed_duration_since(NaiveDate::default()).num_days() as i32
    }

    /// Inverse of [`DataProcessor::date_to_days`].
    pub fn days_to_date(days: i32) -> Option<NaiveDate> {
        NaiveDate::default().checked_add_signed(TimeDelta::days(days as i64))
    }
}
