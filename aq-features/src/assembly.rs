//! Prediction assembly: the feature vector for the day after the last row
//! of the daily table.
//!
//! A trained regressor sees bare numbers, not column names, so the vector is
//! kept as a named record and only flattened through
//! [`NextDayFeatures::ordered_for`], which checks the requested order against
//! the known columns.

use aq_core::DailyFeatureRow;
use aq_utils::dates::{day_of_year, next_day};
use chrono::NaiveDate;
use thiserror::Error;

/// Feature columns in the order the reference model was trained with.
pub const FEATURE_COLUMNS: [&str; 9] = [
    "temperature",
    "relativehumidity",
    "windspeed",
    "pm25_lag_1",
    "pm25_lag_2",
    "pm25_lag_3",
    "pm25_lag_7",
    "pm25_ma_3",
    "dayofyear",
];

/// A model schema that cannot be satisfied by the assembled features.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaMismatch {
    #[error("model expects {expected} features, the feature vector has {actual}")]
    Count { expected: usize, actual: usize },

    #[error("model expects unknown feature {0:?}")]
    UnknownFeature(String),

    #[error("feature {0:?} appears more than once in the model schema")]
    DuplicateFeature(String),
}

/// Inputs for predicting the day after `anchor_date`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NextDayFeatures {
    pub anchor_date: NaiveDate,
    pub target_date: NaiveDate,
    pub temperature: f64,
    pub relativehumidity: f64,
    pub windspeed: f64,
    pub pm25_lag_1: f64,
    pub pm25_lag_2: f64,
    pub pm25_lag_3: f64,
    pub pm25_lag_7: f64,
    pub pm25_ma_3: f64,
    pub dayofyear: u32,
}

impl NextDayFeatures {
    /// Value of a feature column by name.
    pub fn get(&self, name: &str) -> Option<f64> {
        let value = match name {
            "temperature" => self.temperature,
            "relativehumidity" => self.relativehumidity,
            "windspeed" => self.windspeed,
            "pm25_lag_1" => self.pm25_lag_1,
            "pm25_lag_2" => self.pm25_lag_2,
            "pm25_lag_3" => self.pm25_lag_3,
            "pm25_lag_7" => self.pm25_lag_7,
            "pm25_ma_3" => self.pm25_ma_3,
            "dayofyear" => f64::from(self.dayofyear),
            _ => return None,
        };
        Some(value)
    }

    /// `(name, value)` pairs in exactly the order of `schema`.
    ///
    /// The schema must name every feature column once and nothing else.
    pub fn ordered_for<S: AsRef<str>>(
        &self,
        schema: &[S],
    ) -> Result<Vec<(&'static str, f64)>, SchemaMismatch> {
        if schema.len() != FEATURE_COLUMNS.len() {
            return Err(SchemaMismatch::Count {
                expected: schema.len(),
                actual: FEATURE_COLUMNS.len(),
            });
        }
        let mut seen = [false; FEATURE_COLUMNS.len()];
        let mut ordered = Vec::with_capacity(schema.len());
        for name in schema {
            let name = name.as_ref();
            let index = FEATURE_COLUMNS
                .iter()
                .position(|column| *column == name)
                .ok_or_else(|| SchemaMismatch::UnknownFeature(name.to_string()))?;
            if seen[index] {
                return Err(SchemaMismatch::DuplicateFeature(name.to_string()));
            }
            seen[index] = true;
            let column = FEATURE_COLUMNS[index];
            let value = self
                .get(column)
                .ok_or_else(|| SchemaMismatch::UnknownFeature(name.to_string()))?;
            ordered.push((column, value));
        }
        Ok(ordered)
    }

    /// Bare values in the order of `schema`, ready for a regressor.
    pub fn values_for<S: AsRef<str>>(&self, schema: &[S]) -> Result<Vec<f64>, SchemaMismatch> {
        Ok(self
            .ordered_for(schema)?
            .into_iter()
            .map(|(_, value)| value)
            .collect())
    }
}

/// `pm25` of the row `n` positions from the end (`n = 1` is the last row).
fn pm25_from_end(table: &[DailyFeatureRow], n: usize) -> Option<f64> {
    table.len().checked_sub(n).map(|i| table[i].pm25)
}

/// Build the feature vector for the day after the last row of `table`.
///
/// Returns `None` for an empty table. Short tables degrade instead of
/// failing: a lag reaching past the head of the table uses the anchor's own
/// `pm25`, and the moving average covers whatever rows exist.
pub fn assemble_next_day(table: &[DailyFeatureRow]) -> Option<NextDayFeatures> {
    let anchor = table.last()?;
    let lag_or_anchor = |n: usize| pm25_from_end(table, n).unwrap_or(anchor.pm25);

    let window = &table[table.len().saturating_sub(3)..];
    let pm25_ma_3 = window.iter().map(|row| row.pm25).sum::<f64>() / window.len() as f64;

    let target_date = next_day(&anchor.date);
    Some(NextDayFeatures {
        anchor_date: anchor.date,
        target_date,
        temperature: anchor.temperature,
        relativehumidity: anchor.relativehumidity,
        windspeed: anchor.windspeed,
        pm25_lag_1: anchor.pm25,
        pm25_lag_2: lag_or_anchor(2),
        pm25_lag_3: lag_or_anchor(3),
        pm25_lag_7: lag_or_anchor(7),
        pm25_ma_3,
        dayofyear: day_of_year(&target_date),
    })
}
