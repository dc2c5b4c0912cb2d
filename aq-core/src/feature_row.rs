use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One fully-defined day of the feature table.
///
/// Rows only exist once every column is known; the builder discards any day
/// whose lags, moving average or base means are missing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyFeatureRow {
    pub date: NaiveDate,
    pub pm25: f64,
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

/// Column names of the exported table, in export order.
pub const FEATURE_TABLE_COLUMNS: [&str; 11] = [
    "date",
    "pm25",
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
