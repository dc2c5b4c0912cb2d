//! Next-day prediction from a daily feature table.

use crate::artifact::ModelArtifact;
use crate::error::Result;
use aq_core::DailyFeatureRow;
use aq_features::{assemble_next_day, NextDayFeatures};
use log::{info, warn};

/// Rows needed before lag-7 and moving-average features are trusted.
pub const MIN_STABLE_ROWS: usize = 10;

/// A completed prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Last observed day of the table.
    pub latest: DailyFeatureRow,
    /// Inputs handed to the regressor.
    pub features: NextDayFeatures,
    /// Predicted daily mean PM2.5 for `features.target_date`.
    pub pm25: f64,
}

/// Outcome of a forecast request.
#[derive(Debug, Clone, PartialEq)]
pub enum Forecast {
    /// Too few complete days to predict; the caller should warn, not retry.
    InsufficientData { rows: usize, required: usize },
    Predicted(Prediction),
}

/// Predict the day after the last row of `table`.
///
/// A short table is a normal outcome, not an error. A feature vector that
/// does not fit the artifact's schema is an error and is propagated.
pub fn forecast_next_day(
    table: &[DailyFeatureRow],
    artifact: &ModelArtifact,
    min_rows: usize,
) -> Result<Forecast> {
    let required = min_rows.max(1);
    let (Some(latest), Some(features)) = (table.last(), assemble_next_day(table)) else {
        warn!("No complete daily rows; skipping prediction");
        return Ok(Forecast::InsufficientData { rows: 0, required });
    };
    if table.len() < required {
        warn!(
            "Only {} complete daily rows (need {}); skipping prediction",
            table.len(),
            required
        );
        return Ok(Forecast::InsufficientData {
            rows: table.len(),
            required,
        });
    }
    let pm25 = artifact.predict_next_day(&features)?;
    info!(
        "Predicted PM2.5 for {}: {:.1} (anchor {} at {:.1})",
        features.target_date, pm25, latest.date, latest.pm25
    );
    Ok(Forecast::Predicted(Prediction {
        latest: *latest,
        features,
        pm25,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::regressor::Regressor;
    use aq_features::{SchemaMismatch, FEATURE_COLUMNS};
    use chrono::{Duration, NaiveDate};

    fn rows(n: usize) -> Vec<DailyFeatureRow> {
        let first = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        (0..n)
            .map(|i| DailyFeatureRow {
                date: first + Duration::days(i as i64),
                pm25: 10.0 * (i + 1) as f64,
                temperature: 15.0,
                relativehumidity: 60.0,
                windspeed: 2.0,
                pm25_lag_1: 0.0,
                pm25_lag_2: 0.0,
                pm25_lag_3: 0.0,
                pm25_lag_7: 0.0,
                pm25_ma_3: 0.0,
                dayofyear: 8 + i as u32,
            })
            .collect()
    }

    /// Predicts `pm25_lag_1`, wherever the schema puts it.
    fn persistence_model(order: &[&str]) -> ModelArtifact {
        ModelArtifact {
            features: order.iter().map(|s| s.to_string()).collect(),
            model: Regressor::Linear {
                intercept: 0.0,
                coefficients: order
                    .iter()
                    .map(|name| if *name == "pm25_lag_1" { 1.0 } else { 0.0 })
                    .collect(),
            },
        }
    }

    #[test]
    fn test_empty_table_is_insufficient() {
        let artifact = persistence_model(&FEATURE_COLUMNS);
        let forecast = forecast_next_day(&[], &artifact, MIN_STABLE_ROWS).unwrap();
        assert_eq!(
            forecast,
            Forecast::InsufficientData {
                rows: 0,
                required: 10
            }
        );
    }

    #[test]
    fn test_short_table_is_insufficient() {
        let artifact = persistence_model(&FEATURE_COLUMNS);
        let forecast = forecast_next_day(&rows(9), &artifact, MIN_STABLE_ROWS).unwrap();
        assert_eq!(
            forecast,
            Forecast::InsufficientData {
                rows: 9,
                required: 10
            }
        );
    }

    #[test]
    fn test_prediction() {
        let mut order = FEATURE_COLUMNS;
        order.swap(0, 3);
        let artifact = persistence_model(&order);
        let table = rows(12);
        let Forecast::Predicted(prediction) =
            forecast_next_day(&table, &artifact, MIN_STABLE_ROWS).unwrap()
        else {
            panic!("expected a prediction");
        };
        assert_eq!(prediction.pm25, 120.0);
        assert_eq!(prediction.latest, table[11]);
        assert_eq!(
            prediction.features.target_date,
            NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()
        );
    }

    #[test]
    fn test_schema_mismatch_propagates() {
        let mut order = FEATURE_COLUMNS;
        order[4] = "pm10";
        let artifact = persistence_model(&order);
        let err = forecast_next_day(&rows(12), &artifact, MIN_STABLE_ROWS).unwrap_err();
        assert!(matches!(
            err,
            ModelError::SchemaMismatch(SchemaMismatch::UnknownFeature(_))
        ));
    }
}
