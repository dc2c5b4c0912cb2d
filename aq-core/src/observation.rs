use crate::error::Result;
use crate::timestamp::IntoInstant;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Map `NaN` readings to missing so downstream means never see them.
pub fn defined(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

/// A single hourly PM2.5 reading in µg/m³.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PollutantObservation {
    pub timestamp: NaiveDateTime,
    pub pm25: Option<f64>,
}

impl PollutantObservation {
    /// Build an observation, normalizing the timestamp to UTC and `NaN` to
    /// missing.
    pub fn new(timestamp: impl IntoInstant, pm25: Option<f64>) -> Result<Self> {
        Ok(PollutantObservation {
            timestamp: timestamp.into_instant()?,
            pm25: defined(pm25),
        })
    }

    /// Calendar day (UTC) the reading belongs to.
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// A single hourly meteorology reading: temperature (°C), relative
/// humidity (%) and wind speed (km/h).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeteoObservation {
    pub timestamp: NaiveDateTime,
    pub temperature: Option<f64>,
    pub relativehumidity: Option<f64>,
    pub windspeed: Option<f64>,
}

impl MeteoObservation {
    pub fn new(
        timestamp: impl IntoInstant,
        temperature: Option<f64>,
        relativehumidity: Option<f64>,
        windspeed: Option<f64>,
    ) -> Result<Self> {
        Ok(MeteoObservation {
            timestamp: timestamp.into_instant()?,
            temperature: defined(temperature),
            relativehumidity: defined(relativehumidity),
            windspeed: defined(windspeed),
        })
    }

    pub fn day(&self) -> NaiveDate {
        self.timestamp.date()
    }
}
