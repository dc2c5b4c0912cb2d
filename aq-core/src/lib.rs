//! Core types for the PM2.5 pipeline: hourly observations, timestamp
//! normalization, the daily feature row, CSV interchange and (behind the
//! `api` feature) the Open-Meteo fetch client.

pub mod csv_io;
pub mod error;
pub mod feature_row;
pub mod observation;
#[cfg(feature = "api")]
pub mod open_meteo;
pub mod timestamp;

pub use error::ObservationError;
#[cfg(feature = "api")]
pub use error::FetchError;
pub use feature_row::DailyFeatureRow;
pub use observation::{MeteoObservation, PollutantObservation};
