//! Feature construction for next-day PM2.5 prediction.
//!
//! [`builder`] turns two hourly tables into the daily feature table;
//! [`assembly`] turns the tail of that table into the single feature vector
//! a regressor consumes.

pub mod aggregate;
pub mod assembly;
pub mod builder;

pub use assembly::{assemble_next_day, NextDayFeatures, SchemaMismatch, FEATURE_COLUMNS};
pub use builder::make_daily_features;
