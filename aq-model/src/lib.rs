//! Model artifacts for next-day PM2.5 prediction.
//!
//! An artifact pairs a fitted [`Regressor`] with the ordered list of feature
//! names it was fitted on. That order is authoritative: every feature
//! vector is rebuilt in it before evaluation, and any mismatch is a hard
//! [`ModelError::SchemaMismatch`].

pub mod artifact;
pub mod cache;
pub mod error;
pub mod forecast;
pub mod regressor;

pub use artifact::ModelArtifact;
pub use cache::{ModelCache, MODEL_CACHE};
pub use error::ModelError;
pub use forecast::{forecast_next_day, Forecast, Prediction, MIN_STABLE_ROWS};
pub use regressor::{Regressor, TreeNode};
