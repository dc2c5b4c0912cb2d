//! Command implementations for the PM2.5 CLI.
//!
//! Provides subcommands for fetching hourly observations, building the
//! daily feature table and predicting the next day's PM2.5.

use aq_utils::dates::parse_date;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use std::path::PathBuf;

pub mod features;
pub mod fetch;
pub mod predict;
pub mod source;

/// Days of history requested when no start date is given.
pub const DEFAULT_HISTORY_DAYS: i64 = 120;

/// Where hourly observations come from: two CSV files, or Open-Meteo at a
/// coordinate.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct SourceArgs {
    /// Hourly PM2.5 CSV (`timestamp,pm25`)
    #[arg(long, requires = "meteo_csv", conflicts_with_all = ["latitude", "longitude"])]
    pub pollutant_csv: Option<PathBuf>,

    /// Hourly meteorology CSV (`timestamp,temperature,relativehumidity,windspeed`)
    #[arg(long, requires = "pollutant_csv")]
    pub meteo_csv: Option<PathBuf>,

    /// Latitude in decimal degrees (fetch from Open-Meteo)
    #[arg(long, requires = "longitude", allow_negative_numbers = true)]
    pub latitude: Option<f64>,

    /// Longitude in decimal degrees (fetch from Open-Meteo)
    #[arg(long, requires = "latitude", allow_negative_numbers = true)]
    pub longitude: Option<f64>,

    #[command(flatten)]
    pub window: WindowArgs,
}

/// Date window. Open-Meteo queries default to the last 120 days; CSV
/// sources are clipped to the window only when a bound is given.
#[derive(Args, Debug, Clone, Copy, PartialEq)]
pub struct WindowArgs {
    /// First day to use (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub start: Option<NaiveDate>,

    /// Last day to use (YYYY-MM-DD); for Open-Meteo defaults to today
    #[arg(long, value_parser = parse_date)]
    pub end: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch hourly PM2.5 and meteorology from Open-Meteo into CSV files
    Fetch {
        #[arg(long, allow_negative_numbers = true)]
        latitude: f64,

        #[arg(long, allow_negative_numbers = true)]
        longitude: f64,

        #[command(flatten)]
        window: WindowArgs,

        /// Output path for hourly PM2.5
        #[arg(short = 'p', long)]
        pollutant_csv: PathBuf,

        /// Output path for hourly meteorology
        #[arg(short = 'm', long)]
        meteo_csv: PathBuf,
    },

    /// Build the daily feature table from hourly CSV files
    Features {
        #[arg(short = 'p', long)]
        pollutant_csv: PathBuf,

        #[arg(short = 'm', long)]
        meteo_csv: PathBuf,

        /// Output CSV path (stdout when omitted)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Predict tomorrow's PM2.5 with a persisted model
    Predict {
        /// Model artifact (JSON)
        #[arg(long)]
        model: PathBuf,

        #[command(flatten)]
        source: SourceArgs,

        /// Complete daily rows required before predicting
        #[arg(long, default_value_t = aq_model::MIN_STABLE_ROWS)]
        min_rows: usize,

        /// Also write the daily feature table to this CSV
        #[arg(long)]
        export_csv: Option<PathBuf>,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Fetch {
            latitude,
            longitude,
            window,
            pollutant_csv,
            meteo_csv,
        } => fetch::run_fetch(latitude, longitude, window, &pollutant_csv, &meteo_csv).await,
        Command::Features {
            pollutant_csv,
            meteo_csv,
            output,
        } => features::run_features(&pollutant_csv, &meteo_csv, output.as_deref()),
        Command::Predict {
            model,
            source,
            min_rows,
            export_csv,
        } => predict::run_predict(&model, &source, min_rows, export_csv.as_deref()).await,
    }
}
