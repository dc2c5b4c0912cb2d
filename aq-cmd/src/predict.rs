//! Fetch (or load), build features and predict tomorrow's PM2.5.

use crate::features::export_table;
use crate::source::load_hourly;
use crate::SourceArgs;
use aq_core::DailyFeatureRow;
use aq_features::make_daily_features;
use aq_model::{forecast_next_day, Forecast, ModelArtifact, Prediction, MODEL_CACHE};
use log::warn;
use std::fmt::Write;
use std::path::Path;

/// Days shown in the text series under a prediction.
const SERIES_DAYS: usize = 30;
/// Width of the longest bar in the text series.
const BAR_WIDTH: usize = 40;

/// Daily PM2.5 as one line per day with a proportional bar.
pub fn render_series(table: &[DailyFeatureRow]) -> String {
    let shown = &table[table.len().saturating_sub(SERIES_DAYS)..];
    let max = shown.iter().map(|row| row.pm25).fold(0.0_f64, f64::max);
    let mut out = String::new();
    for row in shown {
        let bar = if max > 0.0 {
            ((row.pm25 / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let _ = writeln!(out, "{}  {:>7.1}  {}", row.date, row.pm25, "#".repeat(bar));
    }
    out
}

/// User-facing report of a prediction.
pub fn render_prediction(prediction: &Prediction, table: &[DailyFeatureRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Latest observed daily PM2.5 ({}): {:.1} µg/m³",
        prediction.latest.date, prediction.latest.pm25
    );
    let _ = writeln!(
        out,
        "Predicted PM2.5 for {}: {:.1} µg/m³",
        prediction.features.target_date, prediction.pm25
    );
    out.push('\n');
    out.push_str(&render_series(table));
    out
}

/// Outcome of [`predict_with`]: what to tell the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    /// One of the hourly sources came back empty.
    NoData(&'static str),
    /// The feature table was too short to trust.
    Insufficient { rows: usize, required: usize },
    Predicted(String),
}

impl Report {
    pub fn message(&self) -> String {
        match self {
            Report::NoData(what) => {
                format!("No {what} data found for that source. Try a different window or location.")
            }
            Report::Insufficient { rows, required } => format!(
                "Not enough daily rows after feature creation for a stable prediction ({rows} of {required})."
            ),
            Report::Predicted(text) => text.clone(),
        }
    }
}

/// Run the pipeline against an already loaded artifact.
pub async fn predict_with(
    artifact: &ModelArtifact,
    source: &SourceArgs,
    min_rows: usize,
    export_csv: Option<&Path>,
) -> anyhow::Result<Report> {
    let (pollutant, meteo) = load_hourly(source).await?;
    if pollutant.is_empty() {
        warn!("Empty PM2.5 table");
        return Ok(Report::NoData("PM2.5"));
    }
    if meteo.is_empty() {
        warn!("Empty meteorology table");
        return Ok(Report::NoData("meteorology"));
    }
    let table = make_daily_features(&pollutant, &meteo);
    if let Some(path) = export_csv {
        export_table(&table, Some(path))?;
    }
    let report = match forecast_next_day(&table, artifact, min_rows)? {
        Forecast::InsufficientData { rows, required } => Report::Insufficient { rows, required },
        Forecast::Predicted(prediction) => Report::Predicted(render_prediction(&prediction, &table)),
    };
    Ok(report)
}

pub async fn run_predict(
    model: &Path,
    source: &SourceArgs,
    min_rows: usize,
    export_csv: Option<&Path>,
) -> anyhow::Result<()> {
    let artifact = MODEL_CACHE.load(model)?;
    let report = predict_with(artifact, source, min_rows, export_csv).await?;
    match report {
        Report::Predicted(_) => print!("{}", report.message()),
        _ => eprintln!("warning: {}", report.message()),
    }
    Ok(())
}
