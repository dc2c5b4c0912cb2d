//! Resolving where hourly observations come from.

use crate::{SourceArgs, WindowArgs, DEFAULT_HISTORY_DAYS};
use aq_core::csv_io::{load_meteo_csv, load_pollutant_csv};
use aq_core::open_meteo::{Coordinates, OpenMeteoClient, QueryWindow};
use aq_core::{MeteoObservation, PollutantObservation};
use aq_utils::dates::trailing_window;
use chrono::{Local, NaiveDate};
use log::info;

/// Both hourly tables, as delivered by the source.
pub type HourlyTables = (Vec<PollutantObservation>, Vec<MeteoObservation>);

/// Fill in the default window relative to `today`.
pub fn resolve_window(args: WindowArgs, today: NaiveDate) -> anyhow::Result<QueryWindow> {
    let end = args.end.unwrap_or(today);
    let start = args
        .start
        .unwrap_or_else(|| trailing_window(end, DEFAULT_HISTORY_DAYS).0);
    if start > end {
        anyhow::bail!("Start date {} is after end date {}", start, end);
    }
    Ok(QueryWindow { start, end })
}

/// Keep only rows whose UTC day falls inside the dates given on the command
/// line. Without `--start`/`--end` the tables pass through untouched.
pub fn clip_to_window(tables: HourlyTables, window: WindowArgs) -> anyhow::Result<HourlyTables> {
    let start = window.start.unwrap_or(NaiveDate::MIN);
    let end = window.end.unwrap_or(NaiveDate::MAX);
    if start > end {
        anyhow::bail!("Start date {} is after end date {}", start, end);
    }
    if window.start.is_none() && window.end.is_none() {
        return Ok(tables);
    }
    let (pollutant, meteo) = tables;
    let in_window = |day: NaiveDate| start <= day && day <= end;
    let pollutant: Vec<_> = pollutant.into_iter().filter(|o| in_window(o.day())).collect();
    let meteo: Vec<_> = meteo.into_iter().filter(|o| in_window(o.day())).collect();
    info!(
        "Kept {} PM2.5 and {} meteorology rows between {} and {}",
        pollutant.len(),
        meteo.len(),
        start,
        end
    );
    Ok((pollutant, meteo))
}

/// Fetch both tables for a coordinate.
pub async fn fetch_hourly(at: Coordinates, window: WindowArgs) -> anyhow::Result<HourlyTables> {
    let window = resolve_window(window, Local::now().naive_local().date())?;
    info!(
        "Querying Open-Meteo at ({}, {}) from {} to {}",
        at.latitude, at.longitude, window.start, window.end
    );
    let client = OpenMeteoClient::new()?;
    Ok(client.fetch_all(at, window).await?)
}

/// Load hourly tables from CSV files or Open-Meteo, whichever was asked for.
pub async fn load_hourly(source: &SourceArgs) -> anyhow::Result<HourlyTables> {
    match (
        &source.pollutant_csv,
        &source.meteo_csv,
        source.latitude,
        source.longitude,
    ) {
        (Some(pollutant_csv), Some(meteo_csv), _, _) => clip_to_window(
            (
                load_pollutant_csv(pollutant_csv)?,
                load_meteo_csv(meteo_csv)?,
            ),
            source.window,
        ),
        (_, _, Some(latitude), Some(longitude)) => {
            fetch_hourly(
                Coordinates {
                    latitude,
                    longitude,
                },
                source.window,
            )
            .await
        }
        _ => anyhow::bail!(
            "Provide either --pollutant-csv and --meteo-csv, or --latitude and --longitude"
        ),
    }
}
