//! Fetch hourly observations and store them as CSV.

use crate::source::fetch_hourly;
use crate::WindowArgs;
use aq_core::csv_io::{write_meteo_csv, write_pollutant_csv};
use aq_core::open_meteo::Coordinates;
use log::{info, warn};
use std::{fs::File, path::Path};

/// Fetch PM2.5 and meteorology for a coordinate and write both CSV files.
///
/// Empty upstream answers still produce header-only files, so a later
/// `features` run sees "no data" rather than a missing file.
pub async fn run_fetch(
    latitude: f64,
    longitude: f64,
    window: WindowArgs,
    pollutant_csv: &Path,
    meteo_csv: &Path,
) -> anyhow::Result<()> {
    let (pollutant, meteo) = fetch_hourly(
        Coordinates {
            latitude,
            longitude,
        },
        window,
    )
    .await?;
    if pollutant.is_empty() {
        warn!("No PM2.5 data found for that location and window");
    }
    if meteo.is_empty() {
        warn!("No meteorology found for that location and window");
    }
    write_pollutant_csv(&pollutant, File::create(pollutant_csv)?)?;
    write_meteo_csv(&meteo, File::create(meteo_csv)?)?;
    info!(
        "Fetch complete. {} PM2.5 rows to {}, {} meteorology rows to {}",
        pollutant.len(),
        pollutant_csv.display(),
        meteo.len(),
        meteo_csv.display()
    );
    Ok(())
}
