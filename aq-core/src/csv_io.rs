//! CSV interchange for hourly inputs and the daily feature table.
//!
//! # CSV Formats
//!
//! - **Pollutant** (has headers): `timestamp,pm25`
//! - **Meteorology** (has headers): `timestamp,temperature,relativehumidity,windspeed`
//! - **Feature table** (has headers): see [`FEATURE_TABLE_COLUMNS`]
//!
//! Empty cells are missing readings.

use crate::error::Result;
use crate::feature_row::{DailyFeatureRow, FEATURE_TABLE_COLUMNS};
use crate::observation::{MeteoObservation, PollutantObservation};
use csv::{ReaderBuilder, WriterBuilder};
use log::info;
use serde::{Deserialize, Serialize};
use std::{fs::File, io, path::Path};

/// Timestamp layout written by this crate (the Open-Meteo layout).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Serialize, Deserialize)]
struct PollutantRecord {
    timestamp: String,
    pm25: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MeteoRecord {
    timestamp: String,
    temperature: Option<f64>,
    relativehumidity: Option<f64>,
    windspeed: Option<f64>,
}

/// Read hourly pollutant observations from any CSV source.
pub fn read_pollutant_csv<R: io::Read>(source: R) -> Result<Vec<PollutantObservation>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);
    let mut observations = Vec::new();
    for result in rdr.deserialize() {
        let record: PollutantRecord = result?;
        observations.push(PollutantObservation::new(record.timestamp, record.pm25)?);
    }
    Ok(observations)
}

/// Read hourly meteorology observations from any CSV source.
pub fn read_meteo_csv<R: io::Read>(source: R) -> Result<Vec<MeteoObservation>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);
    let mut observations = Vec::new();
    for result in rdr.deserialize() {
        let record: MeteoRecord = result?;
        observations.push(MeteoObservation::new(
            record.timestamp,
            record.temperature,
            record.relativehumidity,
            record.windspeed,
        )?);
    }
    Ok(observations)
}

pub fn load_pollutant_csv(path: impl AsRef<Path>) -> Result<Vec<PollutantObservation>> {
    let path = path.as_ref();
    let observations = read_pollutant_csv(File::open(path)?)?;
    info!(
        "Loaded {} pollutant observations from {}",
        observations.len(),
        path.display()
    );
    Ok(observations)
}

pub fn load_meteo_csv(path: impl AsRef<Path>) -> Result<Vec<MeteoObservation>> {
    let path = path.as_ref();
    let observations = read_meteo_csv(File::open(path)?)?;
    info!(
        "Loaded {} meteorology observations from {}",
        observations.len(),
        path.display()
    );
    Ok(observations)
}

pub fn write_pollutant_csv<W: io::Write>(
    observations: &[PollutantObservation],
    sink: W,
) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_writer(sink);
    for obs in observations {
        wtr.serialize(PollutantRecord {
            timestamp: obs.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            pm25: obs.pm25,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_meteo_csv<W: io::Write>(observations: &[MeteoObservation], sink: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_writer(sink);
    for obs in observations {
        wtr.serialize(MeteoRecord {
            timestamp: obs.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            temperature: obs.temperature,
            relativehumidity: obs.relativehumidity,
            windspeed: obs.windspeed,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Export the daily feature table. An empty table still gets its header row.
pub fn write_feature_table<W: io::Write>(rows: &[DailyFeatureRow], sink: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(sink);
    wtr.write_record(FEATURE_TABLE_COLUMNS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read back a previously exported feature table.
pub fn read_feature_table<R: io::Read>(source: R) -> Result<Vec<DailyFeatureRow>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(source);
    let rows = rdr
        .deserialize()
        .collect::<std::result::Result<Vec<DailyFeatureRow>, csv::Error>>()?;
    Ok(rows)
}
