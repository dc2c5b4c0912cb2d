//! Open-Meteo client: hourly PM2.5 from the air-quality API and hourly
//! temperature, humidity and wind from the historical archive API.
//!
//! Coordinates come from the caller. Response parsing is kept separate from
//! the HTTP round trip so it can be exercised on captured bodies.

use crate::error::FetchError;
use crate::observation::{MeteoObservation, PollutantObservation};
use aq_utils::dates::format_date;
use chrono::NaiveDate;
use log::{info, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

pub const AIR_QUALITY_URL: &str = "https://air-quality-api.open-meteo.com/v1/air-quality";
pub const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

/// Hourly variables requested from each endpoint.
const AIR_QUALITY_HOURLY: &str = "pm2_5";
const ARCHIVE_HOURLY: &str = "temperature_2m,relative_humidity_2m,windspeed_10m";

/// Upper bound on a single request, connect through body.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct HourlyEnvelope<T> {
    hourly: Option<T>,
}

#[derive(Debug, Deserialize)]
struct AirQualityHourly {
    time: Vec<String>,
    pm2_5: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct ArchiveHourly {
    time: Vec<String>,
    temperature_2m: Option<Vec<Option<f64>>>,
    relative_humidity_2m: Option<Vec<Option<f64>>>,
    windspeed_10m: Option<Vec<Option<f64>>>,
}

/// A geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Inclusive date window for a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

fn check_lengths(series: &str, times: usize, values: usize) -> Result<(), FetchError> {
    if times != values {
        return Err(FetchError::Malformed(format!(
            "{series}: {values} values for {times} timestamps"
        )));
    }
    Ok(())
}

/// Parse an air-quality response body.
///
/// A body without an `hourly` block or without the `pm2_5` series means the
/// source has no data for the request: that is an empty table, not an error.
pub fn parse_air_quality_body(body: &str) -> Result<Vec<PollutantObservation>, FetchError> {
    let envelope: HourlyEnvelope<AirQualityHourly> = serde_json::from_str(body)?;
    let Some(hourly) = envelope.hourly else {
        warn!("Air-quality response has no hourly block");
        return Ok(Vec::new());
    };
    let Some(pm2_5) = hourly.pm2_5 else {
        warn!("Air-quality response has no pm2_5 series");
        return Ok(Vec::new());
    };
    check_lengths("pm2_5", hourly.time.len(), pm2_5.len())?;
    let observations = hourly
        .time
        .iter()
        .zip(pm2_5)
        .map(|(time, value)| PollutantObservation::new(time, value))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(observations)
}

/// Parse an archive response body. All three series must be present,
/// otherwise the table is empty.
pub fn parse_archive_body(body: &str) -> Result<Vec<MeteoObservation>, FetchError> {
    let envelope: HourlyEnvelope<ArchiveHourly> = serde_json::from_str(body)?;
    let Some(hourly) = envelope.hourly else {
        warn!("Archive response has no hourly block");
        return Ok(Vec::new());
    };
    let (Some(temperature), Some(humidity), Some(wind)) = (
        hourly.temperature_2m,
        hourly.relative_humidity_2m,
        hourly.windspeed_10m,
    ) else {
        warn!("Archive response is missing one of {}", ARCHIVE_HOURLY);
        return Ok(Vec::new());
    };
    let n = hourly.time.len();
    check_lengths("temperature_2m", n, temperature.len())?;
    check_lengths("relative_humidity_2m", n, humidity.len())?;
    check_lengths("windspeed_10m", n, wind.len())?;
    let mut observations = Vec::with_capacity(n);
    for (i, time) in hourly.time.iter().enumerate() {
        observations.push(MeteoObservation::new(
            time,
            temperature[i],
            humidity[i],
            wind[i],
        )?);
    }
    Ok(observations)
}

/// HTTP client for the two Open-Meteo endpoints.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    air_quality_url: String,
    archive_url: String,
}

impl OpenMeteoClient {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_endpoints(AIR_QUALITY_URL, ARCHIVE_URL)
    }

    /// Point the client at other base URLs (mirrors, self-hosted instances).
    pub fn with_endpoints(air_quality_url: &str, archive_url: &str) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(OpenMeteoClient {
            client,
            air_quality_url: air_quality_url.to_string(),
            archive_url: archive_url.to_string(),
        })
    }

    pub fn air_quality_request_url(&self, at: Coordinates, window: QueryWindow) -> String {
        format!(
            "{}?latitude={}&longitude={}&start_date={}&end_date={}&hourly={}",
            self.air_quality_url,
            at.latitude,
            at.longitude,
            format_date(&window.start),
            format_date(&window.end),
            AIR_QUALITY_HOURLY
        )
    }

    pub fn archive_request_url(&self, at: Coordinates, window: QueryWindow) -> String {
        format!(
            "{}?latitude={}&longitude={}&start_date={}&end_date={}&hourly={}",
            self.archive_url,
            at.latitude,
            at.longitude,
            format_date(&window.start),
            format_date(&window.end),
            ARCHIVE_HOURLY
        )
    }

    /// GET `url` and return the body. Open-Meteo reports "no data for this
    /// request" as a non-200 status with a JSON error body; that body is
    /// handed back so the parser turns it into an empty table. A non-200
    /// status without a JSON body is an error.
    async fn get_body(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::OK {
            if serde_json::from_str::<serde_json::Value>(&body).is_err() {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }
            warn!("Bad response status from {}: {} {}", url, status, body);
        }
        Ok(body)
    }

    /// Fetch hourly PM2.5 for the window.
    pub async fn fetch_pm25(
        &self,
        at: Coordinates,
        window: QueryWindow,
    ) -> Result<Vec<PollutantObservation>, FetchError> {
        let url = self.air_quality_request_url(at, window);
        info!("Fetching PM2.5: {}", url);
        let body = self.get_body(&url).await?;
        let observations = parse_air_quality_body(&body)?;
        info!("Received {} hourly PM2.5 readings", observations.len());
        Ok(observations)
    }

    /// Fetch hourly meteorology for the window.
    pub async fn fetch_weather(
        &self,
        at: Coordinates,
        window: QueryWindow,
    ) -> Result<Vec<MeteoObservation>, FetchError> {
        let url = self.archive_request_url(at, window);
        info!("Fetching meteorology: {}", url);
        let body = self.get_body(&url).await?;
        let observations = parse_archive_body(&body)?;
        info!("Received {} hourly meteorology readings", observations.len());
        Ok(observations)
    }

    /// Fetch both tables concurrently.
    pub async fn fetch_all(
        &self,
        at: Coordinates,
        window: QueryWindow,
    ) -> Result<(Vec<PollutantObservation>, Vec<MeteoObservation>), FetchError> {
        tokio::try_join!(self.fetch_pm25(at, window), self.fetch_weather(at, window))
    }
}
