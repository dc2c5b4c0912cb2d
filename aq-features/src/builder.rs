//! The daily feature table.
//!
//! Lags and the moving average are positional: they look back a number of
//! rows in the merged, date-sorted table, not a number of calendar days. When
//! a day is missing from the merged table, "lag 7" reaches further back than
//! seven calendar days.

use crate::aggregate::{aggregate_meteo_daily, aggregate_pollutant_daily, merge_daily, MergedDay};
use aq_core::{DailyFeatureRow, MeteoObservation, PollutantObservation};
use aq_utils::dates::day_of_year;
use log::debug;

/// Positional lags of `pm25`, in the order of the row's
/// `pm25_lag_1`, `pm25_lag_2`, `pm25_lag_3`, `pm25_lag_7` columns.
pub const PM25_LAGS: [usize; 4] = [1, 2, 3, 7];

/// Width of the trailing `pm25` moving average, current row included.
pub const MOVING_AVERAGE_WINDOW: usize = 3;

/// Rows lost at the head of the table before the first complete row.
pub const WARM_UP_ROWS: usize = {
    let longest_lag = PM25_LAGS[PM25_LAGS.len() - 1];
    if longest_lag > MOVING_AVERAGE_WINDOW - 1 {
        longest_lag
    } else {
        MOVING_AVERAGE_WINDOW - 1
    }
};

fn pm25_lag(table: &[MergedDay], position: usize, lag: usize) -> Option<f64> {
    position
        .checked_sub(lag)
        .and_then(|earlier| table[earlier].pm25)
}

fn pm25_trailing_mean(table: &[MergedDay], position: usize, window: usize) -> Option<f64> {
    let first = (position + 1).checked_sub(window)?;
    let mut sum = 0.0;
    for day in &table[first..=position] {
        sum += day.pm25?;
    }
    Some(sum / window as f64)
}

/// Build the row at `position`, or `None` if any of its columns is undefined.
fn complete_row(table: &[MergedDay], position: usize) -> Option<DailyFeatureRow> {
    let day = &table[position];
    let [lag_1, lag_2, lag_3, lag_7] = PM25_LAGS.map(|lag| pm25_lag(table, position, lag));
    Some(DailyFeatureRow {
        date: day.date,
        pm25: day.pm25?,
        temperature: day.temperature?,
        relativehumidity: day.relativehumidity?,
        windspeed: day.windspeed?,
        pm25_lag_1: lag_1?,
        pm25_lag_2: lag_2?,
        pm25_lag_3: lag_3?,
        pm25_lag_7: lag_7?,
        pm25_ma_3: pm25_trailing_mean(table, position, MOVING_AVERAGE_WINDOW)?,
        dayofyear: day_of_year(&day.date),
    })
}

/// Turn hourly pollutant and meteorology tables into the daily feature table.
///
/// The result is ascending by date and every row is fully defined. An empty
/// result means there was not enough overlapping data; it is not an error.
/// Inputs need not be sorted and are never modified.
pub fn make_daily_features(
    pollutant: &[PollutantObservation],
    meteo: &[MeteoObservation],
) -> Vec<DailyFeatureRow> {
    if pollutant.is_empty() || meteo.is_empty() {
        debug!(
            "Feature builder: empty input (pollutant={}, meteo={})",
            pollutant.len(),
            meteo.len()
        );
        return Vec::new();
    }
    let daily_pm = aggregate_pollutant_daily(pollutant);
    let daily_met = aggregate_meteo_daily(meteo);
    let merged = merge_daily(&daily_pm, &daily_met);
    let rows: Vec<DailyFeatureRow> = (0..merged.len())
        .filter_map(|position| complete_row(&merged, position))
        .collect();
    debug!(
        "Feature builder: {} pollutant days, {} meteo days, {} merged, {} complete",
        daily_pm.len(),
        daily_met.len(),
        merged.len(),
        rows.len()
    );
    rows
}
