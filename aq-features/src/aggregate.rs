//! Daily resampling and the inner join of the two daily tables.
//!
//! A day only appears in a daily table if the hourly table had at least one
//! row on that day. A column whose readings were all missing on such a day
//! stays `None`: the day still occupies a table position.

use aq_core::{MeteoObservation, PollutantObservation};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Running sum and count of the defined readings of one column.
#[derive(Debug, Default, Clone, Copy)]
struct MeanAccumulator {
    sum: f64,
    count: u32,
}

impl MeanAccumulator {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / f64::from(self.count))
    }
}

/// Mean PM2.5 of one calendar day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyPollutant {
    pub date: NaiveDate,
    pub pm25: Option<f64>,
}

/// Mean meteorology of one calendar day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyMeteo {
    pub date: NaiveDate,
    pub temperature: Option<f64>,
    pub relativehumidity: Option<f64>,
    pub windspeed: Option<f64>,
}

/// A day present in both daily tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergedDay {
    pub date: NaiveDate,
    pub pm25: Option<f64>,
    pub temperature: Option<f64>,
    pub relativehumidity: Option<f64>,
    pub windspeed: Option<f64>,
}

/// Resample hourly PM2.5 to daily means, ascending by date.
pub fn aggregate_pollutant_daily(observations: &[PollutantObservation]) -> Vec<DailyPollutant> {
    let mut days: BTreeMap<NaiveDate, MeanAccumulator> = BTreeMap::new();
    for obs in observations {
        days.entry(obs.day()).or_default().push(obs.pm25);
    }
    days.into_iter()
        .map(|(date, pm25)| DailyPollutant {
            date,
            pm25: pm25.mean(),
        })
        .collect()
}

/// Resample hourly meteorology to daily means, ascending by date.
pub fn aggregate_meteo_daily(observations: &[MeteoObservation]) -> Vec<DailyMeteo> {
    let mut days: BTreeMap<NaiveDate, [MeanAccumulator; 3]> = BTreeMap::new();
    for obs in observations {
        let [temperature, humidity, wind] = days.entry(obs.day()).or_default();
        temperature.push(obs.temperature);
        humidity.push(obs.relativehumidity);
        wind.push(obs.windspeed);
    }
    days.into_iter()
        .map(|(date, [temperature, humidity, wind])| DailyMeteo {
            date,
            temperature: temperature.mean(),
            relativehumidity: humidity.mean(),
            windspeed: wind.mean(),
        })
        .collect()
}

/// Inner join on date. Both inputs must be ascending by date, as returned by
/// the aggregation functions; the output is ascending as well.
pub fn merge_daily(pollutant: &[DailyPollutant], meteo: &[DailyMeteo]) -> Vec<MergedDay> {
    let mut merged = Vec::with_capacity(pollutant.len().min(meteo.len()));
    let mut pm_iter = pollutant.iter().peekable();
    let mut met_iter = meteo.iter().peekable();
    while let (Some(pm), Some(met)) = (pm_iter.peek(), met_iter.peek()) {
        match pm.date.cmp(&met.date) {
            std::cmp::Ordering::Less => {
                pm_iter.next();
            }
            std::cmp::Ordering::Greater => {
                met_iter.next();
            }
            std::cmp::Ordering::Equal => {
                merged.push(MergedDay {
                    date: pm.date,
                    pm25: pm.pm25,
                    temperature: met.temperature,
                    relativehumidity: met.relativehumidity,
                    windspeed: met.windspeed,
                });
                pm_iter.next();
                met_iter.next();
            }
        }
    }
    merged
}
