//! Build the daily feature table from hourly CSV files.

use aq_core::csv_io::{load_meteo_csv, load_pollutant_csv, write_feature_table};
use aq_core::DailyFeatureRow;
use aq_features::make_daily_features;
use log::{info, warn};
use std::{fs::File, io, path::Path};

/// Write `rows` to `output`, or to stdout when no path is given.
pub fn export_table(rows: &[DailyFeatureRow], output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            write_feature_table(rows, File::create(path)?)?;
            info!("Wrote {} daily rows to {}", rows.len(), path.display());
        }
        None => write_feature_table(rows, io::stdout().lock())?,
    }
    Ok(())
}

pub fn run_features(
    pollutant_csv: &Path,
    meteo_csv: &Path,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let pollutant = load_pollutant_csv(pollutant_csv)?;
    let meteo = load_meteo_csv(meteo_csv)?;
    let rows = make_daily_features(&pollutant, &meteo);
    if rows.is_empty() {
        warn!("Not enough overlapping data to build any complete daily row");
    }
    export_table(&rows, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aq_core::csv_io::read_feature_table;
    use std::path::PathBuf;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../fixtures")
            .join(name)
    }

    #[test]
    fn test_features_from_fixtures() {
        let output = std::env::temp_dir().join(format!(
            "aq-cmd-features-{}.csv",
            std::process::id()
        ));
        run_features(
            &fixture("delhi_pm25_hourly.csv"),
            &fixture("delhi_meteo_hourly.csv"),
            Some(&output),
        )
        .unwrap();
        let rows = read_feature_table(File::open(&output).unwrap()).unwrap();
        std::fs::remove_file(&output).unwrap();

        // 20 overlapping days, 7 lost to the lag-7 warm-up
        assert_eq!(rows.len(), 13);
        let first = &rows[0];
        assert_eq!(first.date.to_string(), "2024-01-08");
        assert_eq!(first.pm25, 210.0);
        assert_eq!(first.pm25_lag_1, 171.0);
        assert_eq!(first.pm25_lag_7, 182.0);
        assert_eq!(first.dayofyear, 8);
    }

    #[test]
    fn test_missing_input_file_is_an_error() {
        let result = run_features(
            Path::new("/nonexistent/pm25.csv"),
            &fixture("delhi_meteo_hourly.csv"),
            None,
        );
        assert!(result.is_err());
    }
}
