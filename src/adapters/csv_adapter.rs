//! CSV file data adapter.
//!
//! One file per symbol, `<SYMBOL>.csv`, with columns
//! `date,open,high,low,close,volume` and dates formatted `YYYY-MM-DD`.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::domain::error::TurtleError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    /// All bars in the file, sorted ascending by date.
    fn read_bars(&self, symbol: &str) -> Result<Vec<OhlcvBar>, TurtleError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| TurtleError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| TurtleError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| TurtleError::Data {
                reason: "missing date column".into(),
            })?;
            let date =
                NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| TurtleError::Data {
                    reason: format!("invalid date format: {}", e),
                })?;

            let open: f64 = parse_field(&record, 1, "open")?;
            let high: f64 = parse_field(&record, 2, "high")?;
            let low: f64 = parse_field(&record, 3, "low")?;
            let close: f64 = parse_field(&record, 4, "close")?;

            let volume: i64 = record
                .get(5)
                .ok_or_else(|| TurtleError::Data {
                    reason: "missing volume column".into(),
                })?
                .parse()
                .map_err(|e| TurtleError::Data {
                    reason: format!("invalid volume value: {}", e),
                })?;

            bars.push(OhlcvBar {
                symbol: symbol.to_string(),
                date,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

fn parse_field(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, TurtleError> {
    record
        .get(index)
        .ok_or_else(|| TurtleError::Data {
            reason: format!("missing {} column", name),
        })?
        .parse()
        .map_err(|e| TurtleError::Data {
            reason: format!("invalid {} value: {}", name, e),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, TurtleError> {
        let bars: Vec<OhlcvBar> = self
            .read_bars(symbol)?
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect();

        if bars.is_empty() {
            return Err(TurtleError::NoData {
                symbol: symbol.to_string(),
            });
        }
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, TurtleError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| TurtleError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| TurtleError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TurtleError> {
        if !self.csv_path(symbol).exists() {
            return Ok(None);
        }

        let bars = self.read_bars(symbol)?;
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, bars.len()))),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "date,open,high,low,close,volume\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000\n\
            2024-01-17,110.0,120.0,105.0,115.0,55000\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000\n";

        fs::write(path.join("SPY.csv"), csv_content).unwrap();
        fs::write(path.join("QQQ.csv"), "date,open,high,low,close,volume\n").unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_ohlcv_returns_sorted_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 17).unwrap();
        let bars = adapter.fetch_ohlcv("SPY", start, end).unwrap();

        assert_eq!(bars.len(), 3);
        // file rows are out of order; fetch returns them sorted
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(bars[1].date, NaiveDate::from_ymd_opt(2024, 1, 16).unwrap());
        assert_eq!(bars[2].date, NaiveDate::from_ymd_opt(2024, 1, 17).unwrap());
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].high, 110.0);
        assert_eq!(bars[0].low, 90.0);
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[0].volume, 50000);
        assert_eq!(bars[0].symbol, "SPY");
    }

    #[test]
    fn fetch_ohlcv_filters_by_date() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let start = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
        let bars = adapter.fetch_ohlcv("SPY", start, end).unwrap();

        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 16).unwrap());
    }

    #[test]
    fn fetch_ohlcv_errors_for_missing_file() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let result = adapter.fetch_ohlcv("XYZ", start, end);

        assert!(matches!(result, Err(TurtleError::Data { .. })));
    }

    #[test]
    fn fetch_ohlcv_no_bars_in_range_is_no_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let result = adapter.fetch_ohlcv("SPY", start, end);

        assert!(matches!(result, Err(TurtleError::NoData { symbol }) if symbol == "SPY"));
    }

    #[test]
    fn fetch_ohlcv_rejects_malformed_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();
        fs::write(
            path.join("BAD.csv"),
            "date,open,high,low,close,volume\n2024-01-15,abc,110.0,90.0,105.0,50000\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(path);

        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let result = adapter.fetch_ohlcv("BAD", start, end);

        assert!(matches!(result, Err(TurtleError::Data { .. })));
    }

    #[test]
    fn list_symbols_returns_csv_stems_sorted() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let symbols = adapter.list_symbols().unwrap();
        assert_eq!(symbols, vec!["QQQ", "SPY"]);
    }

    #[test]
    fn get_data_range_reports_bounds_and_count() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let range = adapter.get_data_range("SPY").unwrap().unwrap();
        assert_eq!(range.0, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(range.1, NaiveDate::from_ymd_opt(2024, 1, 17).unwrap());
        assert_eq!(range.2, 3);
    }

    #[test]
    fn get_data_range_none_for_missing_or_empty() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        assert_eq!(adapter.get_data_range("XYZ").unwrap(), None);
        assert_eq!(adapter.get_data_range("QQQ").unwrap(), None);
    }
}
