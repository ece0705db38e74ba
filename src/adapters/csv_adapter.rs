//! CSV price data adapter.
//!
//! Reads `{symbol}_data.csv` files (two columns: date, adjusted close) from
//! a base directory, the layout a download step would cache into.

use crate::domain::bar::PriceBar;
use crate::domain::error::SmacrossError;
use crate::ports::data_port::PricePort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

const FILE_SUFFIX: &str = "_data.csv";

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}{}", symbol, FILE_SUFFIX))
    }

    fn read_all(&self, symbol: &str) -> Result<Vec<PriceBar>, SmacrossError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| SmacrossError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| SmacrossError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| SmacrossError::Data {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                SmacrossError::Data {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            let price: f64 = record
                .get(1)
                .ok_or_else(|| SmacrossError::Data {
                    reason: "missing price column".into(),
                })?
                .parse()
                .map_err(|e| SmacrossError::Data {
                    reason: format!("invalid price value: {}", e),
                })?;

            bars.push(PriceBar { date, price });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

impl PricePort for CsvAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, SmacrossError> {
        let bars = self.read_all(symbol)?;
        Ok(bars
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect())
    }

    fn list_symbols(&self) -> Result<Vec<String>, SmacrossError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| SmacrossError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SmacrossError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if name_str.ends_with(FILE_SUFFIX) {
                let symbol = &name_str[..name_str.len() - FILE_SUFFIX.len()];
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SmacrossError> {
        if !self.csv_path(symbol).exists() {
            return Ok(None);
        }
        let bars = self.read_all(symbol)?;
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, bars.len()))),
            _ => Ok(None),
        }
    }
}
