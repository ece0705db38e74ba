//! Price data access port trait.

use crate::domain::bar::PriceBar;
use crate::domain::error::SmacrossError;
use chrono::NaiveDate;

pub trait PricePort {
    /// Adjusted-close series for one symbol over `[start_date, end_date]`,
    /// sorted by date.
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, SmacrossError>;

    fn list_symbols(&self) -> Result<Vec<String>, SmacrossError>;

    /// (first date, last date, bar count) on record for a symbol, if any.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SmacrossError>;
}
