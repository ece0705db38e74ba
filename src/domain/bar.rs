//! Daily price bar representation and series validation.

use chrono::NaiveDate;

use super::error::SmacrossError;

/// One trading day's observation: date plus adjusted close.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub price: f64,
}

/// Check that a series is non-empty, strictly chronological, and all-positive.
///
/// Every consumer of a bar series runs this before walking it; malformed
/// input is rejected up front rather than producing partial results.
pub fn validate_series(bars: &[PriceBar]) -> Result<(), SmacrossError> {
    if bars.is_empty() {
        return Err(SmacrossError::InvalidSeries {
            reason: "empty price series".to_string(),
        });
    }

    for (i, bar) in bars.iter().enumerate() {
        if bar.price <= 0.0 || !bar.price.is_finite() {
            return Err(SmacrossError::InvalidSeries {
                reason: format!("non-positive price {} on {}", bar.price, bar.date),
            });
        }
        if i > 0 && bar.date <= bars[i - 1].date {
            return Err(SmacrossError::InvalidSeries {
                reason: format!(
                    "dates not strictly increasing: {} follows {}",
                    bar.date,
                    bars[i - 1].date
                ),
            });
        }
    }

    Ok(())
}
