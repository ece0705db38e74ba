//! Portfolio simulation over a signal-annotated series.
//!
//! Strictly chronological walk with no lookahead. The strategy re-enters on
//! every consecutive Buy bar (up to the per-buy cap) and liquidates fully on
//! Sell; there is no "already in position" tracking. That re-entry behaviour
//! is intentional and must not be collapsed into enter-once semantics.

use chrono::NaiveDate;

use super::backtest::StrategyConfig;
use super::error::SmacrossError;
use super::signal::Signal;
use super::signal_engine::IndicatorBar;

/// Portfolio snapshot after processing one bar.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioState {
    pub date: NaiveDate,
    pub cash: f64,
    pub shares: i64,
    pub total_value: f64,
}

/// Walk the series and produce one `PortfolioState` per bar.
///
/// Buys are capped at `max_shares_per_buy` and at what cash affords in
/// whole shares, so cash never goes negative. A Buy with no affordable
/// share and a Sell with zero shares are both no-ops, not errors.
pub fn simulate(
    series: &[IndicatorBar],
    config: &StrategyConfig,
) -> Result<Vec<PortfolioState>, SmacrossError> {
    if series.is_empty() {
        return Err(SmacrossError::InvalidSeries {
            reason: "empty price series".to_string(),
        });
    }

    let mut cash = config.initial_cash;
    let mut shares: i64 = 0;
    let mut states = Vec::with_capacity(series.len());

    for (i, bar) in series.iter().enumerate() {
        if bar.price <= 0.0 || !bar.price.is_finite() {
            return Err(SmacrossError::InvalidSeries {
                reason: format!("non-positive price {} on {}", bar.price, bar.date),
            });
        }
        if i > 0 && bar.date <= series[i - 1].date {
            return Err(SmacrossError::InvalidSeries {
                reason: format!(
                    "dates not strictly increasing: {} follows {}",
                    bar.date,
                    series[i - 1].date
                ),
            });
        }

        match bar.signal {
            Signal::Buy => {
                let affordable = (cash / bar.price).floor() as i64;
                let buyable = config.max_shares_per_buy.min(affordable);
                shares += buyable;
                cash -= buyable as f64 * bar.price;
            }
            Signal::Sell => {
                cash += shares as f64 * bar.price;
                shares = 0;
            }
            Signal::Hold => {}
        }

        states.push(PortfolioState {
            date: bar.date,
            cash,
            shares,
            total_value: cash + shares as f64 * bar.price,
        });
    }

    Ok(states)
}
