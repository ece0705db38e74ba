//! Signal generation: SMAs plus the per-bar Buy/Sell/Hold label.
//!
//! A bar only gets a non-Hold signal once both SMAs are defined AND its
//! date is at least `max(short_window, long_window)` calendar days past the
//! first bar. The gate counts calendar days while the windows count bars;
//! the two disagree over weekends and holidays, and that asymmetry is kept.

use chrono::{Days, NaiveDate};

use super::backtest::StrategyConfig;
use super::bar::{validate_series, PriceBar};
use super::error::SmacrossError;
use super::signal::Signal;
use super::sma::calc_sma;

/// One input bar augmented with its indicators and signal.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorBar {
    pub date: NaiveDate,
    pub price: f64,
    pub short_sma: Option<f64>,
    pub long_sma: Option<f64>,
    pub signal: Signal,
}

/// Compute the indicator series for a chronological bar series.
///
/// Pure function of its inputs: same bars and config always produce the
/// same output. Past the warm-up gate, `short > long` is Buy, `short < long`
/// is Sell, and exact equality stays Hold.
pub fn compute_signals(
    bars: &[PriceBar],
    config: &StrategyConfig,
) -> Result<Vec<IndicatorBar>, SmacrossError> {
    validate_series(bars)?;

    let short = calc_sma(bars, config.short_window);
    let long = calc_sma(bars, config.long_window);

    let warmup = config.short_window.max(config.long_window) as u64;
    let gate = bars[0]
        .date
        .checked_add_days(Days::new(warmup))
        .ok_or_else(|| SmacrossError::InvalidSeries {
            reason: format!("warm-up window overflows calendar from {}", bars[0].date),
        })?;

    let series = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let signal = match (short[i], long[i]) {
                (Some(s), Some(l)) if bar.date >= gate => {
                    if s > l {
                        Signal::Buy
                    } else if s < l {
                        Signal::Sell
                    } else {
                        Signal::Hold
                    }
                }
                _ => Signal::Hold,
            };

            IndicatorBar {
                date: bar.date,
                price: bar.price,
                short_sma: short[i],
                long_sma: long[i],
                signal,
            }
        })
        .collect();

    Ok(series)
}
