//! Backtest configuration and end-to-end orchestration.

use chrono::NaiveDate;

use super::bar::PriceBar;
use super::error::SmacrossError;
use super::signal_engine::{self, IndicatorBar};
use super::simulator::{self, PortfolioState};

/// Fixed-per-run strategy parameters, assembled and validated before use.
#[derive(Debug, Clone)]
pub struct StrategyConfig {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub short_window: usize,
    pub long_window: usize,
    pub initial_cash: f64,
    pub max_shares_per_buy: i64,
}

impl StrategyConfig {
    /// Bars needed before both SMAs are defined.
    pub fn min_bars(&self) -> usize {
        self.short_window.max(self.long_window)
    }
}

/// Output of a full run: the indicator series and the parallel portfolio
/// series, one entry each per input bar.
#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub series: Vec<IndicatorBar>,
    pub states: Vec<PortfolioState>,
    pub initial_cash: f64,
}

impl BacktestResult {
    pub fn final_value(&self) -> f64 {
        self.states.last().map(|s| s.total_value).unwrap_or(0.0)
    }

    pub fn profit_loss(&self) -> f64 {
        self.final_value() - self.initial_cash
    }

    /// ROI as a percentage of initial cash.
    pub fn roi_pct(&self) -> f64 {
        (self.final_value() - self.initial_cash) / self.initial_cash * 100.0
    }
}

/// Run the full pipeline over an already-loaded series: signals, then the
/// portfolio walk. Fails before computing anything if the series is shorter
/// than the longest SMA window (every signal would degrade to Hold).
pub fn run_backtest(
    bars: &[PriceBar],
    config: &StrategyConfig,
) -> Result<BacktestResult, SmacrossError> {
    if bars.is_empty() {
        return Err(SmacrossError::InvalidSeries {
            reason: "empty price series".to_string(),
        });
    }
    if bars.len() < config.min_bars() {
        return Err(SmacrossError::InsufficientData {
            symbol: config.symbol.clone(),
            bars: bars.len(),
            minimum: config.min_bars(),
        });
    }

    let series = signal_engine::compute_signals(bars, config)?;
    let states = simulator::simulate(&series, config)?;

    Ok(BacktestResult {
        series,
        states,
        initial_cash: config.initial_cash,
    })
}
