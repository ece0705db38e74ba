//! Report generation port trait.

use crate::domain::backtest::{BacktestResult, StrategyConfig};
use crate::domain::error::SmacrossError;
use std::path::Path;

/// Port for rendering a backtest result to disk.
pub trait ReportPort {
    fn write(
        &self,
        result: &BacktestResult,
        config: &StrategyConfig,
        output_path: &Path,
    ) -> Result<(), SmacrossError>;
}
