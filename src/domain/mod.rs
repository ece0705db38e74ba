//! Core domain types and logic.

pub mod bar;
pub mod signal;
pub mod sma;
pub mod signal_engine;
pub mod simulator;
pub mod backtest;
pub mod config_validation;
pub mod error;
