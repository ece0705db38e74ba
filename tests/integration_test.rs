//! Integration tests for the full signal-and-simulation pipeline.
//!
//! Tests cover:
//! - Full pipeline with a mock price port (no files on disk)
//! - Warm-up gating and equal-SMA holds
//! - Known crossover run with hand-checked portfolio arithmetic
//! - Per-bar state invariants (value identity, cash non-negativity)
//! - Failure modes: empty series, insufficient data, malformed input

mod common;

use approx::assert_abs_diff_eq;
use common::*;
use smacross::domain::backtest::{run_backtest, StrategyConfig};
use smacross::domain::error::SmacrossError;
use smacross::domain::signal::Signal;
use smacross::domain::signal_engine::compute_signals;
use smacross::domain::simulator::simulate;
use smacross::ports::data_port::PricePort;

mod full_pipeline {
    use super::*;

    #[test]
    fn pipeline_with_mock_price_port() {
        let bars = daily_bars("2024-01-01", &[10.0, 10.0, 10.0, 11.0, 12.0, 13.0, 9.0, 8.0]);
        let port = MockPricePort::new().with_bars("META", bars);

        let fetched = port
            .fetch_prices("META", date(2024, 1, 1), date(2024, 1, 8))
            .unwrap();
        assert_eq!(fetched.len(), 8);

        let config = sample_config();
        let result = run_backtest(&fetched, &config).unwrap();

        assert_eq!(result.series.len(), 8);
        assert_eq!(result.states.len(), 8);
    }

    #[test]
    fn port_date_filter_limits_the_run() {
        let bars = daily_bars("2024-01-01", &[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]);
        let port = MockPricePort::new().with_bars("META", bars);

        let fetched = port
            .fetch_prices("META", date(2024, 1, 2), date(2024, 1, 4))
            .unwrap();
        assert_eq!(fetched.len(), 3);
        assert_eq!(fetched[0].price, 11.0);
    }

    #[test]
    fn port_error_propagates() {
        let port = MockPricePort::new().with_error("META", "connection refused");
        let err = port
            .fetch_prices("META", date(2024, 1, 1), date(2024, 1, 31))
            .unwrap_err();
        assert!(matches!(err, SmacrossError::Data { .. }));
    }

    #[test]
    fn known_crossover_run_hand_checked() {
        // Gate opens at index 3 (3 calendar days past the first bar).
        // i3 (price 11): Buy 5, cash 45. i4 (12): Buy 3, cash 9.
        // i5 (13): Buy affordable=0, no-op. i6 (9): Sell 8 -> cash 81.
        // i7 (8): Sell with no shares, no-op.
        let bars = daily_bars("2024-01-01", &[10.0, 10.0, 10.0, 11.0, 12.0, 13.0, 9.0, 8.0]);
        let config = sample_config();
        let result = run_backtest(&bars, &config).unwrap();

        let signals: Vec<Signal> = result.series.iter().map(|b| b.signal).collect();
        assert_eq!(
            signals,
            vec![
                Signal::Hold,
                Signal::Hold,
                Signal::Hold,
                Signal::Buy,
                Signal::Buy,
                Signal::Buy,
                Signal::Sell,
                Signal::Sell,
            ]
        );

        let states = &result.states;
        assert_eq!(states[3].shares, 5);
        assert_abs_diff_eq!(states[3].cash, 45.0);
        assert_eq!(states[4].shares, 8);
        assert_abs_diff_eq!(states[4].cash, 9.0);
        assert_eq!(states[5].shares, 8);
        assert_abs_diff_eq!(states[5].cash, 9.0);
        assert_eq!(states[6].shares, 0);
        assert_abs_diff_eq!(states[6].cash, 81.0);
        assert_eq!(states[7].shares, 0);

        assert_abs_diff_eq!(result.final_value(), 81.0);
        assert_abs_diff_eq!(result.profit_loss(), -19.0);
        assert_eq!(result.roi_pct().round() as i64, -19);
    }

    #[test]
    fn flat_five_bar_scenario_holds_throughout() {
        let bars = daily_bars("2024-01-01", &[10.0, 10.0, 10.0, 10.0, 10.0]);
        let config = sample_config();
        let result = run_backtest(&bars, &config).unwrap();

        assert!(result.series.iter().all(|b| b.signal == Signal::Hold));
        for state in &result.states {
            assert_eq!(state.shares, 0);
            assert_abs_diff_eq!(state.total_value, 100.0);
        }
    }
}

mod invariants {
    use super::*;

    #[test]
    fn warmup_bars_hold_regardless_of_sma_direction() {
        // Steeply rising: SMAs would say Buy from the first defined bar,
        // but the calendar gate forces Hold until 3 days have elapsed.
        let bars = daily_bars("2024-01-01", &[10.0, 20.0, 30.0, 40.0, 50.0]);
        let config = sample_config();
        let series = compute_signals(&bars, &config).unwrap();

        assert_eq!(series[2].signal, Signal::Hold);
        assert!(series[2].short_sma.is_some());
        assert!(series[2].long_sma.is_some());
        assert_eq!(series[3].signal, Signal::Buy);
    }

    #[test]
    fn total_value_identity_on_every_bar() {
        let bars = daily_bars(
            "2024-01-01",
            &[10.0, 10.0, 10.0, 11.0, 12.0, 13.0, 9.0, 8.0, 10.5, 11.75],
        );
        let config = sample_config();
        let result = run_backtest(&bars, &config).unwrap();

        for (state, bar) in result.states.iter().zip(result.series.iter()) {
            let expected = state.cash + state.shares as f64 * bar.price;
            assert_abs_diff_eq!(state.total_value, expected, epsilon = 1e-9);
            assert!(state.cash >= 0.0);
            assert!(state.shares >= 0);
        }
    }

    #[test]
    fn signal_engine_is_idempotent() {
        let bars = daily_bars("2024-01-01", &[10.0, 12.0, 9.0, 14.0, 11.0, 13.0, 15.0]);
        let config = sample_config();

        let first = compute_signals(&bars, &config).unwrap();
        let second = compute_signals(&bars, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn sell_adds_exactly_shares_times_price() {
        let bars = daily_bars("2024-01-01", &[10.0, 10.0, 10.0, 11.0, 12.0, 13.0, 9.0]);
        let config = sample_config();
        let result = run_backtest(&bars, &config).unwrap();

        let before = &result.states[5];
        let after = &result.states[6];
        assert_eq!(after.shares, 0);
        let expected_cash = before.cash + before.shares as f64 * result.series[6].price;
        assert_abs_diff_eq!(after.cash, expected_cash, epsilon = 1e-9);
    }
}

mod failure_modes {
    use super::*;

    #[test]
    fn empty_series_is_rejected() {
        let config = sample_config();
        let err = run_backtest(&[], &config).unwrap_err();
        assert!(matches!(err, SmacrossError::InvalidSeries { .. }));
    }

    #[test]
    fn series_shorter_than_long_window_is_insufficient() {
        let bars = daily_bars("2024-01-01", &[10.0, 11.0]);
        let config = sample_config();
        let err = run_backtest(&bars, &config).unwrap_err();
        assert!(matches!(
            err,
            SmacrossError::InsufficientData {
                bars: 2,
                minimum: 3,
                ..
            }
        ));
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut bars = daily_bars("2024-01-01", &[10.0, 11.0, 12.0, 13.0]);
        bars[2].price = -1.0;
        let config = sample_config();
        let err = run_backtest(&bars, &config).unwrap_err();
        assert!(matches!(err, SmacrossError::InvalidSeries { .. }));
    }

    #[test]
    fn non_chronological_series_is_rejected() {
        let mut bars = daily_bars("2024-01-01", &[10.0, 11.0, 12.0, 13.0]);
        bars.swap(1, 2);
        let config = sample_config();
        let err = run_backtest(&bars, &config).unwrap_err();
        assert!(matches!(err, SmacrossError::InvalidSeries { .. }));
    }

    #[test]
    fn simulator_rejects_empty_input_directly() {
        let config = sample_config();
        let err = simulate(&[], &config).unwrap_err();
        assert!(matches!(err, SmacrossError::InvalidSeries { .. }));
    }
}

mod windows {
    use super::*;

    #[test]
    fn short_window_longer_than_long_window_still_runs() {
        // Unconventional but allowed; the signal comparison just inverts.
        let config = StrategyConfig {
            short_window: 3,
            long_window: 2,
            ..sample_config()
        };
        let bars = daily_bars("2024-01-01", &[10.0, 11.0, 12.0, 13.0, 14.0]);
        let result = run_backtest(&bars, &config).unwrap();

        // Rising series: the 3-bar mean lags below the 2-bar mean.
        assert_eq!(result.series[3].signal, Signal::Sell);
    }

    #[test]
    fn window_of_one_each_always_equal() {
        let config = StrategyConfig {
            short_window: 1,
            long_window: 1,
            ..sample_config()
        };
        let bars = daily_bars("2024-01-01", &[10.0, 11.0, 12.0]);
        let result = run_backtest(&bars, &config).unwrap();

        assert!(result.series.iter().all(|b| b.signal == Signal::Hold));
    }
}
