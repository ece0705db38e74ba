//! Simple Moving Average over a trailing window of bars.
//!
//! O(n) sliding window: a running sum gains the newest price and drops the
//! one falling out of the window. SMA(n) is undefined for the first (n-1)
//! bars, represented as `None`.

use super::bar::PriceBar;

/// Trailing SMA of `period` bars, one entry per input bar, aligned by index.
pub fn calc_sma(bars: &[PriceBar], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; bars.len()];
    }

    let mut values = Vec::with_capacity(bars.len());
    let mut window_sum: f64 = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        window_sum += bar.price;
        if i >= period {
            window_sum -= bars[i - period].price;
        }

        if i + 1 >= period {
            values.push(Some(window_sum / period as f64));
        } else {
            values.push(None);
        }
    }

    values
}
