//! Trade signal derived from the SMA crossover.

use std::fmt;

/// Per-bar signal. `Hold` covers the warm-up period, equal SMAs, and
/// undefined SMAs; a crossing flips directly between `Buy` and `Sell`
/// with no intervening `Hold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Hold,
    Buy,
    Sell,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Hold => write!(f, "Hold"),
            Signal::Buy => write!(f, "Buy"),
            Signal::Sell => write!(f, "Sell"),
        }
    }
}
