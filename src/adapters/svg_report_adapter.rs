//! SVG chart rendering and summary formatting.
//!
//! The chart shows the adjusted close with both SMAs, plus sparse Buy/Sell
//! markers: marker indices are sampled with a stride of `floor(n / 83)`
//! (clamped to 1) so long series stay readable. Markers sit on the
//! short-SMA line.

use crate::domain::backtest::{BacktestResult, StrategyConfig};
use crate::domain::error::SmacrossError;
use crate::domain::signal::Signal;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::Path;

const WIDTH: f64 = 960.0;
const HEIGHT: f64 = 480.0;
const PADDING: f64 = 50.0;
const MARKER_TARGET: usize = 83;

/// The four human-facing summary lines.
pub fn format_summary(result: &BacktestResult) -> String {
    format!(
        "Initial Cash: {:.2}\n\
         Final Portfolio Value: {:.2}\n\
         Profit/Loss: {:.2}\n\
         ROI: {}%\n",
        result.initial_cash,
        result.final_value(),
        result.profit_loss(),
        result.roi_pct().round() as i64,
    )
}

/// Stride between plotted markers for a series of `len` bars.
pub fn marker_step(len: usize) -> usize {
    (len / MARKER_TARGET).max(1)
}

pub struct SvgReportAdapter;

impl SvgReportAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn render_chart(&self, result: &BacktestResult, config: &StrategyConfig) -> String {
        let series = &result.series;
        if series.is_empty() {
            return String::from("<svg xmlns=\"http://www.w3.org/2000/svg\"></svg>");
        }

        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for bar in series {
            min_y = min_y.min(bar.price);
            max_y = max_y.max(bar.price);
            for value in [bar.short_sma, bar.long_sma].into_iter().flatten() {
                min_y = min_y.min(value);
                max_y = max_y.max(value);
            }
        }

        let plot_width = WIDTH - 2.0 * PADDING;
        let plot_height = HEIGHT - 2.0 * PADDING;
        let range = max_y - min_y;
        let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
        let scale_x = if series.len() > 1 {
            plot_width / (series.len() - 1) as f64
        } else {
            0.0
        };

        let x_of = |i: usize| PADDING + i as f64 * scale_x;
        let y_of = |v: f64| HEIGHT - PADDING - (v - min_y) * scale_y;

        let price_points = polyline(series.iter().enumerate().map(|(i, b)| (x_of(i), y_of(b.price))));
        let short_points = polyline(
            series
                .iter()
                .enumerate()
                .filter_map(|(i, b)| b.short_sma.map(|v| (x_of(i), y_of(v)))),
        );
        let long_points = polyline(
            series
                .iter()
                .enumerate()
                .filter_map(|(i, b)| b.long_sma.map(|v| (x_of(i), y_of(v)))),
        );

        let step = marker_step(series.len());
        let mut markers = String::new();
        for signal in [Signal::Buy, Signal::Sell] {
            let indices: Vec<usize> = series
                .iter()
                .enumerate()
                .filter(|(_, b)| b.signal == signal)
                .map(|(i, _)| i)
                .collect();
            for &i in indices.iter().step_by(step) {
                // Markers are anchored to the short SMA, as the source plot does.
                let Some(value) = series[i].short_sma else {
                    continue;
                };
                markers.push_str(&triangle(x_of(i), y_of(value), signal));
            }
        }

        let title = format!(
            "{} adj. closing price and {}-day / {}-day SMAs with Buy/Sell Signals (Sparse)",
            config.symbol, config.short_window, config.long_window
        );

        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.0} {height:.0}">
  <rect width="{width:.0}" height="{height:.0}" fill="white"/>
  <text x="{mid:.0}" y="24" text-anchor="middle" font-family="sans-serif" font-size="14">{title}</text>
  <line x1="{pad:.0}" y1="{pad:.0}" x2="{pad:.0}" y2="{bottom:.0}" stroke="black" stroke-width="1"/>
  <line x1="{pad:.0}" y1="{bottom:.0}" x2="{right:.0}" y2="{bottom:.0}" stroke="black" stroke-width="1"/>
  <polyline fill="none" stroke="gray" stroke-width="1" points="{price}"/>
  <polyline fill="none" stroke="blue" stroke-width="1" points="{short}"/>
  <polyline fill="none" stroke="orange" stroke-width="1" points="{long}"/>
{markers}</svg>
"#,
            width = WIDTH,
            height = HEIGHT,
            mid = WIDTH / 2.0,
            title = title,
            pad = PADDING,
            bottom = HEIGHT - PADDING,
            right = WIDTH - PADDING,
            price = price_points,
            short = short_points,
            long = long_points,
            markers = markers,
        )
    }
}

impl Default for SvgReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for SvgReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        config: &StrategyConfig,
        output_path: &Path,
    ) -> Result<(), SmacrossError> {
        let svg = self.render_chart(result, config);
        fs::write(output_path, svg)?;
        Ok(())
    }
}

fn polyline(points: impl Iterator<Item = (f64, f64)>) -> String {
    points
        .map(|(x, y)| format!("{:.1},{:.1}", x, y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn triangle(x: f64, y: f64, signal: Signal) -> String {
    let size = 5.0;
    let (points, color) = match signal {
        // Up-triangle for Buy, down-triangle for Sell.
        Signal::Buy => (
            format!(
                "{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}",
                x,
                y - size,
                x - size,
                y + size,
                x + size,
                y + size
            ),
            "green",
        ),
        _ => (
            format!(
                "{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}",
                x,
                y + size,
                x - size,
                y - size,
                x + size,
                y - size
            ),
            "red",
        ),
    };
    format!("  <polygon points=\"{}\" fill=\"{}\"/>\n", points, color)
}
