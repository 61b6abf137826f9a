use analysis_core::{AnalysisError, BollingerBands, IndicatorValue, PriceSeries};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

const TRADING_DAYS_PER_YEAR: usize = 252;

/// Compound annual growth of the closing price over `years`, as a
/// percentage rounded to 2 decimals.
pub fn historical_performance(prices: &PriceSeries, years: u32) -> Result<f64, AnalysisError> {
    if years == 0 {
        return Err(AnalysisError::DegenerateInput(
            "historical performance over a zero-year window".to_string(),
        ));
    }

    let required = years as usize * TRADING_DAYS_PER_YEAR;
    if prices.len() < required {
        return Err(AnalysisError::InsufficientData {
            required,
            available: prices.len(),
        });
    }

    let first_close = prices.first().map(|b| b.close).unwrap_or(0.0);
    let last_close = prices.last().map(|b| b.close).unwrap_or(0.0);
    if first_close <= 0.0 {
        // No usable baseline bar; a longer lookback could still supply one.
        return Err(AnalysisError::InsufficientData { required, available: 0 });
    }

    let annual_return = (last_close / first_close).powf(1.0 / f64::from(years)) - 1.0;
    Ok(round2(annual_return * 100.0))
}

/// Simple mean of the most recent `h` closes for each configured horizon.
/// Horizons longer than the series stay in the result as explicit
/// unavailable markers; only when every horizon is unavailable does the
/// whole computation fail.
pub fn moving_averages(
    prices: &PriceSeries,
    horizons: &[u32],
) -> Result<BTreeMap<u32, IndicatorValue>, AnalysisError> {
    if horizons.is_empty() {
        return Err(AnalysisError::DegenerateInput(
            "no moving-average horizons configured".to_string(),
        ));
    }

    let closes = prices.closes();
    let mut averages = BTreeMap::new();
    for &horizon in horizons {
        let window = horizon as usize;
        let value = if window == 0 || closes.len() < window {
            IndicatorValue::Unavailable { required: window, available: closes.len() }
        } else {
            let mean = closes[closes.len() - window..].iter().sum::<f64>() / window as f64;
            IndicatorValue::Computed { value: round2(mean) }
        };
        averages.insert(horizon, value);
    }

    if averages
        .values()
        .all(|v| matches!(v, IndicatorValue::Unavailable { .. }))
    {
        let required = horizons.iter().copied().min().unwrap_or(0) as usize;
        return Err(AnalysisError::InsufficientData {
            required,
            available: closes.len(),
        });
    }

    Ok(averages)
}

/// Relative Strength Index over the most recent `period` day-over-day
/// changes, evaluated at the last bar. Average gain and loss are simple
/// means over the window. All-gain windows read 100, flat windows 50.
pub fn rsi(prices: &PriceSeries, period: usize) -> Result<f64, AnalysisError> {
    if period == 0 {
        return Err(AnalysisError::DegenerateInput(
            "RSI period must be positive".to_string(),
        ));
    }
    if prices.len() < period + 1 {
        return Err(AnalysisError::InsufficientData {
            required: period + 1,
            available: prices.len(),
        });
    }

    let closes = prices.closes();
    let window = &closes[closes.len() - (period + 1)..];

    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for w in window.windows(2) {
        let change = w[1] - w[0];
        if change > 0.0 {
            gain_sum += change;
        } else {
            loss_sum += -change;
        }
    }

    let average_gain = gain_sum / period as f64;
    let average_loss = loss_sum / period as f64;

    let value = if average_loss == 0.0 {
        if average_gain > 0.0 { 100.0 } else { 50.0 }
    } else {
        let rs = average_gain / average_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    Ok(round2(value))
}

/// Bollinger bands at the most recent bar: rolling mean of the last
/// `window` closes, plus and minus two sample standard deviations.
pub fn bollinger_bands(
    prices: &PriceSeries,
    window: usize,
) -> Result<BollingerBands, AnalysisError> {
    if window < 2 {
        return Err(AnalysisError::DegenerateInput(
            "Bollinger window must be at least 2 bars".to_string(),
        ));
    }
    if prices.len() < window {
        return Err(AnalysisError::InsufficientData {
            required: window,
            available: prices.len(),
        });
    }

    let closes = prices.closes();
    let slice = &closes[closes.len() - window..];
    let rolling_mean = slice.mean();
    let rolling_std = slice.std_dev();

    Ok(BollingerBands {
        upper_band: round2(rolling_mean + 2.0 * rolling_std),
        lower_band: round2(rolling_mean - 2.0 * rolling_std),
    })
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
