use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Daily OHLCV bar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Ordered, de-duplicated daily bar sequence. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Build a series from raw provider history. Bars are sorted ascending
    /// by date; when the provider re-delivers a date, the last row wins.
    pub fn from_bars(mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.date);

        let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(prev) if prev.date == bar.date => *prev = bar,
                _ => deduped.push(bar),
            }
        }
        Self { bars: deduped }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}

/// One day's simple return; `value` is `None` when the prior close was zero
/// and the return is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyReturn {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// Per-bar simple returns; one fewer element than the source series.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReturnSeries {
    returns: Vec<DailyReturn>,
}

impl ReturnSeries {
    pub fn new(returns: Vec<DailyReturn>) -> Self {
        Self { returns }
    }

    pub fn len(&self) -> usize {
        self.returns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DailyReturn> {
        self.returns.iter()
    }

    /// Dated returns with the undefined entries filtered out.
    pub fn defined(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.returns.iter().filter_map(|r| r.value.map(|v| (r.date, v)))
    }
}

/// Volatility and market sensitivity for a ticker. Recomputed fresh on
/// every request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub ticker: String,
    pub volatility: f64,
    pub beta: f64,
}

/// Per-item computation outcome, tagged so "missing" stays distinguishable
/// from a legitimately zero value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IndicatorValue {
    Computed { value: f64 },
    Unavailable { required: usize, available: usize },
}

/// Volatility envelope evaluated at the most recent bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerBands {
    pub upper_band: f64,
    pub lower_band: f64,
}

/// Long-horizon indicator snapshot. Moving averages are keyed by horizon
/// length in trading days; horizons without enough history carry an
/// explicit unavailable marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalSnapshot {
    pub historical_performance: f64,
    pub beta: f64,
    pub moving_averages: BTreeMap<u32, IndicatorValue>,
    pub rsi: f64,
    pub bollinger_bands: BollingerBands,
}

/// Risk and indicator outputs packaged for the narration agents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAnalysis {
    pub ticker: String,
    pub risk: RiskMetrics,
    pub technical: TechnicalSnapshot,
}
