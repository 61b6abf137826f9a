use analysis_core::{AnalysisError, DailyReturn, PriceSeries, ReturnSeries, RiskMetrics};
use chrono::NaiveDate;
use statrs::statistics::Statistics;
use std::collections::HashMap;


/// Daily simple returns from closing prices. A zero prior close makes that
/// day's return undefined; the entry stays in the series marked missing.
pub fn daily_returns(prices: &PriceSeries) -> Result<ReturnSeries, AnalysisError> {
    if prices.len() < 2 {
        return Err(AnalysisError::InsufficientData {
            required: 2,
            available: prices.len(),
        });
    }

    let returns = prices
        .bars()
        .windows(2)
        .map(|w| {
            let value = if w[0].close == 0.0 {
                None
            } else {
                Some(w[1].close / w[0].close - 1.0)
            };
            DailyReturn { date: w[1].date, value }
        })
        .collect();

    Ok(ReturnSeries::new(returns))
}

/// Annualized volatility: sample standard deviation of daily returns
/// scaled by the square root of 252 trading days.
pub fn annualized_volatility(returns: &ReturnSeries) -> Result<f64, AnalysisError> {
    let values: Vec<f64> = returns.defined().map(|(_, v)| v).collect();
    if values.len() < 2 {
        return Err(AnalysisError::InsufficientData {
            required: 2,
            available: values.len(),
        });
    }

    Ok(values.std_dev() * (252.0_f64).sqrt())
}

/// Market beta: covariance of stock and benchmark returns over the
/// benchmark's variance, after an inner join on date. Dates present in
/// only one series (or with an undefined return) are dropped.
pub fn beta(stock: &ReturnSeries, benchmark: &ReturnSeries) -> Result<f64, AnalysisError> {
    let benchmark_by_date: HashMap<NaiveDate, f64> = benchmark.defined().collect();

    let pairs: Vec<(f64, f64)> = stock
        .defined()
        .filter_map(|(date, r)| benchmark_by_date.get(&date).map(|&b| (r, b)))
        .collect();

    let n = pairs.len();
    if n < 2 {
        return Err(AnalysisError::DegenerateInput(format!(
            "only {n} overlapping return observations between stock and benchmark"
        )));
    }

    let stock_mean = pairs.iter().map(|(s, _)| s).sum::<f64>() / n as f64;
    let benchmark_mean = pairs.iter().map(|(_, b)| b).sum::<f64>() / n as f64;

    let mut covariance = 0.0;
    let mut benchmark_variance = 0.0;
    for (s, b) in &pairs {
        let stock_diff = s - stock_mean;
        let benchmark_diff = b - benchmark_mean;
        covariance += stock_diff * benchmark_diff;
        benchmark_variance += benchmark_diff * benchmark_diff;
    }

    if benchmark_variance == 0.0 {
        return Err(AnalysisError::DegenerateInput(
            "benchmark variance is zero (flat benchmark)".to_string(),
        ));
    }

    Ok(covariance / benchmark_variance)
}

pub struct RiskAnalysisEngine;

impl RiskAnalysisEngine {
    pub fn new() -> Self {
        Self
    }

    /// Risk metrics for a ticker against a benchmark over the same
    /// calendar window. Results are rounded to 4 decimals here, at the
    /// boundary; everything upstream runs at full precision.
    pub fn analyze(
        &self,
        ticker: &str,
        stock: &PriceSeries,
        benchmark: &PriceSeries,
    ) -> Result<RiskMetrics, AnalysisError> {
        let stock_returns = daily_returns(stock)?;
        let benchmark_returns = daily_returns(benchmark)?;

        let volatility = annualized_volatility(&stock_returns)?;
        let beta = beta(&stock_returns, &benchmark_returns)?;

        Ok(RiskMetrics {
            ticker: ticker.to_string(),
            volatility: round4(volatility),
            beta: round4(beta),
        })
    }
}

impl Default for RiskAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
