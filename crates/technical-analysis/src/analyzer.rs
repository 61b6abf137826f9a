use analysis_core::{AnalysisError, PriceSeries, TechnicalSnapshot};

use crate::indicators::{
    bollinger_bands, historical_performance, moving_averages, round4, rsi,
};

/// Builds the long-horizon indicator snapshot consumed by the narration
/// agents. Moving-average gaps surface as partial results; the remaining
/// indicators fail the snapshot when their own minimum window is unmet.
pub struct TechnicalAnalysisEngine {
    pub horizons: Vec<u32>,
    pub rsi_period: usize,
    pub bollinger_window: usize,
}

impl Default for TechnicalAnalysisEngine {
    fn default() -> Self {
        Self {
            horizons: vec![200, 500, 1000],
            rsi_period: 14,
            bollinger_window: 200,
        }
    }
}

impl TechnicalAnalysisEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot over `years` of history. `beta` comes from the risk module
    /// over the same window and is rounded to 4 decimals here, at the
    /// result boundary.
    pub fn snapshot(
        &self,
        prices: &PriceSeries,
        beta: f64,
        years: u32,
    ) -> Result<TechnicalSnapshot, AnalysisError> {
        let historical_performance = historical_performance(prices, years)?;
        let moving_averages = moving_averages(prices, &self.horizons)?;
        let rsi = rsi(prices, self.rsi_period)?;
        let bollinger_bands = bollinger_bands(prices, self.bollinger_window)?;

        Ok(TechnicalSnapshot {
            historical_performance,
            beta: round4(beta),
            moving_averages,
            rsi,
            bollinger_bands,
        })
    }
}
