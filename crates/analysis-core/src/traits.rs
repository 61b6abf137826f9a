use crate::{AnalysisError, Bar, RawStatementTable, StatementKind};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Daily-history window requested from the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookbackWindow {
    Years(u32),
    Days(u32),
}

/// Interface the engine needs from the market-data layer. Implementations
/// own fetching, retries and rate limits; the engine only consumes the
/// already-fetched history.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily OHLCV history for a symbol over the given window, in any
    /// provider order. Callers normalize via `PriceSeries::from_bars`.
    async fn daily_bars(
        &self,
        symbol: &str,
        window: LookbackWindow,
    ) -> Result<Vec<Bar>, AnalysisError>;

    /// Raw multi-period statement table for a symbol
    async fn statements(
        &self,
        symbol: &str,
        kind: StatementKind,
    ) -> Result<RawStatementTable, AnalysisError>;
}
