use analysis_core::{
    AnalysisError, BalanceSheetPeriod, CashFlowStatementPeriod, EarningsReport,
    IncomeStatementPeriod, LookbackWindow, MarketDataProvider, PriceSeries, RiskMetrics,
    StatementHistory, StatementKind, StockAnalysis, TechnicalSnapshot,
};
use earnings_analysis::{normalize_balance, normalize_cash_flow, normalize_income};
use risk_analysis::{daily_returns, RiskAnalysisEngine};
use serde::{Deserialize, Serialize};
use technical_analysis::TechnicalAnalysisEngine;


/// Tunables for the analysis tools. Defaults mirror the narration agents'
/// settings: a 1-year risk window, a 10-year technical window, and the
/// S&P 500 as the benchmark index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub benchmark_symbol: String,
    pub risk_lookback_years: u32,
    pub technical_lookback_years: u32,
    pub ma_horizons: Vec<u32>,
    pub rsi_period: usize,
    pub bollinger_window: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            benchmark_symbol: "^GSPC".to_string(),
            risk_lookback_years: 1,
            technical_lookback_years: 10,
            ma_horizons: vec![200, 500, 1000],
            rsi_period: 14,
            bollinger_window: 200,
        }
    }
}

impl AnalysisConfig {
    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(symbol) = std::env::var("BENCHMARK_SYMBOL") {
            if !symbol.is_empty() {
                config.benchmark_symbol = symbol;
            }
        }
        config
    }
}

/// Runs the named analysis tools over a market-data provider and packages
/// their outputs for the external agent layer. Every invocation fetches
/// and computes fresh; nothing is cached across requests.
pub struct AnalysisOrchestrator<P> {
    provider: P,
    config: AnalysisConfig,
    risk_engine: RiskAnalysisEngine,
}

impl<P: MarketDataProvider> AnalysisOrchestrator<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, AnalysisConfig::from_env())
    }

    pub fn with_config(provider: P, config: AnalysisConfig) -> Self {
        Self {
            provider,
            config,
            risk_engine: RiskAnalysisEngine::new(),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Risk analysis tool: annualized volatility and benchmark beta over
    /// the risk lookback window.
    pub async fn risk_analysis(&self, ticker: &str) -> Result<RiskMetrics, AnalysisError> {
        tracing::info!("Running risk analysis for {}", ticker);

        let window = LookbackWindow::Years(self.config.risk_lookback_years);
        let (stock_bars, benchmark_bars) = tokio::join!(
            self.provider.daily_bars(ticker, window),
            self.provider.daily_bars(&self.config.benchmark_symbol, window),
        );

        let stock = PriceSeries::from_bars(stock_bars?);
        let benchmark = PriceSeries::from_bars(benchmark_bars?);

        self.risk_engine.analyze(ticker, &stock, &benchmark)
    }

    /// Technical analysis tool: long-horizon indicator snapshot over the
    /// technical lookback window, with beta from the same window.
    pub async fn technical_analysis(
        &self,
        ticker: &str,
    ) -> Result<TechnicalSnapshot, AnalysisError> {
        tracing::info!("Running technical analysis for {}", ticker);

        let years = self.config.technical_lookback_years;
        let window = LookbackWindow::Years(years);
        let (stock_bars, benchmark_bars) = tokio::join!(
            self.provider.daily_bars(ticker, window),
            self.provider.daily_bars(&self.config.benchmark_symbol, window),
        );

        let stock = PriceSeries::from_bars(stock_bars?);
        let benchmark = PriceSeries::from_bars(benchmark_bars?);

        let beta = risk_analysis::beta(&daily_returns(&stock)?, &daily_returns(&benchmark)?)?;

        let engine = TechnicalAnalysisEngine {
            horizons: self.config.ma_horizons.clone(),
            rsi_period: self.config.rsi_period,
            bollinger_window: self.config.bollinger_window,
        };
        engine.snapshot(&stock, beta, years)
    }

    /// Earnings report tool: normalized statement histories for all three
    /// statement kinds. Per-period failures stay in the histories.
    pub async fn earnings_report(&self, ticker: &str) -> Result<EarningsReport, AnalysisError> {
        tracing::info!("Running earnings report for {}", ticker);

        let (income, balance, cash_flow) = tokio::join!(
            self.provider.statements(ticker, StatementKind::Income),
            self.provider.statements(ticker, StatementKind::Balance),
            self.provider.statements(ticker, StatementKind::CashFlow),
        );

        Ok(assemble_earnings_report(
            ticker,
            normalize_income(&income?),
            normalize_balance(&balance?),
            normalize_cash_flow(&cash_flow?),
        ))
    }

    /// Risk and technical tools combined into one stock analysis
    pub async fn analyze_stock(&self, ticker: &str) -> Result<StockAnalysis, AnalysisError> {
        let (risk, technical) = tokio::join!(
            self.risk_analysis(ticker),
            self.technical_analysis(ticker),
        );

        Ok(assemble_stock_analysis(ticker, risk?, technical?))
    }
}

/// Package risk and indicator outputs into the structure the narration
/// agents consume.
pub fn assemble_stock_analysis(
    ticker: &str,
    risk: RiskMetrics,
    technical: TechnicalSnapshot,
) -> StockAnalysis {
    StockAnalysis {
        ticker: ticker.to_string(),
        risk,
        technical,
    }
}

/// Package the per-kind statement histories into one earnings report
pub fn assemble_earnings_report(
    ticker: &str,
    income_statement: StatementHistory<IncomeStatementPeriod>,
    balance_sheet: StatementHistory<BalanceSheetPeriod>,
    cash_flow_statement: StatementHistory<CashFlowStatementPeriod>,
) -> EarningsReport {
    for (period, error) in income_statement
        .failed()
        .chain(balance_sheet.failed())
        .chain(cash_flow_statement.failed())
    {
        tracing::warn!("{}: statement period {} failed: {}", ticker, period, error);
    }

    EarningsReport {
        ticker: ticker.to_string(),
        income_statement,
        balance_sheet,
        cash_flow_statement,
    }
}
