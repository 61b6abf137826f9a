use crate::AnalysisError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Statement kind requested from the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    Income,
    Balance,
    CashFlow,
}

/// Income statement for a single reporting period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatementPeriod {
    pub total_revenue: f64,
    pub gross_profit: f64,
    pub operating_income: f64,
    pub net_income: f64,
    pub cost_of_revenue: f64,
}

/// Balance sheet for a single reporting period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheetPeriod {
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub total_equity: f64,
    pub current_assets: f64,
    pub current_liabilities: f64,
}

/// Cash flow statement for a single reporting period.
/// `free_cash_flow` is always derived as operating cash flow plus
/// capital expenditures (provider-signed, negative for outflows),
/// never read from the raw table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowStatementPeriod {
    pub operating_cash_flow: f64,
    pub investing_cash_flow: f64,
    pub financing_cash_flow: f64,
    pub free_cash_flow: f64,
    pub capital_expenditures: f64,
    pub repurchase_of_stock: f64,
    pub long_term_debt_issuance: f64,
    pub long_term_debt_repayment: f64,
    pub end_cash_position: f64,
}

/// One raw reporting period as delivered by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawStatementPeriod {
    pub period_end: NaiveDate,
    pub fields: HashMap<String, f64>,
}

/// Raw multi-period statement table, most recent period first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawStatementTable {
    pub periods: Vec<RawStatementPeriod>,
}

/// Outcome of normalizing one reporting period
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PeriodOutcome<T> {
    Normalized { record: T },
    Failed { error: AnalysisError },
}

#[derive(Debug, Clone, Serialize)]
pub struct StatementPeriod<T> {
    pub period_end: NaiveDate,
    pub outcome: PeriodOutcome<T>,
}

/// Normalized statement history for one kind, most recent period first.
/// Failed periods stay in the history with the error that sank them.
#[derive(Debug, Clone, Serialize)]
pub struct StatementHistory<T> {
    pub periods: Vec<StatementPeriod<T>>,
}

impl<T> StatementHistory<T> {
    /// Periods that normalized cleanly
    pub fn normalized(&self) -> impl Iterator<Item = (NaiveDate, &T)> {
        self.periods.iter().filter_map(|p| match &p.outcome {
            PeriodOutcome::Normalized { record } => Some((p.period_end, record)),
            PeriodOutcome::Failed { .. } => None,
        })
    }

    /// Periods that failed, with the reason
    pub fn failed(&self) -> impl Iterator<Item = (NaiveDate, &AnalysisError)> {
        self.periods.iter().filter_map(|p| match &p.outcome {
            PeriodOutcome::Normalized { .. } => None,
            PeriodOutcome::Failed { error } => Some((p.period_end, error)),
        })
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

/// Normalized statement histories packaged for the narration agents
#[derive(Debug, Clone, Serialize)]
pub struct EarningsReport {
    pub ticker: String,
    pub income_statement: StatementHistory<IncomeStatementPeriod>,
    pub balance_sheet: StatementHistory<BalanceSheetPeriod>,
    pub cash_flow_statement: StatementHistory<CashFlowStatementPeriod>,
}
