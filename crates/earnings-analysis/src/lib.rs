use analysis_core::{
    AnalysisError, BalanceSheetPeriod, CashFlowStatementPeriod, IncomeStatementPeriod,
    PeriodOutcome, RawStatementPeriod, RawStatementTable, StatementHistory, StatementPeriod,
};
/// Normalize a raw income-statement table into typed per-period records.
pub fn normalize_income(table: &RawStatementTable) -> StatementHistory<IncomeStatementPeriod> {
    normalize_table(table, "income statement", normalize_income_period)
}

/// Normalize a raw balance-sheet table into typed per-period records.
pub fn normalize_balance(table: &RawStatementTable) -> StatementHistory<BalanceSheetPeriod> {
    normalize_table(table, "balance sheet", normalize_balance_period)
}

/// Normalize a raw cash-flow table into typed per-period records with
/// derived free cash flow.
pub fn normalize_cash_flow(
    table: &RawStatementTable,
) -> StatementHistory<CashFlowStatementPeriod> {
    normalize_table(table, "cash flow statement", normalize_cash_flow_period)
}

/// Periods are processed independently: a failure on one period records
/// the error in its slot and never blocks the siblings.
fn normalize_table<T>(
    table: &RawStatementTable,
    kind: &str,
    normalize: impl Fn(&RawStatementPeriod) -> Result<T, AnalysisError>,
) -> StatementHistory<T> {
    let periods = table
        .periods
        .iter()
        .map(|raw| {
            let outcome = match normalize(raw) {
                Ok(record) => PeriodOutcome::Normalized { record },
                Err(error) => {
                    tracing::warn!(
                        "Failed to normalize {} period {}: {}",
                        kind,
                        raw.period_end,
                        error
                    );
                    PeriodOutcome::Failed { error }
                }
            };
            StatementPeriod { period_end: raw.period_end, outcome }
        })
        .collect();

    StatementHistory { periods }
}

fn normalize_income_period(
    raw: &RawStatementPeriod,
) -> Result<IncomeStatementPeriod, AnalysisError> {
    Ok(IncomeStatementPeriod {
        total_revenue: required(raw, "Total Revenue")?,
        gross_profit: required(raw, "Gross Profit")?,
        operating_income: required(raw, "Operating Income")?,
        net_income: required(raw, "Net Income")?,
        cost_of_revenue: required(raw, "Cost of Revenue")?,
    })
}

fn normalize_balance_period(
    raw: &RawStatementPeriod,
) -> Result<BalanceSheetPeriod, AnalysisError> {
    Ok(BalanceSheetPeriod {
        total_assets: required(raw, "Total Assets")?,
        total_liabilities: required(raw, "Total Liabilities Net Minority Interest")?,
        total_equity: required(raw, "Total Equity Gross Minority Interest")?,
        current_assets: required(raw, "Total Current Assets")?,
        current_liabilities: required(raw, "Total Current Liabilities")?,
    })
}

fn normalize_cash_flow_period(
    raw: &RawStatementPeriod,
) -> Result<CashFlowStatementPeriod, AnalysisError> {
    let operating_cash_flow = required(raw, "Operating Cash Flow")?;
    let capital_expenditures = required(raw, "Capital Expenditure")?;

    // Derived, never read from the raw table: the provider's own
    // like-named field carries an ambiguous sign convention.
    let free_cash_flow = operating_cash_flow + capital_expenditures;

    Ok(CashFlowStatementPeriod {
        operating_cash_flow,
        investing_cash_flow: required(raw, "Investing Cash Flow")?,
        financing_cash_flow: required(raw, "Financing Cash Flow")?,
        free_cash_flow,
        capital_expenditures,
        repurchase_of_stock: required(raw, "Repurchase Of Capital Stock")?,
        long_term_debt_issuance: required(raw, "Issuance Of Debt")?,
        long_term_debt_repayment: required(raw, "Repayment Of Debt")?,
        end_cash_position: required(raw, "End Cash Position")?,
    })
}

fn required(raw: &RawStatementPeriod, field: &str) -> Result<f64, AnalysisError> {
    raw.fields
        .get(field)
        .copied()
        .ok_or_else(|| AnalysisError::MissingField {
            field: field.to_string(),
            period: raw.period_end,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn period(date: (i32, u32, u32), fields: &[(&str, f64)]) -> RawStatementPeriod {
        RawStatementPeriod {
            period_end: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            fields: fields
                .iter()
                .map(|(name, value)| (name.to_string(), *value))
                .collect(),
        }
    }

    fn income_fields() -> Vec<(&'static str, f64)> {
        vec![
            ("Total Revenue", 385_000_000_000.0),
            ("Gross Profit", 170_000_000_000.0),
            ("Operating Income", 114_000_000_000.0),
            ("Net Income", 97_000_000_000.0),
            ("Cost of Revenue", 215_000_000_000.0),
        ]
    }

    fn cash_flow_fields() -> Vec<(&'static str, f64)> {
        vec![
            ("Operating Cash Flow", 110_500_000_000.0),
            ("Investing Cash Flow", -3_700_000_000.0),
            ("Financing Cash Flow", -108_400_000_000.0),
            ("Capital Expenditure", -10_900_000_000.0),
            ("Repurchase Of Capital Stock", -77_500_000_000.0),
            ("Issuance Of Debt", 5_200_000_000.0),
            ("Repayment Of Debt", -11_100_000_000.0),
            ("End Cash Position", 30_700_000_000.0),
        ]
    }

    #[test]
    fn income_periods_normalize_independently() {
        let mut broken = income_fields();
        broken.retain(|(name, _)| *name != "Net Income");

        let table = RawStatementTable {
            periods: vec![
                period((2024, 9, 28), &income_fields()),
                period((2023, 9, 30), &broken),
                period((2022, 9, 24), &income_fields()),
            ],
        };

        let history = normalize_income(&table);
        assert_eq!(history.len(), 3);
        assert_eq!(history.normalized().count(), 2);

        let failures: Vec<_> = history.failed().collect();
        assert_eq!(failures.len(), 1);
        let (failed_period, error) = &failures[0];
        assert_eq!(*failed_period, NaiveDate::from_ymd_opt(2023, 9, 30).unwrap());
        assert_eq!(
            **error,
            AnalysisError::MissingField {
                field: "Net Income".to_string(),
                period: NaiveDate::from_ymd_opt(2023, 9, 30).unwrap(),
            }
        );
    }

    #[test]
    fn income_history_preserves_provider_order() {
        let table = RawStatementTable {
            periods: vec![
                period((2024, 9, 28), &income_fields()),
                period((2023, 9, 30), &income_fields()),
            ],
        };

        let history = normalize_income(&table);
        let dates: Vec<NaiveDate> = history.periods.iter().map(|p| p.period_end).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 9, 28).unwrap(),
                NaiveDate::from_ymd_opt(2023, 9, 30).unwrap(),
            ]
        );
    }

    #[test]
    fn balance_sheet_normalizes_required_fields() {
        let table = RawStatementTable {
            periods: vec![period(
                (2024, 9, 28),
                &[
                    ("Total Assets", 365_000_000_000.0),
                    ("Total Liabilities Net Minority Interest", 308_000_000_000.0),
                    ("Total Equity Gross Minority Interest", 57_000_000_000.0),
                    ("Total Current Assets", 152_000_000_000.0),
                    ("Total Current Liabilities", 176_000_000_000.0),
                ],
            )],
        };

        let history = normalize_balance(&table);
        let (_, record) = history.normalized().next().unwrap();
        assert_eq!(record.total_assets, 365_000_000_000.0);
        assert_eq!(record.current_liabilities, 176_000_000_000.0);
    }

    #[test]
    fn free_cash_flow_is_always_derived() {
        let mut fields = cash_flow_fields();
        // A provider-supplied figure with a conflicting sign convention
        // must be ignored in favor of the derivation.
        fields.push(("Free Cash Flow", 1.0));

        let table = RawStatementTable { periods: vec![period((2024, 9, 28), &fields)] };
        let history = normalize_cash_flow(&table);

        let (_, record) = history.normalized().next().unwrap();
        assert_eq!(
            record.free_cash_flow,
            record.operating_cash_flow + record.capital_expenditures
        );
        assert_eq!(record.free_cash_flow, 99_600_000_000.0);
    }

    #[test]
    fn cash_flow_missing_field_names_field_and_period() {
        let mut fields = cash_flow_fields();
        fields.retain(|(name, _)| *name != "End Cash Position");

        let table = RawStatementTable { periods: vec![period((2024, 9, 28), &fields)] };
        let history = normalize_cash_flow(&table);

        let (_, error) = history.failed().next().unwrap();
        assert_eq!(
            *error,
            AnalysisError::MissingField {
                field: "End Cash Position".to_string(),
                period: NaiveDate::from_ymd_opt(2024, 9, 28).unwrap(),
            }
        );
    }

    #[test]
    fn failed_periods_serialize_with_status_tag() {
        let table = RawStatementTable {
            periods: vec![period((2024, 9, 28), &[("Total Revenue", 1.0)])],
        };

        let history = normalize_income(&table);
        let value = serde_json::to_value(&history).unwrap();

        assert_eq!(value["periods"][0]["outcome"]["status"], "failed");
        assert!(value["periods"][0]["outcome"]["error"].is_object());
    }

    #[test]
    fn empty_table_yields_empty_history() {
        let history = normalize_income(&RawStatementTable::default());
        assert!(history.is_empty());
    }
}
