use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::inverse_tax::solve_gross_from_net_traced;
use super::social_security::SocialSecurityProfile;
use super::tax_table::TaxTable;
use crate::compensation::CompensationRecord;
use crate::error::OfferAdvisorError;
use crate::types::{ratio_or_zero, Money, Months};
use crate::OfferAdvisorResult;

/// A bank-flow series always covers twelve consecutive months.
pub const FLOW_MONTHS: usize = 12;

const PAYROLL_MONTHS: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Whether the declared amounts are after-tax (net) or pre-tax (gross).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowType {
    #[default]
    Net,
    Gross,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BankFlowEntry {
    /// First day of the month the amount was received
    pub month: NaiveDate,
    #[serde(default, with = "crate::types::lenient")]
    pub amount: Money,
}

/// Twelve monthly salary credits as they appear on a bank statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BankFlowSeriesRepr")]
pub struct BankFlowSeries {
    flow_type: FlowType,
    entries: Vec<BankFlowEntry>,
}

#[derive(Deserialize)]
struct BankFlowSeriesRepr {
    #[serde(default)]
    flow_type: FlowType,
    entries: Vec<BankFlowEntry>,
}

impl TryFrom<BankFlowSeriesRepr> for BankFlowSeries {
    type Error = OfferAdvisorError;

    fn try_from(repr: BankFlowSeriesRepr) -> Result<Self, Self::Error> {
        check_length(repr.entries.len())?;
        Ok(Self {
            flow_type: repr.flow_type,
            entries: repr.entries,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowStats {
    pub total: Money,
    /// Mean over months with a strictly positive amount
    pub average: Money,
    pub months_with_income: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyGross {
    pub month: NaiveDate,
    pub flow: Money,
    pub gross: Money,
    pub converged: bool,
}

/// Twelve months of flow set against a declared pay structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowReconciliation {
    pub flow_type: FlowType,
    pub months: Vec<MonthlyGross>,
    pub months_with_income: u32,
    pub annual_gross: Money,
    pub average_monthly_gross: Money,
    /// Declared `base_monthly + fixed_allowance`
    pub regular_monthly: Money,
    /// `regular_monthly` for every month that had income
    pub regular_payroll: Money,
    /// Gross received beyond regular payroll, floored at zero
    pub implied_bonus: Money,
    /// Declared bonus plus base paid beyond twelve months
    pub declared_bonus: Money,
    /// `implied_bonus - declared_bonus`; positive when the flow shows more
    pub bonus_gap: Money,
    pub implied_bonus_months: Months,
    /// Months whose net could not be inverted within tolerance
    pub unconverged_months: u32,
}

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

fn check_length(len: usize) -> OfferAdvisorResult<()> {
    if len != FLOW_MONTHS {
        return Err(OfferAdvisorError::InvalidInput {
            field: "bank_flows".into(),
            reason: format!("Expected {FLOW_MONTHS} monthly entries, got {len}"),
        });
    }
    Ok(())
}

impl Default for BankFlowSeries {
    /// Empty series for January–December of the previous calendar year.
    fn default() -> Self {
        let year = Utc::now().year() - 1;
        let entries = (1..=FLOW_MONTHS as u32)
            .map(|m| BankFlowEntry {
                month: NaiveDate::from_ymd_opt(year, m, 1).unwrap_or_default(),
                amount: Decimal::ZERO,
            })
            .collect();
        Self {
            flow_type: FlowType::Net,
            entries,
        }
    }
}

impl BankFlowSeries {
    /// Empty series for January–December of `year`.
    pub fn for_year(year: i32, flow_type: FlowType) -> OfferAdvisorResult<Self> {
        let first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| {
            OfferAdvisorError::InvalidInput {
                field: "year".into(),
                reason: format!("{year} is outside the supported calendar range"),
            }
        })?;
        Self::from_amounts(first, flow_type, &[Decimal::ZERO; FLOW_MONTHS])
    }

    /// Series of twelve consecutive months starting at `first_month`.
    pub fn from_amounts(
        first_month: NaiveDate,
        flow_type: FlowType,
        amounts: &[Money],
    ) -> OfferAdvisorResult<Self> {
        check_length(amounts.len())?;
        let start = first_month.with_day(1).unwrap_or(first_month);
        let mut entries = Vec::with_capacity(FLOW_MONTHS);
        for (i, amount) in amounts.iter().enumerate() {
            let month = start
                .checked_add_months(chrono::Months::new(i as u32))
                .ok_or_else(|| OfferAdvisorError::InvalidInput {
                    field: "first_month".into(),
                    reason: format!("Month {i} after {start} is out of range"),
                })?;
            entries.push(BankFlowEntry {
                month,
                amount: *amount,
            });
        }
        Ok(Self { flow_type, entries })
    }

    pub fn flow_type(&self) -> FlowType {
        self.flow_type
    }

    pub fn entries(&self) -> &[BankFlowEntry] {
        &self.entries
    }

    pub fn with_amount(&self, index: usize, amount: Money) -> OfferAdvisorResult<Self> {
        if index >= FLOW_MONTHS {
            return Err(OfferAdvisorError::InvalidInput {
                field: "month_index".into(),
                reason: format!("Month index must be below {FLOW_MONTHS}, got {index}"),
            });
        }
        let mut next = self.clone();
        next.entries[index].amount = amount;
        Ok(next)
    }

    pub fn with_flow_type(&self, flow_type: FlowType) -> Self {
        Self {
            flow_type,
            entries: self.entries.clone(),
        }
    }

    pub fn stats(&self) -> FlowStats {
        let total: Money = self.entries.iter().map(|e| e.amount).sum();
        let months_with_income = self
            .entries
            .iter()
            .filter(|e| e.amount > Decimal::ZERO)
            .count() as u32;
        FlowStats {
            total,
            average: ratio_or_zero(total, Decimal::from(months_with_income)),
            months_with_income,
        }
    }
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// Recover monthly gross from the flow (bisection solver for net flows) and
/// compare the year's income against the declared pay structure.
pub fn reconcile_bank_flows(
    series: &BankFlowSeries,
    profile: &SocialSecurityProfile,
    table: &TaxTable,
    declared: &CompensationRecord,
) -> FlowReconciliation {
    let mut months = Vec::with_capacity(FLOW_MONTHS);
    let mut unconverged_months = 0;

    for entry in series.entries() {
        let (gross, converged) = if entry.amount <= Decimal::ZERO {
            (Decimal::ZERO, true)
        } else {
            match series.flow_type {
                FlowType::Gross => (entry.amount, true),
                FlowType::Net => {
                    let trace = solve_gross_from_net_traced(entry.amount, profile, table);
                    (trace.gross, trace.converged)
                }
            }
        };
        if !converged {
            unconverged_months += 1;
        }
        months.push(MonthlyGross {
            month: entry.month,
            flow: entry.amount,
            gross,
            converged,
        });
    }

    let months_with_income = months.iter().filter(|m| m.flow > Decimal::ZERO).count() as u32;
    let annual_gross: Money = months.iter().map(|m| m.gross).sum();
    let regular_monthly = declared.base_monthly + declared.fixed_allowance;
    let regular_payroll = regular_monthly * Decimal::from(months_with_income);
    let implied_bonus = (annual_gross - regular_payroll).max(Decimal::ZERO);
    let extra_months = (declared.months - PAYROLL_MONTHS).max(Decimal::ZERO);
    let declared_bonus = declared.performance_bonus + declared.base_monthly * extra_months;

    debug!(
        flow_type = ?series.flow_type,
        annual_gross = %annual_gross,
        implied_bonus = %implied_bonus,
        declared_bonus = %declared_bonus,
        unconverged_months,
        "bank flow reconciliation"
    );

    FlowReconciliation {
        flow_type: series.flow_type,
        months,
        months_with_income,
        annual_gross,
        average_monthly_gross: ratio_or_zero(annual_gross, Decimal::from(months_with_income)),
        regular_monthly,
        regular_payroll,
        implied_bonus,
        declared_bonus,
        bonus_gap: implied_bonus - declared_bonus,
        implied_bonus_months: ratio_or_zero(implied_bonus, declared.base_monthly),
        unconverged_months,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn jan(year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, 1, 1).unwrap()
    }

    fn declared() -> CompensationRecord {
        CompensationRecord {
            base_monthly: dec!(20000),
            months: dec!(13),
            performance_bonus: dec!(40000),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_series_has_twelve_months() {
        let series = BankFlowSeries::default();
        assert_eq!(series.entries().len(), FLOW_MONTHS);
        assert_eq!(series.flow_type(), FlowType::Net);
        assert_eq!(series.stats(), FlowStats::default());
    }

    #[test]
    fn test_months_roll_over_year_end() {
        let start = NaiveDate::from_ymd_opt(2023, 7, 15).unwrap();
        let series =
            BankFlowSeries::from_amounts(start, FlowType::Net, &[Decimal::ZERO; 12]).unwrap();
        assert_eq!(series.entries()[0].month, NaiveDate::from_ymd_opt(2023, 7, 1).unwrap());
        assert_eq!(series.entries()[11].month, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(BankFlowSeries::from_amounts(jan(2023), FlowType::Net, &[dec!(1); 11]).is_err());
        let json = r#"{"entries": [{"month": "2023-01-01", "amount": 100}]}"#;
        assert!(serde_json::from_str::<BankFlowSeries>(json).is_err());
    }

    #[test]
    fn test_with_amount_bounds() {
        let series = BankFlowSeries::for_year(2023, FlowType::Net).unwrap();
        let edited = series.with_amount(11, dec!(15000)).unwrap();
        assert_eq!(edited.entries()[11].amount, dec!(15000));
        assert!(series.with_amount(12, dec!(1)).is_err());
    }

    #[test]
    fn test_stats_average_over_paid_months() {
        let mut amounts = [Decimal::ZERO; 12];
        amounts[0] = dec!(15000);
        amounts[1] = dec!(15000);
        amounts[2] = dec!(30000);
        let series = BankFlowSeries::from_amounts(jan(2023), FlowType::Net, &amounts).unwrap();
        let stats = series.stats();
        assert_eq!(stats.total, dec!(60000));
        assert_eq!(stats.months_with_income, 3);
        assert_eq!(stats.average, dec!(20000));
    }

    #[test]
    fn test_gross_flow_reconciliation() {
        let mut amounts = [dec!(20000); 12];
        amounts[11] = dec!(80000);
        let series = BankFlowSeries::from_amounts(jan(2023), FlowType::Gross, &amounts).unwrap();
        let rec = reconcile_bank_flows(
            &series,
            &SocialSecurityProfile::default(),
            &TaxTable::default(),
            &declared(),
        );
        assert_eq!(rec.annual_gross, dec!(300000));
        assert_eq!(rec.regular_payroll, dec!(240000));
        assert_eq!(rec.implied_bonus, dec!(60000));
        assert_eq!(rec.declared_bonus, dec!(60000));
        assert_eq!(rec.bonus_gap, Decimal::ZERO);
        assert_eq!(rec.implied_bonus_months, dec!(3));
        assert_eq!(rec.average_monthly_gross, dec!(25000));
    }

    #[test]
    fn test_net_flow_reconciliation_uses_solver() {
        // 15560 net is 20000 gross under the default profile.
        let series =
            BankFlowSeries::from_amounts(jan(2023), FlowType::Net, &[dec!(15560); 12]).unwrap();
        let rec = reconcile_bank_flows(
            &series,
            &SocialSecurityProfile::default(),
            &TaxTable::default(),
            &declared(),
        );
        assert_eq!(rec.unconverged_months, 0);
        assert!((rec.annual_gross - dec!(240000)).abs() < dec!(24));
        assert!(rec.implied_bonus < dec!(24));
        assert!(rec.bonus_gap < Decimal::ZERO);
        for month in &rec.months {
            assert!((month.gross - dec!(20000)).abs() < dec!(2));
        }
    }

    #[test]
    fn test_empty_months_skip_solver() {
        let mut amounts = [Decimal::ZERO; 12];
        amounts[5] = dec!(15560);
        let series = BankFlowSeries::from_amounts(jan(2023), FlowType::Net, &amounts).unwrap();
        let rec = reconcile_bank_flows(
            &series,
            &SocialSecurityProfile::default(),
            &TaxTable::default(),
            &declared(),
        );
        assert_eq!(rec.months_with_income, 1);
        assert_eq!(rec.months[0].gross, Decimal::ZERO);
        assert_eq!(rec.regular_payroll, dec!(20000));
    }
}
