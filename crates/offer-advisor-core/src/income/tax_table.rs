use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::OfferAdvisorError;
use crate::types::{Money, Rate};
use crate::OfferAdvisorResult;

/// Monthly income exempt from individual income tax.
pub const MONTHLY_EXEMPTION: Decimal = dec!(5000);

/// One bracket of a progressive table, quick-deduction form:
/// `tax = taxable * rate - quick_deduction`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Inclusive upper bound of taxable income; `None` for the top bracket
    pub upper_bound: Option<Money>,
    pub rate: Rate,
    pub quick_deduction: Money,
}

impl TaxBracket {
    pub const fn new(upper_bound: Option<Money>, rate: Rate, quick_deduction: Money) -> Self {
        Self {
            upper_bound,
            rate,
            quick_deduction,
        }
    }

    fn tax_on(&self, taxable: Money) -> Money {
        taxable * self.rate - self.quick_deduction
    }
}

/// Monthly progressive tax table.
///
/// The table is data: it can be replaced or edited, but [`TaxTable::new`]
/// only accepts tables whose tax is non-decreasing in taxable income and
/// whose marginal rates stay below 100%, so that net income stays strictly
/// increasing in gross and the bisection solver keeps converging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TaxTableRepr")]
pub struct TaxTable {
    threshold: Money,
    brackets: Vec<TaxBracket>,
}

#[derive(Deserialize)]
struct TaxTableRepr {
    #[serde(default = "default_threshold")]
    threshold: Money,
    #[serde(default = "default_brackets")]
    brackets: Vec<TaxBracket>,
}

impl TryFrom<TaxTableRepr> for TaxTable {
    type Error = OfferAdvisorError;

    fn try_from(repr: TaxTableRepr) -> Result<Self, Self::Error> {
        TaxTable::new(repr.threshold, repr.brackets)
    }
}

fn default_threshold() -> Money {
    MONTHLY_EXEMPTION
}

fn default_brackets() -> Vec<TaxBracket> {
    vec![
        TaxBracket::new(Some(dec!(3000)), dec!(0.03), dec!(0)),
        TaxBracket::new(Some(dec!(12000)), dec!(0.10), dec!(210)),
        TaxBracket::new(Some(dec!(25000)), dec!(0.20), dec!(1410)),
        TaxBracket::new(Some(dec!(35000)), dec!(0.25), dec!(2660)),
        TaxBracket::new(Some(dec!(55000)), dec!(0.30), dec!(4410)),
        TaxBracket::new(Some(dec!(80000)), dec!(0.35), dec!(7160)),
        TaxBracket::new(None, dec!(0.45), dec!(15160)),
    ]
}

impl Default for TaxTable {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            brackets: default_brackets(),
        }
    }
}

impl TaxTable {
    pub fn new(threshold: Money, brackets: Vec<TaxBracket>) -> OfferAdvisorResult<Self> {
        if threshold < Decimal::ZERO {
            return Err(OfferAdvisorError::InvalidInput {
                field: "threshold".into(),
                reason: "Exemption threshold cannot be negative".into(),
            });
        }
        if brackets.is_empty() {
            return Err(OfferAdvisorError::InvalidInput {
                field: "brackets".into(),
                reason: "Tax table needs at least one bracket".into(),
            });
        }

        let last = brackets.len() - 1;
        for (i, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate >= Decimal::ONE {
                return Err(OfferAdvisorError::InvalidInput {
                    field: format!("brackets[{i}].rate"),
                    reason: "Rate must be in [0, 1)".into(),
                });
            }
            match (bracket.upper_bound, i == last) {
                (None, false) => {
                    return Err(OfferAdvisorError::InvalidInput {
                        field: format!("brackets[{i}].upper_bound"),
                        reason: "Only the last bracket may be unbounded".into(),
                    })
                }
                (Some(_), true) => {
                    return Err(OfferAdvisorError::InvalidInput {
                        field: format!("brackets[{i}].upper_bound"),
                        reason: "The last bracket must be unbounded".into(),
                    })
                }
                _ => {}
            }
            if i == 0 {
                continue;
            }

            let prev = &brackets[i - 1];
            // Upper bound of the previous bracket: present because only the
            // last bracket is unbounded.
            let boundary = prev.upper_bound.unwrap_or(Decimal::ZERO);
            if let Some(upper) = bracket.upper_bound {
                if upper <= boundary {
                    return Err(OfferAdvisorError::NonMonotonicTaxTable { index: i });
                }
            }
            if bracket.tax_on(boundary) < prev.tax_on(boundary) {
                return Err(OfferAdvisorError::NonMonotonicTaxTable { index: i });
            }
        }

        Ok(Self {
            threshold,
            brackets,
        })
    }

    pub fn threshold(&self) -> Money {
        self.threshold
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// `max(0, gross - deduction - threshold)`
    pub fn taxable_income(&self, gross: Money, deduction: Money) -> Money {
        (gross - deduction - self.threshold).max(Decimal::ZERO)
    }

    /// Bracket applying to `taxable`: the first whose upper bound is at
    /// least `taxable`.
    pub fn bracket_for(&self, taxable: Money) -> &TaxBracket {
        self.brackets
            .iter()
            .find(|b| b.upper_bound.map_or(true, |upper| taxable <= upper))
            .unwrap_or(&self.brackets[self.brackets.len() - 1])
    }

    /// Monthly tax on an already-computed taxable income.
    pub fn tax(&self, taxable: Money) -> Money {
        self.bracket_for(taxable).tax_on(taxable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        let table = TaxTable::default();
        assert!(TaxTable::new(table.threshold(), table.brackets().to_vec()).is_ok());
        assert_eq!(table.brackets().len(), 7);
    }

    #[test]
    fn test_tax_per_bracket() {
        let table = TaxTable::default();
        assert_eq!(table.tax(Decimal::ZERO), Decimal::ZERO);
        assert_eq!(table.tax(dec!(3000)), dec!(90));
        assert_eq!(table.tax(dec!(10000)), dec!(790));
        assert_eq!(table.tax(dec!(25000)), dec!(3590));
        assert_eq!(table.tax(dec!(100000)), dec!(29840));
    }

    #[test]
    fn test_tax_is_continuous_at_boundaries() {
        let table = TaxTable::default();
        for bound in [3000, 12000, 25000, 35000, 55000, 80000] {
            let at = table.tax(Decimal::from(bound));
            let above = table.tax(Decimal::from(bound) + dec!(0.01));
            assert!(above >= at, "tax drops above {bound}: {at} -> {above}");
            assert!(above - at < dec!(0.01));
        }
    }

    #[test]
    fn test_taxable_income_floors_at_zero() {
        let table = TaxTable::default();
        assert_eq!(table.taxable_income(dec!(8000), dec!(3500)), Decimal::ZERO);
        assert_eq!(table.taxable_income(dec!(20000), dec!(3500)), dec!(11500));
    }

    #[test]
    fn test_rejects_tax_drop_at_boundary() {
        // Second bracket's quick deduction too large: tax falls from 90 to 0 at 3000.
        let brackets = vec![
            TaxBracket::new(Some(dec!(3000)), dec!(0.03), dec!(0)),
            TaxBracket::new(None, dec!(0.10), dec!(300)),
        ];
        assert!(matches!(
            TaxTable::new(dec!(5000), brackets),
            Err(OfferAdvisorError::NonMonotonicTaxTable { index: 1 })
        ));
    }

    #[test]
    fn test_rejects_unsorted_and_unbounded_shapes() {
        let unsorted = vec![
            TaxBracket::new(Some(dec!(3000)), dec!(0.03), dec!(0)),
            TaxBracket::new(Some(dec!(2000)), dec!(0.10), dec!(210)),
            TaxBracket::new(None, dec!(0.20), dec!(1410)),
        ];
        assert!(TaxTable::new(dec!(5000), unsorted).is_err());

        let bounded_top = vec![TaxBracket::new(Some(dec!(3000)), dec!(0.03), dec!(0))];
        assert!(TaxTable::new(dec!(5000), bounded_top).is_err());

        let full_rate = vec![TaxBracket::new(None, dec!(1), dec!(0))];
        assert!(TaxTable::new(dec!(5000), full_rate).is_err());

        assert!(TaxTable::new(dec!(5000), vec![]).is_err());
    }

    #[test]
    fn test_deserialize_defaults_and_validates() {
        let table: TaxTable = serde_json::from_str("{}").unwrap();
        assert_eq!(table, TaxTable::default());

        let flat: TaxTable = serde_json::from_str(
            r#"{"threshold": "0", "brackets": [{"upper_bound": null, "rate": "0.1", "quick_deduction": "0"}]}"#,
        )
        .unwrap();
        assert_eq!(flat.tax(dec!(1000)), dec!(100));

        let bad = serde_json::from_str::<TaxTable>(
            r#"{"brackets": [{"upper_bound": "3000", "rate": "0.03", "quick_deduction": "0"}]}"#,
        );
        assert!(bad.is_err());
    }
}
