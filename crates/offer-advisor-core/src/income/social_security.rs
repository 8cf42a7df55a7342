use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// Employee-side social insurance and housing fund contributions, all
/// charged on `base_personal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialSecurityProfile {
    pub city: String,
    /// Employer contribution base, display only
    #[serde(with = "crate::types::lenient")]
    pub base_company: Money,
    #[serde(with = "crate::types::lenient")]
    pub base_personal: Money,
    #[serde(with = "crate::types::lenient")]
    pub pension_rate: Rate,
    #[serde(with = "crate::types::lenient")]
    pub medical_rate: Rate,
    #[serde(with = "crate::types::lenient")]
    pub unemployment_rate: Rate,
    #[serde(with = "crate::types::lenient")]
    pub housing_rate: Rate,
}

impl Default for SocialSecurityProfile {
    fn default() -> Self {
        Self {
            city: "Shanghai".to_string(),
            base_company: dec!(20000),
            base_personal: dec!(20000),
            pension_rate: dec!(0.08),
            medical_rate: dec!(0.02),
            unemployment_rate: dec!(0.005),
            housing_rate: dec!(0.07),
        }
    }
}

impl SocialSecurityProfile {
    /// Sum of the four employee rates.
    pub fn combined_rate(&self) -> Rate {
        self.housing_rate + self.pension_rate + self.medical_rate + self.unemployment_rate
    }

    /// Flat monthly deduction, independent of the actual salary.
    pub fn monthly_deduction(&self) -> Money {
        self.base_personal * self.combined_rate()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DeductionBreakdown {
    pub housing: Money,
    pub pension: Money,
    pub medical: Money,
    pub unemployment: Money,
    /// Pension + medical + unemployment, without the housing fund
    pub social_total: Money,
    pub total: Money,
}

/// Monthly deduction per contribution line.
pub fn deductions(profile: &SocialSecurityProfile) -> DeductionBreakdown {
    let base = profile.base_personal;
    let housing = base * profile.housing_rate;
    let pension = base * profile.pension_rate;
    let medical = base * profile.medical_rate;
    let unemployment = base * profile.unemployment_rate;
    let social_total = pension + medical + unemployment;

    DeductionBreakdown {
        housing,
        pension,
        medical,
        unemployment,
        social_total,
        total: social_total + housing,
    }
}

impl DeductionBreakdown {
    pub fn is_empty(&self) -> bool {
        self.total == Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_profile_deduction() {
        let profile = SocialSecurityProfile::default();
        assert_eq!(profile.combined_rate(), dec!(0.175));
        assert_eq!(profile.monthly_deduction(), dec!(3500));
    }

    #[test]
    fn test_breakdown() {
        let breakdown = deductions(&SocialSecurityProfile::default());
        assert_eq!(
            breakdown,
            DeductionBreakdown {
                housing: dec!(1400),
                pension: dec!(1600),
                medical: dec!(400),
                unemployment: dec!(100),
                social_total: dec!(2100),
                total: dec!(3500),
            }
        );
        assert!(!breakdown.is_empty());
    }

    #[test]
    fn test_partial_profile_uses_defaults() {
        let profile: SocialSecurityProfile =
            serde_json::from_str(r#"{"base_personal": "30000", "housing_rate": 0.12}"#).unwrap();
        assert_eq!(profile.base_personal, dec!(30000));
        assert_eq!(profile.housing_rate, dec!(0.12));
        assert_eq!(profile.pension_rate, dec!(0.08));
        assert_eq!(profile.city, "Shanghai");
    }

    #[test]
    fn test_zero_base_has_no_deduction() {
        let profile = SocialSecurityProfile {
            base_personal: Decimal::ZERO,
            ..Default::default()
        };
        assert!(deductions(&profile).is_empty());
    }
}
