//! Quick-reference pre-tax estimate from an average bank flow.
//!
//! One flat tax rate picked from a short threshold ladder instead of the full
//! bracket table. It can disagree with the bisection solver for the same
//! income and is reported as a separate, coarser figure.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::social_security::SocialSecurityProfile;
use crate::types::{Money, Rate};

/// `(average flow strictly above, flat rate)`, highest first.
const FLAT_RATE_LADDER: [(Decimal, Decimal); 3] = [
    (dec!(50000), dec!(0.20)),
    (dec!(30000), dec!(0.15)),
    (dec!(20000), dec!(0.10)),
];

const BASE_FLAT_RATE: Rate = dec!(0.05);

/// Flat tax rate for an average monthly flow.
pub fn flat_tax_rate(average_flow: Money) -> Rate {
    FLAT_RATE_LADDER
        .iter()
        .find(|(floor, _)| average_flow > *floor)
        .map(|(_, rate)| *rate)
        .unwrap_or(BASE_FLAT_RATE)
}

/// `average / (1 - social_rate - flat_tax_rate)`; zero for a zero average or
/// when the combined rate leaves nothing to divide by.
pub fn estimate_pre_tax(average_flow: Money, profile: &SocialSecurityProfile) -> Money {
    if average_flow.is_zero() {
        return Decimal::ZERO;
    }
    let keep_ratio = Decimal::ONE - profile.combined_rate() - flat_tax_rate(average_flow);
    if keep_ratio <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    average_flow / keep_ratio
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_ladder() {
        assert_eq!(flat_tax_rate(dec!(15000)), dec!(0.05));
        assert_eq!(flat_tax_rate(dec!(20000)), dec!(0.05));
        assert_eq!(flat_tax_rate(dec!(20001)), dec!(0.10));
        assert_eq!(flat_tax_rate(dec!(30001)), dec!(0.15));
        assert_eq!(flat_tax_rate(dec!(50001)), dec!(0.20));
    }

    #[test]
    fn test_estimate_with_default_profile() {
        let profile = SocialSecurityProfile::default();
        // 15000 / (1 - 0.175 - 0.05) = 15000 / 0.775
        assert_eq!(
            estimate_pre_tax(dec!(15000), &profile),
            dec!(15000) / dec!(0.775)
        );
        // 40000 / (1 - 0.175 - 0.15)
        assert_eq!(
            estimate_pre_tax(dec!(40000), &profile),
            dec!(40000) / dec!(0.675)
        );
    }

    #[test]
    fn test_zero_average() {
        assert_eq!(
            estimate_pre_tax(Decimal::ZERO, &SocialSecurityProfile::default()),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_degenerate_rates() {
        let profile = SocialSecurityProfile {
            pension_rate: dec!(0.9),
            ..Default::default()
        };
        assert_eq!(estimate_pre_tax(dec!(10000), &profile), Decimal::ZERO);
    }
}
