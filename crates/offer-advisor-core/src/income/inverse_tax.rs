//! Gross-from-net inversion under the progressive monthly tax table.
//!
//! The forward direction (gross -> deduction -> tax -> net) is piecewise
//! linear and strictly increasing for any table accepted by
//! [`TaxTable::new`], so a fixed-length bisection always narrows onto the
//! answer. The bracket table is data and is never inverted in closed form.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::social_security::SocialSecurityProfile;
use super::tax_table::TaxTable;
use crate::types::{Money, Rate};

/// Bisection step cap.
pub const MAX_BISECTION_ITERATIONS: u32 = 20;

/// Stop as soon as the net estimate is this close to the target.
pub const NET_TOLERANCE: Decimal = dec!(1);

const TWO: Decimal = dec!(2);
const MIDPOINT_DP: u32 = 6;

/// Diagnostics for one inversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverTrace {
    pub target_net: Money,
    /// Estimated monthly gross: the final bisection midpoint
    pub gross: Money,
    /// Net reproduced from `gross` by the forward computation
    pub net_estimate: Money,
    pub residual: Money,
    pub iterations: u32,
    /// Estimate landed within [`NET_TOLERANCE`] of the target
    pub converged: bool,
    /// The answer lay inside the initial `[net, 2 * net]` search interval
    pub bracketed: bool,
    pub deduction: Money,
    pub taxable_income: Money,
    pub tax: Money,
    pub marginal_rate: Rate,
}

/// Forward computation: monthly net for a monthly gross.
pub fn net_from_gross(gross: Money, profile: &SocialSecurityProfile, table: &TaxTable) -> Money {
    let deduction = profile.monthly_deduction();
    let taxable = table.taxable_income(gross, deduction);
    gross - deduction - table.tax(taxable)
}

/// Estimated monthly gross for a monthly net under the standard tax table.
/// Non-positive `net` yields zero.
pub fn solve_gross_from_net(net: Money, profile: &SocialSecurityProfile) -> Money {
    solve_gross_from_net_traced(net, profile, &TaxTable::default()).gross
}

/// Bisection over `[net, 2 * net]`, at most [`MAX_BISECTION_ITERATIONS`]
/// steps, stopping early once the estimate is within [`NET_TOLERANCE`].
pub fn solve_gross_from_net_traced(
    net: Money,
    profile: &SocialSecurityProfile,
    table: &TaxTable,
) -> SolverTrace {
    let deduction = profile.monthly_deduction();

    if net <= Decimal::ZERO {
        return SolverTrace {
            target_net: net,
            gross: Decimal::ZERO,
            net_estimate: Decimal::ZERO,
            residual: Decimal::ZERO,
            iterations: 0,
            converged: true,
            bracketed: true,
            deduction,
            taxable_income: Decimal::ZERO,
            tax: Decimal::ZERO,
            marginal_rate: Decimal::ZERO,
        };
    }

    let mut low = net;
    let mut high = net * TWO;
    let bracketed = net_from_gross(low, profile, table) <= net
        && net_from_gross(high, profile, table) >= net;

    let mut mid = low;
    let mut estimate = net_from_gross(mid, profile, table);
    let mut iterations = 0;
    let mut converged = false;

    while iterations < MAX_BISECTION_ITERATIONS {
        iterations += 1;
        mid = ((low + high) / TWO).round_dp(MIDPOINT_DP);
        estimate = net_from_gross(mid, profile, table);
        trace!(iteration = iterations, low = %low, high = %high, mid = %mid, estimate = %estimate);

        if (estimate - net).abs() < NET_TOLERANCE {
            converged = true;
            break;
        }
        if estimate < net {
            low = mid;
        } else {
            high = mid;
        }
    }

    let taxable_income = table.taxable_income(mid, deduction);
    let tax = table.tax(taxable_income);
    let marginal_rate = if taxable_income > Decimal::ZERO {
        table.bracket_for(taxable_income).rate
    } else {
        Decimal::ZERO
    };

    debug!(
        net = %net,
        gross = %mid,
        iterations,
        converged,
        bracketed,
        "gross-from-net bisection"
    );

    SolverTrace {
        target_net: net,
        gross: mid,
        net_estimate: estimate,
        residual: estimate - net,
        iterations,
        converged,
        bracketed,
        deduction,
        taxable_income,
        tax,
        marginal_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::income::tax_table::TaxBracket;

    fn profile() -> SocialSecurityProfile {
        SocialSecurityProfile {
            base_personal: dec!(20000),
            housing_rate: dec!(0.07),
            pension_rate: dec!(0.08),
            medical_rate: dec!(0.02),
            unemployment_rate: dec!(0.005),
            ..Default::default()
        }
    }

    #[test]
    fn test_forward_computation() {
        let table = TaxTable::default();
        // 20000 - 3500 - tax(11500) = 16500 - (1150 - 210) = 15560
        assert_eq!(net_from_gross(dec!(20000), &profile(), &table), dec!(15560));
    }

    #[test]
    fn test_round_trips_within_one_unit() {
        let table = TaxTable::default();
        for net in [dec!(8000), dec!(15000), dec!(30000), dec!(60000), dec!(100000)] {
            let trace = solve_gross_from_net_traced(net, &profile(), &table);
            let back = net_from_gross(trace.gross, &profile(), &table);
            assert!(
                (back - net).abs() <= NET_TOLERANCE,
                "net {net}: gross {} reproduces {back}",
                trace.gross
            );
            assert!(trace.converged);
            assert!(trace.bracketed);
            assert!(trace.iterations <= MAX_BISECTION_ITERATIONS);
        }
    }

    #[test]
    fn test_known_inverse() {
        // 15560 net comes from exactly 20000 gross (see forward test).
        let gross = solve_gross_from_net(dec!(15560), &profile());
        assert!((gross - dec!(20000)).abs() < dec!(2), "gross {gross}");
    }

    #[test]
    fn test_top_bracket_inverse() {
        // 0.55 * gross = 100000 + 3500 - 0.45 * 8500 - 15160 => gross ~ 153663.64
        let gross = solve_gross_from_net(dec!(100000), &profile());
        assert!((gross - dec!(153663.64)).abs() < dec!(2), "gross {gross}");
    }

    #[test]
    fn test_non_positive_net_short_circuits() {
        assert_eq!(solve_gross_from_net(Decimal::ZERO, &profile()), Decimal::ZERO);
        let trace =
            solve_gross_from_net_traced(dec!(-500), &profile(), &TaxTable::default());
        assert_eq!(trace.gross, Decimal::ZERO);
        assert_eq!(trace.iterations, 0);
    }

    #[test]
    fn test_monotonic_in_net() {
        let mut previous = Decimal::ZERO;
        for net in (1..=40).map(|k| Decimal::from(k * 2500)) {
            let gross = solve_gross_from_net(net, &profile());
            assert!(gross >= previous, "gross fell at net {net}");
            previous = gross;
        }
    }

    #[test]
    fn test_unbracketed_small_net_is_reported() {
        // Net below the flat deduction cannot come from a gross in [net, 2 * net].
        let trace = solve_gross_from_net_traced(dec!(1000), &profile(), &TaxTable::default());
        assert!(!trace.bracketed);
        assert!(!trace.converged);
        assert_eq!(trace.iterations, MAX_BISECTION_ITERATIONS);
        assert!(trace.gross <= dec!(2000));
    }

    #[test]
    fn test_custom_table() {
        let flat = TaxTable::new(
            Decimal::ZERO,
            vec![TaxBracket::new(None, dec!(0.2), Decimal::ZERO)],
        )
        .unwrap();
        let no_deduction = SocialSecurityProfile {
            base_personal: Decimal::ZERO,
            ..Default::default()
        };
        // net = 0.8 * gross
        let trace = solve_gross_from_net_traced(dec!(8000), &no_deduction, &flat);
        assert!((trace.gross - dec!(10000)).abs() < dec!(1.25));
        assert_eq!(trace.marginal_rate, dec!(0.2));
    }
}
