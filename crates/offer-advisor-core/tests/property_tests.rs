use offer_advisor_core::advisory::{recommend, AdviseParams};
use offer_advisor_core::compensation::{aggregate, set_bonus_months, CompensationRecord};
use offer_advisor_core::competitors::CompetitorBenchmark;
use offer_advisor_core::income::{
    net_from_gross, solve_gross_from_net, SocialSecurityProfile, TaxTable,
};
use offer_advisor_core::round_currency;
use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn fixed_profile() -> SocialSecurityProfile {
    SocialSecurityProfile {
        base_personal: dec!(20000),
        housing_rate: dec!(0.07),
        pension_rate: dec!(0.08),
        medical_rate: dec!(0.02),
        unemployment_rate: dec!(0.005),
        ..Default::default()
    }
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(64))]

    #[test]
    fn prop_solver_reproduces_net(net in 8_000u32..200_000) {
        let net = Decimal::from(net);
        let gross = solve_gross_from_net(net, &fixed_profile());
        let back = net_from_gross(gross, &fixed_profile(), &TaxTable::default());
        prop_assert!((back - net).abs() <= dec!(1), "net {} back {}", net, back);
    }

    #[test]
    fn prop_solver_monotonic(net in 8_000u32..150_000, gap in 100u32..50_000) {
        let low = solve_gross_from_net(Decimal::from(net), &fixed_profile());
        let high = solve_gross_from_net(Decimal::from(net + gap), &fixed_profile());
        prop_assert!(low <= high, "gross({}) = {} > gross({}) = {}", net, low, net + gap, high);
    }

    #[test]
    fn prop_package_identities(
        base in 0u32..100_000,
        months_tenths in 0u32..200,
        allowance in 0u32..10_000,
        bonus in 0u32..500_000,
        sign_on in 0u32..200_000,
        stock in 0u32..1_000_000,
    ) {
        let record = CompensationRecord {
            base_monthly: Decimal::from(base),
            months: Decimal::new(months_tenths as i64, 1),
            fixed_allowance: Decimal::from(allowance),
            performance_bonus: Decimal::from(bonus),
            sign_on_bonus: Decimal::from(sign_on),
            stock_value: Decimal::from(stock),
            ..Default::default()
        };
        let agg = aggregate(&record);
        prop_assert_eq!(agg.total_package, agg.cash_total + record.stock_value);
        prop_assert_eq!(agg.monthly_cash, record.base_monthly + record.fixed_allowance);

        let no_base = CompensationRecord { base_monthly: Decimal::ZERO, ..record };
        let agg = aggregate(&no_base);
        prop_assert_eq!(agg.base_total, Decimal::ZERO);
        prop_assert_eq!(agg.monthly_cash, no_base.fixed_allowance);
    }

    #[test]
    fn prop_bonus_months_sets_rounded_amount(base in 1u32..100_000, months_tenths in 0u32..120) {
        let record = CompensationRecord {
            base_monthly: Decimal::from(base),
            ..Default::default()
        };
        let months = Decimal::new(months_tenths as i64, 1);
        let next = set_bonus_months(&record, months);
        prop_assert_eq!(next.performance_bonus, round_currency(record.base_monthly * months));
        prop_assert_eq!(next.bonus_months, months);
    }

    #[test]
    fn prop_recommender_without_competitors(
        base in 1_000u32..100_000,
        pct_bp in 0u32..10_000,
    ) {
        let current = CompensationRecord {
            base_monthly: Decimal::from(base),
            ..Default::default()
        };
        let params = AdviseParams {
            target_increase_pct: Decimal::new(pct_bp as i64, 4),
            ..Default::default()
        };
        let agg = aggregate(&current);
        let s = recommend(&agg, &CompetitorBenchmark::default(), &current, &current, &params);
        prop_assert!(!s.is_based_on_competitor);
        prop_assert_eq!(s.total, agg.total_package * (Decimal::ONE + params.target_increase_pct));
        prop_assert!(s.base_monthly >= Decimal::ZERO);
    }
}
