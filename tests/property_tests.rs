//! Property-based tests for the pure validation and pagination helpers,
//! verifying their acceptance regions across a wide range of inputs.

use defter_api::handlers::common::{
    validate_min_zero, validate_payment_amount, validate_payment_method, validate_positive,
    validate_vat_rate, PaginationParams,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn money_strategy() -> impl Strategy<Value = Decimal> {
    (0u64..1_000_000, 0u8..100)
        .prop_map(|(lira, kurus)| format!("{}.{:02}", lira, kurus).parse().unwrap())
}

fn negative_money_strategy() -> impl Strategy<Value = Decimal> {
    (1u64..1_000_000, 0u8..100)
        .prop_map(|(lira, kurus)| format!("-{}.{:02}", lira, kurus).parse().unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn non_negative_amounts_pass_min_zero(amount in money_strategy()) {
        prop_assert!(validate_min_zero(&amount).is_ok(), "rejected {}", amount);
    }

    #[test]
    fn negative_amounts_fail_every_money_validator(amount in negative_money_strategy()) {
        prop_assert!(validate_min_zero(&amount).is_err(), "accepted {}", amount);
        prop_assert!(validate_positive(&amount).is_err(), "accepted {}", amount);
        prop_assert!(validate_payment_amount(&amount).is_err(), "accepted {}", amount);
    }

    #[test]
    fn payment_amounts_split_exactly_at_one_kurus(amount in money_strategy()) {
        let result = validate_payment_amount(&amount);
        if amount >= Decimal::new(1, 2) {
            prop_assert!(result.is_ok(), "rejected {}", amount);
        } else {
            prop_assert!(result.is_err(), "accepted {}", amount);
        }
    }

    #[test]
    fn vat_rates_are_percentages(rate in -200i64..300) {
        let rate = Decimal::from(rate);
        let result = validate_vat_rate(&rate);
        if rate >= Decimal::ZERO && rate <= Decimal::from(100) {
            prop_assert!(result.is_ok(), "rejected {}", rate);
        } else {
            prop_assert!(result.is_err(), "accepted {}", rate);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn unknown_payment_methods_fail(method in "[a-z_]{1,20}") {
        let known = ["nakit", "kredi_karti", "havale"];
        if !known.contains(&method.as_str()) {
            prop_assert!(
                validate_payment_method(&method).is_err(),
                "accepted {}",
                method
            );
        }
    }

    #[test]
    fn line_vat_never_exceeds_the_net_amount(
        net in money_strategy(),
        rate in 0u8..=100,
    ) {
        let rate = Decimal::from(rate);
        let vat = (net * rate / Decimal::from(100)).round_dp(2);
        prop_assert!(vat <= net, "vat {} exceeds net {}", vat, net);
        prop_assert!(vat.scale() <= 2, "vat {} not rounded to kuruş", vat);
    }
}

proptest! {
    #[test]
    fn clamped_pagination_stays_within_bounds(
        page in any::<u64>(),
        per_page in any::<u64>(),
        max in 1u64..10_000,
    ) {
        let params = PaginationParams { page, per_page };
        let (page, per_page) = params.clamped(max);
        prop_assert!(page >= 1);
        prop_assert!((1..=max).contains(&per_page));
    }

    #[test]
    fn clamping_in_range_values_is_identity(
        page in 1u64..1_000,
        per_page in 1u64..=100,
    ) {
        let params = PaginationParams { page, per_page };
        prop_assert_eq!(params.clamped(100), (page, per_page));
    }
}
