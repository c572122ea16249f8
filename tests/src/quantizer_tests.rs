//! Quantizer behaviour: concrete scenarios with rstest, grid and notional
//! guarantees with proptest, and concurrent use from several threads.

use ordergrid_core::decimal::{DecimalError, RoundingDirection};
use ordergrid_exchanges::prelude::*;
use ordergrid_tests::{d, lot_size, min_notional, price_filter};
use proptest::prelude::*;
use rstest::*;

// ============================================================================
// SCENARIOS
// ============================================================================

#[cfg(test)]
mod scenarios {
    use super::*;

    #[fixture]
    fn policy() -> RoundingPolicy {
        RoundingPolicy::default()
    }

    #[rstest]
    fn test_price_snaps_to_tick(policy: RoundingPolicy) {
        let filters = vec![price_filter("0.01", "1000", "0.01")];
        let value = quantize(&filters, "10.237", "1", &policy).unwrap();
        assert_eq!(value.price.to_string(), "10.23");
        assert_eq!(value.quantity, d("1"));
    }

    #[rstest]
    fn test_quantity_snaps_to_step(policy: RoundingPolicy) {
        let filters = vec![lot_size("0.001", "1000", "0.001")];
        let value = quantize(&filters, "1", "5.23456", &policy).unwrap();
        assert_eq!(value.quantity.to_string(), "5.234");
    }

    #[rstest]
    fn test_min_notional_lifts_quantity(policy: RoundingPolicy) {
        let filters = vec![lot_size("1", "1000", "1"), min_notional("10")];
        let value = quantize(&filters, "2", "3", &policy).unwrap();
        assert_eq!(value.quantity, d("5"));
        assert!(value.notional().unwrap() >= d("10"));
    }

    #[rstest]
    #[case("0")]
    #[case("0.00000000")]
    fn test_zero_price_with_notional_floor_fails(policy: RoundingPolicy, #[case] price: &str) {
        let filters = vec![lot_size("0.001", "1000", "0.001"), min_notional("10")];
        let err = quantize(&filters, price, "2.5", &policy).unwrap_err();
        assert!(err.is_division_by_zero());
    }

    #[rstest]
    #[case("10.237", "5.23456")]
    #[case("0.00000001", "123456789.123")]
    #[case("0", "0")]
    fn test_no_filters_is_identity(policy: RoundingPolicy, #[case] price: &str, #[case] quantity: &str) {
        let value = quantize(&[], price, quantity, &policy).unwrap();
        assert_eq!(value.price.to_string(), price);
        assert_eq!(value.quantity.to_string(), quantity);
    }

    #[rstest]
    fn test_floats_are_normalized_through_eight_places(policy: RoundingPolicy) {
        let filters = vec![price_filter("0.01", "1000", "0.01")];
        let value = quantize(&filters, 10.237f64, 0.1f64 + 0.7f64, &policy).unwrap();
        assert_eq!(value.price.to_string(), "10.23");
        assert_eq!(value.quantity.to_string(), "0.80000000");
    }

    #[rstest]
    #[case("abc", "1", ValueField::Price)]
    #[case("-5", "1", ValueField::Price)]
    #[case("1", "", ValueField::Quantity)]
    #[case("1", "-0.001", ValueField::Quantity)]
    fn test_invalid_input_rejected(
        policy: RoundingPolicy,
        #[case] price: &str,
        #[case] quantity: &str,
        #[case] expected_field: ValueField,
    ) {
        let filters = vec![price_filter("0.01", "1000", "0.01"), lot_size("1", "10", "1")];
        match quantize(&filters, price, quantity, &policy) {
            Err(QuantizeError::InvalidValue { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected InvalidValue for {field}, got {other:?}", field = expected_field),
        }
    }

    #[rstest]
    fn test_infinite_float_rejected(policy: RoundingPolicy) {
        let err = quantize(&[], f64::INFINITY, 1.0f64, &policy).unwrap_err();
        assert_eq!(
            err,
            QuantizeError::InvalidValue {
                field: ValueField::Price,
                source: DecimalError::NonFinite,
            }
        );
    }

    // Grid values carry no digits past the filter precision, so the
    // direction never moves a result off the floor-aligned grid point
    #[rstest]
    fn test_price_alignment_same_for_every_direction() {
        let filters = vec![price_filter("0.5", "100", "0.5")];
        for direction in RoundingDirection::ALL {
            let policy = RoundingPolicy::default().with_price_rounding(direction);
            let value = quantize(&filters, "10.99", "1", &policy).unwrap();
            assert_eq!(value.price.to_string(), "10.5", "{direction}");
        }
    }

    #[rstest]
    fn test_quantity_alignment_same_for_every_direction() {
        let filters = vec![lot_size("0.25", "100", "0.25")];
        for direction in RoundingDirection::ALL {
            let policy = RoundingPolicy::default().with_quantity_rounding(direction);
            let value = quantize(&filters, "1", "7.6", &policy).unwrap();
            assert_eq!(value.quantity.to_string(), "7.50", "{direction}");
        }
    }

    #[rstest]
    #[case("0.0005", "0.75")]
    #[case("10.5", "7.5")]
    #[case("0.00000001", "123.456789")]
    fn test_zero_grid_sizes_keep_values(
        policy: RoundingPolicy,
        #[case] price: &str,
        #[case] quantity: &str,
    ) {
        let filters = vec![price_filter("0", "0", "0"), lot_size("0", "0", "0")];
        let value = quantize(&filters, price, quantity, &policy).unwrap();
        assert_eq!(value.price.to_string(), price);
        assert_eq!(value.quantity.to_string(), quantity);
    }

    #[rstest]
    fn test_zero_tick_price_lifts_quantity_instead_of_failing(policy: RoundingPolicy) {
        let filters = vec![
            price_filter("0", "0", "0"),
            lot_size("0.001", "0", "0.001"),
            min_notional("10"),
        ];
        let value = quantize(&filters, "0.4", "1", &policy).unwrap();
        assert_eq!(value.price, d("0.4"));
        assert_eq!(value.quantity, d("25"));
    }

    #[rstest]
    fn test_price_is_final_before_notional(policy: RoundingPolicy) {
        // 0.999 clamps up to min price 1.5 first, so only 4 units are needed
        let filters = vec![
            price_filter("1.5", "100", "0.5"),
            lot_size("1", "100", "1"),
            min_notional("6"),
        ];
        let value = quantize(&filters, "0.999", "1", &policy).unwrap();
        assert_eq!(value.price.to_string(), "1.5");
        assert_eq!(value.quantity, d("4"));
    }

    #[rstest]
    fn test_notional_may_exceed_max_qty(policy: RoundingPolicy) {
        let filters = vec![lot_size("1", "3", "1"), min_notional("10")];
        let value = quantize(&filters, "2", "1", &policy).unwrap();
        assert_eq!(value.quantity, d("5"));
    }
}

// ============================================================================
// PROPERTIES
// ============================================================================

fn grid_size() -> impl Strategy<Value = Decimal> {
    (prop::sample::select(vec![1i64, 2, 5, 25]), 0u32..=8).prop_map(|(m, s)| Decimal::new(m, s))
}

fn price_filter_strategy() -> impl Strategy<Value = PriceFilter> {
    (grid_size(), 1i64..10, 1_000i64..1_000_000).prop_map(|(tick, k, j)| {
        PriceFilter::new(
            tick * Decimal::from(k),
            tick * Decimal::from(k + j),
            tick,
        )
    })
}

fn lot_size_strategy() -> impl Strategy<Value = LotSizeFilter> {
    (grid_size(), 1i64..10, 1_000i64..1_000_000).prop_map(|(step, k, j)| {
        LotSizeFilter::new(
            step * Decimal::from(k),
            step * Decimal::from(k + j),
            step,
        )
    })
}

/// Up to 1e6 with eight fractional digits
fn raw_value() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000_000_000).prop_map(|m| Decimal::new(m, 8))
}

fn direction() -> impl Strategy<Value = RoundingDirection> {
    prop::sample::select(RoundingDirection::ALL.to_vec())
}

#[cfg(test)]
mod properties {
    use super::*;

    proptest! {
        #[test]
        fn test_price_on_tick_grid_and_in_bounds(
            filter in price_filter_strategy(),
            price in raw_value(),
            rounding in direction(),
        ) {
            let policy = RoundingPolicy::default().with_price_rounding(rounding);
            let value = quantize(&[SymbolFilter::Price(filter.clone())], price, Decimal::ONE, &policy).unwrap();

            prop_assert!(value.price >= filter.min_price);
            prop_assert!(value.price <= filter.max_price);
            prop_assert!((value.price % filter.tick_size).is_zero());
            prop_assert!((value.price - filter.min_price) % filter.tick_size == Decimal::ZERO);
        }

        #[test]
        fn test_quantity_on_step_grid_and_in_bounds(
            filter in lot_size_strategy(),
            quantity in raw_value(),
            rounding in direction(),
        ) {
            let policy = RoundingPolicy::default().with_quantity_rounding(rounding);
            let value = quantize(&[SymbolFilter::LotSize(filter.clone())], Decimal::ONE, quantity, &policy).unwrap();

            prop_assert!(value.quantity >= filter.min_qty);
            prop_assert!(value.quantity <= filter.max_qty);
            prop_assert!((value.quantity % filter.step_size).is_zero());
        }

        #[test]
        fn test_notional_floor_always_cleared(
            price_rule in price_filter_strategy(),
            lot_rule in lot_size_strategy(),
            floor in 1i64..10_000,
            price in raw_value(),
            quantity in raw_value(),
        ) {
            let filters = vec![
                SymbolFilter::Price(price_rule),
                SymbolFilter::LotSize(lot_rule.clone()),
                SymbolFilter::MinNotional(MinNotionalFilter::new(Decimal::from(floor))),
            ];
            let value = quantize(&filters, price, quantity, &RoundingPolicy::default()).unwrap();

            prop_assert!(value.price * value.quantity >= Decimal::from(floor));
            prop_assert!((value.quantity % lot_rule.step_size).is_zero());
        }

        #[test]
        fn test_quantize_is_idempotent(
            price_rule in price_filter_strategy(),
            lot_rule in lot_size_strategy(),
            floor in 0i64..10_000,
            price in raw_value(),
            quantity in raw_value(),
            price_rounding in direction(),
            quantity_rounding in direction(),
        ) {
            let filters = vec![
                SymbolFilter::Price(price_rule),
                SymbolFilter::LotSize(lot_rule),
                SymbolFilter::MinNotional(MinNotionalFilter::new(Decimal::from(floor))),
            ];
            let policy = RoundingPolicy::new(price_rounding, quantity_rounding);

            let once = quantize(&filters, price, quantity, &policy).unwrap();
            let twice = once.quantize(&filters, &policy).unwrap();

            prop_assert_eq!(once.price.to_string(), twice.price.to_string());
            prop_assert_eq!(once.quantity.to_string(), twice.quantity.to_string());
        }

        #[test]
        fn test_absent_filters_leave_values_alone(
            price in raw_value(),
            quantity in raw_value(),
        ) {
            let filters = vec![SymbolFilter::Other, SymbolFilter::MinNotional(MinNotionalFilter::new(Decimal::ONE))];
            let value = quantize(&filters, price, quantity, &RoundingPolicy::default()).unwrap();

            prop_assert_eq!(value, OrderValue::new(price, quantity));
        }
    }
}

// ============================================================================
// CONCURRENCY
// ============================================================================

#[cfg(test)]
mod concurrency {
    use super::*;

    #[test]
    fn test_shared_filters_across_threads() {
        let filters = vec![
            price_filter("0.01", "100000", "0.01"),
            lot_size("0.0001", "1000", "0.0001"),
            min_notional("10"),
        ];
        let policy = RoundingPolicy::default();
        let expected = quantize(&filters, "2500.456", "0.00123", &policy).unwrap();

        let shared = (&filters, &policy);
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let (filters, policy) = shared;
                    scope.spawn(move || quantize(filters, "2500.456", "0.00123", policy).unwrap())
                })
                .collect();

            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });

        assert_eq!(expected.price.to_string(), "2500.45");
        assert_eq!(expected.quantity.to_string(), "0.0040");
    }
}
