//! Core pricing calculation functions.
//!
//! Pure functions for pricing math - no I/O, no logging, no shared state.
//! Intermediate values keep full precision; money is rounded once, on output.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::models::{DistanceKm, FuelLevyPercent, PricingRequest};
use super::rates::{resolve_rate, RateTier, ResolvedRate};

/// GST rate applied to subtotal plus fuel levy. Fixed by law, not by caller.
pub const GST_RATE: Decimal = dec!(0.10);

/// Message returned for service types that have no fixed-rate formula.
pub const QUOTE_REQUIRED_MESSAGE: &str = "Contact our dispatch team for a quote on this service";

/// Round to specified decimal places, halves away from zero.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use courier_pricing::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(3));
/// assert_eq!(round_money(dec!(1.005), 2), dec!(1.01));
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// Priced breakdown for a single delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub requires_quote: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub per_km_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub chargeable_distance_km: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub distance_charge: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub fuel_levy: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub fuel_levy_percent: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub gst: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl PriceBreakdown {
    /// Breakdown for a service type that must be quoted by hand.
    pub fn quote_required(fuel_levy_percent: FuelLevyPercent) -> Self {
        Self {
            requires_quote: true,
            message: Some(QUOTE_REQUIRED_MESSAGE.to_string()),
            base_price: Decimal::ZERO,
            per_km_rate: Decimal::ZERO,
            chargeable_distance_km: Decimal::ZERO,
            distance_charge: Decimal::ZERO,
            subtotal: Decimal::ZERO,
            fuel_levy: Decimal::ZERO,
            fuel_levy_percent: fuel_levy_percent.value(),
            gst: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }
}

/// Compose the full price from a resolved tier.
///
/// Every step runs at full precision and each output field is rounded to cents
/// on its own. GST is therefore exactly 10% of the unrounded subtotal plus levy,
/// and `total` is the rounded full-precision sum. Because the parts are rounded
/// independently, `subtotal + fuel_levy + gst` can differ from `total` by one
/// cent (standard, 5 kg, 0.03 km at a 12.3% levy: parts 39.50 + 4.86 + 4.44 =
/// 48.80, total 48.79).
///
/// The distance and levy newtypes are capped, so none of the products here can
/// overflow.
pub fn compose_price(
    tier: &RateTier,
    distance_km: DistanceKm,
    fuel_levy_percent: FuelLevyPercent,
) -> PriceBreakdown {
    let chargeable_distance = tier.chargeable_distance(distance_km.value());
    let distance_charge = if tier.per_km_rate > Decimal::ZERO {
        chargeable_distance * tier.per_km_rate
    } else {
        Decimal::ZERO
    };
    let subtotal = tier.base_price + distance_charge;
    let fuel_levy = subtotal * (fuel_levy_percent.value() / Decimal::ONE_HUNDRED);
    let gst = (subtotal + fuel_levy) * GST_RATE;
    let total = subtotal + fuel_levy + gst;

    PriceBreakdown {
        requires_quote: false,
        message: None,
        base_price: round_money(tier.base_price, 2),
        per_km_rate: round_money(tier.per_km_rate, 2),
        chargeable_distance_km: round_money(chargeable_distance, 2),
        distance_charge: round_money(distance_charge, 2),
        subtotal: round_money(subtotal, 2),
        fuel_levy: round_money(fuel_levy, 2),
        fuel_levy_percent: fuel_levy_percent.value(),
        gst: round_money(gst, 2),
        total: round_money(total, 2),
    }
}

/// Price a validated request.
pub fn compute_price(request: &PricingRequest) -> PriceBreakdown {
    match resolve_rate(request.service_type, request.weight) {
        ResolvedRate::RequiresQuote => PriceBreakdown::quote_required(request.fuel_levy_percent),
        ResolvedRate::Priced(tier) => {
            compose_price(&tier, request.distance, request.fuel_levy_percent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::models::{QuotePolicy, ServiceType, WeightKg};

    fn price(service_type: &str, weight_kg: f64, distance_km: f64, levy: Option<f64>) -> PriceBreakdown {
        let request = PricingRequest::from_raw(
            service_type,
            weight_kg,
            distance_km,
            levy,
            &QuotePolicy::default(),
        )
        .unwrap();
        compute_price(&request)
    }

    // ==================== round_money tests ====================

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(dec!(2.5), 0), dec!(3));
        assert_eq!(round_money(dec!(3.5), 0), dec!(4));
        assert_eq!(round_money(dec!(-2.5), 0), dec!(-3));
        assert_eq!(round_money(dec!(0.125), 2), dec!(0.13));
    }

    #[test]
    fn test_round_money_normal_rounding() {
        assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
        assert_eq!(round_money(dec!(1.236), 2), dec!(1.24));
        assert_eq!(round_money(dec!(999999.995), 2), dec!(1000000.00));
    }

    // ==================== concrete scenarios ====================

    #[test]
    fn test_standard_light_over_threshold() {
        let result = price("standard", 5.0, 25.0, Some(10.0));
        assert!(!result.requires_quote);
        assert_eq!(result.base_price, dec!(39.50));
        assert_eq!(result.per_km_rate, dec!(1.70));
        assert_eq!(result.chargeable_distance_km, dec!(15));
        assert_eq!(result.distance_charge, dec!(25.50));
        assert_eq!(result.subtotal, dec!(65.00));
        assert_eq!(result.fuel_levy, dec!(6.50));
        assert_eq!(result.gst, dec!(7.15));
        assert_eq!(result.total, dec!(78.65));
    }

    #[test]
    fn test_priority_heavy_under_threshold() {
        let result = price("priority", 15.0, 5.0, Some(10.0));
        assert_eq!(result.base_price, dec!(150.00));
        assert_eq!(result.distance_charge, dec!(0));
        assert_eq!(result.subtotal, dec!(150.00));
        assert_eq!(result.fuel_levy, dec!(15.00));
        assert_eq!(result.gst, dec!(16.50));
        assert_eq!(result.total, dec!(181.50));
    }

    #[test]
    fn test_express_heavy_beyond_band() {
        let result = price("express", 15.0, 35.0, Some(10.0));
        assert_eq!(result.base_price, dec!(67.00));
        assert_eq!(result.chargeable_distance_km, dec!(20));
        assert_eq!(result.distance_charge, dec!(34.00));
        assert_eq!(result.subtotal, dec!(101.00));
        assert_eq!(result.fuel_levy, dec!(10.10));
        assert_eq!(result.gst, dec!(11.11));
        assert_eq!(result.total, dec!(122.21));
    }

    #[test]
    fn test_weekend_requires_quote() {
        let result = price("weekend", 5.0, 50.0, None);
        assert!(result.requires_quote);
        assert!(result.message.is_some());
        assert_eq!(result.base_price, dec!(0));
        assert_eq!(result.distance_charge, dec!(0));
        assert_eq!(result.subtotal, dec!(0));
        assert_eq!(result.fuel_levy, dec!(0));
        assert_eq!(result.gst, dec!(0));
        assert_eq!(result.total, dec!(0));
    }

    // ==================== properties ====================

    #[test]
    fn test_quote_short_circuit_ignores_inputs() {
        for service_type in ["after_hours", "weekend", "scheduled"] {
            for (weight, distance, levy) in [(0.0, 0.0, 0.0), (50.0, 500.0, 35.0), (10.0, 10.0, 10.0)] {
                let result = price(service_type, weight, distance, Some(levy));
                assert!(result.requires_quote);
                assert_eq!(result.total, Decimal::ZERO);
                assert_eq!(result.subtotal, Decimal::ZERO);
                assert_eq!(result.gst, Decimal::ZERO);
            }
        }
    }

    #[test]
    fn test_threshold_boundary() {
        assert_eq!(price("standard", 5.0, 10.0, None).distance_charge, dec!(0));
        assert!(price("standard", 5.0, 10.01, None).distance_charge > Decimal::ZERO);
    }

    #[test]
    fn test_total_non_decreasing_in_distance() {
        for service_type in ServiceType::ALL {
            for weight in [1.0, 10.0, 10.5, 40.0] {
                let mut previous = Decimal::MIN;
                for step in 0..120 {
                    let distance = step as f64 * 0.5;
                    let total = price(service_type.as_str(), weight, distance, Some(10.0)).total;
                    assert!(total >= previous, "{} {}kg at {}km", service_type, weight, distance);
                    previous = total;
                }
            }
        }
    }

    #[test]
    fn test_whole_cent_parts_sum_to_total() {
        for (service_type, weight, distance, levy) in [
            ("standard", 5.0, 25.0, 10.0),
            ("same_day", 3.0, 14.0, 12.0),
            ("priority", 15.0, 40.0, 0.0),
            ("next_day", 30.0, 11.0, 7.5),
        ] {
            let result = price(service_type, weight, distance, Some(levy));
            assert_eq!(result.gst, round_money((result.subtotal + result.fuel_levy) * GST_RATE, 2));
            assert_eq!(result.total, result.subtotal + result.fuel_levy + result.gst);
        }
    }

    #[test]
    fn test_rounded_parts_can_miss_total_by_a_cent() {
        let result = price("standard", 5.0, 0.03, Some(12.3));
        assert_eq!(result.subtotal, dec!(39.50));
        // 39.5 * 0.123 = 4.8585
        assert_eq!(result.fuel_levy, dec!(4.86));
        // 44.3585 * 0.1 = 4.43585
        assert_eq!(result.gst, dec!(4.44));
        // 44.3585 * 1.1 = 48.79435
        assert_eq!(result.total, dec!(48.79));
        assert_eq!(result.subtotal + result.fuel_levy + result.gst, dec!(48.80));
    }

    #[test]
    fn test_gst_exact_and_total_within_a_cent_of_parts() {
        let service_types = ["standard", "same_day", "next_day", "express", "priority"];
        let weights = [2.5, 10.0, 10.01, 37.3];
        let distances = [0.03, 9.999, 10.013, 17.77, 29.995, 33.333, 61.27];
        let levies = [0.0, 7.5, 9.99, 12.3, 13.37];

        for service_type in service_types {
            for weight in weights {
                let tier = match resolve_rate(service_type.parse().unwrap(), WeightKg::new(weight).unwrap()) {
                    ResolvedRate::Priced(tier) => tier,
                    ResolvedRate::RequiresQuote => unreachable!("{} is priced", service_type),
                };
                for distance in distances {
                    for levy in levies {
                        let result = price(service_type, weight, distance, Some(levy));

                        let km = DistanceKm::new(distance).unwrap().value();
                        let distance_charge = if tier.per_km_rate > Decimal::ZERO {
                            tier.chargeable_distance(km) * tier.per_km_rate
                        } else {
                            Decimal::ZERO
                        };
                        let subtotal = tier.base_price + distance_charge;
                        let fuel_levy = subtotal * (FuelLevyPercent::new(levy).unwrap().value() / Decimal::ONE_HUNDRED);
                        let case = format!("{} {}kg {}km {}%", service_type, weight, distance, levy);

                        assert_eq!(result.gst, round_money((subtotal + fuel_levy) * GST_RATE, 2), "{}", case);
                        let parts = result.subtotal + result.fuel_levy + result.gst;
                        assert!((result.total - parts).abs() <= dec!(0.01), "{}", case);
                    }
                }
            }
        }
    }

    #[test]
    fn test_rounding_happens_once_at_output() {
        // subtotal 39.5 + 0.005 * 1.7 = 39.5085; rounding the subtotal first would
        // give a different total than rounding the full-precision total.
        let result = price("standard", 5.0, 10.005, Some(10.0));
        assert_eq!(result.distance_charge, dec!(0.01));
        assert_eq!(result.subtotal, dec!(39.51));
        // 39.5085 * 1.1 * 1.1 = 47.805285
        assert_eq!(result.total, dec!(47.81));
    }

    #[test]
    fn test_same_input_same_output() {
        let first = price("same_day", 12.0, 22.5, Some(8.0));
        let second = price("same_day", 12.0, 22.5, Some(8.0));
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_type_prices_as_standard() {
        assert_eq!(price("bogus_type", 5.0, 5.0, None), price("standard", 5.0, 5.0, None));
        assert_eq!(price("", 15.0, 40.0, None), price("standard", 15.0, 40.0, None));
    }

    #[test]
    fn test_zero_fuel_levy() {
        let result = price("standard", 5.0, 5.0, Some(0.0));
        assert_eq!(result.fuel_levy, dec!(0));
        assert_eq!(result.gst, dec!(3.95));
        assert_eq!(result.total, dec!(43.45));
        assert_eq!(result.fuel_levy_percent, dec!(0));
    }

    #[test]
    fn test_included_rate_never_charges_distance() {
        let result = price("vip", 2.0, 200.0, None);
        assert_eq!(result.distance_charge, dec!(0));
        assert_eq!(result.chargeable_distance_km, dec!(190));
        assert_eq!(result.subtotal, dec!(120.00));
    }
}
