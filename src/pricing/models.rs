//! Domain types for delivery pricing.
//!
//! Service types form a closed enum; weights, distances and levy percentages are
//! validated newtypes so the composer never sees negative, non-finite or
//! out-of-range input.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::services::PricingError;

/// Fuel levy applied when the caller does not supply one.
pub const DEFAULT_FUEL_LEVY_PERCENT: Decimal = Decimal::TEN;

/// Delivery service type as booked in the portals.
///
/// Several codes are aliases that share a rate family (see [`ServiceType::family`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Standard,
    SameDayStandard,
    SameDay,
    SameDayFlexible,
    LocalOvernight,
    NextDay,
    Express,
    Emergency,
    Priority,
    Vip,
    AfterHours,
    Weekend,
    Scheduled,
}

impl ServiceType {
    pub const ALL: [ServiceType; 13] = [
        ServiceType::Standard,
        ServiceType::SameDayStandard,
        ServiceType::SameDay,
        ServiceType::SameDayFlexible,
        ServiceType::LocalOvernight,
        ServiceType::NextDay,
        ServiceType::Express,
        ServiceType::Emergency,
        ServiceType::Priority,
        ServiceType::Vip,
        ServiceType::AfterHours,
        ServiceType::Weekend,
        ServiceType::Scheduled,
    ];

    /// Wire code, exactly as the portals send it.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Standard => "standard",
            ServiceType::SameDayStandard => "same_day_standard",
            ServiceType::SameDay => "same_day",
            ServiceType::SameDayFlexible => "same_day_flexible",
            ServiceType::LocalOvernight => "local_overnight",
            ServiceType::NextDay => "next_day",
            ServiceType::Express => "express",
            ServiceType::Emergency => "emergency",
            ServiceType::Priority => "priority",
            ServiceType::Vip => "vip",
            ServiceType::AfterHours => "after_hours",
            ServiceType::Weekend => "weekend",
            ServiceType::Scheduled => "scheduled",
        }
    }

    /// Rate family this service type is priced under.
    pub fn family(&self) -> RateFamily {
        match self {
            ServiceType::Standard | ServiceType::SameDayStandard => RateFamily::Standard,
            ServiceType::SameDay | ServiceType::SameDayFlexible => RateFamily::SameDay,
            ServiceType::LocalOvernight | ServiceType::NextDay => RateFamily::Overnight,
            ServiceType::Express | ServiceType::Emergency => RateFamily::Express,
            ServiceType::Priority | ServiceType::Vip => RateFamily::Priority,
            ServiceType::AfterHours | ServiceType::Weekend => RateFamily::OutOfHours,
            ServiceType::Scheduled => RateFamily::Scheduled,
        }
    }

    /// Parse a wire code according to the given policy.
    ///
    /// Lenient parsing maps anything unrecognised to `Standard`, which is what
    /// existing portal clients rely on.
    pub fn parse_with(code: &str, parsing: ServiceTypeParsing) -> Result<Self, PricingError> {
        match (code.parse::<ServiceType>(), parsing) {
            (Ok(service_type), _) => Ok(service_type),
            (Err(_), ServiceTypeParsing::Lenient) => Ok(ServiceType::Standard),
            (Err(err), ServiceTypeParsing::Strict) => Err(err),
        }
    }
}

impl FromStr for ServiceType {
    type Err = PricingError;

    /// Strict, case-sensitive parse.
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        ServiceType::ALL
            .iter()
            .copied()
            .find(|service_type| service_type.as_str() == code)
            .ok_or_else(|| PricingError::UnknownServiceType(code.to_string()))
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How unrecognised service type codes are treated at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceTypeParsing {
    /// Unknown codes fall back to `standard`.
    #[default]
    Lenient,
    /// Unknown codes are rejected with `PricingError::UnknownServiceType`.
    Strict,
}

/// Boundary rules applied when turning raw caller input into a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuotePolicy {
    pub parsing: ServiceTypeParsing,
    /// Levy used when the caller leaves it out.
    pub default_fuel_levy_percent: FuelLevyPercent,
}

impl QuotePolicy {
    pub fn strict() -> Self {
        Self {
            parsing: ServiceTypeParsing::Strict,
            ..Self::default()
        }
    }

    /// Validate an optional caller levy, falling back to the policy default.
    pub fn fuel_levy(&self, fuel_levy_percent: Option<f64>) -> Result<FuelLevyPercent, PricingError> {
        Ok(fuel_levy_percent
            .map(FuelLevyPercent::new)
            .transpose()?
            .unwrap_or(self.default_fuel_levy_percent))
    }
}

/// Rate card row shared by one or more service types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RateFamily {
    Standard,
    SameDay,
    Overnight,
    Express,
    Priority,
    OutOfHours,
    Scheduled,
}

impl RateFamily {
    /// Service types priced under this family.
    pub fn members(&self) -> Vec<ServiceType> {
        ServiceType::ALL
            .iter()
            .copied()
            .filter(|service_type| service_type.family() == *self)
            .collect()
    }
}

/// Largest accepted parcel weight, in kilograms.
pub const MAX_WEIGHT_KG: Decimal = dec!(100_000);
/// Largest accepted trip distance, in kilometres.
pub const MAX_DISTANCE_KM: Decimal = dec!(1_000_000);
/// Largest accepted fuel levy, as a percentage.
pub const MAX_FUEL_LEVY_PERCENT: Decimal = dec!(1000);

/// Check that a decimal quantity lies in `0..=max`.
fn within_bounds(field: &'static str, value: Decimal, max: Decimal) -> Result<Decimal, PricingError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(PricingError::InvalidInput {
            field,
            reason: format!("must not be negative (got {})", value),
        });
    }
    if value > max {
        return Err(PricingError::InvalidInput {
            field,
            reason: format!("must not exceed {} (got {})", max, value),
        });
    }
    Ok(value)
}

/// Convert a caller-supplied number into a decimal in `0..=max`.
fn bounded(field: &'static str, value: f64, max: Decimal) -> Result<Decimal, PricingError> {
    if !value.is_finite() {
        return Err(PricingError::InvalidInput {
            field,
            reason: "must be a finite number".to_string(),
        });
    }
    if value < 0.0 {
        return Err(PricingError::InvalidInput {
            field,
            reason: format!("must not be negative (got {})", value),
        });
    }
    let decimal = Decimal::from_f64(value).ok_or_else(|| PricingError::InvalidInput {
        field,
        reason: format!("must not exceed {} (got {})", max, value),
    })?;
    within_bounds(field, decimal, max)
}

macro_rules! validated_quantity {
    ($(#[$meta:meta])* $name:ident, $field:literal, $max:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
        pub struct $name(Decimal);

        impl $name {
            pub const MAX: Decimal = $max;

            pub fn new(value: f64) -> Result<Self, PricingError> {
                bounded($field, value, Self::MAX).map(Self)
            }

            pub fn from_decimal(value: Decimal) -> Result<Self, PricingError> {
                within_bounds($field, value, Self::MAX).map(Self)
            }

            pub fn value(&self) -> Decimal {
                self.0
            }
        }
    };
}

// The caps keep every product in the price composer well inside `Decimal`
// range, so composing a validated request cannot overflow.
validated_quantity!(
    /// Parcel weight in kilograms, at most [`MAX_WEIGHT_KG`].
    WeightKg,
    "weightKg",
    MAX_WEIGHT_KG
);
validated_quantity!(
    /// Trip distance in kilometres, at most [`MAX_DISTANCE_KM`].
    DistanceKm,
    "distanceKm",
    MAX_DISTANCE_KM
);
validated_quantity!(
    /// Fuel levy as a percentage of the subtotal, at most [`MAX_FUEL_LEVY_PERCENT`].
    FuelLevyPercent,
    "fuelLevyPercent",
    MAX_FUEL_LEVY_PERCENT
);

impl Default for FuelLevyPercent {
    fn default() -> Self {
        Self(DEFAULT_FUEL_LEVY_PERCENT)
    }
}

/// A validated pricing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingRequest {
    pub service_type: ServiceType,
    pub weight: WeightKg,
    pub distance: DistanceKm,
    pub fuel_levy_percent: FuelLevyPercent,
}

impl PricingRequest {
    /// Build a request from raw caller input.
    pub fn from_raw(
        service_type: &str,
        weight_kg: f64,
        distance_km: f64,
        fuel_levy_percent: Option<f64>,
        policy: &QuotePolicy,
    ) -> Result<Self, PricingError> {
        Ok(Self {
            service_type: ServiceType::parse_with(service_type, policy.parsing)?,
            weight: WeightKg::new(weight_kg)?,
            distance: DistanceKm::new(distance_km)?,
            fuel_levy_percent: policy.fuel_levy(fuel_levy_percent)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_type_round_trips_wire_codes() {
        for service_type in ServiceType::ALL {
            assert_eq!(service_type.as_str().parse::<ServiceType>().unwrap(), service_type);
        }
    }

    #[test]
    fn test_service_type_parse_is_case_sensitive() {
        assert!("Standard".parse::<ServiceType>().is_err());
        assert!("EXPRESS".parse::<ServiceType>().is_err());
    }

    #[test]
    fn test_lenient_parsing_falls_back_to_standard() {
        let parsed = ServiceType::parse_with("bogus_type", ServiceTypeParsing::Lenient).unwrap();
        assert_eq!(parsed, ServiceType::Standard);
    }

    #[test]
    fn test_strict_parsing_rejects_unknown() {
        let err = ServiceType::parse_with("bogus_type", ServiceTypeParsing::Strict).unwrap_err();
        assert!(matches!(err, PricingError::UnknownServiceType(ref code) if code == "bogus_type"));
    }

    #[test]
    fn test_aliases_share_family() {
        assert_eq!(ServiceType::Vip.family(), ServiceType::Priority.family());
        assert_eq!(ServiceType::NextDay.family(), RateFamily::Overnight);
        assert_eq!(ServiceType::Weekend.family(), RateFamily::OutOfHours);
        assert_eq!(RateFamily::Express.members(), vec![ServiceType::Express, ServiceType::Emergency]);
    }

    #[test]
    fn test_weight_rejects_negative_and_non_finite() {
        assert!(WeightKg::new(-0.5).is_err());
        assert!(WeightKg::new(f64::NAN).is_err());
        assert!(WeightKg::new(f64::INFINITY).is_err());
        assert_eq!(WeightKg::new(0.0).unwrap().value(), dec!(0));
    }

    #[test]
    fn test_distance_keeps_decimal_value() {
        assert_eq!(DistanceKm::new(10.01).unwrap().value(), dec!(10.01));
        assert!(DistanceKm::from_decimal(dec!(-1)).is_err());
    }

    #[test]
    fn test_quantities_reject_values_above_cap() {
        let err = DistanceKm::new(5e28).unwrap_err();
        assert!(matches!(err, PricingError::InvalidInput { field: "distanceKm", .. }));
        let err = FuelLevyPercent::new(7e28).unwrap_err();
        assert!(matches!(err, PricingError::InvalidInput { field: "fuelLevyPercent", .. }));
        assert!(WeightKg::new(1e300).is_err());
        assert!(FuelLevyPercent::from_decimal(dec!(1000.01)).is_err());
    }

    #[test]
    fn test_quantities_accept_cap_exactly() {
        assert_eq!(DistanceKm::new(1_000_000.0).unwrap().value(), MAX_DISTANCE_KM);
        assert_eq!(FuelLevyPercent::new(1000.0).unwrap().value(), MAX_FUEL_LEVY_PERCENT);
        assert_eq!(WeightKg::from_decimal(MAX_WEIGHT_KG).unwrap().value(), dec!(100000));
    }

    #[test]
    fn test_invalid_input_names_field() {
        let err = DistanceKm::new(-3.0).unwrap_err();
        assert!(err.to_string().contains("distanceKm"));
    }

    #[test]
    fn test_request_defaults_fuel_levy() {
        let request = PricingRequest::from_raw("express", 5.0, 12.0, None, &QuotePolicy::default()).unwrap();
        assert_eq!(request.fuel_levy_percent.value(), dec!(10));
        assert_eq!(request.service_type, ServiceType::Express);
    }

    #[test]
    fn test_policy_default_fuel_levy_applies() {
        let policy = QuotePolicy {
            default_fuel_levy_percent: FuelLevyPercent::new(15.0).unwrap(),
            ..QuotePolicy::default()
        };
        let request = PricingRequest::from_raw("standard", 5.0, 12.0, None, &policy).unwrap();
        assert_eq!(request.fuel_levy_percent.value(), dec!(15));

        let request = PricingRequest::from_raw("standard", 5.0, 12.0, Some(0.0), &policy).unwrap();
        assert_eq!(request.fuel_levy_percent.value(), dec!(0));
    }

    #[test]
    fn test_request_rejects_negative_fuel_levy() {
        let result = PricingRequest::from_raw("standard", 5.0, 12.0, Some(-1.0), &QuotePolicy::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_strict_policy_rejects_unknown_in_request() {
        let result = PricingRequest::from_raw("bogus", 5.0, 12.0, None, &QuotePolicy::strict());
        assert!(matches!(result, Err(PricingError::UnknownServiceType(_))));
    }
}
