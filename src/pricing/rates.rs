//! Rate card and tier resolution.
//!
//! The rate card is static policy data keyed by rate family. Resolution picks the
//! light or heavy weight tier; families without a formula resolve to a manual quote.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::models::{RateFamily, ServiceType, WeightKg};

/// Parcels heavier than this are priced on the heavy tier.
pub const WEIGHT_TIER_THRESHOLD_KG: Decimal = dec!(10);

/// Distance included in the base price before per-km charges start.
pub const INCLUDED_DISTANCE_KM: Decimal = dec!(10);

/// Pricing for one weight tier of a rate family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateTier {
    #[serde(with = "rust_decimal::serde::float")]
    pub base_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub per_km_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub per_km_threshold_km: Decimal,
    /// Distance beyond which nothing more is charged, for banded tiers.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub per_km_band_end_km: Option<Decimal>,
}

impl RateTier {
    const fn after_threshold(base_price: Decimal, per_km_rate: Decimal) -> Self {
        Self {
            base_price,
            per_km_rate,
            per_km_threshold_km: INCLUDED_DISTANCE_KM,
            per_km_band_end_km: None,
        }
    }

    /// Kilometres billed at the per-km rate for a trip of `distance_km`.
    pub fn chargeable_distance(&self, distance_km: Decimal) -> Decimal {
        let billed_to = match self.per_km_band_end_km {
            Some(band_end) => distance_km.min(band_end),
            None => distance_km,
        };
        (billed_to - self.per_km_threshold_km).max(Decimal::ZERO)
    }
}

/// How a rate family is priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatePlan {
    Tiered { light: RateTier, heavy: RateTier },
    ManualQuote,
}

/// Outcome of resolving a service type and weight against the rate card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedRate {
    Priced(RateTier),
    RequiresQuote,
}

pub const RATE_CARD: [(RateFamily, RatePlan); 7] = [
    (
        RateFamily::Standard,
        RatePlan::Tiered {
            light: RateTier::after_threshold(dec!(39.50), dec!(1.70)),
            heavy: RateTier::after_threshold(dec!(45.00), dec!(1.70)),
        },
    ),
    (
        RateFamily::SameDay,
        RatePlan::Tiered {
            light: RateTier::after_threshold(dec!(35.00), dec!(1.25)),
            heavy: RateTier::after_threshold(dec!(40.00), dec!(1.70)),
        },
    ),
    // Both weight tiers are the same flat base; kept as two tiers so a heavier
    // overnight price can be slotted in without touching the resolver.
    (
        RateFamily::Overnight,
        RatePlan::Tiered {
            light: RateTier::after_threshold(dec!(32.00), dec!(1.70)),
            heavy: RateTier::after_threshold(dec!(32.00), dec!(1.70)),
        },
    ),
    // Heavy express is only billed between 10 and 30 km; anything past 30 km is
    // free. This looks like a gap in the published rules but is what customers
    // are currently quoted, so it stays until product confirms otherwise.
    (
        RateFamily::Express,
        RatePlan::Tiered {
            light: RateTier::after_threshold(dec!(60.00), Decimal::ZERO),
            heavy: RateTier {
                base_price: dec!(67.00),
                per_km_rate: dec!(1.70),
                per_km_threshold_km: INCLUDED_DISTANCE_KM,
                per_km_band_end_km: Some(dec!(30)),
            },
        },
    ),
    (
        RateFamily::Priority,
        RatePlan::Tiered {
            light: RateTier::after_threshold(dec!(120.00), Decimal::ZERO),
            heavy: RateTier::after_threshold(dec!(150.00), dec!(1.70)),
        },
    ),
    (RateFamily::OutOfHours, RatePlan::ManualQuote),
    (RateFamily::Scheduled, RatePlan::ManualQuote),
];

/// Look up the plan for a rate family.
pub fn plan_for(family: RateFamily) -> RatePlan {
    RATE_CARD
        .iter()
        .find(|(entry, _)| *entry == family)
        .map(|(_, plan)| *plan)
        .unwrap_or(RatePlan::ManualQuote)
}

/// Resolve the rate for a service type and parcel weight.
pub fn resolve_rate(service_type: ServiceType, weight: WeightKg) -> ResolvedRate {
    match plan_for(service_type.family()) {
        RatePlan::ManualQuote => ResolvedRate::RequiresQuote,
        RatePlan::Tiered { light, heavy } => {
            if weight.value() > WEIGHT_TIER_THRESHOLD_KG {
                ResolvedRate::Priced(heavy)
            } else {
                ResolvedRate::Priced(light)
            }
        }
    }
}

/// Published rate card row, as served to the portals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateCardRow {
    pub family: RateFamily,
    pub service_types: Vec<ServiceType>,
    pub requires_quote: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub weight_threshold_kg: Decimal,
    pub light: Option<RateTier>,
    pub heavy: Option<RateTier>,
}

/// The whole rate card in display order.
pub fn rate_card() -> Vec<RateCardRow> {
    RATE_CARD
        .iter()
        .map(|(family, plan)| {
            let (light, heavy) = match plan {
                RatePlan::Tiered { light, heavy } => (Some(*light), Some(*heavy)),
                RatePlan::ManualQuote => (None, None),
            };
            RateCardRow {
                family: *family,
                service_types: family.members(),
                requires_quote: matches!(plan, RatePlan::ManualQuote),
                weight_threshold_kg: WEIGHT_TIER_THRESHOLD_KG,
                light,
                heavy,
            }
        })
        .collect()
}
