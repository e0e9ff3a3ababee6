//! Pricing engine module for courier deliveries.
//!
//! Resolves a service type and parcel weight to a rate tier, then composes the
//! delivery price (distance surcharge, fuel levy, GST). The portals call this
//! over HTTP/JSON.

pub mod calculators;
pub mod models;
pub mod rates;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{compute_price, round_money, PriceBreakdown};
pub use models::{PricingRequest, QuotePolicy, ServiceType, ServiceTypeParsing};
pub use rates::{resolve_rate, ResolvedRate};
pub use routes::router;
pub use services::{quote, quote_by_address, PricingError, QuoteError};
