use serde::Serialize;

use crate::config::PricingConfig;

/// Fares in won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Fares {
    pub adult: u32,
    pub disabled: u32,
    pub child: u32,
    pub infant_seat: u32,
}

fn percent_of(amount: u32, percent: u32) -> u32 {
    (u64::from(amount) * u64::from(percent) / 100) as u32
}

impl From<&PricingConfig> for Fares {
    fn from(pricing: &PricingConfig) -> Self {
        let adult = pricing.adult_fare;
        Fares {
            adult,
            disabled: percent_of(adult, 100u32.saturating_sub(pricing.disabled_discount_percent)),
            child: percent_of(adult, 100u32.saturating_sub(pricing.child_discount_percent)),
            infant_seat: percent_of(adult, pricing.infant_seat_fare_percent),
        }
    }
}
