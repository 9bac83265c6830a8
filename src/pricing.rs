//! Consultation price resolution.
//!
//! First-time customers get the astrologer's first-time offer for the
//! duration, falling back to the platform-wide offer. Everyone else pays the
//! special price when one is set, otherwise the base price.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::domain::astrologer::Astrologer;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTier {
    AstrologerFirstTimeOffer,
    PlatformFirstTimeOffer,
    Special,
    Base,
}

impl PriceTier {
    pub fn label(self) -> &'static str {
        match self {
            PriceTier::AstrologerFirstTimeOffer => "First-time offer (astrologer)",
            PriceTier::PlatformFirstTimeOffer => "First-time offer (platform)",
            PriceTier::Special => "Special price",
            PriceTier::Base => "Base price",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedPrice {
    pub duration_minutes: u32,
    pub price: u32,
    pub tier: PriceTier,
}

/// Resolves the price a customer pays for `duration_minutes`.
///
/// Returns `None` when the astrologer offers no price for the duration and no
/// first-time offer applies.
pub fn resolve_price(
    astrologer: &Astrologer,
    duration_minutes: u32,
    first_time: bool,
    platform_offers: &BTreeMap<u32, u32>,
) -> Option<ResolvedPrice> {
    let resolved = |price: u32, tier: PriceTier| ResolvedPrice {
        duration_minutes,
        price,
        tier,
    };

    if first_time {
        if let Some(&price) = astrologer.first_time_offer.get(&duration_minutes) {
            return Some(resolved(price, PriceTier::AstrologerFirstTimeOffer));
        }
        if let Some(&price) = platform_offers.get(&duration_minutes) {
            return Some(resolved(price, PriceTier::PlatformFirstTimeOffer));
        }
    }

    if let Some(&price) = astrologer.special_prices.get(&duration_minutes) {
        return Some(resolved(price, PriceTier::Special));
    }

    astrologer
        .base_price(duration_minutes)
        .map(|price| resolved(price, PriceTier::Base))
}

/// One row of the price table on the astrologer page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PriceRow {
    pub duration_minutes: u32,
    pub regular: Option<ResolvedPrice>,
    pub first_time: Option<ResolvedPrice>,
}

/// Regular and first-time prices for every duration the astrologer or the
/// platform mentions, ordered by duration.
pub fn price_table(astrologer: &Astrologer, platform_offers: &BTreeMap<u32, u32>) -> Vec<PriceRow> {
    let durations: BTreeSet<u32> = astrologer
        .prices
        .iter()
        .map(|p| p.duration_minutes)
        .chain(astrologer.special_prices.keys().copied())
        .chain(astrologer.first_time_offer.keys().copied())
        .chain(platform_offers.keys().copied())
        .collect();

    durations
        .into_iter()
        .map(|duration_minutes| PriceRow {
            duration_minutes,
            regular: resolve_price(astrologer, duration_minutes, false, platform_offers),
            first_time: resolve_price(astrologer, duration_minutes, true, platform_offers),
        })
        .collect()
}
