//! Core pricing calculation functions.
//!
//! Pure functions for pricing math - no database access.

use std::cmp::Ordering;

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use super::models::{PriceListItem, PriceListItemTier};

/// Round to specified decimal places, halves away from zero.
///
/// This is the rounding the invoicing side of the platform applies, so totals
/// computed here match the amounts already printed on invoices.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use divecenter_engine::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(3));
/// assert_eq!(round_money(dec!(1.005), 2), dec!(1.01));
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// Calculate the price of `dive_count` dives over an ordered tier set.
///
/// Tiers are walked by `from_dives`. A tier consumed in full charges its fixed
/// `total_price` when it has one; a partially consumed tier (or one without a
/// fixed price) charges `price_per_dive` for each dive that falls inside it.
///
/// Returns `None` when no tier produced a positive total, e.g. when the dive
/// count is below the lowest tier.
pub fn calculate_tiered_price(dive_count: i32, tiers: &[PriceListItemTier]) -> Option<Decimal> {
    if dive_count <= 0 {
        return None;
    }

    let mut ordered: Vec<&PriceListItemTier> = tiers.iter().collect();
    ordered.sort_by_key(|t| t.from_dives);

    let mut total = Decimal::ZERO;
    let mut position = 1;

    for tier in ordered {
        if position > dive_count {
            break;
        }
        if tier.from_dives > dive_count {
            break;
        }

        let tier_end = tier.to_dives.unwrap_or(i32::MAX);
        if tier_end < position {
            continue;
        }

        let start = position.max(tier.from_dives);
        let end = dive_count.min(tier_end);
        let overlap = end - start + 1;
        if overlap <= 0 {
            continue;
        }

        let contribution = match (tier.width(), tier.total_price) {
            (Some(width), Some(fixed)) if overlap == width => fixed,
            _ => tier.price_per_dive.unwrap_or(Decimal::ZERO) * Decimal::from(overlap),
        };
        total += contribution;

        position = tier_end.saturating_add(1);
    }

    if total <= Decimal::ZERO {
        return None;
    }

    Some(round_money(total, 2))
}

/// Ranking used to pick one item among several matches.
///
/// Higher priority first, then cheaper base price, then the narrower dive
/// range, then the most recently created item. `Ordering::Less` means `a`
/// wins.
pub fn rank_candidates(a: &PriceListItem, b: &PriceListItem) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| a.base_price.cmp(&b.base_price))
        .then_with(|| a.range_width().cmp(&b.range_width()))
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Price per dive for a total, used when only a total is known (tiered items)
pub fn per_dive_price(total: Decimal, dive_count: i32) -> Decimal {
    if dive_count <= 0 {
        return Decimal::ZERO;
    }
    round_money(total / Decimal::from(dive_count), 2)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::pricing::models::{Applicability, PricingModel};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    pub(crate) fn tier(
        from: i32,
        to: Option<i32>,
        total: Option<Decimal>,
        per_dive: Option<Decimal>,
    ) -> PriceListItemTier {
        PriceListItemTier {
            id: i64::from(from),
            price_list_item_id: 1,
            from_dives: from,
            to_dives: to,
            total_price: total,
            price_per_dive: per_dive,
        }
    }

    pub(crate) fn item(id: i64, min: Option<i32>, max: Option<i32>) -> PriceListItem {
        PriceListItem {
            id,
            price_list_id: 1,
            service_type: "Dive Trip".to_string(),
            pricing_model: PricingModel::Range,
            min_dives: min,
            max_dives: max,
            base_price: dec!(100),
            price: None,
            currency: "AED".to_string(),
            priority: 0,
            applicable_to: Applicability::All,
            is_active: true,
            valid_from: None,
            valid_until: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn standard_tiers() -> Vec<PriceListItemTier> {
        vec![
            tier(1, Some(4), Some(dec!(380)), Some(dec!(100))),
            tier(5, Some(9), Some(dec!(400)), Some(dec!(90))),
            tier(10, None, None, Some(dec!(75))),
        ]
    }

    // ==================== round_money tests ====================

    #[test]
    fn test_round_money_halves_away_from_zero() {
        assert_eq!(round_money(dec!(2.5), 0), dec!(3));
        assert_eq!(round_money(dec!(-2.5), 0), dec!(-3));
        assert_eq!(round_money(dec!(2.345), 2), dec!(2.35));
        assert_eq!(round_money(dec!(1.2349), 2), dec!(1.23));
    }

    #[test]
    fn test_round_money_zero() {
        assert_eq!(round_money(dec!(0), 2), dec!(0));
    }

    // ==================== calculate_tiered_price tests ====================

    #[test]
    fn test_full_tier_uses_fixed_total() {
        // 4 dives consume the first tier completely
        assert_eq!(calculate_tiered_price(4, &standard_tiers()), Some(dec!(380)));
    }

    #[test]
    fn test_partial_tier_uses_per_dive_rate() {
        // 3 of 4 dives: no bulk price
        assert_eq!(calculate_tiered_price(3, &standard_tiers()), Some(dec!(300)));
    }

    #[test]
    fn test_full_then_partial_tier() {
        // 380 for tier one, 2 * 90 for the partial second tier
        assert_eq!(calculate_tiered_price(6, &standard_tiers()), Some(dec!(560)));
    }

    #[test]
    fn test_two_full_tiers_then_open_tier() {
        // 380 + 400 + 3 * 75
        assert_eq!(calculate_tiered_price(12, &standard_tiers()), Some(dec!(1005)));
    }

    #[test]
    fn test_open_ended_tier_never_uses_fixed_total() {
        let tiers = vec![tier(1, None, Some(dec!(10)), Some(dec!(50)))];
        assert_eq!(calculate_tiered_price(3, &tiers), Some(dec!(150)));
    }

    #[test]
    fn test_below_lowest_tier_returns_none() {
        let tiers = vec![tier(5, Some(10), None, Some(dec!(80)))];
        assert_eq!(calculate_tiered_price(3, &tiers), None);
    }

    #[test]
    fn test_zero_dives_returns_none() {
        assert_eq!(calculate_tiered_price(0, &standard_tiers()), None);
    }

    #[test]
    fn test_unsorted_tiers_are_walked_in_order() {
        let mut tiers = standard_tiers();
        tiers.reverse();
        assert_eq!(calculate_tiered_price(6, &tiers), Some(dec!(560)));
    }

    #[test]
    fn test_tier_without_any_price_yields_none() {
        let tiers = vec![tier(1, Some(5), None, None)];
        assert_eq!(calculate_tiered_price(3, &tiers), None);
    }

    #[test]
    fn test_result_is_rounded_to_cents() {
        let tiers = vec![tier(1, None, None, Some(dec!(33.333)))];
        assert_eq!(calculate_tiered_price(2, &tiers), Some(dec!(66.67)));
    }

    #[test]
    fn test_tiered_price_is_monotonic_in_dive_count() {
        let tiers = standard_tiers();
        let mut previous = Decimal::ZERO;
        for n in 1..=30 {
            let price = calculate_tiered_price(n, &tiers).unwrap();
            assert!(price >= previous, "price dropped at {} dives", n);
            previous = price;
        }
    }

    #[test]
    fn test_full_tier_contribution_is_exact_fixed_price() {
        let tiers = standard_tiers();
        let first = calculate_tiered_price(4, &tiers).unwrap();
        let both = calculate_tiered_price(9, &tiers).unwrap();
        assert_eq!(first, dec!(380));
        assert_eq!(both - first, dec!(400));
    }

    // ==================== rank_candidates tests ====================

    #[test]
    fn test_rank_priority_wins_over_price() {
        let mut a = item(1, Some(1), Some(5));
        let mut b = item(2, Some(1), Some(5));
        a.priority = 10;
        a.base_price = dec!(500);
        b.base_price = dec!(50);
        assert_eq!(rank_candidates(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_rank_cheaper_then_narrower() {
        let a = item(1, Some(1), Some(10));
        let mut b = item(2, Some(1), Some(10));
        b.base_price = dec!(90);
        assert_eq!(rank_candidates(&b, &a), Ordering::Less);

        let narrow = item(3, Some(2), Some(4));
        let wide = item(4, Some(1), Some(10));
        assert_eq!(rank_candidates(&narrow, &wide), Ordering::Less);
    }

    #[test]
    fn test_rank_most_recent_breaks_remaining_ties() {
        let older = item(1, Some(1), Some(5));
        let mut newer = item(2, Some(1), Some(5));
        newer.created_at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(rank_candidates(&newer, &older), Ordering::Less);
        assert_eq!(rank_candidates(&older, &newer), Ordering::Greater);
    }

    #[test]
    fn test_per_dive_price() {
        assert_eq!(per_dive_price(dec!(560), 6), dec!(93.33));
        assert_eq!(per_dive_price(dec!(560), 0), dec!(0));
    }
}
