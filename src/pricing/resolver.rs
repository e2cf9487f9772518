//! Best-offer selection over price list items.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::calculators::{calculate_tiered_price, per_dive_price, rank_candidates, round_money};
use super::models::{Applicability, PriceListItem, PriceListItemTier, PricingModel};

/// What the caller is asking a price for
#[derive(Debug, Clone)]
pub struct PriceQuery {
    pub dive_count: i32,
    pub service_type: String,
    pub customer_type: Option<Applicability>,
    pub date: NaiveDate,
}

/// The winning item with the price it produces for the query
#[derive(Debug, Clone)]
pub struct ResolvedPrice {
    pub item: PriceListItem,
    pub pricing_model: PricingModel,
    pub dive_count: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

/// Filters shared by every pricing model: service type, active flag,
/// validity window and customer applicability.
fn is_eligible(item: &PriceListItem, query: &PriceQuery) -> bool {
    item.service_type == query.service_type
        && item.is_active
        && item.is_valid_on(query.date)
        && item.applicable_to.matches(query.customer_type)
}

/// Pick the best offer for the query.
///
/// `SINGLE` and `RANGE` items whose dive range covers the count are ranked with
/// [`rank_candidates`] and the top one wins. Only when none match are `TIERED`
/// items considered; each is priced over its tiers and the cheapest wins.
/// Tiered items that produce no price are ignored.
pub fn resolve_dive_price(
    items: &[PriceListItem],
    tiers: &HashMap<i64, Vec<PriceListItemTier>>,
    query: &PriceQuery,
) -> Option<ResolvedPrice> {
    if query.dive_count <= 0 {
        return None;
    }

    let best_direct = items
        .iter()
        .filter(|item| item.pricing_model != PricingModel::Tiered)
        .filter(|item| is_eligible(item, query))
        .filter(|item| item.covers_dive_count(query.dive_count))
        .min_by(|a, b| rank_candidates(a, b));

    if let Some(item) = best_direct {
        let unit_price = item.unit_price();
        return Some(ResolvedPrice {
            item: item.clone(),
            pricing_model: item.pricing_model,
            dive_count: query.dive_count,
            unit_price,
            total_price: round_money(unit_price * Decimal::from(query.dive_count), 2),
        });
    }

    items
        .iter()
        .filter(|item| item.pricing_model == PricingModel::Tiered)
        .filter(|item| is_eligible(item, query))
        .filter_map(|item| {
            let item_tiers = tiers.get(&item.id)?;
            let total = calculate_tiered_price(query.dive_count, item_tiers)?;
            Some((item, total))
        })
        .min_by(|(a, a_total), (b, b_total)| {
            a_total.cmp(b_total).then_with(|| rank_candidates(a, b))
        })
        .map(|(item, total)| ResolvedPrice {
            item: item.clone(),
            pricing_model: PricingModel::Tiered,
            dive_count: query.dive_count,
            unit_price: per_dive_price(total, query.dive_count),
            total_price: total,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::calculators::tests::{item, tier};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn query(dive_count: i32) -> PriceQuery {
        PriceQuery {
            dive_count,
            service_type: "Dive Trip".to_string(),
            customer_type: None,
            date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        }
    }

    fn tiered(id: i64) -> PriceListItem {
        let mut it = item(id, None, None);
        it.pricing_model = PricingModel::Tiered;
        it
    }

    #[test]
    fn test_no_items_resolves_to_none() {
        assert!(resolve_dive_price(&[], &HashMap::new(), &query(3)).is_none());
    }

    #[test]
    fn test_range_match_prices_per_dive() {
        let mut it = item(1, Some(1), Some(5));
        it.price = Some(dec!(120));
        let resolved = resolve_dive_price(&[it], &HashMap::new(), &query(3)).unwrap();
        assert_eq!(resolved.item.id, 1);
        assert_eq!(resolved.unit_price, dec!(120));
        assert_eq!(resolved.total_price, dec!(360));
    }

    #[test]
    fn test_never_returns_inactive_item() {
        let mut inactive = item(1, Some(1), Some(5));
        inactive.is_active = false;
        inactive.priority = 100;
        let active = item(2, Some(1), Some(5));
        let resolved =
            resolve_dive_price(&[inactive.clone(), active], &HashMap::new(), &query(3)).unwrap();
        assert_eq!(resolved.item.id, 2);

        assert!(resolve_dive_price(&[inactive], &HashMap::new(), &query(3)).is_none());
    }

    #[test]
    fn test_never_returns_date_invalid_item() {
        let mut expired = item(1, Some(1), Some(5));
        expired.valid_until = NaiveDate::from_ymd_opt(2024, 6, 30);
        let mut future = item(2, Some(1), Some(5));
        future.valid_from = NaiveDate::from_ymd_opt(2024, 7, 2);
        assert!(resolve_dive_price(&[expired, future], &HashMap::new(), &query(3)).is_none());
    }

    #[test]
    fn test_validity_bounds_are_inclusive() {
        let mut it = item(1, Some(1), Some(5));
        it.valid_from = NaiveDate::from_ymd_opt(2024, 7, 1);
        it.valid_until = NaiveDate::from_ymd_opt(2024, 7, 1);
        assert!(resolve_dive_price(&[it], &HashMap::new(), &query(3)).is_some());
    }

    #[test]
    fn test_dive_count_outside_range_is_skipped() {
        let it = item(1, Some(5), Some(10));
        assert!(resolve_dive_price(&[it], &HashMap::new(), &query(3)).is_none());
    }

    #[test]
    fn test_other_service_type_is_skipped() {
        let mut it = item(1, Some(1), Some(5));
        it.service_type = "Course".to_string();
        assert!(resolve_dive_price(&[it], &HashMap::new(), &query(3)).is_none());
    }

    #[test]
    fn test_customer_type_filter() {
        let mut member = item(1, Some(1), Some(5));
        member.applicable_to = Applicability::Member;
        member.base_price = dec!(80);
        let everyone = item(2, Some(1), Some(5));

        let mut q = query(3);
        q.customer_type = Some(Applicability::NonMember);
        let resolved =
            resolve_dive_price(&[member.clone(), everyone.clone()], &HashMap::new(), &q).unwrap();
        assert_eq!(resolved.item.id, 2);

        q.customer_type = Some(Applicability::Member);
        let resolved = resolve_dive_price(&[member, everyone], &HashMap::new(), &q).unwrap();
        assert_eq!(resolved.item.id, 1);
    }

    #[test]
    fn test_narrower_range_wins_tie() {
        let wide = item(1, Some(1), Some(10));
        let narrow = item(2, Some(2), Some(4));
        let resolved = resolve_dive_price(&[wide, narrow], &HashMap::new(), &query(3)).unwrap();
        assert_eq!(resolved.item.id, 2);
    }

    #[test]
    fn test_tie_break_is_deterministic_most_recent_wins() {
        let older = item(1, Some(1), Some(5));
        let mut newer = item(2, Some(1), Some(5));
        newer.created_at = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

        for items in [
            vec![older.clone(), newer.clone()],
            vec![newer.clone(), older.clone()],
        ] {
            let resolved = resolve_dive_price(&items, &HashMap::new(), &query(3)).unwrap();
            assert_eq!(resolved.item.id, 2);
        }
    }

    #[test]
    fn test_tiered_used_only_without_direct_match() {
        let direct = item(1, Some(1), Some(5));
        let tiered_item = tiered(2);
        let mut tiers = HashMap::new();
        tiers.insert(2, vec![tier(1, None, None, Some(dec!(10)))]);

        let resolved =
            resolve_dive_price(&[direct, tiered_item.clone()], &tiers, &query(3)).unwrap();
        assert_eq!(resolved.item.id, 1);

        let resolved = resolve_dive_price(&[tiered_item], &tiers, &query(3)).unwrap();
        assert_eq!(resolved.pricing_model, PricingModel::Tiered);
        assert_eq!(resolved.total_price, dec!(30));
        assert_eq!(resolved.unit_price, dec!(10));
    }

    #[test]
    fn test_cheapest_tiered_item_wins() {
        let mut tiers = HashMap::new();
        tiers.insert(1, vec![tier(1, None, None, Some(dec!(90)))]);
        tiers.insert(2, vec![tier(1, Some(5), Some(dec!(400)), Some(dec!(85)))]);

        let resolved = resolve_dive_price(&[tiered(1), tiered(2)], &tiers, &query(5)).unwrap();
        assert_eq!(resolved.item.id, 2);
        assert_eq!(resolved.total_price, dec!(400));
    }

    #[test]
    fn test_tiered_without_applicable_tiers_is_excluded() {
        let mut tiers = HashMap::new();
        tiers.insert(1, vec![tier(10, None, None, Some(dec!(50)))]);
        tiers.insert(2, vec![tier(1, None, None, Some(dec!(95)))]);

        let resolved = resolve_dive_price(&[tiered(1), tiered(2)], &tiers, &query(3)).unwrap();
        assert_eq!(resolved.item.id, 2);

        assert!(resolve_dive_price(&[tiered(1)], &tiers, &query(3)).is_none());
    }
}
