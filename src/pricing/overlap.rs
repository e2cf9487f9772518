//! Data-quality check for price list items whose dive ranges overlap.

use std::cmp::Ordering;

use serde::Serialize;

use super::calculators::rank_candidates;
use super::models::{Applicability, PriceListItem, PricingModel};

/// Two items competing for the same dive counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeOverlap {
    pub first_item_id: i64,
    pub second_item_id: i64,
    pub overlap_from: i32,
    pub overlap_to: i32,
    pub first_priority: i32,
    pub second_priority: i32,
    /// Item the resolver would pick when both match
    pub winner_item_id: i64,
}

fn bounds(item: &PriceListItem) -> (i32, i32) {
    (item.min_dives.unwrap_or(1), item.max_dives.unwrap_or(i32::MAX))
}

/// Whether some customer on some date could be offered both items
fn can_compete(first: &PriceListItem, second: &PriceListItem) -> bool {
    let audiences_meet = first.applicable_to == Applicability::All
        || second.applicable_to == Applicability::All
        || first.applicable_to == second.applicable_to;

    let starts = first.valid_from.max(second.valid_from);
    let ends = match (first.valid_until, second.valid_until) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
    let windows_meet = match (starts, ends) {
        (Some(from), Some(until)) => from <= until,
        _ => true,
    };

    audiences_meet && windows_meet
}

/// Report every pair of active `SINGLE`/`RANGE` items of `service_type` whose
/// dive ranges intersect.
///
/// `TIERED` items are left out: the resolver only prices them when no direct
/// item matches, so they never compete with one. Pairs offered to disjoint
/// customer types or in disjoint validity windows are skipped too. With
/// `dive_count` set, only intersections containing that count are reported.
pub fn detect_overlaps(
    items: &[PriceListItem],
    service_type: &str,
    dive_count: Option<i32>,
) -> Vec<RangeOverlap> {
    let candidates: Vec<&PriceListItem> = items
        .iter()
        .filter(|item| item.is_active && item.service_type == service_type)
        .filter(|item| item.pricing_model != PricingModel::Tiered)
        .collect();

    let mut overlaps = Vec::new();

    for (i, first) in candidates.iter().enumerate() {
        for second in &candidates[i + 1..] {
            if !can_compete(first, second) {
                continue;
            }

            let (first_min, first_max) = bounds(first);
            let (second_min, second_max) = bounds(second);

            let from = first_min.max(second_min);
            let to = first_max.min(second_max);
            if from > to {
                continue;
            }
            if let Some(n) = dive_count {
                if n < from || n > to {
                    continue;
                }
            }

            let winner = match rank_candidates(first, second) {
                Ordering::Greater => second.id,
                _ => first.id,
            };

            overlaps.push(RangeOverlap {
                first_item_id: first.id,
                second_item_id: second.id,
                overlap_from: from,
                overlap_to: to,
                first_priority: first.priority,
                second_priority: second.priority,
                winner_item_id: winner,
            });
        }
    }

    overlaps
}
