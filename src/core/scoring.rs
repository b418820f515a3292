//! Index calculation
//!
//! Every horse receives three scores on a 0-50 scale:
//!
//! - ability index: market strength implied by the odds
//!     ability = min(50, 100 / odds)
//! - tendency index: category place rates weighted by the robot's priorities
//!     tendency = 50 * Σ(placeRate * w(rank) * efficiency) / Σ w(rank)
//! - total index: blend of the two, steered by the robot's root index x (0-100)
//!     total = (x / 200) * ability + ((200 - x) / 200) * tendency
//!
//! The robot's base index is x * 0.5.

use tracing::trace;

use super::selection::RankedCategory;

/// Upper bound of the ability and tendency indices
pub const MAX_SUB_INDEX: f64 = 50.0;
/// Multiplier turning the root index (0-100) into the base index (0-50)
pub const BASE_INDEX_FACTOR: f64 = 0.5;
/// Divisor of the total index blend
pub const TOTAL_INDEX_DIVISOR: f64 = 200.0;

/// Round half away from zero to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Ability index from odds
///
/// Non-positive or non-finite odds score 0.
///
/// # Examples
/// ```
/// use keiba::core::scoring::compute_ability_index;
/// assert_eq!(compute_ability_index(4.0), 25.0);
/// assert_eq!(compute_ability_index(1.5), 50.0);
/// assert_eq!(compute_ability_index(0.0), 0.0);
/// ```
pub fn compute_ability_index(odds: f64) -> f64 {
    if !odds.is_finite() || odds <= 0.0 {
        return 0.0;
    }

    MAX_SUB_INDEX.min(round2(100.0 / odds))
}

/// Tendency index from a ranked category selection
///
/// An empty selection scores 0. Partial selections are normalised by the
/// weights actually present.
pub fn compute_tendency_index(place_rate: f64, selected: &[RankedCategory]) -> f64 {
    if selected.is_empty() {
        return 0.0;
    }

    let mut total_score = 0.0;
    let mut total_weight = 0.0;

    for ranked in selected {
        let weight = ranked.weight();
        total_score += ranked.category.place_rate * weight * ranked.category.efficiency;
        total_weight += weight;
    }

    let average = if total_weight > 0.0 {
        total_score / total_weight
    } else {
        0.0
    };

    let index = round2((average * MAX_SUB_INDEX).clamp(0.0, MAX_SUB_INDEX));
    trace!(place_rate, total_score, total_weight, index, "tendency index");
    index
}

/// Base index from the root index entered by the user
///
/// The input is expected in 0-100 and is not clamped here.
pub fn compute_base_index(root_index: f64) -> f64 {
    root_index * BASE_INDEX_FACTOR
}

/// Total index blending ability and tendency
///
/// `root_index` is the raw 0-100 value, not the halved base index.
pub fn compute_total_index(root_index: f64, ability_index: f64, tendency_index: f64) -> f64 {
    let x = root_index;
    let total = (x / TOTAL_INDEX_DIVISOR) * ability_index
        + ((TOTAL_INDEX_DIVISOR - x) / TOTAL_INDEX_DIVISOR) * tendency_index;
    round2(total)
}
