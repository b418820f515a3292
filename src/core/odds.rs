//! Odds validation and descriptive statistics
//!
//! Only strictly positive odds take part in the statistics; horses whose odds
//! have not been entered yet (0) are skipped.

use serde::{Deserialize, Serialize};

use super::scoring::{compute_ability_index, round2};
use crate::models::{Horse, HorseOdds};

/// Largest odds accepted on an odds sheet
pub const MAX_ODDS: f64 = 1000.0;

/// Anything carrying a current odds value
pub trait HasOdds {
    fn odds(&self) -> f64;
}

impl HasOdds for Horse {
    fn odds(&self) -> f64 {
        self.odds
    }
}

impl HasOdds for HorseOdds {
    fn odds(&self) -> f64 {
        self.odds
    }
}

impl HasOdds for f64 {
    fn odds(&self) -> f64 {
        *self
    }
}

/// Odds summary for a field of horses
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OddsStats {
    /// Number of horses with positive odds
    pub count: usize,
    pub mean: f64,
    pub variance: f64,
}

/// Check that odds are in (0, 1000]
pub fn validate_odds(odds: f64) -> bool {
    odds > 0.0 && odds <= MAX_ODDS
}

fn valid_odds<T: HasOdds>(horses: &[T]) -> Vec<f64> {
    horses
        .iter()
        .map(HasOdds::odds)
        .filter(|odds| *odds > 0.0)
        .collect()
}

/// Mean of positive odds, rounded to 2 decimals (0 when none)
pub fn compute_odds_mean<T: HasOdds>(horses: &[T]) -> f64 {
    let odds = valid_odds(horses);
    if odds.is_empty() {
        return 0.0;
    }

    round2(odds.iter().sum::<f64>() / odds.len() as f64)
}

/// Population variance of positive odds, rounded to 2 decimals (0 when none)
///
/// Deviations are taken from the rounded mean.
pub fn compute_odds_variance<T: HasOdds>(horses: &[T]) -> f64 {
    let odds = valid_odds(horses);
    if odds.is_empty() {
        return 0.0;
    }

    let mean = compute_odds_mean(horses);
    let sum_sq: f64 = odds.iter().map(|o| (o - mean).powi(2)).sum();
    round2(sum_sq / odds.len() as f64)
}

/// Count, mean and variance in one pass over the field
pub fn compute_odds_stats<T: HasOdds>(horses: &[T]) -> OddsStats {
    OddsStats {
        count: valid_odds(horses).len(),
        mean: compute_odds_mean(horses),
        variance: compute_odds_variance(horses),
    }
}

/// Fill in the ability index of every horse on an odds sheet
pub fn calculate_all_ability_indices(horses: &[HorseOdds]) -> Vec<HorseOdds> {
    horses
        .iter()
        .map(|h| HorseOdds {
            ability_index: Some(compute_ability_index(h.odds)),
            ..h.clone()
        })
        .collect()
}
