//! Core scoring logic

pub mod odds;
pub mod scoring;
pub mod selection;

// Re-export commonly used types
pub use odds::{
    calculate_all_ability_indices, compute_odds_mean, compute_odds_stats, compute_odds_variance,
    validate_odds, HasOdds, OddsStats, MAX_ODDS,
};
pub use scoring::{
    compute_ability_index, compute_base_index, compute_tendency_index, compute_total_index,
    round2, BASE_INDEX_FACTOR, MAX_SUB_INDEX, TOTAL_INDEX_DIVISOR,
};
pub use selection::{rank_weight, CategorySelection, RankedCategory, REQUIRED_CATEGORIES};
