//! Data loading and sample data

pub mod odds_loader;
pub mod sample;

// Re-export commonly used functions
pub use odds_loader::{
    load_horses, load_race_odds, race_odds_exists, save_race_odds, sheet_for_race,
    update_horse_odds,
};
