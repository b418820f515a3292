//! Keiba AI - Horse racing index engine
//!
//! This library provides:
//! - Ability, tendency and total index calculation per horse
//! - Odds validation and statistics (mean, variance)
//! - AI robot configuration wizard and robot storage
//! - Odds sheet loading and sample data
//!
//! # Example
//!
//! ```
//! use keiba::core::CategorySelection;
//! use keiba::data::sample;
//! use keiba::predictor::IndexPredictor;
//!
//! let selection = CategorySelection::from_ids(&[1, 3, 5, 7], &sample::categories()).unwrap();
//! let predictor = IndexPredictor::new(60.0, selection);
//!
//! let results = predictor.predict_ranked(&sample::horses());
//! println!("Top pick: {} ({})", results[0].horse_name, results[0].total_index);
//! ```

pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod models;
pub mod predictor;
pub mod robot;

// Re-export commonly used types
pub use error::KeibaError;
pub use models::{CalculationResult, Category, Horse, HorseOdds, Race, RaceOdds};
pub use predictor::IndexPredictor;
pub use robot::{RobotDefinition, RobotStore, RobotWizard};
