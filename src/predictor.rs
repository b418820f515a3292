use std::cmp::Ordering;
use tracing::debug;

use crate::core::scoring::{
    compute_ability_index, compute_base_index, compute_tendency_index, compute_total_index, round2,
};
use crate::core::selection::CategorySelection;
use crate::error::KeibaError;
use crate::models::{CalculationResult, Category, Horse};
use crate::robot::RobotDefinition;

/// Scores a field of horses with one robot's configuration
#[derive(Debug, Clone)]
pub struct IndexPredictor {
    root_index: f64,
    selection: CategorySelection,
}

impl IndexPredictor {
    /// Create a predictor from a root index (0-100) and a category selection
    pub fn new(root_index: f64, selection: CategorySelection) -> Self {
        Self {
            root_index,
            selection,
        }
    }

    /// Create a predictor from a saved robot, resolving its tendency parameters
    /// against a category catalog
    pub fn from_robot(robot: &RobotDefinition, catalog: &[Category]) -> Result<Self, KeibaError> {
        let selection = CategorySelection::from_ids(&robot.tendency_ids(), catalog)?;
        Ok(Self::new(robot.root_index, selection))
    }

    pub fn root_index(&self) -> f64 {
        self.root_index
    }

    pub fn base_index(&self) -> f64 {
        compute_base_index(self.root_index)
    }

    pub fn selection(&self) -> &CategorySelection {
        &self.selection
    }

    /// Score a single horse
    pub fn score(&self, horse: &Horse) -> CalculationResult {
        let ability_index = compute_ability_index(horse.odds);
        let tendency_index = compute_tendency_index(horse.place_rate, self.selection.ranked());
        let total_index = compute_total_index(self.root_index, ability_index, tendency_index);

        CalculationResult {
            horse_id: horse.id,
            horse_name: horse.name.clone(),
            base_index: round2(self.base_index()),
            ability_index,
            tendency_index,
            total_index,
        }
    }

    /// Score every horse, in input order
    pub fn predict(&self, horses: &[Horse]) -> Vec<CalculationResult> {
        debug!(
            "Scoring {} horses (root index {})",
            horses.len(),
            self.root_index
        );
        horses.iter().map(|h| self.score(h)).collect()
    }

    /// Score every horse, best total index first
    ///
    /// Ties keep input order.
    pub fn predict_ranked(&self, horses: &[Horse]) -> Vec<CalculationResult> {
        let mut results = self.predict(horses);
        rank_results(&mut results);
        results
    }

    /// The `n` best horses by total index
    pub fn top(&self, horses: &[Horse], n: usize) -> Vec<CalculationResult> {
        let mut results = self.predict_ranked(horses);
        results.truncate(n);
        results
    }
}

/// Sort results descending by total index (stable)
pub fn rank_results(results: &mut [CalculationResult]) {
    results.sort_by(|a, b| {
        b.total_index
            .partial_cmp(&a.total_index)
            .unwrap_or(Ordering::Equal)
    });
}
