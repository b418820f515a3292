//! Ranked category selection
//!
//! A robot weights its tendency index with exactly four categories. Rank is
//! implied by position: the first category is rank 1 (most preferred).
//!
//! Rank weights are linear:
//!     w(r) = (5 - r) / 10
//!
//! so ranks 1..4 map to 0.4, 0.3, 0.2, 0.1 and sum to 1.0.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::KeibaError;
use crate::models::Category;

/// Number of categories a complete selection carries
pub const REQUIRED_CATEGORIES: usize = 4;

/// A category together with its priority rank (1 = most preferred)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCategory {
    pub category: Category,
    pub rank: u8,
}

impl RankedCategory {
    /// Weight contributed by this category's rank
    pub fn weight(&self) -> f64 {
        rank_weight(self.rank)
    }
}

/// Linear priority weight for a rank
///
/// # Examples
/// ```
/// use keiba::core::selection::rank_weight;
/// assert_eq!(rank_weight(1), 0.4);
/// assert_eq!(rank_weight(4), 0.1);
/// assert_eq!(rank_weight(5), 0.0);
/// ```
pub fn rank_weight(rank: u8) -> f64 {
    if !(1..=REQUIRED_CATEGORIES as u8).contains(&rank) {
        return 0.0;
    }
    (5 - rank) as f64 / 10.0
}

/// Validated, ordered selection of exactly four distinct categories
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySelection {
    ranked: Vec<RankedCategory>,
}

impl CategorySelection {
    /// Build a selection from categories in priority order
    ///
    /// Fails unless exactly four categories with distinct ids are given.
    pub fn new(categories: Vec<Category>) -> Result<Self, KeibaError> {
        if categories.len() != REQUIRED_CATEGORIES {
            return Err(KeibaError::CategoryCount {
                expected: REQUIRED_CATEGORIES,
                actual: categories.len(),
            });
        }

        let mut seen = HashSet::with_capacity(REQUIRED_CATEGORIES);
        for category in &categories {
            if !seen.insert(category.id) {
                return Err(KeibaError::DuplicateCategory(category.id));
            }
        }

        let ranked = categories
            .into_iter()
            .enumerate()
            .map(|(i, category)| RankedCategory {
                category,
                rank: (i + 1) as u8,
            })
            .collect();

        Ok(Self { ranked })
    }

    /// Resolve category ids (in priority order) against a catalog
    pub fn from_ids(ids: &[u32], catalog: &[Category]) -> Result<Self, KeibaError> {
        let categories = ids
            .iter()
            .map(|id| {
                catalog
                    .iter()
                    .find(|c| c.id == *id)
                    .cloned()
                    .ok_or(KeibaError::UnknownCategory(*id))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(categories)
    }

    /// Categories with their ranks, rank 1 first
    pub fn ranked(&self) -> &[RankedCategory] {
        &self.ranked
    }

    /// Sum of rank weights (1.0 for a complete selection)
    pub fn total_weight(&self) -> f64 {
        self.ranked.iter().map(RankedCategory::weight).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: u32) -> Category {
        Category {
            id,
            name: format!("category-{}", id),
            place_rate: 0.5,
            efficiency: 0.8,
        }
    }

    #[test]
    fn test_rank_weights() {
        assert_eq!(rank_weight(1), 0.4);
        assert_eq!(rank_weight(2), 0.3);
        assert_eq!(rank_weight(3), 0.2);
        assert_eq!(rank_weight(4), 0.1);
    }

    #[test]
    fn test_rank_weight_out_of_range() {
        assert_eq!(rank_weight(0), 0.0);
        assert_eq!(rank_weight(5), 0.0);
        assert_eq!(rank_weight(u8::MAX), 0.0);
    }

    #[test]
    fn test_weights_sum_to_one() {
        let selection =
            CategorySelection::new(vec![category(1), category(2), category(3), category(4)])
                .unwrap();
        assert!((selection.total_weight() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ranks_follow_position() {
        let selection =
            CategorySelection::new(vec![category(7), category(3), category(5), category(1)])
                .unwrap();
        let ranks: Vec<(u32, u8)> = selection
            .ranked()
            .iter()
            .map(|r| (r.category.id, r.rank))
            .collect();
        assert_eq!(ranks, vec![(7, 1), (3, 2), (5, 3), (1, 4)]);
    }

    #[test]
    fn test_wrong_count_rejected() {
        let err = CategorySelection::new(vec![category(1), category(2), category(3)]).unwrap_err();
        assert!(matches!(
            err,
            KeibaError::CategoryCount {
                expected: 4,
                actual: 3
            }
        ));

        assert!(CategorySelection::new(Vec::new()).is_err());
        assert!(CategorySelection::new((1..=5).map(category).collect()).is_err());
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = CategorySelection::new(vec![category(1), category(2), category(2), category(4)])
            .unwrap_err();
        assert!(matches!(err, KeibaError::DuplicateCategory(2)));
    }

    #[test]
    fn test_from_ids() {
        let catalog: Vec<Category> = (1..=8).map(category).collect();
        let selection = CategorySelection::from_ids(&[8, 6, 4, 2], &catalog).unwrap();
        assert_eq!(selection.ranked()[0].category.id, 8);
        assert_eq!(selection.ranked()[3].rank, 4);

        let err = CategorySelection::from_ids(&[1, 2, 3, 99], &catalog).unwrap_err();
        assert!(matches!(err, KeibaError::UnknownCategory(99)));
    }
}
