//! AI robot definitions
//!
//! A robot bundles everything needed to score a race: the root index that
//! balances ability against tendency, four prioritised tendency parameters,
//! race-condition parameter groups and a learning thought pattern.

pub mod store;
pub mod wizard;

pub use store::{JsonFileRobotStore, MemoryRobotStore, RobotStore};
pub use wizard::{RobotWizard, WizardStep};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::scoring::compute_base_index;

/// Maximum robot name length in characters
pub const MAX_ROBOT_NAME_LEN: usize = 50;

/// Thought pattern the robot learns from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningThought {
    Jockey,
    Trainer,
    Predictor,
}

impl LearningThought {
    pub const ALL: [LearningThought; 3] = [
        LearningThought::Jockey,
        LearningThought::Trainer,
        LearningThought::Predictor,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            LearningThought::Jockey => "jockey",
            LearningThought::Trainer => "trainer",
            LearningThought::Predictor => "predictor",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            LearningThought::Jockey => "騎手心理思考",
            LearningThought::Trainer => "調教師心理思考",
            LearningThought::Predictor => "予想家心理思考",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            LearningThought::Jockey => "騎手の心理状態や戦略を重視した思考パターン",
            LearningThought::Trainer => "調教師の戦略や馬の状態管理を重視した思考パターン",
            LearningThought::Predictor => "プロ予想家の分析手法を模倣した思考パターン",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }
}

/// Selected tendency parameter with its priority (1 = highest)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TendencyParam {
    pub id: u32,
    pub name: String,
    pub priority: u8,
}

/// Selected sub-category inside a race parameter group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubCategory {
    pub id: u32,
    pub name: String,
    pub priority: u8,
}

/// Race-condition parameter group (jockey, trainer, track, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceParam {
    pub category: String,
    pub sub_categories: Vec<SubCategory>,
}

/// Saved robot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotDefinition {
    /// 0 until the robot has been saved
    #[serde(default)]
    pub id: u64,
    pub robot_name: String,
    /// Root index entered in step 1 (0-100)
    pub root_index: f64,
    pub tendency_params: Vec<TendencyParam>,
    pub race_params: Vec<RaceParam>,
    pub learning_thought: LearningThought,
    pub created_at: DateTime<Utc>,
}

impl RobotDefinition {
    /// Base index derived from the root index
    pub fn base_index(&self) -> f64 {
        compute_base_index(self.root_index)
    }

    /// Tendency parameter ids ordered by priority
    pub fn tendency_ids(&self) -> Vec<u32> {
        let mut params: Vec<&TendencyParam> = self.tendency_params.iter().collect();
        params.sort_by_key(|p| p.priority);
        params.iter().map(|p| p.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn robot() -> RobotDefinition {
        RobotDefinition {
            id: 1,
            robot_name: "テストロボ".to_string(),
            root_index: 60.0,
            tendency_params: vec![
                TendencyParam {
                    id: 5,
                    name: "距離適性".to_string(),
                    priority: 2,
                },
                TendencyParam {
                    id: 1,
                    name: "血統分析".to_string(),
                    priority: 1,
                },
                TendencyParam {
                    id: 3,
                    name: "騎手実績".to_string(),
                    priority: 4,
                },
                TendencyParam {
                    id: 8,
                    name: "負担重量".to_string(),
                    priority: 3,
                },
            ],
            race_params: Vec::new(),
            learning_thought: LearningThought::Trainer,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_base_index() {
        assert_eq!(robot().base_index(), 30.0);
    }

    #[test]
    fn test_tendency_ids_by_priority() {
        assert_eq!(robot().tendency_ids(), vec![1, 5, 8, 3]);
    }

    #[test]
    fn test_learning_thought_ids() {
        for thought in LearningThought::ALL {
            assert_eq!(LearningThought::from_id(thought.id()), Some(thought));
        }
        assert_eq!(LearningThought::from_id("unknown"), None);
    }

    #[test]
    fn test_robot_json_shape() {
        let json = serde_json::to_value(robot()).unwrap();
        assert_eq!(json["robotName"], "テストロボ");
        assert_eq!(json["rootIndex"], 60.0);
        assert_eq!(json["learningThought"], "trainer");
        assert!(json["tendencyParams"].is_array());
    }
}
