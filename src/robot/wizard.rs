//! Robot creation wizard
//!
//! Five linear steps:
//! 1. Root index (0-100)
//! 2. Tendency parameters (exactly 4, prioritised)
//! 3. Race parameter groups (exactly 3, up to 4 sub-categories each)
//! 4. Learning thought
//! 5. Name and save

use chrono::{DateTime, Utc};
use tracing::debug;

use super::{
    LearningThought, RaceParam, RobotDefinition, SubCategory, TendencyParam, MAX_ROBOT_NAME_LEN,
};
use crate::core::selection::REQUIRED_CATEGORIES;
use crate::data::sample::{self, RaceCategoryOption, TendencyOption};
use crate::error::KeibaError;

/// Race parameter groups a robot must pick
pub const REQUIRED_RACE_GROUPS: usize = 3;
/// Sub-categories allowed per race parameter group
pub const MAX_SUB_CATEGORIES: usize = 4;
/// Root index the wizard starts with
pub const DEFAULT_ROOT_INDEX: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    RootIndex = 1,
    TendencyParams = 2,
    RaceParams = 3,
    LearningThought = 4,
    Save = 5,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::RootIndex => "根幹指数入力",
            WizardStep::TendencyParams => "傾向パラメータ選択",
            WizardStep::RaceParams => "レース傾向パラメータ選択",
            WizardStep::LearningThought => "学習的思考の選択",
            WizardStep::Save => "ロボット保存",
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            WizardStep::RootIndex => Some(WizardStep::TendencyParams),
            WizardStep::TendencyParams => Some(WizardStep::RaceParams),
            WizardStep::RaceParams => Some(WizardStep::LearningThought),
            WizardStep::LearningThought => Some(WizardStep::Save),
            WizardStep::Save => None,
        }
    }

    fn prev(self) -> Option<Self> {
        match self {
            WizardStep::RootIndex => None,
            WizardStep::TendencyParams => Some(WizardStep::RootIndex),
            WizardStep::RaceParams => Some(WizardStep::TendencyParams),
            WizardStep::LearningThought => Some(WizardStep::RaceParams),
            WizardStep::Save => Some(WizardStep::LearningThought),
        }
    }
}

/// Wizard state accumulated across steps
#[derive(Debug, Clone)]
pub struct RobotWizard {
    step: WizardStep,
    root_index: f64,
    tendency_params: Vec<TendencyParam>,
    race_params: Vec<RaceParam>,
    learning_thought: Option<LearningThought>,
    robot_name: String,
    tendency_catalog: Vec<TendencyOption>,
    race_catalog: Vec<RaceCategoryOption>,
}

impl Default for RobotWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl RobotWizard {
    /// Start a wizard with the built-in parameter catalogs
    pub fn new() -> Self {
        Self::with_catalogs(sample::tendency_options(), sample::race_category_options())
    }

    pub fn with_catalogs(
        tendency_catalog: Vec<TendencyOption>,
        race_catalog: Vec<RaceCategoryOption>,
    ) -> Self {
        Self {
            step: WizardStep::RootIndex,
            root_index: DEFAULT_ROOT_INDEX,
            tendency_params: Vec::new(),
            race_params: Vec::new(),
            learning_thought: None,
            robot_name: String::new(),
            tendency_catalog,
            race_catalog,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn root_index(&self) -> f64 {
        self.root_index
    }

    pub fn tendency_params(&self) -> &[TendencyParam] {
        &self.tendency_params
    }

    pub fn race_params(&self) -> &[RaceParam] {
        &self.race_params
    }

    pub fn learning_thought(&self) -> Option<LearningThought> {
        self.learning_thought
    }

    pub fn robot_name(&self) -> &str {
        &self.robot_name
    }

    pub fn tendency_catalog(&self) -> &[TendencyOption] {
        &self.tendency_catalog
    }

    pub fn race_catalog(&self) -> &[RaceCategoryOption] {
        &self.race_catalog
    }

    // Step 1

    pub fn set_root_index(&mut self, root_index: f64) {
        self.root_index = root_index;
    }

    // Step 2

    /// Select or deselect a tendency parameter
    ///
    /// Returns false when the id is unknown or four are already selected.
    /// Priorities are renumbered 1..n in selection order.
    pub fn toggle_tendency(&mut self, id: u32) -> bool {
        if let Some(pos) = self.tendency_params.iter().position(|p| p.id == id) {
            self.tendency_params.remove(pos);
            renumber_tendency(&mut self.tendency_params);
            return true;
        }

        if self.tendency_params.len() >= REQUIRED_CATEGORIES {
            return false;
        }

        let Some(option) = self.tendency_catalog.iter().find(|o| o.id == id) else {
            return false;
        };

        self.tendency_params.push(TendencyParam {
            id,
            name: option.name.to_string(),
            priority: 0,
        });
        renumber_tendency(&mut self.tendency_params);
        true
    }

    /// Move a selected tendency parameter to a new priority
    pub fn set_tendency_priority(&mut self, id: u32, priority: u8) -> bool {
        let Some(pos) = self.tendency_params.iter().position(|p| p.id == id) else {
            return false;
        };
        if priority == 0 || priority as usize > self.tendency_params.len() {
            return false;
        }

        let param = self.tendency_params.remove(pos);
        self.tendency_params.insert(priority as usize - 1, param);
        renumber_tendency(&mut self.tendency_params);
        true
    }

    // Step 3

    /// Select or deselect a race parameter group
    ///
    /// A newly selected group starts with its first four sub-categories.
    pub fn toggle_race_category(&mut self, category: &str) -> bool {
        if let Some(pos) = self.race_params.iter().position(|p| p.category == category) {
            self.race_params.remove(pos);
            return true;
        }

        if self.race_params.len() >= REQUIRED_RACE_GROUPS {
            return false;
        }

        let Some(option) = self.race_catalog.iter().find(|o| o.category == category) else {
            return false;
        };

        let sub_categories = option
            .sub_categories
            .iter()
            .take(MAX_SUB_CATEGORIES)
            .enumerate()
            .map(|(i, sub)| SubCategory {
                id: sub.id,
                name: sub.name.to_string(),
                priority: (i + 1) as u8,
            })
            .collect();

        self.race_params.push(RaceParam {
            category: category.to_string(),
            sub_categories,
        });
        true
    }

    /// Select or deselect a sub-category inside a selected group
    pub fn toggle_sub_category(&mut self, category: &str, sub_id: u32) -> bool {
        let Some(param) = self.race_params.iter_mut().find(|p| p.category == category) else {
            return false;
        };

        if let Some(pos) = param.sub_categories.iter().position(|s| s.id == sub_id) {
            param.sub_categories.remove(pos);
            renumber_sub_categories(&mut param.sub_categories);
            return true;
        }

        if param.sub_categories.len() >= MAX_SUB_CATEGORIES {
            return false;
        }

        let sub = self
            .race_catalog
            .iter()
            .find(|o| o.category == category)
            .and_then(|o| o.sub_categories.iter().find(|s| s.id == sub_id));

        match sub {
            Some(sub) => {
                param.sub_categories.push(SubCategory {
                    id: sub.id,
                    name: sub.name.to_string(),
                    priority: (param.sub_categories.len() + 1) as u8,
                });
                true
            }
            None => false,
        }
    }

    /// Move a selected sub-category to a new priority within its group
    pub fn set_sub_category_priority(&mut self, category: &str, sub_id: u32, priority: u8) -> bool {
        let Some(param) = self.race_params.iter_mut().find(|p| p.category == category) else {
            return false;
        };
        let Some(pos) = param.sub_categories.iter().position(|s| s.id == sub_id) else {
            return false;
        };
        if priority == 0 || priority as usize > param.sub_categories.len() {
            return false;
        }

        let sub = param.sub_categories.remove(pos);
        param.sub_categories.insert(priority as usize - 1, sub);
        renumber_sub_categories(&mut param.sub_categories);
        true
    }

    // Step 4

    pub fn set_learning_thought(&mut self, thought: LearningThought) {
        self.learning_thought = Some(thought);
    }

    // Step 5

    /// Set the robot name, truncated to 50 characters
    pub fn set_robot_name(&mut self, name: &str) {
        self.robot_name = name.chars().take(MAX_ROBOT_NAME_LEN).collect();
    }

    /// Check a step's requirements
    pub fn validate_step(&self, step: WizardStep) -> Result<(), KeibaError> {
        let incomplete = |reason: String| KeibaError::IncompleteStep {
            step: step.number(),
            reason,
        };

        match step {
            WizardStep::RootIndex => {
                if !(0.0..=100.0).contains(&self.root_index) {
                    return Err(incomplete(format!(
                        "root index must be between 0 and 100, got {}",
                        self.root_index
                    )));
                }
            }
            WizardStep::TendencyParams => {
                if self.tendency_params.len() != REQUIRED_CATEGORIES {
                    return Err(incomplete(format!(
                        "select {} tendency parameters, got {}",
                        REQUIRED_CATEGORIES,
                        self.tendency_params.len()
                    )));
                }
            }
            WizardStep::RaceParams => {
                if self.race_params.len() != REQUIRED_RACE_GROUPS {
                    return Err(incomplete(format!(
                        "select {} race parameter groups, got {}",
                        REQUIRED_RACE_GROUPS,
                        self.race_params.len()
                    )));
                }
            }
            WizardStep::LearningThought => {
                if self.learning_thought.is_none() {
                    return Err(incomplete("select a learning thought".to_string()));
                }
            }
            WizardStep::Save => {
                if self.robot_name.trim().is_empty() {
                    return Err(incomplete("robot name is required".to_string()));
                }
            }
        }

        Ok(())
    }

    /// Whether the current step is complete
    pub fn can_proceed(&self) -> bool {
        self.validate_step(self.step).is_ok()
    }

    /// Advance to the next step
    pub fn next(&mut self) -> Result<WizardStep, KeibaError> {
        self.validate_step(self.step)?;
        if let Some(next) = self.step.next() {
            debug!("wizard step {} -> {}", self.step.number(), next.number());
            self.step = next;
        }
        Ok(self.step)
    }

    /// Go back one step (stays on step 1)
    pub fn back(&mut self) -> WizardStep {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
        self.step
    }

    /// Validate every step and build the robot
    pub fn finish(&self, now: DateTime<Utc>) -> Result<RobotDefinition, KeibaError> {
        for step in [
            WizardStep::RootIndex,
            WizardStep::TendencyParams,
            WizardStep::RaceParams,
            WizardStep::LearningThought,
            WizardStep::Save,
        ] {
            self.validate_step(step)?;
        }

        let learning_thought = self.learning_thought.ok_or(KeibaError::IncompleteStep {
            step: WizardStep::LearningThought.number(),
            reason: "select a learning thought".to_string(),
        })?;

        Ok(RobotDefinition {
            id: 0,
            robot_name: self.robot_name.trim().to_string(),
            root_index: self.root_index,
            tendency_params: self.tendency_params.clone(),
            race_params: self.race_params.clone(),
            learning_thought,
            created_at: now,
        })
    }
}

fn renumber_tendency(params: &mut [TendencyParam]) {
    for (i, param) in params.iter_mut().enumerate() {
        param.priority = (i + 1) as u8;
    }
}

fn renumber_sub_categories(subs: &mut [SubCategory]) {
    for (i, sub) in subs.iter_mut().enumerate() {
        sub.priority = (i + 1) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed_wizard() -> RobotWizard {
        let mut wizard = RobotWizard::new();
        wizard.set_root_index(70.0);
        wizard.next().unwrap();
        for id in [3, 1, 5, 8] {
            assert!(wizard.toggle_tendency(id));
        }
        wizard.next().unwrap();
        for category in ["騎手", "馬場", "天候"] {
            assert!(wizard.toggle_race_category(category));
        }
        wizard.next().unwrap();
        wizard.set_learning_thought(LearningThought::Predictor);
        wizard.next().unwrap();
        wizard.set_robot_name("  マイAI予想ロボット  ");
        wizard
    }

    #[test]
    fn test_starts_at_root_index() {
        let wizard = RobotWizard::new();
        assert_eq!(wizard.step(), WizardStep::RootIndex);
        assert_eq!(wizard.root_index(), DEFAULT_ROOT_INDEX);
        assert!(wizard.can_proceed());
    }

    #[test]
    fn test_root_index_out_of_range_blocks() {
        let mut wizard = RobotWizard::new();
        wizard.set_root_index(120.0);
        assert!(!wizard.can_proceed());
        assert!(wizard.next().is_err());
        assert_eq!(wizard.step(), WizardStep::RootIndex);
    }

    #[test]
    fn test_tendency_requires_exactly_four() {
        let mut wizard = RobotWizard::new();
        wizard.next().unwrap();
        for id in [1, 2, 3] {
            wizard.toggle_tendency(id);
        }
        let err = wizard.next().unwrap_err();
        assert!(matches!(err, KeibaError::IncompleteStep { step: 2, .. }));

        assert!(wizard.toggle_tendency(4));
        assert!(!wizard.toggle_tendency(5));
        assert_eq!(wizard.next().unwrap(), WizardStep::RaceParams);
    }

    #[test]
    fn test_toggle_tendency_renumbers() {
        let mut wizard = RobotWizard::new();
        for id in [6, 2, 7] {
            wizard.toggle_tendency(id);
        }
        assert!(wizard.toggle_tendency(2));
        let params: Vec<(u32, u8)> = wizard
            .tendency_params()
            .iter()
            .map(|p| (p.id, p.priority))
            .collect();
        assert_eq!(params, vec![(6, 1), (7, 2)]);
    }

    #[test]
    fn test_unknown_tendency_rejected() {
        let mut wizard = RobotWizard::new();
        assert!(!wizard.toggle_tendency(99));
        assert!(wizard.tendency_params().is_empty());
    }

    #[test]
    fn test_set_tendency_priority_moves_param() {
        let mut wizard = RobotWizard::new();
        for id in [1, 2, 3, 4] {
            wizard.toggle_tendency(id);
        }

        assert!(wizard.set_tendency_priority(1, 3));
        let order: Vec<u32> = wizard.tendency_params().iter().map(|p| p.id).collect();
        assert_eq!(order, vec![2, 3, 1, 4]);

        assert!(wizard.set_tendency_priority(4, 1));
        let params: Vec<(u32, u8)> = wizard
            .tendency_params()
            .iter()
            .map(|p| (p.id, p.priority))
            .collect();
        assert_eq!(params, vec![(4, 1), (2, 2), (3, 3), (1, 4)]);

        assert!(!wizard.set_tendency_priority(4, 5));
        assert!(!wizard.set_tendency_priority(9, 1));
    }

    #[test]
    fn test_race_category_seeded_with_four_subs() {
        let mut wizard = RobotWizard::new();
        assert!(wizard.toggle_race_category("調教師"));
        let param = &wizard.race_params()[0];
        let ids: Vec<u32> = param.sub_categories.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![7, 8, 9, 10]);
    }

    #[test]
    fn test_race_category_limit() {
        let mut wizard = RobotWizard::new();
        for category in ["騎手", "調教師", "馬場"] {
            assert!(wizard.toggle_race_category(category));
        }
        assert!(!wizard.toggle_race_category("距離"));
        assert!(!wizard.toggle_race_category("存在しない"));

        assert!(wizard.toggle_race_category("調教師"));
        assert!(wizard.toggle_race_category("距離"));
        assert_eq!(wizard.race_params().len(), 3);
    }

    #[test]
    fn test_toggle_sub_category() {
        let mut wizard = RobotWizard::new();
        wizard.toggle_race_category("騎手");

        // Full group: adding a fifth fails
        assert!(!wizard.toggle_sub_category("騎手", 5));

        assert!(wizard.toggle_sub_category("騎手", 2));
        assert!(wizard.toggle_sub_category("騎手", 6));
        let subs: Vec<(u32, u8)> = wizard.race_params()[0]
            .sub_categories
            .iter()
            .map(|s| (s.id, s.priority))
            .collect();
        assert_eq!(subs, vec![(1, 1), (3, 2), (4, 3), (6, 4)]);

        // Sub-category of another group
        assert!(wizard.toggle_sub_category("騎手", 1));
        assert!(!wizard.toggle_sub_category("騎手", 13));
        // Group not selected
        assert!(!wizard.toggle_sub_category("天候", 25));
    }

    #[test]
    fn test_set_sub_category_priority() {
        let mut wizard = RobotWizard::new();
        wizard.toggle_race_category("距離");
        assert!(wizard.set_sub_category_priority("距離", 22, 1));
        let ids: Vec<u32> = wizard.race_params()[0]
            .sub_categories
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![22, 19, 20, 21]);
    }

    #[test]
    fn test_robot_name_truncated() {
        let mut wizard = RobotWizard::new();
        wizard.set_robot_name(&"あ".repeat(80));
        assert_eq!(wizard.robot_name().chars().count(), MAX_ROBOT_NAME_LEN);
    }

    #[test]
    fn test_back_and_forward() {
        let mut wizard = RobotWizard::new();
        assert_eq!(wizard.back(), WizardStep::RootIndex);
        wizard.next().unwrap();
        assert_eq!(wizard.back(), WizardStep::RootIndex);
    }

    #[test]
    fn test_finish_builds_robot() {
        let wizard = completed_wizard();
        assert_eq!(wizard.step(), WizardStep::Save);
        assert!(wizard.can_proceed());

        let now = Utc::now();
        let robot = wizard.finish(now).unwrap();
        assert_eq!(robot.robot_name, "マイAI予想ロボット");
        assert_eq!(robot.root_index, 70.0);
        assert_eq!(robot.tendency_ids(), vec![3, 1, 5, 8]);
        assert_eq!(robot.race_params.len(), 3);
        assert_eq!(robot.learning_thought, LearningThought::Predictor);
        assert_eq!(robot.created_at, now);
        assert_eq!(robot.id, 0);
    }

    #[test]
    fn test_finish_requires_name() {
        let mut wizard = completed_wizard();
        wizard.set_robot_name("   ");
        let err = wizard.finish(Utc::now()).unwrap_err();
        assert!(matches!(err, KeibaError::IncompleteStep { step: 5, .. }));
    }
}
