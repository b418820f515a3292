//! Robot persistence
//!
//! Robots are kept as a JSON array. The scoring engine never touches a store;
//! the CLI and API receive one explicitly.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

use super::RobotDefinition;
use crate::error::KeibaError;

/// Default robot file name
pub const DEFAULT_ROBOT_FILE: &str = "robots.json";

/// Storage for saved robots
pub trait RobotStore: Send + Sync {
    /// All robots in save order
    fn list(&self) -> Result<Vec<RobotDefinition>, KeibaError>;

    /// Save a robot, assigning an id when it has none
    ///
    /// A robot with an existing id replaces the stored one.
    fn save(&self, robot: RobotDefinition) -> Result<RobotDefinition, KeibaError>;

    /// Remove a robot; returns false when it did not exist
    fn delete(&self, id: u64) -> Result<bool, KeibaError>;

    fn get(&self, id: u64) -> Result<Option<RobotDefinition>, KeibaError> {
        Ok(self.list()?.into_iter().find(|r| r.id == id))
    }
}

/// Insert or replace a robot in a list, returning the stored copy
fn upsert(
    robots: &mut Vec<RobotDefinition>,
    mut robot: RobotDefinition,
) -> Result<RobotDefinition, KeibaError> {
    if robot.id == 0 {
        // Creation time in milliseconds, bumped past existing ids
        let mut id = robot.created_at.timestamp_millis().max(1) as u64;
        if let Some(max) = robots.iter().map(|r| r.id).max() {
            if id <= max {
                id = max.checked_add(1).ok_or(KeibaError::RobotIdsExhausted)?;
            }
        }
        robot.id = id;
    }

    match robots.iter().position(|r| r.id == robot.id) {
        Some(pos) => robots[pos] = robot.clone(),
        None => robots.push(robot.clone()),
    }
    Ok(robot)
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryRobotStore {
    robots: Mutex<Vec<RobotDefinition>>,
}

impl MemoryRobotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RobotStore for MemoryRobotStore {
    fn list(&self) -> Result<Vec<RobotDefinition>, KeibaError> {
        let robots = self.robots.lock().unwrap_or_else(|e| e.into_inner());
        Ok(robots.clone())
    }

    fn save(&self, robot: RobotDefinition) -> Result<RobotDefinition, KeibaError> {
        let mut robots = self.robots.lock().unwrap_or_else(|e| e.into_inner());
        upsert(&mut robots, robot)
    }

    fn delete(&self, id: u64) -> Result<bool, KeibaError> {
        let mut robots = self.robots.lock().unwrap_or_else(|e| e.into_inner());
        let before = robots.len();
        robots.retain(|r| r.id != id);
        Ok(robots.len() != before)
    }
}

/// Store backed by a JSON file
///
/// A missing file reads as an empty list.
#[derive(Debug)]
pub struct JsonFileRobotStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileRobotStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<RobotDefinition>, KeibaError> {
        if !self.path.exists() {
            debug!("Robot file {:?} not found, starting empty", self.path);
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, robots: &[RobotDefinition]) -> Result<(), KeibaError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(robots)?;

        // Written beside the target, then renamed over it
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl RobotStore for JsonFileRobotStore {
    fn list(&self) -> Result<Vec<RobotDefinition>, KeibaError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.read()
    }

    fn save(&self, robot: RobotDefinition) -> Result<RobotDefinition, KeibaError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut robots = self.read()?;
        let saved = upsert(&mut robots, robot)?;
        self.write(&robots)?;
        info!("Saved robot {} ({}) to {:?}", saved.id, saved.robot_name, self.path);
        Ok(saved)
    }

    fn delete(&self, id: u64) -> Result<bool, KeibaError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut robots = self.read()?;
        let before = robots.len();
        robots.retain(|r| r.id != id);
        if robots.len() == before {
            return Ok(false);
        }
        self.write(&robots)?;
        info!("Deleted robot {} from {:?}", id, self.path);
        Ok(true)
    }
}
