use serde::{Deserialize, Serialize};

use crate::core::odds::OddsStats;

/// Horse entered in a race
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Horse {
    pub id: u32,
    pub name: String,
    pub odds: f64,
    pub place_rate: f64, // 複勝率
}

/// Scoring category (tendency parameter)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: u32,
    pub name: String,
    pub place_rate: f64, // 複勝率
    pub efficiency: f64, // 複勝効率
}

/// Race in the race list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Race {
    pub id: u32,
    pub name: String,
    pub date: String,
}

/// Per-horse scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub horse_id: u32,
    pub horse_name: String,
    pub base_index: f64,     // 根幹指数
    pub ability_index: f64,  // 能力指数
    pub tendency_index: f64, // 傾向指数
    pub total_index: f64,    // 競走馬能力総合指数
}

/// Odds entered for one horse on an odds sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorseOdds {
    pub horse_id: u32,
    pub horse_number: u32,
    pub horse_name: String,
    pub odds: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability_index: Option<f64>,
}

/// Odds sheet for a race
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceOdds {
    pub race_id: u32,
    pub race_name: String,
    pub horses: Vec<HorseOdds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Score request
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    pub horses: Vec<Horse>,
    /// Root index entered in the wizard (0-100)
    #[serde(default)]
    pub root_index: Option<f64>,
    /// Category ids in priority order
    #[serde(default)]
    pub category_ids: Option<Vec<u32>>,
    /// Score with a saved robot instead of explicit parameters
    #[serde(default)]
    pub robot_id: Option<u64>,
}

/// Score response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    pub root_index: f64,
    pub base_index: f64,
    pub results: Vec<CalculationResult>,
    pub odds_stats: OddsStats,
}

/// Odds statistics request
#[derive(Debug, Serialize, Deserialize)]
pub struct OddsStatsRequest {
    pub horses: Vec<HorseOdds>,
}

/// Odds statistics response
#[derive(Debug, Serialize, Deserialize)]
pub struct OddsStatsResponse {
    pub stats: OddsStats,
    pub horses: Vec<HorseOdds>,
    /// Horse ids whose odds are outside (0, 1000]
    pub invalid: Vec<u32>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub robots: usize,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
