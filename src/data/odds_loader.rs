//! Odds sheet JSON loading and saving

use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::core::odds::{calculate_all_ability_indices, validate_odds};
use crate::error::KeibaError;
use crate::models::{Horse, HorseOdds, Race, RaceOdds};

/// File name of a race's odds sheet
pub fn odds_file_name(race_id: u32) -> String {
    format!("race_{:04}.json", race_id)
}

/// Load a saved odds sheet
///
/// Returns None when the file is missing or unreadable.
pub fn load_race_odds<P: AsRef<Path>>(odds_dir: P, race_id: u32) -> Option<RaceOdds> {
    let path = odds_dir.as_ref().join(odds_file_name(race_id));

    let content = fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&content) {
        Ok(sheet) => Some(sheet),
        Err(e) => {
            warn!("Ignoring unreadable odds file {:?}: {}", path, e);
            None
        }
    }
}

/// Check if an odds sheet exists for a race
pub fn race_odds_exists<P: AsRef<Path>>(odds_dir: P, race_id: u32) -> bool {
    odds_dir.as_ref().join(odds_file_name(race_id)).exists()
}

/// Save an odds sheet
///
/// Horses without odds (0) are dropped; any remaining odds outside (0, 1000]
/// reject the whole sheet. Ability indices are recalculated and timestamps set.
pub fn save_race_odds<P: AsRef<Path>>(
    odds_dir: P,
    sheet: &RaceOdds,
) -> Result<PathBuf, KeibaError> {
    let entered: Vec<HorseOdds> = sheet
        .horses
        .iter()
        .filter(|h| h.odds != 0.0)
        .cloned()
        .collect();

    if let Some(invalid) = entered.iter().find(|h| !validate_odds(h.odds)) {
        return Err(KeibaError::InvalidOdds {
            horse_id: invalid.horse_id,
            odds: invalid.odds,
        });
    }

    let now = Utc::now().to_rfc3339();
    let saved = RaceOdds {
        race_id: sheet.race_id,
        race_name: sheet.race_name.clone(),
        horses: calculate_all_ability_indices(&entered),
        created_at: sheet.created_at.clone().or_else(|| Some(now.clone())),
        updated_at: Some(now),
    };

    let odds_dir = odds_dir.as_ref();
    fs::create_dir_all(odds_dir)?;
    let path = odds_dir.join(odds_file_name(sheet.race_id));
    fs::write(&path, serde_json::to_string_pretty(&saved)?)?;

    info!(
        "Saved odds for race {} ({} horses) to {:?}",
        saved.race_id,
        saved.horses.len(),
        path
    );
    Ok(path)
}

/// Odds sheet for editing: the field with blank odds, overlaid with saved odds
pub fn sheet_for_race<P: AsRef<Path>>(odds_dir: P, race: &Race, field: &[Horse]) -> RaceOdds {
    let saved = load_race_odds(odds_dir, race.id);

    let horses = field
        .iter()
        .enumerate()
        .map(|(i, horse)| {
            let saved_horse = saved
                .as_ref()
                .and_then(|s| s.horses.iter().find(|h| h.horse_id == horse.id));
            HorseOdds {
                horse_id: horse.id,
                horse_number: i as u32 + 1,
                horse_name: horse.name.clone(),
                odds: saved_horse.map(|h| h.odds).unwrap_or(0.0),
                ability_index: saved_horse.and_then(|h| h.ability_index),
            }
        })
        .collect();

    RaceOdds {
        race_id: race.id,
        race_name: race.name.clone(),
        horses,
        created_at: saved.as_ref().and_then(|s| s.created_at.clone()),
        updated_at: saved.and_then(|s| s.updated_at),
    }
}

/// Set one horse's odds and refresh ability indices
///
/// Returns false when the horse is not on the sheet.
pub fn update_horse_odds(sheet: &mut RaceOdds, horse_id: u32, odds: f64) -> bool {
    let Some(horse) = sheet.horses.iter_mut().find(|h| h.horse_id == horse_id) else {
        return false;
    };
    horse.odds = odds;
    sheet.horses = calculate_all_ability_indices(&sheet.horses);
    true
}

/// Load a field of horses from a JSON array
pub fn load_horses<P: AsRef<Path>>(path: P) -> Result<Vec<Horse>, KeibaError> {
    let content = fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&content)?)
}
