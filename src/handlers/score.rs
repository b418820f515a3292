use actix_web::{web, HttpResponse};
use std::sync::Arc;
use tracing::debug;

use crate::AppState;
use keiba::core::{compute_odds_stats, CategorySelection};
use keiba::error::{
    validate_horse_count, validate_horse_odds, validate_place_rate, validate_root_index, AppError,
};
use keiba::models::{ScoreRequest, ScoreResponse};
use keiba::robot::wizard::DEFAULT_ROOT_INDEX;
use keiba::{IndexPredictor, KeibaError};

/// Score a race with a saved robot or explicit parameters
pub async fn score_race(
    state: web::Data<Arc<AppState>>,
    req: web::Json<ScoreRequest>,
) -> Result<HttpResponse, AppError> {
    validate_horse_count(req.horses.len())?;
    for horse in &req.horses {
        validate_horse_odds(horse.id, horse.odds)?;
        validate_place_rate(horse.place_rate)?;
    }

    let predictor = build_predictor(&state, &req)?;
    debug!(
        "Scoring {} horses with root index {}",
        req.horses.len(),
        predictor.root_index()
    );

    let response = ScoreResponse {
        root_index: predictor.root_index(),
        base_index: predictor.base_index(),
        results: predictor.predict_ranked(&req.horses),
        odds_stats: compute_odds_stats(&req.horses),
    };

    Ok(HttpResponse::Ok().json(response))
}

fn build_predictor(state: &AppState, req: &ScoreRequest) -> Result<IndexPredictor, AppError> {
    if let Some(robot_id) = req.robot_id {
        let robot = state
            .store
            .get(robot_id)?
            .ok_or(KeibaError::RobotNotFound(robot_id))?;
        return Ok(IndexPredictor::from_robot(&robot, &state.categories)?);
    }

    let root_index = req.root_index.unwrap_or(DEFAULT_ROOT_INDEX);
    validate_root_index(root_index)?;

    let ids = req.category_ids.as_deref().ok_or_else(|| {
        AppError::ValidationError("Either robotId or categoryIds is required".to_string())
    })?;
    let selection = CategorySelection::from_ids(ids, &state.categories)?;

    Ok(IndexPredictor::new(root_index, selection))
}
