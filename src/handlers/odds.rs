use actix_web::{web, HttpResponse};

use keiba::core::{calculate_all_ability_indices, compute_odds_stats, validate_odds};
use keiba::error::{validate_horse_count, AppError};
use keiba::models::{OddsStatsRequest, OddsStatsResponse};

/// Odds statistics and ability indices for an odds sheet
pub async fn odds_stats(req: web::Json<OddsStatsRequest>) -> Result<HttpResponse, AppError> {
    validate_horse_count(req.horses.len())?;

    // Unentered odds (0) are not an error
    let invalid = req
        .horses
        .iter()
        .filter(|h| h.odds != 0.0 && !validate_odds(h.odds))
        .map(|h| h.horse_id)
        .collect();

    let response = OddsStatsResponse {
        stats: compute_odds_stats(&req.horses),
        horses: calculate_all_ability_indices(&req.horses),
        invalid,
    };

    Ok(HttpResponse::Ok().json(response))
}
