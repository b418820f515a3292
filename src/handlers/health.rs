use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use tracing::warn;

use crate::AppState;
use keiba::models::HealthResponse;

/// Health check endpoint
pub async fn health_check(state: web::Data<Arc<AppState>>) -> impl Responder {
    let robots = match state.store.list() {
        Ok(robots) => robots.len(),
        Err(e) => {
            warn!("Robot store unreadable: {}", e);
            0
        }
    };

    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        robots,
    };

    HttpResponse::Ok().json(response)
}
