use actix_web::{web, HttpResponse};
use std::sync::Arc;

use crate::AppState;
use keiba::core::CategorySelection;
use keiba::error::{validate_root_index, AppError};
use keiba::robot::{RobotDefinition, MAX_ROBOT_NAME_LEN};
use keiba::KeibaError;

/// List saved robots
pub async fn list_robots(state: web::Data<Arc<AppState>>) -> Result<HttpResponse, AppError> {
    let robots = state.store.list()?;
    Ok(HttpResponse::Ok().json(robots))
}

/// Save a robot definition
pub async fn save_robot(
    state: web::Data<Arc<AppState>>,
    req: web::Json<RobotDefinition>,
) -> Result<HttpResponse, AppError> {
    let robot = req.into_inner();

    if robot.robot_name.trim().is_empty() {
        return Err(AppError::ValidationError("Robot name is required".to_string()));
    }
    if robot.robot_name.chars().count() > MAX_ROBOT_NAME_LEN {
        return Err(AppError::ValidationError(format!(
            "Robot name must be at most {} characters",
            MAX_ROBOT_NAME_LEN
        )));
    }
    validate_root_index(robot.root_index)?;
    CategorySelection::from_ids(&robot.tendency_ids(), &state.categories)?;

    // Non-zero ids update an existing robot; new ids are assigned by the store
    if robot.id != 0 && state.store.get(robot.id)?.is_none() {
        return Err(KeibaError::RobotNotFound(robot.id).into());
    }

    let saved = state.store.save(robot)?;
    Ok(HttpResponse::Created().json(saved))
}

/// Delete a robot
pub async fn delete_robot(
    state: web::Data<Arc<AppState>>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    if !state.store.delete(id)? {
        return Err(KeibaError::RobotNotFound(id).into());
    }
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use keiba::data::sample;
    use keiba::robot::MemoryRobotStore;
    use serde_json::json;

    fn robot_json(name: &str, ids: [u32; 4]) -> serde_json::Value {
        json!({
            "robotName": name,
            "rootIndex": 55.0,
            "tendencyParams": ids.iter().enumerate().map(|(i, id)| json!({
                "id": id, "name": "", "priority": i + 1
            })).collect::<Vec<_>>(),
            "raceParams": [],
            "learningThought": "jockey",
            "createdAt": "2024-01-15T09:00:00Z"
        })
    }

    #[actix_web::test]
    async fn test_robot_lifecycle() {
        let state = Arc::new(AppState {
            store: Box::new(MemoryRobotStore::new()),
            categories: sample::categories(),
        });
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/robots", web::get().to(list_robots))
                .route("/robots", web::post().to(save_robot))
                .route("/robots/{id}", web::delete().to(delete_robot)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/robots")
            .set_json(robot_json("先行型", [1, 2, 3, 4]))
            .to_request();
        let saved: RobotDefinition = test::call_and_read_body_json(&app, req).await;
        assert_ne!(saved.id, 0);

        let req = test::TestRequest::get().uri("/robots").to_request();
        let robots: Vec<RobotDefinition> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(robots.len(), 1);

        let req = test::TestRequest::delete()
            .uri(&format!("/robots/{}", saved.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::delete()
            .uri(&format!("/robots/{}", saved.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_save_rejects_unassigned_id() {
        let state = Arc::new(AppState {
            store: Box::new(MemoryRobotStore::new()),
            categories: sample::categories(),
        });
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .route("/robots", web::post().to(save_robot)),
        )
        .await;

        let mut body = robot_json("forged", [1, 2, 3, 4]);
        body["id"] = json!(u64::MAX);
        let req = test::TestRequest::post()
            .uri("/robots")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(state.store.list().unwrap().is_empty());

        let req = test::TestRequest::post()
            .uri("/robots")
            .set_json(robot_json("fresh", [1, 2, 3, 4]))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn test_save_rejects_duplicate_params() {
        let state = Arc::new(AppState {
            store: Box::new(MemoryRobotStore::new()),
            categories: sample::categories(),
        });
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/robots", web::post().to(save_robot)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/robots")
            .set_json(robot_json("dup", [1, 1, 3, 4]))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
