use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

mod handlers;

use handlers::{health, odds, robots, score};
use keiba::config::{log_filter, ServerConfig};
use keiba::data::sample;
use keiba::models::Category;
use keiba::robot::{JsonFileRobotStore, RobotStore};

/// Application state shared across handlers
pub struct AppState {
    pub store: Box<dyn RobotStore>,
    pub categories: Vec<Category>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter("info"))
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let config = ServerConfig::from_env();
    let addr = config.bind_addr();

    info!("Using robot store {:?}", config.robot_store);

    let app_state = Arc::new(AppState {
        store: Box::new(JsonFileRobotStore::new(&config.robot_store)),
        categories: sample::categories(),
    });

    info!("Starting Keiba API server at http://{}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .route("/health", web::get().to(health::health_check))
            .route("/score", web::post().to(score::score_race))
            .route("/odds/stats", web::post().to(odds::odds_stats))
            .route("/robots", web::get().to(robots::list_robots))
            .route("/robots", web::post().to(robots::save_robot))
            .route("/robots/{id}", web::delete().to(robots::delete_robot))
    })
    .bind(&addr)?
    .run()
    .await
}
