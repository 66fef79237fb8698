use crate::{
    config::Config,
    models::HealthResponse,
    services::{ChefAssistant, RecipeStore},
};
use actix_web::{get, web, HttpResponse};

/// Detailed health for deployment monitoring
#[get("/health")]
pub async fn health_check(
    config: web::Data<Config>,
    store: web::Data<RecipeStore>,
    chef: web::Data<ChefAssistant>,
) -> HttpResponse {
    let database = if store.ping().await { "connected" } else { "missing" };

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        environment: config.environment.clone(),
        ai_enabled: chef.ai_enabled(),
        database: database.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Liveness probe that never touches dependencies
#[get("/healthcheck")]
pub async fn healthcheck() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "message": "Hungie API is healthy!"
    }))
}

#[get("/")]
pub async fn root(config: web::Data<Config>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Welcome to Hungie API! 🍴",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": config.environment,
        "features": [
            "Curated recipes",
            "AI-powered chat with substitutions",
            "Smart ingredient replacements",
            "Anti-SEO design philosophy"
        ],
    }))
}
