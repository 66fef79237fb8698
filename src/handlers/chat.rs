use crate::{
    error::Result,
    models::{ChatRequest, ClassifyRequest},
    services::ChefAssistant,
};
use actix_web::{post, web, HttpResponse};
use log::info;

/// Chat with Hungie for personalized recipe recommendations
#[post("/chat")]
pub async fn chat(
    request: web::Json<ChatRequest>,
    chef: web::Data<ChefAssistant>,
) -> HttpResponse {
    let reply = chef.chat(&request.message, &request.context).await;
    HttpResponse::Ok().json(reply)
}

/// Chat reply combined with substitutions or matching recipes
#[post("/smart-search")]
pub async fn smart_search(
    request: web::Json<ChatRequest>,
    chef: web::Data<ChefAssistant>,
) -> Result<HttpResponse> {
    let reply = chef.smart_search(&request.message, &request.context).await?;
    info!(
        "Smart search answered as {:?} with {} recipes",
        reply.kind,
        reply.recipes.len()
    );
    Ok(HttpResponse::Ok().json(reply))
}

/// Show how a message would be routed, without searching
#[post("/classify")]
pub async fn classify(
    request: web::Json<ClassifyRequest>,
    chef: web::Data<ChefAssistant>,
) -> HttpResponse {
    let query = chef.classifier().classify(&request.message);
    HttpResponse::Ok().json(query)
}

pub fn chat_config(cfg: &mut web::ServiceConfig) {
    cfg.service(chat).service(smart_search).service(classify);
}
