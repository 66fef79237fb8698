use crate::{
    models::{BulkSubstitutionRequest, SubstitutionRequest},
    services::{substitutions::category_names, ChefAssistant},
};
use actix_web::{get, post, web, HttpResponse};
use serde_json::json;

/// Substitutes for a single ingredient, with advice when the dish is given
#[post("")]
pub async fn substitute(
    request: web::Json<SubstitutionRequest>,
    chef: web::Data<ChefAssistant>,
) -> HttpResponse {
    let advice = chef
        .advise_substitution(&request.ingredient, &request.recipe_context)
        .await;
    HttpResponse::Ok().json(advice)
}

#[post("/bulk")]
pub async fn bulk_substitute(
    request: web::Json<BulkSubstitutionRequest>,
    chef: web::Data<ChefAssistant>,
) -> HttpResponse {
    let report = chef
        .bulk_substitutions(&request.ingredients, &request.recipe_context)
        .await;
    HttpResponse::Ok().json(report)
}

/// The whole substitution table
#[get("/browse")]
pub async fn browse(chef: web::Data<ChefAssistant>) -> HttpResponse {
    let table = chef.substitutions();
    HttpResponse::Ok().json(json!({
        "success": true,
        "total_ingredients": table.len(),
        "substitutions": table,
        "categories": category_names(),
        "message": "Browse our complete substitution database!"
    }))
}

#[get("/categories/{category}")]
pub async fn by_category(
    path: web::Path<String>,
    chef: web::Data<ChefAssistant>,
) -> HttpResponse {
    let category = path.into_inner();
    let substitutions = chef.substitutions().resolve_category(&category);

    HttpResponse::Ok().json(json!({
        "success": !substitutions.is_empty(),
        "category": category,
        "total_ingredients": substitutions.len(),
        "substitutions": substitutions,
    }))
}

pub fn substitutions_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/substitutions")
            .service(substitute)
            .service(bulk_substitute)
            .service(browse)
            .service(by_category),
    );
}
