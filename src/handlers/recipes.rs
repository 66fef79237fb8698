use crate::{
    error::{ApiError, Result},
    models::{PageParams, SearchParams},
    services::RecipeStore,
};
use actix_web::{get, web, HttpResponse};
use serde_json::json;

/// Upper bound for `limit` on paginated listings
const MAX_PAGE_SIZE: i64 = 100;

/// Get paginated list of complete recipes
#[get("/recipes")]
pub async fn list_recipes(
    params: web::Query<PageParams>,
    store: web::Data<RecipeStore>,
) -> Result<HttpResponse> {
    if params.page < 1 {
        return Err(ApiError::InvalidInput("page must be at least 1".to_string()));
    }
    if !(1..=MAX_PAGE_SIZE).contains(&params.limit) {
        return Err(ApiError::InvalidInput(format!(
            "limit must be between 1 and {}",
            MAX_PAGE_SIZE
        )));
    }

    let recipes = store.list_recipes(params.page, params.limit).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "total": recipes.len(),
        "data": recipes,
        "page": params.page,
        "limit": params.limit,
    })))
}

/// Get single recipe with ingredients and instructions
#[get("/recipes/{recipe_id}")]
pub async fn get_recipe(
    path: web::Path<String>,
    store: web::Data<RecipeStore>,
) -> Result<HttpResponse> {
    let recipe_id = path.into_inner();
    let recipe = store
        .get_recipe(&recipe_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": recipe,
    })))
}

/// Search recipes by name, description, or ingredients
#[get("/search")]
pub async fn search_recipes(
    params: web::Query<SearchParams>,
    store: web::Data<RecipeStore>,
) -> Result<HttpResponse> {
    let query = params.q.trim();
    if query.is_empty() {
        return Err(ApiError::InvalidInput("Query cannot be empty".to_string()));
    }

    let recipes = store.search(query).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "total": recipes.len(),
        "data": recipes,
        "query": query,
    })))
}

/// Get all recipe categories with counts
#[get("/categories")]
pub async fn list_categories(store: web::Data<RecipeStore>) -> Result<HttpResponse> {
    let categories = store.categories(None).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": categories,
    })))
}

pub fn recipes_config(cfg: &mut web::ServiceConfig) {
    cfg.service(list_recipes)
        .service(get_recipe)
        .service(search_recipes)
        .service(list_categories);
}
