use actix_web::{web, Scope};

use crate::handlers::{chat_config, recipes_config, substitutions_config};

/// Configure all routes under `/api`
pub fn api_routes() -> Scope {
    web::scope("/api")
        .configure(recipes_config)
        .configure(chat_config)
        .configure(substitutions_config)
}

/// Banner and health endpoints served outside `/api`
pub fn service_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(crate::handlers::root)
        .service(crate::handlers::health_check)
        .service(crate::handlers::healthcheck);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        services::{recipe_store::fixtures::seeded_store, ChefAssistant, SubstitutionTable},
    };
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    macro_rules! test_app {
        () => {{
            let store = seeded_store().await;
            let chef = ChefAssistant::new(store.clone(), SubstitutionTable::builtin(), None);
            let config = Config::from_builder(config::Config::builder()).unwrap();

            test::init_service(
                App::new()
                    .app_data(web::Data::new(config))
                    .app_data(web::Data::new(store))
                    .app_data(web::Data::new(chef))
                    .configure(service_routes)
                    .service(api_routes()),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn test_health_endpoints() {
        let app = test_app!();

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/healthcheck").to_request())
                .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/health").to_request(),
        )
        .await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");
        assert_eq!(body["ai_enabled"], false);
        assert_eq!(body["environment"], "development");

        let body: Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/").to_request())
                .await;
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn test_recipe_listing() {
        let app = test_app!();

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/recipes?page=1&limit=2").to_request(),
        )
        .await;
        assert_eq!(body["success"], true);
        assert_eq!(body["total"], 2);
        assert_eq!(body["data"][0]["name"], "Apple Pie");
        assert_eq!(body["page"], 1);

        for uri in [
            "/api/recipes?page=0",
            "/api/recipes?limit=500",
            "/api/recipes?page=9223372036854775807&limit=100",
        ] {
            let resp =
                test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        }
    }

    #[actix_web::test]
    async fn test_recipe_detail() {
        let app = test_app!();

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/recipes/r2").to_request(),
        )
        .await;
        assert_eq!(body["data"]["name"], "Beef Tacos");
        assert_eq!(body["data"]["ingredients"][0]["name"], "ground beef");
        assert_eq!(body["data"]["instructions"][0]["instruction"], "Brown the beef");

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/recipes/nope").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
    }

    #[actix_web::test]
    async fn test_search_and_categories() {
        let app = test_app!();

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/search?q=cream").to_request(),
        )
        .await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["query"], "cream");

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/search?q=%20").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/categories").to_request(),
        )
        .await;
        assert_eq!(body["data"][0], json!({"name": "Dinner", "count": 2}));
    }

    #[actix_web::test]
    async fn test_substitution_endpoints() {
        let app = test_app!();

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/substitutions")
                .set_json(json!({"ingredient": "Buttermilk"}))
                .to_request(),
        )
        .await;
        assert_eq!(body["success"], true);
        assert_eq!(body["substitutions"][0]["substitute"], "milk + vinegar");

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/substitutions")
                .set_json(json!({"ingredient": "quinoa"}))
                .to_request(),
        )
        .await;
        assert_eq!(body["success"], false);

        // blank input is contained by every key and lands on the first one
        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/substitutions")
                .set_json(json!({"ingredient": "  "}))
                .to_request(),
        )
        .await;
        assert_eq!(body["success"], true);
        assert_eq!(body["substitutions"][0]["substitute"], "milk + butter");

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/substitutions/bulk")
                .set_json(json!({"ingredients": ["wine", "tofu", "eggs"]}))
                .to_request(),
        )
        .await;
        let keys: Vec<&String> = body["substitutions"]
            .as_object()
            .unwrap()
            .keys()
            .collect();
        assert_eq!(keys, vec!["wine", "eggs"]);
        assert_eq!(body["missing_ingredients"], json!(["tofu"]));
    }

    #[actix_web::test]
    async fn test_browse_and_category() {
        let app = test_app!();

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/substitutions/browse").to_request(),
        )
        .await;
        assert_eq!(body["total_ingredients"], 11);
        assert!(body["substitutions"]["garlic"].is_array());

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/substitutions/categories/sweeteners")
                .to_request(),
        )
        .await;
        assert_eq!(body["success"], true);
        assert!(body["substitutions"]["sugar"].is_array());
    }

    #[actix_web::test]
    async fn test_chat_endpoints() {
        let app = test_app!();

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/classify")
                .set_json(json!({"message": "what can I use instead of buttermilk"}))
                .to_request(),
        )
        .await;
        assert_eq!(body["intent"], "SUBSTITUTION");
        assert_eq!(body["matched_ingredient"], "buttermilk");

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/smart-search")
                .set_json(json!({"message": "easy apple dessert"}))
                .to_request(),
        )
        .await;
        assert_eq!(body["type"], "recipe_search");
        assert_eq!(body["recipes"][0]["name"], "Apple Pie");

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/chat")
                .set_json(json!({"message": "hi"}))
                .to_request(),
        )
        .await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "AI features not available");
    }
}
