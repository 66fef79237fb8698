use crate::{
    config::Config,
    error::Result,
    routes::{api_routes, service_routes},
    services::{ChefAssistant, NlgClient, OpenAiClient, RecipeStore, SubstitutionTable},
};
use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use log::{info, warn};
use std::{net::TcpListener, sync::Arc, time::Duration};

/// Origins allowed to call the API in production
const PRODUCTION_ORIGINS: &[&str] = &["https://hungie.vercel.app", "https://hungie.app"];

pub struct Application {
    port: u16,
    host: String,
    config: Config,
}

impl Application {
    /// Create a new application instance
    pub fn new(config: &Config) -> Self {
        Self {
            port: config.port,
            host: config.host.clone(),
            config: config.clone(),
        }
    }

    /// Build and run the server
    pub async fn run(&self) -> Result<()> {
        let bind_address = format!("{}:{}", self.host, self.port);
        let listener = TcpListener::bind(&bind_address)?;
        info!(
            "Starting Hungie API in {} mode at http://{}",
            self.config.environment, bind_address
        );

        self.run_with_listener(listener).await
    }

    /// Run the server with a specific TCP listener
    /// This is useful for testing where we want to use a random port
    pub async fn run_with_listener(&self, listener: TcpListener) -> Result<()> {
        let store = RecipeStore::connect_lazy(
            &self.config.database_url,
            self.config.database_max_connections,
        )?;
        if !store.ping().await {
            warn!("Database {} is not reachable yet", self.config.database_url);
        }

        let nlg = nlg_client(&self.config)?;
        info!(
            "AI features: {}",
            if nlg.is_some() { "enabled" } else { "disabled" }
        );

        let chef = web::Data::new(ChefAssistant::new(
            store.clone(),
            SubstitutionTable::builtin(),
            nlg,
        ));
        let store = web::Data::new(store);
        let config = web::Data::new(self.config.clone());
        let production = self.config.is_production();

        HttpServer::new(move || {
            App::new()
                .wrap(cors(production))
                .wrap(Logger::default())
                .app_data(config.clone())
                .app_data(store.clone())
                .app_data(chef.clone())
                .configure(service_routes)
                .service(api_routes())
        })
        .listen(listener)?
        .run()
        .await?;

        Ok(())
    }
}

/// Chat completions client, if an API key is configured
pub fn nlg_client(config: &Config) -> Result<Option<Arc<dyn NlgClient>>> {
    let Some(api_key) = config.openai_api_key() else {
        return Ok(None);
    };

    let client = OpenAiClient::new(
        api_key,
        &config.openai_model,
        &config.openai_base_url,
        Duration::from_secs(config.nlg_timeout_secs),
    )
    .context("Failed to initialize NLG client")?;

    let client: Arc<dyn NlgClient> = Arc::new(client);
    Ok(Some(client))
}

fn cors(production: bool) -> Cors {
    if !production {
        return Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();
    }

    PRODUCTION_ORIGINS
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_origin_fn(|origin, _| {
            origin
                .to_str()
                .map(|o| o.starts_with("https://") && o.ends_with(".hungie.app"))
                .unwrap_or(false)
        })
        .allowed_methods(vec!["GET", "POST"])
        .allow_any_header()
        .supports_credentials()
}
