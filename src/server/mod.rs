pub mod form;
pub mod handlers;

use crate::{
    config::Config,
    error::{RelayError, Result},
    gemini::{GeminiClient, ImageModel},
    models::image::ErrorReply,
};
use actix_web::{error::InternalError, middleware, web, App, HttpResponse, HttpServer};
use std::sync::Arc;

/// Shared per-process state. Read-only after startup.
pub struct AppState {
    pub config: Config,
    pub model: Arc<dyn ImageModel>,
    /// Client for user-supplied image URLs.
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config, model: Arc<dyn ImageModel>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| RelayError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { config, model, http })
    }
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let body = ErrorReply {
            error: err.to_string(),
            error_type: Some("RequestError".to_string()),
        };
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    })
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            .route("/generate_image", web::post().to(handlers::generate_image))
            .route("/edit_image", web::post().to(handlers::edit_image))
            .route("/compose_images", web::post().to(handlers::compose_images))
            .route(
                "/download_image/{image_data:.*}",
                web::get().to(handlers::download_image),
            ),
    );
}

pub async fn run(config: Config) -> Result<()> {
    let model: Arc<dyn ImageModel> = Arc::new(GeminiClient::new(&config)?);
    let bind = (config.host.clone(), config.port);
    let state = web::Data::new(AppState::new(config, model)?);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::new("%a \"%r\" %s %Dms"))
            .configure(configure)
    })
    .bind(bind)
    .map_err(|e| RelayError::ConfigError(format!("Failed to bind server: {}", e)))?
    .run()
    .await
    .map_err(|e| RelayError::RequestError(format!("Server error: {}", e)))
}
