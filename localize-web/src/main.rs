use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use localize::locale::normalize_locale;
use localize::{LocaleRegistry, LocalizeConfig};

#[derive(Serialize, Deserialize)]
pub struct LocaleStatus {
    pub locale: String,
    pub ready: bool,
    pub messages: usize,
    pub warnings: usize,
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct RenderResponse {
    pub locale: String,
    pub key: String,
    pub rendered: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<LocaleRegistry>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/locales", get(list_locales))
        .route("/api/render/{locale}/{key}", get(render_message))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = LocalizeConfig::from_env();
    info!(
        "Loading locales {:?} from {}",
        config.locales,
        config.dictionary_dir.display()
    );

    let registry = LocaleRegistry::from_config(&config).await;
    for outcome in registry.outcomes() {
        match &outcome.error {
            None => info!("Locale '{}' ready", outcome.locale),
            Some(e) => tracing::warn!("Locale '{}' unavailable: {}", outcome.locale, e),
        }
    }

    let state = AppState {
        registry: Arc::new(registry),
    };

    let addr = std::env::var("LOCALIZE_WEB_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}

async fn list_locales(State(state): State<AppState>) -> Json<Vec<LocaleStatus>> {
    let statuses = state
        .registry
        .outcomes()
        .iter()
        .map(|outcome| LocaleStatus {
            locale: outcome.locale.clone(),
            ready: outcome.is_ok(),
            messages: state
                .registry
                .dictionary(&outcome.locale)
                .map(|d| d.len())
                .unwrap_or(0),
            warnings: outcome.warnings.len(),
            error: outcome.error.as_ref().map(|e| e.to_string()),
        })
        .collect();

    Json(statuses)
}

async fn render_message(
    State(state): State<AppState>,
    Path((locale, key)): Path<(String, String)>,
    Query(substitutions): Query<HashMap<String, String>>,
) -> Result<Json<RenderResponse>, (StatusCode, Json<ErrorResponse>)> {
    let not_found = |error: String| (StatusCode::NOT_FOUND, Json(ErrorResponse { error }));

    let dictionary = state
        .registry
        .dictionary(&locale)
        .ok_or_else(|| not_found(format!("Locale '{}' is not loaded", locale)))?;
    if !dictionary.contains_key(&key) {
        return Err(not_found(format!("Unknown message key '{}'", key)));
    }

    let locale = normalize_locale(&locale);
    let rendered = state.registry.get(&key, &substitutions, &locale);
    info!("Rendered '{}' in {}", key, locale);

    Ok(Json(RenderResponse {
        locale,
        key,
        rendered,
    }))
}
