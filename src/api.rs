//! HTTP surface for queryscope.
//!
//! Exposes the pipeline as a small JSON API. Statement-level failures
//! are reported with `success: false` in a 200 response; connectivity
//! and translation failures map to generic 500 responses.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::db::{ConnectionProvider, SchemaIntrospector};
use crate::error::{QueryscopeError, Result};
use crate::llm::{HintGenerator, NlTranslator};
use crate::query::{QueryExecutor, Validator};

/// Shared per-process components. Each request still opens its own
/// database connection; nothing here is mutated after startup.
pub struct AppState {
    validator: Validator,
    executor: QueryExecutor,
    introspector: SchemaIntrospector,
    translator: Option<NlTranslator>,
}

impl AppState {
    /// Wires the pipeline components from an explicit configuration.
    ///
    /// The translator is only available when an LLM credential is
    /// configured; the rest of the API works without one.
    pub fn from_config(config: &Config) -> Self {
        let provider = ConnectionProvider::new(config.database.clone());
        let introspector = SchemaIntrospector::new(provider.clone());

        let translator = if config.llm.has_credentials() {
            NlTranslator::new(&config.llm, introspector.clone()).ok()
        } else {
            None
        };

        Self {
            validator: Validator::new(provider.clone(), HintGenerator::new(&config.llm)),
            executor: QueryExecutor::new(provider),
            introspector,
            translator,
        }
    }
}

/// Builds the API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/query", get(query_sql))
        .route("/nl-query", post(nl_query))
        .route("/schema", get(get_schema))
        .with_state(state)
}

/// Runs the HTTP server until it is stopped.
pub async fn serve(config: Config, host: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::from_config(&config));
    let app = create_router(state);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| QueryscopeError::config(format!("Invalid listen address: {e}")))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| QueryscopeError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("API server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| QueryscopeError::internal(format!("API server error: {e}")))
}

#[derive(Debug, Deserialize)]
struct QueryParams {
    sql: String,
    #[serde(default)]
    explain: bool,
}

#[derive(Debug, Serialize)]
struct QueryResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    explain: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NlQueryRequest {
    query: String,
    #[serde(default = "default_execute")]
    execute: bool,
}

fn default_execute() -> bool {
    true
}

#[derive(Debug, Serialize)]
struct NlQueryResponse {
    sql: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<String>,
}

async fn home() -> Json<serde_json::Value> {
    Json(json!({
        "message": "queryscope API: /query, /nl-query, /schema"
    }))
}

async fn query_sql(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> std::result::Result<Json<QueryResponse>, ApiError> {
    let check = state.validator.validate(&params.sql).await?;

    if !check.success {
        return Ok(Json(QueryResponse {
            success: false,
            result: None,
            error: Some(check.message),
            hint: check.hint,
            explain: None,
        }));
    }

    let result = state.executor.execute(&params.sql).await?;

    let explain = if params.explain {
        Some(state.executor.explain(&params.sql).await?)
    } else {
        None
    };

    Ok(Json(QueryResponse {
        success: true,
        result: Some(result),
        error: None,
        hint: None,
        explain,
    }))
}

async fn nl_query(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NlQueryRequest>,
) -> std::result::Result<Json<NlQueryResponse>, ApiError> {
    let translator = state
        .translator
        .as_ref()
        .ok_or_else(|| QueryscopeError::config("AI_API_KEY is not set"))?;

    let sql = translator.translate(&request.query).await?;

    let result = if request.execute {
        Some(state.executor.execute(&sql).await?)
    } else {
        None
    };

    Ok(Json(NlQueryResponse { sql, result }))
}

async fn get_schema(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<serde_json::Value>, ApiError> {
    let summary = state.introspector.summary().await?;
    Ok(Json(json!({ "schema": summary.render() })))
}

/// Maps internal errors to generic server errors for the HTTP surface.
struct ApiError(QueryscopeError);

impl From<QueryscopeError> for ApiError {
    fn from(error: QueryscopeError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.0.to_string(),
        }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
