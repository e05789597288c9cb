use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use log::{error, info, warn};
use serde::Deserialize;
use serde_json::json;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tower_http::cors::{Any, CorsLayer};

use crate::error::WifiConfError;
use crate::render::{render_index, Notice};
use crate::store::ProfileStore;

/// The profile collection shared by all handlers. Each handler holds the lock
/// for its whole read or reconcile-and-write step.
pub type SharedStore = Arc<Mutex<ProfileStore>>;

pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

/// Fields posted by the edit forms.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub profile: String,
    pub ssid: String,
    pub password: String,
}

pub fn router(store: SharedStore) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler).post(submit_handler))
        .route("/api/profiles", get(profiles_handler).layer(cors))
        .with_state(store)
}

pub async fn run_server(config: ServerConfig, store: SharedStore) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.bind, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Starting server at http://{}", listener.local_addr()?);
    axum::serve(listener, router(store)).await?;

    Ok(())
}

async fn index_handler(State(store): State<SharedStore>) -> Response {
    let store = lock(&store);
    page(StatusCode::OK, &store, None)
}

async fn submit_handler(
    State(store): State<SharedStore>,
    Form(form): Form<ProfileForm>,
) -> Response {
    let mut store = lock(&store);

    match store.submit(&form.profile, &form.ssid, &form.password) {
        Ok(submission) => {
            let notice = Notice::Success(submission.message().to_string());
            page(StatusCode::OK, &store, Some(&notice))
        }
        Err(e @ WifiConfError::InvalidSubmission(_)) => {
            warn!("Rejected submission for '{}': {}", form.profile, e);
            page(StatusCode::BAD_REQUEST, &store, Some(&Notice::Error(e.to_string())))
        }
        Err(e) => {
            error!("{}", e);
            page(
                StatusCode::INTERNAL_SERVER_ERROR,
                &store,
                Some(&Notice::Error(e.to_string())),
            )
        }
    }
}

async fn profiles_handler(State(store): State<SharedStore>) -> Response {
    let store = lock(&store);

    let profiles = store.profiles();
    match serde_json::to_value(profiles) {
        Ok(list) => Json(json!({
            "result": profiles.len(),
            "profiles": list,
        }))
        .into_response(),
        Err(e) => {
            error!("Failed to serialize profiles: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Serialization error").into_response()
        }
    }
}

fn page(status: StatusCode, store: &ProfileStore, notice: Option<&Notice>) -> Response {
    match render_index(store.profiles(), notice) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!("Template render error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

/// Takes the store lock, recovering it if poisoned. Every change to the
/// collection is a whole-record swap, so it is never left half-updated.
fn lock(store: &SharedStore) -> MutexGuard<'_, ProfileStore> {
    store.lock().unwrap_or_else(|poisoned| {
        warn!("Recovering poisoned profile store lock");
        PoisonError::into_inner(poisoned)
    })
}
