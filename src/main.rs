// ABOUTME: Main entry point for the film log webapp with session-cookie auth
// ABOUTME: Sets up the web server, routes, and initialization logic

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod auth;
mod config;
mod entities;
mod equipment;
mod error;
mod films;
mod frames;
mod migration;
mod rolls;
mod session;
mod storage;
mod types;
mod uploads;

#[cfg(test)]
mod storage_tests;

use config::Config;
use session::SessionStore;
use storage::Storage;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<Storage>,
    pub sessions: SessionStore,
    pub config: Arc<Config>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(rolls::index))
        .route("/roles", get(rolls::index))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/get_films/:manufacturer", get(rolls::get_films))
        .route("/add_role", get(rolls::add_role_page).post(rolls::add_role))
        .route("/role/:role_id", get(rolls::role_view))
        .route(
            "/role/:role_id/add_image",
            get(frames::add_image_page).post(frames::add_image),
        )
        .route("/role/:role_id/export_json", get(rolls::export_role_json))
        .route(
            "/edit_image/:image_id",
            get(frames::edit_image_page).post(frames::edit_image),
        )
        .route("/delete_image/:image_id", get(frames::delete_image))
        .route(
            "/add_camera",
            get(equipment::add_camera_page).post(equipment::add_camera),
        )
        .route(
            "/add_lens",
            get(equipment::add_lens_page).post(equipment::add_lens),
        )
        .route(
            "/add_filter",
            get(equipment::add_filter_page).post(equipment::add_filter),
        )
        .route("/materials", get(equipment::materials))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let storage = Arc::new(Storage::new(&config.database_url).await?);
    let sessions = SessionStore::new();

    let state = AppState {
        storage,
        sessions,
        config: Arc::new(config),
    };

    let app = build_router(state.clone());

    let listener = TcpListener::bind((state.config.host.as_str(), state.config.port)).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
