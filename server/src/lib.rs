//! Workkerz backend.
//!
//! Marketing-site API, lead-intake forms, and the admin back office for the
//! Workkerz gig-labor marketplace. All persistence lives in a hosted
//! relational datastore reached through the thin client in [`store`]; this
//! service owns intake validation, the onboarding wizard, admin aggregation,
//! exports, and the admin session gate.
//!
//! Run with `RUST_LOG=workkerz=info` for request-level logging.

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    middleware,
    routing::{get, patch, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod blogs;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod models;
pub mod onboarding;
pub mod routes;
pub mod state;
pub mod store;
pub mod utils;

use dashboard::SurveyFilter;
use state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    let gated = Router::new()
        .route("/dashboard", get(routes::admin::dashboard))
        .route("/surveys", get(routes::admin::surveys))
        .route("/surveys/export.csv", get(routes::admin::export_csv))
        .route("/surveys/export.xlsx", get(routes::admin::export_xlsx))
        .route("/workers", get(routes::admin::workers))
        .route(
            "/blogs",
            get(routes::admin::list_blogs).post(routes::admin::create_blog),
        )
        .route(
            "/blogs/{id}",
            patch(routes::admin::update_blog).delete(routes::admin::delete_blog),
        )
        .route("/blogs/{id}/pin", post(routes::admin::toggle_pin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    let admin = Router::new()
        .route("/login", post(auth::login))
        .merge(gated);

    Router::new()
        .route("/api/survey", post(routes::survey::submit))
        .route(
            "/api/rating",
            get(routes::rating::summary).post(routes::rating::submit),
        )
        .route("/api/workers", post(routes::workers::onboard))
        .route("/api/contact", post(routes::contact::submit))
        .route("/api/blogs", get(routes::blogs::list))
        .route("/api/blogs/{slug}", get(routes::blogs::detail))
        .nest("/api/admin", admin)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await;

    info!("Loading snapshots...");
    if let Err(e) = state
        .dashboard
        .refresh_surveys(&state.store, SurveyFilter::default())
        .await
    {
        warn!("Initial survey fetch failed: {e}");
    }
    if let Err(e) = state.dashboard.refresh_workers(&state.store).await {
        warn!("Initial worker fetch failed: {e}");
    }
    if let Err(e) = state.blog_admin.refresh(&state.store).await {
        warn!("Initial blog fetch failed: {e}");
    }

    dashboard::watch_tables(state.clone());
    blogs::watch_posts(state.clone());

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = app(state.clone()).layer(cors);

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
