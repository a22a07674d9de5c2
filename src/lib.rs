//! Backend de QCAR - Car QR Management System
//!
//! Registro administrativo de vehículos con emisión de identificadores
//! públicos, QR coloreados por categoría y registro de escaneos.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use state::AppState;

/// Construir el router completo de la aplicación
pub fn create_app(state: AppState) -> Router {
    let cors = if state.config.is_production() {
        cors_middleware_with_origins(state.config.cors_origins.clone())
    } else {
        cors_middleware()
    };

    Router::new()
        .route("/health", get(health))
        .nest("/api/cars", routes::car_routes::create_car_router(state.clone()))
        .nest("/api", routes::auth_routes::create_auth_router())
        .merge(routes::public_routes::create_public_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Health check simple
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "service": "qcar-backend",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
