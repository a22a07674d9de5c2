use axum::{
    extract::State,
    http::{header, HeaderMap},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{CheckAuthResponse, LoginRequest, LoginResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{verify_token, JwtConfig};

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/check-auth", get(check_auth))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let controller = AuthController::new(state.pool.clone());
    let jwt_config = JwtConfig::from(&state.config);
    let response = controller.login(request, &jwt_config).await?;
    Ok(Json(response))
}

/// Con tokens firmados no hay sesión de servidor que invalidar: el cliente
/// descarta el token. Se mantiene el endpoint por compatibilidad con el
/// frontend.
async fn logout() -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "message": "Logged out successfully"
    }))
}

/// Reportar si el token presentado es válido y para quién. Nunca falla:
/// sin token o con token inválido responde `authenticated: false`.
async fn check_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<CheckAuthResponse> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .and_then(|auth_str| auth_str.strip_prefix("Bearer "));

    let jwt_config = JwtConfig::from(&state.config);

    let username = token.and_then(|t| verify_token(t, &jwt_config).ok().map(|c| c.username));

    Json(CheckAuthResponse {
        authenticated: username.is_some(),
        username,
    })
}
