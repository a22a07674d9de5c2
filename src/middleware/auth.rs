//! Middleware de autenticación JWT
//!
//! Este módulo maneja la autenticación JWT, extracción de tokens
//! y verificación de admins autenticados. Sustituye a la sesión de
//! servidor: la identidad viaja en el token firmado.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    repositories::admin_repository::AdminRepository,
    state::AppState,
    utils::errors::AppError,
    utils::jwt::{verify_token, JwtConfig},
};

/// Admin autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedAdmin {
    pub admin_id: Uuid,
    pub username: String,
}

/// Extraer el token Bearer del header Authorization
pub fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .and_then(|auth_str| auth_str.strip_prefix("Bearer "))
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request)
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    let jwt_config = JwtConfig::from(&state.config);
    let claims = verify_token(token, &jwt_config)?;

    let admin_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("ID de admin inválido".to_string()))?;

    // Verificar que el admin sigue existiendo en la base de datos
    let admin = AdminRepository::new(state.pool.clone())
        .find_by_id(admin_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Admin no encontrado".to_string()))?;

    let authenticated = AuthenticatedAdmin {
        admin_id: admin.id,
        username: admin.username,
    };

    request.extensions_mut().insert(authenticated);

    Ok(next.run(request).await)
}
