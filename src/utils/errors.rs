//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn new(error: &str, message: String) -> Self {
        Self {
            success: false,
            error: error.to_string(),
            message,
            details: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        success: false,
                        error: "Database Error".to_string(),
                        message: "An error occurred while accessing the database".to_string(),
                        details: Some(json!({ "sql_error": e.to_string() })),
                    },
                )
            }

            AppError::Validation(msg) => {
                tracing::warn!("Validation error: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new("Validation Error", msg),
                )
            }

            AppError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized access: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new("Unauthorized", msg),
                )
            }

            AppError::NotFound(msg) => {
                tracing::warn!("Resource not found: {}", msg);
                (StatusCode::NOT_FOUND, ErrorResponse::new("Not Found", msg))
            }

            AppError::Conflict(msg) => {
                tracing::warn!("Conflict: {}", msg);
                (StatusCode::CONFLICT, ErrorResponse::new("Conflict", msg))
            }

            AppError::Render(msg) => {
                tracing::error!("Render error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Render Error", msg),
                )
            }

            AppError::Jwt(msg) => {
                tracing::warn!("JWT error: {}", msg);
                (StatusCode::UNAUTHORIZED, ErrorResponse::new("JWT Error", msg))
            }

            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        success: false,
                        error: "Internal Server Error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        details: Some(json!({ "internal_error": msg })),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Código SQLSTATE de violación de constraint UNIQUE en PostgreSQL
const UNIQUE_VIOLATION: &str = "23505";

/// Mapear errores de INSERT a la taxonomía de la aplicación.
///
/// Las constraints UNIQUE de la base de datos son la garantía definitiva
/// contra duplicados (los pre-checks de los controllers son solo rechazo
/// temprano), así que una violación de unicidad se reporta como `Conflict`
/// igual que un pre-check fallido. `conflicts` asocia el nombre de cada
/// constraint UNIQUE del INSERT con su mensaje; un INSERT puede tener
/// varias (en `cars`, `car_number` y `public_id`).
pub fn map_insert_error(e: sqlx::Error, conflicts: &[(&str, &str)]) -> AppError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let message = conflict_message(db_err.constraint(), conflicts);
            return AppError::Conflict(message.to_string());
        }
    }
    AppError::Database(e)
}

/// Elegir el mensaje según la constraint violada. Si el driver no reporta
/// el nombre de la constraint se usa el primer mensaje de la lista.
fn conflict_message<'a>(constraint: Option<&str>, conflicts: &[(&'a str, &'a str)]) -> &'a str {
    constraint
        .and_then(|name| conflicts.iter().find(|(c, _)| *c == name))
        .or_else(|| conflicts.first())
        .map(|(_, message)| *message)
        .unwrap_or("Registro duplicado")
}
