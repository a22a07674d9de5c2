//! Modelo de Admin
//!
//! Cuenta de administrador que puede registrar vehículos. Las contraseñas
//! se guardan como hash bcrypt, nunca en claro.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
