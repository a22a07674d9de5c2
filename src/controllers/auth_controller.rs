use bcrypt::verify;
use sqlx::PgPool;

use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::repositories::admin_repository::AdminRepository;
use crate::utils::errors::AppError;
use crate::utils::jwt::{generate_token, JwtConfig};

pub struct AuthController {
    repository: AdminRepository,
}

impl AuthController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: AdminRepository::new(pool),
        }
    }

    /// Login de admin: verificar credenciales contra el hash bcrypt y
    /// emitir un JWT. El mismo mensaje para usuario inexistente y
    /// contraseña incorrecta, sin filtrar cuál de los dos falló.
    pub async fn login(
        &self,
        request: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let admin = self
            .repository
            .find_by_username(&request.username)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        let valid = verify(&request.password, &admin.password_hash)
            .map_err(|e| AppError::Internal(format!("Error verifying password: {}", e)))?;

        if !valid {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        let token = generate_token(admin.id, &admin.username, jwt_config)?;

        Ok(LoginResponse::success(token, admin.username))
    }
}
