//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    /// URL pública base usada para construir los targets de los QR
    /// (`<base_url>/car/<public_id>`)
    pub base_url: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    /// Ruta del logo que se incrusta en el centro de los QR. Si el archivo
    /// no existe los QR se generan sin logo.
    pub qr_logo_path: String,
    /// Archivo CSV donde se registran los escaneos de QR
    pub scan_log_path: String,
}

impl EnvironmentConfig {
    /// Cargar la configuración desde variables de entorno.
    ///
    /// `DATABASE_URL` y `JWT_SECRET` son obligatorias; el resto tiene
    /// defaults razonables para desarrollo.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            base_url: env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?,
            jwt_expiration: env::var("JWT_EXPIRATION")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()?,
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            qr_logo_path: env::var("QR_LOGO_PATH")
                .unwrap_or_else(|_| "static/logo.png".to_string()),
            scan_log_path: env::var("SCAN_LOG_PATH")
                .unwrap_or_else(|_| "qr-scan-log.csv".to_string()),
        })
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
