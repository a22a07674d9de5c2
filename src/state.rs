//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::services::qr_service::QrService;
use crate::services::scan_log::ScanLog;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    /// Sintetizador de QR con el logo ya resuelto (inmutable tras el arranque)
    pub qr: Arc<QrService>,
    /// Sink de eventos de escaneo
    pub scan_log: ScanLog,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig, qr: QrService, scan_log: ScanLog) -> Self {
        Self {
            pool,
            config,
            qr: Arc::new(qr),
            scan_log,
        }
    }
}
