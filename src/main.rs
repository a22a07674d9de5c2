use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use qcar_backend::config::environment::EnvironmentConfig;
use qcar_backend::create_app;
use qcar_backend::database::{create_pool, run_migrations};
use qcar_backend::database::connection::mask_database_url;
use qcar_backend::repositories::admin_repository::AdminRepository;
use qcar_backend::services::qr_service::QrService;
use qcar_backend::services::scan_log::ScanLog;
use qcar_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚗 QCAR - Car QR Management System");
    info!("==================================");

    let config = EnvironmentConfig::from_env()?;

    // Inicializar base de datos
    info!("Conectando a {}", mask_database_url(&config.database_url));
    let pool = match create_pool(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    run_migrations(&pool).await?;
    info!("✅ Migraciones aplicadas");

    // Admin inicial para el primer arranque
    seed_admin(&pool).await?;

    // Servicios
    let qr = QrService::new(&config.qr_logo_path);
    let scan_log = ScanLog::start(config.scan_log_path.clone().into());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let state = AppState::new(pool, config, qr, scan_log);
    let app = create_app(state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔐 Endpoints - Auth:");
    info!("   POST /api/login - Login de admin");
    info!("   POST /api/logout - Logout");
    info!("   GET  /api/check-auth - Estado de autenticación");
    info!("🚗 Endpoints - Cars (requieren auth):");
    info!("   POST /api/cars - Registrar vehículo");
    info!("   GET  /api/cars - Listar vehículos");
    info!("   GET  /api/cars/qr/:public_id - Descargar QR en PNG");
    info!("📱 Endpoints públicos:");
    info!("   GET  /car/:public_id - Detalles de vehículo (registra escaneo)");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Crear el admin inicial si `ADMIN_USERNAME`/`ADMIN_PASSWORD` están
/// definidas y el usuario no existe todavía.
async fn seed_admin(pool: &sqlx::PgPool) -> Result<()> {
    let (username, password) = match (
        std::env::var("ADMIN_USERNAME"),
        std::env::var("ADMIN_PASSWORD"),
    ) {
        (Ok(u), Ok(p)) => (u, p),
        _ => return Ok(()),
    };

    let repository = AdminRepository::new(pool.clone());
    if repository.find_by_username(&username).await?.is_some() {
        return Ok(());
    }

    let password_hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST)?;
    repository.create(username.clone(), password_hash).await?;
    info!("✅ Admin inicial '{}' creado", username);

    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
