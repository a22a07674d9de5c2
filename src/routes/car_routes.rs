use axum::{
    extract::{Path, State},
    http::header,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use validator::Validate;

use crate::controllers::car_controller::CarController;
use crate::dto::car_dto::{ApiResponse, CarResponse, RegisterCarRequest};
use crate::middleware::auth::auth_middleware;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Router de administración de vehículos. Todas las rutas requieren un
/// admin autenticado.
pub fn create_car_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::post(register_car).get(list_cars))
        .route("/qr/:public_id", get(download_qr))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn register_car(
    State(state): State<AppState>,
    Json(request): Json<RegisterCarRequest>,
) -> Result<Json<ApiResponse<CarResponse>>, AppError> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let controller = CarController::new(state.pool.clone());
    let response = controller.register(request, &state.config.base_url).await?;
    Ok(Json(response))
}

async fn list_cars(
    State(state): State<AppState>,
) -> Result<Json<Vec<CarResponse>>, AppError> {
    let controller = CarController::new(state.pool.clone());
    let response = controller.list(&state.config.base_url).await?;
    Ok(Json(response))
}

/// Descargar el QR de un vehículo como PNG adjunto
async fn download_qr(
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> Result<Response, AppError> {
    let controller = CarController::new(state.pool.clone());
    let (png, car_number) = controller
        .qr_png(&public_id, &state.qr, &state.config.base_url)
        .await?;

    let headers = [
        (header::CONTENT_TYPE, "image/png".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"qr-{}.png\"", car_number),
        ),
    ];

    Ok((headers, png).into_response())
}
