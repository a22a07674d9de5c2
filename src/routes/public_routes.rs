use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::controllers::public_controller::PublicController;
use crate::dto::car_dto::{ApiResponse, CarResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Router público: el destino de los QR. Sin autenticación.
pub fn create_public_router() -> Router<AppState> {
    Router::new().route("/car/:public_id", get(view_car))
}

async fn view_car(
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> Result<Json<ApiResponse<CarResponse>>, AppError> {
    let controller = PublicController::new(state.pool.clone());
    let car = controller.view_car(&public_id, &state.scan_log).await?;

    Ok(Json(ApiResponse::success(CarResponse::from_car(
        car,
        &state.config.base_url,
    ))))
}
