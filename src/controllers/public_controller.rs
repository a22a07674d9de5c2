use sqlx::PgPool;

use crate::controllers::car_controller::CarController;
use crate::models::car::Car;
use crate::services::scan_log::{ScanEvent, ScanLog};
use crate::utils::errors::AppError;

/// Controller de la página pública de detalles de vehículo (el destino de
/// los QR). No requiere autenticación.
pub struct PublicController {
    cars: CarController,
}

impl PublicController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            cars: CarController::new(pool),
        }
    }

    /// Resolver un public_id a su vehículo y registrar el escaneo.
    /// El registro del escaneo es fire-and-forget: un fallo del sink no
    /// afecta a la respuesta.
    pub async fn view_car(&self, public_id: &str, scan_log: &ScanLog) -> Result<Car, AppError> {
        let car = self.cars.get_by_public_id(public_id).await?;

        scan_log.record(ScanEvent::now(
            car.car_number.clone(),
            car.owner_name.clone(),
            car.unit_number.clone(),
        ));

        Ok(car)
    }
}
