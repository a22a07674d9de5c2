use sqlx::PgPool;

use crate::dto::car_dto::{ApiResponse, CarResponse, RegisterCarRequest};
use crate::models::car::{Car, CarCategory};
use crate::repositories::car_repository::{CarRepository, CarStore};
use crate::services::id_allocator::allocate_public_id;
use crate::services::qr_service::QrService;
use crate::utils::errors::AppError;

/// Lado en píxeles de los QR generados para descarga
const QR_SIZE_PX: u32 = 300;

/// Workflow de registro y consulta de vehículos. Genérico sobre el store
/// para poder ejercitarlo contra un doble en memoria; en producción
/// siempre es `CarRepository`.
pub struct CarController<S = CarRepository> {
    repository: S,
}

impl CarController<CarRepository> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: CarRepository::new(pool),
        }
    }
}

impl<S: CarStore> CarController<S> {
    pub fn with_store(repository: S) -> Self {
        Self { repository }
    }

    /// Registrar un vehículo: validar, comprobar unicidad, asignar
    /// public_id, derivar color y persistir en un único INSERT.
    pub async fn register(
        &self,
        request: RegisterCarRequest,
        base_url: &str,
    ) -> Result<ApiResponse<CarResponse>, AppError> {
        // Validar campos
        if request.unit_number.trim().is_empty() {
            return Err(AppError::Validation("El número de unidad es requerido".to_string()));
        }

        if request.owner_name.trim().is_empty() {
            return Err(AppError::Validation("El nombre del propietario es requerido".to_string()));
        }

        if request.car_number.trim().is_empty() {
            return Err(AppError::Validation("El número de coche es requerido".to_string()));
        }

        let category: CarCategory = request
            .category
            .parse()
            .map_err(AppError::Validation)?;

        // Rechazo temprano de duplicados; la constraint UNIQUE cubre la
        // ventana entre este check y el INSERT
        if self.repository.car_number_exists(&request.car_number).await? {
            return Err(AppError::Conflict("El número de coche ya está registrado".to_string()));
        }

        let public_id = allocate_public_id(&self.repository).await?;
        let render_color = category.render_color().to_string();

        let car = self
            .repository
            .create(
                public_id,
                request.unit_number,
                request.owner_name,
                request.car_number,
                category.as_str().to_string(),
                render_color,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            CarResponse::from_car(car, base_url),
            "Vehículo registrado exitosamente".to_string(),
        ))
    }

    pub async fn list(&self, base_url: &str) -> Result<Vec<CarResponse>, AppError> {
        let cars = self.repository.find_all().await?;

        Ok(cars
            .into_iter()
            .map(|car| CarResponse::from_car(car, base_url))
            .collect())
    }

    pub async fn get_by_public_id(&self, public_id: &str) -> Result<Car, AppError> {
        self.repository
            .find_by_public_id(public_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))
    }

    /// Generar los bytes PNG del QR de un vehículo. La URL codificada es la
    /// página pública del vehículo y el color el que quedó fijado al
    /// registrarlo.
    pub async fn qr_png(
        &self,
        public_id: &str,
        qr: &QrService,
        base_url: &str,
    ) -> Result<(Vec<u8>, String), AppError> {
        let car = self.get_by_public_id(public_id).await?;

        let qr_url = format!("{}/car/{}", base_url, car.public_id);
        let png = qr.synthesize(&qr_url, &car.render_color, QR_SIZE_PX)?;

        Ok((png, car.car_number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::id_allocator::PublicIdIndex;
    use crate::utils::errors::AppResult;
    use async_trait::async_trait;
    use chrono::Utc;
    use tokio::sync::Mutex;
    use uuid::Uuid;

    const BASE_URL: &str = "http://localhost:8080";

    /// Doble en memoria del store. Replica el comportamiento del backstop
    /// de la base de datos: el INSERT rechaza duplicados aunque el
    /// pre-check no los haya visto.
    #[derive(Default)]
    struct InMemoryCarStore {
        cars: Mutex<Vec<Car>>,
        /// Simula la ventana check-then-insert: el pre-check no ve nada
        /// pero el INSERT sí colisiona
        blind_precheck: bool,
    }

    #[async_trait]
    impl PublicIdIndex for InMemoryCarStore {
        async fn public_id_exists(&self, public_id: &str) -> Result<bool, AppError> {
            Ok(self
                .cars
                .lock()
                .await
                .iter()
                .any(|c| c.public_id == public_id))
        }
    }

    #[async_trait]
    impl CarStore for InMemoryCarStore {
        async fn create(
            &self,
            public_id: String,
            unit_number: String,
            owner_name: String,
            car_number: String,
            category: String,
            render_color: String,
        ) -> AppResult<Car> {
            let mut cars = self.cars.lock().await;

            if cars.iter().any(|c| c.car_number == car_number) {
                return Err(AppError::Conflict(
                    "El número de coche ya está registrado".to_string(),
                ));
            }
            if cars.iter().any(|c| c.public_id == public_id) {
                return Err(AppError::Conflict(
                    "El identificador público ya está emitido".to_string(),
                ));
            }

            let car = Car {
                id: Uuid::new_v4(),
                public_id,
                unit_number,
                owner_name,
                car_number,
                category,
                render_color,
                created_at: Utc::now(),
            };
            cars.push(car.clone());
            Ok(car)
        }

        async fn find_by_public_id(&self, public_id: &str) -> AppResult<Option<Car>> {
            Ok(self
                .cars
                .lock()
                .await
                .iter()
                .find(|c| c.public_id == public_id)
                .cloned())
        }

        async fn find_all(&self) -> AppResult<Vec<Car>> {
            Ok(self.cars.lock().await.clone())
        }

        async fn car_number_exists(&self, car_number: &str) -> AppResult<bool> {
            if self.blind_precheck {
                return Ok(false);
            }
            Ok(self
                .cars
                .lock()
                .await
                .iter()
                .any(|c| c.car_number == car_number))
        }
    }

    fn request(category: &str) -> RegisterCarRequest {
        RegisterCarRequest {
            unit_number: "12A".to_string(),
            owner_name: "J. Smith".to_string(),
            car_number: "ABC-123".to_string(),
            category: category.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_owner_end_to_end() {
        let controller = CarController::with_store(InMemoryCarStore::default());

        let response = controller.register(request("Owner"), BASE_URL).await.unwrap();
        assert!(response.success);

        let car = response.data.unwrap();
        assert_eq!(car.render_color, "#00008B");
        assert_eq!(car.category, "Owner");
        assert_eq!(car.public_id.len(), 8);
        assert!(car.public_id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(car.qr_url, format!("{}/car/{}", BASE_URL, car.public_id));

        // El registro se recupera por su public_id
        let fetched = controller.get_by_public_id(&car.public_id).await.unwrap();
        assert_eq!(fetched.car_number, "ABC-123");
        assert_eq!(fetched.owner_name, "J. Smith");
        assert_eq!(fetched.unit_number, "12A");
    }

    #[tokio::test]
    async fn test_register_duplicate_car_number_conflict() {
        let controller = CarController::with_store(InMemoryCarStore::default());

        controller.register(request("Owner"), BASE_URL).await.unwrap();

        let mut second = request("Tenant");
        second.unit_number = "3B".to_string();
        second.owner_name = "M. García".to_string();

        let result = controller.register(second, BASE_URL).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        // Queda exactamente un registro
        let cars = controller.list(BASE_URL).await.unwrap();
        assert_eq!(cars.len(), 1);
        assert_eq!(cars[0].render_color, "#00008B");
    }

    #[tokio::test]
    async fn test_register_store_backstop_surfaces_conflict() {
        // El pre-check pierde la carrera; la colisión del INSERT llega al
        // caller como el mismo Conflict
        let store = InMemoryCarStore {
            blind_precheck: true,
            ..Default::default()
        };
        let controller = CarController::with_store(store);

        controller.register(request("Owner"), BASE_URL).await.unwrap();

        let result = controller.register(request("Tenant"), BASE_URL).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        let cars = controller.list(BASE_URL).await.unwrap();
        assert_eq!(cars.len(), 1);
    }

    #[tokio::test]
    async fn test_register_rejects_unknown_category() {
        let controller = CarController::with_store(InMemoryCarStore::default());

        let result = controller.register(request("Visitor"), BASE_URL).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        // No se persistió nada
        assert!(controller.list(BASE_URL).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_rejects_empty_fields() {
        let controller = CarController::with_store(InMemoryCarStore::default());

        let mut req = request("Owner");
        req.car_number = "   ".to_string();

        let result = controller.register(req, BASE_URL).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
