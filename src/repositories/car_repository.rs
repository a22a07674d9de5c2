use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::car::Car;
use crate::services::id_allocator::PublicIdIndex;
use crate::utils::errors::{map_insert_error, AppResult};

/// Store de registros de vehículos, tal y como lo consume el workflow de
/// registro. `CarRepository` es la implementación PostgreSQL; los tests
/// del workflow usan un doble en memoria.
#[async_trait]
pub trait CarStore: PublicIdIndex {
    async fn create(
        &self,
        public_id: String,
        unit_number: String,
        owner_name: String,
        car_number: String,
        category: String,
        render_color: String,
    ) -> AppResult<Car>;

    async fn find_by_public_id(&self, public_id: &str) -> AppResult<Option<Car>>;

    async fn find_all(&self) -> AppResult<Vec<Car>>;

    async fn car_number_exists(&self, car_number: &str) -> AppResult<bool>;
}

pub struct CarRepository {
    pool: PgPool,
}

impl CarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CarStore for CarRepository {
    async fn create(
        &self,
        public_id: String,
        unit_number: String,
        owner_name: String,
        car_number: String,
        category: String,
        render_color: String,
    ) -> AppResult<Car> {
        let id = Uuid::new_v4();

        let car = sqlx::query_as::<_, Car>(
            r#"
            INSERT INTO cars (id, public_id, unit_number, owner_name, car_number, category, render_color, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(public_id)
        .bind(unit_number)
        .bind(owner_name)
        .bind(car_number)
        .bind(category)
        .bind(render_color)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_insert_error(
                e,
                &[
                    ("cars_car_number_key", "El número de coche ya está registrado"),
                    ("cars_public_id_key", "El identificador público ya está emitido"),
                ],
            )
        })?;

        Ok(car)
    }

    async fn find_by_public_id(&self, public_id: &str) -> AppResult<Option<Car>> {
        let car = sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE public_id = $1")
            .bind(public_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(car)
    }

    async fn find_all(&self) -> AppResult<Vec<Car>> {
        let cars = sqlx::query_as::<_, Car>("SELECT * FROM cars ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(cars)
    }

    async fn car_number_exists(&self, car_number: &str) -> AppResult<bool> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM cars WHERE car_number = $1)")
                .bind(car_number)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }
}

#[async_trait]
impl PublicIdIndex for CarRepository {
    async fn public_id_exists(&self, public_id: &str) -> AppResult<bool> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM cars WHERE public_id = $1)")
                .bind(public_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }
}
