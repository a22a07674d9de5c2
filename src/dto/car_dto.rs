use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::car::Car;

// Request para registrar un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterCarRequest {
    #[validate(length(min = 1, max = 50))]
    pub unit_number: String,

    #[validate(length(min = 1, max = 100))]
    pub owner_name: String,

    #[validate(length(min = 1, max = 20))]
    pub car_number: String,

    pub category: String,
}

/// Response de vehículo para la API
#[derive(Debug, Serialize)]
pub struct CarResponse {
    pub id: String,
    pub public_id: String,
    pub unit_number: String,
    pub owner_name: String,
    pub car_number: String,
    pub category: String,
    pub render_color: String,
    /// URL destino del QR: `<base_url>/car/<public_id>`
    pub qr_url: String,
    pub created_at: DateTime<Utc>,
}

impl CarResponse {
    pub fn from_car(car: Car, base_url: &str) -> Self {
        Self {
            id: car.id.to_string(),
            qr_url: format!("{}/car/{}", base_url, car.public_id),
            public_id: car.public_id,
            unit_number: car.unit_number,
            owner_name: car.owner_name,
            car_number: car.car_number,
            category: car.category,
            render_color: car.render_color,
            created_at: car.created_at,
        }
    }
}

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}
