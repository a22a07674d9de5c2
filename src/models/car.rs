//! Modelo de Car
//!
//! Este módulo contiene el struct Car y la categoría del vehículo con su
//! política de color. Mapea exactamente a la tabla `cars` del schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Categoría del vehículo. Determina el color con el que se renderiza su QR.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CarCategory {
    Tenant,
    Owner,
}

impl CarCategory {
    /// Color de renderizado para la categoría.
    ///
    /// Función pura: Tenant siempre granate, Owner siempre azul oscuro. El
    /// color se guarda en el registro al crearlo, así que los registros
    /// históricos no cambian aunque la política cambie.
    pub fn render_color(&self) -> &'static str {
        match self {
            CarCategory::Tenant => "#800000", // Maroon
            CarCategory::Owner => "#00008B",  // DarkBlue
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CarCategory::Tenant => "Tenant",
            CarCategory::Owner => "Owner",
        }
    }
}

impl fmt::Display for CarCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CarCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Tenant" => Ok(CarCategory::Tenant),
            "Owner" => Ok(CarCategory::Owner),
            other => Err(format!(
                "Categoría inválida: '{}'. Debe ser 'Tenant' u 'Owner'",
                other
            )),
        }
    }
}

/// Car principal - mapea exactamente a la tabla cars
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Car {
    pub id: Uuid,
    /// Token externo de 8 caracteres embebido en la URL del QR.
    /// Inmutable una vez emitido.
    pub public_id: String,
    pub unit_number: String,
    pub owner_name: String,
    pub car_number: String,
    pub category: String,
    pub render_color: String,
    pub created_at: DateTime<Utc>,
}
