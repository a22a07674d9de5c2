//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores y JWT.

pub mod errors;
pub mod jwt;
