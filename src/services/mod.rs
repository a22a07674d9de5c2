//! Servicios del sistema
//!
//! Este módulo contiene los servicios de negocio: asignación de
//! identificadores públicos, síntesis de QR y registro de escaneos.

pub mod id_allocator;
pub mod qr_service;
pub mod scan_log;
