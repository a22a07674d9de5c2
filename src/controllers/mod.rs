pub mod auth_controller;
pub mod car_controller;
pub mod public_controller;
