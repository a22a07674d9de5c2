pub mod auth_routes;
pub mod car_routes;
pub mod public_routes;
