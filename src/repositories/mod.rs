pub mod admin_repository;
pub mod car_repository;
