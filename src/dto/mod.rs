pub mod auth_dto;
pub mod car_dto;
