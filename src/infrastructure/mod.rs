pub mod axum_http;
pub mod engines;
pub mod postgres;
pub mod rendering;
pub mod storages;
