pub mod dto;
pub mod models;
pub mod repositories;
pub mod services;
