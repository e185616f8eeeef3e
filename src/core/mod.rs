pub mod app;
pub mod config;
pub mod message;
pub mod metrics;
pub mod routing;
pub mod transcript;
pub mod turn_service;
