pub mod client;
pub mod config;
pub mod handler;
pub mod repository;
pub mod service;
pub mod telemetry;
