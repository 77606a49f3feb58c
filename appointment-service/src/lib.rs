//! appointment-service: accepts appointment requests over HTTP, validates
//! them and records them in MongoDB.
pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

pub use startup::{AppState, Application, build_router};
