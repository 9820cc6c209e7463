// src/lib.rs

pub mod cache;
pub mod config;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod state;
pub mod templates;
pub mod utils;

pub use routes::create_router;
