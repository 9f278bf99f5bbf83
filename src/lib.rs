// src/lib.rs

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod report;
pub mod routes;
pub mod state;
pub mod store;
pub mod utils;

// Re-export specific items for convenience if needed
pub use models::FormModel;
pub use routes::create_router;
