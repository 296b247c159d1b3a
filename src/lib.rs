// src/lib.rs

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod play;
pub mod ranking;
pub mod routes;
pub mod state;
pub mod store;
pub mod utils;

pub use routes::create_router;
pub use state::AppState;
