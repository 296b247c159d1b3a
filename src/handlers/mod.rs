// src/handlers/mod.rs

pub mod games;
pub mod player;
pub mod results;
pub mod sessions;
