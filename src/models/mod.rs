// src/models/mod.rs

pub mod game;
pub mod player;
pub mod question;
pub mod result;
pub mod session;
