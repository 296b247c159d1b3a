// src/utils/mod.rs

pub mod html;
pub mod rng;
pub mod share_code;
