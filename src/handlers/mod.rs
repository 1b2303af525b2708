// src/handlers/mod.rs
pub mod error;
pub mod evaluate;
pub mod truth;
