// src/cli/handlers/mod.rs

pub mod activate;
pub mod manifest;
