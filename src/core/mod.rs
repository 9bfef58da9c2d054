// src/core/mod.rs

pub mod activation;
pub mod catalog;
pub mod env_files;
pub mod manifest;
pub mod platform;
pub mod selector;
pub mod version;
