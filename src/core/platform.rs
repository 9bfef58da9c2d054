// src/core/platform.rs

use thiserror::Error;

use crate::models::{Architecture, OperatingSystem};

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("The operating system '{0}' is not supported.")]
    UnsupportedOperatingSystem(String),
    #[error("The processor architecture '{0}' is not supported.")]
    UnsupportedArchitecture(String),
}

impl OperatingSystem {
    /// The operating system this process is running on.
    pub fn current() -> Result<Self, PlatformError> {
        if cfg!(target_os = "linux") {
            Ok(Self::Linux)
        } else if cfg!(target_os = "macos") {
            Ok(Self::MacOS)
        } else if cfg!(target_os = "windows") {
            Ok(Self::Windows)
        } else {
            Err(PlatformError::UnsupportedOperatingSystem(
                std::env::consts::OS.to_string(),
            ))
        }
    }
}

impl Architecture {
    /// The processor architecture this process is running on.
    pub fn current() -> Result<Self, PlatformError> {
        if cfg!(target_arch = "x86_64") {
            Ok(Self::x64)
        } else if cfg!(target_arch = "x86") {
            Ok(Self::x86)
        } else if cfg!(target_arch = "aarch64") {
            Ok(Self::ARM64)
        } else if cfg!(target_arch = "arm") {
            Ok(Self::ARM)
        } else {
            Err(PlatformError::UnsupportedArchitecture(
                std::env::consts::ARCH.to_string(),
            ))
        }
    }
}
