//! Runtime configuration for schedule generation.

pub mod schedule;

use thiserror::Error;

use crate::errors::DomainError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {message}")]
    Env { message: String },
    #[error("Invalid schedule configuration: {0}")]
    Invalid(#[from] DomainError),
}

impl ConfigError {
    pub fn env(message: impl Into<String>) -> Self {
        Self::Env {
            message: message.into(),
        }
    }
}
