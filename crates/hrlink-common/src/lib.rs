//! # hrlink-common
//!
//! Shared utilities including configuration, error handling, session
//! verification, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{Claims, JwtService, JwtSessionVerifier};
pub use config::{
    AppConfig, AppSettings, ConfigError, Environment, JwtConfig, ServerConfig, SweepConfig,
};
pub use error::{AppError, AppResult};
pub use telemetry::{init_tracing, try_init_tracing, TracingConfig, TracingError};
