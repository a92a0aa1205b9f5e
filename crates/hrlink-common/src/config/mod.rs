//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, Environment, JwtConfig, ServerConfig, SweepConfig,
};
