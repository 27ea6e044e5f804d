//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthorizationSettings, CacheSettings, LogFormat, LoggingConfig,
    RegistrationSettings, StorageSettings,
};
