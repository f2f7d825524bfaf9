use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use database::{common::RetryConfig, mongodb::MongoConfig};

pub use core_config::Environment;

/// Application configuration, composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub retry: RetryConfig,
    pub server: ServerConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();

        let mongodb = MongoConfig::from_env()?;
        let mongodb = match mongodb.app_name {
            Some(_) => mongodb,
            None => mongodb.with_app_name(env!("CARGO_PKG_NAME")),
        };

        Ok(Self {
            app: app_info!(),
            mongodb,
            retry: RetryConfig::from_env()?,
            server: ServerConfig::from_env()?,
            environment,
        })
    }
}
