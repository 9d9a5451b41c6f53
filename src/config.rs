use std::time::Duration;

/// Which storage backend to run against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// Startup configuration, read from the environment exactly once.
#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub backend: StoreBackend,
    pub database_url: Option<String>,
    pub cleanup_interval: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .expect("env PORT")
            .parse::<u16>()
            .expect("PORT must be a port number");

        let backend = match std::env::var("STORE_BACKEND") {
            Ok(value) if value == "memory" => StoreBackend::Memory,
            _ => StoreBackend::Postgres,
        };

        let database_url = match backend {
            StoreBackend::Postgres => Some(std::env::var("DATABASE_URL").expect("env DATABASE_URL")),
            StoreBackend::Memory => None,
        };

        let cleanup_interval = std::env::var("CLEANUP_INTERVAL")
            .unwrap_or("2700".to_string())
            .parse::<u64>()
            .expect("CLEANUP_INTERVAL must be a positive integer");

        Config {
            port,
            backend,
            database_url,
            cleanup_interval: Duration::from_secs(cleanup_interval),
        }
    }
}
