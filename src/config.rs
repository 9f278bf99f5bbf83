// src/config.rs

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use dotenvy::dotenv;

/// `DATABASE_URL` value that keeps everything in process memory.
pub const MEMORY_STORE: &str = "memory";

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite URL, or `memory`.
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub rust_log: String,
    /// Directory with the browser front-end, served for unmatched paths.
    pub static_dir: Option<PathBuf>,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://formkit.db?mode=rwc".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .expect("BIND_ADDR must be a socket address like 127.0.0.1:3000");

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let static_dir = env::var("STATIC_DIR").ok().map(PathBuf::from);

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| {
                vec![
                    "http://localhost:3000".to_string(),
                    "http://127.0.0.1:3000".to_string(),
                ]
            });

        Self {
            database_url,
            bind_addr,
            rust_log,
            static_dir,
            cors_origins,
        }
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url == MEMORY_STORE
    }
}
