use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub store_url: String,
    pub store_key: String,
    pub admin_email: String,
    pub admin_password: String,
    pub admin_token: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("WORKKERZ_PORT", "3001"),
            store_url: try_load("STORE_URL", "http://localhost:54321"),
            store_key: read_secret("STORE_SERVICE_KEY"),
            admin_email: read_secret("ADMIN_EMAIL"),
            admin_password: read_secret("ADMIN_PASSWORD"),
            admin_token: read_secret("ADMIN_TOKEN"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn read_secret(secret_name: &str) -> String {
    if let Ok(value) = env::var(secret_name) {
        return value;
    }

    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from file: {e}");
        })
        .expect("Secrets misconfigured!")
}
