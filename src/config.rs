// Environment-driven settings for the server and the HTTP client.
// Call `dotenv::dotenv().ok()` first when a .env file should be honoured.
use log::warn;
use std::env;

use crate::utils::team_storage::StoreSettings;

pub const DEFAULT_ADDRESS: &str = "127.0.0.1:9090";
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:9090/api";

#[derive(Debug, Clone)]
pub struct Config {
    pub address: String,
    pub site_admin_password: Option<String>,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Self {
        let bcrypt_cost = match env::var("BCRYPT_COST") {
            Ok(value) => value.parse().unwrap_or_else(|_| {
                warn!("⚠️ Ignoring invalid BCRYPT_COST: {}", value);
                bcrypt::DEFAULT_COST
            }),
            Err(_) => bcrypt::DEFAULT_COST,
        };

        Config {
            address: env::var("SCHEDULER_ADDRESS").unwrap_or_else(|_| DEFAULT_ADDRESS.to_string()),
            site_admin_password: env::var("SITE_ADMIN_PASSWORD")
                .ok()
                .filter(|password| !password.is_empty()),
            bcrypt_cost,
        }
    }

    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            site_admin_password: self.site_admin_password.clone(),
            bcrypt_cost: self.bcrypt_cost,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let base_url = env::var("SCHEDULER_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        ClientConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}
