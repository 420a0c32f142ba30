//Third-party-dependencies
use dotenv::dotenv;
use env_logger::Env;
use log::{info, warn};

use team_scheduler::config::Config;
use team_scheduler::run_server;
use team_scheduler::utils::team_storage::TeamStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    if config.site_admin_password.is_none() {
        warn!("⚠️ SITE_ADMIN_PASSWORD is not set, site admin login will fail");
    }

    let store = TeamStore::new(config.store_settings());
    let (server, address) = run_server(store, &config.address)?;

    info!("🚀 Server started at http://{}/api/", address);
    server.await
}
