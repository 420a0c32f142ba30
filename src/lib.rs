pub mod client;
pub mod config;
pub mod import;
pub mod models;
pub mod routes;
pub mod schedule_view;
pub mod screens;
pub mod session;
pub mod utils;


use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{middleware, web, App, HttpServer};
use std::io;
use std::net::SocketAddr;

use crate::utils::team_storage::TeamStore;

/// Registers the store, the JSON error handler and every `/api/` route.
pub fn configure_app(store: TeamStore) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(store))
            .app_data(routes::json_config())
            .configure(routes::init_routes);
    }
}

/// Binds the API on `address` and returns the server future with the bound address.
/// Passing port 0 picks a free port.
pub fn run_server(store: TeamStore, address: &str) -> io::Result<(Server, SocketAddr)> {
    let server = HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .configure(configure_app(store.clone()))
    })
    .bind(address)?;

    let bound = server.addrs().first().copied().ok_or_else(|| {
        io::Error::new(io::ErrorKind::AddrNotAvailable, "server is not bound to any address")
    })?;

    Ok((server.run(), bound))
}
