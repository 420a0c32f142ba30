// src/routes/mod.rs
pub mod auth_routes;
pub mod schedule_routes;
pub mod team_routes;

use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::models::{ServiceError, Success};

// Every endpoint lives under /api/ with a trailing slash
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(auth_routes::init_routes)
            .configure(team_routes::init_routes)
            .configure(schedule_routes::init_routes),
    );
}

// Malformed bodies (and out-of-range counts or slots) become a 400 with the serde message
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        ServiceError::BadRequest(format!("Invalid request body: {}", err)).into()
    })
}

pub(crate) fn respond<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(Success::new(data))
}
