use crate::models::{AdminLoginRequest, CreateTeamRequest, ServiceError};
use crate::routes::respond;
use crate::utils::team_storage::TeamStore;
use actix_web::{post, web, HttpResponse};
use log::info;

// Check the site admin password
#[post("/admin-login/")]
async fn admin_login(
    store: web::Data<TeamStore>,
    body: web::Json<AdminLoginRequest>,
) -> Result<HttpResponse, ServiceError> {
    info!("🔑 Site admin login request");

    let response = store.admin_login(&body)?;

    info!("✅ Site admin signed in");
    Ok(respond(response))
}

// Create a team and hand out its two passwords
#[post("/create-team/")]
async fn create_team(
    store: web::Data<TeamStore>,
    body: web::Json<CreateTeamRequest>,
) -> Result<HttpResponse, ServiceError> {
    info!("📝 Creating new team: {}", body.name);

    let created = store.create_team(&body)?;

    info!("✅ Team created successfully: {}", created.team_id);
    Ok(respond(created))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(admin_login).service(create_team);
}
