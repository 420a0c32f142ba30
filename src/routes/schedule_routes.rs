use crate::models::{
    GenerateScheduleRequest, ScheduleForDateRequest, ServiceError, TaskDetailsRequest,
};
use crate::routes::respond;
use crate::utils::team_storage::TeamStore;
use actix_web::{post, web, HttpResponse};
use log::info;

#[post("/generate-schedule/")]
async fn generate_schedule(
    store: web::Data<TeamStore>,
    body: web::Json<GenerateScheduleRequest>,
) -> Result<HttpResponse, ServiceError> {
    info!("📅 Generating schedule for team: {} on {}", body.team_id, body.date);

    let response = store.generate_schedule(&body)?;

    info!("✅ Schedule generated for team: {} on {}", body.team_id, body.date);
    Ok(respond(response))
}

// Viewer access: the team is found by its viewer password
#[post("/get-schedule-for-date/")]
async fn get_schedule_for_date(
    store: web::Data<TeamStore>,
    body: web::Json<ScheduleForDateRequest>,
) -> Result<HttpResponse, ServiceError> {
    info!("📋 Fetching schedule for {}", body.date);

    let day = store.schedule_for_date(&body)?;

    info!(
        "✅ Found {} entries for team: {} on {}",
        day.schedules.len(),
        day.team_id,
        day.date
    );
    Ok(respond(day))
}

#[post("/get-task-details/")]
async fn get_task_details(
    store: web::Data<TeamStore>,
    body: web::Json<TaskDetailsRequest>,
) -> Result<HttpResponse, ServiceError> {
    info!("🔍 Fetching task details: {}", body.task_id);

    let details = store.task_details(&body)?;

    info!("✅ Found task: {}", body.task_id);
    Ok(respond(details))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(generate_schedule)
        .service(get_schedule_for_date)
        .service(get_task_details);
}
