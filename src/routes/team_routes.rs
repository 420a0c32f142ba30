use crate::models::*;
use crate::routes::respond;
use crate::utils::team_storage::TeamStore;
use actix_web::{delete, get, post, put, web, HttpResponse};
use log::info;

// Full team snapshot: metadata, members, tasks (deleted ones included)
#[get("/team-info/{team_id}/")]
async fn team_info(
    store: web::Data<TeamStore>,
    path: web::Path<TeamId>,
) -> Result<HttpResponse, ServiceError> {
    let team_id = path.into_inner();
    info!("🔍 Fetching team: {}", team_id);

    let snapshot = store.team_info(team_id)?;

    info!(
        "✅ Found team: {} ({} members, {} tasks)",
        team_id,
        snapshot.members.len(),
        snapshot.tasks.len()
    );
    Ok(respond(snapshot))
}

#[post("/add-member/")]
async fn add_member(
    store: web::Data<TeamStore>,
    body: web::Json<AddMemberRequest>,
) -> Result<HttpResponse, ServiceError> {
    info!("👥 Adding member to team: {}", body.team_id);

    let added = store.add_member(&body)?;

    info!("✅ Member {} added to team: {}", added.member_id, body.team_id);
    Ok(respond(added))
}

#[put("/update-member/")]
async fn update_member(
    store: web::Data<TeamStore>,
    body: web::Json<UpdateMemberRequest>,
) -> Result<HttpResponse, ServiceError> {
    info!("✏️ Renaming member: {}", body.member_id);

    let response = store.update_member(&body)?;

    info!("✅ Member renamed: {}", body.member_id);
    Ok(respond(response))
}

#[delete("/delete-member/")]
async fn delete_member(
    store: web::Data<TeamStore>,
    body: web::Json<DeleteMemberRequest>,
) -> Result<HttpResponse, ServiceError> {
    info!("🗑️ Deleting member: {}", body.member_id);

    let response = store.delete_member(&body)?;

    info!("✅ Member deleted: {}", body.member_id);
    Ok(respond(response))
}

#[post("/import-members/")]
async fn import_members(
    store: web::Data<TeamStore>,
    body: web::Json<ImportMembersRequest>,
) -> Result<HttpResponse, ServiceError> {
    info!("📥 Importing members into team: {}", body.team_id);

    let summary = store.import_members(&body)?;

    info!(
        "✅ Imported {} members into team: {} ({} skipped)",
        summary.total_added, body.team_id, summary.skipped
    );
    Ok(respond(summary))
}

#[post("/add-task/")]
async fn add_task(
    store: web::Data<TeamStore>,
    body: web::Json<AddTaskRequest>,
) -> Result<HttpResponse, ServiceError> {
    info!("📝 Adding task to team: {}", body.team_id);

    let added = store.add_task(&body)?;

    info!("✅ Task {} saved for team: {}", added.task_id, body.team_id);
    Ok(respond(added))
}

#[put("/update-task/")]
async fn update_task(
    store: web::Data<TeamStore>,
    body: web::Json<UpdateTaskRequest>,
) -> Result<HttpResponse, ServiceError> {
    info!("✏️ Updating task: {}", body.task_id);

    let response = store.update_task(&body)?;

    info!("✅ Task updated: {}", body.task_id);
    Ok(respond(response))
}

#[delete("/delete-task/")]
async fn delete_task(
    store: web::Data<TeamStore>,
    body: web::Json<TaskActionRequest>,
) -> Result<HttpResponse, ServiceError> {
    info!("🗑️ Soft-deleting task: {}", body.task_id);

    let response = store.delete_task(&body)?;

    info!("✅ Task deleted: {}", body.task_id);
    Ok(respond(response))
}

#[post("/restore-task/")]
async fn restore_task(
    store: web::Data<TeamStore>,
    body: web::Json<TaskActionRequest>,
) -> Result<HttpResponse, ServiceError> {
    info!("♻️ Restoring task: {}", body.task_id);

    let response = store.restore_task(&body)?;

    info!("✅ Task restored: {}", body.task_id);
    Ok(respond(response))
}

#[post("/import-tasks/")]
async fn import_tasks(
    store: web::Data<TeamStore>,
    body: web::Json<ImportTasksRequest>,
) -> Result<HttpResponse, ServiceError> {
    info!("📥 Importing tasks into team: {}", body.team_id);

    let summary = store.import_tasks(&body)?;

    info!(
        "✅ Imported {} tasks into team: {} ({} skipped)",
        summary.total_added, body.team_id, summary.skipped
    );
    Ok(respond(summary))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(team_info)
        .service(add_member)
        .service(update_member)
        .service(delete_member)
        .service(import_members)
        .service(add_task)
        .service(update_task)
        .service(delete_task)
        .service(restore_task)
        .service(import_tasks);
}
