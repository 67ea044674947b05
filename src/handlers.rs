use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use axum_extra::extract::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::aggregate::ScheduleOverview;
use crate::auth::verify_token;
use crate::error::ApiError;
use crate::models::{
    AttendanceInput, ClassTemplateInput, ClassTemplateRecord, DayOffInput, TrainerRecord,
};
use crate::validation::validate_class_input;
use crate::AppState;

type AuthHeader = Option<TypedHeader<Authorization<Bearer>>>;

#[derive(Debug, Deserialize)]
pub struct AdminQuery {
    pub token: Option<String>,
    /// Reference day for aggregation; defaults to the local date.
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReassignInput {
    pub trainer_id: i64,
}

#[derive(Debug, serde::Serialize, ToSchema)]
pub struct TrainerOverviewResponse {
    pub trainer: TrainerRecord,
    #[serde(flatten)]
    pub overview: ScheduleOverview,
}

#[derive(Debug, serde::Serialize, ToSchema)]
pub struct ClassOverviewResponse {
    pub class: ClassTemplateRecord,
    #[serde(flatten)]
    pub overview: ScheduleOverview,
}

fn authorize(state: &AppState, auth: AuthHeader, query: &AdminQuery) -> Result<(), ApiError> {
    let header = auth.map(|TypedHeader(a)| a);
    verify_token(&state.settings, header, query.token.as_deref())
}

fn reference_day(query: &AdminQuery) -> NaiveDate {
    query.today.unwrap_or_else(|| Local::now().date_naive())
}

#[utoipa::path(get, path = "/", tag = "meta")]
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "FitDesk Admin API",
        "endpoints": {
            "/trainers": "Trainer roster and per-trainer schedule views",
            "/classes": "Class template catalog",
            "/schedules/{id}": "Cancel, reassign, attendance"
        }
    }))
}

#[utoipa::path(get, path = "/healthz/live", tag = "meta")]
pub async fn healthz_live() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(get, path = "/healthz/ready", tag = "meta")]
pub async fn healthz_ready() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(
    get,
    path = "/trainers",
    responses((status = 200, description = "Trainer roster", body = [TrainerRecord])),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "trainers"
)]
pub async fn list_trainers(
    State(state): State<AppState>,
    auth: AuthHeader,
    Query(query): Query<AdminQuery>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&state, auth, &query)?;
    let trainers = state.store.list_trainers().await?;
    Ok(Json(trainers))
}

#[utoipa::path(
    get,
    path = "/trainers/{id}/overview",
    params(("id" = i64, Path, description = "Trainer id")),
    responses(
        (status = 200, description = "Aggregated schedule view", body = TrainerOverviewResponse),
        (status = 404, description = "Unknown trainer")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "trainers"
)]
pub async fn trainer_overview(
    State(state): State<AppState>,
    auth: AuthHeader,
    Path(id): Path<i64>,
    Query(query): Query<AdminQuery>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&state, auth, &query)?;
    let trainer = state
        .store
        .get_trainer(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("trainer not found".into()))?;
    let overview = state
        .coordinator
        .trainer_overview(id, reference_day(&query))
        .await?;
    Ok(Json(TrainerOverviewResponse { trainer, overview }))
}

#[utoipa::path(
    delete,
    path = "/trainers/{id}",
    params(("id" = i64, Path, description = "Trainer id")),
    responses(
        (status = 200, description = "Refreshed roster after delete", body = [TrainerRecord]),
        (status = 404, description = "Unknown trainer"),
        (status = 409, description = "Trainer still has scheduled classes")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "trainers"
)]
pub async fn delete_trainer(
    State(state): State<AppState>,
    auth: AuthHeader,
    Path(id): Path<i64>,
    Query(query): Query<AdminQuery>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&state, auth, &query)?;
    let roster = state
        .coordinator
        .delete_trainer(id, reference_day(&query))
        .await?;
    Ok(Json(roster))
}

#[utoipa::path(
    get,
    path = "/trainers/{id}/days-off",
    params(("id" = i64, Path, description = "Trainer id")),
    responses((status = 200, description = "Days off within the 90-day window", body = [crate::models::DayOffRecord])),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "days-off"
)]
pub async fn list_days_off(
    State(state): State<AppState>,
    auth: AuthHeader,
    Path(id): Path<i64>,
    Query(query): Query<AdminQuery>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&state, auth, &query)?;
    let days = state
        .coordinator
        .list_days_off(id, reference_day(&query))
        .await?;
    Ok(Json(days))
}

#[utoipa::path(
    post,
    path = "/trainers/{id}/days-off",
    params(("id" = i64, Path, description = "Trainer id")),
    request_body = DayOffInput,
    responses(
        (status = 200, description = "Re-listed window after create", body = [crate::models::DayOffRecord]),
        (status = 404, description = "Unknown trainer")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "days-off"
)]
pub async fn add_day_off(
    State(state): State<AppState>,
    auth: AuthHeader,
    Path(id): Path<i64>,
    Query(query): Query<AdminQuery>,
    Json(input): Json<DayOffInput>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&state, auth, &query)?;
    let days = state
        .coordinator
        .add_day_off(id, &input, reference_day(&query))
        .await?;
    Ok(Json(days))
}

#[utoipa::path(
    delete,
    path = "/trainers/{id}/days-off/{day_off_id}",
    params(
        ("id" = i64, Path, description = "Trainer id"),
        ("day_off_id" = i64, Path, description = "Day-off id")
    ),
    responses((status = 200, description = "Re-listed window after delete", body = [crate::models::DayOffRecord])),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "days-off"
)]
pub async fn remove_day_off(
    State(state): State<AppState>,
    auth: AuthHeader,
    Path((id, day_off_id)): Path<(i64, i64)>,
    Query(query): Query<AdminQuery>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&state, auth, &query)?;
    let days = state
        .coordinator
        .remove_day_off(id, day_off_id, reference_day(&query))
        .await?;
    Ok(Json(days))
}

#[utoipa::path(
    get,
    path = "/trainers/{id}/schedule.ical",
    params(("id" = i64, Path, description = "Trainer id")),
    responses(
        (status = 200, description = "Upcoming schedule as iCal", content_type = "text/calendar"),
        (status = 404, description = "Unknown trainer or no upcoming classes")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "trainers"
)]
pub async fn trainer_ical(
    State(state): State<AppState>,
    auth: AuthHeader,
    Path(id): Path<i64>,
    Query(query): Query<AdminQuery>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&state, auth, &query)?;
    let trainer = state
        .store
        .get_trainer(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("trainer not found".into()))?;
    let overview = state
        .coordinator
        .trainer_overview(id, reference_day(&query))
        .await?;
    if overview.upcoming_schedules.is_empty() {
        return Err(ApiError::NotFound("No upcoming classes".into()));
    }

    let body = state
        .exporter
        .generate(&trainer.name, &overview.upcoming_schedules);
    Ok((
        StatusCode::OK,
        [
            ("content-type", "text/calendar"),
            (
                "content-disposition",
                "attachment; filename=trainer_schedule.ics",
            ),
        ],
        body,
    ))
}

#[utoipa::path(
    get,
    path = "/classes",
    responses((status = 200, description = "Class template catalog", body = [ClassTemplateRecord])),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "classes"
)]
pub async fn list_classes(
    State(state): State<AppState>,
    auth: AuthHeader,
    Query(query): Query<AdminQuery>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&state, auth, &query)?;
    let classes = state.store.list_classes().await?;
    Ok(Json(classes))
}

#[utoipa::path(
    post,
    path = "/classes",
    request_body = ClassTemplateInput,
    responses(
        (status = 201, description = "Created class template", body = ClassTemplateRecord),
        (status = 400, description = "Invalid form input")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "classes"
)]
pub async fn create_class(
    State(state): State<AppState>,
    auth: AuthHeader,
    Query(query): Query<AdminQuery>,
    Json(input): Json<ClassTemplateInput>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&state, auth, &query)?;
    validate_class_input(&input)?;
    let created = state.coordinator.create_class(&input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    patch,
    path = "/classes/{id}",
    params(("id" = i64, Path, description = "Class template id")),
    request_body = ClassTemplateInput,
    responses(
        (status = 200, description = "Refreshed catalog after edit", body = [ClassTemplateRecord]),
        (status = 400, description = "Invalid form input"),
        (status = 404, description = "Unknown class template")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "classes"
)]
pub async fn update_class(
    State(state): State<AppState>,
    auth: AuthHeader,
    Path(id): Path<i64>,
    Query(query): Query<AdminQuery>,
    Json(input): Json<ClassTemplateInput>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&state, auth, &query)?;
    validate_class_input(&input)?;
    let classes = state.coordinator.update_class(id, &input).await?;
    Ok(Json(classes))
}

#[utoipa::path(
    delete,
    path = "/classes/{id}",
    params(("id" = i64, Path, description = "Class template id")),
    responses(
        (status = 200, description = "Refreshed catalog after delete", body = [ClassTemplateRecord]),
        (status = 404, description = "Unknown class template"),
        (status = 409, description = "Class template still has scheduled occurrences")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "classes"
)]
pub async fn delete_class(
    State(state): State<AppState>,
    auth: AuthHeader,
    Path(id): Path<i64>,
    Query(query): Query<AdminQuery>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&state, auth, &query)?;
    let classes = state
        .coordinator
        .delete_class(id, reference_day(&query))
        .await?;
    Ok(Json(classes))
}

#[utoipa::path(
    get,
    path = "/classes/{id}/overview",
    params(("id" = i64, Path, description = "Class template id")),
    responses(
        (status = 200, description = "Aggregated schedule view", body = ClassOverviewResponse),
        (status = 404, description = "Unknown class template")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "classes"
)]
pub async fn class_overview(
    State(state): State<AppState>,
    auth: AuthHeader,
    Path(id): Path<i64>,
    Query(query): Query<AdminQuery>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&state, auth, &query)?;
    let class = state
        .store
        .get_class(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("class template not found".into()))?;
    let overview = state
        .coordinator
        .class_overview(id, reference_day(&query))
        .await?;
    Ok(Json(ClassOverviewResponse { class, overview }))
}

#[utoipa::path(
    post,
    path = "/schedules/{id}/cancel",
    params(("id" = i64, Path, description = "Schedule id")),
    responses(
        (status = 200, description = "Reloaded trainer view", body = ScheduleOverview),
        (status = 404, description = "Unknown schedule")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "schedules"
)]
pub async fn cancel_schedule(
    State(state): State<AppState>,
    auth: AuthHeader,
    Path(id): Path<i64>,
    Query(query): Query<AdminQuery>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&state, auth, &query)?;
    let overview = state
        .coordinator
        .cancel_schedule(id, reference_day(&query))
        .await?;
    Ok(Json(overview))
}

#[utoipa::path(
    get,
    path = "/schedules/{id}/candidates",
    params(("id" = i64, Path, description = "Schedule id")),
    responses(
        (status = 200, description = "Trainers the schedule can move to", body = [TrainerRecord]),
        (status = 404, description = "Unknown schedule")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "schedules"
)]
pub async fn reassignment_candidates(
    State(state): State<AppState>,
    auth: AuthHeader,
    Path(id): Path<i64>,
    Query(query): Query<AdminQuery>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&state, auth, &query)?;
    let candidates = state.coordinator.reassignment_candidates(id).await?;
    Ok(Json(candidates))
}

#[utoipa::path(
    post,
    path = "/schedules/{id}/reassign",
    params(("id" = i64, Path, description = "Schedule id")),
    request_body = ReassignInput,
    responses(
        (status = 200, description = "Reloaded view of the previous trainer", body = ScheduleOverview),
        (status = 400, description = "Target equals current trainer"),
        (status = 404, description = "Unknown schedule or trainer")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "schedules"
)]
pub async fn reassign_schedule(
    State(state): State<AppState>,
    auth: AuthHeader,
    Path(id): Path<i64>,
    Query(query): Query<AdminQuery>,
    Json(input): Json<ReassignInput>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&state, auth, &query)?;
    let overview = state
        .coordinator
        .reassign_schedule(id, input.trainer_id, reference_day(&query))
        .await?;
    Ok(Json(overview))
}

#[utoipa::path(
    get,
    path = "/schedules/{id}/bookings",
    params(("id" = i64, Path, description = "Schedule id")),
    responses((status = 200, description = "Bookings of one occurrence", body = [crate::models::BookingRecord])),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "bookings"
)]
pub async fn schedule_bookings(
    State(state): State<AppState>,
    auth: AuthHeader,
    Path(id): Path<i64>,
    Query(query): Query<AdminQuery>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&state, auth, &query)?;
    let bookings = state.coordinator.schedule_bookings(id).await?;
    Ok(Json(bookings))
}

#[utoipa::path(
    post,
    path = "/bookings/{id}/attendance",
    params(("id" = i64, Path, description = "Booking id")),
    request_body = AttendanceInput,
    responses(
        (status = 200, description = "Re-listed bookings after the patch", body = [crate::models::BookingRecord]),
        (status = 404, description = "Unknown booking")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "bookings"
)]
pub async fn mark_attendance(
    State(state): State<AppState>,
    auth: AuthHeader,
    Path(id): Path<i64>,
    Query(query): Query<AdminQuery>,
    Json(input): Json<AttendanceInput>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&state, auth, &query)?;
    let bookings = state
        .coordinator
        .mark_attendance(id, input.attended)
        .await?;
    Ok(Json(bookings))
}
