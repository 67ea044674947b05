pub mod aggregate;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod ical;
pub mod models;
pub mod openapi;
pub mod settings;
pub mod store;
pub mod validation;
pub mod workflows;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{
    add_day_off, cancel_schedule, class_overview, create_class, delete_class, delete_trainer,
    healthz_live, healthz_ready, list_classes, list_days_off, list_trainers, mark_attendance,
    reassign_schedule, reassignment_candidates, remove_day_off, root, schedule_bookings,
    trainer_ical, trainer_overview, update_class,
};
use crate::ical::ScheduleExporter;
use crate::openapi::ApiDoc;
use crate::settings::Settings;
use crate::store::DataStore;
use crate::workflows::Coordinator;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub store: Arc<DataStore>,
    pub coordinator: Coordinator,
    pub exporter: Arc<ScheduleExporter>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let store = Arc::new(DataStore::new(
            settings.store_base_url.clone(),
            settings.store_api_key.clone(),
        ));
        Self {
            coordinator: Coordinator::new(store.clone()),
            exporter: Arc::new(ScheduleExporter::new(settings.calendar_name.clone())),
            store,
            settings,
        }
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let env_filter = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .without_time()
        .init();

    let state = AppState::new(settings);

    let app = build_router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], state.settings.port));
    info!("Starting FitDesk Admin API on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    let mut router = Router::new()
        .route("/", get(root))
        .route("/healthz/live", get(healthz_live))
        .route("/healthz/ready", get(healthz_ready))
        .route("/trainers", get(list_trainers))
        .route("/trainers/{id}", delete(delete_trainer))
        .route("/trainers/{id}/overview", get(trainer_overview))
        .route(
            "/trainers/{id}/days-off",
            get(list_days_off).post(add_day_off),
        )
        .route("/trainers/{id}/days-off/{day_off_id}", delete(remove_day_off))
        .route("/trainers/{id}/schedule.ical", get(trainer_ical))
        .route("/classes", get(list_classes).post(create_class))
        .route(
            "/classes/{id}",
            patch(update_class).delete(delete_class),
        )
        .route("/classes/{id}/overview", get(class_overview))
        .route("/schedules/{id}/cancel", post(cancel_schedule))
        .route("/schedules/{id}/candidates", get(reassignment_candidates))
        .route("/schedules/{id}/reassign", post(reassign_schedule))
        .route("/schedules/{id}/bookings", get(schedule_bookings))
        .route("/bookings/{id}/attendance", post(mark_attendance))
        .with_state(state.clone());

    if state.settings.enable_swagger {
        let openapi = ApiDoc::openapi();
        let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi);
        router = router.merge(swagger);
    }

    router.layer(trace_layer)
}
