use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::aggregate::{DayGroup, ScheduleOverview};
use crate::handlers::{ClassOverviewResponse, ReassignInput, TrainerOverviewResponse};
use crate::models::{
    AttendanceInput, BookingRecord, ClassRef, ClassTemplateInput, ClassTemplateRecord, DayOffInput,
    DayOffKind, DayOffRecord, ScheduleRecord, ScheduleStatus, TrainerRecord,
};

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .build(),
            ),
        );
        components.add_security_scheme(
            "query_token",
            SecurityScheme::ApiKey(ApiKey::Query(ApiKeyValue::new("token"))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz_live,
        crate::handlers::healthz_ready,
        crate::handlers::list_trainers,
        crate::handlers::trainer_overview,
        crate::handlers::delete_trainer,
        crate::handlers::list_days_off,
        crate::handlers::add_day_off,
        crate::handlers::remove_day_off,
        crate::handlers::trainer_ical,
        crate::handlers::list_classes,
        crate::handlers::create_class,
        crate::handlers::update_class,
        crate::handlers::delete_class,
        crate::handlers::class_overview,
        crate::handlers::cancel_schedule,
        crate::handlers::reassignment_candidates,
        crate::handlers::reassign_schedule,
        crate::handlers::schedule_bookings,
        crate::handlers::mark_attendance
    ),
    components(schemas(
        TrainerRecord,
        ClassRef,
        ClassTemplateRecord,
        ClassTemplateInput,
        ScheduleRecord,
        ScheduleStatus,
        ScheduleOverview,
        DayGroup,
        DayOffRecord,
        DayOffInput,
        DayOffKind,
        BookingRecord,
        AttendanceInput,
        ReassignInput,
        TrainerOverviewResponse,
        ClassOverviewResponse
    )),
    tags(
        (name = "trainers", description = "Trainer roster and schedule views"),
        (name = "classes", description = "Class template catalog"),
        (name = "schedules", description = "Cancel and reassignment workflows"),
        (name = "days-off", description = "Trainer availability"),
        (name = "bookings", description = "Attendance tracking")
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;
