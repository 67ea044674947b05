use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle status of a schedule row as stored by the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl ScheduleStatus {
    /// Cancelled occurrences are invisible to every statistic.
    pub fn counts_toward_total(self) -> bool {
        !matches!(self, ScheduleStatus::Cancelled)
    }

    /// Still ahead of the trainer: not yet completed, not cancelled.
    pub fn is_open(self) -> bool {
        matches!(self, ScheduleStatus::Scheduled | ScheduleStatus::InProgress)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScheduleStatus::Scheduled => "scheduled",
            ScheduleStatus::InProgress => "in_progress",
            ScheduleStatus::Completed => "completed",
            ScheduleStatus::Cancelled => "cancelled",
        }
    }
}

/// Class template columns embedded into schedule rows via
/// `select=*,classes(name,duration_min)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ClassRef {
    pub name: String,
    pub duration_min: Option<u32>,
}

/// One concrete occurrence of a class at a specific date and time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ScheduleRecord {
    pub id: i64,
    pub trainer_id: i64,
    pub class_id: i64,
    #[schema(value_type = String, format = "date", example = "2024-06-02")]
    pub date: NaiveDate,
    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,
    pub status: ScheduleStatus,
    #[serde(rename = "classes")]
    pub class: Option<ClassRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct TrainerRecord {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: String,
    pub short_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ClassTemplateRecord {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub duration_min: u32,
    pub capacity: u32,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating or editing a class template.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClassTemplateInput {
    pub name: String,
    pub description: Option<String>,
    pub duration_min: u32,
    pub capacity: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DayOffKind {
    DayOff,
    AnnualLeave,
    SickLeave,
}

/// Trainer unavailability for one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct DayOffRecord {
    pub id: i64,
    pub trainer_id: i64,
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    pub kind: DayOffKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DayOffInput {
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    pub kind: DayOffKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct BookingRecord {
    pub id: i64,
    pub schedule_id: i64,
    pub member_id: i64,
    pub attended: bool,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub checked_in_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceInput {
    pub attended: bool,
}
