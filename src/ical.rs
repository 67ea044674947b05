use chrono::{Duration, NaiveDateTime};
use icalendar::{Calendar, Component, Event, EventLike};

use crate::models::ScheduleRecord;

/// Renders a trainer's upcoming schedule as an iCal feed.
#[derive(Clone, Default)]
pub struct ScheduleExporter {
    calendar_name: String,
}

impl ScheduleExporter {
    pub fn new(calendar_name: String) -> Self {
        Self { calendar_name }
    }

    pub fn generate(&self, trainer_name: &str, schedules: &[ScheduleRecord]) -> Vec<u8> {
        if schedules.is_empty() {
            return Vec::new();
        }

        let mut calendar = Calendar::new();
        calendar.name(&self.calendar_name);

        for item in schedules {
            let class_name = item
                .class
                .as_ref()
                .map(|c| c.name.as_str())
                .unwrap_or("Class");
            let duration = item
                .class
                .as_ref()
                .and_then(|c| c.duration_min)
                .unwrap_or(60);

            let start = NaiveDateTime::new(item.date, item.start_time);
            let mut event = Event::new();
            event.summary(class_name);
            event.starts(start);
            event.ends(start + Duration::minutes(duration as i64));
            event.description(&format!("Trainer: {trainer_name}"));
            event.uid(&format!("schedule-{}-fitdesk", item.id));
            calendar.push(event);
        }

        calendar.to_string().into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::*;
    use crate::models::{ClassRef, ScheduleStatus};

    #[test]
    fn test_generate_single_schedule() {
        let exporter = ScheduleExporter::new("FitDesk Trainer Schedule".into());
        let schedule = ScheduleRecord {
            id: 7,
            trainer_id: 1,
            class_id: 10,
            date: NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            status: ScheduleStatus::Scheduled,
            class: Some(ClassRef {
                name: "Spin".into(),
                duration_min: Some(45),
            }),
        };
        let bytes = exporter.generate("Alex", &[schedule]);
        let body = String::from_utf8(bytes).unwrap();
        assert!(body.contains("BEGIN:VEVENT"));
        assert!(body.contains("Spin"));
        assert!(body.contains("Trainer: Alex"));
    }

    #[test]
    fn test_generate_empty() {
        let exporter = ScheduleExporter::new("FitDesk Trainer Schedule".into());
        assert!(exporter.generate("Alex", &[]).is_empty());
    }
}
