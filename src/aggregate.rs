use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::ScheduleRecord;

/// All schedules of one calendar day, time-ascending.
#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
pub struct DayGroup {
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    pub label: String,
    pub schedules: Vec<ScheduleRecord>,
}

/// Derived view of a trainer's or class template's schedule rows.
#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
pub struct ScheduleOverview {
    /// Occurrences with status scheduled, in_progress or completed.
    pub total: usize,
    /// Open occurrences dated today or later.
    pub upcoming: usize,
    pub upcoming_schedules: Vec<ScheduleRecord>,
    /// Every input record, bucketed by date, dates ascending.
    pub days: Vec<DayGroup>,
}

/// Header label for a date bucket, relative to the reference day.
pub fn date_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if date == today + Duration::days(1) {
        "Tomorrow".to_string()
    } else {
        date.format("%A, %b %-d").to_string()
    }
}

/// Turns a flat list of schedule rows into the grouped, stat-annotated
/// view the admin screens render. Pure: input order is irrelevant, empty
/// input yields an empty overview.
pub fn aggregate(records: &[ScheduleRecord], today: NaiveDate) -> ScheduleOverview {
    let total = records
        .iter()
        .filter(|r| r.status.counts_toward_total())
        .count();

    let mut upcoming_schedules: Vec<ScheduleRecord> = records
        .iter()
        .filter(|r| r.status.is_open() && r.date >= today)
        .cloned()
        .collect();
    upcoming_schedules.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then(a.start_time.cmp(&b.start_time))
            .then(a.id.cmp(&b.id))
    });

    let mut buckets: BTreeMap<NaiveDate, Vec<ScheduleRecord>> = BTreeMap::new();
    for record in records {
        buckets.entry(record.date).or_default().push(record.clone());
    }

    let days = buckets
        .into_iter()
        .map(|(date, mut schedules)| {
            schedules.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));
            DayGroup {
                date,
                label: date_label(date, today),
                schedules,
            }
        })
        .collect();

    ScheduleOverview {
        total,
        upcoming: upcoming_schedules.len(),
        upcoming_schedules,
        days,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;
    use crate::models::ScheduleStatus;

    fn record(id: i64, date: &str, time: &str, status: ScheduleStatus) -> ScheduleRecord {
        ScheduleRecord {
            id,
            trainer_id: 1,
            class_id: 10,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            start_time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
            status,
            class: None,
        }
    }

    fn day(date: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_empty_input() {
        let view = aggregate(&[], day("2024-06-01"));
        assert_eq!(view.total, 0);
        assert_eq!(view.upcoming, 0);
        assert!(view.upcoming_schedules.is_empty());
        assert!(view.days.is_empty());
    }

    #[test]
    fn test_upcoming_excludes_completed_and_cancelled() {
        let records = vec![
            record(1, "2024-06-02", "09:00", ScheduleStatus::Scheduled),
            record(2, "2024-06-02", "10:00", ScheduleStatus::Completed),
            record(3, "2024-06-02", "11:00", ScheduleStatus::Cancelled),
            record(4, "2024-05-31", "09:00", ScheduleStatus::Scheduled),
        ];
        let view = aggregate(&records, day("2024-06-01"));
        // cancelled never counts, past open records are not upcoming
        assert_eq!(view.total, 3);
        assert_eq!(view.upcoming, 1);
        assert_eq!(view.upcoming_schedules[0].id, 1);
    }

    #[test]
    fn test_mixed_past_and_future_records() {
        let records = vec![
            record(1, "2024-06-02", "09:00", ScheduleStatus::Scheduled),
            record(2, "2024-06-01", "18:00", ScheduleStatus::Completed),
        ];
        let view = aggregate(&records, day("2024-06-01"));
        assert_eq!(view.upcoming_schedules.len(), 1);
        assert_eq!(view.upcoming_schedules[0].date, day("2024-06-02"));
        let dates: Vec<NaiveDate> = view.days.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![day("2024-06-01"), day("2024-06-02")]);
    }

    #[test]
    fn test_grouping_partitions_and_sorts() {
        let records = vec![
            record(1, "2024-06-03", "18:00", ScheduleStatus::Scheduled),
            record(2, "2024-06-03", "06:30", ScheduleStatus::Scheduled),
            record(3, "2024-06-02", "12:00", ScheduleStatus::InProgress),
            record(4, "2024-06-03", "09:15", ScheduleStatus::Cancelled),
        ];
        let view = aggregate(&records, day("2024-06-01"));

        let grouped: usize = view.days.iter().map(|d| d.schedules.len()).sum();
        assert_eq!(grouped, records.len());

        for group in &view.days {
            assert!(group.schedules.iter().all(|r| r.date == group.date));
            assert!(
                group
                    .schedules
                    .windows(2)
                    .all(|w| w[0].start_time <= w[1].start_time)
            );
        }
        let times: Vec<i64> = view.days[1].schedules.iter().map(|r| r.id).collect();
        assert_eq!(times, vec![2, 4, 1]);
    }

    #[test]
    fn test_upcoming_sorted_by_date_then_time() {
        let records = vec![
            record(1, "2024-06-05", "08:00", ScheduleStatus::Scheduled),
            record(2, "2024-06-04", "19:00", ScheduleStatus::Scheduled),
            record(3, "2024-06-04", "07:00", ScheduleStatus::InProgress),
        ];
        let view = aggregate(&records, day("2024-06-01"));
        let ids: Vec<i64> = view.upcoming_schedules.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_date_label() {
        let today = day("2024-06-01");
        assert_eq!(date_label(today, today), "Today");
        assert_eq!(date_label(day("2024-06-02"), today), "Tomorrow");
        assert_eq!(date_label(day("2024-06-03"), today), "Monday, Jun 3");
        assert_eq!(date_label(day("2024-05-31"), today), "Friday, May 31");
    }
}
