use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use futures::future::try_join;
use thiserror::Error;
use tracing::info;

use crate::aggregate::{ScheduleOverview, aggregate};
use crate::models::{
    BookingRecord, ClassTemplateInput, ClassTemplateRecord, DayOffInput, DayOffRecord,
    ScheduleStatus, TrainerRecord,
};
use crate::store::{DataStore, StoreError};

/// Day-off screens only look this far ahead.
pub const DAY_OFF_WINDOW_DAYS: i64 = 90;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("cannot delete: {count} scheduled class(es) still reference this {entity}")]
    DependentSchedules { entity: &'static str, count: usize },
    #[error("schedule already belongs to this trainer")]
    SameTrainer,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Sequences the multi-step mutations behind the admin screens. The
/// remote store stays authoritative: after every mutation the affected
/// view is reloaded in full rather than patched locally.
#[derive(Clone)]
pub struct Coordinator {
    store: Arc<DataStore>,
}

impl Coordinator {
    pub fn new(store: Arc<DataStore>) -> Self {
        Self { store }
    }

    pub async fn trainer_overview(
        &self,
        trainer_id: i64,
        today: NaiveDate,
    ) -> Result<ScheduleOverview, WorkflowError> {
        let records = self.store.trainer_schedules(trainer_id).await?;
        Ok(aggregate(&records, today))
    }

    pub async fn class_overview(
        &self,
        class_id: i64,
        today: NaiveDate,
    ) -> Result<ScheduleOverview, WorkflowError> {
        let records = self.store.class_schedules(class_id).await?;
        Ok(aggregate(&records, today))
    }

    /// Refuses locally while dependent schedules exist; only a clean
    /// trainer is deleted, after which the roster is re-listed.
    pub async fn delete_trainer(
        &self,
        trainer_id: i64,
        today: NaiveDate,
    ) -> Result<Vec<TrainerRecord>, WorkflowError> {
        if self.store.get_trainer(trainer_id).await?.is_none() {
            return Err(WorkflowError::NotFound("trainer"));
        }
        let overview = self.trainer_overview(trainer_id, today).await?;
        if overview.total > 0 {
            return Err(WorkflowError::DependentSchedules {
                entity: "trainer",
                count: overview.total,
            });
        }
        self.store.delete_trainer(trainer_id).await?;
        info!(trainer_id, "trainer deleted");
        Ok(self.store.list_trainers().await?)
    }

    pub async fn delete_class(
        &self,
        class_id: i64,
        today: NaiveDate,
    ) -> Result<Vec<ClassTemplateRecord>, WorkflowError> {
        if self.store.get_class(class_id).await?.is_none() {
            return Err(WorkflowError::NotFound("class template"));
        }
        let overview = self.class_overview(class_id, today).await?;
        if overview.total > 0 {
            return Err(WorkflowError::DependentSchedules {
                entity: "class template",
                count: overview.total,
            });
        }
        self.store.delete_class(class_id).await?;
        info!(class_id, "class template deleted");
        Ok(self.store.list_classes().await?)
    }

    pub async fn create_class(
        &self,
        input: &ClassTemplateInput,
    ) -> Result<ClassTemplateRecord, WorkflowError> {
        Ok(self.store.create_class(input).await?)
    }

    pub async fn update_class(
        &self,
        class_id: i64,
        input: &ClassTemplateInput,
    ) -> Result<Vec<ClassTemplateRecord>, WorkflowError> {
        if self.store.get_class(class_id).await?.is_none() {
            return Err(WorkflowError::NotFound("class template"));
        }
        self.store.update_class(class_id, input).await?;
        Ok(self.store.list_classes().await?)
    }

    /// Marks one occurrence cancelled, then returns its trainer's
    /// reloaded overview. A failed patch leaves the view untouched.
    pub async fn cancel_schedule(
        &self,
        schedule_id: i64,
        today: NaiveDate,
    ) -> Result<ScheduleOverview, WorkflowError> {
        let schedule = self
            .store
            .get_schedule(schedule_id)
            .await?
            .ok_or(WorkflowError::NotFound("schedule"))?;
        self.store
            .set_schedule_status(schedule_id, ScheduleStatus::Cancelled)
            .await?;
        info!(schedule_id, trainer_id = schedule.trainer_id, "schedule cancelled");
        self.trainer_overview(schedule.trainer_id, today).await
    }

    /// Roster minus the schedule's current owner.
    pub async fn reassignment_candidates(
        &self,
        schedule_id: i64,
    ) -> Result<Vec<TrainerRecord>, WorkflowError> {
        let (schedule, roster) = try_join(
            self.store.get_schedule(schedule_id),
            self.store.list_trainers(),
        )
        .await?;
        let schedule = schedule.ok_or(WorkflowError::NotFound("schedule"))?;
        Ok(roster
            .into_iter()
            .filter(|t| t.id != schedule.trainer_id)
            .collect())
    }

    /// Moves a schedule to another trainer, then reloads the view of the
    /// trainer it was taken from. Last write wins at the backend; no lock
    /// guards against a concurrent reassignment from another client.
    pub async fn reassign_schedule(
        &self,
        schedule_id: i64,
        new_trainer_id: i64,
        today: NaiveDate,
    ) -> Result<ScheduleOverview, WorkflowError> {
        let schedule = self
            .store
            .get_schedule(schedule_id)
            .await?
            .ok_or(WorkflowError::NotFound("schedule"))?;
        if schedule.trainer_id == new_trainer_id {
            return Err(WorkflowError::SameTrainer);
        }
        if self.store.get_trainer(new_trainer_id).await?.is_none() {
            return Err(WorkflowError::NotFound("trainer"));
        }
        self.store
            .set_schedule_trainer(schedule_id, new_trainer_id)
            .await?;
        info!(
            schedule_id,
            from = schedule.trainer_id,
            to = new_trainer_id,
            "schedule reassigned"
        );
        self.trainer_overview(schedule.trainer_id, today).await
    }

    /// Day-off rows within the fixed forward window `[today, today+90]`.
    pub async fn list_days_off(
        &self,
        trainer_id: i64,
        today: NaiveDate,
    ) -> Result<Vec<DayOffRecord>, WorkflowError> {
        let to = today + Duration::days(DAY_OFF_WINDOW_DAYS);
        Ok(self.store.days_off(trainer_id, today, to).await?)
    }

    pub async fn add_day_off(
        &self,
        trainer_id: i64,
        input: &DayOffInput,
        today: NaiveDate,
    ) -> Result<Vec<DayOffRecord>, WorkflowError> {
        if self.store.get_trainer(trainer_id).await?.is_none() {
            return Err(WorkflowError::NotFound("trainer"));
        }
        self.store.create_day_off(trainer_id, input).await?;
        self.list_days_off(trainer_id, today).await
    }

    pub async fn remove_day_off(
        &self,
        trainer_id: i64,
        day_off_id: i64,
        today: NaiveDate,
    ) -> Result<Vec<DayOffRecord>, WorkflowError> {
        self.store.delete_day_off(trainer_id, day_off_id).await?;
        self.list_days_off(trainer_id, today).await
    }

    pub async fn schedule_bookings(
        &self,
        schedule_id: i64,
    ) -> Result<Vec<BookingRecord>, WorkflowError> {
        Ok(self.store.schedule_bookings(schedule_id).await?)
    }

    /// Flips the attendance flag, stamping or clearing the check-in time,
    /// then re-lists the schedule's bookings.
    pub async fn mark_attendance(
        &self,
        booking_id: i64,
        attended: bool,
    ) -> Result<Vec<BookingRecord>, WorkflowError> {
        let booking = self
            .store
            .get_booking(booking_id)
            .await?
            .ok_or(WorkflowError::NotFound("booking"))?;
        let checked_in_at = attended.then(Utc::now);
        self.store
            .set_attendance(booking_id, attended, checked_in_at)
            .await?;
        self.store.schedule_bookings(booking.schedule_id).await.map_err(Into::into)
    }
}
