use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::models::{
    BookingRecord, ClassTemplateInput, ClassTemplateRecord, DayOffInput, DayOffRecord,
    ScheduleRecord, ScheduleStatus, TrainerRecord,
};

/// Statuses that count toward an entity's schedule statistics.
const ACTIVE_STATUS_FILTER: &str = "in.(scheduled,in_progress,completed)";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store returned no row for inserted {0}")]
    EmptyInsert(&'static str),
}

/// Thin client for the hosted PostgREST-style data store. Resource
/// collections are tables addressed by path; filters travel as query
/// parameters (`eq.`, `in.(...)`, `gte.`/`lte.`); updates patch by filter.
#[derive(Clone)]
pub struct DataStore {
    client: reqwest::Client,
    base_url: Arc<Url>,
    api_key: String,
}

impl DataStore {
    pub fn new(base_url: Url, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: Arc::new(base_url),
            api_key,
        }
    }

    pub(crate) fn endpoint(&self, table: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), table)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, StoreError> {
        let response = self
            .authed(self.client.get(self.endpoint(table)))
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn patch(
        &self,
        table: &str,
        query: &[(&str, String)],
        body: &serde_json::Value,
    ) -> Result<(), StoreError> {
        self.authed(self.client.patch(self.endpoint(table)))
            .query(query)
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn delete(&self, table: &str, query: &[(&str, String)]) -> Result<(), StoreError> {
        self.authed(self.client.delete(self.endpoint(table)))
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    pub async fn list_trainers(&self) -> Result<Vec<TrainerRecord>, StoreError> {
        self.fetch("trainers", &[("order", "name.asc".into())]).await
    }

    pub async fn get_trainer(&self, id: i64) -> Result<Option<TrainerRecord>, StoreError> {
        let rows: Vec<TrainerRecord> = self
            .fetch("trainers", &[("id", format!("eq.{id}")), ("limit", "1".into())])
            .await?;
        Ok(rows.into_iter().next())
    }

    pub async fn delete_trainer(&self, id: i64) -> Result<(), StoreError> {
        self.delete("trainers", &[("id", format!("eq.{id}"))]).await
    }

    /// Non-cancelled schedules of one trainer, class template embedded.
    pub async fn trainer_schedules(
        &self,
        trainer_id: i64,
    ) -> Result<Vec<ScheduleRecord>, StoreError> {
        self.fetch(
            "schedules",
            &[
                ("select", "*,classes(name,duration_min)".into()),
                ("trainer_id", format!("eq.{trainer_id}")),
                ("status", ACTIVE_STATUS_FILTER.into()),
                ("order", "date.asc,start_time.asc".into()),
            ],
        )
        .await
    }

    /// Non-cancelled schedules spawned from one class template.
    pub async fn class_schedules(&self, class_id: i64) -> Result<Vec<ScheduleRecord>, StoreError> {
        self.fetch(
            "schedules",
            &[
                ("select", "*,classes(name,duration_min)".into()),
                ("class_id", format!("eq.{class_id}")),
                ("status", ACTIVE_STATUS_FILTER.into()),
                ("order", "date.asc,start_time.asc".into()),
            ],
        )
        .await
    }

    pub async fn get_schedule(&self, id: i64) -> Result<Option<ScheduleRecord>, StoreError> {
        let rows: Vec<ScheduleRecord> = self
            .fetch(
                "schedules",
                &[
                    ("select", "*,classes(name,duration_min)".into()),
                    ("id", format!("eq.{id}")),
                    ("limit", "1".into()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    pub async fn set_schedule_status(
        &self,
        id: i64,
        status: ScheduleStatus,
    ) -> Result<(), StoreError> {
        self.patch(
            "schedules",
            &[("id", format!("eq.{id}"))],
            &serde_json::json!({ "status": status.as_str() }),
        )
        .await
    }

    pub async fn set_schedule_trainer(&self, id: i64, trainer_id: i64) -> Result<(), StoreError> {
        self.patch(
            "schedules",
            &[("id", format!("eq.{id}"))],
            &serde_json::json!({ "trainer_id": trainer_id }),
        )
        .await
    }

    pub async fn list_classes(&self) -> Result<Vec<ClassTemplateRecord>, StoreError> {
        self.fetch("classes", &[("order", "name.asc".into())]).await
    }

    pub async fn get_class(&self, id: i64) -> Result<Option<ClassTemplateRecord>, StoreError> {
        let rows: Vec<ClassTemplateRecord> = self
            .fetch("classes", &[("id", format!("eq.{id}")), ("limit", "1".into())])
            .await?;
        Ok(rows.into_iter().next())
    }

    pub async fn create_class(
        &self,
        input: &ClassTemplateInput,
    ) -> Result<ClassTemplateRecord, StoreError> {
        let rows: Vec<ClassTemplateRecord> = self
            .authed(self.client.post(self.endpoint("classes")))
            .header("Prefer", "return=representation")
            .json(input)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        rows.into_iter()
            .next()
            .ok_or(StoreError::EmptyInsert("class"))
    }

    pub async fn update_class(
        &self,
        id: i64,
        input: &ClassTemplateInput,
    ) -> Result<(), StoreError> {
        self.patch(
            "classes",
            &[("id", format!("eq.{id}"))],
            &serde_json::to_value(input).expect("input serializes"),
        )
        .await
    }

    pub async fn delete_class(&self, id: i64) -> Result<(), StoreError> {
        self.delete("classes", &[("id", format!("eq.{id}"))]).await
    }

    /// Day-off rows of one trainer with date in `[from, to]` inclusive.
    pub async fn days_off(
        &self,
        trainer_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DayOffRecord>, StoreError> {
        self.fetch(
            "days_off",
            &[
                ("trainer_id", format!("eq.{trainer_id}")),
                ("date", format!("gte.{from}")),
                ("date", format!("lte.{to}")),
                ("order", "date.asc".into()),
            ],
        )
        .await
    }

    pub async fn create_day_off(
        &self,
        trainer_id: i64,
        input: &DayOffInput,
    ) -> Result<DayOffRecord, StoreError> {
        let rows: Vec<DayOffRecord> = self
            .authed(self.client.post(self.endpoint("days_off")))
            .header("Prefer", "return=representation")
            .json(&serde_json::json!({
                "trainer_id": trainer_id,
                "date": input.date,
                "kind": input.kind,
            }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        rows.into_iter()
            .next()
            .ok_or(StoreError::EmptyInsert("day off"))
    }

    /// Delete stays scoped to the owning trainer.
    pub async fn delete_day_off(&self, trainer_id: i64, id: i64) -> Result<(), StoreError> {
        self.delete(
            "days_off",
            &[
                ("id", format!("eq.{id}")),
                ("trainer_id", format!("eq.{trainer_id}")),
            ],
        )
        .await
    }

    pub async fn schedule_bookings(
        &self,
        schedule_id: i64,
    ) -> Result<Vec<BookingRecord>, StoreError> {
        self.fetch(
            "bookings",
            &[
                ("schedule_id", format!("eq.{schedule_id}")),
                ("order", "id.asc".into()),
            ],
        )
        .await
    }

    pub async fn get_booking(&self, id: i64) -> Result<Option<BookingRecord>, StoreError> {
        let rows: Vec<BookingRecord> = self
            .fetch("bookings", &[("id", format!("eq.{id}")), ("limit", "1".into())])
            .await?;
        Ok(rows.into_iter().next())
    }

    pub async fn set_attendance(
        &self,
        booking_id: i64,
        attended: bool,
        checked_in_at: Option<DateTime<Utc>>,
    ) -> Result<(), StoreError> {
        self.patch(
            "bookings",
            &[("id", format!("eq.{booking_id}"))],
            &serde_json::json!({ "attended": attended, "checked_in_at": checked_in_at }),
        )
        .await
    }
}
