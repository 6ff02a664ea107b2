//! Calendar service seams and the event wire format.

pub mod google;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{EventDescriptor, Result};

pub use google::GoogleCalendar;

/// Outcome of a single rejected service call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Rate limiting or a server-side hiccup, worth retrying
    #[error("transient service error: {0}")]
    Transient(String),

    /// Anything else; retrying would fail the same way
    #[error("fatal service error: {0}")]
    Fatal(String),
}

impl ServiceError {
    /// Whether the call is worth retrying
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, ServiceError::Transient(_))
    }
}

/// Date of an all-day event as the calendar service expects it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDate {
    /// Calendar day
    pub date: NaiveDate,
    /// IANA time zone name
    pub time_zone: String,
}

/// Event body sent to the calendar service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    /// Event title
    pub summary: String,
    /// First day
    pub start: EventDate,
    /// Exclusive
    pub end: EventDate,
    /// Palette id as a decimal string
    pub color_id: String,
}

impl EventPayload {
    /// Wire body for `descriptor`, both dates in `timezone`
    #[must_use]
    pub fn from_descriptor(descriptor: &EventDescriptor, timezone: &str) -> Self {
        Self {
            summary: descriptor.summary.clone(),
            start: EventDate {
                date: descriptor.start_date,
                time_zone: timezone.to_string(),
            },
            end: EventDate {
                date: descriptor.end_date,
                time_zone: timezone.to_string(),
            },
            color_id: descriptor.category.color_id().to_string(),
        }
    }
}

/// Inserts events into a calendar
#[async_trait]
pub trait EventService: Send + Sync {
    /// Insert one event into `calendar_id`
    async fn insert(
        &self,
        calendar_id: &str,
        payload: &EventPayload,
    ) -> std::result::Result<(), ServiceError>;
}

#[async_trait]
impl<T: EventService + ?Sized> EventService for &T {
    async fn insert(
        &self,
        calendar_id: &str,
        payload: &EventPayload,
    ) -> std::result::Result<(), ServiceError> {
        (**self).insert(calendar_id, payload).await
    }
}

/// Resolves calendar names to ids
#[async_trait]
pub trait CalendarLocator: Send + Sync {
    /// Id of the calendar called `name`, if any
    async fn find_calendar(&self, name: &str) -> Result<Option<String>>;

    /// Create a calendar called `name` and return its id
    async fn create_calendar(&self, name: &str) -> Result<String>;

    /// Delete the calendar with the given id together with its events
    async fn delete_calendar(&self, calendar_id: &str) -> Result<()>;

    /// Id of the calendar called `name`, created when missing
    async fn locate_or_create(&self, name: &str) -> Result<String> {
        if let Some(id) = self.find_calendar(name).await? {
            tracing::debug!("Found calendar {} ({})", name, id);
            return Ok(id);
        }

        tracing::info!("Calendar {} not found, creating it", name);
        self.create_calendar(name).await
    }
}
