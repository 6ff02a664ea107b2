//! Sequential publishing with exponential backoff on transient failures.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::{
    Course, Error, EventDescriptor, PublishOptions, Result,
    calendar::{EventPayload, EventService, ServiceError},
    events::plan,
};

/// Backoff for transient failures.
///
/// The n-th retry (0-based) waits `2^n` seconds plus a random jitter of 1 to
/// 1000 milliseconds. Both limits are unset by default, which retries until
/// the service accepts the event or fails fatally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts per event, including the first
    #[serde(default)]
    pub max_attempts: Option<u32>,
    /// Upper bound for a single backoff sleep
    #[serde(default)]
    pub max_delay: Option<Duration>,
}

impl RetryPolicy {
    /// Sleep before retry number `attempt` (0-based), capped by `max_delay`
    #[must_use]
    pub fn delay(&self, attempt: u32, jitter_ms: u64) -> Duration {
        let delay = Duration::from_secs(2u64.saturating_pow(attempt))
            .saturating_add(Duration::from_millis(jitter_ms));
        match self.max_delay {
            Some(max) => delay.min(max),
            None => delay,
        }
    }

    /// Random jitter in `1..=1000` milliseconds
    #[must_use]
    pub fn jitter_ms() -> u64 {
        rand::rng().random_range(1..=1000)
    }

    fn exhausted(&self, failures: u32) -> bool {
        self.max_attempts.is_some_and(|max| failures >= max.max(1))
    }
}

/// Summary of a successfully published course
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PublishReport {
    /// Events accepted by the service
    pub published: usize,
    /// Transient failures retried along the way
    pub retries: u32,
}

/// Pushes event descriptors to one calendar, one request at a time.
pub struct Publisher<S> {
    service: S,
    calendar_id: String,
    timezone: String,
    policy: RetryPolicy,
    cancel: CancellationToken,
}

impl<S: EventService> Publisher<S> {
    /// Publisher writing to `calendar_id` with the time zone and retry
    /// policy of `options`
    pub fn new(service: S, calendar_id: impl Into<String>, options: &PublishOptions) -> Self {
        Self {
            service,
            calendar_id: calendar_id.into(),
            timezone: options.timezone.clone(),
            policy: options.retry.clone(),
            cancel: CancellationToken::new(),
        }
    }

    /// Abort backoff sleeps once `token` is cancelled
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Target calendar
    pub fn calendar_id(&self) -> &str {
        &self.calendar_id
    }

    /// Publish one event, retrying transient failures. Returns the number of
    /// retries it took.
    ///
    /// A request whose response got lost may already have been stored; its
    /// retry inserts the event a second time.
    ///
    /// # Errors
    ///
    /// The service's fatal error, [`Error::RetriesExhausted`] under a bounded
    /// policy, or [`Error::Cancelled`].
    pub async fn publish(&self, descriptor: &EventDescriptor) -> Result<u32> {
        let payload = EventPayload::from_descriptor(descriptor, &self.timezone);
        let mut failures: u32 = 0;

        loop {
            let message = match self.service.insert(&self.calendar_id, &payload).await {
                Ok(()) => return Ok(failures),
                Err(ServiceError::Transient(message)) => message,
                Err(e) => return Err(e.into()),
            };

            let attempt = failures;
            failures += 1;

            if self.policy.exhausted(failures) {
                return Err(Error::RetriesExhausted {
                    attempts: failures,
                    message,
                });
            }

            let delay = self.policy.delay(attempt, RetryPolicy::jitter_ms());
            tracing::warn!(
                "Transient error publishing '{}' (#{} failure): {}. Sleeping for {:.3}s",
                descriptor.summary,
                failures,
                message,
                delay.as_secs_f64()
            );

            tokio::select! {
                _ = self.cancel.cancelled() => return Err(Error::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// Publish a course's events in order, stopping at the first
    /// non-transient failure. Events published before the failure stay.
    ///
    /// # Errors
    ///
    /// [`Error::Fatal`] with the number of events already published, or
    /// [`Error::Cancelled`].
    pub async fn publish_course(
        &self,
        course: &str,
        descriptors: &[EventDescriptor],
    ) -> Result<PublishReport> {
        let mut report = PublishReport::default();

        for descriptor in descriptors {
            if self.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            match self.publish(descriptor).await {
                Ok(retries) => {
                    tracing::debug!("Published '{}'", descriptor.summary);
                    report.published += 1;
                    report.retries += retries;
                }
                Err(Error::Cancelled) => return Err(Error::Cancelled),
                Err(e) => {
                    return Err(Error::Fatal {
                        course: course.to_string(),
                        published: report.published,
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }
}

/// Result of processing one course
#[derive(Debug)]
pub struct CourseOutcome {
    /// Course name
    pub course: String,
    /// What publishing the course came to
    pub result: Result<PublishReport>,
}

/// Plan and publish each course in turn.
///
/// A course that fails to plan or publish is reported and skipped. Only
/// cancellation stops the remaining courses.
pub async fn run_courses<S, I>(courses: I, publisher: &Publisher<S>) -> Vec<CourseOutcome>
where
    S: EventService,
    I: IntoIterator<Item = Course>,
{
    let mut outcomes = Vec::new();

    for course in courses {
        let result = match plan(&course) {
            Ok(events) => {
                tracing::info!(
                    "Publishing {} events for course {}",
                    events.len(),
                    course.name
                );
                publisher.publish_course(&course.name, &events).await
            }
            Err(e) => Err(e),
        };

        match &result {
            Ok(report) => tracing::info!(
                "Course {} published: {} events, {} retries",
                course.name,
                report.published,
                report.retries
            ),
            Err(e) => tracing::error!("Course {} failed: {}", course.name, e),
        }

        let cancelled = matches!(result, Err(Error::Cancelled));
        outcomes.push(CourseOutcome {
            course: course.name,
            result,
        });
        if cancelled {
            break;
        }
    }

    outcomes
}
