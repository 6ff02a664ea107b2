//! Error types for the core library.

use thiserror::Error;

/// Errors raised while planning, loading, publishing or exporting courses
#[derive(Error, Debug)]
pub enum Error {
    /// The course period cannot be laid out
    #[error("Invalid schedule for course {course}: {reason}")]
    InvalidSchedule { course: String, reason: String },

    /// Some exercise day would be left empty
    #[error("Course {course} has {exercises} exercises, too few for {days} study days")]
    InsufficientExercises {
        course: String,
        exercises: usize,
        days: usize,
    },

    /// A course stopped publishing part way through
    #[error("Publishing course {course} aborted after {published} events: {message}")]
    Fatal {
        course: String,
        published: usize,
        message: String,
    },

    /// A bounded retry policy ran out of attempts
    #[error("Gave up after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    /// Non-transient calendar service failure
    #[error(transparent)]
    Service(#[from] crate::calendar::ServiceError),

    /// Publishing was interrupted
    #[error("Publishing cancelled")]
    Cancelled,

    /// A course file could not be read or parsed
    #[error("Failed to read course file {path}: {message}")]
    CourseFile { path: String, message: String },

    /// Unexpected calendar API response
    #[error("Calendar API error: {0}")]
    CalendarApi(String),

    /// Transport-level HTTP failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed date in a course file
    #[error("Date parsing failed: {0}")]
    DateTime(#[from] chrono::ParseError),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// An event cannot be rendered as ICS
    #[error("ICS generation failed: {0}")]
    IcsGeneration(String),
}

impl Error {
    /// Errors caused by the course definition itself rather than the service
    #[must_use]
    pub const fn is_schedule_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidSchedule { .. } | Error::InsufficientExercises { .. }
        )
    }
}

/// Result alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;
