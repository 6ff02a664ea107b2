//! Domain types shared by planning, publishing and export.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::publisher::RetryPolicy;

/// One subject's study plan.
///
/// Exercise order is significant: it is the order in which exercises are
/// distributed over the study days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Course name, used as the prefix of every event summary
    pub name: String,
    /// First study day
    pub start: NaiveDate,
    /// Day of the main exam
    pub stop: NaiveDate,
    /// Number of days reserved for old exams before the repetition day
    pub exam_count: u32,
    /// Exercise identifiers such as "3.2" (chapter 3, exercise 2)
    pub exercises: Vec<String>,
}

impl Course {
    /// Course from its parts, exercises in study order
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        start: NaiveDate,
        stop: NaiveDate,
        exam_count: u32,
        exercises: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            start,
            stop,
            exam_count,
            exercises,
        }
    }

    /// Days between `start` and `stop`
    #[must_use]
    pub fn duration(&self) -> i64 {
        (self.stop - self.start).num_days()
    }
}

/// Color group of an event.
///
/// Several categories share a color; the numeric ids are the calendar
/// service's fixed palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColorCategory {
    /// One day of exercises
    Exercise,
    /// One old exam
    Exam,
    /// All exercise days
    ExerciseSpan,
    /// All exam days
    ExamSpan,
    /// The day before the main exam
    Repetition,
    /// The main exam
    Main,
}

impl ColorCategory {
    /// Palette id sent to the calendar service
    #[must_use]
    pub const fn color_id(self) -> u8 {
        match self {
            ColorCategory::Exercise | ColorCategory::Exam => 7,
            ColorCategory::ExerciseSpan | ColorCategory::ExamSpan => 9,
            ColorCategory::Repetition => 4,
            ColorCategory::Main => 11,
        }
    }

    /// Upper-case name, as serialized
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ColorCategory::Exercise => "EXERCISE",
            ColorCategory::Exam => "EXAM",
            ColorCategory::ExerciseSpan => "EXERCISE_SPAN",
            ColorCategory::ExamSpan => "EXAM_SPAN",
            ColorCategory::Repetition => "REPETITION",
            ColorCategory::Main => "MAIN",
        }
    }
}

impl fmt::Display for ColorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dated, labeled all-day event ready to be published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDescriptor {
    /// Title shown in the calendar
    pub summary: String,
    /// First day of the event
    pub start_date: NaiveDate,
    /// Exclusive
    pub end_date: NaiveDate,
    /// Color group
    pub category: ColorCategory,
}

impl EventDescriptor {
    /// Whether the event covers exactly one day
    #[must_use]
    pub fn is_one_day(&self) -> bool {
        (self.end_date - self.start_date).num_days() == 1
    }
}

/// Publishing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishOptions {
    /// Name of the target calendar, created when missing
    pub calendar_name: String,
    /// Time zone attached to every event date
    pub timezone: String,
    /// Backoff for transient failures
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            calendar_name: "kurser".to_string(),
            timezone: "Europe/Stockholm".to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Options for ICS export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IcsOptions {
    /// X-WR-CALNAME
    pub calendar_name: Option<String>,
    /// X-WR-TIMEZONE
    pub timezone: Option<String>,
}

impl Default for IcsOptions {
    fn default() -> Self {
        Self {
            calendar_name: Some("kurser".to_string()),
            timezone: Some("Europe/Stockholm".to_string()),
        }
    }
}
