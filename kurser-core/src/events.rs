//! Event descriptors: the summary text, category and dates of every
//! event a course produces.

use chrono::NaiveDate;

use crate::{
    ColorCategory, Course, EventDescriptor, Result,
    schedule::{DateRange, derive_dates},
};

const SEPARATOR: &str = " | ";
const ITEM_SEPARATOR: &str = "  ";

const EXERCISES: &str = "UPPGIFTER";
const EXAMS: &str = "EXTENTOR";
const REPETITION: &str = "REPETITION";
const MAIN: &str = "OMTENTA";

/// Turns a course's dates and chunks into event descriptors.
pub struct EventDescriptorBuilder<'a> {
    name: &'a str,
}

/// Exclusive end of an all-day event starting or ending on `date`.
///
/// Saturates at the last representable date; `derive_dates` never hands out
/// a date that reaches it.
fn next_day(date: NaiveDate) -> NaiveDate {
    date.succ_opt().unwrap_or(NaiveDate::MAX)
}

impl<'a> EventDescriptorBuilder<'a> {
    /// Builder for the course called `name`
    #[must_use]
    pub const fn new(name: &'a str) -> Self {
        Self { name }
    }

    fn summary(&self, parts: &[&str]) -> String {
        std::iter::once(self.name)
            .chain(parts.iter().copied())
            .collect::<Vec<_>>()
            .join(SEPARATOR)
    }

    fn one_day(
        &self,
        summary: String,
        date: NaiveDate,
        category: ColorCategory,
    ) -> EventDescriptor {
        EventDescriptor {
            summary,
            start_date: date,
            end_date: next_day(date),
            category,
        }
    }

    /// Span covering every day of `range`, or `None` for an empty range
    fn span(
        &self,
        summary: String,
        range: &DateRange,
        category: ColorCategory,
    ) -> Option<EventDescriptor> {
        let (first, last) = (range.first()?, range.last()?);
        Some(EventDescriptor {
            summary,
            start_date: first,
            end_date: next_day(last),
            category,
        })
    }

    /// `<name> | UPPGIFTER | <items joined by two spaces>` on `date`
    #[must_use]
    pub fn exercise_event<S: AsRef<str>>(&self, chunk: &[S], date: NaiveDate) -> EventDescriptor {
        let items = chunk
            .iter()
            .map(AsRef::<str>::as_ref)
            .collect::<Vec<_>>()
            .join(ITEM_SEPARATOR);
        self.one_day(
            self.summary(&[EXERCISES, items.as_str()]),
            date,
            ColorCategory::Exercise,
        )
    }

    /// `<name> | EXTENTOR | #<ordinal>` on `date`, ordinals counting from 0
    #[must_use]
    pub fn exam_event(&self, ordinal: usize, date: NaiveDate) -> EventDescriptor {
        let ordinal = format!("#{}", ordinal);
        self.one_day(
            self.summary(&[EXAMS, ordinal.as_str()]),
            date,
            ColorCategory::Exam,
        )
    }

    /// `<name> | UPPGIFTER` across all exercise days
    #[must_use]
    pub fn exercise_span_event(&self, range: &DateRange) -> Option<EventDescriptor> {
        self.span(self.summary(&[EXERCISES]), range, ColorCategory::ExerciseSpan)
    }

    /// `<name> | EXTENTOR` across all exam days
    #[must_use]
    pub fn exam_span_event(&self, range: &DateRange) -> Option<EventDescriptor> {
        self.span(self.summary(&[EXAMS]), range, ColorCategory::ExamSpan)
    }

    /// `<name> | REPETITION` on `date`
    #[must_use]
    pub fn repetition_event(&self, date: NaiveDate) -> EventDescriptor {
        self.one_day(self.summary(&[REPETITION]), date, ColorCategory::Repetition)
    }

    /// `<name> | OMTENTA` on `date`
    #[must_use]
    pub fn main_event(&self, date: NaiveDate) -> EventDescriptor {
        self.one_day(self.summary(&[MAIN]), date, ColorCategory::Main)
    }
}

/// Derive every event of a course in publishing order: spans, per-day
/// exercises, per-day exams, then the main and repetition days.
///
/// # Errors
///
/// Fails with the scheduling errors of [`derive_dates`] and
/// [`Course::chunk_over_days`].
pub fn plan(course: &Course) -> Result<Vec<EventDescriptor>> {
    let dates = derive_dates(course)?;
    let chunks = course.chunk_over_days(&dates)?;
    let builder = EventDescriptorBuilder::new(&course.name);

    let mut events = Vec::with_capacity(chunks.len() + dates.exam_dates.len() + 4);

    events.extend(builder.exercise_span_event(&dates.exercise_dates));
    events.extend(builder.exam_span_event(&dates.exam_dates));

    events.extend(
        chunks
            .into_iter()
            .zip(dates.exercise_dates.iter())
            .map(|(chunk, date)| builder.exercise_event(chunk, date)),
    );
    events.extend(
        dates
            .exam_dates
            .iter()
            .enumerate()
            .map(|(i, date)| builder.exam_event(i, date)),
    );

    events.push(builder.main_event(dates.main_event_date));
    events.push(builder.repetition_event(dates.repetition_date));

    tracing::debug!("Planned {} events for course {}", events.len(), course.name);

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn algebra() -> Course {
        Course::new(
            "Algebra",
            date(2024, 5, 1),
            date(2024, 5, 10),
            2,
            [
                "3.1", "3.2", "3.3", "3.4", "4.1", "4.2", "4.3", "4.4", "4.5", "5.1", "5.2",
                "5.3", "5.4",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        )
    }

    #[test]
    fn test_exercise_summary_format() {
        let builder = EventDescriptorBuilder::new("Algebra");
        let event = builder.exercise_event(&["3.1", "3.2"], date(2024, 5, 1));

        assert_eq!(event.summary, "Algebra | UPPGIFTER | 3.1  3.2");
        assert_eq!(event.category, ColorCategory::Exercise);
        assert_eq!(event.end_date, date(2024, 5, 2));
        assert!(event.is_one_day());
    }

    #[test]
    fn test_singleton_summaries() {
        let builder = EventDescriptorBuilder::new("Analys");
        let day = date(2024, 5, 3);

        assert_eq!(builder.exam_event(0, day).summary, "Analys | EXTENTOR | #0");
        assert_eq!(builder.repetition_event(day).summary, "Analys | REPETITION");
        assert_eq!(builder.main_event(day).summary, "Analys | OMTENTA");
        assert_eq!(builder.main_event(day).category, ColorCategory::Main);
    }

    #[test]
    fn test_span_is_inclusive_of_last_day() {
        let builder = EventDescriptorBuilder::new("Algebra");
        let range = DateRange::new(date(2024, 5, 1), date(2024, 5, 6));
        let span = builder.exercise_span_event(&range).unwrap();

        assert_eq!(span.summary, "Algebra | UPPGIFTER");
        assert_eq!(span.start_date, date(2024, 5, 1));
        assert_eq!(span.end_date, date(2024, 5, 6));
        assert_eq!(span.category, ColorCategory::ExerciseSpan);
        assert!(!span.is_one_day());
    }

    #[test]
    fn test_span_of_empty_range() {
        let builder = EventDescriptorBuilder::new("Algebra");
        let range = DateRange::new(date(2024, 5, 1), date(2024, 5, 1));
        assert!(builder.exam_span_event(&range).is_none());
    }

    #[test]
    fn test_plan_order_and_contents() {
        let events = plan(&algebra()).unwrap();

        // 9 days: 6 exercise days, 2 exam days, 1 repetition day
        let categories: Vec<ColorCategory> = events.iter().map(|e| e.category).collect();
        let mut expected = vec![ColorCategory::ExerciseSpan, ColorCategory::ExamSpan];
        expected.extend(std::iter::repeat_n(ColorCategory::Exercise, 6));
        expected.extend(std::iter::repeat_n(ColorCategory::Exam, 2));
        expected.extend([ColorCategory::Main, ColorCategory::Repetition]);
        assert_eq!(categories, expected);

        assert_eq!(events[0].start_date, date(2024, 5, 1));
        assert_eq!(events[0].end_date, date(2024, 5, 7));
        assert_eq!(events[1].start_date, date(2024, 5, 7));
        assert_eq!(events[1].end_date, date(2024, 5, 9));

        // 13 exercises over 6 days: five days of 2 and one day of 3
        assert_eq!(events[2].summary, "Algebra | UPPGIFTER | 3.1  3.2");
        assert_eq!(events[7].summary, "Algebra | UPPGIFTER | 5.2  5.3  5.4");
        assert_eq!(events[7].start_date, date(2024, 5, 6));

        assert_eq!(events[8].summary, "Algebra | EXTENTOR | #0");
        assert_eq!(events[9].summary, "Algebra | EXTENTOR | #1");
        assert_eq!(events[9].start_date, date(2024, 5, 8));

        assert_eq!(events[10].start_date, date(2024, 5, 10));
        assert_eq!(events[11].start_date, date(2024, 5, 9));
    }

    #[test]
    fn test_plan_without_exams_skips_exam_span() {
        let mut course = algebra();
        course.exam_count = 0;
        let events = plan(&course).unwrap();

        assert!(events.iter().all(|e| e.category != ColorCategory::ExamSpan));
        assert!(events.iter().all(|e| e.category != ColorCategory::Exam));
        assert_eq!(
            events
                .iter()
                .filter(|e| e.category == ColorCategory::Exercise)
                .count(),
            8
        );
    }

    #[test]
    fn test_plan_rejects_stop_on_last_date() {
        let course = Course::new(
            "Edge",
            NaiveDate::MAX - chrono::Duration::days(5),
            NaiveDate::MAX,
            1,
            vec!["1".into(), "2".into(), "3".into()],
        );
        assert!(matches!(plan(&course), Err(Error::InvalidSchedule { .. })));
    }

    #[test]
    fn test_main_event_on_last_date_does_not_overflow() {
        let event = EventDescriptorBuilder::new("Edge").main_event(NaiveDate::MAX);
        assert_eq!(event.start_date, NaiveDate::MAX);
        assert_eq!(event.end_date, NaiveDate::MAX);
    }

    #[test]
    fn test_plan_is_deterministic() {
        assert_eq!(plan(&algebra()).unwrap(), plan(&algebra()).unwrap());
    }

    #[test]
    fn test_plan_rejects_too_few_exercises() {
        let mut course = algebra();
        course.exercises.truncate(3);
        assert!(matches!(
            plan(&course),
            Err(Error::InsufficientExercises { days: 6, .. })
        ));
    }
}
