//! Course period layout: which days hold exercises, exams, the
//! repetition day and the main event.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    Course, Error, Result,
    chunk::{ChunkError, chunk},
};

/// Half-open range of days `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day in the range
    pub start: NaiveDate,
    /// First day after the range
    pub end: NaiveDate,
}

impl DateRange {
    /// Range from `start` up to, but not including, `end`
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Number of days, zero for an inverted range
    #[must_use]
    pub fn len(&self) -> usize {
        usize::try_from((self.end - self.start).num_days()).unwrap_or(0)
    }

    /// Whether the range holds no days
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether `date` falls inside the range
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// First day, if any
    #[must_use]
    pub fn first(&self) -> Option<NaiveDate> {
        (!self.is_empty()).then_some(self.start)
    }

    /// Last day, if any
    #[must_use]
    pub fn last(&self) -> Option<NaiveDate> {
        (!self.is_empty()).then(|| self.end - Duration::days(1))
    }

    /// Iterate the days in order. Calling again restarts from `start`.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d < end)
    }
}

impl IntoIterator for DateRange {
    type Item = NaiveDate;
    type IntoIter = Box<dyn Iterator<Item = NaiveDate>>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Dates derived from a course's coarse parameters.
///
/// The course period `[start, stop)` is laid out as exercise days, then
/// `exam_count` exam days, then the repetition day. The main event falls on
/// `stop` itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDates {
    /// One day per exercise chunk
    pub exercise_dates: DateRange,
    /// One day per old exam, empty when the course has none
    pub exam_dates: DateRange,
    /// Last day before `stop`
    pub repetition_date: NaiveDate,
    /// The course's `stop` day
    pub main_event_date: NaiveDate,
}

/// Derive the schedule dates of a course.
///
/// # Errors
///
/// [`Error::InvalidSchedule`] when `start >= stop`, when `stop` is the last
/// representable date (the main event needs a following day as its end), or
/// when the exam and repetition days leave no room for exercises.
pub fn derive_dates(course: &Course) -> Result<ScheduleDates> {
    if course.start >= course.stop {
        return Err(Error::InvalidSchedule {
            course: course.name.clone(),
            reason: format!("start {} is not before stop {}", course.start, course.stop),
        });
    }

    if course.stop.succ_opt().is_none() {
        return Err(Error::InvalidSchedule {
            course: course.name.clone(),
            reason: format!("stop {} has no following day", course.stop),
        });
    }

    let duration = course.duration();
    let reserved = i64::from(course.exam_count) + 1;
    if reserved >= duration {
        return Err(Error::InvalidSchedule {
            course: course.name.clone(),
            reason: format!(
                "{} exam days plus repetition leave no exercise days in a {} day period",
                course.exam_count, duration
            ),
        });
    }

    let repetition_date = course.stop - Duration::days(1);
    let exams_start = course.stop - Duration::days(reserved);

    Ok(ScheduleDates {
        exercise_dates: DateRange::new(course.start, exams_start),
        exam_dates: DateRange::new(exams_start, repetition_date),
        repetition_date,
        main_event_date: course.stop,
    })
}

impl Course {
    /// Distribute the exercises over the exercise days.
    ///
    /// The returned chunks pair positionally with `exercise_dates`.
    ///
    /// # Errors
    ///
    /// [`Error::InsufficientExercises`] when some day would get no exercise.
    pub fn chunk_over_days(&self, dates: &ScheduleDates) -> Result<Vec<&[String]>> {
        let days = dates.exercise_dates.len();
        chunk(&self.exercises, days).map_err(|e| match e {
            ChunkError::NoDays => Error::InvalidSchedule {
                course: self.name.clone(),
                reason: e.to_string(),
            },
            ChunkError::TooFewItems { items, days } => Error::InsufficientExercises {
                course: self.name.clone(),
                exercises: items,
                days,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn course(start: NaiveDate, stop: NaiveDate, exams: u32, exercises: usize) -> Course {
        Course::new(
            "Algebra",
            start,
            stop,
            exams,
            (1..=exercises).map(|i| format!("1.{}", i)).collect(),
        )
    }

    #[test]
    fn test_derive_dates_layout() {
        let c = course(date(2024, 3, 1), date(2024, 3, 15), 3, 20);
        let dates = derive_dates(&c).unwrap();

        assert_eq!(dates.exercise_dates, DateRange::new(date(2024, 3, 1), date(2024, 3, 11)));
        assert_eq!(dates.exam_dates, DateRange::new(date(2024, 3, 11), date(2024, 3, 14)));
        assert_eq!(dates.repetition_date, date(2024, 3, 14));
        assert_eq!(dates.main_event_date, date(2024, 3, 15));

        assert_eq!(dates.exercise_dates.len(), 10);
        assert_eq!(dates.exam_dates.len(), 3);
    }

    #[test]
    fn test_dates_cover_period() {
        let start = date(2024, 1, 28);
        for duration in 2..40i64 {
            let stop = start + Duration::days(duration);
            for exams in 0..u32::try_from(duration - 1).unwrap() {
                let c = course(start, stop, exams, 100);
                let dates = derive_dates(&c).unwrap();

                assert_eq!(
                    i64::try_from(dates.exercise_dates.len()).unwrap() + i64::from(exams) + 1,
                    duration
                );

                let mut covered: Vec<NaiveDate> = dates.exercise_dates.iter().collect();
                covered.extend(dates.exam_dates.iter());
                covered.push(dates.repetition_date);
                let expected: Vec<NaiveDate> = DateRange::new(start, stop).iter().collect();
                assert_eq!(covered, expected);

                assert!(
                    dates
                        .exam_dates
                        .iter()
                        .all(|d| !dates.exercise_dates.contains(d))
                );
            }
        }
    }

    #[test]
    fn test_range_is_restartable() {
        let range = DateRange::new(date(2024, 2, 27), date(2024, 3, 2));
        let first: Vec<_> = range.iter().collect();
        let second: Vec<_> = range.into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
        assert_eq!(range.first(), Some(date(2024, 2, 27)));
        assert_eq!(range.last(), Some(date(2024, 3, 1)));
    }

    #[test]
    fn test_empty_range() {
        let range = DateRange::new(date(2024, 3, 1), date(2024, 3, 1));
        assert!(range.is_empty());
        assert_eq!(range.first(), None);
        assert_eq!(range.last(), None);
        assert_eq!(range.iter().count(), 0);

        let inverted = DateRange::new(date(2024, 3, 5), date(2024, 3, 1));
        assert!(inverted.is_empty());
        assert_eq!(inverted.len(), 0);
    }

    #[test]
    fn test_no_room_for_exercises() {
        let c = course(date(2024, 3, 1), date(2024, 3, 5), 3, 10);
        let err = derive_dates(&c).unwrap_err();
        assert!(matches!(err, Error::InvalidSchedule { ref course, .. } if course == "Algebra"));
    }

    #[test]
    fn test_inverted_period() {
        let c = course(date(2024, 3, 5), date(2024, 3, 1), 0, 10);
        assert!(matches!(derive_dates(&c), Err(Error::InvalidSchedule { .. })));

        let c = course(date(2024, 3, 5), date(2024, 3, 5), 0, 10);
        assert!(matches!(derive_dates(&c), Err(Error::InvalidSchedule { .. })));
    }

    #[test]
    fn test_stop_on_last_representable_date() {
        let c = course(NaiveDate::MAX - Duration::days(5), NaiveDate::MAX, 1, 3);
        let err = derive_dates(&c).unwrap_err();
        assert!(
            matches!(err, Error::InvalidSchedule { ref reason, .. } if reason.contains("no following day"))
        );

        let c = course(
            NaiveDate::MAX - Duration::days(6),
            NaiveDate::MAX - Duration::days(1),
            1,
            3,
        );
        let dates = derive_dates(&c).unwrap();
        assert_eq!(dates.main_event_date, NaiveDate::MAX - Duration::days(1));
    }

    #[test]
    fn test_chunk_over_days_pairs_with_dates() {
        let c = course(date(2024, 3, 1), date(2024, 3, 8), 2, 9);
        let dates = derive_dates(&c).unwrap();
        let chunks = c.chunk_over_days(&dates).unwrap();

        assert_eq!(chunks.len(), dates.exercise_dates.len());
        assert_eq!(chunks.concat(), c.exercises);
        let sizes: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
        assert_eq!(sizes, vec![2, 2, 2, 3]);
    }

    #[test]
    fn test_chunk_over_days_too_few_exercises() {
        let c = course(date(2024, 3, 1), date(2024, 3, 15), 3, 4);
        let dates = derive_dates(&c).unwrap();
        let err = c.chunk_over_days(&dates).unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientExercises {
                exercises: 4,
                days: 10,
                ..
            }
        ));
    }
}
