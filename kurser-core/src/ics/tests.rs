use super::*;
use crate::{ColorCategory, Course, Error, events::plan};
use chrono::NaiveDate;
use ical::parser::ical::IcalParser;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn course() -> Course {
    Course::new(
        "Linjär algebra",
        date(2024, 10, 1),
        date(2024, 10, 8),
        1,
        vec!["1.1".into(), "1.2".into(), "1.3".into(), "2.1".into(), "2.4".into(), "2.5".into()],
    )
}

fn property<'a>(event: &'a ical::parser::ical::component::IcalEvent, name: &str) -> Option<&'a str> {
    event
        .properties
        .iter()
        .find(|prop| prop.name.eq_ignore_ascii_case(name))
        .and_then(|prop| prop.value.as_deref())
}

#[test]
fn test_generate_parses_back() {
    let c = course();
    let events = plan(&c).unwrap();
    let generator = IcsGenerator::default();

    let ics_content = generator
        .generate(&[(c.name.clone(), events.clone())])
        .expect("failed to generate ICS");

    assert!(ics_content.starts_with("BEGIN:VCALENDAR\r\n"));
    assert!(ics_content.ends_with("END:VCALENDAR\r\n"));
    assert!(ics_content.contains("X-WR-CALNAME:kurser\r\n"));
    assert!(ics_content.contains("X-WR-TIMEZONE:Europe/Stockholm\r\n"));

    let mut parser = IcalParser::new(std::io::BufReader::new(ics_content.as_bytes()));
    let calendar = parser.next().expect("no calendar").expect("invalid calendar");
    assert_eq!(calendar.events.len(), events.len());

    for (parsed, expected) in calendar.events.iter().zip(&events) {
        assert_eq!(property(parsed, "SUMMARY"), Some(expected.summary.as_str()));
        assert_eq!(
            property(parsed, "DTSTART"),
            Some(expected.start_date.format("%Y%m%d").to_string().as_str())
        );
        assert_eq!(
            property(parsed, "DTEND"),
            Some(expected.end_date.format("%Y%m%d").to_string().as_str())
        );
        assert_eq!(property(parsed, "CATEGORIES"), Some(expected.category.as_str()));
    }
}

#[test]
fn test_exercise_event_lines() {
    let event = EventDescriptor {
        summary: "Algebra | UPPGIFTER | 3.1  3.2".to_string(),
        start_date: date(2024, 12, 31),
        end_date: date(2025, 1, 1),
        category: ColorCategory::Exercise,
    };
    let ics_content = IcsGenerator::default()
        .generate(&[("Algebra".to_string(), vec![event])])
        .unwrap();

    assert!(ics_content.contains("SUMMARY:Algebra | UPPGIFTER | 3.1  3.2\r\n"));
    assert!(ics_content.contains("DTSTART;VALUE=DATE:20241231\r\n"));
    assert!(ics_content.contains("DTEND;VALUE=DATE:20250101\r\n"));
    assert!(ics_content.contains("CATEGORIES:EXERCISE\r\n"));
}

#[test]
fn test_summary_is_escaped() {
    let event = EventDescriptor {
        summary: "Fysik; del 1, mekanik".to_string(),
        start_date: date(2024, 1, 1),
        end_date: date(2024, 1, 2),
        category: ColorCategory::Main,
    };
    let ics_content = IcsGenerator::default()
        .generate(&[("Fysik".to_string(), vec![event])])
        .unwrap();
    assert!(ics_content.contains("SUMMARY:Fysik\\; del 1\\, mekanik\r\n"));
}

#[test]
fn test_inverted_event_is_rejected() {
    let event = EventDescriptor {
        summary: "x".to_string(),
        start_date: date(2024, 1, 2),
        end_date: date(2024, 1, 2),
        category: ColorCategory::Main,
    };
    let result = IcsGenerator::default().generate(&[("x".to_string(), vec![event])]);
    assert!(matches!(result, Err(Error::IcsGeneration(_))));
}

#[test]
fn test_without_calendar_name() {
    let generator = IcsGenerator::new(IcsOptions {
        calendar_name: None,
        timezone: None,
    });
    let ics_content = generator.generate(&[]).unwrap();
    assert!(!ics_content.contains("X-WR-CALNAME"));
    assert!(!ics_content.contains("X-WR-TIMEZONE"));
    assert!(!ics_content.contains("BEGIN:VEVENT"));
}
