//! iCalendar export of planned events.

#[cfg(test)]
mod tests;

use chrono::Utc;
use uuid::Uuid;

use crate::{EventDescriptor, IcsOptions, Result};

/// Renders planned events as an iCalendar file
pub struct IcsGenerator {
    options: IcsOptions,
}

impl IcsGenerator {
    /// Generator writing the calendar name and time zone of `options`
    #[must_use]
    pub const fn new(options: IcsOptions) -> Self {
        Self { options }
    }

    /// Generate the calendar.
    ///
    /// `courses` pairs each course name with its planned events.
    ///
    /// # Errors
    ///
    /// [`crate::Error::IcsGeneration`] for an event that does not end after
    /// it starts.
    pub fn generate(&self, courses: &[(String, Vec<EventDescriptor>)]) -> Result<String> {
        let mut ics_content = String::new();

        ics_content.push_str("BEGIN:VCALENDAR\r\n");
        ics_content.push_str("VERSION:2.0\r\n");
        ics_content.push_str("PRODID:-//Kurser//Course Study Plan//SV\r\n");
        ics_content.push_str("CALSCALE:GREGORIAN\r\n");
        ics_content.push_str("METHOD:PUBLISH\r\n");

        if let Some(ref name) = self.options.calendar_name {
            ics_content.push_str(&format!("X-WR-CALNAME:{}\r\n", self.escape_text(name)));
        }

        if let Some(ref timezone) = self.options.timezone {
            ics_content.push_str(&format!("X-WR-TIMEZONE:{}\r\n", timezone));
        }

        for (course, events) in courses {
            tracing::debug!("Rendering {} events for course {}", events.len(), course);
            for event in events {
                self.add_event(&mut ics_content, event)?;
            }
        }

        ics_content.push_str("END:VCALENDAR\r\n");

        Ok(ics_content)
    }

    /// All-day event
    fn add_event(&self, ics_content: &mut String, event: &EventDescriptor) -> Result<()> {
        if event.end_date <= event.start_date {
            return Err(crate::Error::IcsGeneration(format!(
                "event '{}' ends before it starts",
                event.summary
            )));
        }

        let uid = Uuid::new_v4().to_string();
        let dtstamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();

        ics_content.push_str("BEGIN:VEVENT\r\n");
        ics_content.push_str(&format!("UID:{}\r\n", uid));
        ics_content.push_str(&format!("DTSTAMP:{}\r\n", dtstamp));
        ics_content.push_str(&format!(
            "DTSTART;VALUE=DATE:{}\r\n",
            event.start_date.format("%Y%m%d")
        ));
        ics_content.push_str(&format!(
            "DTEND;VALUE=DATE:{}\r\n",
            event.end_date.format("%Y%m%d")
        ));
        ics_content.push_str(&format!("SUMMARY:{}\r\n", self.escape_text(&event.summary)));
        ics_content.push_str(&format!("CATEGORIES:{}\r\n", event.category));
        ics_content.push_str("TRANSP:TRANSPARENT\r\n");
        ics_content.push_str("END:VEVENT\r\n");

        Ok(())
    }

    /// Escape TEXT values (RFC 5545 3.3.11)
    fn escape_text(&self, text: &str) -> String {
        text.replace("\\", "\\\\")
            .replace("\n", "\\n")
            .replace("\r", "\\r")
            .replace(",", "\\,")
            .replace(";", "\\;")
    }
}

impl Default for IcsGenerator {
    fn default() -> Self {
        Self::new(IcsOptions::default())
    }
}
