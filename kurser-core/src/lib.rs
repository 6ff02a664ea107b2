//! Kurser Core Library
//!
//! Turns a course's date span, exam count and exercise list into dated
//! calendar events, and publishes them to a calendar service.

pub mod calendar;
pub mod chunk;
pub mod error;
pub mod events;
pub mod ics;
pub mod publisher;
pub mod schedule;
pub mod source;
pub mod types;

// Re-export core types and error handling
pub use error::{Error, Result};
pub use types::*;

/// Commonly used items
pub mod prelude {
    pub use crate::{
        calendar::*, events::*, ics::*, publisher::*, schedule::*, source::*, types::*,
    };
}
