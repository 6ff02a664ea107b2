use std::{fs, path::Path, path::PathBuf, time::Duration};

use anyhow::Result;
use kurser_core::prelude::*;
use tokio_util::sync::CancellationToken;

/// Parameters of the publish command
pub struct PublishParams {
    pub courses_dir: PathBuf,
    pub token: String,
    pub calendar: String,
    pub timezone: String,
    pub max_attempts: Option<u32>,
    pub max_delay_secs: Option<u64>,
}

/// Course files of a directory, split into parsed courses and the number of
/// files that failed to parse
struct LoadedCourses {
    courses: Vec<Course>,
    failed: usize,
}

/// Load every course file, reporting the ones that fail to parse
fn load_courses(dir: &Path) -> Result<LoadedCourses> {
    let directory = CourseDirectory::new(dir);
    let results = directory.load_all().map_err(|e| {
        anyhow::anyhow!(
            "Cannot read course directory {}: {}",
            directory.path().display(),
            e
        )
    })?;

    let mut loaded = LoadedCourses {
        courses: Vec::with_capacity(results.len()),
        failed: 0,
    };
    for result in results {
        match result {
            Ok(course) => loaded.courses.push(course),
            Err(e) => {
                tracing::error!("{}", e);
                println!("✗ {}", e);
                loaded.failed += 1;
            }
        }
    }

    tracing::info!(
        "Loaded {} courses from {} ({} unreadable)",
        loaded.courses.len(),
        directory.path().display(),
        loaded.failed
    );
    Ok(loaded)
}

/// Print the planned events of each course
pub fn plan_command(dir: &Path) -> Result<()> {
    for course in load_courses(dir)?.courses {
        println!("{} ({} - {})", course.name, course.start, course.stop);
        match plan(&course) {
            Ok(events) => {
                for event in events {
                    println!(
                        "  {} .. {}  [{:>2}] {}",
                        event.start_date,
                        event.end_date,
                        event.category.color_id(),
                        event.summary
                    );
                }
            }
            Err(e) => println!("  ✗ {}", e),
        }
    }

    Ok(())
}

/// Render all planned events into one ICS file
pub fn export_command(
    dir: &Path,
    output: &Path,
    calendar_name: String,
    timezone: String,
) -> Result<()> {
    let mut planned = Vec::new();
    for course in load_courses(dir)?.courses {
        match plan(&course) {
            Ok(events) => planned.push((course.name, events)),
            Err(e) => {
                tracing::error!("Skipping course {}: {}", course.name, e);
                println!("✗ {}", e);
            }
        }
    }

    let generator = IcsGenerator::new(IcsOptions {
        calendar_name: Some(calendar_name),
        timezone: Some(timezone),
    });
    let ics_content = generator.generate(&planned)?;

    fs::write(output, ics_content)?;
    println!(
        "✓ Wrote {} courses to {}",
        planned.len(),
        output.display()
    );

    Ok(())
}

/// Publish every course to the target calendar
pub async fn publish_command(params: PublishParams) -> Result<()> {
    let LoadedCourses { courses, failed: unreadable } = load_courses(&params.courses_dir)?;

    let options = PublishOptions {
        calendar_name: params.calendar,
        timezone: params.timezone,
        retry: RetryPolicy {
            max_attempts: params.max_attempts,
            max_delay: params.max_delay_secs.map(Duration::from_secs),
        },
    };

    let google = GoogleCalendar::new(params.token)?;
    let calendar_id = google.locate_or_create(&options.calendar_name).await?;

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping before the next request");
            on_ctrl_c.cancel();
        }
    });

    let publisher = Publisher::new(&google, calendar_id, &options).with_cancellation(cancel);
    println!(
        "✓ Using calendar {} ({})",
        options.calendar_name,
        publisher.calendar_id()
    );

    let outcomes = run_courses(courses, &publisher).await;

    let mut failed = unreadable;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(report) => println!(
                "✓ {}: {} events published ({} retries)",
                outcome.course, report.published, report.retries
            ),
            Err(e) => {
                failed += 1;
                println!("✗ {}: {}", outcome.course, e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!(
            "{} of {} courses failed",
            failed,
            outcomes.len() + unreadable
        );
    }

    Ok(())
}

/// Delete the target calendar
pub async fn delete_calendar_command(token: String, calendar: String) -> Result<()> {
    let google = GoogleCalendar::new(token)?;

    match google.find_calendar(&calendar).await? {
        Some(id) => {
            google.delete_calendar(&id).await?;
            println!("✓ Deleted calendar {}", calendar);
        }
        None => println!("Calendar {} does not exist", calendar),
    }

    Ok(())
}
