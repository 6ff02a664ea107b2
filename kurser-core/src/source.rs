//! Course definitions stored as plain text files, one course per file.
//!
//! ```text
//! 2024-03-01 2024-03-20     start and stop date
//! 3                         number of exam days
//! 4                         chapter
//! 1 2 5 7                   exercises of that chapter
//! 5
//! 3 4
//! ```
//!
//! The file name without extension is the course name. The example yields
//! the exercises `4.1 4.2 4.5 4.7 5.3 5.4`.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::{Course, Error, Result};

impl Course {
    /// Parse a course definition. `name` is used for the course and in errors.
    ///
    /// # Errors
    ///
    /// [`Error::CourseFile`] for a missing or malformed line,
    /// [`Error::DateTime`] for a bad date.
    pub fn parse(name: &str, text: &str) -> Result<Self> {
        let fail = |message: String| Error::CourseFile {
            path: name.to_string(),
            message,
        };

        let mut lines = text.lines();

        let period = lines
            .next()
            .ok_or_else(|| fail("missing date line".to_string()))?;
        let mut dates = period.split_whitespace();
        let (start, stop) = match (dates.next(), dates.next(), dates.next()) {
            (Some(start), Some(stop), None) => (start, stop),
            _ => {
                return Err(fail(format!(
                    "expected '<start> <stop>' on the first line, got '{}'",
                    period.trim()
                )));
            }
        };
        let start = NaiveDate::parse_from_str(start, "%Y-%m-%d")?;
        let stop = NaiveDate::parse_from_str(stop, "%Y-%m-%d")?;

        let exam_line = lines
            .next()
            .ok_or_else(|| fail("missing exam count line".to_string()))?;
        let exam_count = exam_line
            .trim()
            .parse::<u32>()
            .map_err(|e| fail(format!("invalid exam count '{}': {}", exam_line.trim(), e)))?;

        let rest: Vec<&str> = lines.collect();
        let exercises = rest
            .chunks_exact(2)
            .flat_map(|pair| {
                let chapter = pair[0].trim_end();
                pair[1]
                    .split_whitespace()
                    .map(move |exercise| format!("{}.{}", chapter, exercise))
            })
            .collect();

        Ok(Course::new(name, start, stop, exam_count, exercises))
    }
}

/// A directory of course files
#[derive(Debug, Clone)]
pub struct CourseDirectory {
    path: PathBuf,
}

impl CourseDirectory {
    /// Directory at `path`; nothing is read yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Directory being read
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse one file, naming the course after the file stem
    ///
    /// # Errors
    ///
    /// [`Error::CourseFile`] naming the file.
    pub fn load_file(path: &Path) -> Result<Course> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::CourseFile {
                path: path.display().to_string(),
                message: "file name is not valid UTF-8".to_string(),
            })?;
        let text = std::fs::read_to_string(path).map_err(|e| Error::CourseFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Course::parse(name, &text).map_err(|e| match e {
            Error::CourseFile { message, .. } => Error::CourseFile {
                path: path.display().to_string(),
                message,
            },
            other => Error::CourseFile {
                path: path.display().to_string(),
                message: other.to_string(),
            },
        })
    }

    /// Parse every regular file in the directory, sorted by file name.
    ///
    /// Only a failure to list the directory is an error; each file carries
    /// its own parse result.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] when the directory cannot be listed.
    pub fn load_all(&self) -> Result<Vec<Result<Course>>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.path)? {
            let path = entry?.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        tracing::debug!(
            "Found {} course files in {}",
            files.len(),
            self.path.display()
        );

        Ok(files.iter().map(|p| Self::load_file(p)).collect())
    }
}
