//! Lesson files in the JSON layout used by the lesson editor.

use std::path::Path;

use lesson_core::model::{Lesson, LessonDraft};

use crate::repository::StorageError;

/// Parse and validate a lesson from JSON text.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the JSON is malformed, or
/// `StorageError::Invalid` if the lesson or any of its tasks fails validation.
pub fn parse_lesson(text: &str) -> Result<Lesson, StorageError> {
    let draft: LessonDraft =
        serde_json::from_str(text).map_err(|e| StorageError::Serialization(e.to_string()))?;
    Ok(draft.validate().map_err(lesson_core::Error::from_lesson)?)
}

/// Read and validate a lesson file.
///
/// # Errors
///
/// Returns `StorageError::Io` if the file cannot be read, or the errors of
/// [`parse_lesson`].
pub fn load_lesson(path: impl AsRef<Path>) -> Result<Lesson, StorageError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| StorageError::Io(format!("{}: {e}", path.display())))?;
    parse_lesson(&text)
}

/// Pretty-printed JSON for a lesson.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn to_json(lesson: &Lesson) -> Result<String, StorageError> {
    serde_json::to_string_pretty(lesson).map_err(|e| StorageError::Serialization(e.to_string()))
}
