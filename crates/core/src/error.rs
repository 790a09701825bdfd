use thiserror::Error;

use crate::model::{LessonError, ResultError, TaskError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    MalformedTask(#[from] TaskError),
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    Aggregation(#[from] ResultError),
}

impl Error {
    /// Wrap a lesson validation failure, surfacing a bad task as `MalformedTask`.
    #[must_use]
    pub fn from_lesson(err: LessonError) -> Self {
        match err {
            LessonError::Task { source, .. } => Self::MalformedTask(source),
            other => Self::Lesson(other),
        }
    }
}
