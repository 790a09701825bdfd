use async_trait::async_trait;
use lesson_core::model::{Lesson, LessonId, LessonResult, StudentId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("invalid lesson: {0}")]
    Invalid(#[from] lesson_core::Error),
}

/// Identifier assigned to a result when it is appended.
pub type ResultId = i64;

/// A completed lesson result together with its storage id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResult {
    pub id: ResultId,
    pub result: LessonResult,
}

/// Repository contract for authored lessons.
#[async_trait]
pub trait LessonRepository: Send + Sync {
    /// Persist or replace a lesson.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lesson cannot be stored.
    async fn upsert_lesson(&self, lesson: &Lesson) -> Result<(), StorageError>;

    /// Fetch a lesson by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_lesson(&self, id: &LessonId) -> Result<Lesson, StorageError>;

    /// All lessons ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_lessons(&self) -> Result<Vec<Lesson>, StorageError>;
}

/// Repository contract for completed lesson results.
///
/// Only `LessonResult` values are accepted, and those can only be built from a
/// full set of submissions, so a partial attempt is never stored as a result.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Append a completed result and return its new id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the result cannot be stored.
    async fn append_result(&self, result: &LessonResult) -> Result<ResultId, StorageError>;

    /// Fetch a result by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_result(&self, id: ResultId) -> Result<LessonResult, StorageError>;

    /// Results recorded for a student, oldest completion first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_results_for_student(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<StoredResult>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    lessons: Arc<Mutex<HashMap<LessonId, Lesson>>>,
    results: Arc<Mutex<Vec<StoredResult>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LessonRepository for InMemoryRepository {
    async fn upsert_lesson(&self, lesson: &Lesson) -> Result<(), StorageError> {
        let mut guard = self
            .lessons
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(lesson.id().clone(), lesson.clone());
        Ok(())
    }

    async fn get_lesson(&self, id: &LessonId) -> Result<Lesson, StorageError> {
        let guard = self
            .lessons
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(id).cloned().ok_or(StorageError::NotFound)
    }

    async fn list_lessons(&self) -> Result<Vec<Lesson>, StorageError> {
        let guard = self
            .lessons
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut lessons: Vec<Lesson> = guard.values().cloned().collect();
        lessons.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(lessons)
    }
}

#[async_trait]
impl ResultRepository for InMemoryRepository {
    async fn append_result(&self, result: &LessonResult) -> Result<ResultId, StorageError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let id = ResultId::try_from(guard.len())
            .map_err(|_| StorageError::Conflict)?
            .saturating_add(1);
        guard.push(StoredResult {
            id,
            result: result.clone(),
        });
        Ok(id)
    }

    async fn get_result(&self, id: ResultId) -> Result<LessonResult, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .iter()
            .find(|stored| stored.id == id)
            .map(|stored| stored.result.clone())
            .ok_or(StorageError::NotFound)
    }

    async fn list_results_for_student(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<StoredResult>, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut found: Vec<StoredResult> = guard
            .iter()
            .filter(|stored| stored.result.student_id() == Some(student_id))
            .cloned()
            .collect();
        found.sort_by_key(|stored| (stored.result.completed_at(), stored.id));
        Ok(found)
    }
}

/// Aggregates lesson and result repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub lessons: Arc<dyn LessonRepository>,
    pub results: Arc<dyn ResultRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let lessons: Arc<dyn LessonRepository> = Arc::new(repo.clone());
        let results: Arc<dyn ResultRepository> = Arc::new(repo);
        Self { lessons, results }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesson_core::model::{AnswerValue, Submission};
    use lesson_core::time::fixed_now;

    fn result_for(lesson: &Lesson, student: &str) -> LessonResult {
        let submissions: Vec<_> = lesson
            .tasks()
            .iter()
            .map(|t| Submission::grade(t, t.correct_answer()))
            .collect();
        LessonResult::from_submissions(lesson, &submissions, fixed_now(), fixed_now())
            .unwrap()
            .with_student(Some(StudentId::new(student)))
    }

    #[tokio::test]
    async fn lessons_round_trip_and_list_sorted() {
        let repo = InMemoryRepository::new();
        let lesson = crate::sample::sample_lesson();
        repo.upsert_lesson(&lesson).await.unwrap();

        let fetched = repo.get_lesson(lesson.id()).await.unwrap();
        assert_eq!(fetched, lesson);

        let missing = repo.get_lesson(&LessonId::new("nope")).await.unwrap_err();
        assert!(matches!(missing, StorageError::NotFound));

        assert_eq!(repo.list_lessons().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn results_are_numbered_and_filtered_by_student() {
        let repo = InMemoryRepository::new();
        let lesson = crate::sample::sample_lesson();

        let first = repo.append_result(&result_for(&lesson, "student-1")).await.unwrap();
        let second = repo.append_result(&result_for(&lesson, "student-2")).await.unwrap();
        assert_eq!((first, second), (1, 2));

        let mine = repo
            .list_results_for_student(&StudentId::new("student-1"))
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, 1);

        let fetched = repo.get_result(second).await.unwrap();
        assert_eq!(fetched.student_id(), Some(&StudentId::new("student-2")));
        assert_eq!(fetched.breakdown().len(), 4);
        assert_eq!(
            fetched.breakdown()[1].answer,
            AnswerValue::text("am watching")
        );
    }
}
