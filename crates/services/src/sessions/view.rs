use chrono::{DateTime, Utc};
use std::sync::Arc;

use lesson_core::model::{LessonId, LessonResult, StudentId, StudentProgress};
use storage::repository::{ResultId, ResultRepository, StoredResult};

use crate::error::SessionError;

/// Presentation-agnostic list item for a stored lesson result.
///
/// No pre-formatted strings; the UI formats timestamps and percentages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultListItem {
    pub id: ResultId,
    pub lesson_id: LessonId,
    pub completed_at: DateTime<Utc>,
    pub score: u32,
    pub max_score: u32,
    pub percentage: u8,
}

impl ResultListItem {
    #[must_use]
    pub fn from_stored(stored: &StoredResult) -> Self {
        let result = &stored.result;
        Self {
            id: stored.id,
            lesson_id: result.lesson_id().clone(),
            completed_at: result.completed_at(),
            score: result.score(),
            max_score: result.max_score(),
            percentage: result.percentage(),
        }
    }
}

/// Read side over stored results: history and progress per student.
#[derive(Clone)]
pub struct ResultsService {
    results: Arc<dyn ResultRepository>,
}

impl ResultsService {
    #[must_use]
    pub fn new(results: Arc<dyn ResultRepository>) -> Self {
        Self { results }
    }

    /// Results for a student, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` on repository failures.
    pub async fn list_for_student(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<ResultListItem>, SessionError> {
        let rows = self.results.list_results_for_student(student_id).await?;
        Ok(rows.iter().map(ResultListItem::from_stored).collect())
    }

    /// Completed lessons, points and average percentage for a student.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` on repository failures.
    pub async fn progress_for_student(
        &self,
        student_id: &StudentId,
    ) -> Result<StudentProgress, SessionError> {
        let rows = self.results.list_results_for_student(student_id).await?;
        let results: Vec<LessonResult> = rows.into_iter().map(|row| row.result).collect();
        Ok(StudentProgress::from_results(&results))
    }

    /// Fetch a full result, including its per-task breakdown.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` when repository access fails.
    pub async fn get_result(&self, id: ResultId) -> Result<LessonResult, SessionError> {
        Ok(self.results.get_result(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use lesson_core::model::{AnswerValue, Submission};
    use lesson_core::time::fixed_now;
    use storage::repository::InMemoryRepository;
    use storage::sample::sample_lesson;

    fn result_with_wrong(wrong: usize, student: &str) -> LessonResult {
        let lesson = sample_lesson();
        let submissions: Vec<_> = lesson
            .tasks()
            .iter()
            .enumerate()
            .map(|(i, t)| {
                if i < wrong {
                    Submission::grade(t, AnswerValue::text("wrong"))
                } else {
                    Submission::grade(t, t.correct_answer())
                }
            })
            .collect();
        LessonResult::from_submissions(&lesson, &submissions, fixed_now(), fixed_now())
            .unwrap()
            .with_student(Some(StudentId::new(student)))
    }

    #[test]
    fn list_item_is_presentation_agnostic() {
        let stored = StoredResult {
            id: 42,
            result: result_with_wrong(1, "student-1"),
        };

        let item = ResultListItem::from_stored(&stored);

        assert_eq!(item.id, 42);
        assert_eq!(item.completed_at, fixed_now());
        assert_eq!(item.score, 3);
        assert_eq!(item.max_score, 4);
        assert_eq!(item.percentage, 75);
    }

    #[tokio::test]
    async fn progress_aggregates_only_the_students_results() {
        let repo = InMemoryRepository::new();
        repo.append_result(&result_with_wrong(0, "student-1"))
            .await
            .unwrap();
        repo.append_result(&result_with_wrong(2, "student-1"))
            .await
            .unwrap();
        repo.append_result(&result_with_wrong(4, "student-2"))
            .await
            .unwrap();

        let svc = ResultsService::new(Arc::new(repo));
        let student = StudentId::new("student-1");

        let items = svc.list_for_student(&student).await.unwrap();
        assert_eq!(items.len(), 2);

        let progress = svc.progress_for_student(&student).await.unwrap();
        assert_eq!(progress.completed_lessons, 2);
        assert_eq!(progress.total_points, 6);
        assert_eq!(progress.average_percentage, 75);
        assert_eq!(progress.best_percentage, 100);
    }

    #[tokio::test]
    async fn unknown_result_is_storage_error() {
        let svc = ResultsService::new(Arc::new(InMemoryRepository::new()));
        let err = svc.get_result(99).await.unwrap_err();
        assert!(matches!(err, SessionError::Storage(_)));
    }
}
