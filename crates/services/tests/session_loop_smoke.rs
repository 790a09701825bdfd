use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use lesson_core::model::{AnswerValue, LessonId, LessonResult, StudentId};
use lesson_core::time::fixed_now;
use services::{Clock, ResultsService, SessionError, SessionLoopService, SessionPhase};
use storage::repository::{
    InMemoryRepository, LessonRepository, ResultId, ResultRepository, StorageError, StoredResult,
};
use storage::sample::sample_lesson;

fn sample_answers() -> Vec<AnswerValue> {
    vec![
        AnswerValue::sequence(["She", "plays", "the", "piano", "every", "day"]),
        AnswerValue::text("watching"),
        AnswerValue::text("2"),
        AnswerValue::sequence(["Do", "you", "speak", "English", "?"]),
    ]
}

#[tokio::test]
async fn session_loop_persists_result() {
    let repo = InMemoryRepository::new();
    let lesson = sample_lesson();
    repo.upsert_lesson(&lesson).await.unwrap();

    let loop_svc = SessionLoopService::new(
        Clock::fixed(fixed_now()),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
    );
    let student = StudentId::new("student-1");

    let mut session = loop_svc
        .start_session(lesson.id(), Some(student.clone()))
        .await
        .unwrap();

    let mut last = None;
    for answer in sample_answers() {
        last = Some(loop_svc.answer_current(&mut session, answer).await.unwrap());
    }
    let last = last.unwrap();

    assert!(last.is_complete());
    let result_id = last.result_id.expect("result persisted");
    let stored = repo.get_result(result_id).await.unwrap();
    assert_eq!(stored.score(), 3);
    assert_eq!(stored.max_score(), 4);
    assert_eq!(stored.percentage(), 75);
    assert_eq!(stored.student_id(), Some(&student));

    let err = loop_svc
        .answer_current(&mut session, AnswerValue::text("again"))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::InvalidState));
    assert_eq!(session.submissions().len(), 4);

    let progress = ResultsService::new(Arc::new(repo))
        .progress_for_student(&student)
        .await
        .unwrap();
    assert_eq!(progress.completed_lessons, 1);
    assert_eq!(progress.total_points, 3);
}

#[tokio::test]
async fn nothing_is_persisted_before_completion() {
    let repo = InMemoryRepository::new();
    let lesson = sample_lesson();
    repo.upsert_lesson(&lesson).await.unwrap();
    let loop_svc = SessionLoopService::new(
        Clock::fixed(fixed_now()),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
    );
    let student = StudentId::new("student-2");

    let mut session = loop_svc
        .start_session(lesson.id(), Some(student.clone()))
        .await
        .unwrap();
    for answer in sample_answers().into_iter().take(3) {
        let step = loop_svc.answer_current(&mut session, answer).await.unwrap();
        assert_eq!(step.phase, SessionPhase::InProgress);
        assert!(step.result_id.is_none());
    }

    let stored = repo.list_results_for_student(&student).await.unwrap();
    assert!(stored.is_empty());
    assert!(matches!(
        loop_svc.finalize_result(&mut session).await,
        Err(SessionError::NotComplete)
    ));
}

#[tokio::test]
async fn unknown_lesson_is_storage_error() {
    let repo = InMemoryRepository::new();
    let loop_svc = SessionLoopService::new(
        Clock::fixed(fixed_now()),
        Arc::new(repo.clone()),
        Arc::new(repo),
    );

    let err = loop_svc
        .start_session(&LessonId::new("missing"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Storage(StorageError::NotFound)));
}

/// Result store that fails its first append.
#[derive(Default)]
struct FlakyResults {
    inner: InMemoryRepository,
    failed_once: AtomicBool,
}

#[async_trait]
impl ResultRepository for FlakyResults {
    async fn append_result(&self, result: &LessonResult) -> Result<ResultId, StorageError> {
        if !self.failed_once.swap(true, Ordering::SeqCst) {
            return Err(StorageError::Connection("backend unavailable".into()));
        }
        self.inner.append_result(result).await
    }

    async fn get_result(&self, id: ResultId) -> Result<LessonResult, StorageError> {
        self.inner.get_result(id).await
    }

    async fn list_results_for_student(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<StoredResult>, StorageError> {
        self.inner.list_results_for_student(student_id).await
    }
}

#[tokio::test]
async fn finalize_result_retries_failed_persist() {
    let lessons = InMemoryRepository::new();
    let lesson = sample_lesson();
    lessons.upsert_lesson(&lesson).await.unwrap();
    let results = Arc::new(FlakyResults::default());

    let loop_svc = SessionLoopService::new(
        Clock::fixed(fixed_now()),
        Arc::new(lessons),
        results.clone(),
    );
    let mut session = loop_svc.start_session(lesson.id(), None).await.unwrap();

    let answers = sample_answers();
    let (last, rest) = answers.split_last().unwrap();
    for answer in rest {
        loop_svc
            .answer_current(&mut session, answer.clone())
            .await
            .unwrap();
    }
    let err = loop_svc
        .answer_current(&mut session, last.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Storage(_)));
    assert!(session.is_complete());
    assert!(session.result_id().is_none());

    let id = loop_svc.finalize_result(&mut session).await.unwrap();
    assert_eq!(session.result_id(), Some(id));
    assert_eq!(loop_svc.finalize_result(&mut session).await.unwrap(), id);
    assert_eq!(results.get_result(id).await.unwrap().score(), 3);
}
