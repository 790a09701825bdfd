use std::sync::Arc;

use lesson_core::model::{AnswerValue, LessonId, LessonResult, StudentId, Submission};
use storage::repository::{LessonRepository, ResultId, ResultRepository};
use tracing::{debug, info, warn};

use super::service::{LessonSession, SessionPhase};
use crate::Clock;
use crate::error::SessionError;

/// Result of answering a single task in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAnswerResult {
    pub submission: Submission,
    pub phase: SessionPhase,
    pub result: Option<LessonResult>,
    pub result_id: Option<ResultId>,
}

impl SessionAnswerResult {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == SessionPhase::Completed
    }
}

/// Orchestrates session start and persisted answering.
#[derive(Clone)]
pub struct SessionLoopService {
    clock: Clock,
    lessons: Arc<dyn LessonRepository>,
    results: Arc<dyn ResultRepository>,
}

impl SessionLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        lessons: Arc<dyn LessonRepository>,
        results: Arc<dyn ResultRepository>,
    ) -> Self {
        Self {
            clock,
            lessons,
            results,
        }
    }

    /// Start a new attempt at the given lesson.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the lesson cannot be loaded.
    pub async fn start_session(
        &self,
        lesson_id: &LessonId,
        student_id: Option<StudentId>,
    ) -> Result<LessonSession, SessionError> {
        let lesson = self.lessons.get_lesson(lesson_id).await?;
        info!(
            lesson_id = %lesson_id,
            student_id = student_id.as_ref().map(|s| s.as_str()),
            tasks = lesson.len(),
            "lesson session started"
        );
        Ok(LessonSession::new(Arc::new(lesson), self.clock.now()).with_student(student_id))
    }

    /// Answer the current task and persist the result when the lesson completes.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` if the session already completed,
    /// or `SessionError::Storage` if persisting the final result fails. In the
    /// latter case the session is complete and `finalize_result` can retry.
    pub async fn answer_current(
        &self,
        session: &mut LessonSession,
        answer: AnswerValue,
    ) -> Result<SessionAnswerResult, SessionError> {
        let outcome = session.submit_current_answer(answer, self.clock.now())?;
        debug!(
            task_id = %outcome.submission.task_id(),
            correct = outcome.submission.is_correct(),
            "answer graded"
        );

        if let Some(result) = &outcome.result {
            info!(
                lesson_id = %result.lesson_id(),
                score = result.score(),
                max_score = result.max_score(),
                percentage = result.percentage(),
                "lesson session completed"
            );
            if session.result_id().is_none() {
                let id = self.persist(result).await?;
                session.set_result_id(id);
            }
        }

        Ok(SessionAnswerResult {
            submission: outcome.submission,
            phase: outcome.phase,
            result: outcome.result,
            result_id: session.result_id(),
        })
    }

    /// Retry result persistence after a completed session.
    ///
    /// This is useful when the final append failed (e.g. transient storage error).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotComplete` if the session is still in progress.
    /// Returns `SessionError::Storage` if persistence fails.
    pub async fn finalize_result(
        &self,
        session: &mut LessonSession,
    ) -> Result<ResultId, SessionError> {
        if let Some(id) = session.result_id() {
            return Ok(id);
        }
        let result = session.result()?;
        let id = self.persist(&result).await?;
        session.set_result_id(id);
        Ok(id)
    }

    async fn persist(&self, result: &LessonResult) -> Result<ResultId, SessionError> {
        match self.results.append_result(result).await {
            Ok(id) => {
                debug!(result_id = id, "lesson result stored");
                Ok(id)
            }
            Err(err) => {
                warn!(error = %err, lesson_id = %result.lesson_id(), "failed to store lesson result");
                Err(err.into())
            }
        }
    }
}
