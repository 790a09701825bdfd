use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

use lesson_core::model::{AnswerValue, Lesson, LessonResult, StudentId, Submission, Task};
use storage::repository::ResultId;

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── PHASE & OUTCOME ───────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    InProgress,
    /// Terminal. The session accepts no further answers.
    Completed,
}

/// What a single submission produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub submission: Submission,
    pub phase: SessionPhase,
    /// Present only when this submission completed the lesson.
    pub result: Option<LessonResult>,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One learner's single attempt at a lesson.
///
/// Tasks are answered strictly in order through `submit_current_answer`; there
/// is no way to skip, revisit or resubmit. As a consequence
/// `submissions()[i].task_id() == lesson().tasks()[i].id()` for every answered
/// task at every point in the session's life.
pub struct LessonSession {
    lesson: Arc<Lesson>,
    student_id: Option<StudentId>,
    current: usize,
    submissions: Vec<Submission>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    result_id: Option<ResultId>,
}

impl LessonSession {
    /// Start an attempt at `lesson`.
    ///
    /// `started_at` should come from the services layer clock to keep time deterministic.
    #[must_use]
    pub fn new(lesson: Arc<Lesson>, started_at: DateTime<Utc>) -> Self {
        Self {
            submissions: Vec::with_capacity(lesson.len()),
            lesson,
            student_id: None,
            current: 0,
            started_at,
            completed_at: None,
            result_id: None,
        }
    }

    #[must_use]
    pub fn with_student(mut self, student_id: Option<StudentId>) -> Self {
        self.student_id = student_id;
        self
    }

    #[must_use]
    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    #[must_use]
    pub fn student_id(&self) -> Option<&StudentId> {
        self.student_id.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.completed_at.is_some() {
            SessionPhase::Completed
        } else {
            SessionPhase::InProgress
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase() == SessionPhase::Completed
    }

    /// Index of the task awaiting an answer; stays on the last task once complete.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn result_id(&self) -> Option<ResultId> {
        self.result_id
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.lesson.len();
        let answered = self.submissions.len();
        SessionProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            position: (self.current + 1).min(total),
            is_complete: self.is_complete(),
        }
    }

    /// The task awaiting an answer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Complete` once every task has been answered.
    pub fn current_task(&self) -> Result<&Task, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Complete);
        }
        self.lesson.task(self.current).ok_or(SessionError::Complete)
    }

    /// Grade `answer` against the current task and advance.
    ///
    /// Answering the last task completes the session and returns its result.
    /// A `submitted_at` earlier than the session start is clamped to the start.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` if the session is already complete;
    /// the session is left untouched.
    pub fn submit_current_answer(
        &mut self,
        answer: AnswerValue,
        submitted_at: DateTime<Utc>,
    ) -> Result<SubmitOutcome, SessionError> {
        if self.is_complete() {
            return Err(SessionError::InvalidState);
        }
        let task = self
            .lesson
            .task(self.current)
            .ok_or(SessionError::InvalidState)?;

        let submission = Submission::grade(task, answer);
        let is_last = self.current + 1 == self.lesson.len();
        self.submissions.push(submission.clone());

        if !is_last {
            self.current += 1;
            return Ok(SubmitOutcome {
                submission,
                phase: SessionPhase::InProgress,
                result: None,
            });
        }

        let completed_at = submitted_at.max(self.started_at);
        let result = match self.build_result(completed_at) {
            Ok(result) => result,
            Err(err) => {
                self.submissions.pop();
                return Err(err);
            }
        };
        self.completed_at = Some(completed_at);

        Ok(SubmitOutcome {
            submission,
            phase: SessionPhase::Completed,
            result: Some(result),
        })
    }

    /// Score summary of the finished attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotComplete` while tasks remain unanswered.
    pub fn result(&self) -> Result<LessonResult, SessionError> {
        let completed_at = self.completed_at.ok_or(SessionError::NotComplete)?;
        self.build_result(completed_at)
    }

    fn build_result(&self, completed_at: DateTime<Utc>) -> Result<LessonResult, SessionError> {
        Ok(LessonResult::from_submissions(
            &self.lesson,
            &self.submissions,
            self.started_at,
            completed_at,
        )?
        .with_student(self.student_id.clone()))
    }

    pub(crate) fn set_result_id(&mut self, id: ResultId) {
        self.result_id = Some(id);
    }
}

impl fmt::Debug for LessonSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LessonSession")
            .field("lesson_id", self.lesson.id())
            .field("student_id", &self.student_id)
            .field("tasks_len", &self.lesson.len())
            .field("current", &self.current)
            .field("submissions_len", &self.submissions.len())
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .field("result_id", &self.result_id)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
