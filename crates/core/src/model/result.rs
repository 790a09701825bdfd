use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    answer::AnswerValue,
    ids::{LessonId, StudentId, TaskId},
    lesson::Lesson,
    submission::Submission,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResultError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("expected {expected} submissions, got {actual}")]
    SubmissionCount { expected: usize, actual: usize },

    #[error("submission {index} is for task {found}, expected {expected}")]
    TaskMismatch {
        index: usize,
        expected: TaskId,
        found: TaskId,
    },
}

/// One reviewed task: what was asked, what was expected, what was given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultItem {
    pub task_id: TaskId,
    pub prompt: String,
    pub correct_answer: AnswerValue,
    pub answer: AnswerValue,
    pub is_correct: bool,
}

/// Score summary of a finished lesson attempt.
///
/// Serialize-only: a result is built from submissions, never read back from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonResult {
    lesson_id: LessonId,
    student_id: Option<StudentId>,
    score: u32,
    max_score: u32,
    percentage: u8,
    breakdown: Vec<ResultItem>,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl LessonResult {
    /// Aggregate a full, in-order set of submissions for `lesson`.
    ///
    /// # Errors
    ///
    /// Returns `ResultError::SubmissionCount` unless there is exactly one
    /// submission per task, `ResultError::TaskMismatch` if a submission is out
    /// of task order, and `ResultError::InvalidTimeRange` if `completed_at` is
    /// before `started_at`.
    pub fn from_submissions(
        lesson: &Lesson,
        submissions: &[Submission],
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, ResultError> {
        if completed_at < started_at {
            return Err(ResultError::InvalidTimeRange);
        }
        if submissions.len() != lesson.len() {
            return Err(ResultError::SubmissionCount {
                expected: lesson.len(),
                actual: submissions.len(),
            });
        }

        let mut breakdown = Vec::with_capacity(submissions.len());
        for (index, (task, submission)) in lesson.tasks().iter().zip(submissions).enumerate() {
            if submission.task_id() != task.id() {
                return Err(ResultError::TaskMismatch {
                    index,
                    expected: task.id().clone(),
                    found: submission.task_id().clone(),
                });
            }
            breakdown.push(ResultItem {
                task_id: task.id().clone(),
                prompt: task.prompt().to_owned(),
                correct_answer: task.correct_answer(),
                answer: submission.answer().clone(),
                is_correct: submission.is_correct(),
            });
        }

        let score = breakdown.iter().filter(|item| item.is_correct).count();
        let score = u32::try_from(score).unwrap_or(u32::MAX);
        let max_score = u32::try_from(lesson.len()).unwrap_or(u32::MAX);

        Ok(Self {
            lesson_id: lesson.id().clone(),
            student_id: None,
            score,
            max_score,
            percentage: percentage(score, max_score),
            breakdown,
            started_at,
            completed_at,
        })
    }

    #[must_use]
    pub fn with_student(mut self, student_id: Option<StudentId>) -> Self {
        self.student_id = student_id;
        self
    }

    #[must_use]
    pub fn lesson_id(&self) -> &LessonId {
        &self.lesson_id
    }

    #[must_use]
    pub fn student_id(&self) -> Option<&StudentId> {
        self.student_id.as_ref()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn max_score(&self) -> u32 {
        self.max_score
    }

    #[must_use]
    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    #[must_use]
    pub fn breakdown(&self) -> &[ResultItem] {
        &self.breakdown
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}

/// `score / max_score` as a whole percent, halves rounded up.
///
/// Returns 0 when `max_score` is 0 and never exceeds 100.
#[must_use]
pub fn percentage(score: u32, max_score: u32) -> u8 {
    if max_score == 0 {
        return 0;
    }
    let score = u64::from(score.min(max_score));
    let max = u64::from(max_score);
    let rounded = (score * 200 + max) / (2 * max);
    u8::try_from(rounded).unwrap_or(100)
}
