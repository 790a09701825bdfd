use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::{answer::AnswerValue, ids::TaskId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Shape violations caught while building a `Task`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TaskError {
    #[error("task id cannot be empty")]
    EmptyId,

    #[error("task prompt cannot be empty")]
    EmptyPrompt,

    #[error("{kind} task expects a sequence of words as its correct answer")]
    ExpectedSequence { kind: TaskKind },

    #[error("{kind} task expects a single text value as its correct answer")]
    ExpectedText { kind: TaskKind },

    #[error("correct answer cannot be empty")]
    EmptyCorrectAnswer,

    #[error("word-order task requires a word pool")]
    MissingWords,

    #[error("{kind} task must not carry a word pool")]
    UnexpectedWords { kind: TaskKind },

    #[error("multiple-choice task requires options")]
    MissingOptions,

    #[error("{kind} task must not carry options")]
    UnexpectedOptions { kind: TaskKind },

    #[error("multiple-choice task needs at least 2 options, got {count}")]
    TooFewOptions { count: usize },

    #[error("option {position} is blank")]
    BlankOption { position: usize },

    #[error("correct word order must use exactly the words in the pool")]
    WordsMismatch,

    #[error("correct choice {value:?} is not a 1-based option number")]
    ChoiceNotIndex { value: String },

    #[error("correct choice {value} is outside 1..={options}")]
    ChoiceOutOfRange { value: usize, options: usize },
}

//
// ─── TASK KIND ─────────────────────────────────────────────────────────────────
//

/// The closed set of exercise types a lesson can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskKind {
    /// Arrange a pool of words into the correct sentence.
    WordOrder,
    /// Type the missing words of a sentence.
    FillGap,
    /// Pick one of the numbered options.
    MultipleChoice,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TaskKind::WordOrder => "word-order",
            TaskKind::FillGap => "fill-gap",
            TaskKind::MultipleChoice => "multiple-choice",
        })
    }
}

//
// ─── TASK ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TaskBody {
    WordOrder {
        words: Vec<String>,
        correct: Vec<String>,
    },
    FillGap {
        correct: String,
    },
    MultipleChoice {
        options: Vec<String>,
        correct: String,
    },
}

/// One gradable exercise.
///
/// Only reachable through `TaskDraft::validate` (or the typed constructors that
/// wrap it), so the correct answer always matches the task kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskDraft", into = "TaskDraft")]
pub struct Task {
    id: TaskId,
    prompt: String,
    body: TaskBody,
}

impl Task {
    /// # Errors
    ///
    /// Returns `TaskError` if the word pool and correct order disagree.
    pub fn word_order<W, C>(
        id: impl Into<String>,
        prompt: impl Into<String>,
        words: W,
        correct: C,
    ) -> Result<Self, TaskError>
    where
        W: IntoIterator,
        W::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        TaskDraft {
            id: id.into(),
            kind: TaskKind::WordOrder,
            question: prompt.into(),
            correct_answer: AnswerValue::sequence(correct),
            options: None,
            words: Some(words.into_iter().map(Into::into).collect()),
        }
        .validate()
    }

    /// # Errors
    ///
    /// Returns `TaskError` if the id, prompt or correct answer is blank.
    pub fn fill_gap(
        id: impl Into<String>,
        prompt: impl Into<String>,
        correct: impl Into<String>,
    ) -> Result<Self, TaskError> {
        TaskDraft {
            id: id.into(),
            kind: TaskKind::FillGap,
            question: prompt.into(),
            correct_answer: AnswerValue::text(correct),
            options: None,
            words: None,
        }
        .validate()
    }

    /// # Errors
    ///
    /// Returns `TaskError` if the options are unusable or `correct` is not a
    /// canonical 1-based option number.
    pub fn multiple_choice<O>(
        id: impl Into<String>,
        prompt: impl Into<String>,
        options: O,
        correct: impl Into<String>,
    ) -> Result<Self, TaskError>
    where
        O: IntoIterator,
        O::Item: Into<String>,
    {
        TaskDraft {
            id: id.into(),
            kind: TaskKind::MultipleChoice,
            question: prompt.into(),
            correct_answer: AnswerValue::text(correct),
            options: Some(options.into_iter().map(Into::into).collect()),
            words: None,
        }
        .validate()
    }

    #[must_use]
    pub fn id(&self) -> &TaskId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn kind(&self) -> TaskKind {
        match self.body {
            TaskBody::WordOrder { .. } => TaskKind::WordOrder,
            TaskBody::FillGap { .. } => TaskKind::FillGap,
            TaskBody::MultipleChoice { .. } => TaskKind::MultipleChoice,
        }
    }

    #[must_use]
    pub fn correct_answer(&self) -> AnswerValue {
        match &self.body {
            TaskBody::WordOrder { correct, .. } => AnswerValue::Sequence(correct.clone()),
            TaskBody::FillGap { correct } | TaskBody::MultipleChoice { correct, .. } => {
                AnswerValue::Text(correct.clone())
            }
        }
    }

    /// The word pool of a word-order task.
    #[must_use]
    pub fn words(&self) -> Option<&[String]> {
        match &self.body {
            TaskBody::WordOrder { words, .. } => Some(words),
            _ => None,
        }
    }

    /// The options of a multiple-choice task, in display order.
    #[must_use]
    pub fn options(&self) -> Option<&[String]> {
        match &self.body {
            TaskBody::MultipleChoice { options, .. } => Some(options),
            _ => None,
        }
    }

    pub(crate) fn body(&self) -> &TaskBody {
        &self.body
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated task as authored or loaded from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TaskKind,
    #[serde(alias = "prompt")]
    pub question: String,
    pub correct_answer: AnswerValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<String>>,
}

impl TaskDraft {
    /// Check the draft's shape against its kind and build a `Task`.
    ///
    /// # Errors
    ///
    /// Returns the first `TaskError` found.
    pub fn validate(self) -> Result<Task, TaskError> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(TaskError::EmptyId);
        }
        if self.question.trim().is_empty() {
            return Err(TaskError::EmptyPrompt);
        }

        let kind = self.kind;
        let body = match kind {
            TaskKind::WordOrder => {
                if self.options.is_some() {
                    return Err(TaskError::UnexpectedOptions { kind });
                }
                let words = self.words.ok_or(TaskError::MissingWords)?;
                let AnswerValue::Sequence(correct) = self.correct_answer else {
                    return Err(TaskError::ExpectedSequence { kind });
                };
                check_word_order(&words, &correct)?;
                TaskBody::WordOrder { words, correct }
            }
            TaskKind::FillGap => {
                if self.options.is_some() {
                    return Err(TaskError::UnexpectedOptions { kind });
                }
                if self.words.is_some() {
                    return Err(TaskError::UnexpectedWords { kind });
                }
                let AnswerValue::Text(correct) = self.correct_answer else {
                    return Err(TaskError::ExpectedText { kind });
                };
                if correct.trim().is_empty() {
                    return Err(TaskError::EmptyCorrectAnswer);
                }
                TaskBody::FillGap { correct }
            }
            TaskKind::MultipleChoice => {
                if self.words.is_some() {
                    return Err(TaskError::UnexpectedWords { kind });
                }
                let options = self.options.ok_or(TaskError::MissingOptions)?;
                let AnswerValue::Text(correct) = self.correct_answer else {
                    return Err(TaskError::ExpectedText { kind });
                };
                check_options(&options)?;
                check_choice(&correct, options.len())?;
                TaskBody::MultipleChoice { options, correct }
            }
        };

        Ok(Task {
            id: TaskId::new(id),
            prompt: self.question,
            body,
        })
    }
}

impl TryFrom<TaskDraft> for Task {
    type Error = TaskError;

    fn try_from(draft: TaskDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

impl From<Task> for TaskDraft {
    fn from(task: Task) -> Self {
        let kind = task.kind();
        let (correct_answer, options, words) = match task.body {
            TaskBody::WordOrder { words, correct } => {
                (AnswerValue::Sequence(correct), None, Some(words))
            }
            TaskBody::FillGap { correct } => (AnswerValue::Text(correct), None, None),
            TaskBody::MultipleChoice { options, correct } => {
                (AnswerValue::Text(correct), Some(options), None)
            }
        };
        Self {
            id: task.id.as_str().to_owned(),
            kind,
            question: task.prompt,
            correct_answer,
            options,
            words,
        }
    }
}

fn check_word_order(words: &[String], correct: &[String]) -> Result<(), TaskError> {
    if correct.is_empty() || correct.iter().any(|w| w.trim().is_empty()) {
        return Err(TaskError::EmptyCorrectAnswer);
    }
    let mut pool: Vec<&str> = words.iter().map(String::as_str).collect();
    let mut expected: Vec<&str> = correct.iter().map(String::as_str).collect();
    pool.sort_unstable();
    expected.sort_unstable();
    if pool != expected {
        return Err(TaskError::WordsMismatch);
    }
    Ok(())
}

fn check_options(options: &[String]) -> Result<(), TaskError> {
    if options.len() < 2 {
        return Err(TaskError::TooFewOptions {
            count: options.len(),
        });
    }
    if let Some(index) = options.iter().position(|o| o.trim().is_empty()) {
        return Err(TaskError::BlankOption { position: index + 1 });
    }
    Ok(())
}

/// The stored choice must be the canonical decimal form of a 1-based index.
/// Choices are submitted as `index.to_string()` and compared as strings.
fn check_choice(value: &str, options: usize) -> Result<(), TaskError> {
    if value.is_empty() {
        return Err(TaskError::EmptyCorrectAnswer);
    }
    let canonical = value.bytes().all(|b| b.is_ascii_digit()) && !value.starts_with('0');
    if !canonical {
        return Err(TaskError::ChoiceNotIndex {
            value: value.to_owned(),
        });
    }
    let index: usize = value.parse().map_err(|_| TaskError::ChoiceNotIndex {
        value: value.to_owned(),
    })?;
    if index > options {
        return Err(TaskError::ChoiceOutOfRange {
            value: index,
            options,
        });
    }
    Ok(())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
