use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::{
    ids::{LessonId, TaskId},
    task::{Task, TaskDraft, TaskError},
};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson id cannot be empty")]
    EmptyId,

    #[error("lesson title cannot be empty")]
    EmptyTitle,

    #[error("lesson must contain at least one task")]
    NoTasks,

    #[error("task id {0} appears more than once")]
    DuplicateTaskId(TaskId),

    #[error("task {index} is malformed: {source}")]
    Task {
        index: usize,
        #[source]
        source: TaskError,
    },
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// An ordered, non-empty sequence of tasks plus the display metadata shown
/// alongside them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LessonDraft", into = "LessonDraft")]
pub struct Lesson {
    id: LessonId,
    title: String,
    topic: String,
    grammar_rules: String,
    tasks: Vec<Task>,
}

impl Lesson {
    /// Build a lesson from already-validated tasks.
    ///
    /// # Errors
    ///
    /// Returns `LessonError` if the id or title is blank, there are no tasks,
    /// or two tasks share an id.
    pub fn new(
        id: LessonId,
        title: impl Into<String>,
        tasks: Vec<Task>,
    ) -> Result<Self, LessonError> {
        if id.as_str().trim().is_empty() {
            return Err(LessonError::EmptyId);
        }
        let title = title.into();
        if title.trim().is_empty() {
            return Err(LessonError::EmptyTitle);
        }
        if tasks.is_empty() {
            return Err(LessonError::NoTasks);
        }

        let mut seen = HashSet::with_capacity(tasks.len());
        for task in &tasks {
            if !seen.insert(task.id()) {
                return Err(LessonError::DuplicateTaskId(task.id().clone()));
            }
        }

        Ok(Self {
            id,
            title,
            topic: String::new(),
            grammar_rules: String::new(),
            tasks,
        })
    }

    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    #[must_use]
    pub fn with_grammar_rules(mut self, rules: impl Into<String>) -> Self {
        self.grammar_rules = rules.into();
        self
    }

    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn grammar_rules(&self) -> &str {
        &self.grammar_rules
    }

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of tasks. Never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Always false; present so `len` has its usual companion.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[must_use]
    pub fn task(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated lesson in the JSON layout used by lesson files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDraft {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub grammar_rules: String,
    pub tasks: Vec<TaskDraft>,
}

impl LessonDraft {
    /// # Errors
    ///
    /// Returns `LessonError::Task` with the zero-based index of the first
    /// malformed task, or any `Lesson::new` error.
    pub fn validate(self) -> Result<Lesson, LessonError> {
        let tasks = self
            .tasks
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                draft
                    .validate()
                    .map_err(|source| LessonError::Task { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Lesson::new(LessonId::new(self.id.trim()), self.title, tasks)?
            .with_topic(self.topic)
            .with_grammar_rules(self.grammar_rules))
    }
}

impl TryFrom<LessonDraft> for Lesson {
    type Error = LessonError;

    fn try_from(draft: LessonDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

impl From<Lesson> for LessonDraft {
    fn from(lesson: Lesson) -> Self {
        Self {
            id: lesson.id.as_str().to_owned(),
            title: lesson.title,
            topic: lesson.topic,
            grammar_rules: lesson.grammar_rules,
            tasks: lesson.tasks.into_iter().map(TaskDraft::from).collect(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
