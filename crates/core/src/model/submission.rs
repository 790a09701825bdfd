use serde::Serialize;

use crate::evaluator::evaluate;
use crate::model::{answer::AnswerValue, ids::TaskId, task::Task};

/// A learner's graded answer to one task.
///
/// Correctness is always computed from the task; there is no way to build a
/// submission with a caller-chosen `is_correct`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    task_id: TaskId,
    answer: AnswerValue,
    is_correct: bool,
}

impl Submission {
    /// Grade `answer` against `task`.
    #[must_use]
    pub fn grade(task: &Task, answer: AnswerValue) -> Self {
        let is_correct = evaluate(task, &answer);
        Self {
            task_id: task.id().clone(),
            answer,
            is_correct,
        }
    }

    #[must_use]
    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    #[must_use]
    pub fn answer(&self) -> &AnswerValue {
        &self.answer
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_records_task_id_and_correctness() {
        let task = Task::fill_gap("task-2", "I _____ (watch) TV.", "am watching").unwrap();

        let right = Submission::grade(&task, AnswerValue::text("AM WATCHING"));
        assert_eq!(right.task_id().as_str(), "task-2");
        assert!(right.is_correct());

        let wrong = Submission::grade(&task, AnswerValue::text("watch"));
        assert!(!wrong.is_correct());
        assert_eq!(wrong.answer(), &AnswerValue::text("watch"));
    }
}
