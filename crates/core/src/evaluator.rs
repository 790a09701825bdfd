//! Answer grading.
//!
//! Each task kind has exactly one comparison rule:
//! - word order: element-wise, order-sensitive equality with the correct sequence
//! - fill gap: equality after trimming and lower-casing both sides
//! - multiple choice: exact string equality of the 1-based option number
//!
//! An answer of the wrong shape, or an empty one, grades as incorrect. Nothing
//! here errors or allocates beyond the fill-gap normalisation.

use crate::model::{AnswerValue, Task, TaskBody};

/// Grade `answer` against `task`'s correct answer.
#[must_use]
pub fn evaluate(task: &Task, answer: &AnswerValue) -> bool {
    if answer.is_empty() {
        return false;
    }

    match (task.body(), answer) {
        (TaskBody::WordOrder { correct, .. }, AnswerValue::Sequence(words)) => words == correct,
        (TaskBody::FillGap { correct }, AnswerValue::Text(text)) => {
            normalize_gap(text) == normalize_gap(correct)
        }
        (TaskBody::MultipleChoice { correct, .. }, AnswerValue::Text(choice)) => choice == correct,
        _ => false,
    }
}

/// Fill-gap comparison form: surrounding whitespace removed, lower case.
#[must_use]
pub fn normalize_gap(text: &str) -> String {
    text.trim().to_lowercase()
}
