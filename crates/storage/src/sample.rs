//! Built-in lesson used when no lesson file is given.

use lesson_core::model::{AnswerValue, Lesson, LessonDraft, TaskDraft, TaskKind};

const GRAMMAR_RULES: &str = "\
Present Simple:
- routines and permanent truths
- subject + verb (+ s/es for he/she/it)
- I play tennis every Sunday.

Present Continuous:
- actions happening at the moment of speaking
- subject + am/is/are + verb-ing
- I am playing tennis now.";

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|w| (*w).to_owned()).collect()
}

/// The draft form of [`sample_lesson`], useful for exporting as JSON.
#[must_use]
pub fn sample_lesson_draft() -> LessonDraft {
    LessonDraft {
        id: "lesson-1".into(),
        title: "Present Simple vs Present Continuous".into(),
        topic: "Present tenses".into(),
        grammar_rules: GRAMMAR_RULES.into(),
        tasks: vec![
            TaskDraft {
                id: "task-1".into(),
                kind: TaskKind::WordOrder,
                question: "Arrange the words to make a correct sentence:".into(),
                correct_answer: AnswerValue::Sequence(words(&[
                    "She", "plays", "the", "piano", "every", "day",
                ])),
                options: None,
                words: Some(words(&["plays", "She", "piano", "the", "every", "day"])),
            },
            TaskDraft {
                id: "task-2".into(),
                kind: TaskKind::FillGap,
                question: "Fill in the gap with the correct form: I _____ (watch) TV right now."
                    .into(),
                correct_answer: AnswerValue::text("am watching"),
                options: None,
                words: None,
            },
            TaskDraft {
                id: "task-3".into(),
                kind: TaskKind::MultipleChoice,
                question: "Which sentence is correct?".into(),
                correct_answer: AnswerValue::text("2"),
                options: Some(words(&[
                    "He go to school every day.",
                    "He goes to school every day.",
                    "He going to school every day.",
                    "He is go to school every day.",
                ])),
                words: None,
            },
            TaskDraft {
                id: "task-4".into(),
                kind: TaskKind::WordOrder,
                question: "Arrange the words to make a question:".into(),
                correct_answer: AnswerValue::Sequence(words(&[
                    "Do", "you", "speak", "English", "?",
                ])),
                options: None,
                words: Some(words(&["you", "Do", "English", "speak", "?"])),
            },
        ],
    }
}

/// Four mixed tasks on present tenses.
///
/// # Panics
///
/// Panics if the built-in draft stops validating, which the tests guard against.
#[must_use]
pub fn sample_lesson() -> Lesson {
    sample_lesson_draft()
        .validate()
        .expect("built-in sample lesson should validate")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_lesson_has_four_mixed_tasks() {
        let lesson = sample_lesson();
        let kinds: Vec<_> = lesson.tasks().iter().map(|t| t.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                TaskKind::WordOrder,
                TaskKind::FillGap,
                TaskKind::MultipleChoice,
                TaskKind::WordOrder
            ]
        );
        assert!(lesson.grammar_rules().contains("Present Continuous"));
    }
}
