//! In-progress answers held by a presentation layer before submission.
//!
//! A draft is built for the current task, edited by the learner, and turned
//! into an `AnswerValue` only once it is submittable: text must be non-blank,
//! a choice must be selected, and every word of a word-order pool must be placed.

use thiserror::Error;

use lesson_core::model::{AnswerValue, Task, TaskKind};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DraftError {
    #[error("this edit does not apply to a {0} task")]
    WrongKind(TaskKind),
    #[error("no word at pool index {0}")]
    UnknownWord(usize),
    #[error("word at pool index {0} is already placed")]
    AlreadyPlaced(usize),
    #[error("no placed word at position {0}")]
    NoSuchPosition(usize),
    #[error("option {choice} is outside 1..={options}")]
    NoSuchOption { choice: usize, options: usize },
}

//
// ─── WORD ORDER ────────────────────────────────────────────────────────────────
//

/// Sentence being assembled from a word pool.
///
/// Placed words are tracked by pool index so repeated words stay distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordOrderDraft {
    pool: Vec<String>,
    placed: Vec<usize>,
}

impl WordOrderDraft {
    #[must_use]
    pub fn new(pool: Vec<String>) -> Self {
        Self {
            pool,
            placed: Vec::new(),
        }
    }

    /// Append the pool word at `pool_index` to the sentence.
    ///
    /// # Errors
    ///
    /// Returns `DraftError::UnknownWord` or `DraftError::AlreadyPlaced`.
    pub fn place(&mut self, pool_index: usize) -> Result<(), DraftError> {
        if pool_index >= self.pool.len() {
            return Err(DraftError::UnknownWord(pool_index));
        }
        if self.placed.contains(&pool_index) {
            return Err(DraftError::AlreadyPlaced(pool_index));
        }
        self.placed.push(pool_index);
        Ok(())
    }

    /// Take the word at sentence `position` back into the pool.
    ///
    /// # Errors
    ///
    /// Returns `DraftError::NoSuchPosition` if nothing is placed there.
    pub fn remove(&mut self, position: usize) -> Result<(), DraftError> {
        if position >= self.placed.len() {
            return Err(DraftError::NoSuchPosition(position));
        }
        self.placed.remove(position);
        Ok(())
    }

    /// Swap the word at `position` with the one before it.
    ///
    /// # Errors
    ///
    /// Returns `DraftError::NoSuchPosition` for the first word or an empty slot.
    pub fn move_up(&mut self, position: usize) -> Result<(), DraftError> {
        if position == 0 || position >= self.placed.len() {
            return Err(DraftError::NoSuchPosition(position));
        }
        self.placed.swap(position, position - 1);
        Ok(())
    }

    /// Swap the word at `position` with the one after it.
    ///
    /// # Errors
    ///
    /// Returns `DraftError::NoSuchPosition` for the last word or an empty slot.
    pub fn move_down(&mut self, position: usize) -> Result<(), DraftError> {
        if position >= self.placed.len().saturating_sub(1) {
            return Err(DraftError::NoSuchPosition(position));
        }
        self.placed.swap(position, position + 1);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.placed.clear();
    }

    /// The sentence so far.
    #[must_use]
    pub fn sentence(&self) -> Vec<&str> {
        self.placed.iter().map(|&i| self.pool[i].as_str()).collect()
    }

    /// Pool words not yet placed, with their pool indices.
    #[must_use]
    pub fn available(&self) -> Vec<(usize, &str)> {
        self.pool
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.placed.contains(i))
            .map(|(i, w)| (i, w.as_str()))
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.pool.is_empty() && self.placed.len() == self.pool.len()
    }
}

//
// ─── ANSWER DRAFT ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerDraft {
    Text(String),
    Choice {
        options: usize,
        selected: Option<usize>,
    },
    WordOrder(WordOrderDraft),
}

impl AnswerDraft {
    /// An empty draft shaped for `task`.
    #[must_use]
    pub fn for_task(task: &Task) -> Self {
        match task.kind() {
            TaskKind::FillGap => Self::Text(String::new()),
            TaskKind::MultipleChoice => Self::Choice {
                options: task.options().map_or(0, <[String]>::len),
                selected: None,
            },
            TaskKind::WordOrder => Self::WordOrder(WordOrderDraft::new(
                task.words().map(<[String]>::to_vec).unwrap_or_default(),
            )),
        }
    }

    #[must_use]
    pub fn kind(&self) -> TaskKind {
        match self {
            AnswerDraft::Text(_) => TaskKind::FillGap,
            AnswerDraft::Choice { .. } => TaskKind::MultipleChoice,
            AnswerDraft::WordOrder(_) => TaskKind::WordOrder,
        }
    }

    /// Replace the typed text of a fill-gap draft.
    ///
    /// # Errors
    ///
    /// Returns `DraftError::WrongKind` for other drafts.
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<(), DraftError> {
        match self {
            AnswerDraft::Text(current) => {
                *current = text.into();
                Ok(())
            }
            other => Err(DraftError::WrongKind(other.kind())),
        }
    }

    /// Select the 1-based option `choice`.
    ///
    /// # Errors
    ///
    /// Returns `DraftError::NoSuchOption` when out of range, or
    /// `DraftError::WrongKind` for other drafts.
    pub fn select(&mut self, choice: usize) -> Result<(), DraftError> {
        match self {
            AnswerDraft::Choice { options, selected } => {
                if choice == 0 || choice > *options {
                    return Err(DraftError::NoSuchOption {
                        choice,
                        options: *options,
                    });
                }
                *selected = Some(choice);
                Ok(())
            }
            other => Err(DraftError::WrongKind(other.kind())),
        }
    }

    /// Mutable access to a word-order draft.
    ///
    /// # Errors
    ///
    /// Returns `DraftError::WrongKind` for other drafts.
    pub fn word_order_mut(&mut self) -> Result<&mut WordOrderDraft, DraftError> {
        match self {
            AnswerDraft::WordOrder(draft) => Ok(draft),
            other => Err(DraftError::WrongKind(other.kind())),
        }
    }

    /// Whether the draft may be submitted yet.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        match self {
            AnswerDraft::Text(text) => !text.trim().is_empty(),
            AnswerDraft::Choice { selected, .. } => selected.is_some(),
            AnswerDraft::WordOrder(draft) => draft.is_complete(),
        }
    }

    /// The submittable answer, or `None` while the draft is empty or incomplete.
    #[must_use]
    pub fn into_answer(self) -> Option<AnswerValue> {
        if !self.can_submit() {
            return None;
        }
        Some(match self {
            AnswerDraft::Text(text) => AnswerValue::Text(text),
            AnswerDraft::Choice { selected, .. } => {
                AnswerValue::Text(selected.unwrap_or_default().to_string())
            }
            AnswerDraft::WordOrder(draft) => AnswerValue::sequence(draft.sentence()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesson_core::evaluate;

    fn word_task() -> Task {
        Task::word_order(
            "task-4",
            "Arrange the words to make a question:",
            ["you", "Do", "English", "speak", "?"],
            ["Do", "you", "speak", "English", "?"],
        )
        .unwrap()
    }

    #[test]
    fn word_order_draft_must_use_every_word() {
        let task = word_task();
        let mut draft = AnswerDraft::for_task(&task);
        assert!(!draft.can_submit());

        let words = draft.word_order_mut().unwrap();
        for index in [1, 0, 3, 2] {
            words.place(index).unwrap();
        }
        assert!(!draft.can_submit());
        assert!(draft.clone().into_answer().is_none());

        draft.word_order_mut().unwrap().place(4).unwrap();
        assert!(draft.can_submit());

        let answer = draft.into_answer().unwrap();
        assert!(evaluate(&task, &answer));
    }

    #[test]
    fn word_order_draft_reorders_and_returns_words() {
        let mut draft = WordOrderDraft::new(vec!["a".into(), "b".into(), "c".into()]);
        draft.place(0).unwrap();
        draft.place(1).unwrap();
        draft.place(2).unwrap();

        draft.move_up(2).unwrap();
        assert_eq!(draft.sentence(), vec!["a", "c", "b"]);
        draft.move_down(0).unwrap();
        assert_eq!(draft.sentence(), vec!["c", "a", "b"]);

        draft.remove(1).unwrap();
        assert_eq!(draft.sentence(), vec!["c", "b"]);
        assert_eq!(draft.available(), vec![(0, "a")]);

        assert_eq!(draft.move_up(0), Err(DraftError::NoSuchPosition(0)));
        assert_eq!(draft.move_down(1), Err(DraftError::NoSuchPosition(1)));
        assert_eq!(draft.place(2), Err(DraftError::AlreadyPlaced(2)));
        assert_eq!(draft.place(7), Err(DraftError::UnknownWord(7)));
    }

    #[test]
    fn moves_past_the_ends_are_rejected() {
        let mut draft = WordOrderDraft::new(vec!["a".into(), "b".into()]);
        assert_eq!(draft.move_down(0), Err(DraftError::NoSuchPosition(0)));

        draft.place(0).unwrap();
        assert_eq!(
            draft.move_down(usize::MAX),
            Err(DraftError::NoSuchPosition(usize::MAX))
        );
        assert_eq!(
            draft.move_up(usize::MAX),
            Err(DraftError::NoSuchPosition(usize::MAX))
        );
        assert_eq!(draft.sentence(), vec!["a"]);
    }

    #[test]
    fn repeated_pool_words_are_distinct() {
        let mut draft = WordOrderDraft::new(vec!["the".into(), "cat".into(), "the".into()]);
        draft.place(0).unwrap();
        assert_eq!(draft.available(), vec![(1, "cat"), (2, "the")]);
        draft.place(2).unwrap();
        draft.place(1).unwrap();
        assert!(draft.is_complete());
    }

    #[test]
    fn fill_gap_draft_rejects_blank_text() {
        let task = Task::fill_gap("task-2", "I _____ (watch) TV.", "am watching").unwrap();
        let mut draft = AnswerDraft::for_task(&task);
        draft.set_text("   ").unwrap();
        assert!(!draft.can_submit());

        draft.set_text(" Am Watching ").unwrap();
        let answer = draft.into_answer().unwrap();
        assert!(evaluate(&task, &answer));
    }

    #[test]
    fn choice_draft_submits_option_number_as_text() {
        let task = Task::multiple_choice("task-3", "Pick", ["a", "b", "c"], "2").unwrap();
        let mut draft = AnswerDraft::for_task(&task);
        assert!(!draft.can_submit());
        assert_eq!(
            draft.select(4),
            Err(DraftError::NoSuchOption {
                choice: 4,
                options: 3
            })
        );

        draft.select(2).unwrap();
        assert_eq!(draft.clone().into_answer(), Some(AnswerValue::text("2")));
        assert!(evaluate(&task, &draft.into_answer().unwrap()));
    }

    #[test]
    fn edits_for_another_kind_are_rejected() {
        let mut draft = AnswerDraft::for_task(&word_task());
        assert_eq!(
            draft.set_text("Do you"),
            Err(DraftError::WrongKind(TaskKind::WordOrder))
        );
        assert_eq!(
            draft.select(1),
            Err(DraftError::WrongKind(TaskKind::WordOrder))
        );
    }
}
