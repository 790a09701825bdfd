use lesson_core::model::percentage;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    /// 1-based number of the task on screen ("task 2 of 4"); equals `total` once complete.
    pub position: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    /// How far through the lesson the learner is, counting the task on screen.
    #[must_use]
    pub fn percent(&self) -> u8 {
        let position = u32::try_from(self.position).unwrap_or(u32::MAX);
        let total = u32::try_from(self.total).unwrap_or(u32::MAX);
        percentage(position, total)
    }
}
