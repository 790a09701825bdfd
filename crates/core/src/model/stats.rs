use serde::{Deserialize, Serialize};

use crate::model::result::LessonResult;

/// Totals across a student's completed lessons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProgress {
    pub completed_lessons: u32,
    pub total_points: u32,
    /// Mean of the per-lesson percentages, halves rounded up.
    pub average_percentage: u8,
    pub best_percentage: u8,
}

impl StudentProgress {
    #[must_use]
    pub fn from_results(results: &[LessonResult]) -> Self {
        if results.is_empty() {
            return Self::default();
        }

        let count = u64::try_from(results.len()).unwrap_or(u64::MAX);
        let percent_sum: u64 = results.iter().map(|r| u64::from(r.percentage())).sum();
        let average = (percent_sum * 2 + count) / (2 * count);

        Self {
            completed_lessons: u32::try_from(results.len()).unwrap_or(u32::MAX),
            total_points: results
                .iter()
                .fold(0_u32, |acc, r| acc.saturating_add(r.score())),
            average_percentage: u8::try_from(average).unwrap_or(100),
            best_percentage: results.iter().map(LessonResult::percentage).max().unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerValue, Lesson, LessonId, Submission, Task};
    use crate::time::fixed_now;

    fn result_with(correct: usize, total: usize) -> LessonResult {
        let tasks: Vec<Task> = (0..total)
            .map(|i| Task::fill_gap(format!("task-{i}"), "Fill", "yes").unwrap())
            .collect();
        let lesson = Lesson::new(LessonId::new("lesson"), "L", tasks).unwrap();
        let submissions: Vec<_> = lesson
            .tasks()
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let answer = if i < correct { "yes" } else { "no" };
                Submission::grade(t, AnswerValue::text(answer))
            })
            .collect();
        LessonResult::from_submissions(&lesson, &submissions, fixed_now(), fixed_now()).unwrap()
    }

    #[test]
    fn empty_history_is_all_zero() {
        assert_eq!(StudentProgress::from_results(&[]), StudentProgress::default());
    }

    #[test]
    fn aggregates_points_and_percentages() {
        let results = vec![result_with(3, 4), result_with(8, 10), result_with(1, 2)];
        let progress = StudentProgress::from_results(&results);

        assert_eq!(progress.completed_lessons, 3);
        assert_eq!(progress.total_points, 12);
        // (75 + 80 + 50) / 3 = 68.33
        assert_eq!(progress.average_percentage, 68);
        assert_eq!(progress.best_percentage, 80);
    }

    #[test]
    fn average_rounds_half_up() {
        let results = vec![result_with(1, 2), result_with(1, 1)];
        // (50 + 100) / 2 = 75
        assert_eq!(StudentProgress::from_results(&results).average_percentage, 75);

        let results = vec![result_with(3, 4), result_with(4, 4)];
        // (75 + 100) / 2 = 87.5
        assert_eq!(StudentProgress::from_results(&results).average_percentage, 88);
    }
}
