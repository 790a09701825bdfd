mod answer;
mod ids;
mod lesson;
mod result;
mod stats;
mod submission;
mod task;

pub use answer::AnswerValue;
pub use ids::{LessonId, ParseIdError, StudentId, TaskId};

pub use lesson::{Lesson, LessonDraft, LessonError};
pub use result::{LessonResult, ResultError, ResultItem, percentage};
pub use stats::StudentProgress;
pub use submission::Submission;
pub use task::{Task, TaskDraft, TaskError, TaskKind};

pub(crate) use task::TaskBody;
