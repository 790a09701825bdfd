mod progress;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use service::{LessonSession, SessionPhase, SubmitOutcome};
pub use view::{ResultListItem, ResultsService};
pub use workflow::{SessionAnswerResult, SessionLoopService};
