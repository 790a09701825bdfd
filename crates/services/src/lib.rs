#![forbid(unsafe_code)]

pub mod answer_draft;
pub mod error;
pub mod sessions;

pub use lesson_core::Clock;
pub use sessions as session;

pub use answer_draft::{AnswerDraft, DraftError, WordOrderDraft};
pub use error::SessionError;

pub use sessions::{
    LessonSession, ResultListItem, ResultsService, SessionAnswerResult, SessionLoopService,
    SessionPhase, SessionProgress, SubmitOutcome,
};
