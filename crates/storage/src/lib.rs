#![forbid(unsafe_code)]

pub mod json;
pub mod repository;
pub mod sample;

pub use repository::{
    InMemoryRepository, LessonRepository, ResultId, ResultRepository, Storage, StorageError,
    StoredResult,
};
