//! Filesystem adapters.

pub mod question_source;

pub use question_source::FsQuestionSource;
