// src/play/mod.rs

//! Playing a game: question building, session state, timing and the registry
//! of live sessions.

pub mod builder;
pub mod driver;
pub mod feedback;
pub mod registry;
pub mod schedule;
pub mod session;

pub use driver::{PlaySession, SessionDeps};
pub use feedback::{FeedbackSink, TracingFeedback};
pub use registry::SessionRegistry;
