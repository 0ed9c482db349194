//! Core library: content extraction, context assembly, sessions.

pub mod config;
pub mod extractor;
pub mod models;
pub mod pipeline;
pub mod responder;
pub mod session;

pub use extractor::extract;
pub use models::{Context, Fragment};
pub use responder::answer;
pub use session::{BatchSummary, Session, SessionError, Upload};
