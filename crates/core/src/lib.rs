//! Core logic of a chat session: the transcript, the submission lifecycle,
//! and reconciling replies from an inference provider.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod conversation;
mod inference_client;
mod session;

pub use conversation::{Role, Turn};
pub use session::{
    APOLOGY_TEXT, BuildError, Session, SessionBuilder, SubmitError,
};
