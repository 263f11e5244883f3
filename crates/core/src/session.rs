mod builder;
mod error;
mod state;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use pocket_chat_model::ErrorKind;

use crate::conversation::Turn;
use crate::inference_client::InferenceClient;
pub use builder::SessionBuilder;
pub use error::{BuildError, SubmitError};
use state::Shared;

/// The text of the assistant turn appended when a request fails, whatever
/// the reason.
pub const APOLOGY_TEXT: &str =
    "Sorry, there was an error processing your request.";

type OnTurnFn = Box<dyn Fn(&Turn) + Send + Sync>;
type OnInferenceFailureFn = Box<dyn Fn(ErrorKind) + Send + Sync>;

#[derive(Default)]
pub(crate) struct Observers {
    pub(crate) on_turn: Option<OnTurnFn>,
    pub(crate) on_inference_failure: Option<OnInferenceFailureFn>,
}

/// A chat session bound to one model, like a window that displays messages
/// and has an input box.
///
/// Every non-blank submission appends a user turn right away and sends the
/// text, on its own, to the inference provider. When the request resolves
/// exactly one assistant turn is appended: the generated text, or
/// [`APOLOGY_TEXT`] if the request failed. Submissions are not serialized,
/// so several requests may be outstanding and their replies are appended in
/// the order they arrive.
///
/// Dropping the session (or calling [`Session::close`]) tears it down:
/// outstanding requests are cancelled and their results never reach the
/// transcript or the observers.
pub struct Session {
    shared: Arc<Shared>,
}

impl Session {
    /// Submits `text` as a user turn.
    ///
    /// The text is trimmed first. Blank input is ignored and reported as
    /// [`SubmitError::EmptyInput`]. Otherwise the user turn is appended and
    /// the pending input is cleared before this method returns, and the
    /// request is sent on a background task.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    #[inline]
    pub fn submit(&self, text: &str) -> Result<(), SubmitError> {
        self.shared.submit(text)
    }

    /// Submits whatever is staged as pending input.
    ///
    /// See [`Session::submit`].
    pub fn submit_pending_input(&self) -> Result<(), SubmitError> {
        let text = self.shared.pending_input();
        self.shared.submit(&text)
    }

    /// Stages the text the user is typing.
    #[inline]
    pub fn set_pending_input<S: Into<String>>(&self, text: S) {
        self.shared.set_pending_input(text.into());
    }

    /// Returns the text staged by [`Session::set_pending_input`].
    #[inline]
    pub fn pending_input(&self) -> String {
        self.shared.pending_input()
    }

    /// Returns a snapshot of the transcript, oldest turn first.
    #[inline]
    pub fn transcript(&self) -> Vec<Turn> {
        self.shared.transcript()
    }

    /// Returns the model this session talks to.
    #[inline]
    pub fn model(&self) -> &str {
        self.shared.model()
    }

    /// Returns how many submissions are still waiting for their reply.
    #[inline]
    pub fn pending_requests(&self) -> usize {
        self.shared.pending_requests()
    }

    /// Tears the session down, discarding the results of any outstanding
    /// requests.
    ///
    /// This is what dropping the session does, spelled out.
    #[inline]
    pub fn close(self) {
        drop(self);
    }
}

impl Session {
    fn from_builder(
        inference_client: InferenceClient,
        model: String,
        observers: Observers,
    ) -> Self {
        debug!("opened a session with model {model}");
        Self {
            shared: Arc::new(Shared::new(inference_client, model, observers)),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shared.teardown();
    }
}
