//! A local fake inference provider for testing purpose.

mod preset;

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::{Arc, Mutex, PoisonError};

use pocket_chat_model::{
    ErrorKind, GenerateRequest, GeneratedText, InferenceProvider,
    InferenceProviderError,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl StdError for Error {}

impl InferenceProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// A local fake provider for testing purpose.
///
/// Before sending requests, you need to register a preset response for each
/// prompt you intend to send. A prompt without a preset falls back to the
/// response set by [`TestModelProvider::set_fallback`], or fails if there is
/// none.
///
/// Clones share the request log, so a clone handed to a session can still be
/// inspected by the test that created it.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy memory
/// copies involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    presets: HashMap<String, PresetResponse>,
    fallback: Option<PresetResponse>,
    requests: Arc<Mutex<Vec<GenerateRequest>>>,
}

impl TestModelProvider {
    /// Registers the response for `prompt`.
    #[inline]
    pub fn add_response<S: Into<String>>(
        &mut self,
        prompt: S,
        preset: PresetResponse,
    ) {
        self.presets.insert(prompt.into(), preset);
    }

    /// Sets the response used for prompts without a preset.
    #[inline]
    pub fn set_fallback(&mut self, preset: PresetResponse) {
        self.fallback = Some(preset);
    }

    /// Returns every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns how many requests have been received so far.
    #[inline]
    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Debug for TestModelProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestModelProvider")
            .field("presets", &self.presets.len())
            .field("call_count", &self.call_count())
            .finish_non_exhaustive()
    }
}

impl InferenceProvider for TestModelProvider {
    type Error = crate::Error;

    fn generate(
        &self,
        req: &GenerateRequest,
    ) -> impl Future<Output = Result<GeneratedText, Self::Error>> + Send + 'static
    {
        // Record the call eagerly, so it is visible before the future is
        // polled.
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(req.clone());

        let preset = self
            .presets
            .get(&req.prompt)
            .or(self.fallback.as_ref())
            .cloned();
        async move {
            let Some(preset) = preset else {
                return Err(Error {
                    message: "no preset for prompt",
                    kind: ErrorKind::MalformedResponse,
                });
            };
            if let Some(delay) = preset.delay {
                sleep(delay).await;
            }
            match preset.outcome {
                PresetOutcome::Text(text) => Ok(GeneratedText::new(text)),
                PresetOutcome::Failure(kind) => Err(Error {
                    message: "preset failure",
                    kind,
                }),
            }
        }
    }
}
