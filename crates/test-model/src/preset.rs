use std::time::Duration;

use pocket_chat_model::ErrorKind;
use serde::{Deserialize, Serialize};

/// What a preset response resolves to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetOutcome {
    #[serde(rename = "text")]
    Text(String),
    #[serde(rename = "failure")]
    Failure(ErrorKind),
}

/// The preset response for a prompt.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetResponse {
    /// How the request resolves.
    pub outcome: PresetOutcome,
    /// How long the request stays outstanding before it resolves.
    pub delay: Option<Duration>,
}

impl PresetResponse {
    /// Creates a `PresetResponse` that succeeds with `text`.
    #[inline]
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self {
            outcome: PresetOutcome::Text(text.into()),
            delay: None,
        }
    }

    /// Creates a `PresetResponse` that fails with an error of `kind`.
    #[inline]
    pub fn failure(kind: ErrorKind) -> Self {
        Self {
            outcome: PresetOutcome::Failure(kind),
            delay: None,
        }
    }

    /// Sets how long the response takes to resolve.
    #[inline]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}
