//! Conversation-related types.

use serde::{Deserialize, Serialize};

/// Who produced a turn.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person typing into the session.
    User,
    /// The inference endpoint, or the session itself when the endpoint
    /// failed to answer.
    Assistant,
}

/// A single entry in a session's transcript.
///
/// Turns are immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Turn {
    text: String,
    role: Role,
}

impl Turn {
    /// Creates a user turn.
    #[inline]
    pub fn user<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            role: Role::User,
        }
    }

    /// Creates an assistant turn.
    #[inline]
    pub fn assistant<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            role: Role::Assistant,
        }
    }

    /// Returns the text to display for this turn.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns who produced this turn.
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }
}
