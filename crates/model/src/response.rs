use serde::{Deserialize, Serialize};

/// The text produced by a successful generation request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneratedText {
    /// The generated text, exactly as returned by the endpoint.
    pub text: String,
}

impl GeneratedText {
    /// Wraps the given text.
    #[inline]
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self { text: text.into() }
    }
}

impl From<GeneratedText> for String {
    #[inline]
    fn from(value: GeneratedText) -> Self {
        value.text
    }
}
