use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct Generation {
    pub generated_text: String,
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct GenerationRequest<'a> {
    pub inputs: &'a str,
}

// --------
// Decoding
// --------

#[derive(Debug, PartialEq, Eq)]
pub enum DecodeError {
    NotAnArray(String),
    EmptyArray,
    InvalidGeneration(String),
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::NotAnArray(reason) => {
                write!(f, "expected an array of generations: {reason}")
            }
            DecodeError::EmptyArray => write!(f, "no generation in response"),
            DecodeError::InvalidGeneration(reason) => {
                write!(f, "invalid generation: {reason}")
            }
        }
    }
}

/// Extracts the text of the first generation in a response body.
///
/// Only the first element is inspected, the rest are ignored.
pub fn decode_response(body: &[u8]) -> Result<String, DecodeError> {
    let generations = serde_json::from_slice::<Vec<Value>>(body)
        .map_err(|err| DecodeError::NotAnArray(format!("{err}")))?;
    let Some(first) = generations.into_iter().next() else {
        return Err(DecodeError::EmptyArray);
    };
    let generation = serde_json::from_value::<Generation>(first)
        .map_err(|err| DecodeError::InvalidGeneration(format!("{err}")))?;
    Ok(generation.generated_text)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_create_request() {
        let req = GenerationRequest { inputs: "Hello" };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "inputs": "Hello" })
        );
    }

    #[test]
    fn test_decode_first_generation() {
        let body = br#"[
            { "generated_text": "Hi there!", "score": 0.9 },
            { "generated_text": "Hello yourself." }
        ]"#;
        assert_eq!(decode_response(body).unwrap(), "Hi there!");
    }

    #[test]
    fn test_decode_keeps_text_verbatim() {
        let body = br#"[{ "generated_text": "  spaced out \n" }]"#;
        assert_eq!(decode_response(body).unwrap(), "  spaced out \n");
    }

    #[test]
    fn test_decode_shape_mismatch() {
        assert_eq!(decode_response(b"[]"), Err(DecodeError::EmptyArray));
        assert!(matches!(
            decode_response(br#"{ "generated_text": "Hi" }"#),
            Err(DecodeError::NotAnArray(_))
        ));
        assert!(matches!(
            decode_response(b"not json"),
            Err(DecodeError::NotAnArray(_))
        ));
        assert!(matches!(
            decode_response(br#"[{ "summary_text": "Hi" }]"#),
            Err(DecodeError::InvalidGeneration(_))
        ));
        assert!(matches!(
            decode_response(br#"[{ "generated_text": 42 }]"#),
            Err(DecodeError::InvalidGeneration(_))
        ));
        assert!(matches!(
            decode_response(br#"["Hi"]"#),
            Err(DecodeError::InvalidGeneration(_))
        ));
    }
}
