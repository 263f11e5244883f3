use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// The kind of error that occurred.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ErrorKind {
    /// The request never got a response: timeouts, DNS failures, refused
    /// or reset connections, or a body that could not be read.
    NetworkFailure,
    /// The endpoint answered with a non-2xx status.
    HttpFailure {
        /// The HTTP status code.
        status: u16,
    },
    /// The endpoint answered with a 2xx status, but the body is not in the
    /// expected shape.
    MalformedResponse,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NetworkFailure => write!(f, "Network failure"),
            ErrorKind::HttpFailure { status } => {
                write!(f, "HTTP failure (status {status})")
            }
            ErrorKind::MalformedResponse => write!(f, "Malformed response"),
        }
    }
}
