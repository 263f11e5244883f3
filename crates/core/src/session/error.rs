use std::error::Error;
use std::fmt::{self, Display};

/// The error returned when a [`Session`](crate::Session) cannot be built.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BuildError {
    /// No model was given and there is no catalog to pick a default from.
    MissingModel,
    /// The model is not offered by the attached catalog.
    UnknownModel(String),
}

impl Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::MissingModel => write!(f, "no model was selected"),
            BuildError::UnknownModel(model) => {
                write!(f, "model `{model}` is not in the catalog")
            }
        }
    }
}

impl Error for BuildError {}

/// The reason a submission was not admitted.
///
/// This is not a failure the user should see: the input is simply ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubmitError {
    /// The input was empty or whitespace only.
    EmptyInput,
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::EmptyInput => write!(f, "input is empty"),
        }
    }
}

impl Error for SubmitError {}
