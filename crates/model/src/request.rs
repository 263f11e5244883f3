/// A request to be sent to the inference provider.
///
/// No conversation history is carried: each request stands on its own.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GenerateRequest {
    /// Identifier of the model to run, usually taken from a
    /// [`ModelCatalog`](crate::ModelCatalog).
    pub model: String,
    /// The prompt text. Callers are expected to reject blank prompts before
    /// building a request.
    pub prompt: String,
}

impl GenerateRequest {
    /// Creates a request for the given model and prompt.
    #[inline]
    pub fn new<M: Into<String>, P: Into<String>>(model: M, prompt: P) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
        }
    }
}
