use std::error::Error;

use crate::error::ErrorKind;
use crate::request::GenerateRequest;
use crate::response::GeneratedText;

/// The error type for an inference provider.
pub trait InferenceProviderError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A type that represents an inference provider, which performs exactly one
/// request/response exchange with a text-generation endpoint per call.
///
/// Once the provider is created, it should behave like a stateless object.
/// It can still have internal state (like a connection pool), but callers
/// should not rely on it, and the provider should be prepared for being
/// dropped anytime. Calls may overlap freely.
pub trait InferenceProvider: Send + Sync {
    /// The error type that may be returned by the provider.
    ///
    /// Every expected failure (transport, status, body shape) must be
    /// reported through this type instead of panicking.
    type Error: InferenceProviderError;

    /// Sends a single generation request to the endpoint.
    ///
    /// The returned future must be independent of `self`, so it can be
    /// driven on another task after the provider is gone.
    fn generate(
        &self,
        req: &GenerateRequest,
    ) -> impl Future<Output = Result<GeneratedText, Self::Error>> + Send + 'static;
}
