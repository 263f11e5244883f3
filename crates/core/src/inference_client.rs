use std::pin::Pin;
use std::sync::Arc;

use pocket_chat_model::{
    GenerateRequest, GeneratedText, InferenceProvider, InferenceProviderError,
};
use tracing::Instrument;

pub(crate) type GenerateResult =
    Result<GeneratedText, Box<dyn InferenceProviderError>>;
type BoxedGenerateFuture = Pin<Box<dyn Future<Output = GenerateResult> + Send>>;
type HandlerFn =
    Arc<dyn Fn(GenerateRequest) -> BoxedGenerateFuture + Send + Sync>;

/// A wrapper around an inference provider that provides a type-erased
/// interface for the other modules.
#[derive(Clone)]
pub struct InferenceClient {
    handler_fn: HandlerFn,
}

impl InferenceClient {
    #[inline]
    pub fn new<P: InferenceProvider + 'static>(provider: P) -> Self {
        // We have to erase the type `P`, since `InferenceClient` doesn't have
        // a generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |req| -> BoxedGenerateFuture {
            let span = trace_span!("inference client req", model = %req.model);
            let fut = provider.generate(&req);
            Box::pin(
                async move {
                    trace!("got a request: {:?}", req);
                    match fut.await {
                        Ok(generated) => {
                            trace!("finished a request");
                            Ok(generated)
                        }
                        Err(err) => {
                            warn!("request failed ({}): {err}", err.kind());
                            let err: Box<dyn InferenceProviderError> =
                                Box::new(err);
                            Err(err)
                        }
                    }
                }
                .instrument(span),
            )
        });
        Self { handler_fn }
    }

    /// Sends one generation request.
    ///
    /// The provider is invoked before this method returns; the returned
    /// future only waits for the outcome and does not borrow `self`.
    #[inline]
    pub fn generate(
        &self,
        model: &str,
        prompt: &str,
    ) -> impl Future<Output = GenerateResult> + Send + 'static {
        (self.handler_fn)(GenerateRequest::new(model, prompt))
    }
}
