//! An inference provider for Hugging Face style text-generation endpoints.
//!
//! Each call is a single `POST <base>/<model>` carrying `{"inputs": ...}`,
//! answered by an array of generations of which only the first is used.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use pocket_chat_model::{
    ErrorKind, GenerateRequest, GeneratedText, InferenceProvider,
    InferenceProviderError,
};
use reqwest::{Client, header};

pub use config::{HfConfig, HfConfigBuilder};
use proto::GenerationRequest;

/// Error type for [`HfProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    fn transport(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out: {err}")
        } else if err.is_connect() {
            format!("connection failed: {err}")
        } else {
            format!("request failed: {err}")
        };
        Self::new(message, ErrorKind::NetworkFailure)
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl InferenceProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Hugging Face inference provider.
///
/// Cloning is cheap, clones share the same connection pool.
#[derive(Clone, Debug)]
pub struct HfProvider {
    client: Client,
    config: Arc<HfConfig>,
}

impl HfProvider {
    /// Creates a new `HfProvider` with the given configuration.
    #[inline]
    pub fn new(config: HfConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Creates a new `HfProvider` that sends requests through `client`.
    ///
    /// The timeout from `config` is applied per request on top of whatever
    /// the client is configured with.
    #[inline]
    pub fn with_client(config: HfConfig, client: Client) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }
}

impl InferenceProvider for HfProvider {
    type Error = Error;

    fn generate(
        &self,
        req: &GenerateRequest,
    ) -> impl Future<Output = Result<GeneratedText, Self::Error>> + Send + 'static
    {
        trace!("sending generation request to model {}", req.model);
        let resp_fut = self
            .client
            .post(self.config.endpoint(&req.model))
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.config.api_key),
            )
            .header(header::CONTENT_TYPE, "application/json")
            .timeout(self.config.timeout)
            .json(&GenerationRequest {
                inputs: &req.prompt,
            })
            .send();

        async move {
            let resp = resp_fut.await.map_err(Error::transport)?;

            let status = resp.status();
            if !status.is_success() {
                return Err(Error::new(
                    format!("endpoint responded with {status}"),
                    ErrorKind::HttpFailure {
                        status: status.as_u16(),
                    },
                ));
            }

            let body = resp.bytes().await.map_err(Error::transport)?;
            trace!("got response body of {} bytes", body.len());

            let text = proto::decode_response(&body).map_err(|err| {
                Error::new(format!("{err}"), ErrorKind::MalformedResponse)
            })?;
            Ok(GeneratedText::new(text))
        }
    }
}
