use pocket_chat_model::{ErrorKind, InferenceProvider, ModelCatalog};

use super::{BuildError, Observers, Session};
use crate::conversation::Turn;
use crate::inference_client::InferenceClient;

/// [`Session`] builder.
pub struct SessionBuilder {
    pub(crate) inference_client: InferenceClient,
    pub(crate) model: Option<String>,
    pub(crate) catalog: Option<ModelCatalog>,
    pub(crate) observers: Observers,
}

impl SessionBuilder {
    /// Creates a new builder with the specified inference provider.
    #[inline]
    pub fn with_inference_provider<P: InferenceProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            inference_client: InferenceClient::new(provider),
            model: None,
            catalog: None,
            observers: Observers::default(),
        }
    }

    /// Sets the model every request of the session is sent to.
    #[inline]
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Restricts the model to the entries of `catalog`.
    ///
    /// When no model is set, the catalog's default model is used.
    #[inline]
    pub fn with_catalog(mut self, catalog: ModelCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Attaches a callback to be invoked once for every turn appended to the
    /// transcript, in transcript order.
    ///
    /// The callback runs while the transcript is locked, so it must not call
    /// back into the session.
    #[inline]
    pub fn on_turn(
        mut self,
        on_turn: impl Fn(&Turn) + Send + Sync + 'static,
    ) -> Self {
        self.observers.on_turn = Some(Box::new(on_turn));
        self
    }

    /// Attaches a callback to be invoked with the classification of every
    /// failed inference request.
    ///
    /// The transcript only shows a generic apology for failures, use this to
    /// tell them apart. The same locking rule as [`Self::on_turn`] applies.
    #[inline]
    pub fn on_inference_failure(
        mut self,
        on_inference_failure: impl Fn(ErrorKind) + Send + Sync + 'static,
    ) -> Self {
        self.observers.on_inference_failure =
            Some(Box::new(on_inference_failure));
        self
    }

    /// Builds the session.
    pub fn build(self) -> Result<Session, BuildError> {
        // A blank model counts as unset.
        let model = self
            .model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty());
        let model = match (model, &self.catalog) {
            (Some(model), Some(catalog)) => catalog
                .select(model)
                .ok_or_else(|| BuildError::UnknownModel(model.to_owned()))?
                .to_owned(),
            (Some(model), None) => model.to_owned(),
            (None, Some(catalog)) => catalog
                .default_model()
                .ok_or(BuildError::MissingModel)?
                .to_owned(),
            (None, None) => return Err(BuildError::MissingModel),
        };

        Ok(Session::from_builder(
            self.inference_client,
            model,
            self.observers,
        ))
    }
}
