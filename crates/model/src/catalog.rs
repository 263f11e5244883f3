use std::fmt::{self, Display};

/// Models offered when no catalog is configured.
pub const DEFAULT_MODELS: &[&str] = &[
    "gpt2",
    "bert-base-uncased",
    "roberta-base",
    "distilbert-base-uncased",
    "facebook/bart-large-cnn",
];

/// The error returned when a catalog entry is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InvalidModelError {
    position: usize,
}

impl Display for InvalidModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "model identifier at position {} is empty", self.position)
    }
}

impl std::error::Error for InvalidModelError {}

/// An ordered, read-only set of model identifiers a user can pick from
/// before starting a session.
///
/// Identifiers keep the order they were given in, and the first one is the
/// default selection. Duplicates are dropped, keeping the first occurrence.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelCatalog {
    models: Vec<String>,
}

impl ModelCatalog {
    /// Creates a catalog from the given identifiers.
    ///
    /// Surrounding whitespace is trimmed. An identifier that is empty after
    /// trimming makes the whole catalog invalid.
    pub fn new<I, S>(models: I) -> Result<Self, InvalidModelError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut deduped: Vec<String> = Vec::new();
        for (position, model) in models.into_iter().enumerate() {
            let model = model.as_ref().trim();
            if model.is_empty() {
                return Err(InvalidModelError { position });
            }
            if !deduped.iter().any(|m| m == model) {
                deduped.push(model.to_owned());
            }
        }
        Ok(Self { models: deduped })
    }

    /// Returns the number of models in the catalog.
    #[inline]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns `true` if the catalog has no models.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Iterates over the identifiers in catalog order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(String::as_str)
    }

    /// Returns the identifier at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.models.get(index).map(String::as_str)
    }

    /// Returns the model that is selected when the user picks nothing.
    #[inline]
    pub fn default_model(&self) -> Option<&str> {
        self.get(0)
    }

    /// Returns `true` if `model` is offered by this catalog.
    #[inline]
    pub fn contains(&self, model: &str) -> bool {
        self.select(model).is_some()
    }

    /// Looks up `model` and returns the catalog's own copy of it.
    pub fn select(&self, model: &str) -> Option<&str> {
        let model = model.trim();
        self.iter().find(|m| *m == model)
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self {
            models: DEFAULT_MODELS.iter().map(|m| (*m).to_owned()).collect(),
        }
    }
}
