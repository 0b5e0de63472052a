use thiserror::Error;

use crate::model::Language;

/// Failure taxonomy shared by the provider adapters, the orchestrator and the suggester.
///
/// Every variant keeps a diagnostic message for logs; [`Failure::user_message`]
/// is what the embedding application shows.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Failure {
    /// The query was rejected before any network call.
    #[error("invalid query: {0}")]
    Validation(String),

    /// The query resolved to zero locations.
    #[error("location not found: {0}")]
    NotFound(String),

    /// Transport error or non-2xx status.
    #[error("network failure: {0}")]
    Network(String),

    /// Well-formed response that is missing required fields.
    #[error("unexpected provider data: {0}")]
    Data(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Validation,
    NotFound,
    Network,
    Data,
}

impl Failure {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network(message.into())
    }

    pub fn data<S: Into<String>>(message: S) -> Self {
        Self::Data(message.into())
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Failure::Validation(_) => FailureKind::Validation,
            Failure::NotFound(_) => FailureKind::NotFound,
            Failure::Network(_) => FailureKind::Network,
            Failure::Data(_) => FailureKind::Data,
        }
    }

    /// Display-ready text in the display language. Does not leak provider details.
    #[must_use]
    pub fn user_message(&self, lang: Language) -> String {
        let text = match (self, lang) {
            (Failure::Validation(_), Language::Ru) => "Пожалуйста, введите название города.",
            (Failure::Validation(_), Language::En) => "Please enter a city name.",
            (Failure::NotFound(_), Language::Ru) => {
                "Город не найден. Проверьте правильность написания."
            }
            (Failure::NotFound(_), Language::En) => {
                "City not found. Check the spelling and try again."
            }
            (Failure::Network(_), Language::Ru) => {
                "Проблемы с сетью. Проверьте подключение к интернету."
            }
            (Failure::Network(_), Language::En) => {
                "Network problem. Check your internet connection."
            }
            (Failure::Data(_), Language::Ru) => {
                "Не удалось получить данные о погоде. Попробуйте позже."
            }
            (Failure::Data(_), Language::En) => {
                "Could not load weather data. Please try again later."
            }
        };
        text.to_string()
    }
}
