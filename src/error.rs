use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Errors raised by the corpus, graph, render and session layers.
#[derive(Error, Debug)]
pub enum AppError {
    /// The data source is unreachable or malformed. Fatal to session start.
    #[error("Failed to load data from {source_name}: {message}")]
    DataLoad {
        source_name: String,
        message: String,
    },

    /// A referenced document or sentence does not exist (stale id after a refresh).
    #[error("Related text not found: {what}")]
    LookupMiss { what: String },

    /// A sentence id or graph node key that cannot be decoded.
    #[error("Malformed reference '{raw}': {reason}")]
    MalformedReference { raw: String, reason: String },

    /// An interaction that is not allowed from the current session state.
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
}

impl AppError {
    pub fn data_load(source_name: impl Into<String>, message: impl ToString) -> Self {
        Self::DataLoad {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }

    pub fn lookup_miss(what: impl Into<String>) -> Self {
        Self::LookupMiss { what: what.into() }
    }

    pub fn malformed(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedReference {
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    /// Whether the session can carry on after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::DataLoad { .. })
    }
}
