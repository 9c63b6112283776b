use thiserror::Error;

use crate::models::questionnaire::QuestionId;

/// Unified error type for the entire risk-profiler-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Questionnaire / Session ─────────────────────────────────────
    #[error("Questionnaire incomplete — unanswered: {}", format_questions(.missing))]
    IncompleteResponse { missing: Vec<QuestionId> },

    #[error("Action not allowed in session state {state}: {action}")]
    InvalidState { state: String, action: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unknown option for {question}: {label}")]
    UnknownOption { question: QuestionId, label: String },

    // ── Simulation ──────────────────────────────────────────────────
    #[error("Invalid horizon: {0} years (must be at least 1)")]
    InvalidHorizon(u32),

    #[error("Insufficient data for simulation: {0}")]
    InsufficientData(String),

    // ── Market data ─────────────────────────────────────────────────
    #[error("Data unavailable for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    #[error("API error ({provider}): {message}")]
    Api { provider: String, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("No market data provider registered")]
    NoProvider,

    // ── Feedback log / I/O ──────────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    #[error("Feedback log error: {0}")]
    FeedbackLog(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Configuration ───────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Config(String),
}

fn format_questions(ids: &[QuestionId]) -> String {
    ids.iter()
        .map(|q| q.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl CoreError {
    /// True for failures that come from outside the process (network, provider, missing data).
    /// The session degrades these to warnings instead of aborting.
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            CoreError::DataUnavailable { .. }
                | CoreError::Api { .. }
                | CoreError::Network(_)
                | CoreError::NoProvider
        )
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<csv::Error> for CoreError {
    fn from(e: csv::Error) -> Self {
        CoreError::FeedbackLog(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest error text embeds the full URL, including the apikey query parameter.
        let msg = e.to_string();
        let sanitized = match msg.find('?') {
            Some(idx) => format!("{}?<query redacted>", &msg[..idx]),
            None => msg,
        };
        CoreError::Network(sanitized)
    }
}
