use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::errors::CoreError;

use super::allocation::Instrument;
use super::feedback::FeedbackRecord;
use super::illustration::RiskProfile;
use super::questionnaire::QuestionnaireResponse;
use super::simulation::ReturnSeries;

/// Progress of a profiling session.
///
/// `Unanswered → Submitted → ProfileShown → FeedbackSubmitted`; the last two
/// are optional and feedback may be given straight after submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SessionState {
    Unanswered,
    Submitted,
    ProfileShown,
    FeedbackSubmitted,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Unanswered => write!(f, "Unanswered"),
            SessionState::Submitted => write!(f, "Submitted"),
            SessionState::ProfileShown => write!(f, "ProfileShown"),
            SessionState::FeedbackSubmitted => write!(f, "FeedbackSubmitted"),
        }
    }
}

/// Outcome of the one market-data fetch allowed per instrument per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstrumentData {
    Usable(ReturnSeries),
    /// Fetch failed or returned no returns.
    Unusable { reason: String },
}

/// Everything one user's session knows. Owned by the session facade and
/// never shared between sessions.
#[derive(Debug, Clone)]
pub struct SessionContext {
    id: Uuid,
    user_id: String,
    state: SessionState,
    response: QuestionnaireResponse,
    profile: Option<RiskProfile>,
    market_data: HashMap<Instrument, InstrumentData>,
    feedback: Vec<FeedbackRecord>,
}

impl SessionContext {
    /// Start a session for `user_id` (trimmed, must be non-empty).
    pub fn new(user_id: &str) -> Result<Self, CoreError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(CoreError::Validation("user id must not be empty".into()));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            state: SessionState::Unanswered,
            response: QuestionnaireResponse::default(),
            profile: None,
            market_data: HashMap::new(),
            feedback: Vec::new(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn response(&self) -> &QuestionnaireResponse {
        &self.response
    }

    /// Answers can only change before submission.
    pub fn response_mut(&mut self) -> Result<&mut QuestionnaireResponse, CoreError> {
        self.require_state(SessionState::Unanswered, "edit answers")?;
        Ok(&mut self.response)
    }

    pub fn profile(&self) -> Option<&RiskProfile> {
        self.profile.as_ref()
    }

    /// The derived profile, or `InvalidState` if nothing was submitted yet.
    pub fn submitted_profile(&self, action: &str) -> Result<&RiskProfile, CoreError> {
        self.profile.as_ref().ok_or_else(|| CoreError::InvalidState {
            state: self.state.to_string(),
            action: action.to_string(),
        })
    }

    pub(crate) fn record_submission(&mut self, profile: RiskProfile) -> Result<(), CoreError> {
        self.require_state(SessionState::Unanswered, "submit questionnaire")?;
        self.profile = Some(profile);
        self.state = SessionState::Submitted;
        Ok(())
    }

    pub(crate) fn mark_profile_shown(&mut self) {
        if self.state == SessionState::Submitted {
            self.state = SessionState::ProfileShown;
        }
    }

    pub(crate) fn record_feedback(&mut self, record: FeedbackRecord) {
        self.feedback.push(record);
        self.state = SessionState::FeedbackSubmitted;
    }

    pub fn feedback(&self) -> &[FeedbackRecord] {
        &self.feedback
    }

    pub fn market_data(&self, instrument: Instrument) -> Option<&InstrumentData> {
        self.market_data.get(&instrument)
    }

    pub(crate) fn store_market_data(&mut self, instrument: Instrument, data: InstrumentData) {
        self.market_data.insert(instrument, data);
    }

    /// Back to `Unanswered` with the answers kept for editing. Derived results
    /// are dropped; fetched market data stays cached for the session.
    pub fn reset(&mut self) {
        self.profile = None;
        self.state = SessionState::Unanswered;
    }

    fn require_state(&self, expected: SessionState, action: &str) -> Result<(), CoreError> {
        if self.state != expected {
            return Err(CoreError::InvalidState {
                state: self.state.to_string(),
                action: action.to_string(),
            });
        }
        Ok(())
    }
}
