pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use std::collections::HashMap;

use models::{
    allocation::Instrument,
    feedback::{FeedbackRecord, ProfileAgreement, RecommendationAgreement},
    illustration::{InstrumentIllustration, PortfolioIllustration, RiskProfile},
    questionnaire::{QuestionId, QuestionnaireResponse},
    session::{InstrumentData, SessionContext, SessionState},
    settings::{Settings, WeightPolicy},
};
use providers::registry::MarketDataRegistry;
use services::{
    allocation_service::AllocationService, market_data_service::MarketDataService,
    scoring_service::ScoringService, simulation_service::SimulationService,
};
use storage::feedback_log::{CsvFeedbackLog, FeedbackLog};

use errors::CoreError;

/// Main entry point for the Risk Profiler core library.
///
/// One value per user session: it owns the session context (answers, derived
/// profile, fetched market data) and the services that operate on it.
/// Presentation layers drive it and render the structured results.
#[must_use]
pub struct RiskProfiler {
    settings: Settings,
    session: SessionContext,
    scoring_service: ScoringService,
    allocation_service: AllocationService,
    simulation_service: SimulationService,
    market_data_service: MarketDataService,
    feedback_log: Box<dyn FeedbackLog>,
}

impl std::fmt::Debug for RiskProfiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskProfiler")
            .field("session_id", &self.session.id())
            .field("user_id", &self.session.user_id())
            .field("state", &self.session.state())
            .field("providers", &self.market_data_service.provider_names())
            .finish()
    }
}

impl RiskProfiler {
    /// Start a session with the default providers and a CSV feedback log at
    /// `settings.feedback_log_path`.
    pub fn start(user_id: &str, settings: Settings) -> Result<Self, CoreError> {
        let registry = MarketDataRegistry::new_with_defaults(&settings.api_keys);
        let feedback_log = Box::new(CsvFeedbackLog::new(settings.feedback_log_path.clone()));
        Self::with_components(user_id, settings, registry, feedback_log)
    }

    /// Start a session with explicit collaborators (custom providers, in-memory log).
    pub fn with_components(
        user_id: &str,
        settings: Settings,
        registry: MarketDataRegistry,
        feedback_log: Box<dyn FeedbackLog>,
    ) -> Result<Self, CoreError> {
        let session = SessionContext::new(user_id)?;
        tracing::info!(session_id = %session.id(), user_id = %session.user_id(), "session started");
        Ok(Self {
            settings,
            session,
            scoring_service: ScoringService::new(),
            allocation_service: AllocationService::new(),
            simulation_service: SimulationService::new(),
            market_data_service: MarketDataService::new(registry),
            feedback_log,
        })
    }

    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    // ── Questionnaire ───────────────────────────────────────────────

    /// Answer a question by option label. Only allowed before submission.
    pub fn answer(&mut self, question: QuestionId, label: &str) -> Result<(), CoreError> {
        self.session.response_mut()?.answer(question, label)
    }

    pub fn clear_answer(&mut self, question: QuestionId) -> Result<(), CoreError> {
        self.session.response_mut()?.clear(question);
        Ok(())
    }

    /// Replace all answers at once (e.g. loaded from a file).
    pub fn set_response(&mut self, response: QuestionnaireResponse) -> Result<(), CoreError> {
        *self.session.response_mut()? = response;
        Ok(())
    }

    /// Score and classify the current answers, moving the session to `Submitted`.
    ///
    /// On `IncompleteResponse` nothing changes and the user can keep answering.
    pub fn submit(&mut self) -> Result<RiskProfile, CoreError> {
        if self.session.state() != SessionState::Unanswered {
            return Err(CoreError::InvalidState {
                state: self.session.state().to_string(),
                action: "submit questionnaire".into(),
            });
        }

        let score = match self.scoring_service.score(self.session.response()) {
            Ok(score) => score,
            Err(e) => {
                tracing::info!(session_id = %self.session.id(), error = %e, "submission rejected");
                return Err(e);
            }
        };
        let category = self.scoring_service.classify(score);
        let profile = RiskProfile {
            score,
            category,
            strategy: category.strategy().to_string(),
            plan: self.allocation_service.plan_for(category),
            headline: self.allocation_service.headline_instrument(category),
        };

        self.session.record_submission(profile.clone())?;
        tracing::info!(
            session_id = %self.session.id(),
            score = score.value(),
            %category,
            "questionnaire submitted"
        );
        Ok(profile)
    }

    /// The submitted profile; marks it as shown.
    pub fn profile(&mut self) -> Result<RiskProfile, CoreError> {
        let profile = self.session.submitted_profile("show profile")?.clone();
        self.session.mark_profile_shown();
        Ok(profile)
    }

    /// Return to `Unanswered` keeping the answers, to retake the questionnaire.
    pub fn reset(&mut self) {
        self.session.reset();
    }

    // ── Illustrations ───────────────────────────────────────────────

    /// Simulate `amount` invested in a single ETF for `years` years.
    ///
    /// A failed fetch does not fail the call: the simulation falls back to the
    /// assumed rate and the result carries a warning saying so.
    pub async fn illustrate_instrument(
        &mut self,
        instrument: Instrument,
        amount: f64,
        years: u32,
    ) -> Result<InstrumentIllustration, CoreError> {
        self.session.submitted_profile("simulate an instrument")?;
        self.validate_inputs(amount, years)?;

        let mut warnings = Vec::new();
        let (returns, latest_close) = match self.ensure_market_data(instrument).await? {
            InstrumentData::Usable(series) => (series.returns, series.latest_close),
            InstrumentData::Unusable { reason } => {
                warnings.push(format!("No price data for {}: {reason}", instrument.symbol()));
                (Vec::new(), None)
            }
        };

        let trajectory = self.simulation_service.simulate(amount, years, &returns)?;
        warnings.extend(trajectory.basis.disclosure());

        Ok(InstrumentIllustration {
            instrument,
            initial_investment: amount,
            trajectory,
            latest_close,
            warnings,
        })
    }

    /// Simulate the recommended allocation for `years` years.
    ///
    /// Instruments without data are left out (see `WeightPolicy`). If none of
    /// the plan's instruments has data the illustration has no trajectory and
    /// a warning explains why; the session itself carries on.
    pub async fn illustrate_recommended(
        &mut self,
        amount: f64,
        years: u32,
    ) -> Result<PortfolioIllustration, CoreError> {
        let plan = self
            .session
            .submitted_profile("simulate the recommended portfolio")?
            .plan
            .clone();
        self.validate_inputs(amount, years)?;
        let policy = self.settings.weight_policy;

        let mut warnings = Vec::new();
        let mut series = HashMap::new();
        let instruments: Vec<Instrument> = plan.instruments().collect();
        // Sequential on purpose: one request at a time.
        for instrument in instruments {
            match self.ensure_market_data(instrument).await? {
                InstrumentData::Usable(s) => {
                    series.insert(instrument, s);
                }
                InstrumentData::Unusable { reason } => {
                    warnings.push(format!("Could not fetch data for {}: {reason}", instrument.symbol()));
                }
            }
        }

        match self
            .simulation_service
            .simulate_blended(amount, years, &plan, &series, policy)
        {
            Ok((trajectory, blended)) => {
                if !blended.excluded.is_empty() {
                    warnings.push(exclusion_note(&blended.excluded, policy));
                }
                warnings.extend(trajectory.basis.disclosure());
                Ok(PortfolioIllustration {
                    plan,
                    initial_investment: amount,
                    policy,
                    included: blended.included,
                    excluded: blended.excluded,
                    trajectory: Some(trajectory),
                    warnings,
                })
            }
            Err(CoreError::InsufficientData(reason)) => {
                tracing::warn!(session_id = %self.session.id(), %reason, "recommended portfolio not simulated");
                warnings.push(format!("Could not simulate the recommended portfolio: {reason}"));
                let excluded = plan.instruments().collect();
                Ok(PortfolioIllustration {
                    plan,
                    initial_investment: amount,
                    policy,
                    included: Vec::new(),
                    excluded,
                    trajectory: None,
                    warnings,
                })
            }
            Err(e) => Err(e),
        }
    }

    // ── Feedback ────────────────────────────────────────────────────

    /// Record the user's agreement with the result and append it to the log.
    pub fn submit_feedback(
        &mut self,
        agree_profile: ProfileAgreement,
        agree_recommendation: RecommendationAgreement,
    ) -> Result<FeedbackRecord, CoreError> {
        let category = self.session.submitted_profile("submit feedback")?.category;
        let record = FeedbackRecord::new(
            self.session.user_id(),
            category,
            agree_profile,
            agree_recommendation,
        );
        self.feedback_log.append(&record)?;
        self.session.record_feedback(record.clone());
        Ok(record)
    }

    /// Everything in the feedback log, oldest first (all users).
    pub fn feedback_log_records(&self) -> Result<Vec<FeedbackRecord>, CoreError> {
        self.feedback_log.read_all()
    }

    // ── Internals ───────────────────────────────────────────────────

    /// The session's market data for `instrument`, fetching it on first use.
    ///
    /// External failures are cached as `Unusable` so each instrument is
    /// requested at most once per session.
    async fn ensure_market_data(&mut self, instrument: Instrument) -> Result<InstrumentData, CoreError> {
        if let Some(data) = self.session.market_data(instrument) {
            return Ok(data.clone());
        }

        let data = match self
            .market_data_service
            .fetch_annual_returns(instrument.symbol(), self.settings.lookback_years)
            .await
        {
            Ok(series) if !series.is_empty() => InstrumentData::Usable(series),
            Ok(_) => InstrumentData::Unusable {
                reason: format!(
                    "not enough history in the last {} years",
                    self.settings.lookback_years
                ),
            },
            Err(e) if e.is_external() => InstrumentData::Unusable {
                reason: e.to_string(),
            },
            Err(e) => return Err(e),
        };

        if let InstrumentData::Unusable { reason } = &data {
            tracing::warn!(
                session_id = %self.session.id(),
                symbol = instrument.symbol(),
                %reason,
                "instrument unusable this session"
            );
        }
        self.session.store_market_data(instrument, data.clone());
        Ok(data)
    }

    fn validate_inputs(&self, amount: f64, years: u32) -> Result<(), CoreError> {
        if !amount.is_finite() || amount < self.settings.min_investment {
            return Err(CoreError::Validation(format!(
                "initial investment must be at least {:.0}",
                self.settings.min_investment
            )));
        }
        if years == 0 {
            return Err(CoreError::InvalidHorizon(years));
        }
        if years > self.settings.max_horizon_years {
            return Err(CoreError::Validation(format!(
                "horizon must be at most {} years",
                self.settings.max_horizon_years
            )));
        }
        Ok(())
    }
}

fn exclusion_note(excluded: &[Instrument], policy: WeightPolicy) -> String {
    let symbols = excluded
        .iter()
        .map(|i| i.symbol())
        .collect::<Vec<_>>()
        .join(", ");
    match policy {
        WeightPolicy::ZeroFill => format!(
            "{symbols} excluded from the portfolio simulation; their weight earns no return."
        ),
        WeightPolicy::Renormalize => format!(
            "{symbols} excluded from the portfolio simulation; remaining weights scaled to 100%."
        ),
    }
}
