use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::errors::CoreError;

/// How the blended simulation treats plan instruments that have no usable data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeightPolicy {
    /// Missing instruments contribute a zero return; remaining weights are used as-is.
    #[default]
    ZeroFill,
    /// Remaining weights are scaled up so they sum to 1.0.
    Renormalize,
}

impl std::str::FromStr for WeightPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero-fill" | "zero_fill" | "zerofill" => Ok(WeightPolicy::ZeroFill),
            "renormalize" => Ok(WeightPolicy::Renormalize),
            other => Err(CoreError::Config(format!("unknown weight policy: {other}"))),
        }
    }
}

impl std::fmt::Display for WeightPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeightPolicy::ZeroFill => write!(f, "zero-fill"),
            WeightPolicy::Renormalize => write!(f, "renormalize"),
        }
    }
}

/// Runtime configuration for a profiling session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// CSV file that feedback records are appended to.
    pub feedback_log_path: PathBuf,

    /// Years of price history requested per instrument.
    pub lookback_years: u32,

    /// Smallest accepted initial investment (EUR).
    pub min_investment: f64,

    /// Longest accepted simulation horizon.
    pub max_horizon_years: u32,

    pub default_investment: f64,
    pub default_horizon_years: u32,

    pub weight_policy: WeightPolicy,

    /// Optional API keys for providers that require them.
    /// Keys: provider name (e.g., "alphavantage").
    pub api_keys: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feedback_log_path: PathBuf::from("user_feedback.csv"),
            lookback_years: 5,
            min_investment: 1000.0,
            max_horizon_years: 30,
            default_investment: 10_000.0,
            default_horizon_years: 10,
            weight_policy: WeightPolicy::default(),
            api_keys: HashMap::new(),
        }
    }
}

impl Settings {
    /// Defaults overlaid with `RISK_PROFILER_*` and provider key variables.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CoreError> {
        let mut settings = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = var("RISK_PROFILER_FEEDBACK_LOG") {
            settings.feedback_log_path = PathBuf::from(path);
        }
        if let Some(years) = var("RISK_PROFILER_LOOKBACK_YEARS") {
            settings.lookback_years = years.trim().parse().map_err(|e| {
                CoreError::Config(format!("RISK_PROFILER_LOOKBACK_YEARS={years}: {e}"))
            })?;
            if settings.lookback_years == 0 {
                return Err(CoreError::Config(
                    "RISK_PROFILER_LOOKBACK_YEARS must be at least 1".into(),
                ));
            }
        }
        if let Some(policy) = var("RISK_PROFILER_WEIGHT_POLICY") {
            settings.weight_policy = policy.parse()?;
        }
        if let Some(key) = var("ALPHAVANTAGE_API_KEY") {
            settings.api_keys.insert("alphavantage".into(), key);
        }

        Ok(settings)
    }
}
