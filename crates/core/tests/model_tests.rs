// ═══════════════════════════════════════════════════════════════════
// Model Tests: Questionnaire, Instrument, Settings, RiskCategory
// ═══════════════════════════════════════════════════════════════════

use risk_profiler_core::errors::CoreError;
use risk_profiler_core::models::allocation::Instrument;
use risk_profiler_core::models::questionnaire::*;
use risk_profiler_core::models::risk::RiskCategory;
use risk_profiler_core::models::settings::{Settings, WeightPolicy};
use std::collections::HashMap;

// ═══════════════════════════════════════════════════════════════════
// Questionnaire
// ═══════════════════════════════════════════════════════════════════

mod questionnaire {
    use super::*;

    #[test]
    fn ten_questions_numbered_in_order() {
        let numbers: Vec<u8> = QuestionId::ALL.iter().map(|q| q.number()).collect();
        assert_eq!(numbers, (1..=10).collect::<Vec<u8>>());
        assert_eq!(QuestionId::Experience.to_string(), "Q5");
    }

    #[test]
    fn only_experience_is_multi_select() {
        let multi: Vec<QuestionId> = QuestionId::ALL
            .into_iter()
            .filter(|q| q.is_multi_select())
            .collect();
        assert_eq!(multi, vec![QuestionId::Experience]);
    }

    #[test]
    fn every_question_has_four_options() {
        for q in QuestionId::ALL {
            assert_eq!(q.option_labels().len(), 4, "{q}");
            assert!(!q.prompt().is_empty());
        }
    }

    #[test]
    fn scores_ascend_with_option_order() {
        let horizon: Vec<u8> = InvestmentHorizon::OPTIONS.iter().map(|o| o.score()).collect();
        assert_eq!(horizon, vec![1, 2, 3, 4]);
        let prior: Vec<u8> = PriorInvestment::OPTIONS.iter().map(|o| o.score()).collect();
        assert_eq!(prior, vec![0, 1, 2, 3]);
    }

    #[test]
    fn label_lookup() {
        assert_eq!(
            AssetShare::from_label("Less than 25%").unwrap(),
            AssetShare::BelowTwentyFive
        );
        assert_eq!(AssetShare::BelowTwentyFive.score(), 4);
        assert_eq!(
            PriorInvestment::from_label(" Derivatives, Mutual Funds, ETFs ").unwrap(),
            PriorInvestment::Funds
        );
    }

    #[test]
    fn label_lookup_is_per_question() {
        let err = InvestmentHorizon::from_label("Buy more").unwrap_err();
        match err {
            CoreError::UnknownOption { question, label } => {
                assert_eq!(question, QuestionId::Horizon);
                assert_eq!(label, "Buy more");
            }
            other => panic!("expected UnknownOption, got {other:?}"),
        }
    }

    #[test]
    fn multi_select_accumulates_and_clears() {
        let mut r = QuestionnaireResponse::new();
        r.answer(QuestionId::Experience, "Bonds").unwrap();
        r.answer(QuestionId::Experience, "Stocks").unwrap();
        r.answer(QuestionId::Experience, "Bonds").unwrap();
        assert_eq!(r.experience.len(), 2);
        r.clear(QuestionId::Experience);
        assert!(r.experience.is_empty());
    }

    #[test]
    fn single_select_replaces() {
        let mut r = QuestionnaireResponse::new();
        r.answer(QuestionId::Knowledge, "Novice").unwrap();
        r.answer(QuestionId::Knowledge, "Professional").unwrap();
        assert_eq!(r.knowledge, Some(KnowledgeLevel::Professional));
        r.clear(QuestionId::Knowledge);
        assert_eq!(r.knowledge, None);
        assert!(r.missing().contains(&QuestionId::Knowledge));
    }

    #[test]
    fn json_uses_option_labels() {
        let json = r#"{
            "horizon": "More than 5 years",
            "expected_return": "6%–10%",
            "drawdown_reaction": "Do nothing",
            "loss_tolerance": "10%–15%",
            "experience": ["Stocks", "Deposits"],
            "knowledge": "Moderate",
            "market_behaviour": "Analyze and hold",
            "risk_appetite": "Moderate",
            "income_stability": "Very stable",
            "asset_share": "25%–50%"
        }"#;
        let r: QuestionnaireResponse = serde_json::from_str(json).unwrap();
        assert!(r.is_complete());
        assert_eq!(r.knowledge, Some(KnowledgeLevel::Moderate));
        assert_eq!(r.risk_appetite, Some(RiskAppetite::Moderate));
        assert!(r.experience.contains(&PriorInvestment::Stocks));

        let back = serde_json::to_string(&r).unwrap();
        assert!(back.contains("\"More than 5 years\""));
    }

    #[test]
    fn partial_json_is_allowed() {
        let r: QuestionnaireResponse = serde_json::from_str(r#"{"knowledge": "Novice"}"#).unwrap();
        assert_eq!(r.missing().len(), 8);
    }

    #[test]
    fn unknown_label_in_json_fails() {
        assert!(serde_json::from_str::<QuestionnaireResponse>(r#"{"knowledge": "Guru"}"#).is_err());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Instrument / RiskCategory
// ═══════════════════════════════════════════════════════════════════

mod catalogue {
    use super::*;

    #[test]
    fn symbol_lookup_ignores_case() {
        assert_eq!(Instrument::from_symbol("qqq").unwrap(), Instrument::Qqq);
        assert_eq!(Instrument::from_symbol(" EEM ").unwrap(), Instrument::Eem);
        assert!(matches!(
            Instrument::from_symbol("BTC"),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn display_names_symbol_and_index() {
        assert_eq!(Instrument::Spy.to_string(), "SPY (S&P 500)");
    }

    #[test]
    fn fund_descriptions() {
        assert_eq!(Instrument::Spy.fund_name(), "SPDR S&P 500 ETF Trust");
        assert_eq!(Instrument::Qqq.category(), "Large Growth");
        assert_eq!(Instrument::Vea.category(), "Foreign Large Blend");
        for instrument in Instrument::ALL {
            assert!(!instrument.fund_name().is_empty());
            assert!(!instrument.category().is_empty());
        }
    }

    #[test]
    fn category_labels_round_trip() {
        for c in RiskCategory::ALL {
            assert_eq!(RiskCategory::from_label(&c.to_string()).unwrap(), c);
            assert!(!c.strategy().is_empty());
        }
        assert!(RiskCategory::from_label("Reckless").is_err());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Settings
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.feedback_log_path.to_str(), Some("user_feedback.csv"));
        assert_eq!(s.lookback_years, 5);
        assert_eq!(s.min_investment, 1000.0);
        assert_eq!(s.max_horizon_years, 30);
        assert_eq!(s.weight_policy, WeightPolicy::ZeroFill);
        assert!(s.api_keys.is_empty());
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(Settings::from_lookup(lookup(&[])).unwrap(), Settings::default());
    }

    #[test]
    fn environment_overrides() {
        let s = Settings::from_lookup(lookup(&[
            ("RISK_PROFILER_FEEDBACK_LOG", "/tmp/fb.csv"),
            ("RISK_PROFILER_LOOKBACK_YEARS", "10"),
            ("RISK_PROFILER_WEIGHT_POLICY", "renormalize"),
            ("ALPHAVANTAGE_API_KEY", "secret"),
        ]))
        .unwrap();
        assert_eq!(s.feedback_log_path.to_str(), Some("/tmp/fb.csv"));
        assert_eq!(s.lookback_years, 10);
        assert_eq!(s.weight_policy, WeightPolicy::Renormalize);
        assert_eq!(s.api_keys.get("alphavantage").map(String::as_str), Some("secret"));
    }

    #[test]
    fn blank_values_are_ignored() {
        let s = Settings::from_lookup(lookup(&[("ALPHAVANTAGE_API_KEY", "  ")])).unwrap();
        assert!(s.api_keys.is_empty());
    }

    #[test]
    fn bad_values_are_config_errors() {
        for vars in [
            [("RISK_PROFILER_LOOKBACK_YEARS", "five")],
            [("RISK_PROFILER_LOOKBACK_YEARS", "0")],
            [("RISK_PROFILER_WEIGHT_POLICY", "spread")],
        ] {
            assert!(matches!(
                Settings::from_lookup(lookup(&vars)),
                Err(CoreError::Config(_))
            ));
        }
    }

    #[test]
    fn weight_policy_parsing() {
        assert_eq!("zero-fill".parse::<WeightPolicy>().unwrap(), WeightPolicy::ZeroFill);
        assert_eq!("Zero_Fill".parse::<WeightPolicy>().unwrap(), WeightPolicy::ZeroFill);
        assert_eq!(" RENORMALIZE ".parse::<WeightPolicy>().unwrap(), WeightPolicy::Renormalize);
        for p in [WeightPolicy::ZeroFill, WeightPolicy::Renormalize] {
            assert_eq!(p.to_string().parse::<WeightPolicy>().unwrap(), p);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════

mod errors {
    use super::*;

    #[test]
    fn incomplete_lists_question_numbers() {
        let err = CoreError::IncompleteResponse {
            missing: vec![QuestionId::Horizon, QuestionId::AssetShare],
        };
        assert!(err.to_string().ends_with("Q1, Q10"));
    }

    #[test]
    fn unknown_option_display() {
        let err = CoreError::UnknownOption {
            question: QuestionId::Knowledge,
            label: "Guru".into(),
        };
        assert_eq!(err.to_string(), "Unknown option for Q6: Guru");
    }

    #[test]
    fn invalid_horizon_display() {
        assert_eq!(
            CoreError::InvalidHorizon(0).to_string(),
            "Invalid horizon: 0 years (must be at least 1)"
        );
    }

    #[test]
    fn external_classification() {
        assert!(CoreError::Network("timeout".into()).is_external());
        assert!(CoreError::NoProvider.is_external());
        assert!(CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: "429".into()
        }
        .is_external());
        assert!(!CoreError::InvalidHorizon(0).is_external());
        assert!(!CoreError::FeedbackLog("disk full".into()).is_external());
        assert!(!CoreError::Validation("x".into()).is_external());
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CoreError = io.into();
        assert!(matches!(err, CoreError::FileIO(ref m) if m.contains("denied")));
    }

    #[test]
    fn json_error_converts() {
        let json_err = serde_json::from_str::<u8>("nope").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }
}
