use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use risk_profiler_core::errors::CoreError;
use risk_profiler_core::models::allocation::Instrument;
use risk_profiler_core::models::feedback::{ProfileAgreement, RecommendationAgreement};
use risk_profiler_core::models::questionnaire::{QuestionId, QuestionnaireResponse};
use risk_profiler_core::models::settings::{Settings, WeightPolicy};
use risk_profiler_core::RiskProfiler;

mod prompt;
mod render;

use prompt::Prompter;

#[derive(Debug, Parser)]
#[command(name = "risk-profiler", about = "Investor risk profiling questionnaire")]
struct Args {
    /// User id (or initials) recorded with the feedback.
    #[arg(long)]
    user_id: Option<String>,

    /// JSON file with questionnaire answers, keyed by field name with option labels as values.
    #[arg(long)]
    answers: Option<PathBuf>,

    /// Initial investment in EUR.
    #[arg(long)]
    amount: Option<f64>,

    /// Simulation horizon in years.
    #[arg(long)]
    years: Option<u32>,

    /// ETF symbol for the single-instrument illustration. Defaults to the recommended one.
    #[arg(long)]
    instrument: Option<String>,

    /// CSV file that feedback is appended to.
    #[arg(long)]
    feedback_log: Option<PathBuf>,

    /// How to treat plan instruments without data: zero-fill or renormalize.
    #[arg(long)]
    weight_policy: Option<WeightPolicy>,

    /// Skip the feedback questions.
    #[arg(long)]
    no_feedback: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let settings = resolve_settings(&args)?;
    let mut prompter = Prompter::stdio();

    writeln!(prompter.out(), "Investor Risk Profiling Questionnaire")?;
    writeln!(
        prompter.out(),
        "Answer the questions below to understand your investment risk profile."
    )?;

    let user_id = match args.user_id.clone() {
        Some(id) => id,
        None => prompter.ask_text("Please enter your user ID (or initials)", None)?,
    };
    let mut profiler = RiskProfiler::start(&user_id, settings).context("start session")?;

    if let Some(path) = &args.answers {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read answers from {}", path.display()))?;
        let response: QuestionnaireResponse = serde_json::from_str(&text)
            .with_context(|| format!("parse answers in {}", path.display()))?;
        profiler.set_response(response)?;
    } else {
        for question in QuestionId::ALL {
            ask_question(&mut prompter, &mut profiler, question)?;
        }
    }

    // Re-prompt only what is missing until scoring succeeds.
    loop {
        match profiler.submit() {
            Ok(_) => break,
            Err(CoreError::IncompleteResponse { missing }) => {
                writeln!(prompter.out(), "Please answer all required questions.")?;
                for question in missing {
                    ask_question(&mut prompter, &mut profiler, question)?;
                }
            }
            Err(e) => return Err(e.into()),
        }
    }

    let profile = profiler.profile()?;
    render::profile(prompter.out(), &profile)?;

    let settings = profiler.settings().clone();
    let instrument = match &args.instrument {
        Some(symbol) => Instrument::from_symbol(symbol)?,
        None => {
            let labels: Vec<String> = Instrument::ALL.iter().map(|i| i.to_string()).collect();
            let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
            let default = Instrument::ALL.iter().position(|i| *i == profile.headline);
            let idx = prompter.ask_choice(
                "Choose an ETF to simulate portfolio performance:",
                &labels,
                default,
            )?;
            Instrument::ALL[idx]
        }
    };

    // Re-ask out-of-range values only when both came from prompts.
    let interactive = args.amount.is_none() && args.years.is_none();
    let (single, amount, years) = loop {
        let amount = match args.amount {
            Some(a) => a,
            None => prompter.ask_parsed("Initial investment amount (EUR)", settings.default_investment)?,
        };
        let years = match args.years {
            Some(y) => y,
            None => prompter.ask_parsed("Investment duration (years)", settings.default_horizon_years)?,
        };
        match profiler.illustrate_instrument(instrument, amount, years).await {
            Ok(single) => break (single, amount, years),
            Err(e @ (CoreError::Validation(_) | CoreError::InvalidHorizon(_))) if interactive => {
                writeln!(prompter.out(), "  {e}")?;
            }
            Err(e) => return Err(e.into()),
        }
    };
    render::instrument(prompter.out(), &single)?;

    let blended = profiler.illustrate_recommended(amount, years).await?;
    render::portfolio(prompter.out(), &blended)?;

    if !args.no_feedback {
        ask_feedback(&mut prompter, &mut profiler)?;
    }

    Ok(())
}

fn resolve_settings(args: &Args) -> anyhow::Result<Settings> {
    let mut settings = Settings::from_env().context("load settings from environment")?;
    if let Some(path) = &args.feedback_log {
        settings.feedback_log_path = path.clone();
    }
    if let Some(policy) = args.weight_policy {
        settings.weight_policy = policy;
    }
    Ok(settings)
}

fn ask_question<R, W>(
    prompter: &mut Prompter<R, W>,
    profiler: &mut RiskProfiler,
    question: QuestionId,
) -> anyhow::Result<()>
where
    R: std::io::BufRead,
    W: Write,
{
    let labels = question.option_labels();
    let prompt = format!("{}. {}", question.number(), question.prompt());
    writeln!(prompter.out())?;

    if question.is_multi_select() {
        profiler.clear_answer(question)?;
        for idx in prompter.ask_multi(&prompt, &labels)? {
            profiler.answer(question, labels[idx])?;
        }
    } else {
        let idx = prompter.ask_choice(&prompt, &labels, None)?;
        profiler.answer(question, labels[idx])?;
    }
    Ok(())
}

fn ask_feedback<R, W>(prompter: &mut Prompter<R, W>, profiler: &mut RiskProfiler) -> anyhow::Result<()>
where
    R: std::io::BufRead,
    W: Write,
{
    writeln!(prompter.out())?;
    writeln!(prompter.out(), "== Feedback ==")?;

    let labels: Vec<String> = ProfileAgreement::ALL.iter().map(|a| a.to_string()).collect();
    let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
    let agree_profile = ProfileAgreement::ALL[prompter.ask_choice(
        "Do you agree with your risk profile classification?",
        &labels,
        Some(0),
    )?];

    let labels: Vec<String> = RecommendationAgreement::ALL.iter().map(|a| a.to_string()).collect();
    let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
    let agree_recommendation = RecommendationAgreement::ALL[prompter.ask_choice(
        "Do you agree with the ETF recommendation and strategy?",
        &labels,
        Some(0),
    )?];

    profiler
        .submit_feedback(agree_profile, agree_recommendation)
        .context("save feedback")?;
    writeln!(prompter.out(), "Thank you! Your feedback has been saved.")?;
    Ok(())
}
