use std::io::{self, Write};

use risk_profiler_core::models::illustration::{
    InstrumentIllustration, PortfolioIllustration, RiskProfile,
};
use risk_profiler_core::models::simulation::PortfolioTrajectory;

const BAR_WIDTH: usize = 40;

pub fn profile(out: &mut impl Write, profile: &RiskProfile) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "== Your Risk Profile ==")?;
    writeln!(
        out,
        "You are classified as: {} (score {})",
        profile.category, profile.score
    )?;
    writeln!(out, "Recommended strategy: {}", profile.strategy)?;
    writeln!(out)?;
    writeln!(out, "Portfolio allocation:")?;
    for holding in &profile.plan.holdings {
        writeln!(
            out,
            "  - {}: {:.0}%  {}",
            holding.instrument,
            holding.weight * 100.0,
            holding.instrument.rationale()
        )?;
    }
    writeln!(
        out,
        "Based on your profile we recommend starting with: {}",
        profile.headline
    )
}

pub fn instrument(out: &mut impl Write, illustration: &InstrumentIllustration) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "== Simulated Portfolio Growth ({}) ==",
        illustration.instrument.symbol()
    )?;
    writeln!(
        out,
        "{} ({})",
        illustration.instrument.fund_name(),
        illustration.instrument.category()
    )?;
    writeln!(out, "Why this ETF? {}", illustration.instrument.rationale())?;
    if let Some(close) = illustration.latest_close {
        writeln!(out, "Latest close: ${close:.2}")?;
    }
    warnings(out, &illustration.warnings)?;
    trajectory(out, &illustration.trajectory)?;
    summary(out, "Final Portfolio Value", &illustration.trajectory)?;
    writeln!(
        out,
        "Past performance does not guarantee future results. This is an illustration, not a forecast."
    )
}

pub fn portfolio(out: &mut impl Write, illustration: &PortfolioIllustration) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "== Simulated Recommended Portfolio ==")?;
    for holding in &illustration.included {
        writeln!(
            out,
            "  - {}: {:.0}%",
            holding.instrument.symbol(),
            holding.weight * 100.0
        )?;
    }
    warnings(out, &illustration.warnings)?;
    match &illustration.trajectory {
        Some(t) => {
            trajectory(out, t)?;
            summary(out, "Recommended Portfolio Final Value", t)
        }
        None => Ok(()),
    }
}

fn warnings(out: &mut impl Write, warnings: &[String]) -> io::Result<()> {
    for w in warnings {
        writeln!(out, "  ! {w}")?;
    }
    Ok(())
}

fn trajectory(out: &mut impl Write, t: &PortfolioTrajectory) -> io::Result<()> {
    let peak = t.values.iter().copied().fold(0.0_f64, f64::max);
    writeln!(out, "{:>5}  {:>14}", "Year", "Value (EUR)")?;
    for (year, value) in t.values.iter().enumerate() {
        let len = if peak > 0.0 {
            ((value / peak) * BAR_WIDTH as f64).round().max(0.0) as usize
        } else {
            0
        };
        writeln!(out, "{year:>5}  {:>14}  {}", euros(*value), "#".repeat(len))?;
    }
    Ok(())
}

fn summary(out: &mut impl Write, label: &str, t: &PortfolioTrajectory) -> io::Result<()> {
    writeln!(
        out,
        "{label} after {} year(s): {} ({:+.1}%)",
        t.horizon_years(),
        euros(t.final_value()),
        t.total_return_pct()
    )
}

/// `€12,345.67`
fn euros(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if cents > 0 && value < 0.0 { "-" } else { "" };
    format!("{sign}€{grouped}.{:02}", cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use risk_profiler_core::models::simulation::ReturnBasis;

    #[test]
    fn euros_groups_thousands() {
        assert_eq!(euros(0.0), "€0.00");
        assert_eq!(euros(1518.0), "€1,518.00");
        assert_eq!(euros(1234567.891), "€1,234,567.89");
        assert_eq!(euros(-950.5), "-€950.50");
    }

    #[test]
    fn euros_never_prints_negative_zero() {
        assert_eq!(euros(-0.001), "€0.00");
        assert_eq!(euros(-0.0), "€0.00");
        assert_eq!(euros(-0.01), "-€0.01");
    }

    #[test]
    fn summary_names_the_horizon() {
        let t = PortfolioTrajectory {
            values: vec![1000.0, 1100.0, 1210.0],
            returns: vec![0.1, 0.1],
            basis: ReturnBasis::Historical { years: 2 },
        };
        let mut out = Vec::new();
        summary(&mut out, "Final Portfolio Value", &t).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Final Portfolio Value after 2 year(s): €1,210.00 (+21.0%)\n"
        );
    }
}
