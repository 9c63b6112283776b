use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};

/// Line-oriented prompts over any reader/writer pair (stdin/stdout in `main`).
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line).context("read from stdin")?;
        if read == 0 {
            bail!("input closed before the questionnaire was finished");
        }
        Ok(line.trim().to_string())
    }

    /// Free text; an empty answer returns `default` when given.
    pub fn ask_text(&mut self, prompt: &str, default: Option<&str>) -> Result<String> {
        loop {
            match default {
                Some(d) => write!(self.output, "{prompt} [{d}]: ")?,
                None => write!(self.output, "{prompt}: ")?,
            }
            self.output.flush()?;
            let line = self.read_line()?;
            if !line.is_empty() {
                return Ok(line);
            }
            if let Some(d) = default {
                return Ok(d.to_string());
            }
        }
    }

    /// Parsed value with a default, re-asking until it parses.
    pub fn ask_parsed<T>(&mut self, prompt: &str, default: T) -> Result<T>
    where
        T: std::str::FromStr + std::fmt::Display,
    {
        loop {
            let text = self.ask_text(prompt, Some(&default.to_string()))?;
            match text.parse() {
                Ok(v) => return Ok(v),
                Err(_) => writeln!(self.output, "  Please enter a valid value.")?,
            }
        }
    }

    /// One of `options`, chosen by 1-based number. Returns the index.
    pub fn ask_choice(&mut self, prompt: &str, options: &[&str], default: Option<usize>) -> Result<usize> {
        writeln!(self.output, "{prompt}")?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}) {option}", i + 1)?;
        }
        loop {
            let default_text = default.map(|d| (d + 1).to_string());
            let text = self.ask_text("  Choice", default_text.as_deref())?;
            match text.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(n - 1),
                _ => writeln!(self.output, "  Enter a number between 1 and {}.", options.len())?,
            }
        }
    }

    /// Any subset of `options` as comma-separated numbers; empty selects nothing.
    pub fn ask_multi(&mut self, prompt: &str, options: &[&str]) -> Result<Vec<usize>> {
        writeln!(self.output, "{prompt} (comma-separated, empty for none)")?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}) {option}", i + 1)?;
        }
        'ask: loop {
            write!(self.output, "  Choices: ")?;
            self.output.flush()?;
            let line = self.read_line()?;
            let mut picked = Vec::new();
            for part in line.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                match part.parse::<usize>() {
                    Ok(n) if (1..=options.len()).contains(&n) => picked.push(n - 1),
                    _ => {
                        writeln!(self.output, "  '{part}' is not an option.")?;
                        continue 'ask;
                    }
                }
            }
            picked.sort_unstable();
            picked.dedup();
            return Ok(picked);
        }
    }
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompter(input: &str) -> Prompter<&[u8], Vec<u8>> {
        Prompter::new(input.as_bytes(), Vec::new())
    }

    #[test]
    fn choice_reasks_until_valid() {
        let mut p = prompter("9\nx\n2\n");
        let picked = p.ask_choice("Pick", &["a", "b"], None).unwrap();
        assert_eq!(picked, 1);
    }

    #[test]
    fn choice_uses_default_on_empty_line() {
        let mut p = prompter("\n");
        assert_eq!(p.ask_choice("Pick", &["a", "b", "c"], Some(2)).unwrap(), 2);
    }

    #[test]
    fn multi_accepts_empty_and_dedups() {
        assert!(prompter("\n").ask_multi("Pick", &["a", "b"]).unwrap().is_empty());
        assert_eq!(
            prompter("2, 1,2\n").ask_multi("Pick", &["a", "b"]).unwrap(),
            vec![0, 1]
        );
    }

    #[test]
    fn parsed_falls_back_to_default() {
        let mut p = prompter("\nabc\n");
        assert_eq!(p.ask_parsed("Years", 10u32).unwrap(), 10);
    }

    #[test]
    fn closed_input_is_an_error() {
        assert!(prompter("").ask_text("Name", None).is_err());
    }
}
