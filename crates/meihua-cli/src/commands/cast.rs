//! Casting commands: build a reading, print it, optionally interpret it.

use std::io::{self, Write};
use std::ops::ControlFlow;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Timelike;
use meihua_core::{cast, CalendarPoint, CastInput, EarthlyBranch, Reading};
use meihua_oracle::{Consultation, Delta, LlmResolver, Oracle, PromptTemplate};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::render::{render_json, render_text, OutputFormat};

/// Options shared by every casting command.
#[derive(Debug, Clone, Default)]
pub struct CastOptions {
    pub format: String,
    pub interpret: bool,
    pub question: Option<String>,
    pub bazi: Option<String>,
    pub model: Option<String>,
    pub resolver: Option<PathBuf>,
}

/// Calendar numbers as given on the command line.
#[derive(Debug, Clone)]
pub struct TimeArgs {
    pub year_branch: Option<EarthlyBranch>,
    pub lunar_year: Option<i32>,
    pub month: i32,
    pub day: u32,
    pub hour_branch: Option<EarthlyBranch>,
    pub hour: Option<u32>,
}

impl TimeArgs {
    /// Resolve to a calendar point, falling back to the current local hour.
    pub fn to_point(&self) -> Result<CalendarPoint> {
        let year_branch = match (self.year_branch, self.lunar_year) {
            (Some(branch), _) => branch,
            (None, Some(year)) => EarthlyBranch::from_lunar_year(year),
            (None, None) => anyhow::bail!("Either --year-branch or --lunar-year is required"),
        };
        let hour_branch = match (self.hour_branch, self.hour) {
            (Some(branch), _) => branch,
            (None, Some(hour)) => EarthlyBranch::from_hour(hour)?,
            (None, None) => {
                let now = chrono::Local::now();
                debug!(hour = now.hour(), "using current local hour");
                EarthlyBranch::from_hour(now.hour())?
            }
        };
        Ok(CalendarPoint::new(
            year_branch,
            self.month,
            self.day,
            hour_branch,
        )?)
    }
}

/// Cast, print and optionally interpret.
pub async fn execute(config: &Config, input: CastInput, options: &CastOptions) -> Result<()> {
    let format: OutputFormat = options.format.parse()?;
    let reading = cast(&input)?;
    info!(
        primary = %reading.primary().name(),
        changed = %reading.changed().name(),
        changing_line = reading.changing_line().number(),
        "reading ready"
    );

    // Fail on missing credentials before printing anything.
    let oracle = if options.interpret {
        Some(build_oracle(config, options)?)
    } else {
        None
    };
    let consultation = Consultation::new(options.question.clone(), options.bazi.clone());

    match (format, oracle) {
        (OutputFormat::Text, None) => {
            print!("{}", render_text(&reading));
        }
        (OutputFormat::Text, Some(oracle)) => {
            print!("{}", render_text(&reading));
            println!();
            println!("🤖 AI 解卦（{}）", oracle.resolver().model_name);
            println!("{:─<40}", "");
            stream_to_terminal(&oracle, &reading, &consultation).await?;
        }
        (OutputFormat::Json, None) => {
            println!("{}", render_json(&reading)?);
        }
        (OutputFormat::Json, Some(oracle)) => {
            let interpretation = oracle
                .stream(&reading, &consultation, |_| ControlFlow::Continue(()))
                .await
                .context("AI interpretation failed")?;
            let output = InterpretedReading {
                reading: &reading,
                model: &oracle.resolver().model_name,
                interpretation,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

#[derive(Debug, Serialize)]
struct InterpretedReading<'a> {
    reading: &'a Reading,
    model: &'a str,
    interpretation: String,
}

fn build_oracle(config: &Config, options: &CastOptions) -> Result<Oracle> {
    let mut resolver = match &options.resolver {
        Some(path) => {
            let mut resolver = LlmResolver::load_from_toml(path)?;
            if !resolver.has_key() {
                resolver.api_key = config.api_key.clone().unwrap_or_default();
            }
            resolver
        }
        None => config.resolver(),
    };
    if let Some(model) = &options.model {
        resolver.model_name = model.clone();
    }

    let mut oracle = Oracle::new(resolver)?;
    if let Some(system_prompt) = &config.system_prompt {
        oracle = oracle.with_prompt(PromptTemplate::new(system_prompt.clone()));
    }
    Ok(oracle)
}

async fn stream_to_terminal(
    oracle: &Oracle,
    reading: &Reading,
    consultation: &Consultation,
) -> Result<()> {
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    let mut in_reasoning = false;
    let mut write_error = None;

    oracle
        .stream(reading, consultation, |delta| {
            match write_delta(&mut stdout, &mut stderr, &mut in_reasoning, delta) {
                Ok(()) => ControlFlow::Continue(()),
                Err(err) => {
                    write_error = Some(err);
                    ControlFlow::Break(())
                }
            }
        })
        .await
        .context("AI interpretation failed")?;

    if let Some(err) = write_error {
        return Err(err).context("Failed to write interpretation");
    }
    writeln!(stdout)?;
    Ok(())
}

/// Reasoning goes to `thoughts`, the answer to `out`.
fn write_delta(
    out: &mut impl Write,
    thoughts: &mut impl Write,
    in_reasoning: &mut bool,
    delta: &Delta,
) -> io::Result<()> {
    match delta {
        Delta::Reasoning(text) => {
            if !*in_reasoning {
                writeln!(thoughts, "💭 思考中…")?;
                *in_reasoning = true;
            }
            write!(thoughts, "{text}")?;
            thoughts.flush()
        }
        Delta::Content(text) => {
            if *in_reasoning {
                writeln!(thoughts)?;
                *in_reasoning = false;
            }
            write!(out, "{text}")?;
            out.flush()
        }
    }
}
