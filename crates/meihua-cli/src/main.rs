//! Meihua CLI - Plum Blossom Numerology (梅花易数) from the terminal.
//!
//! Casts a hexagram from two numbers or from the calendar numbers of a moment,
//! draws the primary, mutual and changed hexagrams, and can stream an AI
//! interpretation from an OpenAI-compatible endpoint.

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Args, Parser, Subcommand};
use meihua_core::{CastInput, EarthlyBranch};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

mod commands;
mod config;
mod render;

use commands::cast::{CastOptions, TimeArgs};
use commands::config as config_cmd;
use config::Config;

/// Meihua CLI - cast hexagrams and ask for an interpretation.
///
/// Run `mh cast 3 8` for a numeric casting or `mh time` for a time-based one.
#[derive(Parser, Debug)]
#[command(
    name = "mh",
    author,
    version,
    about = "Meihua: Plum Blossom Numerology hexagram casting",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Cast from two positive numbers (数字起卦).
    Cast {
        /// Number for the upper trigram.
        upper: u64,

        /// Number for the lower trigram.
        lower: u64,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Cast from lunar calendar numbers (时间起卦).
    ///
    /// The lunar date comes from any Chinese calendar; only the year branch,
    /// month, day and hour are needed.
    #[command(group(ArgGroup::new("year").required(true).args(["year_branch", "lunar_year"])))]
    Time {
        /// Earthly branch of the lunar year (子, zi or 1..=12).
        #[arg(long)]
        year_branch: Option<EarthlyBranch>,

        /// Lunar year number; its branch is derived.
        #[arg(long)]
        lunar_year: Option<i32>,

        /// Lunar month (negative for a leap month).
        #[arg(long, allow_negative_numbers = true)]
        month: i32,

        /// Lunar day of month.
        #[arg(long)]
        day: u32,

        /// Earthly branch of the hour. Defaults to the current local hour.
        #[arg(long, conflicts_with = "hour")]
        hour_branch: Option<EarthlyBranch>,

        /// Clock hour (0-23); its branch is derived.
        #[arg(long)]
        hour: Option<u32>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Output and interpretation options for casting commands.
#[derive(Args, Debug)]
struct OutputArgs {
    /// Output format: text or json.
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Stream an AI interpretation after the reading.
    #[arg(short, long)]
    interpret: bool,

    /// The matter being divined.
    #[arg(long)]
    question: Option<String>,

    /// Four pillars (八字) to include in the interpretation.
    #[arg(long)]
    bazi: Option<String>,

    /// Model override for the interpretation.
    #[arg(long)]
    model: Option<String>,

    /// TOML file with a [resolver] table (api_url, api_key, model_name).
    #[arg(long)]
    resolver: Option<PathBuf>,
}

impl From<OutputArgs> for CastOptions {
    fn from(args: OutputArgs) -> Self {
        Self {
            format: args.format,
            interpret: args.interpret,
            question: args.question,
            bazi: args.bazi,
            model: args.model,
            resolver: args.resolver,
        }
    }
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration.
    Show,

    /// Set a configuration value.
    Set {
        /// Configuration key.
        key: String,
        /// Configuration value.
        value: String,
    },

    /// Get a configuration value.
    Get {
        /// Configuration key.
        key: String,
    },

    /// Reset configuration to defaults.
    Reset,

    /// Show path to config file.
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Cast {
            upper,
            lower,
            output,
        } => {
            let input = CastInput::Numbers { upper, lower };
            commands::cast::execute(&Config::load()?, input, &output.into()).await?;
        }

        Commands::Time {
            year_branch,
            lunar_year,
            month,
            day,
            hour_branch,
            hour,
            output,
        } => {
            let args = TimeArgs {
                year_branch,
                lunar_year,
                month,
                day,
                hour_branch,
                hour,
            };
            let input = CastInput::Calendar(args.to_point()?);
            commands::cast::execute(&Config::load()?, input, &output.into()).await?;
        }

        Commands::Config(config_cmd_inner) => match config_cmd_inner {
            ConfigCommands::Show => {
                config_cmd::show(&Config::load()?)?;
            }
            ConfigCommands::Set { key, value } => {
                config_cmd::set(&key, &value)?;
            }
            ConfigCommands::Get { key } => {
                config_cmd::get(&Config::load()?, &key)?;
            }
            ConfigCommands::Reset => {
                config_cmd::reset()?;
            }
            ConfigCommands::Path => {
                if let Some(path) = Config::config_file_path() {
                    println!("{}", path.display());
                } else {
                    println!("(no config file path available)");
                }
            }
        },
    }

    Ok(())
}
