//! q16 command-line calculator
//!
//! # Usage
//!
//! ```bash
//! # Interactive session
//! q16
//!
//! # One-shot evaluation
//! q16 eval "[5,5] + [5,17]"
//!
//! # Codec conversions
//! q16 to-hex -387.34080544522
//! q16 to-decimal FE7CA8C1
//! ```

mod config;

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::{style, Term};
use q16_expr::Value;
use q16_fixed_point::{codec, FixedPoint};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{OutputFormat, ShellConfig};

#[derive(Parser)]
#[command(name = "q16")]
#[command(version)]
#[command(about = "Calculator for Q16.16 fixed-point scalars and vectors")]
#[command(long_about = r##"
Calculator for Q16.16 fixed-point scalars and vectors

Literals are decimal (5, 1.25), hex words (#FE8B8156) or vectors
([5, #00110000]). A single wide integer inside brackets is unpacked into
several 32-bit components.

Examples:
  q16 eval "#fe8b8156 x #ffdaa260"
  q16 eval "[61257709769163094].Wedge([-10517511624487791])"
  q16 eval "Vector.Area([1,2],[3,4],[5,7])"
"##)]
struct Cli {
    /// Print one JSON record per result
    #[arg(long, global = true)]
    json: bool,

    /// Prompt shown in interactive mode
    #[arg(long, global = true)]
    prompt: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read and evaluate expressions until the exit keyword or end of input
    Repl,

    /// Evaluate a single expression
    Eval {
        /// Expression text
        #[arg(allow_hyphen_values = true)]
        expression: String,
    },

    /// Convert a decimal number to its 8-digit hex word
    ToHex {
        /// Decimal number, e.g. -387.34080544522
        #[arg(allow_hyphen_values = true)]
        decimal: String,
    },

    /// Convert a hex word to its fixed-format decimal text
    ToDecimal {
        /// Hex word with optional leading '#'
        hex: String,
    },
}

#[derive(Serialize)]
struct Record<'a, T: Serialize> {
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> Result<()> {
    // Logs go to stderr so results on stdout stay machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "q16_cli=info,q16_expr=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = ShellConfig::from_env();
    if cli.json {
        config.output = OutputFormat::Json;
    }
    if let Some(prompt) = cli.prompt {
        config.prompt = prompt;
    }

    let ok = match cli.command.unwrap_or(Commands::Repl) {
        Commands::Repl => {
            run_repl(&config)?;
            true
        }
        Commands::Eval { expression } => {
            let result = q16_expr::evaluate(&expression);
            emit(&mut io::stdout(), config.output, &expression, result)?
        }
        Commands::ToHex { decimal } => {
            emit(&mut io::stdout(), config.output, &decimal, to_hex(&decimal))?
        }
        Commands::ToDecimal { hex } => {
            emit(&mut io::stdout(), config.output, &hex, to_decimal(&hex))?
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn to_hex(decimal: &str) -> q16_fixed_point::Result<String> {
    codec::decimal_to_hex(&codec::normalize_decimal(decimal)?)
}

fn to_decimal(hex: &str) -> q16_fixed_point::Result<String> {
    FixedPoint::from_hex(hex).map(FixedPoint::to_decimal_string)
}

/// Text-mode rendering of a successful result
trait TextView {
    fn text_view(&self) -> String;
}

impl TextView for Value {
    fn text_view(&self) -> String {
        self.describe()
    }
}

impl TextView for String {
    fn text_view(&self) -> String {
        self.clone()
    }
}

/// Print one result; returns whether it was a success.
fn emit<W, T, E>(
    out: &mut W,
    format: OutputFormat,
    input: &str,
    result: std::result::Result<T, E>,
) -> Result<bool>
where
    W: Write,
    T: TextView + Serialize,
    E: Display,
{
    let ok = result.is_ok();
    match format {
        OutputFormat::Text => match result {
            Ok(value) => writeln!(out, "{}", value.text_view())?,
            Err(e) => writeln!(out, "{} {}", style("error:").red().bold(), e)?,
        },
        OutputFormat::Json => {
            let record = match result {
                Ok(value) => Record {
                    input,
                    result: Some(value),
                    error: None,
                },
                Err(e) => Record {
                    input,
                    result: None,
                    error: Some(e.to_string()),
                },
            };
            writeln!(out, "{}", serde_json::to_string(&record)?)?;
        }
    }
    Ok(ok)
}

fn run_repl(config: &ShellConfig) -> Result<()> {
    let interactive = Term::stdout().is_term() && config.output == OutputFormat::Text;
    if interactive {
        println!("{}", style("q16 fixed-point calculator").cyan().bold());
        println!("Type '{}' to end the session.\n", config.exit_keyword);
    }

    let evaluated = run_session(config, io::stdin().lock(), &mut io::stdout(), interactive)?;
    tracing::info!(evaluated, "Session ended");
    Ok(())
}

/// Evaluate lines until the exit keyword or end of input; returns the number
/// of lines evaluated.
fn run_session<R, W>(config: &ShellConfig, input: R, out: &mut W, interactive: bool) -> Result<usize>
where
    R: BufRead,
    W: Write,
{
    let mut lines = input.lines();
    let mut evaluated = 0_usize;

    loop {
        if interactive {
            write!(out, "{} ", style(&config.prompt).green().bold())?;
            out.flush()?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let input = line.trim();

        if input.is_empty() {
            continue;
        }
        if config.is_exit(input) {
            break;
        }

        let result = q16_expr::evaluate(input);
        if let Err(e) = &result {
            tracing::debug!(input, error = %e, "Evaluation failed");
        }
        emit(out, config.output, input, result)?;
        evaluated += 1;
    }

    Ok(evaluated)
}
