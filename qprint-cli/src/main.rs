mod value;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::{self, Write};
use std::path::PathBuf;

use qprint_core::{validate_modifiers, Config, FormatError, Render, Template};
use qprint_diagnostics::DiagnosticEngine;
use qprint_lexer::{pieces, Piece};

use value::{unescape, Value};

#[derive(Parser)]
#[command(name = "qprint")]
#[command(version = "0.1.0")]
#[command(about = "Placeholder formatting from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Substitute arguments into a template and print the result
    Format {
        /// Template with `{}` placeholders
        #[arg(value_name = "TEMPLATE")]
        template: String,

        /// One value per placeholder (integers, floats, true/false, or text)
        #[arg(value_name = "ARGS", allow_hyphen_values = true)]
        args: Vec<String>,

        /// Interpret backslash escapes such as \n and \t in the template
        #[arg(short, long)]
        escapes: bool,

        /// Do not append a newline after the output
        #[arg(short, long)]
        no_newline: bool,

        /// Write to standard error instead of standard output
        #[arg(long)]
        stderr: bool,

        /// Configuration file (default: nearest qprint.json)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Omit the 0x / 0o prefix on hex and octal output
        #[arg(long)]
        no_base: bool,

        /// Keep every argument as text
        #[arg(long)]
        raw: bool,
    },

    /// Validate a template without formatting anything
    Check {
        /// Template with `{}` placeholders
        #[arg(value_name = "TEMPLATE")]
        template: String,

        /// Expected number of arguments
        #[arg(short, long, value_name = "N")]
        args: Option<usize>,

        /// Interpret backslash escapes such as \n and \t in the template
        #[arg(short, long)]
        escapes: bool,

        /// Output diagnostics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print an example qprint.json
    Config,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Format {
            template,
            args,
            escapes,
            no_newline,
            stderr,
            config,
            no_base,
            raw,
        } => {
            let template = if escapes { unescape(&template) } else { template };

            let mut config = match config {
                Some(path) => Config::from_file(&path)?,
                None => Config::from_dir(std::env::current_dir()?)?,
            };
            if no_base {
                config.show_base = false;
            }

            let values: Vec<Value> = if raw {
                args.into_iter().map(Value::Text).collect()
            } else {
                args.iter().map(|a| Value::infer(a)).collect()
            };
            log::debug!("arguments: {:?}", values);

            let newline = !no_newline;
            let result = if stderr {
                write_formatted(&mut io::stderr().lock(), &config, &template, &values, newline)
            } else {
                write_formatted(&mut io::stdout().lock(), &config, &template, &values, newline)
            };

            if let Err(e) = result {
                // Anything streamed before the failure ends on its own line.
                eprintln!();
                eprintln!("{}", e.to_diagnostic(&template).format(&template));
                anyhow::bail!("formatting failed");
            }
            Ok(())
        }
        Commands::Check {
            template,
            args,
            escapes,
            json,
        } => {
            let template = if escapes { unescape(&template) } else { template };
            let engine = check_template(&template, args);

            if json {
                println!("{}", engine.to_json()?);
            } else if engine.has_errors() {
                engine.print_all(&template);
                engine.print_summary();
            } else {
                for line in describe_placeholders(&template) {
                    println!("  {}", line);
                }
                println!("{} template is valid", "✓".green().bold());
            }

            if engine.has_errors() {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Config => {
            println!("{}", Config::example());
            Ok(())
        }
    }
}

fn write_formatted(
    sink: &mut dyn Write,
    config: &Config,
    template: &str,
    values: &[Value],
    newline: bool,
) -> Result<(), FormatError> {
    let args: Vec<&dyn Render> = values.iter().map(|v| v as &dyn Render).collect();
    if newline {
        qprint_core::write_line_with(config, sink, template, &args)?;
    } else {
        qprint_core::write_to_with(config, sink, template, &args)?;
    }
    sink.flush()?;
    Ok(())
}

/// Run every static check on `template` and collect the findings.
fn check_template(template: &str, expected_args: Option<usize>) -> DiagnosticEngine {
    let mut engine = DiagnosticEngine::new();

    let parsed = Template::parse(template)
        .and_then(|t| validate_modifiers(template).map(|()| t))
        .map_err(FormatError::from);

    match parsed {
        Ok(t) => {
            if let Some(n) = expected_args {
                if let Err(e) = t.validate_arity(n) {
                    engine.emit(e.to_diagnostic(template));
                }
            }
        }
        Err(e) => engine.emit(e.to_diagnostic(template)),
    }

    engine
}

fn describe_placeholders(template: &str) -> Vec<String> {
    pieces(template)
        .map_while(|piece| piece.ok())
        .filter_map(|piece| match piece {
            Piece::Placeholder(p) => Some(p),
            Piece::Literal(_) => None,
        })
        .enumerate()
        .map(|(i, p)| {
            let mode = qprint_core::DisplayMode::from_modifier(p.modifier.as_bytes())
                .map_or("unknown", |m| m.describe());
            format!("#{} at {}..{}: {}", i + 1, p.open, p.close + 1, mode)
        })
        .collect()
}
