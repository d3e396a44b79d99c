//! # fsml-cli
//!
//! Command-line interface for FSML documents.
//!
//! Compiles a document and reports diagnostics (`check`), prints its compiled
//! transition and hook tables (`inspect`), or runs a sequence of events
//! against an in-memory entity (`simulate`).

mod config;
mod errors;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use fsml::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use errors::{enhance_compile_error, enhance_engine_error};

#[derive(Parser)]
#[command(name = "fsml")]
#[command(about = "Compile, inspect and simulate FSML state machines", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Reject mismatched closing tags and undeclared target states
    #[arg(long, global = true)]
    strict: bool,

    /// Do not fall back to an event's errorState when its hooks fail
    #[arg(long, global = true)]
    no_fallback: bool,

    /// Log every hook and task
    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a document and report any errors
    Check { file: PathBuf },
    /// Print states, transitions and hooks
    Inspect {
        file: PathBuf,
        /// Print the compiled tables as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fire events against an entity that starts in STATE
    Simulate {
        file: PathBuf,
        #[arg(long)]
        state: String,
        #[arg(required = true)]
        events: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!("{} Failed to load config: {:#}", "⚠".yellow().bold(), e);
        Config::default()
    });
    config.merge_cli_args(cli.strict, cli.no_fallback, cli.verbose, cli.no_color);

    if !config.colored {
        colored::control::set_override(false);
    }
    init_logging(config.verbose);

    match cli.command {
        Commands::Check { file } => check(&file, &config),
        Commands::Inspect { file, json } => inspect(&file, &config, json),
        Commands::Simulate { file, state, events } => simulate(&file, &config, state, &events),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Compiles `path`, printing diagnostics and exiting on failure.
fn load_engine(path: &Path, config: &Config) -> Result<Engine> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read document from {:?}", path))?;

    match Engine::compile_with(&source, config.engine.clone()) {
        Ok(engine) => Ok(engine),
        Err(err) => {
            let file = path.display().to_string();
            for enhanced in enhance_compile_error(&err, &file, &source) {
                enhanced.display();
                eprintln!();
            }
            eprintln!("{} {}", "✗".red().bold(), format!("{} ({})", err.code(), file).dimmed());
            std::process::exit(1);
        }
    }
}

fn check(path: &Path, config: &Config) -> Result<()> {
    let engine = load_engine(path, config)?;

    println!(
        "{} {} {}",
        "✓".green().bold(),
        path.display().to_string().bold(),
        format!(
            "{} states, {} transitions, {} hooks",
            engine.states().len(),
            engine.transitions().len(),
            engine.hooks().len()
        )
        .dimmed()
    );
    Ok(())
}

fn inspect(path: &Path, config: &Config, json: bool) -> Result<()> {
    let engine = load_engine(path, config)?;

    if json {
        let artifacts = serde_json::json!({
            "schema": engine.schema(),
            "states": engine.states(),
            "transitions": engine.transitions().iter().collect::<Vec<_>>(),
            "hooks": engine.hooks(),
        });
        println!("{}", serde_json::to_string_pretty(&artifacts)?);
        return Ok(());
    }

    println!("{}", "States:".cyan().bold());
    for state in &engine.schema().states {
        println!("  {} {}", "o".green(), state.name);
    }

    println!();
    println!("{}", "Transitions:".cyan().bold());
    for transition in engine.transitions().iter() {
        let line = format!("{} --{}--> {}", transition.source, transition.event, transition.target);
        if transition.is_fallback() {
            println!("  {} {}", line.yellow(), "(fallback)".dimmed());
        } else if let Some(error_state) = &transition.error_state {
            println!("  {} {}", line, format!("(on failure: {})", error_state).dimmed());
        } else {
            println!("  {}", line);
        }
    }

    println!();
    println!("{}", "Hooks:".cyan().bold());
    if engine.hooks().is_empty() {
        println!("  {}", "none".dimmed());
    }
    for (key, tasks) in engine.hooks().iter() {
        println!("  {:<24} {}", key.bold(), tasks.join(", "));
    }

    Ok(())
}

/// In-memory entity that records which tasks ran.
struct Simulated {
    state: String,
    trace: Vec<String>,
}

impl Stateful for Simulated {
    fn state(&self) -> &str {
        &self.state
    }

    fn set_state(&mut self, state: &str) -> fsml::anyhow::Result<()> {
        self.state = state.to_string();
        Ok(())
    }
}

impl Entity for Simulated {
    fn stateful(&mut self) -> Option<&mut dyn Stateful> {
        Some(self)
    }
}

fn simulate(path: &Path, config: &Config, state: String, events: &[String]) -> Result<()> {
    let engine = load_engine(path, config)?;

    let names: Vec<String> = engine.hooks().task_names().into_iter().map(str::to_string).collect();
    for name in names {
        let task_name = name.clone();
        engine.add_task(FnTask::new(name, move |entity| {
            info!("task {}", task_name);
            if let Some(simulated) = entity.downcast_mut::<Simulated>() {
                simulated.trace.push(task_name.clone());
            }
            Ok(())
        }))?;
    }

    let mut entity = Simulated { state, trace: Vec::new() };
    let mut failures = 0;

    for event in events {
        entity.trace.clear();
        match engine.apply(event, &mut entity) {
            Ok(outcome) => {
                let arrow = format!("{} -> {}", outcome.from, outcome.to);
                if outcome.fell_back {
                    println!("{} {} {}", event.bold(), arrow.yellow(), "(fallback)".dimmed());
                } else {
                    println!("{} {}", event.bold(), arrow.green());
                }
                if !entity.trace.is_empty() {
                    println!("  {} {}", "tasks:".dimmed(), entity.trace.join(", "));
                }
            }
            Err(err) => {
                failures += 1;
                enhance_engine_error(&err, &engine).display();
            }
        }
    }

    println!();
    println!("{} {}", "Final state:".cyan().bold(), entity.state.bold());

    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}
