//! NativeScript Nx CLI
//!
//! Runs `@nativescript/nx:build` targets of an Nx workspace.

use anyhow::Result;
use clap::{Parser, Subcommand};
use nsnx_cli::output::{format_duration, Status};
use nsnx_core::config::Config;
use nsnx_core::error::{exit_codes, Error};
use nsnx_core::process::{command_exists, run_command, which_command};
use nsnx_executor::{run_executor, ExecutorSettings, TargetSelector, WorkspaceConfig};
use nsnx_telemetry::{level_for_verbosity, TelemetryConfig, Timer};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "nsnx")]
#[command(about = "Run NativeScript targets of an Nx workspace")]
#[command(version)]
struct Cli {
    /// Workspace root (directory containing workspace.json)
    #[arg(short, long, global = true, default_value = ".")]
    workspace: PathBuf,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a target: patch resources and invoke the NativeScript CLI
    Run {
        /// project:target[:configuration]
        selector: String,
        /// Extra flags passed through to the NativeScript CLI
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        passthrough: Vec<String>,
    },

    /// Print the NativeScript command a target would run
    Print {
        /// project:target[:configuration]
        selector: String,
        /// Extra flags passed through to the NativeScript CLI
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        passthrough: Vec<String>,
    },

    /// Check that the NativeScript CLI is available
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    let config = match Config::load_from(cli.config.as_deref(), &cli.workspace) {
        Ok(config) => config,
        Err(e) => {
            Status::error(&e.to_string());
            std::process::exit(e.exit_code());
        }
    };

    nsnx_telemetry::init_with_config(TelemetryConfig {
        log_level: level_for_verbosity(cli.verbose, cli.quiet, &config.schema.logging.level),
        json: cli.log_json,
        ..Default::default()
    })?;

    let exit_code = match cli.command {
        Commands::Run {
            selector,
            passthrough,
        } => run_target(&cli.workspace, &selector, passthrough, &config, false, cli.quiet),
        Commands::Print {
            selector,
            passthrough,
        } => run_target(&cli.workspace, &selector, passthrough, &config, true, cli.quiet),
        Commands::Doctor { json } => run_doctor(&config, json),
    };

    std::process::exit(exit_code);
}

fn run_target(
    workspace_root: &Path,
    selector: &str,
    passthrough: Vec<String>,
    config: &Config,
    dry_run: bool,
    quiet: bool,
) -> i32 {
    let started = Instant::now();
    let timer = Timer::start(selector);
    let argv: Vec<String> = std::iter::once(selector.to_string())
        .chain(passthrough)
        .collect();

    let result = selector
        .parse::<TargetSelector>()
        .and_then(|selector| {
            let workspace = WorkspaceConfig::load(workspace_root)?;
            workspace.resolve(&selector, argv)
        })
        .and_then(|(options, context)| {
            let settings = ExecutorSettings {
                dry_run,
                ..ExecutorSettings::from(&config.schema)
            };
            run_executor(options, &context, &settings)
        });
    timer.stop();

    match result {
        Ok(outcome) if dry_run => {
            if outcome.success {
                exit_codes::SUCCESS
            } else {
                exit_codes::FAILURE
            }
        }
        Ok(outcome) if outcome.success => {
            if !quiet {
                Status::success(&format!(
                    "{} finished in {}",
                    selector,
                    format_duration(started.elapsed())
                ));
            }
            exit_codes::SUCCESS
        }
        Ok(_) => {
            Status::error(&format!("{} failed", selector));
            exit_codes::FAILURE
        }
        Err(e) => report_error(&e),
    }
}

fn report_error(error: &Error) -> i32 {
    tracing::error!(code = %error.code, "{}", error.message);
    Status::error(&error.to_string());
    error.exit_code()
}

fn run_doctor(config: &Config, json: bool) -> i32 {
    let program = nsnx_core::process::platform_program(&config.schema.cli.program);
    let installed = command_exists(&program);
    let version = if installed {
        run_command(&program, &["--version"])
            .ok()
            .filter(|r| r.success)
            .map(|r| r.stdout.trim().to_string())
    } else {
        None
    };

    if json {
        let report = serde_json::json!({
            "program": program,
            "path": which_command(&program).map(|p| p.display().to_string()),
            "installed": installed,
            "version": version,
            "config": config.path.as_ref().map(|p| p.display().to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
    } else {
        Status::header("NativeScript Nx doctor");
        match &config.path {
            Some(path) => Status::info(&format!("Config: {}", path.display())),
            None => Status::info("Config: defaults"),
        }
        if installed {
            Status::success(&format!(
                "{} {}",
                program,
                version.as_deref().unwrap_or("(version unknown)")
            ));
        } else {
            Status::error(&format!("{} not found", program));
            Status::warning("Install with: npm install -g nativescript");
        }
    }

    if installed {
        exit_codes::SUCCESS
    } else {
        exit_codes::COMMAND_NOT_FOUND
    }
}
