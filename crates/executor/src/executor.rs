//! The build/run executor
//!
//! Compiles the options, patches platform resource files, optionally sets
//! the application id, and runs the NativeScript CLI in the project
//! directory with inherited stdio.

use crate::compiler::{compile, CompiledCommand};
use crate::context::ExecutorContext;
use crate::options::{non_empty, BuildOptions, Platform};
use nsnx_android::apply_xml_updates;
use nsnx_cli::output::format_command;
use nsnx_core::config::{ConfigSchema, ResourcesConfig};
use nsnx_core::error::{Error, Result};
use nsnx_core::process::{platform_program, run_command_streaming_in_dir};
use nsnx_ios::apply_plist_updates;
use serde::Serialize;
use std::path::Path;

/// Settings that come from tool configuration rather than executor options
#[derive(Debug, Clone)]
pub struct ExecutorSettings {
    /// NativeScript CLI executable, already adjusted for the platform
    pub program: String,
    pub resources: ResourcesConfig,
    /// Print the command without patching files or spawning anything
    pub dry_run: bool,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self::from(&ConfigSchema::default())
    }
}

impl From<&ConfigSchema> for ExecutorSettings {
    fn from(schema: &ConfigSchema) -> Self {
        Self {
            program: platform_program(&schema.cli.program),
            resources: schema.resources.clone(),
            dry_run: false,
        }
    }
}

/// Outcome of an executor run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExecutorResult {
    pub success: bool,
}

/// Run the executor.
///
/// A non-zero exit of the NativeScript CLI is reported through
/// [`ExecutorResult::success`]; `Err` is reserved for setup failures, in
/// which case the main command never runs.
pub fn run_executor(
    options: BuildOptions,
    context: &ExecutorContext,
    settings: &ExecutorSettings,
) -> Result<ExecutorResult> {
    let command = compile(options, context)?;
    let project_dir = context.project_dir();

    if settings.dry_run {
        println!("{}", format_command(&settings.program, &command.all_args()));
        return Ok(ExecutorResult { success: true });
    }

    if !command.is_clean() {
        patch_resources(&command.options, &project_dir, &settings.resources)?;
        if let Some(id) = non_empty(&command.options.id) {
            set_app_id(&settings.program, command.options.platform, id, &project_dir)?;
        }
    }

    run_command(&settings.program, &command, context)
}

/// Apply plist updates, then XML updates, each file in configuration order
fn patch_resources(
    options: &BuildOptions,
    project_dir: &Path,
    resources: &ResourcesConfig,
) -> Result<()> {
    for patched in apply_plist_updates(project_dir, resources, &options.plist_updates())? {
        for (key, value) in &patched.keys {
            println!("Updating {}: {}={}", patched.file, key, value);
        }
        println!("Updated: {}", patched.path.display());
    }

    for path in apply_xml_updates(project_dir, resources, &options.xml_updates())? {
        println!("Updated: {}", path.display());
    }
    Ok(())
}

/// `ns config set <platform>.id <id>`.
///
/// Runs to completion before the main command. Its exit code is logged and
/// otherwise ignored.
fn set_app_id(
    program: &str,
    platform: Option<Platform>,
    id: &str,
    project_dir: &Path,
) -> Result<()> {
    let platform = platform.ok_or_else(|| {
        Error::validation("Option \"id\" requires \"platform\"")
            .with_suggestion("Set platform to ios or android")
    })?;

    let key = format!("{}.id", platform);
    let code = run_command_streaming_in_dir(program, &["config", "set", key.as_str(), id], project_dir)?;
    if code != 0 {
        tracing::warn!(exit_code = code, %key, "setting the application id failed; continuing");
    }
    Ok(())
}

fn run_command(
    program: &str,
    command: &CompiledCommand,
    context: &ExecutorContext,
) -> Result<ExecutorResult> {
    let args = command.all_args();
    let project_dir = context.project_dir();

    println!("{}", banner(command));
    println!("Running NativeScript CLI within {}", context.project.root);
    println!(" ");
    println!("{}", format_command(program, &args));
    println!(" ");

    let code = run_command_streaming_in_dir(program, &args, &project_dir)?;
    println!("Done.");

    tracing::info!(exit_code = code, project = %context.project_name, "NativeScript CLI finished");
    Ok(ExecutorResult { success: code == 0 })
}

fn banner(command: &CompiledCommand) -> String {
    let rule = "―".repeat(24);
    if command.is_clean() {
        return rule;
    }
    match command.options.platform {
        Some(Platform::Ios) => format!("{} \u{f8ff}", rule),
        _ => format!("{} 🤖", rule),
    }
}
