//! Options-to-command-line compiler
//!
//! Merges the configuration layers of an invocation into one options bundle
//! and turns it into the argument list of the NativeScript CLI:
//!
//! ```text
//! ns <clean|build|prepare|run|debug> [platform] [flags...] [extra...]
//! ```

use crate::context::{ExecutorContext, BUILD};
use crate::options::{enabled, non_empty, BuildOptions, FileReplacement};
use nsnx_core::error::{Error, Result, ResultExt};

/// Arguments for one NativeScript CLI invocation
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledCommand {
    /// Action, platform and option-derived flags, in fixed order
    pub args: Vec<String>,
    /// Persisted `flags` followed by passthrough arguments
    pub extra_args: Vec<String>,
    /// The merged options the arguments were derived from
    pub options: BuildOptions,
}

impl CompiledCommand {
    /// Every argument, in the order passed to the CLI
    pub fn all_args(&self) -> Vec<String> {
        self.args
            .iter()
            .chain(self.extra_args.iter())
            .cloned()
            .collect()
    }

    /// Whether this is a `clean` invocation
    pub fn is_clean(&self) -> bool {
        self.args.first().map(String::as_str) == Some("clean")
    }
}

/// Merge build overrides into the invocation options.
///
/// For build invocations the project's `build` target options are layered
/// on, then the current target's `build` configuration. Later layers win.
pub fn merge_options(options: BuildOptions, context: &ExecutorContext) -> Result<BuildOptions> {
    if !context.is_build() {
        return Ok(options);
    }

    let mut merged = options;
    if let Some(build_target) = context.project.targets.get(BUILD) {
        if build_target.options.is_some() {
            tracing::debug!("merging options of the build target");
            merged = merged.overlay(build_target.base_options().context("build target options")?);
        }
    }
    if let Some(target) = context.target() {
        if let Some(layer) = target.configuration_options(BUILD)? {
            tracing::debug!(target = %context.target_name, "merging build configuration");
            merged = merged.overlay(layer);
        }
    }
    Ok(merged)
}

/// File replacements of the active configuration plus any borrowed through
/// `combineWithConfig`, rewritten relative to the project root.
pub fn collect_file_replacements(context: &ExecutorContext) -> Result<Vec<String>> {
    let Some(configuration) = context.target_configuration_name() else {
        return Ok(Vec::new());
    };
    let Some(target) = context.target() else {
        return Ok(Vec::new());
    };
    let Some(config_options) = target.configuration_options(configuration)? else {
        return Ok(Vec::new());
    };

    let root = context.project.root.as_str();
    let mut replacements: Vec<String> = config_options
        .file_replacements
        .iter()
        .flatten()
        .map(|r| rewrite_replacement(r, root))
        .collect();

    if let Some(combine) = non_empty(&config_options.combine_with_config) {
        let borrowed = combined_replacements(context, combine)
            .context(format!("combineWithConfig \"{}\"", combine))?;
        replacements.extend(borrowed.iter().map(|r| rewrite_replacement(r, root)));
    }

    Ok(replacements)
}

fn combined_replacements(context: &ExecutorContext, combine: &str) -> Result<Vec<FileReplacement>> {
    let mut parts = combine.splitn(2, ':');
    let target_name = parts.next().unwrap_or_default();
    let target = context
        .project
        .targets
        .get(target_name)
        .ok_or_else(|| Error::target_not_found(&context.project_name, target_name))?;

    let Some(configuration) = parts.next().filter(|c| !c.is_empty()) else {
        tracing::debug!(target = %target_name, "combineWithConfig names no configuration");
        return Ok(Vec::new());
    };

    let options = target
        .configuration_options(configuration)?
        .ok_or_else(|| Error::configuration_not_found(target_name, configuration))?;
    Ok(options.file_replacements.unwrap_or_default())
}

/// `replace:with`, each with the first occurrence of the project root swapped for `./`
pub fn rewrite_replacement(replacement: &FileReplacement, project_root: &str) -> String {
    format!(
        "{}:{}",
        replacement.replace.replacen(project_root, "./", 1),
        replacement.with.replacen(project_root, "./", 1)
    )
}

/// Compile the options of an invocation into CLI arguments
pub fn compile(options: BuildOptions, context: &ExecutorContext) -> Result<CompiledCommand> {
    let is_build = context.is_build();
    let options = merge_options(options, context)?;

    if enabled(options.clean) {
        return Ok(CompiledCommand {
            args: vec!["clean".to_string()],
            extra_args: Vec::new(),
            options,
        });
    }

    let replacements = collect_file_replacements(context)?;

    let action = if is_build {
        "build"
    } else if enabled(options.prepare) {
        "prepare"
    } else if options.debug == Some(false) {
        "run"
    } else {
        "debug"
    };

    let mut args = vec![action.to_string()];
    if let Some(platform) = options.platform {
        args.push(platform.to_string());
    }
    if let Some(device) = non_empty(&options.device) {
        if !enabled(options.emulator) {
            args.push(format!("--device={}", device));
        }
    }

    let switches = [
        (options.emulator, "--emulator"),
        (options.no_hmr, "--no-hmr"),
        (options.uglify, "--env.uglify"),
        (options.verbose, "--env.verbose"),
        (options.production, "--env.production"),
        (options.for_device, "--for-device"),
        (options.release, "--release"),
        (options.aab, "--aab"),
    ];
    args.extend(
        switches
            .iter()
            .filter(|(flag, _)| enabled(*flag))
            .map(|(_, token)| (*token).to_string()),
    );

    let valued = [
        (&options.key_store_path, "--key-store-path"),
        (&options.key_store_password, "--key-store-password"),
        (&options.key_store_alias, "--key-store-alias"),
        (&options.key_store_alias_password, "--key-store-alias-password"),
        (&options.provision, "--provision"),
        (&options.copy_to, "--copy-to"),
    ];
    for (value, flag) in valued {
        if let Some(value) = non_empty(value) {
            args.push(format!("{}={}", flag, value));
        }
    }

    if !replacements.is_empty() {
        args.push(format!("--env.replace={}", replacements.join(",")));
    }
    if options.force != Some(false) {
        args.push("--force".to_string());
    }

    let mut extra_args: Vec<String> = non_empty(&options.flags)
        .map(|flags| {
            flags
                .split(' ')
                .filter(|f| !f.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();
    for arg in context.trailing_args() {
        if !args.contains(arg) && !extra_args.contains(arg) {
            extra_args.push(arg.clone());
        }
    }

    tracing::debug!(?args, ?extra_args, "compiled NativeScript arguments");
    Ok(CompiledCommand {
        args,
        extra_args,
        options,
    })
}
