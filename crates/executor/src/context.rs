//! Execution context handed to the executor

use crate::workspace::{ProjectConfig, TargetConfig};
use std::path::PathBuf;

/// Name of the target and configuration that mark a build invocation
pub const BUILD: &str = "build";

/// Everything the executor knows about the invocation besides its options.
///
/// The invocation arguments are carried explicitly; the executor never reads
/// the live process arguments.
#[derive(Debug, Clone, Default)]
pub struct ExecutorContext {
    /// Workspace root directory
    pub workspace_root: PathBuf,
    pub project_name: String,
    pub project: ProjectConfig,
    pub target_name: String,
    /// Active configuration, if any
    pub configuration_name: Option<String>,
    /// Selector token as invoked, followed by the passthrough arguments
    pub argv: Vec<String>,
}

impl ExecutorContext {
    /// Directory the NativeScript CLI runs in
    pub fn project_dir(&self) -> PathBuf {
        self.workspace_root.join(&self.project.root)
    }

    /// Configuration of the target being executed
    pub fn target(&self) -> Option<&TargetConfig> {
        self.project.targets.get(&self.target_name)
    }

    /// Active configuration name, ignoring the reserved `build` configuration
    pub fn target_configuration_name(&self) -> Option<&str> {
        self.configuration_name
            .as_deref()
            .filter(|name| !name.is_empty() && *name != BUILD)
    }

    /// The `project:target[:configuration]` token that precedes passthrough args
    pub fn selector_token(&self) -> String {
        match self.target_configuration_name() {
            Some(configuration) => {
                format!("{}:{}:{}", self.project_name, self.target_name, configuration)
            }
            None => format!("{}:{}", self.project_name, self.target_name),
        }
    }

    /// Whether this invocation builds rather than runs.
    ///
    /// True when the selector ends in `:build`, i.e. the executed target or
    /// the selected configuration is named `build`. Argument values never
    /// count, so `--workspace build` or a passthrough `build` is still a run.
    pub fn is_build(&self) -> bool {
        self.target_name == BUILD || self.configuration_name.as_deref() == Some(BUILD)
    }

    /// Arguments after the selector token, in their original order.
    ///
    /// The selector may be spelled with any configuration, including
    /// `build`, or without one when it came from `defaultConfiguration`.
    pub fn trailing_args(&self) -> &[String] {
        let bare = format!("{}:{}", self.project_name, self.target_name);
        let full = self
            .configuration_name
            .as_deref()
            .map(|configuration| format!("{}:{}", bare, configuration));
        let index = self
            .argv
            .iter()
            .position(|a| *a == bare || full.as_deref() == Some(a.as_str()));
        match index {
            Some(index) => &self.argv[index + 1..],
            None => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(configuration: Option<&str>, argv: &[&str]) -> ExecutorContext {
        ExecutorContext {
            workspace_root: PathBuf::from("/ws"),
            project_name: "mobile".to_string(),
            target_name: "ios".to_string(),
            configuration_name: configuration.map(String::from),
            argv: argv.iter().map(|a| (*a).to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_selector_token_skips_build_configuration() {
        assert_eq!(context(None, &[]).selector_token(), "mobile:ios");
        assert_eq!(context(Some("prod"), &[]).selector_token(), "mobile:ios:prod");
        assert_eq!(context(Some("build"), &[]).selector_token(), "mobile:ios");
    }

    #[test]
    fn test_trailing_args_after_selector() {
        let ctx = context(Some("prod"), &["mobile:ios:prod", "--env.foo", "--log"]);
        assert_eq!(ctx.trailing_args(), ["--env.foo", "--log"]);
    }

    #[test]
    fn test_trailing_args_after_bare_selector() {
        let ctx = context(Some("dev"), &["mobile:ios", "--clean"]);
        assert_eq!(ctx.trailing_args(), ["--clean"]);
    }

    #[test]
    fn test_trailing_args_after_build_configuration_selector() {
        let ctx = context(Some("build"), &["mobile:ios:build", "--log", "trace"]);
        assert_eq!(ctx.trailing_args(), ["--log", "trace"]);
    }

    #[test]
    fn test_no_trailing_args_without_selector() {
        let ctx = context(None, &["other:ios", "--env.foo"]);
        assert!(ctx.trailing_args().is_empty());
    }

    #[test]
    fn test_is_build() {
        assert!(!context(None, &["mobile:ios"]).is_build());
        assert!(context(Some("build"), &["mobile:ios:build"]).is_build());

        let mut ctx = context(None, &["mobile:build"]);
        ctx.target_name = "build".to_string();
        assert!(ctx.is_build());
    }

    #[test]
    fn test_argument_values_named_build_do_not_build() {
        assert!(!context(None, &["mobile:ios", "build"]).is_build());
        assert!(!context(None, &["mobile:ios", "--config", "build"]).is_build());
        assert!(!context(Some("prod"), &["mobile:ios:prod", "app:build"]).is_build());
    }
}
