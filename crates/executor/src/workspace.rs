//! Nx workspace configuration
//!
//! Reads `workspace.json` (or `angular.json`) and the `project.json` files it
//! points at, and resolves `project:target[:configuration]` selectors into an
//! options bundle plus an [`ExecutorContext`].

use crate::context::ExecutorContext;
use crate::options::BuildOptions;
use indexmap::IndexMap;
use nsnx_core::error::{Error, Result, ResultExt};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Workspace files tried in order
pub const WORKSPACE_FILES: [&str; 2] = ["workspace.json", "angular.json"];

/// Per-project configuration file referenced from the workspace file
pub const PROJECT_FILE: &str = "project.json";

/// A named build target of a project
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetConfig {
    #[serde(default, alias = "builder")]
    pub executor: Option<String>,
    #[serde(default)]
    pub options: Option<JsonValue>,
    #[serde(default)]
    pub configurations: IndexMap<String, JsonValue>,
    #[serde(default)]
    pub default_configuration: Option<String>,
}

impl TargetConfig {
    /// The target's base options
    pub fn base_options(&self) -> Result<BuildOptions> {
        match &self.options {
            Some(value) => BuildOptions::from_json(value),
            None => Ok(BuildOptions::default()),
        }
    }

    /// Options of a named configuration, if the target declares it
    pub fn configuration_options(&self, name: &str) -> Result<Option<BuildOptions>> {
        self.configurations
            .get(name)
            .map(BuildOptions::from_json)
            .transpose()
            .context(format!("configuration \"{}\"", name))
    }
}

/// A project entry of the workspace
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProjectConfig {
    /// Project directory relative to the workspace root
    #[serde(default)]
    pub root: String,
    #[serde(default, alias = "architect")]
    pub targets: IndexMap<String, TargetConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProjectEntry {
    Path(String),
    Inline(ProjectConfig),
}

#[derive(Debug, Deserialize)]
struct RawWorkspace {
    #[serde(default)]
    projects: IndexMap<String, ProjectEntry>,
}

/// All projects of a workspace, with `project.json` references resolved
#[derive(Debug, Clone, Default)]
pub struct WorkspaceConfig {
    /// Directory containing the workspace file
    pub root: PathBuf,
    pub projects: IndexMap<String, ProjectConfig>,
}

impl WorkspaceConfig {
    /// Load the workspace file found in `root`
    pub fn load(root: &Path) -> Result<Self> {
        let path = WORKSPACE_FILES
            .iter()
            .map(|name| root.join(name))
            .find(|p| p.exists())
            .ok_or_else(|| Error::config_not_found(root.join(WORKSPACE_FILES[0])))?;

        let text = std::fs::read_to_string(&path)?;
        Self::from_json_str(root, &text).context(path.display().to_string())
    }

    /// Parse workspace JSON; string project entries are read from disk under `root`
    pub fn from_json_str(root: &Path, text: &str) -> Result<Self> {
        let raw: RawWorkspace = serde_json::from_str(text)?;

        let mut projects = IndexMap::with_capacity(raw.projects.len());
        for (name, entry) in raw.projects {
            let project = match entry {
                ProjectEntry::Inline(project) => project,
                ProjectEntry::Path(dir) => load_project_file(root, &dir)?,
            };
            projects.insert(name, project);
        }

        Ok(Self {
            root: root.to_path_buf(),
            projects,
        })
    }

    /// Get a project by name
    pub fn project(&self, name: &str) -> Result<&ProjectConfig> {
        self.projects
            .get(name)
            .ok_or_else(|| Error::project_not_found(name))
    }

    /// Resolve a selector into the options the executor receives and its context.
    ///
    /// Options are the target's `options` overlaid with the keys of the
    /// selected configuration (or the target's `defaultConfiguration`).
    pub fn resolve(
        &self,
        selector: &TargetSelector,
        argv: Vec<String>,
    ) -> Result<(BuildOptions, ExecutorContext)> {
        let project = self.project(&selector.project)?;
        let target = project
            .targets
            .get(&selector.target)
            .ok_or_else(|| Error::target_not_found(&selector.project, &selector.target))?;

        let configuration = selector
            .configuration
            .clone()
            .or_else(|| target.default_configuration.clone());

        let mut options = target.base_options()?;
        if let Some(name) = &configuration {
            let layer = target
                .configuration_options(name)?
                .ok_or_else(|| Error::configuration_not_found(&selector.target, name))?;
            options = options.overlay(layer);
        }

        let context = ExecutorContext {
            workspace_root: self.root.clone(),
            project_name: selector.project.clone(),
            project: project.clone(),
            target_name: selector.target.clone(),
            configuration_name: configuration,
            argv,
        };
        Ok((options, context))
    }
}

fn load_project_file(root: &Path, dir: &str) -> Result<ProjectConfig> {
    let path = root.join(dir).join(PROJECT_FILE);
    let text = std::fs::read_to_string(&path)
        .map_err(|e| Error::from(e).with_context(format!("Reading {}", path.display())))?;
    let mut project: ProjectConfig =
        serde_json::from_str(&text).map_err(|e| Error::from(e).with_context(path.display().to_string()))?;
    if project.root.is_empty() {
        project.root = dir.to_string();
    }
    Ok(project)
}

/// `project:target[:configuration]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSelector {
    pub project: String,
    pub target: String,
    pub configuration: Option<String>,
}

impl FromStr for TargetSelector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        let invalid = || {
            Error::validation(format!("Invalid target selector: {}", s))
                .with_suggestion("Use <project>:<target> or <project>:<target>:<configuration>")
        };
        if parts.iter().any(|p| p.is_empty()) {
            return Err(invalid());
        }
        match parts.as_slice() {
            [project, target] => Ok(Self {
                project: (*project).to_string(),
                target: (*target).to_string(),
                configuration: None,
            }),
            [project, target, configuration] => Ok(Self {
                project: (*project).to_string(),
                target: (*target).to_string(),
                configuration: Some((*configuration).to_string()),
            }),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for TargetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.project, self.target)?;
        if let Some(configuration) = &self.configuration {
            write!(f, ":{}", configuration)?;
        }
        Ok(())
    }
}
