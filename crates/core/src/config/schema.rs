//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub cli: CliConfig,

    #[serde(default)]
    pub resources: ResourcesConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// External NativeScript CLI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Executable name or path
    #[serde(default = "default_program")]
    pub program: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
        }
    }
}

fn default_program() -> String {
    "ns".to_string()
}

/// Default locations of platform resource files, relative to a project root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcesConfig {
    /// Directory holding `Info.plist` and friends
    #[serde(default = "default_ios_resources")]
    pub ios: String,

    /// Directory holding Android XML manifests
    #[serde(default = "default_android_resources")]
    pub android: String,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            ios: default_ios_resources(),
            android: default_android_resources(),
        }
    }
}

fn default_ios_resources() -> String {
    "App_Resources/iOS".to_string()
}

fn default_android_resources() -> String {
    "App_Resources/Android".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl ResourcesConfig {
    /// Resolve a configured iOS resource file against a project directory
    pub fn ios_path(&self, project_dir: &Path, file: &str) -> PathBuf {
        resolve_resource_path(project_dir, &self.ios, file)
    }

    /// Resolve a configured Android resource file against a project directory
    pub fn android_path(&self, project_dir: &Path, file: &str) -> PathBuf {
        resolve_resource_path(project_dir, &self.android, file)
    }
}

/// Resolve a resource file name.
///
/// Names starting with `.` are relative to the project directory; any other
/// name lives under `resources_dir` inside the project.
pub fn resolve_resource_path(project_dir: &Path, resources_dir: &str, file: &str) -> PathBuf {
    let joined = if file.starts_with('.') {
        project_dir.join(file)
    } else {
        project_dir.join(resources_dir).join(file)
    };
    normalize(&joined)
}

/// Lexically remove `.` and `..` components
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_prefixed_file_is_project_relative() {
        let resources = ResourcesConfig::default();
        let path = resources.ios_path(Path::new("/ws/apps/app"), "./src/Info.plist");
        assert_eq!(path, PathBuf::from("/ws/apps/app/src/Info.plist"));
    }

    #[test]
    fn test_bare_file_lives_in_resources_dir() {
        let resources = ResourcesConfig::default();
        assert_eq!(
            resources.ios_path(Path::new("/ws/apps/app"), "Info.plist"),
            PathBuf::from("/ws/apps/app/App_Resources/iOS/Info.plist")
        );
        assert_eq!(
            resources.android_path(Path::new("/ws/apps/app"), "src/main/res/values/strings.xml"),
            PathBuf::from("/ws/apps/app/App_Resources/Android/src/main/res/values/strings.xml")
        );
    }

    #[test]
    fn test_parent_components_are_resolved() {
        let path = resolve_resource_path(Path::new("/ws/apps/app"), "res", "../shared/Info.plist");
        assert_eq!(path, PathBuf::from("/ws/apps/shared/Info.plist"));
    }
}
