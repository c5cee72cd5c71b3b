//! Process execution utilities
//!
//! Runs external commands either with captured output or with the
//! child's stdio inherited from the current process.

use crate::error::{Error, Result};
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Result of a command execution
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Whether the command succeeded (exit code 0)
    pub success: bool,
    /// Exit code of the command
    pub exit_code: i32,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

impl CommandResult {
    /// Create from std::process::Output
    pub fn from_output(output: Output) -> Self {
        Self {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// Run a command and capture output
pub fn run_command(program: &str, args: &[&str]) -> Result<CommandResult> {
    let output = Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| spawn_error(program, e))?;

    Ok(CommandResult::from_output(output))
}

/// Check if a command exists in PATH
pub fn command_exists(program: &str) -> bool {
    which::which(program).is_ok()
}

/// Get the path to a command
pub fn which_command(program: &str) -> Option<std::path::PathBuf> {
    which::which(program).ok()
}

/// Executable name for the current platform.
///
/// Node-based CLIs install a `.cmd` shim on Windows.
pub fn platform_program(program: &str) -> String {
    if cfg!(windows) && Path::new(program).extension().is_none() {
        format!("{}.cmd", program)
    } else {
        program.to_string()
    }
}

/// Run a command with inherited stdio in a specific directory.
///
/// Returns the exit code; a child killed by a signal reports `-1`.
pub fn run_command_streaming_in_dir<S: AsRef<str>>(
    program: &str,
    args: &[S],
    dir: &Path,
) -> Result<i32> {
    let status = Command::new(program)
        .args(args.iter().map(|a| AsRef::<str>::as_ref(a)))
        .current_dir(dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| spawn_error(program, e))?;

    Ok(status.code().unwrap_or(-1))
}

fn spawn_error(program: &str, err: std::io::Error) -> Error {
    if err.kind() == std::io::ErrorKind::NotFound {
        Error::command_not_found(program).with_source(err)
    } else {
        Error::process(format!("Failed to execute {}: {}", program, err)).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_command_exists_nonexistent() {
        assert!(!command_exists("nonexistent_command_12345"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_command_echo() {
        let result = run_command("echo", &["hello"]).unwrap();
        assert!(result.success);
        assert!(result.stdout.contains("hello"));
    }

    #[cfg(unix)]
    #[test]
    fn test_streaming_reports_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let code = run_command_streaming_in_dir("sh", &["-c", "exit 3"], dir.path()).unwrap();
        assert_eq!(code, 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_streaming_runs_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        let code =
            run_command_streaming_in_dir("sh", &["-c", "touch marker"], dir.path()).unwrap();
        assert_eq!(code, 0);
        assert!(dir.path().join("marker").exists());
    }

    #[test]
    fn test_missing_program_is_command_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_command_streaming_in_dir::<&str>("nonexistent_command_12345", &[], dir.path())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CommandNotFound);
    }

    #[cfg(not(windows))]
    #[test]
    fn test_platform_program_unchanged_off_windows() {
        assert_eq!(platform_program("ns"), "ns");
    }
}
