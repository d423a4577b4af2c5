use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ToolError;

const VALIDATOR_TIMEOUT: Duration = Duration::from_secs(15);
const VALIDATOR_OUTPUT_CAP: usize = 64 * 1024;

#[derive(Debug, Clone, Deserialize)]
struct FileTypeRow {
    extension: String,
    #[allow(dead_code)]
    r#type: String,
    #[allow(dead_code)]
    description: String,
    #[allow(dead_code)]
    mime_type: String,
    validation_command: String,
}

/// The extension-to-validator mapping loaded from the CSV sibling to the
/// TSR's declarations. `none` (case-insensitive) disables validation for an
/// extension.
#[derive(Debug, Clone, Default)]
pub struct ValidatorTable {
    commands: HashMap<String, String>,
}

impl ValidatorTable {
    pub fn load(csv_path: &Path) -> std::io::Result<Self> {
        let mut reader = csv::Reader::from_path(csv_path)?;
        let mut commands = HashMap::new();
        for record in reader.deserialize() {
            let row: FileTypeRow = record?;
            let extension = row.extension.trim_start_matches('.').to_lowercase();
            commands.insert(extension, row.validation_command);
        }
        Ok(ValidatorTable { commands })
    }

    pub fn empty() -> Self {
        ValidatorTable::default()
    }

    /// The validator table shipped with this crate, embedded at compile time
    /// so the binary works standalone without a runtime-resolved sibling
    /// file. `--validators-csv` can still override it with a caller-supplied
    /// table.
    pub fn embedded() -> std::io::Result<Self> {
        const DEFAULT_CSV: &str = include_str!("../resources/file_types.csv");
        let mut reader = csv::Reader::from_reader(DEFAULT_CSV.as_bytes());
        let mut commands = HashMap::new();
        for record in reader.deserialize() {
            let row: FileTypeRow = record.map_err(std::io::Error::other)?;
            let extension = row.extension.trim_start_matches('.').to_lowercase();
            commands.insert(extension, row.validation_command);
        }
        Ok(ValidatorTable { commands })
    }

    #[cfg(test)]
    pub fn insert_for_test(&mut self, extension: &str, command: &str) {
        self.commands.insert(extension.to_string(), command.to_string());
    }

    fn command_for(&self, extension: &str) -> Option<&str> {
        match self.commands.get(&extension.to_lowercase()) {
            Some(command) if command.trim().eq_ignore_ascii_case("none") => None,
            Some(command) => Some(command.as_str()),
            None => None,
        }
    }

    /// Runs the validator configured for `extension` against `temp_path`, if
    /// any is configured. `Ok(())` means either "no validator configured" or
    /// "the validator exited zero".
    pub async fn validate(&self, extension: &str, temp_path: &Path) -> Result<(), ToolError> {
        let Some(template) = self.command_for(extension) else {
            return Ok(());
        };

        let quoted_path = format!("\"{}\"", temp_path.display());
        let command_line = template.replace("<file>", &quoted_path);

        let mut command = build_shell_command(&command_line);
        command.stdout(std::process::Stdio::piped());
        command.stderr(std::process::Stdio::piped());
        command.stdin(std::process::Stdio::null());

        let mut child = command.spawn().map_err(|e| ToolError::Validation {
            path: temp_path.display().to_string(),
            reason: format!("failed to launch validator: {e}"),
        })?;

        let output = match tokio::time::timeout(VALIDATOR_TIMEOUT, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| ToolError::Validation {
                path: temp_path.display().to_string(),
                reason: format!("failed to run validator: {e}"),
            })?,
            Err(_) => {
                return Err(ToolError::Timeout(format!(
                    "validator for extension '{extension}' exceeded {}s",
                    VALIDATOR_TIMEOUT.as_secs()
                )));
            }
        };

        if output.status.success() {
            Ok(())
        } else {
            let mut combined = output.stdout;
            combined.extend_from_slice(&output.stderr);
            combined.truncate(VALIDATOR_OUTPUT_CAP);
            Err(ToolError::Validation {
                path: temp_path.display().to_string(),
                reason: String::from_utf8_lossy(&combined).trim().to_string(),
            })
        }
    }
}

#[cfg(unix)]
fn build_shell_command(command_line: &str) -> tokio::process::Command {
    let mut command = tokio::process::Command::new("/bin/sh");
    command.arg("-c").arg(command_line);
    command
}

#[cfg(not(unix))]
fn build_shell_command(command_line: &str) -> tokio::process::Command {
    let mut command = tokio::process::Command::new("cmd");
    command.arg("/C").arg(command_line);
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_configured_validator_passes() {
        let table = ValidatorTable::empty();
        assert!(table.validate("py", Path::new("/tmp/whatever.py")).await.is_ok());
    }

    #[tokio::test]
    async fn failing_validator_reports_validation_error() {
        let mut table = ValidatorTable::empty();
        table
            .commands
            .insert("py".to_string(), "exit 1".to_string());
        let err = table.validate("py", Path::new("/tmp/bad.py")).await.unwrap_err();
        assert!(matches!(err, ToolError::Validation { .. }));
    }

    #[tokio::test]
    async fn none_disables_validation() {
        let mut table = ValidatorTable::empty();
        table.commands.insert("txt".to_string(), "none".to_string());
        assert!(table.validate("txt", Path::new("/tmp/x.txt")).await.is_ok());
    }
}
