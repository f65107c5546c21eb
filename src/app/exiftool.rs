use crate::app::models::FieldValue;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error(
        "'{}' not found on this system (install exiftool, e.g. 'brew install exiftool')",
        .0.display()
    )]
    NotFound(PathBuf),
    #[error("Failed to run '{}': {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("exiftool exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("exiftool wrote nothing: {0}")]
    NothingWritten(String),
}

/// Reads and writes a single named metadata field of a file.
pub trait MetadataTool {
    fn read_field(&self, path: &Path, field: &str) -> Result<FieldValue, ToolError>;
    fn write_field(&self, path: &Path, field: &str, value: &str) -> Result<(), ToolError>;
}

impl<T: MetadataTool + ?Sized> MetadataTool for &T {
    fn read_field(&self, path: &Path, field: &str) -> Result<FieldValue, ToolError> {
        (**self).read_field(path, field)
    }

    fn write_field(&self, path: &Path, field: &str, value: &str) -> Result<(), ToolError> {
        (**self).write_field(path, field, value)
    }
}

#[derive(Debug, Clone)]
pub struct ExifTool {
    program: PathBuf,
}

impl ExifTool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Runs `exiftool -ver`, returning the reported version.
    pub fn check_available(&self) -> Result<String, ToolError> {
        let output = self.run(&[OsStr::new("-ver")])?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn run(&self, args: &[&OsStr]) -> Result<Output, ToolError> {
        log::debug!(
            "Running: {} {}",
            self.program.display(),
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => ToolError::NotFound(self.program.clone()),
                _ => ToolError::Spawn {
                    program: self.program.clone(),
                    source,
                },
            })?;

        if !output.status.success() {
            return Err(ToolError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }
}

impl MetadataTool for ExifTool {
    fn read_field(&self, path: &Path, field: &str) -> Result<FieldValue, ToolError> {
        let tag = format!("-{}", field);
        let output = self.run(&[OsStr::new("-s3"), OsStr::new(&tag), path.as_os_str()])?;
        Ok(FieldValue::from_tool_output(&String::from_utf8_lossy(
            &output.stdout,
        )))
    }

    fn write_field(&self, path: &Path, field: &str, value: &str) -> Result<(), ToolError> {
        let assignment = format!("-{}={}", field, value);
        let output = self.run(&[
            OsStr::new("-overwrite_original"),
            OsStr::new(&assignment),
            path.as_os_str(),
        ])?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if updated_count(&stdout) == Some(0) {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = if stderr.trim().is_empty() {
                stdout.trim()
            } else {
                stderr.trim()
            };
            return Err(ToolError::NothingWritten(reason.to_string()));
        }
        Ok(())
    }
}

/// Parses exiftool's "    N image files updated" summary line.
fn updated_count(stdout: &str) -> Option<usize> {
    stdout.lines().find_map(|line| {
        let (count, rest) = line.trim().split_once(' ')?;
        if rest.trim() == "image files updated" {
            count.parse().ok()
        } else {
            None
        }
    })
}
