use std::path::PathBuf;

/// Final configuration after merging presets and CLI args.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub directory: PathBuf,
    pub field: String,
    pub types: Vec<String>,
    pub overwrite: bool,
    pub debug: bool,
    pub exiftool: PathBuf,
}

/// A media file discovered during the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub name: String,
    pub extension: String, // Accepted type that matched, lowercased, no dot
}

/// Current value of the configured field, as reported by the metadata tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Empty,
    Populated(String),
}

impl FieldValue {
    /// Interprets `-s3` style output: nothing (or only whitespace) means the
    /// tag is absent or empty.
    pub fn from_tool_output(stdout: &str) -> Self {
        let trimmed = stdout.trim();
        if trimmed.is_empty() {
            FieldValue::Empty
        } else {
            FieldValue::Populated(trimmed.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyDescribed,
    EmptyInput,
    UnreadableInput,
}

/// Terminal state of a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Updated,
    Skipped(SkipReason),
    Errored(String),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub updated: usize,
    pub skipped: usize,
    pub errored: usize,
    pub not_visited: usize,
    pub failures: Vec<(String, String)>, // (file name, reason)
}

impl Summary {
    pub fn record(&mut self, name: &str, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Updated => self.updated += 1,
            FileOutcome::Skipped(reason) => {
                log::debug!("{} skipped ({:?})", name, reason);
                self.skipped += 1;
            }
            FileOutcome::Errored(reason) => {
                self.errored += 1;
                self.failures.push((name.to_string(), reason));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_output_is_empty_field() {
        assert_eq!(FieldValue::from_tool_output(""), FieldValue::Empty);
        assert_eq!(FieldValue::from_tool_output("  \n"), FieldValue::Empty);
    }

    #[test]
    fn any_text_is_populated() {
        let value = FieldValue::from_tool_output("old\n");
        assert_eq!(value, FieldValue::Populated("old".to_string()));
        assert_eq!(
            FieldValue::from_tool_output("(Binary data 12 bytes)"),
            FieldValue::Populated("(Binary data 12 bytes)".to_string())
        );
    }

    #[test]
    fn summary_counts_each_outcome() {
        let mut summary = Summary::default();
        summary.record("a.jpg", FileOutcome::Updated);
        summary.record("b.jpg", FileOutcome::Skipped(SkipReason::EmptyInput));
        summary.record("c.jpg", FileOutcome::Skipped(SkipReason::AlreadyDescribed));
        summary.record("d.jpg", FileOutcome::Errored("boom".into()));
        assert_eq!((summary.updated, summary.skipped, summary.errored), (1, 2, 1));
        assert_eq!(summary.failures, vec![("d.jpg".to_string(), "boom".to_string())]);
    }
}
