use crate::app::exiftool::{MetadataTool, ToolError};
use crate::app::models::{FieldValue, FileEntry, FileOutcome, ScanConfig, SkipReason, Summary};
use crate::app::preview::Previewer;
use anyhow::Result;
use std::io::{BufRead, ErrorKind, Write};

enum Step {
    Done(FileOutcome),
    EndOfInput,
}

/// Walks the matched files one at a time: query, preview, prompt, write.
pub struct Annotator<'a, T, P> {
    config: &'a ScanConfig,
    tool: T,
    previewer: P,
}

impl<'a, T: MetadataTool, P: Previewer> Annotator<'a, T, P> {
    pub fn new(config: &'a ScanConfig, tool: T, previewer: P) -> Self {
        Self {
            config,
            tool,
            previewer,
        }
    }

    /// Per-file failures are counted, not returned. Only console I/O errors
    /// abort the loop. End of input stops early and leaves the rest unvisited.
    pub fn run<R: BufRead, W: Write>(
        &self,
        entries: &[FileEntry],
        input: &mut R,
        out: &mut W,
    ) -> Result<Summary> {
        let mut summary = Summary::default();

        for (idx, entry) in entries.iter().enumerate() {
            match self.process(entry, input, out)? {
                Step::Done(outcome) => summary.record(&entry.name, outcome),
                Step::EndOfInput => {
                    writeln!(out, "\nExiting...")?;
                    summary.not_visited = entries.len() - idx;
                    break;
                }
            }
        }

        Ok(summary)
    }

    fn process<R: BufRead, W: Write>(
        &self,
        entry: &FileEntry,
        input: &mut R,
        out: &mut W,
    ) -> Result<Step> {
        let field = &self.config.field;

        let existing = match self.tool.read_field(&entry.path, field) {
            Ok(value) => value,
            Err(err) => return Ok(Step::Done(self.errored(entry, "read", err))),
        };
        log::debug!(
            "{} [{}] existing {}: {:?}",
            entry.name,
            entry.extension,
            field,
            existing
        );

        if let FieldValue::Populated(value) = &existing {
            if !self.config.overwrite {
                writeln!(out, "\n{} already has a {}, skipping.", entry.name, field)?;
                writeln!(out, "    Existing {}: {}", field, value)?;
                return Ok(Step::Done(FileOutcome::Skipped(
                    SkipReason::AlreadyDescribed,
                )));
            }
        }

        writeln!(out, "\nOpening: {}", entry.name)?;
        if let Err(err) = self.previewer.preview(&entry.path) {
            log::warn!("Could not open {} for preview: {}", entry.name, err);
        }
        if let FieldValue::Populated(value) = &existing {
            writeln!(out, "    Current {}: {}", field, value)?;
        }

        write!(out, "Enter {} (leave empty to skip): ", field)?;
        out.flush()?;

        // An undecodable line is consumed, so only that file is affected
        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => return Ok(Step::EndOfInput),
            Ok(_) => {}
            Err(err) if err.kind() == ErrorKind::InvalidData => {
                log::warn!("Input for {} is not valid UTF-8: {}", entry.name, err);
                writeln!(out, "Skipped.")?;
                return Ok(Step::Done(FileOutcome::Skipped(
                    SkipReason::UnreadableInput,
                )));
            }
            Err(err) => {
                log::warn!("Failed to read input: {}", err);
                return Ok(Step::EndOfInput);
            }
        }

        let text = line.trim();
        if text.is_empty() {
            writeln!(out, "Skipped.")?;
            return Ok(Step::Done(FileOutcome::Skipped(SkipReason::EmptyInput)));
        }

        match self.tool.write_field(&entry.path, field, text) {
            Ok(()) => {
                writeln!(out, "Updated {} for {}.", field, entry.name)?;
                Ok(Step::Done(FileOutcome::Updated))
            }
            Err(err) => Ok(Step::Done(self.errored(entry, "update", err))),
        }
    }

    fn errored(&self, entry: &FileEntry, action: &str, err: ToolError) -> FileOutcome {
        if self.config.debug {
            log::error!("Error trying to {} {}: {:?}", action, entry.path.display(), err);
        } else {
            log::error!("Error trying to {} {}: {}", action, entry.path.display(), err);
        }
        FileOutcome::Errored(err.to_string())
    }
}
