use crate::app::models::FileEntry;
use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use pathdiff::diff_paths;
use std::path::{Path, PathBuf};

pub struct Scanner {
    root: PathBuf,
    types: Vec<String>,
    type_set: GlobSet,
}

impl Scanner {
    pub fn new(root: PathBuf, types: &[String]) -> Result<Self> {
        Ok(Self {
            root,
            types: types.to_vec(),
            type_set: build_globset(types)?,
        })
    }

    /// Lists the files directly inside the root whose extension is accepted,
    /// sorted by name.
    pub fn scan(&self) -> Result<Vec<FileEntry>> {
        let mut entries = Vec::new();

        // Non-recursive, and no hidden/gitignore filtering: every file in the folder counts
        let walker = WalkBuilder::new(&self.root)
            .max_depth(Some(1))
            .standard_filters(false)
            .build();

        for result in walker {
            match result {
                Ok(entry) => {
                    if entry.depth() == 0 {
                        continue;
                    }
                    log::debug!("Listed {}", entry.path().display());
                    if let Some(processed) = self.process_entry(entry.path()) {
                        entries.push(processed);
                    }
                }
                // Depth 0 is the folder itself: unreadable means nothing to do
                Err(err) if err.depth().unwrap_or(0) == 0 => {
                    return Err(err).context(format!(
                        "Error reading directory '{}'",
                        self.root.display()
                    ));
                }
                Err(err) => log::warn!("Error listing entry: {}", err),
            }
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        log::debug!(
            "Matched files: {:?}",
            entries.iter().map(|e| e.name.as_str()).collect::<Vec<_>>()
        );
        Ok(entries)
    }

    fn process_entry(&self, path: &Path) -> Option<FileEntry> {
        if !path.is_file() {
            return None;
        }

        let file_name = Path::new(path.file_name()?);
        let extension = self
            .type_set
            .matches(file_name)
            .into_iter()
            .map(|idx| &self.types[idx])
            .max_by_key(|t| t.len())?;

        let relative = diff_paths(path, &self.root)?;

        Some(FileEntry {
            path: path.to_path_buf(),
            name: relative.to_string_lossy().to_string(),
            extension: extension.clone(),
        })
    }
}

/// One case-insensitive `*.<type>` glob per accepted type, in the same order.
fn build_globset(types: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for ext in types {
        let pattern = format!("*.{}", globset::escape(ext));
        let glob = GlobBuilder::new(&pattern)
            .case_insensitive(true)
            .literal_separator(true)
            .build()
            .context(format!("Invalid file type: {}", ext))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
