use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Preview images/videos and write a description into their metadata via exiftool"
)]
pub struct Cli {
    /// Folder containing the files (default: current directory)
    pub directory: Option<PathBuf>,

    /// Metadata field to update (Description, Title, Comment, XPComment, ...)
    #[arg(long)]
    pub field: Option<String>,

    /// Comma-separated list of file extensions, without dots
    #[arg(long, value_delimiter = ',')]
    pub types: Option<Vec<String>>,

    /// Edit even if the file already has a value in the field
    #[arg(long, overrides_with = "no_overwrite")]
    pub overwrite: bool,

    /// Skip files that already have a value, even if the preset says otherwise
    #[arg(long, overrides_with = "overwrite")]
    pub no_overwrite: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Use a named preset from presets.toml
    #[arg(long)]
    pub preset: Option<String>,

    /// Path to the exiftool executable
    #[arg(long)]
    pub exiftool: Option<PathBuf>,
}

impl Cli {
    /// `None` when neither `--overwrite` nor `--no-overwrite` was given.
    pub fn overwrite_choice(&self) -> Option<bool> {
        match (self.overwrite, self.no_overwrite) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
