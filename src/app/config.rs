use crate::app::cli::Cli;
use crate::app::models::ScanConfig;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_FIELD: &str = "Description";
pub const DEFAULT_TYPES: &[&str] = &["jpg", "jpeg", "png", "mp4", "mov", "avi"];
pub const DEFAULT_EXIFTOOL: &str = "exiftool";

#[derive(Deserialize, Debug)]
struct PresetsFile {
    #[serde(flatten)]
    presets: HashMap<String, PresetConfig>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PresetConfig {
    pub field: Option<String>,
    pub types: Option<Vec<String>>,
    pub overwrite: Option<bool>,
    pub exiftool: Option<PathBuf>,
}

fn presets_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home
        .join(".config")
        .join("preview_describe")
        .join("presets.toml"))
}

fn parse_presets(content: &str) -> Result<HashMap<String, PresetConfig>> {
    let parsed: PresetsFile = toml::from_str(content).context("Failed to parse presets.toml")?;
    Ok(parsed.presets)
}

fn load_presets_file() -> Result<HashMap<String, PresetConfig>> {
    let config_path = presets_path()?;

    if !config_path.exists() {
        return Ok(HashMap::new());
    }

    let content = fs::read_to_string(&config_path)
        .context(format!("Failed to read config at {:?}", config_path))?;

    parse_presets(&content)
}

/// Lowercases, strips dots and blanks, deduplicates keeping order.
pub fn normalize_types<S: AsRef<str>>(raw: &[S]) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let types: Vec<String> = raw
        .iter()
        .map(|t| t.as_ref().trim().trim_start_matches('.').to_lowercase())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect();

    if types.is_empty() {
        bail!("No file types given; --types needs at least one extension");
    }
    Ok(types)
}

/// Field names end up as `-<field>` arguments, so only tag-name characters pass.
pub fn validate_field(field: &str) -> Result<String> {
    let field = field.trim();
    if field.is_empty() {
        bail!("Metadata field name must not be empty");
    }
    if let Some(bad) = field
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, ':' | '-' | '_')))
    {
        bail!("Invalid character {:?} in metadata field name '{}'", bad, field);
    }
    Ok(field.to_string())
}

pub fn resolve_directory(dir: Option<&Path>) -> Result<PathBuf> {
    let dir = match dir {
        Some(d) => d.to_path_buf(),
        None => env::current_dir().context("Failed to get current directory")?,
    };

    let canonical =
        fs::canonicalize(&dir).context(format!("Directory '{}' not found", dir.display()))?;
    if !canonical.is_dir() {
        bail!("'{}' is not a directory", dir.display());
    }
    Ok(canonical)
}

/// Merges CLI args over a preset over the built-in defaults.
pub fn build_config(cli: Cli, directory: PathBuf, preset: PresetConfig) -> Result<ScanConfig> {
    let overwrite_choice = cli.overwrite_choice();
    let field = cli
        .field
        .or(preset.field)
        .unwrap_or_else(|| DEFAULT_FIELD.to_string());

    let types = match cli.types.or(preset.types) {
        Some(t) => normalize_types(t.as_slice())?,
        None => normalize_types(DEFAULT_TYPES)?,
    };

    Ok(ScanConfig {
        directory,
        field: validate_field(&field)?,
        types,
        overwrite: overwrite_choice
            .or(preset.overwrite)
            .unwrap_or(false),
        debug: cli.debug,
        exiftool: cli
            .exiftool
            .or(preset.exiftool)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXIFTOOL)),
    })
}

pub fn resolve_config(cli: Cli) -> Result<ScanConfig> {
    let directory = resolve_directory(cli.directory.as_deref())?;

    // Presets only apply when asked for by name
    let preset = match &cli.preset {
        Some(name) => {
            let presets = load_presets_file()?;
            let preset = presets
                .get(name)
                .cloned()
                .context(format!("Preset '{}' not found in presets.toml", name))?;
            log::debug!("Using preset '{}': {:?}", name, preset);
            preset
        }
        None => PresetConfig::default(),
    };

    build_config(cli, directory, preset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["preview_describe"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_apply_without_preset() {
        let config = build_config(cli(&[]), PathBuf::from("/photos"), PresetConfig::default())
            .unwrap();
        assert_eq!(config.field, "Description");
        assert_eq!(config.types, vec!["jpg", "jpeg", "png", "mp4", "mov", "avi"]);
        assert!(!config.overwrite);
        assert_eq!(config.exiftool, PathBuf::from("exiftool"));
    }

    #[test]
    fn cli_wins_over_preset() {
        let preset = PresetConfig {
            field: Some("Title".into()),
            types: Some(vec!["heic".into()]),
            overwrite: Some(true),
            exiftool: Some(PathBuf::from("/opt/bin/exiftool")),
        };
        let config = build_config(
            cli(&["--field", "Comment", "--types", "jpg"]),
            PathBuf::from("/photos"),
            preset,
        )
        .unwrap();
        assert_eq!(config.field, "Comment");
        assert_eq!(config.types, vec!["jpg"]);
        assert!(config.overwrite);
        assert_eq!(config.exiftool, PathBuf::from("/opt/bin/exiftool"));
    }

    #[test]
    fn preset_overwrite_yields_to_cli() {
        let preset = PresetConfig {
            overwrite: Some(true),
            ..PresetConfig::default()
        };
        let from_preset =
            build_config(cli(&["/media/videos"]), PathBuf::from("/media/videos"), preset.clone())
                .unwrap();
        assert!(from_preset.overwrite);

        let forced_off = build_config(
            cli(&["/media/videos", "--no-overwrite"]),
            PathBuf::from("/media/videos"),
            preset,
        )
        .unwrap();
        assert!(!forced_off.overwrite);
    }

    #[test]
    fn folder_name_does_not_select_a_preset() {
        let tmp = tempfile::tempdir().unwrap();
        let videos = tmp.path().join("videos");
        fs::create_dir(&videos).unwrap();

        let config = resolve_config(cli(&[videos.to_str().unwrap()])).unwrap();
        assert!(!config.overwrite);
        assert_eq!(config.field, "Description");
        assert_eq!(config.exiftool, PathBuf::from("exiftool"));
    }

    #[test]
    fn types_are_normalized() {
        let types = normalize_types(&[" JPG", ".png", "", "jpg", "Mov "]).unwrap();
        assert_eq!(types, vec!["jpg", "png", "mov"]);
    }

    #[test]
    fn empty_type_set_is_rejected() {
        assert!(normalize_types(&["", " ", "."]).is_err());
        assert!(build_config(cli(&["--types", ","]), PathBuf::from("/p"), PresetConfig::default())
            .is_err());
    }

    #[test]
    fn field_names_are_checked() {
        assert_eq!(validate_field("XMP:Description").unwrap(), "XMP:Description");
        assert!(validate_field("").is_err());
        assert!(validate_field("Title=x").is_err());
        assert!(validate_field("Title -all").is_err());
    }

    #[test]
    fn presets_parse_from_toml() {
        let presets = parse_presets(
            r#"
            [holiday]
            field = "Title"
            types = ["jpg", "heic"]

            [videos]
            overwrite = true
            "#,
        )
        .unwrap();
        assert_eq!(presets["holiday"].field.as_deref(), Some("Title"));
        assert_eq!(presets["videos"].overwrite, Some(true));
        assert!(presets["videos"].types.is_none());
    }

    #[test]
    fn missing_directory_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope");
        assert!(resolve_directory(Some(&missing)).is_err());
    }

    #[test]
    fn file_is_not_a_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("a.jpg");
        fs::write(&file, b"x").unwrap();
        let err = resolve_directory(Some(&file)).unwrap_err();
        assert!(err.to_string().contains("is not a directory"));
    }

    #[test]
    fn directory_is_made_absolute() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = resolve_directory(Some(tmp.path())).unwrap();
        assert!(dir.is_absolute());
    }
}
