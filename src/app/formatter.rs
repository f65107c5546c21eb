use crate::app::models::{ScanConfig, Summary};

pub struct OutputGenerator;

impl OutputGenerator {
    pub fn banner(config: &ScanConfig) -> String {
        let types: Vec<String> = config.types.iter().map(|t| format!(".{}", t)).collect();
        let skip = if config.overwrite {
            "No (will overwrite)"
        } else {
            "Yes"
        };

        let mut out = String::from("--- Preview & Describe ---\n");
        out.push_str(&format!("Folder: {}\n", config.directory.display()));
        out.push_str(&format!("Field: {}\n", config.field));
        out.push_str(&format!("File types: {}\n", types.join(", ")));
        out.push_str(&format!("Skip files with a {}: {}\n", config.field, skip));
        out.push_str("\nPress Enter without typing to skip a file.");
        out
    }

    pub fn summary(summary: &Summary) -> String {
        let mut out = format!(
            "All done! {} updated, {} skipped, {} errored.",
            summary.updated, summary.skipped, summary.errored
        );
        if summary.not_visited > 0 {
            out.push_str(&format!(" {} not visited.", summary.not_visited));
        }
        for (name, reason) in &summary.failures {
            out.push_str(&format!("\n    {}: {}", name, reason));
        }
        out
    }
}
