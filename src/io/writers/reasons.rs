use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::json;
use tracing::info;

use crate::error::Result;
use crate::ocr::batch::ReasonReport;
use crate::types::ReasonMode;

pub const UNIQUE_REASONS_TITLE: &str = "UNIQUE DECISION REASONS FROM DECISION IMAGES";
pub const REASONS_BY_FILE_TITLE: &str = "DECISION REASONS BY FILE";
const RULE_WIDTH: usize = 80;

fn create(output: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(BufWriter::new(File::create(output)?))
}

fn write_header<W: Write>(writer: &mut W, title: &str) -> std::io::Result<()> {
    writeln!(writer, "{}", title)?;
    writeln!(writer, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(writer)
}

/// One reason per line. Decision-mode reports start with a title and rule.
pub fn write_unique_reasons(output: &Path, report: &ReasonReport) -> Result<()> {
    let mut writer = create(output)?;
    if report.mode == ReasonMode::Decision {
        write_header(&mut writer, UNIQUE_REASONS_TITLE)?;
    }
    for reason in &report.unique {
        writeln!(writer, "{}", reason)?;
    }
    writer.flush()?;
    info!("Saved {} reason(s) to {:?}", report.unique.len(), output);
    Ok(())
}

/// Per-file listing, files in name order, each item on a `  - ` line.
pub fn write_reasons_by_file(output: &Path, report: &ReasonReport) -> Result<()> {
    let mut writer = create(output)?;
    write_header(&mut writer, REASONS_BY_FILE_TITLE)?;
    for (file, reasons) in &report.by_file {
        writeln!(writer, "{}:", file)?;
        for item in reasons.items() {
            writeln!(writer, "  - {}", item)?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    info!("Saved per-file mapping to {:?}", output);
    Ok(())
}

/// Pretty JSON sidecar of the whole report.
pub fn write_report_json(output: &Path, report: &ReasonReport) -> Result<()> {
    let document = json!({
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "report": report,
    });
    let json_string = serde_json::to_string_pretty(&document)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, json_string)?;
    info!("Created reason report sidecar: {:?}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::batch::FileReasons;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn report(mode: ReasonMode) -> ReasonReport {
        let mut by_file = BTreeMap::new();
        by_file.insert(
            "b.png".to_string(),
            FileReasons::Fallback("(no text extracted)".to_string()),
        );
        by_file.insert(
            "a.png".to_string(),
            FileReasons::Reasons(vec!["First reason here".into(), "Second reason here".into()]),
        );
        ReasonReport {
            mode,
            source_dir: PathBuf::from("decisions"),
            by_file,
            unique: vec!["First reason here".into(), "Second reason here".into()],
            errors: 0,
        }
    }

    #[test]
    fn decision_unique_file_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/reasons.txt");
        write_unique_reasons(&path, &report(ReasonMode::Decision)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let expected = format!(
            "{}\n{}\n\nFirst reason here\nSecond reason here\n",
            UNIQUE_REASONS_TITLE,
            "=".repeat(80)
        );
        assert_eq!(content, expected);
    }

    #[test]
    fn lines_unique_file_is_bare() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("all.txt");
        write_unique_reasons(&path, &report(ReasonMode::Lines)).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "First reason here\nSecond reason here\n"
        );
    }

    #[test]
    fn by_file_is_sorted_with_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("by-file.txt");
        write_reasons_by_file(&path, &report(ReasonMode::Decision)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let body = content.split_once("\n\n").unwrap().1;
        assert_eq!(
            body,
            concat!(
                "a.png:\n  - First reason here\n  - Second reason here\n\n",
                "b.png:\n  - (no text extracted)\n\n",
            )
        );
    }

    #[test]
    fn json_sidecar_carries_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_report_json(&path, &report(ReasonMode::Decision)).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value["generated_at"].is_string());
        assert_eq!(value["report"]["mode"], "decision");
        assert_eq!(value["report"]["by_file"]["b.png"]["kind"], "fallback");
    }
}
