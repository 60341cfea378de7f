use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::progress::ProgressObserver;
use crate::error::{Error, Result};
use crate::ocr::engine::TextExtractor;
use crate::ocr::heuristics::{ReasonPatterns, sort_case_insensitive, unique_case_insensitive};
use crate::types::ReasonMode;

/// Placeholder recorded for images that produced no text at all.
pub const NO_TEXT_PLACEHOLDER: &str = "(no text extracted)";

/// Characters of raw OCR text kept as a per-file fallback.
pub const FALLBACK_PREVIEW_CHARS: usize = 200;

/// Reasons found in one image, or a raw-text fallback kept for manual review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum FileReasons {
    Reasons(Vec<String>),
    Fallback(String),
}

impl FileReasons {
    pub fn items(&self) -> Vec<&str> {
        match self {
            FileReasons::Reasons(reasons) => reasons.iter().map(String::as_str).collect(),
            FileReasons::Fallback(text) => vec![text.as_str()],
        }
    }
}

/// Result of running reason extraction over a directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasonReport {
    pub mode: ReasonMode,
    pub source_dir: PathBuf,
    /// Keyed by file name; only filled in decision mode
    pub by_file: BTreeMap<String, FileReasons>,
    pub unique: Vec<String>,
    /// Images whose OCR failed
    pub errors: usize,
}

/// Image files directly inside `dir` whose extension matches one of
/// `extensions` (case-insensitive), sorted by path.
pub fn list_images(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::InputNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| extensions.iter().any(|want| want.eq_ignore_ascii_case(e)))
            .unwrap_or(false);
        if matches {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn fallback_for(text: &str) -> FileReasons {
    if text.is_empty() {
        FileReasons::Fallback(NO_TEXT_PLACEHOLDER.to_string())
    } else {
        FileReasons::Fallback(text.chars().take(FALLBACK_PREVIEW_CHARS).collect())
    }
}

/// OCR every image in `images` and collect reasons according to `mode`.
///
/// A failing OCR call is logged and counted; the image is treated as having
/// no text and the batch continues.
pub fn extract_reasons(
    source_dir: &Path,
    images: &[PathBuf],
    extractor: &dyn TextExtractor,
    mode: ReasonMode,
    observer: &mut dyn ProgressObserver,
) -> Result<ReasonReport> {
    let patterns = ReasonPatterns::new()?;
    let total = images.len();
    let mut by_file = BTreeMap::new();
    let mut all_reasons: Vec<String> = Vec::new();
    let mut errors = 0;

    info!("Processing {} image(s) with {}", total, extractor.name());

    for (index, path) in images.iter().enumerate() {
        observer.on_item(index, total);

        let text = match extractor.extract_text(path) {
            Ok(text) => text,
            Err(e) => {
                warn!("Error processing {:?}: {}", path, e);
                errors += 1;
                String::new()
            }
        };

        match mode {
            ReasonMode::Decision => match patterns.decision_reasons(&text) {
                Some(reasons) => {
                    info!("{}: found {} reason(s)", file_name(path), reasons.len());
                    all_reasons.extend(reasons.iter().cloned());
                    by_file.insert(file_name(path), FileReasons::Reasons(reasons));
                }
                None => {
                    info!("{}: no clear reason found", file_name(path));
                    by_file.insert(file_name(path), fallback_for(&text));
                }
            },
            ReasonMode::Lines => all_reasons.extend(patterns.line_reasons(&text)),
        }
    }

    let unique = match mode {
        ReasonMode::Decision => unique_case_insensitive(all_reasons, 5),
        ReasonMode::Lines => {
            // Exact-match dedupe only; differently cased lines are both kept
            let set: BTreeSet<String> = all_reasons.into_iter().collect();
            let mut unique: Vec<String> = set.into_iter().collect();
            sort_case_insensitive(&mut unique);
            unique
        }
    };

    info!(
        "Found {} unique reason(s) across {} image(s), {} error(s)",
        unique.len(),
        total,
        errors
    );

    Ok(ReasonReport {
        mode,
        source_dir: source_dir.to_path_buf(),
        by_file,
        unique,
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::progress::NoProgress;
    use std::collections::HashMap;

    struct FakeOcr(HashMap<String, String>);

    impl TextExtractor for FakeOcr {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn extract_text(&self, path: &Path) -> Result<String> {
            self.0.get(&file_name(path)).cloned().ok_or_else(|| Error::Ocr {
                path: path.to_path_buf(),
                message: "unreadable".to_string(),
            })
        }
    }

    fn fake(pairs: &[(&str, &str)]) -> FakeOcr {
        FakeOcr(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn decision_mode_records_fallbacks_and_survives_errors() {
        let ocr = fake(&[
            ("a.png", "• Defender makes contact with the ball"),
            ("b.png", "PLAY ON"),
        ]);
        let images = vec![
            PathBuf::from("dir/a.png"),
            PathBuf::from("dir/b.png"),
            PathBuf::from("dir/c.png"),
        ];

        let report =
            extract_reasons(Path::new("dir"), &images, &ocr, ReasonMode::Decision, &mut NoProgress)
                .unwrap();

        assert_eq!(report.errors, 1);
        assert_eq!(report.by_file.len(), 3);
        assert_eq!(
            report.by_file["b.png"],
            FileReasons::Fallback("PLAY ON".to_string())
        );
        assert_eq!(
            report.by_file["c.png"],
            FileReasons::Fallback(NO_TEXT_PLACEHOLDER.to_string())
        );
        assert!(
            report
                .unique
                .contains(&"Defender makes contact with the ball".to_string())
        );
    }

    #[test]
    fn lines_mode_merges_all_files() {
        let ocr = fake(&[
            ("a.png", "Ball rebounds off the post\nPLAY ON"),
            ("b.png", "attacker touching the ball\nBall rebounds off the post"),
        ]);
        let images = vec![PathBuf::from("a.png"), PathBuf::from("b.png")];
        let mut seen = Vec::new();

        let report = extract_reasons(
            Path::new("."),
            &images,
            &ocr,
            ReasonMode::Lines,
            &mut |i: usize, n: usize| seen.push((i, n)),
        )
        .unwrap();

        assert_eq!(
            report.unique,
            vec![
                "attacker touching the ball".to_string(),
                "Ball rebounds off the post".to_string(),
            ]
        );
        assert!(report.by_file.is_empty());
        assert_eq!(seen, vec![(0, 2), (1, 2)]);
    }

    #[test]
    fn list_images_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.PNG", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.png")).unwrap();

        let files = list_images(dir.path(), &["png".to_string()]).unwrap();
        let names: Vec<_> = files.iter().map(|p| file_name(p)).collect();
        assert_eq!(names, vec!["a.PNG", "b.png"]);
    }

    #[test]
    fn list_images_missing_dir() {
        let err = list_images(Path::new("/no/such/dir"), &["png".to_string()]).unwrap_err();
        assert!(matches!(err, Error::InputNotFound { .. }));
    }
}
