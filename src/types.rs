//! Shared types and enums used across refpipe.
//! Includes `OutputFormat` for the two animated encodings and `ReasonMode`
//! for the two reason-extraction heuristics.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum OutputFormat {
    Gif,
    WebP, // Best-effort
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Gif => "gif",
            OutputFormat::WebP => "webp",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Gif => write!(f, "GIF"),
            OutputFormat::WebP => write!(f, "WebP"),
        }
    }
}

/// Which heuristic turns OCR text into reason strings.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasonMode {
    /// Multi-pattern search over the whole text of each image, with per-file fallbacks
    Decision,
    /// Line filter over every image, merged into one set
    Lines,
}

impl std::fmt::Display for ReasonMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReasonMode::Decision => write!(f, "Decision"),
            ReasonMode::Lines => write!(f, "Lines"),
        }
    }
}
