//! OCR-driven reason extraction for decision-diagram images.
//!
//! `engine` hides the OCR tool behind the `TextExtractor` trait (Tesseract CLI
//! by default), `heuristics` turns free text into reason strings, and `batch`
//! runs both over a directory.
pub mod batch;
pub mod engine;
pub mod heuristics;

pub use batch::{FileReasons, ReasonReport, extract_reasons, list_images};
pub use engine::{TesseractCli, TextExtractor};
pub use heuristics::{ReasonPatterns, find_decision_reasons, find_line_reasons};
