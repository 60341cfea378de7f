use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{Error, Result};

/// Anything that turns an image file into best-effort free text.
pub trait TextExtractor {
    /// Short engine identifier, used in logs
    fn name(&self) -> &'static str;

    fn extract_text(&self, path: &Path) -> Result<String>;
}

/// Runs the `tesseract` command-line tool and reads plain text from stdout.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    executable: PathBuf,
    language: String,
    tessdata_dir: Option<PathBuf>,
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("tesseract"),
            language: "eng".to_string(),
            tessdata_dir: None,
        }
    }
}

impl TesseractCli {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = executable.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_tessdata_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tessdata_dir = Some(dir.into());
        self
    }

    fn command(&self, image: &Path) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.arg(image).arg("stdout").arg("-l").arg(&self.language);
        if let Some(dir) = &self.tessdata_dir {
            cmd.arg("--tessdata-dir").arg(dir);
        }
        cmd
    }
}

impl TextExtractor for TesseractCli {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn extract_text(&self, path: &Path) -> Result<String> {
        let output = self.command(path).output().map_err(|e| Error::Ocr {
            path: path.to_path_buf(),
            message: format!("failed to run {}: {}", self.executable.display(), e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Ocr {
                path: path.to_path_buf(),
                message: format!("tesseract exited with {}: {}", output.status, stderr.trim()),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!("{}: {} chars from {:?}", self.name(), text.chars().count(), path);
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_matches_tesseract_usage() {
        let ocr = TesseractCli::new()
            .with_language("deu")
            .with_tessdata_dir("/opt/tessdata");
        let cmd = ocr.command(Path::new("a.png"));
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            vec!["a.png", "stdout", "-l", "deu", "--tessdata-dir", "/opt/tessdata"]
        );
        assert_eq!(cmd.get_program(), "tesseract");
    }

    #[test]
    fn missing_executable_is_an_ocr_error() {
        let ocr = TesseractCli::new().with_executable("/nonexistent/tesseract-binary");
        let err = ocr.extract_text(Path::new("a.png")).unwrap_err();
        assert!(matches!(err, Error::Ocr { .. }));
    }
}
