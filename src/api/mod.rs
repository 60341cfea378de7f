//! High-level, ergonomic library API: matte an animated image into GIF + WebP,
//! and run reason extraction over a directory of decision images. Prefer these
//! entrypoints over the low-level modules when integrating refpipe.
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::core::params::ConvertParams;
use crate::core::processing::pipeline::matte_animation;
use crate::core::progress::ProgressObserver;
use crate::error::{Error, Result};
use crate::io::reader::load_animation;
use crate::io::writers::gif::write_animated_gif;
use crate::io::writers::webp::write_animated_webp;
use crate::ocr::batch::{ReasonReport, extract_reasons, list_images};
use crate::ocr::engine::TextExtractor;
use crate::types::{OutputFormat, ReasonMode};

/// Outcome of one conversion
#[derive(Debug)]
pub struct ConversionReport {
    pub gif_path: PathBuf,
    /// Best-effort: an `Err` here never fails the conversion
    pub webp: Result<PathBuf>,
    pub frame_count: usize,
    pub width: u32,
    pub height: u32,
}

/// Both output paths for `output`: same base name, `.gif` and `.webp`.
pub fn output_paths(output: &Path) -> (PathBuf, PathBuf) {
    (
        output.with_extension(OutputFormat::Gif.extension()),
        output.with_extension(OutputFormat::WebP.extension()),
    )
}

/// Matte the near-white background of `input` and write GIF and WebP versions
/// next to `output`.
///
/// A missing input fails before anything is read or written. The GIF is
/// required; the WebP is attempted afterwards and its failure is reported in
/// [`ConversionReport::webp`] instead of as an error.
pub fn convert_to_path(
    input: &Path,
    output: &Path,
    params: &ConvertParams,
    observer: &mut dyn ProgressObserver,
) -> Result<ConversionReport> {
    if !input.exists() {
        return Err(Error::InputNotFound {
            path: input.to_path_buf(),
        });
    }

    info!("Opening: {:?}", input);
    let source = load_animation(input, params.default_frame_ms)?;
    let (width, height) = source.dimensions().ok_or_else(|| Error::EmptyAnimation {
        path: input.to_path_buf(),
    })?;

    info!("Processing {} frame(s), threshold {}", source.len(), params.threshold);
    let matted = matte_animation(&source, params.threshold, observer);

    let (gif_path, webp_path) = output_paths(output);
    if let Some(parent) = gif_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    write_animated_gif(&gif_path, &matted)?;

    let webp = match write_animated_webp(&webp_path, &matted, params) {
        Ok(()) => Ok(webp_path),
        Err(e) => {
            warn!("WebP save failed: {}", e);
            Err(e)
        }
    };

    Ok(ConversionReport {
        gif_path,
        webp,
        frame_count: matted.len(),
        width,
        height,
    })
}

/// Run OCR + reason heuristics over every image in `input_dir` with one of `extensions`.
pub fn extract_reasons_from_dir(
    input_dir: &Path,
    extensions: &[String],
    extractor: &dyn TextExtractor,
    mode: ReasonMode,
    observer: &mut dyn ProgressObserver,
) -> Result<ReasonReport> {
    let images = list_images(input_dir, extensions)?;
    info!("Found {} image(s) in {:?}", images.len(), input_dir);
    extract_reasons(input_dir, &images, extractor, mode, observer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_paths_share_base_name() {
        let (gif, webp) = output_paths(Path::new("public/logo/whistle.gif"));
        assert_eq!(gif, PathBuf::from("public/logo/whistle.gif"));
        assert_eq!(webp, PathBuf::from("public/logo/whistle.webp"));

        let (gif, webp) = output_paths(Path::new("out/whistle"));
        assert_eq!(gif, PathBuf::from("out/whistle.gif"));
        assert_eq!(webp, PathBuf::from("out/whistle.webp"));
    }
}
