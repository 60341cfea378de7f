use std::path::Path;

use libwebp_sys::{WebPConfig, WebPValidateConfig};
use tracing::info;

use crate::core::frame::AnimatedAsset;
use crate::core::params::ConvertParams;
use crate::error::{Error, Result};
use crate::io::webp_anim::AnimationEncoder;
use crate::types::OutputFormat;

/// Loop count written to the animation header; 0 loops forever.
const LOOP_FOREVER: i32 = 0;

/// Frame boundaries in ms: the start of every frame followed by the end of the
/// last one.
pub fn frame_boundaries(durations: &[u32]) -> Vec<i32> {
    let mut at: i64 = 0;
    let mut boundaries = Vec::with_capacity(durations.len() + 1);
    boundaries.push(0);
    for &d in durations {
        at += d as i64;
        boundaries.push(at.min(i32::MAX as i64) as i32);
    }
    boundaries
}

fn build_config(params: &ConvertParams) -> Result<WebPConfig> {
    let mut config = WebPConfig::new()
        .map_err(|_| Error::encode(OutputFormat::WebP, "failed to initialise encoder config"))?;
    config.quality = params.webp_quality;
    config.method = params.webp_method;
    config.lossless = i32::from(params.webp_lossless);
    // SAFETY: `config` is a fully initialised libwebp config.
    if unsafe { WebPValidateConfig(&config) } == 0 {
        return Err(Error::encode(OutputFormat::WebP, "invalid encoder settings"));
    }
    Ok(config)
}

/// Encode `asset` as a looping animated WebP and write it to `output`.
///
/// Every frame keeps its own duration, the last one included. The file is
/// only created once the whole animation has encoded.
pub fn write_animated_webp(
    output: &Path,
    asset: &AnimatedAsset,
    params: &ConvertParams,
) -> Result<()> {
    let (width, height) = asset.dimensions().ok_or_else(|| Error::EmptyAnimation {
        path: output.to_path_buf(),
    })?;

    let config = build_config(params)?;
    let boundaries = frame_boundaries(&asset.durations());

    let mut encoder = AnimationEncoder::new(width, height, LOOP_FOREVER)?;
    for (frame, &start) in asset.frames.iter().zip(&boundaries) {
        encoder.add_frame(&frame.image, start, &config)?;
    }
    let end = boundaries.last().copied().unwrap_or(0);
    let encoded = encoder.finish(end)?;
    std::fs::write(output, &encoded)?;

    info!(
        "write_animated_webp: {} frame(s), {} bytes saved to {:?}",
        asset.len(),
        encoded.len(),
        output
    );
    Ok(())
}
