use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::codecs::gif::GifDecoder;
use image::codecs::png::PngDecoder;
use image::codecs::webp::WebPDecoder;
use image::{AnimationDecoder, ImageFormat, ImageReader};
use tracing::{debug, info, warn};

use crate::core::frame::{AnimatedAsset, Frame};
use crate::error::{Error, Result};
use crate::io::webp_anim::decode_animation;

/// Milliseconds for a decoded frame delay; zero or unrepresentable delays use `default_ms`.
pub fn frame_duration_ms(delay: image::Delay, default_ms: u32) -> u32 {
    let (numer, denom) = delay.numer_denom_ms();
    if denom == 0 {
        warn!("Frame delay has a zero denominator, using {} ms", default_ms);
        return default_ms;
    }
    match numer / denom {
        0 => default_ms,
        ms => ms,
    }
}

fn collect_animation<'a, D: AnimationDecoder<'a>>(
    decoder: D,
    default_ms: u32,
) -> Result<Vec<Frame>> {
    let frames = decoder.into_frames().collect_frames()?;
    Ok(frames
        .into_iter()
        .map(|frame| {
            let duration_ms = frame_duration_ms(frame.delay(), default_ms);
            Frame::new(frame.into_buffer(), duration_ms)
        })
        .collect())
}

fn open_buffered(path: &Path) -> Result<BufReader<File>> {
    Ok(BufReader::new(File::open(path)?))
}

/// Load `path` as an ordered list of RGBA frames.
///
/// GIF, APNG and animated WebP are decoded frame by frame. Any other format
/// `image` understands (including still PNG/WebP) becomes a one-frame asset;
/// sources without alpha are widened to RGBA with alpha 255.
pub fn load_animation(path: &Path, default_ms: u32) -> Result<AnimatedAsset> {
    if !path.exists() {
        return Err(Error::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let format = ImageReader::open(path)?.with_guessed_format()?.format();
    debug!("load_animation: {:?} detected as {:?}", path, format);

    let frames = match format {
        Some(ImageFormat::Gif) => {
            collect_animation(GifDecoder::new(open_buffered(path)?)?, default_ms)?
        }
        Some(ImageFormat::Png) => {
            let decoder = PngDecoder::new(open_buffered(path)?)?;
            if decoder.is_apng()? {
                collect_animation(decoder.apng()?, default_ms)?
            } else {
                load_still(path, default_ms)?
            }
        }
        Some(ImageFormat::WebP) => {
            let decoder = WebPDecoder::new(open_buffered(path)?)?;
            if decoder.has_animation() {
                load_animated_webp(path, default_ms)?
            } else {
                load_still(path, default_ms)?
            }
        }
        _ => load_still(path, default_ms)?,
    };

    if frames.is_empty() {
        return Err(Error::EmptyAnimation {
            path: path.to_path_buf(),
        });
    }

    info!("Loaded {} frame(s) from {:?}", frames.len(), path);
    Ok(AnimatedAsset::new(frames))
}

/// Animated WebP goes through libwebp so composited alpha matches what
/// browsers show for lossy frames.
fn load_animated_webp(path: &Path, default_ms: u32) -> Result<Vec<Frame>> {
    let data = std::fs::read(path)?;
    Ok(decode_animation(&data)?
        .into_iter()
        .map(|(image, ms)| Frame::new(image, if ms == 0 { default_ms } else { ms }))
        .collect())
}

fn load_still(path: &Path, default_ms: u32) -> Result<Vec<Frame>> {
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(vec![Frame::new(image.into_rgba8(), default_ms)])
}
