use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ::gif::{DisposalMethod, Encoder, Repeat};
use color_quant::NeuQuant;
use image::RgbaImage;
use tracing::{debug, info};

use crate::core::frame::AnimatedAsset;
use crate::error::{Error, Result};
use crate::types::OutputFormat;

/// Palette slot holding every transparent pixel.
pub const TRANSPARENT_INDEX: u8 = 0;

/// Pixels below this alpha are written as transparent; GIF has no partial alpha.
pub const ALPHA_CUTOFF: u8 = 128;

const MAX_OPAQUE_COLORS: usize = 255;
const NEUQUANT_SAMPLE_FACTOR: i32 = 10;

/// Indexed form of one RGBA frame
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedFrame {
    /// Flat RGB triples; entry 0 is the transparent key
    pub palette: Vec<u8>,
    pub indices: Vec<u8>,
}

/// Map a frame onto a palette whose index 0 is reserved for transparent pixels.
///
/// Frames with at most 255 distinct opaque colours keep them exactly; larger
/// frames are reduced with NeuQuant to 255 colours.
pub fn index_frame(image: &RgbaImage) -> IndexedFrame {
    let key = image
        .pixels()
        .find(|p| p[3] < ALPHA_CUTOFF)
        .map(|p| [p[0], p[1], p[2]])
        .unwrap_or([255, 255, 255]);

    if let Some(indexed) = index_exact(image, key) {
        return indexed;
    }

    let opaque: Vec<u8> = image
        .pixels()
        .filter(|p| p[3] >= ALPHA_CUTOFF)
        .flat_map(|p| [p[0], p[1], p[2], 255])
        .collect();
    let quant = NeuQuant::new(NEUQUANT_SAMPLE_FACTOR, MAX_OPAQUE_COLORS, &opaque);

    let mut palette = key.to_vec();
    palette.extend(quant.color_map_rgb());

    let indices = image
        .pixels()
        .map(|p| {
            if p[3] < ALPHA_CUTOFF {
                TRANSPARENT_INDEX
            } else {
                (quant.index_of(&[p[0], p[1], p[2], 255]) + 1) as u8
            }
        })
        .collect();

    IndexedFrame { palette, indices }
}

fn index_exact(image: &RgbaImage, key: [u8; 3]) -> Option<IndexedFrame> {
    let mut lookup: HashMap<[u8; 3], u8> = HashMap::new();
    let mut palette = key.to_vec();
    let mut indices = Vec::with_capacity(image.width() as usize * image.height() as usize);

    for p in image.pixels() {
        if p[3] < ALPHA_CUTOFF {
            indices.push(TRANSPARENT_INDEX);
            continue;
        }
        let rgb = [p[0], p[1], p[2]];
        let index = match lookup.get(&rgb) {
            Some(&i) => i,
            None => {
                if lookup.len() == MAX_OPAQUE_COLORS {
                    return None;
                }
                let i = (lookup.len() + 1) as u8;
                lookup.insert(rgb, i);
                palette.extend_from_slice(&rgb);
                i
            }
        };
        indices.push(index);
    }

    Some(IndexedFrame { palette, indices })
}

/// Nearest whole centisecond. Any nonzero duration keeps at least 1, since
/// viewers treat a delay of 0 as their own default.
fn delay_centis(duration_ms: u32) -> u16 {
    let centis = (duration_ms.saturating_add(5) / 10).min(u16::MAX as u32) as u16;
    if duration_ms > 0 { centis.max(1) } else { centis }
}

fn gif_dimension(value: u32) -> Result<u16> {
    u16::try_from(value).map_err(|_| {
        Error::encode(OutputFormat::Gif, format!("dimension {} exceeds 65535", value))
    })
}

/// Write `asset` as a looping GIF.
///
/// Every frame is full-canvas, cleared to background before the next one is
/// drawn, keyed transparent on palette index 0 and written without any
/// inter-frame optimisation.
pub fn write_animated_gif(output: &Path, asset: &AnimatedAsset) -> Result<()> {
    let (width, height) = asset.dimensions().ok_or_else(|| Error::EmptyAnimation {
        path: output.to_path_buf(),
    })?;

    let file = File::create(output)?;
    let writer = BufWriter::new(file);
    let mut encoder = Encoder::new(writer, gif_dimension(width)?, gif_dimension(height)?, &[])?;
    encoder.set_repeat(Repeat::Infinite)?;

    for (i, frame) in asset.frames.iter().enumerate() {
        let (fw, fh) = frame.dimensions();
        let indexed = index_frame(&frame.image);
        debug!(
            "write_animated_gif: frame {} uses {} palette entries",
            i,
            indexed.palette.len() / 3
        );

        let gif_frame = ::gif::Frame {
            width: gif_dimension(fw)?,
            height: gif_dimension(fh)?,
            buffer: Cow::Owned(indexed.indices),
            palette: Some(indexed.palette),
            transparent: Some(TRANSPARENT_INDEX),
            delay: delay_centis(frame.duration_ms),
            dispose: DisposalMethod::Background,
            ..::gif::Frame::default()
        };
        encoder.write_frame(&gif_frame)?;
    }

    let mut writer = encoder.into_inner()?;
    writer.flush()?;
    info!("write_animated_gif: {} frame(s) saved to {:?}", asset.len(), output);
    Ok(())
}
