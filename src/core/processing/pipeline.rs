use tracing::debug;

use crate::core::frame::{AnimatedAsset, Frame};
use crate::core::processing::matte::matte_image;
use crate::core::progress::ProgressObserver;

/// Returns a copy of `frame` with the background matte applied; duration is kept.
pub fn matte_frame(frame: &Frame, threshold: u8) -> Frame {
    Frame::new(matte_image(&frame.image, threshold), frame.duration_ms)
}

/// Mattes every frame in display order, calling `observer` once per frame.
pub fn matte_animation(
    asset: &AnimatedAsset,
    threshold: u8,
    observer: &mut dyn ProgressObserver,
) -> AnimatedAsset {
    let total = asset.len();
    let mut frames = Vec::with_capacity(total);

    for (index, frame) in asset.frames.iter().enumerate() {
        observer.on_item(index, total);
        let matted = matte_frame(frame, threshold);
        debug!(
            "matte_animation: frame {}/{} ({}x{}, {} ms)",
            index + 1,
            total,
            matted.image.width(),
            matted.image.height(),
            matted.duration_ms
        );
        frames.push(matted);
    }

    AnimatedAsset::new(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::progress::NoProgress;
    use image::{Rgba, RgbaImage};

    fn solid(w: u32, h: u32, px: [u8; 4], ms: u32) -> Frame {
        Frame::new(RgbaImage::from_pixel(w, h, Rgba(px)), ms)
    }

    #[test]
    fn white_middle_frame_scenario() {
        let asset = AnimatedAsset::new(vec![
            solid(4, 4, [10, 10, 10, 255], 80),
            solid(4, 4, [255, 255, 255, 255], 100),
            solid(4, 4, [200, 0, 0, 255], 120),
        ]);

        let out = matte_animation(&asset, 240, &mut NoProgress);

        assert_eq!(out.len(), 3);
        assert!(
            out.frames[1]
                .image
                .pixels()
                .all(|p| *p == Rgba([255, 255, 255, 0]))
        );
        assert_eq!(out.frames[0], asset.frames[0]);
        assert_eq!(out.frames[2], asset.frames[2]);
        assert_eq!(out.durations(), vec![80, 100, 120]);
    }

    #[test]
    fn single_pixel_is_unchanged() {
        let asset = AnimatedAsset::new(vec![solid(1, 1, [100, 150, 200, 255], 100)]);
        let out = matte_animation(&asset, 240, &mut NoProgress);
        assert_eq!(out.frames[0].image.get_pixel(0, 0), &Rgba([100, 150, 200, 255]));
    }

    #[test]
    fn observer_sees_every_frame_in_order() {
        let asset = AnimatedAsset::new(vec![
            solid(2, 2, [0, 0, 0, 255], 100),
            solid(3, 1, [0, 0, 0, 255], 100),
            solid(1, 5, [0, 0, 0, 255], 100),
        ]);
        let mut seen = Vec::new();
        let out = matte_animation(&asset, 240, &mut |i: usize, total: usize| seen.push((i, total)));

        assert_eq!(seen, vec![(0, 3), (1, 3), (2, 3)]);
        let dims: Vec<_> = out.frames.iter().map(Frame::dimensions).collect();
        assert_eq!(dims, vec![(2, 2), (3, 1), (1, 5)]);
    }

    #[test]
    fn empty_animation_stays_empty() {
        let out = matte_animation(&AnimatedAsset::default(), 240, &mut NoProgress);
        assert!(out.is_empty());
    }
}
