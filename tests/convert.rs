use std::borrow::Cow;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::process::Command;

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, Rgba};
use refpipe::{ConvertParams, Error, NoProgress, convert_to_path, load_animation};

/// Writes a GIF whose frames are each one flat colour. `delay` is in centiseconds.
fn write_flat_gif(path: &Path, width: u16, height: u16, frames: &[([u8; 3], u16)]) {
    let file = File::create(path).unwrap();
    let mut encoder = gif::Encoder::new(file, width, height, &[]).unwrap();
    encoder.set_repeat(gif::Repeat::Infinite).unwrap();
    for (rgb, delay) in frames {
        let mut palette = rgb.to_vec();
        palette.extend_from_slice(&[0, 0, 0]);
        let frame = gif::Frame {
            width,
            height,
            buffer: Cow::Owned(vec![0; width as usize * height as usize]),
            palette: Some(palette),
            delay: *delay,
            ..gif::Frame::default()
        };
        encoder.write_frame(&frame).unwrap();
    }
}

fn decode_gif(path: &Path) -> Vec<image::Frame> {
    let decoder = GifDecoder::new(BufReader::new(File::open(path).unwrap())).unwrap();
    decoder.into_frames().collect_frames().unwrap()
}

#[test]
fn white_middle_frame_becomes_transparent() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.gif");
    write_flat_gif(
        &input,
        4,
        3,
        &[([10, 10, 10], 8), ([255, 255, 255], 8), ([200, 0, 0], 8)],
    );

    let output = dir.path().join("out/logo.gif");
    let report =
        convert_to_path(&input, &output, &ConvertParams::default(), &mut NoProgress).unwrap();

    assert_eq!(report.frame_count, 3);
    assert_eq!((report.width, report.height), (4, 3));
    assert_eq!(report.gif_path, output);

    let frames = decode_gif(&report.gif_path);
    assert_eq!(frames.len(), 3);
    for frame in &frames {
        assert_eq!(frame.buffer().dimensions(), (4, 3));
    }
    assert!(frames[0].buffer().pixels().all(|p| *p == Rgba([10, 10, 10, 255])));
    assert!(frames[1].buffer().pixels().all(|p| p[3] == 0));
    assert!(frames[2].buffer().pixels().all(|p| *p == Rgba([200, 0, 0, 255])));
}

/// Loop count from the `ANIM` chunk of a WebP file.
fn webp_loop_count(bytes: &[u8]) -> u16 {
    let at = bytes.windows(4).position(|w| w == b"ANIM").unwrap();
    // fourcc, chunk size, background colour, then the loop count
    u16::from_le_bytes([bytes[at + 12], bytes[at + 13]])
}

#[test]
fn webp_keeps_frames_timing_and_transparency() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.gif");
    write_flat_gif(
        &input,
        16,
        16,
        &[([10, 10, 10], 10), ([255, 255, 255], 5), ([200, 0, 0], 20)],
    );

    let output = dir.path().join("logo.gif");
    let report =
        convert_to_path(&input, &output, &ConvertParams::default(), &mut NoProgress).unwrap();

    let webp_path = report.webp.as_ref().unwrap();
    assert_eq!(webp_path, &dir.path().join("logo.webp"));
    assert_eq!(webp_loop_count(&std::fs::read(webp_path).unwrap()), 0);

    let decoded = load_animation(webp_path, 100).unwrap();
    assert_eq!(decoded.len(), 3);
    assert_eq!(decoded.dimensions(), Some((16, 16)));
    assert_eq!(decoded.durations(), vec![100, 50, 200]);
    assert!(decoded.frames[0].image.pixels().all(|p| p[3] == 255));
    assert!(decoded.frames[1].image.pixels().all(|p| p[3] == 0));
    assert!(decoded.frames[2].image.pixels().all(|p| p[3] == 255));
}

#[test]
fn webp_failure_still_produces_the_gif() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.gif");
    write_flat_gif(&input, 2, 2, &[([100, 150, 200], 10), ([255, 255, 255], 10)]);

    // A directory where the WebP file should go makes the write fail
    std::fs::create_dir(dir.path().join("logo.webp")).unwrap();

    let output = dir.path().join("logo.gif");
    let report =
        convert_to_path(&input, &output, &ConvertParams::default(), &mut NoProgress).unwrap();

    assert!(matches!(report.webp, Err(Error::Io(_))));
    assert!(report.gif_path.is_file());
    assert_eq!(decode_gif(&report.gif_path).len(), 2);
}

#[test]
fn single_pixel_passes_through() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("pixel.gif");
    write_flat_gif(&input, 1, 1, &[([100, 150, 200], 10)]);

    let report = convert_to_path(
        &input,
        &dir.path().join("pixel-out.gif"),
        &ConvertParams::default(),
        &mut NoProgress,
    )
    .unwrap();

    let frames = decode_gif(&report.gif_path);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].buffer().get_pixel(0, 0), &Rgba([100, 150, 200, 255]));
}

#[test]
fn missing_delay_defaults_to_100ms() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("nodelay.gif");
    write_flat_gif(&input, 2, 2, &[([1, 2, 3], 0), ([4, 5, 6], 5)]);

    let asset = load_animation(&input, 100).unwrap();
    assert_eq!(asset.durations(), vec![100, 50]);
}

#[test]
fn progress_is_reported_per_frame() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.gif");
    write_flat_gif(&input, 2, 2, &[([0, 0, 0], 10), ([9, 9, 9], 10), ([250, 250, 250], 10)]);

    let mut seen = Vec::new();
    convert_to_path(
        &input,
        &dir.path().join("o.gif"),
        &ConvertParams::default(),
        &mut |i: usize, total: usize| seen.push((i, total)),
    )
    .unwrap();
    assert_eq!(seen, vec![(0, 3), (1, 3), (2, 3)]);
}

#[test]
fn missing_input_fails_without_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("never.gif");

    let err = convert_to_path(
        &dir.path().join("missing.gif"),
        &output,
        &ConvertParams::default(),
        &mut NoProgress,
    )
    .unwrap_err();

    assert!(matches!(err, Error::InputNotFound { .. }));
    assert!(!output.exists());
    assert!(!dir.path().join("never.webp").exists());
}

#[test]
fn cli_exits_non_zero_on_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("cli.gif");

    let status = Command::new(env!("CARGO_BIN_EXE_refpipe"))
        .arg("--input")
        .arg(dir.path().join("missing.gif"))
        .arg("--output")
        .arg(&output)
        .output()
        .unwrap();

    assert_eq!(status.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&status.stderr).contains("Input not found"));
    assert!(!output.exists());
    assert!(!dir.path().join("cli.webp").exists());
}
