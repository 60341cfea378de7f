#![doc = r#"
refpipe — asset utilities for a referee-training content pipeline.

This crate removes the near-white background from animated images (GIF, APNG,
animated WebP, or any still image `image` can decode) and re-encodes the result as a
transparent looping GIF plus a best-effort animated WebP. It also ships an OCR-driven
helper that pulls "reason" phrases out of decision-diagram images. Both power the
`refpipe` and `refpipe-reasons` binaries and can be embedded in your own tools.

Requirements
------------
- Rust 2024 edition toolchain.
- A C toolchain for the bundled libwebp (via `libwebp-sys`).
- `tesseract` on `PATH` (or configured explicitly) for reason extraction.

Quick start: matte a GIF
------------------------
```rust,no_run
use std::path::Path;
use refpipe::{convert_to_path, ConvertParams, NoProgress};

fn main() -> refpipe::Result<()> {
    let params = ConvertParams {
        threshold: 240,
        ..Default::default()
    };

    let report = convert_to_path(
        Path::new("hand-phone.gif"),
        Path::new("public/logo/whistle-practice.gif"),
        &params,
        &mut NoProgress,
    )?;

    println!("GIF: {:?}", report.gif_path);
    if let Err(e) = &report.webp {
        eprintln!("WebP skipped: {e}");
    }
    Ok(())
}
```

Progress reporting
------------------
Any `FnMut(usize, usize)` is a [`ProgressObserver`]; it is called once per frame with
the zero-based index and the total.

```rust,no_run
use std::path::Path;
use refpipe::{convert_to_path, ConvertParams};

fn main() -> refpipe::Result<()> {
    let mut progress = |i: usize, total: usize| eprint!("\rFrame {}/{}", i + 1, total);
    convert_to_path(
        Path::new("in.gif"),
        Path::new("out.gif"),
        &ConvertParams::default(),
        &mut progress,
    )?;
    Ok(())
}
```

In-memory frames
----------------
```rust
use image::{Rgba, RgbaImage};
use refpipe::{matte_animation, AnimatedAsset, Frame, NoProgress};

let asset = AnimatedAsset::new(vec![
    Frame::new(RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255])), 100),
]);
let matted = matte_animation(&asset, 240, &mut NoProgress);
assert_eq!(matted.frames[0].image.get_pixel(0, 0), &Rgba([255, 255, 255, 0]));
```

Reason extraction
-----------------
```rust,no_run
use std::path::Path;
use refpipe::{extract_reasons_from_dir, NoProgress, ReasonMode, TesseractCli};
use refpipe::io::writers::reasons::{write_reasons_by_file, write_unique_reasons};

fn main() -> refpipe::Result<()> {
    let ocr = TesseractCli::new().with_language("eng");
    let report = extract_reasons_from_dir(
        Path::new("decisions"),
        &["png".to_string()],
        &ocr,
        ReasonMode::Decision,
        &mut NoProgress,
    )?;
    write_unique_reasons(Path::new("decision-reasons.txt"), &report)?;
    write_reasons_by_file(Path::new("decision-reasons-by-file.txt"), &report)?;
    Ok(())
}
```

Error handling
--------------
All public functions return `refpipe::Result<T>`; match on `refpipe::Error` to handle
specific cases.

```rust,no_run
use std::path::Path;
use refpipe::{convert_to_path, ConvertParams, Error, NoProgress};

fn main() {
    let params = ConvertParams::default();
    let input = Path::new("missing.gif");
    match convert_to_path(input, Path::new("out.gif"), &params, &mut NoProgress) {
        Ok(_) => {}
        Err(Error::InputNotFound { path }) => eprintln!("Input file not found: {}", path.display()),
        Err(other) => eprintln!("Other error: {other}"),
    }
}
```

Useful modules
--------------
- [`api`] — high-level entry points.
- [`core`] — frame model, parameters, progress observers, the matte itself.
- [`io`] — frame decoding and GIF/WebP/report writers.
- [`ocr`] — text extraction trait, Tesseract backend, reason heuristics.
- [`error`] — crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod logging;
pub mod ocr;
pub mod types;

// Curated public API surface
// Types
pub use core::frame::{AnimatedAsset, DEFAULT_FRAME_DURATION_MS, Frame};
pub use core::params::{ConvertParams, DEFAULT_THRESHOLD};
pub use core::progress::{NoProgress, ProgressObserver};
pub use error::{Error, Result};
pub use types::{OutputFormat, ReasonMode};

// Transform
pub use core::processing::matte::{is_background, matte_image, matte_pixel};
pub use core::processing::pipeline::{matte_animation, matte_frame};

// Readers / writers
pub use io::reader::load_animation;
pub use io::writers::gif::write_animated_gif;
pub use io::writers::webp::write_animated_webp;

// OCR
pub use ocr::{FileReasons, ReasonPatterns, ReasonReport, TesseractCli, TextExtractor};

// High-level API re-exports
pub use api::{ConversionReport, convert_to_path, extract_reasons_from_dir, output_paths};
