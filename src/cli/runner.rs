use std::io::Write;

use tracing::{info, warn};

use refpipe::{ConvertParams, convert_to_path};

use super::args::CliArgs;
use super::errors::AppError;

fn resolve_params(args: &CliArgs) -> Result<ConvertParams, AppError> {
    let mut params = match &args.config {
        Some(path) => ConvertParams::from_json_file(path)?,
        None => ConvertParams::default(),
    };

    if let Some(threshold) = args.threshold {
        params.threshold = threshold;
    }
    if let Some(quality) = args.webp_quality {
        if !(0.0..=100.0).contains(&quality) {
            return Err(AppError::InvalidArgument {
                arg: "--webp-quality",
                value: quality.to_string(),
            });
        }
        params.webp_quality = quality;
    }
    if args.webp_lossless {
        params.webp_lossless = true;
    }

    Ok(params)
}

pub fn run(args: CliArgs) -> Result<(), AppError> {
    refpipe::logging::init(args.log);

    let input = args.input.clone().ok_or(AppError::MissingArgument {
        arg: "--input".to_string(),
    })?;
    let output = args.output.clone().ok_or(AppError::MissingArgument {
        arg: "--output".to_string(),
    })?;
    let params = resolve_params(&args)?;
    info!("Parameters: {:?}", params);

    let mut progress = |index: usize, total: usize| {
        eprint!("\r   Frame {}/{}...", index + 1, total);
        let _ = std::io::stderr().flush();
    };
    let report = convert_to_path(&input, &output, &params, &mut progress)?;
    eprintln!();

    println!(
        "Processed {} frame(s) at {}x{}",
        report.frame_count, report.width, report.height
    );
    println!("GIF:  {}", report.gif_path.display());
    match &report.webp {
        Ok(path) => println!("WebP: {}", path.display()),
        Err(e) => {
            warn!("WebP output skipped: {}", e);
            println!("WebP: not written ({})", e);
        }
    }

    Ok(())
}
