//! refpipe-reasons: OCR a folder of decision images and write the reasons found.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use refpipe::io::writers::reasons::{write_reasons_by_file, write_report_json, write_unique_reasons};
use refpipe::{ReasonMode, TesseractCli, extract_reasons_from_dir};

#[derive(Parser)]
#[command(
    name = "refpipe-reasons",
    version,
    about = "Extract decision reasons from images with OCR"
)]
struct ReasonArgs {
    /// Directory holding the decision images
    #[arg(long)]
    input_dir: PathBuf,

    /// File receiving the unique, case-insensitively sorted reasons
    #[arg(short, long)]
    output: PathBuf,

    /// Per-file mapping report (decision mode only)
    #[arg(long)]
    by_file: Option<PathBuf>,

    /// Also write the full report as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Extraction heuristic
    #[arg(long, value_enum, default_value_t = ReasonMode::Decision)]
    mode: ReasonMode,

    /// Image extensions to scan (repeatable)
    #[arg(long = "ext", default_values_t = vec!["png".to_string()])]
    extensions: Vec<String>,

    /// Tesseract language
    #[arg(long, default_value = "eng")]
    lang: String,

    /// Tesseract executable
    #[arg(long, default_value = "tesseract")]
    tesseract: PathBuf,

    /// Tesseract tessdata directory
    #[arg(long)]
    tessdata_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    log: bool,
}

fn run(args: ReasonArgs) -> refpipe::Result<()> {
    refpipe::logging::init(args.log);

    let mut ocr = TesseractCli::new()
        .with_executable(&args.tesseract)
        .with_language(&args.lang);
    if let Some(dir) = &args.tessdata_dir {
        ocr = ocr.with_tessdata_dir(dir);
    }

    let mut progress = |index: usize, total: usize| {
        eprint!("\r  Processed {}/{}...", index + 1, total);
        let _ = std::io::stderr().flush();
    };
    let report = extract_reasons_from_dir(
        &args.input_dir,
        &args.extensions,
        &ocr,
        args.mode,
        &mut progress,
    )?;
    eprintln!();

    println!("Found {} unique reason(s):", report.unique.len());
    for (i, reason) in report.unique.iter().enumerate() {
        println!("{}. {}", i + 1, reason);
    }

    write_unique_reasons(&args.output, &report)?;
    println!("Results saved to: {}", args.output.display());

    if let Some(path) = &args.by_file {
        if args.mode == ReasonMode::Decision {
            write_reasons_by_file(path, &report)?;
            println!("Detailed mapping saved to: {}", path.display());
        } else {
            info!("--by-file ignored in {} mode", args.mode);
        }
    }

    if let Some(path) = &args.json {
        write_report_json(path, &report)?;
    }

    if report.errors > 0 {
        println!("{} image(s) could not be read", report.errors);
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = ReasonArgs::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
