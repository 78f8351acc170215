use clap::Parser;
use std::path::PathBuf;

use plotshape::pipeline::{detect_plots, media_type_for_path};
use plotshape::{DetectError, NullTextReader, OcrsTextReader, TextReader};

#[derive(Parser)]
#[command(name = "plotshape")]
#[command(about = "Detect plot boundaries and numbers in a land layout image")]
struct Cli {
    /// Path to input image file (JPEG or PNG)
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Skip OCR; every plot gets a sequential fallback number
    #[arg(long)]
    no_ocr: bool,

    /// Write the response JSON to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Pretty-print the response JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let media_type = media_type_for_path(&args.image_path)?;
    log::debug!("input declared as {media_type}");

    let bytes = std::fs::read(&args.image_path)?;

    let reader: Box<dyn TextReader> = if args.no_ocr {
        Box::new(NullTextReader)
    } else {
        // An unavailable OCR backend is a server-side fault, not bad input.
        Box::new(OcrsTextReader::from_cache_dir().map_err(DetectError::Pipeline)?)
    };

    let response = detect_plots(media_type, &bytes, reader.as_ref())?;
    log::info!("detected {} plots", response.plots.len());

    let json = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };

    match &args.output {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
