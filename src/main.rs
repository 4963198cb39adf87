use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use mockup2html_lib::config::{self, AppConfig};
use mockup2html_lib::detection::{Detector, RecordedDetector};
use mockup2html_lib::{MockupResult, Pipeline};

#[derive(Parser)]
#[command(name = "mockup2html")]
#[command(about = "Detect UI elements in a mockup image and synthesize an HTML layout")]
struct Cli {
    /// Path to the mockup image
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Minimum detection confidence [default: from config, 0.5]
    #[arg(long)]
    confidence: Option<f32>,

    /// IoU threshold for overlap suppression [default: from config, 0.3]
    #[arg(long)]
    overlap: Option<f32>,

    /// Directory receiving the annotated image and the HTML page
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Configuration file (defaults to mockup2html.toml next to the binary or in the working directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// ONNX model to load instead of the configured one
    #[arg(long, value_name = "FILE", conflicts_with = "detections")]
    model: Option<PathBuf>,

    /// Replay recorded detections from a JSON file instead of running a model
    #[arg(long, value_name = "FILE")]
    detections: Option<PathBuf>,

    /// Print a JSON report instead of the two filenames
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn build_detector(cli: &Cli, config: &AppConfig) -> MockupResult<Box<dyn Detector>> {
    if let Some(path) = &cli.detections {
        return Ok(Box::new(RecordedDetector::from_path(path)?));
    }

    let model_path = cli.model.as_ref().unwrap_or(&config.detector.model_path);
    load_model(model_path, &config.detector.class_names)
}

#[cfg(feature = "onnx")]
fn load_model(model_path: &std::path::Path, class_names: &[String]) -> MockupResult<Box<dyn Detector>> {
    use mockup2html_lib::detection::YoloDetector;
    Ok(Box::new(YoloDetector::new(model_path, class_names)?))
}

#[cfg(not(feature = "onnx"))]
fn load_model(model_path: &std::path::Path, _class_names: &[String]) -> MockupResult<Box<dyn Detector>> {
    Err(mockup2html_lib::MockupError::Config(format!(
        "built without the `onnx` feature; cannot load {} (use --detections)",
        model_path.display()
    )))
}

fn run(cli: Cli) -> MockupResult<()> {
    let config = config::load_config(cli.config.as_deref())?;
    let confidence = cli.confidence.unwrap_or(config.thresholds.confidence);
    let overlap = cli.overlap.unwrap_or(config.thresholds.overlap);

    let detector = build_detector(&cli, &config)?;
    let mut pipeline = Pipeline::new(detector, &config);
    if let Some(dir) = &cli.out_dir {
        pipeline = pipeline.with_processed_dir(dir);
    }

    let output = pipeline.process_image(&cli.image_path, confidence, overlap)?;

    if cli.json {
        let report = serde_json::to_string_pretty(&output)?;
        println!("{report}");
    } else {
        let dir = pipeline.processed_dir();
        println!("{}", dir.join(&output.image_filename).display());
        println!("{}", dir.join(&output.markup_filename).display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load .env file if present (ignore error if not found)
    let _ = dotenvy::dotenv();
    mockup2html_lib::init_tracing(if cli.verbose { "debug" } else { "info" });

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "mockup conversion failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
