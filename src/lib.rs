pub mod annotation;
pub mod config;
pub mod detection;
pub mod errors;
pub mod markup;
pub mod pipeline;

pub use detection::{Detection, Detector, InferenceParams, RawResult};
pub use errors::{MockupError, MockupResult};
pub use markup::MarkupSynthesizer;
pub use pipeline::{Pipeline, PipelineOutput};

/// Installs the global `tracing` subscriber. `RUST_LOG` wins over
/// `default_filter` when set.
pub fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
