mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from mockup2html for tests
pub use mockup2html_lib::config::{AppConfig, MarkupConfig};
pub use mockup2html_lib::detection::{BoundingBox, Detector, InferenceParams, RawResult, RecordedDetector};
pub use mockup2html_lib::markup::{Element, FragmentContext, LabelPolicy, MarkupSynthesizer, TemplateTable};
pub use mockup2html_lib::{MockupError, MockupResult, Pipeline};
