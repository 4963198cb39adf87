pub mod adapter;
pub mod recorded;
pub mod traits;
pub mod types;
#[cfg(feature = "onnx")]
pub mod yolo_detector;

pub use adapter::adapt;
pub use recorded::RecordedDetector;
pub use traits::{Detector, InferenceParams};
pub use types::{BoundingBox, Detection, PixelRect, RawResult};
#[cfg(feature = "onnx")]
pub use yolo_detector::YoloDetector;
