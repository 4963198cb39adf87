use image::DynamicImage;

use crate::detection::types::RawResult;
use crate::errors::MockupResult;

/// Per-call inference knobs. Values are forwarded untouched; a backend
/// decides for itself what an out-of-range threshold means.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InferenceParams {
    pub confidence: f32,
    pub overlap: f32,
    /// Target `(width, height)` the backend resizes to before inference.
    pub input_size: (u32, u32),
}

/// Black-box object detector for UI mockups.
///
/// Implementations own whatever runtime state they need (model sessions,
/// recorded fixtures); the pipeline only borrows the handle for one run.
pub trait Detector: Send {
    fn predict(
        &mut self,
        image: &DynamicImage,
        params: &InferenceParams,
    ) -> MockupResult<Vec<RawResult>>;

    /// Human-readable backend name (used in log output).
    fn name(&self) -> &str;
}

impl<D: Detector + ?Sized> Detector for Box<D> {
    fn predict(
        &mut self,
        image: &DynamicImage,
        params: &InferenceParams,
    ) -> MockupResult<Vec<RawResult>> {
        (**self).predict(image, params)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
