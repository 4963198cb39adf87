use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageBuffer, Rgb};
use mockup2html_lib::config::default_class_names;
use mockup2html_lib::detection::{Detector, InferenceParams, RawResult};
use mockup2html_lib::{MockupError, MockupResult};

/// Writes a white `w`x`h` PNG named `name` into `dir` and returns its path.
pub fn write_test_image(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
    let img = ImageBuffer::from_fn(w, h, |_, _| Rgb([255u8, 255u8, 255u8]));
    let path = dir.join(name);
    img.save_with_format(&path, image::ImageFormat::Png)
        .expect("Failed to save test image");
    path
}

/// Name table matching the standard mockup vocabulary.
pub fn mockup_names() -> BTreeMap<usize, String> {
    default_class_names().into_iter().enumerate().collect()
}

/// Index of `label` in the standard vocabulary.
pub fn class_index(label: &str) -> usize {
    default_class_names()
        .iter()
        .position(|n| n == label)
        .expect("label in vocabulary")
}

/// Detector stand-in returning canned results and remembering what it was
/// asked.
pub struct FakeDetector {
    pub results: Vec<RawResult>,
    pub calls: Vec<InferenceParams>,
}

impl FakeDetector {
    pub fn new(results: Vec<RawResult>) -> Self {
        Self {
            results,
            calls: Vec::new(),
        }
    }

    /// Single result whose name table holds exactly the given labels, in order.
    pub fn with_labels(boxes: &[([f32; 4], &str)]) -> Self {
        let result = RawResult {
            boxes: boxes.iter().map(|(b, _)| *b).collect(),
            classes: (0..boxes.len()).collect(),
            confidences: vec![],
            names: boxes.iter().map(|(_, l)| l.to_string()).enumerate().collect(),
        };
        Self::new(vec![result])
    }

    /// Single result built from `(box, label)` pairs.
    pub fn with_boxes(boxes: &[([f32; 4], &str)]) -> Self {
        let result = RawResult {
            boxes: boxes.iter().map(|(b, _)| *b).collect(),
            classes: boxes.iter().map(|(_, l)| class_index(l)).collect(),
            confidences: vec![],
            names: mockup_names(),
        };
        Self::new(vec![result])
    }
}

impl Detector for FakeDetector {
    fn predict(&mut self, _image: &DynamicImage, params: &InferenceParams) -> MockupResult<Vec<RawResult>> {
        self.calls.push(*params);
        Ok(self.results.clone())
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// Detector that always fails, as a broken model would.
pub struct FailingDetector;

impl Detector for FailingDetector {
    fn predict(&mut self, _image: &DynamicImage, _params: &InferenceParams) -> MockupResult<Vec<RawResult>> {
        Err(MockupError::Detection("weights could not be loaded".into()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}
