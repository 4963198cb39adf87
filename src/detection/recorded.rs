/// Detector backend that replays results recorded as JSON.
///
/// Accepts either a single result object or a list of them, in the same
/// shape a live backend returns (`boxes`, `classes`, `names`, optional
/// `confidences`).
use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::detection::traits::{Detector, InferenceParams};
use crate::detection::types::RawResult;
use crate::errors::{MockupError, MockupResult};

pub struct RecordedDetector {
    results: Vec<RawResult>,
    source: Option<PathBuf>,
}

impl RecordedDetector {
    pub fn from_results(results: Vec<RawResult>) -> Self {
        Self { results, source: None }
    }

    pub fn from_json(content: &str) -> MockupResult<Self> {
        // Parsed straight from the text: serde_json only turns `"0"` map keys
        // into integers when it sees the raw input.
        let results = if content.trim_start().starts_with('[') {
            serde_json::from_str::<Vec<RawResult>>(content)?
        } else {
            vec![serde_json::from_str::<RawResult>(content)?]
        };
        Ok(Self::from_results(results))
    }

    pub fn from_path(path: &Path) -> MockupResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut detector = Self::from_json(&content)?;
        tracing::info!(
            path = %path.display(),
            results = detector.results.len(),
            "recorded detections loaded"
        );
        detector.source = Some(path.to_path_buf());
        Ok(detector)
    }
}

impl Detector for RecordedDetector {
    /// Re-applies the confidence threshold when scores were recorded.
    /// Overlap suppression already happened when the results were captured.
    fn predict(
        &mut self,
        _image: &DynamicImage,
        params: &InferenceParams,
    ) -> MockupResult<Vec<RawResult>> {
        let mut out = Vec::with_capacity(self.results.len());
        for result in &self.results {
            if result.confidences.is_empty() {
                out.push(result.clone());
                continue;
            }
            if result.confidences.len() != result.boxes.len()
                || result.classes.len() != result.boxes.len()
            {
                return Err(MockupError::Detection(format!(
                    "recorded result has {} boxes, {} classes, {} confidences",
                    result.boxes.len(),
                    result.classes.len(),
                    result.confidences.len()
                )));
            }

            let mut kept = RawResult {
                names: result.names.clone(),
                ..RawResult::default()
            };
            for ((xyxy, class_id), score) in result
                .boxes
                .iter()
                .zip(&result.classes)
                .zip(&result.confidences)
            {
                if *score > params.confidence {
                    kept.boxes.push(*xyxy);
                    kept.classes.push(*class_id);
                    kept.confidences.push(*score);
                }
            }
            out.push(kept);
        }

        tracing::debug!(
            source = ?self.source,
            kept = out.iter().map(|r| r.boxes.len()).sum::<usize>(),
            "recorded detections replayed"
        );
        Ok(out)
    }

    fn name(&self) -> &str {
        "recorded"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(confidence: f32) -> InferenceParams {
        InferenceParams {
            confidence,
            overlap: 0.3,
            input_size: (640, 640),
        }
    }

    #[test]
    fn accepts_single_object() {
        let mut det = RecordedDetector::from_json(
            r#"{"boxes": [[1, 2, 3, 4]], "classes": [0], "names": {"0": "text"}}"#,
        )
        .unwrap();
        let out = det.predict(&DynamicImage::new_rgb8(4, 4), &params(0.5)).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].boxes, vec![[1.0, 2.0, 3.0, 4.0]]);
    }

    #[test]
    fn filters_by_recorded_confidence() {
        let mut det = RecordedDetector::from_json(
            r#"[{
                "boxes": [[0, 0, 1, 1], [2, 2, 3, 3], [4, 4, 5, 5]],
                "classes": [0, 1, 0],
                "confidences": [0.9, 0.2, 0.5],
                "names": {"0": "button", "1": "card"}
            }]"#,
        )
        .unwrap();
        let out = det.predict(&DynamicImage::new_rgb8(8, 8), &params(0.5)).unwrap();
        assert_eq!(out[0].boxes, vec![[0.0, 0.0, 1.0, 1.0]]);
        assert_eq!(out[0].confidences, vec![0.9]);
    }

    #[test]
    fn inconsistent_recording_is_a_detection_error() {
        let mut det = RecordedDetector::from_json(
            r#"{"boxes": [[0, 0, 1, 1]], "classes": [0], "confidences": [0.9, 0.8], "names": {"0": "text"}}"#,
        )
        .unwrap();
        let err = det.predict(&DynamicImage::new_rgb8(2, 2), &params(0.1)).unwrap_err();
        assert!(matches!(err, MockupError::Detection(_)));
    }

    #[test]
    fn list_with_leading_whitespace_keeps_every_result() {
        let det = RecordedDetector::from_json(
            "\n  [{\"boxes\": [], \"classes\": [], \"names\": {\"0\": \"card\"}},\
               {\"boxes\": [[0, 0, 2, 2]], \"classes\": [3], \"names\": {\"3\": \"header\"}}]",
        )
        .unwrap();
        assert_eq!(det.results.len(), 2);
        assert_eq!(det.results[1].names.get(&3).map(String::as_str), Some("header"));
    }

    #[test]
    fn invalid_json_is_reported() {
        assert!(matches!(
            RecordedDetector::from_json("{\"boxes\": "),
            Err(MockupError::Json(_))
        ));
    }
}
