/// Normalises raw detector output into the ordered detection list consumed
/// by the renderer and the synthesizer.
use crate::detection::types::{BoundingBox, Detection, RawResult};
use crate::errors::{MockupError, MockupResult};

/// Flattens every result in order, resolving class indices through each
/// result's own name table.
pub fn adapt(results: &[RawResult]) -> MockupResult<Vec<Detection>> {
    let total = results.iter().map(|r| r.boxes.len()).sum();
    let mut detections = Vec::with_capacity(total);

    for (result_idx, result) in results.iter().enumerate() {
        if result.boxes.len() != result.classes.len() {
            return Err(MockupError::Synthesis(format!(
                "result {result_idx}: {} boxes but {} class indices",
                result.boxes.len(),
                result.classes.len()
            )));
        }
        if !result.confidences.is_empty() && result.confidences.len() != result.boxes.len() {
            return Err(MockupError::Synthesis(format!(
                "result {result_idx}: {} boxes but {} confidences",
                result.boxes.len(),
                result.confidences.len()
            )));
        }

        for (i, (xyxy, class_id)) in result.boxes.iter().zip(&result.classes).enumerate() {
            let label = result.names.get(class_id).ok_or_else(|| {
                MockupError::Synthesis(format!(
                    "result {result_idx}: class index {class_id} missing from name table"
                ))
            })?;

            let mut detection = Detection::new(BoundingBox::from_xyxy(*xyxy), label.as_str())?;
            if let Some(&confidence) = result.confidences.get(i) {
                detection = detection.with_confidence(confidence);
            }
            detections.push(detection);
        }
    }

    tracing::debug!(results = results.len(), detections = detections.len(), "detections adapted");
    Ok(detections)
}
