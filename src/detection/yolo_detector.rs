/// ONNX YOLOv8 inference for UI mockup element detection.
///
/// Loads a YOLOv8-style ONNX export and returns boxes in source-image pixel
/// space, ordered by descending confidence.
use crate::detection::traits::{Detector, InferenceParams};
use crate::detection::types::RawResult;
use crate::errors::{MockupError, MockupResult};

use image::DynamicImage;
use ndarray::Array4;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::collections::BTreeMap;
use std::path::Path;

/// Upper bound on boxes kept after NMS.
const MAX_DETECTIONS: usize = 300;

/// Candidate before NMS.
#[derive(Debug, Clone)]
struct Candidate {
    bbox: [f32; 4], // [x1, y1, x2, y2] in source pixels
    confidence: f32,
    class_id: usize,
}

/// Letterbox geometry needed to map model output back to the source image.
#[derive(Debug, Clone, Copy)]
struct Letterbox {
    scale: f32,
    pad_x: f32,
    pad_y: f32,
}

/// Holds the ONNX Runtime session and the model's class table.
pub struct YoloDetector {
    session: Session,
    names: BTreeMap<usize, String>,
}

impl YoloDetector {
    pub fn new(model_path: &Path, class_names: &[String]) -> MockupResult<Self> {
        if !model_path.exists() {
            return Err(MockupError::Detection(format!(
                "YOLO model not found: {}",
                model_path.display()
            )));
        }

        let session = Session::builder()
            .map_err(|e| MockupError::Detection(format!("ort session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| MockupError::Detection(format!("ort opt-level: {e}")))?
            .commit_from_file(model_path)
            .map_err(|e| MockupError::Detection(format!("ort load model: {e}")))?;

        tracing::info!(
            path = %model_path.display(),
            classes = class_names.len(),
            "YOLO detector loaded"
        );

        Ok(Self {
            session,
            names: class_names.iter().cloned().enumerate().collect(),
        })
    }

    // ── Pre-processing ──────────────────────────────────────────────────────

    /// Resize + letterbox + normalise → NCHW f32 tensor.
    fn preprocess(img: &DynamicImage, (tw, th): (u32, u32)) -> MockupResult<(Array4<f32>, Letterbox)> {
        if tw == 0 || th == 0 {
            return Err(MockupError::Detection(format!(
                "invalid inference size {tw}x{th}"
            )));
        }
        let (ow, oh) = (img.width() as f32, img.height() as f32);
        if ow == 0.0 || oh == 0.0 {
            return Err(MockupError::Detection("empty source image".into()));
        }
        let scale = (tw as f32 / ow).min(th as f32 / oh);
        let nw = ((ow * scale).round() as u32).clamp(1, tw);
        let nh = ((oh * scale).round() as u32).clamp(1, th);
        let pad_x = (tw - nw) as f32 / 2.0;
        let pad_y = (th - nh) as f32 / 2.0;

        let resized = img.resize_exact(nw, nh, image::imageops::FilterType::CatmullRom);
        let rgb = resized.to_rgb8();

        // Grey‐fill canvas
        let mut canvas = image::RgbImage::from_pixel(tw, th, image::Rgb([114, 114, 114]));
        image::imageops::overlay(&mut canvas, &rgb, pad_x.round() as i64, pad_y.round() as i64);

        // HWC → NCHW normalised [0, 1]
        let mut tensor = Array4::<f32>::zeros((1, 3, th as usize, tw as usize));
        for (x, y, p) in canvas.enumerate_pixels() {
            let (x, y) = (x as usize, y as usize);
            tensor[[0, 0, y, x]] = p[0] as f32 / 255.0;
            tensor[[0, 1, y, x]] = p[1] as f32 / 255.0;
            tensor[[0, 2, y, x]] = p[2] as f32 / 255.0;
        }

        Ok((tensor, Letterbox { scale, pad_x, pad_y }))
    }

    // ── Post-processing ─────────────────────────────────────────────────────

    fn postprocess(
        output: &ndarray::ArrayViewD<f32>,
        orig: (u32, u32),
        letterbox: Letterbox,
        params: &InferenceParams,
    ) -> MockupResult<Vec<Candidate>> {
        // YOLOv8 output: [1, 4+num_classes, num_proposals]
        let shape = output.shape();
        if shape.len() != 3 || shape[1] <= 4 {
            return Err(MockupError::Detection(format!(
                "unexpected output shape: {:?}",
                shape
            )));
        }
        let num_classes = shape[1] - 4;
        let num_preds = shape[2];
        let (max_x, max_y) = (orig.0 as f32, orig.1 as f32);
        let Letterbox { scale, pad_x, pad_y } = letterbox;

        let mut candidates = Vec::new();
        for i in 0..num_preds {
            let cx = output[[0, 0, i]];
            let cy = output[[0, 1, i]];
            let w = output[[0, 2, i]];
            let h = output[[0, 3, i]];

            // Best class
            let mut max_score = f32::MIN;
            let mut max_class = 0usize;
            for c in 0..num_classes {
                let s = output[[0, 4 + c, i]];
                if s > max_score {
                    max_score = s;
                    max_class = c;
                }
            }
            if max_score <= params.confidence {
                continue;
            }

            // Undo letterbox → source pixels, clipped to the image
            let x1 = (((cx - w / 2.0) - pad_x) / scale).clamp(0.0, max_x);
            let y1 = (((cy - h / 2.0) - pad_y) / scale).clamp(0.0, max_y);
            let x2 = (((cx + w / 2.0) - pad_x) / scale).clamp(0.0, max_x);
            let y2 = (((cy + h / 2.0) - pad_y) / scale).clamp(0.0, max_y);

            candidates.push(Candidate {
                bbox: [x1, y1, x2, y2],
                confidence: max_score,
                class_id: max_class,
            });
        }

        let kept = nms(&candidates, params.overlap);
        Ok(kept
            .into_iter()
            .take(MAX_DETECTIONS)
            .map(|i| candidates[i].clone())
            .collect())
    }
}

impl Detector for YoloDetector {
    fn predict(
        &mut self,
        image: &DynamicImage,
        params: &InferenceParams,
    ) -> MockupResult<Vec<RawResult>> {
        let orig = (image.width(), image.height());
        let (input_tensor, letterbox) = Self::preprocess(image, params.input_size)?;

        let input_value = Tensor::from_array(input_tensor)
            .map_err(|e| MockupError::Detection(format!("ort tensor: {e}")))?;

        let output_owned = {
            let outputs = self
                .session
                .run(ort::inputs![input_value])
                .map_err(|e| MockupError::Detection(format!("ort run: {e}")))?;

            outputs[0]
                .try_extract_array::<f32>()
                .map_err(|e| MockupError::Detection(format!("extract tensor: {e}")))?
                .to_owned()
        };

        let candidates = Self::postprocess(&output_owned.view(), orig, letterbox, params)?;
        tracing::debug!(count = candidates.len(), "YOLO candidates after NMS");

        let mut result = RawResult {
            names: self.names.clone(),
            ..RawResult::default()
        };
        for c in candidates {
            result.boxes.push(c.bbox);
            result.classes.push(c.class_id);
            result.confidences.push(c.confidence);
        }
        Ok(vec![result])
    }

    fn name(&self) -> &str {
        "yolo-onnx"
    }
}

// ── Utilities ────────────────────────────────────────────────────────────────

/// Greedy per-class NMS. Returned indices are in descending confidence.
fn nms(dets: &[Candidate], iou_threshold: f32) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..dets.len()).collect();
    indices.sort_by(|&a, &b| {
        dets[b]
            .confidence
            .partial_cmp(&dets[a].confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep = Vec::new();
    let mut suppressed = vec![false; dets.len()];

    for &i in &indices {
        if suppressed[i] {
            continue;
        }
        keep.push(i);
        for &j in &indices {
            if suppressed[j] || i == j {
                continue;
            }
            if dets[i].class_id == dets[j].class_id
                && iou(&dets[i].bbox, &dets[j].bbox) > iou_threshold
            {
                suppressed[j] = true;
            }
        }
    }
    keep
}

fn iou(a: &[f32; 4], b: &[f32; 4]) -> f32 {
    let ix1 = a[0].max(b[0]);
    let iy1 = a[1].max(b[1]);
    let ix2 = a[2].min(b[2]);
    let iy2 = a[3].min(b[3]);

    let inter = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
    let area_a = (a[2] - a[0]) * (a[3] - a[1]);
    let area_b = (b[2] - b[0]) * (b[3] - b[1]);
    let union = area_a + area_b - inter;

    if union <= 0.0 {
        0.0
    } else {
        inter / union
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(bbox: [f32; 4], confidence: f32, class_id: usize) -> Candidate {
        Candidate { bbox, confidence, class_id }
    }

    #[test]
    fn iou_of_disjoint_and_identical_boxes() {
        let a = [0.0, 0.0, 10.0, 10.0];
        assert_eq!(iou(&a, &[20.0, 20.0, 30.0, 30.0]), 0.0);
        assert!((iou(&a, &a) - 1.0).abs() < 1e-6);
        assert_eq!(iou(&[0.0, 0.0, 0.0, 0.0], &[0.0, 0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn nms_suppresses_same_class_overlap_only() {
        let dets = vec![
            cand([0.0, 0.0, 10.0, 10.0], 0.6, 0),
            cand([1.0, 1.0, 10.0, 10.0], 0.9, 0),
            cand([1.0, 1.0, 10.0, 10.0], 0.8, 1),
            cand([50.0, 50.0, 60.0, 60.0], 0.7, 0),
        ];
        assert_eq!(nms(&dets, 0.3), vec![1, 2, 3]);
    }

    #[test]
    fn postprocess_maps_letterboxed_boxes_back() {
        // 2 classes, 2 proposals; source 1280x640 letterboxed into 640x640.
        let mut out = ndarray::Array3::<f32>::zeros((1, 6, 2));
        // proposal 0: centre (320, 320), 100x50 in model space, class 1 @ 0.9
        out[[0, 0, 0]] = 320.0;
        out[[0, 1, 0]] = 320.0;
        out[[0, 2, 0]] = 100.0;
        out[[0, 3, 0]] = 50.0;
        out[[0, 5, 0]] = 0.9;
        // proposal 1: below threshold
        out[[0, 4, 1]] = 0.1;

        let params = InferenceParams {
            confidence: 0.5,
            overlap: 0.3,
            input_size: (640, 640),
        };
        let letterbox = Letterbox { scale: 0.5, pad_x: 0.0, pad_y: 160.0 };
        let dyn_out = out.into_dyn();
        let dets = YoloDetector::postprocess(&dyn_out.view(), (1280, 640), letterbox, &params).unwrap();

        assert_eq!(dets.len(), 1);
        assert_eq!(dets[0].class_id, 1);
        assert_eq!(dets[0].bbox, [540.0, 270.0, 740.0, 370.0]);
    }

    #[test]
    fn postprocess_rejects_extra_output_dimensions() {
        let out = ndarray::Array4::<f32>::zeros((1, 6, 2, 1)).into_dyn();
        let params = InferenceParams {
            confidence: 0.5,
            overlap: 0.3,
            input_size: (640, 640),
        };
        let letterbox = Letterbox { scale: 1.0, pad_x: 0.0, pad_y: 0.0 };
        let err = YoloDetector::postprocess(&out.view(), (640, 640), letterbox, &params).unwrap_err();
        assert!(matches!(err, MockupError::Detection(_)));
    }

    #[test]
    fn missing_model_is_a_detection_error() {
        let err = YoloDetector::new(Path::new("/nonexistent/model.onnx"), &[]).err();
        assert!(matches!(err, Some(MockupError::Detection(_))));
    }
}
