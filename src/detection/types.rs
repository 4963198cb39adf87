use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{MockupError, MockupResult};

/// Axis-aligned box in source-image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl BoundingBox {
    pub fn from_xyxy([x_min, y_min, x_max, y_max]: [f32; 4]) -> Self {
        Self { x_min, y_min, x_max, y_max }
    }
}

/// One recognised UI element.
///
/// Width and height are derived exactly once, at construction, so the
/// annotated image and the generated markup can never disagree about the
/// geometry of an element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    bbox: BoundingBox,
    width: f32,
    height: f32,
    class_label: String,
    /// Informational only; nothing downstream of the detector reads it.
    #[serde(skip_serializing_if = "Option::is_none")]
    confidence: Option<f32>,
}

impl Detection {
    /// Zero-area boxes are accepted; non-finite or inverted ones are not.
    pub fn new(bbox: BoundingBox, class_label: impl Into<String>) -> MockupResult<Self> {
        let class_label = class_label.into();
        let coords = [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max];
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(MockupError::Synthesis(format!(
                "non-finite box {coords:?} for class '{class_label}'"
            )));
        }
        if bbox.x_max < bbox.x_min || bbox.y_max < bbox.y_min {
            return Err(MockupError::Synthesis(format!(
                "inverted box {coords:?} for class '{class_label}'"
            )));
        }

        Ok(Self {
            bbox,
            width: bbox.x_max - bbox.x_min,
            height: bbox.y_max - bbox.y_min,
            class_label,
            confidence: None,
        })
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn class_label(&self) -> &str {
        &self.class_label
    }

    pub fn confidence(&self) -> Option<f32> {
        self.confidence
    }

    /// Integer placement: each component truncated toward zero.
    pub fn pixel_rect(&self) -> PixelRect {
        PixelRect {
            left: self.bbox.x_min as i64,
            top: self.bbox.y_min as i64,
            width: self.width as i64,
            height: self.height as i64,
        }
    }
}

/// Whole-pixel placement shared by the annotated image and the markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

impl PixelRect {
    pub fn right(&self) -> i64 {
        self.left.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i64 {
        self.top.saturating_add(self.height)
    }
}

/// One result as handed back by a detector backend: parallel box/class
/// arrays plus the index → label table of the model that produced them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawResult {
    /// `[x_min, y_min, x_max, y_max]` per candidate.
    pub boxes: Vec<[f32; 4]>,
    pub classes: Vec<usize>,
    /// Either empty or parallel to `boxes`.
    #[serde(default)]
    pub confidences: Vec<f32>,
    pub names: BTreeMap<usize, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> BoundingBox {
        BoundingBox { x_min, y_min, x_max, y_max }
    }

    #[test]
    fn derives_size_from_corners() {
        let det = Detection::new(bbox(10.0, 20.0, 110.5, 70.25), "button").unwrap();
        assert_eq!(det.width(), 100.5);
        assert_eq!(det.height(), 50.25);
        assert_eq!(det.class_label(), "button");
        assert_eq!(det.confidence(), None);
    }

    #[test]
    fn pixel_rect_truncates_toward_zero() {
        let det = Detection::new(bbox(-3.7, 20.9, 10.2, 71.0), "image").unwrap();
        let rect = det.pixel_rect();
        assert_eq!(rect.left, -3);
        assert_eq!(rect.top, 20);
        assert_eq!(rect.width, 13);
        assert_eq!(rect.height, 50);
        assert_eq!(rect.right(), 10);
        assert_eq!(rect.bottom(), 70);
    }

    #[test]
    fn zero_area_box_is_allowed() {
        let det = Detection::new(bbox(5.0, 5.0, 5.0, 5.0), "text").unwrap();
        assert_eq!(det.width(), 0.0);
        assert_eq!(det.height(), 0.0);
    }

    #[test]
    fn inverted_box_is_rejected() {
        let err = Detection::new(bbox(50.0, 0.0, 10.0, 10.0), "card").unwrap_err();
        assert!(matches!(err, MockupError::Synthesis(_)));
    }

    #[test]
    fn nan_coordinate_is_rejected() {
        let err = Detection::new(bbox(0.0, f32::NAN, 10.0, 10.0), "card").unwrap_err();
        assert!(matches!(err, MockupError::Synthesis(_)));
    }

    #[test]
    fn raw_result_reads_string_keyed_name_table() {
        let raw: RawResult = serde_json::from_str(
            r#"{"boxes": [[0, 0, 4, 4]], "classes": [1], "names": {"0": "button", "1": "card"}}"#,
        )
        .unwrap();
        assert_eq!(raw.names.get(&1).map(String::as_str), Some("card"));
        assert!(raw.confidences.is_empty());
    }
}
