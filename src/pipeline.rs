/// Mockup pipeline: detection → annotated image + synthesized markup.
///
/// One run is synchronous and single-attempt:
///
/// 1. Decode the source image (rejected as an input error if unreadable).
/// 2. Run the injected detector with the caller's thresholds.
/// 3. Normalise the raw output into a detection list and build the page
///    model; a rejected detection stops the run before anything is written.
/// 4. Write the annotated copy as `processed_<name>`.
/// 5. Write the synthesized page as `new_test_<stem>.html`.
///
/// A failure in step 5 leaves the step 4 artifact on disk.
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader};
use serde::Serialize;

use crate::annotation::{annotate, AnnotationStyle};
use crate::config::AppConfig;
use crate::detection::{adapt, Detection, Detector, InferenceParams};
use crate::errors::{MockupError, MockupResult};
use crate::markup::MarkupSynthesizer;

const PROCESSED_PREFIX: &str = "processed_";
const MARKUP_PREFIX: &str = "new_test_";

/// Names of both artifacts plus the detections they were built from.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub image_filename: String,
    pub markup_filename: String,
    pub detections: Vec<Detection>,
}

/// Derives `(processed_<basename>, new_test_<stem>.html)` from the input path.
pub fn output_filenames(image_path: &Path) -> MockupResult<(String, String)> {
    let invalid = || MockupError::Input(format!("unusable image filename: {}", image_path.display()));
    let basename = image_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(invalid)?;
    let stem = image_path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(invalid)?;

    Ok((
        format!("{PROCESSED_PREFIX}{basename}"),
        format!("{MARKUP_PREFIX}{stem}.html"),
    ))
}

/// Reads and decodes an image, mapping every failure to an input error.
pub fn load_image(image_path: &Path) -> MockupResult<DynamicImage> {
    if !image_path.is_file() {
        return Err(MockupError::Input(format!(
            "image not found: {}",
            image_path.display()
        )));
    }
    let img = ImageReader::open(image_path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| MockupError::Input(format!("cannot open {}: {e}", image_path.display())))?
        .decode()
        .map_err(|e| MockupError::Input(format!("cannot decode {}: {e}", image_path.display())))?;
    tracing::debug!(
        path = %image_path.display(),
        width = img.width(),
        height = img.height(),
        "image decoded"
    );
    Ok(img)
}

/// Owns the detector handle for its lifetime; the entry point decides which
/// backend that is.
pub struct Pipeline<D: Detector> {
    detector: D,
    style: AnnotationStyle,
    synthesizer: MarkupSynthesizer,
    input_size: u32,
    processed_dir: PathBuf,
}

impl<D: Detector> Pipeline<D> {
    pub fn new(detector: D, config: &AppConfig) -> Self {
        Self {
            detector,
            style: AnnotationStyle::from(&config.annotation),
            synthesizer: MarkupSynthesizer::new(&config.markup),
            input_size: config.detector.input_size,
            processed_dir: config.output.processed_dir.clone(),
        }
    }

    pub fn with_processed_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.processed_dir = dir.into();
        self
    }

    pub fn with_synthesizer(mut self, synthesizer: MarkupSynthesizer) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    pub fn processed_dir(&self) -> &Path {
        &self.processed_dir
    }

    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Runs the detector and the adapter only; no files are touched.
    pub fn detect(&mut self, image: &DynamicImage, confidence: f32, overlap: f32) -> MockupResult<Vec<Detection>> {
        let params = InferenceParams {
            confidence,
            overlap,
            input_size: (self.input_size, self.input_size),
        };
        tracing::debug!(
            detector = self.detector.name(),
            confidence,
            overlap,
            size = self.input_size,
            "running detector"
        );
        let raw = self.detector.predict(image, &params)?;
        adapt(&raw)
    }

    /// Runs the whole pipeline for one stored image and returns the names of
    /// the two artifacts written under the processed directory.
    pub fn process_image(&mut self, image_path: &Path, confidence: f32, overlap: f32) -> MockupResult<PipelineOutput> {
        let (image_filename, markup_filename) = output_filenames(image_path)?;
        let source = load_image(image_path)?;

        let detections = self.detect(&source, confidence, overlap)?;
        tracing::info!(
            image = %image_path.display(),
            detections = detections.len(),
            "detection complete"
        );

        let document = self.synthesizer.build(&detections)?;

        std::fs::create_dir_all(&self.processed_dir)?;

        let annotated = annotate(&source, &detections, &self.style);
        let image_out = self.processed_dir.join(&image_filename);
        annotated.save(&image_out)?;
        tracing::info!(path = %image_out.display(), "annotated image written");

        let markup_out = self.processed_dir.join(&markup_filename);
        std::fs::write(&markup_out, document.to_html())?;
        tracing::info!(path = %markup_out.display(), "markup written");

        Ok(PipelineOutput {
            image_filename,
            markup_filename,
            detections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_follow_input_name() {
        let (img, html) = output_filenames(Path::new("uploads/login page.png")).unwrap();
        assert_eq!(img, "processed_login page.png");
        assert_eq!(html, "new_test_login page.html");
    }

    #[test]
    fn filenames_keep_only_last_extension() {
        let (img, html) = output_filenames(Path::new("mock.v2.jpeg")).unwrap();
        assert_eq!(img, "processed_mock.v2.jpeg");
        assert_eq!(html, "new_test_mock.v2.html");
    }

    #[test]
    fn path_without_filename_is_rejected() {
        assert!(matches!(
            output_filenames(Path::new("/")),
            Err(MockupError::Input(_))
        ));
    }

    #[test]
    fn missing_image_is_an_input_error() {
        assert!(matches!(
            load_image(Path::new("/nonexistent/mockup.png")),
            Err(MockupError::Input(_))
        ));
    }
}
