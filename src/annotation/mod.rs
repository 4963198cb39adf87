pub mod annotator;
pub mod font;

pub use annotator::{annotate, AnnotationStyle};
