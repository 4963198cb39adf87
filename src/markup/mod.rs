pub mod labels;
pub mod model;
pub mod render;
pub mod templates;

pub use labels::LabelPolicy;
pub use model::{CssRule, Document, Element, Fragment, Node, DETECTED_OBJECT_CLASS};
pub use templates::{FragmentBuilder, FragmentContext, TemplateTable};

use crate::config::MarkupConfig;
use crate::detection::types::Detection;
use crate::errors::MockupResult;

/// Turns a detection list into a positioned HTML/CSS document.
///
/// Every detection gets a CSS rule keyed `#{label}{index}`; only labels with
/// a registered template get a body fragment. Output is a pure function of
/// the detection list, the table and the settings.
#[derive(Debug, Clone)]
pub struct MarkupSynthesizer {
    table: TemplateTable,
    policy: LabelPolicy,
    default_image: String,
    title: String,
}

impl MarkupSynthesizer {
    pub fn new(config: &MarkupConfig) -> Self {
        Self {
            table: TemplateTable::standard(),
            policy: config.label_policy,
            default_image: config.default_image.clone(),
            title: config.title.clone(),
        }
    }

    pub fn with_table(mut self, table: TemplateTable) -> Self {
        self.table = table;
        self
    }

    pub fn table(&self) -> &TemplateTable {
        &self.table
    }

    pub fn build(&self, detections: &[Detection]) -> MockupResult<Document> {
        let mut rules = Vec::with_capacity(detections.len());
        let mut fragments = Vec::new();

        for (index, det) in detections.iter().enumerate() {
            let stem = self.policy.stem(det.class_label())?;
            let id = format!("{stem}{index}");
            let rect = det.pixel_rect();

            rules.push(CssRule {
                id: id.clone(),
                left: rect.left,
                top: rect.top,
                width: rect.width,
                height: rect.height,
            });

            match self.table.get(det.class_label()) {
                Some(builder) => {
                    let ctx = FragmentContext {
                        id: &id,
                        default_image: &self.default_image,
                    };
                    let root = builder(&ctx).with_identity(&id);
                    fragments.push(Fragment { id, root });
                }
                None => {
                    tracing::debug!(label = %det.class_label(), index, "no template; rule only");
                }
            }
        }

        tracing::debug!(rules = rules.len(), fragments = fragments.len(), "document built");
        Ok(Document {
            title: self.title.clone(),
            rules,
            fragments,
        })
    }

    pub fn synthesize(&self, detections: &[Detection]) -> MockupResult<String> {
        Ok(self.build(detections)?.to_html())
    }
}

impl Default for MarkupSynthesizer {
    fn default() -> Self {
        Self::new(&MarkupConfig::default())
    }
}
