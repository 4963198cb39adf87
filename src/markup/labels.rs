use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{MockupError, MockupResult};

/// Labels that are safe as both an HTML id and a CSS id selector, and that
/// cannot end in a digit (so `{label}{index}` splits unambiguously).
const SAFE_LABEL_PATTERN: &str = r"^[A-Za-z_](?:[A-Za-z0-9_-]*[A-Za-z_-])?$";

fn safe_label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(SAFE_LABEL_PATTERN).expect("identifier pattern is valid"))
}

/// How class labels coming from the detector are turned into element ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPolicy {
    /// Reject any label that is not a safe identifier.
    Strict,
    /// Rewrite unsafe labels into safe identifiers.
    Sanitize,
    /// Use labels verbatim; the detector vocabulary is trusted.
    #[default]
    Trusted,
}

pub fn is_safe_label(label: &str) -> bool {
    safe_label_regex().is_match(label)
}

/// Replaces characters outside `[A-Za-z0-9_-]` with `_` and pads with `_` so
/// the result neither starts nor ends with a digit.
pub fn sanitize_label(label: &str) -> String {
    let mut out: String = label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    if !out.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        out.insert(0, '_');
    }
    if out.ends_with(|c: char| c.is_ascii_digit()) {
        out.push('_');
    }
    out
}

impl LabelPolicy {
    /// Identifier stem for `label` under this policy.
    pub fn stem<'a>(&self, label: &'a str) -> MockupResult<Cow<'a, str>> {
        match self {
            LabelPolicy::Trusted => Ok(Cow::Borrowed(label)),
            _ if is_safe_label(label) => Ok(Cow::Borrowed(label)),
            LabelPolicy::Strict => Err(MockupError::Synthesis(format!(
                "class label '{label}' is not a safe identifier"
            ))),
            LabelPolicy::Sanitize => {
                let stem = sanitize_label(label);
                tracing::debug!(label = %label, stem = %stem, "class label sanitized");
                Ok(Cow::Owned(stem))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_labels_are_safe() {
        for label in ["button", "card", "footer", "header", "image", "search_bar", "text", "x", "_", "a-b"] {
            assert!(is_safe_label(label), "{label}");
        }
    }

    #[test]
    fn unsafe_labels_are_detected() {
        for label in ["", "traffic light", "9lives", "x1", "a\"b", "<script>", "-a", "é"] {
            assert!(!is_safe_label(label), "{label}");
        }
    }

    #[test]
    fn sanitized_labels_are_safe() {
        for label in ["", "traffic light", "9", "x1", "a\"b", "<script>", "-a", "é"] {
            let stem = sanitize_label(label);
            assert!(is_safe_label(&stem), "{label} -> {stem}");
        }
        assert_eq!(sanitize_label("traffic light"), "traffic_light");
        assert_eq!(sanitize_label("x1"), "x1_");
    }

    #[test]
    fn default_policy_keeps_labels_verbatim() {
        assert_eq!(LabelPolicy::default(), LabelPolicy::Trusted);
        assert_eq!(LabelPolicy::default().stem("nav bar").unwrap(), "nav bar");
    }

    #[test]
    fn policy_dispatch() {
        assert_eq!(LabelPolicy::Strict.stem("button").unwrap(), "button");
        assert!(matches!(
            LabelPolicy::Strict.stem("a b"),
            Err(MockupError::Synthesis(_))
        ));
        assert_eq!(LabelPolicy::Sanitize.stem("a b").unwrap(), "a_b");
        assert_eq!(LabelPolicy::Trusted.stem("a b").unwrap(), "a b");
    }
}
