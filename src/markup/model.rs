//! Explicit document model for the generated page: ordered CSS rules and
//! body fragments, serialized in one step by `markup::render`.

/// Class shared by every generated fragment root; carries the absolute
/// positioning rule.
pub const DETECTED_OBJECT_CLASS: &str = "detected-object";

/// Absolute placement of one detection, in whole pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssRule {
    pub id: String,
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Sets `name`, replacing an existing value in place.
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Puts `id` and the shared class first on the element, whatever the
    /// template set.
    pub(crate) fn with_identity(mut self, id: &str) -> Self {
        self.attrs.retain(|(n, _)| *n != "id" && *n != "class");
        self.attrs.insert(0, ("id", id.to_string()));
        self.attrs.insert(1, ("class", DETECTED_OBJECT_CLASS.to_string()));
        self
    }

    /// Elements that never have a closing tag in HTML.
    pub fn is_void(&self) -> bool {
        matches!(self.tag, "img" | "input" | "br" | "hr" | "meta")
    }
}

/// HTML fragment generated for one detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub id: String,
    pub root: Element,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub rules: Vec<CssRule>,
    pub fragments: Vec<Fragment>,
}
