use std::fmt::{self, Write};

use crate::markup::model::{CssRule, Document, Element, Node, DETECTED_OBJECT_CLASS};

const INDENT: &str = "    ";

/// Escapes text content and double-quoted attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn write_rule(f: &mut impl Write, rule: &CssRule) -> fmt::Result {
    writeln!(f, "{INDENT}{INDENT}#{} {{", rule.id)?;
    writeln!(f, "{INDENT}{INDENT}{INDENT}left: {}px;", rule.left)?;
    writeln!(f, "{INDENT}{INDENT}{INDENT}top: {}px;", rule.top)?;
    writeln!(f, "{INDENT}{INDENT}{INDENT}width: {}px;", rule.width)?;
    writeln!(f, "{INDENT}{INDENT}{INDENT}height: {}px;", rule.height)?;
    writeln!(f, "{INDENT}{INDENT}}}")
}

fn write_element(f: &mut impl Write, el: &Element) -> fmt::Result {
    write!(f, "<{}", el.tag)?;
    for (name, value) in &el.attrs {
        write!(f, " {}=\"{}\"", name, escape_html(value))?;
    }
    f.write_char('>')?;
    if el.is_void() {
        return Ok(());
    }
    for child in &el.children {
        match child {
            Node::Element(inner) => write_element(f, inner)?,
            Node::Text(text) => f.write_str(&escape_html(text))?,
        }
    }
    write!(f, "</{}>", el.tag)
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<!DOCTYPE html>")?;
        writeln!(f, "<html lang=\"en\">")?;
        writeln!(f, "<head>")?;
        writeln!(f, "{INDENT}<meta charset=\"UTF-8\">")?;
        writeln!(
            f,
            "{INDENT}<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
        )?;
        writeln!(f, "{INDENT}<title>{}</title>", escape_html(&self.title))?;
        writeln!(f, "{INDENT}<style>")?;
        writeln!(f, "{INDENT}{INDENT}.{DETECTED_OBJECT_CLASS} {{")?;
        writeln!(f, "{INDENT}{INDENT}{INDENT}position: absolute;")?;
        writeln!(f, "{INDENT}{INDENT}{INDENT}border: 1px solid red;")?;
        writeln!(f, "{INDENT}{INDENT}}}")?;
        for rule in &self.rules {
            write_rule(f, rule)?;
        }
        writeln!(f, "{INDENT}</style>")?;
        writeln!(f, "</head>")?;
        writeln!(f, "<body>")?;
        for fragment in &self.fragments {
            f.write_str(INDENT)?;
            write_element(f, &fragment.root)?;
            writeln!(f)?;
        }
        writeln!(f, "</body>")?;
        writeln!(f, "</html>")
    }
}

impl Document {
    pub fn to_html(&self) -> String {
        self.to_string()
    }
}
