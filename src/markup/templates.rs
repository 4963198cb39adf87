/// Per-class fragment templates.
///
/// The table maps a class label to a builder function. Adding an element
/// class means registering one more entry; the synthesizer never branches on
/// labels itself.
use std::collections::BTreeMap;

use crate::markup::model::Element;

/// Inputs available to a fragment builder.
#[derive(Debug, Clone, Copy)]
pub struct FragmentContext<'a> {
    /// Identifier shared by the fragment root and its CSS rule.
    pub id: &'a str,
    /// Placeholder asset for image-like fragments.
    pub default_image: &'a str,
}

/// Builds the fragment root. The synthesizer stamps `id` and the shared
/// class onto whatever root is returned.
pub type FragmentBuilder = fn(&FragmentContext<'_>) -> Element;

#[derive(Clone)]
pub struct TemplateTable {
    builders: BTreeMap<String, FragmentBuilder>,
}

impl TemplateTable {
    pub fn empty() -> Self {
        Self {
            builders: BTreeMap::new(),
        }
    }

    /// The seven mockup element classes.
    pub fn standard() -> Self {
        Self::empty()
            .with("image", image_fragment)
            .with("text", text_fragment)
            .with("button", button_fragment)
            .with("header", header_fragment)
            .with("footer", footer_fragment)
            .with("card", card_fragment)
            .with("search_bar", search_bar_fragment)
    }

    /// Registers `builder` for `label`, returning the builder it replaced.
    pub fn register(&mut self, label: impl Into<String>, builder: FragmentBuilder) -> Option<FragmentBuilder> {
        self.builders.insert(label.into(), builder)
    }

    pub fn with(mut self, label: impl Into<String>, builder: FragmentBuilder) -> Self {
        self.register(label, builder);
        self
    }

    pub fn get(&self, label: &str) -> Option<FragmentBuilder> {
        self.builders.get(label).copied()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.builders.contains_key(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.builders.keys().map(String::as_str)
    }
}

impl Default for TemplateTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for TemplateTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.labels()).finish()
    }
}

// ── Standard templates ──────────────────────────────────────────────────────

const NAV_LINK_STYLE: &str =
    "float: left; color: #f2f2f2; text-decoration: none; font-size: 2.5rem; padding: 14px 16px;";

fn placeholder_image(ctx: &FragmentContext<'_>) -> Element {
    Element::new("img")
        .attr("src", ctx.default_image)
        .attr("alt", "Default Image")
}

fn image_fragment(ctx: &FragmentContext<'_>) -> Element {
    placeholder_image(ctx)
}

fn text_fragment(_ctx: &FragmentContext<'_>) -> Element {
    Element::new("div").text("Some random text")
}

fn button_fragment(_ctx: &FragmentContext<'_>) -> Element {
    Element::new("button").text("Button")
}

fn header_fragment(_ctx: &FragmentContext<'_>) -> Element {
    ["Home", "About", "Contact"].into_iter().fold(
        Element::new("nav").attr("style", "background-color: #2196F3;"),
        |nav, label| {
            nav.child(
                Element::new("a")
                    .attr("href", "#")
                    .attr("style", NAV_LINK_STYLE)
                    .text(label),
            )
        },
    )
}

fn footer_fragment(_ctx: &FragmentContext<'_>) -> Element {
    Element::new("footer").text("Footer content")
}

fn card_fragment(ctx: &FragmentContext<'_>) -> Element {
    Element::new("div")
        .child(placeholder_image(ctx))
        .child(Element::new("h3").text("Text for card"))
}

fn search_bar_fragment(ctx: &FragmentContext<'_>) -> Element {
    Element::new("div")
        .child(
            Element::new("input")
                .attr("id", format!("{}-input", ctx.id))
                .attr("type", "text")
                .attr("placeholder", "Search"),
        )
        .child(
            Element::new("button")
                .attr("id", format!("{}-submit", ctx.id))
                .attr("type", "submit")
                .text("Search"),
        )
}
