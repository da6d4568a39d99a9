// src/document/mod.rs
//! Read-only view over parsed markup.
//!
//! The extractors only ever talk to [`DocumentView`]; [`HtmlView`] is the
//! `scraper`-backed implementation used by the binary and the tests.

use scraper::{node::Node, ElementRef, Html, Selector};

/// A structurally queryable node of a parsed document.
pub trait DocumentView: Clone {
    /// Descendant elements matching a CSS selector, in document order.
    fn select(&self, selector: &str) -> Vec<Self>;

    /// Direct element children, in document order.
    fn children(&self) -> Vec<Self>;

    /// Text of this node's own text children, without descendants.
    fn text(&self) -> String;

    /// All descendant text with whitespace runs collapsed to single spaces.
    /// Block boundaries separate words; inline markup does not.
    fn normalized_text(&self) -> String;

    /// Lower-case element name.
    fn tag(&self) -> String;

    fn attr(&self, name: &str) -> Option<String>;
}

/// Owns a parsed HTML document.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// Wraps a bare text blob so it can be handed to the pattern-text strategy.
    pub fn from_text(text: &str) -> Self {
        let mut markup = String::with_capacity(text.len() + 32);
        markup.push_str("<html><body><pre>");
        for ch in text.chars() {
            match ch {
                '<' => markup.push_str("&lt;"),
                '>' => markup.push_str("&gt;"),
                '&' => markup.push_str("&amp;"),
                _ => markup.push(ch),
            }
        }
        markup.push_str("</pre></body></html>");
        Self::parse(&markup)
    }

    pub fn root(&self) -> HtmlView<'_> {
        HtmlView::new(self.html.root_element())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HtmlView<'a> {
    element: ElementRef<'a>,
}

impl<'a> HtmlView<'a> {
    pub fn new(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    pub fn element(&self) -> ElementRef<'a> {
        self.element
    }
}

impl<'a> DocumentView for HtmlView<'a> {
    fn select(&self, selector: &str) -> Vec<Self> {
        match Selector::parse(selector) {
            Ok(parsed) => self.element.select(&parsed).map(HtmlView::new).collect(),
            Err(err) => {
                tracing::warn!("Ignoring unparsable selector '{}': {:?}", selector, err);
                Vec::new()
            }
        }
    }

    fn children(&self) -> Vec<Self> {
        self.element
            .children()
            .filter_map(ElementRef::wrap)
            .map(HtmlView::new)
            .collect()
    }

    fn text(&self) -> String {
        let mut own = String::new();
        for node in self.element.children() {
            if let Node::Text(text_node) = node.value() {
                own.push_str(&text_node.text);
            }
        }
        collapse_whitespace(&own)
    }

    fn normalized_text(&self) -> String {
        let mut out = String::new();
        // `None` marks the end of a block element.
        let mut work: Vec<Option<_>> = self.element.children().rev().map(Some).collect();
        while let Some(step) = work.pop() {
            let Some(node) = step else {
                out.push(' ');
                continue;
            };
            match node.value() {
                Node::Text(text) => out.push_str(&text.text),
                Node::Element(element) => {
                    if is_block(element.name()) {
                        out.push(' ');
                        work.push(None);
                    }
                    work.extend(node.children().rev().map(Some));
                }
                _ => {}
            }
        }
        collapse_whitespace(&out)
    }

    fn tag(&self) -> String {
        self.element.value().name().to_ascii_lowercase()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.element.value().attr(name).map(str::to_string)
    }
}

fn is_block(tag: &str) -> bool {
    matches!(
        tag.to_ascii_lowercase().as_str(),
        "address" | "article" | "aside" | "blockquote" | "br" | "dd" | "details" | "div" | "dl" | "dt"
            | "footer" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "header" | "hr" | "li" | "main"
            | "nav" | "ol" | "p" | "pre" | "section" | "summary" | "table" | "tbody" | "td" | "tfoot"
            | "th" | "thead" | "tr" | "ul"
    )
}

/// Collapses every run of Unicode whitespace (NBSP included) to one space and trims.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
