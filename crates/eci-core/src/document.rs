//! Read-only view of a parsed answer page.
//!
//! The fetch layer turns markup into a [`Document`] (or any other
//! [`DocumentTree`] implementation); extractors only ever see this view and
//! never touch raw markup.

use serde::{Deserialize, Serialize};

use crate::text::{clean_for_matching, normalize_whitespace};

/// Per-call context threaded through every extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseContext {
    /// Initiative registration number, e.g. `ECI(2019)000007`.
    pub registration_number: String,
}

impl ParseContext {
    pub fn new(registration_number: impl Into<String>) -> Self {
        Self {
            registration_number: registration_number.into(),
        }
    }
}

/// How to recognise a section heading: by element id, or by (case-insensitive)
/// heading text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingSelector {
    #[serde(default)]
    pub id: Option<String>,
    pub text: String,
}

impl HeadingSelector {
    pub fn new(id: Option<&str>, text: &str) -> Self {
        Self {
            id: id.map(str::to_string),
            text: text.to_string(),
        }
    }

    fn matches(&self, element: &Element) -> bool {
        if let (Some(want), Some(have)) = (&self.id, &element.id)
            && want.eq_ignore_ascii_case(have)
        {
            return true;
        }
        let wanted = clean_for_matching(&self.text);
        !wanted.is_empty() && clean_for_matching(&element.text).contains(&wanted)
    }
}

/// An outbound link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Heading { level: u8 },
    Paragraph,
    List,
    ListItem,
    Other,
}

/// One block-level element.
///
/// `text` is the element's text content with inline links flattened to their
/// link text. Lists carry their items in `children`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub kind: ElementKind,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub children: Vec<Element>,
}

impl Element {
    pub fn heading(level: u8, id: Option<&str>, text: &str) -> Self {
        Self {
            kind: ElementKind::Heading { level },
            id: id.map(str::to_string),
            text: text.to_string(),
            links: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn paragraph(text: &str) -> Self {
        Self {
            kind: ElementKind::Paragraph,
            id: None,
            text: text.to_string(),
            links: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let children: Vec<Element> = items
            .into_iter()
            .map(|item| Element {
                kind: ElementKind::ListItem,
                ..Element::paragraph(item.as_ref())
            })
            .collect();
        Self {
            kind: ElementKind::List,
            id: None,
            text: String::new(),
            links: Vec::new(),
            children,
        }
    }

    /// Attach an outbound link.
    pub fn with_link(mut self, href: &str, text: &str) -> Self {
        self.links.push(Link {
            href: href.to_string(),
            text: text.to_string(),
        });
        self
    }

    pub fn heading_level(&self) -> Option<u8> {
        match self.kind {
            ElementKind::Heading { level } => Some(level),
            _ => None,
        }
    }

    pub fn is_heading(&self) -> bool {
        self.heading_level().is_some()
    }

    /// Whitespace-normalised text content, including list items (one per line).
    pub fn text_content(&self) -> String {
        let own = normalize_whitespace(&self.text);
        if self.children.is_empty() {
            return own;
        }
        let mut parts: Vec<String> = Vec::with_capacity(self.children.len() + 1);
        if !own.is_empty() {
            parts.push(own);
        }
        parts.extend(
            self.children
                .iter()
                .map(Element::text_content)
                .filter(|t| !t.is_empty()),
        );
        parts.join("\n")
    }

    /// The smallest text-bearing units: the element itself, or its list items.
    pub fn blocks(&self) -> Vec<&Element> {
        if self.children.is_empty() {
            return vec![self];
        }
        self.children.iter().flat_map(Element::blocks).collect()
    }

    /// Links on this element and all descendants.
    pub fn all_links(&self) -> Vec<&Link> {
        let mut out: Vec<&Link> = self.links.iter().collect();
        for child in &self.children {
            out.extend(child.all_links());
        }
        out
    }

    /// Whether the element carries any text worth scanning.
    pub fn is_significant(&self) -> bool {
        !self.text.trim().is_empty() || self.children.iter().any(Element::is_significant)
    }
}

/// Capability the extractors need from a parsed page.
pub trait DocumentTree {
    /// Index of the first heading matching `selector`.
    fn find_heading(&self, selector: &HeadingSelector) -> Option<usize>;

    /// Significant elements following the heading at `index`, up to the next
    /// heading of the same or a higher level.
    fn section(&self, index: usize) -> Vec<&Element>;

    /// Every outbound link in the document.
    fn links(&self) -> Vec<&Link>;

    /// The document's full text, one block per line.
    fn raw_text(&self) -> String;
}

/// Owned, flat list of top-level elements in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub elements: Vec<Element>,
}

impl Document {
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    pub fn push(&mut self, element: Element) -> &mut Self {
        self.elements.push(element);
        self
    }
}

impl DocumentTree for Document {
    fn find_heading(&self, selector: &HeadingSelector) -> Option<usize> {
        self.elements
            .iter()
            .position(|e| e.is_heading() && selector.matches(e))
    }

    fn section(&self, index: usize) -> Vec<&Element> {
        let Some(level) = self.elements.get(index).and_then(Element::heading_level) else {
            return Vec::new();
        };

        self.elements[index + 1..]
            .iter()
            .take_while(|e| e.heading_level().is_none_or(|l| l > level))
            .filter(|e| e.is_significant())
            .collect()
    }

    fn links(&self) -> Vec<&Link> {
        self.elements.iter().flat_map(Element::all_links).collect()
    }

    fn raw_text(&self) -> String {
        self.elements
            .iter()
            .map(Element::text_content)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
