//! Minimal typed page model.
//!
//! The theme runtime operates on an explicit element tree instead of
//! querying an ambient document: elements carry the tag, class list,
//! attributes and state the theme layer reads and writes, and the
//! controller holds typed references ([`NodeId`]) into the tree. Queries
//! return descendants in document order (preorder).

use std::collections::BTreeMap;

use crate::forms::FormData;

/// Handle to an element in a [`Page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Attached 3D model viewer state (`<product-model>` elements).
#[derive(Debug, Clone, Default)]
pub struct ModelViewer {
    /// Whether the viewer is currently playing.
    pub playing: bool,
}

/// A page element.
///
/// Deliberately a grab-bag, like the thing it models: most fields are
/// meaningful only for some tags (`playing` for `video`, `fields` for
/// `form`, `posted_messages` for embedded players).
#[derive(Debug, Clone, Default)]
pub struct Element {
    /// Lowercase tag name.
    pub tag: String,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    /// Text content; the submit button label and cart badges live here.
    pub text: String,
    pub hidden: bool,
    pub disabled: bool,
    /// Playback state for `video` elements.
    pub playing: bool,
    /// Outbound messages posted to an embedded player frame.
    pub posted_messages: Vec<String>,
    /// Attached model viewer, if any (`product-model` elements).
    pub model_viewer: Option<ModelViewer>,
    /// Control snapshot for `form` elements.
    pub fields: FormData,
    children: Vec<NodeId>,
}

impl Element {
    /// Create an element with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Builder: add a class.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.add_class(class);
        self
    }

    /// Builder: set an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Builder: set text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builder: set form fields.
    #[must_use]
    pub fn with_fields(mut self, fields: FormData) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add a class if not already present.
    pub fn add_class(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !self.has_class(&class) {
            self.classes.push(class);
        }
    }

    /// Remove a class if present.
    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Overwrite the whole class list from a space-separated string.
    pub fn set_class_list(&mut self, classes: &str) {
        self.classes = classes.split_whitespace().map(str::to_string).collect();
    }

    /// The class list, in order.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Attribute value, if set.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Whether this element can receive keyboard focus.
    ///
    /// Allow-list: links with an `href`, non-disabled form controls,
    /// embedded content, elements with an explicit non-negative `tabindex`,
    /// editable regions, media with controls, and `summary`.
    #[must_use]
    pub fn is_focusable(&self) -> bool {
        match self.tag.as_str() {
            "a" | "area" => self.attr("href").is_some(),
            "input" | "select" | "textarea" | "button" => !self.disabled,
            "iframe" | "object" | "embed" | "summary" => true,
            "audio" | "video" => self.attr("controls").is_some(),
            _ => {
                self.attrs.contains_key("contenteditable")
                    || self
                        .attr("tabindex")
                        .is_some_and(|t| t.starts_with(|c: char| c.is_ascii_digit()))
            }
        }
    }
}

/// An element tree with a focus cursor.
#[derive(Debug, Clone)]
pub struct Page {
    nodes: Vec<Element>,
    active: Option<NodeId>,
}

impl Page {
    /// Create a page holding only the document root (`html`).
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Element::new("html")],
            active: None,
        }
    }

    /// The document root.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append an element under `parent`, returning its handle.
    pub fn append(&mut self, parent: NodeId, element: Element) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(element);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Immutable element access.
    #[must_use]
    pub fn get(&self, id: NodeId) -> &Element {
        &self.nodes[id.0]
    }

    /// Mutable element access.
    pub fn get_mut(&mut self, id: NodeId) -> &mut Element {
        &mut self.nodes[id.0]
    }

    /// The focused element, if any.
    #[must_use]
    pub const fn active(&self) -> Option<NodeId> {
        self.active
    }

    /// Move focus to an element.
    pub const fn focus(&mut self, id: NodeId) {
        self.active = Some(id);
    }

    /// Descendants of `root` (excluding `root` itself) in document order.
    #[must_use]
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[root.0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev());
        }
        out
    }

    /// Descendants of `root` carrying `class`, in document order.
    #[must_use]
    pub fn query_class(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        self.query(root, |el| el.has_class(class))
    }

    /// Descendants of `root` with attribute `name` set, in document order.
    #[must_use]
    pub fn query_attr(&self, root: NodeId, name: &str) -> Vec<NodeId> {
        self.query(root, |el| el.attr(name).is_some())
    }

    /// Descendants of `root` with the given tag, in document order.
    #[must_use]
    pub fn query_tag(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        self.query(root, |el| el.tag == tag)
    }

    /// First descendant of `root` carrying `class`.
    #[must_use]
    pub fn find_class(&self, root: NodeId, class: &str) -> Option<NodeId> {
        self.query_class(root, class).into_iter().next()
    }

    /// First descendant of `root` with attribute `name` set.
    #[must_use]
    pub fn find_attr(&self, root: NodeId, name: &str) -> Option<NodeId> {
        self.query_attr(root, name).into_iter().next()
    }

    fn query<F: Fn(&Element) -> bool>(&self, root: NodeId, pred: F) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|id| pred(&self.nodes[id.0]))
            .collect()
    }

    /// Focusable descendants of `root`, in document order.
    #[must_use]
    pub fn focusables(&self, root: NodeId) -> Vec<NodeId> {
        self.query(root, Element::is_focusable)
    }

    /// Default sequential focus movement over the document's focusable
    /// set, used when no trap consumes a Tab key.
    pub fn advance_focus(&mut self, backward: bool) {
        let order = self.focusables(self.root());
        if order.is_empty() {
            return;
        }

        let position = self.active.and_then(|active| {
            order.iter().position(|&id| id == active)
        });

        let next = match (position, backward) {
            (Some(i), false) => order[(i + 1) % order.len()],
            (Some(i), true) => order[(i + order.len() - 1) % order.len()],
            (None, false) => order[0],
            (None, true) => order[order.len() - 1],
        };
        self.active = Some(next);
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}
