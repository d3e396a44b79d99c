use once_cell::sync::Lazy;
use smallvec::SmallVec;
use std::collections::HashSet;

/// Fixed tag and attribute vocabulary of an FSML document.
pub mod tags {
    pub const SCHEMA: &str = "Schema";
    pub const STATES: &str = "States";
    pub const EVENTS: &str = "Events";
    pub const TASK: &str = "Task";

    pub const ON_BEFORE_EVENT: &str = "OnBeforeEvent";
    pub const ON_AFTER_EVENT: &str = "OnAfterEvent";
    pub const ON_STATE_SET: &str = "OnStateSet";

    pub const TARGET_STATE: &str = "targetState";
    pub const ERROR_STATE: &str = "errorState";
}

static STRUCTURAL_TAGS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    let mut s = HashSet::with_capacity(8);
    s.insert(tags::SCHEMA);
    s.insert(tags::STATES);
    s.insert(tags::EVENTS);
    s.insert(tags::TASK);
    s.insert(tags::ON_BEFORE_EVENT);
    s.insert(tags::ON_AFTER_EVENT);
    s.insert(tags::ON_STATE_SET);
    s
});

/// Returns true for tag names with a fixed meaning in the document grammar.
pub fn is_structural_tag(name: &str) -> bool {
    STRUCTURAL_TAGS.contains(name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Element,
    Text,
    /// Element whose closing tag named something else.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

pub type Attributes = SmallVec<[Attribute; 2]>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Tag name for elements, the text itself for text nodes.
    pub name: String,
    pub kind: NodeKind,
    pub attributes: Attributes,
    pub children: Vec<Node>,
}

impl Node {
    pub fn element(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Element,
            attributes: SmallVec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self {
            name: value.into(),
            kind: NodeKind::Text,
            attributes: SmallVec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute::new(name, value));
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(|c| c.is_element())
    }

    /// Text of the first text child, if any.
    pub fn text_content(&self) -> Option<&str> {
        self.children
            .iter()
            .find(|c| c.kind == NodeKind::Text)
            .map(|c| c.name.as_str())
    }

    /// Value of the last attribute with the given name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .rev()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }
}
