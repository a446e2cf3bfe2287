//! Render output tree
//!
//! Components produce a [`Node`] per render pass. Elements are immutable once
//! built and shared by reference, so a cached render can be handed back to the
//! host without copying.

use std::rc::Rc;

use super::value::{PropValue, Props};

/// A single element: a kind (host primitive or component name), props and children
#[derive(Clone, Debug)]
pub struct Element {
    kind: String,
    key: Option<String>,
    props: Props,
    children: Vec<Node>,
}

impl Element {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            key: None,
            props: Props::new(),
            children: Vec::new(),
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(name, value);
        self
    }

    pub fn props(mut self, props: Props) -> Self {
        self.props.merge(props);
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        let child = child.into();
        if !matches!(child, Node::Empty) {
            self.children.push(child);
        }
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        for child in children {
            self = self.child(child);
        }
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn key_str(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn prop_values(&self) -> &Props {
        &self.props
    }

    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }
}

/// Output of a render pass
#[derive(Clone, Debug, Default)]
pub enum Node {
    #[default]
    Empty,
    Text(String),
    Element(Rc<Element>),
    Fragment(Vec<Node>),
}

impl Node {
    pub fn is_empty(&self) -> bool {
        matches!(self, Node::Empty)
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Depth-first search for every element of the given kind
    pub fn find_all(&self, kind: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect(kind, &mut found);
        found
    }

    fn collect<'a>(&'a self, kind: &str, found: &mut Vec<&'a Element>) {
        match self {
            Node::Element(el) => {
                if el.kind == kind {
                    found.push(el);
                }
                for child in &el.children {
                    child.collect(kind, found);
                }
            }
            Node::Fragment(nodes) => {
                for node in nodes {
                    node.collect(kind, found);
                }
            }
            Node::Empty | Node::Text(_) => {}
        }
    }

    /// Concatenated text content
    pub fn text(&self) -> String {
        match self {
            Node::Empty => String::new(),
            Node::Text(text) => text.clone(),
            Node::Element(el) => el.children.iter().map(Node::text).collect(),
            Node::Fragment(nodes) => nodes.iter().map(Node::text).collect(),
        }
    }

    /// Identity comparison, used to observe render cache hits
    pub fn ptr_eq(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Element(a), Node::Element(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(Rc::new(el))
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

impl From<Vec<Node>> for Node {
    fn from(nodes: Vec<Node>) -> Self {
        Node::Fragment(nodes)
    }
}

/// Convert a prop value (such as `children`) into render output
impl From<&PropValue> for Node {
    fn from(value: &PropValue) -> Self {
        match value {
            PropValue::Undefined | PropValue::Null | PropValue::Bool(_) => Node::Empty,
            PropValue::Element(el) => Node::Element(Rc::clone(el)),
            PropValue::Array(items) => Node::Fragment(items.iter().map(Node::from).collect()),
            other => Node::Text(other.to_js_string()),
        }
    }
}
