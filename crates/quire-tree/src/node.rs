//! Persistent nodes with path copying
//!
//! Node content lives in shared, immutable [`NodeData`] that only points
//! down. A [`Node`] pairs that content with its location: the parent handle
//! and the index within it. Locations only point up, so the two never form a
//! cycle, and they are rebuilt as the tree is navigated or edited.

use std::fmt;
use std::sync::Arc;

use quire_codec::Value;
use quire_style::{PropertyName, StyleMap, StyleVisitor};

use crate::TreeError;

/// Kind of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Text,
    Placeholder,
    Style,
    StyleName,
}

impl NodeKind {
    pub fn is_leaf(self) -> bool {
        matches!(self, Self::Text | Self::Placeholder)
    }
}

#[derive(Debug)]
pub(crate) enum NodeData {
    Text(String),
    Placeholder(String),
    Style {
        children: Vec<Arc<NodeData>>,
        attributes: StyleMap,
    },
    StyleName {
        children: Vec<Arc<NodeData>>,
        style_name: String,
    },
}

impl NodeData {
    fn kind(&self) -> NodeKind {
        match self {
            Self::Text(_) => NodeKind::Text,
            Self::Placeholder(_) => NodeKind::Placeholder,
            Self::Style { .. } => NodeKind::Style,
            Self::StyleName { .. } => NodeKind::StyleName,
        }
    }

    pub(crate) fn children(&self) -> &[Arc<NodeData>] {
        match self {
            Self::Text(_) | Self::Placeholder(_) => &[],
            Self::Style { children, .. } | Self::StyleName { children, .. } => children,
        }
    }

    /// Style container, or its only child when there is nothing to style
    fn style(mut children: Vec<Arc<NodeData>>, attributes: StyleMap) -> Arc<NodeData> {
        if attributes.is_empty() && children.len() == 1 {
            if let Some(child) = children.pop() {
                return child;
            }
        }
        Arc::new(Self::Style { children, attributes })
    }

    /// Same container with other children
    fn with_children(&self, children: Vec<Arc<NodeData>>) -> Arc<NodeData> {
        match self {
            Self::Style { attributes, .. } => Self::style(children, attributes.clone()),
            Self::StyleName { style_name, .. } => Arc::new(Self::StyleName {
                children,
                style_name: style_name.clone(),
            }),
            Self::Text(_) | Self::Placeholder(_) => {
                panic!("{:?} node cannot have children", self.kind())
            }
        }
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Placeholder(_) => {}
            Self::Style { children, .. } | Self::StyleName { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }
}

impl PartialEq for NodeData {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) | (Self::Placeholder(a), Self::Placeholder(b)) => a == b,
            (
                Self::Style { children: a, attributes: x },
                Self::Style { children: b, attributes: y },
            ) => x == y && same_children(a, b),
            (
                Self::StyleName { children: a, style_name: x },
                Self::StyleName { children: b, style_name: y },
            ) => x == y && same_children(a, b),
            _ => false,
        }
    }
}

fn same(a: &Arc<NodeData>, b: &Arc<NodeData>) -> bool {
    Arc::ptr_eq(a, b) || **a == **b
}

fn same_children(a: &[Arc<NodeData>], b: &[Arc<NodeData>]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(a, b)| same(a, b))
}

#[derive(Debug)]
struct Location {
    parent: Node,
    index: usize,
}

/// Handle to a node at a position in a tree
///
/// Cheap to clone. Equality compares content and every ancestor up to the
/// root; [`structural_eq`](Node::structural_eq) compares content only.
#[derive(Clone)]
pub struct Node {
    data: Arc<NodeData>,
    location: Option<Arc<Location>>,
}

impl Node {
    pub fn new_text(text: impl Into<String>) -> Self {
        Self::from_data(Arc::new(NodeData::Text(text.into())))
    }

    /// Symbolic marker referring to `name`; contributes no text
    pub fn new_placeholder(name: impl Into<String>) -> Self {
        Self::from_data(Arc::new(NodeData::Placeholder(name.into())))
    }

    /// Style container; with no attributes and a single child, that child
    pub fn new_style(children: Vec<Node>, attributes: StyleMap) -> Self {
        Self::from_data(NodeData::style(detach(children), attributes))
    }

    /// Container referring to a named style
    pub fn new_style_name(children: Vec<Node>, style_name: impl Into<String>) -> Self {
        Self::from_data(Arc::new(NodeData::StyleName {
            children: detach(children),
            style_name: style_name.into(),
        }))
    }

    pub(crate) fn from_data(data: Arc<NodeData>) -> Self {
        Self { data, location: None }
    }

    pub(crate) fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    pub fn is_leaf(&self) -> bool {
        self.kind().is_leaf()
    }

    /// Text of a leaf, or of every leaf below a container in order
    pub fn text(&self) -> String {
        match &*self.data {
            NodeData::Text(text) => text.clone(),
            data => {
                let mut out = String::new();
                data.collect_text(&mut out);
                out
            }
        }
    }

    /// Name referenced by a placeholder
    pub fn placeholder_name(&self) -> Option<&str> {
        match &*self.data {
            NodeData::Placeholder(name) => Some(name),
            _ => None,
        }
    }

    /// Attributes of a style container; empty for every other kind
    pub fn attributes(&self) -> StyleMap {
        match &*self.data {
            NodeData::Style { attributes, .. } => attributes.clone(),
            _ => StyleMap::EMPTY,
        }
    }

    /// Style named by a style-name container
    pub fn style_name(&self) -> Option<&str> {
        match &*self.data {
            NodeData::StyleName { style_name, .. } => Some(style_name),
            _ => None,
        }
    }

    pub fn child_count(&self) -> usize {
        self.data.children().len()
    }

    /// Child at `index`, located under this node
    pub fn child(&self, index: usize) -> Option<Node> {
        let data = self.data.children().get(index)?;
        Some(Node {
            data: Arc::clone(data),
            location: Some(Arc::new(Location {
                parent: self.clone(),
                index,
            })),
        })
    }

    pub fn children(&self) -> Vec<Node> {
        (0..self.child_count()).filter_map(|index| self.child(index)).collect()
    }

    pub fn parent(&self) -> Option<&Node> {
        self.location.as_ref().map(|location| &location.parent)
    }

    /// Position within the parent; `None` for a root
    pub fn index(&self) -> Option<usize> {
        self.location.as_ref().map(|location| location.index)
    }

    pub fn is_root(&self) -> bool {
        self.location.is_none()
    }

    /// Root of the tree this node is located in
    pub fn root(&self) -> Node {
        let mut node = self;
        while let Some(parent) = node.parent() {
            node = parent;
        }
        node.clone()
    }

    /// Child indices leading from the root to this node
    pub fn path(&self) -> Vec<usize> {
        let mut path = Vec::new();
        let mut node = self;
        while let Some(location) = &node.location {
            path.push(location.index);
            node = &location.parent;
        }
        path.reverse();
        path
    }

    /// Every node below this one, depth-first, in document order
    pub fn descendants(&self) -> Vec<Node> {
        let mut out = Vec::new();
        let mut stack: Vec<Node> = self.children().into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            stack.extend(node.children().into_iter().rev());
            out.push(node);
        }
        out
    }

    /// Same content (ignoring location)
    pub fn structural_eq(&self, other: &Node) -> bool {
        same(&self.data, &other.data)
    }

    /// Same shared content, by identity
    pub fn ptr_eq(a: &Node, b: &Node) -> bool {
        Arc::ptr_eq(&a.data, &b.data)
    }

    /// Replace the children.
    ///
    /// Returns `self` when the new children equal the current ones; otherwise
    /// the counterpart of this node in the rebuilt tree.
    ///
    /// # Panics
    ///
    /// On leaf nodes.
    pub fn set_children(&self, children: Vec<Node>) -> Node {
        if self.is_leaf() {
            panic!("cannot set children of a {:?} node", self.kind());
        }
        let children = detach(children);
        if same_children(self.data.children(), &children) {
            return self.clone();
        }
        self.replace_data(self.data.with_children(children))
    }

    pub fn append_child(&self, child: Node) -> Node {
        let mut children = self.children();
        children.push(child);
        self.set_children(children)
    }

    pub fn insert_child(&self, index: usize, child: Node) -> Result<Node, TreeError> {
        let mut children = self.children();
        if index > children.len() {
            return Err(TreeError::IndexOutOfBounds { index, len: children.len() });
        }
        children.insert(index, child);
        Ok(self.set_children(children))
    }

    pub fn replace_child(&self, index: usize, child: Node) -> Result<Node, TreeError> {
        let mut children = self.children();
        let len = children.len();
        let slot = children
            .get_mut(index)
            .ok_or(TreeError::IndexOutOfBounds { index, len })?;
        *slot = child;
        Ok(self.set_children(children))
    }

    pub fn remove_child(&self, index: usize) -> Result<Node, TreeError> {
        let mut children = self.children();
        if index >= children.len() {
            return Err(TreeError::IndexOutOfBounds { index, len: children.len() });
        }
        children.remove(index);
        Ok(self.set_children(children))
    }

    /// Replace the attributes.
    ///
    /// A style container gets the new map. Any other node is wrapped in a new
    /// style container, unless `attributes` is empty (then nothing changes).
    pub fn set_attributes(&self, attributes: StyleMap) -> Node {
        match &*self.data {
            NodeData::Style { children, attributes: current } => {
                if *current == attributes {
                    return self.clone();
                }
                self.replace_data(NodeData::style(children.clone(), attributes))
            }
            _ if attributes.is_empty() => self.clone(),
            _ => self.replace_data(Arc::new(NodeData::Style {
                children: vec![Arc::clone(&self.data)],
                attributes,
            })),
        }
    }

    /// Set one style property on this node's attributes.
    pub fn set_style(&self, name: &PropertyName, value: Value) -> Result<Node, TreeError> {
        let attributes = self.attributes().set(name, value)?;
        Ok(self.set_attributes(attributes))
    }

    /// Feed the attributes of every style container in this subtree,
    /// outermost first, to `visitor`.
    pub fn walk_styles<V: StyleVisitor + ?Sized>(&self, visitor: &mut V) {
        walk_data(&self.data, visitor);
    }

    /// Put `data` where this node is and path-copy up to the root.
    fn replace_data(&self, data: Arc<NodeData>) -> Node {
        match &self.location {
            None => Node::from_data(data),
            Some(location) => {
                tracing::trace!(index = location.index, "path copy");
                let parent = &location.parent;
                let mut siblings = parent.data.children().to_vec();
                siblings[location.index] = data;
                let parent = parent.replace_data(parent.data.with_children(siblings));
                Node {
                    data: Arc::clone(&parent.data.children()[location.index]),
                    location: Some(Arc::new(Location {
                        parent,
                        index: location.index,
                    })),
                }
            }
        }
    }
}

fn detach(children: Vec<Node>) -> Vec<Arc<NodeData>> {
    children.into_iter().map(|child| child.data).collect()
}

fn walk_data<V: StyleVisitor + ?Sized>(data: &NodeData, visitor: &mut V) {
    if let NodeData::Style { attributes, .. } = data {
        attributes.accept(visitor);
    }
    for child in data.children() {
        walk_data(child, visitor);
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        if !same(&self.data, &other.data) {
            return false;
        }
        match (&self.location, &other.location) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b) || a.parent == b.parent,
            _ => false,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.data, f)
    }
}
