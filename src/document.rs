use ahash::AHashMap;
use indextree::{Arena, NodeId};

use crate::xmlvalue::{Declaration, Value, ValueType};

pub(crate) type XmlArena = Arena<Value>;

/// A node in a [`Document`].
/// This is a lightweight value and can be copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Node(NodeId);

impl Node {
    #[inline]
    pub(crate) fn new(node_id: NodeId) -> Self {
        Node(node_id)
    }

    #[inline]
    pub(crate) fn get(&self) -> NodeId {
        self.0
    }
}

/// A parsed XML document.
///
/// A document is immutable once parsed: loading something else means
/// building a new `Document`. Because of that the document order of every
/// node is known up front, which the XPath engine relies on.
///
/// ```rust
/// use xpath_tester::Document;
///
/// let doc = Document::parse("<p>Example</p>")?;
/// let p = doc.document_element().unwrap();
/// assert_eq!(doc.node_name(p), "p");
/// # Ok::<(), xpath_tester::ParseError>(())
/// ```
#[derive(Debug)]
pub struct Document {
    pub(crate) arena: XmlArena,
    root: Node,
    declaration: Option<Declaration>,
    order: AHashMap<Node, usize>,
}

impl Document {
    pub(crate) fn from_parts(arena: XmlArena, root: Node, declaration: Option<Declaration>) -> Self {
        // attributes are the first children of their element, so a plain
        // pre-order walk of the arena is document order
        let order = root
            .get()
            .descendants(&arena)
            .enumerate()
            .map(|(index, node_id)| (Node::new(node_id), index))
            .collect();
        Document {
            arena,
            root,
            declaration,
            order,
        }
    }

    /// The document root. This holds the document element as well as any
    /// top-level comments and processing instructions.
    pub fn root(&self) -> Node {
        self.root
    }

    /// The XML declaration, if the source had one.
    pub fn declaration(&self) -> Option<&Declaration> {
        self.declaration.as_ref()
    }

    /// The value stored for a node.
    #[inline]
    pub fn value(&self, node: Node) -> &Value {
        self.arena[node.get()].get()
    }

    /// The type of a node.
    #[inline]
    pub fn value_type(&self, node: Node) -> ValueType {
        self.value(node).value_type()
    }

    /// The position of a node in document order. The root is `0`.
    #[inline]
    pub(crate) fn document_order(&self, node: Node) -> usize {
        self.order.get(&node).copied().unwrap_or(usize::MAX)
    }

    /// Sort nodes into document order.
    pub(crate) fn sort_in_document_order(&self, nodes: &mut [Node]) {
        nodes.sort_by_key(|node| self.document_order(*node));
    }

    /// The total number of nodes, attributes included.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// A document always has at least its root, so this is never true.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
