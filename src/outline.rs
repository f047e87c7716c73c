use ahash::AHashMap;
use indextree::{Arena, NodeId};

use crate::document::{Document, Node};

/// Identifies an item in an [`Outline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(usize);

impl ItemId {
    /// Items are numbered in the order they were created; the root is `0`.
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for ItemId {
    fn from(index: usize) -> Self {
        ItemId(index)
    }
}

/// An entry in the outline: the node name shown, and the node it stands
/// for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineItem {
    text: String,
    node: Node,
}

impl OutlineItem {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn node(&self) -> Node {
        self.node
    }
}

/// A tree of items mirroring a document, filled in on demand.
///
/// A new outline holds just the document element. Children of an item
/// appear once [`Outline::materialize_children`] is called for it, which
/// is what expanding a branch does.
#[derive(Debug, Default)]
pub struct Outline {
    arena: Arena<OutlineItem>,
    ids: Vec<NodeId>,
    items: AHashMap<NodeId, ItemId>,
}

impl Outline {
    /// The outline of a document; empty without a document element.
    pub fn new(doc: &Document) -> Self {
        let mut outline = Outline::default();
        if let Some(document_element) = doc.document_element() {
            outline.add(doc, document_element);
        }
        outline
    }

    fn add(&mut self, doc: &Document, node: Node) -> NodeId {
        let node_id = self.arena.new_node(OutlineItem {
            text: doc.node_name(node),
            node,
        });
        self.items.insert(node_id, ItemId(self.ids.len()));
        self.ids.push(node_id);
        node_id
    }

    fn node_id(&self, id: ItemId) -> Option<NodeId> {
        self.ids.get(id.0).copied()
    }

    fn item_id(&self, node_id: NodeId) -> Option<ItemId> {
        self.items.get(&node_id).copied()
    }

    pub fn root(&self) -> Option<ItemId> {
        if self.ids.is_empty() {
            None
        } else {
            Some(ItemId(0))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The number of items created so far.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn item(&self, id: ItemId) -> Option<&OutlineItem> {
        self.node_id(id).map(|node_id| self.arena[node_id].get())
    }

    /// Child items created so far.
    pub fn children(&self, id: ItemId) -> Vec<ItemId> {
        match self.node_id(id) {
            Some(node_id) => node_id
                .children(&self.arena)
                .filter_map(|child| self.item_id(child))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn parent(&self, id: ItemId) -> Option<ItemId> {
        self.node_id(id)
            .and_then(|node_id| self.arena[node_id].parent())
            .and_then(|parent| self.item_id(parent))
    }

    /// Every item with its depth, in tree order.
    pub fn items(&self) -> Vec<(usize, ItemId)> {
        let root = match self.ids.first() {
            Some(root) => *root,
            None => return Vec::new(),
        };
        root.descendants(&self.arena)
            .filter_map(|node_id| {
                let depth = node_id.ancestors(&self.arena).count() - 1;
                self.item_id(node_id).map(|id| (depth, id))
            })
            .collect()
    }

    /// Attach one item per child node of the item's node, unless the item
    /// already has children. Returns whether anything was added.
    pub fn materialize_children(&mut self, doc: &Document, id: ItemId) -> bool {
        let node_id = match self.node_id(id) {
            Some(node_id) => node_id,
            None => return false,
        };
        if node_id.children(&self.arena).next().is_some() {
            return false;
        }
        let node = self.arena[node_id].get().node;
        let children: Vec<Node> = doc.children(node).collect();
        for child in &children {
            let child_id = self.add(doc, *child);
            node_id.append(child_id, &mut self.arena);
        }
        tracing::debug!(item = id.index(), count = children.len(), "materialized children");
        !children.is_empty()
    }
}
