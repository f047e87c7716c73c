use indextree::NodeEdge as IndexTreeNodeEdge;

use crate::document::{Document, Node};
use crate::xmlvalue::{Attribute, Element, Name, Value, ValueType, XML_NAMESPACE};

/// Node edges.
///
/// Used by [`Document::traverse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeEdge {
    /// The start edge of a node. In case of an element
    /// this is the start tag. In case of root
    /// the start of the document.
    Start(Node),
    /// The end edge of a node. In case of an element
    /// this is the end tag. For any other values, the
    /// end edge occurs immediately after the start
    /// edge.
    End(Node),
}

/// ## Read-only access
impl Document {
    /// The document element: the single top-level element.
    pub fn document_element(&self) -> Option<Node> {
        self.children(self.root())
            .find(|child| self.value_type(*child) == ValueType::Element)
    }

    /// Get parent node.
    ///
    /// Returns [`None`] for the root. Attributes have their element as
    /// parent, even though they aren't among its children.
    pub fn parent(&self, node: Node) -> Option<Node> {
        self.arena[node.get()].parent().map(Node::new)
    }

    /// Child nodes: elements, text, comments and processing instructions.
    /// Attributes are not children.
    ///
    /// ```rust
    /// use xpath_tester::Document;
    ///
    /// let doc = Document::parse(r#"<p a="A">one<b/></p>"#)?;
    /// let p = doc.document_element().unwrap();
    /// let names: Vec<_> = doc.children(p).map(|n| doc.node_name(n)).collect();
    /// assert_eq!(names, vec!["#text", "b"]);
    /// # Ok::<(), xpath_tester::ParseError>(())
    /// ```
    pub fn children(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get()
            .children(&self.arena)
            .skip_while(|n| !self.arena[*n].get().is_normal())
            .map(Node::new)
    }

    /// Attribute nodes of an element, namespace declarations included,
    /// in source order.
    pub fn attributes(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get()
            .children(&self.arena)
            .take_while(|n| !self.arena[*n].get().is_normal())
            .map(Node::new)
    }

    /// First child node, skipping attributes.
    pub fn first_child(&self, node: Node) -> Option<Node> {
        self.children(node).next()
    }

    /// Whether the node has any child nodes.
    pub fn has_children(&self, node: Node) -> bool {
        self.first_child(node).is_some()
    }

    /// Siblings after this node, nearest first. Attributes have none.
    pub fn following_siblings(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        let normal = self.value(node).is_normal();
        node.get()
            .following_siblings(&self.arena)
            .skip(1)
            .filter(move |_| normal)
            .map(Node::new)
    }

    /// Siblings before this node, nearest first. Attributes have none.
    pub fn preceding_siblings(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        let normal = self.value(node).is_normal();
        node.get()
            .preceding_siblings(&self.arena)
            .skip(1)
            .take_while(move |n| normal && self.arena[*n].get().is_normal())
            .map(Node::new)
    }

    /// Ancestors of the node, nearest first, up to and including the root.
    pub fn ancestors(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get().ancestors(&self.arena).skip(1).map(Node::new)
    }

    /// Descendant nodes in document order, not including the node itself
    /// and not including attributes.
    pub fn descendants(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get()
            .descendants(&self.arena)
            .skip(1)
            .filter(|n| self.arena[*n].get().is_normal())
            .map(Node::new)
    }

    /// The node itself and everything below it, attributes included,
    /// in document order: each element is followed by its attributes and
    /// then by its children.
    pub fn all_descendants(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get().descendants(&self.arena).map(Node::new)
    }

    /// Traverse the node and its descendants, yielding start and end edges.
    /// Attributes are not visited.
    pub fn traverse(&self, node: Node) -> impl Iterator<Item = NodeEdge> + '_ {
        node.get()
            .traverse(&self.arena)
            .filter_map(move |edge| match edge {
                IndexTreeNodeEdge::Start(node_id) if self.arena[node_id].get().is_normal() => {
                    Some(NodeEdge::Start(Node::new(node_id)))
                }
                IndexTreeNodeEdge::End(node_id) if self.arena[node_id].get().is_normal() => {
                    Some(NodeEdge::End(Node::new(node_id)))
                }
                _ => None,
            })
    }

    /// Element data, if this is an element.
    pub fn element(&self, node: Node) -> Option<&Element> {
        match self.value(node) {
            Value::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Attribute data, if this is an attribute.
    pub fn attribute(&self, node: Node) -> Option<&Attribute> {
        match self.value(node) {
            Value::Attribute(attribute) => Some(attribute),
            _ => None,
        }
    }

    /// The name of an element or attribute.
    pub fn name(&self, node: Node) -> Option<&Name> {
        match self.value(node) {
            Value::Element(element) => Some(element.name()),
            Value::Attribute(attribute) => Some(attribute.name()),
            _ => None,
        }
    }

    /// Look up an attribute value on an element by namespace and local name.
    pub fn attribute_value(&self, node: Node, namespace: &str, local: &str) -> Option<&str> {
        self.attributes(node)
            .filter_map(|n| self.attribute(n))
            .find(|a| a.name().namespace() == namespace && a.name().local_name() == local)
            .map(|a| a.value())
    }

    /// The DOM-style node name: qualified name for elements and attributes,
    /// target for processing instructions and `#text`, `#cdata-section`,
    /// `#significant-whitespace`, `#comment` or `#document` otherwise.
    pub fn node_name(&self, node: Node) -> String {
        match self.value(node) {
            Value::Root => "#document".to_string(),
            Value::Element(element) => element.name().qualified().into_owned(),
            Value::Attribute(attribute) => attribute.name().qualified().into_owned(),
            Value::Text(text) => {
                if text.is_cdata() {
                    "#cdata-section".to_string()
                } else if text.get().chars().all(is_xml_whitespace) {
                    "#significant-whitespace".to_string()
                } else {
                    "#text".to_string()
                }
            }
            Value::Comment(_) => "#comment".to_string(),
            Value::ProcessingInstruction(pi) => pi.target().to_string(),
        }
    }

    /// The string-value of a node: the concatenated descendant text for
    /// the root and elements, the value itself otherwise.
    pub fn string_value(&self, node: Node) -> String {
        match self.value(node) {
            Value::Root | Value::Element(_) => self
                .descendants(node)
                .filter_map(|n| match self.value(n) {
                    Value::Text(text) => Some(text.get()),
                    _ => None,
                })
                .collect(),
            Value::Attribute(attribute) => attribute.value().to_string(),
            Value::Text(text) => text.get().to_string(),
            Value::Comment(comment) => comment.get().to_string(),
            Value::ProcessingInstruction(pi) => pi.data().unwrap_or("").to_string(),
        }
    }

    /// Text and CDATA siblings stay apart in the tree but make up a single
    /// text node for queries. This is true for the first node of such a
    /// run and for any node that isn't text.
    pub(crate) fn starts_text_run(&self, node: Node) -> bool {
        if self.value_type(node) != ValueType::Text {
            return true;
        }
        match self.arena[node.get()].previous_sibling() {
            Some(previous) => !matches!(self.arena[previous].get(), Value::Text(_)),
            None => true,
        }
    }

    /// The text of `node` and all adjacent text siblings after it.
    pub(crate) fn text_run(&self, node: Node) -> String {
        std::iter::successors(Some(node.get()), |n| self.arena[*n].next_sibling())
            .map_while(|n| match self.arena[n].get() {
                Value::Text(text) => Some(text.get()),
                _ => None,
            })
            .collect()
    }

    /// The string value as queries see it: a text node stands for its
    /// whole run of adjacent text siblings.
    pub(crate) fn query_string_value(&self, node: Node) -> String {
        match self.value(node) {
            Value::Text(_) => self.text_run(node),
            _ => self.string_value(node),
        }
    }

    /// Namespace declarations on this element only, as `(prefix, uri)`
    /// pairs; the default namespace has an empty prefix.
    pub fn namespace_declarations(&self, node: Node) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.attributes(node)
            .filter_map(|n| self.attribute(n))
            .filter(|a| a.is_namespace_declaration())
            .map(|a| {
                if a.name().prefix().is_empty() {
                    ("", a.value())
                } else {
                    (a.name().local_name(), a.value())
                }
            })
    }

    /// All namespace bindings in scope for an element, nearest declaration
    /// winning, in the order the outermost declarations appear. Undeclared
    /// default namespaces (`xmlns=""`) are left out.
    pub fn namespaces_in_scope(&self, node: Node) -> Vec<(String, String)> {
        let mut elements: Vec<Node> = self.ancestors(node).collect();
        elements.reverse();
        elements.push(node);
        let mut in_scope: Vec<(String, String)> = Vec::new();
        for element in elements {
            if self.value_type(element) != ValueType::Element {
                continue;
            }
            for (prefix, uri) in self.namespace_declarations(element) {
                match in_scope.iter_mut().find(|(p, _)| p == prefix) {
                    Some(entry) => entry.1 = uri.to_string(),
                    None => in_scope.push((prefix.to_string(), uri.to_string())),
                }
            }
        }
        in_scope.retain(|(_, uri)| !uri.is_empty());
        in_scope
    }

    /// The `xml:space` setting declared directly on an element.
    pub(crate) fn xml_space(&self, node: Node) -> Option<&str> {
        self.attribute_value(node, XML_NAMESPACE, "space")
    }

    /// Whether an attribute node is a namespace declaration.
    pub(crate) fn is_namespace_declaration(&self, node: Node) -> bool {
        self.attribute(node)
            .map(|a| a.is_namespace_declaration())
            .unwrap_or(false)
    }
}

#[inline]
pub(crate) fn is_xml_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}
