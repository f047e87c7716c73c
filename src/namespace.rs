use ahash::AHashMap;

use crate::document::Document;
use crate::xmlvalue::Value;

/// Key used for a default namespace, which has no prefix of its own.
pub const DEFAULT_PREFIX: &str = "ns";

/// Prefix to namespace URI bindings collected from a document.
///
/// Keys are unique; iteration follows the order in which prefixes were
/// first seen.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NamespaceMap {
    entries: Vec<(String, String)>,
    #[cfg_attr(feature = "serde", serde(skip))]
    index: AHashMap<String, usize>,
}

impl NamespaceMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding unless the prefix is already bound. Returns whether it
    /// was added.
    pub fn insert_if_absent(&mut self, prefix: &str, uri: &str) -> bool {
        if self.contains_key(prefix) {
            return false;
        }
        self.index.insert(prefix.to_string(), self.entries.len());
        self.entries.push((prefix.to_string(), uri.to_string()));
        true
    }

    /// The URI bound to a prefix.
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.index
            .get(prefix)
            .map(|index| self.entries[*index].1.as_str())
    }

    pub fn contains_key(&self, prefix: &str) -> bool {
        self.index.contains_key(prefix)
    }

    /// Bindings in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// One `prefix<TAB>uri` line per binding.
    pub fn display_lines(&self) -> Vec<String> {
        self.iter()
            .map(|(prefix, uri)| format!("{}\t{}", prefix, uri))
            .collect()
    }

    /// The query that selects every element in the namespace of entry
    /// `index`: `//prefix:*`.
    pub fn query_for(&self, index: usize) -> Option<String> {
        self.entries
            .get(index)
            .map(|(prefix, _)| format!("//{}:*", prefix))
    }
}

impl PartialEq for NamespaceMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for NamespaceMap {}

/// Collect the namespace bindings used in a document.
///
/// Walks the document element and everything below it, each element's
/// attributes before its children, and records the first binding seen
/// for each prefix:
///
/// - a prefixed declaration `xmlns:p="uri"` binds `p` to `uri`,
/// - any other prefixed name binds its prefix to its namespace,
/// - an unprefixed name in a namespace binds [`DEFAULT_PREFIX`]. A default
///   declaration `xmlns="..."` is such a name itself, so it binds
///   `ns` to the namespace of declarations.
///
/// ```rust
/// use xpath_tester::{harvest_namespaces, Document};
///
/// let doc = Document::parse(r#"<a xmlns:p="urn:p"><p:b/></a>"#)?;
/// let namespaces = harvest_namespaces(&doc);
/// assert_eq!(namespaces.get("p"), Some("urn:p"));
/// # Ok::<(), xpath_tester::ParseError>(())
/// ```
pub fn harvest_namespaces(doc: &Document) -> NamespaceMap {
    let mut namespaces = NamespaceMap::new();
    let document_element = match doc.document_element() {
        Some(node) => node,
        None => return namespaces,
    };
    for node in doc.all_descendants(document_element) {
        let (name, value) = match doc.value(node) {
            Value::Element(element) => (element.name(), None),
            Value::Attribute(attribute) => (attribute.name(), Some(attribute.value())),
            _ => continue,
        };
        if name.namespace().is_empty() {
            continue;
        }
        match name.prefix() {
            "" => {
                namespaces.insert_if_absent(DEFAULT_PREFIX, name.namespace());
            }
            "xmlns" => {
                if !name.local_name().is_empty() {
                    namespaces.insert_if_absent(name.local_name(), value.unwrap_or(""));
                }
            }
            prefix => {
                namespaces.insert_if_absent(prefix, name.namespace());
            }
        }
    }
    tracing::debug!(count = namespaces.len(), "harvested namespaces");
    namespaces
}
