use std::fmt;
use std::str::FromStr;

use crate::document::{Document, Node};

/// How selecting a node in the outline turns into an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackingMode {
    /// Selecting doesn't touch the expression.
    #[default]
    None,
    /// Walks to the root without recording anything; the path is empty.
    NodeName,
    /// The slash-separated names from the document element down.
    Positional,
    /// Same as [`TrackingMode::Positional`].
    AttributeDifferentiator,
}

impl TrackingMode {
    /// All modes, in index order.
    pub const ALL: [TrackingMode; 4] = [
        TrackingMode::None,
        TrackingMode::NodeName,
        TrackingMode::Positional,
        TrackingMode::AttributeDifferentiator,
    ];

    pub fn from_index(index: usize) -> Option<TrackingMode> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        match self {
            TrackingMode::None => 0,
            TrackingMode::NodeName => 1,
            TrackingMode::Positional => 2,
            TrackingMode::AttributeDifferentiator => 3,
        }
    }

    /// The short name accepted by [`FromStr`].
    pub fn label(self) -> &'static str {
        match self {
            TrackingMode::None => "none",
            TrackingMode::NodeName => "name",
            TrackingMode::Positional => "positional",
            TrackingMode::AttributeDifferentiator => "attribute",
        }
    }
}

impl fmt::Display for TrackingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The text wasn't a tracking mode name or index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTrackingMode(pub String);

impl fmt::Display for UnknownTrackingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown tracking mode '{}', expected none, name, positional or attribute",
            self.0
        )
    }
}

impl std::error::Error for UnknownTrackingMode {}

impl FromStr for TrackingMode {
    type Err = UnknownTrackingMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse::<usize>() {
            return TrackingMode::from_index(index).ok_or_else(|| UnknownTrackingMode(s.to_string()));
        }
        TrackingMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownTrackingMode(s.to_string()))
    }
}

/// The path of a node for a tracking mode.
///
/// [`TrackingMode::None`] gives nothing and [`TrackingMode::NodeName`] an
/// empty path. The other modes join the node names from just below the
/// root down to the node with `/`.
///
/// ```rust
/// use xpath_tester::{selection_path, Document, TrackingMode};
///
/// let doc = Document::parse("<root><child><grandchild/></child></root>")?;
/// let root = doc.document_element().unwrap();
/// let grandchild = doc.descendants(root).nth(1).unwrap();
/// assert_eq!(
///     selection_path(&doc, grandchild, TrackingMode::Positional).as_deref(),
///     Some("root/child/grandchild")
/// );
/// # Ok::<(), xpath_tester::ParseError>(())
/// ```
pub fn selection_path(doc: &Document, node: Node, mode: TrackingMode) -> Option<String> {
    match mode {
        TrackingMode::None => None,
        TrackingMode::NodeName => Some(String::new()),
        TrackingMode::Positional | TrackingMode::AttributeDifferentiator => {
            let mut names = Vec::new();
            let mut current = node;
            while current != doc.root() {
                names.push(doc.node_name(current));
                current = match doc.parent(current) {
                    Some(parent) => parent,
                    None => break,
                };
            }
            names.reverse();
            Some(names.join("/"))
        }
    }
}
