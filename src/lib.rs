//! Load an XML document, browse it as an outline and try XPath 1.0
//! expressions against it.
//!
//! The pieces can be used on their own:
//!
//! - [`Document`] parses XML text into an immutable tree with namespaces
//!   resolved, and serializes it back, optionally reformatted.
//! - [`harvest_namespaces`] collects the prefixes a document uses, so that
//!   expressions can refer to them.
//! - [`XPath`] compiles and evaluates expressions; [`Report`] turns the
//!   result into the text shown to the user.
//! - [`Outline`] mirrors the document as a lazily expanded tree, and
//!   [`selection_path`] turns a selected node into an expression.
//!
//! [`Session`] ties them together the way the interactive tool uses them.
//!
//! ```rust
//! use xpath_tester::Session;
//!
//! let mut session = Session::new();
//! session.load_text("<a><b/><b/></a>");
//! let report = session.set_expression("/a/b");
//! assert_eq!(report.to_string(), "Count: [2]\n[1] - <b />\n[2] - <b />\n");
//! ```
#![forbid(unsafe_code)]

mod access;
mod document;
mod encoding;
mod entity;
mod error;
mod namespace;
mod outline;
mod output;
mod parse;
mod path;
mod report;
mod session;
mod xmlvalue;
mod xpath;

pub mod console;

pub use access::NodeEdge;
pub use document::{Document, Node};
pub use error::{Error, ParseError, Span, XPathError};
pub use namespace::{harvest_namespaces, NamespaceMap, DEFAULT_PREFIX};
pub use outline::{ItemId, Outline, OutlineItem};
pub use output::{Indentation, SerializeOptions};
pub use path::{selection_path, TrackingMode, UnknownTrackingMode};
pub use report::{Match, Report};
pub use session::{SaveOutcome, Selection, Session};
pub use xmlvalue::{
    Attribute, Comment, Declaration, Element, Name, ProcessingInstruction, Text, Value, ValueType,
    XMLNS_NAMESPACE, XML_NAMESPACE,
};
pub use xpath::{XPath, XPathValue};
