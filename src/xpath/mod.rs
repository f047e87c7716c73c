//! XPath 1.0 expressions evaluated against a [`Document`].
//!
//! Prefixes in name tests are bound through a [`NamespaceMap`]; `xml` and
//! `xmlns` are always available. Variables and extension functions are not
//! supported, and neither is the `namespace` axis.
mod ast;
mod eval;
mod functions;
mod lexer;
mod parser;
mod value;

use crate::document::{Document, Node};
use crate::error::XPathError;
use crate::namespace::NamespaceMap;

use eval::{check_bindings, Context, Evaluator};
pub use value::XPathValue;

/// A compiled XPath expression.
///
/// ```rust
/// use xpath_tester::{harvest_namespaces, Document, XPath};
///
/// let doc = Document::parse(r#"<a xmlns:p="urn:p"><p:b/><c/><p:b/></a>"#)?;
/// let namespaces = harvest_namespaces(&doc);
/// let xpath = XPath::compile("//p:b")?;
/// assert_eq!(xpath.select(&doc, &namespaces)?.len(), 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct XPath {
    source: String,
    expr: ast::Expr,
}

impl XPath {
    /// Parse an expression. Syntax errors, unknown functions and wrong
    /// argument counts are reported here.
    pub fn compile(source: &str) -> Result<XPath, XPathError> {
        let expr = parser::parse(source)?;
        Ok(XPath {
            source: source.to_string(),
            expr,
        })
    }

    /// The expression text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate with `node` as the context node.
    pub fn evaluate(
        &self,
        doc: &Document,
        namespaces: &NamespaceMap,
        node: Node,
    ) -> Result<XPathValue, XPathError> {
        check_bindings(&self.expr, namespaces)?;
        Evaluator::new(doc, namespaces).evaluate(&self.expr, Context::new(node))
    }

    /// Evaluate against the document root and return the selected nodes in
    /// document order. The expression has to produce a node-set.
    pub fn select(&self, doc: &Document, namespaces: &NamespaceMap) -> Result<Vec<Node>, XPathError> {
        match self.evaluate(doc, namespaces, doc.root())? {
            XPathValue::NodeSet(nodes) => Ok(nodes),
            _ => Err(XPathError::NodeSetExpected),
        }
    }
}
