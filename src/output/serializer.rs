use genawaiter::rc::gen;
use genawaiter::yield_;

use crate::access::NodeEdge;
use crate::document::{Document, Node};
use crate::xmlvalue::{Declaration, Name, Value};

/// Output of serialization
///
/// Each item is one piece of markup as it relates to the tree, before any
/// escaping or layout is applied.
#[derive(Debug, PartialEq)]
pub(crate) enum Output<'a> {
    /// The XML declaration, `<?xml version="1.0"?>`
    Declaration(&'a Declaration),
    /// Start tag open, i.e `<foo` or `<ns:foo`
    StartTagOpen(&'a Name),
    /// Start tag close, either `>` or ` />`
    StartTagClose { empty: bool },
    /// End tag, i.e. `</foo>`. Empty elements have no end tag.
    EndTag { name: &'a Name, empty: bool },
    /// A namespace in scope that the top element doesn't declare itself,
    /// as prefix and URI.
    Prefix(String, String),
    /// Attribute, i.e. `foo="bar"`. Declarations are attributes too.
    Attribute(&'a Name, &'a str),
    /// Text, i.e. `foo`
    Text(&'a str, bool),
    /// Comment, i.e. `<!--foo-->`
    Comment(&'a str),
    /// Processing instruction, i.e. `<?foo bar?>`
    ProcessingInstruction(&'a str, Option<&'a str>),
}

pub(crate) fn gen_outputs(
    doc: &Document,
    node: Node,
    declaration: bool,
    shallow: bool,
) -> impl Iterator<Item = (Node, Output)> + '_ {
    gen!({
        if let Value::Attribute(attribute) = doc.value(node) {
            yield_!((node, Output::Attribute(attribute.name(), attribute.value())));
            return;
        }
        if declaration && node == doc.root() {
            if let Some(declaration) = doc.declaration() {
                yield_!((node, Output::Declaration(declaration)));
            }
        }
        if shallow {
            for output in gen_edge_start(doc, node, node, true) {
                yield_!((node, output));
            }
            return;
        }
        for edge in doc.traverse(node) {
            match edge {
                NodeEdge::Start(current_node) => {
                    for output in gen_edge_start(doc, node, current_node, false) {
                        yield_!((current_node, output));
                    }
                }
                NodeEdge::End(current_node) => {
                    if let Value::Element(element) = doc.value(current_node) {
                        yield_!((
                            current_node,
                            Output::EndTag {
                                name: element.name(),
                                empty: !doc.has_children(current_node),
                            }
                        ));
                    }
                }
            }
        }
    })
    .into_iter()
}

fn gen_edge_start(
    doc: &Document,
    top_node: Node,
    node: Node,
    shallow: bool,
) -> impl Iterator<Item = Output> + '_ {
    gen!({
        match doc.value(node) {
            Value::Root | Value::Attribute(_) => {}
            Value::Element(element) => {
                yield_!(Output::StartTagOpen(element.name()));

                // serialize any extra prefixes if this is the top element of
                // a fragment and they aren't declared already
                if node == top_node {
                    let declared: Vec<&str> =
                        doc.namespace_declarations(node).map(|(p, _)| p).collect();
                    // without descendants only the element's own names need them
                    let mut used = vec![element.name().prefix()];
                    used.extend(
                        doc.attributes(node)
                            .filter_map(|n| doc.attribute(n))
                            .filter(|a| !a.is_namespace_declaration())
                            .map(|a| a.name().prefix())
                            .filter(|p| !p.is_empty()),
                    );
                    for (prefix, uri) in doc.namespaces_in_scope(node) {
                        let needed = !shallow || used.contains(&prefix.as_str());
                        if needed && !declared.contains(&prefix.as_str()) {
                            yield_!(Output::Prefix(prefix, uri));
                        }
                    }
                }

                for attribute in doc.attributes(node).filter_map(|n| doc.attribute(n)) {
                    yield_!(Output::Attribute(attribute.name(), attribute.value()));
                }

                yield_!(Output::StartTagClose {
                    empty: shallow || !doc.has_children(node)
                });
            }
            Value::Text(text) => {
                yield_!(Output::Text(text.get(), text.is_cdata()));
            }
            Value::Comment(comment) => {
                yield_!(Output::Comment(comment.get()));
            }
            Value::ProcessingInstruction(pi) => {
                yield_!(Output::ProcessingInstruction(pi.target(), pi.data()));
            }
        }
    })
    .into_iter()
}
