use std::fmt;

use crate::document::Document;
use crate::namespace::NamespaceMap;
use crate::xpath::XPath;

/// One selected node.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Match {
    /// 1-based position in document order.
    pub position: usize,
    /// The outer markup of the node.
    pub markup: String,
}

/// The outcome of evaluating an expression, as shown to the user.
///
/// The text form is what the result pane shows:
///
/// ```text
/// Count: [2]
/// [1] - <a />
/// [2] - <b>text</b>
/// ```
///
/// A failure shows the error message on its own and without a document
/// there is nothing to show at all.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Report {
    NoDocument,
    Matches(Vec<Match>),
    Failure(String),
}

impl Report {
    /// Compile and run `expression` against `doc` with `namespaces` bound.
    /// Errors end up in the report; this never fails.
    pub fn evaluate(doc: Option<&Document>, namespaces: &NamespaceMap, expression: &str) -> Report {
        let doc = match doc {
            Some(doc) => doc,
            None => return Report::NoDocument,
        };
        let selected = XPath::compile(expression).and_then(|xpath| xpath.select(doc, namespaces));
        match selected {
            Ok(nodes) => {
                tracing::debug!(expression, count = nodes.len(), "evaluated");
                Report::Matches(
                    nodes
                        .into_iter()
                        .enumerate()
                        .map(|(index, node)| Match {
                            position: index + 1,
                            markup: doc.outer_markup(node),
                        })
                        .collect(),
                )
            }
            Err(e) => {
                tracing::debug!(expression, error = %e, "evaluation failed");
                Report::Failure(e.to_string())
            }
        }
    }

    /// The number of matches; failures and the empty report have none.
    pub fn count(&self) -> usize {
        match self {
            Report::Matches(matches) => matches.len(),
            _ => 0,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Report::Failure(_))
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::NoDocument => Ok(()),
            Report::Matches(matches) => {
                writeln!(f, "Count: [{}]", matches.len())?;
                for m in matches {
                    writeln!(f, "[{}] - {}", m.position, m.markup)?;
                }
                Ok(())
            }
            Report::Failure(message) => f.write_str(message),
        }
    }
}
