use crate::access::is_xml_whitespace;
use crate::document::{Document, Node};

/// The result of evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum XPathValue {
    /// Nodes in document order, without duplicates.
    NodeSet(Vec<Node>),
    Boolean(bool),
    Number(f64),
    String(String),
}

impl XPathValue {
    pub(crate) fn to_boolean(&self) -> bool {
        match self {
            XPathValue::NodeSet(nodes) => !nodes.is_empty(),
            XPathValue::Boolean(b) => *b,
            XPathValue::Number(n) => *n != 0.0 && !n.is_nan(),
            XPathValue::String(s) => !s.is_empty(),
        }
    }

    pub(crate) fn to_number(&self, doc: &Document) -> f64 {
        match self {
            XPathValue::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            XPathValue::Number(n) => *n,
            _ => string_to_number(&self.to_string_value(doc)),
        }
    }

    /// The string-value; a node-set converts through its first node.
    pub(crate) fn to_string_value(&self, doc: &Document) -> String {
        match self {
            XPathValue::NodeSet(nodes) => nodes
                .first()
                .map(|node| doc.query_string_value(*node))
                .unwrap_or_default(),
            XPathValue::Boolean(b) => b.to_string(),
            XPathValue::Number(n) => number_to_string(*n),
            XPathValue::String(s) => s.clone(),
        }
    }
}

/// XPath number to string conversion: integers without a fraction, no
/// exponent notation.
pub(crate) fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if n == 0.0 {
        "0".to_string()
    } else {
        // Display for f64 never uses an exponent and drops `.0`
        format!("{}", n)
    }
}

/// XPath string to number conversion: optional whitespace, an optional
/// minus, digits with an optional fraction. Anything else is NaN.
pub(crate) fn string_to_number(s: &str) -> f64 {
    let s = s.trim_matches(is_xml_whitespace);
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    let mut digits = 0;
    let mut dots = 0;
    for c in unsigned.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return f64::NAN,
        }
    }
    if digits == 0 || dots > 1 {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// XPath `round`: the closest integer, halves rounding up.
pub(crate) fn round(n: f64) -> f64 {
    if n.is_nan() || n.is_infinite() {
        return n;
    }
    if n < 0.0 && n >= -0.5 {
        return -0.0;
    }
    (n + 0.5).floor()
}
