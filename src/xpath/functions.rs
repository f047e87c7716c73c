use crate::access::is_xml_whitespace;
use crate::document::Node;
use crate::error::XPathError;
use crate::xmlvalue::{Value, XML_NAMESPACE};

use super::ast::{Expr, Function};
use super::eval::{Context, Evaluator};
use super::value::{round, string_to_number, XPathValue};

impl<'a> Evaluator<'a> {
    pub(crate) fn call(
        &self,
        function: Function,
        arguments: &[Expr],
        context: Context,
    ) -> Result<XPathValue, XPathError> {
        use Function::*;
        let value = match function {
            Last => XPathValue::Number(context.size as f64),
            Position => XPathValue::Number(context.position as f64),
            Count => XPathValue::Number(self.node_set(&arguments[0], context)?.len() as f64),
            Id => {
                // without a DTD no attribute is of type ID
                self.evaluate(&arguments[0], context)?;
                XPathValue::NodeSet(Vec::new())
            }
            LocalName | NamespaceUri | Name => {
                let node = match arguments.first() {
                    Some(argument) => self.node_set(argument, context)?.first().copied(),
                    None => Some(context.node),
                };
                XPathValue::String(
                    node.map(|node| self.name_part(function, node))
                        .unwrap_or_default(),
                )
            }
            String => XPathValue::String(self.string_argument(arguments.first(), context)?),
            Concat => {
                let mut result = std::string::String::new();
                for argument in arguments {
                    result.push_str(&self.string(argument, context)?);
                }
                XPathValue::String(result)
            }
            StartsWith => {
                let (s, prefix) = self.two_strings(arguments, context)?;
                XPathValue::Boolean(s.starts_with(prefix.as_str()))
            }
            Contains => {
                let (s, needle) = self.two_strings(arguments, context)?;
                XPathValue::Boolean(s.contains(needle.as_str()))
            }
            SubstringBefore => {
                let (s, needle) = self.two_strings(arguments, context)?;
                XPathValue::String(
                    s.find(needle.as_str())
                        .map(|index| s[..index].to_string())
                        .unwrap_or_default(),
                )
            }
            SubstringAfter => {
                let (s, needle) = self.two_strings(arguments, context)?;
                XPathValue::String(
                    s.find(needle.as_str())
                        .map(|index| s[index + needle.len()..].to_string())
                        .unwrap_or_default(),
                )
            }
            Substring => {
                let s = self.string(&arguments[0], context)?;
                let start = round(self.number(&arguments[1], context)?);
                let end = match arguments.get(2) {
                    Some(length) => start + round(self.number(length, context)?),
                    None => f64::INFINITY,
                };
                XPathValue::String(substring(&s, start, end))
            }
            StringLength => XPathValue::Number(
                self.string_argument(arguments.first(), context)?
                    .chars()
                    .count() as f64,
            ),
            NormalizeSpace => {
                let s = self.string_argument(arguments.first(), context)?;
                XPathValue::String(
                    s.split(is_xml_whitespace)
                        .filter(|part| !part.is_empty())
                        .collect::<Vec<_>>()
                        .join(" "),
                )
            }
            Translate => {
                let s = self.string(&arguments[0], context)?;
                let from: Vec<char> = self.string(&arguments[1], context)?.chars().collect();
                let to: Vec<char> = self.string(&arguments[2], context)?.chars().collect();
                XPathValue::String(translate(&s, &from, &to))
            }
            Boolean => XPathValue::Boolean(self.evaluate(&arguments[0], context)?.to_boolean()),
            Not => XPathValue::Boolean(!self.evaluate(&arguments[0], context)?.to_boolean()),
            True => XPathValue::Boolean(true),
            False => XPathValue::Boolean(false),
            Lang => {
                let lang = self.string(&arguments[0], context)?;
                XPathValue::Boolean(self.lang(context.node, &lang))
            }
            Number => XPathValue::Number(match arguments.first() {
                Some(argument) => self.number(argument, context)?,
                None => string_to_number(&self.doc.query_string_value(context.node)),
            }),
            Sum => XPathValue::Number(
                self.node_set(&arguments[0], context)?
                    .iter()
                    .map(|node| string_to_number(&self.doc.query_string_value(*node)))
                    .sum(),
            ),
            Floor => XPathValue::Number(self.number(&arguments[0], context)?.floor()),
            Ceiling => XPathValue::Number(self.number(&arguments[0], context)?.ceil()),
            Round => XPathValue::Number(round(self.number(&arguments[0], context)?)),
        };
        Ok(value)
    }

    fn string(&self, argument: &Expr, context: Context) -> Result<String, XPathError> {
        Ok(self.evaluate(argument, context)?.to_string_value(self.doc))
    }

    // the optional argument defaults to the context node
    fn string_argument(&self, argument: Option<&Expr>, context: Context) -> Result<String, XPathError> {
        match argument {
            Some(argument) => self.string(argument, context),
            None => Ok(self.doc.query_string_value(context.node)),
        }
    }

    fn two_strings(&self, arguments: &[Expr], context: Context) -> Result<(String, String), XPathError> {
        Ok((
            self.string(&arguments[0], context)?,
            self.string(&arguments[1], context)?,
        ))
    }

    fn number(&self, argument: &Expr, context: Context) -> Result<f64, XPathError> {
        Ok(self.evaluate(argument, context)?.to_number(self.doc))
    }

    fn name_part(&self, function: Function, node: Node) -> String {
        let name = match self.doc.value(node) {
            Value::Element(element) => element.name(),
            Value::Attribute(attribute) => attribute.name(),
            Value::ProcessingInstruction(pi) if function != Function::NamespaceUri => {
                return pi.target().to_string()
            }
            _ => return String::new(),
        };
        match function {
            Function::LocalName => name.local_name().to_string(),
            Function::NamespaceUri => name.namespace().to_string(),
            _ => name.qualified().into_owned(),
        }
    }

    fn lang(&self, node: Node, lang: &str) -> bool {
        let declared = std::iter::once(node)
            .chain(self.doc.ancestors(node))
            .find_map(|n| self.doc.attribute_value(n, XML_NAMESPACE, "lang"));
        match declared {
            Some(declared) => {
                let declared = declared.to_lowercase();
                let lang = lang.to_lowercase();
                declared == lang
                    || (declared.starts_with(&lang) && declared[lang.len()..].starts_with('-'))
            }
            None => false,
        }
    }
}

// characters at positions p with start <= p < end, counting from 1; NaN
// bounds select nothing
fn substring(s: &str, start: f64, end: f64) -> String {
    s.chars()
        .enumerate()
        .filter(|(index, _)| {
            let position = (*index + 1) as f64;
            position >= start && position < end
        })
        .map(|(_, c)| c)
        .collect()
}

fn translate(s: &str, from: &[char], to: &[char]) -> String {
    s.chars()
        .filter_map(|c| match from.iter().position(|f| *f == c) {
            Some(index) => to.get(index).copied(),
            None => Some(c),
        })
        .collect()
}
