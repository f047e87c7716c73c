//! Serialization of documents and nodes back to text.
//!
//! Three flavors are used: the reformatted document (tabs, CRLF, one
//! attribute per line), the outer markup of a match (two spaces, LF) and
//! the shallow markup of a single node without its descendants.
mod pretty;
mod serializer;

use crate::document::{Document, Node};
use crate::entity::{serialize_attribute, serialize_newlines, serialize_text};
use crate::xmlvalue::Value;

use pretty::{Layout, Pretty};
pub(crate) use serializer::{gen_outputs, Output};

/// Indentation: pretty-print XML.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Indentation {
    /// The text for one level of indentation.
    pub indent: String,
    /// Put every attribute on its own line, one level deeper than its
    /// element.
    pub attributes_on_new_line: bool,
}

/// Options for [`Document::serialize`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SerializeOptions {
    /// Pretty-print when set; otherwise everything goes on one line.
    pub indentation: Option<Indentation>,
    /// The line break sequence, used for indentation and for line breaks
    /// inside text.
    pub newline: String,
    /// Write the XML declaration when serializing the whole document and
    /// it has one.
    pub declaration: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        SerializeOptions {
            indentation: None,
            newline: "\n".to_string(),
            declaration: true,
        }
    }
}

impl SerializeOptions {
    /// Tab indentation, CRLF line breaks, attributes on their own lines.
    pub fn reformat() -> Self {
        SerializeOptions {
            indentation: Some(Indentation {
                indent: "\t".to_string(),
                attributes_on_new_line: true,
            }),
            newline: "\r\n".to_string(),
            declaration: true,
        }
    }

    /// Two space indentation, LF line breaks, attributes inline.
    pub fn outer_markup() -> Self {
        SerializeOptions {
            indentation: Some(Indentation {
                indent: "  ".to_string(),
                attributes_on_new_line: false,
            }),
            newline: "\n".to_string(),
            declaration: false,
        }
    }
}

struct XmlSerializer<'a> {
    options: &'a SerializeOptions,
    output: String,
}

impl<'a> XmlSerializer<'a> {
    fn new(options: &'a SerializeOptions) -> Self {
        XmlSerializer {
            options,
            output: String::new(),
        }
    }

    fn serialize<'d>(mut self, outputs: impl Iterator<Item = (Node, Output<'d>)>) -> String {
        for (_, output) in outputs {
            let layout = match output {
                Output::Prefix(..) | Output::Attribute(..) => Layout::Space,
                _ => Layout::Inline,
            };
            self.write(layout, &output);
        }
        self.output
    }

    fn serialize_pretty<'d>(
        mut self,
        doc: &'d Document,
        outputs: impl Iterator<Item = (Node, Output<'d>)>,
        attributes_on_new_line: bool,
    ) -> String {
        let mut pretty = Pretty::new(doc, attributes_on_new_line);
        for (node, output) in outputs {
            let layout = pretty.prettify(node, &output);
            self.write(layout, &output);
        }
        self.output
    }

    fn write(&mut self, layout: Layout, output: &Output) {
        // nothing goes in front of the very first token
        if !self.output.is_empty() {
            match layout {
                Layout::Inline => {}
                Layout::Space => self.output.push(' '),
                Layout::Break(level) => {
                    self.output.push_str(&self.options.newline);
                    if let Some(indentation) = &self.options.indentation {
                        for _ in 0..level {
                            self.output.push_str(&indentation.indent);
                        }
                    }
                }
            }
        }
        self.render_output(output);
    }

    fn render_output(&mut self, output: &Output) {
        use Output::*;
        let newline = self.options.newline.as_str();
        match output {
            Declaration(declaration) => {
                self.output.push_str("<?xml version=\"");
                self.output.push_str(declaration.version());
                self.output.push('"');
                if let Some(encoding) = declaration.encoding() {
                    self.output.push_str(" encoding=\"");
                    self.output.push_str(encoding);
                    self.output.push('"');
                }
                if let Some(standalone) = declaration.standalone() {
                    self.output.push_str(if standalone {
                        " standalone=\"yes\""
                    } else {
                        " standalone=\"no\""
                    });
                }
                self.output.push_str("?>");
            }
            StartTagOpen(name) => {
                self.output.push('<');
                self.output.push_str(&name.qualified());
            }
            StartTagClose { empty } => {
                self.output.push_str(if *empty { " />" } else { ">" });
            }
            EndTag { name, empty } => {
                if !*empty {
                    self.output.push_str("</");
                    self.output.push_str(&name.qualified());
                    self.output.push('>');
                }
            }
            Prefix(prefix, uri) => {
                if prefix.is_empty() {
                    self.output.push_str("xmlns");
                } else {
                    self.output.push_str("xmlns:");
                    self.output.push_str(prefix);
                }
                self.output.push_str("=\"");
                self.output.push_str(&serialize_attribute(uri));
                self.output.push('"');
            }
            Attribute(name, value) => {
                self.output.push_str(&name.qualified());
                self.output.push_str("=\"");
                self.output.push_str(&serialize_attribute(value));
                self.output.push('"');
            }
            Text(text, true) => {
                self.output.push_str("<![CDATA[");
                self.output.push_str(&serialize_newlines(text, newline));
                self.output.push_str("]]>");
            }
            Text(text, false) => {
                self.output.push_str(&serialize_text(text, newline));
            }
            Comment(text) => {
                self.output.push_str("<!--");
                self.output.push_str(&serialize_newlines(text, newline));
                self.output.push_str("-->");
            }
            ProcessingInstruction(target, data) => {
                self.output.push_str("<?");
                self.output.push_str(target);
                if let Some(data) = data {
                    self.output.push(' ');
                    self.output.push_str(&serialize_newlines(data, newline));
                }
                self.output.push_str("?>");
            }
        }
    }
}

/// ## Serialization
impl Document {
    /// Serialize a node and everything below it.
    ///
    /// An element that isn't the document element re-declares the
    /// namespaces in scope that it doesn't declare itself, so the result
    /// is well-formed on its own. An attribute serializes as
    /// `name="value"`.
    ///
    /// ```rust
    /// use xpath_tester::{Document, SerializeOptions};
    ///
    /// let doc = Document::parse(r#"<a xmlns:x="urn:x"><x:b>text</x:b></a>"#)?;
    /// let b = doc.first_child(doc.document_element().unwrap()).unwrap();
    /// assert_eq!(
    ///     doc.serialize(b, &SerializeOptions::default()),
    ///     r#"<x:b xmlns:x="urn:x">text</x:b>"#
    /// );
    /// # Ok::<(), xpath_tester::ParseError>(())
    /// ```
    pub fn serialize(&self, node: Node, options: &SerializeOptions) -> String {
        let outputs = gen_outputs(self, node, options.declaration, false);
        let serializer = XmlSerializer::new(options);
        match &options.indentation {
            Some(indentation) => {
                serializer.serialize_pretty(self, outputs, indentation.attributes_on_new_line)
            }
            None => serializer.serialize(outputs),
        }
    }

    /// The whole document with [`SerializeOptions::reformat`].
    pub fn reformat(&self) -> String {
        self.serialize(self.root(), &SerializeOptions::reformat())
    }

    /// A node with its descendants, as shown for matches.
    ///
    /// A text node shows the escaped text of its run of adjacent text
    /// and CDATA siblings, the way it matches.
    pub fn outer_markup(&self, node: Node) -> String {
        let options = SerializeOptions::outer_markup();
        if let Value::Text(_) = self.value(node) {
            return serialize_text(&self.text_run(node), &options.newline).into_owned();
        }
        self.serialize(node, &options)
    }

    /// A node without its descendants: an element becomes its start tag
    /// with attributes, closed as an empty element.
    pub fn shallow_markup(&self, node: Node) -> String {
        let options = SerializeOptions::default();
        XmlSerializer::new(&options).serialize(gen_outputs(self, node, false, true))
    }
}
