use std::path::Path;

use xmlparser::{ElementEnd, StrSpan, Token, Tokenizer};

use crate::access::is_xml_whitespace;
use crate::document::{Document, Node, XmlArena};
use crate::encoding::decode;
use crate::entity::{normalize_attribute_whitespace, normalize_newlines, parse_references};
use crate::error::{Error, ParseError, Span};
use crate::xmlvalue::{
    Attribute, Comment, Declaration, Element, Name, ProcessingInstruction, Text, Value,
    XML_NAMESPACE, XMLNS_NAMESPACE,
};

struct PendingAttribute<'a> {
    prefix: &'a str,
    local: &'a str,
    value: String,
    span: Span,
}

impl<'a> PendingAttribute<'a> {
    // `xmlns:p="..."` declares `p`, `xmlns="..."` declares the default
    fn declared_prefix(&self) -> Option<&'a str> {
        if self.prefix == "xmlns" {
            Some(self.local)
        } else if self.prefix.is_empty() && self.local == "xmlns" {
            Some("")
        } else {
            None
        }
    }
}

struct PendingElement<'a> {
    prefix: &'a str,
    local: &'a str,
    span: Span,
    attributes: Vec<PendingAttribute<'a>>,
}

struct Scope<'a> {
    node: Node,
    prefix: &'a str,
    local: &'a str,
    span: Span,
    declarations: Vec<(&'a str, String)>,
    preserve_space: bool,
}

struct DocumentBuilder<'a> {
    arena: XmlArena,
    root: Node,
    stack: Vec<Scope<'a>>,
    pending: Option<PendingElement<'a>>,
    declaration: Option<Declaration>,
    has_document_element: bool,
}

fn qualified(prefix: &str, local: &str) -> String {
    if prefix.is_empty() {
        local.to_string()
    } else {
        format!("{}:{}", prefix, local)
    }
}

impl<'a> DocumentBuilder<'a> {
    fn new() -> Self {
        let mut arena = XmlArena::new();
        let root = Node::new(arena.new_node(Value::Root));
        DocumentBuilder {
            arena,
            root,
            stack: Vec::new(),
            pending: None,
            declaration: None,
            has_document_element: false,
        }
    }

    fn current(&self) -> Node {
        self.stack.last().map(|scope| scope.node).unwrap_or(self.root)
    }

    fn append(&mut self, parent: Node, value: Value) -> Node {
        let node_id = self.arena.new_node(value);
        parent.get().append(node_id, &mut self.arena);
        Node::new(node_id)
    }

    fn preserve_space(&self) -> bool {
        self.stack
            .last()
            .map(|scope| scope.preserve_space)
            .unwrap_or(false)
    }

    fn resolve(&self, prefix: &str, declarations: &[(&'a str, String)]) -> Option<String> {
        if prefix == "xml" {
            return Some(XML_NAMESPACE.to_string());
        }
        if let Some((_, uri)) = declarations.iter().find(|(p, _)| *p == prefix) {
            return Some(uri.clone());
        }
        for scope in self.stack.iter().rev() {
            if let Some((_, uri)) = scope.declarations.iter().find(|(p, _)| *p == prefix) {
                return Some(uri.clone());
            }
        }
        // no default namespace in scope means no namespace
        if prefix.is_empty() {
            Some(String::new())
        } else {
            None
        }
    }

    fn declaration(&mut self, version: StrSpan<'a>, encoding: Option<StrSpan<'a>>, standalone: Option<bool>) {
        self.declaration = Some(Declaration {
            version: version.as_str().to_string(),
            encoding: encoding.map(|e| e.as_str().to_string()),
            standalone,
        });
    }

    fn element_start(&mut self, prefix: StrSpan<'a>, local: StrSpan<'a>, span: StrSpan<'a>) -> Result<(), ParseError> {
        if self.stack.is_empty() && self.has_document_element {
            return Err(ParseError::MultipleDocumentElements { span: span.into() });
        }
        self.pending = Some(PendingElement {
            prefix: prefix.as_str(),
            local: local.as_str(),
            span: span.into(),
            attributes: Vec::new(),
        });
        Ok(())
    }

    fn attribute(&mut self, prefix: StrSpan<'a>, local: StrSpan<'a>, value: StrSpan<'a>, span: StrSpan<'a>) -> Result<(), ParseError> {
        let normalized = normalize_attribute_whitespace(value.as_str());
        let value = parse_references(&normalized, value.start())?.into_owned();
        if let Some(pending) = self.pending.as_mut() {
            pending.attributes.push(PendingAttribute {
                prefix: prefix.as_str(),
                local: local.as_str(),
                value,
                span: span.into(),
            });
        }
        Ok(())
    }

    fn open_element(&mut self, empty: bool) -> Result<(), ParseError> {
        let pending = match self.pending.take() {
            Some(pending) => pending,
            None => return Ok(()),
        };

        let mut declarations = Vec::new();
        for attribute in &pending.attributes {
            if let Some(prefix) = attribute.declared_prefix() {
                if prefix == "xmlns" {
                    return Err(ParseError::ReservedPrefix {
                        prefix: prefix.to_string(),
                        span: attribute.span,
                    });
                }
                declarations.push((prefix, attribute.value.clone()));
            }
        }

        if pending.prefix == "xmlns" {
            return Err(ParseError::ReservedPrefix {
                prefix: pending.prefix.to_string(),
                span: pending.span,
            });
        }
        let namespace = self
            .resolve(pending.prefix, &declarations)
            .ok_or_else(|| ParseError::UnknownPrefix {
                prefix: pending.prefix.to_string(),
                span: pending.span,
            })?;

        let mut preserve_space = self.preserve_space();
        let mut names: Vec<Name> = Vec::with_capacity(pending.attributes.len());
        for attribute in &pending.attributes {
            let name = if attribute.declared_prefix().is_some() {
                Name::new(attribute.prefix, attribute.local, XMLNS_NAMESPACE)
            } else if attribute.prefix.is_empty() {
                Name::new("", attribute.local, "")
            } else {
                let namespace = self
                    .resolve(attribute.prefix, &declarations)
                    .ok_or_else(|| ParseError::UnknownPrefix {
                        prefix: attribute.prefix.to_string(),
                        span: attribute.span,
                    })?;
                Name::new(attribute.prefix, attribute.local, namespace)
            };
            if names
                .iter()
                .any(|n| n.namespace() == name.namespace() && n.local_name() == name.local_name())
            {
                return Err(ParseError::DuplicateAttribute {
                    name: qualified(attribute.prefix, attribute.local),
                    span: attribute.span,
                });
            }
            if name.namespace() == XML_NAMESPACE && name.local_name() == "space" {
                match attribute.value.as_str() {
                    "preserve" => preserve_space = true,
                    "default" => preserve_space = false,
                    _ => {}
                }
            }
            names.push(name);
        }

        let parent = self.current();
        let node = self.append(
            parent,
            Value::Element(Element::new(Name::new(
                pending.prefix,
                pending.local,
                namespace,
            ))),
        );
        for (name, attribute) in names.into_iter().zip(pending.attributes) {
            self.append(node, Value::Attribute(Attribute::new(name, attribute.value)));
        }
        self.has_document_element = true;

        if !empty {
            self.stack.push(Scope {
                node,
                prefix: pending.prefix,
                local: pending.local,
                span: pending.span,
                declarations,
                preserve_space,
            });
        }
        Ok(())
    }

    fn close_element(&mut self, prefix: StrSpan<'a>, local: StrSpan<'a>, span: StrSpan<'a>) -> Result<(), ParseError> {
        let found = qualified(prefix.as_str(), local.as_str());
        match self.stack.pop() {
            Some(scope) if scope.prefix == prefix.as_str() && scope.local == local.as_str() => Ok(()),
            Some(scope) => Err(ParseError::InvalidCloseTag {
                expected: qualified(scope.prefix, scope.local),
                found,
                span: span.into(),
            }),
            None => Err(ParseError::MultipleDocumentElements { span: span.into() }),
        }
    }

    fn text(&mut self, raw: StrSpan<'a>, cdata: bool) -> Result<(), ParseError> {
        let whitespace_only = raw.as_str().chars().all(is_xml_whitespace);
        if self.stack.is_empty() {
            if whitespace_only && !cdata {
                return Ok(());
            }
            return Err(ParseError::TextOutsideElement { span: raw.into() });
        }
        if whitespace_only && !cdata && !self.preserve_space() {
            return Ok(());
        }
        let normalized = normalize_newlines(raw.as_str());
        let text = if cdata {
            normalized.into_owned()
        } else {
            parse_references(&normalized, raw.start())?.into_owned()
        };
        let parent = self.current();
        self.append(parent, Value::Text(Text::new(text, cdata)));
        Ok(())
    }

    fn comment(&mut self, text: StrSpan<'a>) {
        let parent = self.current();
        let text = normalize_newlines(text.as_str()).into_owned();
        self.append(parent, Value::Comment(Comment::new(text)));
    }

    fn processing_instruction(&mut self, target: StrSpan<'a>, content: Option<StrSpan<'a>>) {
        let parent = self.current();
        let data = content.map(|c| normalize_newlines(c.as_str()).into_owned());
        self.append(
            parent,
            Value::ProcessingInstruction(ProcessingInstruction::new(
                target.as_str().to_string(),
                data,
            )),
        );
    }

    fn finish(self) -> Result<Document, ParseError> {
        if let Some(scope) = self.stack.last() {
            return Err(ParseError::UnclosedTag {
                name: qualified(scope.prefix, scope.local),
                span: scope.span,
            });
        }
        if !self.has_document_element {
            return Err(ParseError::NoDocumentElement);
        }
        Ok(Document::from_parts(self.arena, self.root, self.declaration))
    }
}

impl Document {
    /// Parse XML text into a document.
    ///
    /// Whitespace-only text is dropped unless it is inside
    /// `xml:space="preserve"`; line endings are normalized and entity and
    /// character references resolved.
    ///
    /// ```rust
    /// use xpath_tester::Document;
    ///
    /// let doc = Document::parse("<doc>\n  <a>A &amp; B</a>\n</doc>")?;
    /// let a = doc.first_child(doc.document_element().unwrap()).unwrap();
    /// assert_eq!(doc.string_value(a), "A & B");
    /// # Ok::<(), xpath_tester::ParseError>(())
    /// ```
    pub fn parse(xml: &str) -> Result<Document, ParseError> {
        let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
        let mut builder = DocumentBuilder::new();

        for token in Tokenizer::from(xml) {
            match token? {
                Token::Declaration {
                    version,
                    encoding,
                    standalone,
                    ..
                } => builder.declaration(version, encoding, standalone),
                Token::ProcessingInstruction {
                    target, content, ..
                } => builder.processing_instruction(target, content),
                Token::Comment { text, .. } => builder.comment(text),
                Token::DtdStart { span, .. } | Token::EmptyDtd { span, .. } => {
                    return Err(ParseError::DtdUnsupported { span: span.into() })
                }
                Token::EntityDeclaration { span, .. } | Token::DtdEnd { span } => {
                    return Err(ParseError::DtdUnsupported { span: span.into() })
                }
                Token::ElementStart {
                    prefix,
                    local,
                    span,
                } => builder.element_start(prefix, local, span)?,
                Token::Attribute {
                    prefix,
                    local,
                    value,
                    span,
                } => builder.attribute(prefix, local, value, span)?,
                Token::ElementEnd { end, span } => match end {
                    ElementEnd::Open => builder.open_element(false)?,
                    ElementEnd::Empty => builder.open_element(true)?,
                    ElementEnd::Close(prefix, local) => builder.close_element(prefix, local, span)?,
                },
                Token::Text { text } => builder.text(text, false)?,
                Token::Cdata { text, .. } => builder.text(text, true)?,
            }
        }

        builder.finish()
    }

    /// Parse raw bytes, decoding them with the encoding announced by a byte
    /// order mark or the XML declaration. UTF-8 is the fallback.
    pub fn parse_bytes(data: &[u8]) -> Result<Document, ParseError> {
        Document::parse(&decode(data))
    }

    /// Load and parse a file.
    ///
    /// Returns [`Error::FileNotFound`] when there is no such file.
    pub fn load(path: &Path) -> Result<Document, Error> {
        if !path.is_file() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let data = std::fs::read(path)?;
        Ok(Document::parse_bytes(&data)?)
    }
}
