use std::borrow::Cow;
use std::fmt;

/// The namespace bound to the `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
/// The namespace of namespace declaration attributes (`xmlns`, `xmlns:p`).
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// A name as it appears in the document: the prefix it was written with,
/// its local part and the namespace URI that prefix resolved to.
///
/// Namespace declarations are attributes here, DOM style: `xmlns:p="..."`
/// has prefix `xmlns`, local name `p`, and `xmlns="..."` has an empty prefix
/// and local name `xmlns`. Both live in [`XMLNS_NAMESPACE`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    prefix: String,
    local: String,
    namespace: String,
}

impl Name {
    /// Create a name from its parts.
    pub fn new(
        prefix: impl Into<String>,
        local: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Name {
            prefix: prefix.into(),
            local: local.into(),
            namespace: namespace.into(),
        }
    }

    /// The prefix, empty if there is none.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The local part of the name.
    pub fn local_name(&self) -> &str {
        &self.local
    }

    /// The namespace URI, empty if the name is in no namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The name as written: `prefix:local` or just `local`.
    ///
    /// ```rust
    /// use xpath_tester::Name;
    ///
    /// let name = Name::new("x", "item", "urn:x");
    /// assert_eq!(name.qualified(), "x:item");
    /// assert_eq!(Name::new("", "item", "").qualified(), "item");
    /// ```
    pub fn qualified(&self) -> Cow<'_, str> {
        if self.prefix.is_empty() {
            Cow::Borrowed(&self.local)
        } else {
            Cow::Owned(format!("{}:{}", self.prefix, self.local))
        }
    }

    /// Whether this is the name of a namespace declaration attribute.
    pub fn is_namespace_declaration(&self) -> bool {
        self.namespace == XMLNS_NAMESPACE
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified())
    }
}

/// The type of an XML node, without its data.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ValueType {
    /// Document root that holds everything. This is not the document element.
    Root,
    /// Element.
    Element,
    /// Attribute, including namespace declarations.
    Attribute,
    /// Text or CDATA section.
    Text,
    /// Comment.
    Comment,
    /// Processing instruction.
    ProcessingInstruction,
}

/// The data stored for each node in the document arena.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Document root that holds everything.
    Root,
    /// Element.
    Element(Element),
    /// Attribute or namespace declaration. These are stored as the first
    /// children of their element, in source order.
    Attribute(Attribute),
    /// Text.
    Text(Text),
    /// Comment.
    Comment(Comment),
    /// Processing instruction.
    ProcessingInstruction(ProcessingInstruction),
}

impl Value {
    /// Returns the type of the XML value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Root => ValueType::Root,
            Value::Element(_) => ValueType::Element,
            Value::Attribute(_) => ValueType::Attribute,
            Value::Text(_) => ValueType::Text,
            Value::Comment(_) => ValueType::Comment,
            Value::ProcessingInstruction(_) => ValueType::ProcessingInstruction,
        }
    }

    // attributes hang off their element in the arena but aren't children
    #[inline]
    pub(crate) fn is_normal(&self) -> bool {
        !matches!(self, Value::Attribute(_))
    }
}

/// XML element value.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub(crate) name: Name,
}

impl Element {
    pub(crate) fn new(name: Name) -> Self {
        Element { name }
    }

    /// The name of the element.
    pub fn name(&self) -> &Name {
        &self.name
    }
}

/// XML attribute value. Namespace declarations are attributes too.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub(crate) name: Name,
    pub(crate) value: String,
}

impl Attribute {
    pub(crate) fn new(name: Name, value: String) -> Self {
        Attribute { name, value }
    }

    /// The attribute name.
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The normalized attribute value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether this attribute declares a namespace.
    pub fn is_namespace_declaration(&self) -> bool {
        self.name.is_namespace_declaration()
    }
}

/// Text node, either character data or a CDATA section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub(crate) text: String,
    pub(crate) cdata: bool,
}

impl Text {
    pub(crate) fn new(text: String, cdata: bool) -> Self {
        Text { text, cdata }
    }

    /// The text content.
    pub fn get(&self) -> &str {
        &self.text
    }

    /// Whether this text came from a CDATA section.
    pub fn is_cdata(&self) -> bool {
        self.cdata
    }
}

/// Comment node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub(crate) text: String,
}

impl Comment {
    pub(crate) fn new(text: String) -> Self {
        Comment { text }
    }

    /// The comment text, without `<!--` and `-->`.
    pub fn get(&self) -> &str {
        &self.text
    }
}

/// Processing instruction node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingInstruction {
    pub(crate) target: String,
    pub(crate) data: Option<String>,
}

impl ProcessingInstruction {
    pub(crate) fn new(target: String, data: Option<String>) -> Self {
        ProcessingInstruction { target, data }
    }

    /// The target.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The data, if any.
    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }
}

/// The XML declaration at the top of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub(crate) version: String,
    pub(crate) encoding: Option<String>,
    pub(crate) standalone: Option<bool>,
}

impl Declaration {
    /// The XML version, normally `1.0`.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The declared encoding label.
    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    /// The declared standalone flag.
    pub fn standalone(&self) -> Option<bool> {
        self.standalone
    }
}
