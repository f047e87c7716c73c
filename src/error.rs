use std::fmt;
use std::path::PathBuf;

/// A byte range in parsed XML text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Start offset (inclusive).
    pub start: usize,
    /// End offset (exclusive).
    pub end: usize,
}

impl Span {
    pub(crate) fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }
}

impl From<std::ops::Range<usize>> for Span {
    #[inline]
    fn from(range: std::ops::Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

impl<'a> From<xmlparser::StrSpan<'a>> for Span {
    #[inline]
    fn from(span: xmlparser::StrSpan<'a>) -> Self {
        Span::new(span.start(), span.end())
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Well-formedness problems found while parsing XML text.
#[derive(Debug)]
pub enum ParseError {
    /// The tokenizer rejected the input.
    XmlParser(xmlparser::Error),
    /// A close tag doesn't match the open element.
    InvalidCloseTag {
        expected: String,
        found: String,
        span: Span,
    },
    /// An element was still open at the end of the input.
    UnclosedTag { name: String, span: Span },
    /// A prefix was used that isn't declared in scope.
    UnknownPrefix { prefix: String, span: Span },
    /// The `xmlns` prefix was used as an element prefix, or bound.
    ReservedPrefix { prefix: String, span: Span },
    /// The same attribute appears twice on one element.
    DuplicateAttribute { name: String, span: Span },
    /// An entity reference without its closing `;`.
    UnclosedEntity { entity: String, span: Span },
    /// An entity or character reference we cannot resolve.
    InvalidEntity { entity: String, span: Span },
    /// Document type declarations are not supported.
    DtdUnsupported { span: Span },
    /// Non-whitespace text outside of the document element.
    TextOutsideElement { span: Span },
    /// A second top-level element.
    MultipleDocumentElements { span: Span },
    /// The input has no document element at all.
    NoDocumentElement,
}

impl ParseError {
    /// The location of the problem in the input, when known.
    pub fn span(&self) -> Option<Span> {
        use ParseError::*;
        match self {
            XmlParser(_) | NoDocumentElement => None,
            InvalidCloseTag { span, .. }
            | UnclosedTag { span, .. }
            | UnknownPrefix { span, .. }
            | ReservedPrefix { span, .. }
            | DuplicateAttribute { span, .. }
            | UnclosedEntity { span, .. }
            | InvalidEntity { span, .. }
            | DtdUnsupported { span }
            | TextOutsideElement { span }
            | MultipleDocumentElements { span } => Some(*span),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ParseError::*;
        match self {
            XmlParser(e) => write!(f, "{}", e),
            InvalidCloseTag {
                expected,
                found,
                span,
            } => write!(
                f,
                "The '{}' start tag does not match the end tag of '{}' ({})",
                expected, found, span
            ),
            UnclosedTag { name, span } => {
                write!(f, "The '{}' start tag is never closed ({})", name, span)
            }
            UnknownPrefix { prefix, span } => {
                write!(f, "'{}' is an undeclared prefix ({})", prefix, span)
            }
            ReservedPrefix { prefix, span } => {
                write!(f, "The prefix '{}' is reserved ({})", prefix, span)
            }
            DuplicateAttribute { name, span } => {
                write!(f, "'{}' is a duplicate attribute name ({})", name, span)
            }
            UnclosedEntity { entity, span } => {
                write!(f, "Reference '&{}' is not terminated by ';' ({})", entity, span)
            }
            InvalidEntity { entity, span } => {
                write!(f, "Reference to undeclared entity '{}' ({})", entity, span)
            }
            DtdUnsupported { span } => {
                write!(f, "Document type declarations are not supported ({})", span)
            }
            TextOutsideElement { span } => {
                write!(f, "Data at the root level is invalid ({})", span)
            }
            MultipleDocumentElements { span } => {
                write!(f, "There are multiple root elements ({})", span)
            }
            NoDocumentElement => write!(f, "Root element is missing."),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::XmlParser(e) => Some(e),
            _ => None,
        }
    }
}

impl From<xmlparser::Error> for ParseError {
    #[inline]
    fn from(e: xmlparser::Error) -> Self {
        ParseError::XmlParser(e)
    }
}

/// Failures compiling or evaluating an XPath expression.
///
/// The messages follow the wording XPath users know from the common
/// engines, since they are shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XPathError {
    /// The expression contains a character or name that isn't a token.
    InvalidToken(String),
    /// A string literal without its closing quote.
    UnclosedString,
    /// The tokens don't form an expression.
    InvalidExpression(String),
    /// The result, or a path step input, is not a node-set.
    NodeSetExpected,
    /// A prefix in a name test is not bound.
    UndefinedPrefix(String),
    /// Variables, prefixed or unknown functions need an evaluation context
    /// this tool doesn't provide.
    ContextNeeded,
    /// A core function was called with the wrong number of arguments.
    InvalidArgumentCount {
        function: String,
        expression: String,
    },
    /// A core function that takes a node-set got something else.
    NodeSetArgumentExpected {
        function: String,
        expression: String,
    },
    /// The `namespace` axis is not available.
    NamespaceAxis,
}

impl fmt::Display for XPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use XPathError::*;
        match self {
            InvalidToken(expression) => write!(f, "'{}' has an invalid token.", expression),
            UnclosedString => write!(f, "This is an unclosed string."),
            InvalidExpression(expression) => {
                write!(f, "'{}' is an invalid expression.", expression)
            }
            NodeSetExpected => write!(f, "Expression must evaluate to a node-set."),
            UndefinedPrefix(prefix) => write!(f, "Namespace prefix '{}' is not defined.", prefix),
            ContextNeeded => write!(
                f,
                "Namespace Manager or XsltContext needed. This query has a prefix, variable, or user-defined function."
            ),
            InvalidArgumentCount {
                function,
                expression,
            } => write!(
                f,
                "Function '{}()' in '{}' has an invalid number of arguments.",
                function, expression
            ),
            NodeSetArgumentExpected {
                function,
                expression,
            } => write!(
                f,
                "The argument to function '{}()' in '{}' cannot be converted to a node-set.",
                function, expression
            ),
            NamespaceAxis => write!(f, "The namespace axis is not supported."),
        }
    }
}

impl std::error::Error for XPathError {}

/// Everything that can go wrong in this crate.
#[derive(Debug)]
pub enum Error {
    /// The XML text is not well-formed.
    Parse(ParseError),
    /// The XPath expression failed to compile or evaluate.
    XPath(XPathError),
    /// Reading or writing a file failed.
    Io(std::io::Error),
    /// The file to load isn't there.
    FileNotFound(PathBuf),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "{}", e),
            Error::XPath(e) => write!(f, "{}", e),
            Error::Io(e) => write!(f, "{}", e),
            Error::FileNotFound(_) => write!(f, "File doesn't exist"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            Error::XPath(e) => Some(e),
            Error::Io(e) => Some(e),
            Error::FileNotFound(_) => None,
        }
    }
}

impl From<ParseError> for Error {
    #[inline]
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

impl From<XPathError> for Error {
    #[inline]
    fn from(e: XPathError) -> Self {
        Error::XPath(e)
    }
}

impl From<std::io::Error> for Error {
    #[inline]
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<xmlparser::Error> for Error {
    #[inline]
    fn from(e: xmlparser::Error) -> Self {
        Error::Parse(ParseError::XmlParser(e))
    }
}
