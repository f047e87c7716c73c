#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    Ancestor,
    AncestorOrSelf,
    Attribute,
    Child,
    Descendant,
    DescendantOrSelf,
    Following,
    FollowingSibling,
    Namespace,
    Parent,
    Preceding,
    PrecedingSibling,
    SelfAxis,
}

impl Axis {
    pub(crate) fn from_name(name: &str) -> Option<Axis> {
        use Axis::*;
        Some(match name {
            "ancestor" => Ancestor,
            "ancestor-or-self" => AncestorOrSelf,
            "attribute" => Attribute,
            "child" => Child,
            "descendant" => Descendant,
            "descendant-or-self" => DescendantOrSelf,
            "following" => Following,
            "following-sibling" => FollowingSibling,
            "namespace" => Namespace,
            "parent" => Parent,
            "preceding" => Preceding,
            "preceding-sibling" => PrecedingSibling,
            "self" => SelfAxis,
            _ => return None,
        })
    }

    /// Reverse axes number their nodes nearest first.
    pub(crate) fn is_reverse(self) -> bool {
        matches!(
            self,
            Axis::Ancestor | Axis::AncestorOrSelf | Axis::Preceding | Axis::PrecedingSibling
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NodeTest {
    /// `*`: any node of the axis' principal type.
    Any,
    /// `prefix:*`
    AnyInNamespace(String),
    Name { prefix: String, local: String },
    Node,
    Text,
    Comment,
    ProcessingInstruction(Option<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Step {
    pub(crate) axis: Axis,
    pub(crate) test: NodeTest,
    pub(crate) predicates: Vec<Expr>,
}

impl Step {
    pub(crate) fn new(axis: Axis, test: NodeTest) -> Self {
        Step {
            axis,
            test,
            predicates: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOperator {
    Or,
    And,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Function {
    Last,
    Position,
    Count,
    Id,
    LocalName,
    NamespaceUri,
    Name,
    String,
    Concat,
    StartsWith,
    Contains,
    SubstringBefore,
    SubstringAfter,
    Substring,
    StringLength,
    NormalizeSpace,
    Translate,
    Boolean,
    Not,
    True,
    False,
    Lang,
    Number,
    Sum,
    Floor,
    Ceiling,
    Round,
}

impl Function {
    pub(crate) fn from_name(name: &str) -> Option<Function> {
        use Function::*;
        Some(match name {
            "last" => Last,
            "position" => Position,
            "count" => Count,
            "id" => Id,
            "local-name" => LocalName,
            "namespace-uri" => NamespaceUri,
            "name" => Name,
            "string" => String,
            "concat" => Concat,
            "starts-with" => StartsWith,
            "contains" => Contains,
            "substring-before" => SubstringBefore,
            "substring-after" => SubstringAfter,
            "substring" => Substring,
            "string-length" => StringLength,
            "normalize-space" => NormalizeSpace,
            "translate" => Translate,
            "boolean" => Boolean,
            "not" => Not,
            "true" => True,
            "false" => False,
            "lang" => Lang,
            "number" => Number,
            "sum" => Sum,
            "floor" => Floor,
            "ceiling" => Ceiling,
            "round" => Round,
            _ => return None,
        })
    }

    pub(crate) fn name(self) -> &'static str {
        use Function::*;
        match self {
            Last => "last",
            Position => "position",
            Count => "count",
            Id => "id",
            LocalName => "local-name",
            NamespaceUri => "namespace-uri",
            Name => "name",
            String => "string",
            Concat => "concat",
            StartsWith => "starts-with",
            Contains => "contains",
            SubstringBefore => "substring-before",
            SubstringAfter => "substring-after",
            Substring => "substring",
            StringLength => "string-length",
            NormalizeSpace => "normalize-space",
            Translate => "translate",
            Boolean => "boolean",
            Not => "not",
            True => "true",
            False => "false",
            Lang => "lang",
            Number => "number",
            Sum => "sum",
            Floor => "floor",
            Ceiling => "ceiling",
            Round => "round",
        }
    }

    /// Minimum and maximum number of arguments; `None` is unbounded.
    pub(crate) fn arity(self) -> (usize, Option<usize>) {
        use Function::*;
        match self {
            Last | Position | True | False => (0, Some(0)),
            Count | Id | Boolean | Not | Lang | Sum | Floor | Ceiling | Round => (1, Some(1)),
            LocalName | NamespaceUri | Name | String | StringLength | NormalizeSpace
            | Number => (0, Some(1)),
            StartsWith | Contains | SubstringBefore | SubstringAfter => (2, Some(2)),
            Substring => (2, Some(3)),
            Translate => (3, Some(3)),
            Concat => (2, None),
        }
    }

    /// Functions whose argument must be a node-set.
    pub(crate) fn takes_node_set(self) -> bool {
        matches!(
            self,
            Function::Count
                | Function::LocalName
                | Function::NamespaceUri
                | Function::Name
                | Function::Sum
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Binary(BinaryOperator, Box<Expr>, Box<Expr>),
    Negate(Box<Expr>),
    Union(Box<Expr>, Box<Expr>),
    /// A location path; absolute paths start at the root.
    Path { absolute: bool, steps: Vec<Step> },
    /// A primary expression with predicates.
    Filter(Box<Expr>, Vec<Expr>),
    /// Location steps applied to the nodes of an expression.
    PathFrom(Box<Expr>, Vec<Step>),
    Literal(String),
    Number(f64),
    Variable(String),
    Function(Function, Vec<Expr>),
}
