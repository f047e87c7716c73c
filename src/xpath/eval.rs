use ahash::AHashSet;

use crate::document::{Document, Node};
use crate::error::XPathError;
use crate::namespace::NamespaceMap;
use crate::xmlvalue::{Value, XML_NAMESPACE, XMLNS_NAMESPACE};

use super::ast::{Axis, BinaryOperator, Expr, NodeTest, Step};
use super::value::XPathValue;

/// The dynamic context: the context node with its proximity position and
/// the context size.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Context {
    pub(crate) node: Node,
    pub(crate) position: usize,
    pub(crate) size: usize,
}

impl Context {
    pub(crate) fn new(node: Node) -> Self {
        Context {
            node,
            position: 1,
            size: 1,
        }
    }
}

pub(crate) struct Evaluator<'a> {
    pub(crate) doc: &'a Document,
    namespaces: &'a NamespaceMap,
}

/// Make sure every prefix used in the expression is bound, before any
/// evaluation happens.
pub(crate) fn check_bindings(expr: &Expr, namespaces: &NamespaceMap) -> Result<(), XPathError> {
    let check_steps = |steps: &[Step]| -> Result<(), XPathError> {
        for step in steps {
            match &step.test {
                NodeTest::AnyInNamespace(prefix) | NodeTest::Name { prefix, .. } => {
                    resolve_prefix(namespaces, prefix)?;
                }
                _ => {}
            }
            for predicate in &step.predicates {
                check_bindings(predicate, namespaces)?;
            }
        }
        Ok(())
    };
    match expr {
        Expr::Binary(_, left, right) | Expr::Union(left, right) => {
            check_bindings(left, namespaces)?;
            check_bindings(right, namespaces)
        }
        Expr::Negate(operand) => check_bindings(operand, namespaces),
        Expr::Path { steps, .. } => check_steps(steps),
        Expr::Filter(primary, predicates) => {
            check_bindings(primary, namespaces)?;
            predicates
                .iter()
                .try_for_each(|predicate| check_bindings(predicate, namespaces))
        }
        Expr::PathFrom(base, steps) => {
            check_bindings(base, namespaces)?;
            check_steps(steps)
        }
        Expr::Function(_, arguments) => arguments
            .iter()
            .try_for_each(|argument| check_bindings(argument, namespaces)),
        Expr::Variable(_) => Err(XPathError::ContextNeeded),
        Expr::Literal(_) | Expr::Number(_) => Ok(()),
    }
}

fn resolve_prefix<'a>(namespaces: &'a NamespaceMap, prefix: &str) -> Result<&'a str, XPathError> {
    match prefix {
        "" => Ok(""),
        "xml" => Ok(XML_NAMESPACE),
        "xmlns" => Ok(XMLNS_NAMESPACE),
        _ => namespaces
            .get(prefix)
            .ok_or_else(|| XPathError::UndefinedPrefix(prefix.to_string())),
    }
}

impl<'a> Evaluator<'a> {
    pub(crate) fn new(doc: &'a Document, namespaces: &'a NamespaceMap) -> Self {
        Evaluator { doc, namespaces }
    }

    pub(crate) fn evaluate(&self, expr: &Expr, context: Context) -> Result<XPathValue, XPathError> {
        match expr {
            Expr::Binary(BinaryOperator::Or, left, right) => Ok(XPathValue::Boolean(
                self.evaluate(left, context)?.to_boolean()
                    || self.evaluate(right, context)?.to_boolean(),
            )),
            Expr::Binary(BinaryOperator::And, left, right) => Ok(XPathValue::Boolean(
                self.evaluate(left, context)?.to_boolean()
                    && self.evaluate(right, context)?.to_boolean(),
            )),
            Expr::Binary(operator, left, right) => {
                let left = self.evaluate(left, context)?;
                let right = self.evaluate(right, context)?;
                Ok(self.binary(*operator, &left, &right))
            }
            Expr::Negate(operand) => Ok(XPathValue::Number(
                -self.evaluate(operand, context)?.to_number(self.doc),
            )),
            Expr::Union(left, right) => {
                let mut nodes = self.node_set(left, context)?;
                nodes.extend(self.node_set(right, context)?);
                Ok(XPathValue::NodeSet(self.in_document_order(nodes)))
            }
            Expr::Path { absolute, steps } => {
                let start = if *absolute {
                    self.doc.root()
                } else {
                    context.node
                };
                Ok(XPathValue::NodeSet(self.steps(vec![start], steps)?))
            }
            Expr::Filter(primary, predicates) => {
                let mut nodes = self.node_set(primary, context)?;
                for predicate in predicates {
                    nodes = self.filter(nodes, predicate)?;
                }
                Ok(XPathValue::NodeSet(nodes))
            }
            Expr::PathFrom(base, steps) => {
                let nodes = self.node_set(base, context)?;
                Ok(XPathValue::NodeSet(self.steps(nodes, steps)?))
            }
            Expr::Literal(literal) => Ok(XPathValue::String(literal.clone())),
            Expr::Number(number) => Ok(XPathValue::Number(*number)),
            Expr::Variable(_) => Err(XPathError::ContextNeeded),
            Expr::Function(function, arguments) => self.call(*function, arguments, context),
        }
    }

    pub(crate) fn node_set(&self, expr: &Expr, context: Context) -> Result<Vec<Node>, XPathError> {
        match self.evaluate(expr, context)? {
            XPathValue::NodeSet(nodes) => Ok(nodes),
            _ => Err(XPathError::NodeSetExpected),
        }
    }

    fn in_document_order(&self, nodes: Vec<Node>) -> Vec<Node> {
        let mut seen = AHashSet::with_capacity(nodes.len());
        let mut nodes: Vec<Node> = nodes.into_iter().filter(|node| seen.insert(*node)).collect();
        self.doc.sort_in_document_order(&mut nodes);
        nodes
    }

    fn steps(&self, mut nodes: Vec<Node>, steps: &[Step]) -> Result<Vec<Node>, XPathError> {
        for step in steps {
            let mut result = Vec::new();
            for node in nodes {
                result.extend(self.step(node, step)?);
            }
            nodes = self.in_document_order(result);
        }
        Ok(nodes)
    }

    fn step(&self, node: Node, step: &Step) -> Result<Vec<Node>, XPathError> {
        let mut nodes = Vec::new();
        for candidate in self.axis(node, step.axis) {
            if self.matches(candidate, step.axis, &step.test)? {
                nodes.push(candidate);
            }
        }
        // positions follow the axis direction, which is what the axis
        // iteration order gives us
        for predicate in &step.predicates {
            nodes = self.filter(nodes, predicate)?;
        }
        Ok(nodes)
    }

    fn filter(&self, nodes: Vec<Node>, predicate: &Expr) -> Result<Vec<Node>, XPathError> {
        let size = nodes.len();
        let mut result = Vec::new();
        for (index, node) in nodes.into_iter().enumerate() {
            let context = Context {
                node,
                position: index + 1,
                size,
            };
            let keep = match self.evaluate(predicate, context)? {
                XPathValue::Number(n) => n == (index + 1) as f64,
                value => value.to_boolean(),
            };
            if keep {
                result.push(node);
            }
        }
        Ok(result)
    }

    fn axis(&self, node: Node, axis: Axis) -> Vec<Node> {
        let doc = self.doc;
        let mut nodes = match axis {
            Axis::Child => doc.children(node).collect(),
            Axis::Descendant => doc.descendants(node).collect(),
            Axis::DescendantOrSelf => std::iter::once(node).chain(doc.descendants(node)).collect(),
            Axis::Parent => doc.parent(node).into_iter().collect(),
            Axis::Ancestor => doc.ancestors(node).collect(),
            Axis::AncestorOrSelf => std::iter::once(node).chain(doc.ancestors(node)).collect(),
            Axis::FollowingSibling => doc.following_siblings(node).collect(),
            Axis::PrecedingSibling => doc.preceding_siblings(node).collect(),
            Axis::Following => self.following(node),
            Axis::Preceding => self.preceding(node),
            Axis::Attribute => doc
                .attributes(node)
                .filter(|attribute| !doc.is_namespace_declaration(*attribute))
                .collect(),
            Axis::SelfAxis => vec![node],
            // rejected when parsing
            Axis::Namespace => Vec::new(),
        };
        // a run of adjacent text siblings is visible through its first node
        nodes.retain(|n| doc.starts_text_run(*n));
        nodes
    }

    fn following(&self, node: Node) -> Vec<Node> {
        let doc = self.doc;
        let mut result = Vec::new();
        let mut current = node;
        if let Value::Attribute(_) = doc.value(node) {
            match doc.parent(node) {
                Some(parent) => {
                    result.extend(doc.descendants(parent));
                    current = parent;
                }
                None => return result,
            }
        }
        for ancestor in std::iter::once(current).chain(doc.ancestors(current)) {
            for sibling in doc.following_siblings(ancestor) {
                result.push(sibling);
                result.extend(doc.descendants(sibling));
            }
        }
        // siblings of nearer ancestors come first, restore document order
        doc.sort_in_document_order(&mut result);
        result
    }

    fn preceding(&self, node: Node) -> Vec<Node> {
        let doc = self.doc;
        let target = match doc.value(node) {
            Value::Attribute(_) => match doc.parent(node) {
                Some(parent) => parent,
                None => return Vec::new(),
            },
            _ => node,
        };
        let ancestors: AHashSet<Node> = doc.ancestors(target).collect();
        let order = doc.document_order(target);
        let mut result: Vec<Node> = doc
            .descendants(doc.root())
            .take_while(|n| doc.document_order(*n) < order)
            .filter(|n| !ancestors.contains(n))
            .collect();
        result.reverse();
        result
    }

    fn matches(&self, node: Node, axis: Axis, test: &NodeTest) -> Result<bool, XPathError> {
        let value = self.doc.value(node);
        let principal = if axis == Axis::Attribute {
            matches!(value, Value::Attribute(_))
        } else {
            matches!(value, Value::Element(_))
        };
        Ok(match test {
            NodeTest::Node => true,
            NodeTest::Text => matches!(value, Value::Text(_)),
            NodeTest::Comment => matches!(value, Value::Comment(_)),
            NodeTest::ProcessingInstruction(target) => match value {
                Value::ProcessingInstruction(pi) => target
                    .as_deref()
                    .map(|target| target == pi.target())
                    .unwrap_or(true),
                _ => false,
            },
            NodeTest::Any => principal,
            NodeTest::AnyInNamespace(prefix) => {
                let namespace = resolve_prefix(self.namespaces, prefix)?;
                principal
                    && self
                        .doc
                        .name(node)
                        .map(|name| name.namespace() == namespace)
                        .unwrap_or(false)
            }
            NodeTest::Name { prefix, local } => {
                let namespace = resolve_prefix(self.namespaces, prefix)?;
                principal
                    && self
                        .doc
                        .name(node)
                        .map(|name| name.namespace() == namespace && name.local_name() == local)
                        .unwrap_or(false)
            }
        })
    }

    fn binary(&self, operator: BinaryOperator, left: &XPathValue, right: &XPathValue) -> XPathValue {
        use BinaryOperator::*;
        match operator {
            Add | Subtract | Multiply | Divide | Modulo => {
                let left = left.to_number(self.doc);
                let right = right.to_number(self.doc);
                XPathValue::Number(match operator {
                    Add => left + right,
                    Subtract => left - right,
                    Multiply => left * right,
                    Divide => left / right,
                    _ => left % right,
                })
            }
            _ => XPathValue::Boolean(self.compare(operator, left, right)),
        }
    }

    fn compare(&self, operator: BinaryOperator, left: &XPathValue, right: &XPathValue) -> bool {
        use XPathValue::*;
        let string_value = |node: &Node| String(self.doc.query_string_value(*node));
        match (left, right) {
            (NodeSet(left), NodeSet(right)) => {
                let right: Vec<XPathValue> = right.iter().map(string_value).collect();
                left.iter().any(|l| {
                    let l = string_value(l);
                    right.iter().any(|r| self.compare_atoms(operator, &l, r))
                })
            }
            (NodeSet(nodes), Boolean(b)) => {
                self.compare_atoms(operator, &Boolean(!nodes.is_empty()), &Boolean(*b))
            }
            (Boolean(b), NodeSet(nodes)) => {
                self.compare_atoms(operator, &Boolean(*b), &Boolean(!nodes.is_empty()))
            }
            (NodeSet(nodes), other) => nodes
                .iter()
                .any(|node| self.compare_atoms(operator, &string_value(node), other)),
            (other, NodeSet(nodes)) => nodes
                .iter()
                .any(|node| self.compare_atoms(operator, other, &string_value(node))),
            _ => self.compare_atoms(operator, left, right),
        }
    }

    // neither side is a node-set here
    fn compare_atoms(&self, operator: BinaryOperator, left: &XPathValue, right: &XPathValue) -> bool {
        use BinaryOperator::*;
        use XPathValue::*;
        match operator {
            Equal | NotEqual => {
                // NaN is unequal to everything, itself included
                let equal = match (left, right) {
                    (Boolean(_), _) | (_, Boolean(_)) => left.to_boolean() == right.to_boolean(),
                    (Number(_), _) | (_, Number(_)) => {
                        left.to_number(self.doc) == right.to_number(self.doc)
                    }
                    _ => left.to_string_value(self.doc) == right.to_string_value(self.doc),
                };
                (operator == Equal) == equal
            }
            _ => {
                let left = left.to_number(self.doc);
                let right = right.to_number(self.doc);
                match operator {
                    Less => left < right,
                    LessEqual => left <= right,
                    Greater => left > right,
                    _ => left >= right,
                }
            }
        }
    }
}
