use crate::error::XPathError;

use super::ast::{Axis, BinaryOperator, Expr, Function, NodeTest, Step};
use super::lexer::{tokenize, Token};

struct Parser<'a> {
    expression: &'a str,
    tokens: Vec<Token>,
    index: usize,
}

/// Compile an expression into its syntax tree.
pub(crate) fn parse(expression: &str) -> Result<Expr, XPathError> {
    let tokens = tokenize(expression)?;
    let mut parser = Parser {
        expression,
        tokens,
        index: 0,
    };
    let expr = parser.parse_or_expr()?;
    if parser.peek().is_some() {
        return Err(parser.invalid_expression());
    }
    Ok(expr)
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn accept(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token) -> Result<(), XPathError> {
        if self.accept(token) {
            Ok(())
        } else {
            Err(self.invalid_expression())
        }
    }

    fn invalid_expression(&self) -> XPathError {
        XPathError::InvalidExpression(self.expression.to_string())
    }

    fn parse_binary(
        &mut self,
        operators: &[(Token, BinaryOperator)],
        operand: fn(&mut Self) -> Result<Expr, XPathError>,
    ) -> Result<Expr, XPathError> {
        let mut left = operand(self)?;
        'outer: loop {
            for (token, operator) in operators {
                if self.accept(token) {
                    let right = operand(self)?;
                    left = Expr::Binary(*operator, Box::new(left), Box::new(right));
                    continue 'outer;
                }
            }
            return Ok(left);
        }
    }

    fn parse_or_expr(&mut self) -> Result<Expr, XPathError> {
        self.parse_binary(&[(Token::Or, BinaryOperator::Or)], Self::parse_and_expr)
    }

    fn parse_and_expr(&mut self) -> Result<Expr, XPathError> {
        self.parse_binary(&[(Token::And, BinaryOperator::And)], Self::parse_equality_expr)
    }

    fn parse_equality_expr(&mut self) -> Result<Expr, XPathError> {
        self.parse_binary(
            &[
                (Token::Equal, BinaryOperator::Equal),
                (Token::NotEqual, BinaryOperator::NotEqual),
            ],
            Self::parse_relational_expr,
        )
    }

    fn parse_relational_expr(&mut self) -> Result<Expr, XPathError> {
        self.parse_binary(
            &[
                (Token::Less, BinaryOperator::Less),
                (Token::LessEqual, BinaryOperator::LessEqual),
                (Token::Greater, BinaryOperator::Greater),
                (Token::GreaterEqual, BinaryOperator::GreaterEqual),
            ],
            Self::parse_additive_expr,
        )
    }

    fn parse_additive_expr(&mut self) -> Result<Expr, XPathError> {
        self.parse_binary(
            &[
                (Token::Plus, BinaryOperator::Add),
                (Token::Minus, BinaryOperator::Subtract),
            ],
            Self::parse_multiplicative_expr,
        )
    }

    fn parse_multiplicative_expr(&mut self) -> Result<Expr, XPathError> {
        self.parse_binary(
            &[
                (Token::Multiply, BinaryOperator::Multiply),
                (Token::Div, BinaryOperator::Divide),
                (Token::Mod, BinaryOperator::Modulo),
            ],
            Self::parse_unary_expr,
        )
    }

    fn parse_unary_expr(&mut self) -> Result<Expr, XPathError> {
        if self.accept(&Token::Minus) {
            let operand = self.parse_unary_expr()?;
            return Ok(Expr::Negate(Box::new(operand)));
        }
        self.parse_union_expr()
    }

    fn parse_union_expr(&mut self) -> Result<Expr, XPathError> {
        let mut left = self.parse_path_expr()?;
        while self.accept(&Token::Pipe) {
            let right = self.parse_path_expr()?;
            left = Expr::Union(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_path_expr(&mut self) -> Result<Expr, XPathError> {
        match self.peek() {
            Some(
                Token::Variable { .. }
                | Token::LeftParen
                | Token::Literal(_)
                | Token::Number(_)
                | Token::FunctionName { .. },
            ) => {
                let filter = self.parse_filter_expr()?;
                let mut steps = Vec::new();
                self.parse_continuation(&mut steps)?;
                if steps.is_empty() {
                    Ok(filter)
                } else {
                    Ok(Expr::PathFrom(Box::new(filter), steps))
                }
            }
            _ => self.parse_location_path(),
        }
    }

    // `/step` and `//step` after a filter expression or a first step
    fn parse_continuation(&mut self, steps: &mut Vec<Step>) -> Result<(), XPathError> {
        loop {
            if self.accept(&Token::Slash) {
                steps.push(self.parse_step()?);
            } else if self.accept(&Token::SlashSlash) {
                steps.push(Step::new(Axis::DescendantOrSelf, NodeTest::Node));
                steps.push(self.parse_step()?);
            } else {
                return Ok(());
            }
        }
    }

    fn parse_filter_expr(&mut self) -> Result<Expr, XPathError> {
        let primary = self.parse_primary_expr()?;
        let predicates = self.parse_predicates()?;
        if predicates.is_empty() {
            Ok(primary)
        } else {
            Ok(Expr::Filter(Box::new(primary), predicates))
        }
    }

    fn parse_primary_expr(&mut self) -> Result<Expr, XPathError> {
        match self.next() {
            Some(Token::Variable { prefix, local }) => Ok(Expr::Variable(if prefix.is_empty() {
                local
            } else {
                format!("{}:{}", prefix, local)
            })),
            Some(Token::LeftParen) => {
                let expr = self.parse_or_expr()?;
                self.expect(&Token::RightParen)?;
                Ok(expr)
            }
            Some(Token::Literal(literal)) => Ok(Expr::Literal(literal)),
            Some(Token::Number(number)) => Ok(Expr::Number(number)),
            Some(Token::FunctionName { prefix, local }) => self.parse_function_call(&prefix, &local),
            _ => Err(self.invalid_expression()),
        }
    }

    fn parse_function_call(&mut self, prefix: &str, local: &str) -> Result<Expr, XPathError> {
        // extension functions need a context we don't have
        let function = if prefix.is_empty() {
            Function::from_name(local)
        } else {
            None
        }
        .ok_or(XPathError::ContextNeeded)?;

        self.expect(&Token::LeftParen)?;
        let mut arguments = Vec::new();
        if !self.accept(&Token::RightParen) {
            loop {
                arguments.push(self.parse_or_expr()?);
                if self.accept(&Token::RightParen) {
                    break;
                }
                self.expect(&Token::Comma)?;
            }
        }

        let (min, max) = function.arity();
        if arguments.len() < min || max.map(|max| arguments.len() > max).unwrap_or(false) {
            return Err(XPathError::InvalidArgumentCount {
                function: function.name().to_string(),
                expression: self.expression.to_string(),
            });
        }
        if function.takes_node_set() && arguments.iter().any(|a| !may_be_node_set(a)) {
            return Err(XPathError::NodeSetArgumentExpected {
                function: function.name().to_string(),
                expression: self.expression.to_string(),
            });
        }
        Ok(Expr::Function(function, arguments))
    }

    fn parse_predicates(&mut self) -> Result<Vec<Expr>, XPathError> {
        let mut predicates = Vec::new();
        while self.accept(&Token::LeftBracket) {
            predicates.push(self.parse_or_expr()?);
            self.expect(&Token::RightBracket)?;
        }
        Ok(predicates)
    }

    fn starts_step(&self) -> bool {
        matches!(
            self.peek(),
            Some(
                Token::Star
                    | Token::PrefixStar(_)
                    | Token::QName { .. }
                    | Token::NodeType(_)
                    | Token::AxisName(_)
                    | Token::At
                    | Token::Dot
                    | Token::DotDot
            )
        )
    }

    fn parse_location_path(&mut self) -> Result<Expr, XPathError> {
        let mut steps = Vec::new();
        let absolute = if self.accept(&Token::Slash) {
            if !self.starts_step() {
                return Ok(Expr::Path {
                    absolute: true,
                    steps,
                });
            }
            true
        } else if self.accept(&Token::SlashSlash) {
            steps.push(Step::new(Axis::DescendantOrSelf, NodeTest::Node));
            true
        } else {
            false
        };
        steps.push(self.parse_step()?);
        self.parse_continuation(&mut steps)?;
        Ok(Expr::Path { absolute, steps })
    }

    fn parse_step(&mut self) -> Result<Step, XPathError> {
        if self.accept(&Token::Dot) {
            return Ok(Step::new(Axis::SelfAxis, NodeTest::Node));
        }
        if self.accept(&Token::DotDot) {
            return Ok(Step::new(Axis::Parent, NodeTest::Node));
        }
        let axis = match self.peek() {
            Some(Token::At) => {
                self.index += 1;
                Axis::Attribute
            }
            Some(Token::AxisName(name)) => {
                let axis = Axis::from_name(name).ok_or_else(|| self.invalid_expression())?;
                self.index += 1;
                axis
            }
            _ => Axis::Child,
        };
        if axis == Axis::Namespace {
            return Err(XPathError::NamespaceAxis);
        }
        let test = self.parse_node_test()?;
        let predicates = self.parse_predicates()?;
        Ok(Step {
            axis,
            test,
            predicates,
        })
    }

    fn parse_node_test(&mut self) -> Result<NodeTest, XPathError> {
        match self.next() {
            Some(Token::Star) => Ok(NodeTest::Any),
            Some(Token::PrefixStar(prefix)) => Ok(NodeTest::AnyInNamespace(prefix)),
            Some(Token::QName { prefix, local }) => Ok(NodeTest::Name { prefix, local }),
            Some(Token::NodeType(node_type)) => {
                self.expect(&Token::LeftParen)?;
                let test = match node_type.as_str() {
                    "node" => NodeTest::Node,
                    "text" => NodeTest::Text,
                    "comment" => NodeTest::Comment,
                    _ => match self.peek() {
                        Some(Token::Literal(target)) => {
                            let target = target.clone();
                            self.index += 1;
                            NodeTest::ProcessingInstruction(Some(target))
                        }
                        _ => NodeTest::ProcessingInstruction(None),
                    },
                };
                self.expect(&Token::RightParen)?;
                Ok(test)
            }
            _ => Err(self.invalid_expression()),
        }
    }
}

/// Whether an expression can produce a node-set at all.
pub(crate) fn may_be_node_set(expr: &Expr) -> bool {
    match expr {
        Expr::Path { .. } | Expr::PathFrom(..) | Expr::Union(..) | Expr::Variable(_) => true,
        Expr::Filter(primary, _) => may_be_node_set(primary),
        Expr::Function(function, _) => *function == Function::Id,
        Expr::Binary(..) | Expr::Negate(_) | Expr::Literal(_) | Expr::Number(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(local: &str) -> NodeTest {
        NodeTest::Name {
            prefix: String::new(),
            local: local.to_string(),
        }
    }

    #[test]
    fn test_abbreviated_path() {
        assert_eq!(
            parse("//a/@b").unwrap(),
            Expr::Path {
                absolute: true,
                steps: vec![
                    Step::new(Axis::DescendantOrSelf, NodeTest::Node),
                    Step::new(Axis::Child, name("a")),
                    Step::new(Axis::Attribute, name("b")),
                ]
            }
        );
    }

    #[test]
    fn test_root_only() {
        assert_eq!(
            parse("/").unwrap(),
            Expr::Path {
                absolute: true,
                steps: vec![]
            }
        );
    }

    #[test]
    fn test_precedence() {
        assert_eq!(
            parse("1 + 2 * 3 = 7 or false()").unwrap(),
            Expr::Binary(
                BinaryOperator::Or,
                Box::new(Expr::Binary(
                    BinaryOperator::Equal,
                    Box::new(Expr::Binary(
                        BinaryOperator::Add,
                        Box::new(Expr::Number(1.0)),
                        Box::new(Expr::Binary(
                            BinaryOperator::Multiply,
                            Box::new(Expr::Number(2.0)),
                            Box::new(Expr::Number(3.0))
                        ))
                    )),
                    Box::new(Expr::Number(7.0))
                )),
                Box::new(Expr::Function(Function::False, vec![]))
            )
        );
    }

    #[test]
    fn test_filter_then_path() {
        let expr = parse("(//a)[1]/b").unwrap();
        assert!(matches!(expr, Expr::PathFrom(ref filter, ref steps)
            if matches!(**filter, Expr::Filter(..)) && steps.len() == 1));
    }

    #[test]
    fn test_processing_instruction_test() {
        assert_eq!(
            parse("processing-instruction('x')").unwrap(),
            Expr::Path {
                absolute: false,
                steps: vec![Step::new(
                    Axis::Child,
                    NodeTest::ProcessingInstruction(Some("x".to_string()))
                )]
            }
        );
    }

    #[test]
    fn test_errors() {
        let invalid = |e: &str| XPathError::InvalidExpression(e.to_string());
        assert_eq!(parse("//"), Err(invalid("//")));
        assert_eq!(parse("a["), Err(invalid("a[")));
        assert_eq!(parse(""), Err(invalid("")));
        assert_eq!(parse("foo()"), Err(XPathError::ContextNeeded));
        assert_eq!(parse("x:foo()"), Err(XPathError::ContextNeeded));
        assert_eq!(parse("namespace::*"), Err(XPathError::NamespaceAxis));
        assert_eq!(
            parse("count()"),
            Err(XPathError::InvalidArgumentCount {
                function: "count".to_string(),
                expression: "count()".to_string()
            })
        );
        assert_eq!(
            parse("count(1)"),
            Err(XPathError::NodeSetArgumentExpected {
                function: "count".to_string(),
                expression: "count(1)".to_string()
            })
        );
    }
}
