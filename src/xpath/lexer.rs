use crate::error::XPathError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Slash,
    SlashSlash,
    Dot,
    DotDot,
    At,
    Comma,
    Pipe,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Plus,
    Minus,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
    Mod,
    Div,
    Multiply,
    /// `*` as a name test.
    Star,
    /// `prefix:*`
    PrefixStar(String),
    QName { prefix: String, local: String },
    /// A name followed by `(` that isn't a node type.
    FunctionName { prefix: String, local: String },
    /// `node`, `text`, `comment` or `processing-instruction` followed by `(`.
    NodeType(String),
    /// A name followed by `::`, which is consumed with it.
    AxisName(String),
    Literal(String),
    Number(f64),
    Variable { prefix: String, local: String },
}

impl Token {
    fn is_operator(&self) -> bool {
        use Token::*;
        matches!(
            self,
            And | Or
                | Mod
                | Div
                | Multiply
                | Slash
                | SlashSlash
                | Pipe
                | Plus
                | Minus
                | Equal
                | NotEqual
                | Less
                | LessEqual
                | Greater
                | GreaterEqual
        )
    }

    // `*` and the operator names are operators when the token before them
    // can end an operand
    fn ends_operand(&self) -> bool {
        use Token::*;
        !(self.is_operator()
            || matches!(self, At | AxisName(_) | LeftParen | LeftBracket | Comma))
    }
}

const NODE_TYPES: [&str; 4] = ["comment", "text", "processing-instruction", "node"];

fn is_name_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || (!c.is_ascii() && c.is_alphabetic())
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || c.is_ascii_digit()
        || c == '-'
        || c == '.'
        || c == '\u{b7}'
        || (!c.is_ascii() && c.is_alphanumeric())
}

struct Lexer<'a> {
    expression: &'a str,
    chars: Vec<char>,
    position: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(expression: &'a str) -> Self {
        Lexer {
            expression,
            chars: expression.chars().collect(),
            position: 0,
            tokens: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.position + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\n' | '\r')) {
            self.position += 1;
        }
    }

    // the next non-whitespace characters, without consuming anything
    fn lookahead(&self) -> (Option<char>, Option<char>) {
        let mut position = self.position;
        while matches!(self.chars.get(position), Some(' ' | '\t' | '\n' | '\r')) {
            position += 1;
        }
        (
            self.chars.get(position).copied(),
            self.chars.get(position + 1).copied(),
        )
    }

    fn invalid_token(&self) -> XPathError {
        XPathError::InvalidToken(self.expression.to_string())
    }

    fn operator_context(&self) -> bool {
        self.tokens
            .last()
            .map(|token| token.ends_operand())
            .unwrap_or(false)
    }

    fn ncname(&mut self) -> String {
        let start = self.position;
        while self.peek().map(is_name_char).unwrap_or(false) {
            self.position += 1;
        }
        self.chars[start..self.position].iter().collect()
    }

    // a name with an optional prefix; `p:*` comes back with `*` as local
    fn qname(&mut self) -> Result<(String, String), XPathError> {
        let first = self.ncname();
        if self.peek() == Some(':') && self.peek_at(1) != Some(':') {
            self.position += 1;
            return match self.peek() {
                Some('*') => {
                    self.position += 1;
                    Ok((first, "*".to_string()))
                }
                Some(c) if is_name_start_char(c) => Ok((first, self.ncname())),
                _ => Err(self.invalid_token()),
            };
        }
        Ok((String::new(), first))
    }

    fn number(&mut self) -> Result<f64, XPathError> {
        let start = self.position;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.position += 1;
        }
        if self.peek() == Some('.') {
            self.position += 1;
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.position += 1;
            }
        }
        let text: String = self.chars[start..self.position].iter().collect();
        text.parse::<f64>().map_err(|_| self.invalid_token())
    }

    fn literal(&mut self, quote: char) -> Result<String, XPathError> {
        self.position += 1;
        let start = self.position;
        while let Some(c) = self.peek() {
            if c == quote {
                let literal = self.chars[start..self.position].iter().collect();
                self.position += 1;
                return Ok(literal);
            }
            self.position += 1;
        }
        Err(XPathError::UnclosedString)
    }

    fn name_token(&mut self) -> Result<Token, XPathError> {
        if self.operator_context() {
            let name = self.ncname();
            return match name.as_str() {
                "and" => Ok(Token::And),
                "or" => Ok(Token::Or),
                "mod" => Ok(Token::Mod),
                "div" => Ok(Token::Div),
                _ => Err(self.invalid_token()),
            };
        }
        let (prefix, local) = self.qname()?;
        if local == "*" {
            return Ok(Token::PrefixStar(prefix));
        }
        match self.lookahead() {
            (Some('('), _) => {
                if prefix.is_empty() && NODE_TYPES.contains(&local.as_str()) {
                    Ok(Token::NodeType(local))
                } else {
                    Ok(Token::FunctionName { prefix, local })
                }
            }
            (Some(':'), Some(':')) if prefix.is_empty() => {
                self.skip_whitespace();
                self.position += 2;
                Ok(Token::AxisName(local))
            }
            _ => Ok(Token::QName { prefix, local }),
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, XPathError> {
        self.skip_whitespace();
        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(None),
        };
        let next = self.peek_at(1);
        let (token, width) = match c {
            '/' if next == Some('/') => (Token::SlashSlash, 2),
            '/' => (Token::Slash, 1),
            '.' if next == Some('.') => (Token::DotDot, 2),
            '.' if matches!(next, Some(d) if d.is_ascii_digit()) => {
                return self.number().map(|n| Some(Token::Number(n)))
            }
            '.' => (Token::Dot, 1),
            '@' => (Token::At, 1),
            ',' => (Token::Comma, 1),
            '|' => (Token::Pipe, 1),
            '(' => (Token::LeftParen, 1),
            ')' => (Token::RightParen, 1),
            '[' => (Token::LeftBracket, 1),
            ']' => (Token::RightBracket, 1),
            '+' => (Token::Plus, 1),
            '-' => (Token::Minus, 1),
            '=' => (Token::Equal, 1),
            '!' if next == Some('=') => (Token::NotEqual, 2),
            '<' if next == Some('=') => (Token::LessEqual, 2),
            '<' => (Token::Less, 1),
            '>' if next == Some('=') => (Token::GreaterEqual, 2),
            '>' => (Token::Greater, 1),
            '*' if self.operator_context() => (Token::Multiply, 1),
            '*' => (Token::Star, 1),
            '"' | '\'' => return self.literal(c).map(|l| Some(Token::Literal(l))),
            '$' => {
                self.position += 1;
                if !self.peek().map(is_name_start_char).unwrap_or(false) {
                    return Err(self.invalid_token());
                }
                let (prefix, local) = self.qname()?;
                if local == "*" {
                    return Err(self.invalid_token());
                }
                return Ok(Some(Token::Variable { prefix, local }));
            }
            c if c.is_ascii_digit() => return self.number().map(|n| Some(Token::Number(n))),
            c if is_name_start_char(c) => return self.name_token().map(Some),
            _ => return Err(self.invalid_token()),
        };
        self.position += width;
        Ok(Some(token))
    }
}

/// Split an expression into tokens, applying the XPath 1.0 rules that
/// tell operators from names.
pub(crate) fn tokenize(expression: &str) -> Result<Vec<Token>, XPathError> {
    let mut lexer = Lexer::new(expression);
    while let Some(token) = lexer.next_token()? {
        lexer.tokens.push(token);
    }
    Ok(lexer.tokens)
}
