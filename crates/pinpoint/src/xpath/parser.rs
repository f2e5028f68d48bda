//! Tokenizer and recursive-descent parser for the XPath 1.0 subset.

use crate::result::{LocatorError, LocatorResult};

/// Parsed XPath expression
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Or(Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Compare(CompareOp, Box<Expr>, Box<Expr>),
    Union(Vec<Expr>),
    Path(LocationPath),
    /// `primary[pred]...` over a whole result set
    Filter(Box<Expr>, Vec<Expr>),
    Literal(String),
    Number(f64),
    Call(Function, Vec<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PathStart {
    /// `/…`
    Root,
    /// relative to the context node
    Context,
    /// `(expr)[n]/…`
    Filter(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LocationPath {
    pub start: PathStart,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Step {
    pub axis: Axis,
    pub test: NodeTest,
    pub predicates: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    Child,
    Descendant,
    DescendantOrSelf,
    SelfNode,
    Parent,
    Ancestor,
    AncestorOrSelf,
    FollowingSibling,
    PrecedingSibling,
    Attribute,
}

impl Axis {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "child" => Self::Child,
            "descendant" => Self::Descendant,
            "descendant-or-self" => Self::DescendantOrSelf,
            "self" => Self::SelfNode,
            "parent" => Self::Parent,
            "ancestor" => Self::Ancestor,
            "ancestor-or-self" => Self::AncestorOrSelf,
            "following-sibling" => Self::FollowingSibling,
            "preceding-sibling" => Self::PrecedingSibling,
            "attribute" => Self::Attribute,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NodeTest {
    /// `*`
    AnyName,
    Name(String),
    /// `node()`
    AnyNode,
    /// `text()`
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Function {
    Position,
    Last,
    Count,
    Contains,
    StartsWith,
    NormalizeSpace,
    Concat,
    Not,
    String,
    StringLength,
    True,
    False,
    Name,
}

impl Function {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "position" => Self::Position,
            "last" => Self::Last,
            "count" => Self::Count,
            "contains" => Self::Contains,
            "starts-with" => Self::StartsWith,
            "normalize-space" => Self::NormalizeSpace,
            "concat" => Self::Concat,
            "not" => Self::Not,
            "string" => Self::String,
            "string-length" => Self::StringLength,
            "true" => Self::True,
            "false" => Self::False,
            "name" | "local-name" => Self::Name,
            _ => return None,
        })
    }

    /// Accepted argument counts (min, max)
    const fn arity(self) -> (usize, usize) {
        match self {
            Self::Position | Self::Last | Self::True | Self::False => (0, 0),
            Self::Count | Self::Not => (1, 1),
            Self::Contains | Self::StartsWith => (2, 2),
            Self::NormalizeSpace | Self::String | Self::StringLength | Self::Name => (0, 1),
            Self::Concat => (2, usize::MAX),
        }
    }
}

// ============================================================================
// Tokenizer
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Slash,
    DoubleSlash,
    LParen,
    RParen,
    LBracket,
    RBracket,
    At,
    Comma,
    Pipe,
    Dot,
    DotDot,
    Star,
    DoubleColon,
    Op(CompareOp),
    Name(String),
    Literal(String),
    Number(f64),
}

struct Lexer<'s> {
    source: &'s str,
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl<'s> Lexer<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            chars: source.char_indices().collect(),
            pos: 0,
        }
    }

    fn offset(&self) -> usize {
        self.chars
            .get(self.pos)
            .map_or(self.source.len(), |(offset, _)| *offset)
    }

    fn peek_char(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).map(|(_, c)| *c)
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> LocatorError {
        LocatorError::invalid_xpath(self.source, offset, message)
    }

    fn tokenize(mut self) -> LocatorResult<Vec<(usize, Token)>> {
        let mut tokens = Vec::new();
        while let Some(ch) = self.peek_char(0) {
            let start = self.offset();
            if ch.is_whitespace() {
                self.pos += 1;
                continue;
            }
            let token = match ch {
                '/' if self.peek_char(1) == Some('/') => {
                    self.pos += 2;
                    Token::DoubleSlash
                }
                '/' => self.single(Token::Slash),
                '(' => self.single(Token::LParen),
                ')' => self.single(Token::RParen),
                '[' => self.single(Token::LBracket),
                ']' => self.single(Token::RBracket),
                '@' => self.single(Token::At),
                ',' => self.single(Token::Comma),
                '|' => self.single(Token::Pipe),
                '*' => self.single(Token::Star),
                '=' => self.single(Token::Op(CompareOp::Eq)),
                '!' if self.peek_char(1) == Some('=') => {
                    self.pos += 2;
                    Token::Op(CompareOp::Ne)
                }
                '<' | '>' => {
                    let or_equal = self.peek_char(1) == Some('=');
                    self.pos += if or_equal { 2 } else { 1 };
                    Token::Op(match (ch, or_equal) {
                        ('<', false) => CompareOp::Lt,
                        ('<', true) => CompareOp::Le,
                        ('>', false) => CompareOp::Gt,
                        _ => CompareOp::Ge,
                    })
                }
                ':' if self.peek_char(1) == Some(':') => {
                    self.pos += 2;
                    Token::DoubleColon
                }
                '.' if self.peek_char(1) == Some('.') => {
                    self.pos += 2;
                    Token::DotDot
                }
                '.' if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => self.number(),
                '.' => self.single(Token::Dot),
                '\'' | '"' => self.literal(ch, start)?,
                c if c.is_ascii_digit() => self.number(),
                c if is_name_start(c) => self.name(),
                other => return Err(self.error(start, format!("unexpected character {other:?}"))),
            };
            tokens.push((start, token));
        }
        Ok(tokens)
    }

    fn single(&mut self, token: Token) -> Token {
        self.pos += 1;
        token
    }

    fn literal(&mut self, quote: char, start: usize) -> LocatorResult<Token> {
        self.pos += 1;
        let mut value = String::new();
        loop {
            match self.peek_char(0) {
                Some(c) if c == quote => {
                    self.pos += 1;
                    return Ok(Token::Literal(value));
                }
                Some(c) => {
                    value.push(c);
                    self.pos += 1;
                }
                None => return Err(self.error(start, "unterminated string literal")),
            }
        }
    }

    fn number(&mut self) -> Token {
        let mut text = String::new();
        while let Some(c) = self.peek_char(0) {
            if c.is_ascii_digit() || c == '.' {
                text.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        Token::Number(text.parse().unwrap_or(f64::NAN))
    }

    fn name(&mut self) -> Token {
        let mut text = String::new();
        while let Some(c) = self.peek_char(0) {
            if is_name_char(c) {
                text.push(c);
                self.pos += 1;
            } else if c == ':' && self.peek_char(1).is_some_and(is_name_start) {
                // prefixed name such as svg:rect
                text.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        Token::Name(text)
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

// ============================================================================
// Parser
// ============================================================================

/// Deepest nesting of parenthesized groups, predicates and function
/// arguments the parser accepts.
pub(crate) const MAX_NESTING: usize = 100;

/// Parse an XPath expression.
pub(crate) fn parse(source: &str) -> LocatorResult<Expr> {
    let tokens = Lexer::new(source).tokenize()?;
    if tokens.is_empty() {
        return Err(LocatorError::invalid_xpath(source, 0, "empty expression"));
    }
    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.or_expr()?;
    if parser.pos < parser.tokens.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(expr)
}

struct Parser<'s> {
    source: &'s str,
    tokens: Vec<(usize, Token)>,
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn peek_at(&self, ahead: usize) -> Option<&Token> {
        self.tokens.get(self.pos + ahead).map(|(_, t)| t)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(_, t)| t.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token, what: &str) -> LocatorResult<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(format!("expected {what}")))
        }
    }

    fn error(&self, message: impl Into<String>) -> LocatorError {
        let offset = self
            .tokens
            .get(self.pos)
            .map_or(self.source.len(), |(offset, _)| *offset);
        LocatorError::invalid_xpath(self.source, offset, message)
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token::Name(name)) if name == keyword)
    }

    fn or_expr(&mut self) -> LocatorResult<Expr> {
        if self.depth >= MAX_NESTING {
            return Err(self.error(format!("expression nested deeper than {MAX_NESTING}")));
        }
        self.depth += 1;
        let expr = self.or_chain();
        self.depth -= 1;
        expr
    }

    fn or_chain(&mut self) -> LocatorResult<Expr> {
        let mut left = self.and_expr()?;
        while self.peek_keyword("or") {
            self.pos += 1;
            let right = self.and_expr()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> LocatorResult<Expr> {
        let mut left = self.equality_expr()?;
        while self.peek_keyword("and") {
            self.pos += 1;
            let right = self.equality_expr()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn equality_expr(&mut self) -> LocatorResult<Expr> {
        let mut left = self.relational_expr()?;
        while let Some(Token::Op(op @ (CompareOp::Eq | CompareOp::Ne))) = self.peek() {
            let op = *op;
            self.pos += 1;
            let right = self.relational_expr()?;
            left = Expr::Compare(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn relational_expr(&mut self) -> LocatorResult<Expr> {
        let mut left = self.union_expr()?;
        while let Some(Token::Op(
            op @ (CompareOp::Lt | CompareOp::Le | CompareOp::Gt | CompareOp::Ge),
        )) = self.peek()
        {
            let op = *op;
            self.pos += 1;
            let right = self.union_expr()?;
            left = Expr::Compare(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn union_expr(&mut self) -> LocatorResult<Expr> {
        let first = self.path_expr()?;
        if self.peek() != Some(&Token::Pipe) {
            return Ok(first);
        }
        let mut branches = vec![first];
        while self.eat(&Token::Pipe) {
            branches.push(self.path_expr()?);
        }
        Ok(Expr::Union(branches))
    }

    fn path_expr(&mut self) -> LocatorResult<Expr> {
        match self.peek() {
            Some(Token::Slash) => {
                self.pos += 1;
                let steps = if self.starts_step() {
                    self.relative_steps()?
                } else {
                    Vec::new()
                };
                Ok(Expr::Path(LocationPath {
                    start: PathStart::Root,
                    steps,
                }))
            }
            Some(Token::DoubleSlash) => {
                self.pos += 1;
                let mut steps = vec![descendant_or_self()];
                steps.extend(self.relative_steps()?);
                Ok(Expr::Path(LocationPath {
                    start: PathStart::Root,
                    steps,
                }))
            }
            _ if self.starts_primary() => self.filter_path(),
            _ if self.starts_step() => Ok(Expr::Path(LocationPath {
                start: PathStart::Context,
                steps: self.relative_steps()?,
            })),
            _ => Err(self.error("expected expression")),
        }
    }

    /// Primary expression with optional predicates and trailing path.
    fn filter_path(&mut self) -> LocatorResult<Expr> {
        let primary = self.primary_expr()?;
        let predicates = self.predicates()?;
        let filtered = if predicates.is_empty() {
            primary
        } else {
            Expr::Filter(Box::new(primary), predicates)
        };

        let mut steps = Vec::new();
        loop {
            if self.eat(&Token::Slash) {
                steps.push(self.step()?);
            } else if self.eat(&Token::DoubleSlash) {
                steps.push(descendant_or_self());
                steps.push(self.step()?);
            } else {
                break;
            }
        }
        if steps.is_empty() {
            return Ok(filtered);
        }
        Ok(Expr::Path(LocationPath {
            start: PathStart::Filter(Box::new(filtered)),
            steps,
        }))
    }

    fn starts_primary(&self) -> bool {
        match self.peek() {
            Some(Token::LParen | Token::Literal(_) | Token::Number(_)) => true,
            Some(Token::Name(name)) => {
                self.peek_at(1) == Some(&Token::LParen) && !matches!(name.as_str(), "node" | "text")
            }
            _ => false,
        }
    }

    fn starts_step(&self) -> bool {
        matches!(
            self.peek(),
            Some(Token::Name(_) | Token::Star | Token::At | Token::Dot | Token::DotDot)
        )
    }

    fn primary_expr(&mut self) -> LocatorResult<Expr> {
        match self.advance() {
            Some(Token::LParen) => {
                let inner = self.or_expr()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(inner)
            }
            Some(Token::Literal(value)) => Ok(Expr::Literal(value)),
            Some(Token::Number(value)) => Ok(Expr::Number(value)),
            Some(Token::Name(name)) => {
                self.pos -= 1;
                let function = Function::from_name(&name)
                    .ok_or_else(|| self.error(format!("unknown function {name}()")))?;
                self.pos += 2;
                let mut args = Vec::new();
                if !self.eat(&Token::RParen) {
                    loop {
                        args.push(self.or_expr()?);
                        if self.eat(&Token::RParen) {
                            break;
                        }
                        self.expect(&Token::Comma, "',' or ')'")?;
                    }
                }
                let (min, max) = function.arity();
                if args.len() < min || args.len() > max {
                    return Err(self.error(format!(
                        "{name}() takes {min}..{max} arguments, got {}",
                        args.len()
                    )));
                }
                Ok(Expr::Call(function, args))
            }
            _ => {
                self.pos = self.pos.saturating_sub(1);
                Err(self.error("expected primary expression"))
            }
        }
    }

    fn relative_steps(&mut self) -> LocatorResult<Vec<Step>> {
        let mut steps = vec![self.step()?];
        loop {
            if self.eat(&Token::Slash) {
                steps.push(self.step()?);
            } else if self.eat(&Token::DoubleSlash) {
                steps.push(descendant_or_self());
                steps.push(self.step()?);
            } else {
                return Ok(steps);
            }
        }
    }

    fn step(&mut self) -> LocatorResult<Step> {
        if self.eat(&Token::Dot) {
            return Ok(Step {
                axis: Axis::SelfNode,
                test: NodeTest::AnyNode,
                predicates: Vec::new(),
            });
        }
        if self.eat(&Token::DotDot) {
            return Ok(Step {
                axis: Axis::Parent,
                test: NodeTest::AnyNode,
                predicates: Vec::new(),
            });
        }

        let axis = if self.eat(&Token::At) {
            Axis::Attribute
        } else if let (Some(Token::Name(name)), Some(Token::DoubleColon)) =
            (self.peek(), self.peek_at(1))
        {
            let axis = Axis::from_name(name)
                .ok_or_else(|| self.error(format!("unsupported axis {name}")))?;
            self.pos += 2;
            axis
        } else {
            Axis::Child
        };

        let test = match self.advance() {
            Some(Token::Star) => NodeTest::AnyName,
            Some(Token::Name(name)) if self.peek() == Some(&Token::LParen) => {
                self.pos += 1;
                self.expect(&Token::RParen, "')'")?;
                match name.as_str() {
                    "node" => NodeTest::AnyNode,
                    "text" => NodeTest::Text,
                    other => return Err(self.error(format!("unsupported node test {other}()"))),
                }
            }
            Some(Token::Name(name)) => NodeTest::Name(name),
            _ => {
                self.pos = self.pos.saturating_sub(1);
                return Err(self.error("expected node test"));
            }
        };

        Ok(Step {
            axis,
            test,
            predicates: self.predicates()?,
        })
    }

    fn predicates(&mut self) -> LocatorResult<Vec<Expr>> {
        let mut predicates = Vec::new();
        while self.eat(&Token::LBracket) {
            predicates.push(self.or_expr()?);
            self.expect(&Token::RBracket, "']'")?;
        }
        Ok(predicates)
    }
}

fn descendant_or_self() -> Step {
    Step {
        axis: Axis::DescendantOrSelf,
        test: NodeTest::AnyNode,
        predicates: Vec::new(),
    }
}
