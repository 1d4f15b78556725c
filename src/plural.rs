//! Plural-Forms handling
//!
//! A catalog header may carry a line such as
//!
//! ```text
//! Plural-Forms: nplurals=3; plural=n%10==1 && n%100!=11 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2;
//! ```
//!
//! The `plural=` clause is forwarded verbatim to the generated script,
//! which evaluates it in the browser. [`PluralExpr`] evaluates the same
//! restricted C grammar on the server side.

use std::fmt;

use thiserror::Error;

use crate::catalog::RawCatalog;

const PLURAL_FORMS_HEADER: &str = "Plural-Forms:";

/// Expression used when a catalog does not declare its plural rule
pub const DEFAULT_PLURAL_EXPRESSION: &str = "n != 1";

/// Plural rule of the merged catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluralRule {
    /// Two forms: singular for exactly one item, plural otherwise
    Default,
    /// The `plural=` expression from the catalog header
    Expression(String),
}

impl PluralRule {
    /// The extracted expression, if the catalog declared one
    pub fn expression(&self) -> Option<&str> {
        match self {
            PluralRule::Default => None,
            PluralRule::Expression(expr) => Some(expr),
        }
    }

    /// Parses the rule into an evaluable expression
    pub fn compile(&self) -> Result<PluralExpr, PluralError> {
        PluralExpr::parse(self.expression().unwrap_or(DEFAULT_PLURAL_EXPRESSION))
    }

    /// Plural form index for `n` items
    pub fn index_for(&self, n: u64) -> Result<usize, PluralError> {
        Ok(self.compile()?.index(n))
    }
}

impl fmt::Display for PluralRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluralRule::Default => f.write_str("default"),
            PluralRule::Expression(expr) => f.write_str(expr),
        }
    }
}

/// Value of the last `Plural-Forms:` line of a header block
fn plural_forms(header: &str) -> Option<&str> {
    header
        .split('\n')
        .filter_map(|line| line.strip_prefix(PLURAL_FORMS_HEADER))
        .last()
        .map(str::trim)
}

/// Value of the `name=` clause of a Plural-Forms value
fn clause<'h>(plural_forms: &'h str, name: &str) -> Option<&'h str> {
    plural_forms
        .split(';')
        .map(str::trim)
        .find(|segment| {
            segment
                .strip_prefix(name)
                .is_some_and(|rest| rest.starts_with('='))
        })
        .and_then(|segment| segment.split_once('='))
        .map(|(_, value)| value)
}

/// Extracts the plural rule from the catalog's metadata entry
pub fn extract_plural_rule(catalog: &RawCatalog) -> PluralRule {
    catalog
        .metadata()
        .and_then(plural_forms)
        .and_then(|forms| clause(forms, "plural"))
        .map(|expr| PluralRule::Expression(expr.to_string()))
        .unwrap_or(PluralRule::Default)
}

/// Number of plural forms declared by the catalog header
pub fn extract_nplurals(catalog: &RawCatalog) -> Option<usize> {
    catalog
        .metadata()
        .and_then(plural_forms)
        .and_then(|forms| clause(forms, "nplurals"))
        .and_then(|value| value.trim().parse().ok())
}

// =============================================================================
// Expression evaluation
// =============================================================================

/// Errors from parsing a plural expression
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PluralError {
    #[error("unexpected character '{ch}' at offset {pos}")]
    UnexpectedChar { pos: usize, ch: char },

    #[error("unexpected {found} at offset {pos}")]
    UnexpectedToken { pos: usize, found: String },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("integer literal too large at offset {pos}")]
    NumberTooLarge { pos: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    N,
    Number(u64),
    Not(Box<Node>),
    Binary(BinaryOp, Box<Node>, Box<Node>),
    Ternary(Box<Node>, Box<Node>, Box<Node>),
}

impl Node {
    fn eval(&self, n: u64) -> u64 {
        match self {
            Node::N => n,
            Node::Number(v) => *v,
            Node::Not(inner) => u64::from(inner.eval(n) == 0),
            Node::Ternary(cond, then, otherwise) => {
                if cond.eval(n) != 0 {
                    then.eval(n)
                } else {
                    otherwise.eval(n)
                }
            }
            Node::Binary(op, lhs, rhs) => {
                let a = lhs.eval(n);
                match op {
                    BinaryOp::And => u64::from(a != 0 && rhs.eval(n) != 0),
                    BinaryOp::Or => u64::from(a != 0 || rhs.eval(n) != 0),
                    op => op.apply(a, rhs.eval(n)),
                }
            }
        }
    }
}

impl BinaryOp {
    fn apply(self, a: u64, b: u64) -> u64 {
        match self {
            BinaryOp::Mul => a.wrapping_mul(b),
            BinaryOp::Div => a.checked_div(b).unwrap_or(0),
            BinaryOp::Rem => a.checked_rem(b).unwrap_or(0),
            BinaryOp::Add => a.wrapping_add(b),
            BinaryOp::Sub => a.wrapping_sub(b),
            BinaryOp::Lt => u64::from(a < b),
            BinaryOp::Le => u64::from(a <= b),
            BinaryOp::Gt => u64::from(a > b),
            BinaryOp::Ge => u64::from(a >= b),
            BinaryOp::Eq => u64::from(a == b),
            BinaryOp::Ne => u64::from(a != b),
            BinaryOp::And => u64::from(a != 0 && b != 0),
            BinaryOp::Or => u64::from(a != 0 || b != 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    N,
    Number(u64),
    Op(&'static str),
    LParen,
    RParen,
    Question,
    Colon,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::N => f.write_str("'n'"),
            Token::Number(v) => write!(f, "number {}", v),
            Token::Op(op) => write!(f, "'{}'", op),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::Question => f.write_str("'?'"),
            Token::Colon => f.write_str("':'"),
        }
    }
}

/// Operators, longest first so `<=` wins over `<`
const OPERATORS: &[&str] = &[
    "&&", "||", "==", "!=", "<=", ">=", "<", ">", "!", "+", "-", "*", "/", "%",
];

fn tokenize(src: &str) -> Result<Vec<(usize, Token)>, PluralError> {
    let mut tokens = Vec::new();
    let bytes = src.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        let rest = &src[pos..];
        let ch = rest.chars().next().ok_or(PluralError::UnexpectedEnd)?;

        if ch.is_whitespace() {
            pos += ch.len_utf8();
            continue;
        }
        if ch.is_ascii_digit() {
            let len = rest.bytes().take_while(u8::is_ascii_digit).count();
            let value = rest[..len]
                .parse()
                .map_err(|_| PluralError::NumberTooLarge { pos })?;
            tokens.push((pos, Token::Number(value)));
            pos += len;
            continue;
        }

        let token = match ch {
            'n' => Token::N,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '?' => Token::Question,
            ':' => Token::Colon,
            _ => match OPERATORS.iter().find(|op| rest.starts_with(**op)) {
                Some(op) => Token::Op(*op),
                None => return Err(PluralError::UnexpectedChar { pos, ch }),
            },
        };
        let len = match &token {
            Token::Op(op) => op.len(),
            _ => 1,
        };
        tokens.push((pos, token));
        pos += len;
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    cursor: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor).map(|(_, t)| t)
    }

    fn next(&mut self) -> Result<(usize, Token), PluralError> {
        let token = self
            .tokens
            .get(self.cursor)
            .cloned()
            .ok_or(PluralError::UnexpectedEnd)?;
        self.cursor += 1;
        Ok(token)
    }

    fn expect(&mut self, expected: Token) -> Result<(), PluralError> {
        let (pos, token) = self.next()?;
        if token == expected {
            Ok(())
        } else {
            Err(PluralError::UnexpectedToken {
                pos,
                found: token.to_string(),
            })
        }
    }

    fn eat_op(&mut self, ops: &[&'static str]) -> Option<&'static str> {
        match self.peek() {
            Some(Token::Op(op)) if ops.contains(op) => {
                let op = *op;
                self.cursor += 1;
                Some(op)
            }
            _ => None,
        }
    }

    fn ternary(&mut self) -> Result<Node, PluralError> {
        let cond = self.binary(0)?;
        if self.peek() != Some(&Token::Question) {
            return Ok(cond);
        }
        self.cursor += 1;
        let then = self.ternary()?;
        self.expect(Token::Colon)?;
        let otherwise = self.ternary()?;
        Ok(Node::Ternary(Box::new(cond), Box::new(then), Box::new(otherwise)))
    }

    /// Binary operators by precedence level, loosest first
    const LEVELS: &'static [&'static [&'static str]] = &[
        &["||"],
        &["&&"],
        &["==", "!="],
        &["<", "<=", ">", ">="],
        &["+", "-"],
        &["*", "/", "%"],
    ];

    fn binary(&mut self, level: usize) -> Result<Node, PluralError> {
        let Some(ops) = Self::LEVELS.get(level) else {
            return self.unary();
        };
        let mut lhs = self.binary(level + 1)?;
        while let Some(op) = self.eat_op(ops) {
            let rhs = self.binary(level + 1)?;
            let op = match op {
                "||" => BinaryOp::Or,
                "&&" => BinaryOp::And,
                "==" => BinaryOp::Eq,
                "!=" => BinaryOp::Ne,
                "<" => BinaryOp::Lt,
                "<=" => BinaryOp::Le,
                ">" => BinaryOp::Gt,
                ">=" => BinaryOp::Ge,
                "+" => BinaryOp::Add,
                "-" => BinaryOp::Sub,
                "*" => BinaryOp::Mul,
                "/" => BinaryOp::Div,
                _ => BinaryOp::Rem,
            };
            lhs = Node::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Node, PluralError> {
        if self.eat_op(&["!"]).is_some() {
            return Ok(Node::Not(Box::new(self.unary()?)));
        }
        let (pos, token) = self.next()?;
        match token {
            Token::N => Ok(Node::N),
            Token::Number(v) => Ok(Node::Number(v)),
            Token::LParen => {
                let inner = self.ternary()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            other => Err(PluralError::UnexpectedToken {
                pos,
                found: other.to_string(),
            }),
        }
    }
}

/// A parsed gettext plural expression
///
/// Supports integer literals, `n`, `+ - * / %`, comparisons, `!`, `&&`,
/// `||`, the ternary operator and parentheses. Arithmetic is unsigned;
/// comparisons and logical operators yield 0 or 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralExpr {
    root: Node,
}

impl PluralExpr {
    pub fn parse(src: &str) -> Result<Self, PluralError> {
        let mut parser = Parser {
            tokens: tokenize(src)?,
            cursor: 0,
        };
        let root = parser.ternary()?;
        if let Ok((pos, token)) = parser.next() {
            return Err(PluralError::UnexpectedToken {
                pos,
                found: token.to_string(),
            });
        }
        Ok(Self { root })
    }

    /// Raw value of the expression for `n`
    pub fn evaluate(&self, n: u64) -> u64 {
        self.root.eval(n)
    }

    /// Plural form index for `n`
    pub fn index(&self, n: u64) -> usize {
        usize::try_from(self.evaluate(n)).unwrap_or(usize::MAX)
    }
}
