//! Formula parser - converts expression text into an [`Expr`] tree.
//!
//! Supports numeric literals, cell references (A1), unary `+`/`-`,
//! binary `+ - * /` and parentheses.

use thiserror::Error;

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::position::Position;

/// Formula text is not a valid arithmetic expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("formula parse error: {message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    fn new(message: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Cell(Position),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

/// Parse expression text (without the leading `=`) into a tree.
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ParseError::new("empty expression"));
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        nesting: 0,
    };
    let (expr, _) = parser.parse_add_sub()?;
    if let Some(token) = parser.peek() {
        return Err(ParseError::new(format!("unexpected token {:?}", token)));
    }
    Ok(expr)
}

fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '+' => {
                tokens.push(Token::Plus);
                chars.next();
            }
            '-' => {
                tokens.push(Token::Minus);
                chars.next();
            }
            '*' => {
                tokens.push(Token::Star);
                chars.next();
            }
            '/' => {
                tokens.push(Token::Slash);
                chars.next();
            }
            '(' => {
                tokens.push(Token::LParen);
                chars.next();
            }
            ')' => {
                tokens.push(Token::RParen);
                chars.next();
            }
            'A'..='Z' | 'a'..='z' => {
                let mut ident = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_ascii_alphanumeric() {
                        ident.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                match Position::from_a1(&ident) {
                    Some(pos) => tokens.push(Token::Cell(pos)),
                    None => {
                        return Err(ParseError::new(format!("invalid cell reference: {}", ident)));
                    }
                }
            }
            '0'..='9' | '.' => {
                let mut num_str = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        num_str.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if let Some(&e) = chars.peek()
                    && (e == 'e' || e == 'E')
                {
                    num_str.push(e);
                    chars.next();
                    if let Some(&sign) = chars.peek()
                        && (sign == '+' || sign == '-')
                    {
                        num_str.push(sign);
                        chars.next();
                    }
                    while let Some(&d) = chars.peek() {
                        if d.is_ascii_digit() {
                            num_str.push(d);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                }
                let num: f64 = num_str
                    .parse()
                    .map_err(|_| ParseError::new(format!("invalid number: {}", num_str)))?;
                if !num.is_finite() {
                    return Err(ParseError::new(format!("number out of range: {}", num_str)));
                }
                tokens.push(Token::Number(num));
            }
            _ => return Err(ParseError::new(format!("unexpected character: {}", c))),
        }
    }

    Ok(tokens)
}

/// Deepest run of nested parentheses and unary signs accepted.
const MAX_NESTING: usize = 256;
/// Deepest expression tree accepted. Evaluation and printing walk the tree
/// recursively, so this bounds their stack use.
const MAX_DEPTH: usize = 1024;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    nesting: usize,
}

fn check_depth(depth: usize) -> Result<usize, ParseError> {
    if depth > MAX_DEPTH {
        return Err(ParseError::new(format!(
            "expression nested deeper than {} levels",
            MAX_DEPTH
        )));
    }
    Ok(depth)
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.nesting += 1;
        if self.nesting > MAX_NESTING {
            return Err(ParseError::new(format!(
                "more than {} nested parentheses or signs",
                MAX_NESTING
            )));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.nesting -= 1;
    }

    // Each parse step returns the subtree together with its depth.

    fn parse_add_sub(&mut self) -> Result<(Expr, usize), ParseError> {
        let (mut left, mut depth) = self.parse_mul_div()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok((left, depth)),
            };
            self.pos += 1;
            let (right, right_depth) = self.parse_mul_div()?;
            depth = check_depth(depth.max(right_depth) + 1)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn parse_mul_div(&mut self) -> Result<(Expr, usize), ParseError> {
        let (mut left, mut depth) = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok((left, depth)),
            };
            self.pos += 1;
            let (right, right_depth) = self.parse_unary()?;
            depth = check_depth(depth.max(right_depth) + 1)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn parse_unary(&mut self) -> Result<(Expr, usize), ParseError> {
        let op = match self.peek() {
            Some(Token::Plus) => UnaryOp::Plus,
            Some(Token::Minus) => UnaryOp::Minus,
            _ => return self.parse_primary(),
        };
        self.pos += 1;
        self.enter()?;
        let (operand, depth) = self.parse_unary()?;
        self.leave();
        Ok((
            Expr::Unary {
                op,
                operand: Box::new(operand),
            },
            check_depth(depth + 1)?,
        ))
    }

    fn parse_primary(&mut self) -> Result<(Expr, usize), ParseError> {
        match self.next() {
            Some(Token::Number(n)) => Ok((Expr::Number(n), 1)),
            Some(Token::Cell(pos)) => Ok((Expr::Cell(pos), 1)),
            Some(Token::LParen) => {
                self.enter()?;
                let inner = self.parse_add_sub()?;
                self.leave();
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    Some(token) => Err(ParseError::new(format!("expected ')', found {:?}", token))),
                    None => Err(ParseError::new("missing closing parenthesis")),
                }
            }
            Some(token) => Err(ParseError::new(format!("unexpected token {:?}", token))),
            None => Err(ParseError::new("unexpected end of expression")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Box<Expr> {
        Box::new(Expr::Number(n))
    }

    #[test]
    fn test_parse_precedence() {
        let expr = parse("1+2*3").unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                op: BinaryOp::Add,
                left: num(1.0),
                right: Box::new(Expr::Binary {
                    op: BinaryOp::Mul,
                    left: num(2.0),
                    right: num(3.0),
                }),
            }
        );
    }

    #[test]
    fn test_parse_left_associative() {
        let expr = parse("8-4-2").unwrap();
        match expr {
            Expr::Binary {
                op: BinaryOp::Sub,
                left,
                right,
            } => {
                assert!(matches!(*left, Expr::Binary { op: BinaryOp::Sub, .. }));
                assert_eq!(*right, Expr::Number(2.0));
            }
            other => panic!("expected subtraction, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_cell_refs_and_whitespace() {
        let expr = parse("  a1 +\tB2 ").unwrap();
        let mut cells = Vec::new();
        expr.collect_cells(&mut cells);
        assert_eq!(cells, vec![Position::new(0, 0), Position::new(1, 1)]);
    }

    #[test]
    fn test_parse_unary_chain() {
        let expr = parse("--1").unwrap();
        assert!(matches!(expr, Expr::Unary { op: UnaryOp::Minus, .. }));
    }

    #[test]
    fn test_parse_number_forms() {
        assert_eq!(parse(".5").unwrap(), Expr::Number(0.5));
        assert_eq!(parse("1e3").unwrap(), Expr::Number(1000.0));
        assert_eq!(parse("2.5E-1").unwrap(), Expr::Number(0.25));
    }

    #[test]
    fn test_parse_errors() {
        for text in ["", "   ", "1+", "(1", "1)", "1 2", "A", "SUM(A1)", "1..2", "1e", "#", "*3", "1e999"] {
            assert!(parse(text).is_err(), "expected parse error for {:?}", text);
        }
    }

    #[test]
    fn test_parse_accepts_moderate_nesting() {
        let text = format!("{}1{}", "(".repeat(200), ")".repeat(200));
        assert_eq!(parse(&text).unwrap(), Expr::Number(1.0));

        let sum = vec!["A1"; 500].join("+");
        assert!(parse(&sum).is_ok());
    }

    #[test]
    fn test_parse_rejects_deep_parentheses() {
        let text = format!("{}1{}", "(".repeat(20000), ")".repeat(20000));
        let err = parse(&text).unwrap_err();
        assert!(err.message.contains("nested"), "{}", err);
    }

    #[test]
    fn test_parse_rejects_long_sign_chain() {
        let text = format!("{}1", "-".repeat(20000));
        assert!(parse(&text).is_err());
    }

    #[test]
    fn test_parse_rejects_overly_deep_tree() {
        let sum = vec!["1"; MAX_DEPTH + 2].join("+");
        let err = parse(&sum).unwrap_err();
        assert!(err.message.contains("deeper"), "{}", err);
    }
}
