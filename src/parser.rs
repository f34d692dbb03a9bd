//! Turns a token sequence into an expression tree.
//!
//! Binary operators are parsed by binding power, loosest first: comparisons
//! (`==`, `<`, `>`), then `+` and `-`, then `*`. All of them associate to the
//! left. Function application is juxtaposition and binds tighter than any
//! operator, so `F 1 + 2` is `(F 1) + 2`.

use crate::token::Token;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Equals,
    Less,
    Greater,
    Plus,
    Minus,
    Times,
}

impl BinOp {
    fn from_token(token: &Token) -> Option<BinOp> {
        Some(match token {
            Token::DoubleEquals => BinOp::Equals,
            Token::Less => BinOp::Less,
            Token::Greater => BinOp::Greater,
            Token::Plus => BinOp::Plus,
            Token::Minus => BinOp::Minus,
            Token::Star => BinOp::Times,
            _ => return None,
        })
    }

    /// Left and right binding power.
    fn binding_power(self) -> (u8, u8) {
        match self {
            BinOp::Equals | BinOp::Less | BinOp::Greater => (1, 2),
            BinOp::Plus | BinOp::Minus => (3, 4),
            BinOp::Times => (5, 6),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Number(i64),
    Bool(bool),
    Var(String),
    /// `\X => body`
    Lambda {
        binder: String,
        body: Box<Expr>,
    },
    App {
        func: Box<Expr>,
        arg: Box<Expr>,
    },
    If {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Not(Box<Expr>),
    /// `let X = value in body`
    Let {
        binder: String,
        value: Box<Expr>,
        body: Box<Expr>,
    },
    /// `X = value; rest`
    Assign {
        binder: String,
        value: Box<Expr>,
        rest: Box<Expr>,
    },
    /// `loop count : ACC { body }`
    Loop {
        count: Box<Expr>,
        accumulator: String,
        body: Box<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Zero-based index of the offending token, or the token count at the end
    pub position: usize,
    pub expected: &'static str,
    pub found: Option<Token>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {}, found ", self.expected)?;
        match &self.found {
            Some(token) => write!(f, "`{}` at token {}", token, self.position + 1),
            None => f.write_str("end of program"),
        }
    }
}

impl std::error::Error for ParseError {}

type Result<T> = std::result::Result<T, ParseError>;

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_second(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos + 1)
    }

    fn error(&self, expected: &'static str) -> ParseError {
        ParseError {
            position: self.pos,
            expected,
            found: self.peek().cloned(),
        }
    }

    fn expect(&mut self, token: Token, expected: &'static str) -> Result<()> {
        if self.peek() == Some(&token) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(expected))
        }
    }

    fn ident(&mut self) -> Result<String> {
        match self.peek() {
            Some(Token::Ident(name)) => {
                self.pos += 1;
                Ok(name.clone())
            }
            _ => Err(self.error("identifier")),
        }
    }

    fn expr(&mut self) -> Result<Expr> {
        if let (Some(Token::Ident(binder)), Some(Token::Equals)) = (self.peek(), self.peek_second())
        {
            self.pos += 2;
            let value = self.expr()?;
            self.expect(Token::Semicolon, "`;`")?;
            let rest = self.expr()?;
            return Ok(Expr::Assign {
                binder: binder.clone(),
                value: Box::new(value),
                rest: Box::new(rest),
            });
        }
        self.binary(0)
    }

    fn binary(&mut self, min_power: u8) -> Result<Expr> {
        let mut left = self.application()?;
        while let Some(op) = self.peek().and_then(BinOp::from_token) {
            let (left_power, right_power) = op.binding_power();
            if left_power < min_power {
                break;
            }
            self.pos += 1;
            let right = self.binary(right_power)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn starts_atom(token: &Token) -> bool {
        matches!(
            token,
            Token::Number(_)
                | Token::Bool(_)
                | Token::Ident(_)
                | Token::LParen
                | Token::If
                | Token::Backslash
                | Token::Let
                | Token::Loop
                | Token::Not
                | Token::LBrace
        )
    }

    fn application(&mut self) -> Result<Expr> {
        let mut func = self.atom()?;
        while self.peek().map_or(false, Self::starts_atom) {
            let arg = self.atom()?;
            func = Expr::App {
                func: Box::new(func),
                arg: Box::new(arg),
            };
        }
        Ok(func)
    }

    fn atom(&mut self) -> Result<Expr> {
        let token = self.peek().ok_or_else(|| self.error("expression"))?;
        self.pos += 1;
        Ok(match token {
            Token::Number(n) => Expr::Number(*n),
            Token::Bool(b) => Expr::Bool(*b),
            Token::Ident(name) => Expr::Var(name.clone()),
            Token::LParen => {
                let inner = self.expr()?;
                self.expect(Token::RParen, "`)`")?;
                inner
            }
            Token::LBrace => {
                let inner = self.expr()?;
                self.expect(Token::RBrace, "`}`")?;
                inner
            }
            Token::If => {
                let condition = self.expr()?;
                self.expect(Token::Then, "`then`")?;
                let then_branch = self.expr()?;
                self.expect(Token::Else, "`else`")?;
                let else_branch = self.expr()?;
                Expr::If {
                    condition: Box::new(condition),
                    then_branch: Box::new(then_branch),
                    else_branch: Box::new(else_branch),
                }
            }
            Token::Backslash => {
                let binder = self.ident()?;
                self.expect(Token::Arrow, "`=>`")?;
                let body = self.expr()?;
                Expr::Lambda {
                    binder,
                    body: Box::new(body),
                }
            }
            Token::Let => {
                let binder = self.ident()?;
                self.expect(Token::Equals, "`=`")?;
                let value = self.expr()?;
                self.expect(Token::In, "`in`")?;
                let body = self.expr()?;
                Expr::Let {
                    binder,
                    value: Box::new(value),
                    body: Box::new(body),
                }
            }
            Token::Loop => {
                let count = self.atom()?;
                self.expect(Token::Colon, "`:`")?;
                let accumulator = self.ident()?;
                self.expect(Token::LBrace, "`{`")?;
                let body = self.expr()?;
                self.expect(Token::RBrace, "`}`")?;
                Expr::Loop {
                    count: Box::new(count),
                    accumulator,
                    body: Box::new(body),
                }
            }
            Token::Not => Expr::Not(Box::new(self.atom()?)),
            _ => {
                self.pos -= 1;
                return Err(self.error("expression"));
            }
        })
    }
}

/// Parses a whole program. Tokens left over after the expression are an
/// error.
pub fn parse_program(tokens: &[Token]) -> Result<Expr> {
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.expr()?;
    if parser.pos < tokens.len() {
        return Err(parser.error("end of program"));
    }
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::tokenize;
    use rstest::rstest;

    fn parse(text: &str) -> Result<Expr> {
        parse_program(&tokenize(text).unwrap())
    }

    fn num(n: i64) -> Box<Expr> {
        Box::new(Expr::Number(n))
    }

    fn var(name: &str) -> Box<Expr> {
        Box::new(Expr::Var(name.to_string()))
    }

    fn binary(op: BinOp, left: Box<Expr>, right: Box<Expr>) -> Box<Expr> {
        Box::new(Expr::Binary { op, left, right })
    }

    /// Renders a tree with every compound node in parentheses.
    fn sexp(expr: &Expr) -> String {
        match expr {
            Expr::Number(n) => n.to_string(),
            Expr::Bool(b) => b.to_string(),
            Expr::Var(name) => name.clone(),
            Expr::Lambda { binder, body } => format!("(\\{} {})", binder, sexp(body)),
            Expr::App { func, arg } => format!("(app {} {})", sexp(func), sexp(arg)),
            Expr::If {
                condition,
                then_branch,
                else_branch,
            } => format!(
                "(if {} {} {})",
                sexp(condition),
                sexp(then_branch),
                sexp(else_branch)
            ),
            Expr::Binary { op, left, right } => {
                format!("({:?} {} {})", op, sexp(left), sexp(right))
            }
            Expr::Not(inner) => format!("(not {})", sexp(inner)),
            Expr::Let {
                binder,
                value,
                body,
            } => format!("(let {} {} {})", binder, sexp(value), sexp(body)),
            Expr::Assign {
                binder,
                value,
                rest,
            } => format!("(set {} {} {})", binder, sexp(value), sexp(rest)),
            Expr::Loop {
                count,
                accumulator,
                body,
            } => format!("(loop {} {} {})", sexp(count), accumulator, sexp(body)),
        }
    }

    #[test]
    fn times_binds_tighter_than_plus() {
        assert_eq!(
            parse("1 + 2 * 3").unwrap(),
            *binary(
                BinOp::Plus,
                num(1),
                binary(BinOp::Times, num(2), num(3))
            )
        );
    }

    #[rstest(
        text,
        tree,
        case("1 - 2 - 3", "(Minus (Minus 1 2) 3)"),
        case("1 + 2 == 3", "(Equals (Plus 1 2) 3)"),
        case("(1 + 2) * 3", "(Times (Plus 1 2) 3)"),
        case("A < B == true", "(Equals (Less A B) true)"),
        case("F A B", "(app (app F A) B)"),
        case("F 1 + G 2", "(Plus (app F 1) (app G 2))"),
        case("\\A => A + 1", "(\\A (Plus A 1))"),
        case("(\\A => A) 3", "(app (\\A A) 3)"),
        case("if A > 1 then 2 else 3 + 4", "(if (Greater A 1) 2 (Plus 3 4))"),
        case("let D = 2 in D * D", "(let D 2 (Times D D))"),
        case("E = 1; F = E + 1; F", "(set E 1 (set F (Plus E 1) F))"),
        case("loop 3 : A { A * 2 }", "(loop 3 A (Times A 2))"),
        case("!A == false", "(Equals (not A) false)"),
        case("!(A == B)", "(not (Equals A B))"),
        case("{ 1 + 2 } * 3", "(Times (Plus 1 2) 3)"),
    )]
    fn parse_trees(text: &str, tree: &str) {
        assert_eq!(sexp(&parse(text).unwrap()), tree);
    }

    #[rstest(
        text,
        position,
        expected,
        case("", 0, "expression"),
        case("1 +", 2, "expression"),
        case("(1", 2, "`)`"),
        case("if 1 else 2", 2, "`then`"),
        case("\\1 => 2", 1, "identifier"),
        case("\\A = A", 2, "`=>`"),
        case("let A 1 in A", 2, "`=`"),
        case("A = 1 )", 3, "`;`"),
        case("1 2 )", 2, "end of program"),
        case("loop 3 A { A }", 2, "`:`"),
        case("then", 0, "expression"),
    )]
    fn parse_errors(text: &str, position: usize, expected: &str) {
        let err = parse(text).unwrap_err();
        assert_eq!((err.position, err.expected), (position, expected));
    }

    #[test]
    fn error_message_names_the_token() {
        let err = parse("1 + )").unwrap_err();
        assert_eq!(err.to_string(), "expected expression, found `)` at token 3");
        let err = parse("(").unwrap_err();
        assert_eq!(err.to_string(), "expected expression, found end of program");
    }
}
