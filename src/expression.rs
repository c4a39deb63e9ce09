//! Random arithmetic expressions over normalized pixel coordinates.
//!
//! An [`Expr`] is built once and evaluated at every pixel. Its `Display`
//! output is the provenance record for a run and parses back with
//! [`str::parse`].

use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use thiserror::Error;

use crate::grid::Grid;

/// Added to the divisor of `%` so a zero right operand stays defined.
const MOD_EPSILON: f64 = 0.001;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Xor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Sin,
    Cos,
    Tan,
    Abs,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 6] = [
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::Mod,
        BinaryOp::Xor,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Xor => "xor",
        }
    }

    pub fn apply(self, l: f64, r: f64) -> f64 {
        let v = match self {
            BinaryOp::Add => l + r,
            BinaryOp::Sub => l - r,
            BinaryOp::Mul => l * r,
            BinaryOp::Div => {
                if r == 0.0 {
                    return 0.0;
                }
                l / r
            }
            BinaryOp::Mod => l.abs() % (r.abs() + MOD_EPSILON),
            BinaryOp::Xor => {
                // bytes in, bytes out: the result always lands in [0, 1]
                let a = (l * 255.0) as i64 as u8;
                let b = (r * 255.0) as i64 as u8;
                (a ^ b) as f64 / 255.0
            }
        };
        if v.is_finite() { v } else { 0.0 }
    }
}

impl UnaryOp {
    pub const ALL: [UnaryOp; 4] = [UnaryOp::Sin, UnaryOp::Cos, UnaryOp::Abs, UnaryOp::Tan];

    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Sin => "sin",
            UnaryOp::Cos => "cos",
            UnaryOp::Tan => "tan",
            UnaryOp::Abs => "abs",
        }
    }

    pub fn apply(self, v: f64) -> f64 {
        match self {
            UnaryOp::Sin => (v * TAU).sin(),
            UnaryOp::Cos => (v * TAU).cos(),
            UnaryOp::Tan => (v * TAU).tan(),
            UnaryOp::Abs => v.abs(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Const(f64),
    Var(Axis),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Unary(UnaryOp, Box<Expr>),
}

impl Expr {
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary(op, Box::new(left), Box::new(right))
    }

    pub fn unary(op: UnaryOp, inner: Expr) -> Expr {
        Expr::Unary(op, Box::new(inner))
    }

    /// Evaluate at pixel `(x, y)` of a `w × h` image. Coordinates are
    /// normalized to `[0, 1)` before any operator sees them.
    pub fn eval(&self, x: f64, y: f64, w: f64, h: f64) -> f64 {
        match self {
            Expr::Const(v) => *v,
            Expr::Var(Axis::X) => x / w,
            Expr::Var(Axis::Y) => y / h,
            Expr::Binary(op, l, r) => op.apply(l.eval(x, y, w, h), r.eval(x, y, w, h)),
            Expr::Unary(op, e) => op.apply(e.eval(x, y, w, h)),
        }
    }

    /// Grow a random tree. Nodes at `depth == 0` are always terminal; deeper
    /// nodes stop early one time in five.
    pub fn random<R: Rng + ?Sized>(depth: usize, rng: &mut R) -> Expr {
        if depth == 0 || (depth > 1 && rng.gen_bool(0.2)) {
            return Self::random_terminal(rng);
        }

        if rng.gen_bool(0.6) {
            let op = BinaryOp::ALL[rng.gen_range(0..BinaryOp::ALL.len())];
            let left = Self::random(depth - 1, rng);
            let right = Self::random(depth - 1, rng);
            Expr::binary(op, left, right)
        } else {
            let op = UnaryOp::ALL[rng.gen_range(0..UnaryOp::ALL.len())];
            Expr::unary(op, Self::random(depth - 1, rng))
        }
    }

    /// Constants are drawn from `[0, 5)` and floored to a multiple of 0.01,
    /// the precision `Display` prints, so a printed tree replays exactly.
    /// That leaves 500 possible constants.
    fn random_terminal<R: Rng + ?Sized>(rng: &mut R) -> Expr {
        if rng.gen_bool(0.5) {
            let v: f64 = rng.gen_range(0.0..5.0);
            Expr::Const((v * 100.0).floor() / 100.0)
        } else if rng.gen_bool(0.5) {
            Expr::Var(Axis::X)
        } else {
            Expr::Var(Axis::Y)
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Expr::Const(_) | Expr::Var(_) => 0,
            Expr::Binary(_, l, r) => 1 + l.depth().max(r.depth()),
            Expr::Unary(_, e) => 1 + e.depth(),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(v) => write!(f, "{:.2}", v),
            Expr::Var(Axis::X) => f.write_str("x"),
            Expr::Var(Axis::Y) => f.write_str("y"),
            Expr::Binary(op, l, r) => write!(f, "({} {} {})", l, op.symbol(), r),
            Expr::Unary(op, e) => write!(f, "{}({})", op.name(), e),
        }
    }
}

/// Map an expression onto a palette: `|v| * n`, truncated, reduced mod `n`.
/// Valid for any real result including huge or negative ones.
pub fn render(expr: &Expr, width: usize, height: usize, palette_len: usize) -> Grid {
    let (w, h) = (width as f64, height as f64);
    let n = palette_len as f64;
    let mut grid = Grid::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let v = expr.eval(x as f64, y as f64, w, h);
            let scaled = if v.is_finite() { v.abs() * n } else { 0.0 };
            grid.set(x, y, (scaled as usize) % palette_len);
        }
    }
    grid
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("unexpected '{found}' at byte {at}")]
    Unexpected { found: String, at: usize },
    #[error("trailing input at byte {0}")]
    Trailing(usize),
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Open,
    Close,
    Number(f64),
    Word(String),
    Symbol(char),
}

fn tokenize(src: &str) -> Result<Vec<(usize, Token)>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some(&(at, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push((at, Token::Open));
            }
            ')' => {
                chars.next();
                tokens.push((at, Token::Close));
            }
            '+' | '*' | '/' | '%' => {
                chars.next();
                tokens.push((at, Token::Symbol(c)));
            }
            '-' => {
                chars.next();
                // a minus glued to a digit is a negative literal, otherwise subtraction
                match chars.peek() {
                    Some(&(_, d)) if d.is_ascii_digit() => {
                        let (end, _) = take_while(&mut chars, |c| c.is_ascii_digit() || c == '.');
                        tokens.push((at, Token::Number(parse_number(src, at, end)?)));
                    }
                    _ => tokens.push((at, Token::Symbol('-'))),
                }
            }
            c if c.is_ascii_digit() => {
                let (end, _) = take_while(&mut chars, |c| c.is_ascii_digit() || c == '.');
                tokens.push((at, Token::Number(parse_number(src, at, end)?)));
            }
            c if c.is_ascii_alphabetic() => {
                let (end, _) = take_while(&mut chars, |c| c.is_ascii_alphabetic());
                tokens.push((at, Token::Word(src[at..end].to_string())));
            }
            other => {
                return Err(ParseError::Unexpected {
                    found: other.to_string(),
                    at,
                });
            }
        }
    }
    Ok(tokens)
}

fn take_while<I>(chars: &mut std::iter::Peekable<I>, keep: impl Fn(char) -> bool) -> (usize, usize)
where
    I: Iterator<Item = (usize, char)>,
{
    let mut end = 0;
    let mut count = 0;
    while let Some(&(i, c)) = chars.peek() {
        if !keep(c) {
            return (i, count);
        }
        end = i + c.len_utf8();
        count += 1;
        chars.next();
    }
    (end, count)
}

fn parse_number(src: &str, start: usize, end: usize) -> Result<f64, ParseError> {
    src[start..end].parse().map_err(|_| ParseError::Unexpected {
        found: src[start..end].to_string(),
        at: start,
    })
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
}

impl Parser {
    fn next(&mut self) -> Result<(usize, Token), ParseError> {
        let tok = self.tokens.get(self.pos).cloned().ok_or(ParseError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(tok)
    }

    fn expect_close(&mut self) -> Result<(), ParseError> {
        match self.next()? {
            (_, Token::Close) => Ok(()),
            (at, tok) => Err(unexpected(at, &tok)),
        }
    }

    fn expr(&mut self) -> Result<Expr, ParseError> {
        match self.next()? {
            (_, Token::Number(v)) => Ok(Expr::Const(v)),
            (_, Token::Word(w)) if w == "x" => Ok(Expr::Var(Axis::X)),
            (_, Token::Word(w)) if w == "y" => Ok(Expr::Var(Axis::Y)),
            (at, Token::Word(w)) => {
                let op = UnaryOp::ALL
                    .into_iter()
                    .find(|op| op.name() == w)
                    .ok_or_else(|| unexpected(at, &Token::Word(w.clone())))?;
                match self.next()? {
                    (_, Token::Open) => {}
                    (at, tok) => return Err(unexpected(at, &tok)),
                }
                let inner = self.expr()?;
                self.expect_close()?;
                Ok(Expr::unary(op, inner))
            }
            (_, Token::Open) => {
                let left = self.expr()?;
                let op = match self.next()? {
                    (_, Token::Symbol('+')) => BinaryOp::Add,
                    (_, Token::Symbol('-')) => BinaryOp::Sub,
                    (_, Token::Symbol('*')) => BinaryOp::Mul,
                    (_, Token::Symbol('/')) => BinaryOp::Div,
                    (_, Token::Symbol('%')) => BinaryOp::Mod,
                    (_, Token::Word(w)) if w == "xor" => BinaryOp::Xor,
                    (at, tok) => return Err(unexpected(at, &tok)),
                };
                let right = self.expr()?;
                self.expect_close()?;
                Ok(Expr::binary(op, left, right))
            }
            (at, tok) => Err(unexpected(at, &tok)),
        }
    }
}

fn unexpected(at: usize, tok: &Token) -> ParseError {
    let found = match tok {
        Token::Open => "(".to_string(),
        Token::Close => ")".to_string(),
        Token::Number(v) => v.to_string(),
        Token::Word(w) => w.clone(),
        Token::Symbol(c) => c.to_string(),
    };
    ParseError::Unexpected { found, at }
}

impl FromStr for Expr {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser {
            tokens: tokenize(s)?,
            pos: 0,
        };
        let expr = parser.expr()?;
        match parser.tokens.get(parser.pos) {
            None => Ok(expr),
            Some((at, _)) => Err(ParseError::Trailing(*at)),
        }
    }
}
