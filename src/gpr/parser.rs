use super::ident::{GeneId, IdPattern};
use super::lexer::{tokenize, Token};

/// Boolean expression tree of a gene-reaction rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Leaf(GeneId),
    /// All children must be present (complex subunits).
    And(Vec<Expr>),
    /// Any child suffices (alternative monomers or complexes).
    Or(Vec<Expr>),
}

/// Parse a rule into an expression tree.
///
/// `and` binds tighter than `or`. The parser never fails: missing operands are
/// skipped, unmatched parentheses are tolerated, and juxtaposed operands are read
/// as alternatives. An `and` left with a single operand stays an [`Expr::And`]
/// node. Returns `None` when the rule holds no identifier at all.
pub fn parse(rule: &str, pattern: &IdPattern) -> Option<Expr> {
    let mut parser = Parser {
        tokens: tokenize(rule, pattern),
        pos: 0,
    };

    let mut alternatives = Vec::new();
    while parser.pos < parser.tokens.len() {
        let start = parser.pos;
        if let Some(expr) = parser.or_expr() {
            alternatives.push(expr);
        }
        // Stray closing parenthesis
        if parser.pos == start || parser.peek() == Some(&Token::RParen) {
            parser.pos += 1;
        }
    }

    join(alternatives, Op::Or)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn or_expr(&mut self) -> Option<Expr> {
        let mut children = Vec::new();
        children.extend(self.and_expr());
        while self.eat(&Token::Or) {
            children.extend(self.and_expr());
        }
        join(children, Op::Or)
    }

    fn and_expr(&mut self) -> Option<Expr> {
        let mut children = Vec::new();
        children.extend(self.atom());
        let mut conjunction = false;
        while self.eat(&Token::And) {
            conjunction = true;
            children.extend(self.atom());
        }

        // An `and` whose other operands were dropped still describes a complex
        match join(children, Op::And)? {
            expr @ Expr::And(_) => Some(expr),
            expr if conjunction => Some(Expr::And(vec![expr])),
            expr => Some(expr),
        }
    }

    fn atom(&mut self) -> Option<Expr> {
        match self.peek()? {
            Token::Ident(id) => {
                let leaf = Expr::Leaf(id.clone());
                self.pos += 1;
                Some(leaf)
            }
            Token::LParen => {
                self.pos += 1;
                let inner = self.or_expr();
                self.eat(&Token::RParen);
                inner
            }
            Token::And | Token::Or | Token::RParen => None,
        }
    }
}

#[derive(Clone, Copy)]
enum Op {
    And,
    Or,
}

/// Collapse a list of operands into one node, merging nested nodes of the same kind.
fn join(children: Vec<Expr>, op: Op) -> Option<Expr> {
    let mut flat = Vec::with_capacity(children.len());
    for child in children {
        match (op, child) {
            (Op::And, Expr::And(inner)) | (Op::Or, Expr::Or(inner)) => flat.extend(inner),
            (_, other) => flat.push(other),
        }
    }

    match flat.len() {
        0 => None,
        1 => flat.pop(),
        _ => Some(match op {
            Op::And => Expr::And(flat),
            Op::Or => Expr::Or(flat),
        }),
    }
}
