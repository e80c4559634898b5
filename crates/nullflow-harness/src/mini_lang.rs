//! A hand-written scanner and recursive-descent parser for the minimal
//! source-language subset exercised by the core test corpus: a single
//! method declaration with one reference-typed parameter and a
//! reference-typed return, `return`, string/null/int literals, `??`, `?:`,
//! `==`/`!=` against `null` with early-return flow narrowing, `new T[n]`
//! with indexer assignment, `(T)e` casts, and `switch` expressions.
//!
//! This is deliberately not a general-purpose front end: it exists to turn
//! small concrete scenarios into the same `BoundNode` + symbol-table shape
//! a real binder would hand the builder.

use nullflow_builder::bound_tree::{ConversionKind, SwitchArm};
use nullflow_builder::{BoundNode, MethodDeclaration, NonNullFlowOracle};
use nullflow_common::{Location, Span};
use nullflow_model::{Annotation, Registry, SymbolId, SymbolInfo, SymbolKind, SymbolTable, Type};
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;

const FILE: &str = "<snippet>";

/// Value-type names the scanner recognises without needing a symbol table
/// entry to look up "is this a reference type".
const VALUE_TYPES: &[&str] = &[
    "int", "long", "short", "byte", "bool", "char", "double", "float", "decimal", "void",
];

fn is_value_type(name: &str) -> bool {
    VALUE_TYPES.contains(&name)
}

#[derive(Debug)]
pub struct ParseError(pub String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error: {}", self.0)
    }
}

impl std::error::Error for ParseError {}

// ---------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
enum TokKind {
    Ident(String),
    Int(i64),
    Str(String),
    Null,
    Var,
    If,
    Return,
    New,
    Switch,
    Arrow,
    Eq,
    EqEq,
    NotEq,
    QuestionQuestion,
    Question,
    Colon,
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Eof,
}

#[derive(Clone, Debug)]
struct Token {
    kind: TokKind,
    span: Span,
}

struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Lexer {
            src: src.as_bytes(),
            pos: 0,
        }
    }

    fn peek_byte(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek_byte();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }

    fn skip_trivia(&mut self) {
        while let Some(b) = self.peek_byte() {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            let start = self.pos;
            let Some(b) = self.peek_byte() else {
                tokens.push(Token {
                    kind: TokKind::Eof,
                    span: Span::new(start as u32, start as u32),
                });
                break;
            };
            let kind = match b {
                b'(' => {
                    self.bump();
                    TokKind::LParen
                }
                b')' => {
                    self.bump();
                    TokKind::RParen
                }
                b'{' => {
                    self.bump();
                    TokKind::LBrace
                }
                b'}' => {
                    self.bump();
                    TokKind::RBrace
                }
                b'[' => {
                    self.bump();
                    TokKind::LBracket
                }
                b']' => {
                    self.bump();
                    TokKind::RBracket
                }
                b';' => {
                    self.bump();
                    TokKind::Semicolon
                }
                b',' => {
                    self.bump();
                    TokKind::Comma
                }
                b':' => {
                    self.bump();
                    TokKind::Colon
                }
                b'?' => {
                    self.bump();
                    if self.peek_byte() == Some(b'?') {
                        self.bump();
                        TokKind::QuestionQuestion
                    } else {
                        TokKind::Question
                    }
                }
                b'=' => {
                    self.bump();
                    match self.peek_byte() {
                        Some(b'=') => {
                            self.bump();
                            TokKind::EqEq
                        }
                        Some(b'>') => {
                            self.bump();
                            TokKind::Arrow
                        }
                        _ => TokKind::Eq,
                    }
                }
                b'!' => {
                    self.bump();
                    if self.peek_byte() == Some(b'=') {
                        self.bump();
                        TokKind::NotEq
                    } else {
                        return Err(ParseError(format!("unexpected `!` at byte {start}")));
                    }
                }
                b'"' => {
                    self.bump();
                    let mut s = String::new();
                    loop {
                        match self.bump() {
                            Some(b'"') => break,
                            Some(c) => s.push(c as char),
                            None => return Err(ParseError("unterminated string literal".into())),
                        }
                    }
                    TokKind::Str(s)
                }
                b'0'..=b'9' => {
                    let begin = self.pos;
                    while self.peek_byte().is_some_and(|c| c.is_ascii_digit()) {
                        self.bump();
                    }
                    let text = std::str::from_utf8(&self.src[begin..self.pos]).unwrap();
                    TokKind::Int(text.parse().unwrap())
                }
                c if c.is_ascii_alphabetic() || c == b'_' => {
                    let begin = self.pos;
                    while self
                        .peek_byte()
                        .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_')
                    {
                        self.bump();
                    }
                    let text = std::str::from_utf8(&self.src[begin..self.pos]).unwrap();
                    match text {
                        "null" => TokKind::Null,
                        "var" => TokKind::Var,
                        "if" => TokKind::If,
                        "return" => TokKind::Return,
                        "new" => TokKind::New,
                        "switch" => TokKind::Switch,
                        other => TokKind::Ident(other.to_string()),
                    }
                }
                other => {
                    return Err(ParseError(format!(
                        "unexpected character `{}` at byte {start}",
                        other as char
                    )))
                }
            };
            tokens.push(Token {
                kind,
                span: Span::new(start as u32, self.pos as u32),
            });
        }
        Ok(tokens)
    }
}

// ---------------------------------------------------------------------
// Ast (pre-bound: identifiers are still raw names, not resolved symbols)
// ---------------------------------------------------------------------

#[derive(Clone, Debug)]
struct AstType {
    name: String,
    nullable: bool,
}

#[derive(Clone, Debug)]
enum Pattern {
    Int(i64),
    Str(String),
    Null,
    Discard,
}

#[derive(Clone, Debug)]
enum AstExpr {
    Null(Span),
    Int(i64, Span),
    Str(String, Span),
    Ident(String, Span),
    Coalesce(Box<AstExpr>, Box<AstExpr>, Span),
    Conditional {
        condition: Box<AstExpr>,
        when_true: Box<AstExpr>,
        when_false: Box<AstExpr>,
        span: Span,
    },
    NullCompare {
        operand: Box<AstExpr>,
        is_eq: bool,
        span: Span,
    },
    Assign(Box<AstExpr>, Box<AstExpr>, Span),
    Index(Box<AstExpr>, Box<AstExpr>, Span),
    NewArray {
        element: AstType,
        size: i64,
        span: Span,
    },
    Cast {
        target: AstType,
        operand: Box<AstExpr>,
        span: Span,
    },
    Switch {
        scrutinee: Box<AstExpr>,
        arms: Vec<(Pattern, AstExpr)>,
        span: Span,
    },
}

impl AstExpr {
    fn span(&self) -> Span {
        match self {
            AstExpr::Null(s)
            | AstExpr::Int(_, s)
            | AstExpr::Str(_, s)
            | AstExpr::Ident(_, s)
            | AstExpr::Coalesce(_, _, s)
            | AstExpr::Conditional { span: s, .. }
            | AstExpr::NullCompare { span: s, .. }
            | AstExpr::Assign(_, _, s)
            | AstExpr::Index(_, _, s)
            | AstExpr::NewArray { span: s, .. }
            | AstExpr::Cast { span: s, .. }
            | AstExpr::Switch { span: s, .. } => *s,
        }
    }
}

#[derive(Clone, Debug)]
enum AstStmt {
    Return(Option<AstExpr>, Span),
    VarDecl(String, AstExpr, Span),
    If {
        cond: AstExpr,
        then_branch: Box<AstStmt>,
        else_branch: Option<Box<AstStmt>>,
        span: Span,
    },
    Expr(AstExpr, Span),
    Block(Vec<AstStmt>, Span),
}

struct AstMethod {
    return_type: AstType,
    param_name: String,
    param_type: AstType,
    body: AstBody,
}

enum AstBody {
    Expr(AstExpr),
    Block(Vec<AstStmt>),
}

// ---------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &TokKind {
        &self.tokens[self.pos].kind
    }

    fn peek_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn bump(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, kind: &TokKind) -> Result<Token, ParseError> {
        if self.peek() == kind {
            Ok(self.bump())
        } else {
            Err(ParseError(format!(
                "expected {kind:?}, found {:?} at byte {}",
                self.peek(),
                self.peek_span().start
            )))
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.peek().clone() {
            TokKind::Ident(name) => {
                self.bump();
                Ok(name)
            }
            other => Err(ParseError(format!("expected identifier, found {other:?}"))),
        }
    }

    fn parse_type(&mut self) -> Result<AstType, ParseError> {
        let name = self.expect_ident()?;
        let nullable = if *self.peek() == TokKind::Question {
            self.bump();
            true
        } else {
            false
        };
        Ok(AstType { name, nullable })
    }

    fn parse_method(&mut self) -> Result<AstMethod, ParseError> {
        let return_type = self.parse_type()?;
        let _name = self.expect_ident()?;
        self.expect(&TokKind::LParen)?;
        let param_type = self.parse_type()?;
        let param_name = self.expect_ident()?;
        self.expect(&TokKind::RParen)?;

        let body = if *self.peek() == TokKind::Arrow {
            self.bump();
            let expr = self.parse_expr()?;
            self.expect(&TokKind::Semicolon)?;
            AstBody::Expr(expr)
        } else {
            AstBody::Block(self.parse_block_stmts()?)
        };

        Ok(AstMethod {
            return_type,
            param_name,
            param_type,
            body,
        })
    }

    fn parse_block_stmts(&mut self) -> Result<Vec<AstStmt>, ParseError> {
        self.expect(&TokKind::LBrace)?;
        let mut stmts = Vec::new();
        while *self.peek() != TokKind::RBrace {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(&TokKind::RBrace)?;
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> Result<AstStmt, ParseError> {
        let start = self.peek_span();
        match self.peek().clone() {
            TokKind::Return => {
                self.bump();
                let value = if *self.peek() == TokKind::Semicolon {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect(&TokKind::Semicolon)?;
                Ok(AstStmt::Return(value, start))
            }
            TokKind::Var => {
                self.bump();
                let name = self.expect_ident()?;
                self.expect(&TokKind::Eq)?;
                let init = self.parse_expr()?;
                self.expect(&TokKind::Semicolon)?;
                Ok(AstStmt::VarDecl(name, init, start))
            }
            TokKind::If => {
                self.bump();
                self.expect(&TokKind::LParen)?;
                let cond = self.parse_expr()?;
                self.expect(&TokKind::RParen)?;
                let then_branch = Box::new(self.parse_stmt()?);
                let else_branch = if *self.peek() == TokKind::Ident("else".into()) {
                    self.bump();
                    Some(Box::new(self.parse_stmt()?))
                } else {
                    None
                };
                Ok(AstStmt::If {
                    cond,
                    then_branch,
                    else_branch,
                    span: start,
                })
            }
            TokKind::LBrace => Ok(AstStmt::Block(self.parse_block_stmts()?, start)),
            _ => {
                let expr = self.parse_expr()?;
                self.expect(&TokKind::Semicolon)?;
                Ok(AstStmt::Expr(expr, start))
            }
        }
    }

    // Expr := Assign
    // Assign := Conditional ('=' Assign)?
    // Conditional := Coalesce ('?' Expr ':' Conditional)?     (right assoc)
    // Coalesce := Equality ('??' Coalesce)?     (right assoc)
    // Equality := SwitchPostfix (('=='|'!=') SwitchPostfix)?
    // SwitchPostfix := Primary ('switch' '{' Arm (',' Arm)* ','? '}')?
    fn parse_expr(&mut self) -> Result<AstExpr, ParseError> {
        self.parse_assign()
    }

    fn parse_assign(&mut self) -> Result<AstExpr, ParseError> {
        let target = self.parse_conditional()?;
        if *self.peek() == TokKind::Eq {
            self.bump();
            let value = self.parse_assign()?;
            let span = target.span();
            Ok(AstExpr::Assign(Box::new(target), Box::new(value), span))
        } else {
            Ok(target)
        }
    }

    fn parse_conditional(&mut self) -> Result<AstExpr, ParseError> {
        let condition = self.parse_coalesce()?;
        if *self.peek() == TokKind::Question {
            self.bump();
            let when_true = self.parse_expr()?;
            self.expect(&TokKind::Colon)?;
            let when_false = self.parse_conditional()?;
            let span = condition.span();
            Ok(AstExpr::Conditional {
                condition: Box::new(condition),
                when_true: Box::new(when_true),
                when_false: Box::new(when_false),
                span,
            })
        } else {
            Ok(condition)
        }
    }

    fn parse_coalesce(&mut self) -> Result<AstExpr, ParseError> {
        let left = self.parse_equality()?;
        if *self.peek() == TokKind::QuestionQuestion {
            self.bump();
            let right = self.parse_coalesce()?;
            let span = left.span();
            Ok(AstExpr::Coalesce(Box::new(left), Box::new(right), span))
        } else {
            Ok(left)
        }
    }

    fn parse_equality(&mut self) -> Result<AstExpr, ParseError> {
        let left = self.parse_switch_postfix()?;
        match self.peek() {
            TokKind::EqEq | TokKind::NotEq => {
                let is_eq = *self.peek() == TokKind::EqEq;
                let span = left.span();
                self.bump();
                // Only `x == null` / `x != null` is meaningful in this
                // subset; the right-hand side must be the null literal.
                self.expect(&TokKind::Null)?;
                Ok(AstExpr::NullCompare {
                    operand: Box::new(left),
                    is_eq,
                    span,
                })
            }
            _ => Ok(left),
        }
    }

    fn parse_switch_postfix(&mut self) -> Result<AstExpr, ParseError> {
        let scrutinee = self.parse_primary()?;
        if *self.peek() == TokKind::Switch {
            self.bump();
            let span = scrutinee.span();
            self.expect(&TokKind::LBrace)?;
            let mut arms = Vec::new();
            loop {
                let pattern = self.parse_pattern()?;
                self.expect(&TokKind::Arrow)?;
                let result = self.parse_expr()?;
                arms.push((pattern, result));
                if *self.peek() == TokKind::Comma {
                    self.bump();
                    if *self.peek() == TokKind::RBrace {
                        break;
                    }
                } else {
                    break;
                }
            }
            self.expect(&TokKind::RBrace)?;
            Ok(AstExpr::Switch {
                scrutinee: Box::new(scrutinee),
                arms,
                span,
            })
        } else {
            Ok(scrutinee)
        }
    }

    fn parse_pattern(&mut self) -> Result<Pattern, ParseError> {
        match self.peek().clone() {
            TokKind::Int(n) => {
                self.bump();
                Ok(Pattern::Int(n))
            }
            TokKind::Str(s) => {
                self.bump();
                Ok(Pattern::Str(s))
            }
            TokKind::Null => {
                self.bump();
                Ok(Pattern::Null)
            }
            TokKind::Ident(name) if name == "_" => {
                self.bump();
                Ok(Pattern::Discard)
            }
            other => Err(ParseError(format!("unsupported switch pattern {other:?}"))),
        }
    }

    fn parse_primary(&mut self) -> Result<AstExpr, ParseError> {
        let span = self.peek_span();
        match self.peek().clone() {
            TokKind::Null => {
                self.bump();
                Ok(AstExpr::Null(span))
            }
            TokKind::Int(n) => {
                self.bump();
                Ok(AstExpr::Int(n, span))
            }
            TokKind::Str(s) => {
                self.bump();
                Ok(AstExpr::Str(s, span))
            }
            TokKind::New => {
                self.bump();
                let element = self.parse_type()?;
                self.expect(&TokKind::LBracket)?;
                let TokKind::Int(size) = self.peek().clone() else {
                    return Err(ParseError("expected array size literal".into()));
                };
                self.bump();
                self.expect(&TokKind::RBracket)?;
                Ok(AstExpr::NewArray {
                    element,
                    size,
                    span,
                })
            }
            TokKind::LParen => {
                // A parenthesised type immediately followed by another
                // primary is a cast; this subset has no other use for
                // parentheses.
                self.bump();
                let target = self.parse_type()?;
                self.expect(&TokKind::RParen)?;
                let operand = self.parse_primary()?;
                Ok(AstExpr::Cast {
                    target,
                    operand: Box::new(operand),
                    span,
                })
            }
            TokKind::Ident(name) => {
                self.bump();
                let mut expr = AstExpr::Ident(name, span);
                while *self.peek() == TokKind::LBracket {
                    self.bump();
                    let index = self.parse_expr()?;
                    self.expect(&TokKind::RBracket)?;
                    expr = AstExpr::Index(Box::new(expr), Box::new(index), span);
                }
                Ok(expr)
            }
            other => Err(ParseError(format!("unexpected token {other:?} in expression"))),
        }
    }
}

// ---------------------------------------------------------------------
// Non-null flow oracle: a syntactic dominator scan over `if (x == null)
// return ...;` early-return idioms.
// ---------------------------------------------------------------------

struct SpanOracle {
    proven: FxHashSet<Span>,
}

impl NonNullFlowOracle for SpanOracle {
    fn is_non_null_at(&self, location: &Location) -> bool {
        self.proven.contains(&location.span)
    }
}

fn always_returns(stmt: &AstStmt) -> bool {
    match stmt {
        AstStmt::Return(..) => true,
        AstStmt::Block(stmts, _) => stmts.last().is_some_and(always_returns),
        _ => false,
    }
}

fn mark_narrowed_refs_expr(expr: &AstExpr, narrowed: &FxHashSet<String>, proven: &mut FxHashSet<Span>) {
    match expr {
        AstExpr::Ident(name, span) => {
            if narrowed.contains(name) {
                proven.insert(*span);
            }
        }
        AstExpr::Coalesce(a, b, _) | AstExpr::Assign(a, b, _) | AstExpr::Index(a, b, _) => {
            mark_narrowed_refs_expr(a, narrowed, proven);
            mark_narrowed_refs_expr(b, narrowed, proven);
        }
        AstExpr::Conditional {
            condition,
            when_true,
            when_false,
            ..
        } => {
            mark_narrowed_refs_expr(condition, narrowed, proven);
            mark_narrowed_refs_expr(when_true, narrowed, proven);
            mark_narrowed_refs_expr(when_false, narrowed, proven);
        }
        AstExpr::NullCompare { operand, .. } => mark_narrowed_refs_expr(operand, narrowed, proven),
        AstExpr::Cast { operand, .. } => mark_narrowed_refs_expr(operand, narrowed, proven),
        AstExpr::Switch { scrutinee, arms, .. } => {
            mark_narrowed_refs_expr(scrutinee, narrowed, proven);
            for (_, result) in arms {
                mark_narrowed_refs_expr(result, narrowed, proven);
            }
        }
        AstExpr::Null(_) | AstExpr::Int(_, _) | AstExpr::Str(_, _) | AstExpr::NewArray { .. } => {}
    }
}

fn mark_narrowed_refs_stmt(stmt: &AstStmt, narrowed: &FxHashSet<String>, proven: &mut FxHashSet<Span>) {
    match stmt {
        AstStmt::Return(Some(e), _) | AstStmt::Expr(e, _) => {
            mark_narrowed_refs_expr(e, narrowed, proven)
        }
        AstStmt::Return(None, _) => {}
        AstStmt::VarDecl(_, init, _) => mark_narrowed_refs_expr(init, narrowed, proven),
        AstStmt::If {
            cond,
            then_branch,
            else_branch,
            ..
        } => {
            mark_narrowed_refs_expr(cond, narrowed, proven);
            mark_narrowed_refs_stmt(then_branch, narrowed, proven);
            if let Some(else_branch) = else_branch {
                mark_narrowed_refs_stmt(else_branch, narrowed, proven);
            }
        }
        AstStmt::Block(stmts, _) => {
            for s in stmts {
                mark_narrowed_refs_stmt(s, narrowed, proven);
            }
        }
    }
}

/// Walk a flat statement sequence (a method body or a nested block),
/// threading forward the set of identifiers proven non-null by an earlier
/// `if (x == null) return ...;` sibling.
fn compute_oracle(stmts: &[AstStmt]) -> FxHashSet<Span> {
    let mut narrowed: FxHashSet<String> = FxHashSet::default();
    let mut proven = FxHashSet::default();
    for stmt in stmts {
        if !narrowed.is_empty() {
            mark_narrowed_refs_stmt(stmt, &narrowed, &mut proven);
        }
        if let AstStmt::If {
            cond,
            then_branch,
            else_branch: None,
            ..
        } = stmt
        {
            if let AstExpr::NullCompare {
                operand,
                is_eq: true,
                ..
            } = cond
            {
                if let AstExpr::Ident(name, _) = operand.as_ref() {
                    if always_returns(then_branch) {
                        narrowed.insert(name.clone());
                    }
                }
            }
        }
    }
    proven
}

// ---------------------------------------------------------------------
// Binder: Ast -> (SymbolTable, MethodDeclaration)
// ---------------------------------------------------------------------

fn bind_type(ty: &AstType) -> (Type, Annotation) {
    if is_value_type(&ty.name) {
        if ty.nullable {
            (Type::NullableValue(Box::new(Type::Value(ty.name.clone()))), Annotation::None)
        } else {
            (Type::Value(ty.name.clone()), Annotation::None)
        }
    } else {
        let ann = if ty.nullable {
            Annotation::Annotated
        } else {
            Annotation::None
        };
        (Type::named(ty.name.clone()), ann)
    }
}

fn loc(span: Span) -> Location {
    Location::new(FILE, span)
}

struct Binder {
    scope: FxHashMap<String, SymbolId>,
}

impl Binder {
    fn bind_expr(&mut self, expr: &AstExpr, symbols: &mut SymbolTable) -> Result<BoundNode, ParseError> {
        Ok(match expr {
            AstExpr::Null(span) => BoundNode::NullLiteral { location: loc(*span) },
            AstExpr::Int(_, span) => BoundNode::ValueLiteral {
                ty: Type::Value("int".into()),
                location: loc(*span),
            },
            AstExpr::Str(_, span) => BoundNode::NonNullReferenceLiteral {
                ty: Type::named("string"),
                location: loc(*span),
            },
            AstExpr::Ident(name, span) => {
                let symbol = *self
                    .scope
                    .get(name)
                    .ok_or_else(|| ParseError(format!("undeclared identifier `{name}`")))?;
                BoundNode::SymbolReference {
                    symbol,
                    location: loc(*span),
                }
            }
            AstExpr::Coalesce(left, right, span) => BoundNode::Coalesce {
                left: Box::new(self.bind_expr(left, symbols)?),
                right: Box::new(self.bind_expr(right, symbols)?),
                location: loc(*span),
            },
            AstExpr::NullCompare { operand, span, .. } => BoundNode::NullComparison {
                operand: Box::new(self.bind_expr(operand, symbols)?),
                location: loc(*span),
            },
            AstExpr::Conditional {
                condition,
                when_true,
                when_false,
                span,
            } => BoundNode::Conditional {
                condition: Box::new(self.bind_expr(condition, symbols)?),
                when_true: Box::new(self.bind_expr(when_true, symbols)?),
                when_false: Box::new(self.bind_expr(when_false, symbols)?),
                location: loc(*span),
            },
            AstExpr::Assign(target, value, span) => BoundNode::Assignment {
                target: Box::new(self.bind_expr(target, symbols)?),
                value: Box::new(self.bind_expr(value, symbols)?),
                location: loc(*span),
            },
            AstExpr::Index(receiver, index, span) => BoundNode::ArrayElementAccess {
                receiver: Box::new(self.bind_expr(receiver, symbols)?),
                index: Box::new(self.bind_expr(index, symbols)?),
                location: loc(*span),
            },
            AstExpr::NewArray { element, span, .. } => {
                let (element_type, _) = bind_type(element);
                BoundNode::ArrayCreation {
                    element_type,
                    initializer: Vec::new(),
                    location: loc(*span),
                }
            }
            AstExpr::Cast { target, operand, span } => {
                let (target_type, _) = bind_type(target);
                let kind = match &target_type {
                    Type::NullableValue(_) => ConversionKind::Reference,
                    Type::Value(_) => ConversionKind::Unboxing,
                    _ => ConversionKind::Reference,
                };
                BoundNode::Conversion {
                    operand: Box::new(self.bind_expr(operand, symbols)?),
                    kind,
                    target_type,
                    location: loc(*span),
                }
            }
            AstExpr::Switch { scrutinee, arms, span } => {
                let bound_scrutinee = Box::new(self.bind_expr(scrutinee, symbols)?);
                let mut bound_arms = Vec::with_capacity(arms.len());
                for (pattern, result) in arms {
                    let pattern_node = match pattern {
                        Pattern::Int(n) => Some(BoundNode::ValueLiteral {
                            ty: Type::Value("int".into()),
                            location: loc(result.span()),
                        }),
                        Pattern::Str(_) => Some(BoundNode::NonNullReferenceLiteral {
                            ty: Type::named("string"),
                            location: loc(result.span()),
                        }),
                        Pattern::Null => Some(BoundNode::NullLiteral {
                            location: loc(result.span()),
                        }),
                        Pattern::Discard => None,
                    };
                    bound_arms.push(SwitchArm {
                        pattern: pattern_node,
                        result: self.bind_expr(result, symbols)?,
                    });
                }
                BoundNode::SwitchExpression {
                    scrutinee: bound_scrutinee,
                    arms: bound_arms,
                    location: loc(*span),
                }
            }
        })
    }

    fn bind_stmt(&mut self, stmt: &AstStmt, symbols: &mut SymbolTable) -> Result<BoundNode, ParseError> {
        Ok(match stmt {
            AstStmt::Return(value, span) => BoundNode::Return {
                value: value
                    .as_ref()
                    .map(|e| self.bind_expr(e, symbols))
                    .transpose()?
                    .map(Box::new),
                location: loc(*span),
            },
            AstStmt::VarDecl(name, init, span) => {
                let bound_init = self.bind_expr(init, symbols)?;
                let id = symbols.reserve_id();
                symbols.insert(SymbolInfo::new(id, SymbolKind::Local, name.clone(), Type::named("var")));
                self.scope.insert(name.clone(), id);
                BoundNode::VarLocalDeclaration {
                    local: id,
                    initializer: Box::new(bound_init),
                    location: loc(*span),
                }
            }
            AstStmt::If {
                cond,
                then_branch,
                else_branch,
                span,
            } => BoundNode::If {
                condition: Box::new(self.bind_expr(cond, symbols)?),
                then_branch: Box::new(self.bind_stmt(then_branch, symbols)?),
                else_branch: else_branch
                    .as_ref()
                    .map(|s| self.bind_stmt(s, symbols))
                    .transpose()?
                    .map(Box::new),
                location: loc(*span),
            },
            AstStmt::Expr(e, _) => self.bind_expr(e, symbols)?,
            AstStmt::Block(stmts, span) => {
                let mut bound = Vec::with_capacity(stmts.len());
                for s in stmts {
                    bound.push(self.bind_stmt(s, symbols)?);
                }
                BoundNode::Block {
                    statements: bound,
                    location: loc(*span),
                }
            }
        })
    }
}

/// The compiled form of one snippet: a fully bound `MethodDeclaration`
/// alongside the symbol table and oracle needed to build it, plus the
/// parameter's own symbol id (the concrete scenarios only ever declare
/// one).
pub struct CompiledMethod {
    pub symbols: SymbolTable,
    pub method: MethodDeclaration,
    pub param: SymbolId,
    pub oracle: Box<dyn NonNullFlowOracle>,
}

/// Parse and bind one method declaration into the shape
/// [`nullflow_builder::NullabilityBuilder`] consumes.
pub fn compile(code: &str) -> Result<CompiledMethod, ParseError> {
    let tokens = Lexer::new(code).tokenize()?;
    let mut parser = Parser { tokens, pos: 0 };
    let ast = parser.parse_method()?;

    let top_level_stmts: Vec<AstStmt> = match &ast.body {
        AstBody::Expr(_) => Vec::new(),
        AstBody::Block(stmts) => stmts.clone(),
    };
    let oracle = SpanOracle {
        proven: compute_oracle(&top_level_stmts),
    };

    let mut symbols = SymbolTable::new();
    let method_id = symbols.reserve_id();
    let param_id = symbols.reserve_id();
    let (param_type, param_annotation) = bind_type(&ast.param_type);
    symbols.insert(
        SymbolInfo::new(param_id, SymbolKind::Parameter, ast.param_name.clone(), param_type.clone())
            .with_container(method_id)
            .with_ordinal(0)
            .with_annotation(param_annotation),
    );

    let mut binder = Binder {
        scope: FxHashMap::default(),
    };
    binder.scope.insert(ast.param_name.clone(), param_id);

    let body = match &ast.body {
        AstBody::Expr(expr) => {
            let value = binder.bind_expr(expr, &mut symbols)?;
            let span = expr.span();
            BoundNode::Return {
                value: Some(Box::new(value)),
                location: loc(span),
            }
        }
        AstBody::Block(stmts) => {
            let mut bound = Vec::with_capacity(stmts.len());
            for s in stmts {
                bound.push(binder.bind_stmt(s, &mut symbols)?);
            }
            BoundNode::Block {
                statements: bound,
                location: Location::synthetic(),
            }
        }
    };

    let (return_type, return_annotation) = bind_type(&ast.return_type);
    let method = MethodDeclaration {
        parameters: vec![param_id],
        return_type,
        return_annotation,
        body,
    };

    let mut return_info = SymbolInfo::new(method_id, SymbolKind::Method, "Test", Type::named("void"));
    return_info.parameters = vec![param_id];
    symbols.insert(return_info);

    Ok(CompiledMethod {
        symbols,
        method,
        param: param_id,
        oracle: Box::new(oracle),
    })
}

/// Build and flush a compiled method against a fresh [`Registry`], handing
/// back the registry plus the parameter's and return type's nodes.
pub fn build(compiled: &CompiledMethod) -> (Registry, nullflow_graph::NodeId, nullflow_graph::NodeId) {
    let mut registry = Registry::new(compiled.symbols.clone());
    let builder = nullflow_builder::NullabilityBuilder::new(compiled.oracle.as_ref());
    let cancellation = nullflow_builder::CancellationToken::new();
    let pending = builder
        .build_method(&mut registry, FILE, &compiled.method, &cancellation)
        .expect("synthetic harness input always builds");
    registry.flush(pending);

    let param_node = registry.get_symbol_type(compiled.param).node;
    let return_key = compiled.method.parameters.len() as u32;
    let return_node = registry
        .get_mapping(FILE, return_key)
        .expect("return type syntax is always registered during the syntax pass");
    (registry, param_node, return_node)
}
