//! The abstract syntax tree produced by the parser.
//!
//! Every node is a variant of [`Expr`]; there is no separate statement
//! type because `return`/`break`/`continue` are themselves expressions
//! (they evaluate their optional payload and set a control-flow flag, see
//! `rill-eval`). A parsed program is a single [`Expr::List`] with
//! `is_block_statements = true`.

use rill_util::{Span, Symbol};

/// Parsing a complete source file yields one top-level [`Expr`] - a block
/// list containing the program's statements.
pub type Ast = Expr;

/// A binary operator, carried by [`Expr::BinOp`]. Mirrors the subset of
/// [`rill_lex::TokenKind`] that can appear as an infix operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Ee,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    And,
    Or,
}

impl std::fmt::Display for BinOpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BinOpKind::Add => "+",
            BinOpKind::Sub => "-",
            BinOpKind::Mul => "*",
            BinOpKind::Div => "/",
            BinOpKind::Pow => "^",
            BinOpKind::Ee => "==",
            BinOpKind::Ne => "!=",
            BinOpKind::Lt => "<",
            BinOpKind::Lte => "<=",
            BinOpKind::Gt => ">",
            BinOpKind::Gte => ">=",
            BinOpKind::And => "and",
            BinOpKind::Or => "or",
        };
        write!(f, "{s}")
    }
}

/// A unary operator, carried by [`Expr::UnaryOp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOpKind {
    Plus,
    Minus,
    Not,
}

/// One `if`/`elif` case: a condition and the body to run when it is truthy.
#[derive(Debug, Clone)]
pub struct IfCase {
    pub cond: Expr,
    pub body: Expr,
}

#[derive(Debug, Clone)]
pub enum Expr {
    Int(i64, Span),
    Float(f64, Span),
    Str(Symbol, Span),

    /// A list literal, or (when `is_block_statements` is set) a
    /// newline-separated statement sequence - a program, or the body of an
    /// `if`/`for`/`while`/`fun`. Block lists evaluate to their last
    /// element; literal lists evaluate to a `List` value.
    List {
        elements: Vec<Expr>,
        is_block_statements: bool,
        span: Span,
    },

    Map {
        pairs: Vec<(Expr, Expr)>,
        span: Span,
    },

    VarAccess {
        name: Symbol,
        span: Span,
    },
    VarAssign {
        name: Symbol,
        value: Box<Expr>,
        span: Span,
    },
    /// `target[index] = value`. `target` is always an `Expr::Index`' s
    /// `collection`/`index` pair, kept split out so the evaluator doesn't
    /// have to re-match an `Expr::Index` out of a generic "place" node.
    VarIndexAssign {
        collection: Box<Expr>,
        index: Box<Expr>,
        value: Box<Expr>,
        span: Span,
    },

    BinOp {
        op: BinOpKind,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    UnaryOp {
        op: UnOpKind,
        operand: Box<Expr>,
        span: Span,
    },

    If {
        cases: Vec<IfCase>,
        else_body: Option<Box<Expr>>,
        span: Span,
    },

    For {
        var_name: Symbol,
        start: Box<Expr>,
        end: Box<Expr>,
        step: Option<Box<Expr>>,
        body: Box<Expr>,
        is_block: bool,
        span: Span,
    },

    While {
        cond: Box<Expr>,
        body: Box<Expr>,
        is_block: bool,
        span: Span,
    },

    FuncDef {
        name: Option<Symbol>,
        arg_names: Vec<Symbol>,
        body: Box<Expr>,
        span: Span,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        span: Span,
    },

    Index {
        collection: Box<Expr>,
        index: Box<Expr>,
        span: Span,
    },

    Return {
        value: Option<Box<Expr>>,
        span: Span,
    },
    Break(Span),
    Continue(Span),
}

impl Expr {
    /// The source span covering this node, used only for diagnostics.
    pub fn span(&self) -> Span {
        match self {
            Expr::Int(_, s)
            | Expr::Float(_, s)
            | Expr::Str(_, s)
            | Expr::List { span: s, .. }
            | Expr::Map { span: s, .. }
            | Expr::VarAccess { span: s, .. }
            | Expr::VarAssign { span: s, .. }
            | Expr::VarIndexAssign { span: s, .. }
            | Expr::BinOp { span: s, .. }
            | Expr::UnaryOp { span: s, .. }
            | Expr::If { span: s, .. }
            | Expr::For { span: s, .. }
            | Expr::While { span: s, .. }
            | Expr::FuncDef { span: s, .. }
            | Expr::Call { span: s, .. }
            | Expr::Index { span: s, .. }
            | Expr::Return { span: s, .. }
            | Expr::Break(s)
            | Expr::Continue(s) => *s,
        }
    }
}
