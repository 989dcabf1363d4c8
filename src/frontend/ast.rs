// src/frontend/ast.rs
//! Syntax-tree node types produced by the parsing stage and consumed by the
//! typer. The parser itself lives outside this crate; these types are the
//! contract at that boundary.

use crate::frontend::Span;

/// Unique identifier for symbols (interned strings)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(pub u32);

/// Unique identifier for expression nodes, assigned by the parser.
/// The typer keys per-expression resolution results on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A complete module: one source file's top-level declarations
#[derive(Debug)]
pub struct Module {
    pub name: Symbol,
    pub decls: Vec<Decl>,
    pub span: Span,
}

/// Top-level declarations
#[derive(Debug)]
pub enum Decl {
    Global(GlobalDecl),
    Function(FunctionDecl),
    Struct(StructDecl),
    Sum(SumDecl),
    Trait(TraitDecl),
    Implement(ImplementDecl),
    Alias(AliasDecl),
    Use(UseDecl),
}

/// Module-level binding: `let x = expr` / `var x T = expr`
#[derive(Debug, Clone)]
pub struct GlobalDecl {
    pub name: Symbol,
    pub mutable: bool,
    pub public: bool,
    pub ty: Option<TypeSpec>,
    pub init: Option<Expr>,
    pub span: Span,
}

/// Function or method declaration
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: Symbol,
    pub params: Vec<ParamDecl>,
    pub return_type: Option<TypeSpec>,
    /// Absent for foreign functions and undefined trait members
    pub body: Option<Expr>,
    pub is_foreign: bool,
    pub public: bool,
    pub span: Span,
}

/// Function parameter forms
#[derive(Debug, Clone)]
pub enum ParamDecl {
    /// `name T = default` - at least one of `ty`/`default` is present
    Named {
        name: Symbol,
        ty: Option<TypeSpec>,
        default: Option<Expr>,
        span: Span,
    },
    /// `self` / `mut self` - only valid as the first parameter of a method
    SelfParam { mutable: bool, span: Span },
    /// `...` - C-style variadic, untyped, must be last
    CVariadic { span: Span },
    /// `name ...T` - typed variadic, must be last
    Variadic {
        name: Symbol,
        ty: Option<TypeSpec>,
        span: Span,
    },
}

impl ParamDecl {
    pub fn span(&self) -> Span {
        match self {
            ParamDecl::Named { span, .. }
            | ParamDecl::SelfParam { span, .. }
            | ParamDecl::CVariadic { span }
            | ParamDecl::Variadic { span, .. } => *span,
        }
    }
}

/// Structure declaration: ordered member variables
#[derive(Debug, Clone)]
pub struct StructDecl {
    pub name: Symbol,
    pub members: Vec<FieldDecl>,
    pub generics: Vec<Symbol>,
    pub span: Span,
}

/// One member variable of a struct (or one named field of a sum variant)
#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: Symbol,
    pub public: bool,
    pub ty: Option<TypeSpec>,
    pub default: Option<Expr>,
    pub span: Span,
}

/// Sum-type declaration: tagged variants
#[derive(Debug, Clone)]
pub struct SumDecl {
    pub name: Symbol,
    pub variants: Vec<VariantDecl>,
    pub generics: Vec<Symbol>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct VariantDecl {
    pub name: Symbol,
    pub fields: Vec<FieldDecl>,
    pub span: Span,
}

/// Trait declaration: required member signatures, optional default bodies
#[derive(Debug, Clone)]
pub struct TraitDecl {
    pub name: Symbol,
    pub members: Vec<FunctionDecl>,
    pub generics: Vec<Symbol>,
    pub span: Span,
}

/// Implementation block attaching member functions to a named type
#[derive(Debug, Clone)]
pub struct ImplementDecl {
    pub target: Symbol,
    pub functions: Vec<FunctionDecl>,
    pub span: Span,
}

/// `alias Name = T`
#[derive(Debug, Clone)]
pub struct AliasDecl {
    pub name: Symbol,
    pub ty: TypeSpec,
    pub span: Span,
}

/// `use path.to.module` - declared by the parser, unimplemented in the typer
#[derive(Debug, Clone)]
pub struct UseDecl {
    pub path: Vec<Symbol>,
    pub span: Span,
}

/// Type annotation ("spec") nodes
#[derive(Debug, Clone)]
pub enum TypeSpec {
    /// `Point`, `i32`
    Named { name: Symbol, span: Span },
    /// `List<T>` - polymorphic application, unresolved in this core
    NamedGeneric {
        name: Symbol,
        args: Vec<TypeSpec>,
        span: Span,
    },
    /// `(A, B, C)`
    Tuple { elems: Vec<TypeSpec>, span: Span },
    /// `[N]T`
    FixedList {
        elem: Box<TypeSpec>,
        len: usize,
        span: Span,
    },
    /// `[]T`
    DynList { elem: Box<TypeSpec>, span: Span },
    /// `*T`
    Pointer { base: Box<TypeSpec>, span: Span },
    /// `&T`
    Reference { base: Box<TypeSpec>, span: Span },
    /// `mut T`
    Mutable { base: Box<TypeSpec>, span: Span },
    /// `Self` inside trait/implementation bodies
    SelfType { span: Span },
    /// `proc(A, B) C` - function type
    Proc {
        params: Vec<TypeSpec>,
        ret: Option<Box<TypeSpec>>,
        span: Span,
    },
    /// Absence of an annotation
    Infer { span: Span },
    /// `()`
    Unit { span: Span },
}

impl TypeSpec {
    pub fn span(&self) -> Span {
        match self {
            TypeSpec::Named { span, .. }
            | TypeSpec::NamedGeneric { span, .. }
            | TypeSpec::Tuple { span, .. }
            | TypeSpec::FixedList { span, .. }
            | TypeSpec::DynList { span, .. }
            | TypeSpec::Pointer { span, .. }
            | TypeSpec::Reference { span, .. }
            | TypeSpec::Mutable { span, .. }
            | TypeSpec::SelfType { span }
            | TypeSpec::Proc { span, .. }
            | TypeSpec::Infer { span }
            | TypeSpec::Unit { span } => *span,
        }
    }

    /// True when the annotation is the explicit "no annotation" marker
    pub fn is_infer(&self) -> bool {
        matches!(self, TypeSpec::Infer { .. })
    }
}

/// An expression node
#[derive(Debug, Clone)]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    /// Returns true if this expression is a literal value
    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Int(_)
                | ExprKind::Float(_)
                | ExprKind::Bool(_)
                | ExprKind::Char(_)
                | ExprKind::Unit
        )
    }
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    // Literals
    Int(i64),
    Float(f64),
    Bool(bool),
    Char(char),
    Unit,

    // Names
    Name(Symbol),
    SelfValue,

    // Operations
    Unary(Box<UnaryExpr>),
    Binary(Box<BinaryExpr>),

    // Aggregates
    Tuple(Vec<Expr>),
    StructLiteral(Box<StructLiteralExpr>),

    // Member access
    Access(Box<AccessExpr>),
    TupleAccess(Box<TupleAccessExpr>),

    // Calls
    Call(Box<CallExpr>),
    MethodCall(Box<MethodCallExpr>),

    // Blocks
    Block(Box<Block>),
}

#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Expr,
}

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub lhs: Expr,
    pub rhs: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `!x` - logical not on bool, null test on pointers
    Not,
    /// `~x`
    BitNot,
    /// `&x`
    AddrOf,
    /// `*x`
    Deref,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::AddrOf => "&",
            UnaryOp::Deref => "*",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    And,
    Or,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        }
    }

    /// Arithmetic family: `+ - * / %`
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem
        )
    }

    /// Bitwise family: `& | ^ << >>`
    pub fn is_bitwise(self) -> bool {
        matches!(
            self,
            BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor | BinaryOp::Shl | BinaryOp::Shr
        )
    }

    /// Short-circuit boolean family: `and or`
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    /// Comparison family: yields bool
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::Ne
                | BinaryOp::Lt
                | BinaryOp::Le
                | BinaryOp::Gt
                | BinaryOp::Ge
        )
    }
}

/// `Point[x: 1, y: 2]` - struct construction
#[derive(Debug, Clone)]
pub struct StructLiteralExpr {
    pub name: Symbol,
    pub args: Vec<Argument>,
}

/// `base.field`
#[derive(Debug, Clone)]
pub struct AccessExpr {
    pub base: Expr,
    pub field: Symbol,
    pub field_span: Span,
}

/// `base.0`
#[derive(Debug, Clone)]
pub struct TupleAccessExpr {
    pub base: Expr,
    pub index: usize,
    pub index_span: Span,
}

/// `callee(args...)`
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub callee: Expr,
    pub args: Vec<Argument>,
}

/// `receiver.method(args...)`
#[derive(Debug, Clone)]
pub struct MethodCallExpr {
    pub receiver: Expr,
    pub method: Symbol,
    pub method_span: Span,
    pub args: Vec<Argument>,
}

/// One actual argument at a call or struct-literal site, positionally bound
/// unless `name` is present
#[derive(Debug, Clone)]
pub struct Argument {
    pub name: Option<Symbol>,
    pub value: Expr,
    pub span: Span,
}

/// A block expression: statements plus an optional trailing result
#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub result: Option<Expr>,
    pub span: Span,
}

/// Statements inside a block
#[derive(Debug, Clone)]
pub enum Stmt {
    Let(LetStmt),
    Expr(Expr),
    Defer(Expr),
}

/// Local binding: `let x = expr` or `let mut x T = expr`
#[derive(Debug, Clone)]
pub struct LetStmt {
    pub name: Symbol,
    pub mutable: bool,
    pub ty: Option<TypeSpec>,
    pub init: Expr,
    pub span: Span,
}
