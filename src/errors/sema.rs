// src/errors/sema.rs
//! Semantic analysis errors (E2xxx).

#![allow(unused_assignments)] // False positives from thiserror derive

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum SemanticError {
    #[error("expected {expected}, found {found}")]
    #[diagnostic(code(E2001))]
    TypeMismatch {
        expected: String,
        found: String,
        #[label("type mismatch")]
        span: SourceSpan,
    },

    #[error("undeclared identifier '{name}'")]
    #[diagnostic(code(E2002))]
    UndeclaredIdentifier {
        name: String,
        #[label("not found in scope")]
        span: SourceSpan,
    },

    #[error("'{name}' is already declared in this scope")]
    #[diagnostic(code(E2003))]
    Redeclaration {
        name: String,
        #[label("redeclared here")]
        span: SourceSpan,
        #[label("first declared here")]
        previous: SourceSpan,
    },

    #[error("cyclic dependency while resolving '{name}'")]
    #[diagnostic(
        code(E2004),
        help("break the cycle with a pointer or reference indirection")
    )]
    CyclicDependency {
        name: String,
        #[label("depends on itself")]
        span: SourceSpan,
    },

    #[error("invalid operands {lhs} and {rhs} for operator '{op}'")]
    #[diagnostic(code(E2005))]
    InvalidOperands {
        op: String,
        lhs: String,
        rhs: String,
        #[label("operands are incompatible")]
        span: SourceSpan,
    },

    #[error("invalid operand {operand} for unary operator '{op}'")]
    #[diagnostic(code(E2006))]
    InvalidUnaryOperand {
        op: String,
        operand: String,
        #[label("operand is incompatible")]
        span: SourceSpan,
    },

    #[error("cannot take the address of a literal")]
    #[diagnostic(code(E2007))]
    AddressOfLiteral {
        #[label("literal has no address")]
        span: SourceSpan,
    },

    #[error("cannot dereference non-pointer type {found}")]
    #[diagnostic(code(E2008))]
    DerefNonPointer {
        found: String,
        #[label("expected a pointer")]
        span: SourceSpan,
    },

    #[error("cannot call non-function type '{ty}'")]
    #[diagnostic(code(E2009))]
    NotCallable {
        ty: String,
        #[label("not a function")]
        span: SourceSpan,
    },

    #[error("expected {expected} arguments, found {found}")]
    #[diagnostic(code(E2010))]
    WrongArgumentCount {
        expected: usize,
        found: usize,
        #[label("wrong number of arguments")]
        span: SourceSpan,
    },

    #[error("parameter '{name}' is bound more than once")]
    #[diagnostic(code(E2011))]
    ParameterRebound {
        name: String,
        #[label("bound again here")]
        span: SourceSpan,
        #[label("first bound here")]
        first: SourceSpan,
    },

    #[error("field '{name}' is not initialized")]
    #[diagnostic(code(E2012), help("supply a value or declare a default"))]
    FieldNotInitialized {
        name: String,
        #[label("missing here")]
        span: SourceSpan,
    },

    #[error("type '{ty}' has no member '{name}'")]
    #[diagnostic(code(E2013))]
    UnknownMember {
        ty: String,
        name: String,
        #[label("unknown member")]
        span: SourceSpan,
    },

    #[error("non-static field '{name}' accessed through a type")]
    #[diagnostic(code(E2014))]
    StaticFieldAccess {
        name: String,
        #[label("needs a value, not a type")]
        span: SourceSpan,
    },

    #[error("field '{name}' is private")]
    #[diagnostic(code(E2015))]
    PrivateField {
        name: String,
        #[label("not visible here")]
        span: SourceSpan,
    },

    #[error("member access requires a struct, found {found}")]
    #[diagnostic(code(E2016))]
    AccessNonStruct {
        found: String,
        #[label("not a struct")]
        span: SourceSpan,
    },

    #[error("'{name}' is not a static method")]
    #[diagnostic(code(E2017))]
    NotStaticMethod {
        name: String,
        #[label("called through a type")]
        span: SourceSpan,
    },

    #[error("unknown type '{name}'")]
    #[diagnostic(code(E2018))]
    UnknownType {
        name: String,
        #[label("not a type")]
        span: SourceSpan,
    },

    #[error("immutable global '{name}' requires an initializer")]
    #[diagnostic(code(E2019))]
    MissingInitializer {
        name: String,
        #[label("no initializer")]
        span: SourceSpan,
    },

    #[error("global '{name}' needs a type annotation or an initializer")]
    #[diagnostic(code(E2020))]
    MissingAnnotation {
        name: String,
        #[label("cannot infer a type")]
        span: SourceSpan,
    },

    #[error("'self' is only valid inside a method")]
    #[diagnostic(code(E2021))]
    SelfOutsideMethod {
        #[label("no enclosing method")]
        span: SourceSpan,
    },

    #[error("'self' must be the first parameter")]
    #[diagnostic(code(E2022))]
    SelfNotFirst {
        #[label("move this to the front")]
        span: SourceSpan,
    },

    #[error("variadic parameter must be last")]
    #[diagnostic(code(E2023))]
    VariadicNotLast {
        #[label("parameters follow it")]
        span: SourceSpan,
    },

    #[error("parameter '{name}' needs a type annotation or a default value")]
    #[diagnostic(code(E2024))]
    ParameterUntyped {
        name: String,
        #[label("cannot infer a type")]
        span: SourceSpan,
    },

    #[error("function '{name}' has no body")]
    #[diagnostic(code(E2025), help("only foreign functions and trait members may omit a body"))]
    MissingBody {
        name: String,
        #[label("body required")]
        span: SourceSpan,
    },

    #[error("tuple index {index} out of bounds for {ty}")]
    #[diagnostic(code(E2026))]
    TupleIndexOutOfBounds {
        index: usize,
        ty: String,
        #[label("no such element")]
        span: SourceSpan,
    },

    #[error("{what} is not implemented")]
    #[diagnostic(code(E2027))]
    NotImplemented {
        what: String,
        #[label("unsupported here")]
        span: SourceSpan,
    },

    #[error("field '{name}' needs a type annotation or a default value")]
    #[diagnostic(code(E2028))]
    FieldUntyped {
        name: String,
        #[label("cannot infer a type")]
        span: SourceSpan,
    },
}
