// src/sema/typer/tests.rs
use super::*;
use crate::frontend::ast::{
    AccessExpr, AliasDecl, Argument, BinaryOp, Block, CallExpr, Expr, ExprKind, FieldDecl,
    FunctionDecl, GlobalDecl, ImplementDecl, LetStmt, MethodCallExpr, Module, ParamDecl, Stmt,
    StructDecl, StructLiteralExpr, SumDecl, TupleAccessExpr, TypeSpec, UnaryExpr, UnaryOp,
    VariantDecl,
};
use crate::sema::value::Value;

/// Hand-built syntax trees standing in for the parser stage.
struct Builder {
    interner: Interner,
    next: u32,
}

impl Builder {
    fn new() -> Self {
        Self {
            interner: Interner::new(),
            next: 0,
        }
    }

    fn sym(&mut self, s: &str) -> Symbol {
        self.interner.intern(s)
    }

    fn expr(&mut self, kind: ExprKind) -> Expr {
        let id = NodeId(self.next);
        self.next += 1;
        Expr {
            id,
            kind,
            span: Span::default(),
        }
    }

    fn int(&mut self, v: i64) -> Expr {
        self.expr(ExprKind::Int(v))
    }

    fn boolean(&mut self, v: bool) -> Expr {
        self.expr(ExprKind::Bool(v))
    }

    fn float(&mut self, v: f64) -> Expr {
        self.expr(ExprKind::Float(v))
    }

    fn name(&mut self, s: &str) -> Expr {
        let sym = self.sym(s);
        self.expr(ExprKind::Name(sym))
    }

    fn binary(&mut self, op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        self.expr(ExprKind::Binary(Box::new(
            crate::frontend::ast::BinaryExpr { op, lhs, rhs },
        )))
    }

    fn unary(&mut self, op: UnaryOp, operand: Expr) -> Expr {
        self.expr(ExprKind::Unary(Box::new(UnaryExpr { op, operand })))
    }

    fn named(&mut self, s: &str) -> TypeSpec {
        TypeSpec::Named {
            name: self.sym(s),
            span: Span::default(),
        }
    }

    fn arg(&mut self, value: Expr) -> Argument {
        Argument {
            name: None,
            value,
            span: Span::default(),
        }
    }

    fn named_arg(&mut self, name: &str, value: Expr) -> Argument {
        Argument {
            name: Some(self.sym(name)),
            value,
            span: Span::default(),
        }
    }

    fn call(&mut self, callee: Expr, args: Vec<Argument>) -> Expr {
        self.expr(ExprKind::Call(Box::new(CallExpr { callee, args })))
    }

    fn access(&mut self, base: Expr, field: &str) -> Expr {
        let field = self.sym(field);
        self.expr(ExprKind::Access(Box::new(AccessExpr {
            base,
            field,
            field_span: Span::default(),
        })))
    }

    fn struct_lit(&mut self, name: &str, args: Vec<Argument>) -> Expr {
        let name = self.sym(name);
        self.expr(ExprKind::StructLiteral(Box::new(StructLiteralExpr {
            name,
            args,
        })))
    }

    fn block(&mut self, stmts: Vec<Stmt>, result: Option<Expr>) -> Expr {
        self.expr(ExprKind::Block(Box::new(Block {
            stmts,
            result,
            span: Span::default(),
        })))
    }

    fn let_stmt(&mut self, name: &str, mutable: bool, ty: Option<TypeSpec>, init: Expr) -> Stmt {
        Stmt::Let(LetStmt {
            name: self.sym(name),
            mutable,
            ty,
            init,
            span: Span::default(),
        })
    }

    fn global(&mut self, name: &str, ty: Option<TypeSpec>, init: Option<Expr>) -> Decl {
        Decl::Global(GlobalDecl {
            name: self.sym(name),
            mutable: false,
            public: false,
            ty,
            init,
            span: Span::default(),
        })
    }

    fn var(&mut self, name: &str, ty: Option<TypeSpec>, init: Option<Expr>) -> Decl {
        Decl::Global(GlobalDecl {
            name: self.sym(name),
            mutable: true,
            public: false,
            ty,
            init,
            span: Span::default(),
        })
    }

    fn param(&mut self, name: &str, ty: &str) -> ParamDecl {
        ParamDecl::Named {
            name: self.sym(name),
            ty: Some(self.named(ty)),
            default: None,
            span: Span::default(),
        }
    }

    fn param_default(&mut self, name: &str, ty: &str, default: Expr) -> ParamDecl {
        ParamDecl::Named {
            name: self.sym(name),
            ty: Some(self.named(ty)),
            default: Some(default),
            span: Span::default(),
        }
    }

    fn func(
        &mut self,
        name: &str,
        params: Vec<ParamDecl>,
        ret: Option<TypeSpec>,
        body: Expr,
    ) -> Decl {
        Decl::Function(FunctionDecl {
            name: self.sym(name),
            params,
            return_type: ret,
            body: Some(body),
            is_foreign: false,
            public: false,
            span: Span::default(),
        })
    }

    fn field(&mut self, name: &str, public: bool, ty: &str) -> FieldDecl {
        FieldDecl {
            name: self.sym(name),
            public,
            ty: Some(self.named(ty)),
            default: None,
            span: Span::default(),
        }
    }

    fn strukt(&mut self, name: &str, members: Vec<FieldDecl>) -> Decl {
        Decl::Struct(StructDecl {
            name: self.sym(name),
            members,
            generics: Vec::new(),
            span: Span::default(),
        })
    }

    fn module(&mut self, decls: Vec<Decl>) -> Module {
        Module {
            name: self.sym("main"),
            decls,
            span: Span::default(),
        }
    }
}

fn resolve(b: &mut Builder, decls: Vec<Decl>) -> (Typer, Result<EntityId, Vec<TypeError>>) {
    let module = b.module(decls);
    let mut typer = Typer::new();
    let result = typer.resolve_module(&module, &mut b.interner);
    (typer, result)
}

fn first_error(result: &Result<EntityId, Vec<TypeError>>) -> &SemanticError {
    &result.as_ref().unwrap_err()[0].error
}

fn module_binding(typer: &Typer, b: &mut Builder, name: &str) -> EntityId {
    let sym = b.interner.intern(name);
    let module_scope = ScopeId(1); // scope 0 is the prelude
    typer.scopes().find(module_scope, sym).unwrap()
}

// ============================================================================
// Globals and constants
// ============================================================================

#[test]
fn annotated_global_resolves() {
    let mut b = Builder::new();
    let ty = b.named("i32");
    let init = b.int(1);
    let decls = vec![b.global("x", Some(ty), Some(init))];
    let (_, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
}

#[test]
fn immutable_global_promotes_to_constant() {
    let mut b = Builder::new();
    let one = b.int(1);
    let two = b.int(2);
    let init = b.binary(BinaryOp::Add, one, two);
    let decls = vec![b.global("x", None, Some(init))];
    let (typer, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
    let entity = module_binding(&typer, &mut b, "x");
    match &typer.entities().get(entity).kind {
        EntityKind::Constant(value) => assert_eq!(*value, Value::I64(3)),
        kind => panic!("expected a constant, got {}", kind.describe()),
    }
}

#[test]
fn mutable_global_stays_global() {
    let mut b = Builder::new();
    let init = b.int(1);
    let decls = vec![b.var("x", None, Some(init))];
    let (typer, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
    let entity = module_binding(&typer, &mut b, "x");
    assert!(matches!(
        typer.entities().get(entity).kind,
        EntityKind::Global(_)
    ));
}

#[test]
fn constant_propagates_through_names() {
    // x = 2; y = x * 3  =>  y is the constant 6
    let mut b = Builder::new();
    let two = b.int(2);
    let x_name = b.name("x");
    let three = b.int(3);
    let init = b.binary(BinaryOp::Mul, x_name, three);
    let decls = vec![b.global("x", None, Some(two)), b.global("y", None, Some(init))];
    let (typer, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
    let entity = module_binding(&typer, &mut b, "y");
    match &typer.entities().get(entity).kind {
        EntityKind::Constant(value) => assert_eq!(*value, Value::I64(6)),
        kind => panic!("expected a constant, got {}", kind.describe()),
    }
}

#[test]
fn literal_adopts_annotated_kind() {
    let mut b = Builder::new();
    let ty = b.named("u8");
    let init = b.int(200);
    let decls = vec![b.global("x", Some(ty), Some(init))];
    let (typer, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
    let entity = module_binding(&typer, &mut b, "x");
    match &typer.entities().get(entity).kind {
        EntityKind::Constant(value) => assert_eq!(*value, Value::U8(200)),
        kind => panic!("expected a constant, got {}", kind.describe()),
    }
}

#[test]
fn literal_too_wide_for_annotation_is_mismatch() {
    let mut b = Builder::new();
    let ty = b.named("i8");
    let init = b.int(300);
    let decls = vec![b.global("x", Some(ty), Some(init))];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::TypeMismatch { .. }
    ));
}

#[test]
fn immutable_global_requires_initializer() {
    let mut b = Builder::new();
    let ty = b.named("i32");
    let decls = vec![b.global("x", Some(ty), None)];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::MissingInitializer { .. }
    ));
}

#[test]
fn bare_global_requires_annotation_or_initializer() {
    let mut b = Builder::new();
    let decls = vec![b.var("x", None, None)];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::MissingAnnotation { .. }
    ));
}

#[test]
fn bad_annotation_still_resolves_the_initializer() {
    // Both the unknown annotation and the undeclared initializer name are
    // reported in one pass
    let mut b = Builder::new();
    let ann = b.named("Nope");
    let init = b.name("missing");
    let decls = vec![b.global("x", Some(ann), Some(init))];
    let (_, result) = resolve(&mut b, decls);
    let errors = result.unwrap_err();
    assert!(errors
        .iter()
        .any(|e| matches!(&e.error, SemanticError::UndeclaredIdentifier { name, .. } if name == "Nope")));
    assert!(errors
        .iter()
        .any(|e| matches!(&e.error, SemanticError::UndeclaredIdentifier { name, .. } if name == "missing")));
}

#[test]
fn type_mismatch_against_annotation() {
    let mut b = Builder::new();
    let ty = b.named("bool");
    let init = b.int(42);
    let decls = vec![b.global("x", Some(ty), Some(init))];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::TypeMismatch { .. }
    ));
}

#[test]
fn undeclared_identifier() {
    let mut b = Builder::new();
    let init = b.name("nowhere");
    let decls = vec![b.global("x", None, Some(init))];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::UndeclaredIdentifier { .. }
    ));
}

#[test]
fn duplicate_top_level_names() {
    let mut b = Builder::new();
    let one = b.int(1);
    let two = b.int(2);
    let decls = vec![b.global("x", None, Some(one)), b.global("x", None, Some(two))];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::Redeclaration { .. }
    ));
}

#[test]
fn cyclic_globals_are_diagnosed() {
    let mut b = Builder::new();
    let init_a = b.name("b");
    let init_b = b.name("a");
    let decls = vec![b.global("a", None, Some(init_a)), b.global("b", None, Some(init_b))];
    let (_, result) = resolve(&mut b, decls);
    assert!(result
        .unwrap_err()
        .iter()
        .any(|e| matches!(e.error, SemanticError::CyclicDependency { .. })));
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn arithmetic_requires_matching_kinds() {
    // A bool operand can never participate in arithmetic
    let mut b = Builder::new();
    let one = b.int(1);
    let t = b.boolean(true);
    let init = b.binary(BinaryOp::Add, one, t);
    let decls = vec![b.global("x", None, Some(init))];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::InvalidOperands { .. }
    ));
}

#[test]
fn named_values_of_mixed_kinds_do_not_convert() {
    // A named i64 constant next to an i32 runtime value is a kind mismatch;
    // only bare literals adapt
    let mut b = Builder::new();
    let i32_ty = b.named("i32");
    let one = b.int(1);
    let ten = b.int(10);
    let lhs = b.name("v");
    let rhs = b.name("c");
    let init = b.binary(BinaryOp::Add, lhs, rhs);
    let decls = vec![
        b.var("v", Some(i32_ty), Some(one)),
        b.global("c", None, Some(ten)),
        b.global("x", None, Some(init)),
    ];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::InvalidOperands { .. }
    ));
}

#[test]
fn literal_adapts_to_the_other_operands_kind() {
    let mut b = Builder::new();
    let i32_ty = b.named("i32");
    let one = b.int(1);
    let lhs = b.name("v");
    let rhs = b.int(2);
    let init = b.binary(BinaryOp::Add, lhs, rhs);
    let decls = vec![
        b.var("v", Some(i32_ty), Some(one)),
        b.global("x", None, Some(init)),
    ];
    let (typer, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
    let entity = module_binding(&typer, &mut b, "x");
    assert_eq!(typer.entities().get(entity).ty, Some(TypeId::I32));
}

#[test]
fn comparison_yields_bool_constant() {
    let mut b = Builder::new();
    let one = b.int(1);
    let two = b.int(2);
    let init = b.binary(BinaryOp::Lt, one, two);
    let decls = vec![b.global("x", None, Some(init))];
    let (typer, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
    let entity = module_binding(&typer, &mut b, "x");
    let data = typer.entities().get(entity);
    assert!(matches!(data.kind, EntityKind::Constant(Value::Bool(true))));
    assert_eq!(data.ty, Some(TypeId::BOOL));
}

#[test]
fn overflow_declines_to_fold() {
    // i8 arithmetic that overflows stays a runtime operand, not a bad constant
    let mut b = Builder::new();
    let ty_a = b.named("i8");
    let a_init = b.int(127);
    let ty_b = b.named("i8");
    let b_init = b.int(1);
    let lhs = b.name("a");
    let rhs = b.name("c");
    let init = b.binary(BinaryOp::Add, lhs, rhs);
    let decls = vec![
        b.global("a", Some(ty_a), Some(a_init)),
        b.global("c", Some(ty_b), Some(b_init)),
        b.global("x", None, Some(init)),
    ];
    let (typer, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
    let entity = module_binding(&typer, &mut b, "x");
    let data = typer.entities().get(entity);
    assert!(matches!(data.kind, EntityKind::Global(_)));
    assert_eq!(data.ty, Some(TypeId::I8));
}

#[test]
fn logical_and_folds_on_bools() {
    let mut b = Builder::new();
    let t = b.boolean(true);
    let f = b.boolean(false);
    let init = b.binary(BinaryOp::And, t, f);
    let decls = vec![b.global("x", None, Some(init))];
    let (typer, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
    let entity = module_binding(&typer, &mut b, "x");
    assert!(matches!(
        typer.entities().get(entity).kind,
        EntityKind::Constant(Value::Bool(false))
    ));
}

#[test]
fn negation_folds() {
    let mut b = Builder::new();
    let seven = b.int(7);
    let init = b.unary(UnaryOp::Neg, seven);
    let decls = vec![b.global("x", None, Some(init))];
    let (typer, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
    let entity = module_binding(&typer, &mut b, "x");
    assert!(matches!(
        typer.entities().get(entity).kind,
        EntityKind::Constant(Value::I64(-7))
    ));
}

#[test]
fn address_of_literal_is_rejected() {
    let mut b = Builder::new();
    let one = b.int(1);
    let init = b.unary(UnaryOp::AddrOf, one);
    let decls = vec![b.global("x", None, Some(init))];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::AddressOfLiteral { .. }
    ));
}

#[test]
fn deref_requires_pointer() {
    let mut b = Builder::new();
    let v_init = b.int(2);
    let v_decl = b.global("v", None, Some(v_init));
    let v = b.name("v");
    let init = b.unary(UnaryOp::Deref, v);
    let decls = vec![v_decl, b.global("x", None, Some(init))];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::DerefNonPointer { .. }
    ));
}

// ============================================================================
// Functions, calls and binding
// ============================================================================

#[test]
fn function_body_checks_against_return_type() {
    let mut b = Builder::new();
    let ret = b.named("i32");
    let body = b.boolean(true);
    let decls = vec![b.func("f", vec![], Some(ret), body)];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::TypeMismatch { .. }
    ));
}

#[test]
fn call_binds_positionally() {
    let mut b = Builder::new();
    let pa = b.param("a", "i64");
    let pb = b.param("c", "i64");
    let ret = b.named("i64");
    let lhs = b.name("a");
    let rhs = b.name("c");
    let body = b.binary(BinaryOp::Add, lhs, rhs);
    let callee = b.name("add");
    let a1 = b.int(1);
    let a2 = b.int(2);
    let args = vec![b.arg(a1), b.arg(a2)];
    let call = b.call(callee, args);
    let decls = vec![
        b.func("add", vec![pa, pb], Some(ret), body),
        b.global("x", None, Some(call)),
    ];
    let (typer, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
    let entity = module_binding(&typer, &mut b, "x");
    assert_eq!(typer.entities().get(entity).ty, Some(TypeId::I64));
}

#[test]
fn call_binds_by_name_in_any_order() {
    let mut b = Builder::new();
    let pa = b.param("a", "i64");
    let pb = b.param("c", "i64");
    let ret = b.named("i64");
    let body = b.name("a");
    let callee = b.name("f");
    let a1 = b.int(1);
    let a2 = b.int(2);
    let args = vec![b.named_arg("c", a1), b.named_arg("a", a2)];
    let call = b.call(callee, args);
    let decls = vec![
        b.func("f", vec![pa, pb], Some(ret), body),
        b.global("x", None, Some(call)),
    ];
    let (_, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
}

#[test]
fn rebinding_a_parameter_is_diagnosed() {
    let mut b = Builder::new();
    let pa = b.param("a", "i64");
    let ret = b.named("i64");
    let body = b.name("a");
    let callee = b.name("f");
    let a1 = b.int(1);
    let a2 = b.int(2);
    let args = vec![b.arg(a1), b.named_arg("a", a2)];
    let call = b.call(callee, args);
    let decls = vec![
        b.func("f", vec![pa], Some(ret), body),
        b.global("x", None, Some(call)),
    ];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::ParameterRebound { .. }
    ));
}

#[test]
fn default_fills_an_unbound_parameter() {
    let mut b = Builder::new();
    let pa = b.param("a", "i64");
    let dflt = b.int(10);
    let pb = b.param_default("c", "i64", dflt);
    let ret = b.named("i64");
    let body = b.name("a");
    let callee = b.name("f");
    let a1 = b.int(1);
    let args = vec![b.arg(a1)];
    let call = b.call(callee, args);
    let decls = vec![
        b.func("f", vec![pa, pb], Some(ret), body),
        b.global("x", None, Some(call)),
    ];
    let (_, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
}

#[test]
fn unbound_parameter_without_default_is_diagnosed() {
    let mut b = Builder::new();
    let pa = b.param("a", "i64");
    let pb = b.param("c", "i64");
    let ret = b.named("i64");
    let body = b.name("a");
    let callee = b.name("f");
    let a1 = b.int(1);
    let args = vec![b.arg(a1)];
    let call = b.call(callee, args);
    let decls = vec![
        b.func("f", vec![pa, pb], Some(ret), body),
        b.global("x", None, Some(call)),
    ];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::FieldNotInitialized { .. }
    ));
}

#[test]
fn excess_arguments_without_variadic() {
    let mut b = Builder::new();
    let pa = b.param("a", "i64");
    let ret = b.named("i64");
    let body = b.name("a");
    let callee = b.name("f");
    let a1 = b.int(1);
    let a2 = b.int(2);
    let args = vec![b.arg(a1), b.arg(a2)];
    let call = b.call(callee, args);
    let decls = vec![
        b.func("f", vec![pa], Some(ret), body),
        b.global("x", None, Some(call)),
    ];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::WrongArgumentCount { .. }
    ));
}

#[test]
fn typed_variadic_accepts_trailing_arguments() {
    let mut b = Builder::new();
    let pa = b.param("a", "i64");
    let rest = ParamDecl::Variadic {
        name: b.sym("rest"),
        ty: Some(b.named("i64")),
        span: Span::default(),
    };
    let ret = b.named("i64");
    let body = b.name("a");
    let callee = b.name("f");
    let a1 = b.int(1);
    let a2 = b.int(2);
    let a3 = b.int(3);
    let args = vec![b.arg(a1), b.arg(a2), b.arg(a3)];
    let call = b.call(callee, args);
    let decls = vec![
        b.func("f", vec![pa, rest], Some(ret), body),
        b.global("x", None, Some(call)),
    ];
    let (_, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
}

#[test]
fn typed_variadic_rejects_a_mismatched_trailing_argument() {
    let mut b = Builder::new();
    let pa = b.param("a", "i64");
    let rest = ParamDecl::Variadic {
        name: b.sym("rest"),
        ty: Some(b.named("i64")),
        span: Span::default(),
    };
    let ret = b.named("i64");
    let body = b.name("a");
    let callee = b.name("f");
    let a1 = b.int(1);
    let a2 = b.boolean(true);
    let args = vec![b.arg(a1), b.arg(a2)];
    let call = b.call(callee, args);
    let decls = vec![
        b.func("f", vec![pa, rest], Some(ret), body),
        b.global("x", None, Some(call)),
    ];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::TypeMismatch { .. }
    ));
}

#[test]
fn c_variadic_accepts_any_trailing_arguments() {
    let mut b = Builder::new();
    let pa = b.param("a", "i64");
    let rest = ParamDecl::CVariadic {
        span: Span::default(),
    };
    let ret = b.named("i64");
    let body = b.name("a");
    let callee = b.name("f");
    let a1 = b.int(1);
    let a2 = b.boolean(true);
    let a3 = b.float(2.5);
    let args = vec![b.arg(a1), b.arg(a2), b.arg(a3)];
    let call = b.call(callee, args);
    let bare_callee = b.name("f");
    let a4 = b.int(4);
    let bare_args = vec![b.arg(a4)];
    let bare = b.call(bare_callee, bare_args);
    let decls = vec![
        b.func("f", vec![pa, rest], Some(ret), body),
        b.global("x", None, Some(call)),
        b.global("y", None, Some(bare)),
    ];
    let (_, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
}

#[test]
fn variadic_may_not_reuse_a_parameter_name() {
    let mut b = Builder::new();
    let pa = b.param("a", "i64");
    let rest = ParamDecl::Variadic {
        name: b.sym("a"),
        ty: Some(b.named("i64")),
        span: Span::default(),
    };
    let ret = b.named("i64");
    let body = b.name("a");
    let decls = vec![b.func("f", vec![pa, rest], Some(ret), body)];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::Redeclaration { .. }
    ));
}

#[test]
fn variadic_must_be_last() {
    let mut b = Builder::new();
    let rest = ParamDecl::CVariadic {
        span: Span::default(),
    };
    let pa = b.param("a", "i64");
    let ret = b.named("i64");
    let body = b.name("a");
    let decls = vec![b.func("f", vec![rest, pa], Some(ret), body)];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::VariadicNotLast { .. }
    ));
}

#[test]
fn calling_a_non_function() {
    let mut b = Builder::new();
    let one = b.int(1);
    let callee = b.name("v");
    let call = b.call(callee, vec![]);
    let decls = vec![
        b.global("v", None, Some(one)),
        b.global("x", None, Some(call)),
    ];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::NotCallable { .. }
    ));
}

#[test]
fn untyped_parameter_is_diagnosed() {
    let mut b = Builder::new();
    let pa = ParamDecl::Named {
        name: b.sym("a"),
        ty: None,
        default: None,
        span: Span::default(),
    };
    let body = b.int(1);
    let decls = vec![b.func("f", vec![pa], None, body)];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::ParameterUntyped { .. }
    ));
}

#[test]
fn missing_body_is_diagnosed() {
    let mut b = Builder::new();
    let decls = vec![Decl::Function(FunctionDecl {
        name: b.sym("f"),
        params: vec![],
        return_type: None,
        body: None,
        is_foreign: false,
        public: false,
        span: Span::default(),
    })];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::MissingBody { .. }
    ));
}

#[test]
fn foreign_function_may_omit_body() {
    let mut b = Builder::new();
    let pa = b.param("a", "i32");
    let decls = vec![Decl::Function(FunctionDecl {
        name: b.sym("putchar"),
        params: vec![pa],
        return_type: Some(b.named("i32")),
        body: None,
        is_foreign: true,
        public: false,
        span: Span::default(),
    })];
    let (_, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
}

// ============================================================================
// Structs: members, layout, literals
// ============================================================================

/// The classic padded layout: u8 at 0, i32 at 4, f64 at 8, tail to 16.
#[test]
fn struct_layout_inserts_padding() {
    let mut b = Builder::new();
    let fa = b.field("a", true, "u8");
    let fb = b.field("c", true, "i32");
    let fc = b.field("d", true, "f64");
    let decls = vec![b.strukt("Mixed", vec![fa, fb, fc])];
    let (typer, result) = resolve(&mut b, decls);
    assert!(result.is_ok());

    let entity = module_binding(&typer, &mut b, "Mixed");
    let EntityKind::Type(def) = typer.entities().get(entity).kind else {
        panic!("expected a type entity");
    };
    let def = typer.defs().get(def);
    assert_eq!(def.size, 16);
    assert_eq!(def.align, 8);

    let offsets: Vec<(bool, usize)> = def
        .members
        .iter()
        .map(|&m| match &typer.entities().get(m).kind {
            EntityKind::Local(local) => (local.synthetic, local.offset.unwrap()),
            _ => panic!("expected member locals"),
        })
        .collect();
    // a@0, pad@1 (3 bytes), c@4, d@8
    assert_eq!(offsets, vec![(false, 0), (true, 1), (false, 4), (false, 8)]);
}

#[test]
fn struct_layout_pads_between_and_after_members() {
    // i32@0, u8@4, three pad bytes at 5..8, f64@8, size rounded to 16
    let mut b = Builder::new();
    let fa = b.field("a", true, "i32");
    let fb = b.field("c", true, "u8");
    let fc = b.field("d", true, "f64");
    let decls = vec![b.strukt("Mixed", vec![fa, fb, fc])];
    let (typer, result) = resolve(&mut b, decls);
    assert!(result.is_ok());

    let entity = module_binding(&typer, &mut b, "Mixed");
    let EntityKind::Type(def) = typer.entities().get(entity).kind else {
        panic!("expected a type entity");
    };
    let def = typer.defs().get(def);
    assert_eq!(def.size, 16);
    assert_eq!(def.align, 8);

    let offsets: Vec<(bool, usize)> = def
        .members
        .iter()
        .map(|&m| match &typer.entities().get(m).kind {
            EntityKind::Local(local) => (local.synthetic, local.offset.unwrap()),
            _ => panic!("expected member locals"),
        })
        .collect();
    assert_eq!(offsets, vec![(false, 0), (false, 4), (true, 5), (false, 8)]);
}

#[test]
fn struct_without_tail_padding() {
    let mut b = Builder::new();
    let fa = b.field("x", true, "i32");
    let fb = b.field("y", true, "i32");
    let decls = vec![b.strukt("Point", vec![fa, fb])];
    let (typer, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
    let entity = module_binding(&typer, &mut b, "Point");
    let EntityKind::Type(def) = typer.entities().get(entity).kind else {
        panic!("expected a type entity");
    };
    let def = typer.defs().get(def);
    assert_eq!((def.size, def.align), (8, 4));
    assert_eq!(def.members.len(), 2);
}

#[test]
fn struct_may_point_to_itself() {
    let mut b = Builder::new();
    let next = FieldDecl {
        name: b.sym("next"),
        public: true,
        ty: Some(TypeSpec::Pointer {
            base: Box::new(b.named("Node")),
            span: Span::default(),
        }),
        default: None,
        span: Span::default(),
    };
    let value = b.field("value", true, "i64");
    let decls = vec![b.strukt("Node", vec![next, value])];
    let (typer, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
    let entity = module_binding(&typer, &mut b, "Node");
    let EntityKind::Type(def) = typer.entities().get(entity).kind else {
        panic!("expected a type entity");
    };
    assert_eq!((typer.defs().get(def).size, typer.defs().get(def).align), (16, 8));
}

#[test]
fn struct_containing_itself_by_value_is_cyclic() {
    let mut b = Builder::new();
    let inner = b.field("inner", true, "Node");
    let decls = vec![b.strukt("Node", vec![inner])];
    let (_, result) = resolve(&mut b, decls);
    assert!(result
        .unwrap_err()
        .iter()
        .any(|e| matches!(e.error, SemanticError::CyclicDependency { .. })));
}

#[test]
fn struct_literal_produces_the_struct_type() {
    let mut b = Builder::new();
    let fa = b.field("x", true, "i32");
    let fb = b.field("y", true, "i32");
    let a1 = b.int(1);
    let a2 = b.int(2);
    let args = vec![b.named_arg("x", a1), b.named_arg("y", a2)];
    let lit = b.struct_lit("Point", args);
    let decls = vec![
        b.strukt("Point", vec![fa, fb]),
        b.global("p", None, Some(lit)),
    ];
    let (typer, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
    let entity = module_binding(&typer, &mut b, "p");
    let ty = typer.entities().get(entity).ty.unwrap();
    assert!(matches!(typer.types().get(ty), TypeKind::Struct(_)));
}

#[test]
fn struct_literal_missing_field() {
    let mut b = Builder::new();
    let fa = b.field("x", true, "i32");
    let fb = b.field("y", true, "i32");
    let a1 = b.int(1);
    let args = vec![b.named_arg("x", a1)];
    let lit = b.struct_lit("Point", args);
    let decls = vec![
        b.strukt("Point", vec![fa, fb]),
        b.global("p", None, Some(lit)),
    ];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::FieldNotInitialized { .. }
    ));
}

#[test]
fn struct_literal_unknown_field() {
    let mut b = Builder::new();
    let fa = b.field("x", true, "i32");
    let a1 = b.int(1);
    let a2 = b.int(2);
    let args = vec![b.named_arg("x", a1), b.named_arg("z", a2)];
    let lit = b.struct_lit("Point", args);
    let decls = vec![
        b.strukt("Point", vec![fa]),
        b.global("p", None, Some(lit)),
    ];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::UnknownMember { .. }
    ));
}

#[test]
fn padding_members_are_not_bindable() {
    // A literal cannot name the synthesized pad member
    let mut b = Builder::new();
    let fa = b.field("a", true, "u8");
    let fb = b.field("c", true, "i32");
    let a1 = b.int(1);
    let a2 = b.int(2);
    let a3 = b.int(0);
    let args = vec![
        b.named_arg("a", a1),
        b.named_arg("c", a2),
        b.named_arg("__pad1", a3),
    ];
    let lit = b.struct_lit("Mixed", args);
    let decls = vec![
        b.strukt("Mixed", vec![fa, fb]),
        b.global("p", None, Some(lit)),
    ];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::UnknownMember { .. }
    ));
}

#[test]
fn member_access_on_a_struct_value() {
    let mut b = Builder::new();
    let fa = b.field("x", true, "i32");
    let a1 = b.int(1);
    let args = vec![b.named_arg("x", a1)];
    let lit = b.struct_lit("Point", args);
    let p = b.name("p");
    let acc = b.access(p, "x");
    let decls = vec![
        b.strukt("Point", vec![fa]),
        b.var("p", None, Some(lit)),
        b.global("x0", None, Some(acc)),
    ];
    let (typer, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
    let entity = module_binding(&typer, &mut b, "x0");
    assert_eq!(typer.entities().get(entity).ty, Some(TypeId::I32));
}

#[test]
fn private_field_access_is_rejected() {
    let mut b = Builder::new();
    let fa = b.field("x", false, "i32");
    let a1 = b.int(1);
    let args = vec![b.named_arg("x", a1)];
    let lit = b.struct_lit("Point", args);
    let p = b.name("p");
    let acc = b.access(p, "x");
    let decls = vec![
        b.strukt("Point", vec![fa]),
        b.var("p", None, Some(lit)),
        b.global("x0", None, Some(acc)),
    ];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::PrivateField { .. }
    ));
}

#[test]
fn field_access_through_the_type_name() {
    let mut b = Builder::new();
    let fa = b.field("x", true, "i32");
    let base = b.name("Point");
    let acc = b.access(base, "x");
    let decls = vec![
        b.strukt("Point", vec![fa]),
        b.global("x0", None, Some(acc)),
    ];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::StaticFieldAccess { .. }
    ));
}

#[test]
fn member_access_on_a_non_struct() {
    let mut b = Builder::new();
    let one = b.int(1);
    let v = b.name("v");
    let acc = b.access(v, "x");
    let decls = vec![
        b.global("v", None, Some(one)),
        b.global("x", None, Some(acc)),
    ];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::AccessNonStruct { .. }
    ));
}

// ============================================================================
// Methods
// ============================================================================

#[test]
fn static_method_called_through_the_type() {
    let mut b = Builder::new();
    let fx = b.field("x", true, "i32");
    let fy = b.field("y", true, "i32");
    let ret = b.named("Point");
    let a1 = b.int(0);
    let a2 = b.int(0);
    let args = vec![b.named_arg("x", a1), b.named_arg("y", a2)];
    let body = b.struct_lit("Point", args);
    let origin = Decl::Implement(ImplementDecl {
        target: b.sym("Point"),
        functions: vec![FunctionDecl {
            name: b.sym("origin"),
            params: vec![],
            return_type: Some(ret),
            body: Some(body),
            is_foreign: false,
            public: true,
            span: Span::default(),
        }],
        span: Span::default(),
    });
    let recv = b.name("Point");
    let method = b.sym("origin");
    let call = b.expr(ExprKind::MethodCall(Box::new(MethodCallExpr {
        receiver: recv,
        method,
        method_span: Span::default(),
        args: vec![],
    })));
    let decls = vec![
        b.strukt("Point", vec![fx, fy]),
        origin,
        b.global("o", None, Some(call)),
    ];
    let (typer, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
    let entity = module_binding(&typer, &mut b, "o");
    let ty = typer.entities().get(entity).ty.unwrap();
    assert!(matches!(typer.types().get(ty), TypeKind::Struct(_)));
}

#[test]
fn instance_method_through_the_type_is_rejected() {
    let mut b = Builder::new();
    let fx = b.field("x", true, "i32");
    let ret = b.named("i32");
    let sv = b.expr(ExprKind::SelfValue);
    let body = b.access(sv, "x");
    let imp = Decl::Implement(ImplementDecl {
        target: b.sym("Point"),
        functions: vec![FunctionDecl {
            name: b.sym("get"),
            params: vec![ParamDecl::SelfParam {
                mutable: false,
                span: Span::default(),
            }],
            return_type: Some(ret),
            body: Some(body),
            is_foreign: false,
            public: true,
            span: Span::default(),
        }],
        span: Span::default(),
    });
    let recv = b.name("Point");
    let method = b.sym("get");
    let call = b.expr(ExprKind::MethodCall(Box::new(MethodCallExpr {
        receiver: recv,
        method,
        method_span: Span::default(),
        args: vec![],
    })));
    let decls = vec![
        b.strukt("Point", vec![fx]),
        imp,
        b.global("x", None, Some(call)),
    ];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::NotStaticMethod { .. }
    ));
}

#[test]
fn implement_block_without_a_target_is_undeclared() {
    let mut b = Builder::new();
    let ret = b.named("i32");
    let one = b.int(1);
    let imp = Decl::Implement(ImplementDecl {
        target: b.sym("Ghost"),
        functions: vec![FunctionDecl {
            name: b.sym("f"),
            params: vec![],
            return_type: Some(ret),
            body: Some(one),
            is_foreign: false,
            public: true,
            span: Span::default(),
        }],
        span: Span::default(),
    });
    let (_, result) = resolve(&mut b, vec![imp]);
    assert!(matches!(
        first_error(&result),
        SemanticError::UndeclaredIdentifier { .. }
    ));
}

#[test]
fn implement_block_on_a_sum_type_is_an_explicit_gap() {
    let mut b = Builder::new();
    let sum = Decl::Sum(SumDecl {
        name: b.sym("Shape"),
        variants: vec![VariantDecl {
            name: b.sym("Dot"),
            fields: vec![],
            span: Span::default(),
        }],
        generics: Vec::new(),
        span: Span::default(),
    });
    let ret = b.named("i32");
    let one = b.int(1);
    let imp = Decl::Implement(ImplementDecl {
        target: b.sym("Shape"),
        functions: vec![FunctionDecl {
            name: b.sym("f"),
            params: vec![],
            return_type: Some(ret),
            body: Some(one),
            is_foreign: false,
            public: true,
            span: Span::default(),
        }],
        span: Span::default(),
    });
    let (_, result) = resolve(&mut b, vec![sum, imp]);
    assert!(matches!(
        first_error(&result),
        SemanticError::NotImplemented { .. }
    ));
}

#[test]
fn self_parameter_must_come_first() {
    let mut b = Builder::new();
    let fx = b.field("x", true, "i32");
    let pa = b.param("a", "i32");
    let ret = b.named("i32");
    let body = b.name("a");
    let imp = Decl::Implement(ImplementDecl {
        target: b.sym("Point"),
        functions: vec![FunctionDecl {
            name: b.sym("get"),
            params: vec![
                pa,
                ParamDecl::SelfParam {
                    mutable: false,
                    span: Span::default(),
                },
            ],
            return_type: Some(ret),
            body: Some(body),
            is_foreign: false,
            public: true,
            span: Span::default(),
        }],
        span: Span::default(),
    });
    let decls = vec![b.strukt("Point", vec![fx]), imp];
    let (_, result) = resolve(&mut b, decls);
    assert!(result
        .unwrap_err()
        .iter()
        .any(|e| matches!(e.error, SemanticError::SelfNotFirst { .. })));
}

#[test]
fn self_outside_a_method() {
    let mut b = Builder::new();
    let body = b.expr(ExprKind::SelfValue);
    let decls = vec![b.func("f", vec![], None, body)];
    let (_, result) = resolve(&mut b, decls);
    assert!(result
        .unwrap_err()
        .iter()
        .any(|e| matches!(e.error, SemanticError::SelfOutsideMethod { .. })));
}

#[test]
fn value_receiver_dispatch_is_an_explicit_gap() {
    let mut b = Builder::new();
    let fx = b.field("x", true, "i32");
    let a1 = b.int(1);
    let args = vec![b.named_arg("x", a1)];
    let lit = b.struct_lit("Point", args);
    let recv = b.name("p");
    let method = b.sym("get");
    let call = b.expr(ExprKind::MethodCall(Box::new(MethodCallExpr {
        receiver: recv,
        method,
        method_span: Span::default(),
        args: vec![],
    })));
    let decls = vec![
        b.strukt("Point", vec![fx]),
        b.var("p", None, Some(lit)),
        b.global("x", None, Some(call)),
    ];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::NotImplemented { .. }
    ));
}

// ============================================================================
// Tuples
// ============================================================================

#[test]
fn tuple_access_by_index() {
    let mut b = Builder::new();
    let e1 = b.int(1);
    let e2 = b.boolean(true);
    let tup = b.expr(ExprKind::Tuple(vec![e1, e2]));
    let base = b.name("t");
    let acc = b.expr(ExprKind::TupleAccess(Box::new(TupleAccessExpr {
        base,
        index: 1,
        index_span: Span::default(),
    })));
    let decls = vec![
        b.var("t", None, Some(tup)),
        b.global("x", None, Some(acc)),
    ];
    let (typer, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
    let entity = module_binding(&typer, &mut b, "x");
    assert_eq!(typer.entities().get(entity).ty, Some(TypeId::BOOL));
}

#[test]
fn tuple_index_out_of_bounds() {
    let mut b = Builder::new();
    let e1 = b.int(1);
    let tup = b.expr(ExprKind::Tuple(vec![e1]));
    let base = b.name("t");
    let acc = b.expr(ExprKind::TupleAccess(Box::new(TupleAccessExpr {
        base,
        index: 3,
        index_span: Span::default(),
    })));
    let decls = vec![
        b.var("t", None, Some(tup)),
        b.global("x", None, Some(acc)),
    ];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::TupleIndexOutOfBounds { .. }
    ));
}

// ============================================================================
// Blocks and locals
// ============================================================================

#[test]
fn block_result_types_the_block() {
    let mut b = Builder::new();
    let one = b.int(1);
    let stmt = b.let_stmt("a", false, None, one);
    let a = b.name("a");
    let two = b.int(2);
    let result_expr = b.binary(BinaryOp::Add, a, two);
    let body = b.block(vec![stmt], Some(result_expr));
    let ret = b.named("i64");
    let decls = vec![b.func("f", vec![], Some(ret), body)];
    let (_, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
}

#[test]
fn empty_block_is_unit() {
    let mut b = Builder::new();
    let body = b.block(vec![], None);
    let decls = vec![b.func("f", vec![], None, body)];
    let (_, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
}

#[test]
fn locals_do_not_escape_their_block() {
    let mut b = Builder::new();
    let one = b.int(1);
    let stmt = b.let_stmt("a", false, None, one);
    let inner = b.block(vec![stmt], None);
    let a = b.name("a");
    let body = b.block(vec![Stmt::Expr(inner)], Some(a));
    let decls = vec![b.func("f", vec![], None, body)];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::UndeclaredIdentifier { .. }
    ));
}

#[test]
fn shadowing_in_the_same_block_is_rejected() {
    let mut b = Builder::new();
    let one = b.int(1);
    let two = b.int(2);
    let s1 = b.let_stmt("a", false, None, one);
    let s2 = b.let_stmt("a", false, None, two);
    let body = b.block(vec![s1, s2], None);
    let decls = vec![b.func("f", vec![], None, body)];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::Redeclaration { .. }
    ));
}

#[test]
fn inner_block_may_shadow_an_outer_local() {
    let mut b = Builder::new();
    let one = b.int(1);
    let t = b.boolean(true);
    let s1 = b.let_stmt("a", false, None, one);
    let s2 = b.let_stmt("a", false, None, t);
    let inner = b.block(vec![s2], None);
    let body = b.block(vec![s1, Stmt::Expr(inner)], None);
    let decls = vec![b.func("f", vec![], None, body)];
    let (_, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
}

#[test]
fn defer_statements_resolve_in_their_own_scope() {
    let mut b = Builder::new();
    let one = b.int(1);
    let s1 = b.let_stmt("a", false, None, one);
    let a = b.name("a");
    let body = b.block(vec![s1, Stmt::Defer(a)], None);
    let decls = vec![b.func("f", vec![], None, body)];
    let (_, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
}

// ============================================================================
// Aliases, sums, traits
// ============================================================================

#[test]
fn alias_resolves_to_its_target() {
    let mut b = Builder::new();
    let target = b.named("i32");
    let alias = Decl::Alias(AliasDecl {
        name: b.sym("Id"),
        ty: target,
        span: Span::default(),
    });
    let ann = b.named("Id");
    let init = b.int(1);
    let decls = vec![alias, b.global("x", Some(ann), Some(init))];
    let (typer, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
    let entity = module_binding(&typer, &mut b, "x");
    assert_eq!(typer.entities().get(entity).ty, Some(TypeId::I32));
}

#[test]
fn sum_member_access_is_an_explicit_gap() {
    let mut b = Builder::new();
    let sum = Decl::Sum(SumDecl {
        name: b.sym("Shape"),
        variants: vec![VariantDecl {
            name: b.sym("Dot"),
            fields: vec![],
            span: Span::default(),
        }],
        generics: Vec::new(),
        span: Span::default(),
    });
    let base = b.name("Shape");
    let acc = b.access(base, "Dot");
    let decls = vec![sum, b.global("x", None, Some(acc))];
    let (_, result) = resolve(&mut b, decls);
    assert!(matches!(
        first_error(&result),
        SemanticError::NotImplemented { .. }
    ));
}

#[test]
fn generic_struct_stays_a_shell() {
    let mut b = Builder::new();
    let fa = b.field("item", true, "i32");
    let decls = vec![Decl::Struct(StructDecl {
        name: b.sym("BoxOf"),
        members: vec![fa],
        generics: vec![b.sym("T")],
        span: Span::default(),
    })];
    let (typer, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
    let entity = module_binding(&typer, &mut b, "BoxOf");
    let ty = typer.entities().get(entity).ty.unwrap();
    assert!(matches!(typer.types().get(ty), TypeKind::PolyStruct(_)));
}

// ============================================================================
// Operand memoization
// ============================================================================

#[test]
fn operands_are_memoized_per_node() {
    let mut b = Builder::new();
    let one = b.int(1);
    let id = one.id;
    let decls = vec![b.global("x", None, Some(one))];
    let (typer, result) = resolve(&mut b, decls);
    assert!(result.is_ok());
    let op = typer.operand(id).unwrap();
    assert_eq!(op.ty, Some(TypeId::I64));
    assert!(op.is_const());
}
