use std::rc::Rc;

use inkwell::{context::Context, types::BasicTypeEnum};

use crate::{
    ast::types::Type,
    compile,
    errors::errors::CompileError,
    lexer::lexer::tokenize,
    parser::{lookups::Grammar, parser::Parser},
    CompileOptions, Position,
};

use super::{
    compiler::{compile_program, Compiler},
    jit::run_entry_point,
};

fn ir_for(source: &str) -> String {
    let context = Context::create();
    let compiled = compile(source, &CompileOptions::default(), &context).unwrap();
    compiled.print_ir()
}

#[test]
fn test_lower_function_with_parameters() {
    let ir = ir_for("fn add(a i32, b i32) -> i32 { ret a + b }");

    assert!(ir.contains("define i32 @add(i32 %0, i32 %1)"));
    assert!(ir.contains("%a = alloca i32"));
    assert!(ir.contains("%b = alloca i32"));
    assert!(ir.contains("store i32 %0, i32* %a"));
    assert!(ir.contains("add i32"));
    assert!(ir.contains("ret i32"));
}

#[test]
fn test_lower_arithmetic() {
    let ir = ir_for("fn f(a i32, b i32) -> i32 { ret a * b - a / b }");

    assert!(ir.contains("mul i32"));
    assert!(ir.contains("sdiv i32"));
    assert!(ir.contains("sub i32"));
}

#[test]
fn test_calls_lowered_left_to_right() {
    let ir = ir_for(
        "fn f() -> i32 { ret 1 }\n\
         fn g() -> i32 { ret 2 }\n\
         fn main() -> i32 { ret f() + g() }",
    );

    let f_call = ir.find("call i32 @f()").unwrap();
    let g_call = ir.find("call i32 @g()").unwrap();
    assert!(f_call < g_call);
}

#[test]
fn test_extern_declaration_and_string() {
    let ir = ir_for(
        "extern fn puts(s *i8) -> i32\n\
         fn main() -> i32 { puts(\"hi\") ret 0 }",
    );

    assert!(ir.contains("declare i32 @puts(i8*)"));
    assert!(ir.contains("c\"hi\\00\""));
    assert!(ir.contains("call i32 @puts("));
}

#[test]
fn test_variable_gets_slot() {
    let ir = ir_for("fn main() -> i32 { x := 5 y : i32 = x ret y }");

    assert!(ir.contains("%x = alloca i32"));
    assert!(ir.contains("store i32 5, i32* %x"));
    assert!(ir.contains("%y = alloca i32"));
    assert!(ir.contains("load i32, i32* %x"));
}

#[test]
fn test_void_function_returns_void_call() {
    let ir = ir_for("extern fn tick()\nfn f() { ret tick() }");

    assert!(ir.contains("define void @f()"));
    assert!(ir.contains("call void @tick()"));
    assert!(ir.contains("ret void"));
}

#[test]
fn test_missing_return_stops_before_lowering() {
    let context = Context::create();
    match compile("fn f() -> i32 { x := 1 }", &CompileOptions::default(), &context) {
        Err(CompileError::Diagnostics(errors)) => {
            assert_eq!(errors[0].get_error_name(), "MissingReturn")
        }
        Err(other) => panic!("expected diagnostics, got {:?}", other),
        Ok(_) => panic!("expected diagnostics"),
    };
}

#[test]
fn test_unterminated_block_fails_verification() {
    // Lowering a program that still carries diagnostics.
    let grammar = Grammar::new();
    let tokens = tokenize("fn f() -> i32 { x := 1 }", None).unwrap();
    let mut parser = Parser::new(tokens, Rc::new("shell".to_string()), &grammar);
    let program = parser.parse_program().unwrap();

    let context = Context::create();
    match compile_program(&program, "shell", &context) {
        Err(CompileError::Lowering(error)) => {
            assert_eq!(error.get_error_name(), "BackendError");
            assert!(error.get_tip().to_string().starts_with("LLVM rejected"));
        }
        Err(other) => panic!("expected a lowering error, got {:?}", other),
        Ok(_) => panic!("expected a lowering error"),
    };
}

#[test]
fn test_string_bytes_lowered_verbatim() {
    let ir = ir_for(
        "extern fn puts(s *i8) -> i32\n\
         fn main() -> i32 { puts(\"\\xff\") puts(\"a\\0b\") ret 0 }",
    );

    assert!(ir.contains("private unnamed_addr constant [2 x i8] c\"\\FF\\00\""));
    assert!(ir.contains("[4 x i8] c\"a\\00b\\00\""));
}

#[test]
fn test_unregistered_callee_is_lowering_error() {
    // Lowering a program that still carries diagnostics.
    let grammar = Grammar::new();
    let tokens = tokenize("fn main() -> i32 { ret missing() }", None).unwrap();
    let mut parser = Parser::new(tokens, Rc::new("shell".to_string()), &grammar);
    let program = parser.parse_program().unwrap();
    assert_eq!(parser.diagnostics().len(), 1);

    let context = Context::create();
    match compile_program(&program, "shell", &context) {
        Err(CompileError::Lowering(error)) => {
            assert_eq!(error.get_error_name(), "UnregisteredFunction");
            assert!(error.get_tip().to_string().contains("compiler bug"));
        }
        Err(other) => panic!("expected a lowering error, got {:?}", other),
        Ok(_) => panic!("expected a lowering error"),
    };
}

#[test]
fn test_convert_type() {
    let context = Context::create();
    let compiler = Compiler::new(&context, "types");
    let position = Position::null();

    let i32_type: BasicTypeEnum = context.i32_type().into();
    assert_eq!(compiler.convert_type(&Type::Int32, &position).unwrap(), i32_type);
    assert_eq!(
        compiler.convert_type(&Type::StringLiteral, &position).unwrap(),
        compiler.convert_type(&Type::Int8Pointer, &position).unwrap()
    );

    for unmappable in [
        Type::Void,
        Type::Unresolved,
        Type::UserDefined("Foo".to_string()),
        Type::function(vec![], Type::Int32),
    ] {
        let error = compiler.convert_type(&unmappable, &position).unwrap_err();
        assert_eq!(error.get_error_name(), "UnmappableType");
    }
}

#[test]
fn test_lookup_unbound_slot() {
    let context = Context::create();
    let compiler = Compiler::new(&context, "slots");

    let error = compiler.lookup_slot("x", &Position::null()).unwrap_err();
    assert_eq!(error.get_error_name(), "UnboundVariable");
}

#[test]
fn test_storage_scope_per_function() {
    let context = Context::create();
    let compiled = compile(
        "extern fn puts(s *i8) -> i32\n\
         fn f(a i32) -> i32 { ret a }\n\
         fn main() -> i32 { a := 1 ret f(a) }",
        &CompileOptions::default(),
        &context,
    )
    .unwrap();

    // One scope per defined function, and the walk ends back at the root.
    assert_eq!(compiled.storage.len(), 3);
    assert_eq!(compiled.current_scope, compiled.storage.root());
}

#[test]
fn test_module_named_after_file() {
    let context = Context::create();
    let options = CompileOptions {
        file_name: "named.tiny".to_string(),
        ..CompileOptions::default()
    };
    let compiled = compile("fn main() -> i32 { ret 0 }", &options, &context).unwrap();

    assert_eq!(compiled.module.get_name().to_str().unwrap(), "named.tiny");
}

#[test]
fn test_entry_point_signature_checked() {
    let context = Context::create();
    let compiled = compile(
        "fn main(a i32) -> i32 { ret a }",
        &CompileOptions::default(),
        &context,
    )
    .unwrap();

    let error = run_entry_point(&compiled, "main").unwrap_err();
    assert_eq!(error.get_error_name(), "BackendError");

    let error = run_entry_point(&compiled, "start").unwrap_err();
    assert_eq!(error.get_error_name(), "UnregisteredFunction");
}

#[test]
fn test_run_entry_point() {
    let context = Context::create();
    let compiled = compile(
        "fn main() -> i32 { ret 6 * 7 }",
        &CompileOptions::default(),
        &context,
    )
    .unwrap();

    assert_eq!(run_entry_point(&compiled, "main").unwrap(), 42);
}
