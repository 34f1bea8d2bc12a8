use std::rc::Rc;

use crate::{
    ast::types::Type,
    errors::errors::Error,
    lexer::lexer::tokenize,
    parser::{lookups::Grammar, parser::Parser},
};

fn diagnostics_for(source: &str) -> Vec<Error> {
    let grammar = Grammar::new();
    let tokens = tokenize(source, Some("check.tiny".to_string())).unwrap();
    let mut parser = Parser::new(tokens, Rc::new("check.tiny".to_string()), &grammar);
    parser.parse_program().unwrap();
    parser.diagnostics().to_vec()
}

fn names(source: &str) -> Vec<String> {
    diagnostics_for(source)
        .iter()
        .map(|error| error.get_error_name().to_string())
        .collect()
}

const PRELUDE: &str = "extern fn puts(s *i8) -> i32\nextern fn tick()\n\
                       fn add(a i32, b i32) -> i32 { ret a + b }\n";

#[test]
fn test_well_typed_program_has_no_diagnostics() {
    let source = format!(
        "{}fn main() -> i32 {{ s := \"hi\" puts(s) puts(\"direct\") tick() ret add(1, 2) }}",
        PRELUDE
    );
    assert!(names(&source).is_empty());
}

#[test]
fn test_argument_count() {
    let source = format!(
        "{}fn main() -> i32 {{ add(1) ret add(1, 2, 3) }}",
        PRELUDE
    );
    assert_eq!(names(&source), vec!["MissingArguments", "UnexpectedArguments"]);
}

#[test]
fn test_extra_argument_position() {
    let diagnostics = diagnostics_for("fn one(a i32) -> i32 { ret one(1, 22) }");

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].get_position().column, 35);
}

#[test]
fn test_argument_type() {
    let source = format!("{}fn main() -> i32 {{ ret puts(5) }}", PRELUDE);
    let diagnostics = diagnostics_for(&source);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].get_error_name(), "ArgumentTypeMatchError");
    assert_eq!(
        diagnostics[0].get_tip().to_string(),
        "Expected argument type `*i8`, received `i32`"
    );
}

#[test]
fn test_calling_a_variable() {
    assert_eq!(
        names("fn main() -> i32 { x := 1 ret x() }"),
        vec!["NotAFunction"]
    );
}

#[test]
fn test_return_type_mismatch() {
    assert_eq!(
        names("fn main() -> i32 { ret \"text\" }"),
        vec!["TypeMatchError"]
    );
    assert_eq!(names("extern fn f()\nfn g() { ret 1 }"), vec!["TypeMatchError"]);
}

#[test]
fn test_explicit_annotation_mismatch() {
    assert_eq!(
        names("fn main() -> i32 { p : *i8 = 5 ret 0 }"),
        vec!["TypeMatchError"]
    );
    assert!(names("fn main() -> i32 { p : *i8 = \"ok\" ret 0 }").is_empty());
}

#[test]
fn test_void_variable() {
    let source = format!("{}fn main() -> i32 {{ x := tick() ret 0 }}", PRELUDE);
    assert_eq!(names(&source), vec!["InvalidDeclarationType"]);
}

#[test]
fn test_function_as_variable() {
    let source = format!("{}fn main() -> i32 {{ f := add ret 0 }}", PRELUDE);
    assert_eq!(names(&source), vec!["InvalidDeclarationType"]);
}

#[test]
fn test_operand_types() {
    assert_eq!(
        names("fn main() -> i32 { s := \"a\" ret s + 1 }"),
        vec!["UnsupportedOperand", "TypeMatchError"]
    );
    assert_eq!(
        names("fn f(a i8, b i32) -> i32 { ret b + a }"),
        vec!["TypeMatchError"]
    );
}

#[test]
fn test_binary_takes_left_type() {
    let grammar = Grammar::new();
    let tokens = tokenize("fn f(a i8, b i8) -> i8 { ret a * b }", None).unwrap();
    let mut parser = Parser::new(tokens, Rc::new("shell".to_string()), &grammar);
    let program = parser.parse_program().unwrap();

    assert!(parser.diagnostics().is_empty());
    assert_eq!(program.function("f").unwrap().body[0].get_type(), &Type::Int8);
}

#[test]
fn test_unresolved_operands_are_reported_once() {
    assert_eq!(
        names("fn main() -> i32 { ret missing + 1 }"),
        vec!["VariableNotDeclared"]
    );
}

#[test]
fn test_unknown_types() {
    assert_eq!(
        names("fn f(a Foo, b *Bar) -> i32 { ret 0 }"),
        vec!["UnknownType", "UnknownType"]
    );
}

#[test]
fn test_duplicate_function() {
    let diagnostics = diagnostics_for("fn f() -> i32 { ret 1 }\nfn f() -> i32 { ret 2 }");

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].get_error_name(), "FunctionAlreadyDeclared");
    assert_eq!(diagnostics[0].get_position().line, 2);
}
