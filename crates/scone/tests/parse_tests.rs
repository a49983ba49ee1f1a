use scone::parser::SyntaxTree;
use scone::program::{Options, ProgramContext, Severity};
use scone::scanner::TokenStream;
use scone::source::SourceManager;

fn parse_dump(text: &str) -> String {
    let source = SourceManager::from_source("test.c", text);
    let mut program = ProgramContext::new(Options::default());
    let stream = TokenStream::tokenize(&mut program, &source);
    let tree = SyntaxTree::parse(&mut program, &stream).unwrap_or_else(|| {
        let mut out = Vec::new();
        program.write_reports(&mut out).unwrap();
        panic!("parse failed:\n{}", String::from_utf8_lossy(&out));
    });
    assert!(!program.has_errors());
    tree.dump(&source)
}

fn parse_diagnostics(text: &str, opts: Options) -> (bool, Vec<(Severity, String)>) {
    let source = SourceManager::from_source("test.c", text);
    let mut program = ProgramContext::new(opts);
    let stream = TokenStream::tokenize(&mut program, &source);
    let tree = SyntaxTree::parse(&mut program, &stream);
    let diagnostics = program
        .diagnostics()
        .iter()
        .map(|d| (d.severity, d.message.clone()))
        .collect();
    (tree.is_some(), diagnostics)
}

#[test]
fn empty_translation_unit() {
    assert_eq!(parse_dump(""), "compilation unit\n");
}

#[test]
fn simple_declaration() {
    assert_eq!(
        parse_dump("int x;"),
        "\
compilation unit:
  declaration:
    declaration specifiers:
      type specifier(int)
    identifier(x)
"
    );
}

#[test]
fn function_definition_with_parameters_and_body() {
    assert_eq!(
        parse_dump("int f(int a, int b) { return a + b; }"),
        "\
compilation unit:
  function definition:
    declaration specifiers:
      type specifier(int)
    direct declarator:
      identifier(f)
      function declarator:
        parameter list:
          parameter declaration:
            declaration specifiers:
              type specifier(int)
            identifier(a)
          parameter declaration:
            declaration specifiers:
              type specifier(int)
            identifier(b)
    compound statement({):
      jump statement(return):
        additive expression(+):
          identifier(a)
          identifier(b)
"
    );
}

#[test]
fn array_declarator_with_static_qualifiers() {
    assert_eq!(
        parse_dump("int a[static const 10];"),
        "\
compilation unit:
  declaration:
    declaration specifiers:
      type specifier(int)
    direct declarator:
      identifier(a)
      array (with static) declarator([):
        type qualifier list:
          type qualifier(const)
        integer constant(10)
"
    );
}

#[test]
fn compound_literal_in_expression_context() {
    assert_eq!(
        parse_dump("int f() { (int){1, 2, 3}; }"),
        "\
compilation unit:
  function definition:
    declaration specifiers:
      type specifier(int)
    direct declarator:
      identifier(f)
      function declarator:
        empty
    compound statement({):
      compound literal:
        specifier qualifier list:
          type specifier(int)
        initializer list:
          integer constant(1)
          integer constant(2)
          integer constant(3)
"
    );
}

#[test]
fn dangling_else_binds_to_inner_if() {
    assert_eq!(
        parse_dump("int main() { if (x) if (y) a; else b; }"),
        "\
compilation unit:
  function definition:
    declaration specifiers:
      type specifier(int)
    direct declarator:
      identifier(main)
      function declarator:
        empty
    compound statement({):
      selection statement(if):
        identifier(x)
        selection statement(if):
          identifier(y)
          identifier(a)
          identifier(b)
"
    );
}

#[test]
fn static_assert_declaration_at_top_level() {
    assert_eq!(
        parse_dump("_Static_assert(1, \"msg\");"),
        "\
compilation unit:
  static assert declaration:
    integer constant(1)
    string literal(\"msg\")
"
    );
}

#[test]
fn stray_semicolons_between_external_declarations_are_tolerated() {
    assert_eq!(
        parse_dump("int x;;; int y;"),
        "\
compilation unit:
  declaration:
    declaration specifiers:
      type specifier(int)
    identifier(x)
  declaration:
    declaration specifiers:
      type specifier(int)
    identifier(y)
"
    );
}

#[test]
fn kandr_declaration_list_lands_after_the_body() {
    assert_eq!(
        parse_dump("int f() int a; int b; { return a; }"),
        "\
compilation unit:
  function definition:
    declaration specifiers:
      type specifier(int)
    direct declarator:
      identifier(f)
      function declarator:
        empty
    compound statement({):
      jump statement(return):
        identifier(a)
    declaration list:
      declaration:
        declaration specifiers:
          type specifier(int)
        identifier(a)
      declaration:
        declaration specifiers:
          type specifier(int)
        identifier(b)
"
    );
}

#[test]
fn missing_semicolon_at_eof_yields_exactly_one_error() {
    let (parsed, diagnostics) = parse_diagnostics("int x", Options::default());
    assert!(!parsed);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].0, Severity::Error);
    assert!(diagnostics[0].1.contains("expected ';'"));
}

#[test]
fn unmatched_paren_in_while_notes_the_open_paren() {
    let (parsed, diagnostics) = parse_diagnostics("int f() { while (x { } }", Options::default());
    assert!(!parsed);
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics[0].0, Severity::Error);
    assert_eq!(diagnostics[0].1, "expected ')'");
    assert_eq!(diagnostics[1].0, Severity::Note);
    assert_eq!(diagnostics[1].1, "to match this '('");
}

#[test]
fn missing_semicolon_after_struct_body_is_reported() {
    let (parsed, diagnostics) = parse_diagnostics("struct A { int x; } int y;", Options::default());
    assert!(!parsed);
    assert!(diagnostics
        .iter()
        .any(|(severity, message)| *severity == Severity::Error
            && message == "missing ';' after struct declaration"));
}

#[test]
fn empty_statements_are_pedantic_diagnostics() {
    let (parsed, diagnostics) = parse_diagnostics(
        "int f() { ; }",
        Options { pedantic: true, pedantic_errors: false },
    );
    assert!(parsed);
    assert!(diagnostics
        .iter()
        .any(|(severity, message)| *severity == Severity::Pedantic && message == "empty statement"));
}

#[test]
fn empty_statements_are_silent_by_default() {
    let (parsed, diagnostics) = parse_diagnostics("int f() { ; }", Options::default());
    assert!(parsed);
    assert!(diagnostics.is_empty());
}

#[test]
fn typedef_names_are_not_recognized_as_type_specifiers() {
    // typedef lookup is disabled, so a typedef'd name cannot start a
    // declaration; the parser reports the unit as malformed instead
    let (parsed, diagnostics) = parse_diagnostics("typedef int myint; myint x;", Options::default());
    assert!(!parsed);
    assert!(diagnostics
        .iter()
        .any(|(_, message)| message == "expected external declaration"));
}

#[test]
fn errors_in_one_declaration_do_not_hide_the_next() {
    let (parsed, diagnostics) = parse_diagnostics("int f() { while (x { } }\nint g() { return 0; }", Options::default());
    assert!(!parsed);
    // the while error is reported, and g parsed cleanly afterwards: nothing
    // beyond the one error/note pair shows up
    assert!(diagnostics.iter().any(|(_, message)| message == "expected ')'"));
    assert_eq!(diagnostics.len(), 2);
}

#[test]
fn diagnostics_carry_resolved_positions() {
    let source = SourceManager::from_source("main.c", "int x");
    let mut program = ProgramContext::new(Options::default());
    let stream = TokenStream::tokenize(&mut program, &source);
    let tree = SyntaxTree::parse(&mut program, &stream);
    assert!(tree.is_none());

    let mut out = Vec::new();
    program.write_reports(&mut out).unwrap();
    let report = String::from_utf8(out).unwrap();
    assert_eq!(report, "main.c:1:6: error: expected ';' before 'end of file'\n");
}
