use super::*;
use crate::program::Options;

fn with_parser<T>(text: &str, f: impl FnOnce(&mut ParserContext, TokenIndex, &SourceManager) -> T) -> T {
    let source = SourceManager::from_source("test.c", text);
    let mut program = ProgramContext::new(Options::default());
    let stream = TokenStream::tokenize(&mut program, &source);
    assert!(!program.has_errors(), "unexpected lex errors for {:?}", text);
    let mut parser = ParserContext::new(&mut program, &stream);
    let end = parser.tokens.len();
    f(&mut parser, end, &source)
}

fn expect_tree(state: ParserState) -> Box<SyntaxTree> {
    match state {
        ParserState::Success(Some(tree)) => tree,
        ParserState::Success(None) => panic!("rule succeeded without a tree"),
        ParserState::Failure(errors) => panic!("rule failed: {:?}", errors),
    }
}

fn expect_errors(state: ParserState) -> Vec<ParserError> {
    match state {
        ParserState::Failure(errors) => errors,
        ParserState::Success(_) => panic!("rule unexpectedly succeeded"),
    }
}

#[test]
fn add_error_discards_partial_success() {
    let mut state = ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::Declaration))));
    add_error(&mut state, ParserError::new(ParserStatus::Error, 0, "boom"));

    let errors = expect_errors(state);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "boom");
}

#[test]
fn giveup_requires_every_entry_to_give_up() {
    let mut state = make_error(ParserStatus::GiveUp, 0, "nope");
    assert!(is_giveup(&state));

    add_error(&mut state, ParserError::new(ParserStatus::Error, 1, "hard"));
    assert!(!is_giveup(&state));

    let success = ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::Nothing))));
    assert!(!is_giveup(&success));
}

#[test]
fn giveup_to_expected_rewrites_and_keeps_hint() {
    with_parser("}", |parser, _end, _source| {
        let state = make_error(ParserStatus::GiveUp, 0, "a label");
        let errors = expect_errors(giveup_to_expected(parser, state, Some("a statement")));

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].status, ParserStatus::Error);
        assert_eq!(errors[0].message, "expected a statement");
        assert_eq!(errors[1].status, ParserStatus::ErrorNote);
        assert_eq!(errors[1].message, "a label instead of this '}'");
    });
}

#[test]
fn giveup_to_expected_without_what_uses_the_hint() {
    with_parser("x", |parser, _end, _source| {
        let state = make_error(ParserStatus::GiveUp, 0, "declaration");
        let errors = expect_errors(giveup_to_expected(parser, state, None));

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "expected declaration");
    });
}

#[test]
fn single_child_wrappers_dissolve_into_the_parent() {
    let mut state = ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::CompoundStatement))));

    let mut wrapper = SyntaxTree::with_type(NodeType::Declarator);
    wrapper.add_child(SyntaxTree::with_type(NodeType::Nothing));
    add_node(&mut state, wrapper);

    let tree = expect_tree(state);
    assert_eq!(tree.child_count(), 1);
    assert_eq!(tree.child(0).node_type(), NodeType::Nothing);
}

#[test]
fn list_nodes_survive_with_a_single_child() {
    let mut state = ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::CompoundStatement))));

    let mut list = SyntaxTree::with_type(NodeType::ParameterList);
    list.add_child(SyntaxTree::with_type(NodeType::Nothing));
    add_node(&mut state, list);

    let tree = expect_tree(state);
    assert_eq!(tree.child_count(), 1);
    assert_eq!(tree.child(0).node_type(), NodeType::ParameterList);
}

#[test]
fn annotated_nodes_are_never_elided() {
    let mut state = ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::CompoundStatement))));

    let mut wrapper = SyntaxTree::with_type(NodeType::Declarator);
    wrapper.add_child(SyntaxTree::with_type(NodeType::Nothing));
    wrapper.set_annotation(Annotation(7));
    add_node(&mut state, wrapper);

    let tree = expect_tree(state);
    assert_eq!(tree.child_count(), 1);
    assert_eq!(tree.child(0).node_type(), NodeType::Declarator);
    assert_eq!(tree.child(0).annotation(), Some(Annotation(7)));
}

#[test]
fn opt_returns_an_empty_leaf_without_consuming() {
    with_parser(";", |parser, end, _source| {
        let result = parser_opt(parser_identifier).parse(parser, 0, end);
        assert_eq!(result.next, 0);

        let tree = expect_tree(result.state);
        assert_eq!(tree.node_type(), NodeType::Nothing);
    });
}

#[test]
fn parens_reports_the_unmatched_open_token() {
    with_parser("(x;", |parser, end, _source| {
        let result = parser_parens(parser_expression, TokenKind::LParen, TokenKind::RParen).parse(parser, 0, end);
        let errors = expect_errors(result.state);

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].status, ParserStatus::Error);
        assert_eq!(errors[0].message, "expected ')'");
        assert_eq!(errors[1].status, ParserStatus::ErrorNote);
        assert_eq!(errors[1].message, "to match this '('");
        assert_eq!(errors[1].at, 0);
    });
}

#[test]
fn list_of_accepts_a_trailing_comma_before_closers() {
    with_parser("a, b, }", |parser, end, _source| {
        let result = parser_list_of(parser_identifier, true).parse(parser, 0, end);
        assert_eq!(result.next, 4);

        let tree = expect_tree(result.state);
        assert_eq!(tree.child_count(), 2);
        assert_eq!(tree.child(0).node_type(), NodeType::Identifier);
        assert_eq!(tree.child(1).node_type(), NodeType::Identifier);
    });
}

#[test]
fn left_binary_operators_fold_left() {
    with_parser("a - b - c", |parser, end, source| {
        let result = parser_expression(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(
            tree.dump(source),
            "additive expression(-):\n  additive expression(-):\n    identifier(a)\n    identifier(b)\n  identifier(c)\n"
        );
    });
}

#[test]
fn assignment_operators_fold_right() {
    with_parser("a = b = c", |parser, end, source| {
        let result = parser_expression(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(
            tree.dump(source),
            "assignment expression(=):\n  identifier(a)\n  assignment expression(=):\n    identifier(b)\n    identifier(c)\n"
        );
    });
}

#[test]
fn precedence_nests_tighter_operators_deeper() {
    with_parser("a + b * c", |parser, end, source| {
        let result = parser_expression(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(
            tree.dump(source),
            "additive expression(+):\n  identifier(a)\n  multiplicative expression(*):\n    identifier(b)\n    identifier(c)\n"
        );
    });
}

#[test]
fn comma_expressions_fold_at_the_lowest_level() {
    with_parser("a, b", |parser, end, source| {
        let result = parser_expression(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(tree.dump(source), "expression(,):\n  identifier(a)\n  identifier(b)\n");
    });
}

#[test]
fn conditional_expression_keeps_three_operands() {
    with_parser("a ? b : c", |parser, end, source| {
        let result = parser_expression(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(
            tree.dump(source),
            "conditional expression:\n  identifier(a)\n  identifier(b)\n  identifier(c)\n"
        );
    });
}

#[test]
fn conditional_without_colon_stops_with_an_error() {
    with_parser("a ? b", |parser, end, _source| {
        let result = parser_expression(parser, 0, end);
        let errors = expect_errors(result.state);

        assert!(errors.iter().any(|e| e.status == ParserStatus::Error && e.message == "expected ':'"));
        assert!(errors.iter().any(|e| e.status == ParserStatus::ErrorNote && e.message == "to match this '?'"));
    });
}

#[test]
fn postfix_operators_wrap_the_accumulated_expression_last() {
    with_parser("p->x", |parser, end, source| {
        let result = parser_expression(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(
            tree.dump(source),
            "pointer member access(->):\n  identifier(x)\n  identifier(p)\n"
        );
    });
}

#[test]
fn function_calls_carry_their_argument_list() {
    with_parser("f(a, b)", |parser, end, source| {
        let result = parser_expression(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(
            tree.dump(source),
            "function call(():\n  argument expression list:\n    identifier(a)\n    identifier(b)\n  identifier(f)\n"
        );
    });
}

#[test]
fn empty_argument_lists_leave_a_bare_call_node() {
    with_parser("f()", |parser, end, source| {
        let result = parser_expression(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(tree.dump(source), "function call(():\n  identifier(f)\n");
    });
}

#[test]
fn sizeof_accepts_a_parenthesized_type_name() {
    with_parser("sizeof (int)", |parser, end, source| {
        let result = parser_expression(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(
            tree.dump(source),
            "unary expression(sizeof):\n  specifier qualifier list:\n    type specifier(int)\n"
        );
    });
}

#[test]
fn sizeof_accepts_a_unary_expression() {
    with_parser("sizeof x", |parser, end, source| {
        let result = parser_expression(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(tree.dump(source), "unary expression(sizeof):\n  identifier(x)\n");
    });
}

#[test]
fn cast_expression_requires_no_brace_after_the_type() {
    with_parser("(int)x", |parser, end, source| {
        let result = parser_expression(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(
            tree.dump(source),
            "cast expression:\n  specifier qualifier list:\n    type specifier(int)\n  identifier(x)\n"
        );
    });
}

#[test]
fn parenthesized_type_with_braces_is_a_compound_literal() {
    with_parser("(int){1, 2, 3}", |parser, end, source| {
        let result = parser_expression(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(
            tree.dump(source),
            "compound literal:\n  specifier qualifier list:\n    type specifier(int)\n  initializer list:\n    integer constant(1)\n    integer constant(2)\n    integer constant(3)\n"
        );
    });
}

#[test]
fn adjacent_string_literals_form_a_list() {
    with_parser(r#""a" "b""#, |parser, end, source| {
        let result = parser_expression(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(
            tree.dump(source),
            "string literal list:\n  string literal(\"a\")\n  string literal(\"b\")\n"
        );
    });
}

#[test]
fn a_single_string_literal_stays_bare() {
    with_parser(r#""a""#, |parser, end, source| {
        let result = parser_expression(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(tree.dump(source), "string literal(\"a\")\n");
    });
}

#[test]
fn encoding_prefixes_hang_off_the_string_literal() {
    with_parser(r#"u8"x""#, |parser, end, source| {
        let result = parser_expression(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(tree.dump(source), "string literal(\"x\"):\n  encoding prefix(u8)\n");
    });
}

#[test]
fn dangling_else_binds_to_the_nearest_if() {
    with_parser("if (x) if (y) a; else b;", |parser, end, source| {
        let result = parser_statement(parser, 0, end);
        let tree = expect_tree(result.state);

        assert_eq!(tree.node_type(), NodeType::SelectionStatement);
        assert_eq!(tree.child_count(), 2);
        let inner = tree.child(1);
        assert_eq!(inner.node_type(), NodeType::SelectionStatement);
        assert_eq!(inner.child_count(), 3);

        assert_eq!(
            tree.dump(source),
            "selection statement(if):\n  identifier(x)\n  selection statement(if):\n    identifier(y)\n    identifier(a)\n    identifier(b)\n"
        );
    });
}

#[test]
fn while_with_unbalanced_parens_points_back_at_the_open() {
    with_parser("while (x { }", |parser, end, _source| {
        let result = parser_iteration_statement(parser, 0, end);
        let errors = expect_errors(result.state);

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].status, ParserStatus::Error);
        assert_eq!(errors[0].message, "expected ')'");
        assert_eq!(errors[0].at, 3);
        assert_eq!(errors[1].status, ParserStatus::ErrorNote);
        assert_eq!(errors[1].message, "to match this '('");
        assert_eq!(errors[1].at, 1);
    });
}

#[test]
fn for_statement_fills_omitted_clauses_with_empty_leaves() {
    with_parser("for (;;) ;", |parser, end, source| {
        let result = parser_statement(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(tree.child_count(), 4);
        assert_eq!(
            tree.dump(source),
            "iteration statement(for):\n  empty\n  empty\n  empty\n  empty(;)\n"
        );
    });
}

#[test]
fn do_while_requires_the_trailing_semicolon() {
    with_parser("do x; while (y);", |parser, end, source| {
        let result = parser_statement(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(tree.dump(source), "iteration statement(do):\n  identifier(x)\n  identifier(y)\n");
    });

    with_parser("do x; while (y)", |parser, end, _source| {
        let result = parser_statement(parser, 0, end);
        let errors = expect_errors(result.state);
        assert!(errors.iter().any(|e| e.message.contains("expected ';'")));
    });
}

#[test]
fn case_labels_carry_expression_and_statement() {
    with_parser("case 1: x;", |parser, end, source| {
        let result = parser_statement(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(
            tree.dump(source),
            "labeled statement(case):\n  integer constant(1)\n  identifier(x)\n"
        );
    });
}

#[test]
fn goto_takes_a_label() {
    with_parser("goto out;", |parser, end, source| {
        let result = parser_statement(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(tree.dump(source), "jump statement(goto):\n  identifier(out)\n");
    });
}

#[test]
fn plain_declaration_elides_the_declarator_chain() {
    with_parser("int x;", |parser, end, source| {
        let result = parser_declaration(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(
            tree.dump(source),
            "declaration:\n  declaration specifiers:\n    type specifier(int)\n  identifier(x)\n"
        );
    });
}

#[test]
fn initialized_declarators_keep_their_node() {
    with_parser("int x = 5;", |parser, end, source| {
        let result = parser_declaration(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(
            tree.dump(source),
            "declaration:\n  declaration specifiers:\n    type specifier(int)\n  init declarator:\n    identifier(x)\n    integer constant(5)\n"
        );
    });
}

#[test]
fn pointer_declarators_keep_the_declarator_node() {
    with_parser("int *p;", |parser, end, source| {
        let result = parser_declaration(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(
            tree.dump(source),
            "declaration:\n  declaration specifiers:\n    type specifier(int)\n  declarator:\n    pointer declarator(*)\n    identifier(p)\n"
        );
    });
}

#[test]
fn array_declarator_with_static_and_qualifiers() {
    with_parser("int a[static const 10];", |parser, end, source| {
        let result = parser_declaration(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(
            tree.dump(source),
            "declaration:\n  declaration specifiers:\n    type specifier(int)\n  direct declarator:\n    identifier(a)\n    array (with static) declarator([):\n      type qualifier list:\n        type qualifier(const)\n      integer constant(10)\n"
        );
    });
}

#[test]
fn struct_specifiers_nest_their_member_declarations() {
    with_parser("struct point { int x; int y; } p;", |parser, end, source| {
        let result = parser_declaration(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(
            tree.dump(source),
            "declaration:\n  declaration specifiers:\n    struct or union specifier(struct):\n      identifier(point)\n      struct declaration:\n        specifier qualifier list:\n          type specifier(int)\n        identifier(x)\n      struct declaration:\n        specifier qualifier list:\n          type specifier(int)\n        identifier(y)\n  identifier(p)\n"
        );
    });
}

#[test]
fn enums_allow_a_trailing_comma() {
    with_parser("enum color { RED, GREEN, };", |parser, end, source| {
        let result = parser_declaration(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(
            tree.dump(source),
            "declaration:\n  declaration specifiers:\n    enum specifier(enum):\n      identifier(color)\n      enumerator(RED)\n      enumerator(GREEN)\n"
        );
    });
}

#[test]
fn enumerators_can_carry_values() {
    with_parser("enum e { A = 1 };", |parser, end, source| {
        let result = parser_declaration(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(
            tree.dump(source),
            "declaration:\n  declaration specifiers:\n    enum specifier(enum):\n      identifier(e)\n      enumerator(A):\n        integer constant(1)\n"
        );
    });
}

#[test]
fn variadic_parameter_lists_get_a_marker_leaf() {
    with_parser("int f(int a, ...);", |parser, end, source| {
        let result = parser_declaration(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(
            tree.dump(source),
            "declaration:\n  declaration specifiers:\n    type specifier(int)\n  direct declarator:\n    identifier(f)\n    function declarator:\n      parameter list:\n        parameter declaration:\n          declaration specifiers:\n            type specifier(int)\n          identifier(a)\n        '...' (variadic parameter)(...)\n"
        );
    });
}

#[test]
fn declspec_takes_a_parenthesized_identifier() {
    with_parser("__declspec(dllexport) int x;", |parser, end, source| {
        let result = parser_declaration(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(
            tree.dump(source),
            "declaration:\n  declaration specifiers:\n    function specifier(__declspec):\n      identifier(dllexport)\n    type specifier(int)\n  identifier(x)\n"
        );
    });
}

#[test]
fn atomic_with_parens_is_a_type_specifier() {
    with_parser("_Atomic(int) x;", |parser, end, source| {
        let result = parser_declaration(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(
            tree.dump(source),
            "declaration:\n  declaration specifiers:\n    atomic type specifier(_Atomic):\n      specifier qualifier list:\n        type specifier(int)\n  identifier(x)\n"
        );
    });
}

#[test]
fn bare_atomic_is_a_type_qualifier() {
    with_parser("_Atomic int x;", |parser, end, source| {
        let result = parser_declaration(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(
            tree.dump(source),
            "declaration:\n  declaration specifiers:\n    type qualifier(_Atomic)\n    type specifier(int)\n  identifier(x)\n"
        );
    });
}

#[test]
fn designated_initializers_nest_under_their_designation() {
    with_parser("int a[2] = { [0] = 1 };", |parser, end, source| {
        let result = parser_declaration(parser, 0, end);
        let tree = expect_tree(result.state);
        assert_eq!(
            tree.dump(source),
            "declaration:\n  declaration specifiers:\n    type specifier(int)\n  init declarator:\n    direct declarator:\n      identifier(a)\n      array declarator([):\n        integer constant(2)\n    initializer list:\n      designation:\n        integer constant(0)\n        integer constant(1)\n"
        );
    });
}

#[test]
fn missing_semicolon_is_reported_at_the_following_token() {
    with_parser("int x", |parser, end, _source| {
        let result = parser_declaration(parser, 0, end);
        let errors = expect_errors(result.state);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "expected ';' before 'end of file'");
    });
}
