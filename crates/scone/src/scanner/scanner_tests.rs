use super::*;
use crate::program::Options;

fn scan_kinds(text: &str) -> Vec<TokenKind> {
    let source = SourceManager::from_source("test.c", text);
    let mut program = ProgramContext::new(Options::default());
    let stream = TokenStream::tokenize(&mut program, &source);
    assert!(!program.has_errors(), "unexpected lex errors for {:?}", text);
    stream.tokens().iter().map(|t| t.kind).collect()
}

fn scan_with_errors(text: &str) -> (Vec<TokenKind>, usize) {
    let source = SourceManager::from_source("test.c", text);
    let mut program = ProgramContext::new(Options::default());
    let stream = TokenStream::tokenize(&mut program, &source);
    (stream.tokens().iter().map(|t| t.kind).collect(), program.error_count())
}

#[test]
fn empty_input_is_just_eof() {
    assert_eq!(scan_kinds(""), vec![TokenKind::Eof]);
    assert_eq!(scan_kinds("  \n\t // trailing comment"), vec![TokenKind::Eof]);
}

#[test]
fn keywords_and_identifiers() {
    assert_eq!(
        scan_kinds("int x _Bool _Static_assert __declspec intx"),
        vec![
            TokenKind::Int,
            TokenKind::Identifier,
            TokenKind::Bool,
            TokenKind::StaticAssert,
            TokenKind::Declspec,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn maximal_munch_punctuators() {
    assert_eq!(
        scan_kinds(">>= >> >= > <<= ... . -> -- - ++ += |= || |"),
        vec![
            TokenKind::RShiftAssign,
            TokenKind::RShift,
            TokenKind::Geq,
            TokenKind::Gt,
            TokenKind::LShiftAssign,
            TokenKind::Ellipsis,
            TokenKind::Dot,
            TokenKind::Arrow,
            TokenKind::Decrement,
            TokenKind::Minus,
            TokenKind::Increment,
            TokenKind::AddAssign,
            TokenKind::OrAssign,
            TokenKind::Or,
            TokenKind::BitOr,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn integer_constant_classes() {
    assert_eq!(
        scan_kinds("0 7 012 0x1F 0xabcul 42u 08"),
        vec![
            TokenKind::IntegerConstant,
            TokenKind::IntegerConstant,
            TokenKind::OctIntegerConstant,
            TokenKind::HexIntegerConstant,
            TokenKind::HexIntegerConstant,
            TokenKind::IntegerConstant,
            TokenKind::IntegerConstant,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn float_constants() {
    assert_eq!(
        scan_kinds("1.5 .5 1e10 2.0f 0x1.8p3"),
        vec![
            TokenKind::FloatConstant,
            TokenKind::FloatConstant,
            TokenKind::FloatConstant,
            TokenKind::FloatConstant,
            TokenKind::FloatConstant,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn string_and_char_literals() {
    assert_eq!(
        scan_kinds(r#" "hi" 'a' '\n' "esc\"aped" "#),
        vec![
            TokenKind::StringConstant,
            TokenKind::CharConstant,
            TokenKind::CharConstant,
            TokenKind::StringConstant,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn encoding_prefix_splits_only_when_glued() {
    assert_eq!(
        scan_kinds(r#" u8"x" "#),
        vec![TokenKind::EncodingPrefix, TokenKind::StringConstant, TokenKind::Eof]
    );
    assert_eq!(
        scan_kinds(r#" L"x" "#),
        vec![TokenKind::EncodingPrefix, TokenKind::StringConstant, TokenKind::Eof]
    );
    // with a space in between, u8 is an ordinary identifier
    assert_eq!(
        scan_kinds(r#" u8 "x" "#),
        vec![TokenKind::Identifier, TokenKind::StringConstant, TokenKind::Eof]
    );
    // prefixed character constants stay one token
    assert_eq!(scan_kinds(" L'a' "), vec![TokenKind::CharConstant, TokenKind::Eof]);
}

#[test]
fn token_text_roundtrips_through_ranges() {
    let source = SourceManager::from_source("test.c", "int foo = 0x1F;");
    let mut program = ProgramContext::new(Options::default());
    let stream = TokenStream::tokenize(&mut program, &source);
    let texts: Vec<&str> = stream.tokens().iter().map(|t| source.text(t.range)).collect();
    assert_eq!(texts, vec!["int", "foo", "=", "0x1F", ";", ""]);
}

#[test]
fn comments_are_skipped() {
    assert_eq!(
        scan_kinds("a /* b */ c // d\n e"),
        vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]
    );
}

#[test]
fn unterminated_literals_are_reported() {
    let (kinds, errors) = scan_with_errors("\"abc");
    assert_eq!(errors, 1);
    assert_eq!(kinds, vec![TokenKind::StringConstant, TokenKind::Eof]);

    let (_, errors) = scan_with_errors("/* never closed");
    assert_eq!(errors, 1);

    let (_, errors) = scan_with_errors("'x");
    assert_eq!(errors, 1);
}

#[test]
fn stray_characters_are_reported_and_skipped() {
    let (kinds, errors) = scan_with_errors("a @ b");
    assert_eq!(errors, 1);
    assert_eq!(kinds, vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]);
}
