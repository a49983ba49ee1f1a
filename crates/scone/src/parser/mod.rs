//! Recursive descent parser for C17 translation units.
//!
//! Every grammar rule shares one shape: it takes the parser context plus a
//! `[begin, end)` window into the token stream and returns how far it got
//! together with either a subtree or a list of errors. Rules never bail out
//! through `Result`; the `ParserState` algebra carries both outcomes so a
//! parent can keep collecting siblings after a child failed.

mod ast;
#[cfg(test)]
mod parser_tests;

pub use self::ast::{Annotation, NodeType, SyntaxTree};

use crate::program::{ProgramContext, TokenDebug};
use crate::scanner::{Token, TokenKind, TokenStream};
use crate::source::SourceManager;

/// Index into the token slice; `end` is one past the last token.
type TokenIndex = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserStatus {
    /// The rule committed and then hit something wrong; must reach the user.
    Error,
    /// Context attached to the most recent `Error`.
    ErrorNote,
    /// The rule's first tokens did not match; an alternation may silently
    /// try the next alternative.
    GiveUp,
}

#[derive(Debug, Clone)]
struct ParserError {
    status: ParserStatus,
    at: TokenIndex,
    message: String,
}

impl ParserError {
    fn new(status: ParserStatus, at: TokenIndex, message: impl Into<String>) -> ParserError {
        ParserError {
            status,
            at,
            message: message.into(),
        }
    }
}

/// Either a (possibly still empty) subtree or the errors explaining why
/// there is none. `Success` never coexists with errors.
enum ParserState {
    Success(Option<Box<SyntaxTree>>),
    Failure(Vec<ParserError>),
}

impl ParserState {
    fn is_success(&self) -> bool {
        matches!(self, ParserState::Success(_))
    }
}

/// What every rule hands back: the first unconsumed token plus its state.
struct ParserResult {
    next: TokenIndex,
    state: ParserState,
}

impl ParserResult {
    fn new(next: TokenIndex, state: ParserState) -> ParserResult {
        ParserResult { next, state }
    }
}

fn make_error(status: ParserStatus, at: TokenIndex, message: impl Into<String>) -> ParserState {
    ParserState::Failure(vec![ParserError::new(status, at, message)])
}

fn add_error(state: &mut ParserState, error: ParserError) {
    match state {
        ParserState::Success(_) => *state = ParserState::Failure(vec![error]),
        ParserState::Failure(errors) => errors.push(error),
    }
}

/// Checks whether `state` failed without consuming anything meaningful,
/// i.e. every recorded error is a `GiveUp`.
fn is_giveup(state: &ParserState) -> bool {
    match state {
        ParserState::Failure(errors) => errors.iter().all(|e| e.status == ParserStatus::GiveUp),
        ParserState::Success(_) => false,
    }
}

/// Checks if `node` is a candidate for elision when added to a parent.
fn should_elide(node: &SyntaxTree) -> bool {
    // internal accumulators always dissolve
    if node.node_type() == NodeType::None {
        return true;
    }

    // nodes with annotations must stay addressable
    if node.has_annotation() {
        return false;
    }

    // list-like and structural nodes carry meaning through their shape even
    // with a single child
    match node.node_type() {
        NodeType::GenericAssocList
        | NodeType::ArgumentExpressionList
        | NodeType::Declaration
        | NodeType::DeclarationSpecifiers
        | NodeType::InitDeclaratorList
        | NodeType::StructDeclarationList
        | NodeType::SpecifierQualifierList
        | NodeType::StructDeclaratorList
        | NodeType::EnumeratorList
        | NodeType::FunctionSpecifier
        | NodeType::AlignmentSpecifier
        | NodeType::TypeQualifierList
        | NodeType::ParameterTypeList
        | NodeType::ParameterList
        | NodeType::IdentifierList
        | NodeType::InitializerList
        | NodeType::DesignatorList
        | NodeType::CompilationUnit
        | NodeType::TranslationUnit
        | NodeType::FunctionDeclarator => return false,
        _ => {}
    }

    !node.has_text() && node.child_count() == 1
}

/// Adds `node` to the state's tree if the state is a `Success`: the first
/// node becomes the root, elision candidates dissolve into the parent, and
/// everything else is appended as a child.
fn add_node(state: &mut ParserState, node: SyntaxTree) {
    if let ParserState::Success(tree) = state {
        match tree {
            None => *tree = Some(Box::new(node)),
            Some(parent) => {
                if should_elide(&node) {
                    parent.take_children(node);
                } else {
                    parent.add_child(node);
                }
            }
        }
    }
}

/// Accumulates one state into another: a successful child contributes its
/// subtree, a failed one contributes its errors (discarding any partial
/// tree the parent had built).
fn add_state(state: &mut ParserState, other: ParserState) {
    match other {
        ParserState::Success(Some(tree)) => add_node(state, *tree),
        ParserState::Success(None) => unreachable!("cannot accumulate a success without a tree"),
        ParserState::Failure(errors) => {
            for error in errors {
                add_error(state, error);
            }
        }
    }
}

/// Commits to an alternative: every `GiveUp` becomes a user-visible
/// "expected ..." error. With `what` supplied the message is rewritten and
/// the rule's own hint is kept as a note pointing at the offending token;
/// without it the hint itself becomes the expectation.
fn giveup_to_expected(parser: &ParserContext, state: ParserState, what: Option<&str>) -> ParserState {
    let errors = match state {
        ParserState::Failure(errors) => errors,
        success => return success,
    };

    let mut new_state = ParserState::Success(None);
    for error in errors {
        if error.status != ParserStatus::GiveUp {
            add_error(&mut new_state, error);
            continue;
        }
        match what {
            Some(what) => {
                add_error(
                    &mut new_state,
                    ParserError::new(ParserStatus::Error, error.at, format!("expected {}", what)),
                );
                if !error.message.is_empty() && error.at < parser.tokens.len() {
                    add_error(
                        &mut new_state,
                        ParserError::new(
                            ParserStatus::ErrorNote,
                            error.at,
                            format!("{} instead of this '{}'", error.message, parser.kind(error.at)),
                        ),
                    );
                }
            }
            None => {
                add_error(
                    &mut new_state,
                    ParserError::new(ParserStatus::Error, error.at, format!("expected {}", error.message)),
                );
            }
        }
    }

    new_state
}

/// Shared context threaded through every rule. The only piece of state
/// rules mutate is `is_inside_specifiers`, saved and restored around
/// `parser_type_specifier`.
pub(crate) struct ParserContext<'a> {
    program: &'a mut ProgramContext,
    source: &'a SourceManager,
    tokens: &'a [Token],
    is_inside_specifiers: bool,
}

impl<'a> ParserContext<'a> {
    fn new(program: &'a mut ProgramContext, stream: &'a TokenStream<'a>) -> ParserContext<'a> {
        ParserContext {
            program,
            source: stream.source_manager(),
            tokens: stream.tokens(),
            is_inside_specifiers: false,
        }
    }

    fn kind(&self, at: TokenIndex) -> TokenKind {
        self.tokens[at].kind
    }

    fn token(&self, at: TokenIndex) -> Token {
        self.tokens[at]
    }

    fn text(&self, at: TokenIndex) -> &'a str {
        self.source.text(self.tokens[at].range)
    }

    fn token_info(&self, at: TokenIndex) -> TokenDebug<'a> {
        let range = self.tokens[at].range;
        TokenDebug {
            source: self.source,
            pos: self.source.linecol_from_location(range.begin),
            range,
        }
    }

    fn note(&mut self, at: TokenIndex, message: &str) {
        let info = self.token_info(at);
        self.program.note(&info, message);
    }

    #[allow(dead_code)]
    fn warning(&mut self, at: TokenIndex, message: &str) {
        let info = self.token_info(at);
        self.program.warn(&info, message);
    }

    fn error(&mut self, at: TokenIndex, message: &str) {
        let info = self.token_info(at);
        self.program.error(&info, message);
    }

    fn pedantic(&mut self, at: TokenIndex, message: &str) {
        let info = self.token_info(at);
        self.program.pedantic(&info, message);
    }
}

/// One grammar rule. Plain `fn` items implement this via the blanket impl;
/// the combinators below produce composed rules as values.
trait Rule {
    fn parse(&self, parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult;
}

impl<F> Rule for F
where
    F: Fn(&mut ParserContext, TokenIndex, TokenIndex) -> ParserResult,
{
    fn parse(&self, parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        self(parser, begin, end)
    }
}

/// Tries each rule in order and returns the first result that is not a
/// give-up, committing to a rule that started matching even if it errored
/// later. When every alternative gives up the whole alternation gives up
/// at `begin` with the supplied expectation.
macro_rules! one_of {
    ($parser:expr, $begin:expr, $end:expr, $expected:expr, $($rule:expr),+ $(,)?) => {{
        'alternation: {
            $(
                let result = $rule.parse($parser, $begin, $end);
                if !is_giveup(&result.state) {
                    break 'alternation result;
                }
            )+
            ParserResult::new($end, make_error(ParserStatus::GiveUp, $begin, $expected))
        }
    }};
}

/// Applies `rule` for as long as `pred` accepts the current token.
#[allow(dead_code)]
fn parser_many_of<R: Rule>(
    parser: &mut ParserContext,
    begin: TokenIndex,
    end: TokenIndex,
    rule: R,
    pred: impl Fn(Token) -> bool,
) -> ParserResult {
    let mut state = ParserState::Success(Some(Box::new(SyntaxTree::new())));
    let mut it = begin;

    while it != end && pred(parser.token(it)) {
        let result = rule.parse(parser, it, end);
        add_state(&mut state, result.state);
        it = result.next;
    }

    ParserResult::new(it, state)
}

fn is_empty_node(state: &ParserState) -> bool {
    matches!(state, ParserState::Success(Some(tree)) if tree.node_type() == NodeType::Nothing)
}

/// Applies `rule` one or more times, stopping at the first give-up. Empty
/// statements are dropped from the accumulator and reported under pedantic
/// mode instead.
fn parser_one_many_of<R: Rule>(
    parser: &mut ParserContext,
    begin: TokenIndex,
    end: TokenIndex,
    expected: &str,
    rule: R,
) -> ParserResult {
    if begin == end {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, expected));
    }

    let mut state = ParserState::Success(Some(Box::new(SyntaxTree::new())));
    let mut it = begin;

    let first = rule.parse(parser, it, end);
    if is_giveup(&first.state) {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, expected));
    }
    if !is_empty_node(&first.state) {
        add_state(&mut state, first.state);
    } else {
        parser.pedantic(it, "empty statement");
    }
    it = first.next;

    while it != end {
        let result = rule.parse(parser, it, end);
        if is_giveup(&result.state) {
            break;
        }
        if !is_empty_node(&result.state) {
            add_state(&mut state, result.state);
        } else if parser.program.opts.pedantic {
            parser.pedantic(it, "empty statement");
        }
        it = result.next;
    }

    ParserResult::new(it, state)
}

/// Like `parser_one_many_of`, but keeps applying `rule` while `pred`
/// accepts the current token, folding every outcome into the accumulator.
fn parser_one_many_of_pred<R: Rule>(
    parser: &mut ParserContext,
    begin: TokenIndex,
    end: TokenIndex,
    expected: &str,
    rule: R,
    pred: impl Fn(Token) -> bool,
) -> ParserResult {
    if begin == end {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, expected));
    }

    let mut state = ParserState::Success(Some(Box::new(SyntaxTree::new())));
    let mut it = begin;

    loop {
        let result = rule.parse(parser, it, end);
        add_state(&mut state, result.state);
        it = result.next;

        if it == end || !pred(parser.token(it)) {
            break;
        }
    }

    ParserResult::new(it, state)
}

/// Single-token rule matching one operator, producing a leaf that carries
/// the operator token.
#[derive(Clone, Copy)]
struct Operator<M> {
    node_type: NodeType,
    matches: M,
}

fn parser_operator<M: Fn(TokenKind) -> bool>(node_type: NodeType, matches: M) -> Operator<M> {
    Operator { node_type, matches }
}

impl<M: Fn(TokenKind) -> bool> Rule for Operator<M> {
    fn parse(&self, parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        if begin != end && (self.matches)(parser.kind(begin)) {
            let leaf = SyntaxTree::with_token(self.node_type, parser.token(begin));
            ParserResult::new(begin + 1, ParserState::Success(Some(Box::new(leaf))))
        } else {
            ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, self.node_type.to_string()))
        }
    }
}

/// Left-associative binary operator fold: parses one `lhs`, then keeps
/// folding `op rhs` pairs into a new operator node. When the right-hand
/// side fails mid-loop the iterator is bumped one token so the loop can
/// make progress.
#[derive(Clone, Copy)]
struct LeftBinary<L, O, R> {
    lhs: L,
    op: O,
    rhs: R,
}

fn parser_left_binary_operator<L: Rule, O: Rule, R: Rule>(lhs: L, op: O, rhs: R) -> LeftBinary<L, O, R> {
    LeftBinary { lhs, op, rhs }
}

impl<L: Rule, O: Rule, R: Rule> Rule for LeftBinary<L, O, R> {
    fn parse(&self, parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        if begin == end {
            return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "binary operator"));
        }

        let lhs_result = self.lhs.parse(parser, begin, end);
        let mut lhs_it = lhs_result.next;
        let mut lhs_state = lhs_result.state;

        if is_giveup(&lhs_state) {
            return ParserResult::new(end, lhs_state);
        }

        loop {
            let op_result = self.op.parse(parser, lhs_it, end);
            let mut op_state = op_result.state;

            if is_giveup(&op_state) {
                break;
            }

            let op_token = parser.text(lhs_it);
            let expected = format!("expression for operator '{}'", op_token);

            let rhs_result = self.rhs.parse(parser, op_result.next, end);
            lhs_it = op_result.next;

            if rhs_result.state.is_success() {
                lhs_it = rhs_result.next;
            } else if lhs_it != end {
                lhs_it += 1;
            }

            add_state(&mut op_state, giveup_to_expected(parser, lhs_state, Some(&expected)));
            add_state(&mut op_state, giveup_to_expected(parser, rhs_result.state, Some(&expected)));

            lhs_state = op_state;
        }

        ParserResult::new(lhs_it, lhs_state)
    }
}

/// Right-associative binary operator: one `lhs`, one `op`, then the whole
/// right-hand production again. Gives up wholesale when the operator is
/// absent, so alternations can retry the input another way.
#[derive(Clone, Copy)]
struct RightBinary<L, O, R> {
    lhs: L,
    op: O,
    rhs: R,
}

fn parser_right_binary_operator<L: Rule, O: Rule, R: Rule>(lhs: L, op: O, rhs: R) -> RightBinary<L, O, R> {
    RightBinary { lhs, op, rhs }
}

impl<L: Rule, O: Rule, R: Rule> Rule for RightBinary<L, O, R> {
    fn parse(&self, parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        if begin != end {
            let lhs_result = self.lhs.parse(parser, begin, end);

            if !is_giveup(&lhs_result.state) {
                let op_result = self.op.parse(parser, lhs_result.next, end);
                let mut op_state = op_result.state;

                if !is_giveup(&op_state) {
                    let op_token = parser.text(lhs_result.next);
                    let expected = format!("expression for operator '{}'", op_token);

                    let rhs_result = self.rhs.parse(parser, op_result.next, end);

                    add_state(&mut op_state, lhs_result.state);
                    add_state(&mut op_state, giveup_to_expected(parser, rhs_result.state, Some(&expected)));

                    return ParserResult::new(rhs_result.next, op_state);
                }
            }
        }

        ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "binary operator"))
    }
}

/// Returns an empty (`Nothing`) node without advancing when the rule gives
/// up; passes the rule's result through otherwise.
#[derive(Clone, Copy)]
struct Opt<R> {
    rule: R,
}

fn parser_opt<R: Rule>(rule: R) -> Opt<R> {
    Opt { rule }
}

impl<R: Rule> Rule for Opt<R> {
    fn parse(&self, parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        let result = self.rule.parse(parser, begin, end);
        if !is_giveup(&result.state) {
            result
        } else {
            let nothing = SyntaxTree::with_type(NodeType::Nothing);
            ParserResult::new(begin, ParserState::Success(Some(Box::new(nothing))))
        }
    }
}

/// Expects `open`, the rule, then `close`. A missing close token is a hard
/// error with a note pointing back at the opening token.
#[derive(Clone, Copy)]
struct Parens<R> {
    rule: R,
    open: TokenKind,
    close: TokenKind,
}

fn parser_parens<R: Rule>(rule: R, open: TokenKind, close: TokenKind) -> Parens<R> {
    Parens { rule, open, close }
}

impl<R: Rule> Rule for Parens<R> {
    fn parse(&self, parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        if begin == end || parser.kind(begin) != self.open {
            return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, format!("'{}'", self.open)));
        }

        let result = self.rule.parse(parser, begin + 1, end);
        let mut it = result.next;
        let mut state = result.state;

        if !is_giveup(&state) && it != end && expect_end_token(parser, &mut state, begin, end, it, self.close) {
            it += 1;
        }

        ParserResult::new(it, state)
    }
}

/// Comma-separated list of `rule`. Failures of an element are committed
/// (`giveup_to_expected`) so the list reports them and moves on. With
/// `allow_trailing_comma` a comma right before a closing bracket ends the
/// list.
#[derive(Clone, Copy)]
struct ListOf<R> {
    rule: R,
    allow_trailing_comma: bool,
}

fn parser_list_of<R: Rule>(rule: R, allow_trailing_comma: bool) -> ListOf<R> {
    ListOf { rule, allow_trailing_comma }
}

impl<R: Rule> Rule for ListOf<R> {
    fn parse(&self, parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        if begin == end {
            return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "parser_list_of"));
        }

        let mut state = ParserState::Success(Some(Box::new(SyntaxTree::new())));
        let mut it = begin;

        while it != end {
            let result = self.rule.parse(parser, it, end);
            let element_next = result.next;
            debug_assert!(element_next <= end);

            add_state(&mut state, giveup_to_expected(parser, result.state, None));
            it = element_next;

            if it != end && parser.kind(it) == TokenKind::Comma {
                it += 1;
            }

            if self.allow_trailing_comma
                && it != end
                && matches!(
                    parser.kind(it),
                    TokenKind::RBrace | TokenKind::RBracket | TokenKind::RParen
                )
            {
                break;
            }

            if element_next == end || parser.kind(element_next) != TokenKind::Comma {
                break;
            }
        }

        ParserResult::new(it, state)
    }
}

/// Adds an "expected X before Y" error unless the current token is `kind`.
/// Returns whether the caller may consume the token.
fn expect_token(
    parser: &ParserContext,
    state: &mut ParserState,
    it: TokenIndex,
    end: TokenIndex,
    kind: TokenKind,
) -> bool {
    if it != end && parser.kind(it) != kind {
        add_error(
            state,
            ParserError::new(
                ParserStatus::Error,
                it,
                format!("expected '{}' before '{}'", kind, parser.kind(it)),
            ),
        );
        return false;
    }
    it != end
}

/// Like `expect_token` for group-closing tokens: a mismatch also notes the
/// opening token, and running out of input blames the opening token.
fn expect_end_token(
    parser: &ParserContext,
    state: &mut ParserState,
    open: TokenIndex,
    end: TokenIndex,
    it: TokenIndex,
    kind: TokenKind,
) -> bool {
    if it == end {
        add_error(
            state,
            ParserError::new(ParserStatus::Error, open, format!("missing '{}' for this", kind)),
        );
        return false;
    }

    if parser.kind(it) != kind {
        add_error(
            state,
            ParserError::new(ParserStatus::Error, it, format!("expected '{}'", kind)),
        );
        add_error(
            state,
            ParserError::new(
                ParserStatus::ErrorNote,
                open,
                format!("to match this '{}'", parser.kind(open)),
            ),
        );
        return false;
    }

    true
}

// identifier:
//   [a-zA-Z_$] ([a-zA-Z_$] | [0-9])*
//
// -> ^(Identifier)

fn parser_identifier(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin != end && parser.kind(begin) == TokenKind::Identifier {
        let tree = SyntaxTree::with_token(NodeType::Identifier, parser.token(begin));
        return ParserResult::new(begin + 1, ParserState::Success(Some(Box::new(tree))));
    }

    ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "identifier"))
}

// identifier-list:
//   identifier
//   identifier-list ',' identifier

#[allow(dead_code)]
fn parser_identifier_list(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin != end && parser.kind(begin) == TokenKind::Identifier {
        let result = parser_list_of(parser_identifier, false).parse(parser, begin, end);
        let mut ident_list = ParserState::Success(None);

        if result.state.is_success() {
            add_node(&mut ident_list, SyntaxTree::with_type(NodeType::IdentifierList));
        }

        add_state(
            &mut ident_list,
            giveup_to_expected(parser, result.state, Some("identifiers separated by comma")),
        );

        return ParserResult::new(result.next, ident_list);
    }

    ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "identifier list"))
}

// string-literal:
//   encoding-prefix? '"' schar-sequence? '"'
//
// encoding-prefix: one of
//   u8 u U L

fn parser_string_literal(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    let mut encoding_prefix = None;
    let mut it = begin;

    if it != end && parser.kind(it) == TokenKind::EncodingPrefix {
        encoding_prefix = Some(parser.token(it));
        it += 1;
    }

    if it != end && parser.kind(it) == TokenKind::StringConstant {
        let mut tree = SyntaxTree::with_token(NodeType::StringLiteral, parser.token(it));

        if let Some(prefix) = encoding_prefix {
            tree.add_child(SyntaxTree::with_token(NodeType::EncodingPrefix, prefix));
        }

        return ParserResult::new(it + 1, ParserState::Success(Some(Box::new(tree))));
    }

    ParserResult::new(end, make_error(ParserStatus::GiveUp, it, "string literal"))
}

// string-literal-list:
//   string-literal+
//
// A single literal stays bare; only adjacent literals get the list node.

fn parser_string_literal_list(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    let result = parser_one_many_of_pred(parser, begin, end, "string literal", parser_string_literal, |t| {
        t.kind == TokenKind::StringConstant
    });
    let it = result.next;
    let mut strings = result.state;

    if let ParserState::Success(Some(tree)) = &mut strings {
        if tree.child_count() == 1 {
            let single = tree.pop_child().expect("child count was checked");
            return ParserResult::new(it, ParserState::Success(Some(Box::new(single))));
        }
    }

    if !is_giveup(&strings) {
        let mut state = ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::StringLiteralList))));
        add_state(&mut state, strings);
        ParserResult::new(it, state)
    } else {
        ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "string literal list"))
    }
}

// constant:
//   integer-constant
//   floating-constant
//   character-constant
//   enumeration-constant
//
// Whether an identifier really is an enumeration constant is left to
// semantic analysis.

fn parser_constant(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin == end {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "constant"));
    }

    let const_type = match parser.kind(begin) {
        TokenKind::IntegerConstant | TokenKind::OctIntegerConstant | TokenKind::HexIntegerConstant => {
            NodeType::IntegerConstant
        }
        TokenKind::FloatConstant => NodeType::FloatingConstant,
        TokenKind::CharConstant => NodeType::CharacterConstant,
        TokenKind::Identifier => NodeType::EnumerationConstant,
        _ => NodeType::None,
    };

    if const_type != NodeType::None {
        let tree = SyntaxTree::with_token(const_type, parser.token(begin));
        ParserResult::new(begin + 1, ParserState::Success(Some(Box::new(tree))))
    } else {
        ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "constant"))
    }
}

// parameter-declaration:
//   declaration-specifiers declarator
//   declaration-specifiers abstract-declarator?

fn parser_parameter_declaration(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin != end {
        let specs_result = parser_declaration_specifiers(parser, begin, end);

        if !is_giveup(&specs_result.state) {
            let mut param_decl = ParserState::Success(None);
            let mut it = specs_result.next;

            if specs_result.state.is_success() {
                add_node(&mut param_decl, SyntaxTree::with_type(NodeType::ParameterDeclaration));
            }

            add_state(&mut param_decl, specs_result.state);

            let decl_result = parser_declarator(parser, it, end);
            if !is_giveup(&decl_result.state) {
                add_state(&mut param_decl, decl_result.state);
                it = decl_result.next;
            } else {
                let abs_result = parser_abstract_declarator(parser, it, end);
                if !is_giveup(&abs_result.state) {
                    add_state(&mut param_decl, abs_result.state);
                    it = abs_result.next;
                }
            }

            return ParserResult::new(it, param_decl);
        }
    }

    ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "parameter declaration"))
}

// parameter-type-list:
//   parameter-list
//   parameter-list ',' '...'
//
// parameter-list:
//   parameter-declaration
//   parameter-list ',' parameter-declaration

fn parser_parameter_type_list(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin == end {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "parameter type list"));
    }

    let mut parameters = ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::ParameterList))));
    let mut it = begin;

    let first = parser_parameter_declaration(parser, it, end);
    add_state(&mut parameters, first.state);
    it = first.next;

    if it != end && parser.kind(it) == TokenKind::Comma {
        it += 1;
    } else {
        return ParserResult::new(it, parameters);
    }

    if it != end && parser.kind(it) == TokenKind::Ellipsis {
        add_node(&mut parameters, SyntaxTree::with_token(NodeType::VariadicParameter, parser.token(it)));
        it += 1;
        return ParserResult::new(it, parameters);
    }

    while it != end {
        let param = parser_parameter_declaration(parser, it, end);
        add_state(&mut parameters, giveup_to_expected(parser, param.state, None));
        it = param.next;

        if it != end && parser.kind(it) == TokenKind::Comma {
            it += 1;
        } else {
            break;
        }

        if it != end && parser.kind(it) == TokenKind::Ellipsis {
            add_node(&mut parameters, SyntaxTree::with_token(NodeType::VariadicParameter, parser.token(it)));
            it += 1;
            break;
        }
    }

    ParserResult::new(it, parameters)
}

// typedef-name:
//   identifier
//  -> ^(TypedefName)

fn parser_typedef_name(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    // TODO: needs a typedef lookup from a symbol table; until that exists no
    // identifier is accepted as a typedef name, so typedef'd names flow
    // through the ordinary identifier path.
    const TYPEDEF_LOOKUP_READY: bool = false;

    if TYPEDEF_LOOKUP_READY && begin != end && parser.kind(begin) == TokenKind::Identifier {
        let tree = SyntaxTree::with_token(NodeType::TypedefName, parser.token(begin));
        return ParserResult::new(begin + 1, ParserState::Success(Some(Box::new(tree))));
    }

    ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "typedef name"))
}

// atomic-type-specifier:
//   '_Atomic' '(' type-name ')'
//  -> ^(AtomicTypeSpecifier type-name)
//
// A bare '_Atomic' without '(' is a type qualifier instead.

fn parser_atomic_type_specifier(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin != end
        && begin + 1 != end
        && parser.kind(begin) == TokenKind::Atomic
        && parser.kind(begin + 1) == TokenKind::LParen
    {
        let result =
            parser_parens(parser_type_name, TokenKind::LParen, TokenKind::RParen).parse(parser, begin + 1, end);

        let mut atomic_type_spec =
            ParserState::Success(Some(Box::new(SyntaxTree::with_token(NodeType::AtomicTypeSpecifier, parser.token(begin)))));
        add_state(
            &mut atomic_type_spec,
            giveup_to_expected(parser, result.state, Some("type name for atomic type specifier")),
        );

        return ParserResult::new(result.next, atomic_type_spec);
    }

    ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "atomic type specifier"))
}

// type-specifier:
//   'void' | 'char' | 'short' | 'int' | 'long' | 'float' | 'double'
//   'signed' | 'unsigned' | '_Bool' | '_Complex'
//   '__m128' | '__m128d' | '__m128i'
//  -> ^(TypeSpecifier)
//
//   atomic-type-specifier
//   struct-or-union-specifier
//   enum-specifier
//   typedef-name
//  -> ^(TypeSpecifier sub-type-specifier)

fn parser_type_specifier(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin == end {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "type specifier"));
    }

    let mut type_spec = ParserState::Success(None);
    let it;

    match parser.kind(begin) {
        TokenKind::Void
        | TokenKind::Char
        | TokenKind::Short
        | TokenKind::Int
        | TokenKind::Long
        | TokenKind::Float
        | TokenKind::Double
        | TokenKind::Signed
        | TokenKind::Unsigned
        | TokenKind::Bool
        | TokenKind::Complex
        | TokenKind::VectorM128
        | TokenKind::VectorM128d
        | TokenKind::VectorM128i => {
            add_node(&mut type_spec, SyntaxTree::with_token(NodeType::TypeSpecifier, parser.token(begin)));
            it = begin + 1;
        }

        _ => {
            // struct and enum specifiers consult this flag to require a ';'
            // right after their body when used as a declaration's specifier
            let old_inside_specifiers = parser.is_inside_specifiers;
            parser.is_inside_specifiers = true;

            let result = one_of!(
                parser,
                begin,
                end,
                "type specifier",
                parser_atomic_type_specifier,
                parser_struct_or_union_specifier,
                parser_enum_specifier,
                parser_typedef_name,
            );

            parser.is_inside_specifiers = old_inside_specifiers;

            if result.state.is_success() {
                add_node(&mut type_spec, SyntaxTree::with_type(NodeType::TypeSpecifier));
            }

            add_state(&mut type_spec, result.state);
            it = result.next;
        }
    }

    ParserResult::new(it, type_spec)
}

// type-qualifier:
//   'const'
//   'restrict'
//   'volatile'
//   '_Atomic'
//  -> ^(TypeQualifier)

fn parser_type_qualifier(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin != end
        && matches!(
            parser.kind(begin),
            TokenKind::Const | TokenKind::Restrict | TokenKind::Volatile | TokenKind::Atomic
        )
    {
        let tree = SyntaxTree::with_token(NodeType::TypeQualifier, parser.token(begin));
        return ParserResult::new(begin + 1, ParserState::Success(Some(Box::new(tree))));
    }

    ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "type qualifier"))
}

// type-qualifier-list:
//   type-qualifier+

fn parser_type_qualifier_list(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    let result = parser_one_many_of_pred(parser, begin, end, "type qualifier list", parser_type_qualifier, |t| {
        matches!(
            t.kind,
            TokenKind::Const | TokenKind::Restrict | TokenKind::Volatile | TokenKind::Atomic
        )
    });

    let mut qualifiers = ParserState::Success(None);

    if result.state.is_success() {
        qualifiers = ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::TypeQualifierList))));
    }

    add_state(&mut qualifiers, result.state);

    ParserResult::new(result.next, qualifiers)
}

// pointer:
//   '*' type-qualifier-list?
//  -> ^(PointerDeclarator type-qualifier-list?)
//
//   '*' type-qualifier-list? pointer
//  -> ^(PointerDeclarator type-qualifier-list? PointerDeclarator)

fn parser_pointer(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin != end && parser.kind(begin) == TokenKind::Star {
        let mut pointer =
            ParserState::Success(Some(Box::new(SyntaxTree::with_token(NodeType::PointerDeclarator, parser.token(begin)))));
        let mut it = begin + 1;

        let quals = parser_type_qualifier_list(parser, it, end);
        if !is_giveup(&quals.state) {
            add_state(
                &mut pointer,
                giveup_to_expected(parser, quals.state, Some("type qualifier list for pointer type")),
            );
            it = quals.next;
        }

        if it != end && parser.kind(it) == TokenKind::Star {
            let sub_pointer = parser_pointer(parser, it, end);
            add_state(&mut pointer, giveup_to_expected(parser, sub_pointer.state, Some("nested pointer")));
            it = sub_pointer.next;
        }

        return ParserResult::new(it, pointer);
    }

    ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "pointer"))
}

// direct-abstract-declarator:
//   '(' parameter-type-list? ')'
//   '(' abstract-declarator ')'
//   '[' type-qualifier-list? assignment-expression? ']'
//   '[' 'static' type-qualifier-list? assignment-expression ']'
//   '[' type-qualifier-list 'static' assignment-expression ']'
//   '[' '*' ']'
//   direct-abstract-declarator '(' parameter-type-list? ')'
//   direct-abstract-declarator '[' ... ']'

fn parser_direct_abstract_declarator(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    // interior of '(' ... ')'; the opening token is begin - 1
    fn function_declarator(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        if begin != end {
            let func_token = parser.token(begin - 1);

            // '(' ')'
            if parser.kind(begin) == TokenKind::RParen {
                let tree = SyntaxTree::with_token(NodeType::FunctionDeclarator, func_token);
                return ParserResult::new(begin, ParserState::Success(Some(Box::new(tree))));
            }

            let abs_result = parser_abstract_declarator(parser, begin, end);
            if !is_giveup(&abs_result.state) {
                return abs_result;
            }

            let params = parser_parameter_type_list(parser, begin, end);
            let mut func_decl = ParserState::Success(None);

            if params.state.is_success() {
                add_node(&mut func_decl, SyntaxTree::with_token(NodeType::FunctionDeclarator, func_token));
            }

            add_state(&mut func_decl, params.state);

            return ParserResult::new(params.next, func_decl);
        }

        ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "function declarator"))
    }

    // interior of '[' ... ']'; the opening token is begin - 1
    fn array_declarator(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        if begin != end {
            let array_token = parser.token(begin - 1);
            let mut it = begin;

            // '[' ']'
            if parser.kind(it) == TokenKind::RBracket {
                let tree = SyntaxTree::with_token(NodeType::ArrayVLADeclarator, array_token);
                return ParserResult::new(it, ParserState::Success(Some(Box::new(tree))));
            }

            // '[' '*' ']'
            if parser.kind(it) == TokenKind::Star && it + 1 != end && parser.kind(it + 1) == TokenKind::RBracket {
                let tree = SyntaxTree::with_token(NodeType::ArrayVLADeclarator, array_token);
                return ParserResult::new(it + 1, ParserState::Success(Some(Box::new(tree))));
            }

            // '[' 'static' type-qualifier-list? assignment-expression ']'
            if parser.kind(it) == TokenKind::Static {
                let mut decl =
                    ParserState::Success(Some(Box::new(SyntaxTree::with_token(NodeType::ArrayStaticDeclarator, array_token))));
                it += 1;

                let quals = parser_type_qualifier_list(parser, it, end);
                if !is_giveup(&quals.state) {
                    add_state(
                        &mut decl,
                        giveup_to_expected(parser, quals.state, Some("qualifiers for array declarator")),
                    );
                    it = quals.next;
                }

                let assign = parser_assignment_expression(parser, it, end);
                add_state(
                    &mut decl,
                    giveup_to_expected(parser, assign.state, Some("expression for array length")),
                );
                it = assign.next;

                return ParserResult::new(it, decl);
            }

            let quals = parser_type_qualifier_list(parser, it, end);
            let qual_it = quals.next;

            // '[' type-qualifier-list 'static' assignment-expression ']'
            if !is_giveup(&quals.state) && qual_it != end && parser.kind(qual_it) == TokenKind::Static {
                let assign = parser_assignment_expression(parser, qual_it + 1, end);
                let mut decl = ParserState::Success(None);
                it = assign.next;

                if assign.state.is_success() {
                    decl = ParserState::Success(Some(Box::new(SyntaxTree::with_token(
                        NodeType::ArrayStaticDeclarator,
                        array_token,
                    ))));
                }

                add_state(
                    &mut decl,
                    giveup_to_expected(parser, quals.state, Some("qualifiers for array declarator")),
                );
                add_state(
                    &mut decl,
                    giveup_to_expected(parser, assign.state, Some("expression for array length")),
                );

                return ParserResult::new(it, decl);
            }

            // '[' type-qualifier-list? assignment-expression? ']'
            let assign = parser_assignment_expression(parser, if qual_it != end { qual_it } else { it }, end);

            let mut decl =
                ParserState::Success(Some(Box::new(SyntaxTree::with_token(NodeType::ArrayDeclarator, array_token))));

            if !is_giveup(&quals.state) {
                add_state(&mut decl, quals.state);
                it = qual_it;
            }

            if !is_giveup(&assign.state) {
                add_state(&mut decl, assign.state);
                it = assign.next;
            }

            return ParserResult::new(it, decl);
        }

        ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "direct abstract declarator"))
    }

    if begin == end {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "direct abstract declarator"));
    }

    let array_declarator_production = parser_parens(array_declarator, TokenKind::LBracket, TokenKind::RBracket);

    let result = one_of!(
        parser,
        begin,
        end,
        "function or array declarator",
        parser_parens(function_declarator, TokenKind::LParen, TokenKind::RParen),
        array_declarator_production,
    );
    let mut it = result.next;
    let mut array_decl = result.state;

    if is_giveup(&array_decl) {
        return ParserResult::new(it, array_decl);
    }

    while it != end {
        if parser.kind(it) == TokenKind::LParen {
            // direct-abstract-declarator '(' parameter-type-list? ')'
            let params = parser_parens(parser_opt(parser_parameter_type_list), TokenKind::LParen, TokenKind::RParen)
                .parse(parser, it, end);

            let mut func_decl = ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::FunctionDeclarator))));

            add_state(&mut func_decl, giveup_to_expected(parser, array_decl, Some("array declarator")));
            add_state(&mut func_decl, giveup_to_expected(parser, params.state, Some("parameter type list")));

            array_decl = func_decl;
            it = params.next;
        } else if parser.kind(it) == TokenKind::LBracket {
            let declarator = array_declarator_production.parse(parser, it, end);
            let mut direct_decl =
                ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::DirectAbstractDeclarator))));

            add_state(&mut direct_decl, giveup_to_expected(parser, array_decl, Some("array declarator")));
            add_state(&mut direct_decl, giveup_to_expected(parser, declarator.state, Some("array declarator")));

            array_decl = direct_decl;
            it = declarator.next;
        } else {
            break;
        }
    }

    ParserResult::new(it, array_decl)
}

// abstract-declarator:
//   pointer
//   pointer? direct-abstract-declarator

fn parser_abstract_declarator(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin != end {
        if parser.kind(begin) == TokenKind::Star {
            let pointer = parser_pointer(parser, begin, end);
            let ptr_it = pointer.next;

            if ptr_it != end && parser.kind(ptr_it) == TokenKind::LBracket {
                let mut abstract_decl = ParserState::Success(None);
                let decl = parser_direct_abstract_declarator(parser, ptr_it, end);

                if !is_giveup(&decl.state) {
                    add_node(&mut abstract_decl, SyntaxTree::with_type(NodeType::AbstractDeclarator));
                }

                add_state(&mut abstract_decl, giveup_to_expected(parser, pointer.state, None));
                add_state(&mut abstract_decl, giveup_to_expected(parser, decl.state, None));

                return ParserResult::new(decl.next, abstract_decl);
            }

            return ParserResult::new(ptr_it, pointer.state);
        } else if parser.kind(begin) == TokenKind::LBracket {
            return parser_direct_abstract_declarator(parser, begin, end);
        }
    }

    ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "abstract declarator"))
}

// specifier-qualifier-list:
//   (type-specifier | type-qualifier)+

fn parser_specifier_qualifier_list(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin == end {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "specifier qualifier list"));
    }

    let mut qualifiers = ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::SpecifierQualifierList))));
    let mut it = begin;

    let first = one_of!(
        parser,
        it,
        end,
        "type specifier or qualifier",
        parser_type_specifier,
        parser_type_qualifier,
    );

    if is_giveup(&first.state) {
        return ParserResult::new(end, first.state);
    }

    add_state(&mut qualifiers, first.state);
    it = first.next;

    loop {
        let result = one_of!(
            parser,
            it,
            end,
            "type specifier or qualifier",
            parser_type_specifier,
            parser_type_qualifier,
        );

        if is_giveup(&result.state) {
            break;
        }

        add_state(&mut qualifiers, result.state);
        it = result.next;
    }

    ParserResult::new(it, qualifiers)
}

// type-name:
//   specifier-qualifier-list abstract-declarator?

fn parser_type_name(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin == end {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "type name"));
    }

    let specs = parser_specifier_qualifier_list(parser, begin, end);
    let mut it = specs.next;

    if is_giveup(&specs.state) {
        return ParserResult::new(specs.next, specs.state);
    }

    let mut type_name = ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::TypeName))));
    add_state(&mut type_name, specs.state);

    let abstract_decl = parser_abstract_declarator(parser, it, end);
    if !is_giveup(&abstract_decl.state) {
        add_state(&mut type_name, abstract_decl.state);
        it = abstract_decl.next;
    }

    ParserResult::new(it, type_name)
}

// constant-expression:
//   conditional-expression

fn parser_constant_expression(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    parser_conditional_expression(parser, begin, end)
}

// static-assert-declaration:
//   '_Static_assert' '(' constant-expression ',' string-literal+ ')' ';'

fn parser_static_assert_declaration(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    // constant-expression ',' string-literal+
    fn static_assert_args(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        let mut args = ParserState::Success(Some(Box::new(SyntaxTree::new())));
        let mut it = begin;

        let const_expr = parser_constant_expression(parser, it, end);
        add_state(&mut args, giveup_to_expected(parser, const_expr.state, None));
        it = const_expr.next;

        if expect_token(parser, &mut args, it, end, TokenKind::Comma) {
            it += 1;
        }

        let strings = parser_string_literal_list(parser, it, end);
        add_state(&mut args, giveup_to_expected(parser, strings.state, None));
        it = strings.next;

        ParserResult::new(it, args)
    }

    if begin != end && parser.kind(begin) == TokenKind::StaticAssert {
        let result = parser_parens(static_assert_args, TokenKind::LParen, TokenKind::RParen).parse(parser, begin + 1, end);
        let mut it = result.next;
        let mut arguments = result.state;

        if arguments.is_success() && expect_end_token(parser, &mut arguments, begin, end, it, TokenKind::Semicolon) {
            it += 1;
        }

        let mut static_assert_decl =
            ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::StaticAssertDeclaration))));
        add_state(&mut static_assert_decl, arguments);

        return ParserResult::new(it, static_assert_decl);
    }

    ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "static assert declaration"))
}

// direct-declarator:
//   identifier
//   '(' declarator ')'
//   direct-declarator '[' type-qualifier-list? assignment-expression? ']'
//   direct-declarator '[' 'static' type-qualifier-list? assignment-expression ']'
//   direct-declarator '[' type-qualifier-list 'static' assignment-expression ']'
//   direct-declarator '[' type-qualifier-list? '*' ']'
//   direct-declarator '(' parameter-type-list? ')'

fn parser_direct_declarator(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    // interior of '[' ... ']'; the opening token is begin - 1
    fn array_declarator(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        if begin != end {
            let array_token = parser.token(begin - 1);
            let mut it = begin;

            // '[' ']'
            if parser.kind(it) == TokenKind::RBracket {
                let tree = SyntaxTree::with_token(NodeType::ArrayVLADeclarator, array_token);
                return ParserResult::new(it, ParserState::Success(Some(Box::new(tree))));
            }

            // '[' '*' ']'
            if parser.kind(it) == TokenKind::Star && it + 1 != end && parser.kind(it + 1) == TokenKind::RBracket {
                let tree = SyntaxTree::with_token(NodeType::ArrayVLADeclarator, array_token);
                return ParserResult::new(it + 1, ParserState::Success(Some(Box::new(tree))));
            }

            // '[' 'static' type-qualifier-list? assignment-expression ']'
            if parser.kind(it) == TokenKind::Static {
                let mut decl =
                    ParserState::Success(Some(Box::new(SyntaxTree::with_token(NodeType::ArrayStaticDeclarator, array_token))));
                it += 1;

                let quals = parser_type_qualifier_list(parser, it, end);
                if !is_giveup(&quals.state) {
                    add_state(
                        &mut decl,
                        giveup_to_expected(parser, quals.state, Some("qualifiers for array declarator in direct declarator")),
                    );
                    it = quals.next;
                }

                let assign = parser_assignment_expression(parser, it, end);
                add_state(
                    &mut decl,
                    giveup_to_expected(parser, assign.state, Some("expression for array length in direct declarator")),
                );
                it = assign.next;

                return ParserResult::new(it, decl);
            }

            let quals = parser_type_qualifier_list(parser, it, end);
            let qual_it = quals.next;

            // '[' type-qualifier-list 'static' assignment-expression ']'
            if !is_giveup(&quals.state) && qual_it != end && parser.kind(qual_it) == TokenKind::Static {
                let assign = parser_assignment_expression(parser, qual_it + 1, end);
                let mut decl = ParserState::Success(None);
                it = assign.next;

                if assign.state.is_success() {
                    decl = ParserState::Success(Some(Box::new(SyntaxTree::with_token(
                        NodeType::ArrayStaticDeclarator,
                        array_token,
                    ))));
                }

                add_state(
                    &mut decl,
                    giveup_to_expected(parser, quals.state, Some("qualifiers for array declarator in direct declarator")),
                );
                add_state(
                    &mut decl,
                    giveup_to_expected(parser, assign.state, Some("expression for array length in direct declarator")),
                );

                return ParserResult::new(it, decl);
            }

            // '[' type-qualifier-list? '*' ']'
            if qual_it != end && parser.kind(qual_it) == TokenKind::Star {
                let mut decl =
                    ParserState::Success(Some(Box::new(SyntaxTree::with_token(NodeType::ArrayVLADeclarator, array_token))));
                it = qual_it + 1;

                if !is_giveup(&quals.state) {
                    add_state(&mut decl, quals.state);
                }

                return ParserResult::new(it, decl);
            }

            // '[' type-qualifier-list? assignment-expression? ']'
            let assign = parser_assignment_expression(parser, if qual_it != end { qual_it } else { it }, end);

            let mut decl =
                ParserState::Success(Some(Box::new(SyntaxTree::with_token(NodeType::ArrayDeclarator, array_token))));

            if !is_giveup(&quals.state) {
                add_state(&mut decl, quals.state);
                it = qual_it;
            }

            if !is_giveup(&assign.state) {
                add_state(&mut decl, assign.state);
                it = assign.next;
            }

            return ParserResult::new(it, decl);
        }

        ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "direct declarator"))
    }

    fn ident_or_decl(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        one_of!(
            parser,
            begin,
            end,
            "identifier or declarator inside parentheses",
            parser_identifier,
            parser_parens(parser_declarator, TokenKind::LParen, TokenKind::RParen),
        )
    }

    if begin != end && matches!(parser.kind(begin), TokenKind::Identifier | TokenKind::LParen) {
        let mut direct_decl = ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::DirectDeclarator))));
        let mut it = begin;

        let head = ident_or_decl(parser, it, end);
        if !is_giveup(&head.state) {
            add_state(&mut direct_decl, giveup_to_expected(parser, head.state, None));
            it = head.next;

            while it != end {
                if parser.kind(it) == TokenKind::LBracket {
                    let arr = parser_parens(array_declarator, TokenKind::LBracket, TokenKind::RBracket)
                        .parse(parser, it, end);

                    add_state(&mut direct_decl, giveup_to_expected(parser, arr.state, None));
                    it = arr.next;

                    let mut super_decl = ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::DirectDeclarator))));
                    add_state(&mut super_decl, direct_decl);
                    direct_decl = super_decl;
                } else if parser.kind(it) == TokenKind::LParen {
                    // '(' parameter-type-list? ')' -> ^(FunctionDeclarator parameter-list?)
                    let params = parser_parens(parser_opt(parser_parameter_type_list), TokenKind::LParen, TokenKind::RParen)
                        .parse(parser, it, end);

                    let mut func_decl = ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::FunctionDeclarator))));
                    add_state(&mut func_decl, giveup_to_expected(parser, params.state, None));

                    add_state(&mut direct_decl, func_decl);
                    it = params.next;

                    let mut super_decl = ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::DirectDeclarator))));
                    add_state(&mut super_decl, direct_decl);
                    direct_decl = super_decl;
                } else {
                    break;
                }
            }

            return ParserResult::new(it, direct_decl);
        }
    }

    ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "direct declarator"))
}

// A declarator can only start with '*', an identifier, or '('.

fn parser_is_declarator(parser: &ParserContext, it: TokenIndex, end: TokenIndex) -> bool {
    it != end && matches!(parser.kind(it), TokenKind::Star | TokenKind::Identifier | TokenKind::LParen)
}

// declarator:
//   pointer? direct-declarator

fn parser_declarator(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin == end {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "declarator"));
    }

    let mut declarator = ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::Declarator))));
    let pointer = parser_pointer(parser, begin, end);
    let ptr_it = pointer.next;

    if !is_giveup(&pointer.state) {
        add_state(&mut declarator, pointer.state);
    }

    let it = if ptr_it != end { ptr_it } else { begin };

    let direct = parser_direct_declarator(parser, it, end);
    add_state(&mut declarator, direct.state);

    ParserResult::new(direct.next, declarator)
}

// init-declarator:
//   declarator
//   declarator '=' initializer

fn parser_init_declarator(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin != end {
        let declarator = parser_declarator(parser, begin, end);

        if !is_giveup(&declarator.state) {
            let mut init_decl = ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::InitDeclarator))));
            let mut it = declarator.next;

            add_state(&mut init_decl, declarator.state);

            if it != end && parser.kind(it) == TokenKind::Assign {
                let initializer = parser_initializer(parser, it + 1, end);
                it = initializer.next;

                add_state(
                    &mut init_decl,
                    giveup_to_expected(parser, initializer.state, Some("initializer for init declarator")),
                );
            }

            return ParserResult::new(it, init_decl);
        }
    }

    ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "init declarator"))
}

// init-declarator-list:
//   init-declarator
//   init-declarator-list ',' init-declarator

fn parser_init_declarator_list(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    parser_list_of(parser_init_declarator, false).parse(parser, begin, end)
}

// storage-class-specifier:
//   'typedef'
//   'extern'
//   'static'
//   '_Thread_local'
//   'auto'
//   'register'

fn parser_storage_class_specifier(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin != end
        && matches!(
            parser.kind(begin),
            TokenKind::Typedef
                | TokenKind::Extern
                | TokenKind::Static
                | TokenKind::ThreadLocal
                | TokenKind::Auto
                | TokenKind::Register
        )
    {
        let tree = SyntaxTree::with_token(NodeType::StorageClassSpecifier, parser.token(begin));
        return ParserResult::new(begin + 1, ParserState::Success(Some(Box::new(tree))));
    }

    ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "storage class specifier"))
}

// function-specifier:
//   'inline'
//   '_Noreturn'
//   '__stdcall'
//   '__declspec' '(' identifier ')'

fn parser_function_specifier(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin != end {
        match parser.kind(begin) {
            TokenKind::Inline | TokenKind::Noreturn | TokenKind::Stdcall => {
                let tree = SyntaxTree::with_token(NodeType::FunctionSpecifier, parser.token(begin));
                return ParserResult::new(begin + 1, ParserState::Success(Some(Box::new(tree))));
            }

            TokenKind::Declspec => {
                let result =
                    parser_parens(parser_identifier, TokenKind::LParen, TokenKind::RParen).parse(parser, begin + 1, end);
                let mut func_spec = ParserState::Success(None);

                if result.state.is_success() {
                    func_spec =
                        ParserState::Success(Some(Box::new(SyntaxTree::with_token(NodeType::FunctionSpecifier, parser.token(begin)))));
                }

                add_state(&mut func_spec, giveup_to_expected(parser, result.state, Some("declspec argument")));

                return ParserResult::new(result.next, func_spec);
            }

            _ => {}
        }
    }

    ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "function specifier"))
}

// alignment-specifier:
//   '_Alignas' '(' type-name ')'
//   '_Alignas' '(' constant-expression ')'

fn parser_alignment_specifier(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    fn alignas_arg(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        one_of!(
            parser,
            begin,
            end,
            "type name or constant expression",
            parser_type_name,
            parser_constant_expression,
        )
    }

    if begin != end && parser.kind(begin) == TokenKind::Alignas {
        let result = parser_parens(alignas_arg, TokenKind::LParen, TokenKind::RParen).parse(parser, begin + 1, end);
        let mut alignas_spec = ParserState::Success(None);

        if result.state.is_success() {
            add_node(&mut alignas_spec, SyntaxTree::with_token(NodeType::AlignmentSpecifier, parser.token(begin)));
        }

        add_state(&mut alignas_spec, giveup_to_expected(parser, result.state, Some("alignas argument")));

        return ParserResult::new(result.next, alignas_spec);
    }

    ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "alignment specifier"))
}

// declaration-specifier:
//   storage-class-specifier
//   type-specifier
//   type-qualifier
//   function-specifier
//   alignment-specifier

fn parser_declaration_specifier(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    one_of!(
        parser,
        begin,
        end,
        "declaration specifier",
        parser_storage_class_specifier,
        parser_type_specifier,
        parser_type_qualifier,
        parser_function_specifier,
        parser_alignment_specifier,
    )
}

// declaration-specifiers:
//   declaration-specifier+

fn parser_declaration_specifiers(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    let result = parser_one_many_of(parser, begin, end, "declaration specifiers", parser_declaration_specifier);
    let mut decl_specs = ParserState::Success(None);

    if result.state.is_success() {
        add_node(&mut decl_specs, SyntaxTree::with_type(NodeType::DeclarationSpecifiers));
    }

    add_state(&mut decl_specs, result.state);

    ParserResult::new(result.next, decl_specs)
}

// declaration:
//   declaration-specifiers init-declarator-list ';'
//   declaration-specifiers ';'
//   static-assert-declaration

fn parser_declaration(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin != end {
        if parser.kind(begin) == TokenKind::StaticAssert {
            return parser_static_assert_declaration(parser, begin, end);
        }

        let specs = parser_declaration_specifiers(parser, begin, end);

        if !is_giveup(&specs.state) {
            let mut declaration = ParserState::Success(None);
            let specs_it = specs.next;
            let mut it = specs_it;

            add_node(&mut declaration, SyntaxTree::with_type(NodeType::Declaration));
            add_state(&mut declaration, specs.state);

            if specs_it != end && parser.kind(specs_it) != TokenKind::Semicolon {
                let init_list = parser_init_declarator_list(parser, specs_it, end);
                it = init_list.next;
                add_state(&mut declaration, giveup_to_expected(parser, init_list.state, None));
            }

            if expect_token(parser, &mut declaration, it, end, TokenKind::Semicolon) {
                it += 1;
            }

            return ParserResult::new(it, declaration);
        }
    }

    ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "declaration"))
}

// enumeration-constant:
//   identifier

fn parser_enumeration_constant(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    // TODO: register enumerators in a symbol table once semantic analysis
    // lands.

    if begin != end && parser.kind(begin) == TokenKind::Identifier {
        let tree = SyntaxTree::with_token(NodeType::Enumerator, parser.token(begin));
        return ParserResult::new(begin + 1, ParserState::Success(Some(Box::new(tree))));
    }

    ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "enumerator"))
}

// enum-specifier:
//   'enum' identifier? '{' enumerator-list ','? '}'
//    -> ^(EnumSpecifier identifier? enumerator+)
//
//   'enum' identifier
//    -> ^(EnumSpecifier identifier)

fn parser_enum_specifier(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    // enumerator:
    //   enumeration-constant
    //   enumeration-constant '=' constant-expression
    fn enumerator(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        if begin != end && parser.kind(begin) == TokenKind::Identifier {
            let result = parser_enumeration_constant(parser, begin, end);
            let mut it = result.next;
            let mut enumerator = result.state;

            if it != end && parser.kind(it) == TokenKind::Assign {
                let const_expr = parser_constant_expression(parser, it + 1, end);
                add_state(
                    &mut enumerator,
                    giveup_to_expected(parser, const_expr.state, Some("constant expression")),
                );
                it = const_expr.next;
            }

            return ParserResult::new(it, enumerator);
        }

        ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "enumerator"))
    }

    if begin != end && parser.kind(begin) == TokenKind::Enum {
        // '{' enumerator-list ','? '}'
        let enum_list_production =
            parser_parens(parser_list_of(enumerator, true), TokenKind::LBrace, TokenKind::RBrace);

        let mut enum_spec =
            ParserState::Success(Some(Box::new(SyntaxTree::with_token(NodeType::EnumSpecifier, parser.token(begin)))));
        let mut it = begin + 1;

        if it != end {
            if parser.kind(it) == TokenKind::Identifier {
                let identifier = parser_identifier(parser, it, end);
                add_state(&mut enum_spec, identifier.state);
                it = identifier.next;

                if it != end && parser.kind(it) == TokenKind::LBrace {
                    let enum_list = enum_list_production.parse(parser, it, end);
                    add_state(&mut enum_spec, giveup_to_expected(parser, enum_list.state, None));
                    it = enum_list.next;
                }
            } else if parser.kind(it) == TokenKind::LBrace {
                let enum_list = enum_list_production.parse(parser, it, end);
                add_state(&mut enum_spec, giveup_to_expected(parser, enum_list.state, None));
                it = enum_list.next;
            } else {
                add_error(&mut enum_spec, ParserError::new(ParserStatus::Error, it, "expected identifier or '{'"));
                add_error(
                    &mut enum_spec,
                    ParserError::new(ParserStatus::ErrorNote, begin, "for this enumerator specifier"),
                );
            }

            if parser.is_inside_specifiers
                && enum_spec.is_success()
                && it != end
                && parser.kind(it) != TokenKind::Semicolon
                && !parser_is_declarator(parser, it, end)
            {
                add_error(
                    &mut enum_spec,
                    ParserError::new(ParserStatus::Error, it - 1, "missing ';' after enumerator declaration"),
                );
            }

            return ParserResult::new(it, enum_spec);
        }
    }

    ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "enumerator specifier"))
}

// struct-declarator:
//   declarator                           -> ^(StructDeclarator declarator)
//   declarator? ':' constant-expression  -> ^(StructDeclarator declarator? constant-expression)

#[derive(Clone, Copy)]
struct StructDeclarator {
    keyword: &'static str,
}

impl Rule for StructDeclarator {
    fn parse(&self, parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        if begin != end {
            let mut struct_decl = ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::StructDeclarator))));
            let mut it = begin;

            if parser.kind(begin) != TokenKind::Colon {
                let declarator = parser_declarator(parser, begin, end);
                add_state(&mut struct_decl, giveup_to_expected(parser, declarator.state, Some("declarator")));
                it = declarator.next;

                if it != end && parser.kind(it) == TokenKind::Colon {
                    let const_expr = parser_constant_expression(parser, it + 1, end);
                    add_state(
                        &mut struct_decl,
                        giveup_to_expected(parser, const_expr.state, Some("constant expression")),
                    );
                    it = const_expr.next;
                }
            } else {
                let const_expr = parser_constant_expression(parser, it + 1, end);
                add_state(
                    &mut struct_decl,
                    giveup_to_expected(parser, const_expr.state, Some("constant expression")),
                );
                it = const_expr.next;
            }

            return ParserResult::new(it, struct_decl);
        }

        ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, format!("{} declarator", self.keyword)))
    }
}

// struct-declaration:
//   specifier-qualifier-list struct-declarator-list? ';'
//   static-assert-declaration

#[derive(Clone, Copy)]
struct StructDeclaration {
    keyword: &'static str,
}

impl Rule for StructDeclaration {
    fn parse(&self, parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        if begin != end {
            if parser.kind(begin) == TokenKind::StaticAssert {
                return parser_static_assert_declaration(parser, begin, end);
            }

            let mut struct_decl = ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::StructDeclaration))));

            let specs = parser_specifier_qualifier_list(parser, begin, end);
            let specs_it = specs.next;
            let mut it = specs_it;
            add_state(
                &mut struct_decl,
                giveup_to_expected(parser, specs.state, Some("specifier qualifier list")),
            );

            let decl_list = parser_list_of(StructDeclarator { keyword: self.keyword }, false).parse(parser, specs_it, end);

            if decl_list.state.is_success() {
                add_state(&mut struct_decl, decl_list.state);
                it = decl_list.next;
            }

            if expect_token(parser, &mut struct_decl, it, end, TokenKind::Semicolon) {
                it += 1;
            }

            return ParserResult::new(it, struct_decl);
        }

        ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, format!("{} declaration", self.keyword)))
    }
}

// struct-declaration-list:
//   struct-declaration
//   struct-declaration-list struct-declaration

#[derive(Clone, Copy)]
struct StructDeclarationList {
    keyword: &'static str,
}

impl Rule for StructDeclarationList {
    fn parse(&self, parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        parser_one_many_of_pred(
            parser,
            begin,
            end,
            &format!("{} declaration list", self.keyword),
            StructDeclaration { keyword: self.keyword },
            |t| t.kind != TokenKind::RBrace,
        )
    }
}

// struct-or-union-specifier:
//   struct-or-union identifier? '{' struct-declaration-list '}'
//    -> ^(StructOrUnionSpecifier identifier? struct-declaration+)
//
//   struct-or-union identifier
//    -> ^(StructOrUnionSpecifier identifier)

fn parser_struct_or_union_specifier(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin != end && matches!(parser.kind(begin), TokenKind::Struct | TokenKind::Union) {
        let keyword = if parser.kind(begin) == TokenKind::Struct { "struct" } else { "union" };

        // '{' struct-declaration-list '}'
        let struct_decl_list_production =
            parser_parens(StructDeclarationList { keyword }, TokenKind::LBrace, TokenKind::RBrace);

        let mut struct_spec =
            ParserState::Success(Some(Box::new(SyntaxTree::with_token(NodeType::StructOrUnionSpecifier, parser.token(begin)))));
        let mut it = begin + 1;

        if it != end {
            if parser.kind(it) == TokenKind::Identifier {
                let identifier = parser_identifier(parser, it, end);
                add_state(&mut struct_spec, identifier.state);
                it = identifier.next;

                if it != end && parser.kind(it) == TokenKind::LBrace {
                    let decl_list = struct_decl_list_production.parse(parser, it, end);
                    add_state(&mut struct_spec, giveup_to_expected(parser, decl_list.state, None));
                    it = decl_list.next;
                }
            } else if parser.kind(it) == TokenKind::LBrace {
                let decl_list = struct_decl_list_production.parse(parser, it, end);
                add_state(&mut struct_spec, giveup_to_expected(parser, decl_list.state, None));
                it = decl_list.next;
            } else {
                add_error(&mut struct_spec, ParserError::new(ParserStatus::Error, it, "expected identifier or '{'"));
                add_error(
                    &mut struct_spec,
                    ParserError::new(ParserStatus::ErrorNote, begin, format!("for this {} specifier", keyword)),
                );
            }

            if parser.is_inside_specifiers
                && struct_spec.is_success()
                && it != end
                && parser.kind(it) != TokenKind::Semicolon
                && !parser_is_declarator(parser, it, end)
            {
                add_error(
                    &mut struct_spec,
                    ParserError::new(
                        ParserStatus::Error,
                        it - 1,
                        format!("missing ';' after {} declaration", keyword),
                    ),
                );
            }

            return ParserResult::new(it, struct_spec);
        }
    }

    ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "struct or union specifier"))
}

// initializer:
//   assignment-expression
//   '{' initializer-list '}'
//   '{' initializer-list ',' '}'

fn parser_initializer(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin != end {
        if parser.kind(begin) == TokenKind::LBrace {
            return parser_parens(parser_initializer_list, TokenKind::LBrace, TokenKind::RBrace).parse(parser, begin, end);
        } else {
            return parser_assignment_expression(parser, begin, end);
        }
    }

    ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "initializer"))
}

// initializer-list:
//   designation? initializer
//   initializer-list ',' designation? initializer

fn parser_initializer_list(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    // designator:
    //   '[' constant-expression ']' -> ^(ArraySubscripting constant-expression)
    //   '.' identifier              -> ^(MemberAccess identifier)
    fn designator(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        if begin != end {
            if parser.kind(begin) == TokenKind::LBracket {
                let subscript = parser_parens(parser_constant_expression, TokenKind::LBracket, TokenKind::RBracket)
                    .parse(parser, begin, end);

                let mut designator = ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::ArraySubscripting))));
                add_state(&mut designator, subscript.state);

                return ParserResult::new(subscript.next, designator);
            } else if parser.kind(begin) == TokenKind::Dot {
                let identifier = parser_identifier(parser, begin + 1, end);

                let mut designator = ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::MemberAccess))));
                add_state(
                    &mut designator,
                    giveup_to_expected(parser, identifier.state, Some("identifier for designator")),
                );

                return ParserResult::new(identifier.next, designator);
            }
        }

        ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "designator"))
    }

    // designation:
    //   designator+ '='
    fn designation(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        if begin != end {
            let mut state = ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::Designation))));

            let first = designator(parser, begin, end);
            let mut it = first.next;

            if !is_giveup(&first.state) {
                add_state(&mut state, giveup_to_expected(parser, first.state, Some("designator")));

                while it != end && parser.kind(it) != TokenKind::Assign {
                    let next = designator(parser, it, end);

                    if is_giveup(&next.state) {
                        // missing assignment operator
                        add_error(
                            &mut state,
                            ParserError::new(ParserStatus::Error, it, "expected assignment operator for designator"),
                        );
                        break;
                    }

                    add_state(&mut state, giveup_to_expected(parser, next.state, Some("designator")));
                    it = next.next;
                }

                if it != end && parser.kind(it) == TokenKind::Assign {
                    return ParserResult::new(it + 1, state);
                } else {
                    return ParserResult::new(it, state);
                }
            }
        }

        ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "designation"))
    }

    // designation? initializer
    fn init_list_element(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        if begin != end {
            let mut element = ParserState::Success(None);
            let designation_result = designation(parser, begin, end);
            let it;

            if !is_giveup(&designation_result.state) {
                let initializer = parser_initializer(parser, designation_result.next, end);

                add_state(&mut element, designation_result.state);
                add_state(&mut element, giveup_to_expected(parser, initializer.state, Some("initializer")));
                it = initializer.next;
            } else {
                let initializer = parser_initializer(parser, begin, end);
                add_state(&mut element, initializer.state);
                it = initializer.next;
            }

            return ParserResult::new(it, element);
        }

        ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "initializer list"))
    }

    let result = parser_list_of(init_list_element, true).parse(parser, begin, end);

    if !is_giveup(&result.state) {
        let mut init_list = ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::InitializerList))));
        add_state(&mut init_list, result.state);

        return ParserResult::new(result.next, init_list);
    }

    ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "initializer list"))
}

// postfix-expression:
//   primary-expression
//   compound-literal
//   postfix-expression '[' expression ']'   -> ^(ArraySubscripting expression postfix-expr)
//   postfix-expression '(' argument-expression-list? ')'
//                                           -> ^(FunctionCall arguments? postfix-expr)
//   postfix-expression '.' identifier       -> ^(MemberAccess ident postfix-expr)
//   postfix-expression '->' identifier      -> ^(PointerMemberAccess ident postfix-expr)
//   postfix-expression '++'                 -> ^(PostfixIncrement postfix-expr)
//   postfix-expression '--'                 -> ^(PostfixDecrement postfix-expr)
//
// compound-literal:
//   '(' type-name ')' '{' initializer-list ','? '}'

fn parser_postfix_expression(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    fn compound_literal(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        if begin != end {
            let type_name = parser_parens(parser_type_name, TokenKind::LParen, TokenKind::RParen).parse(parser, begin, end);

            if !is_giveup(&type_name.state) {
                let init_list = parser_parens(parser_initializer_list, TokenKind::LBrace, TokenKind::RBrace)
                    .parse(parser, type_name.next, end);

                if !is_giveup(&init_list.state) {
                    let mut literal = ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::CompoundLiteral))));
                    add_state(&mut literal, type_name.state);
                    add_state(&mut literal, init_list.state);

                    return ParserResult::new(init_list.next, literal);
                }
            }
        }

        ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "compound literal"))
    }

    // one postfix operator application; the accumulated expression is added
    // behind the operator's own operands
    fn postfix_operator(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        if begin == end {
            return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "postfix operator"));
        }

        match parser.kind(begin) {
            // '[' expression ']'
            TokenKind::LBracket => {
                let expression = parser_expression(parser, begin + 1, end);
                let mut expr_state = expression.state;

                if expect_end_token(parser, &mut expr_state, begin, end, expression.next, TokenKind::RBracket) {
                    let mut postfix_op =
                        ParserState::Success(Some(Box::new(SyntaxTree::with_token(NodeType::ArraySubscripting, parser.token(begin)))));

                    add_state(&mut postfix_op, giveup_to_expected(parser, expr_state, Some("expression")));

                    ParserResult::new(expression.next + 1, postfix_op)
                } else {
                    ParserResult::new(expression.next, expr_state)
                }
            }

            // '(' argument-expression-list? ')'
            TokenKind::LParen => {
                let mut postfix_op =
                    ParserState::Success(Some(Box::new(SyntaxTree::with_token(NodeType::FunctionCall, parser.token(begin)))));

                if begin + 1 != end && parser.kind(begin + 1) == TokenKind::RParen {
                    // empty argument list
                    return ParserResult::new(begin + 2, postfix_op);
                }

                let arg_list = parser_parens(
                    parser_list_of(parser_assignment_expression, false),
                    TokenKind::LParen,
                    TokenKind::RParen,
                )
                .parse(parser, begin, end);

                let mut arguments =
                    ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::ArgumentExpressionList))));

                add_state(&mut arguments, giveup_to_expected(parser, arg_list.state, Some("argument list")));
                add_state(&mut postfix_op, arguments);

                ParserResult::new(arg_list.next, postfix_op)
            }

            // '.' identifier / '->' identifier
            TokenKind::Dot | TokenKind::Arrow => {
                let node_type = if parser.kind(begin) == TokenKind::Dot {
                    NodeType::MemberAccess
                } else {
                    NodeType::PointerMemberAccess
                };

                let identifier = parser_identifier(parser, begin + 1, end);

                let mut postfix_op =
                    ParserState::Success(Some(Box::new(SyntaxTree::with_token(node_type, parser.token(begin)))));

                add_state(&mut postfix_op, giveup_to_expected(parser, identifier.state, None));

                ParserResult::new(identifier.next, postfix_op)
            }

            // '++' / '--'
            TokenKind::Increment | TokenKind::Decrement => {
                let node_type = if parser.kind(begin) == TokenKind::Increment {
                    NodeType::PostfixIncrement
                } else {
                    NodeType::PostfixDecrement
                };

                let tree = SyntaxTree::with_token(node_type, parser.token(begin));
                ParserResult::new(begin + 1, ParserState::Success(Some(Box::new(tree))))
            }

            _ => ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "postfix operator")),
        }
    }

    if begin == end {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "postfix expression"));
    }

    let head = one_of!(
        parser,
        begin,
        end,
        "compound literal or expression",
        compound_literal,
        parser_primary_expression,
    );
    let mut it = head.next;
    let mut expr = head.state;

    if is_giveup(&expr) {
        return ParserResult::new(end, expr);
    }

    loop {
        let op = postfix_operator(parser, it, end);

        if is_giveup(&op.state) {
            break;
        }

        let mut postfix_op = op.state;
        add_state(&mut postfix_op, expr);
        expr = postfix_op;
        it = op.next;
    }

    ParserResult::new(it, expr)
}

// unary-expression:
//   postfix-expression
//   '++' unary-expression
//   '--' unary-expression
//   unary-operator cast-expression
//   'sizeof' unary-expression
//   'sizeof' '(' type-name ')'
//   '_Alignof' '(' type-name ')'
//
// unary-operator: one of
//   & * + - ~ !

fn parser_unary_expression(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    // '++' unary-expression / '--' unary-expression
    fn incremental_unary(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        let incremental_operator = parser_operator(NodeType::UnaryExpression, |kind| {
            matches!(kind, TokenKind::Increment | TokenKind::Decrement)
        });

        let incr = incremental_operator.parse(parser, begin, end);
        if !is_giveup(&incr.state) {
            let mut incr_op = incr.state;
            let unary = parser_unary_expression(parser, incr.next, end);
            add_state(&mut incr_op, giveup_to_expected(parser, unary.state, Some("unary expression")));

            return ParserResult::new(unary.next, incr_op);
        }

        ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "unary operator"))
    }

    // unary-operator cast-expression
    fn unary_cast(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        let unary_operator = parser_operator(NodeType::UnaryExpression, |kind| {
            matches!(
                kind,
                TokenKind::BitAnd | TokenKind::Tilde | TokenKind::Star | TokenKind::Plus | TokenKind::Minus | TokenKind::Bang
            )
        });

        let unary = unary_operator.parse(parser, begin, end);
        if !is_giveup(&unary.state) {
            let mut unary_op = unary.state;
            let cast = parser_cast_expression(parser, unary.next, end);
            add_state(&mut unary_op, cast.state);

            return ParserResult::new(cast.next, unary_op);
        }

        ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "basic unary expression"))
    }

    // '(' type-name ')'; the close is only taken once the type name fully
    // parsed
    fn parens_type_name(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        if begin != end && parser.kind(begin) == TokenKind::LParen {
            let type_name = parser_type_name(parser, begin + 1, end);
            let mut it = type_name.next;
            let mut state = type_name.state;

            if state.is_success() && expect_end_token(parser, &mut state, begin, end, it, TokenKind::RParen) {
                it += 1;
            }

            return ParserResult::new(it, state);
        }

        ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "type name inside parentheses"))
    }

    // 'sizeof' unary-expression | 'sizeof' '(' type-name ')' | '_Alignof' '(' type-name ')'
    fn size_of(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        if begin != end && parser.kind(begin) == TokenKind::Sizeof {
            let result = one_of!(
                parser,
                begin + 1,
                end,
                "type name, or unary expression",
                parens_type_name,
                parser_unary_expression,
            );

            let mut sizeof_op =
                ParserState::Success(Some(Box::new(SyntaxTree::with_token(NodeType::UnaryExpression, parser.token(begin)))));

            add_state(
                &mut sizeof_op,
                giveup_to_expected(parser, result.state, Some("unary expression or type name inside parentheses")),
            );

            return ParserResult::new(result.next, sizeof_op);
        } else if begin != end && parser.kind(begin) == TokenKind::Alignof {
            let type_name = parens_type_name(parser, begin + 1, end);

            let mut alignof_op =
                ParserState::Success(Some(Box::new(SyntaxTree::with_token(NodeType::UnaryExpression, parser.token(begin)))));

            add_state(
                &mut alignof_op,
                giveup_to_expected(parser, type_name.state, Some("type name inside parentheses")),
            );

            return ParserResult::new(type_name.next, alignof_op);
        }

        ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "sizeof/alignof expression"))
    }

    if begin == end {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "unary expression"));
    }

    one_of!(
        parser,
        begin,
        end,
        "unary expression",
        parser_postfix_expression,
        incremental_unary,
        size_of,
        unary_cast,
    )
}

// cast-expression:
//   unary-expression
//   '(' type-name ')' cast-expression
//
// '(' type-name ')' followed by '{' is a compound literal, not a cast.

fn parser_cast_expression(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    fn cast(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        if begin != end && parser.kind(begin) == TokenKind::LParen {
            let type_name = parser_type_name(parser, begin + 1, end);

            if !is_giveup(&type_name.state) {
                let mut type_name_state = type_name.state;

                if expect_end_token(parser, &mut type_name_state, begin, end, type_name.next, TokenKind::RParen) {
                    let cast_expr = parser_cast_expression(parser, type_name.next + 1, end);

                    // not a compound literal
                    if cast_expr.next != end && parser.kind(cast_expr.next) != TokenKind::LBrace {
                        let mut cast_state = ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::CastExpression))));

                        add_state(&mut cast_state, type_name_state);
                        add_state(&mut cast_state, giveup_to_expected(parser, cast_expr.state, Some("cast expression")));

                        return ParserResult::new(cast_expr.next, cast_state);
                    }
                }
            }
        }

        ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "cast expression"))
    }

    one_of!(
        parser,
        begin,
        end,
        "cast or unary expression",
        cast,
        parser_unary_expression,
    )
}

// multiplicative-expression:
//   cast-expression
//   multiplicative-expression ('*' | '/' | '%') cast-expression

fn parser_multiplicative_expression(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin == end {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "multiplicative expression"));
    }

    let multiplicative_operator = parser_operator(NodeType::MultiplicativeExpression, |kind| {
        matches!(kind, TokenKind::Star | TokenKind::Slash | TokenKind::Percent)
    });

    parser_left_binary_operator(parser_cast_expression, multiplicative_operator, parser_cast_expression)
        .parse(parser, begin, end)
}

// additive-expression:
//   multiplicative-expression
//   additive-expression ('+' | '-') multiplicative-expression

fn parser_additive_expression(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin == end {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "additive expression"));
    }

    let additive_operator = parser_operator(NodeType::AdditiveExpression, |kind| {
        matches!(kind, TokenKind::Plus | TokenKind::Minus)
    });

    parser_left_binary_operator(parser_multiplicative_expression, additive_operator, parser_multiplicative_expression)
        .parse(parser, begin, end)
}

// shift-expression:
//   additive-expression
//   shift-expression ('<<' | '>>') additive-expression

fn parser_shift_expression(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin == end {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "shift expression"));
    }

    let shift_operator = parser_operator(NodeType::ShiftExpression, |kind| {
        matches!(kind, TokenKind::LShift | TokenKind::RShift)
    });

    parser_left_binary_operator(parser_additive_expression, shift_operator, parser_additive_expression)
        .parse(parser, begin, end)
}

// relational-expression:
//   shift-expression
//   relational-expression ('<' | '>' | '<=' | '>=') shift-expression

fn parser_relational_expression(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin == end {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "relational expression"));
    }

    let relational_operator = parser_operator(NodeType::RelationalExpression, |kind| {
        matches!(kind, TokenKind::Lt | TokenKind::Gt | TokenKind::Leq | TokenKind::Geq)
    });

    parser_left_binary_operator(parser_shift_expression, relational_operator, parser_shift_expression)
        .parse(parser, begin, end)
}

// equality-expression:
//   relational-expression
//   equality-expression ('==' | '!=') relational-expression

fn parser_equality_expression(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin == end {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "equality expression"));
    }

    let equality_operator = parser_operator(NodeType::EqualityExpression, |kind| {
        matches!(kind, TokenKind::Eq | TokenKind::Neq)
    });

    parser_left_binary_operator(parser_relational_expression, equality_operator, parser_relational_expression)
        .parse(parser, begin, end)
}

// and-expression:
//   equality-expression
//   and-expression '&' equality-expression

fn parser_and_expression(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin == end {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "and expression"));
    }

    let and_operator = parser_operator(NodeType::AndExpression, |kind| kind == TokenKind::BitAnd);

    parser_left_binary_operator(parser_equality_expression, and_operator, parser_equality_expression)
        .parse(parser, begin, end)
}

// exclusive-or-expression:
//   and-expression
//   exclusive-or-expression '^' and-expression

fn parser_exclusive_or_expression(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin == end {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "exclusive or expression"));
    }

    let exclusive_or_operator = parser_operator(NodeType::ExclusiveOrExpression, |kind| kind == TokenKind::Xor);

    parser_left_binary_operator(parser_and_expression, exclusive_or_operator, parser_and_expression)
        .parse(parser, begin, end)
}

// inclusive-or-expression:
//   exclusive-or-expression
//   inclusive-or-expression '|' exclusive-or-expression

fn parser_inclusive_or_expression(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin == end {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "inclusive or expression"));
    }

    let inclusive_or_operator = parser_operator(NodeType::InclusiveOrExpression, |kind| kind == TokenKind::BitOr);

    parser_left_binary_operator(parser_exclusive_or_expression, inclusive_or_operator, parser_exclusive_or_expression)
        .parse(parser, begin, end)
}

// logical-and-expression:
//   inclusive-or-expression
//   logical-and-expression '&&' inclusive-or-expression

fn parser_logical_and_expression(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin == end {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "logical and expression"));
    }

    let logical_and_operator = parser_operator(NodeType::LogicalAndExpression, |kind| kind == TokenKind::And);

    parser_left_binary_operator(parser_inclusive_or_expression, logical_and_operator, parser_inclusive_or_expression)
        .parse(parser, begin, end)
}

// logical-or-expression:
//   logical-and-expression
//   logical-or-expression '||' logical-and-expression

fn parser_logical_or_expression(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin == end {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "logical or expression"));
    }

    let logical_or_operator = parser_operator(NodeType::LogicalOrExpression, |kind| kind == TokenKind::Or);

    parser_left_binary_operator(parser_logical_and_expression, logical_or_operator, parser_logical_and_expression)
        .parse(parser, begin, end)
}

// conditional-expression:
//   logical-or-expression ('?' expression ':' conditional-expression)?

fn parser_conditional_expression(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin == end {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "conditional expression"));
    }

    let or_expr = parser_logical_or_expression(parser, begin, end);
    let or_it = or_expr.next;

    if is_giveup(&or_expr.state) {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "conditional expression"));
    }

    if or_it != end && parser.kind(or_it) == TokenKind::Question {
        let ternary_op_it = or_it;

        let mut condition = ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::ConditionalExpression))));
        add_state(&mut condition, or_expr.state);

        let true_expr = parser_expression(parser, ternary_op_it + 1, end);
        add_state(&mut condition, giveup_to_expected(parser, true_expr.state, Some("expression")));

        if expect_end_token(parser, &mut condition, ternary_op_it, end, true_expr.next, TokenKind::Colon) {
            let false_expr = parser_conditional_expression(parser, true_expr.next + 1, end);
            add_state(&mut condition, giveup_to_expected(parser, false_expr.state, Some("expression")));

            return ParserResult::new(false_expr.next, condition);
        } else {
            return ParserResult::new(true_expr.next, condition);
        }
    }

    ParserResult::new(or_it, or_expr.state)
}

// assignment-expression:
//   conditional-expression
//   unary-expression assignment-operator assignment-expression
//
// assignment-operator: one of
//   = *= /= %= += -= <<= >>= &= ^= |=

fn parser_assignment_expression(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin == end {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "assignment expression"));
    }

    let assign_operator = parser_operator(NodeType::AssignmentExpression, |kind| {
        matches!(
            kind,
            TokenKind::Assign
                | TokenKind::MultAssign
                | TokenKind::DivAssign
                | TokenKind::ModAssign
                | TokenKind::AddAssign
                | TokenKind::SubAssign
                | TokenKind::LShiftAssign
                | TokenKind::RShiftAssign
                | TokenKind::AndAssign
                | TokenKind::XorAssign
                | TokenKind::OrAssign
        )
    });

    let assignment = parser_right_binary_operator(parser_unary_expression, assign_operator, parser_assignment_expression);

    one_of!(
        parser,
        begin,
        end,
        "assignment or conditional expression",
        assignment,
        parser_conditional_expression,
    )
}

// expression:
//   assignment-expression
//   expression ',' assignment-expression

fn parser_expression(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin == end {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "expression"));
    }

    let comma_operator = parser_operator(NodeType::Expression, |kind| kind == TokenKind::Comma);

    parser_left_binary_operator(parser_assignment_expression, comma_operator, parser_assignment_expression)
        .parse(parser, begin, end)
}

// primary-expression:
//   identifier
//   constant
//   string-literal+
//   '(' expression ')'

fn parser_primary_expression(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    fn parens_expr(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        if begin != end && parser.kind(begin) == TokenKind::LParen {
            let expr = parser_expression(parser, begin + 1, end);
            let mut it = expr.next;
            let mut state = expr.state;

            if !is_giveup(&state) && expect_end_token(parser, &mut state, begin, end, it, TokenKind::RParen) {
                it += 1;
            }

            return ParserResult::new(it, giveup_to_expected(parser, state, Some("expression")));
        }

        ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "expression"))
    }

    one_of!(
        parser,
        begin,
        end,
        "primary expression",
        parser_identifier,
        parser_constant,
        parser_string_literal_list,
        parens_expr,
    )
}

// statement:
//   labeled-statement
//   compound-statement
//   expression-statement
//   selection-statement
//   iteration-statement
//   jump-statement

fn parser_statement(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    one_of!(
        parser,
        begin,
        end,
        "statement",
        parser_labeled_statement,
        parser_compound_statement,
        parser_expression_statement,
        parser_selection_statement,
        parser_iteration_statement,
        parser_jump_statement,
    )
}

// jump-statement:
//   'goto' identifier ';'    -> ^(JumpStatement Identifier)
//   'continue' ';'           -> ^(JumpStatement)
//   'break' ';'              -> ^(JumpStatement)
//   'return' expression? ';' -> ^(JumpStatement Expression?)

fn parser_jump_statement(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin != end {
        match parser.kind(begin) {
            TokenKind::Goto => {
                let mut jump_stmt = ParserState::Success(None);
                let identifier = parser_identifier(parser, begin + 1, end);
                let mut it = identifier.next;

                if identifier.state.is_success() {
                    add_node(&mut jump_stmt, SyntaxTree::with_token(NodeType::JumpStatement, parser.token(begin)));
                }

                add_state(
                    &mut jump_stmt,
                    giveup_to_expected(parser, identifier.state, Some("label for goto statement")),
                );

                if expect_token(parser, &mut jump_stmt, it, end, TokenKind::Semicolon) {
                    it += 1;
                }

                return ParserResult::new(it, jump_stmt);
            }

            TokenKind::Continue | TokenKind::Break => {
                let mut jump_stmt = ParserState::Success(None);
                let mut it = begin + 1;

                if expect_token(parser, &mut jump_stmt, it, end, TokenKind::Semicolon) {
                    it += 1;
                }

                if jump_stmt.is_success() {
                    add_node(&mut jump_stmt, SyntaxTree::with_token(NodeType::JumpStatement, parser.token(begin)));
                }

                return ParserResult::new(it, jump_stmt);
            }

            TokenKind::Return => {
                let mut jump_stmt =
                    ParserState::Success(Some(Box::new(SyntaxTree::with_token(NodeType::JumpStatement, parser.token(begin)))));
                let expr = parser_expression(parser, begin + 1, end);
                let mut it = begin + 1;

                if !is_giveup(&expr.state) {
                    add_state(&mut jump_stmt, expr.state);
                    it = expr.next;
                }

                if expect_token(parser, &mut jump_stmt, it, end, TokenKind::Semicolon) {
                    it += 1;
                }

                return ParserResult::new(it, jump_stmt);
            }

            _ => {}
        }
    }

    ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "jump statement"))
}

// iteration-statement:
//   'while' '(' expression ')' statement
//    -> ^(IterationStatement Expression Statement)
//
//   'do' statement 'while' '(' expression ')' ';'
//    -> ^(IterationStatement Statement Expression)
//
//   'for' '(' expression? ';' expression? ';' expression? ')' statement
//    -> ^(IterationStatement (Expression|Nothing){3} Statement)
//
//   'for' '(' declaration expression? ';' expression? ')' statement
//    -> ^(IterationStatement Declaration (Expression|Nothing){2} Statement)

fn parser_iteration_statement(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    fn while_statement(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        if begin != end && parser.kind(begin) == TokenKind::While {
            let mut iter_stmt =
                ParserState::Success(Some(Box::new(SyntaxTree::with_token(NodeType::IterationStatement, parser.token(begin)))));
            let mut it = begin + 1;

            let expr = parser_parens(parser_expression, TokenKind::LParen, TokenKind::RParen).parse(parser, it, end);
            add_state(&mut iter_stmt, giveup_to_expected(parser, expr.state, Some("condition for while-clause")));
            it = expr.next;

            let statement = parser_statement(parser, it, end);
            add_state(&mut iter_stmt, giveup_to_expected(parser, statement.state, Some("statement for while-clause")));
            it = statement.next;

            return ParserResult::new(it, iter_stmt);
        }

        ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, ""))
    }

    fn do_while_statement(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        if begin != end && parser.kind(begin) == TokenKind::Do {
            let mut iter_stmt =
                ParserState::Success(Some(Box::new(SyntaxTree::with_token(NodeType::IterationStatement, parser.token(begin)))));
            let mut it = begin + 1;

            let statement = parser_statement(parser, it, end);
            add_state(
                &mut iter_stmt,
                giveup_to_expected(parser, statement.state, Some("statement for do-while-clause")),
            );
            it = statement.next;

            if expect_token(parser, &mut iter_stmt, it, end, TokenKind::While) {
                it += 1;
            }

            let expr = parser_parens(parser_expression, TokenKind::LParen, TokenKind::RParen).parse(parser, it, end);
            add_state(
                &mut iter_stmt,
                giveup_to_expected(parser, expr.state, Some("condition for do-while-clause")),
            );
            it = expr.next;

            if expect_token(parser, &mut iter_stmt, it, end, TokenKind::Semicolon) {
                it += 1;
            }

            return ParserResult::new(it, iter_stmt);
        }

        ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, ""))
    }

    fn for_statement(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        // interior of the for parentheses; omitted clauses leave Nothing
        fn for_clauses(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
            if begin == end {
                return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, ""));
            }

            let mut clauses = ParserState::Success(Some(Box::new(SyntaxTree::new())));
            let mut it = begin;

            // first clause, `for ( here ; ; )`; a declaration eats its own ';'
            let declaration = parser_declaration(parser, it, end);
            if !is_giveup(&declaration.state) {
                add_state(&mut clauses, declaration.state);
                it = declaration.next;
            } else {
                let expr = parser_expression(parser, it, end);
                if !is_giveup(&expr.state) {
                    add_state(&mut clauses, expr.state);
                    it = expr.next;
                } else {
                    add_node(&mut clauses, SyntaxTree::with_type(NodeType::Nothing));
                }

                if expect_token(parser, &mut clauses, it, end, TokenKind::Semicolon) {
                    it += 1;
                }
            }

            // second clause, `for ( ; here ; )`
            let expr = parser_expression(parser, it, end);
            if !is_giveup(&expr.state) {
                add_state(&mut clauses, expr.state);
                it = expr.next;
            } else {
                add_node(&mut clauses, SyntaxTree::with_type(NodeType::Nothing));
            }

            if expect_token(parser, &mut clauses, it, end, TokenKind::Semicolon) {
                it += 1;
            }

            // third clause, `for ( ; ; here )`
            let expr = parser_expression(parser, it, end);
            if !is_giveup(&expr.state) {
                add_state(&mut clauses, expr.state);
                it = expr.next;
            } else {
                add_node(&mut clauses, SyntaxTree::with_type(NodeType::Nothing));
            }

            ParserResult::new(it, clauses)
        }

        if begin != end && parser.kind(begin) == TokenKind::For {
            let mut iter_stmt =
                ParserState::Success(Some(Box::new(SyntaxTree::with_token(NodeType::IterationStatement, parser.token(begin)))));
            let mut it = begin + 1;

            let clauses = parser_parens(for_clauses, TokenKind::LParen, TokenKind::RParen).parse(parser, it, end);
            add_state(
                &mut iter_stmt,
                giveup_to_expected(parser, clauses.state, Some("expressions separated by ';'")),
            );
            it = clauses.next;

            let statement = parser_statement(parser, it, end);
            add_state(&mut iter_stmt, giveup_to_expected(parser, statement.state, Some("statement for for-clause")));
            it = statement.next;

            return ParserResult::new(it, iter_stmt);
        }

        ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, ""))
    }

    if begin == end {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "iteration statement"));
    }

    one_of!(
        parser,
        begin,
        end,
        "iteration statement",
        while_statement,
        do_while_statement,
        for_statement,
    )
}

// selection-statement:
//   'if' '(' expression ')' statement ('else' statement)?
//    -> ^(SelectionStatement Expression Statement Statement?)
//
//   'switch' '(' expression ')' statement
//    -> ^(SelectionStatement Expression Statement)
//
// An 'else' always binds to the nearest preceding 'if'.

fn parser_selection_statement(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    fn if_statement(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        if begin != end && parser.kind(begin) == TokenKind::If {
            let mut if_stmt =
                ParserState::Success(Some(Box::new(SyntaxTree::with_token(NodeType::SelectionStatement, parser.token(begin)))));
            let mut it = begin + 1;

            let expr = parser_parens(parser_expression, TokenKind::LParen, TokenKind::RParen).parse(parser, it, end);
            add_state(&mut if_stmt, giveup_to_expected(parser, expr.state, Some("condition for if-clause")));
            it = expr.next;

            let statement = parser_statement(parser, it, end);
            add_state(&mut if_stmt, giveup_to_expected(parser, statement.state, Some("statement for if-clause")));
            it = statement.next;

            if it != end && parser.kind(it) == TokenKind::Else {
                let else_stmt = parser_statement(parser, it + 1, end);
                add_state(&mut if_stmt, giveup_to_expected(parser, else_stmt.state, Some("statement for else-clause")));
                it = else_stmt.next;
            }

            return ParserResult::new(it, if_stmt);
        }

        ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, ""))
    }

    fn switch_statement(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        if begin != end && parser.kind(begin) == TokenKind::Switch {
            let mut switch_stmt =
                ParserState::Success(Some(Box::new(SyntaxTree::with_token(NodeType::SelectionStatement, parser.token(begin)))));
            let mut it = begin + 1;

            let expr = parser_parens(parser_expression, TokenKind::LParen, TokenKind::RParen).parse(parser, it, end);
            add_state(&mut switch_stmt, giveup_to_expected(parser, expr.state, Some("expression for switch-clause")));
            it = expr.next;

            let statement = parser_statement(parser, it, end);
            add_state(
                &mut switch_stmt,
                giveup_to_expected(parser, statement.state, Some("statement for switch-clause")),
            );
            it = statement.next;

            return ParserResult::new(it, switch_stmt);
        }

        ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, ""))
    }

    if begin == end {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "selection statement"));
    }

    one_of!(
        parser,
        begin,
        end,
        "selection statement",
        if_statement,
        switch_statement,
    )
}

// expression-statement:
//   expression? ';'
//
// A bare ';' is an empty statement and parses to a Nothing leaf.

fn parser_expression_statement(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin != end {
        if parser.kind(begin) == TokenKind::Semicolon {
            let nothing = SyntaxTree::with_token(NodeType::Nothing, parser.token(begin));
            return ParserResult::new(begin + 1, ParserState::Success(Some(Box::new(nothing))));
        } else {
            let expr = parser_expression(parser, begin, end);
            let mut it = expr.next;
            let mut state = expr.state;

            if expect_token(parser, &mut state, it, end, TokenKind::Semicolon) {
                it += 1;
            }

            return ParserResult::new(it, state);
        }
    }

    ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "expression statement"))
}

// compound-statement:
//   '{' block-item-list? '}'
//
// block-item:
//   declaration
//   statement
//
// -> ^(CompoundStatement (Declaration | Statement)*)

fn parser_compound_statement(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    fn block_item(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        one_of!(
            parser,
            begin,
            end,
            "declaration or statement",
            parser_declaration,
            parser_statement,
        )
    }

    fn block_item_list(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        let result = parser_one_many_of(
            parser,
            begin,
            end,
            "list of block items inside compound statement",
            block_item,
        );

        if is_giveup(&result.state) {
            let nothing = SyntaxTree::with_type(NodeType::Nothing);
            return ParserResult::new(begin, ParserState::Success(Some(Box::new(nothing))));
        }

        result
    }

    if begin != end && parser.kind(begin) == TokenKind::LBrace {
        let items = parser_parens(block_item_list, TokenKind::LBrace, TokenKind::RBrace).parse(parser, begin, end);

        let mut compound_stmt = ParserState::Success(None);

        if items.state.is_success() {
            add_node(&mut compound_stmt, SyntaxTree::with_token(NodeType::CompoundStatement, parser.token(begin)));
        }

        add_state(&mut compound_stmt, giveup_to_expected(parser, items.state, None));

        return ParserResult::new(items.next, compound_stmt);
    }

    ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "compound statement"))
}

// labeled-statement:
//   identifier ':' statement
//    -> ^(LabeledStatement(identifier) Statement)
//
//   'case' constant-expression ':' statement
//    -> ^(LabeledStatement ConstantExpression Statement)
//
//   'default' ':' statement
//    -> ^(LabeledStatement Statement)

fn parser_labeled_statement(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin != end {
        if parser.kind(begin) == TokenKind::Case {
            let mut label_stmt = ParserState::Success(None);

            let expr = parser_constant_expression(parser, begin + 1, end);
            let mut expr_it = expr.next;
            let mut expr_state = expr.state;

            if expect_token(parser, &mut expr_state, expr_it, end, TokenKind::Colon) {
                expr_it += 1;
            }

            let statement = parser_statement(parser, expr_it, end);

            if expr_state.is_success() && statement.state.is_success() {
                add_node(&mut label_stmt, SyntaxTree::with_token(NodeType::LabeledStatement, parser.token(begin)));
            }

            add_state(
                &mut label_stmt,
                giveup_to_expected(parser, expr_state, Some("constant expression for case-label")),
            );
            add_state(
                &mut label_stmt,
                giveup_to_expected(parser, statement.state, Some("statement after case-label")),
            );

            return ParserResult::new(statement.next, label_stmt);
        }

        if parser.kind(begin) == TokenKind::Default {
            let mut label_stmt =
                ParserState::Success(Some(Box::new(SyntaxTree::with_token(NodeType::LabeledStatement, parser.token(begin)))));
            let mut it = begin + 1;

            if expect_token(parser, &mut label_stmt, it, end, TokenKind::Colon) {
                it += 1;
            }

            let statement = parser_statement(parser, it, end);

            add_state(
                &mut label_stmt,
                giveup_to_expected(parser, statement.state, Some("statement after default-label")),
            );

            return ParserResult::new(statement.next, label_stmt);
        }

        if parser.kind(begin) == TokenKind::Identifier && begin + 1 != end && parser.kind(begin + 1) == TokenKind::Colon {
            let mut label_stmt = ParserState::Success(None);
            let statement = parser_statement(parser, begin + 2, end);

            if statement.state.is_success() {
                add_node(&mut label_stmt, SyntaxTree::with_token(NodeType::LabeledStatement, parser.token(begin)));
            }

            add_state(
                &mut label_stmt,
                giveup_to_expected(parser, statement.state, Some("statement after label")),
            );

            return ParserResult::new(statement.next, label_stmt);
        }
    }

    ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "labeled statement"))
}

// function-definition:
//   declaration-specifiers declarator declaration-list? compound-statement
//    -> ^(FunctionDefinition DeclarationSpecifiers Declarator CompoundStatement DeclarationList?)
//
// declaration-list:
//   declaration+
//
// The declaration-list slot carries K&R-style parameter declarations.

fn parser_function_definition(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    fn declaration_list(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
        let result = parser_one_many_of(parser, begin, end, "declarations", parser_declaration);

        if result.state.is_success() {
            let mut decl_list = ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::DeclarationList))));
            add_state(&mut decl_list, result.state);
            return ParserResult::new(result.next, decl_list);
        }

        result
    }

    if begin == end {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "function definition"));
    }

    let mut func_def = ParserState::Success(None);
    let mut declarations: Option<ParserState> = None;
    let mut it;

    let specs = parser_declaration_specifiers(parser, begin, end);
    it = specs.next;

    if is_giveup(&specs.state) {
        return ParserResult::new(it, specs.state);
    }

    let declarator = parser_declarator(parser, it, end);
    it = declarator.next;

    if is_giveup(&declarator.state) {
        return ParserResult::new(it, declarator.state);
    }

    let decls = declaration_list(parser, it, end);
    if !is_giveup(&decls.state) {
        declarations = Some(decls.state);
        it = decls.next;
    }

    let compound_stmt = parser_compound_statement(parser, it, end);
    it = compound_stmt.next;

    if declarator.state.is_success() && compound_stmt.state.is_success() {
        add_node(&mut func_def, SyntaxTree::with_type(NodeType::FunctionDefinition));
    }

    add_state(&mut func_def, specs.state);
    add_state(&mut func_def, declarator.state);
    add_state(&mut func_def, compound_stmt.state);

    if let Some(declarations) = declarations {
        add_state(&mut func_def, declarations);
    }

    ParserResult::new(it, func_def)
}

// compilation-unit:
//   translation-unit? EOF
//
// external-declaration:
//   function-definition
//   declaration
//   ';'
//
// -> ^(CompilationUnit (FunctionDefinition | Declaration)*)
//
// Stray ';' tokens between external declarations are consumed silently.

fn parser_compilation_unit(parser: &mut ParserContext, begin: TokenIndex, end: TokenIndex) -> ParserResult {
    if begin == end {
        return ParserResult::new(end, make_error(ParserStatus::GiveUp, begin, "compilation unit"));
    }

    let mut compilation_unit = ParserState::Success(Some(Box::new(SyntaxTree::with_type(NodeType::CompilationUnit))));
    let mut it = begin;

    if parser.kind(it) != TokenKind::Eof {
        while it != end {
            if parser.kind(it) == TokenKind::Eof {
                it += 1;
                break;
            } else if parser.kind(it) == TokenKind::Semicolon {
                it += 1;
            } else {
                let result = one_of!(
                    parser,
                    it,
                    end,
                    "external declaration",
                    parser_function_definition,
                    parser_declaration,
                );

                add_state(&mut compilation_unit, giveup_to_expected(parser, result.state, None));
                it = result.next;
            }
        }
    } else {
        it += 1;
    }

    ParserResult::new(it, compilation_unit)
}

impl SyntaxTree {
    /// Parses one translation unit. On success the tree is returned; on
    /// failure every accumulated error and note is emitted to the program
    /// context, in source order, and `None` comes back.
    pub fn parse(program: &mut ProgramContext, tokens: &TokenStream<'_>) -> Option<Box<SyntaxTree>> {
        let mut parser = ParserContext::new(program, tokens);
        let end = parser.tokens.len();

        let result = parser_compilation_unit(&mut parser, 0, end);
        let state = giveup_to_expected(&parser, result.state, None);

        debug_assert_eq!(result.next, end);

        match state {
            ParserState::Success(tree) => tree,
            ParserState::Failure(errors) => {
                for fail in &errors {
                    if fail.at != end {
                        match fail.status {
                            ParserStatus::ErrorNote => parser.note(fail.at, &fail.message),
                            _ => parser.error(fail.at, &fail.message),
                        }
                    }
                }

                None
            }
        }
    }
}
