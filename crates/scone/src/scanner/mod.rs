use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;
use thiserror::Error;

use crate::program::{ProgramContext, TokenDebug};
use crate::source::{SourceManager, SourceRange};

#[cfg(test)]
mod scanner_tests;

/// Every lexeme class the parser can see. Fieldless so tokens stay `Copy`;
/// the spelling is recovered by slicing the source with the token's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // punctuators
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Semicolon,
    Comma,
    Colon,
    Question,
    Dot,
    Arrow,
    Ellipsis,
    Increment,
    Decrement,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    Tilde,
    BitAnd,
    BitOr,
    Xor,
    And,
    Or,
    LShift,
    RShift,
    Lt,
    Gt,
    Leq,
    Geq,
    Eq,
    Neq,
    Assign,
    MultAssign,
    DivAssign,
    ModAssign,
    AddAssign,
    SubAssign,
    LShiftAssign,
    RShiftAssign,
    AndAssign,
    XorAssign,
    OrAssign,

    // keywords
    Auto,
    Break,
    Case,
    Char,
    Const,
    Continue,
    Default,
    Do,
    Double,
    Else,
    Enum,
    Extern,
    Float,
    For,
    Goto,
    If,
    Inline,
    Int,
    Long,
    Register,
    Restrict,
    Return,
    Short,
    Signed,
    Sizeof,
    Static,
    Struct,
    Switch,
    Typedef,
    Union,
    Unsigned,
    Void,
    Volatile,
    While,
    Alignas,
    Alignof,
    Atomic,
    Bool,
    Complex,
    Generic,
    Imaginary,
    Noreturn,
    StaticAssert,
    ThreadLocal,

    // MS/GNU extensions, tolerated as ordinary tokens
    Stdcall,
    Declspec,
    Attribute,
    VectorM128,
    VectorM128d,
    VectorM128i,

    // literals and everything else
    Identifier,
    IntegerConstant,
    OctIntegerConstant,
    HexIntegerConstant,
    FloatConstant,
    CharConstant,
    StringConstant,
    EncodingPrefix,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Question => "?",
            TokenKind::Dot => ".",
            TokenKind::Arrow => "->",
            TokenKind::Ellipsis => "...",
            TokenKind::Increment => "++",
            TokenKind::Decrement => "--",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Bang => "!",
            TokenKind::Tilde => "~",
            TokenKind::BitAnd => "&",
            TokenKind::BitOr => "|",
            TokenKind::Xor => "^",
            TokenKind::And => "&&",
            TokenKind::Or => "||",
            TokenKind::LShift => "<<",
            TokenKind::RShift => ">>",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::Leq => "<=",
            TokenKind::Geq => ">=",
            TokenKind::Eq => "==",
            TokenKind::Neq => "!=",
            TokenKind::Assign => "=",
            TokenKind::MultAssign => "*=",
            TokenKind::DivAssign => "/=",
            TokenKind::ModAssign => "%=",
            TokenKind::AddAssign => "+=",
            TokenKind::SubAssign => "-=",
            TokenKind::LShiftAssign => "<<=",
            TokenKind::RShiftAssign => ">>=",
            TokenKind::AndAssign => "&=",
            TokenKind::XorAssign => "^=",
            TokenKind::OrAssign => "|=",
            TokenKind::Auto => "auto",
            TokenKind::Break => "break",
            TokenKind::Case => "case",
            TokenKind::Char => "char",
            TokenKind::Const => "const",
            TokenKind::Continue => "continue",
            TokenKind::Default => "default",
            TokenKind::Do => "do",
            TokenKind::Double => "double",
            TokenKind::Else => "else",
            TokenKind::Enum => "enum",
            TokenKind::Extern => "extern",
            TokenKind::Float => "float",
            TokenKind::For => "for",
            TokenKind::Goto => "goto",
            TokenKind::If => "if",
            TokenKind::Inline => "inline",
            TokenKind::Int => "int",
            TokenKind::Long => "long",
            TokenKind::Register => "register",
            TokenKind::Restrict => "restrict",
            TokenKind::Return => "return",
            TokenKind::Short => "short",
            TokenKind::Signed => "signed",
            TokenKind::Sizeof => "sizeof",
            TokenKind::Static => "static",
            TokenKind::Struct => "struct",
            TokenKind::Switch => "switch",
            TokenKind::Typedef => "typedef",
            TokenKind::Union => "union",
            TokenKind::Unsigned => "unsigned",
            TokenKind::Void => "void",
            TokenKind::Volatile => "volatile",
            TokenKind::While => "while",
            TokenKind::Alignas => "_Alignas",
            TokenKind::Alignof => "_Alignof",
            TokenKind::Atomic => "_Atomic",
            TokenKind::Bool => "_Bool",
            TokenKind::Complex => "_Complex",
            TokenKind::Generic => "_Generic",
            TokenKind::Imaginary => "_Imaginary",
            TokenKind::Noreturn => "_Noreturn",
            TokenKind::StaticAssert => "_Static_assert",
            TokenKind::ThreadLocal => "_Thread_local",
            TokenKind::Stdcall => "__stdcall",
            TokenKind::Declspec => "__declspec",
            TokenKind::Attribute => "__attribute__",
            TokenKind::VectorM128 => "__m128",
            TokenKind::VectorM128d => "__m128d",
            TokenKind::VectorM128i => "__m128i",
            TokenKind::Identifier => "identifier",
            TokenKind::IntegerConstant => "integer constant",
            TokenKind::OctIntegerConstant => "octal integer constant",
            TokenKind::HexIntegerConstant => "hexadecimal integer constant",
            TokenKind::FloatConstant => "floating constant",
            TokenKind::CharConstant => "character constant",
            TokenKind::StringConstant => "string literal",
            TokenKind::EncodingPrefix => "encoding prefix",
            TokenKind::Eof => "end of file",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: SourceRange,
}

impl Token {
    pub fn new(kind: TokenKind, range: SourceRange) -> Token {
        Token { kind, range }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated character constant")]
    UnterminatedChar,
    #[error("unterminated comment")]
    UnterminatedComment,
    #[error("stray '{0}' in program")]
    StrayCharacter(char),
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenKind> = {
        let mut keywords = HashMap::new();
        keywords.insert("auto", TokenKind::Auto);
        keywords.insert("break", TokenKind::Break);
        keywords.insert("case", TokenKind::Case);
        keywords.insert("char", TokenKind::Char);
        keywords.insert("const", TokenKind::Const);
        keywords.insert("continue", TokenKind::Continue);
        keywords.insert("default", TokenKind::Default);
        keywords.insert("do", TokenKind::Do);
        keywords.insert("double", TokenKind::Double);
        keywords.insert("else", TokenKind::Else);
        keywords.insert("enum", TokenKind::Enum);
        keywords.insert("extern", TokenKind::Extern);
        keywords.insert("float", TokenKind::Float);
        keywords.insert("for", TokenKind::For);
        keywords.insert("goto", TokenKind::Goto);
        keywords.insert("if", TokenKind::If);
        keywords.insert("inline", TokenKind::Inline);
        keywords.insert("int", TokenKind::Int);
        keywords.insert("long", TokenKind::Long);
        keywords.insert("register", TokenKind::Register);
        keywords.insert("restrict", TokenKind::Restrict);
        keywords.insert("return", TokenKind::Return);
        keywords.insert("short", TokenKind::Short);
        keywords.insert("signed", TokenKind::Signed);
        keywords.insert("sizeof", TokenKind::Sizeof);
        keywords.insert("static", TokenKind::Static);
        keywords.insert("struct", TokenKind::Struct);
        keywords.insert("switch", TokenKind::Switch);
        keywords.insert("typedef", TokenKind::Typedef);
        keywords.insert("union", TokenKind::Union);
        keywords.insert("unsigned", TokenKind::Unsigned);
        keywords.insert("void", TokenKind::Void);
        keywords.insert("volatile", TokenKind::Volatile);
        keywords.insert("while", TokenKind::While);
        keywords.insert("_Alignas", TokenKind::Alignas);
        keywords.insert("_Alignof", TokenKind::Alignof);
        keywords.insert("_Atomic", TokenKind::Atomic);
        keywords.insert("_Bool", TokenKind::Bool);
        keywords.insert("_Complex", TokenKind::Complex);
        keywords.insert("_Generic", TokenKind::Generic);
        keywords.insert("_Imaginary", TokenKind::Imaginary);
        keywords.insert("_Noreturn", TokenKind::Noreturn);
        keywords.insert("_Static_assert", TokenKind::StaticAssert);
        keywords.insert("_Thread_local", TokenKind::ThreadLocal);
        keywords.insert("__stdcall", TokenKind::Stdcall);
        keywords.insert("__declspec", TokenKind::Declspec);
        keywords.insert("__attribute__", TokenKind::Attribute);
        keywords.insert("__m128", TokenKind::VectorM128);
        keywords.insert("__m128d", TokenKind::VectorM128d);
        keywords.insert("__m128i", TokenKind::VectorM128i);
        keywords
    };
}

/// All tokens of one translation unit, scanned eagerly. The last token is
/// always `Eof`.
pub struct TokenStream<'src> {
    source: &'src SourceManager,
    tokens: Vec<Token>,
}

impl<'src> TokenStream<'src> {
    pub fn tokenize(program: &mut ProgramContext, source: &'src SourceManager) -> TokenStream<'src> {
        let mut lexer = Lexer {
            program,
            source,
            bytes: source.content().as_bytes(),
            pos: 0,
            tokens: Vec::new(),
        };
        lexer.run();
        TokenStream {
            source,
            tokens: lexer.tokens,
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn source_manager(&self) -> &'src SourceManager {
        self.source
    }
}

struct Lexer<'a> {
    program: &'a mut ProgramContext,
    source: &'a SourceManager,
    bytes: &'a [u8],
    pos: usize,
    tokens: Vec<Token>,
}

fn is_ident_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_' || byte == b'$'
}

fn is_ident_continue(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'$'
}

impl Lexer<'_> {
    fn run(&mut self) {
        loop {
            self.skip_whitespace_and_comments();
            if self.pos >= self.bytes.len() {
                break;
            }
            self.scan_token();
        }
        let at_end = self.bytes.len();
        self.tokens.push(Token::new(TokenKind::Eof, SourceRange::new(at_end, at_end)));
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek(0) {
                Some(byte) if byte.is_ascii_whitespace() => self.pos += 1,
                Some(b'/') if self.peek(1) == Some(b'/') => {
                    while let Some(byte) = self.peek(0) {
                        if byte == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                Some(b'/') if self.peek(1) == Some(b'*') => {
                    let begin = self.pos;
                    self.pos += 2;
                    loop {
                        match self.peek(0) {
                            Some(b'*') if self.peek(1) == Some(b'/') => {
                                self.pos += 2;
                                break;
                            }
                            Some(_) => self.pos += 1,
                            None => {
                                self.report(begin, LexError::UnterminatedComment);
                                break;
                            }
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn scan_token(&mut self) {
        let byte = self.bytes[self.pos];

        if is_ident_start(byte) {
            self.scan_identifier();
        } else if byte.is_ascii_digit() || (byte == b'.' && self.peek(1).is_some_and(|b| b.is_ascii_digit())) {
            self.scan_number();
        } else if byte == b'"' {
            self.scan_string_literal(self.pos);
        } else if byte == b'\'' {
            self.scan_char_literal(self.pos);
        } else {
            self.scan_punctuator();
        }
    }

    fn scan_identifier(&mut self) {
        let begin = self.pos;
        while self.peek(0).is_some_and(is_ident_continue) {
            self.pos += 1;
        }
        let text = &self.source.content()[begin..self.pos];

        // an encoding prefix glued to a string literal is its own token; the
        // same prefixes fold into a character constant
        if self.peek(0) == Some(b'"') && matches!(text, "u8" | "u" | "U" | "L") {
            self.push(TokenKind::EncodingPrefix, begin, self.pos);
            return;
        }
        if self.peek(0) == Some(b'\'') && matches!(text, "u" | "U" | "L") {
            self.scan_char_literal(begin);
            return;
        }

        match KEYWORDS.get(text) {
            Some(&kind) => self.push(kind, begin, self.pos),
            None => self.push(TokenKind::Identifier, begin, self.pos),
        }
    }

    fn scan_number(&mut self) {
        let begin = self.pos;

        if self.peek(0) == Some(b'0') && matches!(self.peek(1), Some(b'x') | Some(b'X')) {
            self.pos += 2;
            while self.peek(0).is_some_and(|b| b.is_ascii_hexdigit()) {
                self.pos += 1;
            }
            // hexadecimal floats carry a mandatory binary exponent
            let mut is_float = false;
            if self.peek(0) == Some(b'.') {
                is_float = true;
                self.pos += 1;
                while self.peek(0).is_some_and(|b| b.is_ascii_hexdigit()) {
                    self.pos += 1;
                }
            }
            if matches!(self.peek(0), Some(b'p') | Some(b'P')) {
                is_float = true;
                self.pos += 1;
                if matches!(self.peek(0), Some(b'+') | Some(b'-')) {
                    self.pos += 1;
                }
                while self.peek(0).is_some_and(|b| b.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
            self.scan_constant_suffix();
            let kind = if is_float {
                TokenKind::FloatConstant
            } else {
                TokenKind::HexIntegerConstant
            };
            self.push(kind, begin, self.pos);
            return;
        }

        let mut is_float = false;
        while self.peek(0).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.peek(0) == Some(b'.') {
            is_float = true;
            self.pos += 1;
            while self.peek(0).is_some_and(|b| b.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        if matches!(self.peek(0), Some(b'e') | Some(b'E')) {
            is_float = true;
            self.pos += 1;
            if matches!(self.peek(0), Some(b'+') | Some(b'-')) {
                self.pos += 1;
            }
            while self.peek(0).is_some_and(|b| b.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        let digits_end = self.pos;
        self.scan_constant_suffix();

        let kind = if is_float {
            TokenKind::FloatConstant
        } else {
            let digits = &self.source.content()[begin..digits_end];
            if digits.len() > 1
                && digits.starts_with('0')
                && digits.bytes().all(|b| (b'0'..=b'7').contains(&b))
            {
                TokenKind::OctIntegerConstant
            } else {
                TokenKind::IntegerConstant
            }
        };
        self.push(kind, begin, self.pos);
    }

    fn scan_constant_suffix(&mut self) {
        while self
            .peek(0)
            .is_some_and(|b| matches!(b, b'u' | b'U' | b'l' | b'L' | b'f' | b'F'))
        {
            self.pos += 1;
        }
    }

    fn scan_string_literal(&mut self, begin: usize) {
        debug_assert_eq!(self.peek(0), Some(b'"'));
        self.pos += 1;
        loop {
            match self.peek(0) {
                Some(b'"') => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') if self.peek(1).is_some() => self.pos += 2,
                Some(b'\n') | None => {
                    self.report(begin, LexError::UnterminatedString);
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }
        self.push(TokenKind::StringConstant, begin, self.pos);
    }

    fn scan_char_literal(&mut self, begin: usize) {
        debug_assert_eq!(self.peek(0), Some(b'\''));
        self.pos += 1;
        loop {
            match self.peek(0) {
                Some(b'\'') => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') if self.peek(1).is_some() => self.pos += 2,
                Some(b'\n') | None => {
                    self.report(begin, LexError::UnterminatedChar);
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }
        self.push(TokenKind::CharConstant, begin, self.pos);
    }

    fn scan_punctuator(&mut self) {
        let begin = self.pos;
        let byte = self.bytes[self.pos];
        let (kind, length) = match byte {
            b'(' => (TokenKind::LParen, 1),
            b')' => (TokenKind::RParen, 1),
            b'[' => (TokenKind::LBracket, 1),
            b']' => (TokenKind::RBracket, 1),
            b'{' => (TokenKind::LBrace, 1),
            b'}' => (TokenKind::RBrace, 1),
            b';' => (TokenKind::Semicolon, 1),
            b',' => (TokenKind::Comma, 1),
            b':' => (TokenKind::Colon, 1),
            b'?' => (TokenKind::Question, 1),
            b'~' => (TokenKind::Tilde, 1),
            b'.' => {
                if self.peek(1) == Some(b'.') && self.peek(2) == Some(b'.') {
                    (TokenKind::Ellipsis, 3)
                } else {
                    (TokenKind::Dot, 1)
                }
            }
            b'+' => match self.peek(1) {
                Some(b'+') => (TokenKind::Increment, 2),
                Some(b'=') => (TokenKind::AddAssign, 2),
                _ => (TokenKind::Plus, 1),
            },
            b'-' => match self.peek(1) {
                Some(b'>') => (TokenKind::Arrow, 2),
                Some(b'-') => (TokenKind::Decrement, 2),
                Some(b'=') => (TokenKind::SubAssign, 2),
                _ => (TokenKind::Minus, 1),
            },
            b'*' => match self.peek(1) {
                Some(b'=') => (TokenKind::MultAssign, 2),
                _ => (TokenKind::Star, 1),
            },
            b'/' => match self.peek(1) {
                Some(b'=') => (TokenKind::DivAssign, 2),
                _ => (TokenKind::Slash, 1),
            },
            b'%' => match self.peek(1) {
                Some(b'=') => (TokenKind::ModAssign, 2),
                _ => (TokenKind::Percent, 1),
            },
            b'!' => match self.peek(1) {
                Some(b'=') => (TokenKind::Neq, 2),
                _ => (TokenKind::Bang, 1),
            },
            b'=' => match self.peek(1) {
                Some(b'=') => (TokenKind::Eq, 2),
                _ => (TokenKind::Assign, 1),
            },
            b'<' => match (self.peek(1), self.peek(2)) {
                (Some(b'<'), Some(b'=')) => (TokenKind::LShiftAssign, 3),
                (Some(b'<'), _) => (TokenKind::LShift, 2),
                (Some(b'='), _) => (TokenKind::Leq, 2),
                _ => (TokenKind::Lt, 1),
            },
            b'>' => match (self.peek(1), self.peek(2)) {
                (Some(b'>'), Some(b'=')) => (TokenKind::RShiftAssign, 3),
                (Some(b'>'), _) => (TokenKind::RShift, 2),
                (Some(b'='), _) => (TokenKind::Geq, 2),
                _ => (TokenKind::Gt, 1),
            },
            b'&' => match self.peek(1) {
                Some(b'&') => (TokenKind::And, 2),
                Some(b'=') => (TokenKind::AndAssign, 2),
                _ => (TokenKind::BitAnd, 1),
            },
            b'|' => match self.peek(1) {
                Some(b'|') => (TokenKind::Or, 2),
                Some(b'=') => (TokenKind::OrAssign, 2),
                _ => (TokenKind::BitOr, 1),
            },
            b'^' => match self.peek(1) {
                Some(b'=') => (TokenKind::XorAssign, 2),
                _ => (TokenKind::Xor, 1),
            },
            other => {
                self.report(begin, LexError::StrayCharacter(other as char));
                self.pos += 1;
                return;
            }
        };
        self.pos += length;
        self.push(kind, begin, self.pos);
    }

    fn push(&mut self, kind: TokenKind, begin: usize, end: usize) {
        self.tokens.push(Token::new(kind, SourceRange::new(begin, end)));
    }

    fn report(&mut self, at: usize, error: LexError) {
        let end = (at + 1).min(self.bytes.len());
        let info = TokenDebug {
            source: self.source,
            pos: self.source.linecol_from_location(at),
            range: SourceRange::new(at, end),
        };
        self.program.error(&info, error.to_string());
    }
}
