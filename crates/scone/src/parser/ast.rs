use std::fmt;

use crate::scanner::Token;
use crate::source::SourceManager;

/// Every production of the C17 grammar this parser can emit, plus the two
/// sentinels: `None` (internal accumulator marker, never part of a finished
/// tree) and `Nothing` (an intentionally empty optional slot).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    PrimaryExpression,
    GenericSelection,
    GenericAssocList,
    GenericAssociation,
    PostfixExpression,
    ArgumentExpressionList,
    UnaryExpression,
    CastExpression,
    MultiplicativeExpression,
    AdditiveExpression,
    ShiftExpression,
    RelationalExpression,
    EqualityExpression,
    AndExpression,
    ExclusiveOrExpression,
    InclusiveOrExpression,
    LogicalAndExpression,
    LogicalOrExpression,
    ConditionalExpression,
    AssignmentExpression,
    Expression,
    ConstantExpression,
    Declaration,
    DeclarationSpecifiers,
    DeclarationSpecifier,
    InitDeclaratorList,
    InitDeclarator,
    StorageClassSpecifier,
    TypeSpecifier,
    StructOrUnionSpecifier,
    StructOrUnion,
    StructDeclarationList,
    StructDeclaration,
    SpecifierQualifierList,
    StructDeclaratorList,
    StructDeclarator,
    EnumSpecifier,
    EnumeratorList,
    Enumerator,
    AtomicTypeSpecifier,
    TypeQualifier,
    FunctionSpecifier,
    AlignmentSpecifier,
    Declarator,
    DirectDeclarator,
    NestedParenthesesBlock,
    Pointer,
    TypeQualifierList,
    ParameterTypeList,
    ParameterList,
    ParameterDeclaration,
    IdentifierList,
    TypeName,
    AbstractDeclarator,
    DirectAbstractDeclarator,
    TypedefName,
    Initializer,
    InitializerList,
    Designation,
    DesignatorList,
    Designator,
    StaticAssertDeclaration,
    Statement,
    LabeledStatement,
    CompoundStatement,
    BlockItemList,
    BlockItem,
    ExpressionStatement,
    SelectionStatement,
    IterationStatement,
    JumpStatement,
    CompilationUnit,
    TranslationUnit,
    ExternalDeclaration,
    FunctionDefinition,
    DeclarationList,
    Identifier,
    Constant,
    IntegerConstant,
    FloatingConstant,
    EnumerationConstant,
    CharacterConstant,
    EncodingPrefix,
    StringLiteral,
    StringLiteralList,
    AsmBlock,
    CompoundLiteral,
    ArraySubscripting,
    FunctionCall,
    MemberAccess,
    PointerMemberAccess,
    PostfixIncrement,
    PostfixDecrement,
    PointerDeclarator,
    ArrayDeclarator,
    ArrayStaticDeclarator,
    ArrayVLADeclarator,
    FunctionDeclarator,
    VariadicParameter,
    Nothing,
    None,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::PrimaryExpression => "primary expression",
            NodeType::GenericSelection => "generic selection",
            NodeType::GenericAssocList => "generic assoc list",
            NodeType::GenericAssociation => "generic association",
            NodeType::PostfixExpression => "postfix expression",
            NodeType::ArgumentExpressionList => "argument expression list",
            NodeType::UnaryExpression => "unary expression",
            NodeType::CastExpression => "cast expression",
            NodeType::MultiplicativeExpression => "multiplicative expression",
            NodeType::AdditiveExpression => "additive expression",
            NodeType::ShiftExpression => "shift expression",
            NodeType::RelationalExpression => "relational expression",
            NodeType::EqualityExpression => "equality expression",
            NodeType::AndExpression => "and expression",
            NodeType::ExclusiveOrExpression => "exclusive or expression",
            NodeType::InclusiveOrExpression => "inclusive or expression",
            NodeType::LogicalAndExpression => "logical and expression",
            NodeType::LogicalOrExpression => "logical or expression",
            NodeType::ConditionalExpression => "conditional expression",
            NodeType::AssignmentExpression => "assignment expression",
            NodeType::Expression => "expression",
            NodeType::ConstantExpression => "constant expression",
            NodeType::Declaration => "declaration",
            NodeType::DeclarationSpecifiers => "declaration specifiers",
            NodeType::DeclarationSpecifier => "declaration specifier",
            NodeType::InitDeclaratorList => "init declarator list",
            NodeType::InitDeclarator => "init declarator",
            NodeType::StorageClassSpecifier => "storage class specifier",
            NodeType::TypeSpecifier => "type specifier",
            NodeType::StructOrUnionSpecifier => "struct or union specifier",
            NodeType::StructOrUnion => "struct or union",
            NodeType::StructDeclarationList => "struct declaration list",
            NodeType::StructDeclaration => "struct declaration",
            NodeType::SpecifierQualifierList => "specifier qualifier list",
            NodeType::StructDeclaratorList => "struct declarator list",
            NodeType::StructDeclarator => "struct declarator",
            NodeType::EnumSpecifier => "enum specifier",
            NodeType::EnumeratorList => "enumerator list",
            NodeType::Enumerator => "enumerator",
            NodeType::AtomicTypeSpecifier => "atomic type specifier",
            NodeType::TypeQualifier => "type qualifier",
            NodeType::FunctionSpecifier => "function specifier",
            NodeType::AlignmentSpecifier => "alignment specifier",
            NodeType::Declarator => "declarator",
            NodeType::DirectDeclarator => "direct declarator",
            NodeType::NestedParenthesesBlock => "nested parentheses block",
            NodeType::Pointer => "pointer",
            NodeType::TypeQualifierList => "type qualifier list",
            NodeType::ParameterTypeList => "parameter type list",
            NodeType::ParameterList => "parameter list",
            NodeType::ParameterDeclaration => "parameter declaration",
            NodeType::IdentifierList => "identifier list",
            NodeType::TypeName => "type name",
            NodeType::AbstractDeclarator => "abstract declarator",
            NodeType::DirectAbstractDeclarator => "direct abstract declarator",
            NodeType::TypedefName => "typedef name",
            NodeType::Initializer => "initializer",
            NodeType::InitializerList => "initializer list",
            NodeType::Designation => "designation",
            NodeType::DesignatorList => "designator list",
            NodeType::Designator => "designator",
            NodeType::StaticAssertDeclaration => "static assert declaration",
            NodeType::Statement => "statement",
            NodeType::LabeledStatement => "labeled statement",
            NodeType::CompoundStatement => "compound statement",
            NodeType::BlockItemList => "block item list",
            NodeType::BlockItem => "block item",
            NodeType::ExpressionStatement => "expression statement",
            NodeType::SelectionStatement => "selection statement",
            NodeType::IterationStatement => "iteration statement",
            NodeType::JumpStatement => "jump statement",
            NodeType::CompilationUnit => "compilation unit",
            NodeType::TranslationUnit => "translation unit",
            NodeType::ExternalDeclaration => "external declaration",
            NodeType::FunctionDefinition => "function definition",
            NodeType::DeclarationList => "declaration list",
            NodeType::Identifier => "identifier",
            NodeType::Constant => "constant",
            NodeType::IntegerConstant => "integer constant",
            NodeType::FloatingConstant => "floating constant",
            NodeType::EnumerationConstant => "enumeration constant",
            NodeType::CharacterConstant => "character constant",
            NodeType::EncodingPrefix => "encoding prefix",
            NodeType::StringLiteral => "string literal",
            NodeType::StringLiteralList => "string literal list",
            NodeType::AsmBlock => "asm block",
            NodeType::CompoundLiteral => "compound literal",
            NodeType::ArraySubscripting => "array subscripting",
            NodeType::FunctionCall => "function call",
            NodeType::MemberAccess => "member access",
            NodeType::PointerMemberAccess => "pointer member access",
            NodeType::PostfixIncrement => "postfix increment",
            NodeType::PostfixDecrement => "postfix decrement",
            NodeType::PointerDeclarator => "pointer declarator",
            NodeType::ArrayDeclarator => "array declarator",
            NodeType::ArrayStaticDeclarator => "array (with static) declarator",
            NodeType::ArrayVLADeclarator => "variable length array declarator",
            NodeType::FunctionDeclarator => "function declarator",
            NodeType::VariadicParameter => "'...' (variadic parameter)",
            NodeType::Nothing => "empty",
            NodeType::None => "none",
        };
        f.write_str(name)
    }
}

/// Opaque handle later passes hang data off of (symbol table or type table
/// index). The parser never attaches one; annotated nodes are exempt from
/// elision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Annotation(pub usize);

/// One node of the parsed tree. A node exclusively owns its children, in
/// source order of their leading token.
#[derive(Debug, PartialEq)]
pub struct SyntaxTree {
    node_type: NodeType,
    token: Option<Token>,
    children: Vec<SyntaxTree>,
    annotation: Option<Annotation>,
}

impl SyntaxTree {
    /// An accumulator node; dissolves into whatever parent it is added to.
    pub(crate) fn new() -> SyntaxTree {
        SyntaxTree::with_type(NodeType::None)
    }

    pub fn with_type(node_type: NodeType) -> SyntaxTree {
        SyntaxTree {
            node_type,
            token: None,
            children: Vec::new(),
            annotation: None,
        }
    }

    pub fn with_token(node_type: NodeType, token: Token) -> SyntaxTree {
        SyntaxTree {
            node_type,
            token: Some(token),
            children: Vec::new(),
            annotation: None,
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn has_text(&self) -> bool {
        self.token.is_some()
    }

    pub fn text<'s>(&self, source: &'s SourceManager) -> Option<&'s str> {
        self.token.map(|token| source.text(token.range))
    }

    pub fn annotation(&self) -> Option<Annotation> {
        self.annotation
    }

    pub fn has_annotation(&self) -> bool {
        self.annotation.is_some()
    }

    pub fn set_annotation(&mut self, annotation: Annotation) {
        self.annotation = Some(annotation);
    }

    pub fn children(&self) -> &[SyntaxTree] {
        &self.children
    }

    pub fn child(&self, index: usize) -> &SyntaxTree {
        &self.children[index]
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn add_child(&mut self, child: SyntaxTree) {
        self.children.push(child);
    }

    /// Moves all of `other`'s children onto `self`, discarding `other`.
    pub fn take_children(&mut self, other: SyntaxTree) {
        self.children.extend(other.children);
    }

    pub fn pop_child(&mut self) -> Option<SyntaxTree> {
        self.children.pop()
    }

    /// Indented dump, one line per node: `<type>[(<text>)][:]`, children at
    /// two more spaces. The trailing `:` marks nodes with children.
    pub fn dump(&self, source: &SourceManager) -> String {
        let mut out = String::new();
        self.dump_at(&mut out, source, 0);
        out
    }

    fn dump_at(&self, out: &mut String, source: &SourceManager, indent_level: usize) {
        for _ in 0..indent_level {
            out.push_str("  ");
        }
        out.push_str(&self.node_type.to_string());
        if let Some(text) = self.text(source) {
            out.push('(');
            out.push_str(text);
            out.push(')');
        }
        if !self.children.is_empty() {
            out.push(':');
        }
        out.push('\n');
        for child in &self.children {
            child.dump_at(out, source, indent_level + 1);
        }
    }
}
