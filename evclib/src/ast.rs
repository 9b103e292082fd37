use crate::diagnostic::Span;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Import(ImportDecl),
    Namespace(NamespaceDecl),
    Command(CommandDecl),
    Function(FunctionDecl),
    Variable(VarDecl),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualName {
    pub parts: Vec<String>,
    pub span: Span,
}

impl QualName {
    pub fn is_qualified(&self) -> bool {
        self.parts.len() > 1
    }

    pub fn text(&self) -> String {
        self.parts.join("::")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportKind {
    Module,
    Wildcard,
    Names(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    pub module: String,
    pub kind: ImportKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceDecl {
    pub name: String,
    pub entries: Vec<Entry>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Flag,
    SysFlag,
    Int,
    Float,
    Bool,
    Str,
    Named(String),
}

impl TypeRef {
    pub fn text(&self) -> &str {
        match self {
            TypeRef::Flag => "flag",
            TypeRef::SysFlag => "sysflag",
            TypeRef::Int => "int",
            TypeRef::Float => "float",
            TypeRef::Bool => "bool",
            TypeRef::Str => "str",
            TypeRef::Named(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageRef {
    Slot(i64),
    Return,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgDecl {
    pub ty: TypeRef,
    pub name: String,
    pub storage: Option<StorageRef>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDecl {
    pub name: QualName,
    pub opcode: i64,
    pub args: Vec<ArgDecl>,
    pub ret: Option<TypeRef>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecifierKw {
    Entry,
    Common,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub specifier: Option<SpecifierKw>,
    pub name: QualName,
    pub args: Vec<ArgDecl>,
    pub ret: Option<TypeRef>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub is_const: bool,
    pub ty: TypeRef,
    pub name: QualName,
    pub storage: Option<i64>,
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Var(VarDecl),
    Assign(Assign),
    Call(CallExpr),
    If(IfBlock),
    Block(Block),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Set,
    Add,
    Sub,
    Mul,
    Div,
}

impl AssignOp {
    pub fn symbol(self) -> &'static str {
        match self {
            AssignOp::Set => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub target: QualName,
    pub op: AssignOp,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfBlock {
    pub branches: Vec<CondBranch>,
    pub else_body: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CondBranch {
    pub cond: Comparison,
    pub body: Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    Ne,
    Le,
    Ge,
    Lt,
    Gt,
}

impl Comparator {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Comparator::Eq => "EQ",
            Comparator::Ne => "NE",
            Comparator::Le => "LE",
            Comparator::Ge => "GE",
            Comparator::Lt => "LT",
            Comparator::Gt => "GT",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub left: Expr,
    pub op: Comparator,
    pub right: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: QualName,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Number(f64),
    Str(String),
    Bool(bool),
    Name(QualName),
    Call(CallExpr),
}

impl ExprKind {
    pub fn describe(&self) -> &'static str {
        match self {
            ExprKind::Number(_) => "number literal",
            ExprKind::Str(_) => "string literal",
            ExprKind::Bool(_) => "boolean literal",
            ExprKind::Name(_) => "identifier",
            ExprKind::Call(_) => "call",
        }
    }
}
