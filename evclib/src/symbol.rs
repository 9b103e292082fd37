use core::fmt;

use crate::ast::TypeRef;
use crate::diagnostic::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Integer,
    Float,
    Boolean,
    Flag,
    SysFlag,
    String,
    NumberEnum,
}

impl ValueKind {
    pub fn from_type(ty: &TypeRef) -> Self {
        match ty {
            TypeRef::Flag => ValueKind::Flag,
            TypeRef::SysFlag => ValueKind::SysFlag,
            TypeRef::Int => ValueKind::Integer,
            TypeRef::Float => ValueKind::Float,
            TypeRef::Bool => ValueKind::Boolean,
            TypeRef::Str => ValueKind::String,
            TypeRef::Named(_) => ValueKind::NumberEnum,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, ValueKind::Integer | ValueKind::Float)
    }

    pub fn is_flag_like(self) -> bool {
        matches!(self, ValueKind::Flag | ValueKind::SysFlag)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Integer => "int",
            ValueKind::Float => "float",
            ValueKind::Boolean => "bool",
            ValueKind::Flag => "flag",
            ValueKind::SysFlag => "sysflag",
            ValueKind::String => "str",
            ValueKind::NumberEnum => "enum",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgStorage {
    Fixed(u32),
    Return,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgDescriptor {
    pub kind: ValueKind,
    pub type_name: String,
    pub name: String,
    pub storage: Option<ArgStorage>,
    pub span: Span,
}

impl ArgDescriptor {
    pub fn is_return_slot(&self) -> bool {
        self.storage == Some(ArgStorage::Return)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub opcode: u16,
    pub ret: Option<ArgDescriptor>,
    pub args: Vec<ArgDescriptor>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionSpecifier {
    Common,
    Entry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub specifier: FunctionSpecifier,
    pub label: String,
    pub name: String,
    pub ret: Option<ArgDescriptor>,
    pub args: Vec<ArgDescriptor>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub kind: ValueKind,
    pub type_name: String,
    pub storage: Option<u32>,
    pub is_const: bool,
    pub const_value: i32,
    pub span: Span,
}

#[derive(Debug, Clone, Copy)]
pub enum Callee<'a> {
    Command(&'a Command),
    Function(&'a Function),
}

impl<'a> Callee<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Callee::Command(cmd) => &cmd.name,
            Callee::Function(func) => &func.name,
        }
    }

    pub fn ret(&self) -> Option<&'a ArgDescriptor> {
        match self {
            Callee::Command(cmd) => cmd.ret.as_ref(),
            Callee::Function(func) => func.ret.as_ref(),
        }
    }

    pub fn args(&self) -> &'a [ArgDescriptor] {
        match self {
            Callee::Command(cmd) => &cmd.args,
            Callee::Function(func) => &func.args,
        }
    }
}
