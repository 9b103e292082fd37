pub mod alloc;
pub mod ast;
pub mod bytecode;
pub mod compiler;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod lexer;
pub mod limits;
pub mod listener;
pub mod parser;
pub mod resolver;
pub mod scope;
pub mod strtab;
pub mod symbol;
pub mod token;

pub use compiler::{CompiledFile, Session, compile_file, compile_source};
pub use config::CompileOptions;
pub use error::{CompileError, CompileErrorKind, CompileResult, Location};
