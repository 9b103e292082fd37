use core::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::alloc::AllocError;
use crate::diagnostic::{DiagnosticBag, Span};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: PathBuf,
    pub line: usize,
    pub col: usize,
}

impl Location {
    pub fn new(path: &Path, span: Span) -> Self {
        Self {
            path: path.to_path_buf(),
            line: span.line,
            col: span.col,
        }
    }

    pub fn file(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            line: 0,
            col: 0,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path.display(), self.line, self.col)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CompileErrorKind {
    SyntaxNaming,
    UnresolvedSymbol,
    TypeMismatch,
    UnsupportedConstruct,
    OutOfStorage,
    ImportResolutionFailure,
    Syntax(DiagnosticBag),
    Io,
}

impl CompileErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            CompileErrorKind::SyntaxNaming => "E-EVC-NAMING",
            CompileErrorKind::UnresolvedSymbol => "E-EVC-UNRESOLVED",
            CompileErrorKind::TypeMismatch => "E-EVC-TYPE",
            CompileErrorKind::UnsupportedConstruct => "E-EVC-UNSUPPORTED",
            CompileErrorKind::OutOfStorage => "E-EVC-STORAGE",
            CompileErrorKind::ImportResolutionFailure => "E-EVC-IMPORT",
            CompileErrorKind::Syntax(_) => "E-EVC-SYNTAX",
            CompileErrorKind::Io => "E-EVC-IO",
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, CompileErrorKind::Syntax(_))
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{location}: {message}")]
pub struct CompileError {
    pub kind: CompileErrorKind,
    pub message: String,
    pub location: Location,
}

impl CompileError {
    pub fn new(kind: CompileErrorKind, message: impl Into<String>, location: Location) -> Self {
        Self {
            kind,
            message: message.into(),
            location,
        }
    }

    pub fn syntax(bag: DiagnosticBag, path: &Path) -> Self {
        let (message, location) = match bag.first_error() {
            Some(diag) => (diag.message.clone(), Location::new(path, diag.span)),
            None => ("syntax error".to_string(), Location::file(path)),
        };
        Self::new(CompileErrorKind::Syntax(bag), message, location)
    }

    pub fn from_alloc(err: AllocError, location: Location) -> Self {
        let kind = match err {
            AllocError::OutOfStorage { .. } => CompileErrorKind::OutOfStorage,
            AllocError::UnsupportedAutoAllocation(_) => CompileErrorKind::UnsupportedConstruct,
        };
        Self::new(kind, err.to_string(), location)
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

pub type CompileResult<T> = Result<T, CompileError>;
