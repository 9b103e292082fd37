use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::alloc::StorageAllocator;
use crate::ast::{
    Assign, Block, CallExpr, CommandDecl, Comparison, CondBranch, FunctionDecl, IfBlock,
    ImportDecl, NamespaceDecl, QualName, VarDecl,
};
use crate::bytecode::{Disassembler, EvArg, EvScript, LabelTable};
use crate::config::CompileOptions;
use crate::diagnostic::Span;
use crate::error::{CompileError, CompileErrorKind, CompileResult, Location};
use crate::listener::{self, Listener};
use crate::parser::Parser;
use crate::scope::{ScopeStack, ScopeTree};
use crate::symbol::{ValueKind, Variable};

use call::CallDest;

mod call;
mod cond;
mod decl;
mod import;
mod operand;
mod stmt;

#[derive(Debug, Clone)]
pub struct CompiledFile {
    pub path: PathBuf,
    pub script: EvScript,
    pub scope: ScopeTree,
}

impl CompiledFile {
    pub fn disassembler(&self) -> Disassembler {
        let disasm = self
            .scope
            .commands()
            .fold(Disassembler::new(), |d, cmd| d.with_command(cmd.opcode, &cmd.name));
        self.scope.variables().fold(disasm, |d, var| match (var.kind, var.storage) {
            (ValueKind::Flag, Some(slot)) => d.with_flag(slot, &var.name),
            (ValueKind::SysFlag, Some(slot)) => d.with_sysflag(slot, &var.name),
            _ => d,
        })
    }

    pub fn disassemble(&self) -> String {
        self.disassembler().render(&self.script)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    options: CompileOptions,
    import_stack: Vec<PathBuf>,
}

impl Session {
    pub fn new(options: CompileOptions) -> Self {
        Self {
            options,
            import_stack: Vec::new(),
        }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn compile_file(&mut self, path: &Path) -> CompileResult<CompiledFile> {
        let source = fs::read_to_string(path).map_err(|e| {
            CompileError::new(
                CompileErrorKind::Io,
                format!("Failed to read {}: {e}", path.display()),
                Location::file(path),
            )
        })?;
        self.compile_source(path, &source)
    }

    // imports resolve relative to `path`
    pub fn compile_source(&mut self, path: &Path, source: &str) -> CompileResult<CompiledFile> {
        if let Some(chain) = self.cycle_through(path) {
            return Err(CompileError::new(
                CompileErrorKind::ImportResolutionFailure,
                format!("Import cycle: {chain}"),
                Location::file(path),
            ));
        }

        debug!(path = %path.display(), depth = self.import_stack.len(), "compiling");
        self.import_stack.push(canonical(path));
        let result = self.compile_unit(path, source);
        self.import_stack.pop();
        result
    }

    pub(crate) fn cycle_through(&self, path: &Path) -> Option<String> {
        let key = canonical(path);
        if !self.import_stack.contains(&key) {
            return None;
        }
        let chain = self
            .import_stack
            .iter()
            .chain(std::iter::once(&key))
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(" -> ");
        Some(chain)
    }

    fn compile_unit(&mut self, path: &Path, source: &str) -> CompileResult<CompiledFile> {
        let (program, diagnostics) = Parser::parse_source(source);
        if diagnostics.has_errors() {
            return Err(CompileError::syntax(diagnostics, path));
        }
        let mut ctx = CompilationContext::new(self, path);
        listener::walk(&program, &mut ctx)?;
        Ok(ctx.finish())
    }
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

pub fn compile_file(path: &Path, options: &CompileOptions) -> CompileResult<CompiledFile> {
    Session::new(options.clone()).compile_file(path)
}

pub fn compile_source(
    path: &Path,
    source: &str,
    options: &CompileOptions,
) -> CompileResult<CompiledFile> {
    Session::new(options.clone()).compile_source(path, source)
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    label: u32,
    // `if`/`elif`/`else` bodies; any other block hands its last label back
    arm: bool,
}

pub(crate) struct CompilationContext<'s> {
    session: &'s mut Session,
    path: PathBuf,
    scopes: ScopeStack,
    labels: LabelTable,
    alloc: StorageAllocator,
    frames: Vec<Frame>,
    pending_branch: Option<u32>,
    // where calls land until the enclosing statement exits
    call_dest: CallDest,
    skip_calls: bool,
    jump: Option<(EvArg, i32)>,
    declaring: Option<Variable>,
}

impl<'s> CompilationContext<'s> {
    fn new(session: &'s mut Session, path: &Path) -> Self {
        Self {
            session,
            path: path.to_path_buf(),
            scopes: ScopeStack::new(),
            labels: LabelTable::new(),
            alloc: StorageAllocator::new(),
            frames: Vec::new(),
            pending_branch: None,
            call_dest: CallDest::Discard,
            skip_calls: false,
            jump: None,
            declaring: None,
        }
    }

    fn current_label(&self) -> Option<u32> {
        self.frames.last().map(|frame| frame.label)
    }

    fn finish(self) -> CompiledFile {
        CompiledFile {
            path: self.path,
            script: self.labels.into_script(),
            scope: self.scopes.into_tree(),
        }
    }

    fn loc(&self, span: Span) -> Location {
        Location::new(&self.path, span)
    }

    fn error(&self, kind: CompileErrorKind, message: impl Into<String>, span: Span) -> CompileError {
        CompileError::new(kind, message, self.loc(span))
    }

    fn decl_name(&self, name: &QualName, what: &str) -> CompileResult<String> {
        if name.is_qualified() {
            return Err(self.error(
                CompileErrorKind::SyntaxNaming,
                format!("Invalid name for {what}: `{}` cannot be qualified", name.text()),
                name.span,
            ));
        }
        self.plain_name(&name.parts[0], what, name.span)
    }

    fn plain_name(&self, name: &str, what: &str, span: Span) -> CompileResult<String> {
        if name.starts_with("__") {
            return Err(self.error(
                CompileErrorKind::SyntaxNaming,
                format!("Invalid name for {what}: `{name}` uses the reserved `__` prefix"),
                span,
            ));
        }
        Ok(name.to_string())
    }
}

impl Listener for CompilationContext<'_> {
    type Error = CompileError;

    fn enter_import(&mut self, import: &ImportDecl) -> CompileResult<()> {
        self.import(import)
    }

    fn enter_namespace(&mut self, namespace: &NamespaceDecl) -> CompileResult<()> {
        let name = self.plain_name(&namespace.name, "namespace", namespace.span)?;
        self.scopes.push(Some(name));
        Ok(())
    }

    fn exit_namespace(&mut self, _namespace: &NamespaceDecl) -> CompileResult<()> {
        self.scopes.pop();
        Ok(())
    }

    fn enter_command(&mut self, command: &CommandDecl) -> CompileResult<()> {
        self.declare_command(command)
    }

    fn enter_function(&mut self, function: &FunctionDecl) -> CompileResult<()> {
        let label = self.open_function(function)?;
        self.frames.push(Frame { label, arm: false });
        Ok(())
    }

    fn exit_function(&mut self, _function: &FunctionDecl) -> CompileResult<()> {
        self.frames.pop();
        self.scopes.pop();
        Ok(())
    }

    fn enter_variable(&mut self, variable: &VarDecl) -> CompileResult<()> {
        self.open_variable(variable)
    }

    fn exit_variable(&mut self, _variable: &VarDecl) -> CompileResult<()> {
        self.call_dest = CallDest::Discard;
        if let Some(var) = self.declaring.take() {
            let name = var.name.clone();
            self.scopes.declare(&name, var);
        }
        Ok(())
    }

    fn enter_block(&mut self, _block: &Block) -> CompileResult<()> {
        let frame = match (self.pending_branch.take(), self.current_label()) {
            (Some(label), _) => Frame { label, arm: true },
            (None, Some(label)) => Frame { label, arm: false },
            (None, None) => return Ok(()),
        };
        self.scopes.push(None);
        self.frames.push(frame);
        Ok(())
    }

    fn exit_block(&mut self, _block: &Block) -> CompileResult<()> {
        let Some(closed) = self.frames.pop() else {
            return Ok(());
        };
        self.scopes.pop();
        if !closed.arm {
            if let Some(parent) = self.frames.last_mut() {
                parent.label = closed.label;
            }
        }
        Ok(())
    }

    fn enter_assign(&mut self, assign: &Assign) -> CompileResult<()> {
        self.open_assign(assign)
    }

    fn exit_assign(&mut self, _assign: &Assign) -> CompileResult<()> {
        self.call_dest = CallDest::Discard;
        self.skip_calls = false;
        Ok(())
    }

    fn exit_if(&mut self, _block: &IfBlock) -> CompileResult<()> {
        self.close_if();
        Ok(())
    }

    fn enter_branch(&mut self, _branch: &CondBranch) -> CompileResult<()> {
        self.open_branch();
        Ok(())
    }

    fn enter_else(&mut self, _body: &Block) -> CompileResult<()> {
        self.pending_branch = self.current_label();
        Ok(())
    }

    fn enter_comparison(&mut self, comparison: &Comparison) -> CompileResult<()> {
        self.open_comparison(comparison)
    }

    fn exit_comparison(&mut self, comparison: &Comparison) -> CompileResult<()> {
        self.close_comparison(comparison);
        Ok(())
    }

    fn enter_call(&mut self, call: &CallExpr) -> CompileResult<()> {
        if self.skip_calls {
            return Ok(());
        }
        let Some(label) = self.current_label() else {
            return Ok(());
        };
        let dest = self.call_dest.clone();
        self.lower_call(call, &dest, label)
    }
}
