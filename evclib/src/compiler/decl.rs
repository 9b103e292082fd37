use tracing::{debug, warn};

use crate::alloc::StorageAllocator;
use crate::ast::{ArgDecl, CommandDecl, ExprKind, FunctionDecl, SpecifierKw, StorageRef, TypeRef, VarDecl};
use crate::bytecode::opcode;
use crate::diagnostic::Span;
use crate::error::{CompileError, CompileErrorKind, CompileResult};
use crate::limits::{MAX_FLAG, MAX_SYS_FLAG, MAX_WORK};
use crate::symbol::{ArgDescriptor, ArgStorage, Command, Function, FunctionSpecifier, ValueKind, Variable};

use super::CompilationContext;

impl CompilationContext<'_> {
    pub(super) fn declare_command(&mut self, decl: &CommandDecl) -> CompileResult<()> {
        let name = self.decl_name(&decl.name, "command")?;
        let opcode = u16::try_from(decl.opcode).map_err(|_| {
            self.error(
                CompileErrorKind::UnsupportedConstruct,
                format!("Opcode {} of command `{name}` is out of range", decl.opcode),
                decl.span,
            )
        })?;
        if let Some(builtin) = opcode::builtin_name(opcode) {
            warn!(command = %name, opcode, builtin, "command opcode shadows a builtin instruction");
        }
        let mut args = Vec::with_capacity(decl.args.len());
        for arg in &decl.args {
            args.push(self.arg_descriptor(arg)?);
        }
        let command = Command {
            ret: decl.ret.as_ref().map(|ty| return_descriptor(ty, decl.span)),
            name: name.clone(),
            opcode,
            args,
            span: decl.span,
        };
        self.scopes.declare(&name, command);
        Ok(())
    }

    pub(super) fn open_function(&mut self, decl: &FunctionDecl) -> CompileResult<u32> {
        let name = self.decl_name(&decl.name, "function")?;
        let specifier = match decl.specifier {
            Some(SpecifierKw::Entry) => FunctionSpecifier::Entry,
            Some(SpecifierKw::Common) | None => FunctionSpecifier::Common,
        };
        // TODO: mangle non-entry labels with the enclosing namespace path so
        // same-named functions in different namespaces get distinct labels.
        let label_name = match specifier {
            FunctionSpecifier::Entry => name.clone(),
            FunctionSpecifier::Common => format!("_{name}"),
        };
        debug!(function = %name, label = %label_name, "lowering function");

        self.alloc = StorageAllocator::new();
        let mut args = Vec::with_capacity(decl.args.len());
        for arg in &decl.args {
            let mut desc = self.arg_descriptor(arg)?;
            if desc.storage.is_none() {
                let slot = self
                    .alloc
                    .allocate_arg_temp(desc.kind)
                    .map_err(|e| CompileError::from_alloc(e, self.loc(arg.span)))?
                    .ok_or_else(|| {
                        self.error(
                            CompileErrorKind::OutOfStorage,
                            format!(
                                "No temp register left for argument `{}`; give it an explicit slot",
                                arg.name
                            ),
                            arg.span,
                        )
                    })?;
                desc.storage = Some(ArgStorage::Fixed(slot));
            }
            args.push(desc);
        }

        let label = self.labels.new_label(&label_name);
        let function = Function {
            specifier,
            label: label_name,
            name: name.clone(),
            ret: decl.ret.as_ref().map(|ty| return_descriptor(ty, decl.span)),
            args,
            span: decl.span,
        };
        let params = function.args.clone();
        self.scopes.declare(&name, function);

        self.scopes.push(None);
        for param in params {
            let Some(ArgStorage::Fixed(slot)) = param.storage else {
                continue;
            };
            let var = Variable {
                name: param.name.clone(),
                kind: param.kind,
                type_name: param.type_name,
                storage: Some(slot),
                is_const: false,
                const_value: 0,
                span: param.span,
            };
            self.scopes.declare(&param.name, var);
        }
        Ok(label)
    }

    fn arg_descriptor(&self, arg: &ArgDecl) -> CompileResult<ArgDescriptor> {
        let name = self.plain_name(&arg.name, "argument", arg.span)?;
        let storage = match &arg.storage {
            Some(StorageRef::Return) => Some(ArgStorage::Return),
            Some(StorageRef::Slot(slot)) => Some(ArgStorage::Fixed(self.slot(*slot, arg.span)?)),
            None => None,
        };
        Ok(ArgDescriptor {
            kind: ValueKind::from_type(&arg.ty),
            type_name: arg.ty.text().to_string(),
            name,
            storage,
            span: arg.span,
        })
    }

    fn slot(&self, slot: i64, span: Span) -> CompileResult<u32> {
        u32::try_from(slot).map_err(|_| {
            self.error(
                CompileErrorKind::UnsupportedConstruct,
                format!("Invalid storage slot {slot}"),
                span,
            )
        })
    }

    pub(super) fn open_variable(&mut self, decl: &VarDecl) -> CompileResult<()> {
        let label = self.current_label();
        let name = self.decl_name(&decl.name, "variable")?;
        let kind = ValueKind::from_type(&decl.ty);
        if kind == ValueKind::NumberEnum {
            return Err(self.error(
                CompileErrorKind::UnsupportedConstruct,
                format!("Enum type `{}` is not supported", decl.ty.text()),
                decl.span,
            ));
        }
        let explicit = match decl.storage {
            Some(slot) => {
                let slot = self.slot(slot, decl.span)?;
                check_ceiling(kind, slot, &name);
                Some(slot)
            }
            None => None,
        };

        let var = if decl.is_const {
            if explicit.is_some() {
                warn!(variable = %name, "storage slot on a const is ignored");
            }
            Variable {
                const_value: self.const_value(decl, kind)?,
                name: name.clone(),
                kind,
                type_name: decl.ty.text().to_string(),
                storage: None,
                is_const: true,
                span: decl.span,
            }
        } else {
            self.check_mutable(decl, kind, label)?;
            let storage = match explicit {
                Some(slot) => slot,
                None => self
                    .alloc
                    .allocate_local(kind)
                    .map_err(|e| CompileError::from_alloc(e, self.loc(decl.span)))?,
            };
            Variable {
                name: name.clone(),
                kind,
                type_name: decl.ty.text().to_string(),
                storage: Some(storage),
                is_const: false,
                const_value: 0,
                span: decl.span,
            }
        };

        match (label, &decl.value) {
            (Some(label), Some(value)) if !var.is_const => {
                self.lower_rhs(var.clone(), value, label)?;
                self.declaring = Some(var);
            }
            (Some(_), _) if !var.is_const => self.declaring = Some(var),
            _ => self.scopes.declare(&name, var),
        }
        Ok(())
    }

    fn check_mutable(&self, decl: &VarDecl, kind: ValueKind, label: Option<u32>) -> CompileResult<()> {
        let unsupported = |msg: &str| self.error(CompileErrorKind::UnsupportedConstruct, msg, decl.span);
        match kind {
            ValueKind::Boolean => {
                return Err(unsupported(
                    "Mutable `bool` variables are not supported; use `flag` or `sysflag`",
                ));
            }
            ValueKind::String => return Err(unsupported("Mutable `str` variables are not supported")),
            _ => {}
        }
        if label.is_none() {
            if decl.storage.is_none() {
                return Err(unsupported(
                    "Variables outside a function need an explicit storage slot",
                ));
            }
            if decl.value.is_some() {
                return Err(unsupported(
                    "Variables outside a function cannot have an initializer",
                ));
            }
        }
        Ok(())
    }

    fn const_value(&self, decl: &VarDecl, kind: ValueKind) -> CompileResult<i32> {
        let Some(value) = &decl.value else {
            return Err(self.error(
                CompileErrorKind::TypeMismatch,
                "A const needs a literal initializer",
                decl.span,
            ));
        };
        let unsupported = |msg: String| self.error(CompileErrorKind::UnsupportedConstruct, msg, value.span);
        let mismatch = || {
            self.error(
                CompileErrorKind::TypeMismatch,
                format!(
                    "Cannot initialize const `{}` with a {}",
                    decl.ty.text(),
                    value.kind.describe()
                ),
                value.span,
            )
        };
        match (kind, &value.kind) {
            (ValueKind::Flag | ValueKind::SysFlag | ValueKind::String | ValueKind::Float, _) => {
                Err(unsupported(format!("`{kind}` consts are not supported")))
            }
            (_, ExprKind::Call(_)) => Err(unsupported("A const cannot be initialized by a call".to_string())),
            (_, ExprKind::Str(_)) => Err(unsupported(
                "A const cannot be initialized by a string".to_string(),
            )),
            (ValueKind::Integer, ExprKind::Number(n)) => {
                if n.fract() != 0.0 || *n < f64::from(i32::MIN) || *n > f64::from(i32::MAX) {
                    return Err(mismatch());
                }
                Ok(*n as i32)
            }
            (ValueKind::Boolean, ExprKind::Bool(b)) => Ok(i32::from(*b)),
            _ => Err(mismatch()),
        }
    }
}

fn return_descriptor(ty: &TypeRef, span: Span) -> ArgDescriptor {
    ArgDescriptor {
        kind: ValueKind::from_type(ty),
        type_name: ty.text().to_string(),
        name: String::new(),
        storage: None,
        span,
    }
}

fn check_ceiling(kind: ValueKind, slot: u32, name: &str) {
    let max = match kind {
        ValueKind::Flag => MAX_FLAG,
        ValueKind::SysFlag => MAX_SYS_FLAG,
        _ => MAX_WORK,
    };
    if slot >= max {
        warn!(variable = name, slot, max, kind = %kind, "storage slot above the runtime limit");
    }
}
