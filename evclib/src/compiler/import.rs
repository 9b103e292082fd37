use tracing::debug;

use crate::ast::{ImportDecl, ImportKind};
use crate::error::{CompileErrorKind, CompileResult};
use crate::resolver::{ResolveErrorKind, resolve_import};

use super::CompilationContext;

impl CompilationContext<'_> {
    pub(super) fn import(&mut self, decl: &ImportDecl) -> CompileResult<()> {
        let path = resolve_import(&self.path, &decl.module, self.session.options()).map_err(|e| {
            let kind = match e.kind {
                ResolveErrorKind::Io => CompileErrorKind::Io,
                ResolveErrorKind::MissingModule => CompileErrorKind::ImportResolutionFailure,
            };
            self.error(kind, e.message, decl.span)
        })?;
        if let Some(chain) = self.session.cycle_through(&path) {
            return Err(self.error(
                CompileErrorKind::ImportResolutionFailure,
                format!("Import cycle: {chain}"),
                decl.span,
            ));
        }
        debug!(module = %decl.module, path = %path.display(), "import resolved");

        let imported = self.session.compile_file(&path)?;
        match &decl.kind {
            ImportKind::Module => {
                self.scopes.graft_import(&imported.scope, &decl.module);
            }
            ImportKind::Wildcard => self.scopes.merge_all(&imported.scope),
            ImportKind::Names(names) => {
                if let Err(missing) = self.scopes.merge_selected(&imported.scope, names) {
                    return Err(self.error(
                        CompileErrorKind::ImportResolutionFailure,
                        format!("`{missing}` is not declared in module `{}`", decl.module),
                        decl.span,
                    ));
                }
            }
        }
        Ok(())
    }
}
