use super::{GLOBAL, Scope, ScopeId, ScopeStack, ScopeTree};

impl ScopeTree {
    pub fn graft(
        &mut self,
        parent: ScopeId,
        other: &ScopeTree,
        src: ScopeId,
        prefix: Option<String>,
    ) -> ScopeId {
        let Some(source) = other.get(src) else {
            return parent;
        };
        let id = self.scopes.len();
        self.scopes.push(Scope {
            prefix,
            commands: source.commands.clone(),
            functions: source.functions.clone(),
            variables: source.variables.clone(),
            parent: Some(parent),
            children: Vec::new(),
        });
        self.scopes[parent].children.push(id);
        for &child in &source.children {
            let child_prefix = other.get(child).and_then(|c| c.prefix.clone());
            self.graft(id, other, child, child_prefix);
        }
        id
    }

    pub fn merge_all(&mut self, target: ScopeId, other: &ScopeTree) {
        let source = other.global();
        let scope = &mut self.scopes[target];
        scope.commands.extend(source.commands.clone());
        scope.functions.extend(source.functions.clone());
        scope.variables.extend(source.variables.clone());
        for &child in &source.children {
            let prefix = other.get(child).and_then(|c| c.prefix.clone());
            self.graft(target, other, child, prefix);
        }
    }

    pub fn merge_selected<'n>(
        &mut self,
        target: ScopeId,
        other: &ScopeTree,
        names: &'n [String],
    ) -> Result<(), &'n str> {
        let source = other.global();
        for name in names {
            let scope = &mut self.scopes[target];
            if let Some(cmd) = source.commands.get(name) {
                scope.commands.insert(name.clone(), cmd.clone());
            } else if let Some(func) = source.functions.get(name) {
                scope.functions.insert(name.clone(), func.clone());
            } else if let Some(var) = source.variables.get(name) {
                scope.variables.insert(name.clone(), var.clone());
            } else {
                return Err(name);
            }
        }
        Ok(())
    }
}

impl ScopeStack {
    pub fn graft_import(&mut self, other: &ScopeTree, prefix: &str) -> ScopeId {
        let current = self.current();
        self.tree.graft(current, other, GLOBAL, Some(prefix.to_string()))
    }

    pub fn merge_all(&mut self, other: &ScopeTree) {
        let current = self.current();
        self.tree.merge_all(current, other);
    }

    pub fn merge_selected<'n>(
        &mut self,
        other: &ScopeTree,
        names: &'n [String],
    ) -> Result<(), &'n str> {
        let current = self.current();
        self.tree.merge_selected(current, other, names)
    }
}
