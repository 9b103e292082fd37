use crate::symbol::{Callee, Command, Function};

use super::{GLOBAL, ScopeId, ScopeStack, ScopeTree, Symbol};

impl ScopeTree {
    pub fn resolve<S: Symbol>(&self, from: ScopeId, path: &[String]) -> Option<&S> {
        match path {
            [] => None,
            [name] => self.resolve_unqualified(from, name),
            [prefix @ .., leaf] => self.resolve_qualified(prefix, leaf),
        }
    }

    // Current scope first, then enclosing scopes that are not named, ending
    // with the global scope.
    fn resolve_unqualified<S: Symbol>(&self, from: ScopeId, name: &str) -> Option<&S> {
        let start = self.get(from)?;
        if let Some(found) = S::table(start).get(name) {
            return Some(found);
        }
        let mut next = start.parent;
        while let Some(id) = next {
            let scope = self.get(id)?;
            if id == GLOBAL || !scope.is_named() {
                if let Some(found) = S::table(scope).get(name) {
                    return Some(found);
                }
            }
            next = scope.parent;
        }
        None
    }

    fn resolve_qualified<S: Symbol>(&self, prefix: &[String], leaf: &str) -> Option<&S> {
        let mut frontier = self.global().children.clone();
        let mut segment = 0;
        while !frontier.is_empty() {
            let mut next = Vec::new();
            for id in frontier {
                let Some(scope) = self.get(id) else {
                    continue;
                };
                match &scope.prefix {
                    Some(name) if *name == prefix[segment] => {
                        if segment + 1 == prefix.len() {
                            return S::table(scope).get(leaf);
                        }
                        segment += 1;
                        next = scope.children.clone();
                        break;
                    }
                    Some(_) => {}
                    None => next.extend(scope.children.iter().copied()),
                }
            }
            frontier = next;
        }
        None
    }

    pub fn resolve_callee(&self, from: ScopeId, path: &[String]) -> Option<Callee<'_>> {
        if let Some(cmd) = self.resolve::<Command>(from, path) {
            return Some(Callee::Command(cmd));
        }
        self.resolve::<Function>(from, path).map(Callee::Function)
    }
}

impl ScopeStack {
    pub fn resolve_callee(&self, path: &[String]) -> Option<Callee<'_>> {
        self.tree.resolve_callee(self.current(), path)
    }
}
