use indexmap::IndexMap;
use tracing::warn;

use crate::symbol::{Command, Function, Variable};

mod merge;
mod resolve;

pub type ScopeId = usize;

pub const GLOBAL: ScopeId = 0;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    pub prefix: Option<String>,
    pub commands: IndexMap<String, Command>,
    pub functions: IndexMap<String, Function>,
    pub variables: IndexMap<String, Variable>,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
}

impl Scope {
    pub fn is_named(&self) -> bool {
        self.prefix.is_some()
    }
}

pub trait Symbol: Clone {
    const KIND: &'static str;

    fn table(scope: &Scope) -> &IndexMap<String, Self>;
    fn table_mut(scope: &mut Scope) -> &mut IndexMap<String, Self>;
}

impl Symbol for Command {
    const KIND: &'static str = "command";

    fn table(scope: &Scope) -> &IndexMap<String, Self> {
        &scope.commands
    }
    fn table_mut(scope: &mut Scope) -> &mut IndexMap<String, Self> {
        &mut scope.commands
    }
}

impl Symbol for Function {
    const KIND: &'static str = "function";

    fn table(scope: &Scope) -> &IndexMap<String, Self> {
        &scope.functions
    }
    fn table_mut(scope: &mut Scope) -> &mut IndexMap<String, Self> {
        &mut scope.functions
    }
}

impl Symbol for Variable {
    const KIND: &'static str = "variable";

    fn table(scope: &Scope) -> &IndexMap<String, Self> {
        &scope.variables
    }
    fn table_mut(scope: &mut Scope) -> &mut IndexMap<String, Self> {
        &mut scope.variables
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    pub fn global(&self) -> &Scope {
        &self.scopes[GLOBAL]
    }

    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id)
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn add_child(&mut self, parent: ScopeId, prefix: Option<String>) -> ScopeId {
        let id = self.scopes.len();
        self.scopes.push(Scope {
            prefix,
            parent: Some(parent),
            ..Scope::default()
        });
        self.scopes[parent].children.push(id);
        id
    }

    pub fn declare<S: Symbol>(&mut self, scope: ScopeId, name: &str, symbol: S) {
        if S::table_mut(&mut self.scopes[scope])
            .insert(name.to_string(), symbol)
            .is_some()
        {
            warn!(kind = S::KIND, name, "redeclaration replaces the earlier entry");
        }
    }

    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.scopes.iter().flat_map(|s| s.commands.values())
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.scopes.iter().flat_map(|s| s.variables.values())
    }
}

#[derive(Debug, Clone)]
pub struct ScopeStack {
    tree: ScopeTree,
    active: Vec<ScopeId>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    pub fn new() -> Self {
        Self {
            tree: ScopeTree::new(),
            active: vec![GLOBAL],
        }
    }

    pub fn current(&self) -> ScopeId {
        self.active.last().copied().unwrap_or(GLOBAL)
    }

    pub fn depth(&self) -> usize {
        self.active.len() - 1
    }

    pub fn tree(&self) -> &ScopeTree {
        &self.tree
    }

    pub fn into_tree(self) -> ScopeTree {
        self.tree
    }

    pub fn push(&mut self, prefix: Option<String>) -> ScopeId {
        let id = self.tree.add_child(self.current(), prefix);
        self.active.push(id);
        id
    }

    pub fn pop(&mut self) {
        if self.active.len() <= 1 {
            warn!("scope pop at the global scope ignored");
            return;
        }
        self.active.pop();
    }

    pub fn declare<S: Symbol>(&mut self, name: &str, symbol: S) {
        let current = self.current();
        self.tree.declare(current, name, symbol);
    }

    pub fn resolve<S: Symbol>(&self, path: &[String]) -> Option<&S> {
        self.tree.resolve(self.current(), path)
    }
}
