use crate::ast::{
    Assign, Block, CallExpr, CommandDecl, Comparison, CondBranch, Entry, Expr, ExprKind,
    FunctionDecl, IfBlock, ImportDecl, NamespaceDecl, Program, Stmt, VarDecl,
};

pub trait Listener {
    type Error;

    fn enter_program(&mut self, _program: &Program) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_program(&mut self, _program: &Program) -> Result<(), Self::Error> {
        Ok(())
    }

    fn enter_import(&mut self, _import: &ImportDecl) -> Result<(), Self::Error> {
        Ok(())
    }

    fn enter_namespace(&mut self, _namespace: &NamespaceDecl) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_namespace(&mut self, _namespace: &NamespaceDecl) -> Result<(), Self::Error> {
        Ok(())
    }

    fn enter_command(&mut self, _command: &CommandDecl) -> Result<(), Self::Error> {
        Ok(())
    }

    fn enter_function(&mut self, _function: &FunctionDecl) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_function(&mut self, _function: &FunctionDecl) -> Result<(), Self::Error> {
        Ok(())
    }

    fn enter_variable(&mut self, _variable: &VarDecl) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_variable(&mut self, _variable: &VarDecl) -> Result<(), Self::Error> {
        Ok(())
    }

    fn enter_block(&mut self, _block: &Block) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_block(&mut self, _block: &Block) -> Result<(), Self::Error> {
        Ok(())
    }

    fn enter_assign(&mut self, _assign: &Assign) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_assign(&mut self, _assign: &Assign) -> Result<(), Self::Error> {
        Ok(())
    }

    fn enter_if(&mut self, _block: &IfBlock) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_if(&mut self, _block: &IfBlock) -> Result<(), Self::Error> {
        Ok(())
    }

    // Fired for the `if` arm and each `elif` arm.
    fn enter_branch(&mut self, _branch: &CondBranch) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_branch(&mut self, _branch: &CondBranch) -> Result<(), Self::Error> {
        Ok(())
    }

    fn enter_else(&mut self, _body: &Block) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_else(&mut self, _body: &Block) -> Result<(), Self::Error> {
        Ok(())
    }

    fn enter_comparison(&mut self, _comparison: &Comparison) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_comparison(&mut self, _comparison: &Comparison) -> Result<(), Self::Error> {
        Ok(())
    }

    fn enter_call(&mut self, _call: &CallExpr) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_call(&mut self, _call: &CallExpr) -> Result<(), Self::Error> {
        Ok(())
    }

    fn enter_literal(&mut self, _literal: &Expr) -> Result<(), Self::Error> {
        Ok(())
    }
}

pub fn walk<L: Listener>(program: &Program, listener: &mut L) -> Result<(), L::Error> {
    listener.enter_program(program)?;
    walk_entries(&program.entries, listener)?;
    listener.exit_program(program)
}

fn walk_entries<L: Listener>(entries: &[Entry], listener: &mut L) -> Result<(), L::Error> {
    for entry in entries {
        match entry {
            Entry::Import(import) => listener.enter_import(import)?,
            Entry::Namespace(namespace) => {
                listener.enter_namespace(namespace)?;
                walk_entries(&namespace.entries, listener)?;
                listener.exit_namespace(namespace)?;
            }
            Entry::Command(command) => listener.enter_command(command)?,
            Entry::Function(function) => {
                listener.enter_function(function)?;
                walk_stmts(&function.body.stmts, listener)?;
                listener.exit_function(function)?;
            }
            Entry::Variable(variable) => walk_variable(variable, listener)?,
        }
    }
    Ok(())
}

fn walk_stmts<L: Listener>(stmts: &[Stmt], listener: &mut L) -> Result<(), L::Error> {
    for stmt in stmts {
        match stmt {
            Stmt::Var(variable) => walk_variable(variable, listener)?,
            Stmt::Assign(assign) => {
                listener.enter_assign(assign)?;
                walk_expr(&assign.value, listener)?;
                listener.exit_assign(assign)?;
            }
            Stmt::Call(call) => walk_call(call, listener)?,
            Stmt::If(block) => walk_if(block, listener)?,
            Stmt::Block(block) => walk_block(block, listener)?,
        }
    }
    Ok(())
}

fn walk_variable<L: Listener>(variable: &VarDecl, listener: &mut L) -> Result<(), L::Error> {
    listener.enter_variable(variable)?;
    if let Some(value) = &variable.value {
        walk_expr(value, listener)?;
    }
    listener.exit_variable(variable)
}

fn walk_block<L: Listener>(block: &Block, listener: &mut L) -> Result<(), L::Error> {
    listener.enter_block(block)?;
    walk_stmts(&block.stmts, listener)?;
    listener.exit_block(block)
}

fn walk_if<L: Listener>(block: &IfBlock, listener: &mut L) -> Result<(), L::Error> {
    listener.enter_if(block)?;
    for branch in &block.branches {
        listener.enter_branch(branch)?;
        listener.enter_comparison(&branch.cond)?;
        walk_expr(&branch.cond.left, listener)?;
        walk_expr(&branch.cond.right, listener)?;
        listener.exit_comparison(&branch.cond)?;
        walk_block(&branch.body, listener)?;
        listener.exit_branch(branch)?;
    }
    if let Some(body) = &block.else_body {
        listener.enter_else(body)?;
        walk_block(body, listener)?;
        listener.exit_else(body)?;
    }
    listener.exit_if(block)
}

fn walk_call<L: Listener>(call: &CallExpr, listener: &mut L) -> Result<(), L::Error> {
    listener.enter_call(call)?;
    for arg in &call.args {
        walk_expr(arg, listener)?;
    }
    listener.exit_call(call)
}

fn walk_expr<L: Listener>(expr: &Expr, listener: &mut L) -> Result<(), L::Error> {
    match &expr.kind {
        ExprKind::Number(_) | ExprKind::Str(_) | ExprKind::Bool(_) => listener.enter_literal(expr),
        ExprKind::Name(_) => Ok(()),
        ExprKind::Call(call) => walk_call(call, listener),
    }
}
