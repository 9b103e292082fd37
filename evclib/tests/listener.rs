mod common;

use common::parse_ok;
use evclib::ast::{
    Assign, Block, CallExpr, CommandDecl, Comparison, CondBranch, Expr, ExprKind, FunctionDecl,
    IfBlock, ImportDecl, NamespaceDecl, Program, VarDecl,
};
use evclib::listener::{Listener, walk};

#[derive(Default)]
struct Recorder {
    events: Vec<String>,
    stop_at: Option<&'static str>,
}

impl Recorder {
    fn record(&mut self, event: String) -> Result<(), String> {
        if self.stop_at.is_some_and(|stop| event == stop) {
            return Err(event);
        }
        self.events.push(event);
        Ok(())
    }
}

impl Listener for Recorder {
    type Error = String;

    fn enter_program(&mut self, _program: &Program) -> Result<(), String> {
        self.record("program".to_string())
    }
    fn exit_program(&mut self, _program: &Program) -> Result<(), String> {
        self.record("/program".to_string())
    }
    fn enter_import(&mut self, import: &ImportDecl) -> Result<(), String> {
        self.record(format!("import {}", import.module))
    }
    fn enter_namespace(&mut self, namespace: &NamespaceDecl) -> Result<(), String> {
        self.record(format!("ns {}", namespace.name))
    }
    fn exit_namespace(&mut self, namespace: &NamespaceDecl) -> Result<(), String> {
        self.record(format!("/ns {}", namespace.name))
    }
    fn enter_command(&mut self, command: &CommandDecl) -> Result<(), String> {
        self.record(format!("command {}", command.name.text()))
    }
    fn enter_function(&mut self, function: &FunctionDecl) -> Result<(), String> {
        self.record(format!("func {}", function.name.text()))
    }
    fn exit_function(&mut self, function: &FunctionDecl) -> Result<(), String> {
        self.record(format!("/func {}", function.name.text()))
    }
    fn enter_variable(&mut self, variable: &VarDecl) -> Result<(), String> {
        self.record(format!("var {}", variable.name.text()))
    }
    fn enter_block(&mut self, _block: &Block) -> Result<(), String> {
        self.record("block".to_string())
    }
    fn exit_block(&mut self, _block: &Block) -> Result<(), String> {
        self.record("/block".to_string())
    }
    fn enter_assign(&mut self, assign: &Assign) -> Result<(), String> {
        self.record(format!("assign {}", assign.target.text()))
    }
    fn enter_if(&mut self, block: &IfBlock) -> Result<(), String> {
        self.record(format!("if x{}", block.branches.len()))
    }
    fn exit_if(&mut self, _block: &IfBlock) -> Result<(), String> {
        self.record("/if".to_string())
    }
    fn enter_branch(&mut self, _branch: &CondBranch) -> Result<(), String> {
        self.record("branch".to_string())
    }
    fn enter_else(&mut self, _body: &Block) -> Result<(), String> {
        self.record("else".to_string())
    }
    fn enter_comparison(&mut self, comparison: &Comparison) -> Result<(), String> {
        self.record(format!("cmp {}", comparison.op.mnemonic()))
    }
    fn enter_call(&mut self, call: &CallExpr) -> Result<(), String> {
        self.record(format!("call {}", call.callee.text()))
    }
    fn exit_call(&mut self, call: &CallExpr) -> Result<(), String> {
        self.record(format!("/call {}", call.callee.text()))
    }
    fn enter_literal(&mut self, literal: &Expr) -> Result<(), String> {
        let text = match &literal.kind {
            ExprKind::Number(n) => n.to_string(),
            ExprKind::Str(s) => format!("'{s}'"),
            ExprKind::Bool(b) => b.to_string(),
            other => format!("{other:?}"),
        };
        self.record(format!("lit {text}"))
    }
}

const SRC: &str = r#"
import util;
namespace npc {
  command wave(3);
  namespace inner { flag f @1; }
}
func entry main() { int x = 1; }
"#;

#[test]
fn walk_visits_entries_in_source_order_with_namespace_exits() {
    let program = parse_ok(SRC);
    let mut recorder = Recorder::default();
    walk(&program, &mut recorder).expect("walk");
    assert_eq!(
        recorder.events,
        vec![
            "program",
            "import util",
            "ns npc",
            "command wave",
            "ns inner",
            "var f",
            "/ns inner",
            "/ns npc",
            "func main",
            "var x",
            "lit 1",
            "/func main",
            "/program",
        ]
    );
}

#[test]
fn walk_pushes_statements_branches_and_calls() {
    let program = parse_ok(
        r#"
func entry main() {
  x = ask();
  if x == 1 { say('hi'); } elif x > 2 { } else { { } }
  wave(true);
}
"#,
    );
    let mut recorder = Recorder::default();
    walk(&program, &mut recorder).expect("walk");
    assert_eq!(
        recorder.events,
        vec![
            "program",
            "func main",
            "assign x",
            "call ask",
            "/call ask",
            "if x2",
            "branch",
            "cmp EQ",
            "lit 1",
            "block",
            "call say",
            "lit 'hi'",
            "/call say",
            "/block",
            "branch",
            "cmp GT",
            "lit 2",
            "block",
            "/block",
            "else",
            "block",
            "block",
            "/block",
            "/block",
            "/if",
            "call wave",
            "lit true",
            "/call wave",
            "/func main",
            "/program",
        ]
    );
}

#[test]
fn first_hook_error_stops_the_walk() {
    let program = parse_ok(SRC);
    let mut recorder = Recorder {
        stop_at: Some("ns inner"),
        ..Recorder::default()
    };
    assert_eq!(walk(&program, &mut recorder), Err("ns inner".to_string()));
    assert_eq!(recorder.events.last().map(String::as_str), Some("command wave"));
}

#[test]
fn hook_error_inside_a_body_stops_before_later_statements() {
    let program = parse_ok("func entry main() { a(); b(); }");
    let mut recorder = Recorder {
        stop_at: Some("call b"),
        ..Recorder::default()
    };
    assert_eq!(walk(&program, &mut recorder), Err("call b".to_string()));
    assert!(!recorder.events.iter().any(|e| e == "/func main"));
}
