use evclib::diagnostic::Span;
use evclib::scope::{GLOBAL, ScopeStack, ScopeTree};
use evclib::symbol::{Callee, Command, Function, FunctionSpecifier, ValueKind, Variable};

fn path(text: &str) -> Vec<String> {
    text.split("::").map(str::to_string).collect()
}

fn int_var(name: &str, slot: u32) -> Variable {
    Variable {
        name: name.to_string(),
        kind: ValueKind::Integer,
        type_name: "int".to_string(),
        storage: Some(slot),
        is_const: false,
        const_value: 0,
        span: Span::default(),
    }
}

fn command(name: &str, opcode: u16) -> Command {
    Command {
        name: name.to_string(),
        opcode,
        ret: None,
        args: Vec::new(),
        span: Span::default(),
    }
}

fn function(name: &str) -> Function {
    Function {
        specifier: FunctionSpecifier::Common,
        label: format!("_{name}"),
        name: name.to_string(),
        ret: None,
        args: Vec::new(),
        span: Span::default(),
    }
}

fn slot_of(stack: &ScopeStack, name: &str) -> Option<u32> {
    stack.resolve::<Variable>(&path(name)).and_then(|v| v.storage)
}

#[test]
fn inner_block_shadows_outer_until_popped() {
    let mut stack = ScopeStack::new();
    stack.declare("x", int_var("x", 1));
    stack.push(None);
    stack.declare("x", int_var("x", 2));
    assert_eq!(slot_of(&stack, "x"), Some(2));
    stack.pop();
    assert_eq!(slot_of(&stack, "x"), Some(1));
}

#[test]
fn unnamed_blocks_see_enclosing_declarations() {
    let mut stack = ScopeStack::new();
    stack.declare("outer", int_var("outer", 7));
    stack.push(None);
    stack.push(None);
    assert_eq!(stack.depth(), 2);
    assert_eq!(slot_of(&stack, "outer"), Some(7));
}

#[test]
fn named_scope_contents_need_qualification() {
    let mut stack = ScopeStack::new();
    stack.push(Some("A".to_string()));
    stack.declare("foo", command("foo", 9));
    stack.pop();

    assert!(stack.resolve::<Command>(&path("foo")).is_none());
    let found = stack.resolve::<Command>(&path("A::foo")).expect("qualified lookup");
    assert_eq!(found.opcode, 9);
    assert!(stack.resolve::<Command>(&path("B::foo")).is_none());
}

#[test]
fn named_scope_sees_its_own_declarations_and_global() {
    let mut stack = ScopeStack::new();
    stack.declare("g", int_var("g", 40));
    stack.push(Some("outer".to_string()));
    stack.declare("hidden", int_var("hidden", 41));
    stack.push(Some("inner".to_string()));
    assert_eq!(slot_of(&stack, "g"), Some(40));
    assert_eq!(slot_of(&stack, "hidden"), None);
    stack.declare("mine", int_var("mine", 42));
    assert_eq!(slot_of(&stack, "mine"), Some(42));
    stack.pop();
    stack.pop();
    assert_eq!(slot_of(&stack, "outer::inner::mine"), Some(42));
    assert_eq!(slot_of(&stack, "outer::hidden"), Some(41));
}

#[test]
fn qualified_lookup_passes_through_unnamed_scopes() {
    let mut stack = ScopeStack::new();
    stack.push(None);
    stack.push(Some("npc".to_string()));
    stack.declare("wave", command("wave", 3));
    stack.pop();
    stack.pop();
    assert!(stack.resolve::<Command>(&path("npc::wave")).is_some());
}

#[test]
fn pop_at_global_scope_is_ignored() {
    let mut stack = ScopeStack::new();
    stack.declare("x", int_var("x", 5));
    stack.pop();
    stack.pop();
    assert_eq!(stack.current(), GLOBAL);
    assert_eq!(slot_of(&stack, "x"), Some(5));
}

#[test]
fn redeclaration_replaces_earlier_entry() {
    let mut stack = ScopeStack::new();
    stack.declare("x", int_var("x", 1));
    stack.declare("x", int_var("x", 3));
    assert_eq!(slot_of(&stack, "x"), Some(3));
    assert_eq!(stack.tree().global().variables.len(), 1);
}

#[test]
fn commands_shadow_functions_of_the_same_name() {
    let mut stack = ScopeStack::new();
    stack.declare("talk", function("talk"));
    assert!(matches!(
        stack.resolve_callee(&path("talk")),
        Some(Callee::Function(_))
    ));
    stack.declare("talk", command("talk", 4));
    match stack.resolve_callee(&path("talk")) {
        Some(Callee::Command(cmd)) => assert_eq!(cmd.opcode, 4),
        other => panic!("expected command, got {other:?}"),
    }
}

fn library() -> ScopeTree {
    let mut lib = ScopeStack::new();
    lib.declare("say", command("say", 10));
    lib.declare("helper", function("helper"));
    lib.declare("LIMIT", int_var("LIMIT", 100));
    lib.push(Some("deep".to_string()));
    lib.declare("nested", command("nested", 11));
    lib.pop();
    lib.into_tree()
}

#[test]
fn graft_import_keeps_library_behind_prefix() {
    let lib = library();
    let mut stack = ScopeStack::new();
    stack.graft_import(&lib, "lib");
    assert!(stack.resolve::<Command>(&path("say")).is_none());
    assert!(stack.resolve::<Command>(&path("lib::say")).is_some());
    assert!(stack.resolve::<Command>(&path("lib::deep::nested")).is_some());
    assert!(stack.resolve::<Function>(&path("lib::helper")).is_some());
}

#[test]
fn merge_all_flattens_library_globals() {
    let lib = library();
    let mut stack = ScopeStack::new();
    stack.merge_all(&lib);
    assert!(stack.resolve::<Command>(&path("say")).is_some());
    assert_eq!(slot_of(&stack, "LIMIT"), Some(100));
    assert!(stack.resolve::<Command>(&path("deep::nested")).is_some());
}

#[test]
fn merge_selected_copies_only_listed_names() {
    let lib = library();
    let mut stack = ScopeStack::new();
    let names = vec!["say".to_string(), "LIMIT".to_string()];
    assert_eq!(stack.merge_selected(&lib, &names), Ok(()));
    assert!(stack.resolve::<Command>(&path("say")).is_some());
    assert_eq!(slot_of(&stack, "LIMIT"), Some(100));
    assert!(stack.resolve::<Function>(&path("helper")).is_none());

    let missing = vec!["helper".to_string(), "nope".to_string()];
    assert_eq!(stack.merge_selected(&lib, &missing), Err("nope"));
}
