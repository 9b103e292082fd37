use std::fmt::Write;
use std::path::Path;

use evclib::parser::Parser;
use evclib::{CompileOptions, CompiledFile, compile_source};

/// Many small functions, each with locals, a command call and an if chain.
pub fn src_branchy_functions(count: usize) -> String {
    let mut src = String::from(
        "command show(40, int v);\ncommand ask(41) -> int;\nflag seen @10;\n",
    );
    for i in 0..count {
        let _ = write!(
            src,
            r#"
func entry f{i}() {{
  int a = {i};
  int b = a;
  show(b);
  if a == 1 {{ seen = true; }} elif ask() > 3 {{ b = 2; }} else {{ seen = false; }}
}}
"#
        );
    }
    src
}

/// Declarations spread over nested namespaces, called by qualified name.
pub fn src_namespaced_calls(count: usize) -> String {
    let mut src = String::from("namespace game { namespace npc {\n");
    for i in 0..count {
        let _ = writeln!(src, "  command act{i}({op}, int v);", op = 100 + i);
    }
    src.push_str("} }\nfunc entry main() {\n  int x = 1;\n");
    for i in 0..count {
        let _ = writeln!(src, "  game::npc::act{i}(x);");
    }
    src.push_str("}\n");
    src
}

pub fn parse_only(src: &str) {
    let (_program, diags) = Parser::parse_source(src);
    assert!(diags.is_empty(), "{:?}", diags.as_slice());
}

pub fn compile_unit(src: &str) -> CompiledFile {
    compile_source(Path::new("bench.evc"), src, &CompileOptions::default())
        .unwrap_or_else(|e| panic!("bench source failed to compile: {e}"))
}
