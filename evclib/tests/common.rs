#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use evclib::ast::Program;
use evclib::bytecode::{EvCmd, Label};
use evclib::diagnostic::DiagnosticBag;
use evclib::parser::Parser;
use evclib::{CompileError, CompileOptions, CompiledFile, compile_source};

pub fn parse_ok(src: &str) -> Program {
    let (program, diags) = Parser::parse_source(src);
    assert!(diags.is_empty(), "diagnostics: {:?}", diags.as_slice());
    program
}

pub fn parse_err(src: &str) -> DiagnosticBag {
    let (_program, diags) = Parser::parse_source(src);
    assert!(
        !diags.is_empty(),
        "expected parser diagnostics but got none for:\n{src}"
    );
    diags
}

pub fn compile_ok(src: &str) -> CompiledFile {
    compile_source(Path::new("test.evc"), src, &CompileOptions::default())
        .expect("compile should succeed")
}

pub fn compile_err(src: &str) -> CompileError {
    compile_source(Path::new("test.evc"), src, &CompileOptions::default())
        .expect_err("compile should fail")
}

pub fn assert_has_diag(diags: &DiagnosticBag, needle: &str) {
    assert!(
        diags.as_slice().iter().any(|d| d.message.contains(needle)),
        "missing diagnostic containing `{needle}` in {:?}",
        diags.as_slice()
    );
}

pub fn label<'a>(file: &'a CompiledFile, name: &str) -> &'a Label {
    file.script
        .find_label(name)
        .unwrap_or_else(|| panic!("label `{name}` missing; have {:?}", label_names(file)))
}

pub fn commands<'a>(file: &'a CompiledFile, name: &str) -> &'a [EvCmd] {
    &label(file, name).commands
}

pub fn label_names(file: &CompiledFile) -> Vec<String> {
    file.script
        .labels
        .values()
        .map(|l| file.script.label_name(l).unwrap_or("?").to_string())
        .collect()
}

pub fn string_index(file: &CompiledFile, text: &str) -> u32 {
    file.script
        .strings
        .iter()
        .position(|s| s == text)
        .unwrap_or_else(|| panic!("`{text}` not interned")) as u32
}

pub fn make_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("{prefix}_{}_{nanos}", std::process::id()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

pub fn write_file(dir: &Path, rel: &str, contents: &str) -> PathBuf {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(&path, contents).expect("write fixture");
    path
}
