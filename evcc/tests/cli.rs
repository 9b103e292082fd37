use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

const GOOD: &str = r#"
command foo(40, int a);
func entry bar() {
  int x = 5;
  foo(x);
}
"#;

#[test]
fn check_valid_program_returns_zero() {
    let tmp = make_temp_dir("evcc_ok");
    let file = write(&tmp, "ok.evc", GOOD);
    let output = run(&["check"], &[file.as_path()]);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("ok:"));
}

#[test]
fn syntax_error_exits_with_syntax_code() {
    let tmp = make_temp_dir("evcc_syntax");
    let file = write(&tmp, "bad.evc", "import util");
    let output = run(&["check"], &[file.as_path()]);
    assert_eq!(output.status.code(), Some(10));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[E-EVC-SYNTAX]"), "{stderr}");
    assert!(stderr.contains("Expected `;` after import"), "{stderr}");
}

#[test]
fn semantic_error_exits_with_semantic_code() {
    let tmp = make_temp_dir("evcc_semantic");
    let file = write(&tmp, "bad.evc", "func entry f() {\n  missing();\n}\n");
    let output = run(&["check"], &[file.as_path()]);
    assert_eq!(output.status.code(), Some(11));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[E-EVC-UNRESOLVED]"), "{stderr}");
    assert!(stderr.contains("bad.evc:2:3"), "{stderr}");
}

#[test]
fn missing_file_exits_with_io_code() {
    let output = run(&["check", "does_not_exist.evc"], &[]);
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read"));
}

#[test]
fn no_subcommand_is_a_usage_error() {
    let output = run(&[], &[]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn build_writes_bytecode_and_listing() {
    let tmp = make_temp_dir("evcc_build");
    let src = write(&tmp, "scripts/intro.evc", GOOD);
    let out = tmp.join("out");
    let output = run(&["build", "--text", "-o"], &[out.as_path(), src.as_path()]);
    assert_eq!(output.status.code(), Some(0), "{output:?}");
    let bytes = fs::read(out.join("intro.evbc")).expect("bytecode written");
    assert_eq!(&bytes[..4], b"EVBC");
    let listing = fs::read_to_string(out.join("intro.ev")).expect("listing written");
    assert!(listing.contains("\tfoo(@SCWK_ANSWER, @LOCALWORK0)"), "{listing}");
}

#[test]
fn build_expands_directories() {
    let tmp = make_temp_dir("evcc_build_dir");
    write(&tmp, "a.evc", GOOD);
    write(&tmp, "nested/b.evc", "func entry other() { }");
    let output = run(&["build"], &[tmp.as_path()]);
    assert_eq!(output.status.code(), Some(0), "{output:?}");
    assert!(tmp.join("a.evbc").is_file());
    assert!(tmp.join("nested").join("b.evbc").is_file());
}

#[test]
fn build_of_empty_directory_is_a_usage_error() {
    let tmp = make_temp_dir("evcc_build_empty");
    let output = run(&["build"], &[tmp.as_path()]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn disasm_reads_source_and_bytecode() {
    let tmp = make_temp_dir("evcc_disasm");
    let src = write(&tmp, "intro.evc", GOOD);

    let from_source = run(&["disasm"], &[src.as_path()]);
    assert_eq!(from_source.status.code(), Some(0));
    let text = String::from_utf8_lossy(&from_source.stdout);
    assert!(text.starts_with("bar:\n"), "{text}");

    let built = run(&["build"], &[src.as_path()]);
    assert_eq!(built.status.code(), Some(0));
    let from_bytes = run(&["disasm"], &[tmp.join("intro.evbc").as_path()]);
    assert_eq!(from_bytes.status.code(), Some(0));
    // Without the source, command opcodes are shown as numbers.
    let text = String::from_utf8_lossy(&from_bytes.stdout);
    assert!(text.contains("\t40(@SCWK_ANSWER, @LOCALWORK0)"), "{text}");
}

#[test]
fn disasm_of_corrupt_bytecode_exits_with_decode_code() {
    let tmp = make_temp_dir("evcc_corrupt");
    let file = write(&tmp, "junk.evbc", "not bytecode");
    let output = run(&["disasm"], &[file.as_path()]);
    assert_eq!(output.status.code(), Some(13));
}

#[test]
fn lib_root_flag_is_used_for_imports() {
    let tmp = make_temp_dir("evcc_lib_root");
    write(&tmp, "shared/tools/lib.evc", "command beep(70);");
    let main = write(
        &tmp,
        "game/main.evc",
        "import tools;\nfunc entry main() { tools::beep(); }",
    );
    let output = run(&["check", "--lib-root"], &[tmp.join("shared").as_path(), main.as_path()]);
    assert_eq!(output.status.code(), Some(0), "{output:?}");
}

fn run(args: &[&str], paths: &[&Path]) -> Output {
    Command::new(evcc_bin())
        .args(args)
        .args(paths)
        .env_remove("RUST_LOG")
        .output()
        .expect("run evcc")
}

fn write(dir: &Path, rel: &str, contents: &str) -> PathBuf {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(&path, contents).expect("write fixture");
    path
}

fn evcc_bin() -> &'static str {
    env!("CARGO_BIN_EXE_evcc")
}

fn make_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("{prefix}_{nanos}"));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}
