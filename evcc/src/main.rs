use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use evclib::bytecode::{Disassembler, EvScript};
use evclib::resolver::collect_sources;
use evclib::{CompileError, CompileErrorKind, CompileOptions, CompiledFile, compile_file};
use tracing::debug;
use tracing_subscriber::filter::EnvFilter;

const EXIT_OK: u8 = 0;
const EXIT_USAGE: u8 = 2;
const EXIT_IO: u8 = 3;
const EXIT_SYNTAX: u8 = 10;
const EXIT_SEMANTIC: u8 = 11;
const EXIT_DECODE: u8 = 13;

#[derive(Parser)]
#[command(name = "evcc", version, about = "Compiler for .evc event scripts")]
struct Cli {
    /// Log compiler progress (repeat for more detail). `RUST_LOG` wins.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory searched for `<name>/lib.evc` when an import is not next
    /// to the importing file.
    #[arg(long, global = true, value_name = "DIR")]
    lib_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a file and report the first error, if any.
    Check { file: PathBuf },
    /// Compile files (or every `.evc` below a directory) to `.evbc`.
    Build {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Output directory; defaults to each input's directory.
        #[arg(short, long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
        /// Also write a `.ev` disassembly next to each `.evbc`.
        #[arg(long)]
        text: bool,
    },
    /// Print the text form of a `.evc` or `.evbc` file.
    Disasm { file: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = match &cli.lib_root {
        Some(root) => CompileOptions::default().with_library_root(root),
        None => CompileOptions::default(),
    };
    let result = match &cli.command {
        Commands::Check { file } => check_file(file, &options),
        Commands::Build {
            inputs,
            out_dir,
            text,
        } => build(inputs, out_dir.as_deref(), *text, &options),
        Commands::Disasm { file } => disasm_file(file, &options),
    };
    match result {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(EXIT_IO)
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn check_file(path: &Path, options: &CompileOptions) -> Result<u8> {
    match compile_file(path, options) {
        Ok(_) => {
            println!("ok: {}", path.display());
            Ok(EXIT_OK)
        }
        Err(err) => Ok(report(&err)),
    }
}

fn build(inputs: &[PathBuf], out_dir: Option<&Path>, text: bool, options: &CompileOptions) -> Result<u8> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            files.extend(collect_sources(input, options)?);
        } else {
            files.push(input.clone());
        }
    }
    if files.is_empty() {
        eprintln!("No `.{}` files found", options.source_extension);
        return Ok(EXIT_USAGE);
    }
    if let Some(dir) = out_dir {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create `{}`", dir.display()))?;
    }

    for file in &files {
        debug!(file = %file.display(), "building");
        let compiled = match compile_file(file, options) {
            Ok(c) => c,
            Err(err) => return Ok(report(&err)),
        };
        let target = output_path(file, out_dir, "evbc");
        if let Err(e) = fs::write(&target, compiled.script.to_bytes()) {
            eprintln!("Failed to write `{}`: {e}", target.display());
            return Ok(EXIT_IO);
        }
        println!("built: {}", target.display());
        if text {
            let listing = output_path(file, out_dir, "ev");
            if let Err(e) = fs::write(&listing, compiled.disassemble()) {
                eprintln!("Failed to write `{}`: {e}", listing.display());
                return Ok(EXIT_IO);
            }
        }
    }
    Ok(EXIT_OK)
}

fn output_path(input: &Path, out_dir: Option<&Path>, ext: &str) -> PathBuf {
    let name = input.with_extension(ext);
    match (out_dir, name.file_name()) {
        (Some(dir), Some(file_name)) => dir.join(file_name),
        _ => name,
    }
}

fn disasm_file(path: &Path, options: &CompileOptions) -> Result<u8> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("evbc") => {
            let bytes = match fs::read(path) {
                Ok(b) => b,
                Err(e) => {
                    eprintln!("Failed to read `{}`: {e}", path.display());
                    return Ok(EXIT_IO);
                }
            };
            let script = match EvScript::from_bytes(&bytes) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Failed to decode `{}`: {e}", path.display());
                    return Ok(EXIT_DECODE);
                }
            };
            println!("{}", Disassembler::new().render(&script));
            Ok(EXIT_OK)
        }
        Some(ext) if ext == options.source_extension => {
            let compiled: CompiledFile = match compile_file(path, options) {
                Ok(c) => c,
                Err(err) => return Ok(report(&err)),
            };
            println!("{}", compiled.disassemble());
            Ok(EXIT_OK)
        }
        _ => {
            eprintln!("disasm supports only .evc and .evbc files");
            Ok(EXIT_USAGE)
        }
    }
}

fn report(err: &CompileError) -> u8 {
    match &err.kind {
        CompileErrorKind::Syntax(diagnostics) => {
            for d in diagnostics.as_slice() {
                eprintln!("[{}] {}", err.code(), d.render(&err.location.path));
            }
            EXIT_SYNTAX
        }
        CompileErrorKind::Io => {
            eprintln!("[{}] {}", err.code(), err.message);
            EXIT_IO
        }
        _ => {
            eprintln!("[{}] {err}", err.code());
            EXIT_SEMANTIC
        }
    }
}
