//! Credence CLI entry point.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use credence_runtime::{Repl, Session, serialize};

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    snapshot: Option<PathBuf>,
    show_help: bool,
    show_version: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            arg if arg.starts_with('-') => {
                return Err(format!("unknown option: {arg}").into());
            }
            path => {
                if config.snapshot.is_some() {
                    return Err("at most one snapshot file may be given".into());
                }
                config.snapshot = Some(PathBuf::from(path));
            }
        }
        i += 1;
    }

    Ok(config)
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args(args)?;

    if config.show_help {
        print_help();
        return Ok(());
    }

    if config.show_version {
        println!("credence {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut repl = Repl::new()?;

    if let Some(path) = &config.snapshot {
        let store = serialize::load_from_file(path)?;
        let session = Session::from_store(store, Box::new(credence_runtime::SystemClock));
        repl = repl.with_session(session).without_banner();
        eprintln!("loaded snapshot from {}", path.display());
    }

    repl.run()?;
    Ok(())
}

fn print_help() {
    println!(
        "\x1b[1mCredence\x1b[0m - probabilistic concept base

\x1b[1mUSAGE:\x1b[0m
    credence [OPTIONS] [SNAPSHOT]

\x1b[1mARGUMENTS:\x1b[0m
    [SNAPSHOT]    MessagePack snapshot to load before starting the shell

\x1b[1mOPTIONS:\x1b[0m
    -h, --help       Print help information
    -V, --version    Print version information

\x1b[1mEXAMPLES:\x1b[0m
    credence                  Start an empty concept base
    credence animals.mp       Resume from a saved snapshot

\x1b[1mSHELL COMMANDS:\x1b[0m
    concept <name>                         Create a concept
    assert <from> <type> <to> <p> <c>      Assert a weighted edge
    infer <start> [options]                Derive relationships
    save <path> / load <path>              Snapshot to/from disk
    help                                   Full command list
    Ctrl+D                                 Exit"
    );
}
