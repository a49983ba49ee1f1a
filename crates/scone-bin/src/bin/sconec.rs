use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};

use scone::parser::SyntaxTree;
use scone::program::{Options, ProgramContext};
use scone::scanner::TokenStream;
use scone::source::SourceManager;

const USAGE: &str = "usage: sconec <file.c> [--pedantic] [--pedantic-errors] [--dump-ast]";

struct Args {
    filepath: String,
    opts: Options,
    dump_ast: bool,
}

fn parse_args() -> Result<Args> {
    let mut filepath = None;
    let mut opts = Options::default();
    let mut dump_ast = false;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--pedantic" => opts.pedantic = true,
            "--pedantic-errors" => {
                opts.pedantic = true;
                opts.pedantic_errors = true;
            }
            "--dump-ast" => dump_ast = true,
            other if other.starts_with('-') => bail!("unknown option '{}'\n{}", other, USAGE),
            other => {
                if filepath.replace(other.to_string()).is_some() {
                    bail!("more than one input file\n{}", USAGE);
                }
            }
        }
    }

    match filepath {
        Some(filepath) => Ok(Args { filepath, opts, dump_ast }),
        None => bail!("no input file\n{}", USAGE),
    }
}

fn run() -> Result<bool> {
    let args = parse_args()?;

    let source = SourceManager::from_path(&args.filepath)
        .with_context(|| format!("cannot read '{}'", args.filepath))?;

    let mut program = ProgramContext::new(args.opts);
    let tokens = TokenStream::tokenize(&mut program, &source);
    let tree = SyntaxTree::parse(&mut program, &tokens);

    program.write_reports(&mut io::stderr().lock())?;

    if let Some(tree) = &tree {
        if args.dump_ast {
            io::stdout().lock().write_all(tree.dump(&source).as_bytes())?;
        }
    }

    Ok(tree.is_some() && !program.has_errors())
}

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("sconec: {:#}", error);
            ExitCode::FAILURE
        }
    }
}
