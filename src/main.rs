//! Command-line front end: file I/O, output formatting, and diagnostic
//! rendering — everything the core deliberately stays ignorant of.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use lc3_assembler::{assemble, lexer, parser, Diagnostic, VecSink};

/// Two-pass assembler for the LC-3 instruction set.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// LC-3 assembly source file.
    input: PathBuf,

    /// Write the assembled word stream here instead of standard output.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Dump every token the lexer produces, then exit.
    #[arg(short, long)]
    tokens: bool,

    /// Parse and dump every instruction, then exit.
    #[arg(short = 'I', long = "instructions")]
    instructions: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let source = match fs::read_to_string(&cli.input) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{}: {err}", cli.input.display());
            return ExitCode::FAILURE;
        }
    };

    if cli.tokens {
        dump_tokens(&source);
        return ExitCode::SUCCESS;
    }

    if cli.instructions {
        dump_instructions(&source);
        return ExitCode::SUCCESS;
    }

    let mut sink = VecSink::new();
    let program = assemble(&source, &mut sink);

    match program {
        Some(program) => {
            let mut out: Box<dyn Write> = match &cli.output {
                Some(path) => match fs::File::create(path) {
                    Ok(file) => Box::new(file),
                    Err(err) => {
                        eprintln!("{}: {err}", path.display());
                        return ExitCode::FAILURE;
                    }
                },
                None => Box::new(std::io::stdout()),
            };
            for (addr, word) in &program.words {
                if writeln!(out, "({addr:04X}) {word:016b}").is_err() {
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        None => {
            render_diagnostics(&source, &sink.diagnostics);
            ExitCode::FAILURE
        }
    }
}

fn dump_tokens(source: &str) {
    for token in lexer::tokenize(source) {
        println!("{:?} {:?}", token.kind, token.text(source));
    }
}

fn dump_instructions(source: &str) {
    let mut sink = VecSink::new();
    let instructions = parser::parse_instructions(source, &mut sink);
    for instruction in &instructions {
        println!("{instruction}");
    }
}

/// Compute 1-based `(line, column)` for a byte offset into `source`.
fn line_col(source: &str, pos: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for (i, b) in source.bytes().enumerate() {
        if i >= pos {
            break;
        }
        if b == b'\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

fn render_diagnostics(source: &str, diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        match diagnostic.span() {
            Some((begin, _end)) => {
                let (line, col) = line_col(source, begin);
                eprintln!("{line}:{col}: error: {diagnostic}");
            }
            None => eprintln!("error: {diagnostic}"),
        }
    }
}
