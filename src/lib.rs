//! A two-pass assembler for the LC-3 educational instruction set (Patt &
//! Patel). Source text goes in; a stream of `(address, word)` pairs comes
//! out, or a sequence of structured [`Diagnostic`]s if it doesn't.
//!
//! The pipeline is a straight line: [`lexer`] → [`parser`] →
//! [`validator`] → [`assembler`]. Nothing here touches a file, a terminal,
//! or a process-global error stream — see `main.rs` for that.

pub mod assembler;
pub mod diagnostics;
pub mod instruction;
pub mod lexer;
pub mod opcode;
pub mod operand;
pub mod parser;
pub mod token;
pub mod validator;

pub use diagnostics::{Diagnostic, DiagnosticSink, VecSink};
pub use instruction::Instruction;
pub use opcode::Opcode;
pub use operand::Operand;
pub use token::{Token, TokenKind};

/// The result of a successful assemble: the origin address and the full
/// `(address, word)` stream in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledProgram {
    pub origin: u16,
    pub words: Vec<(u16, u16)>,
}

/// Run the whole pipeline over `source`, reporting every diagnostic it
/// encounters to `sink` along the way. Returns `None` as soon as any stage
/// fails — parsing, validation, or assembly — matching each stage's own
/// "give up, report nothing further built" contract.
#[must_use]
pub fn assemble(source: &str, sink: &mut dyn DiagnosticSink) -> Option<AssembledProgram> {
    log::debug!("parsing {} bytes of source", source.len());
    let mut instructions = parser::parse_instructions(source, sink);
    if instructions.len() == 1 && instructions[0].opcode == Opcode::UnknownOp {
        log::debug!("parser aborted with the sentinel unknown-instruction");
        return None;
    }
    log::debug!("parsed {} instruction(s)", instructions.len());

    log::debug!("validating instruction sequence");
    if !validator::validate(&instructions, sink) {
        log::debug!("validation failed, giving up before assembly");
        return None;
    }

    let origin = match instructions.first().and_then(|i| i.operands.first()) {
        Some(Operand::Immediate(v)) => *v as u16,
        _ => 0,
    };

    log::debug!("assembling from origin x{origin:04X}");
    let words = assembler::assemble(&mut instructions, sink)?;
    log::debug!("emitted {} word(s)", words.len());
    Some(AssembledProgram { origin, words })
}
