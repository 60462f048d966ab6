//! # Parser
//!
//! Consumes the token stream the lexer produces and builds an ordered list
//! of [`Instruction`]s. On any syntax error the parser abandons the whole
//! program and returns a one-element sentinel vector whose sole instruction
//! carries `Opcode::UnknownOp` — the validator and assembler both treat
//! that as "nothing to do here."

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::instruction::Instruction;
use crate::lexer::Lexer;
use crate::opcode::Opcode;
use crate::operand::{self, OperandError};
use crate::token::{Token, TokenKind};

/// Thin wrapper pairing a `Lexer` with a one-token lookahead buffer.
struct TokenCursor<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> TokenCursor<'a> {
    fn new(source: &'a str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self { lexer, current }
    }

    fn peek(&self) -> Token {
        self.current
    }

    /// Consume and return the current token, advancing the lookahead.
    fn bump(&mut self) -> Token {
        let prev = self.current;
        self.current = self.lexer.next_token();
        prev
    }
}

fn skip_eols(cursor: &mut TokenCursor) {
    while cursor.peek().kind == TokenKind::Eol {
        cursor.bump();
    }
}

/// Parse the whole source into an instruction list.
#[must_use]
pub fn parse_instructions(source: &str, sink: &mut dyn DiagnosticSink) -> Vec<Instruction> {
    let mut cursor = TokenCursor::new(source);
    let mut instructions = Vec::new();

    skip_eols(&mut cursor);

    while cursor.peek().kind != TokenKind::End {
        match parse_one_instruction(&mut cursor, source, sink) {
            Ok(instruction) => {
                let hit_end = instruction.opcode == Opcode::End;
                instructions.push(instruction);
                if hit_end {
                    break;
                }
            }
            Err(()) => return vec![Instruction::unknown_sentinel()],
        }
        skip_eols(&mut cursor);
    }

    instructions
}

fn parse_one_instruction(
    cursor: &mut TokenCursor,
    source: &str,
    sink: &mut dyn DiagnosticSink,
) -> Result<Instruction, ()> {
    let mut label = None;

    if cursor.peek().kind == TokenKind::Label {
        let tok = cursor.bump();
        label = Some(tok.text(source).to_string());
        skip_eols(cursor);
    }

    let head = cursor.peek();
    if head.kind != TokenKind::Opcode && head.kind != TokenKind::Pseudo {
        sink.emit(Diagnostic::OpcodeNotAllowedHere {
            span: (head.begin, head.end),
        });
        return Err(());
    }
    let opcode = Opcode::from_mnemonic(head.text(source));
    let start = head.begin;
    let mut last_end = head.end;
    cursor.bump();

    let mut operands = Vec::new();

    match operand::construct(cursor.peek(), source) {
        Err(OperandError::InvalidTokenKind) => {
            // Current token can't start an operand at all — empty list, no advance.
        }
        Err(other) => {
            let tok = cursor.peek();
            sink.emit(Diagnostic::OperandConstructionError {
                source: other,
                span: (tok.begin, tok.end),
            });
            return Err(());
        }
        Ok(first) => {
            let tok = cursor.bump();
            last_end = tok.end;
            operands.push(first);

            while cursor.peek().kind == TokenKind::Comma {
                cursor.bump();
                match operand::construct(cursor.peek(), source) {
                    Ok(next) => {
                        let tok = cursor.bump();
                        last_end = tok.end;
                        operands.push(next);
                    }
                    Err(err) => {
                        let tok = cursor.peek();
                        sink.emit(Diagnostic::OperandConstructionError {
                            source: err,
                            span: (tok.begin, tok.end),
                        });
                        return Err(());
                    }
                }
            }
        }
    }

    Ok(Instruction::new(label, opcode, operands, (start, last_end)))
}
