//! # Instruction
//!
//! The parser's output unit: an optional label, an opcode, an ordered
//! operand list, and an address that starts unset and is filled in by the
//! assembler's first pass.

use crate::opcode::Opcode;
use crate::operand::Operand;

#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub label: Option<String>,
    pub opcode: Opcode,
    pub operands: Vec<Operand>,
    /// Filled in by the assembler's pass 1; `0` until then.
    pub address: u16,
    /// `[begin, end)` byte span covering this instruction in the source,
    /// for diagnostic rendering.
    pub span: (usize, usize),
}

impl Instruction {
    pub fn new(
        label: Option<String>,
        opcode: Opcode,
        operands: Vec<Operand>,
        span: (usize, usize),
    ) -> Self {
        Self {
            label,
            opcode,
            operands,
            address: 0,
            span,
        }
    }

    /// The sentinel "abort" instruction the parser returns as its entire
    /// result on any unrecoverable syntax error.
    pub fn unknown_sentinel() -> Self {
        Self::new(None, Opcode::UnknownOp, Vec::new(), (0, 0))
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(label) = &self.label {
            write!(f, "{label} ")?;
        }
        write!(f, "{}", self.opcode)?;
        if !self.operands.is_empty() {
            f.write_str(" ")?;
            for (i, op) in self.operands.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{op}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::VecSink;
    use crate::operand::Operand;
    use crate::parser::parse_instructions;

    /// Re-lex and re-parse a single instruction's own `Display` form and
    /// check the result is structurally identical (label, opcode, operand
    /// list — not byte span or address, which aren't part of the text).
    fn round_trips(instruction: &Instruction) {
        let text = format!("{instruction}\n");
        let mut sink = VecSink::new();
        let reparsed = parse_instructions(&text, &mut sink);
        assert!(sink.is_empty(), "re-lexing {text:?} produced: {:?}", sink.diagnostics);
        assert_eq!(reparsed.len(), 1, "expected exactly one instruction from {text:?}");
        assert_eq!(reparsed[0].label, instruction.label);
        assert_eq!(reparsed[0].opcode, instruction.opcode);
        assert_eq!(reparsed[0].operands, instruction.operands);
    }

    #[test]
    fn round_trip_register_form() {
        round_trips(&Instruction::new(
            None,
            Opcode::Add,
            vec![Operand::Register(1), Operand::Register(2), Operand::Register(3)],
            (0, 0),
        ));
    }

    #[test]
    fn round_trip_immediate_form() {
        round_trips(&Instruction::new(
            None,
            Opcode::Add,
            vec![Operand::Register(1), Operand::Register(1), Operand::Immediate(-1)],
            (0, 0),
        ));
    }

    #[test]
    fn round_trip_labeled_branch() {
        round_trips(&Instruction::new(
            Some("LOOP".to_string()),
            Opcode::BrP,
            vec![Operand::Label("LOOP".to_string())],
            (0, 0),
        ));
    }

    #[test]
    fn round_trip_string_literal() {
        round_trips(&Instruction::new(
            Some("HELLO".to_string()),
            Opcode::Stringz,
            vec![Operand::StringLiteral("Hi".to_string())],
            (0, 0),
        ));
    }

    #[test]
    fn round_trip_zero_operand_instruction() {
        round_trips(&Instruction::new(None, Opcode::Halt, Vec::new(), (0, 0)));
    }

    #[test]
    fn display_skips_the_operand_separator_when_there_are_none() {
        let instr = Instruction::new(None, Opcode::Rti, Vec::new(), (0, 0));
        assert_eq!(instr.to_string(), "RTI");
    }
}
