//! # Validator
//!
//! Per-instruction semantic checks: operand arity, operand-type
//! polymorphism, and immediate-range conformance, plus the two
//! program-level structural rules around `.ORIG`.

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::instruction::Instruction;
use crate::opcode::Opcode;
use crate::operand::{Operand, OperandType};

/// One accepted operand-type tuple for a mnemonic. `ADD`/`AND` are the only
/// opcodes with more than one tuple, and both tuples share a length, so
/// arity and type-tuple matching can be checked as separate steps without
/// the tuple set ever disagreeing on how many operands are expected.
fn accepted_tuples(opcode: Opcode) -> &'static [&'static [OperandType]] {
    use OperandType::*;
    match opcode {
        Opcode::Add | Opcode::And => &[&[Register, Register, Register], &[Register, Register, Immediate]],
        Opcode::Br
        | Opcode::BrN
        | Opcode::BrZ
        | Opcode::BrP
        | Opcode::BrZp
        | Opcode::BrNp
        | Opcode::BrNz
        | Opcode::BrNzp
        | Opcode::Jsr => &[&[Label], &[Immediate]],
        Opcode::Jmp | Opcode::Jsrr => &[&[Register]],
        Opcode::Ld | Opcode::Ldi | Opcode::Lea | Opcode::St | Opcode::Sti => {
            &[&[Register, Label]]
        }
        Opcode::Ldr | Opcode::Str => &[&[Register, Register, Immediate]],
        Opcode::Not => &[&[Register, Register]],
        Opcode::Ret
        | Opcode::Rti
        | Opcode::Getc
        | Opcode::Out
        | Opcode::Puts
        | Opcode::In
        | Opcode::Putsp
        | Opcode::Halt => &[&[]],
        Opcode::Trap => &[&[Immediate]],
        Opcode::Orig | Opcode::Fill => &[&[Immediate]],
        Opcode::Blkw => &[&[Number]],
        Opcode::Stringz => &[&[StringLiteral]],
        Opcode::End => &[&[]],
        Opcode::UnknownOp => &[],
    }
}

/// `[min, max]` inclusive bound for an opcode's Immediate/Number operand, if
/// it has one. `None` means the opcode has no such operand to bound.
fn immediate_range(opcode: Opcode) -> Option<(i32, i32)> {
    match opcode {
        Opcode::Add | Opcode::And => Some((-16, 15)),
        Opcode::Br
        | Opcode::BrN
        | Opcode::BrZ
        | Opcode::BrP
        | Opcode::BrZp
        | Opcode::BrNp
        | Opcode::BrNz
        | Opcode::BrNzp => Some((-256, 255)),
        Opcode::Jsr => Some((-1024, 1023)),
        Opcode::Ldr | Opcode::Str => Some((-32, 31)),
        Opcode::Trap => Some((0, 255)),
        Opcode::Orig | Opcode::Fill => Some((i16::MIN as i32, i16::MAX as i32)),
        // A reserve count is a word count, not a signed quantity. A negative
        // count has no sensible encoding, so it's rejected here with a
        // reported diagnostic rather than silently floored to zero words
        // during address assignment and encoding.
        Opcode::Blkw => Some((0, i16::MAX as i32)),
        _ => None,
    }
}

fn expected_len_description(tuples: &[&[OperandType]]) -> &'static str {
    match tuples.first().map(|t| t.len()) {
        Some(0) => "0",
        Some(1) => "1",
        Some(2) => "2",
        Some(3) => "3",
        _ => "?",
    }
}

fn tuple_matches(tuple: &[OperandType], operands: &[Operand]) -> bool {
    tuple.len() == operands.len()
        && tuple
            .iter()
            .zip(operands.iter())
            .all(|(expected, actual)| *expected == actual.operand_type())
}

/// Extract the numeric value out of whichever operand is first tagged
/// `Immediate` or `Number`, if any.
fn first_numeric_operand(operands: &[Operand]) -> Option<i32> {
    operands.iter().find_map(|op| match op {
        Operand::Immediate(v) | Operand::Number(v) => Some(*v as i32),
        _ => None,
    })
}

fn validate_instruction(instruction: &Instruction, sink: &mut dyn DiagnosticSink) -> bool {
    let opcode = instruction.opcode;

    if matches!(opcode, Opcode::Orig | Opcode::End) && instruction.label.is_some() {
        sink.emit(Diagnostic::InstructionDisallowsLabel {
            opcode,
            span: instruction.span,
        });
        return false;
    }

    let tuples = accepted_tuples(opcode);
    let required_len = tuples.first().map_or(0, |t| t.len());

    if instruction.operands.len() != required_len {
        sink.emit(Diagnostic::OperandArityMismatch {
            opcode,
            expected: expected_len_description(tuples),
            found: instruction.operands.len(),
            span: instruction.span,
        });
        return false;
    }

    let matched = tuples.iter().any(|tuple| tuple_matches(tuple, &instruction.operands));
    if !matched {
        sink.emit(Diagnostic::OperandTypeMismatch {
            opcode,
            span: instruction.span,
        });
        return false;
    }

    if let Some((min, max)) = immediate_range(opcode) {
        if let Some(value) = first_numeric_operand(&instruction.operands) {
            if value < min || value > max {
                sink.emit(Diagnostic::ImmediateOutOfRange {
                    opcode,
                    value,
                    min,
                    max,
                    span: instruction.span,
                });
                return false;
            }
        }
    }

    true
}

/// Validate the whole instruction sequence, including the program-level
/// `.ORIG` structural rules. Returns `true` iff every check passed.
#[must_use]
pub fn validate(instructions: &[Instruction], sink: &mut dyn DiagnosticSink) -> bool {
    let mut ok = true;

    match instructions.first() {
        Some(first) if first.opcode == Opcode::Orig => {}
        _ => {
            sink.emit(Diagnostic::OrigMissing);
            ok = false;
        }
    }

    let mut seen_orig = false;
    for instruction in instructions {
        if instruction.opcode == Opcode::Orig {
            if seen_orig {
                sink.emit(Diagnostic::OrigDuplicated {
                    span: instruction.span,
                });
                ok = false;
            }
            seen_orig = true;
        }
    }

    for instruction in instructions {
        if !validate_instruction(instruction, sink) {
            ok = false;
        }
    }

    ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::VecSink;
    use crate::parser::parse_instructions;

    fn check(source: &str) -> (bool, VecSink) {
        let mut sink = VecSink::new();
        let instructions = parse_instructions(source, &mut sink);
        assert!(sink.is_empty(), "unexpected parse diagnostics: {:?}", sink.diagnostics);
        let ok = validate(&instructions, &mut sink);
        (ok, sink)
    }

    #[test]
    fn well_formed_program_passes() {
        let (ok, sink) = check(".ORIG x3000\nADD R1, R2, R3\n.END\n");
        assert!(ok, "{:?}", sink.diagnostics);
    }

    #[test]
    fn add_accepts_immediate_third_operand() {
        let (ok, sink) = check(".ORIG x3000\nADD R1, R2, #5\n.END\n");
        assert!(ok, "{:?}", sink.diagnostics);
    }

    #[test]
    fn add_immediate_out_of_range() {
        let (ok, sink) = check(".ORIG x3000\nADD R1, R2, #16\n.END\n");
        assert!(!ok);
        assert!(matches!(
            sink.diagnostics[0],
            Diagnostic::ImmediateOutOfRange { .. }
        ));
    }

    #[test]
    fn add_wrong_arity() {
        let (ok, sink) = check(".ORIG x3000\nADD R1, R2\n.END\n");
        assert!(!ok);
        assert!(matches!(
            sink.diagnostics[0],
            Diagnostic::OperandArityMismatch { .. }
        ));
    }

    #[test]
    fn add_wrong_type() {
        let (ok, sink) = check(".ORIG x3000\nADD R1, R2, LOOP\nLOOP HALT\n.END\n");
        assert!(!ok);
        assert!(matches!(
            sink.diagnostics[0],
            Diagnostic::OperandTypeMismatch { .. }
        ));
    }

    #[test]
    fn branch_accepts_label_or_immediate() {
        let (ok, _) = check(".ORIG x3000\nLOOP BRp LOOP\n.END\n");
        assert!(ok);
        let (ok, _) = check(".ORIG x3000\nBRp #5\n.END\n");
        assert!(ok);
    }

    #[test]
    fn zero_operand_opcode_rejects_operands() {
        let (ok, sink) = check(".ORIG x3000\nHALT R1\n.END\n");
        assert!(!ok);
        assert!(matches!(
            sink.diagnostics[0],
            Diagnostic::OperandArityMismatch { .. }
        ));
    }

    #[test]
    fn orig_cannot_carry_a_label() {
        let (ok, sink) = check("START .ORIG x3000\n.END\n");
        assert!(!ok);
        assert!(matches!(
            sink.diagnostics[0],
            Diagnostic::InstructionDisallowsLabel { .. }
        ));
    }

    #[test]
    fn missing_orig_is_flagged() {
        let (ok, sink) = check("ADD R1, R2, R3\n.END\n");
        assert!(!ok);
        assert!(matches!(sink.diagnostics[0], Diagnostic::OrigMissing));
    }

    #[test]
    fn duplicate_orig_is_flagged() {
        let (ok, sink) = check(".ORIG x3000\n.ORIG x4000\n.END\n");
        assert!(!ok);
        assert!(sink
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::OrigDuplicated { .. })));
    }

    #[test]
    fn stringz_accepts_string_literal() {
        let (ok, sink) = check(".ORIG x3000\nHELLO .STRINGZ \"Hi\"\n.END\n");
        assert!(ok, "{:?}", sink.diagnostics);
    }

    #[test]
    fn blkw_range_accepts_up_to_i16_max() {
        let (ok, sink) = check(".ORIG x3000\nBUF .BLKW 32767\n.END\n");
        assert!(ok, "{:?}", sink.diagnostics);
    }

    #[test]
    fn blkw_rejects_negative_count() {
        let (ok, sink) = check(".ORIG x3000\nBUF .BLKW -1\n.END\n");
        assert!(!ok);
        assert!(matches!(
            sink.diagnostics[0],
            Diagnostic::ImmediateOutOfRange { .. }
        ));
    }

    #[test]
    fn end_carries_no_operands_and_no_label() {
        let (ok, sink) = check(".ORIG x3000\n.END\n");
        assert!(ok, "{:?}", sink.diagnostics);
    }
}
