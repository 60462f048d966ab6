//! # Assembler
//!
//! Owns the validated instruction list and drives all three assembler
//! passes: address assignment, symbol-table construction, and encoding.

pub mod encoder;
pub mod symbol_table;

use crate::diagnostics::DiagnosticSink;
use crate::instruction::Instruction;
use crate::opcode::Opcode;
use crate::operand::Operand;

use encoder::encode_instruction;
use symbol_table::build_symbol_table;

/// Pass 1 — address assignment.
///
/// The first instruction is `.ORIG`; its immediate operand is the starting
/// address. `.ORIG` and `.END` occupy no address of their own and advance
/// the location counter by zero — this implementation resolves the open
/// question in favor of the reading that makes the instruction immediately
/// following `.ORIG` land exactly at `.ORIG`'s operand address, rather than
/// one word past it. Everything else advances by however many words it
/// emits. Arithmetic wraps at 16 bits, matching the target machine's word
/// size.
pub fn assign_addresses(instructions: &mut [Instruction]) {
    let mut address: u16 = match instructions.first() {
        Some(first) if first.opcode == Opcode::Orig => match first.operands.first() {
            Some(Operand::Immediate(v)) => *v as u16,
            _ => 0,
        },
        _ => 0,
    };

    for instruction in instructions.iter_mut() {
        instruction.address = address;
        let advance: u16 = match instruction.opcode {
            Opcode::Orig | Opcode::End => 0,
            Opcode::Fill => 1,
            Opcode::Blkw => match instruction.operands.first() {
                Some(Operand::Number(count)) => (*count).max(0) as u16,
                _ => 0,
            },
            Opcode::Stringz => match instruction.operands.first() {
                Some(Operand::StringLiteral(text)) => text.len() as u16 + 1,
                _ => 0,
            },
            _ => 1,
        };
        address = address.wrapping_add(advance);
    }
}

/// Run all three passes over an already-validated instruction sequence.
/// Returns the emitted `(address, word)` stream, or `None` if pass 2a or
/// 2b reported any diagnostic — an encoding failure yields no word stream
/// rather than a partial one.
#[must_use]
pub fn assemble(
    instructions: &mut [Instruction],
    sink: &mut dyn DiagnosticSink,
) -> Option<Vec<(u16, u16)>> {
    assign_addresses(instructions);

    let symbols = build_symbol_table(instructions, sink)?;

    let mut words = Vec::new();
    let mut all_ok = true;
    for instruction in instructions.iter() {
        match encode_instruction(instruction, &symbols, sink) {
            Some(emitted) => {
                let mut addr = instruction.address;
                for word in emitted {
                    words.push((addr, word));
                    addr = addr.wrapping_add(1);
                }
            }
            None => all_ok = false,
        }
    }

    all_ok.then_some(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::VecSink;
    use crate::parser::parse_instructions;
    use crate::validator::validate;

    fn assemble_source(source: &str) -> (Option<Vec<(u16, u16)>>, VecSink) {
        let mut sink = VecSink::new();
        let mut instructions = parse_instructions(source, &mut sink);
        assert!(sink.is_empty(), "parse diagnostics: {:?}", sink.diagnostics);
        assert!(validate(&instructions, &mut sink), "{:?}", sink.diagnostics);
        let words = assemble(&mut instructions, &mut sink);
        (words, sink)
    }

    #[test]
    fn orig_contributes_no_address_of_its_own() {
        let (words, sink) = assemble_source(".ORIG x3000\nADD R1, R2, R3\n.END\n");
        assert!(sink.is_empty(), "{:?}", sink.diagnostics);
        let words = words.unwrap();
        assert_eq!(words, vec![(0x3000, 0x1283)]);
    }

    #[test]
    fn branch_loop_two_words() {
        let (words, sink) =
            assemble_source(".ORIG x3000\nLOOP ADD R1, R1, #-1\nBRp LOOP\n.END\n");
        assert!(sink.is_empty(), "{:?}", sink.diagnostics);
        assert_eq!(words.unwrap(), vec![(0x3000, 0x127F), (0x3001, 0x01FE)]);
    }

    #[test]
    fn stringz_program() {
        let (words, sink) = assemble_source(".ORIG x3000\nHELLO .STRINGZ \"Hi\"\n.END\n");
        assert!(sink.is_empty(), "{:?}", sink.diagnostics);
        assert_eq!(
            words.unwrap(),
            vec![(0x3000, 0x48), (0x3001, 0x69), (0x3002, 0x0000)]
        );
    }

    #[test]
    fn duplicate_label_yields_no_words() {
        let (words, sink) =
            assemble_source(".ORIG x3000\nFOO .FILL x1\nFOO .FILL x2\n.END\n");
        assert!(words.is_none());
        assert!(!sink.is_empty());
    }
}
