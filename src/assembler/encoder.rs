//! # Encoder
//!
//! Pass 2b: turns each validated, address-assigned `Instruction` into zero
//! or more 16-bit words. PC-relative labels are resolved against the symbol
//! table built in pass 2a.

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::instruction::Instruction;
use crate::opcode::Opcode;
use crate::operand::Operand;

use super::symbol_table::SymbolTable;

fn opcode_bits(opcode: Opcode) -> u16 {
    match opcode {
        Opcode::Add => 0b0001,
        Opcode::And => 0b0101,
        Opcode::Br | Opcode::BrN | Opcode::BrZ | Opcode::BrP | Opcode::BrZp | Opcode::BrNp
        | Opcode::BrNz | Opcode::BrNzp => 0b0000,
        Opcode::Jmp | Opcode::Ret => 0b1100,
        Opcode::Jsr | Opcode::Jsrr => 0b0100,
        Opcode::Ld => 0b0010,
        Opcode::Ldi => 0b1010,
        Opcode::Ldr => 0b0110,
        Opcode::Lea => 0b1110,
        Opcode::Not => 0b1001,
        Opcode::Rti => 0b1000,
        Opcode::St => 0b0011,
        Opcode::Sti => 0b1011,
        Opcode::Str => 0b0111,
        Opcode::Trap | Opcode::Getc | Opcode::Out | Opcode::Puts | Opcode::In | Opcode::Putsp
        | Opcode::Halt => 0b1111,
        _ => unreachable!("opcode_bits called on a pseudo-op or UnknownOp"),
    }
}

fn trapvect8(opcode: Opcode) -> u16 {
    match opcode {
        Opcode::Getc => 0x20,
        Opcode::Out => 0x21,
        Opcode::Puts => 0x22,
        Opcode::In => 0x23,
        Opcode::Putsp => 0x24,
        Opcode::Halt => 0x25,
        _ => unreachable!("trapvect8 called on a non-named-trap opcode"),
    }
}

fn register_operand(operands: &[Operand], index: usize) -> u16 {
    match operands[index] {
        Operand::Register(r) => r as u16,
        _ => unreachable!("validator guarantees operand {index} is a register"),
    }
}

/// Mask the low `bits` bits of a signed value into an unsigned field.
fn low_bits(value: i32, bits: u32) -> u16 {
    (value as u32 & ((1u32 << bits) - 1)) as u16
}

/// Resolve a `Label`/`Immediate` dual-form operand (BR*, JSR) to the raw
/// PC-relative offset it contributes, range-checked to `bits` signed bits.
fn resolve_pc_offset(
    operand: &Operand,
    opcode: Opcode,
    instr_address: u16,
    bits: u32,
    symbols: &SymbolTable,
    span: (usize, usize),
    sink: &mut dyn DiagnosticSink,
) -> Option<i32> {
    let offset = match operand {
        Operand::Immediate(v) => *v as i32,
        Operand::Label(name) => {
            let Some(target) = symbols.get(name) else {
                sink.emit(Diagnostic::LabelNotFound {
                    label: name.clone(),
                    span,
                });
                return None;
            };
            target as i32 - instr_address as i32 - 1
        }
        _ => unreachable!("validator guarantees this operand is Label or Immediate"),
    };

    let half = 1i32 << (bits - 1);
    if offset < -half || offset > half - 1 {
        let label = match operand {
            Operand::Label(name) => name.clone(),
            _ => String::new(),
        };
        sink.emit(Diagnostic::LabelOffsetOutOfRange {
            label,
            span,
            offset,
            bits: bits as u8,
        });
        return None;
    }
    Some(offset)
}

/// Encode one instruction into zero or more words. Returns `None` (after
/// emitting a diagnostic) if a label fails to resolve or an offset doesn't
/// fit its field.
pub fn encode_instruction(
    instruction: &Instruction,
    symbols: &SymbolTable,
    sink: &mut dyn DiagnosticSink,
) -> Option<Vec<u16>> {
    let ops = &instruction.operands;
    let addr = instruction.address;
    let span = instruction.span;

    match instruction.opcode {
        Opcode::Orig | Opcode::End => Some(Vec::new()),

        Opcode::Fill => {
            let value = match ops[0] {
                Operand::Immediate(v) => v,
                _ => unreachable!(),
            };
            Some(vec![value as u16])
        }

        Opcode::Blkw => {
            let count = match ops[0] {
                Operand::Number(v) => v,
                _ => unreachable!(),
            };
            Some(vec![0u16; count.max(0) as usize])
        }

        Opcode::Stringz => {
            let text = match &ops[0] {
                Operand::StringLiteral(s) => s,
                _ => unreachable!(),
            };
            let mut words: Vec<u16> = text.bytes().map(|b| b as u16).collect();
            words.push(0);
            Some(words)
        }

        Opcode::Add | Opcode::And => {
            let dr = register_operand(ops, 0);
            let sr1 = register_operand(ops, 1);
            let word = opcode_bits(instruction.opcode) << 12 | dr << 9 | sr1 << 6;
            let word = match ops[2] {
                Operand::Register(sr2) => word | (sr2 as u16),
                Operand::Immediate(imm) => word | 1 << 5 | low_bits(imm as i32, 5),
                _ => unreachable!(),
            };
            Some(vec![word])
        }

        op if op.is_branch() => {
            let offset = resolve_pc_offset(&ops[0], op, addr, 9, symbols, span, sink)?;
            let word = opcode_bits(op) << 12 | op.branch_nzp_mask() << 9 | low_bits(offset, 9);
            Some(vec![word])
        }

        Opcode::Jmp => {
            let base = register_operand(ops, 0);
            Some(vec![opcode_bits(Opcode::Jmp) << 12 | base << 6])
        }
        Opcode::Ret => Some(vec![opcode_bits(Opcode::Ret) << 12 | 7 << 6]),

        Opcode::Jsr => {
            let offset = resolve_pc_offset(&ops[0], Opcode::Jsr, addr, 11, symbols, span, sink)?;
            Some(vec![opcode_bits(Opcode::Jsr) << 12 | 1 << 11 | low_bits(offset, 11)])
        }
        Opcode::Jsrr => {
            let base = register_operand(ops, 0);
            Some(vec![opcode_bits(Opcode::Jsrr) << 12 | base << 6])
        }

        Opcode::Ld | Opcode::Ldi | Opcode::Lea | Opcode::St | Opcode::Sti => {
            let dr = register_operand(ops, 0);
            let offset = resolve_pc_offset(&ops[1], instruction.opcode, addr, 9, symbols, span, sink)?;
            Some(vec![opcode_bits(instruction.opcode) << 12 | dr << 9 | low_bits(offset, 9)])
        }

        Opcode::Ldr | Opcode::Str => {
            let dr = register_operand(ops, 0);
            let base = register_operand(ops, 1);
            let offset = match ops[2] {
                Operand::Immediate(v) => v as i32,
                _ => unreachable!(),
            };
            let word = opcode_bits(instruction.opcode) << 12
                | dr << 9
                | base << 6
                | low_bits(offset, 6);
            Some(vec![word])
        }

        Opcode::Not => {
            let dr = register_operand(ops, 0);
            let sr = register_operand(ops, 1);
            Some(vec![opcode_bits(Opcode::Not) << 12 | dr << 9 | sr << 6 | 0b111111])
        }

        Opcode::Rti => Some(vec![opcode_bits(Opcode::Rti) << 12]),

        Opcode::Trap => {
            let vect = match ops[0] {
                Operand::Immediate(v) => v as u16,
                _ => unreachable!(),
            };
            Some(vec![opcode_bits(Opcode::Trap) << 12 | (vect & 0xFF)])
        }

        op @ (Opcode::Getc | Opcode::Out | Opcode::Puts | Opcode::In | Opcode::Putsp | Opcode::Halt) => {
            Some(vec![opcode_bits(op) << 12 | trapvect8(op)])
        }

        Opcode::UnknownOp => Some(Vec::new()),
    }
}
