//! # Symbol table
//!
//! Pass 2a: a label → address map, built once and consulted read-only
//! during pass 2b.

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::instruction::Instruction;

/// Insertion-ordered label → address map. A `Vec` rather than a `HashMap`
/// keeps lookups linear in label count, which is never large enough for
/// LC-3 programs to matter, and keeps iteration order equal to definition
/// order if a caller ever wants to dump it.
#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: Vec<(String, u16, crate::diagnostics::Span)>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, label: &str) -> Option<u16> {
        self.entries
            .iter()
            .find(|(name, _, _)| name == label)
            .map(|(_, addr, _)| *addr)
    }

    fn first_span(&self, label: &str) -> Option<crate::diagnostics::Span> {
        self.entries
            .iter()
            .find(|(name, _, _)| name == label)
            .map(|(_, _, span)| *span)
    }
}

/// Build the symbol table from an already address-assigned instruction
/// sequence. Returns `None` (after emitting a `LabelRedefined` diagnostic)
/// the first time a label is inserted twice.
pub fn build_symbol_table(
    instructions: &[Instruction],
    sink: &mut dyn DiagnosticSink,
) -> Option<SymbolTable> {
    let mut table = SymbolTable::new();
    for instruction in instructions {
        let Some(label) = &instruction.label else {
            continue;
        };
        if let Some(first) = table.first_span(label) {
            sink.emit(Diagnostic::LabelRedefined {
                label: label.clone(),
                first,
                second: instruction.span,
            });
            return None;
        }
        table
            .entries
            .push((label.clone(), instruction.address, instruction.span));
    }
    Some(table)
}
