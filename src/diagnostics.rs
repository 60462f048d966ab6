//! # Diagnostics
//!
//! Structured events the core emits instead of writing directly to a
//! process-global stream. `DiagnosticSink` is passed explicitly through
//! every stage that can fail, so tests can assert on exactly what was
//! reported without capturing stdout/stderr.

use crate::opcode::Opcode;
use crate::operand::OperandError;
use thiserror::Error;

/// `[begin, end)` byte span a diagnostic points at, mirroring `Token`'s span
/// shape. Rendering it as `line:col` is the CLI's job, not the core's.
pub type Span = (usize, usize);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("label '{label}' is already defined at a prior address")]
    LabelRedefined { label: String, first: Span, second: Span },

    #[error("label '{label}' is not defined anywhere in the program")]
    LabelNotFound { label: String, span: Span },

    #[error(
        "PC offset {offset} to label '{label}' exceeds the {bits}-bit signed range"
    )]
    LabelOffsetOutOfRange {
        label: String,
        span: Span,
        offset: i32,
        bits: u8,
    },

    #[error("opcode not allowed here")]
    OpcodeNotAllowedHere { span: Span },

    #[error("could not build an operand: {source:?}")]
    OperandConstructionError { source: OperandError, span: Span },

    #[error("{opcode} expects {expected} operand(s), found {found}")]
    OperandArityMismatch {
        opcode: Opcode,
        expected: &'static str,
        found: usize,
        span: Span,
    },

    #[error("{opcode} does not accept this combination of operand types")]
    OperandTypeMismatch { opcode: Opcode, span: Span },

    #[error("immediate value {value} is out of range [{min}, {max}] for {opcode}")]
    ImmediateOutOfRange {
        opcode: Opcode,
        value: i32,
        min: i32,
        max: i32,
        span: Span,
    },

    #[error(".ORIG directive is missing; it must be the first instruction")]
    OrigMissing,

    #[error(".ORIG directive appears more than once")]
    OrigDuplicated { span: Span },

    #[error("{opcode} may not carry a label")]
    InstructionDisallowsLabel { opcode: Opcode, span: Span },
}

impl Diagnostic {
    /// The primary source span this diagnostic points at, for a front-end
    /// to render as `line:col`. `.ORIG`-missing has no location of its own
    /// — it's a property of the whole program.
    pub fn span(&self) -> Option<Span> {
        match self {
            Diagnostic::LabelRedefined { second, .. } => Some(*second),
            Diagnostic::LabelNotFound { span, .. }
            | Diagnostic::LabelOffsetOutOfRange { span, .. }
            | Diagnostic::OpcodeNotAllowedHere { span }
            | Diagnostic::OperandConstructionError { span, .. }
            | Diagnostic::OperandArityMismatch { span, .. }
            | Diagnostic::OperandTypeMismatch { span, .. }
            | Diagnostic::ImmediateOutOfRange { span, .. }
            | Diagnostic::OrigDuplicated { span }
            | Diagnostic::InstructionDisallowsLabel { span, .. } => Some(*span),
            Diagnostic::OrigMissing => None,
        }
    }
}

/// Receives diagnostics as the pipeline discovers them, in source order.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

/// Collects every diagnostic emitted, preserving order — used by tests and
/// by any front-end that wants to batch-render after the fact.
#[derive(Debug, Default)]
pub struct VecSink {
    pub diagnostics: Vec<Diagnostic>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl DiagnosticSink for VecSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        log::trace!("diagnostic: {diagnostic}");
        self.diagnostics.push(diagnostic);
    }
}
