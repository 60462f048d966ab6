//! # Operand construction
//!
//! Turns a [`Token`] into a typed [`Operand`], folding numeric literal text
//! into the signed 16-bit domain the LC-3 ISA actually operates in.

use crate::token::{Token, TokenKind};

/// Closed set of operand type tags, used by the validator to check a
/// mnemonic's accepted operand-type tuples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandType {
    Register,
    Immediate,
    Number,
    Label,
    StringLiteral,
}

/// A typed operand value. `Label` and `StringLiteral` own their text rather
/// than borrowing the source buffer — threading a source lifetime through
/// every downstream stage (parser → validator → assembler → symbol table →
/// diagnostics) would be awkward, so this is an explicit, documented trade
/// against the zero-copy `Token`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// `0..=7`.
    Register(u8),
    /// A prefixed literal (`#n`, `xH`, `bB`) folded to its signed 16-bit value.
    Immediate(i16),
    /// A bare decimal literal — only ever the `.BLKW` count operand.
    Number(i16),
    Label(String),
    StringLiteral(String),
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Register(r) => write!(f, "R{r}"),
            Operand::Immediate(v) => write!(f, "#{v}"),
            Operand::Number(v) => write!(f, "{v}"),
            Operand::Label(s) => f.write_str(s),
            Operand::StringLiteral(s) => write!(f, "\"{s}\""),
        }
    }
}

impl Operand {
    pub fn operand_type(&self) -> OperandType {
        match self {
            Operand::Register(_) => OperandType::Register,
            Operand::Immediate(_) => OperandType::Immediate,
            Operand::Number(_) => OperandType::Number,
            Operand::Label(_) => OperandType::Label,
            Operand::StringLiteral(_) => OperandType::StringLiteral,
        }
    }
}

/// Errors that can arise while turning a single token into an `Operand`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandError {
    InvalidTokenKind,
    InvalidNumber,
    IntegerOverflow,
    MissingQuote,
}

/// Fold a raw integer `n` into the signed 16-bit domain: `n` is accepted iff
/// `n ∈ [-32768, 65535]`; values in `[32768, 65535]` are reinterpreted as
/// their two's-complement `i16`.
fn fold_to_i16(n: i64) -> Result<i16, OperandError> {
    match n {
        n if (-32768..=32767).contains(&n) => Ok(n as i16),
        n if (32768..=65535).contains(&n) => Ok((n - 65536) as i16),
        _ => Err(OperandError::IntegerOverflow),
    }
}

/// Decode the numeric value of an `Immediate` or `Number` token's slice.
fn decode_number(slice: &str) -> Result<i16, OperandError> {
    // Rule (a): a lone prefix character.
    if matches!(slice, "#" | "x" | "b") {
        return Err(OperandError::InvalidNumber);
    }
    // Rule (b): a lone sign.
    if matches!(slice, "+" | "-") {
        return Err(OperandError::InvalidNumber);
    }
    // Rule (c): a prefix followed only by a sign.
    if matches!(slice, "#+" | "#-" | "x+" | "x-" | "b+" | "b-") {
        return Err(OperandError::InvalidNumber);
    }

    let n: i64 = if let Some(rest) = slice.strip_prefix('#') {
        rest.parse().map_err(|_| OperandError::InvalidNumber)?
    } else if let Some(rest) = slice.strip_prefix('x') {
        i64::from_str_radix(rest, 16).map_err(|_| OperandError::InvalidNumber)?
    } else if let Some(rest) = slice.strip_prefix('b') {
        i64::from_str_radix(rest, 2).map_err(|_| OperandError::InvalidNumber)?
    } else {
        // Bare Number token: optional sign, decimal digits.
        slice.parse().map_err(|_| OperandError::InvalidNumber)?
    };

    if !(-32768..=65535).contains(&n) {
        return Err(OperandError::IntegerOverflow);
    }
    fold_to_i16(n)
}

/// Build an `Operand` from a single token, borrowing nothing but the
/// token's slice of `source` for the duration of the call.
pub fn construct(token: Token, source: &str) -> Result<Operand, OperandError> {
    let text = token.text(source);
    match token.kind {
        TokenKind::Register => {
            let digit = text.as_bytes()[1] - b'0';
            Ok(Operand::Register(digit))
        }
        TokenKind::Label => Ok(Operand::Label(text.to_string())),
        TokenKind::Immediate => decode_number(text).map(Operand::Immediate),
        TokenKind::Number => decode_number(text).map(Operand::Number),
        TokenKind::String => {
            if text.len() >= 2 && text.ends_with('"') {
                Ok(Operand::StringLiteral(text[1..text.len() - 1].to_string()))
            } else {
                Err(OperandError::MissingQuote)
            }
        }
        _ => Err(OperandError::InvalidTokenKind),
    }
}
