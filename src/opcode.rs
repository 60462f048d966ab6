//! # Opcode
//!
//! The closed set of real mnemonics and pseudo-ops, plus the `UnknownOp`
//! sentinel the parser uses to signal "abort".

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    UnknownOp,

    Add,
    And,
    Br,
    BrN,
    BrZ,
    BrP,
    BrZp,
    BrNp,
    BrNz,
    BrNzp,
    Jmp,
    Jsr,
    Jsrr,
    Ld,
    Ldi,
    Ldr,
    Lea,
    Not,
    Ret,
    Rti,
    St,
    Sti,
    Str,
    Trap,
    Getc,
    Out,
    Puts,
    In,
    Putsp,
    Halt,

    Orig,
    Fill,
    Blkw,
    Stringz,
    End,
}

impl Opcode {
    /// Resolve the exact mnemonic text of an `Opcode`- or `Pseudo`-kind
    /// token into its `Opcode` variant. Panics if `text` isn't one of the
    /// mnemonics the lexer is able to produce — callers only invoke this on
    /// tokens already tagged `Opcode`/`Pseudo`.
    pub fn from_mnemonic(text: &str) -> Opcode {
        match text {
            "ADD" => Opcode::Add,
            "AND" => Opcode::And,
            "BR" => Opcode::Br,
            "BRn" => Opcode::BrN,
            "BRz" => Opcode::BrZ,
            "BRp" => Opcode::BrP,
            "BRzp" => Opcode::BrZp,
            "BRnp" => Opcode::BrNp,
            "BRnz" => Opcode::BrNz,
            "BRnzp" => Opcode::BrNzp,
            "JMP" => Opcode::Jmp,
            "JSR" => Opcode::Jsr,
            "JSRR" => Opcode::Jsrr,
            "LD" => Opcode::Ld,
            "LDI" => Opcode::Ldi,
            "LDR" => Opcode::Ldr,
            "LEA" => Opcode::Lea,
            "NOT" => Opcode::Not,
            "RET" => Opcode::Ret,
            "RTI" => Opcode::Rti,
            "ST" => Opcode::St,
            "STI" => Opcode::Sti,
            "STR" => Opcode::Str,
            "TRAP" => Opcode::Trap,
            "GETC" => Opcode::Getc,
            "OUT" => Opcode::Out,
            "PUTS" => Opcode::Puts,
            "IN" => Opcode::In,
            "PUTSP" => Opcode::Putsp,
            "HALT" => Opcode::Halt,
            ".ORIG" => Opcode::Orig,
            ".FILL" => Opcode::Fill,
            ".BLKW" => Opcode::Blkw,
            ".STRINGZ" => Opcode::Stringz,
            ".END" => Opcode::End,
            other => unreachable!("not a lexer-produced mnemonic: {other:?}"),
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::UnknownOp => "<unknown>",
            Opcode::Add => "ADD",
            Opcode::And => "AND",
            Opcode::Br => "BR",
            Opcode::BrN => "BRn",
            Opcode::BrZ => "BRz",
            Opcode::BrP => "BRp",
            Opcode::BrZp => "BRzp",
            Opcode::BrNp => "BRnp",
            Opcode::BrNz => "BRnz",
            Opcode::BrNzp => "BRnzp",
            Opcode::Jmp => "JMP",
            Opcode::Jsr => "JSR",
            Opcode::Jsrr => "JSRR",
            Opcode::Ld => "LD",
            Opcode::Ldi => "LDI",
            Opcode::Ldr => "LDR",
            Opcode::Lea => "LEA",
            Opcode::Not => "NOT",
            Opcode::Ret => "RET",
            Opcode::Rti => "RTI",
            Opcode::St => "ST",
            Opcode::Sti => "STI",
            Opcode::Str => "STR",
            Opcode::Trap => "TRAP",
            Opcode::Getc => "GETC",
            Opcode::Out => "OUT",
            Opcode::Puts => "PUTS",
            Opcode::In => "IN",
            Opcode::Putsp => "PUTSP",
            Opcode::Halt => "HALT",
            Opcode::Orig => ".ORIG",
            Opcode::Fill => ".FILL",
            Opcode::Blkw => ".BLKW",
            Opcode::Stringz => ".STRINGZ",
            Opcode::End => ".END",
        }
    }

    pub fn is_pseudo(&self) -> bool {
        matches!(
            self,
            Opcode::Orig | Opcode::Fill | Opcode::Blkw | Opcode::Stringz | Opcode::End
        )
    }

    /// True for any of the 8 BR-family condition-code variants.
    pub fn is_branch(&self) -> bool {
        matches!(
            self,
            Opcode::Br
                | Opcode::BrN
                | Opcode::BrZ
                | Opcode::BrP
                | Opcode::BrZp
                | Opcode::BrNp
                | Opcode::BrNz
                | Opcode::BrNzp
        )
    }

    /// 3-bit `[n][z][p]` condition mask for a BR-family opcode (§4.5).
    pub fn branch_nzp_mask(&self) -> u16 {
        match self {
            Opcode::BrN => 0b100,
            Opcode::BrZ => 0b010,
            Opcode::BrP => 0b001,
            Opcode::BrZp => 0b011,
            Opcode::BrNp => 0b101,
            Opcode::BrNz => 0b110,
            Opcode::BrNzp | Opcode::Br => 0b111,
            _ => unreachable!("branch_nzp_mask called on a non-branch opcode"),
        }
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}
