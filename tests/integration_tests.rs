//! End-to-end scenarios run against fixture `.asm` files under
//! `tests/test_programs/`, covering the required scenarios plus a few
//! broader sweeps across the instruction set.

use lc3_assembler::{assemble, Diagnostic, VecSink};

fn fixture(name: &str) -> String {
    let path = format!("{}/tests/test_programs/{name}", env!("CARGO_MANIFEST_DIR"));
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("reading {path}: {e}"))
}

#[test]
fn add_registers() {
    let source = fixture("add_registers.asm");
    let mut sink = VecSink::new();
    let program = assemble(&source, &mut sink).expect("should assemble");
    assert!(sink.is_empty());
    assert_eq!(program.origin, 0x3000);
    assert_eq!(program.words, vec![(0x3000, 0x1283)]);
}

#[test]
fn branch_loop() {
    let source = fixture("branch_loop.asm");
    let mut sink = VecSink::new();
    let program = assemble(&source, &mut sink).expect("should assemble");
    assert!(sink.is_empty());
    assert_eq!(
        program.words,
        vec![(0x3000, 0x127F), (0x3001, 0x01FE)]
    );
}

#[test]
fn stringz() {
    let source = fixture("stringz.asm");
    let mut sink = VecSink::new();
    let program = assemble(&source, &mut sink).expect("should assemble");
    assert!(sink.is_empty());
    assert_eq!(
        program.words,
        vec![(0x3000, 0x48), (0x3001, 0x69), (0x3002, 0x0000)]
    );
}

#[test]
fn immediate_out_of_range_fails_with_exit_code_semantics() {
    let source = fixture("immediate_out_of_range.asm");
    let mut sink = VecSink::new();
    let program = assemble(&source, &mut sink);
    assert!(program.is_none());
    assert!(matches!(
        sink.diagnostics[0],
        Diagnostic::ImmediateOutOfRange { .. }
    ));
}

#[test]
fn duplicate_label_fails() {
    let source = fixture("duplicate_label.asm");
    let mut sink = VecSink::new();
    let program = assemble(&source, &mut sink);
    assert!(program.is_none());
    assert!(sink
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::LabelRedefined { .. })));
}

#[test]
fn missing_orig_fails() {
    let source = fixture("missing_orig.asm");
    let mut sink = VecSink::new();
    let program = assemble(&source, &mut sink);
    assert!(program.is_none());
    assert!(matches!(sink.diagnostics[0], Diagnostic::OrigMissing));
}

#[test]
fn subroutine_call_assembles_clean() {
    let source = fixture("subroutine.asm");
    let mut sink = VecSink::new();
    let program = assemble(&source, &mut sink).expect("should assemble");
    assert!(sink.is_empty(), "{:?}", sink.diagnostics);
    // LEA, PUTS, JSR, HALT, ADD, RET, then 3 words for "go\0".
    assert_eq!(program.words.len(), 6 + 3);
    assert_eq!(program.origin, 0x3000);
}

#[test]
fn blkw_reserves_words_before_next_label() {
    let source = fixture("blkw_and_trap.asm");
    let mut sink = VecSink::new();
    let program = assemble(&source, &mut sink).expect("should assemble");
    assert!(sink.is_empty(), "{:?}", sink.diagnostics);
    // 3 reserved words, then LD, then TRAP.
    assert_eq!(program.words.len(), 3 + 2);
    let addresses: Vec<u16> = program.words.iter().map(|(a, _)| *a).collect();
    assert_eq!(addresses, vec![0x3000, 0x3001, 0x3002, 0x3003, 0x3004]);
}

#[test]
fn comments_and_blank_lines_are_transparent() {
    let source = ".ORIG x3000\n\n; a comment\n\nADD R1, R2, R3  ; inline note\n\n.END\n";
    let mut sink = VecSink::new();
    let program = assemble(source, &mut sink).expect("should assemble");
    assert!(sink.is_empty(), "{:?}", sink.diagnostics);
    assert_eq!(program.words, vec![(0x3000, 0x1283)]);
}
