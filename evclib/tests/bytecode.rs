use evclib::bytecode::opcode::{CALL, FLAG_SET, LDVAL};
use evclib::bytecode::registers::SCWK_ANSWER;
use evclib::bytecode::{
    CodecError, Disassembler, EvArg, EvCmd, EvScript, LabelTable, decode, encode,
};

#[test]
fn encode_stores_little_endian_float_bits() {
    assert_eq!(encode(3.5), 0x4060_0000);
    assert_eq!(encode(0.0), 0);
    assert_eq!(encode(1.0), 1.0f32.to_bits() as i32);
    assert_eq!(encode(-2.0), (-2.0f32).to_bits() as i32);
}

#[test]
fn decode_reads_bytes_in_the_opposite_order() {
    for x in [0x4060_0000, 1, -1, 0x0000_803f, 123_456] {
        assert_eq!(
            decode(x).to_bits(),
            f32::from_bits((x as u32).swap_bytes()).to_bits()
        );
    }
    // 1.0 as stored by encode is 00 00 80 3f; read big-endian that is tiny.
    assert_ne!(decode(encode(1.0)), 1.0);
    assert_eq!(decode(0x0000_803f), 1.0);
}

#[test]
fn child_labels_are_named_after_parent_and_position() {
    let mut table = LabelTable::new();
    let bar = table.new_label("bar");
    let first = table.new_child_label(bar);
    let second = table.new_child_label(bar);
    let grandchild = table.new_child_label(first);

    assert_eq!(table.name_of(first), "__child_bar_0");
    assert_eq!(table.name_of(second), "__child_bar_1");
    assert_eq!(table.name_of(grandchild), "__child___child_bar_0_0");
    assert_eq!(table.get(bar).map(|l| l.children.clone()), Some(vec![first, second]));
    assert_eq!(table.len(), 4);
}

#[test]
fn push_appends_to_the_named_label_only() {
    let mut table = LabelTable::new();
    let a = table.new_label("a");
    let b = table.new_label("b");
    table.push(a, EvCmd::new(FLAG_SET, vec![EvArg::Flag(3)]));
    table.push(9999, EvCmd::new(FLAG_SET, vec![EvArg::Flag(4)]));
    assert_eq!(table.get(a).map(|l| l.commands.len()), Some(1));
    assert_eq!(table.get(b).map(|l| l.commands.len()), Some(0));
}

#[test]
fn redefining_a_label_replaces_it() {
    let mut table = LabelTable::new();
    let first = table.new_label("main");
    table.push(first, EvCmd::new(FLAG_SET, vec![EvArg::Flag(1)]));
    let second = table.new_label("main");
    assert_eq!(first, second);
    assert_eq!(table.len(), 1);
    assert!(table.get(second).is_some_and(|l| l.commands.is_empty()));
}

fn sample_script() -> EvScript {
    let mut table = LabelTable::new();
    let main = table.new_label("main");
    let helper = table.intern("_helper");
    table.push(
        main,
        EvCmd::new(LDVAL, vec![EvArg::Work(0), EvArg::Value(0)]),
    );
    table.push(main, EvCmd::new(FLAG_SET, vec![EvArg::Flag(12)]));
    table.push(main, EvCmd::new(CALL, vec![EvArg::String(helper)]));
    table.push(
        main,
        EvCmd::new(40, vec![EvArg::Work(SCWK_ANSWER), EvArg::SysFlag(2)]),
    );
    let child = table.new_child_label(main);
    table.push(child, EvCmd::new(FLAG_SET, vec![EvArg::Flag(1)]));
    table.into_script()
}

#[test]
fn bytecode_survives_a_write_read_cycle() {
    let script = sample_script();
    let bytes = script.to_bytes();
    assert_eq!(&bytes[..4], b"EVBC");
    assert_eq!(EvScript::from_bytes(&bytes), Ok(script));
}

#[test]
fn decoding_rejects_corrupt_input() {
    let bytes = sample_script().to_bytes();

    let mut bad_magic = bytes.clone();
    bad_magic[0] = b'X';
    assert_eq!(EvScript::from_bytes(&bad_magic), Err(CodecError::BadMagic));

    let mut bad_version = bytes.clone();
    bad_version[4] = 9;
    assert_eq!(
        EvScript::from_bytes(&bad_version),
        Err(CodecError::UnsupportedVersion(9))
    );

    assert_eq!(
        EvScript::from_bytes(&bytes[..bytes.len() - 1]),
        Err(CodecError::UnexpectedEof)
    );

    let mut trailing = bytes.clone();
    trailing.extend_from_slice(&[0, 0]);
    assert_eq!(
        EvScript::from_bytes(&trailing),
        Err(CodecError::TrailingBytes(2))
    );
}

#[test]
fn decoding_rejects_dangling_string_index() {
    let mut table = LabelTable::new();
    let main = table.new_label("main");
    table.push(main, EvCmd::new(CALL, vec![EvArg::String(7)]));
    let bytes = table.into_script().to_bytes();
    assert_eq!(
        EvScript::from_bytes(&bytes),
        Err(CodecError::StringIndexOutOfRange(7))
    );
}

#[test]
fn disassembly_names_builtins_registers_and_strings() {
    let text = Disassembler::new()
        .with_command(40, "talk")
        .render(&sample_script());
    assert_eq!(
        text,
        "main:\n\t_LDVAL(@LOCALWORK0, 0)\n\t_FLAG_SET(#12)\n\t_CALL('_helper')\n\ttalk(@SCWK_ANSWER, $2)\n__child_main_0:\n\t_FLAG_SET(#1)"
    );
}

#[test]
fn flag_names_fall_back_to_indices() {
    let text = Disassembler::new()
        .with_flag(12, "door_open")
        .with_sysflag(9, "unused")
        .render(&sample_script());
    assert!(text.contains("_FLAG_SET(#door_open)"), "{text}");
    assert!(text.contains("_FLAG_SET(#1)"), "{text}");
    assert!(text.contains("$2)"), "{text}");
}

#[test]
fn unknown_opcodes_render_numerically() {
    let disasm = Disassembler::new();
    assert_eq!(disasm.opcode_name(77), "77");
    assert_eq!(disasm.opcode_name(CALL), "_CALL");
}
