pub const CALL: u16 = 1;
pub const IFVAL_JUMP: u16 = 2;
pub const LDVAL: u16 = 3;
pub const LDWK: u16 = 4;
pub const FLAG_SET: u16 = 5;
pub const FLAG_RESET: u16 = 6;
pub const SYSFLAG_SET: u16 = 7;
pub const SYSFLAG_RESET: u16 = 8;

pub const BUILTINS: &[(u16, &str)] = &[
    (CALL, "_CALL"),
    (IFVAL_JUMP, "_IFVAL_JUMP"),
    (LDVAL, "_LDVAL"),
    (LDWK, "_LDWK"),
    (FLAG_SET, "_FLAG_SET"),
    (FLAG_RESET, "_FLAG_RESET"),
    (SYSFLAG_SET, "_SYSFLAG_SET"),
    (SYSFLAG_RESET, "_SYSFLAG_RESET"),
];

pub fn builtin_name(opcode: u16) -> Option<&'static str> {
    BUILTINS
        .iter()
        .find(|(op, _)| *op == opcode)
        .map(|(_, name)| *name)
}
