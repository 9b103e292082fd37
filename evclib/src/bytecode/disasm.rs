use std::collections::HashMap;

use super::opcode::BUILTINS;
use super::registers::work_name;
use super::{EvArg, EvCmd, EvScript, decode};

#[derive(Debug, Clone)]
pub struct Disassembler {
    names: HashMap<u16, String>,
    flags: HashMap<u32, String>,
    sysflags: HashMap<u32, String>,
}

impl Default for Disassembler {
    fn default() -> Self {
        let names = BUILTINS
            .iter()
            .map(|(op, name)| (*op, name.to_string()))
            .collect();
        Self {
            names,
            flags: HashMap::new(),
            sysflags: HashMap::new(),
        }
    }
}

impl Disassembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_command(mut self, opcode: u16, name: impl Into<String>) -> Self {
        self.names.insert(opcode, name.into());
        self
    }

    pub fn with_flag(mut self, index: u32, name: impl Into<String>) -> Self {
        self.flags.insert(index, name.into());
        self
    }

    pub fn with_sysflag(mut self, index: u32, name: impl Into<String>) -> Self {
        self.sysflags.insert(index, name.into());
        self
    }

    pub fn opcode_name(&self, opcode: u16) -> String {
        match self.names.get(&opcode) {
            Some(name) => name.clone(),
            None => opcode.to_string(),
        }
    }

    pub fn render(&self, script: &EvScript) -> String {
        let mut blocks = Vec::with_capacity(script.labels.len());
        for label in script.labels.values() {
            let name = script.label_name(label).unwrap_or("?");
            let body = label
                .commands
                .iter()
                .map(|cmd| format!("\t{}", self.fmt_cmd(cmd, script)))
                .collect::<Vec<_>>()
                .join("\n");
            blocks.push(format!("{name}:\n{body}"));
        }
        blocks.join("\n")
    }

    fn fmt_cmd(&self, cmd: &EvCmd, script: &EvScript) -> String {
        let args = cmd
            .args
            .iter()
            .map(|arg| self.fmt_arg(arg, script))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({args})", self.opcode_name(cmd.opcode))
    }

    fn fmt_arg(&self, arg: &EvArg, script: &EvScript) -> String {
        match arg {
            EvArg::Value(data) => fmt_value(decode(*data)),
            EvArg::Work(idx) => match work_name(*idx) {
                Some(name) => format!("@{name}"),
                None => format!("@{idx}"),
            },
            EvArg::Flag(idx) => match self.flags.get(idx) {
                Some(name) => format!("#{name}"),
                None => format!("#{idx}"),
            },
            EvArg::SysFlag(idx) => match self.sysflags.get(idx) {
                Some(name) => format!("${name}"),
                None => format!("${idx}"),
            },
            EvArg::String(idx) => match script.string(*idx) {
                Some(text) => format!("'{text}'"),
                None => format!("'<str {idx}>'"),
            },
        }
    }
}

fn fmt_value(value: f32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value.fract() == 0.0 && value.abs() < i64::MAX as f32 {
        return (value as i64).to_string();
    }
    format!("{value:.6}")
}
