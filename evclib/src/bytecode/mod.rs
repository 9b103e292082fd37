use indexmap::IndexMap;
use tracing::warn;

use crate::strtab::StringTable;

pub mod codec;
pub mod disasm;
pub mod opcode;
pub mod registers;

pub use codec::CodecError;
pub use disasm::Disassembler;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvArg {
    Value(i32),
    Work(u32),
    Flag(u32),
    SysFlag(u32),
    String(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvCmd {
    pub opcode: u16,
    pub args: Vec<EvArg>,
}

impl EvCmd {
    pub fn new(opcode: u16, args: Vec<EvArg>) -> Self {
        Self { opcode, args }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: u32,
    pub commands: Vec<EvCmd>,
    pub children: Vec<u32>,
}

impl Label {
    pub fn new(name: u32) -> Self {
        Self {
            name,
            commands: Vec::new(),
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    strings: StringTable,
    labels: IndexMap<u32, Label>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, text: &str) -> u32 {
        self.strings.intern(text)
    }

    pub fn new_label(&mut self, name: &str) -> u32 {
        let id = self.strings.intern(name);
        if self.labels.insert(id, Label::new(id)).is_some() {
            warn!(label = name, "label redefined; earlier instructions are dropped");
        }
        id
    }

    // Creates `__child_<parent>_<n>` where `n` counts the parent's existing
    // children, and records it as the parent's next child.
    pub fn new_child_label(&mut self, parent: u32) -> u32 {
        let index = self.labels.get(&parent).map_or(0, |l| l.children.len());
        let name = format!("__child_{}_{}", self.name_of(parent), index);
        let id = self.new_label(&name);
        if let Some(label) = self.labels.get_mut(&parent) {
            label.children.push(id);
        }
        id
    }

    pub fn push(&mut self, label: u32, cmd: EvCmd) {
        match self.labels.get_mut(&label) {
            Some(target) => target.commands.push(cmd),
            None => warn!(label, "instruction emitted into unknown label"),
        }
    }

    pub fn get(&self, label: u32) -> Option<&Label> {
        self.labels.get(&label)
    }

    pub fn name_of(&self, label: u32) -> &str {
        self.strings.get(label).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn strings(&self) -> &StringTable {
        &self.strings
    }

    pub fn into_script(self) -> EvScript {
        EvScript {
            labels: self.labels,
            strings: self.strings.into_vec(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvScript {
    pub labels: IndexMap<u32, Label>,
    pub strings: Vec<String>,
}

impl EvScript {
    pub fn label_name(&self, label: &Label) -> Option<&str> {
        self.strings.get(label.name as usize).map(String::as_str)
    }

    pub fn find_label(&self, name: &str) -> Option<&Label> {
        let idx = self.strings.iter().position(|s| s == name)? as u32;
        self.labels.get(&idx)
    }

    pub fn string(&self, idx: u32) -> Option<&str> {
        self.strings.get(idx as usize).map(String::as_str)
    }
}

pub fn encode(value: f64) -> i32 {
    i32::from_le_bytes((value as f32).to_le_bytes())
}

// Reads an encoded operand back for display. The bits are taken big-endian,
// so `decode(encode(v))` is generally not `v`.
pub fn decode(data: i32) -> f32 {
    f32::from_be_bytes((data as u32).to_le_bytes())
}
