use std::string::FromUtf8Error;

use indexmap::IndexMap;
use thiserror::Error;

use super::{EvArg, EvCmd, EvScript, Label};

const MAGIC: &[u8; 4] = b"EVBC";
const VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("invalid bytecode magic header")]
    BadMagic,
    #[error("unsupported bytecode version {0}")]
    UnsupportedVersion(u32),
    #[error("unexpected EOF while decoding bytecode")]
    UnexpectedEof,
    #[error("unknown argument tag {0}")]
    UnknownArgTag(u8),
    #[error("string index {0} is out of range")]
    StringIndexOutOfRange(u32),
    #[error("{0} trailing bytes after bytecode")]
    TrailingBytes(usize),
    #[error(transparent)]
    InvalidUtf8(#[from] FromUtf8Error),
}

impl EvScript {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(MAGIC);
        write_u32(&mut out, VERSION);
        write_u32(&mut out, self.strings.len() as u32);
        for s in &self.strings {
            write_str(&mut out, s);
        }
        write_u32(&mut out, self.labels.len() as u32);
        for label in self.labels.values() {
            write_u32(&mut out, label.name);
            write_u32(&mut out, label.children.len() as u32);
            for child in &label.children {
                write_u32(&mut out, *child);
            }
            write_u32(&mut out, label.commands.len() as u32);
            for cmd in &label.commands {
                encode_cmd(cmd, &mut out);
            }
        }
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut rd = Reader { bytes, idx: 0 };
        if rd.read_exact(4)? != MAGIC {
            return Err(CodecError::BadMagic);
        }
        let version = rd.read_u32()?;
        if version != VERSION {
            return Err(CodecError::UnsupportedVersion(version));
        }
        let strings_len = rd.read_u32()? as usize;
        let mut strings = Vec::with_capacity(strings_len.min(bytes.len()));
        for _ in 0..strings_len {
            strings.push(rd.read_str()?);
        }
        let check = |idx: u32| {
            if (idx as usize) < strings_len {
                Ok(idx)
            } else {
                Err(CodecError::StringIndexOutOfRange(idx))
            }
        };

        let labels_len = rd.read_u32()? as usize;
        let mut labels = IndexMap::new();
        for _ in 0..labels_len {
            let name = check(rd.read_u32()?)?;
            let children_len = rd.read_u32()? as usize;
            let mut children = Vec::new();
            for _ in 0..children_len {
                children.push(check(rd.read_u32()?)?);
            }
            let cmds_len = rd.read_u32()? as usize;
            let mut commands = Vec::new();
            for _ in 0..cmds_len {
                let cmd = decode_cmd(&mut rd)?;
                for arg in &cmd.args {
                    if let EvArg::String(idx) = arg {
                        check(*idx)?;
                    }
                }
                commands.push(cmd);
            }
            labels.insert(
                name,
                Label {
                    name,
                    commands,
                    children,
                },
            );
        }
        let rest = bytes.len() - rd.idx;
        if rest != 0 {
            return Err(CodecError::TrailingBytes(rest));
        }
        Ok(Self { labels, strings })
    }
}

fn write_u8(out: &mut Vec<u8>, v: u8) {
    out.push(v);
}
fn write_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}
fn write_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}
fn write_i32(out: &mut Vec<u8>, v: i32) {
    out.extend_from_slice(&v.to_le_bytes());
}
fn write_str(out: &mut Vec<u8>, s: &str) {
    write_u32(out, s.len() as u32);
    out.extend_from_slice(s.as_bytes());
}

fn encode_arg(arg: &EvArg, out: &mut Vec<u8>) {
    match arg {
        EvArg::Value(v) => {
            write_u8(out, 0);
            write_i32(out, *v);
        }
        EvArg::Work(w) => {
            write_u8(out, 1);
            write_u32(out, *w);
        }
        EvArg::Flag(f) => {
            write_u8(out, 2);
            write_u32(out, *f);
        }
        EvArg::SysFlag(f) => {
            write_u8(out, 3);
            write_u32(out, *f);
        }
        EvArg::String(s) => {
            write_u8(out, 4);
            write_u32(out, *s);
        }
    }
}

fn encode_cmd(cmd: &EvCmd, out: &mut Vec<u8>) {
    write_u16(out, cmd.opcode);
    write_u16(out, cmd.args.len() as u16);
    for arg in &cmd.args {
        encode_arg(arg, out);
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    idx: usize,
}
impl<'a> Reader<'a> {
    fn read_exact(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if self.idx + n > self.bytes.len() {
            return Err(CodecError::UnexpectedEof);
        }
        let s = &self.bytes[self.idx..self.idx + n];
        self.idx += n;
        Ok(s)
    }
    fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read_exact(1)?[0])
    }
    fn read_u16(&mut self) -> Result<u16, CodecError> {
        let b = self.read_exact(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }
    fn read_u32(&mut self) -> Result<u32, CodecError> {
        let b = self.read_exact(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
    fn read_i32(&mut self) -> Result<i32, CodecError> {
        let b = self.read_exact(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
    fn read_str(&mut self) -> Result<String, CodecError> {
        let n = self.read_u32()? as usize;
        let b = self.read_exact(n)?;
        Ok(String::from_utf8(b.to_vec())?)
    }
}

fn decode_arg(rd: &mut Reader<'_>) -> Result<EvArg, CodecError> {
    Ok(match rd.read_u8()? {
        0 => EvArg::Value(rd.read_i32()?),
        1 => EvArg::Work(rd.read_u32()?),
        2 => EvArg::Flag(rd.read_u32()?),
        3 => EvArg::SysFlag(rd.read_u32()?),
        4 => EvArg::String(rd.read_u32()?),
        t => return Err(CodecError::UnknownArgTag(t)),
    })
}

fn decode_cmd(rd: &mut Reader<'_>) -> Result<EvCmd, CodecError> {
    let opcode = rd.read_u16()?;
    let argc = rd.read_u16()? as usize;
    let mut args = Vec::with_capacity(argc);
    for _ in 0..argc {
        args.push(decode_arg(rd)?);
    }
    Ok(EvCmd { opcode, args })
}
