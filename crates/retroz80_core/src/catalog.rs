mod class;
mod effects;
mod opcode;
mod operand;

use std::collections::HashMap;
use std::str::FromStr;

use lazy_static::lazy_static;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::registers::{Reg8, Register};

pub use class::{BlockKind, BlockOp, InstructionClass, Shift, Step};
pub use effects::{FlagEffect, FlagEffects};
pub use opcode::{Opcode, Prefix};
pub use operand::{Condition, Operand, PortSource};

/// The Z80 instruction set, one JSON record per opcode.
pub const CATALOG_JSON: &str = include_str!("../data/z80_instructions.json");

/// One catalog record as stored on disk.
#[derive(Clone, Debug, Deserialize)]
pub struct RawInstruction {
    pub opcode: String,
    pub text: String,
    pub instruction_base: String,
    pub left_arg: Option<String>,
    pub right_arg: Option<String>,
    pub size: u8,
    pub time: String,
    pub flags: String,
    pub desc: String,
}

/// T-states taken, and the shorter count when a conditional branch or a
/// block repeat falls through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    pub cycles: u8,
    pub not_taken: Option<u8>,
}

impl FromStr for Timing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || Error::Catalog {
            reason: format!("bad timing {s:?}"),
        };
        let (taken, not_taken) = match s.split_once('/') {
            Some((taken, not_taken)) => (taken, Some(not_taken)),
            None => (s, None),
        };
        Ok(Timing {
            cycles: taken.parse().map_err(|_| malformed())?,
            not_taken: not_taken
                .map(|n| n.parse().map_err(|_| malformed()))
                .transpose()?,
        })
    }
}

/// A validated instruction descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub text: String,
    pub class: InstructionClass,
    pub left: Operand,
    pub right: Operand,
    /// Register that also receives the result of a DDCB/FDCB instruction.
    pub copy_to: Option<Reg8>,
    /// Operand bytes following the opcode.
    pub size: u8,
    pub time: Timing,
    pub flags: FlagEffects,
    pub desc: String,
}

impl TryFrom<RawInstruction> for Instruction {
    type Error = Error;

    fn try_from(raw: RawInstruction) -> Result<Self> {
        let opcode = Opcode::from_key(&raw.opcode).ok_or_else(|| Error::Catalog {
            reason: format!("bad opcode key {:?}", raw.opcode),
        })?;
        let class =
            InstructionClass::from_mnemonic(&raw.instruction_base).ok_or_else(|| Error::Catalog {
                reason: format!("unknown mnemonic {:?} in '{}'", raw.instruction_base, raw.text),
            })?;

        let copy_to = copy_target(opcode, &raw.text);
        let right_template = match (copy_to, raw.right_arg.as_deref()) {
            (Some(target), Some(right)) if Register::from_name(right) == Some(Register::Single(target)) => {
                None
            }
            (_, right) => right,
        };
        let left_template = raw.left_arg.as_deref();

        let left = Operand::parse(left_template, right_template, class)?;
        let right = Operand::parse(right_template, left_template, class)?;

        let consumed = left.stream_bytes() + right.stream_bytes();
        if consumed != usize::from(raw.size) {
            return Err(Error::Catalog {
                reason: format!(
                    "'{}' declares {} operand bytes but its operands consume {}",
                    raw.text, raw.size, consumed
                ),
            });
        }

        Ok(Instruction {
            opcode,
            class,
            left,
            right,
            copy_to,
            size: raw.size,
            time: raw.time.parse()?,
            flags: raw.flags.parse()?,
            text: raw.text,
            desc: raw.desc,
        })
    }
}

/// The third operand of the undocumented DDCB/FDCB forms, such as the `b`
/// in `res 0,(ix+*),b`.
fn copy_target(opcode: Opcode, text: &str) -> Option<Reg8> {
    if !opcode.prefix.is_indexed_bit() {
        return None;
    }
    let (_, operands) = text.split_once(' ')?;
    let mut operands = operands.split(',');
    let last = operands.next_back()?;
    operands.next()?;
    match Register::from_name(last)? {
        Register::Single(reg) => Some(reg),
        Register::Double(_) => None,
    }
}

/// Every instruction plus lookups by opcode and by canonical text.
#[derive(Clone, Debug)]
pub struct InstructionCatalog {
    instructions: Vec<Instruction>,
    by_opcode: HashMap<Opcode, usize>,
    by_text: HashMap<String, usize>,
}

lazy_static! {
    static ref BUILTIN: std::result::Result<InstructionCatalog, String> =
        InstructionCatalog::from_json(CATALOG_JSON).map_err(|err| err.to_string());
}

impl InstructionCatalog {
    /// The embedded catalog, parsed on first use.
    pub fn builtin() -> Result<&'static InstructionCatalog> {
        BUILTIN.as_ref().map_err(|reason| Error::Catalog {
            reason: reason.clone(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Vec<RawInstruction> = serde_json::from_str(json)?;
        let catalog = Self::from_raw(raw)?;
        log::debug!("loaded {} instructions", catalog.len());
        Ok(catalog)
    }

    /// Validates the records and builds both indexes. When several opcodes
    /// share a text, the text index keeps the first one listed.
    pub fn from_raw(raw: Vec<RawInstruction>) -> Result<Self> {
        let mut catalog = InstructionCatalog {
            instructions: Vec::with_capacity(raw.len()),
            by_opcode: HashMap::with_capacity(raw.len()),
            by_text: HashMap::with_capacity(raw.len()),
        };
        for record in raw {
            let instruction = Instruction::try_from(record)?;
            let index = catalog.instructions.len();
            if catalog.by_opcode.insert(instruction.opcode, index).is_some() {
                return Err(Error::Catalog {
                    reason: format!("duplicate opcode {}", instruction.opcode),
                });
            }
            catalog
                .by_text
                .entry(instruction.text.clone())
                .or_insert(index);
            catalog.instructions.push(instruction);
        }
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter()
    }

    pub fn by_opcode(&self, opcode: Opcode) -> Option<&Instruction> {
        self.by_opcode.get(&opcode).map(|&i| &self.instructions[i])
    }

    pub fn by_key(&self, key: &str) -> Option<&Instruction> {
        Opcode::from_key(key).and_then(|opcode| self.by_opcode(opcode))
    }

    pub fn by_text(&self, text: &str) -> Option<&Instruction> {
        self.by_text.get(text).map(|&i| &self.instructions[i])
    }
}
