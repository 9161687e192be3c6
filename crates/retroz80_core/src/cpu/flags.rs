use crate::catalog::{FlagEffect, Instruction};
use crate::component::{Flags, PotentialFlags};
use crate::error::{Error, Result};
use crate::registers::Reg8;

use super::Cpu;

/// What an executor hands back to the shared flag step.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Outcome {
    pub flags: PotentialFlags,
    /// Byte whose bits 5 and 3 end up in F. `None` means the left operand.
    pub undocumented: Option<u8>,
}

impl Outcome {
    pub fn new(flags: PotentialFlags) -> Self {
        Self {
            flags,
            undocumented: None,
        }
    }

    pub fn leaking(flags: PotentialFlags, source: u8) -> Self {
        Self {
            flags,
            undocumented: Some(source),
        }
    }
}

impl From<PotentialFlags> for Outcome {
    fn from(flags: PotentialFlags) -> Self {
        Outcome::new(flags)
    }
}

impl Cpu {
    /// Commits the potential flags into F as the instruction's flag string
    /// dictates.
    pub(crate) fn set_flags_if_required(
        &mut self,
        instruction: &Instruction,
        potential: &PotentialFlags,
    ) -> Result<()> {
        for (flag, effect) in instruction.flags.iter() {
            let value = match effect {
                FlagEffect::Unaffected => continue,
                FlagEffect::Reset => Some(false),
                FlagEffect::Set => Some(true),
                FlagEffect::Parity => potential.parity,
                FlagEffect::Affected | FlagEffect::Overflow | FlagEffect::Exceptional => {
                    potential.get(flag)
                }
            };
            let value = value.ok_or_else(|| Error::MissingFlag {
                text: instruction.text.clone(),
                flag,
            })?;
            self.set_flag(flag, value);
        }
        Ok(())
    }

    /// Copies bits 5 and 3 of `source` into F.
    pub(crate) fn propagate_undocumented_bits(&mut self, source: u8) {
        let leaked = Flags::from_bits_retain(source) & Flags::UNDOCUMENTED;
        let flags = (self.flags() - Flags::UNDOCUMENTED) | leaked;
        self.registers.set_byte(Reg8::F, flags.bits());
    }
}
